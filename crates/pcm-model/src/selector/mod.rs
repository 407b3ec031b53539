//! Label selector compiled once from configuration.
//!
//! Accepts the Kubernetes label selector string syntax: equality (`=`, `==`, `!=`),
//! set membership (`in`, `notin`), integer comparison (`>`, `<`) and existence (`key`, `!key`),
//! comma-separated and ANDed.
mod parse;
mod requirement;

pub use requirement::{Operator, Requirement};

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Labels,
    error::{ModelError, ModelResult},
};

/// Immutable label-matching predicate.
///
/// An empty selector matches every label mapping.
///
/// # Examples
/// ```
/// use pcm_model::{Labels, Selector};
///
/// let sel: Selector = "podchaosmonkey=true, tier in (api, worker)".parse().unwrap();
///
/// let labels: Labels = [("podchaosmonkey", "true"), ("tier", "api")].into_iter().collect();
/// assert!(sel.matches(&labels));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    /// Compile a selector string.
    ///
    /// Returns [`ModelError::InvalidSelector`] on any syntax or key/value violation.
    pub fn parse(input: &str) -> ModelResult<Self> {
        parse::requirements(input)
            .map(|requirements| Self { requirements })
            .map_err(|reason| ModelError::InvalidSelector {
                input: input.to_string(),
                reason,
            })
    }

    /// Selector without requirements; matches everything.
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Returns `true` if every requirement is satisfied by `labels`.
    pub fn matches(&self, labels: &Labels) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl FromStr for Selector {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Selector {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Selector> for String {
    fn from(s: Selector) -> Self {
        s.to_string()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{r}")?;
        }
        Ok(())
    }
}
