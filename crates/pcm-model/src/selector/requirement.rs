use std::{collections::BTreeSet, fmt};

use crate::Labels;

/// Longest allowed label name or value.
const MAX_NAME_LEN: usize = 63;

/// Longest allowed key prefix (a DNS subdomain).
const MAX_PREFIX_LEN: usize = 253;

/// Comparison applied by a single [`Requirement`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    /// `key=value` or `key==value`.
    Equals,
    /// `key!=value`; also satisfied when the key is absent.
    NotEquals,
    /// `key in (a, b)`.
    In,
    /// `key notin (a, b)`; also satisfied when the key is absent.
    NotIn,
    /// `key`.
    Exists,
    /// `!key`.
    DoesNotExist,
    /// `key>n`; the label must hold an integer greater than `n`.
    GreaterThan,
    /// `key<n`; the label must hold an integer less than `n`.
    LessThan,
}

/// One comma-separated term of a label selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    key: String,
    operator: Operator,
    values: BTreeSet<String>,
}

impl Requirement {
    pub(crate) fn new(key: String, operator: Operator, values: BTreeSet<String>) -> Self {
        Self {
            key,
            operator,
            values,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Values compared against, sorted. Empty for `Exists` / `DoesNotExist`.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Evaluate this requirement against a label mapping.
    pub fn matches(&self, labels: &Labels) -> bool {
        let actual = labels.get(&self.key);
        match self.operator {
            Operator::Equals | Operator::In => actual.is_some_and(|v| self.values.contains(v)),
            Operator::NotEquals | Operator::NotIn => {
                actual.is_none_or(|v| !self.values.contains(v))
            }
            Operator::Exists => actual.is_some(),
            Operator::DoesNotExist => actual.is_none(),
            Operator::GreaterThan => self.compare(actual).is_some_and(|(v, n)| v > n),
            Operator::LessThan => self.compare(actual).is_some_and(|(v, n)| v < n),
        }
    }

    /// Label value and bound as integers, if both parse.
    fn compare(&self, actual: Option<&str>) -> Option<(i64, i64)> {
        let bound = self.values.first()?.parse().ok()?;
        let value = actual?.parse().ok()?;
        Some((value, bound))
    }

    fn joined_values(&self) -> String {
        self.values.iter().cloned().collect::<Vec<_>>().join(",")
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::Equals => write!(f, "{}={}", self.key, self.joined_values()),
            Operator::NotEquals => write!(f, "{}!={}", self.key, self.joined_values()),
            Operator::In => write!(f, "{} in ({})", self.key, self.joined_values()),
            Operator::NotIn => write!(f, "{} notin ({})", self.key, self.joined_values()),
            Operator::Exists => f.write_str(&self.key),
            Operator::DoesNotExist => write!(f, "!{}", self.key),
            Operator::GreaterThan => write!(f, "{}>{}", self.key, self.joined_values()),
            Operator::LessThan => write!(f, "{}<{}", self.key, self.joined_values()),
        }
    }
}

/// Check a label key: `[prefix/]name`.
pub(crate) fn validate_key(key: &str) -> Result<(), String> {
    let (prefix, name) = match key.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };
    if let Some(prefix) = prefix {
        if prefix.is_empty() || prefix.len() > MAX_PREFIX_LEN || !is_dns_subdomain(prefix) {
            return Err(format!("key {key:?} has an invalid prefix"));
        }
    }
    if name.is_empty() {
        return Err(format!("key {key:?} has an empty name"));
    }
    validate_name(name).map_err(|reason| format!("key {key:?} {reason}"))
}

/// Check a label value. Empty values are allowed.
pub(crate) fn validate_value(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    validate_name(value).map_err(|reason| format!("value {value:?} {reason}"))
}

fn validate_name(s: &str) -> Result<(), String> {
    if s.len() > MAX_NAME_LEN {
        return Err(format!("is longer than {MAX_NAME_LEN} characters"));
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err("may only contain alphanumerics, '-', '_' or '.'".to_string());
    }
    if !starts_and_ends_alphanumeric(s) {
        return Err("must start and end with an alphanumeric character".to_string());
    }
    Ok(())
}

fn is_dns_subdomain(s: &str) -> bool {
    s.split('.').all(|part| {
        !part.is_empty()
            && part.len() <= MAX_NAME_LEN
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && starts_and_ends_alphanumeric(part)
    })
}

fn starts_and_ends_alphanumeric(s: &str) -> bool {
    let first = s.chars().next();
    let last = s.chars().last();
    first.is_some_and(|c| c.is_ascii_alphanumeric())
        && last.is_some_and(|c| c.is_ascii_alphanumeric())
}
