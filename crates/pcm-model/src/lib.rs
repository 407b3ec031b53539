mod domain;
pub use domain::{
    DEFAULT_GRACE_PERIOD_SECS, DEFAULT_INTERVAL_SECS, DEFAULT_LABEL_SELECTOR, DEFAULT_NAMESPACE,
};
pub use domain::{Flag, Labels};

mod error;
pub use error::{ModelError, ModelResult};

mod instance;
pub use instance::{Instance, Phase};

mod selector;
pub use selector::{Operator, Requirement, Selector};

mod policy;
pub use policy::Policy;
