mod flag;
pub use flag::Flag;

mod labels;
pub use labels::Labels;

mod constants;
pub use constants::{
    DEFAULT_GRACE_PERIOD_SECS, DEFAULT_INTERVAL_SECS, DEFAULT_LABEL_SELECTOR, DEFAULT_NAMESPACE,
};
