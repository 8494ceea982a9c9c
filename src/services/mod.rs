//! Service layer: sampling, history merging, session setup and the tuning loop.

pub mod driver;
pub mod history;
pub mod sampler;
pub mod setup;
pub mod statistics;

pub use driver::{
    DriverError, SessionOutcome, SessionPlan, TrialObserver, TrialRecord, TuningDriver,
};
pub use history::{filter_in_bounds, HistoryMerger};
pub use sampler::AdaptiveSampler;
pub use setup::{Deployment, SessionContext, SessionSetup};
