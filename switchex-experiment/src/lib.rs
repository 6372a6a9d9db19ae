pub mod config;
pub mod counterbalance;
pub mod error;
pub mod layout;
pub mod recorder;
pub mod session;
pub mod state;
pub mod trial;

pub use config::{ConfigError, ExperimentConfig};
pub use counterbalance::{group_of, order_for, order_for_group};
pub use error::TrialError;
pub use layout::LayoutGenerator;
pub use recorder::SessionRecorder;
pub use session::Session;
pub use state::{ActionOutcome, TrialEngine};
pub use trial::TrialState;
