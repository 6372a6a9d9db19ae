pub mod clock;
pub mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ticker::Ticker;
