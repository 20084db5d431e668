pub mod alert;
pub mod ticker;

pub use alert::{AlertConfig, MonitorState, Observation};
pub use ticker::TickerSnapshot;
