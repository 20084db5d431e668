pub mod kraken;
pub mod twilio;

pub mod alerter;
pub mod alert_monitor;
