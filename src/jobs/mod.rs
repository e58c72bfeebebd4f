mod monitor;
mod observer;

pub use monitor::{MonitorSchedule, start_monitor_job};
pub use observer::{AnalysisObserver, ChannelObserver, LogObserver};
