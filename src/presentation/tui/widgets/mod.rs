pub mod charts;
pub mod event_log;
pub mod gauge;
pub mod kpi;
