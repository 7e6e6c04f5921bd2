pub mod capture_device;
pub mod event_gate;
