pub mod config;
pub mod display_spec;

pub use config::{AppConfig, SimulatorConfig};
pub use display_spec::DisplaySpec;
