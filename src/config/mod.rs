mod settings;

pub use settings::{LogConfig, ServiceConfig, Settings};
