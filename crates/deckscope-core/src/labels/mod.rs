pub mod config;
pub mod engine;

pub use config::{CONFIG_VERSION, LabelConfig};
pub use engine::LabelEngine;
