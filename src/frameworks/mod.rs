// Frameworks layer: environment configuration and process runtime.

pub mod config;
pub mod runtime;
