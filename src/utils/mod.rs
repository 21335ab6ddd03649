/// `docchat.toml` loading, defaults and environment overrides.
pub mod toml_config;

/// Tracing subscriber setup for the binary.
pub mod logging;
