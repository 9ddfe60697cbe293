//! Shared utilities for stock-alert
//!
//! Logging setup and environment loading used by the `stock-alert` binary
//! and its configuration layer.

pub mod env;
pub mod logging;

pub use env::{EnvSource, MapEnv, ProcessEnv, load_dotenv};
pub use logging::{DEFAULT_FILTER, init_tracing, init_tracing_with};
