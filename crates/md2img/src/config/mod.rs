//! Plugin configuration
//!
//! The host supplies configuration once at construction time. This module parses
//! it into [`ConvertConfig`], exposes typed views of the mode strings, and reports
//! values that will degrade features at runtime.

pub mod loader;
pub mod mode;
pub mod validator;

pub use loader::ConvertConfig;
pub use mode::{AutoConvertMode, InterceptMode};
pub use validator::{ConfigValidator, ConfigWarning};
