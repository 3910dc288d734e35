//! Build tool invocation.
//!
//! - [`locator`] - which executable to run
//! - [`invoker`] - running it and capturing its output
//! - [`types`] - requests, outputs and errors

pub mod invoker;
pub mod locator;
pub mod types;

pub use invoker::{CommandInvoker, ProcessInvoker};
pub use locator::{CurrentExe, ExecutableLocator, FixedExecutable};
pub use types::{CommandOutput, InvokeError, InvokeRequest};
