//! Backend worker that owns the tokio runtime and the lookup controller.

pub mod commands;
pub mod runtime;
