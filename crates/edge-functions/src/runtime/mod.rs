//! Runtime module - function registration and invocation

pub mod handler;

pub use handler::{ExecuteError, HandlerRegistry, HandlerStats};
