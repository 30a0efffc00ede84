//! `handle_signup` edge function

mod handler;

pub use handler::{handle, SignupGreeting, GREETING};

use edge_functions_sdk::{handler_fn, Handler};

/// Name the function is registered under
pub const NAME: &str = "handle_signup";

/// The function, ready to be registered with the runtime
pub fn handler() -> impl Handler {
    handler_fn(NAME, handle)
}
