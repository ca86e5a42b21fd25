/// Command, inline-query and callback handlers
pub mod handlers;
/// Reply text, keyboards and inline results
pub mod views;

pub use handlers::Command;
