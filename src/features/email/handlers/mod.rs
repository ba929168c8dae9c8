pub mod email_handler;

pub use email_handler::*;
