pub mod fine_handler;

pub use fine_handler::*;
