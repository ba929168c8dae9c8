pub mod employee_handler;

pub use employee_handler::*;
