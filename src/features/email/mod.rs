pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod templates;

pub use services::EmailService;
