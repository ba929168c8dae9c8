pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod email;
pub mod employees;
pub mod fines;
pub mod violations;
