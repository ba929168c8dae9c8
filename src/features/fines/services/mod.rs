pub mod fine_service;

pub use fine_service::FineService;
