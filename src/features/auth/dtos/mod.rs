pub mod auth_dto;

pub use auth_dto::{AuthCheckDto, ChangePasswordDto, LoginDto, LoginResponseDto};
