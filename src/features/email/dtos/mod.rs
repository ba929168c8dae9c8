pub mod email_dto;

pub use email_dto::{EmailSendResultDto, SendReportDto, SendTestEmailDto};
