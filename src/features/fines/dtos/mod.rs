pub mod fine_dto;

pub use fine_dto::{FineListQuery, FineResponseDto, SaveFineDto};
