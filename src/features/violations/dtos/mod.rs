pub mod violation_type_dto;

pub use violation_type_dto::{SaveViolationTypeDto, SuggestionsInput, ViolationTypeResponseDto};
