//! Row structs and wire DTOs.

pub mod patient;
pub mod reading;
pub mod user;
