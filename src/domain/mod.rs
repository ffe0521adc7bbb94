//! Core domain types and logic.

pub mod bar;
pub mod month;
pub mod leverage;
pub mod simulate;
pub mod run;
pub mod validation;
pub mod integrity;
pub mod summary;
pub mod config_validation;
pub mod error;
