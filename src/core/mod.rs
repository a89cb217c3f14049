//! Core migration logic

pub mod migrate;
pub mod transform;
pub mod validation;
