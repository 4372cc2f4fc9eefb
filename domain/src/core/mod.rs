//! Core identifiers and errors shared by every relay component.

pub mod error;
pub mod ids;
