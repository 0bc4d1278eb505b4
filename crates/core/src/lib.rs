//! Core library for Parlor chat
//!
//! This crate contains the core business logic, including:
//! - Chat room management
//! - Message persistence

pub mod error;
pub mod message;
pub mod room;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
