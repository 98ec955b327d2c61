//! Core types for Oakline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use catalog::{Category, Company};
pub use email::{Email, EmailError};
pub use id::*;
pub use role::Role;
pub use status::OrderStatus;
