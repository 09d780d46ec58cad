//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod mobile;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use mobile::{Mobile, MobileError};
pub use status::OrderStatus;
