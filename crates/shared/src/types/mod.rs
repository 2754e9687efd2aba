//! Common types used across the application.

pub mod id;
pub mod owner;

pub use id::*;
pub use owner::OwnerRef;
