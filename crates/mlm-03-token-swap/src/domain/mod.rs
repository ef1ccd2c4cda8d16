//! Domain module for the Token Swap subsystem
//!
//! Contains core entities, value objects and errors.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
