//! Domain layer for the WMATA client
//!
//! Contains the geographic query value objects and the error envelope shared
//! by every call site. This layer performs no I/O.

pub mod errors;
pub mod value_objects;

pub use errors::WmataError;
pub use value_objects::*;
