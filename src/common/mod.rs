// Shared types: source locations and the located diagnostic

pub mod error;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::Location;
