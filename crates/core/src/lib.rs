#![forbid(unsafe_code)]

pub mod error;
pub mod location;
pub mod model;
pub mod path;

pub use error::Error;
pub use location::{DocumentLocation, LocationError};
pub use path::PathRoots;
