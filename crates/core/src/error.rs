use thiserror::Error;

use crate::location::LocationError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Location(#[from] LocationError),
}
