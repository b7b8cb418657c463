//! Error type for the punchmeter umbrella crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] punchmeter_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
