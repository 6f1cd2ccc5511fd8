//! Crate-level errors for hosting the API.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::rpc::DispatchError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("method registration failed: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
