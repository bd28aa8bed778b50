pub mod cache;
pub mod config;
pub mod cpu;
pub mod memory;
pub mod ram;
pub mod sim;

use thiserror::Error;

pub use memory::{Address, Memory, MemoryError, Word};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Geometry(#[from] memory::GeometryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("bad arguments: {0}")]
    Args(#[from] pico_args::Error),
}
