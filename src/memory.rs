use std::io;

use thiserror::Error;

pub type Address = i64;
pub type Word = i64;

pub type Result<T> = std::result::Result<T, MemoryError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("invalid address: {0}")]
    InvalidAddress(Address),
}

/// Rejected sizes when building a memory level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("{what} must be a non-zero power of two, got {value}")]
    NotPowerOfTwo { what: &'static str, value: usize },
    #[error("line size {line_size} does not fit in {what} of {capacity}")]
    LineTooLarge {
        what: &'static str,
        line_size: usize,
        capacity: usize,
    },
}

pub(crate) fn power_of_two(
    what: &'static str,
    value: usize,
) -> std::result::Result<(), GeometryError> {
    if value.is_power_of_two() {
        Ok(())
    } else {
        Err(GeometryError::NotPowerOfTwo { what, value })
    }
}

pub trait Memory {
    /// Size of the address space accepted by `read` and `write`.
    fn capacity(&self) -> usize;
    fn read(&mut self, addr: Address) -> Result<Word>;
    fn write(&mut self, addr: Address, value: Word) -> Result<()>;

    fn check_addr(&self, addr: Address) -> Result<usize> {
        usize::try_from(addr)
            .ok()
            .filter(|&a| a < self.capacity())
            .ok_or(MemoryError::InvalidAddress(addr))
    }

    /// Writes out and forgets any events recorded since the last call.
    fn report(&mut self, _out: &mut dyn io::Write) -> io::Result<()> {
        Ok(())
    }
}
