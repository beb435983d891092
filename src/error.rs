// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for vip8

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vip8.
#[derive(Debug, Error)]
pub enum Error {
    /// The word at `pc` does not match any known encoding
    #[error("opcode {word:04x} not recognized")]
    InvalidOpcode {
        /// The offending word
        word: u16,
    },
    /// Tried to access memory at or beyond the end of the address space
    #[error("address {addr:04x} is not present in memory")]
    MemoryAddressNotFound {
        /// The first out-of-range address
        addr: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    RegisterNotFound {
        /// The offending register
        reg: usize,
    },
    /// An operand was outside the domain of the instruction
    #[error("argument {value:02x} is out of range")]
    InvalidArguments {
        /// The offending value
        value: u8,
    },
    /// A call was made with a full stack. The top entry was overwritten,
    /// and control was still transferred.
    #[error("stack overflow calling {addr:03x}")]
    StackOverflow {
        /// The address that was called
        addr: u16,
    },
    /// Returned from a subroutine with an empty stack
    #[error("return at {pc:03x} with no matching call")]
    NoCall {
        /// The address of the offending return
        pc: u16,
    },
    /// The program doesn't fit in program memory
    #[error("rom is {len} bytes, but only {max} bytes fit in memory")]
    RomTooBig {
        /// The size of the rejected program
        len: usize,
        /// The largest program that fits
        max: usize,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: u8,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Returns true if the operation that produced this error still committed.
    ///
    /// Only [Error::StackOverflow] does this.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::StackOverflow { .. })
    }
}
