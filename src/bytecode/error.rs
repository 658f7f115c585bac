//! Chunk errors

use thiserror::Error;

/// Errors raised while building, reading or decoding a chunk
#[derive(Debug, Error)]
pub enum ChunkError {
    /// Growing the backing storage could not acquire memory
    #[error("allocation failure: could not grow chunk to {requested} bytes")]
    AllocationFailure { requested: usize },

    /// A read outside `[0, len)`
    #[error("index {index} out of range for chunk of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    /// Byte does not encode any known opcode
    #[error("invalid opcode: {0}")]
    InvalidOpcode(u8),

    /// Instruction operands run past the end of the chunk
    #[error("unexpected end of bytecode at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// Chunk image does not start with the expected magic bytes
    #[error("invalid chunk image magic")]
    InvalidMagic,

    /// Chunk image written by an incompatible format version
    #[error("unsupported chunk image version: {0}")]
    UnsupportedVersion(u32),

    /// Chunk image is followed by bytes that are not part of it
    #[error("{count} trailing bytes after chunk image")]
    TrailingBytes { count: usize },

    #[error("chunk image: {0}")]
    Image(#[from] postcard::Error),

    #[error("formatting failed")]
    Fmt(#[from] std::fmt::Error),
}

impl ChunkError {
    /// Out-of-range error for an unsigned index.
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        ChunkError::IndexOutOfRange {
            index: isize::try_from(index).unwrap_or(isize::MAX),
            len,
        }
    }
}

/// Result type for chunk operations
pub type Result<T> = std::result::Result<T, ChunkError>;
