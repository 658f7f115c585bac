pub mod chunk;
pub mod disasm;
pub mod error;
pub mod image;
pub mod op;

pub use chunk::Chunk;
pub use error::{ChunkError, Result};
pub use op::OpCode;
