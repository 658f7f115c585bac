//! # loxvm
//!
//! Code storage for a Lox bytecode virtual machine.
//!
//! A [`Chunk`] holds one compilation pass worth of bytecode: opcode bytes and
//! their inline operands, in execution order. The compiler appends to it; the
//! interpreter reads it back by index.
//!
//! ## Layout
//!
//! - [`bytecode::chunk`]: the growable byte buffer and its doubling policy.
//! - [`bytecode::op`]: opcode enumeration and operand table.
//! - [`bytecode::disasm`]: text rendering of a chunk.
//! - [`bytecode::image`]: versioned serialized form of a chunk.

#![deny(unsafe_code)]

pub mod bytecode;

pub use bytecode::{Chunk, ChunkError, OpCode};
