use crate::bytecode::error::ChunkError;
use serde::{Deserialize, Serialize};

// =============================================================================
// OPCODE - Bytecode instructions
// =============================================================================

/// A single instruction recognized by the interpreter's dispatch step.
///
/// Opcodes are stored in a chunk as their `u8` discriminant, followed inline
/// by `operand_count()` operand bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OpCode {
    /// Return from the current unit of execution.
    Return = 0,
}

/// Operand byte count per opcode, indexed by discriminant.
const OPERAND_COUNTS: [usize; 1] = [
    0, // Return
];

impl OpCode {
    /// Number of operand bytes that follow this opcode in the stream.
    #[inline]
    pub const fn operand_count(self) -> usize {
        OPERAND_COUNTS[self as usize]
    }

    /// Total encoded width: the opcode byte plus its operands.
    #[inline]
    pub const fn width(self) -> usize {
        1 + self.operand_count()
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Return => "OP_RETURN",
        }
    }
}

impl From<OpCode> for u8 {
    #[inline]
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}

impl TryFrom<u8> for OpCode {
    type Error = ChunkError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(OpCode::Return),
            other => Err(ChunkError::InvalidOpcode(other)),
        }
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_encodes_as_zero() {
        assert_eq!(u8::from(OpCode::Return), 0);
        assert_eq!(OpCode::try_from(0).unwrap(), OpCode::Return);
    }

    #[test]
    fn test_unknown_byte_rejected() {
        for byte in 1..=u8::MAX {
            match OpCode::try_from(byte) {
                Err(ChunkError::InvalidOpcode(b)) => assert_eq!(b, byte),
                other => panic!("expected InvalidOpcode for {}, got {:?}", byte, other),
            }
        }
    }

    #[test]
    fn test_operand_table() {
        assert_eq!(OpCode::Return.operand_count(), 0);
        assert_eq!(OpCode::Return.width(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(OpCode::Return.to_string(), "OP_RETURN");
    }
}
