use crate::bytecode::error::{ChunkError, Result};
use crate::bytecode::{Chunk, OpCode};
use std::fmt::Write;

/// Disassemble a whole chunk under a `== name ==` header
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "== {} ==", name)?;

    let mut offset = 0;
    while offset < chunk.len() {
        offset = disassemble_instruction(chunk, offset, &mut out)?;
    }

    Ok(out)
}

/// Write the instruction at `offset` as one line and return the offset of the
/// next instruction.
///
/// Bytes that are not opcodes are reported and skipped one at a time, so a
/// corrupt stream still disassembles to the end.
pub fn disassemble_instruction<W: Write>(
    chunk: &Chunk,
    offset: usize,
    out: &mut W,
) -> Result<usize> {
    let byte = chunk.read(offset)?;
    write!(out, "{:04} ", offset)?;

    let op = match OpCode::try_from(byte) {
        Ok(op) => op,
        Err(_) => {
            writeln!(out, "Unknown opcode {}", byte)?;
            return Ok(offset + 1);
        }
    };

    if op.operand_count() == 0 {
        writeln!(out, "{}", op)?;
    } else {
        write!(out, "{:<16}", op.mnemonic())?;
        for i in 1..=op.operand_count() {
            let operand = chunk
                .read(offset + i)
                .map_err(|_| ChunkError::UnexpectedEnd { offset })?;
            write!(out, " {:3}", operand)?;
        }
        writeln!(out)?;
    }

    Ok(offset + op.width())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_only() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Return);

        let text = disassemble_chunk(&chunk, "test chunk").unwrap();
        assert_eq!(text, "== test chunk ==\n0000 OP_RETURN\n");
    }

    #[test]
    fn test_empty_chunk() {
        let text = disassemble_chunk(&Chunk::new(), "empty").unwrap();
        assert_eq!(text, "== empty ==\n");
    }

    #[test]
    fn test_unknown_opcode_skipped() {
        let chunk: Chunk = [0u8, 200, 0].into_iter().collect();
        let text = disassemble_chunk(&chunk, "mixed").unwrap();
        assert_eq!(
            text,
            "== mixed ==\n0000 OP_RETURN\n0001 Unknown opcode 200\n0002 OP_RETURN\n"
        );
    }

    #[test]
    fn test_instruction_offsets() {
        let chunk: Chunk = [0u8, 0].into_iter().collect();
        let mut line = String::new();
        assert_eq!(disassemble_instruction(&chunk, 1, &mut line).unwrap(), 2);
        assert_eq!(line, "0001 OP_RETURN\n");
    }

    #[test]
    fn test_instruction_past_end() {
        let chunk: Chunk = [0u8].into_iter().collect();
        let mut line = String::new();
        assert!(matches!(
            disassemble_instruction(&chunk, 1, &mut line),
            Err(ChunkError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(line.is_empty());
    }
}
