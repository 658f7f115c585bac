use crate::bytecode::error::{ChunkError, Result};
use crate::bytecode::op::OpCode;
use tracing::{debug, error};

/// Capacity reserved by the first growth of an empty chunk.
pub const MIN_CAPACITY: usize = 8;

/// Multiplier applied to a full chunk's capacity once it is at least `MIN_CAPACITY`.
pub const GROWTH_FACTOR: usize = 2;

/// Next capacity for a chunk that is full at `capacity` bytes.
#[inline]
pub fn grow_capacity(capacity: usize) -> usize {
    if capacity < MIN_CAPACITY {
        MIN_CAPACITY
    } else {
        capacity.saturating_mul(GROWTH_FACTOR)
    }
}

/// A growable buffer of bytecode: opcodes and their inline operand bytes, in
/// execution order.
///
/// A chunk is append-only. The compiler owns it while writing; the interpreter
/// reads it through a shared reference once compilation is done. Storage grows
/// by doubling, so `n` appends copy `O(n)` bytes in total.
///
/// `capacity` is tracked here rather than read back from the `Vec`, so the
/// reported value follows the growth policy exactly. The `Vec` always holds at
/// least that much.
#[derive(Debug, Default)]
pub struct Chunk {
    code: Vec<u8>,
    capacity: usize,
    growths: usize,
    copied: usize,
}

impl Chunk {
    /// Empty chunk with no storage. The first write reserves `MIN_CAPACITY` bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty chunk with `capacity` bytes reserved up front.
    /// Aborts the process if the reservation cannot be made.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(chunk) => chunk,
            Err(err) => {
                error!(%err, "chunk storage exhausted");
                std::process::abort();
            }
        }
    }

    /// Empty chunk with `capacity` bytes reserved, reporting
    /// `AllocationFailure` instead of aborting.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut code = Vec::new();
        code.try_reserve_exact(capacity)
            .map_err(|_| ChunkError::AllocationFailure {
                requested: capacity,
            })?;

        Ok(Self {
            code,
            capacity,
            growths: 0,
            copied: 0,
        })
    }

    /// Appends one byte, aborting the process if storage cannot grow.
    pub fn write(&mut self, byte: u8) {
        if let Err(err) = self.try_write(byte) {
            error!(%err, len = self.code.len(), "chunk storage exhausted");
            std::process::abort();
        }
    }

    /// Appends one byte, reporting `AllocationFailure` instead of aborting.
    pub fn try_write(&mut self, byte: u8) -> Result<()> {
        if self.code.len() == self.capacity {
            self.grow()?;
        }

        self.code.push(byte);
        Ok(())
    }

    /// Appends the byte encoding of `op`.
    pub fn write_op(&mut self, op: OpCode) {
        self.write(u8::from(op));
    }

    fn grow(&mut self) -> Result<()> {
        let old_capacity = self.capacity;
        let new_capacity = grow_capacity(old_capacity);
        let len = self.code.len();

        self.code
            .try_reserve_exact(new_capacity - len)
            .map_err(|_| ChunkError::AllocationFailure {
                requested: new_capacity,
            })?;

        self.capacity = new_capacity;
        self.growths += 1;
        self.copied += len;

        debug!(old_capacity, new_capacity, copied = len, "chunk grew");
        Ok(())
    }

    /// Byte at `index`, or `IndexOutOfRange` outside `[0, len)`.
    #[inline]
    pub fn read(&self, index: usize) -> Result<u8> {
        self.code
            .get(index)
            .copied()
            .ok_or_else(|| ChunkError::out_of_range(index, self.code.len()))
    }

    /// Byte at `base + offset`. Positions before the start of the chunk are
    /// rejected the same way as positions past its end.
    pub fn read_relative(&self, base: usize, offset: isize) -> Result<u8> {
        let len = self.code.len();
        let target = isize::try_from(base)
            .ok()
            .and_then(|base| base.checked_add(offset));

        match target {
            Some(index) if index >= 0 => self.read(index as usize),
            Some(index) => Err(ChunkError::IndexOutOfRange { index, len }),
            None => Err(ChunkError::IndexOutOfRange {
                index: if offset < 0 { isize::MIN } else { isize::MAX },
                len,
            }),
        }
    }

    /// Decodes the opcode stored at `index`.
    pub fn read_op(&self, index: usize) -> Result<OpCode> {
        OpCode::try_from(self.read(index)?)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of times storage has been reallocated.
    pub fn growth_count(&self) -> usize {
        self.growths
    }

    /// Total bytes moved into new storage across all growths.
    pub fn bytes_copied(&self) -> usize {
        self.copied
    }

    /// The written bytes. The borrow ends before the next write.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.code.iter().copied()
    }
}

impl Clone for Chunk {
    fn clone(&self) -> Self {
        let mut code = Vec::with_capacity(self.capacity);
        code.extend_from_slice(&self.code);
        Self {
            code,
            capacity: self.capacity,
            growths: self.growths,
            copied: self.copied,
        }
    }
}

/// Chunks are equal when they hold the same bytes, whatever their capacity.
impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Chunk {}

impl Extend<u8> for Chunk {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for byte in iter {
            self.write(byte);
        }
    }
}

impl FromIterator<u8> for Chunk {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut chunk = Chunk::new();
        chunk.extend(iter);
        chunk
    }
}
