//! Serialized form of a chunk.
//!
//! An image is the postcard encoding of a small header (magic bytes and a
//! format version) followed by the chunk's bytes. Loading replays the bytes
//! through the normal write path, so a loaded chunk's capacity follows the
//! same growth policy as one built by a compiler.

use crate::bytecode::chunk::Chunk;
use crate::bytecode::error::{ChunkError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Magic bytes at the start of every chunk image
pub const IMAGE_MAGIC: [u8; 8] = *b"LOXVMBC\0";

/// Chunk image format version
pub const IMAGE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ChunkImage<'a> {
    magic: [u8; 8],
    version: u32,
    code: &'a [u8],
}

impl Chunk {
    /// Encodes this chunk as an image.
    pub fn to_image(&self) -> Result<Vec<u8>> {
        let image = ChunkImage {
            magic: IMAGE_MAGIC,
            version: IMAGE_VERSION,
            code: self.as_bytes(),
        };
        Ok(postcard::to_allocvec(&image)?)
    }

    /// Decodes a chunk from an image produced by [`Chunk::to_image`].
    pub fn from_image(bytes: &[u8]) -> Result<Chunk> {
        let (image, rest): (ChunkImage<'_>, &[u8]) = postcard::take_from_bytes(bytes)?;

        if !rest.is_empty() {
            return Err(ChunkError::TrailingBytes { count: rest.len() });
        }

        if image.magic != IMAGE_MAGIC {
            return Err(ChunkError::InvalidMagic);
        }
        if image.version != IMAGE_VERSION {
            return Err(ChunkError::UnsupportedVersion(image.version));
        }

        let mut chunk = Chunk::new();
        for byte in image.code {
            chunk.try_write(*byte)?;
        }

        debug!(len = chunk.len(), capacity = chunk.capacity(), "loaded chunk image");
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::OpCode;

    fn encode(magic: [u8; 8], version: u32, code: &[u8]) -> Vec<u8> {
        postcard::to_allocvec(&ChunkImage {
            magic,
            version,
            code,
        })
        .unwrap()
    }

    #[test]
    fn test_image_preserves_bytes() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Return);
        chunk.extend([7u8, 0, 255, 1, 2, 3, 4, 5]);

        let loaded = Chunk::from_image(&chunk.to_image().unwrap()).unwrap();
        assert_eq!(loaded, chunk);
        assert_eq!(loaded.capacity(), 16);
    }

    #[test]
    fn test_empty_chunk_image() {
        let loaded = Chunk::from_image(&Chunk::new().to_image().unwrap()).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.capacity(), 0);
    }

    #[test]
    fn test_image_starts_with_magic() {
        let image = Chunk::new().to_image().unwrap();
        assert_eq!(&image[..8], &IMAGE_MAGIC);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let image = encode(*b"NOTLOX\0\0", IMAGE_VERSION, &[0]);
        assert!(matches!(
            Chunk::from_image(&image),
            Err(ChunkError::InvalidMagic)
        ));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let image = encode(IMAGE_MAGIC, 2, &[0]);
        assert!(matches!(
            Chunk::from_image(&image),
            Err(ChunkError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_truncated_image_rejected() {
        assert!(matches!(Chunk::from_image(&[]), Err(ChunkError::Image(_))));

        let image = Chunk::from_iter([0u8; 4]).to_image().unwrap();
        assert!(matches!(
            Chunk::from_image(&image[..image.len() - 1]),
            Err(ChunkError::Image(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut image = Chunk::from_iter([0u8]).to_image().unwrap();
        image.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

        assert!(matches!(
            Chunk::from_image(&image),
            Err(ChunkError::TrailingBytes { count: 4 })
        ));
    }
}
