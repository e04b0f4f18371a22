//! Fixed-width binary frame for identifiers.
//!
//! Every frame is exactly [`FRAME_LEN`] bytes, whether or not the identifier
//! is null, so records holding identifiers keep a fixed size.
//!
//! ```text
//! +------+----------------------------------+
//! | flag | payload (33 bytes)               |
//! +------+----------------------------------+
//!   0x00   all zero                          null
//!   code   length byte || 32 digest bytes    sha2-256 / blake3 digest
//! ```
//!
//! The flag byte is the digest's algorithm code, which is never zero for a
//! framable digest.

use std::io::{ErrorKind, Read, Write};

use crate::error::{CoreError, Result};
use crate::identifier::Identifier;

/// Size of an identifier frame in bytes.
pub const FRAME_LEN: usize = 34;

/// Flag byte marking a null identifier.
const NULL_FLAG: u8 = 0x00;

impl Identifier {
    /// Encode into a fixed-width frame.
    ///
    /// Fails with [`CoreError::UnframeableDigest`] for digests whose encoding is
    /// not exactly [`FRAME_LEN`] bytes.
    pub fn to_frame(&self) -> Result<[u8; FRAME_LEN]> {
        let mut frame = [0u8; FRAME_LEN];
        if self.is_null() {
            return Ok(frame);
        }

        let bytes = self.as_bytes();
        if bytes.len() != FRAME_LEN || bytes[0] == NULL_FLAG {
            return Err(CoreError::UnframeableDigest(bytes.len()));
        }
        frame.copy_from_slice(bytes);
        Ok(frame)
    }

    /// Decode from the start of `bytes`. Trailing bytes are ignored.
    pub fn from_frame(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < FRAME_LEN {
            return Err(CoreError::TruncatedFrame {
                expected: FRAME_LEN,
                actual: bytes.len(),
            });
        }

        let frame = &bytes[..FRAME_LEN];
        if frame[0] == NULL_FLAG {
            return Ok(Self::null());
        }
        Self::from_bytes(frame)
    }

    /// Write the frame to a stream.
    pub fn marshal<W: Write>(&self, writer: &mut W) -> Result<()> {
        let frame = self.to_frame()?;
        writer.write_all(&frame)?;
        Ok(())
    }

    /// Read one frame from a stream.
    pub fn unmarshal<R: Read>(reader: &mut R) -> Result<Self> {
        let mut frame = [0u8; FRAME_LEN];
        let mut filled = 0;

        while filled < FRAME_LEN {
            match reader.read(&mut frame[filled..]) {
                Ok(0) => {
                    return Err(CoreError::TruncatedFrame {
                        expected: FRAME_LEN,
                        actual: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Self::from_frame(&frame)
    }
}
