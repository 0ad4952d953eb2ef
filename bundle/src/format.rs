//! Byte layout of a bundle file.
//!
//! ```text
//! +--------------------+
//! | magic (8 bytes)    |  "SCOREBDL"
//! +--------------------+
//! | version (4 bytes)  |  u32 big-endian
//! +--------------------+
//! | length (8 bytes)   |  u64 big-endian, payload size
//! +--------------------+
//! | payload            |  JSON document
//! +--------------------+
//! ```

use crate::error::{BundleError, Result};

/// Identifies score bundle files.
pub const MAGIC: &[u8; 8] = b"SCOREBDL";

/// Version of the byte layout and payload document written by this build.
pub const FORMAT_VERSION: u32 = 1;

type Header = u32;
type LenType = u64;

const HEADER_SIZE: usize = size_of::<Header>();
const LEN_TYPE_SIZE: usize = size_of::<LenType>();

/// Size of everything that precedes the payload.
pub const PREAMBLE_SIZE: usize = MAGIC.len() + HEADER_SIZE + LEN_TYPE_SIZE;

/// Frames `payload` and appends it to `buf`.
pub fn encode(payload: &[u8], buf: &mut Vec<u8>) {
    buf.reserve(PREAMBLE_SIZE + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
    buf.extend_from_slice(&(payload.len() as LenType).to_be_bytes());
    buf.extend_from_slice(payload);
}

/// Validates the framing of `bytes` and returns the payload it carries.
///
/// # Errors
/// Returns a `BundleError` if the data is shorter than it claims, does not start
/// with the magic bytes, has an unsupported version or carries extra bytes.
pub fn decode(bytes: &[u8]) -> Result<&[u8]> {
    if bytes.len() < MAGIC.len() {
        return Err(truncated(PREAMBLE_SIZE, bytes.len()));
    }

    let (magic, rest) = bytes.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(BundleError::BadMagic);
    }

    let (Some(version), Some(len)) = (
        rest.first_chunk::<HEADER_SIZE>(),
        rest.get(HEADER_SIZE..)
            .and_then(|r| r.first_chunk::<LEN_TYPE_SIZE>()),
    ) else {
        return Err(truncated(PREAMBLE_SIZE, bytes.len()));
    };

    let version = Header::from_be_bytes(*version);
    if version != FORMAT_VERSION {
        return Err(BundleError::UnsupportedVersion {
            found: version,
            supported: FORMAT_VERSION,
        });
    }

    let payload = &bytes[PREAMBLE_SIZE..];
    let expected = usize::try_from(LenType::from_be_bytes(*len)).unwrap_or(usize::MAX);

    if payload.len() < expected {
        return Err(truncated(
            PREAMBLE_SIZE.saturating_add(expected),
            bytes.len(),
        ));
    }

    if payload.len() > expected {
        return Err(BundleError::TrailingBytes {
            extra: payload.len() - expected,
        });
    }

    Ok(payload)
}

fn truncated(expected: usize, got: usize) -> BundleError {
    BundleError::Truncated { expected, got }
}
