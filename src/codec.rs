//! Archive framing.
//!
//! ```text
//! offset  size  field
//!      0     4  magic "ASTA"
//!      4     2  format version, u16 LE
//!      6     8  payload length, u64 LE
//!     14    32  SHA-256 of the payload
//!     46     n  bincode payload (`Bundle`)
//! ```

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::archive::Bundle;

pub const MAGIC: [u8; 4] = *b"ASTA";
pub const FORMAT_VERSION: u16 = 1;
pub const HEADER_LEN: usize = 46;

const VERSION_AT: usize = 4;
const LENGTH_AT: usize = 6;
const DIGEST_AT: usize = 14;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot serialize bundle: {0}")]
    Serialize(#[source] bincode::Error),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("archive truncated: need {needed} bytes, have {got}")]
    Truncated { needed: usize, got: usize },
    #[error("not an archive (magic {0:02x?})")]
    BadMagic([u8; 4]),
    #[error("unsupported archive version {0}")]
    UnsupportedVersion(u16),
    #[error("payload checksum mismatch")]
    ChecksumMismatch,
    #[error("{0} unexpected bytes after the payload")]
    TrailingBytes(usize),
    #[error("malformed payload: {0}")]
    Malformed(#[source] bincode::Error),
}

/// Fixed-size prefix of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub payload_len: u64,
    pub checksum: [u8; 32],
}

fn array<const N: usize>(bytes: &[u8], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[at..at + N]);
    out
}

pub fn encode(bundle: &Bundle) -> Result<Vec<u8>, EncodeError> {
    let payload = bincode::serialize(bundle).map_err(EncodeError::Serialize)?;
    let digest = Sha256::digest(&payload);

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(&digest);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Validates magic and version and reads the rest of the header.
pub fn read_header(bytes: &[u8]) -> Result<Header, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::Truncated {
            needed: HEADER_LEN,
            got: bytes.len(),
        });
    }
    let magic: [u8; 4] = array(bytes, 0);
    if magic != MAGIC {
        return Err(DecodeError::BadMagic(magic));
    }
    let version = u16::from_le_bytes(array(bytes, VERSION_AT));
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    Ok(Header {
        version,
        payload_len: u64::from_le_bytes(array(bytes, LENGTH_AT)),
        checksum: array(bytes, DIGEST_AT),
    })
}

pub fn decode(bytes: &[u8]) -> Result<Bundle, DecodeError> {
    let header = read_header(bytes)?;
    let body = &bytes[HEADER_LEN..];
    let len = usize::try_from(header.payload_len).map_err(|_| DecodeError::Truncated {
        needed: usize::MAX,
        got: bytes.len(),
    })?;
    if body.len() < len {
        return Err(DecodeError::Truncated {
            needed: HEADER_LEN.saturating_add(len),
            got: bytes.len(),
        });
    }
    if body.len() > len {
        return Err(DecodeError::TrailingBytes(body.len() - len));
    }
    if Sha256::digest(body).as_slice() != header.checksum {
        return Err(DecodeError::ChecksumMismatch);
    }
    bincode::deserialize(body).map_err(DecodeError::Malformed)
}
