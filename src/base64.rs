//! Strict RFC 4648 Base64 codec
//!
//! GHEV payloads are sometimes shipped Base64-encoded (for example in a cookie or a
//! query-string parameter). Decoding here is deliberately strict:
//!
//! - standard alphabet only (`A-Z a-z 0-9 + /`); URL-safe `-` and `_` are rejected
//! - input length must be a multiple of 4, i.e. padding with `=` is mandatory
//! - padding may only appear at the end of the final quantum
//! - whitespace is not stripped
//! - the unused trailing bits of a padded quantum must be zero
//!
//! Producers that emit unpadded or wrapped Base64 must normalize before calling in.

use thiserror::Error;

/// Base64 decoding failures, each carrying the offending input offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base64Error {
    #[error("invalid byte 0x{byte:02x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },

    #[error("length {len} is not a multiple of 4")]
    InvalidLength { len: usize },

    #[error("misplaced padding at offset {offset}")]
    InvalidPadding { offset: usize },

    #[error("non-zero trailing bits at offset {offset}")]
    NonCanonical { offset: usize },
}

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const INVALID: u8 = 0xFF;
const PAD: u8 = 64;

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 64 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table[b'=' as usize] = PAD;
    table
}

static DECODE: [u8; 256] = build_decode_table();

/// Decode padded standard Base64 into the exact byte sequence it encodes.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, Base64Error> {
    if input.len() % 4 != 0 {
        return Err(Base64Error::InvalidLength { len: input.len() });
    }

    let mut out = Vec::with_capacity(input.len() / 4 * 3);

    for (index, quad) in input.chunks_exact(4).enumerate() {
        let offset = index * 4;
        let mut sextets = [0u8; 4];
        for (i, &byte) in quad.iter().enumerate() {
            let v = DECODE[byte as usize];
            if v == INVALID {
                return Err(Base64Error::InvalidByte {
                    byte,
                    offset: offset + i,
                });
            }
            sextets[i] = v;
        }

        if sextets[0] == PAD {
            return Err(Base64Error::InvalidPadding { offset });
        }
        if sextets[1] == PAD {
            return Err(Base64Error::InvalidPadding { offset: offset + 1 });
        }

        let pad = match (sextets[2] == PAD, sextets[3] == PAD) {
            (false, false) => 0,
            (false, true) => 1,
            (true, true) => 2,
            (true, false) => return Err(Base64Error::InvalidPadding { offset: offset + 2 }),
        };

        // Padding is only legal in the final quantum.
        if pad > 0 && offset + 4 != input.len() {
            return Err(Base64Error::InvalidPadding {
                offset: offset + 4 - pad,
            });
        }

        let c = if pad < 2 { sextets[2] } else { 0 };
        let d = if pad < 1 { sextets[3] } else { 0 };
        let n = (u32::from(sextets[0]) << 18)
            | (u32::from(sextets[1]) << 12)
            | (u32::from(c) << 6)
            | u32::from(d);

        match pad {
            0 => out.extend_from_slice(&[(n >> 16) as u8, (n >> 8) as u8, n as u8]),
            1 => {
                if n & 0xFF != 0 {
                    return Err(Base64Error::NonCanonical { offset: offset + 2 });
                }
                out.extend_from_slice(&[(n >> 16) as u8, (n >> 8) as u8]);
            }
            _ => {
                if n & 0xFFFF != 0 {
                    return Err(Base64Error::NonCanonical { offset: offset + 1 });
                }
                out.push((n >> 16) as u8);
            }
        }
    }

    Ok(out)
}

/// Encode bytes as padded standard Base64.
pub fn encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);

    for chunk in input.chunks(3) {
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);
        let n = (u32::from(chunk[0]) << 16) | (u32::from(b1) << 8) | u32::from(b2);

        out.push(ALPHABET[(n >> 18) as usize & 63] as char);
        out.push(ALPHABET[(n >> 12) as usize & 63] as char);
        if chunk.len() > 1 {
            out.push(ALPHABET[(n >> 6) as usize & 63] as char);
        } else {
            out.push('=');
        }
        if chunk.len() > 2 {
            out.push(ALPHABET[n as usize & 63] as char);
        } else {
            out.push('=');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_padded() {
        assert_eq!(decode(b"SGVsbG8=").unwrap(), b"Hello");
        assert_eq!(decode(b"SGk=").unwrap(), b"Hi");
        assert_eq!(decode(b"SGV5").unwrap(), b"Hey");
        assert_eq!(decode(b"SA==").unwrap(), b"H");
        assert!(decode(b"").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_foreign_alphabet() {
        assert_eq!(
            decode(b"not-base64!!"),
            Err(Base64Error::InvalidByte {
                byte: b'-',
                offset: 3
            })
        );
        assert!(matches!(
            decode(b"ab_c"),
            Err(Base64Error::InvalidByte { byte: b'_', .. })
        ));
    }

    #[test]
    fn test_decode_rejects_whitespace() {
        assert_eq!(
            decode(b"SGVs bG8="),
            Err(Base64Error::InvalidLength { len: 9 })
        );
        assert_eq!(
            decode(b"SGVs\nbG8"),
            Err(Base64Error::InvalidByte {
                byte: b'\n',
                offset: 4
            })
        );
    }

    #[test]
    fn test_decode_rejects_unpadded() {
        assert_eq!(
            decode(b"SGVsbG8"),
            Err(Base64Error::InvalidLength { len: 7 })
        );
    }

    #[test]
    fn test_decode_rejects_misplaced_padding() {
        assert_eq!(
            decode(b"SG=a"),
            Err(Base64Error::InvalidPadding { offset: 2 })
        );
        assert_eq!(
            decode(b"SGVs=G8="),
            Err(Base64Error::InvalidPadding { offset: 4 })
        );
        assert_eq!(
            decode(b"SA==SGVs"),
            Err(Base64Error::InvalidPadding { offset: 2 })
        );
    }

    #[test]
    fn test_decode_rejects_trailing_bits() {
        assert_eq!(
            decode(b"SGVsbG9="),
            Err(Base64Error::NonCanonical { offset: 6 })
        );
        assert_eq!(decode(b"SB=="), Err(Base64Error::NonCanonical { offset: 1 }));
    }

    #[test]
    fn test_encode_matches_rfc_vectors() {
        // RFC 4648 section 10
        let vectors: [(&str, &str); 7] = [
            ("", ""),
            ("f", "Zg=="),
            ("fo", "Zm8="),
            ("foo", "Zm9v"),
            ("foob", "Zm9vYg=="),
            ("fooba", "Zm9vYmE="),
            ("foobar", "Zm9vYmFy"),
        ];
        for (plain, encoded) in vectors {
            assert_eq!(encode(plain.as_bytes()), encoded);
            assert_eq!(decode(encoded.as_bytes()).unwrap(), plain.as_bytes());
        }
    }

    #[test]
    fn test_binary_bytes_survive() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        assert_eq!(decode(encode(&bytes).as_bytes()).unwrap(), bytes);
    }
}
