//! Pure functions wrapping the fixed set of compression algorithms the store
//! supports. Each [`CompKind`] maps to a [`Codec`]; `None` is the identity codec.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// The fixed set of compression algorithms the engine knows about.
///
/// Persisted in [`crate::schema::ColumnDef`] and [`crate::schema::GroupDef`],
/// so the variant order here is part of the wire format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompKind {
    None,
    Zlib,
    Gzip,
    Zstd,
    Bz2,
}

/// A compression codec: compresses and decompresses whole buffers.
///
/// Level semantics follow the wrapped algorithm's own convention; the engine
/// does not reinterpret them.
pub trait Codec: std::fmt::Debug {
    fn compress(&self, input: &[u8], level: i32) -> Result<Vec<u8>>;
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Returns the codec implementing `kind`.
pub fn create_codec(kind: CompKind) -> Result<Box<dyn Codec>> {
    match kind {
        CompKind::None => Ok(Box::new(NoneCodec)),
        #[cfg(feature = "zlib")]
        CompKind::Zlib => Ok(Box::new(zlib_codec::ZlibCodec)),
        #[cfg(not(feature = "zlib"))]
        CompKind::Zlib => Err(StoreError::UnknownComp("zlib (feature disabled)".into())),
        #[cfg(feature = "gzip")]
        CompKind::Gzip => Ok(Box::new(gzip_codec::GzipCodec)),
        #[cfg(not(feature = "gzip"))]
        CompKind::Gzip => Err(StoreError::UnknownComp("gzip (feature disabled)".into())),
        #[cfg(feature = "zstd")]
        CompKind::Zstd => Ok(Box::new(zstd_codec::ZstdCodec)),
        #[cfg(not(feature = "zstd"))]
        CompKind::Zstd => Err(StoreError::UnknownComp("zstd (feature disabled)".into())),
        #[cfg(feature = "bz2")]
        CompKind::Bz2 => Ok(Box::new(bz2_codec::Bz2Codec)),
        #[cfg(not(feature = "bz2"))]
        CompKind::Bz2 => Err(StoreError::UnknownComp("bz2 (feature disabled)".into())),
    }
}

/// Codec for `CompKind::None`. Identity in both directions.
#[derive(Debug)]
struct NoneCodec;

impl Codec for NoneCodec {
    fn compress(&self, input: &[u8], _level: i32) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }
}

#[cfg(feature = "zlib")]
mod zlib_codec {
    use std::io::{Read, Write};

    use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

    use super::Codec;
    use crate::error::{Result, StoreError};

    #[derive(Debug)]
    pub(super) struct ZlibCodec;

    impl Codec for ZlibCodec {
        fn compress(&self, input: &[u8], level: i32) -> Result<Vec<u8>> {
            let level = level.clamp(0, 9) as u32;
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
            encoder
                .write_all(input)
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))?;
            encoder
                .finish()
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))
        }

        fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
            let mut decoder = ZlibDecoder::new(input);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))?;
            Ok(out)
        }
    }
}

#[cfg(feature = "gzip")]
mod gzip_codec {
    use std::io::{Read, Write};

    use flate2::{read::GzDecoder, write::GzEncoder, Compression};

    use super::Codec;
    use crate::error::{Result, StoreError};

    #[derive(Debug)]
    pub(super) struct GzipCodec;

    impl Codec for GzipCodec {
        fn compress(&self, input: &[u8], level: i32) -> Result<Vec<u8>> {
            let level = level.clamp(0, 9) as u32;
            let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
            encoder
                .write_all(input)
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))?;
            encoder
                .finish()
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))
        }

        fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
            let mut decoder = GzDecoder::new(input);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))?;
            Ok(out)
        }
    }
}

#[cfg(feature = "zstd")]
mod zstd_codec {
    use std::io::{Read, Write};

    use super::Codec;
    use crate::error::{Result, StoreError};

    #[derive(Debug)]
    pub(super) struct ZstdCodec;

    impl Codec for ZstdCodec {
        fn compress(&self, input: &[u8], level: i32) -> Result<Vec<u8>> {
            let mut encoder = zstd::Encoder::new(Vec::new(), level)
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))?;
            encoder
                .write_all(input)
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))?;
            encoder
                .finish()
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))
        }

        fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
            let mut decoder =
                zstd::Decoder::new(input).map_err(|e| StoreError::DecompressFailed(e.to_string()))?;
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))?;
            Ok(out)
        }
    }
}

#[cfg(feature = "bz2")]
mod bz2_codec {
    use std::io::{Read, Write};

    use bzip2::{read::BzDecoder, write::BzEncoder, Compression};

    use super::Codec;
    use crate::error::{Result, StoreError};

    #[derive(Debug)]
    pub(super) struct Bz2Codec;

    impl Codec for Bz2Codec {
        fn compress(&self, input: &[u8], level: i32) -> Result<Vec<u8>> {
            let level = level.clamp(1, 9) as u32;
            let mut encoder = BzEncoder::new(Vec::new(), Compression::new(level));
            encoder
                .write_all(input)
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))?;
            encoder
                .finish()
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))
        }

        fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
            let mut decoder = BzDecoder::new(input);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| StoreError::DecompressFailed(e.to_string()))?;
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_roundtrip(kind: CompKind, level: i32, data: &[u8]) {
        let codec = create_codec(kind).unwrap();
        let compressed = codec.compress(data, level).unwrap();
        let decompressed = codec.decompress(&compressed).unwrap();
        assert_eq!(data, decompressed.as_slice());
    }

    fn test_codec(kind: CompKind, level: i32) {
        for size in [0usize, 100, 10_000] {
            let data = (0..size).map(|x| (x % 251) as u8).collect::<Vec<_>>();
            test_roundtrip(kind, level, &data);
        }
    }

    #[test]
    fn test_codec_none() {
        test_codec(CompKind::None, 0);
    }

    #[test]
    #[cfg(feature = "zlib")]
    fn test_codec_zlib() {
        test_codec(CompKind::Zlib, 6);
    }

    #[test]
    #[cfg(feature = "gzip")]
    fn test_codec_gzip() {
        test_codec(CompKind::Gzip, 6);
    }

    #[test]
    #[cfg(feature = "zstd")]
    fn test_codec_zstd() {
        test_codec(CompKind::Zstd, 3);
    }

    #[test]
    #[cfg(feature = "bz2")]
    fn test_codec_bz2() {
        test_codec(CompKind::Bz2, 6);
    }
}
