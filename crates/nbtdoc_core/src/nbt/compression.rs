use std::io::Read;

use tracing::debug;

use crate::nbt::{NbtError, Result};

/// Upper bound on inflated output accepted from any compressed stream.
pub const MAX_DECOMPRESSED_BYTES: usize = 512 * 1024 * 1024;
/// gzip member magic.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
/// zstd frame magic.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw uncompressed stream.
	None,
	/// gzip-wrapped stream, the usual encoding of `level.dat` and player files.
	Gzip,
	/// zlib-wrapped stream, as found in region file chunks.
	Zlib,
	/// zstd-compressed stream.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Gzip => "gzip",
			Self::Zlib => "zlib",
			Self::Zstd => "zstd",
		}
	}

	/// Classify a buffer by its leading magic bytes.
	pub fn detect(raw: &[u8]) -> Self {
		if raw.starts_with(&GZIP_MAGIC) {
			Self::Gzip
		} else if raw.starts_with(&ZSTD_MAGIC) {
			Self::Zstd
		} else if is_zlib_header(raw) {
			Self::Zlib
		} else {
			Self::None
		}
	}
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	let compression = Compression::detect(&raw);
	let out = match compression {
		Compression::None => raw,
		Compression::Gzip => inflate(flate2::read::GzDecoder::new(raw.as_slice()), compression)?,
		Compression::Zlib => inflate(flate2::read::ZlibDecoder::new(raw.as_slice()), compression)?,
		Compression::Zstd => {
			let decoder = zstd::stream::read::Decoder::new(raw.as_slice()).map_err(|source| decompress_error(compression, source))?;
			inflate(decoder, compression)?
		}
	};

	debug!(compression = compression.as_str(), bytes = out.len(), "decoded input buffer");
	Ok((compression, out))
}

fn inflate(mut reader: impl Read, compression: Compression) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = reader.read(&mut buf).map_err(|source| decompress_error(compression, source))?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(NbtError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}

fn decompress_error(compression: Compression, source: std::io::Error) -> NbtError {
	NbtError::Decompress {
		compression: compression.as_str(),
		source,
	}
}

/// RFC 1950 header: deflate method, window within 32 KiB, check bits valid.
fn is_zlib_header(raw: &[u8]) -> bool {
	match raw {
		[cmf, flg, ..] => cmf & 0x0F == 8 && cmf >> 4 <= 7 && (u16::from(*cmf) * 256 + u16::from(*flg)) % 31 == 0,
		_ => false,
	}
}
