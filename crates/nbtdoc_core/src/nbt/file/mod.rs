use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use tracing::debug;

use crate::nbt::compression::decode_bytes;
use crate::nbt::{Compression, DecodeOptions, NbtError, Result, Tag, decode};

/// Read a file from disk and inflate it according to its leading magic.
pub fn read_decompressed(path: impl AsRef<Path>) -> Result<(Compression, Vec<u8>)> {
	let path = path.as_ref();
	let raw = fs::read(path).map_err(|err| match err.kind() {
		IoErrorKind::NotFound => NbtError::FileNotFound { path: path.to_path_buf() },
		_ => NbtError::Io(err),
	})?;

	debug!(path = %path.display(), bytes = raw.len(), "read nbt file");
	decode_bytes(raw)
}

/// Opened NBT file holding its decompressed bytes.
pub struct NbtFile {
	/// Compression mode detected for source bytes.
	pub compression: Compression,
	bytes: Vec<u8>,
}

impl NbtFile {
	/// Read and decompress an NBT file from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let (compression, bytes) = read_decompressed(path)?;
		Ok(Self { compression, bytes })
	}

	/// Wrap an in-memory buffer, detecting compression the same way as [`NbtFile::open`].
	pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
		let (compression, bytes) = decode_bytes(raw)?;
		Ok(Self { compression, bytes })
	}

	/// Return decompressed bytes backing this file.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Decode the root compound.
	pub fn decode(&self, options: &DecodeOptions) -> Result<Tag> {
		decode(&self.bytes, options)
	}
}
