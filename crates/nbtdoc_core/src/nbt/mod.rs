/// Bounds-checked big-endian readers.
pub mod bytes;
mod compound;
mod compression;
mod decode;
mod error;
mod file;
mod path;
mod search;
mod tag;
mod value;

/// Growable compound child storage and its starting capacity.
pub use compound::{Compound, INITIAL_CAPACITY};
/// Compression detection result and size limit.
pub use compression::{Compression, MAX_DECOMPRESSED_BYTES};
/// Decoder entry points, options, and progress observer.
pub use decode::{DecodeObserver, DecodeOptions, decode, decode_with_observer};
/// Error and result aliases.
pub use error::{ErrorKind, NbtError, Result};
/// File abstraction and decompressing reader.
pub use file::{NbtFile, read_decompressed};
/// Tag path parser types.
pub use path::{PathStep, Resolved, TagPath};
/// Name search over decoded trees.
pub use search::{find_all, find_tag, find_tag_mut};
/// Wire tag type identifiers.
pub use tag::TagType;
/// Decoded tree node types.
pub use value::{ListValue, NbtString, Tag, TagMut, Value};
