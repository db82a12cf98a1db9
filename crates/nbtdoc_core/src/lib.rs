//! Public library API for decoding Minecraft NBT (Named Binary Tag) data.

/// NBT decoding, tree model, search, and tag path helpers.
pub mod nbt;
