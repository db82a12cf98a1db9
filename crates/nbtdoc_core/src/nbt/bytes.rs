use crate::nbt::{NbtError, Result};

/// Borrow exactly `n` bytes at `*pos` and advance the position.
///
/// The position is left untouched when fewer than `n` bytes remain.
pub fn read_bytes<'a>(bytes: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8]> {
	let rem = bytes.len().saturating_sub(*pos);
	if n > rem || *pos > bytes.len() {
		return Err(NbtError::OutOfBounds { at: *pos, need: n, rem });
	}

	let start = *pos;
	*pos += n;
	Ok(&bytes[start..*pos])
}

fn read_array<const N: usize>(bytes: &[u8], pos: &mut usize) -> Result<[u8; N]> {
	let raw = read_bytes(bytes, pos, N)?;
	let mut out = [0_u8; N];
	out.copy_from_slice(raw);
	Ok(out)
}

/// Read one unsigned byte.
pub fn read_u8(bytes: &[u8], pos: &mut usize) -> Result<u8> {
	Ok(read_array::<1>(bytes, pos)?[0])
}

/// Read one signed byte.
pub fn read_i8(bytes: &[u8], pos: &mut usize) -> Result<i8> {
	Ok(i8::from_be_bytes(read_array(bytes, pos)?))
}

/// Read a big-endian `u16`.
pub fn read_u16_be(bytes: &[u8], pos: &mut usize) -> Result<u16> {
	Ok(u16::from_be_bytes(read_array(bytes, pos)?))
}

/// Read a big-endian `i16`.
pub fn read_i16_be(bytes: &[u8], pos: &mut usize) -> Result<i16> {
	Ok(i16::from_be_bytes(read_array(bytes, pos)?))
}

/// Read a big-endian `i32`.
pub fn read_i32_be(bytes: &[u8], pos: &mut usize) -> Result<i32> {
	Ok(i32::from_be_bytes(read_array(bytes, pos)?))
}

/// Read a big-endian `i64`.
pub fn read_i64_be(bytes: &[u8], pos: &mut usize) -> Result<i64> {
	Ok(i64::from_be_bytes(read_array(bytes, pos)?))
}

/// Read four big-endian bytes as an IEEE-754 binary32 bit pattern.
pub fn read_f32_be(bytes: &[u8], pos: &mut usize) -> Result<f32> {
	Ok(f32::from_bits(u32::from_be_bytes(read_array(bytes, pos)?)))
}

/// Read eight big-endian bytes as an IEEE-754 binary64 bit pattern.
pub fn read_f64_be(bytes: &[u8], pos: &mut usize) -> Result<f64> {
	Ok(f64::from_bits(u64::from_be_bytes(read_array(bytes, pos)?)))
}

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Whether every byte has been consumed.
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Return the next byte without consuming it.
	pub fn peek_u8(&self) -> Option<u8> {
		self.bytes.get(self.pos).copied()
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		read_bytes(self.bytes, &mut self.pos, n)
	}

	/// Read one unsigned byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		read_u8(self.bytes, &mut self.pos)
	}

	/// Read one signed byte.
	pub fn read_i8(&mut self) -> Result<i8> {
		read_i8(self.bytes, &mut self.pos)
	}

	/// Read a big-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16> {
		read_u16_be(self.bytes, &mut self.pos)
	}

	/// Read a big-endian `i16`.
	pub fn read_i16(&mut self) -> Result<i16> {
		read_i16_be(self.bytes, &mut self.pos)
	}

	/// Read a big-endian `i32`.
	pub fn read_i32(&mut self) -> Result<i32> {
		read_i32_be(self.bytes, &mut self.pos)
	}

	/// Read a big-endian `i64`.
	pub fn read_i64(&mut self) -> Result<i64> {
		read_i64_be(self.bytes, &mut self.pos)
	}

	/// Read a big-endian `f32`.
	pub fn read_f32(&mut self) -> Result<f32> {
		read_f32_be(self.bytes, &mut self.pos)
	}

	/// Read a big-endian `f64`.
	pub fn read_f64(&mut self) -> Result<f64> {
		read_f64_be(self.bytes, &mut self.pos)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_big_endian_integers() {
		let buf = [0x01, 0x02, 0xff, 0xfe, 0x00, 0x00, 0x01, 0x00];
		let mut pos = 0;
		assert_eq!(read_u16_be(&buf, &mut pos).expect("u16"), 0x0102);
		assert_eq!(read_i16_be(&buf, &mut pos).expect("i16"), -2);
		assert_eq!(read_i32_be(&buf, &mut pos).expect("i32"), 256);
		assert_eq!(pos, 8);
	}

	#[test]
	fn reads_i64_and_signed_byte() {
		let buf = [0x80, 0, 0, 0, 0, 0, 0, 1, 0xff];
		let mut pos = 0;
		assert_eq!(read_i64_be(&buf, &mut pos).expect("i64"), i64::MIN + 1);
		assert_eq!(read_i8(&buf, &mut pos).expect("i8"), -1);
	}

	#[test]
	fn reinterprets_float_bits() {
		let mut buf = Vec::new();
		buf.extend_from_slice(&1.5_f32.to_bits().to_be_bytes());
		buf.extend_from_slice(&(-0.25_f64).to_bits().to_be_bytes());
		let mut cursor = Cursor::new(&buf);
		assert_eq!(cursor.read_f32().expect("f32"), 1.5);
		assert_eq!(cursor.read_f64().expect("f64"), -0.25);
		assert!(cursor.is_empty());
	}

	#[test]
	fn short_read_reports_position_and_width() {
		let buf = [0x00, 0x01, 0x02];
		let mut pos = 1;
		let err = read_i32_be(&buf, &mut pos).expect_err("should run past end");
		assert!(matches!(err, NbtError::OutOfBounds { at: 1, need: 4, rem: 2 }));
		assert_eq!(pos, 1, "position must not advance on failure");
	}

	#[test]
	fn position_past_end_is_out_of_bounds() {
		let buf = [0x00];
		let mut pos = 5;
		let err = read_u8(&buf, &mut pos).expect_err("position beyond buffer");
		assert!(matches!(err, NbtError::OutOfBounds { at: 5, need: 1, rem: 0 }));
	}

	#[test]
	fn huge_length_does_not_overflow() {
		let buf = [0_u8; 4];
		let mut pos = 2;
		let err = read_bytes(&buf, &mut pos, usize::MAX).expect_err("huge read");
		assert!(matches!(err, NbtError::OutOfBounds { at: 2, rem: 2, .. }));
	}

	#[test]
	fn peek_does_not_consume() {
		let buf = [0x0a, 0x00];
		let mut cursor = Cursor::new(&buf);
		assert_eq!(cursor.peek_u8(), Some(0x0a));
		assert_eq!(cursor.read_u8().expect("u8"), 0x0a);
		assert_eq!(cursor.pos(), 1);
		assert_eq!(cursor.remaining(), 1);
	}
}
