//! Rational codec (component C2, spec §4.2).
//!
//! A rational is a signed numerator and unsigned denominator, written at
//! the same `term_size` in bytes — the minimum multiple of 8 that fits
//! both terms, unless an outer term size is supplied (used by the interval
//! codec, which picks the max term size across both endpoints).

use crate::binary::integers::{
    integer_size, min_bytes_signed, min_bytes_unsigned, read_signed_at_size, read_unsigned_at_size,
    write_signed_at_size, write_unsigned_at_size,
};
use crate::datatypes::RationalValue;
use std::io::{Read, Write};

/// The term size (bytes) required to hold both terms of `value`.
pub fn term_size_for(value: &RationalValue) -> usize {
    integer_size(min_bytes_signed(&value.numerator).max(min_bytes_unsigned(&value.denominator)))
}

/// Write `value`'s two terms at exactly `term_size` bytes each, with no
/// length prefix (the caller has already written or agreed on term_size).
pub fn write_rational_at_size<W: Write>(w: &mut W, value: &RationalValue, term_size: usize) -> anyhow::Result<()> {
    write_signed_at_size(w, &value.numerator, term_size)?;
    write_unsigned_at_size(w, &value.denominator, term_size)?;
    Ok(())
}

pub fn read_rational_at_size<R: Read>(r: &mut R, term_size: usize) -> anyhow::Result<RationalValue> {
    let numerator = read_signed_at_size(r, term_size)?;
    let denominator = read_unsigned_at_size(r, term_size)?;
    Ok(RationalValue::new(numerator, denominator))
}

/// Write a standalone rational, framed by a `uint16` term-size-in-bytes
/// prefix followed by the two equal-sized terms.
pub fn write_rational_framed<W: Write>(w: &mut W, value: &RationalValue) -> anyhow::Result<()> {
    let term_size = term_size_for(value);
    w.write_all(&(term_size as u16).to_le_bytes())?;
    write_rational_at_size(w, value, term_size)
}

pub fn read_rational_framed<R: Read>(r: &mut R) -> anyhow::Result<RationalValue> {
    let mut len_buf = [0u8; 2];
    r.read_exact(&mut len_buf)?;
    let term_size = u16::from_le_bytes(len_buf) as usize;
    read_rational_at_size(r, term_size)
}

#[cfg(test)]
mod test {
    use super::*;
    use num_bigint::{BigInt, BigUint};

    #[test]
    fn small_rational_roundtrip() {
        let v = RationalValue::new(BigInt::from(-7), BigUint::from(13u8));
        let mut buf = Vec::new();
        write_rational_framed(&mut buf, &v).unwrap();
        // uint16 prefix + 8 + 8 bytes (rounded up to the 8-byte multiple)
        assert_eq!(buf.len(), 2 + 8 + 8);
        let mut cursor = std::io::Cursor::new(buf);
        assert_eq!(read_rational_framed(&mut cursor).unwrap(), v);
    }

    #[test]
    fn large_denominator_needs_more_than_eight_bytes() {
        // 2^64 requires 9 bytes unsigned -> rounds up to a 16-byte term.
        let den = BigUint::from(2u8).pow(64);
        let v = RationalValue::new(BigInt::from(1), den);
        assert_eq!(term_size_for(&v), 16);
    }
}
