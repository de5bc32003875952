//! Interval codec (component C2, spec §4.2).
//!
//! Both endpoints are written at the same per-endpoint size: 8 bytes each
//! for a double interval, and the larger of the two ends' term sizes for a
//! rational interval (prefixed once by a `uint16` term size, mirroring the
//! standalone rational framing).

use crate::binary::floats::{read_double, write_double};
use crate::binary::rationals::{read_rational_at_size, term_size_for, write_rational_at_size};
use crate::datatypes::{Interval, RationalValue};
use std::io::{Read, Write};

pub fn write_double_interval<W: Write>(w: &mut W, iv: &Interval<f64>) -> anyhow::Result<()> {
    write_double(w, *iv.left())?;
    write_double(w, *iv.right())?;
    Ok(())
}

pub fn read_double_interval<R: Read>(r: &mut R) -> anyhow::Result<Interval<f64>> {
    let left = read_double(r)?;
    let right = read_double(r)?;
    Interval::new(left, right)
}

pub fn write_rational_interval<W: Write>(w: &mut W, iv: &Interval<RationalValue>) -> anyhow::Result<()> {
    let term_size = term_size_for(iv.left()).max(term_size_for(iv.right()));
    w.write_all(&(term_size as u16).to_le_bytes())?;
    write_rational_at_size(w, iv.left(), term_size)?;
    write_rational_at_size(w, iv.right(), term_size)?;
    Ok(())
}

pub fn read_rational_interval<R: Read>(r: &mut R) -> anyhow::Result<Interval<RationalValue>> {
    let mut len_buf = [0u8; 2];
    r.read_exact(&mut len_buf)?;
    let term_size = u16::from_le_bytes(len_buf) as usize;
    let left = read_rational_at_size(r, term_size)?;
    let right = read_rational_at_size(r, term_size)?;
    Interval::new(left, right)
}

#[cfg(test)]
mod test {
    use super::*;
    use num_bigint::{BigInt, BigUint};

    #[test]
    fn double_interval_roundtrip() {
        let iv = Interval::new(1.0, 2.5).unwrap();
        let mut buf = Vec::new();
        write_double_interval(&mut buf, &iv).unwrap();
        assert_eq!(buf.len(), 16);
        let mut cursor = std::io::Cursor::new(buf);
        assert_eq!(read_double_interval(&mut cursor).unwrap(), iv);
    }

    #[test]
    fn rational_interval_pads_smaller_endpoint_to_larger_term_size() {
        let small = RationalValue::new(BigInt::from(1), BigUint::from(2u8));
        let large = RationalValue::new(BigInt::from(1), BigUint::from(2u8).pow(64));
        let iv = Interval::new(small, large).unwrap();
        let mut buf = Vec::new();
        write_rational_interval(&mut buf, &iv).unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        assert_eq!(read_rational_interval(&mut cursor).unwrap(), iv);
    }

    #[test]
    fn degenerate_interval_allowed() {
        assert!(Interval::new(3.0, 3.0).is_ok());
    }
}
