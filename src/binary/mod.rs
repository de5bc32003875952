//! Binary codecs (components C2–C4): scalar encodings, the struct bit
//! packer, and the vector-to-bytes layer.
//!
//! `UmbRead`/`UmbWrite` are extension traits blanket-implemented over
//! `Read`/`Write`, grounded on the teacher's `IdaGenericUnpack`/
//! `IdaGenericBufUnpack` traits in `ida_reader.rs`: primitive reads plus
//! higher-level `unpack_*`-style helpers layered on top of a plain
//! `Read`/`Write` bound, so any stream (a file, a `Cursor<Vec<u8>>`, a
//! length-bounded `Take<R>`) gets the same decoding vocabulary for free.

pub mod booleans;
pub mod floats;
pub mod integers;
pub mod intervals;
pub mod rationals;
pub mod strings;
pub mod structs;
pub mod vectors;

use crate::datatypes::{CommonType, Interval, RationalValue};
use num_bigint::BigUint;
use std::io::{Read, Write};

/// A private MSB-first bit accumulator used to pack struct fields that are
/// not byte-aligned (component C3). Each field's bits are pushed in
/// declaration order; whenever 8 bits are buffered they are drained as the
/// next output byte. Constructed fresh for each struct instance — it is
/// never shared across elements of a vector of structs.
#[derive(Debug, Default)]
pub struct BitBuffer {
    bits: std::collections::VecDeque<bool>,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Push an unsigned value's low `nbits` bits, most-significant bit
    /// first, onto the buffer.
    pub fn push_uint(&mut self, value: &BigUint, nbits: u32) {
        for i in (0..nbits as u64).rev() {
            self.bits.push_back(value.bit(i));
        }
    }

    pub fn push_bool(&mut self, value: bool, nbits: u32) {
        self.push_uint(&BigUint::from(value as u8), nbits);
    }

    /// Drain every complete byte currently buffered into `out`.
    pub fn drain_full_bytes(&mut self, out: &mut Vec<u8>) {
        while self.bits.len() >= 8 {
            let mut byte = 0u8;
            for i in 0..8u8 {
                if self.bits.pop_front().unwrap() {
                    byte |= 1 << i;
                }
            }
            out.push(byte);
        }
    }

    /// Ensure at least `nbits` bits are buffered, pulling whole bytes from
    /// `r` as needed, then pop and return the first `nbits` (MSB-first).
    pub fn pull_bits<R: Read>(&mut self, r: &mut R, nbits: usize) -> anyhow::Result<Vec<bool>> {
        while self.bits.len() < nbits {
            let mut byte = [0u8; 1];
            r.read_exact(&mut byte)?;
            for i in 0..8u8 {
                self.bits.push_back(byte[0] & (1 << i) != 0);
            }
        }
        Ok((0..nbits).map(|_| self.bits.pop_front().unwrap()).collect())
    }

    pub fn pull_uint<R: Read>(&mut self, r: &mut R, nbits: u32) -> anyhow::Result<BigUint> {
        let bits = self.pull_bits(r, nbits as usize)?;
        let mut value = BigUint::from(0u8);
        for b in bits {
            value <<= 1u32;
            if b {
                value |= BigUint::from(1u8);
            }
        }
        Ok(value)
    }
}

/// Extension trait providing the scalar decoding vocabulary over any
/// `Read` stream.
pub trait UmbRead: Read {
    fn read_bool_vec_bytes(&mut self, n_bytes: usize) -> anyhow::Result<Vec<bool>> {
        let mut buf = vec![0u8; n_bytes];
        self.read_exact(&mut buf)?;
        Ok(booleans::read_bool_vec(&buf))
    }

    fn read_fixed_int(&mut self, ty: CommonType) -> anyhow::Result<num_bigint::BigInt> {
        integers::read_fixed_int(self, ty)
    }

    fn read_double(&mut self) -> anyhow::Result<f64> {
        floats::read_double(self)
    }

    fn read_rational_framed(&mut self) -> anyhow::Result<RationalValue> {
        rationals::read_rational_framed(self)
    }

    fn read_double_interval(&mut self) -> anyhow::Result<Interval<f64>> {
        intervals::read_double_interval(self)
    }

    fn read_rational_interval(&mut self) -> anyhow::Result<Interval<RationalValue>> {
        intervals::read_rational_interval(self)
    }

    fn read_string_framed(&mut self) -> anyhow::Result<String> {
        strings::read_string_framed(self)
    }

    fn read_json_framed(&mut self) -> anyhow::Result<serde_json::Value> {
        strings::read_json_framed(self)
    }
}

impl<R: Read + ?Sized> UmbRead for R {}

/// Extension trait providing the scalar encoding vocabulary over any
/// `Write` stream.
pub trait UmbWrite: Write {
    fn write_fixed_int(&mut self, ty: CommonType, value: &num_bigint::BigInt) -> anyhow::Result<()> {
        integers::write_fixed_int(self, ty, value)
    }

    fn write_double(&mut self, value: f64) -> anyhow::Result<()> {
        floats::write_double(self, value)
    }

    fn write_rational_framed(&mut self, value: &RationalValue) -> anyhow::Result<()> {
        rationals::write_rational_framed(self, value)
    }

    fn write_double_interval(&mut self, iv: &Interval<f64>) -> anyhow::Result<()> {
        intervals::write_double_interval(self, iv)
    }

    fn write_rational_interval(&mut self, iv: &Interval<RationalValue>) -> anyhow::Result<()> {
        intervals::write_rational_interval(self, iv)
    }

    fn write_string_framed(&mut self, value: &str) -> anyhow::Result<()> {
        strings::write_string_framed(self, value)
    }

    fn write_json_framed(&mut self, value: &serde_json::Value) -> anyhow::Result<()> {
        strings::write_json_framed(self, value)
    }
}

impl<W: Write + ?Sized> UmbWrite for W {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bit_buffer_packs_two_fields_into_one_byte() {
        let mut buf = BitBuffer::new();
        buf.push_uint(&BigUint::from(0b101u8), 3);
        buf.push_uint(&BigUint::from(0b1010u8), 5);
        let mut out = Vec::new();
        buf.drain_full_bytes(&mut out);
        assert_eq!(out.len(), 1);
        assert!(buf.is_empty());

        let mut cursor = std::io::Cursor::new(out);
        let mut reader_buf = BitBuffer::new();
        let first = reader_buf.pull_uint(&mut cursor, 3).unwrap();
        let second = reader_buf.pull_uint(&mut cursor, 5).unwrap();
        assert_eq!(first, BigUint::from(0b101u8));
        assert_eq!(second, BigUint::from(0b1010u8));
    }
}
