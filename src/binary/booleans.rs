//! Boolean vector / bitvector codec (component C2, spec §4.2).
//!
//! A list of `n` bits packs into `ceil(n/8)` bytes, LSB-first within each
//! byte. Decoding always returns a multiple-of-8-length vector; callers
//! that need the exact entity count must truncate (mandatory at UMB file
//! load time per the pinned open question in spec §9).

pub fn write_bool_vec(values: &[bool]) -> Vec<u8> {
    let mut out = vec![0u8; values.len().div_ceil(8)];
    for (i, &bit) in values.iter().enumerate() {
        if bit {
            out[i / 8] |= 1 << (i % 8);
        }
    }
    out
}

/// Decode `bytes` into a `Vec<bool>` of length `bytes.len() * 8` (a multiple
/// of 8). Callers truncate to the true entity count themselves.
pub fn read_bool_vec(bytes: &[u8]) -> Vec<bool> {
    let mut out = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit in 0..8 {
            out.push(byte & (1 << bit) != 0);
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip_non_multiple_of_eight() {
        let values = vec![true, false, true, true, false];
        let bytes = write_bool_vec(&values);
        assert_eq!(bytes.len(), 1);
        let decoded = read_bool_vec(&bytes);
        assert_eq!(decoded.len(), 8);
        assert_eq!(&decoded[..5], &values[..]);
    }

    #[test]
    fn empty_vector_encodes_to_no_bytes() {
        assert!(write_bool_vec(&[]).is_empty());
    }
}
