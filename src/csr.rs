//! CSR (Compressed Sparse Row) utilities (component C5, spec §4.5).
//!
//! A CSR vector is a non-decreasing integer array with `|c| >= 2` and
//! `c[0] == 0`. A ranges vector is a sequence of half-open `[start, end)`
//! pairs with `start_i <= end_i` and `end_i == start_{i+1}`. The two
//! representations are total bijections on their respective valid domains.
//!
//! Grounded on `original_source/umbi/datatypes/vector.py` and
//! `original_source/umbi/io/csr.py`. A third Python implementation,
//! `io/vector.py`'s `ranges_to_row_start`, appends an extra trailing `+1`
//! and disagrees with these two canonical functions; it is not ported here
//! since it is inconsistent with the CSR invariants this module documents.

use crate::error::UmbError;

/// Validate that `csr` is a well-formed CSR vector.
pub fn validate_csr(csr: &[u64]) -> anyhow::Result<()> {
    if csr.len() < 2 {
        anyhow::bail!(UmbError::InvalidCsr(format!("CSR vector must have length >= 2, got {}", csr.len())));
    }
    if csr[0] != 0 {
        anyhow::bail!(UmbError::InvalidCsr(format!("CSR vector must start at 0, got {}", csr[0])));
    }
    for w in csr.windows(2) {
        if w[1] < w[0] {
            anyhow::bail!(UmbError::InvalidCsr("CSR vector must be non-decreasing".to_string()));
        }
    }
    Ok(())
}

/// Validate that `ranges` is a well-formed ranges vector.
pub fn validate_ranges(ranges: &[(u64, u64)]) -> anyhow::Result<()> {
    for (i, &(start, end)) in ranges.iter().enumerate() {
        if start > end {
            anyhow::bail!(UmbError::InvalidRanges(format!("range {i} has start > end")));
        }
        if i + 1 < ranges.len() && end != ranges[i + 1].0 {
            anyhow::bail!(UmbError::InvalidRanges(format!(
                "range {i} end {end} does not match range {}'s start {}",
                i + 1,
                ranges[i + 1].0
            )));
        }
    }
    Ok(())
}

/// Convert a CSR vector into its half-open ranges.
pub fn csr_to_ranges(csr: &[u64]) -> anyhow::Result<Vec<(u64, u64)>> {
    validate_csr(csr)?;
    Ok(csr.windows(2).map(|w| (w[0], w[1])).collect())
}

/// Convert a ranges vector back into its CSR form.
pub fn ranges_to_csr(ranges: &[(u64, u64)]) -> anyhow::Result<Vec<u64>> {
    validate_ranges(ranges)?;
    if ranges.is_empty() {
        return Ok(vec![0, 0]);
    }
    let mut csr = Vec::with_capacity(ranges.len() + 1);
    csr.push(ranges[0].0);
    for &(_, end) in ranges {
        csr.push(end);
    }
    if csr[0] != 0 {
        anyhow::bail!(UmbError::InvalidRanges("ranges vector must start at 0".to_string()));
    }
    Ok(csr)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn csr_ranges_roundtrip() {
        let csr = vec![0u64, 3, 3, 7];
        let ranges = csr_to_ranges(&csr).unwrap();
        assert_eq!(ranges, vec![(0, 3), (3, 3), (3, 7)]);
        assert_eq!(ranges_to_csr(&ranges).unwrap(), csr);
    }

    #[test]
    fn csr_must_start_at_zero() {
        assert!(validate_csr(&[1, 2]).is_err());
    }

    #[test]
    fn csr_must_have_min_length_two() {
        assert!(validate_csr(&[0]).is_err());
    }

    #[test]
    fn csr_must_be_non_decreasing() {
        assert!(validate_csr(&[0, 5, 3]).is_err());
    }

    #[test]
    fn ranges_must_chain() {
        assert!(validate_ranges(&[(0, 3), (4, 5)]).is_err());
    }
}
