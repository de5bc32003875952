//! IEEE-754 binary64 codec (component C2, spec §4.2).

use std::io::{Read, Write};

pub fn write_double<W: Write>(w: &mut W, value: f64) -> anyhow::Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub fn read_double<R: Read>(r: &mut R) -> anyhow::Result<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn double_roundtrip() {
        let mut buf = Vec::new();
        write_double(&mut buf, std::f64::consts::PI).unwrap();
        assert_eq!(buf.len(), 8);
        let mut cursor = std::io::Cursor::new(buf);
        assert_eq!(read_double(&mut cursor).unwrap(), std::f64::consts::PI);
    }
}
