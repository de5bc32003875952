//! String and JSON codecs (component C2, spec §4.2).
//!
//! Strings are UTF-8; the framed form prefixes a `uint16` byte length. JSON
//! values are serialized to UTF-8 text and then framed the same way.

use crate::error::UmbError;
use std::io::{Read, Write};

pub fn write_string_framed<W: Write>(w: &mut W, value: &str) -> anyhow::Result<()> {
    let bytes = value.as_bytes();
    if bytes.len() > u16::MAX as usize {
        anyhow::bail!(UmbError::LengthMismatch {
            expected: u16::MAX as usize,
            actual: bytes.len(),
        });
    }
    w.write_all(&(bytes.len() as u16).to_le_bytes())?;
    w.write_all(bytes)?;
    Ok(())
}

pub fn read_string_framed<R: Read>(r: &mut R) -> anyhow::Result<String> {
    let mut len_buf = [0u8; 2];
    r.read_exact(&mut len_buf)?;
    let len = u16::from_le_bytes(len_buf) as usize;
    let mut bytes = vec![0u8; len];
    r.read_exact(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

pub fn write_json_framed<W: Write>(w: &mut W, value: &serde_json::Value) -> anyhow::Result<()> {
    write_string_framed(w, &serde_json::to_string(value)?)
}

pub fn read_json_framed<R: Read>(r: &mut R) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_str(&read_string_framed(r)?)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn multibyte_utf8_string_roundtrip() {
        let s = "héllo wörld 日本語";
        let mut buf = Vec::new();
        write_string_framed(&mut buf, s).unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        assert_eq!(read_string_framed(&mut cursor).unwrap(), s);
    }

    #[test]
    fn json_roundtrip() {
        let v = serde_json::json!({"a": 1, "b": [true, null, "x"]});
        let mut buf = Vec::new();
        write_json_framed(&mut buf, &v).unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        assert_eq!(read_json_framed(&mut cursor).unwrap(), v);
    }
}
