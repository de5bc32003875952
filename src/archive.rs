//! Archive layer (component C6, spec §4.6): read/write a compressed tape
//! archive as a name -> bytes mapping.
//!
//! Grounded on the teacher's `flate2::bufread::ZlibDecoder` usage in
//! `til/section.rs` for the compression half; the tar/archive half has no
//! teacher analogue and is built from `MystenLabs-sui`'s `tar` dependency,
//! in the teacher's idiom of a thin wrapper struct over a plain
//! `Read`/`Write`.

use crate::error::UmbError;
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use xz2::read::XzDecoder;

/// The compression scheme used to write an archive. Reading accepts any of
/// these plus uncompressed tar, detected by magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compress {
    None,
    Gzip,
    Bzip2,
    Xz,
}

/// All members of a tape archive, loaded eagerly into memory.
pub struct ArchiveReader {
    members: HashMap<String, Vec<u8>>,
    consumed: HashSet<String>,
}

fn sniff_decoder(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    let mut magic = [0u8; 6];
    let n = File::open(path)?.read(&mut magic).unwrap_or(0);
    let reader = BufReader::new(File::open(path)?);
    Ok(match &magic[..n] {
        [0x1f, 0x8b, ..] => Box::new(GzDecoder::new(reader)),
        [b'B', b'Z', b'h', ..] => Box::new(BzDecoder::new(reader)),
        [0xfd, b'7', b'z', b'X', b'Z', 0x00] => Box::new(XzDecoder::new(reader)),
        _ => Box::new(reader),
    })
}

impl ArchiveReader {
    /// Load every member of the archive at `path` into memory. Accepts
    /// gzip, bzip2, xz, or uncompressed tar, detected by magic bytes.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let decoder = sniff_decoder(path)?;
        let mut archive = tar::Archive::new(decoder);
        let mut members = HashMap::new();
        for entry in archive.entries()? {
            let mut entry = entry?;
            let name = entry.path()?.to_string_lossy().into_owned();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            members.insert(name, bytes);
        }
        Ok(Self { members, consumed: HashSet::new() })
    }

    /// Read and mark consumed the member named `name`.
    pub fn read(&mut self, name: &str) -> anyhow::Result<&[u8]> {
        self.consumed.insert(name.to_string());
        self.members
            .get(name)
            .map(|v| v.as_slice())
            .ok_or_else(|| UmbError::MissingFile(name.to_string()).into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Names present in the archive that have not yet been read.
    pub fn unread_members(&self) -> Vec<String> {
        self.members.keys().filter(|k| !self.consumed.contains(*k)).cloned().collect()
    }
}

/// Write a single-pass tar archive from `members`. Member order need not be
/// preserved on read.
pub fn write_archive(path: &Path, members: &HashMap<String, Vec<u8>>, compression: Compress) -> anyhow::Result<()> {
    let file = File::create(path)?;
    match compression {
        Compress::Gzip => write_tar(GzEncoder::new(file, Compression::default()), members),
        Compress::Bzip2 => write_tar(bzip2::write::BzEncoder::new(file, bzip2::Compression::default()), members),
        Compress::Xz => write_tar(xz2::write::XzEncoder::new(file, 6), members),
        Compress::None => write_tar(file, members),
    }
}

fn write_tar<W: Write>(w: W, members: &HashMap<String, Vec<u8>>) -> anyhow::Result<()> {
    let mut builder = tar::Builder::new(w);
    for (name, bytes) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, bytes.as_slice())?;
    }
    builder.finish()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn write_then_read_roundtrip() {
        let dir = std::env::temp_dir().join(format!("umb-archive-test-{}", std::process::id()));
        let path = dir.with_extension("umb");
        let mut members = HashMap::new();
        members.insert("index.json".to_string(), b"{}".to_vec());
        members.insert("initial-states.bin".to_string(), vec![1, 0, 1]);
        write_archive(&path, &members, Compress::Gzip).unwrap();

        let mut reader = ArchiveReader::open(&path).unwrap();
        assert_eq!(reader.read("index.json").unwrap(), b"{}");
        assert_eq!(reader.read("initial-states.bin").unwrap(), &[1, 0, 1]);
        assert!(reader.unread_members().is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unread_members_are_tracked() {
        let dir = std::env::temp_dir().join(format!("umb-archive-test-unread-{}", std::process::id()));
        let path = dir.with_extension("umb");
        let mut members = HashMap::new();
        members.insert("index.json".to_string(), b"{}".to_vec());
        members.insert("extra.bin".to_string(), vec![9]);
        write_archive(&path, &members, Compress::Gzip).unwrap();

        let mut reader = ArchiveReader::open(&path).unwrap();
        reader.read("index.json").unwrap();
        assert_eq!(reader.unread_members(), vec!["extra.bin".to_string()]);

        std::fs::remove_file(&path).ok();
    }
}
