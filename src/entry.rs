//! Directory-entry records and their on-disk codec.
//!
//! Each TOC table holds 170 fixed 24-byte records: a 12-byte name stored
//! with every 4-byte word byte-reversed, then filesize (in 4-byte words),
//! timestamp and block number as little-endian u32. A slot whose first
//! decoded name byte is not printable is empty.

use crate::container::Container;
use crate::error::{BlitzError, Result};

/// Directory slots per TOC table.
pub const FILES_PER_TOC: u32 = 170;

/// On-disk record size: 12-byte name + filesize + timestamp + block.
pub const ENTRY_SIZE: u64 = 24;

/// Maximum filename length.
pub const NAME_LEN: usize = 12;

/// Where a decoded entry lives; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryMeta {
    /// Byte offset of the 24-byte record. Assigned once at decode or append
    /// time; re-encoding never moves a record.
    pub addr: u64,
    /// Index of the TOC table this slot belongs to.
    pub toc: u32,
    /// Slot position within the table, 0..=169.
    pub index: u32,
}

/// One TOC slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileEntry {
    /// Uppercase name, at most 12 characters.
    pub name: String,
    /// Payload size in 4-byte words, embedded checksum word included.
    pub filesize: u32,
    /// Packed timestamp, see [`crate::timestamp::Timestamp`].
    pub timestamp: u32,
    /// Block number; payload lives at `toc_base + (block - 3) * 0x1000`.
    pub block: u32,
    pub meta: EntryMeta,
}

/// Reverse each 4-byte word of a stored name. The on-disk name is
/// byte-swapped per word; applying the swap twice restores the input.
pub fn swap_name_words(raw: [u8; NAME_LEN]) -> [u8; NAME_LEN] {
    let mut out = raw;
    for word in out.chunks_exact_mut(4) {
        word.reverse();
    }
    out
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

impl FileEntry {
    /// Decode the record at `addr`. Returns `None` for an empty slot (first
    /// name byte not printable); container read failures propagate.
    pub fn decode<C: Container>(container: &mut C, addr: u64) -> Result<Option<FileEntry>> {
        let mut record = [0u8; ENTRY_SIZE as usize];
        container.read_bytes(addr, &mut record)?;

        let mut raw_name = [0u8; NAME_LEN];
        raw_name.copy_from_slice(&record[..NAME_LEN]);
        let name = swap_name_words(raw_name);

        if !is_printable(name[0]) {
            return Ok(None);
        }

        let len = name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        let name = String::from_utf8_lossy(&name[..len]).into_owned();

        Ok(Some(FileEntry {
            name,
            filesize: u32::from_le_bytes([record[12], record[13], record[14], record[15]]),
            timestamp: u32::from_le_bytes([record[16], record[17], record[18], record[19]]),
            block: u32::from_le_bytes([record[20], record[21], record[22], record[23]]),
            meta: EntryMeta {
                addr,
                toc: 0,
                index: 0,
            },
        }))
    }

    /// Re-encode this entry at its record address.
    pub fn encode<C: Container>(&self, container: &mut C) -> Result<()> {
        if self.meta.addr == 0 {
            return Err(BlitzError::UnplacedEntry(self.name.clone()));
        }

        let mut name = [0u8; NAME_LEN];
        let bytes = self.name.as_bytes();
        let len = bytes.len().min(NAME_LEN);
        name[..len].copy_from_slice(&bytes[..len]);

        let mut record = [0u8; ENTRY_SIZE as usize];
        record[..NAME_LEN].copy_from_slice(&swap_name_words(name));
        record[12..16].copy_from_slice(&self.filesize.to_le_bytes());
        record[16..20].copy_from_slice(&self.timestamp.to_le_bytes());
        record[20..24].copy_from_slice(&self.block.to_le_bytes());

        container.write_bytes(self.meta.addr, &record)
    }
}
