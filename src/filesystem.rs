//! The filesystem driver.
//!
//! A flat, fixed-capacity file table embedded in a disk image: a chain of
//! TOC tables (170 slots each) starting at `toc_base`, with file payloads
//! addressed in 0x1000-byte blocks relative to the same base. [`BlitzFs`]
//! walks the chain once at init time and afterwards operates on the ordered
//! in-memory entry list, persisting mutations through the entry codec.

use crate::checksum::{compute_checksum, embeds_checksum};
use crate::container::Container;
use crate::entry::{EntryMeta, FileEntry, ENTRY_SIZE, FILES_PER_TOC};
use crate::error::{BlitzError, Result};
use crate::timestamp::Timestamp;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Payload addressing unit.
pub const BLOCK_SIZE: u64 = 0x1000;

const MAGIC_A: u32 = 0x5452_4150;
const MAGIC_A_OFFSET: u64 = 0x000;
const MAGIC_B: u32 = 0x8012_0134;
const MAGIC_B_OFFSET: u64 = 0x600;
const TOC_PTR_OFFSET: u64 = 0x60c;

/// Version marker file; its content names the game generation.
const VERSION_MARKER: &str = "GAMEINF.REV";
/// First of the two entries involved in the known block collision.
const AUDITS_FMT: &str = "AUDITS.FMT";
/// Append boundary sentinel, and the second collision entry.
const ADJUST_FMT: &str = "ADJUST.FMT";

/// Blocks moved forward when repairing the collision; leaves room for the
/// adjustments file to grow.
const REPAIR_BLOCK_GAP: u32 = 0x10;

/// Filesystem generation, detected from the version marker file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Version {
    #[default]
    Unknown,
    Blitz97,
    Blitz99,
    Blitz2K,
}

impl Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Unknown => "(unknown)",
            Version::Blitz97 => "Blitz97",
            Version::Blitz99 => "Blitz99",
            Version::Blitz2K => "Blitz2K",
        }
    }
}

/// Driver state: the TOC base, detected version, and the ordered entry list.
///
/// Single-threaded and fully synchronous; one instance owns its container
/// exclusively. Multi-step mutations (append, prepare_append) are not
/// crash-atomic, matching the on-disk format's own behavior.
pub struct BlitzFs<C: Container> {
    container: C,
    toc_base: u64,
    version: Version,
    has_checksum: bool,
    entries: Vec<FileEntry>,
}

impl<C: Container> BlitzFs<C> {
    pub fn new(container: C) -> Self {
        BlitzFs {
            container,
            toc_base: 0,
            version: Version::Unknown,
            has_checksum: true,
            entries: Vec::new(),
        }
    }

    /// Validate the image magics, walk the TOC chain and detect the
    /// filesystem generation. Fails hard on a magic mismatch or an empty
    /// table; there is no degraded mode.
    pub fn init(&mut self) -> Result<()> {
        self.entries.clear();

        let magic_a = self.read_u32_be(MAGIC_A_OFFSET)?;
        let magic_b = self.read_u32_be(MAGIC_B_OFFSET)?;
        if magic_a != MAGIC_A || magic_b != MAGIC_B {
            return Err(BlitzError::InvalidMagic);
        }

        let toc_ptr = self.read_u32_le(TOC_PTR_OFFSET)?;
        self.toc_base = (u64::from(toc_ptr) + 1) * 0x200;

        let mut addr = self.toc_base;
        let mut toc_index = 0u32;
        loop {
            for slot in 0..FILES_PER_TOC {
                if let Some(mut entry) = FileEntry::decode(&mut self.container, addr)? {
                    entry.meta.toc = toc_index;
                    entry.meta.index = slot;
                    self.entries.push(entry);
                }
                addr += ENTRY_SIZE;
            }

            // 16-byte trailer; a non-zero 4th word is the next table's block
            let mut trailer = [0u8; 16];
            self.container.read_bytes(addr, &mut trailer)?;
            let next = u32::from_le_bytes([trailer[12], trailer[13], trailer[14], trailer[15]]);
            if next == 0 {
                break;
            }
            addr = self.block_address(next);
            toc_index += 1;
        }

        if self.entries.is_empty() {
            return Err(BlitzError::EmptyToc);
        }

        self.detect_version();
        Ok(())
    }

    /// Read the version marker file and match its content against the known
    /// generation signatures. No match leaves the version unknown and the
    /// checksum convention at its default.
    fn detect_version(&mut self) {
        const SIG_2K: &[u8] = b"NFL Blitz 2000";
        const SIG_99: &[u8] = b"Blitz 99";
        const SIG_97: &[u8] = b"NFL BLITZ 1";

        let Ok(file) = self.read_file(VERSION_MARKER) else {
            return;
        };
        let Some(data) = file.get(4..) else {
            return;
        };

        if data.starts_with(SIG_2K) {
            self.has_checksum = true;
            self.version = Version::Blitz2K;
        } else if data.starts_with(SIG_99) {
            self.has_checksum = true;
            self.version = Version::Blitz99;
        } else if data.starts_with(SIG_97) {
            self.has_checksum = false;
            self.version = Version::Blitz97;
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Give the container back, consuming the driver.
    pub fn into_container(self) -> C {
        self.container
    }

    pub fn toc_base(&self) -> u64 {
        self.toc_base
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Whether `name`'s data region starts with a checksum word.
    pub fn file_has_checksum(&self, name: &str) -> bool {
        embeds_checksum(name, self.has_checksum)
    }

    /// Byte address of a block's payload.
    pub fn block_address(&self, block: u32) -> u64 {
        self.toc_base + u64::from(block.wrapping_sub(3)) * BLOCK_SIZE
    }

    /// Case-insensitive lookup; entry names are stored uppercase.
    fn find(&self, name: &str) -> Option<usize> {
        let upper = name.to_ascii_uppercase();
        self.entries.iter().position(|e| e.name == upper)
    }

    fn entry_for(&self, name: &str) -> Result<FileEntry> {
        self.find(name)
            .map(|idx| self.entries[idx].clone())
            .ok_or_else(|| BlitzError::FileNotFound(name.to_string()))
    }

    /// Usable payload capacity in bytes, checksum word excluded.
    fn capacity_bytes(&self, entry: &FileEntry) -> u64 {
        let capacity = u64::from(entry.filesize) * 4;
        if self.file_has_checksum(&entry.name) {
            capacity.saturating_sub(4)
        } else {
            capacity
        }
    }

    /// Read a file's stored checksum word.
    pub fn read_checksum(&mut self, name: &str) -> Result<u32> {
        let entry = self.entry_for(name)?;
        if !self.file_has_checksum(&entry.name) {
            return Err(BlitzError::NoChecksum(entry.name));
        }
        let addr = self.block_address(entry.block);
        self.read_u32_le(addr)
    }

    /// Read a file's payload, the embedded checksum word stripped.
    pub fn read_file(&mut self, name: &str) -> Result<Vec<u8>> {
        let entry = self.entry_for(name)?;

        let mut size = u64::from(entry.filesize) * 4;
        let mut addr = self.block_address(entry.block);
        if self.file_has_checksum(&entry.name) {
            size = size.saturating_sub(4);
            addr += 4;
        }

        let mut bytes = vec![0u8; size as usize];
        self.container.read_bytes(addr, &mut bytes)?;
        Ok(bytes)
    }

    /// Overwrite a file's payload in place, re-inserting the checksum word
    /// when the convention applies. Content smaller than the on-disk
    /// capacity is allowed; the slack is zero-filled.
    pub fn write_file(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let entry = self.entry_for(name)?;
        let capacity = self.capacity_bytes(&entry);
        let found = bytes.len() as u64;

        if found > capacity {
            return Err(BlitzError::SizeMismatch { found, capacity });
        }
        if found < capacity {
            warn!(
                "filesize mismatch for {}: expected {capacity} found {found} (padding {} bytes)",
                entry.name,
                capacity - found
            );
        }

        let mut addr = self.block_address(entry.block);
        if self.file_has_checksum(&entry.name) {
            let cksum = compute_checksum(bytes);
            self.container.write_bytes(addr, &cksum.to_le_bytes())?;
            addr += 4;
        }
        self.container.write_bytes(addr, bytes)?;

        let slack = capacity - found;
        if slack > 0 {
            self.container
                .write_bytes(addr + found, &vec![0u8; slack as usize])?;
        }
        Ok(())
    }

    /// Copy a file out of the image into `outdir`, named after its entry.
    pub fn extract(&mut self, name: &str, outdir: &Path) -> Result<PathBuf> {
        let entry = self.entry_for(name)?;
        let bytes = self.read_file(&entry.name)?;
        let path = outdir.join(&entry.name);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Refresh a file's content and timestamp from `sourcedir/NAME`.
    ///
    /// The timestamp update and the content write are independent steps; a
    /// failure in the second does not revert the first.
    pub fn update(&mut self, name: &str, sourcedir: &Path) -> Result<()> {
        let idx = self
            .find(name)
            .ok_or_else(|| BlitzError::FileNotFound(name.to_string()))?;
        let entry_name = self.entries[idx].name.clone();

        let path = if sourcedir.as_os_str().is_empty() {
            PathBuf::from(&entry_name)
        } else {
            sourcedir.join(&entry_name)
        };
        let metadata = std::fs::metadata(&path).map_err(|source| BlitzError::SourceUnreadable {
            path: path.clone(),
            source,
        })?;

        let capacity = self.capacity_bytes(&self.entries[idx]);
        if metadata.len() > capacity {
            return Err(BlitzError::SourceTooLarge {
                found: metadata.len(),
                capacity,
            });
        }

        if let Ok(modified) = metadata.modified() {
            self.entries[idx].timestamp = Timestamp::from_system_time(modified).pack();
            let entry = self.entries[idx].clone();
            entry.encode(&mut self.container)?;
        }

        let bytes = std::fs::read(&path)?;
        self.write_file(&entry_name, &bytes)
    }

    /// Reclaim every TOC slot after the append sentinel: the trailing
    /// entries are zeroed on disk and dropped from the in-memory list. Must
    /// be called before the first `append` of a session.
    pub fn prepare_append(&mut self) -> Result<()> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.name == ADJUST_FMT)
            .ok_or_else(|| BlitzError::MissingSentinel(ADJUST_FMT.to_string()))?;

        for entry in &mut self.entries[pos + 1..] {
            entry.name.clear();
            entry.filesize = 0;
            entry.block = 0;
            entry.timestamp = 0;
        }

        self.update_toc()?;
        self.entries.truncate(pos + 1);
        Ok(())
    }

    /// Append `sourcedir/name` as a new file after the current last entry.
    ///
    /// The new payload lands at the next block boundary past the previous
    /// file's end, with three blocks of headroom reserved before alignment.
    /// A persist or copy failure leaves the entry appended in memory and is
    /// reported to the caller; there is no rollback.
    pub fn append(&mut self, name: &str, sourcedir: &Path) -> Result<()> {
        if name.len() > crate::entry::NAME_LEN {
            return Err(BlitzError::NameTooLong(name.to_string()));
        }

        let path = if sourcedir.as_os_str().is_empty() {
            PathBuf::from(name)
        } else {
            sourcedir.join(name)
        };
        let source_size = std::fs::metadata(&path)
            .map_err(|source| BlitzError::SourceUnreadable {
                path: path.clone(),
                source,
            })?
            .len();

        let prev = self.entries.last().cloned().ok_or(BlitzError::EmptyToc)?;
        if prev.meta.index >= FILES_PER_TOC - 1 {
            return Err(BlitzError::TocFull);
        }

        let mut words = (source_size.div_ceil(4)) as u32;
        if embeds_checksum(name, self.has_checksum) {
            words += 1;
        }

        let prev_end = self.block_address(prev.block) + u64::from(prev.filesize) * 4;
        let entry = FileEntry {
            name: name.to_ascii_uppercase(),
            filesize: words,
            timestamp: 0,
            block: self.align_next_block(prev_end),
            meta: EntryMeta {
                addr: prev.meta.addr + ENTRY_SIZE,
                toc: prev.meta.toc,
                index: prev.meta.index + 1,
            },
        };

        self.entries.push(entry.clone());
        entry.encode(&mut self.container)?;
        self.update(name, sourcedir)
    }

    /// Next block boundary past `addr`, with three blocks of headroom
    /// reserved before masking.
    fn align_next_block(&self, addr: u64) -> u32 {
        let aligned = (addr + BLOCK_SIZE * 3) & !(BLOCK_SIZE - 1);
        (((aligned - self.toc_base) / BLOCK_SIZE) + 3) as u32
    }

    /// Fix the known block collision between the audit and adjustment
    /// files in Blitz 2000 images. A no-op success when the two entries
    /// exist but no longer collide; not a general consistency checker.
    pub fn repair(&mut self) -> Result<()> {
        if self.version != Version::Blitz2K {
            return Err(BlitzError::RepairUnsupported);
        }

        let audits = self
            .find(AUDITS_FMT)
            .ok_or_else(|| BlitzError::MissingSentinel(AUDITS_FMT.to_string()))?;
        let adjust = self
            .find(ADJUST_FMT)
            .ok_or_else(|| BlitzError::MissingSentinel(ADJUST_FMT.to_string()))?;

        if self.entries[audits].block == self.entries[adjust].block {
            self.entries[adjust].block = self.entries[audits].block + REPAIR_BLOCK_GAP;
            self.update_toc()?;
        }
        Ok(())
    }

    /// Re-write every in-memory entry record back to the container.
    pub fn update_toc(&mut self) -> Result<()> {
        for entry in &self.entries {
            entry.encode(&mut self.container)?;
        }
        Ok(())
    }

    /// Highest byte address touched by any file; entries need not be
    /// contiguous, so this is a high-water mark, not a sum.
    pub fn used_size(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| self.block_address(e.block) + u64::from(e.filesize) * 4)
            .max()
            .unwrap_or(0)
    }

    /// The container's logical byte size.
    pub fn total_size(&self) -> u64 {
        self.container.logical_size()
    }

    fn read_u32_le(&mut self, addr: u64) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.container.read_bytes(addr, &mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    fn read_u32_be(&mut self, addr: u64) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.container.read_bytes(addr, &mut bytes)?;
        Ok(u32::from_be_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MemImage;

    const TOC_PTR: u32 = 7;
    const TOC_BASE: u64 = (TOC_PTR as u64 + 1) * 0x200; // 0x1000

    /// Minimal valid image: magics, TOC pointer, one table with the given
    /// entries and a zero trailer.
    fn build_image(entries: &[FileEntry]) -> MemImage {
        let mut image = MemImage::with_len(0x40000);
        image.write_bytes(0x000, &MAGIC_A.to_be_bytes()).unwrap();
        image.write_bytes(0x600, &MAGIC_B.to_be_bytes()).unwrap();
        image
            .write_bytes(TOC_PTR_OFFSET, &TOC_PTR.to_le_bytes())
            .unwrap();
        for entry in entries {
            entry.encode(&mut image).unwrap();
        }
        image
    }

    fn slot_addr(index: u32) -> u64 {
        TOC_BASE + u64::from(index) * ENTRY_SIZE
    }

    fn entry(name: &str, index: u32, filesize: u32, block: u32) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            filesize,
            timestamp: 0,
            block,
            meta: EntryMeta {
                addr: slot_addr(index),
                toc: 0,
                index,
            },
        }
    }

    fn init_fs(image: MemImage) -> BlitzFs<MemImage> {
        let mut fs = BlitzFs::new(image);
        fs.init().unwrap();
        fs
    }

    #[test]
    fn test_init_walks_single_table() {
        let image = build_image(&[
            entry("FIRST.BIN", 0, 4, 4),
            entry("SECOND.BIN", 1, 4, 5),
            entry("THIRD.BIN", 2, 4, 6),
        ]);
        let fs = init_fs(image);

        assert_eq!(fs.toc_base(), TOC_BASE);
        assert_eq!(fs.entries().len(), 3);
        assert_eq!(fs.entries()[0].name, "FIRST.BIN");
        assert_eq!(fs.entries()[2].meta.index, 2);
        assert_eq!(fs.version(), Version::Unknown);
    }

    #[test]
    fn test_init_skips_empty_slots() {
        // slots 0 and 5 populated; the in-memory list stays in slot order
        let image = build_image(&[entry("A.BIN", 0, 1, 4), entry("B.BIN", 5, 1, 5)]);
        let fs = init_fs(image);

        assert_eq!(fs.entries().len(), 2);
        assert_eq!(fs.entries()[1].name, "B.BIN");
        assert_eq!(fs.entries()[1].meta.index, 5);
    }

    #[test]
    fn test_init_rejects_bad_magic() {
        let mut image = build_image(&[entry("A.BIN", 0, 1, 4)]);
        image.write_bytes(0x000, &[0; 4]).unwrap();

        let mut fs = BlitzFs::new(image);
        assert!(matches!(fs.init(), Err(BlitzError::InvalidMagic)));
    }

    #[test]
    fn test_init_rejects_empty_toc() {
        let image = build_image(&[]);
        let mut fs = BlitzFs::new(image);
        assert!(matches!(fs.init(), Err(BlitzError::EmptyToc)));
    }

    #[test]
    fn test_init_follows_chained_tables() {
        let mut image = build_image(&[entry("A.BIN", 0, 1, 8)]);

        // trailer of table 0 points at block 5; table 1 holds one entry and
        // a zero trailer
        let trailer_addr = TOC_BASE + u64::from(FILES_PER_TOC) * ENTRY_SIZE;
        image
            .write_bytes(trailer_addr + 12, &5u32.to_le_bytes())
            .unwrap();

        let table1 = TOC_BASE + (5 - 3) * BLOCK_SIZE;
        let second = FileEntry {
            name: "B.BIN".to_string(),
            filesize: 1,
            timestamp: 0,
            block: 9,
            meta: EntryMeta {
                addr: table1,
                toc: 0,
                index: 0,
            },
        };
        second.encode(&mut image).unwrap();

        let fs = init_fs(image);
        assert_eq!(fs.entries().len(), 2);
        assert_eq!(fs.entries()[1].name, "B.BIN");
        assert_eq!(fs.entries()[1].meta.toc, 1);
        assert_eq!(fs.entries()[1].meta.index, 0);
    }

    #[test]
    fn test_version_detection_blitz2k() {
        let mut image = build_image(&[entry("GAMEINF.REV", 0, 8, 4)]);
        let mut content = [0u8; 32];
        content[4..18].copy_from_slice(b"NFL Blitz 2000");
        image
            .write_bytes(TOC_BASE + (4 - 3) * BLOCK_SIZE, &content)
            .unwrap();

        let fs = init_fs(image);
        assert_eq!(fs.version(), Version::Blitz2K);
        assert!(fs.file_has_checksum("DATA.BIN"));
        assert!(!fs.file_has_checksum("AUDITS.FMT"));
    }

    #[test]
    fn test_version_detection_blitz97_disables_checksums() {
        let mut image = build_image(&[entry("GAMEINF.REV", 0, 8, 4)]);
        let mut content = [0u8; 32];
        content[4..15].copy_from_slice(b"NFL BLITZ 1");
        image
            .write_bytes(TOC_BASE + (4 - 3) * BLOCK_SIZE, &content)
            .unwrap();

        let fs = init_fs(image);
        assert_eq!(fs.version(), Version::Blitz97);
        assert!(!fs.file_has_checksum("DATA.BIN"));
    }

    #[test]
    fn test_read_write_inverse_plain_file() {
        // no version marker: checksums default on, .FMT is exempt
        let image = build_image(&[entry("TABLE.FMT", 0, 2, 4)]);
        let mut fs = init_fs(image);

        let content = *b"8 bytes!";
        fs.write_file("TABLE.FMT", &content).unwrap();
        assert_eq!(fs.read_file("table.fmt").unwrap(), content);
    }

    #[test]
    fn test_read_write_inverse_checksummed_file() {
        let image = build_image(&[entry("DATA.BIN", 0, 3, 4)]);
        let mut fs = init_fs(image);

        let content = *b"8 bytes!"; // capacity 3*4 - 4 = 8
        fs.write_file("DATA.BIN", &content).unwrap();
        assert_eq!(fs.read_file("DATA.BIN").unwrap(), content);
        assert_eq!(
            fs.read_checksum("DATA.BIN").unwrap(),
            compute_checksum(&content)
        );
    }

    #[test]
    fn test_read_checksum_rejected_for_plain_file() {
        let image = build_image(&[entry("TABLE.FMT", 0, 2, 4)]);
        let mut fs = init_fs(image);
        assert!(matches!(
            fs.read_checksum("TABLE.FMT"),
            Err(BlitzError::NoChecksum(_))
        ));
    }

    #[test]
    fn test_write_file_rejects_oversize() {
        let image = build_image(&[entry("TABLE.FMT", 0, 2, 4)]);
        let mut fs = init_fs(image);
        assert!(matches!(
            fs.write_file("TABLE.FMT", &[0u8; 9]),
            Err(BlitzError::SizeMismatch {
                found: 9,
                capacity: 8
            })
        ));
    }

    #[test]
    fn test_write_file_zero_fills_slack() {
        let image = build_image(&[entry("TABLE.FMT", 0, 2, 4)]);
        let mut fs = init_fs(image);

        fs.write_file("TABLE.FMT", &[0xaa; 8]).unwrap();
        fs.write_file("TABLE.FMT", &[0xbb; 3]).unwrap();

        let bytes = fs.read_file("TABLE.FMT").unwrap();
        assert_eq!(&bytes[..3], &[0xbb; 3]);
        assert_eq!(&bytes[3..], &[0u8; 5]);
    }

    #[test]
    fn test_missing_file_errors() {
        let image = build_image(&[entry("A.BIN", 0, 1, 4)]);
        let mut fs = init_fs(image);
        assert!(matches!(
            fs.read_file("NOPE.BIN"),
            Err(BlitzError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_align_next_block() {
        let image = build_image(&[entry("A.BIN", 0, 1, 4)]);
        let fs = init_fs(image);

        // previous file ends at block 4 + 0x20 bytes
        let end = fs.block_address(4) + 0x20;
        let block = fs.align_next_block(end);
        // payload address is the next 0x1000 boundary after 3 blocks of
        // headroom past the end address
        assert_eq!(
            fs.block_address(block),
            (end + 3 * BLOCK_SIZE) & !(BLOCK_SIZE - 1)
        );
        assert_eq!(block, 7);
    }

    #[test]
    fn test_align_next_block_already_aligned() {
        let image = build_image(&[entry("A.BIN", 0, 1, 4)]);
        let fs = init_fs(image);

        let end = fs.block_address(5); // exactly on a boundary
        assert_eq!(fs.align_next_block(end), 8);
    }

    #[test]
    fn test_prepare_append_requires_sentinel() {
        let image = build_image(&[entry("A.BIN", 0, 1, 4)]);
        let mut fs = init_fs(image);
        assert!(matches!(
            fs.prepare_append(),
            Err(BlitzError::MissingSentinel(_))
        ));
    }

    #[test]
    fn test_prepare_append_truncates_and_zeroes() {
        let image = build_image(&[
            entry("A.BIN", 0, 1, 4),
            entry("ADJUST.FMT", 1, 1, 5),
            entry("OLD1.BIN", 2, 1, 6),
            entry("OLD2.BIN", 3, 1, 7),
        ]);
        let mut fs = init_fs(image);

        fs.prepare_append().unwrap();
        assert_eq!(fs.entries().len(), 2);
        assert_eq!(fs.entries()[1].name, "ADJUST.FMT");

        // the trailing slots read back as absent now
        let mut fs2 = BlitzFs::new(fs.container.clone());
        fs2.init().unwrap();
        assert_eq!(fs2.entries().len(), 2);
    }

    #[test]
    fn test_repair_fixes_collision_and_is_idempotent() {
        let mut image = build_image(&[
            entry("GAMEINF.REV", 0, 8, 4),
            entry("AUDITS.FMT", 1, 1, 9),
            entry("ADJUST.FMT", 2, 1, 9),
        ]);
        let mut content = [0u8; 32];
        content[4..18].copy_from_slice(b"NFL Blitz 2000");
        image
            .write_bytes(TOC_BASE + (4 - 3) * BLOCK_SIZE, &content)
            .unwrap();
        let mut fs = init_fs(image);

        fs.repair().unwrap();
        let adjusted = fs.entries()[2].block;
        assert_eq!(adjusted, 9 + REPAIR_BLOCK_GAP);

        // second run is a successful no-op
        fs.repair().unwrap();
        assert_eq!(fs.entries()[2].block, adjusted);

        // the reassignment persisted
        let mut fs2 = BlitzFs::new(fs.container.clone());
        fs2.init().unwrap();
        assert_eq!(fs2.entries()[2].block, adjusted);
    }

    #[test]
    fn test_repair_requires_blitz2k() {
        let image = build_image(&[
            entry("AUDITS.FMT", 0, 1, 9),
            entry("ADJUST.FMT", 1, 1, 9),
        ]);
        let mut fs = init_fs(image);
        assert!(matches!(fs.repair(), Err(BlitzError::RepairUnsupported)));
    }

    #[test]
    fn test_used_size_is_high_water_mark() {
        let image = build_image(&[entry("A.BIN", 0, 4, 20), entry("B.BIN", 1, 1, 4)]);
        let fs = init_fs(image);
        assert_eq!(fs.used_size(), fs.block_address(20) + 16);
    }

    #[test]
    fn test_total_size_is_container_size() {
        let image = build_image(&[entry("A.BIN", 0, 1, 4)]);
        let fs = init_fs(image);
        assert_eq!(fs.total_size(), 0x40000);
    }
}
