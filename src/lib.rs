//! # BlitzFS - Blitz Arcade Hard-Disk Filesystem Driver
//!
//! `blitzfs` reads and modifies the proprietary flat filesystem embedded in
//! NFL Blitz (97/99/2000) arcade hard-disk dumps. The format was reverse
//! engineered from the original binaries; every offset, word count and
//! byte-swap below is load-bearing, and a deviation silently corrupts a
//! real image.
//!
//! ## On-disk layout
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │ 0x000  Magic A (byte-swapped u32)                     │
//! │ 0x600  Magic B (byte-swapped u32)                     │
//! │ 0x60C  TOC pointer: toc_base = (value + 1) * 0x200    │
//! ├───────────────────────────────────────────────────────┤
//! │ toc_base: chain of TOC tables                         │
//! │   170 × 24-byte entries (name, filesize, time, block) │
//! │   16-byte trailer; word 3 links the next table        │
//! ├───────────────────────────────────────────────────────┤
//! │ File payloads, addressed in 0x1000-byte blocks:       │
//! │   payload = toc_base + (block - 3) * 0x1000           │
//! │   some files lead with a 4-byte checksum word         │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blitzfs::{BlitzFs, DiskImage, Result};
//!
//! # fn main() -> Result<()> {
//! let image = DiskImage::open_writable("blitz2k.img")?;
//! let mut fs = BlitzFs::new(image);
//! fs.init()?;
//!
//! // Fix the known AUDITS.FMT/ADJUST.FMT block collision
//! fs.repair()?;
//!
//! // Pull a file out
//! let roster = fs.read_file("ROSTER.BIN")?;
//!
//! // Push new content back in (checksum maintained transparently)
//! fs.write_file("ROSTER.BIN", &roster)?;
//! # Ok(())
//! # }
//! ```

pub mod checksum;
pub mod container;
pub mod entry;
pub mod error;
pub mod filesystem;
pub mod import;
pub mod timestamp;

// Re-export commonly used types
pub use checksum::{compute_checksum, embeds_checksum};
pub use container::{Container, DiskImage, MemImage};
pub use entry::{EntryMeta, FileEntry, ENTRY_SIZE, FILES_PER_TOC, NAME_LEN};
pub use error::{BlitzError, Result};
pub use filesystem::{BlitzFs, Version, BLOCK_SIZE};
pub use import::{load_manifest, parse_manifest, ImportFile, Imports};
pub use timestamp::Timestamp;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
