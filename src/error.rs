use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlitzError {
    #[error("Invalid magic number in disk image header")]
    InvalidMagic,

    #[error("No file entries found in table of contents")]
    EmptyToc,

    #[error("Image is a compressed CHD, decompress it to a raw image first: {}", .0.display())]
    CompressedImage(PathBuf),

    #[error("Failed to locate file: {0}")]
    FileNotFound(String),

    #[error("File doesn't contain a checksum: {0}")]
    NoChecksum(String),

    #[error("Filename is too long, must be no more than 12 characters: {0}")]
    NameTooLong(String),

    #[error("Filesize mismatch: content is {found} bytes but capacity is {capacity}")]
    SizeMismatch { found: u64, capacity: u64 },

    #[error("Filesize mismatch, source is too large: {found} bytes exceeds capacity of {capacity}")]
    SourceTooLarge { found: u64, capacity: u64 },

    #[error("Unable to get filesize for file: {}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Required file entry is missing: {0}")]
    MissingSentinel(String),

    #[error("Repair only applies to Blitz 2000 images")]
    RepairUnsupported,

    #[error("Too many files added to TOC table, extending into a new table is not implemented")]
    TocFull,

    #[error("Entry '{0}' has no on-disk record address")]
    UnplacedEntry(String),

    #[error("Bad section header at line {line}: {text}")]
    BadSection { line: usize, text: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BlitzError>;
