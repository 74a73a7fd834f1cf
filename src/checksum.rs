//! Embedded file checksums.
//!
//! Certain files carry a 4-byte checksum as the first word of their payload,
//! covering the remaining bytes. Whether a file does is decided per filename
//! extension and per filesystem generation; [`embeds_checksum`] is the single
//! source of truth consulted by file I/O, update and append.

use crc32fast::Hasher;

/// Extensions whose files never carry an embedded checksum word.
const PLAIN_EXTENSIONS: [&str; 6] = ["FMT", "ENV", "REV", "SND", "PRC", "INF"];

/// Checksum over a file's payload bytes (the bytes after the checksum word).
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Whether the first word of `name`'s data region is a checksum rather than
/// payload. `enabled` is the filesystem-wide flag; generations without
/// checksums force this false for every file.
pub fn embeds_checksum(name: &str, enabled: bool) -> bool {
    if !enabled {
        return false;
    }
    let upper = name.to_ascii_uppercase();
    match upper.rsplit_once('.') {
        Some((_, ext)) => !PLAIN_EXTENSIONS.contains(&ext),
        None => true,
    }
}
