//! Import-manifest parsing.
//!
//! Line-oriented text listing files to push into an image. `#` starts a
//! comment, lines are whitespace-trimmed, `[update]` and `[append]` switch
//! sections, and every other non-empty line is a source path whose basename
//! is the on-disk filename.

use crate::error::{BlitzError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One file to import: the on-disk name and the host directory holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    pub name: String,
    pub dir: PathBuf,
}

impl ImportFile {
    fn from_line(line: &str) -> Self {
        let path = Path::new(line);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| line.to_string());
        let dir = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        ImportFile { name, dir }
    }

    /// Host path of the source file.
    pub fn source_path(&self) -> PathBuf {
        if self.dir.as_os_str().is_empty() {
            PathBuf::from(&self.name)
        } else {
            self.dir.join(&self.name)
        }
    }
}

/// Parsed manifest, in file order per section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Imports {
    pub update: Vec<ImportFile>,
    pub append: Vec<ImportFile>,
}

enum Section {
    None,
    Update,
    Append,
}

/// Parse a manifest from any line source.
pub fn parse_manifest<R: BufRead>(reader: R) -> Result<Imports> {
    let mut imports = Imports::default();
    let mut section = Section::None;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let text = match line.split_once('#') {
            Some((before, _)) => before,
            None => line.as_str(),
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        if text.starts_with('[') {
            section = match text {
                "[update]" => Section::Update,
                "[append]" => Section::Append,
                _ => {
                    return Err(BlitzError::BadSection {
                        line: lineno + 1,
                        text: text.to_string(),
                    })
                }
            };
            continue;
        }

        match section {
            Section::Update => imports.update.push(ImportFile::from_line(text)),
            Section::Append => imports.append.push(ImportFile::from_line(text)),
            Section::None => {}
        }
    }

    Ok(imports)
}

/// Parse the manifest file at `path`.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Imports> {
    let file = File::open(path)?;
    parse_manifest(BufReader::new(file))
}
