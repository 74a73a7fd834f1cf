//! BlitzFS command-line tool
//!
//! Inspect and modify the filesystem inside a raw Blitz arcade hard-disk
//! image.

use anyhow::{bail, Context};
use blitzfs::{BlitzFs, DiskImage, Timestamp};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "blitzfs")]
#[command(about = "Inspect and modify Blitz arcade hard-disk images", version)]
struct Args {
    /// Path to the raw disk image
    image: PathBuf,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Show information about the filesystem image
    Info,

    /// List files, optionally filtered by case-insensitive substrings
    List {
        /// Substrings to match against filenames
        patterns: Vec<String>,
    },

    /// Extract files from the image into a directory
    Extract {
        /// Output directory
        outdir: PathBuf,
        /// Files to extract
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Import files listed in a manifest ([update]/[append] sections)
    Import {
        /// Manifest path
        manifest: PathBuf,
    },

    /// Fix the AUDITS.FMT/ADJUST.FMT block collision in Blitz 2000 images
    Repair,
}

impl Action {
    fn needs_write(&self) -> bool {
        matches!(self, Action::Import { .. } | Action::Repair)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let image = if args.action.needs_write() {
        DiskImage::open_writable(&args.image)
    } else {
        DiskImage::open(&args.image)
    }
    .with_context(|| format!("failed to open image {}", args.image.display()))?;

    let mut fs = BlitzFs::new(image);
    fs.init().context("failed to initialize Blitz filesystem")?;

    match args.action {
        Action::Info => info(&fs),
        Action::List { patterns } => list(&mut fs, &patterns),
        Action::Extract { outdir, files } => extract(&mut fs, &outdir, &files),
        Action::Import { manifest } => import(&mut fs, &manifest),
        Action::Repair => repair(&mut fs),
    }
}

fn info(fs: &BlitzFs<DiskImage>) -> anyhow::Result<()> {
    let total = fs.total_size();
    let used = fs.used_size();

    println!("Disk size: {} bytes ({} MB)", total, total / 1024 / 1024);
    println!("Used size: {} bytes ({} MB)", used, used / 1024 / 1024);
    println!(
        "Free space: {:.2}%  ({} bytes free)",
        100.0 - (used as f64 / total as f64) * 100.0,
        total - used
    );
    println!();
    println!("Version: {}", fs.version().as_str());
    println!("{} files found", fs.entries().len());
    Ok(())
}

fn list(fs: &mut BlitzFs<DiskImage>, patterns: &[String]) -> anyhow::Result<()> {
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_ascii_uppercase()).collect();
    let entries = fs.entries().to_vec();
    let total = entries.len();

    println!("  TOC  EntryAddr   CKSUM       Filename            Timestamp         Block          Filesize");
    println!("----------------+---------+----------------+-----------------------+---------+-----------------------");

    let mut count = 0usize;
    for entry in &entries {
        if !patterns.is_empty() && !patterns.iter().any(|p| entry.name.contains(p)) {
            continue;
        }

        let cksum = match fs.read_checksum(&entry.name) {
            Ok(value) => format!("{value:08X}"),
            Err(_) => "        ".to_string(),
        };

        println!(
            "[{:2X},{:2X}] {:08X}: {}  {:<15}: {}, {:08X}, {:08X}\t({} bytes)",
            entry.meta.toc,
            entry.meta.index,
            entry.meta.addr,
            cksum,
            entry.name,
            Timestamp::unpack(entry.timestamp),
            entry.block,
            entry.filesize,
            entry.filesize * 4
        );
        count += 1;
    }

    println!();
    if count == total {
        println!("{total} file{}.", if total == 1 { "" } else { "s" });
    } else {
        println!(
            "{count} file{} found.  ({total} total file{})",
            if count == 1 { "" } else { "s" },
            if total == 1 { "" } else { "s" }
        );
    }
    Ok(())
}

fn extract(fs: &mut BlitzFs<DiskImage>, outdir: &Path, files: &[String]) -> anyhow::Result<()> {
    let mut failures = 0usize;
    for file in files {
        match fs.extract(file, outdir) {
            Ok(path) => println!("File extracted: {}", path.display()),
            Err(err) => {
                eprintln!("{err}");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("{failures} of {} files failed to extract", files.len());
    }
    Ok(())
}

fn import(fs: &mut BlitzFs<DiskImage>, manifest: &Path) -> anyhow::Result<()> {
    let imports = blitzfs::load_manifest(manifest)
        .with_context(|| format!("failed to parse manifest {}", manifest.display()))?;

    let mut failures = 0usize;

    if !imports.update.is_empty() {
        println!("Updating files:");
        for file in &imports.update {
            match fs.update(&file.name, &file.dir) {
                Ok(()) => println!(
                    "File updated: {:<15}  [{}]",
                    file.name,
                    file.source_path().display()
                ),
                Err(err) => {
                    eprintln!("{err}");
                    failures += 1;
                }
            }
        }
    }

    if !imports.append.is_empty() {
        fs.prepare_append()
            .context("failed to prepare filesystem to append files")?;

        println!("Appending files:");
        for file in &imports.append {
            match fs.append(&file.name, &file.dir) {
                Ok(()) => println!(
                    "File appended: {:<15}  [{}]",
                    file.name,
                    file.source_path().display()
                ),
                Err(err) => {
                    eprintln!("{err}");
                    failures += 1;
                }
            }
        }
    }

    if failures > 0 {
        bail!("{failures} import operations failed");
    }
    Ok(())
}

fn repair(fs: &mut BlitzFs<DiskImage>) -> anyhow::Result<()> {
    fs.repair().context("FILE SYSTEM REPAIRED: FAILED")?;
    println!("FILE SYSTEM REPAIRED: OK");
    Ok(())
}
