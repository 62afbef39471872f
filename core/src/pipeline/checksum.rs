//! Regenerates the installer's `md5sum.txt` after files were injected.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use md5::{Digest, Md5};
use tracing::debug;
use walkdir::WalkDir;

pub const CHECKSUM_FILE: &str = "md5sum.txt";

/// Hashes every regular file under `root` into `root/md5sum.txt`.
///
/// Lines read `<md5>  ./<relative/path>` in file-name order. The checksum file
/// itself is skipped. Returns the number of files listed.
pub fn write_md5sums(root: &Path) -> anyhow::Result<usize> {
    let mut listing = String::new();
    let mut count = 0;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root)?;
        if relative == Path::new(CHECKSUM_FILE) {
            continue;
        }

        let digest = md5_file(entry.path())
            .with_context(|| format!("hashing {}", entry.path().display()))?;
        let _ = writeln!(listing, "{}  ./{}", digest, slash_path(relative));
        count += 1;
    }

    let target = root.join(CHECKSUM_FILE);
    fs::write(&target, listing).with_context(|| format!("writing {}", target.display()))?;
    debug!("MD5 sums of {count} files written to {}", target.display());
    Ok(count)
}

pub fn md5_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

fn slash_path(relative: &Path) -> String {
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
