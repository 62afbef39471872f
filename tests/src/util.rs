#![cfg(test)]
use std::fs;
use std::path::{Path, PathBuf};

use isoseed_common::config::Config;
use isoseed_core::pipeline::toolchain::{RepackJob, Toolchain};
use tempfile::TempDir;

/// Stands in for 7z and xorriso. Extraction lays down a skeleton of the
/// Debian installer tree; repacking writes a marker file at the output path.
pub struct FakeToolchain;

impl Toolchain for FakeToolchain {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        Some(Path::new("/usr/bin").join(program))
    }

    fn extract(&self, _iso: &Path, dest: &Path, log_file: &Path) -> anyhow::Result<()> {
        for (path, content) in [
            ("isolinux/isolinux.bin", "isolinux"),
            ("boot/grub/grub.cfg", "stock grub menu"),
            ("boot/grub/efi.img", "efi"),
            ("install.amd/vmlinuz", "kernel"),
            ("install.amd/initrd.gz", "initrd"),
            ("md5sum.txt", "stale sums"),
        ] {
            let target = dest.join(path);
            fs::create_dir_all(target.parent().unwrap_or(dest))?;
            fs::write(target, content)?;
        }
        fs::write(log_file, "Everything is Ok\n")?;
        Ok(())
    }

    fn repack(&self, job: &RepackJob<'_>) -> anyhow::Result<()> {
        fs::write(job.output_iso, format!("mastered from {}", job.source_dir.display()))?;
        fs::write(job.log_file, "ISO image produced\n")?;
        Ok(())
    }
}

/// A scratch root holding a stock ISO, an empty work dir and nothing else.
pub fn scratch() -> (TempDir, Config) {
    let root = tempfile::tempdir().unwrap();
    let iso = root.path().join("debian-12-netinst.iso");
    fs::write(&iso, "stock image").unwrap();

    let mut config = Config::new(iso);
    config.work_dir = root.path().join("tmp");
    config.output_iso = root.path().join("custom.iso");
    config.log_dir = root.path().join("log");
    fs::create_dir(&config.work_dir).unwrap();

    (root, config)
}

/// The seven answers of one collection round, in the order they are asked.
pub fn round(base: &str, first_ip: &str, count: &str) -> Vec<String> {
    [base, first_ip, "", "", "", "", count]
        .into_iter()
        .map(String::from)
        .collect()
}
