//! Checks run before the operator is asked anything, so a doomed build fails fast.

use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow, bail};
use isoseed_common::config::Config;
use tracing::debug;

use super::toolchain::{REQUIRED_COMMANDS, Toolchain};

pub fn run(config: &Config, toolchain: &impl Toolchain) -> anyhow::Result<()> {
    check_stock_iso(&config.stock_iso)?;
    check_empty_dir(&config.work_dir)?;
    check_output_location(&config.output_iso, &config.work_dir)?;
    check_commands(toolchain)?;

    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("creating log directory {}", config.log_dir.display()))?;
    Ok(())
}

/// The stock ISO must be a regular file or a symlink to one.
pub fn check_stock_iso(path: &Path) -> anyhow::Result<()> {
    debug!("Stock ISO is: {}", path.display());

    let link = fs::symlink_metadata(path)
        .with_context(|| format!("stock ISO '{}' does not exist", path.display()))?;
    let target = fs::metadata(path)
        .with_context(|| format!("stock ISO '{}' is a dangling symlink", path.display()))?;

    if !target.is_file() {
        bail!(
            "stock ISO '{}' must be a regular file or a symlink to one",
            path.display()
        );
    }
    if link.file_type().is_symlink() {
        debug!("'{}' is a symlink to a regular file", path.display());
    } else {
        debug!("'{}' is a regular file", path.display());
    }
    Ok(())
}

/// The work directory must exist and be empty; extraction never merges into old content.
pub fn check_empty_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.is_dir() {
        bail!("work directory '{}' does not exist", dir.display());
    }
    let mut entries = fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?;
    if entries.next().is_some() {
        bail!("work directory '{}' is not empty", dir.display());
    }
    debug!("{} is empty", dir.display());
    Ok(())
}

/// The output image cannot live inside the tree it is mastered from.
pub fn check_output_location(output_iso: &Path, work_dir: &Path) -> anyhow::Result<()> {
    let work_dir = fs::canonicalize(work_dir)
        .with_context(|| format!("resolving {}", work_dir.display()))?;
    let parent = match output_iso.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = fs::canonicalize(parent)
        .with_context(|| format!("output directory '{}' does not exist", parent.display()))?;

    if parent.starts_with(&work_dir) {
        bail!(
            "output ISO '{}' must not be inside the work directory",
            output_iso.display()
        );
    }
    Ok(())
}

pub fn check_commands(toolchain: &impl Toolchain) -> anyhow::Result<()> {
    for program in REQUIRED_COMMANDS {
        let found = toolchain.locate(program).ok_or_else(|| {
            anyhow!(
                "'{program}' command is required but not found. \
                 Please install it before proceeding."
            )
        })?;
        debug!("Found {program} at {}", found.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::pipeline::toolchain::RepackJob;

    struct Installed(&'static [&'static str]);

    impl Toolchain for Installed {
        fn locate(&self, program: &str) -> Option<PathBuf> {
            self.0
                .contains(&program)
                .then(|| PathBuf::from("/usr/bin").join(program))
        }

        fn extract(&self, _: &Path, _: &Path, _: &Path) -> anyhow::Result<()> {
            unreachable!("preflight never extracts")
        }

        fn repack(&self, _: &RepackJob<'_>) -> anyhow::Result<()> {
            unreachable!("preflight never repacks")
        }
    }

    #[test]
    fn test_stock_iso_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let iso = dir.path().join("debian.iso");
        fs::write(&iso, b"iso").unwrap();
        assert!(check_stock_iso(&iso).is_ok());
    }

    #[test]
    fn test_stock_iso_missing_or_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_stock_iso(&dir.path().join("nope.iso")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));

        let err = check_stock_iso(dir.path()).unwrap_err();
        assert!(err.to_string().contains("must be a regular file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stock_iso_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let iso = dir.path().join("debian.iso");
        fs::write(&iso, b"iso").unwrap();
        let link = dir.path().join("current.iso");
        std::os::unix::fs::symlink(&iso, &link).unwrap();
        assert!(check_stock_iso(&link).is_ok());

        let dangling = dir.path().join("dangling.iso");
        std::os::unix::fs::symlink(dir.path().join("gone.iso"), &dangling).unwrap();
        assert!(check_stock_iso(&dangling).is_err());
    }

    #[test]
    fn test_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_empty_dir(dir.path()).is_ok());

        fs::write(dir.path().join("leftover"), "").unwrap();
        let err = check_empty_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("is not empty"));

        let err = check_empty_dir(&dir.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_output_inside_work_dir_rejected() {
        let root = tempfile::tempdir().unwrap();
        let work = root.path().join("tmp");
        fs::create_dir(&work).unwrap();

        assert!(check_output_location(&root.path().join("custom.iso"), &work).is_ok());
        assert!(check_output_location(&work.join("custom.iso"), &work).is_err());
        assert!(check_output_location(&root.path().join("missing/custom.iso"), &work).is_err());
    }

    #[test]
    fn test_missing_command() {
        assert!(check_commands(&Installed(&["7z", "xorriso"])).is_ok());

        let err = check_commands(&Installed(&["7z"])).unwrap_err();
        assert!(err.to_string().contains("'xorriso' command is required"));
    }
}
