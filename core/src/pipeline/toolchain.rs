//! The external programs the pipeline shells out to.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, bail};
use tracing::debug;

pub const SEVEN_ZIP: &str = "7z";
pub const XORRISO: &str = "xorriso";

/// Programs that must be on `PATH` before a build starts.
pub const REQUIRED_COMMANDS: [&str; 2] = [SEVEN_ZIP, XORRISO];

/// Lines of a failing tool's log repeated in the error message.
const LOG_TAIL_LINES: usize = 10;

/// Everything `xorriso` needs to master the final image.
#[derive(Debug, Clone, Copy)]
pub struct RepackJob<'a> {
    pub source_dir: &'a Path,
    pub output_iso: &'a Path,
    /// Path of the EFI boot image relative to `source_dir`.
    pub efi_image: &'a Path,
    pub isohybrid_mbr: &'a Path,
    pub log_file: &'a Path,
}

pub trait Toolchain {
    /// Resolves `program` to an executable, if one is installed.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Unpacks `iso` into `dest`, sending the tool's output to `log_file`.
    fn extract(&self, iso: &Path, dest: &Path, log_file: &Path) -> anyhow::Result<()>;

    fn repack(&self, job: &RepackJob<'_>) -> anyhow::Result<()>;
}

impl<T: Toolchain + ?Sized> Toolchain for &T {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        (**self).locate(program)
    }

    fn extract(&self, iso: &Path, dest: &Path, log_file: &Path) -> anyhow::Result<()> {
        (**self).extract(iso, dest, log_file)
    }

    fn repack(&self, job: &RepackJob<'_>) -> anyhow::Result<()> {
        (**self).repack(job)
    }
}

/// Runs the real `7z` and `xorriso` binaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemToolchain;

impl Toolchain for SystemToolchain {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        find_in_path(program, &env::var_os("PATH")?)
    }

    fn extract(&self, iso: &Path, dest: &Path, log_file: &Path) -> anyhow::Result<()> {
        let mut command = Command::new(SEVEN_ZIP);
        command.args(seven_zip_args(iso, dest));
        run_logged(command, log_file)
    }

    fn repack(&self, job: &RepackJob<'_>) -> anyhow::Result<()> {
        let mut command = Command::new(XORRISO);
        command.args(xorriso_args(job));
        run_logged(command, job.log_file)
    }
}

pub fn seven_zip_args(iso: &Path, dest: &Path) -> Vec<OsString> {
    let mut output_flag = OsString::from("-o");
    output_flag.push(dest);
    vec!["x".into(), output_flag, iso.into()]
}

/// Hybrid BIOS/EFI mastering flags matching the layout of the Debian installer ISO.
pub fn xorriso_args(job: &RepackJob<'_>) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    args.extend(["-as", "mkisofs", "-o"].map(OsString::from));
    args.push(job.output_iso.into());
    args.extend(["-r", "-J", "-isohybrid-mbr"].map(OsString::from));
    args.push(job.isohybrid_mbr.into());
    args.extend(
        [
            "-partition_offset",
            "16",
            "-eltorito-boot",
            "isolinux/isolinux.bin",
            "-eltorito-catalog",
            "isolinux/boot.cat",
            "-no-emul-boot",
            "-boot-load-size",
            "4",
            "-boot-info-table",
            "-eltorito-alt-boot",
            "-e",
        ]
        .map(OsString::from),
    );
    args.push(job.efi_image.into());
    args.extend(["-no-emul-boot", "-isohybrid-gpt-basdat"].map(OsString::from));
    args.push(job.source_dir.into());
    args
}

/// Searches each directory of a `PATH`-style list for an executable `program`.
pub fn find_in_path(program: &str, path: &OsStr) -> Option<PathBuf> {
    env::split_paths(path)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn run_logged(mut command: Command, log_file: &Path) -> anyhow::Result<()> {
    let program = command.get_program().to_string_lossy().into_owned();
    let log = File::create(log_file)
        .with_context(|| format!("creating log file {}", log_file.display()))?;
    let log_err = log.try_clone()?;

    debug!("Running {:?}, output in {}", command, log_file.display());
    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(log_err))
        .status()
        .with_context(|| format!("failed to start {program}"))?;

    if !status.success() {
        bail!(
            "{program} exited with {status} (log: {})\n{}",
            log_file.display(),
            log_tail(log_file, LOG_TAIL_LINES)
        );
    }
    Ok(())
}

fn log_tail(log_file: &Path, lines: usize) -> String {
    let Ok(content) = fs::read_to_string(log_file) else {
        return String::new();
    };
    let all: Vec<&str> = content.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
