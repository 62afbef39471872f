//! # ISO Pipeline
//!
//! Turns a confirmed [`HostList`] into a bootable image:
//!
//! 1. **Extract** the stock ISO into the (empty) work directory.
//! 2. **Inject** one preseed per host plus the GRUB menu.
//! 3. **Checksum** the tree into `md5sum.txt`.
//! 4. **Repack** the tree into the output ISO.
//!
//! Every stage runs to completion before the next one starts. The first failure
//! aborts the build; files already written are left in place.

pub mod checksum;
pub mod preflight;
pub mod toolchain;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use isoseed_common::config::Config;
use tracing::{debug, info};

use crate::hosts::HostList;
use crate::render::TemplateSet;
use toolchain::{RepackJob, Toolchain};

pub const PRESEED_DIR: &str = "preseed";
pub const BOOT_MENU_PATH: &str = "boot/grub/grub.cfg";
pub const EXTRACT_LOG: &str = "7z.log";
pub const REPACK_LOG: &str = "xorriso.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Inject,
    Checksum,
    Repack,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Extract, Stage::Inject, Stage::Checksum, Stage::Repack];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Extract => "Extracting ISO files",
            Stage::Inject => "Injecting preseed configs",
            Stage::Checksum => "Regenerating checksums",
            Stage::Repack => "Rebuilding ISO image",
        })
    }
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output_iso: PathBuf,
    pub preseeds: Vec<PathBuf>,
    pub boot_menu: PathBuf,
    pub checksummed_files: usize,
}

pub struct IsoBuilder<'a, T: Toolchain> {
    config: &'a Config,
    templates: &'a TemplateSet,
    toolchain: T,
}

impl<'a, T: Toolchain> IsoBuilder<'a, T> {
    pub fn new(config: &'a Config, templates: &'a TemplateSet, toolchain: T) -> Self {
        Self {
            config,
            templates,
            toolchain,
        }
    }

    /// Runs every stage in order, calling `on_stage` as each one begins.
    ///
    /// Assumes [`preflight::run`] already passed for the same config.
    pub fn build(
        &self,
        hosts: &HostList,
        mut on_stage: impl FnMut(Stage),
    ) -> anyhow::Result<BuildReport> {
        on_stage(Stage::Extract);
        self.extract()?;

        on_stage(Stage::Inject);
        let preseeds = self.inject(hosts)?;

        on_stage(Stage::Checksum);
        let checksummed_files = self.checksum()?;

        on_stage(Stage::Repack);
        self.repack()?;

        info!("Preseed ISO can be found at '{}'", self.config.output_iso.display());
        Ok(BuildReport {
            output_iso: self.config.output_iso.clone(),
            preseeds,
            boot_menu: self.boot_menu_path(),
            checksummed_files,
        })
    }

    pub fn extract(&self) -> anyhow::Result<()> {
        debug!("Extracting ISO files");
        self.toolchain
            .extract(
                &self.config.stock_iso,
                &self.config.work_dir,
                &self.config.log_dir.join(EXTRACT_LOG),
            )
            .context("extracting ISO")?;
        debug!("Finished extracting ISO files");
        Ok(())
    }

    /// Writes the preseeds and the boot menu into the extracted tree.
    pub fn inject(&self, hosts: &HostList) -> anyhow::Result<Vec<PathBuf>> {
        let preseeds = self
            .templates
            .write_preseeds(hosts, &self.config.work_dir.join(PRESEED_DIR))
            .context("injecting preseed configs")?;
        for (record, path) in hosts.iter().zip(&preseeds) {
            info!("Config file '{}' written to '{}'", record.name, path.display());
        }

        self.templates
            .write_boot_menu(hosts, &self.boot_menu_path())
            .context("injecting boot menu")?;
        debug!("Grub config file written");
        Ok(preseeds)
    }

    pub fn checksum(&self) -> anyhow::Result<usize> {
        checksum::write_md5sums(&self.config.work_dir).context("regenerating md5sums")
    }

    pub fn repack(&self) -> anyhow::Result<()> {
        let log_file = self.config.log_dir.join(REPACK_LOG);
        let job = RepackJob {
            source_dir: &self.config.work_dir,
            output_iso: &self.config.output_iso,
            efi_image: &self.config.efi_image,
            isohybrid_mbr: &self.config.isohybrid_mbr,
            log_file: &log_file,
        };
        self.toolchain.repack(&job).context("rebuilding ISO image")?;
        debug!("ISO image created");
        Ok(())
    }

    fn boot_menu_path(&self) -> PathBuf {
        boot_menu_path(&self.config.work_dir)
    }
}

pub fn boot_menu_path(work_dir: &Path) -> PathBuf {
    work_dir.join(BOOT_MENU_PATH)
}
