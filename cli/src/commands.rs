pub mod build;
pub mod hosts;

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};
use isoseed_common::config::{
    Config, DEFAULT_DOMAIN, DEFAULT_EFI_IMAGE, DEFAULT_ISOHYBRID_MBR, DEFAULT_LOG_DIR,
    DEFAULT_NETMASK, DEFAULT_OUTPUT_ISO, DEFAULT_WORK_DIR, NetworkDefaults,
};

#[derive(Parser)]
#[command(name = "isoseed")]
#[command(about = "Bakes per-server preseed configs into a Debian installer ISO.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug output. `DEBUG` accepts 1/yes/true, and 0/no/false/off to disable
    #[arg(
        short,
        long,
        global = true,
        env = "DEBUG",
        value_parser = FalseyValueParser::new()
    )]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prompt for a server list and build a customized ISO for it
    #[command(alias = "b")]
    Build(BuildArgs),
    /// Generate and show a server list without prompting or building
    #[command(alias = "h")]
    Hosts(HostsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Stock Debian installer ISO to customize
    #[arg(long, env = "STOCK_ISO")]
    pub stock_iso: PathBuf,

    /// Empty directory the ISO is extracted into
    #[arg(long, default_value = DEFAULT_WORK_DIR)]
    pub work_dir: PathBuf,

    /// Where to write the customized ISO
    #[arg(short, long, default_value = DEFAULT_OUTPUT_ISO)]
    pub output: PathBuf,

    /// Directory for 7z and xorriso logs
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Directory holding preseed.cfg.j2 and grub.cfg.j2
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// EFI boot image, relative to the ISO root
    #[arg(long, default_value = DEFAULT_EFI_IMAGE)]
    pub efi_image: PathBuf,

    /// isohybrid MBR template passed to xorriso
    #[arg(long, default_value = DEFAULT_ISOHYBRID_MBR)]
    pub isohybrid_mbr: PathBuf,

    /// Netmask offered as the default at the prompt
    #[arg(long, default_value = DEFAULT_NETMASK)]
    pub netmask: String,

    /// Domain offered as the default at the prompt
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    pub domain: String,
}

impl BuildArgs {
    pub fn into_config(self) -> Config {
        Config {
            stock_iso: self.stock_iso,
            work_dir: self.work_dir,
            output_iso: self.output,
            log_dir: self.log_dir,
            templates_dir: self.templates,
            efi_image: self.efi_image,
            isohybrid_mbr: self.isohybrid_mbr,
            defaults: NetworkDefaults {
                netmask: self.netmask,
                domain: self.domain,
            },
        }
    }
}

#[derive(Args)]
pub struct HostsArgs {
    /// Server names are this plus a two-digit sequence number
    #[arg(short, long)]
    pub base_name: String,

    /// Address of the first server
    #[arg(short, long)]
    pub first_ip: String,

    /// Number of servers
    #[arg(short, long)]
    pub count: String,

    /// Defaults to .1 in the first server's /24
    #[arg(long)]
    pub gateway: Option<String>,

    #[arg(long)]
    pub netmask: Option<String>,

    /// Defaults to the gateway
    #[arg(long)]
    pub dns: Option<String>,

    #[arg(long)]
    pub domain: Option<String>,

    /// Write the preseeds and grub.cfg into this directory
    #[arg(long)]
    pub render: Option<PathBuf>,

    /// Directory holding preseed.cfg.j2 and grub.cfg.j2
    #[arg(long)]
    pub templates: Option<PathBuf>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
