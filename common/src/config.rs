use std::path::PathBuf;

pub const DEFAULT_WORK_DIR: &str = "tmp";
pub const DEFAULT_OUTPUT_ISO: &str = "custom.iso";
pub const DEFAULT_LOG_DIR: &str = "log";
/// Location of the EFI boot image inside the extracted ISO tree.
pub const DEFAULT_EFI_IMAGE: &str = "boot/grub/efi.img";
pub const DEFAULT_ISOHYBRID_MBR: &str = "/usr/lib/ISOLINUX/isohdpfx.bin";
pub const DEFAULT_NETMASK: &str = "255.255.255.0";
pub const DEFAULT_DOMAIN: &str = "home.arpa";

/// Everything a single `isoseed build` run needs to know about its environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// The stock Debian installer image to customize.
    pub stock_iso: PathBuf,
    /// Scratch directory the ISO is extracted into. Must exist and be empty.
    pub work_dir: PathBuf,
    pub output_iso: PathBuf,
    /// Receives the output of every external tool invocation.
    pub log_dir: PathBuf,
    /// Directory holding `preseed.cfg.j2` and `grub.cfg.j2`.
    ///
    /// The built-in templates are used when this is `None`.
    pub templates_dir: Option<PathBuf>,
    pub efi_image: PathBuf,
    pub isohybrid_mbr: PathBuf,
    pub defaults: NetworkDefaults,
}

/// Values offered to the operator when an optional field is left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDefaults {
    pub netmask: String,
    pub domain: String,
}

impl Default for NetworkDefaults {
    fn default() -> Self {
        Self {
            netmask: DEFAULT_NETMASK.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }
}

impl Config {
    pub fn new(stock_iso: PathBuf) -> Self {
        Self {
            stock_iso,
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            output_iso: PathBuf::from(DEFAULT_OUTPUT_ISO),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            templates_dir: None,
            efi_image: PathBuf::from(DEFAULT_EFI_IMAGE),
            isohybrid_mbr: PathBuf::from(DEFAULT_ISOHYBRID_MBR),
            defaults: NetworkDefaults::default(),
        }
    }
}
