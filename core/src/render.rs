//! # Config Rendering
//!
//! Turns a confirmed [`HostList`] into the files injected into the ISO: one
//! preseed per host and a GRUB menu listing every host.
//!
//! Templates are MiniJinja. The built-in pair ships inside the binary; a
//! directory containing `preseed.cfg.j2` and `grub.cfg.j2` replaces both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use minijinja::{Environment, UndefinedBehavior, path_loader};
use serde::Serialize;
use tracing::debug;

use crate::hosts::{HostList, HostRecord};

pub const PRESEED_TEMPLATE: &str = "preseed.cfg.j2";
pub const BOOT_MENU_TEMPLATE: &str = "grub.cfg.j2";

const BUILTIN_PRESEED: &str = include_str!("../templates/preseed.cfg.j2");
const BUILTIN_BOOT_MENU: &str = include_str!("../templates/grub.cfg.j2");

#[derive(Debug, Serialize)]
struct PreseedContext<'a> {
    host_hostname: &'a str,
    host_ip: String,
    host_gateway: String,
    host_netmask: String,
    host_dns: String,
    host_domain: &'a str,
}

impl<'a> From<&'a HostRecord> for PreseedContext<'a> {
    fn from(record: &'a HostRecord) -> Self {
        Self {
            host_hostname: &record.name,
            host_ip: record.ip.to_string(),
            host_gateway: record.gateway.to_string(),
            host_netmask: record.netmask.to_string(),
            host_dns: record.dns.to_string(),
            host_domain: &record.domain,
        }
    }
}

/// One `server_list` entry as seen by the boot menu template.
#[derive(Debug, Serialize)]
struct MenuEntry<'a> {
    name: &'a str,
    ip: String,
    gateway: String,
    netmask: String,
    dns: String,
    domain: &'a str,
    config: &'a str,
}

impl<'a> From<&'a HostRecord> for MenuEntry<'a> {
    fn from(record: &'a HostRecord) -> Self {
        Self {
            name: &record.name,
            ip: record.ip.to_string(),
            gateway: record.gateway.to_string(),
            netmask: record.netmask.to_string(),
            dns: record.dns.to_string(),
            domain: &record.domain,
            config: &record.config_filename,
        }
    }
}

#[derive(Debug, Serialize)]
struct BootMenuContext<'a> {
    server_list: Vec<MenuEntry<'a>>,
}

pub struct TemplateSet {
    env: Environment<'static>,
}

impl TemplateSet {
    /// Uses the templates in `dir` when given, the built-in ones otherwise.
    pub fn load(dir: Option<&Path>) -> anyhow::Result<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }

    pub fn builtin() -> anyhow::Result<Self> {
        let mut env = new_environment();
        env.add_template(PRESEED_TEMPLATE, BUILTIN_PRESEED)
            .context("compiling built-in preseed template")?;
        env.add_template(BOOT_MENU_TEMPLATE, BUILTIN_BOOT_MENU)
            .context("compiling built-in boot menu template")?;
        Ok(Self { env })
    }

    pub fn from_dir(dir: &Path) -> anyhow::Result<Self> {
        if !dir.is_dir() {
            bail!("template directory '{}' does not exist", dir.display());
        }
        let mut env = new_environment();
        env.set_loader(path_loader(dir));

        // Surface a missing or broken template now instead of halfway through the build.
        for name in [PRESEED_TEMPLATE, BOOT_MENU_TEMPLATE] {
            env.get_template(name)
                .with_context(|| format!("loading template '{}' from {}", name, dir.display()))?;
        }
        debug!("Using templates from {}", dir.display());
        Ok(Self { env })
    }

    pub fn render_preseed(&self, record: &HostRecord) -> anyhow::Result<String> {
        let template = self.env.get_template(PRESEED_TEMPLATE)?;
        template
            .render(PreseedContext::from(record))
            .with_context(|| format!("rendering preseed for {}", record.name))
    }

    pub fn render_boot_menu(&self, hosts: &HostList) -> anyhow::Result<String> {
        let template = self.env.get_template(BOOT_MENU_TEMPLATE)?;
        let context = BootMenuContext {
            server_list: hosts.iter().map(MenuEntry::from).collect(),
        };
        template.render(context).context("rendering boot menu")
    }

    /// Writes `preseed-<name>.cfg` for every host into `dir`, creating it if needed.
    ///
    /// Returns the written paths in host order.
    pub fn write_preseeds(&self, hosts: &HostList, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating preseed directory {}", dir.display()))?;

        let mut written = Vec::with_capacity(hosts.len());
        for record in hosts {
            let rendered = self.render_preseed(record)?;
            let path = dir.join(&record.config_filename);
            debug!("Writing {} to {}", record.config_filename, path.display());
            fs::write(&path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }

    pub fn write_boot_menu(&self, hosts: &HostList, path: &Path) -> anyhow::Result<()> {
        let rendered = self.render_boot_menu(hosts)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        debug!("Writing boot menu to {}", path.display());
        fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))
    }
}

fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosts::{HostListRequest, generate};

    fn hosts() -> HostList {
        generate(&HostListRequest::new("web", "10.0.0.10", 3).with_domain("lab.example")).unwrap()
    }

    #[test]
    fn test_builtin_preseed_carries_host_network() {
        let templates = TemplateSet::builtin().unwrap();
        let hosts = hosts();
        let rendered = templates.render_preseed(&hosts.records()[1]).unwrap();

        assert!(rendered.contains("d-i netcfg/get_ipaddress string 10.0.0.11\n"));
        assert!(rendered.contains("d-i netcfg/get_netmask string 255.255.255.0\n"));
        assert!(rendered.contains("d-i netcfg/get_gateway string 10.0.0.1\n"));
        assert!(rendered.contains("d-i netcfg/get_nameservers string 10.0.0.1\n"));
        assert!(rendered.contains("d-i netcfg/get_hostname string web02\n"));
        assert!(rendered.contains("d-i netcfg/get_domain string lab.example\n"));
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn test_builtin_boot_menu_lists_hosts_in_order() {
        let templates = TemplateSet::builtin().unwrap();
        let rendered = templates.render_boot_menu(&hosts()).unwrap();

        let positions: Vec<usize> = ["web01", "web02", "web03"]
            .iter()
            .map(|name| rendered.find(&format!("Install {name} (")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(rendered.contains("preseed/file=/cdrom/preseed/preseed-web03.cfg"));
        assert!(rendered.contains("menuentry \"Manual install\""));
    }

    #[test]
    fn test_custom_template_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PRESEED_TEMPLATE), "{{ host_hostname }}={{ host_ip }}").unwrap();
        fs::write(
            dir.path().join(BOOT_MENU_TEMPLATE),
            "{% for s in server_list %}{{ s.name }}:{{ s.config }};{% endfor %}",
        )
        .unwrap();

        let templates = TemplateSet::load(Some(dir.path())).unwrap();
        let hosts = hosts();

        assert_eq!(templates.render_preseed(&hosts.records()[0]).unwrap(), "web01=10.0.0.10");
        assert_eq!(
            templates.render_boot_menu(&hosts).unwrap(),
            "web01:preseed-web01.cfg;web02:preseed-web02.cfg;web03:preseed-web03.cfg;"
        );
    }

    #[test]
    fn test_missing_template_in_dir_fails_early() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PRESEED_TEMPLATE), "{{ host_ip }}").unwrap();

        let err = TemplateSet::from_dir(dir.path()).err().unwrap();
        assert!(err.to_string().contains(BOOT_MENU_TEMPLATE));
    }

    #[test]
    fn test_unknown_variable_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PRESEED_TEMPLATE), "{{ host_password }}").unwrap();
        fs::write(dir.path().join(BOOT_MENU_TEMPLATE), "").unwrap();

        let templates = TemplateSet::from_dir(dir.path()).unwrap();
        assert!(templates.render_preseed(&hosts().records()[0]).is_err());
    }

    #[test]
    fn test_write_preseeds_and_menu() {
        let dir = tempfile::tempdir().unwrap();
        let templates = TemplateSet::builtin().unwrap();
        let hosts = hosts();

        let written = templates.write_preseeds(&hosts, &dir.path().join("preseed")).unwrap();
        assert_eq!(written.len(), 3);
        for (path, record) in written.iter().zip(&hosts) {
            assert_eq!(path.file_name().unwrap().to_str(), Some(record.config_filename.as_str()));
            assert!(fs::read_to_string(path).unwrap().contains(&record.ip.to_string()));
        }

        let menu = dir.path().join("boot/grub/grub.cfg");
        templates.write_boot_menu(&hosts, &menu).unwrap();
        assert!(fs::read_to_string(menu).unwrap().contains("Install web01 (10.0.0.10)"));
    }
}
