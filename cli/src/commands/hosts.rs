use std::path::Path;

use isoseed_core::hosts::{self, HostList, HostListRequest};
use isoseed_core::pipeline;
use isoseed_core::render::TemplateSet;
use tracing::info;

use crate::commands::HostsArgs;
use crate::terminal::operator::show_host_list;

pub fn hosts(args: HostsArgs) -> anyhow::Result<()> {
    let list = generate(&args)?;
    show_host_list(&list);

    if let Some(dir) = &args.render {
        let templates = TemplateSet::load(args.templates.as_deref())?;
        render(&templates, &list, dir)?;
    }
    Ok(())
}

fn generate(args: &HostsArgs) -> anyhow::Result<HostList> {
    let count = HostListRequest::parse_count(&args.count)?;
    let request = HostListRequest {
        base_name: args.base_name.clone(),
        first_ip: args.first_ip.clone(),
        gateway: args.gateway.clone(),
        netmask: args.netmask.clone(),
        dns: args.dns.clone(),
        domain: args.domain.clone(),
        count,
    };
    Ok(hosts::generate(&request)?)
}

/// Lays the files out the way they end up inside the ISO.
fn render(templates: &TemplateSet, list: &HostList, dir: &Path) -> anyhow::Result<()> {
    let preseeds = templates.write_preseeds(list, &dir.join(pipeline::PRESEED_DIR))?;
    for path in &preseeds {
        info!("Config file written to '{}'", path.display());
    }

    let menu = pipeline::boot_menu_path(dir);
    templates.write_boot_menu(list, &menu)?;
    info!("Boot menu written to '{}'", menu.display());
    Ok(())
}
