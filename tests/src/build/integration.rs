#![cfg(test)]
use std::fs;

use isoseed_core::hosts::{HostListRequest, generate};
use isoseed_core::pipeline::checksum::{CHECKSUM_FILE, md5_file};
use isoseed_core::pipeline::{IsoBuilder, Stage, preflight};
use isoseed_core::render::TemplateSet;

use crate::util::{FakeToolchain, scratch};

#[test]
fn build_bakes_every_host_into_the_image() {
    let (_root, config) = scratch();
    preflight::run(&config, &FakeToolchain).unwrap();
    assert!(config.log_dir.is_dir());

    let hosts = generate(&HostListRequest::new("web", "10.0.0.10", 3)).unwrap();
    let templates = TemplateSet::builtin().unwrap();

    let mut stages = Vec::new();
    let report = IsoBuilder::new(&config, &templates, FakeToolchain)
        .build(&hosts, |stage| stages.push(stage))
        .unwrap();

    assert_eq!(stages, Stage::ALL);
    assert_eq!(report.preseeds.len(), 3);
    assert!(config.output_iso.is_file());
    assert!(config.log_dir.join("7z.log").is_file());
    assert!(config.log_dir.join("xorriso.log").is_file());

    let menu = fs::read_to_string(&report.boot_menu).unwrap();
    assert!(menu.contains("preseed/file=/cdrom/preseed/preseed-web03.cfg"));

    // five stock files plus three preseeds, the old md5sum.txt excluded
    assert_eq!(report.checksummed_files, 8);
    let sums = fs::read_to_string(config.work_dir.join(CHECKSUM_FILE)).unwrap();
    assert_eq!(sums.lines().count(), 8);
    assert!(!sums.contains(CHECKSUM_FILE));
    for line in sums.lines() {
        let (digest, path) = line.split_once("  ./").unwrap();
        assert_eq!(digest, md5_file(&config.work_dir.join(path)).unwrap());
    }
}

#[test]
fn preflight_refuses_a_used_work_dir() {
    let (_root, config) = scratch();
    let hosts = generate(&HostListRequest::new("web", "10.0.0.10", 1)).unwrap();
    let templates = TemplateSet::builtin().unwrap();

    preflight::run(&config, &FakeToolchain).unwrap();
    IsoBuilder::new(&config, &templates, FakeToolchain)
        .build(&hosts, |_| {})
        .unwrap();

    let err = preflight::run(&config, &FakeToolchain).unwrap_err();
    assert!(err.to_string().contains("is not empty"));
}

#[test]
fn preflight_refuses_a_missing_iso() {
    let (_root, mut config) = scratch();
    config.stock_iso.set_file_name("missing.iso");

    let err = preflight::run(&config, &FakeToolchain).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(!config.log_dir.exists());
}
