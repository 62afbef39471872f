#![cfg(test)]
use std::net::Ipv4Addr;

use isoseed_common::config::NetworkDefaults;
use isoseed_core::hosts::HostListError;
use isoseed_core::prompt::scripted::ScriptedOperator;
use isoseed_core::prompt::{Field, HostPrompt, Notice, PromptOutcome, PromptState};
use isoseed_core::render::TemplateSet;

use crate::util::round;

/// An overflowing first attempt, a valid list that gets a typo and a "n",
/// then a second list that is confirmed.
#[test]
fn operator_recovers_from_every_mistake() {
    let defaults = NetworkDefaults::default();
    let mut script = round("web", "10.0.0.250", "6");
    script.extend(round("web", "10.0.0.250", "5"));
    script.extend(["x".to_string(), "n".to_string()]);
    script.extend(round("db", "192.168.10.20", "3"));
    script.push("Y".to_string());
    let mut operator = ScriptedOperator::new(script);

    let outcome = HostPrompt::new(&mut operator, &defaults).run().unwrap();

    let PromptOutcome::Confirmed(hosts) = outcome else {
        panic!("expected the second list to be confirmed");
    };
    let names: Vec<&str> = hosts.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, ["db01", "db02", "db03"]);
    assert_eq!(hosts.network().gateway, Ipv4Addr::new(192, 168, 10, 1));

    assert_eq!(
        operator.notices,
        [
            Notice::Rejected(HostListError::AddressOverflow {
                first_ip: Ipv4Addr::new(10, 0, 0, 250),
                count: 6,
            }),
            Notice::InvalidResponse("x".to_string()),
            Notice::Restarting,
            Notice::Confirmed,
        ]
    );
    assert_eq!(operator.reviewed.len(), 2);
    assert_eq!(operator.reviewed[0].len(), 5);
    assert_eq!(operator.remaining(), 0);

    let confirmations = operator
        .questions
        .iter()
        .filter(|q| q.field == Field::Confirm)
        .count();
    assert_eq!(confirmations, 3);
}

#[test]
fn quitting_leaves_nothing_to_build() {
    let defaults = NetworkDefaults::default();
    let mut script = round("web", "10.0.0.10", "2");
    script.push("q".to_string());
    let mut operator = ScriptedOperator::new(script);

    let mut prompt = HostPrompt::new(&mut operator, &defaults);
    while !prompt.state().is_terminal() {
        prompt.step().unwrap();
    }
    assert_eq!(*prompt.state(), PromptState::Cancelled);
    assert_eq!(operator.notices.last(), Some(&Notice::Cancelled));
}

#[test]
fn confirmed_list_renders_one_preseed_per_host() {
    let defaults = NetworkDefaults {
        netmask: "255.255.0.0".to_string(),
        domain: "corp.example".to_string(),
    };
    let mut script = round("app", "172.16.4.100", "4");
    script.push("y".to_string());
    let mut operator = ScriptedOperator::new(script);

    let PromptOutcome::Confirmed(hosts) = HostPrompt::new(&mut operator, &defaults).run().unwrap()
    else {
        panic!("expected a confirmed list");
    };

    let templates = TemplateSet::builtin().unwrap();
    for record in &hosts {
        let preseed = templates.render_preseed(record).unwrap();
        assert!(preseed.contains(&format!("d-i netcfg/get_ipaddress string {}\n", record.ip)));
        assert!(preseed.contains("d-i netcfg/get_netmask string 255.255.0.0\n"));
        assert!(preseed.contains("d-i netcfg/get_domain string corp.example\n"));
    }

    let menu = templates.render_boot_menu(&hosts).unwrap();
    assert_eq!(menu.matches("menuentry \"Install app").count(), 4);
    assert!(menu.contains("Install app04 (172.16.4.103)"));
}
