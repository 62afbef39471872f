//! Line-oriented output routed through `tracing`, so it shares the spinner-aware
//! writer with log events.

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::format::Detail;
use crate::terminal::{colors, logging::PRINT_TARGET};

pub const TOTAL_WIDTH: usize = 64;

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

/// `───⟦ MSG ⟧───` centred in [`TOTAL_WIDTH`] columns.
pub fn header(msg: &str) {
    let title = format!("⟦ {} ⟧", msg.to_uppercase());
    let dashes = TOTAL_WIDTH.saturating_sub(title.width());
    let left = "─".repeat(dashes / 2);
    let right = "─".repeat(dashes - dashes / 2);

    print(&format!(
        "{}{}{}",
        left.color(colors::SEPARATOR),
        title.bright_green(),
        right.color(colors::SEPARATOR)
    ));
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string());
}

/// `> Key....: value` lines whose colons line up across the whole block.
pub fn aligned_block(details: &[Detail]) {
    let width = key_width(details);
    for (key, value) in details {
        let prefix = ">".color(colors::SEPARATOR);
        print(&format!(
            "{} {}{} {}",
            prefix,
            key.color(colors::PRIMARY),
            leader(key, width),
            value
        ));
    }
}

/// `[idx] name` heading a group printed by [`as_tree_one_level`].
pub fn tree_head(idx: usize, name: &str) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    ));
}

pub fn as_tree_one_level(details: &[Detail]) {
    let width = key_width(details);
    for (i, (key, value)) in details.iter().enumerate() {
        let branch = if i + 1 == details.len() { "└─" } else { "├─" };
        print(&format!(
            " {} {}{} {}",
            branch.color(colors::SEPARATOR),
            key.color(colors::TEXT_DEFAULT),
            leader(key, width),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{space}{msg}{space}"));
}

pub fn end_of_program() {
    fat_separator();
}

fn key_width(details: &[Detail]) -> usize {
    details.iter().map(|(key, _)| key.width()).max().unwrap_or(0)
}

/// Dots from the end of `key` to one past the widest key, then the colon.
fn leader(key: &str, width: usize) -> String {
    let dots = ".".repeat(width + 1 - key.width().min(width));
    format!("{dots}:").color(colors::SEPARATOR).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leader_aligns_colons() {
        colored::control::set_override(false);
        assert_eq!(leader("DNS", 7), ".....:");
        assert_eq!(leader("Gateway", 7), ".:");
    }

    #[test]
    fn test_key_width_uses_widest_key() {
        let details: Vec<Detail> = vec![
            (String::from("IPv4"), "10.0.0.1".normal()),
            (String::from("Config"), "preseed-web01.cfg".normal()),
        ];
        assert_eq!(key_width(&details), 6);
        assert_eq!(key_width(&[]), 0);
    }
}
