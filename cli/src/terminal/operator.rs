use std::io::{self, BufRead, Write};

use colored::*;
use isoseed_core::hosts::HostList;
use isoseed_core::prompt::{Notice, Operator, Question};
use tracing::{info, warn};

use crate::mprint;
use crate::terminal::{colors, format, print};

/// Answers questions from a line-based reader, usually the controlling terminal.
pub struct TerminalOperator<R, W> {
    input: R,
    output: W,
}

impl TerminalOperator<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Operator for TerminalOperator<R, W> {
    fn ask(&mut self, question: &Question) -> io::Result<Option<String>> {
        write!(self.output, "{}", question.to_string().color(colors::PRIMARY))?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn review(&mut self, hosts: &HostList) {
        show_host_list(hosts);
    }

    fn notify(&mut self, notice: &Notice) {
        match notice {
            Notice::Rejected(err) => {
                warn!("{err}");
                warn!("Please enter the settings again");
            }
            Notice::Restarting => info!("Starting over"),
            Notice::InvalidResponse(answer) => {
                warn!("Invalid response '{answer}'. Please enter 'y', 'n' or 'q'.")
            }
            Notice::Confirmed => info!("Settings confirmed"),
            Notice::Cancelled => warn!("Cancelled, no ISO was built"),
        }
    }
}

/// Prints every record as a tree followed by the settings they share.
pub fn show_host_list(hosts: &HostList) {
    mprint!();
    print::header("servers");
    for (idx, record) in hosts.iter().enumerate() {
        print::tree_head(idx + 1, &record.name);
        print::as_tree_one_level(&format::record_to_details(record));
    }

    print::header("network");
    print::aligned_block(&format::network_to_details(hosts));
    print::fat_separator();
    print::centerln(&format!("{} generated", format::host_count(hosts.len())));
    mprint!();
}
