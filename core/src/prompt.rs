//! # Interactive Host Prompt
//!
//! Drives the operator through collecting the generation parameters, reviewing
//! the resulting [`HostList`], and confirming, redoing or quitting.
//!
//! ```text
//!             generate ok                 "y"
//! Collecting ────────────▶ Reviewing ──────────▶ Confirmed
//!   ▲    │ error               │  │ "q"
//!   │    └──▶ (re-ask all)     │  └────────────▶ Cancelled
//!   └──────────────────────────┘ "n"
//! ```
//!
//! The prompt never touches a terminal itself. Everything goes through an
//! [`Operator`], so the same state machine runs against a TTY, a scripted test
//! harness, or any other front end.

pub mod scripted;

use std::fmt;
use std::io;

use isoseed_common::config::NetworkDefaults;
use isoseed_common::network::ipv4;
use thiserror::Error;
use tracing::debug;

use crate::hosts::{self, HostList, HostListError, HostListRequest};

/// The questions the prompt can ask, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    BaseName,
    FirstIp,
    Gateway,
    Netmask,
    Dns,
    Domain,
    Count,
    Confirm,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::BaseName => "Enter the base name for the servers",
            Field::FirstIp => "Enter the first IP address",
            Field::Gateway => "Enter the gateway",
            Field::Netmask => "Enter the netmask",
            Field::Dns => "Enter the name server",
            Field::Domain => "Enter the domain",
            Field::Count => "Enter the number of servers",
            Field::Confirm => "Confirm these settings? (y/n/q)",
        }
    }
}

/// A single question put to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub field: Field,
    /// Value used when the operator answers with an empty line.
    pub default: Option<String>,
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.default {
            Some(default) => write!(f, "{} (default: {}): ", self.field.label(), default),
            None => write!(f, "{}: ", self.field.label()),
        }
    }
}

/// Things the prompt tells the operator besides the host list itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The collected values could not produce a host list. All fields are asked again.
    Rejected(HostListError),
    /// The operator answered "n"; collection starts over.
    Restarting,
    /// The confirmation answer was not one of y/n/q.
    InvalidResponse(String),
    Confirmed,
    Cancelled,
}

/// The capability the prompt needs from whoever is on the other end.
pub trait Operator {
    /// Blocks until the operator answers. `Ok(None)` means the input is closed.
    fn ask(&mut self, question: &Question) -> io::Result<Option<String>>;

    /// Shows a freshly generated host list.
    fn review(&mut self, hosts: &HostList);

    fn notify(&mut self, notice: &Notice);
}

impl<O: Operator + ?Sized> Operator for &mut O {
    fn ask(&mut self, question: &Question) -> io::Result<Option<String>> {
        (**self).ask(question)
    }

    fn review(&mut self, hosts: &HostList) {
        (**self).review(hosts)
    }

    fn notify(&mut self, notice: &Notice) {
        (**self).notify(notice)
    }
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed before the host list was confirmed")]
    InputClosed,
    #[error("failed to read operator input: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptState {
    Collecting,
    Reviewing(HostList),
    Confirmed(HostList),
    Cancelled,
}

impl PromptState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PromptState::Confirmed(_) | PromptState::Cancelled)
    }
}

/// How a finished prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Confirmed(HostList),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Response {
    Yes,
    No,
    Quit,
}

impl Response {
    fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" => Some(Response::Yes),
            "n" => Some(Response::No),
            "q" => Some(Response::Quit),
            _ => None,
        }
    }
}

pub struct HostPrompt<'d, O: Operator> {
    operator: O,
    defaults: &'d NetworkDefaults,
    state: PromptState,
}

impl<'d, O: Operator> HostPrompt<'d, O> {
    pub fn new(operator: O, defaults: &'d NetworkDefaults) -> Self {
        Self {
            operator,
            defaults,
            state: PromptState::Collecting,
        }
    }

    pub fn state(&self) -> &PromptState {
        &self.state
    }

    /// Runs until the operator confirms or quits.
    pub fn run(mut self) -> Result<PromptOutcome, PromptError> {
        while !self.state.is_terminal() {
            self.step()?;
        }
        Ok(match self.state {
            PromptState::Confirmed(hosts) => PromptOutcome::Confirmed(hosts),
            _ => PromptOutcome::Cancelled,
        })
    }

    /// Performs exactly one transition. Terminal states are left untouched.
    pub fn step(&mut self) -> Result<(), PromptError> {
        let next = match std::mem::replace(&mut self.state, PromptState::Collecting) {
            PromptState::Collecting => self.collect()?,
            PromptState::Reviewing(hosts) => self.confirm(hosts)?,
            terminal => terminal,
        };
        debug!(state = ?StateName(&next), "prompt transition");
        self.state = next;
        Ok(())
    }

    fn collect(&mut self) -> Result<PromptState, PromptError> {
        let base_name = self.ask(Field::BaseName, None)?;
        let first_ip = self.ask(Field::FirstIp, None)?;

        let derived_gateway = ipv4::parse_ipv4(&first_ip)
            .ok()
            .map(|ip| ipv4::default_gateway(ip).to_string());
        let gateway = self.ask(Field::Gateway, derived_gateway.clone())?;
        let netmask = self.ask(Field::Netmask, Some(self.defaults.netmask.clone()))?;

        let dns_default = optional(&gateway).or(derived_gateway);
        let dns = self.ask(Field::Dns, dns_default)?;
        let domain = self.ask(Field::Domain, Some(self.defaults.domain.clone()))?;
        let count_text = self.ask(Field::Count, None)?;

        let generated = HostListRequest::parse_count(&count_text).and_then(|count| {
            let request = HostListRequest {
                base_name,
                first_ip,
                gateway: optional(&gateway),
                netmask: optional(&netmask),
                dns: optional(&dns),
                domain: optional(&domain),
                count,
            };
            hosts::generate_with_defaults(&request, self.defaults)
        });

        match generated {
            Ok(hosts) => {
                self.operator.review(&hosts);
                Ok(PromptState::Reviewing(hosts))
            }
            Err(err) => {
                debug!(error = %err, "host list rejected");
                self.operator.notify(&Notice::Rejected(err));
                Ok(PromptState::Collecting)
            }
        }
    }

    fn confirm(&mut self, hosts: HostList) -> Result<PromptState, PromptError> {
        let answer = self.ask(Field::Confirm, None)?;
        let next = match Response::parse(&answer) {
            Some(Response::Yes) => {
                self.operator.notify(&Notice::Confirmed);
                PromptState::Confirmed(hosts)
            }
            Some(Response::No) => {
                self.operator.notify(&Notice::Restarting);
                PromptState::Collecting
            }
            Some(Response::Quit) => {
                self.operator.notify(&Notice::Cancelled);
                PromptState::Cancelled
            }
            None => {
                self.operator.notify(&Notice::InvalidResponse(answer));
                PromptState::Reviewing(hosts)
            }
        };
        Ok(next)
    }

    fn ask(&mut self, field: Field, default: Option<String>) -> Result<String, PromptError> {
        let question = Question { field, default };
        match self.operator.ask(&question)? {
            Some(answer) => Ok(answer.trim().to_string()),
            None => Err(PromptError::InputClosed),
        }
    }
}

fn optional(answer: &str) -> Option<String> {
    (!answer.is_empty()).then(|| answer.to_string())
}

/// Logs the state without dumping the whole host list.
struct StateName<'a>(&'a PromptState);

impl fmt::Debug for StateName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PromptState::Collecting => f.write_str("Collecting"),
            PromptState::Reviewing(hosts) => write!(f, "Reviewing({} hosts)", hosts.len()),
            PromptState::Confirmed(hosts) => write!(f, "Confirmed({} hosts)", hosts.len()),
            PromptState::Cancelled => f.write_str("Cancelled"),
        }
    }
}
