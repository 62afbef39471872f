//! An [`Operator`] that replays canned answers and records everything it was shown.

use std::collections::VecDeque;
use std::io;

use super::{Notice, Operator, Question};
use crate::hosts::HostList;

#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub questions: Vec<Question>,
    pub reviewed: Vec<HostList>,
    pub notices: Vec<Notice>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, answer: impl Into<String>) {
        self.answers.push_back(answer.into());
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Operator for ScriptedOperator {
    /// Answers with the next scripted line, or reports closed input once the script runs out.
    fn ask(&mut self, question: &Question) -> io::Result<Option<String>> {
        self.questions.push(question.clone());
        Ok(self.answers.pop_front())
    }

    fn review(&mut self, hosts: &HostList) {
        self.reviewed.push(hosts.clone());
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
