//! Query Shell - the interactive read/execute/report loop
//!
//! Every non-empty input is forwarded verbatim to the store. Query errors are
//! logged and the loop continues; a rendering failure ends the session and is
//! returned to the caller, which owns the store and closes it.

pub mod reader;

pub use reader::{LineReader, ReadError, RustylineReader};

use crate::storage::RelationalStore;
use crate::ui::ResultRenderer;
use crate::Result;

pub const PROMPT: &str = "> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Prompting,
    Executing,
    Terminated,
}

/// How a session that did not fail fatally came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Interrupt or end of input
    Interrupted,
    /// The line reader failed; the error was logged
    ReadFailed,
}

/// REPL-local state
#[derive(Debug, Default)]
pub struct Session {
    history: Vec<String>,
    queries_run: usize,
    query_errors: usize,
}

impl Session {
    /// Accepted inputs, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn queries_run(&self) -> usize {
        self.queries_run
    }

    pub fn query_errors(&self) -> usize {
        self.query_errors
    }
}

pub struct Shell<'a, R, W> {
    reader: R,
    store: &'a dyn RelationalStore,
    renderer: W,
    session: Session,
    state: ShellState,
}

impl<'a, R: LineReader, W: ResultRenderer> Shell<'a, R, W> {
    pub fn new(reader: R, store: &'a dyn RelationalStore, renderer: W) -> Self {
        Self {
            reader,
            store,
            renderer,
            session: Session::default(),
            state: ShellState::Prompting,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    /// Run until the operator leaves or rendering fails
    pub fn run(&mut self) -> Result<SessionOutcome> {
        let outcome = loop {
            match self.step() {
                Ok(Some(outcome)) => break Ok(outcome),
                Ok(None) => {}
                Err(e) => break Err(e),
            }
        };
        tracing::debug!(
            "Session ended after {} queries ({} failed)",
            self.session.queries_run,
            self.session.query_errors
        );
        outcome
    }

    /// One prompt cycle. Returns the outcome once the session has ended.
    pub fn step(&mut self) -> Result<Option<SessionOutcome>> {
        self.state = ShellState::Prompting;
        let input = match self.reader.read_line(PROMPT) {
            Ok(input) => input,
            Err(e) if e.ends_session_cleanly() => {
                self.state = ShellState::Terminated;
                return Ok(Some(SessionOutcome::Interrupted));
            }
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                self.state = ShellState::Terminated;
                return Ok(Some(SessionOutcome::ReadFailed));
            }
        };

        if input.trim().is_empty() {
            return Ok(None);
        }

        self.session.history.push(input.clone());
        if let Err(e) = self.reader.add_history(&input) {
            tracing::error!("Failed to record history: {}", e);
        }

        self.state = ShellState::Executing;
        self.session.queries_run += 1;
        let result = match self.store.query(&input) {
            Ok(result) => result,
            Err(e) => {
                self.session.query_errors += 1;
                tracing::warn!("{}", e);
                self.state = ShellState::Prompting;
                return Ok(None);
            }
        };

        if let Err(e) = self.renderer.render(&result) {
            self.state = ShellState::Terminated;
            return Err(e);
        }

        self.state = ShellState::Prompting;
        Ok(None)
    }
}
