//! Line input for the shell

use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Editor, Helper};

use crate::Result;

/// Why a read did not produce a line
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// Ctrl-C at the prompt
    #[error("interrupted")]
    Interrupted,

    /// Ctrl-D or end of input
    #[error("end of input")]
    Eof,

    #[error("{0}")]
    Other(String),
}

impl ReadError {
    /// Interrupt and EOF end the session cleanly
    pub fn ends_session_cleanly(&self) -> bool {
        matches!(self, ReadError::Interrupted | ReadError::Eof)
    }
}

/// Source of operator input
pub trait LineReader {
    /// Read one logical input, possibly spanning several physical lines
    fn read_line(&mut self, prompt: &str) -> std::result::Result<String, ReadError>;

    /// Remember an accepted input for recall
    fn add_history(&mut self, line: &str) -> Result<()>;
}

impl<T: LineReader + ?Sized> LineReader for &mut T {
    fn read_line(&mut self, prompt: &str) -> std::result::Result<String, ReadError> {
        (**self).read_line(prompt)
    }

    fn add_history(&mut self, line: &str) -> Result<()> {
        (**self).add_history(line)
    }
}

/// Keeps reading while parentheses or quotes are left open
pub struct SqlHelper {
    multiline: bool,
}

impl SqlHelper {
    pub fn new(multiline: bool) -> Self {
        Self { multiline }
    }
}

/// True while the input has an unterminated quote or unbalanced parenthesis.
/// Text after `--` up to the end of the line is a comment and ignored.
pub fn is_incomplete(input: &str) -> bool {
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth -= 1,
                '-' if chars.peek() == Some(&'-') => {
                    for skipped in chars.by_ref() {
                        if skipped == '\n' {
                            break;
                        }
                    }
                }
                _ => {}
            },
        }
    }

    quote.is_some() || depth > 0
}

impl Validator for SqlHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        if self.multiline && is_incomplete(ctx.input()) {
            return Ok(ValidationResult::Incomplete);
        }
        Ok(ValidationResult::Valid(None))
    }
}

impl Completer for SqlHelper {
    type Candidate = String;
}

impl Hinter for SqlHelper {
    type Hint = String;
}

impl Highlighter for SqlHelper {}

impl Helper for SqlHelper {}

/// Terminal line editor backed by rustyline
pub struct RustylineReader {
    editor: Editor<SqlHelper, DefaultHistory>,
}

impl RustylineReader {
    pub fn new(multiline: bool) -> Result<Self> {
        let mut editor = Editor::<SqlHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(SqlHelper::new(multiline)));
        Ok(Self { editor })
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> std::result::Result<String, ReadError> {
        self.editor.readline(prompt).map_err(|e| match e {
            ReadlineError::Interrupted => ReadError::Interrupted,
            ReadlineError::Eof => ReadError::Eof,
            other => ReadError::Other(other.to_string()),
        })
    }

    fn add_history(&mut self, line: &str) -> Result<()> {
        self.editor.add_history_entry(line)?;
        Ok(())
    }
}
