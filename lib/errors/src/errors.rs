use std::fmt::{Display, Formatter};

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
pub struct Line(pub usize);

/// Where in the offending line a syntax error was detected.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Scanner-level errors have no token to point at.
    Unspecified,
    End,
    Lexeme(String),
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Unspecified => Ok(()),
            Location::End => write!(f, " at end"),
            Location::Lexeme(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    #[error("[line {line}] Error{location}: {message}")]
    Syntax { line: Line, location: Location, message: String },
    #[error("{message}\n[line {line}]")]
    Runtime { line: Line, message: String },
}

impl Diagnostic {
    pub fn line(&self) -> Line {
        match self {
            Diagnostic::Syntax { line, .. } | Diagnostic::Runtime { line, .. } => *line,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Diagnostic::Syntax { .. })
    }
}

/// Collects every report made while scanning, parsing and evaluating one unit of input.
///
/// The driver owns one of these and hands it to each phase by `&mut`; afterwards it inspects
/// [`Diagnostics::had_error`] and [`Diagnostics::had_runtime_error`] to decide how to continue.
#[derive(Debug, Default, Clone, PartialEq, derive_more::Deref)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a syntax error that isn't attached to a token.
    pub fn error(&mut self, line: Line, message: impl ToString) {
        self.error_at(line, Location::Unspecified, message)
    }

    pub fn error_at(&mut self, line: Line, location: Location, message: impl ToString) {
        self.report(Diagnostic::Syntax { line, location, message: message.to_string() })
    }

    pub fn runtime_error(&mut self, line: Line, message: impl ToString) {
        self.report(Diagnostic::Runtime { line, message: message.to_string() })
    }

    pub fn had_error(&self) -> bool {
        self.0.iter().any(Diagnostic::is_syntax)
    }

    pub fn had_runtime_error(&self) -> bool {
        self.0.iter().any(|d| !d.is_syntax())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("{diagnostic}");
        self.0.push(diagnostic);
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
