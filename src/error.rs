//! Errors that are returned by this crate.

use std::{
    backtrace::{Backtrace, BacktraceStatus},
    borrow::Cow,
    error::Error as StdError,
    fmt,
};

/// Result that is a wrapper of `Result<T, expomet::Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The kind of error produced by this crate.
///
/// These map onto the failure modes callers need to distinguish: a bad name or label at
/// registration time, a bad amount at observation time, or a sink that refused a write during
/// exposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A metric or label name violates the naming rules, or collides with an existing name.
    InvalidName,
    /// A label set is malformed: a duplicate name, a reserved name used by caller code, or a NUL
    /// byte in a value.
    InvalidLabel,
    /// An observed amount is illegal for the metric kind (negative where monotonic, non-finite
    /// where disallowed).
    InvalidAmount,
    /// A builder was finalized without a piece of state it requires.
    MissingRequired,
    /// The text sink rejected a write during exposition.
    IoFailure,
    /// We don't know what happened here; no action other than returning it back.
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName => f.write_str("InvalidName"),
            Self::InvalidLabel => f.write_str("InvalidLabel"),
            Self::InvalidAmount => f.write_str("InvalidAmount"),
            Self::MissingRequired => f.write_str("MissingRequired"),
            Self::IoFailure => f.write_str("IoFailure"),
            Self::Unexpected => f.write_str("Unexpected"),
        }
    }
}

impl ErrorKind {
    /// Validation errors are raised on every registration call; capturing a backtrace for them
    /// would be wasted work, so only the genuinely unexpected kinds pay for one.
    fn enable_backtrace(&self) -> bool {
        matches!(self, ErrorKind::Unexpected | ErrorKind::IoFailure)
    }
}

/// The error struct returned by fallible functions in this crate.
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    context: Vec<(&'static str, String)>,

    source: Option<anyhow::Error>,
    backtrace: Option<Box<Backtrace>>,
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f
                .debug_struct("Error")
                .field("kind", &self.kind)
                .field("message", &self.message)
                .field("context", &self.context)
                .field("source", &self.source)
                .finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        if let Some(backtrace) = &self.backtrace {
            writeln!(f)?;
            writeln!(f, "Backtrace:")?;
            writeln!(f, "{backtrace}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}

impl Error {
    /// Create a new [`Error`] with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),

            source: None,
            backtrace: kind
                .enable_backtrace()
                // `Backtrace::capture()` will check if backtrace has been enabled internally.
                // It's zero cost if backtrace is disabled.
                .then(Backtrace::capture)
                // We only keep captured backtrace to avoid an extra box.
                .filter(|bt| bt.status() == BacktraceStatus::Captured)
                .map(Box::new),
        }
    }

    /// Creates a new [`ErrorKind::InvalidName`] error.
    pub fn invalid_name(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidName, message)
    }

    /// Creates a new [`ErrorKind::InvalidLabel`] error.
    pub fn invalid_label(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidLabel, message)
    }

    /// Creates a new [`ErrorKind::InvalidAmount`] error.
    pub fn invalid_amount(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidAmount, message)
    }

    /// Creates a new [`ErrorKind::MissingRequired`] error.
    pub fn missing_required(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::MissingRequired, message)
    }

    /// Creates a new [`ErrorKind::IoFailure`] error.
    pub fn io_failure(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::IoFailure, message)
    }

    /// Creates a new [`ErrorKind::Unexpected`] error.
    pub fn unexpected(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Attaches additional context to the error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Notes
    ///
    /// If the source has been set, we will raise a panic here.
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message of the error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<fmt::Error> for Error {
    fn from(err: fmt::Error) -> Self {
        Self::io_failure("failed to write to the exposition sink").set_source(err)
    }
}
