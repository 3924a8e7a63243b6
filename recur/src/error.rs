use std::fmt;

/// Byte range within the input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Rule field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    Interval,
    Weekdays,
    MonthDay,
}

impl RuleField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interval => "interval",
            Self::Weekdays => "weekdays",
            Self::MonthDay => "monthDay",
        }
    }
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule could not be built because a field violates its constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {constraint}")]
pub struct InvalidRuleError {
    field: RuleField,
    constraint: String,
}

impl InvalidRuleError {
    pub fn new(field: RuleField, constraint: impl Into<String>) -> Self {
        Self {
            field,
            constraint: constraint.into(),
        }
    }

    /// The offending field.
    pub fn field(&self) -> RuleField {
        self.field
    }

    /// The violated constraint, in words.
    pub fn constraint(&self) -> &str {
        &self.constraint
    }
}

/// Rule text does not match the `FREQ=...;INTERVAL=...;BYDAY=...;BYMONTHDAY=...`
/// grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MalformedRuleError {
    message: String,
    span: Span,
    input: String,
}

impl MalformedRuleError {
    pub fn new(message: impl Into<String>, span: Span, input: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span,
            input: input.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where in the input the problem is.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Format a rich error with the input underlined at the offending span.
    pub fn display_rich(&self) -> String {
        let mut out = format!("error: {}\n", self.message);
        // Control whitespace is swapped for spaces byte for byte so the input
        // stays on one line and the span offsets still line up.
        let line: String = self
            .input
            .chars()
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .collect();
        out.push_str(&format!("  {line}\n"));
        out.push_str(&" ".repeat(self.span.start + 2));
        out.push_str(&"^".repeat((self.span.end - self.span.start).max(1)));
        out
    }
}

/// Either kind of rule error, for callers that handle both the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Invalid(#[from] InvalidRuleError),

    #[error(transparent)]
    Malformed(#[from] MalformedRuleError),
}

impl Error {
    /// Like `Display`, but malformed input gets an underlined excerpt.
    pub fn display_rich(&self) -> String {
        match self {
            Self::Invalid(e) => format!("error: {e}"),
            Self::Malformed(e) => e.display_rich(),
        }
    }
}
