use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

/// A stable classification of problems found while building doclets.
///
/// Diagnostic codes (prefix `DC`) are assigned per variant and are stable:
/// - `DC0001`: [`DocletErrorType::TagMissingValue`]
/// - `DC0002`: [`DocletErrorType::ConflictingName`]
/// - `DC0003`: [`DocletErrorType::ConflictingMemberof`]
/// - `DC0004`: [`DocletErrorType::UnknownScopeName`]
/// - `DC0005`: [`DocletErrorType::CyclicAugments`]
/// - `DC0006`: [`DocletErrorType::TagForbidsValue`]
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum DocletErrorType {
  /// A tag whose definition requires a value appeared with none.
  TagMissingValue(String),
  /// Two different `@name` values appeared in one comment.
  ConflictingName { first: String, second: String },
  /// Two different `@memberof` values appeared in one comment.
  ConflictingMemberof { first: String, second: String },
  /// A scope name outside `global|inner|instance|static`.
  UnknownScopeName(String),
  /// The `@augments` graph contains a cycle; members are the cycle longnames.
  CyclicAugments(Vec<String>),
  /// A tag whose definition forbids a value appeared with one.
  TagForbidsValue(String),
}

impl DocletErrorType {
  /// Stable diagnostic code for this error variant.
  pub fn code(&self) -> &'static str {
    match self {
      DocletErrorType::TagMissingValue(_) => "DC0001",
      DocletErrorType::ConflictingName { .. } => "DC0002",
      DocletErrorType::ConflictingMemberof { .. } => "DC0003",
      DocletErrorType::UnknownScopeName(_) => "DC0004",
      DocletErrorType::CyclicAugments(_) => "DC0005",
      DocletErrorType::TagForbidsValue(_) => "DC0006",
    }
  }

  pub fn message(&self) -> String {
    match self {
      DocletErrorType::TagMissingValue(title) => {
        format!("tag @{} requires a value, but none was given", title)
      }
      DocletErrorType::ConflictingName { first, second } => format!(
        "conflicting names in one comment: \"{}\" and \"{}\"",
        first, second
      ),
      DocletErrorType::ConflictingMemberof { first, second } => format!(
        "conflicting memberof values in one comment: \"{}\" and \"{}\"",
        first, second
      ),
      DocletErrorType::UnknownScopeName(scope) => format!(
        "the scope name \"{}\" is not recognized; use global, inner, instance, or static",
        scope
      ),
      DocletErrorType::CyclicAugments(members) => format!(
        "cyclic augments relationship between: {}",
        members.join(" -> ")
      ),
      DocletErrorType::TagForbidsValue(title) => {
        format!("tag @{} does not take a value", title)
      }
    }
  }
}

/// An error with enough source context to point the user at the offending
/// doc comment.
#[derive(Clone, PartialEq, Eq)]
pub struct DocletError {
  pub typ: DocletErrorType,
  pub filename: Option<String>,
  pub lineno: Option<u32>,
  /// The raw comment text the error was found in, flattened to one line.
  pub comment: Option<String>,
}

impl DocletError {
  pub fn new(typ: DocletErrorType) -> DocletError {
    DocletError {
      typ,
      filename: None,
      lineno: None,
      comment: None,
    }
  }

  pub fn with_context(
    mut self,
    filename: Option<&str>,
    lineno: Option<u32>,
    comment: Option<&str>,
  ) -> DocletError {
    self.filename = filename.map(str::to_owned);
    self.lineno = lineno;
    self.comment = comment.map(|c| c.replace(['\r', '\n'], " "));
    self
  }
}

impl Debug for DocletError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self)
  }
}

impl Display for DocletError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "[{}] {}", self.typ.code(), self.typ.message())?;
    if let Some(filename) = &self.filename {
      write!(f, " ({}", filename)?;
      if let Some(lineno) = self.lineno {
        write!(f, ":{}", lineno)?;
      }
      write!(f, ")")?;
    }
    if let Some(comment) = &self.comment {
      write!(f, " in comment: {}", comment)?;
    }
    Ok(())
  }
}

impl Error for DocletError {}

pub type DocletResult<T> = Result<T, DocletError>;
