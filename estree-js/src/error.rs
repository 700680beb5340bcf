use core::fmt;
use core::fmt::Debug;
use core::fmt::Formatter;
use std::error::Error;
use std::fmt::Display;

/// A stable classification of errors produced while building an [`crate::ast::Ast`]
/// from ESTree JSON.
///
/// Diagnostic codes (prefix `ES`) are assigned per variant and are stable:
/// - `ES0001`: [`EstreeErrorType::ExpectedObject`]
/// - `ES0002`: [`EstreeErrorType::MissingField`]
/// - `ES0003`: [`EstreeErrorType::InvalidField`]
/// - `ES0004`: [`EstreeErrorType::ExpectedProgram`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum EstreeErrorType {
  ExpectedObject,
  MissingField(&'static str),
  InvalidField(&'static str),
  ExpectedProgram,
}

impl EstreeErrorType {
  /// Stable diagnostic code for this error variant.
  pub fn code(&self) -> &'static str {
    match self {
      EstreeErrorType::ExpectedObject => "ES0001",
      EstreeErrorType::MissingField(_) => "ES0002",
      EstreeErrorType::InvalidField(_) => "ES0003",
      EstreeErrorType::ExpectedProgram => "ES0004",
    }
  }

  pub fn message(&self) -> String {
    match self {
      EstreeErrorType::ExpectedObject => "expected a JSON object for an AST node".into(),
      EstreeErrorType::MissingField(field) => format!("missing required field `{}`", field),
      EstreeErrorType::InvalidField(field) => format!("field `{}` has an unexpected shape", field),
      EstreeErrorType::ExpectedProgram => {
        "expected a `Program` or `File` node at the root".into()
      }
    }
  }
}

/// An error encountered while interpreting ESTree JSON, with the `type` of
/// the node being built when the error occurred (if known).
#[derive(Clone)]
pub struct EstreeError {
  pub typ: EstreeErrorType,
  pub node_type: Option<String>,
}

impl EstreeError {
  pub fn new(typ: EstreeErrorType, node_type: Option<String>) -> EstreeError {
    EstreeError { typ, node_type }
  }
}

impl Debug for EstreeError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self)
  }
}

impl Display for EstreeError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &self.node_type {
      Some(t) => write!(f, "[{}] {} (in `{}` node)", self.typ.code(), self.typ.message(), t),
      None => write!(f, "[{}] {}", self.typ.code(), self.typ.message()),
    }
  }
}

impl Error for EstreeError {}

impl PartialEq for EstreeError {
  fn eq(&self, other: &Self) -> bool {
    self.typ == other.typ
  }
}

impl Eq for EstreeError {}

pub type EstreeResult<T> = Result<T, EstreeError>;
