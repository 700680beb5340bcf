use error::EstreeResult;
use serde_json::Value;

pub mod ast;
pub mod build;
pub mod error;
pub mod loc;

/// Builds an [`ast::Ast`] from an ESTree JSON document.
pub fn from_json(value: &Value) -> EstreeResult<ast::Ast> {
  build::build(value)
}
