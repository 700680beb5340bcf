//! Doc-comment extraction and symbol longname resolution for JavaScript
//! ASTs.
//!
//! The engine pairs doc comments with the syntax-tree nodes they document
//! and computes each symbol's canonical longname: its fully qualified
//! identity, including enclosing scope, container kind, and namespace. It
//! consumes ESTree-shaped trees built by [`estree_js`] and produces a
//! [`store::DocletStore`] of JSON-serializable doclets.
//!
//! ```
//! use doclet_js::dictionary::TagDictionary;
//! use doclet_js::parser::{Parser, SourceFile};
//! use serde_json::json;
//!
//! let ast = estree_js::from_json(&json!({
//!   "type": "Program",
//!   "body": [{
//!     "type": "FunctionDeclaration",
//!     "id": { "type": "Identifier", "name": "greet" },
//!     "params": [],
//!     "body": { "type": "BlockStatement", "body": [] },
//!     "leadingComments": [{ "type": "CommentBlock", "value": "* Says hello. " }]
//!   }]
//! }))
//! .unwrap();
//!
//! let mut parser = Parser::new(TagDictionary::jsdoc());
//! parser.parse(vec![SourceFile { filename: "greet.js".into(), ast }]);
//! parser.post_process();
//! let (store, _diagnostics) = parser.finish();
//! let greet = &store.by_longname("greet")[0];
//! assert_eq!(store.get(*greet).description.as_deref(), Some("Says hello."));
//! ```

pub mod augment;
pub mod borrow;
pub mod dictionary;
pub mod doclet;
pub mod error;
pub mod event;
mod handlers;
pub mod name;
pub mod parser;
mod resolve;
pub mod store;
pub mod tag;
pub mod visit;
pub mod walk;

pub use parser::Parser;
pub use parser::SourceFile;
pub use store::DocletStore;

use dictionary::TagDictionary;
use error::DocletError;

/// The result of a full parse-and-resolve run.
pub struct ParseOutput {
  pub store: DocletStore,
  pub diagnostics: Vec<DocletError>,
}

/// Parses the given files in order, then runs the augment and borrow
/// post-processors.
pub fn parse_files(dict: TagDictionary, files: Vec<SourceFile>) -> ParseOutput {
  let mut parser = Parser::new(dict);
  parser.parse(files);
  parser.post_process();
  let (store, diagnostics) = parser.finish();
  ParseOutput { store, diagnostics }
}
