//! The observation pipeline: an ordered set of listener callbacks fired as
//! parsing progresses, with explicit cancellation tokens instead of
//! mutation-based event flags.
//!
//! Per file, the order is: `parse_begin` → (`file_begin` → `before_parse` →
//! `jsdoc_comment_found`* → `symbol_found`* → `new_doclet`* →
//! `file_complete`)* → `parse_complete` → `processing_complete` after the
//! post-parse graph transforms.

use crate::doclet::CodeInfo;
use crate::doclet::Doclet;
use crate::store::DocletStore;
use estree_js::ast::NodeId;

/// An explicit cancellation token. Cancelling inside `file_begin` skips the
/// file; inside `symbol_found` it suppresses doclet creation for that
/// symbol; inside `new_doclet` it keeps the doclet out of the store.
#[derive(Debug, Default)]
pub struct Cancel {
  cancelled: bool,
}

impl Cancel {
  pub fn new() -> Cancel {
    Cancel::default()
  }

  pub fn cancel(&mut self) {
    self.cancelled = true;
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled
  }
}

/// A doc comment found anywhere in a file, attached or standalone.
/// Listeners may rewrite the comment text before it is interpreted.
#[derive(Debug)]
pub struct CommentEvent {
  pub comment: String,
  pub filename: String,
  pub lineno: Option<u32>,
  pub columnno: Option<u32>,
  pub range: Option<(usize, usize)>,
}

/// A symbol-bearing node paired with its raw comment and structural facts.
#[derive(Debug)]
pub struct SymbolEvent {
  /// The node the event fired for.
  pub astnode: NodeId,
  /// The raw comment, or `@undocumented` when the node has none.
  pub comment: String,
  pub filename: String,
  pub lineno: Option<u32>,
  pub columnno: Option<u32>,
  pub range: Option<(usize, usize)>,
  pub code: CodeInfo,
  /// The doclet produced for this symbol, once one exists.
  pub(crate) doclet: Option<crate::store::DocletId>,
  pub(crate) finishers: Vec<crate::parser::Finisher>,
}

/// Whether to keep processing a file's remaining nodes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
  Continue,
  /// Abandon the rest of the file; useful for skipping dead code or
  /// generated sections.
  Stop,
}

/// Observer hooks over the parse pipeline. All methods default to no-ops;
/// implement the ones of interest.
#[allow(unused_variables)]
pub trait ParseListener {
  fn parse_begin(&mut self, source_files: &[String]) {}

  fn file_begin(&mut self, filename: &str, cancel: &mut Cancel) {}

  fn before_parse(&mut self, filename: &str) {}

  /// Called for every node in visit order, before its comments and symbol
  /// are processed.
  fn visit_node(&mut self, node: NodeId, filename: &str) -> Flow {
    Flow::Continue
  }

  fn jsdoc_comment_found(&mut self, event: &mut CommentEvent) {}

  fn symbol_found(&mut self, event: &mut SymbolEvent, cancel: &mut Cancel) {}

  fn new_doclet(&mut self, doclet: &mut Doclet, cancel: &mut Cancel) {}

  fn file_complete(&mut self, filename: &str) {}

  fn parse_complete(&mut self, source_files: &[String], doclet_count: usize) {}

  fn processing_complete(&mut self, store: &DocletStore) {}
}
