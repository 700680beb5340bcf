//! Depth-first pre-order traversal with a per-kind dispatch, a scope stack,
//! and a side table of traversal annotations.
//!
//! The walker never attaches anything to the foreign tree; parent and
//! enclosing-scope links live in [`Annotations`], keyed by node id. The only
//! tree mutation is comment relocation: a handful of node kinds own the doc
//! comment that the parser attached to one of their children (or vice
//! versa), and those attachments are moved before the subtree is visited.

use estree_js::ast::Ast;
use estree_js::ast::NodeId;
use estree_js::ast::NodeKind;

/// Traversal links for every node of one [`Ast`], recorded in pre-order.
#[derive(Debug)]
pub struct Annotations {
  parent: Vec<Option<NodeId>>,
  enclosing_scope: Vec<Option<NodeId>>,
}

impl Annotations {
  fn with_len(len: usize) -> Annotations {
    Annotations {
      parent: vec![None; len],
      enclosing_scope: vec![None; len],
    }
  }

  /// The structural parent of `id`, or `None` for the root.
  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.parent[id.index()]
  }

  /// The nearest ancestor that introduces a lexical scope, or `None` at top
  /// level.
  pub fn enclosing_scope(&self, id: NodeId) -> Option<NodeId> {
    self.enclosing_scope[id.index()]
  }

  /// Walks `n` structural parents up from `id`.
  pub fn nth_parent(&self, id: NodeId, n: usize) -> Option<NodeId> {
    let mut current = id;
    for _ in 0..n {
      current = self.parent(current)?;
    }
    Some(current)
  }
}

/// The outcome of a walk: the stable pre-order visit sequence plus the
/// annotation side table.
#[derive(Debug)]
pub struct WalkResult {
  pub order: Vec<NodeId>,
  pub annotations: Annotations,
}

/// Walks the tree, annotating every reachable node. Re-walking the same
/// tree produces the identical order and links.
pub fn walk(ast: &mut Ast) -> WalkResult {
  let mut annotations = Annotations::with_len(ast.len());
  let mut order = Vec::with_capacity(ast.len());
  let mut scopes = Vec::new();
  let root = ast.root();
  visit(ast, &mut annotations, &mut order, &mut scopes, root, None);
  debug_assert!(scopes.is_empty());
  WalkResult { order, annotations }
}

fn visit(
  ast: &mut Ast,
  annotations: &mut Annotations,
  order: &mut Vec<NodeId>,
  scopes: &mut Vec<NodeId>,
  id: NodeId,
  parent: Option<NodeId>,
) {
  annotations.parent[id.index()] = parent;
  annotations.enclosing_scope[id.index()] = scopes.last().copied();

  relocate_comments(ast, id);

  let is_scope = ast.kind(id).is_scope();
  if is_scope {
    scopes.push(id);
  }
  order.push(id);

  for child in children(ast, id) {
    visit(ast, annotations, order, scopes, child, Some(id));
  }

  if is_scope {
    scopes.pop();
  }
}

// Per-kind comment ownership exceptions. These mirror how parsers attach
// leading comments: the comment the author wrote for a property sits on its
// key, a variable's comment sits on the declaration statement, and a
// standalone file comment sits on the first statement.
fn relocate_comments(ast: &mut Ast, id: NodeId) {
  match ast.kind(id) {
    NodeKind::ExpressionStatement { expression, .. } => {
      let expression = *expression;
      ast.move_leading_comments(id, expression, None);
    }
    NodeKind::VariableDeclaration { declarations, .. } => {
      if let Some(&first) = declarations.first() {
        ast.move_leading_comments(id, first, None);
      }
    }
    NodeKind::Property { key, .. }
    | NodeKind::ClassProperty { key, .. }
    | NodeKind::ClassPrivateProperty { key, .. } => {
      let key = *key;
      ast.move_leading_comments(key, id, None);
    }
    NodeKind::ExportDefaultDeclaration { declaration } => {
      let declaration = *declaration;
      if matches!(ast.kind(declaration), NodeKind::ClassDeclaration(_)) {
        ast.move_leading_comments(id, declaration, None);
      }
    }
    NodeKind::Program { body } => {
      // A module-level standalone comment followed by the first
      // declaration's own comment both end up attached to the first
      // statement; all but the last belong to the file itself.
      let first = body.first().copied();
      let last = body.last().copied();
      if let Some(first) = first {
        let extra = ast.node(first).leading_comments.len();
        if extra > 1 {
          ast.move_leading_comments(first, id, Some(extra - 1));
        }
      }
      if let Some(last) = last {
        ast.move_trailing_comments(last, id);
      }
    }
    _ => {}
  }
}

// Child enumeration for the dispatch. The set of visited children follows
// the documentation use case rather than full evaluation order: identifiers
// inside array patterns carry nothing documentable, and a catch clause's
// body is reached through its try statement.
fn children(ast: &Ast, id: NodeId) -> Vec<NodeId> {
  let mut out = Vec::new();
  match ast.kind(id) {
    NodeKind::ArrayExpression { elements } => {
      out.extend(elements.iter().flatten().copied());
    }
    NodeKind::ArrayPattern { elements } => {
      for element in elements.iter().flatten() {
        if !matches!(ast.kind(*element), NodeKind::Identifier { .. }) {
          out.push(*element);
        }
      }
    }
    NodeKind::ArrowFunctionExpression(func)
    | NodeKind::FunctionDeclaration(func)
    | NodeKind::FunctionExpression(func) => {
      out.extend(func.id);
      out.extend(func.params.iter().copied());
      out.extend(func.body);
    }
    NodeKind::AssignmentExpression { left, right, .. }
    | NodeKind::AssignmentPattern { left, right }
    | NodeKind::BinaryExpression { left, right, .. }
    | NodeKind::LogicalExpression { left, right, .. } => {
      out.push(*left);
      out.push(*right);
    }
    NodeKind::AwaitExpression { argument }
    | NodeKind::SpreadElement { argument }
    | NodeKind::RestElement { argument }
    | NodeKind::ThrowStatement { argument }
    | NodeKind::UnaryExpression { argument, .. }
    | NodeKind::UpdateExpression { argument, .. } => out.push(*argument),
    NodeKind::BlockStatement { body } | NodeKind::ClassBody { body } | NodeKind::Program { body } => {
      out.extend(body.iter().copied());
    }
    NodeKind::BreakStatement
    | NodeKind::ContinueStatement
    | NodeKind::DebuggerStatement
    | NodeKind::EmptyStatement
    | NodeKind::Identifier { .. }
    | NodeKind::Literal { .. }
    | NodeKind::MetaProperty
    | NodeKind::PrivateIdentifier { .. }
    | NodeKind::Super
    | NodeKind::TemplateElement
    | NodeKind::ThisExpression
    | NodeKind::CatchClause { .. } => {}
    NodeKind::CallExpression { callee, arguments }
    | NodeKind::NewExpression { callee, arguments } => {
      out.push(*callee);
      out.extend(arguments.iter().copied());
    }
    NodeKind::ClassDeclaration(class) | NodeKind::ClassExpression(class) => {
      out.extend(class.id);
      out.extend(class.super_class);
      out.push(class.body);
    }
    NodeKind::ClassPrivateProperty { value, .. } | NodeKind::ClassProperty { value, .. } => {
      out.extend(*value);
    }
    NodeKind::ConditionalExpression { test, consequent, alternate } => {
      out.push(*test);
      out.push(*consequent);
      out.push(*alternate);
    }
    NodeKind::DoWhileStatement { body, test } => {
      out.push(*test);
      out.push(*body);
    }
    NodeKind::ExportAllDeclaration { source } => out.extend(*source),
    NodeKind::ExportDefaultDeclaration { declaration } => out.push(*declaration),
    NodeKind::ExportNamedDeclaration { declaration, specifiers, source } => {
      out.extend(*declaration);
      out.extend(specifiers.iter().copied());
      out.extend(*source);
    }
    NodeKind::ExportSpecifier { local, exported } => {
      out.push(*exported);
      out.push(*local);
    }
    NodeKind::ExpressionStatement { expression, .. } => out.push(*expression),
    NodeKind::ForInStatement { left, right, body }
    | NodeKind::ForOfStatement { left, right, body } => {
      out.push(*left);
      out.push(*right);
      out.push(*body);
    }
    NodeKind::ForStatement { init, test, update, body } => {
      out.extend(*init);
      out.extend(*test);
      out.extend(*update);
      out.push(*body);
    }
    NodeKind::IfStatement { test, consequent, alternate } => {
      out.push(*test);
      out.push(*consequent);
      out.extend(*alternate);
    }
    NodeKind::ImportDeclaration { specifiers, source } => {
      out.extend(specifiers.iter().copied());
      out.push(*source);
    }
    NodeKind::ImportDefaultSpecifier { local } | NodeKind::ImportNamespaceSpecifier { local } => {
      out.push(*local);
    }
    NodeKind::ImportSpecifier { imported, local } => {
      out.push(*imported);
      out.push(*local);
    }
    NodeKind::MemberExpression { object, property, .. } => {
      out.push(*object);
      out.push(*property);
    }
    NodeKind::MethodDefinition { key, value, .. } => {
      out.push(*key);
      out.push(*value);
    }
    NodeKind::ObjectExpression { properties } | NodeKind::ObjectPattern { properties } => {
      out.extend(properties.iter().copied());
    }
    NodeKind::Property { value, .. } => out.push(*value),
    NodeKind::ReturnStatement { argument } | NodeKind::YieldExpression { argument } => {
      out.extend(*argument);
    }
    NodeKind::SequenceExpression { expressions } => out.extend(expressions.iter().copied()),
    NodeKind::SwitchCase { test, consequent } => {
      out.extend(*test);
      out.extend(consequent.iter().copied());
    }
    NodeKind::SwitchStatement { discriminant, cases } => {
      out.push(*discriminant);
      out.extend(cases.iter().copied());
    }
    NodeKind::TaggedTemplateExpression { tag, quasi } => {
      out.push(*tag);
      out.push(*quasi);
    }
    NodeKind::TemplateLiteral { quasis, expressions } => {
      out.extend(quasis.iter().copied());
      out.extend(expressions.iter().copied());
    }
    NodeKind::TryStatement { block, handler, finalizer } => {
      out.push(*block);
      // The catch clause's parameter introduces nothing documentable; go
      // straight to its body.
      if let Some(handler) = handler {
        if let NodeKind::CatchClause { body, .. } = ast.kind(*handler) {
          out.push(*body);
        }
      }
      out.extend(*finalizer);
    }
    NodeKind::VariableDeclaration { declarations, .. } => {
      out.extend(declarations.iter().copied());
    }
    NodeKind::VariableDeclarator { id, init } => {
      out.push(*id);
      out.extend(*init);
    }
    NodeKind::WhileStatement { test, body } => {
      out.push(*test);
      out.push(*body);
    }
    NodeKind::WithStatement { object, body } => {
      out.push(*object);
      out.push(*body);
    }
    NodeKind::Unknown { type_name } => {
      tracing::debug!(
        kind = %type_name,
        "unrecognized node kind; skipping the node's descendants"
      );
    }
  }
  out
}
