//! The scope resolver: answers "what is this node a member of?" and "what
//! does `this` refer to here?" from the scope-chain links recorded by the
//! walker and the doclets produced so far.
//!
//! Processing is single-pass in source order, so resolution for a later
//! symbol can rely on an earlier sibling or parent already being resolved —
//! never on a symbol defined later in the same file. Resolution never
//! fails: an unanswerable question degrades to the `<anonymous>` sentinel
//! or an empty memberof (global), because one unanticipated expression
//! shape must not abort documentation of the rest of the codebase.

use crate::doclet::Kind;
use crate::name;
use crate::parser::Ctx;
use crate::parser::Parser;
use crate::store::DocletId;
use crate::visit::node_to_string;
use estree_js::ast::MethodKind;
use estree_js::ast::NodeId;
use estree_js::ast::NodeKind;

/// The answer to a memberof query: the container's longname (which may come
/// from a scope's variable table and so may still be unset there), and the
/// basename that matched a variable table, when one did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberofInfo {
  pub memberof: Option<String>,
  pub basename: Option<String>,
}

impl Parser {
  /// Determines what a node is a member of.
  ///
  /// Functions, arrows, and variable declarators nested in another scope
  /// are inner members of that scope's doclet; class fields are instance
  /// members of their class; a nested class's constructor belongs to the
  /// class's own container. Everything else resolves through the variable
  /// tables: nearest lexical scope first, then the file-global table, then
  /// the doclet of the node's structural parent. That ordering is what lets
  /// a local alias win over a same-named global.
  pub(crate) fn astnode_to_memberof(&self, ctx: Ctx, node: NodeId) -> MemberofInfo {
    let mut result = MemberofInfo::default();
    let kind = ctx.ast.kind(node);
    let enclosing = ctx.ann.enclosing_scope(node);

    let is_scoped_value = matches!(
      kind,
      NodeKind::FunctionDeclaration(_)
        | NodeKind::FunctionExpression(_)
        | NodeKind::ArrowFunctionExpression(_)
        | NodeKind::VariableDeclarator { .. }
    );

    if is_scoped_value && enclosing.is_some() {
      let scope_longname = enclosing
        .and_then(|scope| self.doclet_by_node(scope))
        .and_then(|id| self.store.get(id).longname.clone())
        .unwrap_or_else(|| name::ANONYMOUS.to_owned());
      result.memberof = Some(format!("{}{}", scope_longname, name::PUNC_INNER));
      return result;
    }

    if matches!(
      kind,
      NodeKind::ClassProperty { .. } | NodeKind::ClassPrivateProperty { .. }
    ) {
      let scope_longname = enclosing
        .and_then(|scope| self.doclet_by_node(scope))
        .and_then(|id| self.store.get(id).longname.clone())
        .unwrap_or_else(|| name::ANONYMOUS.to_owned());
      result.memberof = Some(format!("{}{}", scope_longname, name::PUNC_INSTANCE));
      return result;
    }

    if let NodeKind::MethodDefinition { kind: method_kind, is_static, .. } = kind {
      if *method_kind == MethodKind::Constructor {
        // A top-level class's constructor is not a member of anything; a
        // nested class's constructor belongs where the class does.
        let class_memberof = enclosing
          .and_then(|scope| self.doclet_by_node(scope))
          .and_then(|id| self.store.get(id).memberof.clone());
        if let Some(class_memberof) = class_memberof {
          result.memberof = Some(format!("{}{}", class_memberof, name::PUNC_INNER));
        }
        return result;
      }

      // Methods of classes returned by arrow functions have no usable
      // syntactic name; fall back to the enclosing scope's doclet.
      let in_arrow_return = ctx
        .ann
        .nth_parent(node, 3)
        .is_some_and(|p| matches!(ctx.ast.kind(p), NodeKind::ArrowFunctionExpression(_)));
      if in_arrow_return {
        if let Some(id) = enclosing.and_then(|scope| self.doclet_by_node(scope)) {
          if let Some(longname) = self.store.get(id).longname.clone() {
            let punc = if *is_static { name::PUNC_STATIC } else { name::PUNC_INSTANCE };
            result.memberof = Some(format!("{}{}", longname, punc));
          }
        }
        return result;
      }
    }

    // The general case: is the name's basename an alias declared in some
    // enclosing scope?
    let basename = name::get_basename(&node_to_string(ctx.ast, ctx.ann, node)).to_owned();

    let mut scope = node;
    while let Some(enclosing) = ctx.ann.enclosing_scope(scope) {
      if let Some(id) = self.doclet_by_node(enclosing) {
        if self.store.get(id).defines_var(&basename) {
          result.memberof = self
            .store
            .get(id)
            .var_longname(&basename)
            .map(str::to_owned);
          result.basename = Some(basename);
          return result;
        }
      }
      scope = enclosing;
    }

    // Not in any lexical scope; is it a known file-global?
    if self.store.get(self.global_id).defines_var(&basename) {
      result.memberof = self
        .store
        .get(self.global_id)
        .var_longname(&basename)
        .map(str::to_owned);
      result.basename = Some(basename);
      return result;
    }

    // Fall back to the doclet attached to the structural parent, if any.
    if let Some(parent) = ctx.ann.parent(node) {
      if let Some(id) = self.doclet_by_node(parent) {
        let doclet = self.store.get(id);
        result.memberof = doclet.longname.clone().or_else(|| doclet.name.clone());
      }
    }
    result
  }

  /// Resolves what `this` is bound to at a node, as a longname. An empty
  /// string means the binding could not be named.
  pub(crate) fn resolve_this(&self, ctx: Ctx, node: NodeId) -> String {
    let is_property = matches!(ctx.ast.kind(node), NodeKind::Property { .. });
    let enclosing = ctx.ann.enclosing_scope(node);

    if !is_property && enclosing.is_some() {
      // For ES2015 constructors, the class declaration resolves `this`.
      let parent = ctx.ann.parent(node);
      let parent_is_constructor = parent.is_some_and(|p| {
        matches!(
          ctx.ast.kind(p),
          NodeKind::MethodDefinition { kind: MethodKind::Constructor, .. }
        )
      });
      let doclet_id = if parent_is_constructor {
        ctx
          .ann
          .nth_parent(node, 3)
          .and_then(|class| self.doclet_by_node(class))
      } else {
        enclosing.and_then(|scope| self.doclet_by_node(scope))
      };

      let Some(doclet_id) = doclet_id else {
        return name::ANONYMOUS.to_owned();
      };
      let doclet = self.store.get(doclet_id);

      if let Some(this) = &doclet.this_ {
        return this.clone();
      }
      if doclet.kind == Some(Kind::Function) && doclet.memberof.is_some() {
        // Like `Foo.prototype.bar = function() { this.name = ...; }`: if
        // the function sits in a recognizable class context (or is
        // assigned as a constructor), `this` is the owner. Otherwise it is
        // the function itself, which handles constructor-like free
        // functions.
        let parent_class = self.get_parent_class(ctx, node);
        let is_constructor_assignment = doclet
          .longname
          .as_deref()
          .is_some_and(|ln| ln.ends_with(".constructor"));
        if parent_class.is_some() || is_constructor_assignment {
          return doclet.memberof.clone().unwrap_or_default();
        }
        return doclet.longname.clone().unwrap_or_default();
      }
      if doclet.kind == Some(Kind::Member) && ctx.ast.kind(node).is_assignment() {
        return doclet.longname.clone().unwrap_or_default();
      }
      if matches!(
        doclet.kind,
        Some(Kind::Class) | Some(Kind::Interface) | Some(Kind::Module)
      ) {
        return doclet.longname.clone().unwrap_or_default();
      }
      if let Some(scope) = enclosing {
        return self.resolve_this(ctx, scope);
      }
      return String::new();
    }

    // Object literals create no lexical scope of their own; `this` in a
    // property value resolves through the object's doclet instead.
    let parent_doclet = ctx
      .ann
      .parent(node)
      .and_then(|parent| self.doclet_by_node(parent));
    match parent_doclet {
      Some(id) => self.store.get(id).longname.clone().unwrap_or_default(),
      None => String::new(),
    }
  }

  /// Finds the doclet for the lowest-level class in a node's scope chain.
  pub(crate) fn get_parent_class(&self, ctx: Ctx, node: NodeId) -> Option<DocletId> {
    let mut scope = ctx.ann.enclosing_scope(node);

    while let Some(current) = scope {
      if let Some(id) = self.doclet_by_node(current) {
        let doclet = self.store.get(id);
        if doclet.kind == Some(Kind::Class) {
          return Some(id);
        }
        // An instance member's owner might be the class.
        if let Some(longname) = &doclet.longname {
          let parts = name::atomize(longname, None);
          if parts.scope == name::PUNC_INSTANCE.to_string() {
            if let Some(owner) = self.doclet_by_longname(&parts.memberof) {
              if self.store.get(owner).kind == Some(Kind::Class) {
                return Some(owner);
              }
            }
          }
        }
      }
      scope = ctx.ann.enclosing_scope(current);
    }
    None
  }

  /// Resolves which enclosing function scope a name belongs to, walking
  /// outward through the recorded scope chain. Returns an empty string for
  /// globals. Function declarations resolve to the empty string outright,
  /// so named declarations do not pollute anonymous-scope namespaces (an
  /// intentional asymmetry from function expressions).
  pub(crate) fn resolve_var(&self, ctx: Ctx, node: NodeId, basename: &str) -> String {
    if matches!(ctx.ast.kind(node), NodeKind::FunctionDeclaration(_)) {
      return String::new();
    }
    let Some(scope) = ctx.ann.enclosing_scope(node) else {
      return String::new();
    };
    if let Some(id) = self.doclet_by_node(scope) {
      if self.store.get(id).defines_var(basename) {
        return self.store.get(id).longname.clone().unwrap_or_default();
      }
    }
    self.resolve_var(ctx, scope, basename)
  }

  /// Finds the doclets for the object (or chained-assignment objects) that
  /// a property node belongs to.
  pub(crate) fn resolve_property_parents(&self, ctx: Ctx, property: NodeId) -> Vec<DocletId> {
    let mut doclets = Vec::new();
    let mut current = ctx.ann.parent(property);
    let mut next = current.and_then(|c| ctx.ann.parent(c));

    while let Some(ancestor) = current {
      if let Some(id) = self.doclet_by_node(ancestor) {
        doclets.push(id);
      }
      // Chained assignments like `var foo = exports.FOO = { x: 1 }` have
      // several parents; keep walking while the next ancestor is one.
      let next_is_assignment = next
        .is_some_and(|n| matches!(ctx.ast.kind(n), NodeKind::AssignmentExpression { .. }));
      if next_is_assignment {
        current = current.and_then(|c| ctx.ann.parent(c));
        next = next.and_then(|n| ctx.ann.parent(n));
      } else {
        current = None;
      }
    }
    doclets
  }
}
