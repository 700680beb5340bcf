//! The parse driver: walks each file's AST in order, pairs comments with
//! symbol-bearing nodes, builds doclets through the tag dictionary, and
//! maintains the node-id and longname caches the scope resolver consults.
//!
//! Processing is single-threaded and strictly in the order files are
//! supplied; a later file's resolution may depend on doclets produced by an
//! earlier one, never the other way around.

use crate::dictionary::TagDictionary;
use crate::doclet::Doclet;
use crate::doclet::Kind;
use crate::doclet::Meta;
use crate::doclet::Param;
use crate::error::DocletError;
use crate::event::Cancel;
use crate::event::CommentEvent;
use crate::event::ParseListener;
use crate::event::SymbolEvent;
use crate::name;
use crate::store::DocletId;
use crate::store::DocletStore;
use crate::visit;
use crate::visit::get_info;
use crate::visit::leading_jsdoc_comment;
use crate::walk::walk;
use crate::walk::Annotations;
use ahash::AHashMap;
use ahash::AHashSet;
use estree_js::ast::Ast;
use estree_js::ast::MethodKind;
use estree_js::ast::NodeId;
use estree_js::ast::NodeKind;

/// One input file: a name and the AST an external front-end built for it.
pub struct SourceFile {
  pub filename: String,
  pub ast: Ast,
}

/// Borrowed per-file context threaded through resolution.
#[derive(Clone, Copy)]
pub(crate) struct Ctx<'a> {
  pub ast: &'a Ast,
  pub ann: &'a Annotations,
  pub filename: &'a str,
}

/// The module a file is currently documenting.
#[derive(Clone, Debug)]
pub(crate) struct ModuleInfo {
  pub longname: String,
  pub original_name: String,
}

/// Deferred per-symbol actions that run after the symbol's doclet exists.
#[derive(Clone, Debug)]
pub(crate) enum Finisher {
  /// Merge an inline-documented parameter into its function's doclet.
  InlineParams,
  /// Record literal default values for defaulted parameters.
  DefaultParams,
  /// Mark a documented rest parameter as repeatable.
  RestParam,
  /// Flag async functions.
  AsyncFunction,
  /// Flag generator functions.
  Generator,
  /// Merge a constructor's doclet into its class's doclet.
  Constructor,
  /// Collect enum members onto the enum doclet's properties.
  ResolveEnum,
  /// Private class fields are always private.
  PrivateProperty,
  /// Upgrade the enclosing scope's variable table entry to the documented
  /// longname.
  Vars { scope: DocletId, name: String },
}

/// The parse driver. Owns the tag dictionary, the doclet store being built,
/// and the caches scope resolution reads.
pub struct Parser {
  pub(crate) dict: TagDictionary,
  pub(crate) store: DocletStore,
  /// Doclets by the id of their value node; most recent wins. Node ids are
  /// per-file, so this resets at each file boundary.
  pub(crate) by_node_id: AHashMap<NodeId, Vec<DocletId>>,
  /// Doclets by longname, including cache-only entries; most recent wins.
  /// Persists across files so later files can resolve earlier globals.
  pub(crate) by_longname: AHashMap<String, Vec<DocletId>>,
  pub(crate) global_id: DocletId,
  pub(crate) current_module: Option<ModuleInfo>,
  pub(crate) inferred_modules: Vec<ModuleInfo>,
  listeners: Vec<Box<dyn ParseListener>>,
  pub(crate) diagnostics: Vec<DocletError>,
  seen_comments: AHashSet<(usize, usize, String)>,
}

impl Parser {
  pub fn new(dict: TagDictionary) -> Parser {
    let mut store = DocletStore::new();
    let mut global = Doclet::default();
    global.longname = Some(name::GLOBAL.to_owned());
    let global_id = store.add_cache_only(global);

    let mut by_longname: AHashMap<String, Vec<DocletId>> = AHashMap::new();
    by_longname.insert(name::GLOBAL.to_owned(), vec![global_id]);

    Parser {
      dict,
      store,
      by_node_id: AHashMap::new(),
      by_longname,
      global_id,
      current_module: None,
      inferred_modules: Vec::new(),
      listeners: Vec::new(),
      diagnostics: Vec::new(),
      seen_comments: AHashSet::new(),
    }
  }

  pub fn add_listener(&mut self, listener: Box<dyn ParseListener>) {
    self.listeners.push(listener);
  }

  pub fn dictionary(&self) -> &TagDictionary {
    &self.dict
  }

  pub fn results(&self) -> &DocletStore {
    &self.store
  }

  pub fn diagnostics(&self) -> &[DocletError] {
    &self.diagnostics
  }

  /// Consumes the parser, yielding the store and accumulated diagnostics.
  pub fn finish(self) -> (DocletStore, Vec<DocletError>) {
    (self.store, self.diagnostics)
  }

  /// Runs the post-parse graph transforms (augment, borrow) over the
  /// completed store, then fires `processingComplete`.
  pub fn post_process(&mut self) {
    let mut errors = crate::augment::augment_all(&mut self.store);
    for error in &errors {
      tracing::error!("{}", error);
    }
    self.diagnostics.append(&mut errors);
    crate::borrow::resolve_borrows(&mut self.store);

    let mut listeners = std::mem::take(&mut self.listeners);
    for listener in &mut listeners {
      listener.processing_complete(&self.store);
    }
    self.listeners = listeners;
  }

  pub(crate) fn emit(&mut self, mut f: impl FnMut(&mut dyn ParseListener)) {
    let mut listeners = std::mem::take(&mut self.listeners);
    for listener in &mut listeners {
      f(listener.as_mut());
    }
    self.listeners = listeners;
  }

  /// Parses the given files, in order.
  pub fn parse(&mut self, files: Vec<SourceFile>) {
    let filenames: Vec<String> = files.iter().map(|f| f.filename.clone()).collect();
    self.emit(|l| l.parse_begin(&filenames));

    for file in files {
      self.parse_file(file);
    }

    let count = self.store.len();
    self.emit(|l| l.parse_complete(&filenames, count));
    tracing::debug!(files = filenames.len(), doclets = count, "finished parsing source files");
  }

  fn parse_file(&mut self, file: SourceFile) {
    let SourceFile { filename, mut ast } = file;

    let mut cancel = Cancel::new();
    self.emit(|l| l.file_begin(&filename, &mut cancel));
    if cancel.is_cancelled() {
      self.emit(|l| l.file_complete(&filename));
      return;
    }
    self.emit(|l| l.before_parse(&filename));
    tracing::debug!(file = %filename, "parsing");

    let walked = walk(&mut ast);
    self.by_node_id.clear();
    self.seen_comments.clear();

    for &node in &walked.order {
      let mut stop = false;
      self.emit(|l| {
        if l.visit_node(node, &filename) == crate::event::Flow::Stop {
          stop = true;
        }
      });
      if stop {
        break;
      }

      self.visit_node_comments(&mut ast, &walked.annotations, &filename, node);
      let ctx = Ctx {
        ast: &ast,
        ann: &walked.annotations,
        filename: &filename,
      };
      self.visit_node(ctx, node);
    }

    self.current_module = None;
    self.inferred_modules.clear();
    self.emit(|l| l.file_complete(&filename));
  }

  // Fires `jsdocCommentFound` for every doc comment on the node, feeding
  // possibly-rewritten text back into the tree so symbol processing sees
  // what listeners saw.
  fn visit_node_comments(
    &mut self,
    ast: &mut Ast,
    ann: &Annotations,
    filename: &str,
    node: NodeId,
  ) {
    let is_program = matches!(ast.kind(node), NodeKind::Program { .. });
    let mut updates: Vec<(bool, usize, String)> = Vec::new();

    let data = ast.node(node);
    let mut candidates: Vec<(bool, usize)> = (0..data.leading_comments.len())
      .map(|i| (true, i))
      .collect();
    if is_program {
      candidates.extend((0..data.trailing_comments.len()).map(|i| (false, i)));
    }

    for (leading, idx) in candidates {
      let comment = if leading {
        &ast.node(node).leading_comments[idx]
      } else {
        &ast.node(node).trailing_comments[idx]
      };
      if !comment.block {
        continue;
      }
      let raw = comment.raw();
      if !visit::is_valid_jsdoc(&raw) {
        continue;
      }
      let key = (comment.range.0, comment.range.1, raw.clone());
      if !self.seen_comments.insert(key) {
        continue;
      }

      let mut event = CommentEvent {
        comment: raw.clone(),
        filename: filename.to_owned(),
        lineno: Some(comment.span.start.line),
        columnno: Some(comment.span.start.column),
        range: if comment.range.is_empty() {
          None
        } else {
          Some((comment.range.0, comment.range.1))
        },
      };
      self.emit(|l| l.jsdoc_comment_found(&mut event));

      if event.comment != raw {
        updates.push((leading, idx, event.comment.clone()));
      }
      let ctx = Ctx { ast: &*ast, ann, filename };
      self.on_jsdoc_comment(ctx, &event);
    }

    for (leading, idx, text) in updates {
      let data = ast.node_mut(node);
      let comment = if leading {
        &mut data.leading_comments[idx]
      } else {
        &mut data.trailing_comments[idx]
      };
      let stripped = text
        .strip_prefix("/*")
        .and_then(|t| t.strip_suffix("*/"))
        .unwrap_or(&text);
      comment.text = stripped.to_owned();
    }
  }

  fn visit_node(&mut self, ctx: Ctx, node: NodeId) {
    let Some(mut event) = self.make_symbol_found(ctx, node) else {
      return;
    };

    let mut cancel = Cancel::new();
    self.emit(|l| l.symbol_found(&mut event, &mut cancel));

    if !cancel.is_cancelled() {
      self.on_symbol_found(ctx, &mut event);
    }
    self.add_doclet_ref(ctx, &event);

    let finishers = event.finishers.clone();
    for finisher in finishers {
      self.run_finisher(ctx, &event, finisher);
    }
  }

  // Decides whether a node is symbol-bearing and, if so, bundles its raw
  // comment with the structural facts extracted from it.
  fn make_symbol_found(&mut self, ctx: Ctx, node: NodeId) -> Option<SymbolEvent> {
    let kind = ctx.ast.kind(node);
    let has_comment = !ctx.ast.node(node).leading_comments.is_empty();
    let parent_is_function = ctx
      .ann
      .parent(node)
      .is_some_and(|p| ctx.ast.kind(p).is_function());

    let mut event = match kind {
      NodeKind::AssignmentExpression { .. } => {
        let mut event = self.new_symbol_event(ctx, node);
        self.track_vars(ctx, node, &mut event);
        let basename = name::get_basename(&event.code.name).to_owned();
        if basename != "this" {
          let funcscope = self.resolve_var(ctx, node, &basename);
          if !funcscope.is_empty() {
            event.code.funcscope = Some(funcscope);
          }
        }
        event
      }
      NodeKind::AssignmentPattern { .. }
      | NodeKind::Identifier { .. }
      | NodeKind::RestElement { .. } => {
        // Parameters only matter when they carry inline documentation.
        if !(has_comment && parent_is_function) {
          return None;
        }
        let mut event = self.new_symbol_event(ctx, node);
        event.finishers.push(Finisher::InlineParams);
        self.track_vars(ctx, node, &mut event);
        event
      }
      NodeKind::ClassDeclaration(_) | NodeKind::ClassExpression(_) => {
        let mut event = self.new_symbol_event(ctx, node);
        self.track_vars(ctx, node, &mut event);
        event
      }
      NodeKind::ClassPrivateProperty { .. } => {
        let mut event = self.new_symbol_event(ctx, node);
        event.finishers.push(Finisher::ResolveEnum);
        event.finishers.push(Finisher::PrivateProperty);
        event
      }
      NodeKind::ClassProperty { .. } => {
        let mut event = self.new_symbol_event(ctx, node);
        event.finishers.push(Finisher::ResolveEnum);
        event
      }
      NodeKind::ExportAllDeclaration { .. } => self.new_symbol_event(ctx, node),
      NodeKind::ExportDefaultDeclaration { .. }
      | NodeKind::ExportNamedDeclaration { .. }
      | NodeKind::ExportSpecifier { .. } => {
        let mut event = self.new_symbol_event(ctx, node);
        self.track_vars(ctx, node, &mut event);
        event
      }
      NodeKind::ArrowFunctionExpression(_)
      | NodeKind::FunctionDeclaration(_)
      | NodeKind::FunctionExpression(_) => {
        let mut event = self.new_symbol_event(ctx, node);
        event.finishers.extend([
          Finisher::DefaultParams,
          Finisher::RestParam,
          Finisher::AsyncFunction,
          Finisher::Generator,
        ]);
        self.track_vars(ctx, node, &mut event);
        let basename = name::get_basename(&event.code.name).to_owned();
        let funcscope = self.resolve_var(ctx, node, &basename);
        if !funcscope.is_empty() {
          event.code.funcscope = Some(funcscope);
        }
        event
      }
      NodeKind::MemberExpression { .. } => {
        // Bare commented member expressions, like Closure-style
        // `/** @typedef {string} */ obj.prop;`.
        if !has_comment {
          return None;
        }
        self.new_symbol_event(ctx, node)
      }
      NodeKind::MethodDefinition { kind: method_kind, .. } => {
        let method_kind = *method_kind;
        let mut event = self.new_symbol_event(ctx, node);
        event.finishers.extend([
          Finisher::DefaultParams,
          Finisher::RestParam,
          Finisher::AsyncFunction,
          Finisher::Generator,
        ]);
        if method_kind == MethodKind::Constructor {
          event.finishers.push(Finisher::Constructor);
        }
        event
      }
      NodeKind::ObjectExpression { .. } => self.new_symbol_event(ctx, node),
      NodeKind::Property { .. } => {
        let mut event = self.new_symbol_event(ctx, node);
        if !ctx.ast.kind(node).is_accessor() {
          event.finishers.push(Finisher::ResolveEnum);
        }
        event
      }
      NodeKind::VariableDeclarator { .. } => {
        let mut event = self.new_symbol_event(ctx, node);
        event.finishers.extend([
          Finisher::DefaultParams,
          Finisher::RestParam,
          Finisher::AsyncFunction,
          Finisher::Generator,
        ]);
        self.track_vars(ctx, node, &mut event);
        let const_decl = ctx.ann.parent(node).is_some_and(|p| {
          matches!(
            ctx.ast.kind(p),
            NodeKind::VariableDeclaration { kind: estree_js::ast::VarDeclKind::Const, .. }
          )
        });
        if const_decl {
          event.code.kind_hint = Some(Kind::Constant);
        }
        event
      }
      _ => return None,
    };

    event.filename = ctx.filename.to_owned();
    Some(event)
  }

  fn new_symbol_event(&self, ctx: Ctx, node: NodeId) -> SymbolEvent {
    let data = ctx.ast.node(node);
    SymbolEvent {
      astnode: node,
      comment: leading_jsdoc_comment(&data.leading_comments)
        .unwrap_or_else(|| "@undocumented".to_owned()),
      filename: ctx.filename.to_owned(),
      lineno: Some(data.span.start.line),
      columnno: Some(data.span.start.column),
      range: if data.range.is_empty() {
        None
      } else {
        Some((data.range.0, data.range.1))
      },
      code: get_info(ctx.ast, ctx.ann, node),
      doclet: None,
      finishers: Vec::new(),
    }
  }

  pub(crate) fn meta_for(&self, event: &SymbolEvent) -> Meta {
    Meta {
      filename: Some(event.filename.clone()),
      lineno: event.lineno,
      columnno: event.columnno,
      range: event.range,
      code: event.code.clone(),
      vars: None,
    }
  }

  // Declares the symbol's name in the enclosing scope's variable table (or
  // the file-global table) and defers the longname upgrade to a finisher.
  fn track_vars(&mut self, ctx: Ctx, node: NodeId, event: &mut SymbolEvent) {
    let scope_doclet = match ctx.ann.enclosing_scope(node) {
      Some(scope) => self.doclet_by_node(scope),
      None => Some(self.global_id),
    };
    let Some(scope_doclet) = scope_doclet else {
      return;
    };
    self
      .store
      .get_mut(scope_doclet)
      .declare_var(&event.code.name);
    event.finishers.push(Finisher::Vars {
      scope: scope_doclet,
      name: event.code.name.clone(),
    });
  }

  // Registers the event's doclet in the lookup caches; uncommented
  // function-valued nodes get an `<anonymous>` placeholder so that nested
  // declarations can still resolve their enclosing scope.
  fn add_doclet_ref(&mut self, ctx: Ctx, event: &SymbolEvent) {
    let Some(code_node) = event.code.node else {
      return;
    };
    match event.doclet {
      Some(id) => {
        self.by_node_id.entry(code_node).or_default().push(id);
        if let Some(longname) = self.store.get(id).longname.clone() {
          self.by_longname.entry(longname).or_default().push(id);
        }
      }
      None => {
        let is_function_node = matches!(
          ctx.ast.kind(code_node),
          NodeKind::FunctionDeclaration(_)
            | NodeKind::FunctionExpression(_)
            | NodeKind::ArrowFunctionExpression(_)
        );
        if is_function_node && !self.by_node_id.contains_key(&code_node) {
          let mut placeholder = Doclet::default();
          placeholder.longname = Some(name::ANONYMOUS.to_owned());
          placeholder.undocumented = Some(true);
          placeholder.meta = self.meta_for(event);
          let id = self.store.add_cache_only(placeholder);
          self.by_node_id.entry(code_node).or_default().push(id);
          self
            .by_longname
            .entry(name::ANONYMOUS.to_owned())
            .or_default()
            .push(id);
        }
      }
    }
  }

  pub(crate) fn doclet_by_node(&self, node: NodeId) -> Option<DocletId> {
    self.by_node_id.get(&node).and_then(|ids| ids.last()).copied()
  }

  pub(crate) fn doclet_by_longname(&self, longname: &str) -> Option<DocletId> {
    self.by_longname.get(longname).and_then(|ids| ids.last()).copied()
  }

  fn run_finisher(&mut self, ctx: Ctx, event: &SymbolEvent, finisher: Finisher) {
    match finisher {
      Finisher::Vars { scope, name } => {
        let Some(id) = event.doclet else { return };
        let doclet = self.store.get(id);
        if doclet.alias.is_some() || doclet.memberof.is_some() {
          let longname = doclet.longname.clone();
          self.store.get_mut(scope).vars_mut().insert(name, longname);
        }
      }
      Finisher::InlineParams => self.finish_inline_params(ctx, event),
      Finisher::DefaultParams => self.finish_default_params(ctx, event),
      Finisher::RestParam => self.finish_rest_param(ctx, event),
      Finisher::AsyncFunction => {
        let Some(id) = event.doclet else { return };
        let Some(code_node) = event.code.node else { return };
        if visit::function_of(ctx.ast, code_node).is_some_and(|f| f.is_async) {
          self.store.get_mut(id).async_ = Some(true);
        }
      }
      Finisher::Generator => {
        let Some(id) = event.doclet else { return };
        let Some(code_node) = event.code.node else { return };
        if visit::function_of(ctx.ast, code_node).is_some_and(|f| f.generator) {
          self.store.get_mut(id).generator = Some(true);
        }
      }
      Finisher::Constructor => self.finish_constructor(ctx, event),
      Finisher::ResolveEnum => self.finish_resolve_enum(ctx, event),
      Finisher::PrivateProperty => {
        let Some(id) = event.doclet else { return };
        self.store.get_mut(id).access = Some(crate::doclet::Access::Private);
      }
    }
  }

  // Merges a parameter documented inline (before the parameter itself) into
  // the enclosing function's doclet. Parameters the function's own comment
  // already documents win.
  fn finish_inline_params(&mut self, ctx: Ctx, event: &SymbolEvent) {
    let Some(child_id) = event.doclet else { return };
    let Some(code_node) = self.store.get(child_id).meta.code.node else { return };
    let Some(parent_node) = ctx.ann.parent(code_node) else { return };
    let Some(parent_id) = self.doclet_by_node(parent_node) else { return };

    if self.store.get(child_id).kind != Some(Kind::Param) {
      return;
    }

    let child_name = self.store.get(child_id).name.clone().unwrap_or_default();
    let child_type = self.store.get(child_id).type_.clone();
    let known_params = self.store.get(parent_id).meta.code.paramnames.clone();

    let parent = self.store.get_mut(parent_id);
    let params = parent.params.get_or_insert_with(Vec::new);

    enum Step {
      Stop,
      Insert,
      Next,
    }
    let mut i = 0;
    loop {
      let step = match params.get(i) {
        // Already documented in the function's own comment.
        Some(param) if param.name.as_deref() == Some(child_name.as_str()) => Step::Stop,
        Some(_) if known_params.iter().position(|p| p == &child_name) != Some(i) => Step::Next,
        _ => Step::Insert,
      };
      match step {
        Step::Stop => break,
        Step::Next => i += 1,
        Step::Insert => {
          params.insert(i, Param {
            type_: child_type.clone(),
            name: Some(child_name.clone()),
            ..Param::default()
          });
          break;
        }
      }
    }
    self.store.get_mut(child_id).undocumented = Some(true);
  }

  // Records literal default values for parameters declared with defaults,
  // unless the documentation already supplies one.
  fn finish_default_params(&mut self, ctx: Ctx, event: &SymbolEvent) {
    let Some(id) = event.doclet else { return };
    let Some(code_node) = event.code.node else { return };
    let params = visit::param_nodes(ctx.ast, code_node);

    let mut documented = self.store.get(id).params.clone().unwrap_or_default();
    let mut j = 0;
    for &param in &params {
      let Some(doc) = documented.get_mut(j) else { break };
      let (param_name, default) = match ctx.ast.kind(param) {
        NodeKind::AssignmentPattern { left, right } => (
          visit::node_to_string(ctx.ast, ctx.ann, *left),
          Some(*right),
        ),
        _ => (visit::node_to_string(ctx.ast, ctx.ann, param), None),
      };
      if doc.name.as_deref() != Some(param_name.as_str()) {
        continue;
      }
      if let Some(default) = default {
        if matches!(ctx.ast.kind(default), NodeKind::Literal { .. }) && doc.defaultvalue.is_none()
        {
          let value = visit::node_to_value(ctx.ast, ctx.ann, default);
          if value != serde_json::Value::String(String::new()) {
            doc.defaultvalue = Some(value);
          }
        }
      }
      j += 1;
    }
    self.store.get_mut(id).params = Some(documented);
  }

  // A documented rest parameter is repeatable.
  fn finish_rest_param(&mut self, ctx: Ctx, event: &SymbolEvent) {
    let Some(id) = event.doclet else { return };
    let Some(code_node) = event.code.node else { return };
    let params = visit::param_nodes(ctx.ast, code_node);
    let rest_name = params.iter().find_map(|&param| match ctx.ast.kind(param) {
      NodeKind::RestElement { argument } => {
        Some(visit::node_to_string(ctx.ast, ctx.ann, *argument))
      }
      _ => None,
    });
    let Some(rest_name) = rest_name else { return };

    let doclet = self.store.get_mut(id);
    if let Some(params) = &mut doclet.params {
      for param in params.iter_mut().rev() {
        if param.name.as_deref() == Some(rest_name.as_str()) {
          param.variable = Some(true);
          break;
        }
      }
    }
  }

  // Merges a constructor's doclet into the class's, so a class and its
  // constructor can be documented with separate comments.
  fn finish_constructor(&mut self, ctx: Ctx, event: &SymbolEvent) {
    let Some(child_id) = event.doclet else { return };
    let Some(code_node) = event.code.node else { return };

    // Named module exports document the export statement, not the class.
    let export_parent = ctx.ann.nth_parent(code_node, 3).filter(|&p| {
      matches!(ctx.ast.kind(p), NodeKind::ExportNamedDeclaration { .. })
    });
    let class_node = export_parent.or_else(|| ctx.ann.nth_parent(code_node, 2));
    let Some(parent_id) = class_node.and_then(|n| self.doclet_by_node(n)) else {
      return;
    };
    if !self.store.get(parent_id).is_documented() {
      return;
    }

    // The class doclet has the right kind, longname, and memberof; the
    // constructor contributes params and description.
    let combined =
      crate::doclet::combine(self.store.get(parent_id), self.store.get(child_id));
    self.store.add(combined);

    self.store.get_mut(parent_id).undocumented = Some(true);
    self.store.get_mut(child_id).undocumented = Some(true);
  }

  // Members of an `@enum` object become properties of the enum doclet and
  // inherit its type.
  fn finish_resolve_enum(&mut self, ctx: Ctx, event: &SymbolEvent) {
    let Some(child_id) = event.doclet else { return };
    let Some(code_node) = event.code.node else { return };
    let Some(property_node) = ctx.ann.parent(code_node) else { return };
    let parents = self.resolve_property_parents(ctx, property_node);

    for parent_id in parents {
      if self.store.get(parent_id).is_enum != Some(true) {
        continue;
      }

      let parent_type = self.store.get(parent_id).type_.clone();
      let child = self.store.get_mut(child_id);
      if child.type_.is_none() {
        child.type_ = parent_type;
      }
      child.undocumented = None;
      child.defaultvalue = child.meta.code.value.clone();

      let member = Param {
        type_: child.type_.clone(),
        name: child.name.clone(),
        description: child.description.clone(),
        defaultvalue: child.defaultvalue.clone(),
        ..Param::default()
      };
      self
        .store
        .get_mut(parent_id)
        .properties
        .get_or_insert_with(Vec::new)
        .push(member);
    }
  }
}

impl std::fmt::Debug for Parser {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Parser")
      .field("doclets", &self.store.len())
      .field("diagnostics", &self.diagnostics.len())
      .finish()
  }
}
