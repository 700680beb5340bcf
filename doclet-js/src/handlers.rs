//! Built-in handling of comment and symbol events: turning them into
//! doclets, back-filling memberof from scope resolution, and applying
//! module-scope defaults.

use crate::doclet::Doclet;
use crate::doclet::Kind;
use crate::doclet::Meta;
use crate::event::Cancel;
use crate::event::CommentEvent;
use crate::event::SymbolEvent;
use crate::name;
use crate::name::Scope;
use crate::parser::Ctx;
use crate::parser::ModuleInfo;
use crate::parser::Parser;
use crate::store::DocletId;
use estree_js::ast::MethodKind;
use estree_js::ast::NodeKind;

// `@also` splits one comment into several doclets. The marker must end at a
// word boundary so prose like `@alsoKnownAs` survives.
fn split_also(comment: &str) -> Vec<String> {
  let mut parts = Vec::new();
  let mut rest = comment;
  loop {
    match rest.find("@also") {
      Some(idx)
        if rest[idx + "@also".len()..]
          .chars()
          .next()
          .map_or(true, |c| !c.is_alphanumeric()) =>
      {
        parts.push(rest[..idx].to_owned());
        rest = &rest[idx + "@also".len()..];
      }
      _ => {
        parts.push(rest.to_owned());
        return parts;
      }
    }
  }
}

impl Parser {
  // Builds a doclet from a comment, degrading to an undocumented doclet
  // when the comment cannot be interpreted (authoring errors are reported,
  // not fatal).
  pub(crate) fn create_doclet(&mut self, comment: &str, meta: Meta) -> Doclet {
    match Doclet::from_comment(&self.dict, comment, meta.clone()) {
      Ok(doclet) => doclet,
      Err(err) => {
        tracing::error!("cannot create a doclet for the comment: {}", err);
        self.diagnostics.push(err);
        Doclet::undocumented(&self.dict, meta)
      }
    }
  }

  // A comment that names a symbol itself ("virtual comment") attached to a
  // code symbol has nothing to do with that symbol; the symbol gets an
  // undocumented doclet instead.
  fn create_symbol_doclet(&mut self, comment: &str, meta: Meta) -> Doclet {
    let doclet = self.create_doclet(comment, meta.clone());
    if doclet.name.is_some() {
      return Doclet::undocumented(&self.dict, meta);
    }
    doclet
  }

  /// Handles a `jsdocCommentFound` event: virtual comments (those carrying
  /// their own `@name`) become standalone doclets.
  pub(crate) fn on_jsdoc_comment(&mut self, ctx: Ctx, event: &CommentEvent) {
    for comment in split_also(&event.comment) {
      let meta = Meta {
        filename: Some(event.filename.clone()),
        lineno: event.lineno,
        columnno: event.columnno,
        range: event.range,
        ..Meta::default()
      };
      let mut doclet = self.create_doclet(&comment, meta);
      if doclet.name.is_none() {
        continue;
      }

      self.set_module_scope_memberof(ctx, &mut doclet);
      doclet.post_process(&self.dict);

      // Anything still scopeless is global, except modules.
      if doclet.scope.is_none() && doclet.kind != Some(Kind::Module) {
        doclet.scope = Some(Scope::Global);
      }

      self.add_doclet(doclet);
    }
  }

  /// Handles a `symbolFound` event: builds one doclet per `@also` section.
  pub(crate) fn on_symbol_found(&mut self, ctx: Ctx, event: &mut SymbolEvent) {
    for comment in split_also(&event.comment) {
      if let Some(id) = self.new_symbol_doclet(ctx, event, &comment) {
        event.doclet = Some(id);
      }
    }
  }

  fn new_symbol_doclet(
    &mut self,
    ctx: Ctx,
    event: &SymbolEvent,
    comment: &str,
  ) -> Option<DocletId> {
    let meta = self.meta_for(event);
    let mut doclet = self.create_symbol_doclet(comment, meta);

    if doclet.alias.is_some() {
      self.process_alias(ctx, &mut doclet, event);
    } else if !event.code.name.is_empty() {
      if let Err(err) = doclet.add_tag(&self.dict, "name", &event.code.name) {
        tracing::error!("{}", err);
        self.diagnostics.push(err);
      }
      if doclet.memberof.is_none() {
        self.add_symbol_memberof(ctx, &mut doclet, event);
      }
      doclet.post_process(&self.dict);
    } else {
      return None;
    }

    // Global unless it belongs to something, is a module, or is the sole
    // export of the current module.
    let is_module_exports = self
      .current_module
      .as_ref()
      .is_some_and(|module| Some(module.longname.as_str()) == doclet.name.as_deref());
    if doclet.memberof.is_none() && doclet.kind != Some(Kind::Module) && !is_module_exports {
      doclet.scope = Some(Scope::Global);
    }

    if let (Some(hint), Some(Kind::Member)) = (event.code.kind_hint, doclet.kind) {
      doclet.kind = Some(hint);
    }

    Some(self.add_doclet(doclet))
  }

  // `@alias` (and `@lends`/`@constructs`) overrides the symbol name. The
  // `{@thisClass}` placeholder resolves against the enclosing class.
  fn process_alias(&mut self, ctx: Ctx, doclet: &mut Doclet, event: &SymbolEvent) {
    if doclet.alias.as_deref() == Some("{@thisClass}") {
      let mut owner = self.resolve_this(ctx, event.astnode);
      // The class is the owner of the prototype, not the prototype itself.
      let stripped = owner
        .strip_suffix(".prototype")
        .or_else(|| owner.strip_suffix('#'))
        .map(str::to_owned);
      if let Some(stripped) = stripped {
        owner = stripped;
      }
      doclet.alias = Some(owner);
    }
    let alias = doclet.alias.clone().unwrap_or_default();
    if let Err(err) = doclet.add_tag(&self.dict, "name", &alias) {
      tracing::error!("{}", err);
      self.diagnostics.push(err);
    }
    doclet.post_process(&self.dict);
  }

  // Is the doclet name an unresolved reference to the module object or to
  // `this`? Returns the matched prefix and the punctuation after it.
  fn unresolved_prefix(&self, doclet_name: &str) -> Option<(String, Option<char>)> {
    let mut candidates = vec![
      "module.exports".to_owned(),
      "exports".to_owned(),
      "this".to_owned(),
    ];
    if let Some(module) = &self.current_module {
      if !module.original_name.is_empty() {
        candidates.push(module.original_name.clone());
      }
    }

    for candidate in candidates {
      if let Some(rest) = doclet_name.strip_prefix(candidate.as_str()) {
        match rest.chars().next() {
          None => return Some((candidate, None)),
          Some(c @ ('.' | '[')) => return Some((candidate, Some(c))),
          Some(_) => continue,
        }
      }
    }
    None
  }

  fn add_symbol_memberof(&mut self, ctx: Ctx, doclet: &mut Doclet, event: &SymbolEvent) {
    let doclet_name = doclet.name.clone().unwrap_or_default();

    if let Some((prefix, trailing)) = self.unresolved_prefix(&doclet_name) {
      let (memberof, scope_punc) =
        self.find_symbol_memberof(ctx, doclet, event, &prefix, trailing);
      if !memberof.is_empty() {
        let name = doclet.name.clone().unwrap_or_default();
        doclet.name = Some(if name.is_empty() {
          memberof
        } else {
          format!("{}{}{}", memberof, scope_punc, name)
        });
      }
      return;
    }

    let info = self.astnode_to_memberof(ctx, event.astnode);
    if let Some(memberof) = info.memberof.filter(|m| !m.is_empty()) {
      if let Err(err) = doclet.add_tag(&self.dict, "memberof", &memberof) {
        tracing::error!("{}", err);
        self.diagnostics.push(err);
      }
      if let Some(basename) = info.basename {
        // The alias's basename is already part of the memberof; drop it
        // (and the punctuation after it) from the name.
        if let Some(name) = &doclet.name {
          if name.len() > basename.len() + 1 && name.starts_with(basename.as_str()) {
            doclet.name = Some(name[basename.len() + 1..].to_owned());
          }
        }
      }
    } else {
      self.set_module_scope_memberof(ctx, doclet);
    }
  }

  // Resolves `exports.x` / `module.exports` / `this.x` names against the
  // current module and the `this` binding.
  fn find_symbol_memberof(
    &mut self,
    ctx: Ctx,
    doclet: &mut Doclet,
    event: &SymbolEvent,
    prefix: &str,
    trailing: Option<char>,
  ) -> (String, String) {
    let is_module_object = doclet.name.as_deref() == Some("module.exports");
    // A computed member may be static or instance; leave it undecided.
    let trailing = if trailing == Some('[') { None } else { trailing };
    let name_and_punc = match trailing {
      Some(c) => format!("{}{}", prefix, c),
      None => prefix.to_owned(),
    };

    if !is_module_object {
      if let Some(name) = &doclet.name {
        doclet.name = Some(name.replacen(&name_and_punc, "", 1));
      }
    }

    if prefix != "this" && self.current_module.is_some() && !is_module_object {
      // Like `exports.bar = 1` or `module.exports.bar = 1`.
      let memberof = self.current_module.as_ref().unwrap().longname.clone();
      (memberof, name::PUNC_STATIC.to_string())
    } else if is_module_object && self.current_module.is_some() {
      // Like `module.exports = thing`: the doclet is the module itself.
      let module_longname = self.current_module.as_ref().unwrap().longname.clone();
      if let Err(err) = doclet.add_tag(&self.dict, "name", &module_longname) {
        tracing::error!("{}", err);
        self.diagnostics.push(err);
      }
      doclet.post_process(&self.dict);
      (String::new(), String::new())
    } else {
      let memberof = self.resolve_this(ctx, event.astnode);
      if prefix == "this" && self.current_module.is_some() && memberof.is_empty() {
        // `this.foo = 1` at the top level of a module.
        let memberof = self.current_module.as_ref().unwrap().longname.clone();
        (memberof, name::PUNC_STATIC.to_string())
      } else {
        (memberof, name::PUNC_INSTANCE.to_string())
      }
    }
  }

  // CommonJS module defaults: inside a module, method definitions get their
  // scope from the node, exported declarations are static, everything else
  // is an inner member; whatever has no memberof yet belongs to the module.
  pub(crate) fn set_module_scope_memberof(&mut self, ctx: Ctx, doclet: &mut Doclet) {
    let Some(module) = self.get_module() else {
      return;
    };
    if Some(module.longname.as_str()) == doclet.name.as_deref() {
      return;
    }
    let mut skip_memberof = false;

    if doclet.scope.is_none() {
      let code_node = doclet.meta.code.node;
      let node_kind = code_node.map(|n| ctx.ast.kind(n));

      if let Some(NodeKind::MethodDefinition { kind: method_kind, is_static, .. }) = node_kind {
        let parent_doclet = code_node
          .and_then(|n| ctx.ann.nth_parent(n, 2))
          .and_then(|class| self.doclet_by_node(class));
        let parent_alias =
          parent_doclet.and_then(|id| self.store.get(id).alias.clone());

        if *method_kind == MethodKind::Constructor && parent_alias.is_some() {
          // The constructor takes the aliased class's name outright.
          let alias = parent_alias.unwrap();
          for (title, text) in [("alias", alias.clone()), ("name", alias)] {
            if let Err(err) = doclet.add_tag(&self.dict, title, &text) {
              tracing::error!("{}", err);
              self.diagnostics.push(err);
            }
          }
          skip_memberof = true;
        } else {
          let scope_tag = if *is_static { "static" } else { "instance" };
          if let Err(err) = doclet.add_tag(&self.dict, scope_tag, "") {
            tracing::error!("{}", err);
            self.diagnostics.push(err);
          }
          if let Some(alias) = parent_alias {
            doclet.memberof = Some(alias);
          }
        }
      } else {
        let exported = code_node
          .and_then(|n| ctx.ann.parent(n))
          .is_some_and(|p| matches!(ctx.ast.kind(p), NodeKind::ExportNamedDeclaration { .. }));
        let scope_tag = if exported { "static" } else { "inner" };
        if let Err(err) = doclet.add_tag(&self.dict, scope_tag, "") {
          tracing::error!("{}", err);
          self.diagnostics.push(err);
        }
      }
    }

    if doclet.memberof.is_none() && doclet.scope != Some(Scope::Global) && !skip_memberof {
      if let Err(err) = doclet.add_tag(&self.dict, "memberof", &module.longname) {
        tracing::error!("{}", err);
        self.diagnostics.push(err);
      }
    }
  }

  fn get_module(&self) -> Option<ModuleInfo> {
    self
      .inferred_modules
      .last()
      .cloned()
      .or_else(|| self.current_module.clone())
  }

  // Tracks the current module as doclets are added; `module:` longnames on
  // non-module doclets (from `@alias module:foo.Bar`) infer one.
  fn set_module(&mut self, doclet: &Doclet) {
    if doclet.kind == Some(Kind::Module) {
      if let Some(longname) = &doclet.longname {
        self.current_module = Some(ModuleInfo {
          longname: longname.clone(),
          original_name: doclet.meta.code.name.clone(),
        });
      }
      return;
    }
    if let Some(longname) = &doclet.longname {
      if longname.starts_with(name::MODULE_NAMESPACE) {
        // The inferred module is the root of the longname chain.
        let mut root = longname.clone();
        loop {
          let memberof = name::atomize(&root, None).memberof;
          if memberof.is_empty() {
            break;
          }
          root = memberof;
        }
        self.inferred_modules.push(ModuleInfo {
          longname: root,
          original_name: String::new(),
        });
      }
    }
  }

  /// Adds a finished doclet: tracks module state, fires `newDoclet`, and
  /// stores the doclet unless a listener cancelled it or its longname is a
  /// bare prototype. Suppressed doclets stay reachable by id so finishers
  /// can still update them.
  pub(crate) fn add_doclet(&mut self, mut doclet: Doclet) -> DocletId {
    self.set_module(&doclet);

    let mut cancel = Cancel::new();
    self.emit(|l| l.new_doclet(&mut doclet, &mut cancel));

    // You can't document a bare prototype.
    let filtered = doclet
      .longname
      .as_deref()
      .is_some_and(|longname| longname.ends_with('#'));

    if cancel.is_cancelled() || filtered {
      self.store.add_cache_only(doclet)
    } else {
      self.store.add(doclet)
    }
  }
}
