//! The doclet data model: the structured record describing one documented
//! (or undocumented-but-tracked) source symbol, plus the name-resolution
//! post-processing that turns tag soup into a canonical longname.

use crate::dictionary::TagDictionary;
use crate::error::DocletError;
use crate::error::DocletErrorType;
use crate::error::DocletResult;
use crate::name;
use crate::name::NameParts;
use crate::name::Scope;
use crate::tag::fix_description;
use crate::tag::to_tags;
use crate::tag::unwrap_comment;
use crate::tag::Tag;
use ahash::AHashMap;
use estree_js::ast::NodeId;
use serde::Serialize;
use serde_json::Value;

/// The kind of symbol a doclet describes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
  Class,
  Constant,
  Event,
  External,
  File,
  Function,
  Interface,
  Member,
  Mixin,
  Module,
  Namespace,
  Package,
  Param,
  Typedef,
}

impl Kind {
  pub fn name(self) -> &'static str {
    match self {
      Kind::Class => "class",
      Kind::Constant => "constant",
      Kind::Event => "event",
      Kind::External => "external",
      Kind::File => "file",
      Kind::Function => "function",
      Kind::Interface => "interface",
      Kind::Member => "member",
      Kind::Mixin => "mixin",
      Kind::Module => "module",
      Kind::Namespace => "namespace",
      Kind::Package => "package",
      Kind::Param => "param",
      Kind::Typedef => "typedef",
    }
  }

  pub fn from_name(name: &str) -> Option<Kind> {
    Some(match name {
      "class" => Kind::Class,
      "constant" => Kind::Constant,
      "event" => Kind::Event,
      "external" => Kind::External,
      "file" => Kind::File,
      "function" => Kind::Function,
      "interface" => Kind::Interface,
      "member" => Kind::Member,
      "mixin" => Kind::Mixin,
      "module" => Kind::Module,
      "namespace" => Kind::Namespace,
      "package" => Kind::Package,
      "param" => Kind::Param,
      "typedef" => Kind::Typedef,
      _ => return None,
    })
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
  Package,
  Private,
  Protected,
  Public,
}

impl Access {
  pub fn from_name(name: &str) -> Option<Access> {
    Some(match name.to_ascii_lowercase().as_str() {
      "package" => Access::Package,
      "private" => Access::Private,
      "protected" => Access::Protected,
      "public" => Access::Public,
      _ => return None,
    })
  }
}

/// A type annotation: the names from a `{...}` expression.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize)]
pub struct Type {
  pub names: Vec<String>,
}

/// A documented parameter, property, return value, or exception.
#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct Param {
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub type_: Option<Type>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub optional: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nullable: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub variable: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub defaultvalue: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Set on members copied down by inheritance flattening.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub inherited: Option<bool>,
}

/// One `@borrows` entry: the source longname, and the name it is borrowed
/// under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Borrowed {
  pub from: String,
  #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
  pub as_: Option<String>,
}

/// An unrecognized tag, kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnknownTag {
  #[serde(rename = "originalTitle")]
  pub original_title: String,
  pub title: String,
  #[serde(skip_serializing_if = "String::is_empty")]
  pub text: String,
}

/// `@deprecated` takes an optional reason; without one it is plain `true`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Deprecated {
  Flag(bool),
  Reason(String),
}

/// Source facts about the code a doclet documents, extracted from the AST
/// node. `node` is the value node (for `var foo = function() {}`, the
/// function expression), which is the node scope lookups key on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CodeInfo {
  pub id: Option<NodeId>,
  pub node: Option<NodeId>,
  pub name: String,
  /// ESTree type string of the value node.
  pub node_type: Option<String>,
  pub value: Option<Value>,
  pub paramnames: Vec<String>,
  /// The longname of the enclosing function scope the symbol's basename
  /// resolved to, when it did.
  pub funcscope: Option<String>,
  /// A kind suggested by the code shape (`const` declarations).
  pub kind_hint: Option<Kind>,
  /// The kind the code shape implies when no tag supplies one.
  pub inferred_kind: Option<Kind>,
}

/// Source position and code facts for a doclet. Never serialized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Meta {
  pub filename: Option<String>,
  pub lineno: Option<u32>,
  pub columnno: Option<u32>,
  pub range: Option<(usize, usize)>,
  pub code: CodeInfo,
  /// Local variable names declared in this scope, mapped to the longname
  /// they were documented under (if any). This is the table the scope
  /// resolver consults for alias resolution.
  pub vars: Option<AHashMap<String, Option<String>>>,
}

/// The structured record describing one source symbol.
///
/// Created from one doc comment, mutated by tag handlers during
/// construction and by the resolver and post-processors afterwards. The
/// serialized field set matches the JSDoc JSON schema; optional fields are
/// omitted when unset and `meta` is never serialized.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Doclet {
  /// The original text of the comment from the source code.
  pub comment: String,
  #[serde(skip)]
  pub meta: Meta,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub classdesc: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub longname: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub kind: Option<Kind>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scope: Option<Scope>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub memberof: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alias: Option<String>,
  #[serde(rename = "this", skip_serializing_if = "Option::is_none")]
  pub this_: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub variation: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub augments: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mixes: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub implements: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub borrowed: Option<Vec<Borrowed>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fires: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub listens: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub modifies: Option<Vec<Param>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub requires: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub params: Option<Vec<Param>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub properties: Option<Vec<Param>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub returns: Option<Vec<Param>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub yields: Option<Vec<Param>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub exceptions: Option<Vec<Param>>,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub type_: Option<Type>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub optional: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub nullable: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub variable: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub access: Option<Access>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub defaultvalue: Option<Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub defaultvaluetype: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub examples: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub see: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub todo: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub since: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub license: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub copyright: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub deprecated: Option<Deprecated>,
  #[serde(rename = "virtual", skip_serializing_if = "Option::is_none")]
  pub virtual_: Option<bool>,
  #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
  pub async_: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub generator: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub readonly: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hideconstructor: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ignore: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub undocumented: Option<bool>,
  #[serde(rename = "isEnum", skip_serializing_if = "Option::is_none")]
  pub is_enum: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub inherited: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub inherits: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mixed: Option<bool>,
  #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
  pub override_: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub inheritdoc: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub overrides: Option<String>,
  #[serde(rename = "forceMemberof", skip_serializing_if = "Option::is_none")]
  pub force_memberof: Option<bool>,
  #[serde(rename = "preserveName", skip_serializing_if = "Option::is_none")]
  pub preserve_name: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tags: Option<Vec<UnknownTag>>,
}

impl Doclet {
  /// Builds a doclet from one raw doc comment.
  ///
  /// Tag handlers from `dict` run as each tag is split out; conflicting
  /// `@name` or `@memberof` values abort with an error carrying the source
  /// context (spec: continuing would silently produce a wrong longname).
  pub fn from_comment(dict: &TagDictionary, comment: &str, meta: Meta) -> DocletResult<Doclet> {
    let mut doclet = Doclet {
      comment: comment.to_owned(),
      meta,
      ..Doclet::default()
    };

    let unwrapped = unwrap_comment(comment);
    let code_is_class = matches!(
      doclet.meta.code.node_type.as_deref(),
      Some("ClassDeclaration") | Some("ClassExpression")
    );
    let fixed = fix_description(&unwrapped, code_is_class);

    let mut seen_name: Option<String> = None;
    let mut seen_memberof: Option<String> = None;
    for raw in to_tags(&fixed) {
      let canonical = dict.normalize(&raw.title);
      if canonical == "name" {
        let value = raw.text.trim().to_owned();
        if let Some(first) = &seen_name {
          if *first != value {
            return Err(doclet.error(DocletErrorType::ConflictingName {
              first: first.clone(),
              second: value,
            }));
          }
        } else {
          seen_name = Some(value);
        }
      } else if canonical == "memberof" {
        let value = raw.text.trim().to_owned();
        if let Some(first) = &seen_memberof {
          if *first != value {
            return Err(doclet.error(DocletErrorType::ConflictingMemberof {
              first: first.clone(),
              second: value,
            }));
          }
        } else {
          seen_memberof = Some(value);
        }
      }
      doclet.add_tag(dict, &raw.title, &raw.text)?;
    }

    doclet.post_process(dict);
    Ok(doclet)
  }

  /// A bare `@undocumented` doclet carrying only source facts; the fallback
  /// when a comment cannot be interpreted.
  pub fn undocumented(dict: &TagDictionary, meta: Meta) -> Doclet {
    let mut doclet = Doclet {
      meta,
      undocumented: Some(true),
      ..Doclet::default()
    };
    doclet.post_process(dict);
    doclet
  }

  fn error(&self, typ: DocletErrorType) -> DocletError {
    DocletError::new(typ).with_context(
      self.meta.filename.as_deref(),
      self.meta.lineno,
      Some(&self.comment),
    )
  }

  /// Adds one tag to the doclet, running its dictionary handler.
  /// Unrecognized tags are kept verbatim in `tags`.
  pub fn add_tag(&mut self, dict: &TagDictionary, title: &str, text: &str) -> DocletResult<()> {
    let code_name = if self.meta.code.name.is_empty() {
      None
    } else {
      Some(self.meta.code.name.clone())
    };
    let tag = Tag::new(dict, title, text, code_name.as_deref());

    let Some(def) = dict.lookup(&tag.title) else {
      self.tags.get_or_insert_with(Vec::new).push(UnknownTag {
        original_title: tag.original_title,
        title: tag.title,
        text: tag.text,
      });
      return Ok(());
    };

    if def.must_have_value && tag.text.is_empty() {
      tracing::warn!(
        tag = %tag.title,
        file = self.meta.filename.as_deref().unwrap_or(""),
        "{}",
        self.error(DocletErrorType::TagMissingValue(tag.title.clone()))
      );
      return Ok(());
    }
    if def.must_not_have_value && !tag.text.is_empty() {
      tracing::warn!(
        tag = %tag.title,
        file = self.meta.filename.as_deref().unwrap_or(""),
        "{}",
        self.error(DocletErrorType::TagForbidsValue(tag.title.clone()))
      );
    }

    (def.on_tagged)(self, &tag, dict)
  }

  // An empty longname counts as unset; handlers re-run post-processing
  // after adding a name, and resolution must fire again then.
  fn longname_unset(&self) -> bool {
    self.longname.as_deref().map_or(true, str::is_empty)
  }

  /// Post-processing run once after all tags are applied: resolves the
  /// name/memberof/longname triple, infers the kind from the code when no
  /// tag supplied one, appends the variation suffix, and back-fills unnamed
  /// `@param` entries from the code's parameter names.
  pub fn post_process(&mut self, dict: &TagDictionary) {
    if self.preserve_name != Some(true) {
      self.resolve_names(dict);
    }
    if self.longname_unset() {
      if let Some(name) = self.name.clone() {
        if !name.is_empty() {
          self.set_longname(dict, &name);
        }
      }
    }
    if self.memberof.as_deref() == Some("") {
      self.memberof = None;
    }

    if self.kind.is_none() {
      if let Some(kind) = self.meta.code.inferred_kind {
        self.kind = Some(kind);
      }
    }

    if let (Some(variation), Some(longname)) = (self.variation.clone(), self.longname.clone()) {
      if !longname.ends_with(')') {
        self.longname = Some(format!("{}({})", longname, variation));
      }
    }

    if let Some(params) = &mut self.params {
      let paramnames = &self.meta.code.paramnames;
      for (i, param) in params.iter_mut().enumerate() {
        if param.name.is_none() {
          param.name = Some(paramnames.get(i).cloned().unwrap_or_default());
        }
      }
    }
  }

  // The name-resolution core: combines `name`, `memberof`, `scope`, and the
  // code's enclosing-function longname into the doclet's canonical triple.
  fn resolve_names(&mut self, dict: &TagDictionary) {
    let mut name = self.name.clone().unwrap_or_default();
    let mut memberof = self.memberof.clone().unwrap_or_default();
    let mut about = NameParts::default();

    if !name.is_empty() && self.kind.is_some() {
      name = name::prototype_to_punc(&name);
    }
    self.name = Some(name.clone());

    if self.alias.is_some() {
      // The alias already identifies the memberof, if any.
      about = name::atomize(&name, None);
      if !about.memberof.is_empty() {
        memberof = about.memberof.clone();
      }
    } else if !name.is_empty() && memberof.is_empty() {
      if let Some(funcscope) = &self.meta.code.funcscope {
        // Member of a var in an outer scope.
        name = format!("{}{}{}", funcscope, name::PUNC_INNER, name);
        self.longname = Some(name.clone());
      }
    }

    if !memberof.is_empty() || self.force_memberof == Some(true) {
      memberof = name::prototype_to_punc(&memberof);
      let forced = if self.force_memberof == Some(true) {
        Some(memberof.clone())
      } else {
        None
      };
      let forced = forced.as_deref();

      if !name.is_empty() && name::name_is_longname(&name, &memberof) && name != memberof {
        // The name is a complete longname, like `@name foo.bar` with
        // `@memberof foo`.
        about = name::atomize(&name, forced);
      } else if !name.is_empty()
        && name == memberof
        && name.starts_with(name::MODULE_NAMESPACE)
      {
        about = name::atomize(&name, forced);
      } else if !name.is_empty() && name == memberof {
        let scope = self.scope.unwrap_or(Scope::Static);
        self.scope = Some(scope);
        name = format!("{}{}{}", memberof, scope.punc().unwrap_or(name::PUNC_STATIC), name);
        about = name::atomize(&name, forced);
      } else if !name.is_empty() && name::has_trailing_scope(&memberof) {
        about = name::atomize(&format!("{}{}", memberof, name), forced);
      } else if !name.is_empty() {
        if let Some(scope) = self.scope {
          let punc = scope.punc().map(String::from).unwrap_or_default();
          about = name::atomize(&format!("{}{}{}", memberof, punc, name), forced);
        }
      }
    } else {
      about = name::atomize(&name, None);
    }

    if !about.name.is_empty() {
      self.name = Some(about.name.clone());
    }
    if !about.memberof.is_empty() {
      self.set_memberof(&about.memberof);
    }
    if !about.longname.is_empty() && (self.longname_unset() || self.longname == self.name) {
      self.set_longname(dict, &about.longname);
    }

    if self.scope == Some(Scope::Global) {
      // An explicit @global wins over everything.
      let name = self.name.clone().unwrap_or_default();
      self.set_longname(dict, &name);
      self.memberof = None;
    } else if !about.scope.is_empty() {
      if about.memberof == name::GLOBAL {
        self.scope = Some(Scope::Global);
      } else if let Some(scope) = about.scope.chars().next().and_then(Scope::from_punc) {
        self.scope = Some(scope);
      }
    } else if self.name.as_deref().is_some_and(|n| !n.is_empty())
      && self.memberof.is_some()
      && self.longname_unset()
    {
      let mut name = self.name.clone().unwrap_or_default();
      if name::has_leading_scope(&name) {
        self.scope = name.chars().next().and_then(Scope::from_punc);
        name = name[1..].to_owned();
        self.name = Some(name.clone());
      } else if !self.meta.code.name.is_empty() {
        // An ES2015 class that is a static member of something else still
        // has instance members; detect their scope from the code name.
        let meta_name = self.meta.code.name.clone();
        let punc_and_name = format!("{}{}", name::PUNC_INSTANCE, name);
        if meta_name.ends_with(&punc_and_name) && meta_name.len() > punc_and_name.len() {
          self.scope = Some(Scope::Instance);
        }
      }
      let scope = self.scope.unwrap_or(Scope::Static);
      self.scope = Some(scope);
      let longname = format!(
        "{}{}{}",
        self.memberof.as_deref().unwrap_or(""),
        scope.punc().unwrap_or(name::PUNC_STATIC),
        name
      );
      self.set_longname(dict, &longname);
    }

    if about.variation.is_some() {
      self.variation = about.variation;
    }

    if self.longname.is_none() {
      self.longname = Some(String::new());
    }
  }

  fn remove_global(longname: &str) -> &str {
    match longname.strip_prefix(name::GLOBAL) {
      Some(rest) => rest.strip_prefix('.').unwrap_or(rest),
      None => longname,
    }
  }

  /// Sets `memberof`, normalizing the global sentinel and `prototype`
  /// segments.
  pub fn set_memberof(&mut self, memberof: &str) {
    self.memberof = Some(name::prototype_to_punc(Self::remove_global(memberof)));
  }

  /// Sets `longname`, applying the kind's namespace when the kind is a
  /// namespace kind (module, event, external).
  pub fn set_longname(&mut self, dict: &TagDictionary, longname: &str) {
    let mut longname = Self::remove_global(longname).to_owned();
    if let Some(kind) = self.kind {
      if dict.is_namespace(kind.name()) {
        longname = name::apply_namespace(&longname, kind.name());
      }
    }
    self.longname = Some(longname);
  }

  /// Sets the scope, rejecting names outside `global|inner|instance|static`.
  pub fn set_scope(&mut self, scope_name: &str) -> DocletResult<()> {
    match Scope::from_name(scope_name) {
      Some(scope) => {
        self.scope = Some(scope);
        Ok(())
      }
      None => Err(self.error(DocletErrorType::UnknownScopeName(scope_name.to_owned()))),
    }
  }

  pub fn borrow(&mut self, from: &str, as_: Option<&str>) {
    self.borrowed.get_or_insert_with(Vec::new).push(Borrowed {
      from: from.to_owned(),
      as_: as_.map(str::to_owned),
    });
  }

  pub fn mix(&mut self, source: &str) {
    self.mixes.get_or_insert_with(Vec::new).push(source.to_owned());
  }

  pub fn augment(&mut self, base: &str) {
    self.augments.get_or_insert_with(Vec::new).push(base.to_owned());
  }

  pub fn is_documented(&self) -> bool {
    self.undocumented != Some(true)
  }

  /// Records a local variable declaration in this scope's variable table.
  pub fn declare_var(&mut self, name: &str) {
    self
      .vars_mut()
      .entry(name.to_owned())
      .or_insert(None);
  }

  pub fn vars_mut(&mut self) -> &mut AHashMap<String, Option<String>> {
    self.meta.vars.get_or_insert_with(AHashMap::new)
  }

  /// Whether this scope's variable table declares `basename`.
  pub fn defines_var(&self, basename: &str) -> bool {
    self
      .meta
      .vars
      .as_ref()
      .is_some_and(|vars| vars.contains_key(basename))
  }

  pub fn var_longname(&self, basename: &str) -> Option<&str> {
    self
      .meta
      .vars
      .as_ref()
      .and_then(|vars| vars.get(basename))
      .and_then(Option::as_deref)
  }
}

/// Combines two doclets into a new one, preferring the primary.
///
/// `params` and `properties` are taken whole from whichever doclet has a
/// non-empty list, primary first; `undocumented` is never carried over.
pub fn combine(primary: &Doclet, secondary: &Doclet) -> Doclet {
  fn pick<T: Clone>(a: &Option<T>, b: &Option<T>) -> Option<T> {
    a.clone().or_else(|| b.clone())
  }
  fn pick_nonempty<T: Clone>(a: &Option<Vec<T>>, b: &Option<Vec<T>>) -> Option<Vec<T>> {
    match a {
      Some(list) if !list.is_empty() => Some(list.clone()),
      _ => match b {
        Some(list) if !list.is_empty() => Some(list.clone()),
        _ => None,
      },
    }
  }

  Doclet {
    comment: if primary.comment.is_empty() {
      secondary.comment.clone()
    } else {
      primary.comment.clone()
    },
    meta: if primary.meta == Meta::default() {
      secondary.meta.clone()
    } else {
      primary.meta.clone()
    },
    description: pick(&primary.description, &secondary.description),
    classdesc: pick(&primary.classdesc, &secondary.classdesc),
    name: pick(&primary.name, &secondary.name),
    longname: pick(&primary.longname, &secondary.longname),
    kind: pick(&primary.kind, &secondary.kind),
    scope: pick(&primary.scope, &secondary.scope),
    memberof: pick(&primary.memberof, &secondary.memberof),
    alias: pick(&primary.alias, &secondary.alias),
    this_: pick(&primary.this_, &secondary.this_),
    variation: pick(&primary.variation, &secondary.variation),
    augments: pick(&primary.augments, &secondary.augments),
    mixes: pick(&primary.mixes, &secondary.mixes),
    implements: pick(&primary.implements, &secondary.implements),
    borrowed: pick(&primary.borrowed, &secondary.borrowed),
    fires: pick(&primary.fires, &secondary.fires),
    listens: pick(&primary.listens, &secondary.listens),
    modifies: pick(&primary.modifies, &secondary.modifies),
    requires: pick(&primary.requires, &secondary.requires),
    params: pick_nonempty(&primary.params, &secondary.params),
    properties: pick_nonempty(&primary.properties, &secondary.properties),
    returns: pick(&primary.returns, &secondary.returns),
    yields: pick(&primary.yields, &secondary.yields),
    exceptions: pick(&primary.exceptions, &secondary.exceptions),
    type_: pick(&primary.type_, &secondary.type_),
    optional: pick(&primary.optional, &secondary.optional),
    nullable: pick(&primary.nullable, &secondary.nullable),
    variable: pick(&primary.variable, &secondary.variable),
    access: pick(&primary.access, &secondary.access),
    defaultvalue: pick(&primary.defaultvalue, &secondary.defaultvalue),
    defaultvaluetype: pick(&primary.defaultvaluetype, &secondary.defaultvaluetype),
    examples: pick(&primary.examples, &secondary.examples),
    see: pick(&primary.see, &secondary.see),
    todo: pick(&primary.todo, &secondary.todo),
    author: pick(&primary.author, &secondary.author),
    summary: pick(&primary.summary, &secondary.summary),
    since: pick(&primary.since, &secondary.since),
    version: pick(&primary.version, &secondary.version),
    license: pick(&primary.license, &secondary.license),
    copyright: pick(&primary.copyright, &secondary.copyright),
    deprecated: pick(&primary.deprecated, &secondary.deprecated),
    virtual_: pick(&primary.virtual_, &secondary.virtual_),
    async_: pick(&primary.async_, &secondary.async_),
    generator: pick(&primary.generator, &secondary.generator),
    readonly: pick(&primary.readonly, &secondary.readonly),
    hideconstructor: pick(&primary.hideconstructor, &secondary.hideconstructor),
    ignore: pick(&primary.ignore, &secondary.ignore),
    undocumented: None,
    is_enum: pick(&primary.is_enum, &secondary.is_enum),
    inherited: pick(&primary.inherited, &secondary.inherited),
    inherits: pick(&primary.inherits, &secondary.inherits),
    mixed: pick(&primary.mixed, &secondary.mixed),
    override_: pick(&primary.override_, &secondary.override_),
    inheritdoc: pick(&primary.inheritdoc, &secondary.inheritdoc),
    overrides: pick(&primary.overrides, &secondary.overrides),
    force_memberof: pick(&primary.force_memberof, &secondary.force_memberof),
    preserve_name: pick(&primary.preserve_name, &secondary.preserve_name),
    tags: pick(&primary.tags, &secondary.tags),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dictionary::TagDictionary;

  fn make_doclet(tags: &[&str]) -> Doclet {
    let comment = format!("/**\n{}\n*/", tags.join("\n"));
    Doclet::from_comment(&TagDictionary::jsdoc(), &comment, Meta::default()).unwrap()
  }

  #[test]
  fn bare_event_resolves_into_the_event_namespace() {
    let doclet = make_doclet(&["@event", "@name A"]);
    assert_eq!(doclet.name.as_deref(), Some("A"));
    assert_eq!(doclet.memberof, None);
    assert_eq!(doclet.longname.as_deref(), Some("event:A"));
  }

  #[test]
  fn event_with_memberof_nests_under_it() {
    let doclet = make_doclet(&["@event", "@name A", "@memberof MyClass"]);
    assert_eq!(doclet.name.as_deref(), Some("A"));
    assert_eq!(doclet.memberof.as_deref(), Some("MyClass"));
    assert_eq!(doclet.longname.as_deref(), Some("MyClass.event:A"));
  }

  #[test]
  fn memberof_and_complete_longname_agree() {
    let doclet = make_doclet(&["@name foo.bar", "@member", "@memberof foo"]);
    assert_eq!(doclet.name.as_deref(), Some("bar"));
    assert_eq!(doclet.memberof.as_deref(), Some("foo"));
    assert_eq!(doclet.longname.as_deref(), Some("foo.bar"));
    assert_eq!(doclet.scope, Some(Scope::Static));
  }

  #[test]
  fn trailing_scope_on_memberof_sets_instance_scope() {
    let doclet = make_doclet(&["@name open", "@function", "@memberof lib.Panel#"]);
    assert_eq!(doclet.longname.as_deref(), Some("lib.Panel#open"));
    assert_eq!(doclet.scope, Some(Scope::Instance));
  }

  #[test]
  fn prototype_names_become_instance_members() {
    let doclet = make_doclet(&["@name Validator.prototype.checx", "@member"]);
    assert_eq!(doclet.name.as_deref(), Some("checx"));
    assert_eq!(doclet.memberof.as_deref(), Some("Validator"));
    assert_eq!(doclet.scope, Some(Scope::Instance));
  }

  #[test]
  fn global_tag_wins_over_memberof() {
    let doclet = make_doclet(&["@name x", "@member", "@memberof Foo", "@global"]);
    assert_eq!(doclet.longname.as_deref(), Some("x"));
    assert_eq!(doclet.memberof, None);
    assert_eq!(doclet.scope, Some(Scope::Global));
  }

  #[test]
  fn variation_suffix_is_appended_once() {
    let doclet = make_doclet(&["@name fadein", "@function", "@variation 2"]);
    assert_eq!(doclet.longname.as_deref(), Some("fadein(2)"));
    let again = make_doclet(&["@name fadein(2)", "@function", "@variation 2"]);
    assert_eq!(again.longname.as_deref(), Some("fadein(2)"));
  }

  #[test]
  fn conflicting_names_are_an_error() {
    let comment = "/** @name a\n@name b */";
    let err = Doclet::from_comment(&TagDictionary::jsdoc(), comment, Meta::default())
      .unwrap_err();
    assert_eq!(err.typ.code(), "DC0002");
  }

  #[test]
  fn conflicting_memberofs_are_an_error() {
    let comment = "/** @memberof a\n@memberof b\n@name x */";
    let err = Doclet::from_comment(&TagDictionary::jsdoc(), comment, Meta::default())
      .unwrap_err();
    assert_eq!(err.typ.code(), "DC0003");
  }

  #[test]
  fn repeated_identical_name_tags_are_tolerated() {
    let doclet = make_doclet(&["@name a", "@name a"]);
    assert_eq!(doclet.name.as_deref(), Some("a"));
  }

  #[test]
  fn params_backfill_from_code_paramnames() {
    let mut meta = Meta::default();
    meta.code.paramnames = vec!["a".into(), "b".into()];
    let comment = "/** @param {number} a - First.\n@param {number} - Second. */";
    let doclet = Doclet::from_comment(&TagDictionary::jsdoc(), comment, meta).unwrap();
    let params = doclet.params.unwrap();
    assert_eq!(params[0].name.as_deref(), Some("a"));
    assert_eq!(params[1].name.as_deref(), Some("b"));
  }

  #[test]
  fn combine_prefers_the_primary_doclet() {
    let class_doclet = make_doclet(&["@class Foo", "@classdesc A class."]);
    let ctor_doclet = make_doclet(&["@param {string} name"]);
    let merged = combine(&class_doclet, &ctor_doclet);
    assert_eq!(merged.kind, Some(Kind::Class));
    assert_eq!(merged.classdesc.as_deref(), Some("A class."));
    assert_eq!(merged.params.map(|p| p.len()), Some(1));
  }

  #[test]
  fn serialization_uses_jsdoc_field_names() {
    let mut doclet = make_doclet(&["@name x", "@member", "@async", "@abstract"]);
    doclet.is_enum = Some(true);
    let json = serde_json::to_value(&doclet).unwrap();
    assert_eq!(json["virtual"], true);
    assert_eq!(json["async"], true);
    assert_eq!(json["isEnum"], true);
    assert_eq!(json["kind"], "member");
    assert!(json.get("meta").is_none());
  }
}
