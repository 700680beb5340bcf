//! The tag dictionary: validation rules and mutation handlers for every
//! known tag, plus synonym and namespace bookkeeping.
//!
//! A dictionary is a constructed value threaded into the doclet factory, not
//! a process-wide registry; independent parse runs can use independent
//! dictionaries. Registering a tag name twice keeps the last definition.

use crate::doclet::Access;
use crate::doclet::Deprecated;
use crate::doclet::Doclet;
use crate::doclet::Kind;
use crate::doclet::Param;
use crate::doclet::Type;
use crate::error::DocletResult;
use crate::name;
use crate::name::Scope;
use crate::tag::Tag;
use crate::tag::TagValue;
use ahash::AHashMap;
use once_cell::sync::Lazy;

pub type OnTagged = fn(&mut Doclet, &Tag, &TagDictionary) -> DocletResult<()>;
pub type OnTagText = fn(&str) -> String;

/// The rules and handler for one tag name.
#[derive(Clone)]
pub struct TagDef {
  pub must_have_value: bool,
  pub must_not_have_value: bool,
  pub can_have_type: bool,
  pub can_have_name: bool,
  pub is_namespace: bool,
  pub keeps_whitespace: bool,
  pub removes_indent: bool,
  pub on_tag_text: Option<OnTagText>,
  pub on_tagged: OnTagged,
}

impl TagDef {
  pub fn new(on_tagged: OnTagged) -> TagDef {
    TagDef {
      must_have_value: false,
      must_not_have_value: false,
      can_have_type: false,
      can_have_name: false,
      is_namespace: false,
      keeps_whitespace: false,
      removes_indent: false,
      on_tag_text: None,
      on_tagged,
    }
  }

  pub fn must_have_value(mut self) -> TagDef {
    self.must_have_value = true;
    self
  }

  pub fn must_not_have_value(mut self) -> TagDef {
    self.must_not_have_value = true;
    self
  }

  pub fn can_have_type(mut self) -> TagDef {
    self.can_have_type = true;
    self
  }

  pub fn can_have_name(mut self) -> TagDef {
    self.can_have_name = true;
    self
  }

  pub fn namespace(mut self) -> TagDef {
    self.is_namespace = true;
    self
  }

  pub fn keeps_whitespace(mut self) -> TagDef {
    self.keeps_whitespace = true;
    self.removes_indent = true;
    self
  }

  pub fn on_tag_text(mut self, transform: OnTagText) -> TagDef {
    self.on_tag_text = Some(transform);
    self
  }
}

/// The registry mapping tag names and synonyms to definitions.
#[derive(Clone, Default)]
pub struct TagDictionary {
  tags: AHashMap<String, TagDef>,
  synonyms: AHashMap<String, String>,
  namespaces: Vec<String>,
}

impl TagDictionary {
  /// An empty dictionary. The `package` namespace is predeclared: package
  /// longnames carry it even though there is no `@package` kind tag.
  pub fn new() -> TagDictionary {
    TagDictionary {
      tags: AHashMap::new(),
      synonyms: AHashMap::new(),
      namespaces: vec!["package".to_owned()],
    }
  }

  /// The standard JSDoc tag set.
  pub fn jsdoc() -> TagDictionary {
    BASE.clone()
  }

  /// A shared instance of the standard tag set, for callers that do not
  /// register their own tags.
  pub fn base() -> &'static TagDictionary {
    &BASE
  }

  pub fn define_tag(&mut self, title: &str, def: TagDef) -> &mut TagDictionary {
    let canonical = title.to_lowercase();
    if def.is_namespace && !self.namespaces.iter().any(|ns| ns == &canonical) {
      self.namespaces.push(canonical.clone());
    }
    self.tags.insert(canonical, def);
    self
  }

  pub fn define_synonym(&mut self, title: &str, synonym: &str) -> &mut TagDictionary {
    self.synonyms.insert(synonym.to_lowercase(), title.to_lowercase());
    self
  }

  /// Resolves a tag title to its canonical lowercase form.
  pub fn normalize(&self, title: &str) -> String {
    let lower = title.to_lowercase();
    match self.synonyms.get(&lower) {
      Some(canonical) => canonical.clone(),
      None => lower,
    }
  }

  pub fn lookup(&self, title: &str) -> Option<&TagDef> {
    self.tags.get(&self.normalize(title))
  }

  /// Whether doclets of this kind get their kind applied to their longname
  /// as a namespace (`module:`, `event:`, ...).
  pub fn is_namespace(&self, kind: &str) -> bool {
    let kind = self.normalize(kind);
    self.namespaces.iter().any(|ns| ns == &kind)
  }

  pub fn namespaces(&self) -> &[String] {
    &self.namespaces
  }
}

static BASE: Lazy<TagDictionary> = Lazy::new(build_base);

pub(crate) fn param_from_value(value: &TagValue) -> Param {
  Param {
    type_: if value.type_names.is_empty() {
      None
    } else {
      Some(Type { names: value.type_names.clone() })
    },
    optional: value.optional,
    nullable: value.nullable,
    variable: value.variable,
    defaultvalue: value.defaultvalue.clone().map(serde_json::Value::String),
    name: value.name.clone(),
    description: value.description.clone(),
    inherited: None,
  }
}

fn set_kind_to_title(doclet: &mut Doclet, tag: &Tag, dict: &TagDictionary) -> DocletResult<()> {
  doclet.add_tag(dict, "kind", &tag.title)
}

fn set_name_to_value(doclet: &mut Doclet, tag: &Tag, dict: &TagDictionary) -> DocletResult<()> {
  // A long tag's name lives in the parsed description; a short tag's is the
  // whole text.
  let name = tag
    .value
    .as_ref()
    .and_then(|v| v.description.clone())
    .or_else(|| {
      if tag.text.is_empty() {
        None
      } else {
        Some(tag.text.clone())
      }
    });
  if let Some(name) = name {
    doclet.add_tag(dict, "name", &name)?;
  }
  Ok(())
}

fn set_name_to_value_name(
  doclet: &mut Doclet,
  tag: &Tag,
  dict: &TagDictionary,
) -> DocletResult<()> {
  if let Some(name) = tag.value.as_ref().and_then(|v| v.name.clone()) {
    doclet.add_tag(dict, "name", &name)?;
  }
  Ok(())
}

// Copies the parsed type (and its modifiers) onto the doclet without
// overwriting anything a previous tag set.
fn set_type_to_value(doclet: &mut Doclet, tag: &Tag) {
  let Some(value) = &tag.value else { return };
  if !value.type_names.is_empty() && doclet.type_.is_none() {
    doclet.type_ = Some(Type { names: value.type_names.clone() });
  }
  if doclet.optional.is_none() {
    doclet.optional = value.optional;
  }
  if doclet.nullable.is_none() {
    doclet.nullable = value.nullable;
  }
  if doclet.variable.is_none() {
    doclet.variable = value.variable;
  }
  if doclet.defaultvalue.is_none() {
    doclet.defaultvalue = value.defaultvalue.clone().map(serde_json::Value::String);
  }
}

fn first_word(text: &str) -> &str {
  text.split_whitespace().next().unwrap_or("")
}

fn strip_module_namespace(name: &str) -> &str {
  name.strip_prefix(name::MODULE_NAMESPACE).unwrap_or(name)
}

// `@augments {Type}` and friends allow the operand as a type expression.
fn type_expression_text(text: &str) -> String {
  if !text.starts_with('{') {
    return text.to_owned();
  }
  let mut depth = 0usize;
  for (idx, c) in text.char_indices() {
    match c {
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth == 0 {
          return text[1..idx].to_owned();
        }
      }
      _ => {}
    }
  }
  text.to_owned()
}

// `@type string` is accepted for backwards compatibility; braces are added
// when missing.
fn brace_type_text(text: &str) -> String {
  let text: String = text.replace(['\n', '\r', '\x0c'], "");
  let open = text.find('{');
  let close = text.find('}');
  match (open, close) {
    (Some(0), Some(close)) if close > 1 => text,
    _ => format!("{{{}}}", text),
  }
}

fn build_base() -> TagDictionary {
  let mut dict = TagDictionary::new();

  dict.define_tag("also", TagDef::new(|_, _, _| Ok(())));

  dict.define_tag(
    "abstract",
    TagDef::new(|doclet, _, _| {
      doclet.virtual_ = Some(true);
      Ok(())
    })
    .must_not_have_value(),
  );
  dict.define_synonym("abstract", "virtual");

  dict.define_tag(
    "access",
    TagDef::new(|doclet, tag, _| {
      doclet.access = Access::from_name(&tag.text);
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "alias",
    TagDef::new(|doclet, tag, _| {
      doclet.alias = Some(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "async",
    TagDef::new(|doclet, _, _| {
      doclet.async_ = Some(true);
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "augments",
    TagDef::new(|doclet, tag, _| {
      doclet.augment(first_word(&tag.text));
      Ok(())
    })
    .must_have_value()
    .on_tag_text(type_expression_text),
  );
  dict.define_synonym("augments", "extends");

  dict.define_tag(
    "author",
    TagDef::new(|doclet, tag, _| {
      doclet.author.get_or_insert_with(Vec::new).push(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "borrows",
    TagDef::new(|doclet, tag, _| {
      match tag.text.split_once(" as ") {
        Some((from, as_)) => doclet.borrow(from.trim(), Some(as_.trim())),
        None => doclet.borrow(tag.text.trim(), None),
      }
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "class",
    TagDef::new(|doclet, tag, dict| {
      doclet.add_tag(dict, "kind", "class")?;

      if tag.original_title == "class" {
        // Both @class and @constructor in one comment: the @class text is a
        // description, not a name.
        let looks_like_desc = tag.text.trim().contains(char::is_whitespace);
        let comment = doclet.comment.to_lowercase();
        if (looks_like_desc || comment.contains("@constructor") || comment.contains("@constructs"))
          && !comment.contains("@classdesc")
        {
          doclet.classdesc = Some(tag.text.clone());
          return Ok(());
        }
      }

      set_name_to_value(doclet, tag, dict)
    }),
  );
  dict.define_synonym("class", "constructor");

  dict.define_tag(
    "classdesc",
    TagDef::new(|doclet, tag, _| {
      doclet.classdesc = Some(tag.text.clone());
      Ok(())
    }),
  );

  dict.define_tag(
    "constant",
    TagDef::new(|doclet, tag, dict| {
      set_kind_to_title(doclet, tag, dict)?;
      set_name_to_value_name(doclet, tag, dict)?;
      set_type_to_value(doclet, tag);
      Ok(())
    })
    .can_have_type()
    .can_have_name(),
  );
  dict.define_synonym("constant", "const");

  dict.define_tag(
    "constructs",
    TagDef::new(|doclet, tag, dict| {
      let owner = if tag.text.is_empty() {
        // Resolved later against the enclosing class.
        "{@thisClass}".to_owned()
      } else {
        first_word(&tag.text).to_owned()
      };
      doclet.add_tag(dict, "alias", &owner)?;
      doclet.add_tag(dict, "kind", "class")
    }),
  );

  dict.define_tag(
    "copyright",
    TagDef::new(|doclet, tag, _| {
      doclet.copyright = Some(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "default",
    TagDef::new(|doclet, tag, _| {
      if !tag.text.is_empty() {
        doclet.defaultvalue = Some(serde_json::Value::String(tag.text.clone()));
        return Ok(());
      }
      let Some(value) = doclet.meta.code.value.clone() else {
        return Ok(());
      };
      match doclet.meta.code.node_type.as_deref() {
        Some("ArrayExpression") => {
          doclet.defaultvalue = Some(value);
          doclet.defaultvaluetype = Some("array".to_owned());
        }
        Some("Literal") => doclet.defaultvalue = Some(value),
        Some("ObjectExpression") => {
          doclet.defaultvalue = Some(value);
          doclet.defaultvaluetype = Some("object".to_owned());
        }
        _ => {}
      }
      Ok(())
    }),
  );
  dict.define_synonym("default", "defaultvalue");

  dict.define_tag(
    "deprecated",
    TagDef::new(|doclet, tag, _| {
      doclet.deprecated = Some(if tag.text.is_empty() {
        Deprecated::Flag(true)
      } else {
        Deprecated::Reason(tag.text.clone())
      });
      Ok(())
    }),
  );

  dict.define_tag(
    "description",
    TagDef::new(|doclet, tag, _| {
      doclet.description = Some(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );
  dict.define_synonym("description", "desc");

  dict.define_tag(
    "enum",
    TagDef::new(|doclet, tag, _| {
      doclet.kind = doclet.kind.or(Some(Kind::Member));
      doclet.is_enum = Some(true);
      set_type_to_value(doclet, tag);
      Ok(())
    })
    .can_have_type(),
  );

  dict.define_tag(
    "event",
    TagDef::new(|doclet, tag, dict| {
      set_kind_to_title(doclet, tag, dict)?;
      set_name_to_value(doclet, tag, dict)
    })
    .namespace(),
  );

  dict.define_tag(
    "example",
    TagDef::new(|doclet, tag, _| {
      doclet.examples.get_or_insert_with(Vec::new).push(tag.text.clone());
      Ok(())
    })
    .must_have_value()
    .keeps_whitespace(),
  );

  dict.define_tag(
    "exports",
    TagDef::new(|doclet, tag, dict| {
      let module_name = strip_module_namespace(first_word(&tag.text)).to_owned();
      doclet.add_tag(dict, "alias", &module_name)?;
      doclet.add_tag(dict, "kind", "module")
    })
    .must_have_value(),
  );

  dict.define_tag(
    "external",
    TagDef::new(|doclet, tag, dict| {
      set_kind_to_title(doclet, tag, dict)?;
      let type_name = tag
        .value
        .as_ref()
        .and_then(|v| v.type_names.first().cloned());
      match type_name {
        Some(type_name) => {
          set_type_to_value(doclet, tag);
          doclet.add_tag(dict, "name", &type_name)
        }
        None => set_name_to_value(doclet, tag, dict),
      }
    })
    .can_have_type()
    .namespace(),
  );
  dict.define_synonym("external", "host");

  dict.define_tag(
    "file",
    TagDef::new(|doclet, tag, dict| {
      if let Some(filename) = doclet.meta.filename.clone() {
        doclet.add_tag(dict, "name", &filename)?;
      }
      set_kind_to_title(doclet, tag, dict)?;
      if !tag.text.is_empty() {
        doclet.add_tag(dict, "description", &tag.text)?;
      }
      doclet.preserve_name = Some(true);
      Ok(())
    }),
  );
  dict.define_synonym("file", "fileoverview");
  dict.define_synonym("file", "overview");

  dict.define_tag(
    "fires",
    TagDef::new(|doclet, tag, _| {
      doclet
        .fires
        .get_or_insert_with(Vec::new)
        .push(name::apply_namespace(&tag.text, "event"));
      Ok(())
    })
    .must_have_value(),
  );
  dict.define_synonym("fires", "emits");

  dict.define_tag(
    "function",
    TagDef::new(|doclet, tag, dict| {
      set_kind_to_title(doclet, tag, dict)?;
      set_name_to_value(doclet, tag, dict)
    }),
  );
  dict.define_synonym("function", "func");
  dict.define_synonym("function", "method");

  dict.define_tag(
    "generator",
    TagDef::new(|doclet, _, _| {
      doclet.generator = Some(true);
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "global",
    TagDef::new(|doclet, _, _| {
      doclet.scope = Some(Scope::Global);
      doclet.memberof = None;
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "hideconstructor",
    TagDef::new(|doclet, _, _| {
      doclet.hideconstructor = Some(true);
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "ignore",
    TagDef::new(|doclet, _, _| {
      doclet.ignore = Some(true);
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "implements",
    TagDef::new(|doclet, tag, _| {
      doclet
        .implements
        .get_or_insert_with(Vec::new)
        .push(tag.text.clone());
      Ok(())
    })
    .must_have_value()
    .on_tag_text(type_expression_text),
  );

  dict.define_tag(
    "inheritdoc",
    TagDef::new(|doclet, _, _| {
      doclet.inheritdoc = Some(String::new());
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "inner",
    TagDef::new(|doclet, tag, _| {
      set_scope_to_title(doclet, tag);
      Ok(())
    }),
  );

  dict.define_tag(
    "instance",
    TagDef::new(|doclet, tag, _| {
      set_scope_to_title(doclet, tag);
      Ok(())
    }),
  );

  dict.define_tag(
    "interface",
    TagDef::new(|doclet, tag, dict| {
      doclet.add_tag(dict, "kind", "interface")?;
      set_name_to_value_name(doclet, tag, dict)
    })
    .can_have_name(),
  );

  dict.define_tag(
    "kind",
    TagDef::new(|doclet, tag, _| {
      match Kind::from_name(&tag.text) {
        Some(kind) => doclet.kind = Some(kind),
        None => tracing::warn!(kind = %tag.text, "unrecognized doclet kind"),
      }
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "lends",
    TagDef::new(|doclet, tag, dict| {
      doclet.alias = Some(if tag.text.is_empty() {
        name::GLOBAL.to_owned()
      } else {
        tag.text.clone()
      });
      doclet.add_tag(dict, "undocumented", "")
    }),
  );

  dict.define_tag(
    "license",
    TagDef::new(|doclet, tag, _| {
      doclet.license = Some(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "listens",
    TagDef::new(|doclet, tag, _| {
      doclet
        .listens
        .get_or_insert_with(Vec::new)
        .push(name::apply_namespace(&tag.text, "event"));
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "member",
    TagDef::new(|doclet, tag, dict| {
      set_kind_to_title(doclet, tag, dict)?;
      set_name_to_value_name(doclet, tag, dict)?;
      set_type_to_value(doclet, tag);
      Ok(())
    })
    .can_have_type()
    .can_have_name(),
  );
  dict.define_synonym("member", "var");

  dict.define_tag(
    "memberof",
    TagDef::new(|doclet, tag, dict| {
      if tag.original_title == "memberof!" {
        doclet.force_memberof = Some(true);
        if tag.text == name::GLOBAL {
          doclet.add_tag(dict, "global", "")?;
          doclet.memberof = None;
        }
      }
      if !tag.text.is_empty() && tag.text != name::GLOBAL {
        doclet.set_memberof(&tag.text);
      }
      Ok(())
    })
    .must_have_value(),
  );
  dict.define_synonym("memberof", "memberof!");

  dict.define_tag(
    "mixes",
    TagDef::new(|doclet, tag, _| {
      doclet.mix(first_word(&tag.text));
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "mixin",
    TagDef::new(|doclet, tag, dict| {
      set_kind_to_title(doclet, tag, dict)?;
      set_name_to_value(doclet, tag, dict)
    }),
  );

  dict.define_tag(
    "modifies",
    TagDef::new(|doclet, tag, _| {
      let entry = tag.value.as_ref().map(param_from_value).unwrap_or_default();
      doclet.modifies.get_or_insert_with(Vec::new).push(entry);
      Ok(())
    })
    .can_have_type(),
  );

  dict.define_tag(
    "module",
    TagDef::new(|doclet, tag, dict| {
      set_kind_to_title(doclet, tag, dict)?;
      set_name_to_value(doclet, tag, dict)?;
      if doclet.name.is_none() {
        // A bare @module names the file.
        if let Some(filename) = doclet.meta.filename.clone() {
          let stem = filename.strip_suffix(".js").unwrap_or(&filename).to_owned();
          doclet.name = Some(stem);
        }
      }
      if let Some(name) = &doclet.name {
        doclet.name = Some(strip_module_namespace(name).to_owned());
      }
      set_type_to_value(doclet, tag);
      Ok(())
    })
    .can_have_type()
    .namespace(),
  );

  dict.define_tag(
    "namespace",
    TagDef::new(|doclet, tag, dict| {
      set_kind_to_title(doclet, tag, dict)?;
      set_name_to_value(doclet, tag, dict)?;
      set_type_to_value(doclet, tag);
      Ok(())
    })
    .can_have_type(),
  );

  dict.define_tag(
    "package",
    TagDef::new(|doclet, _, _| {
      doclet.access = Some(Access::Package);
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "param",
    TagDef::new(|doclet, tag, _| {
      let param = tag.value.as_ref().map(param_from_value).unwrap_or_default();
      doclet.params.get_or_insert_with(Vec::new).push(param);
      Ok(())
    })
    .can_have_type()
    .can_have_name(),
  );
  dict.define_synonym("param", "arg");
  dict.define_synonym("param", "argument");

  dict.define_tag(
    "private",
    TagDef::new(|doclet, _, _| {
      doclet.access = Some(Access::Private);
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "property",
    TagDef::new(|doclet, tag, _| {
      let property = tag.value.as_ref().map(param_from_value).unwrap_or_default();
      doclet.properties.get_or_insert_with(Vec::new).push(property);
      Ok(())
    })
    .must_have_value()
    .can_have_type()
    .can_have_name(),
  );
  dict.define_synonym("property", "prop");

  dict.define_tag(
    "protected",
    TagDef::new(|doclet, _, _| {
      doclet.access = Some(Access::Protected);
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "public",
    TagDef::new(|doclet, _, _| {
      doclet.access = Some(Access::Public);
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "readonly",
    TagDef::new(|doclet, _, _| {
      doclet.readonly = Some(true);
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "override",
    TagDef::new(|doclet, _, _| {
      doclet.override_ = Some(true);
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "requires",
    TagDef::new(|doclet, tag, _| {
      // Inline `{@link ...}` values pass through; bare names are modules.
      let requires_name = if tag.text.starts_with("{@link") && tag.text.ends_with('}') {
        tag.text.clone()
      } else {
        let word = first_word(&tag.text);
        if word.starts_with(name::MODULE_NAMESPACE) {
          word.to_owned()
        } else {
          format!("{}{}", name::MODULE_NAMESPACE, word)
        }
      };
      doclet.requires.get_or_insert_with(Vec::new).push(requires_name);
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "returns",
    TagDef::new(|doclet, tag, _| {
      let entry = tag.value.as_ref().map(param_from_value).unwrap_or_default();
      doclet.returns.get_or_insert_with(Vec::new).push(entry);
      Ok(())
    })
    .must_have_value()
    .can_have_type(),
  );
  dict.define_synonym("returns", "return");

  dict.define_tag(
    "see",
    TagDef::new(|doclet, tag, _| {
      doclet.see.get_or_insert_with(Vec::new).push(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "since",
    TagDef::new(|doclet, tag, _| {
      doclet.since = Some(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "static",
    TagDef::new(|doclet, tag, _| {
      set_scope_to_title(doclet, tag);
      Ok(())
    }),
  );

  dict.define_tag(
    "summary",
    TagDef::new(|doclet, tag, _| {
      doclet.summary = Some(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "this",
    TagDef::new(|doclet, tag, _| {
      doclet.this_ = Some(first_word(&tag.text).to_owned());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "todo",
    TagDef::new(|doclet, tag, _| {
      doclet.todo.get_or_insert_with(Vec::new).push(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "throws",
    TagDef::new(|doclet, tag, _| {
      let entry = tag.value.as_ref().map(param_from_value).unwrap_or_default();
      doclet.exceptions.get_or_insert_with(Vec::new).push(entry);
      Ok(())
    })
    .must_have_value()
    .can_have_type(),
  );
  dict.define_synonym("throws", "exception");

  dict.define_tag(
    "type",
    TagDef::new(|doclet, tag, dict| {
      let has_type = tag
        .value
        .as_ref()
        .is_some_and(|v| !v.type_names.is_empty());
      if has_type {
        set_type_to_value(doclet, tag);
        // For functions, @type implies the return type.
        if doclet.kind == Some(Kind::Function) {
          doclet.add_tag(dict, "returns", &tag.text)?;
        }
      }
      Ok(())
    })
    .must_have_value()
    .can_have_type()
    .on_tag_text(brace_type_text),
  );

  dict.define_tag(
    "typedef",
    TagDef::new(|doclet, tag, dict| {
      set_kind_to_title(doclet, tag, dict)?;
      if tag.value.is_some() {
        set_name_to_value_name(doclet, tag, dict)?;
        if tag.original_title == "callback" {
          // Callbacks are always functions.
          doclet.type_ = Some(Type { names: vec!["function".to_owned()] });
        } else {
          set_type_to_value(doclet, tag);
        }
      }
      Ok(())
    })
    .can_have_type()
    .can_have_name(),
  );
  dict.define_synonym("typedef", "callback");

  dict.define_tag(
    "undocumented",
    TagDef::new(|doclet, _, _| {
      doclet.undocumented = Some(true);
      doclet.comment = String::new();
      Ok(())
    })
    .must_not_have_value(),
  );

  dict.define_tag(
    "variation",
    TagDef::new(|doclet, tag, _| {
      let value = tag
        .text
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
        .unwrap_or(&tag.text);
      doclet.variation = Some(value.to_owned());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "version",
    TagDef::new(|doclet, tag, _| {
      doclet.version = Some(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );

  dict.define_tag(
    "yields",
    TagDef::new(|doclet, tag, _| {
      let entry = tag.value.as_ref().map(param_from_value).unwrap_or_default();
      doclet.yields.get_or_insert_with(Vec::new).push(entry);
      Ok(())
    })
    .must_have_value()
    .can_have_type(),
  );
  dict.define_synonym("yields", "yield");

  dict.define_tag(
    "name",
    TagDef::new(|doclet, tag, _| {
      doclet.name = Some(tag.text.clone());
      Ok(())
    })
    .must_have_value(),
  );

  dict
}

fn set_scope_to_title(doclet: &mut Doclet, tag: &Tag) {
  if let Err(err) = doclet.set_scope(&tag.title) {
    tracing::warn!("{}", err);
  }
}
