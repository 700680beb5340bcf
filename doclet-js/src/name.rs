//! The longname grammar: pure string algebra over fully qualified symbol
//! names.
//!
//! A longname is `memberof` + scope punctuation + `name`, optionally followed
//! by a parenthesized variation, like `lib.Panel#open` or `anim.fadein(2)`.
//! Quoted segments are atomic: `channels."#ops"#open` names the member `open`
//! of the `"#ops"` property, and none of the punctuation inside the quotes
//! participates in splitting. Bracketed computed properties normalize to the
//! quoted form (`channels["#ops"]` becomes `channels."#ops"`).

use memchr::memrchr;
use memchr::memrchr3;
use serde::Deserialize;
use serde::Serialize;

/// Longname used for doclets that do not have one, such as anonymous
/// functions.
pub const ANONYMOUS: &str = "<anonymous>";

/// Longname that represents global scope.
pub const GLOBAL: &str = "<global>";

/// Namespace prefix for module longnames.
pub const MODULE_NAMESPACE: &str = "module:";

pub const PUNC_STATIC: char = '.';
pub const PUNC_INSTANCE: char = '#';
pub const PUNC_INNER: char = '~';

/// How a member relates to its container. This is symbol scope, not lexical
/// scope.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
  Global,
  Inner,
  Instance,
  Static,
}

impl Scope {
  pub fn name(self) -> &'static str {
    match self {
      Scope::Global => "global",
      Scope::Inner => "inner",
      Scope::Instance => "instance",
      Scope::Static => "static",
    }
  }

  pub fn from_name(name: &str) -> Option<Scope> {
    match name {
      "global" => Some(Scope::Global),
      "inner" => Some(Scope::Inner),
      "instance" => Some(Scope::Instance),
      "static" => Some(Scope::Static),
      _ => None,
    }
  }

  /// The punctuation mark for this scope. Global scope has none.
  pub fn punc(self) -> Option<char> {
    match self {
      Scope::Global => None,
      Scope::Inner => Some(PUNC_INNER),
      Scope::Instance => Some(PUNC_INSTANCE),
      Scope::Static => Some(PUNC_STATIC),
    }
  }

  pub fn from_punc(punc: char) -> Option<Scope> {
    match punc {
      PUNC_INNER => Some(Scope::Inner),
      PUNC_INSTANCE => Some(Scope::Instance),
      PUNC_STATIC => Some(Scope::Static),
      _ => None,
    }
  }
}

fn is_scope_punc(c: char) -> bool {
  matches!(c, PUNC_STATIC | PUNC_INSTANCE | PUNC_INNER)
}

/// The decomposition of a longname.
///
/// `longname` is the normalized form (brackets rewritten to quoted segments,
/// `prototype` rewritten to `#`); `scope` holds the punctuation mark between
/// `memberof` and `name`, or an empty string for global names.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct NameParts {
  pub longname: String,
  pub memberof: String,
  pub scope: String,
  pub name: String,
  pub variation: Option<String>,
}

/// Checks whether `name` is a complete longname that is a member of
/// `memberof`, like `foo.bar` relative to `foo`.
pub fn name_is_longname(name: &str, memberof: &str) -> bool {
  match name.strip_prefix(memberof) {
    Some(rest) => rest.chars().next().is_some_and(is_scope_punc),
    None => false,
  }
}

/// Replaces the `prototype` portion of a name with `#`, so that
/// `Foo.prototype.bar` becomes `Foo#bar`. A symbol actually named
/// `prototype` is left alone.
pub fn prototype_to_punc(name: &str) -> String {
  if name == "prototype" {
    return name.to_owned();
  }

  let mut out = String::with_capacity(name.len());
  let mut rest = name;
  while let Some(idx) = rest.find("prototype") {
    let at_start = idx == 0;
    let after_dot = idx > 0 && rest.as_bytes()[idx - 1] == b'.';
    if !at_start && !after_dot {
      let split = idx + "prototype".len();
      out.push_str(&rest[..split]);
      rest = &rest[split..];
      continue;
    }
    out.push_str(&rest[..if after_dot { idx - 1 } else { idx }]);
    out.push(PUNC_INSTANCE);
    let mut next = idx + "prototype".len();
    if rest.as_bytes().get(next) == Some(&b'.') {
      next += 1;
    }
    rest = &rest[next..];
  }
  out.push_str(rest);
  out
}

pub fn has_leading_scope(name: &str) -> bool {
  name.chars().next().is_some_and(is_scope_punc)
}

pub fn has_trailing_scope(name: &str) -> bool {
  name.chars().next_back().is_some_and(is_scope_punc)
}

/// A symbol's basename: the leading identifier of its full name. All of
/// `Foo`, `Foo.bar`, and `Foo.prototype.bar` have the basename `Foo`. Names
/// that do not start with an identifier character are returned unchanged.
pub fn get_basename(name: &str) -> &str {
  let mut end = 0;
  for (idx, c) in name.char_indices() {
    let ok = if idx == 0 {
      c == '$' || c == '_' || c.is_ascii_alphabetic()
    } else {
      c == '$' || c == '_' || c.is_ascii_alphanumeric()
    };
    if !ok {
      break;
    }
    end = idx + c.len_utf8();
  }
  if end == 0 {
    name
  } else {
    &name[..end]
  }
}

/// Removes a leading `ns:` namespace from a longname.
pub fn strip_namespace(longname: &str) -> &str {
  match longname.find(':') {
    Some(idx) if idx > 0 && longname[..idx].chars().all(|c| c.is_ascii_alphabetic()) => {
      &longname[idx + 1..]
    }
    _ => longname,
  }
}

fn starts_with_namespace(name: &str) -> bool {
  match name.find(':') {
    Some(idx) => {
      idx > 0 && name[..idx].chars().all(|c| c.is_ascii_alphabetic()) && idx + 1 < name.len()
    }
    None => false,
  }
}

// Quoted segments (and bracketed quoted segments) are atomic. They are
// swapped for `@{n}@` placeholder tokens, which contain no scope
// punctuation, before the longname is split.
struct Tokenized {
  text: String,
  tokens: Vec<String>,
}

fn tokenize(longname: &str) -> Tokenized {
  let mut text = String::with_capacity(longname.len());
  let mut tokens = Vec::new();
  let bytes = longname.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let bracketed = bytes[i] == b'[' && matches!(bytes.get(i + 1), Some(b'"') | Some(b'\''));
    let quote_at = if bracketed { i + 1 } else { i };
    let quote = match bytes.get(quote_at) {
      Some(&q @ (b'"' | b'\'')) => q,
      _ => {
        let c = longname[i..].chars().next().unwrap();
        text.push(c);
        i += c.len_utf8();
        continue;
      }
    };
    let Some(close_rel) = memchr::memchr(quote, &bytes[quote_at + 1..]) else {
      let c = longname[i..].chars().next().unwrap();
      text.push(c);
      i += c.len_utf8();
      continue;
    };
    let close = quote_at + 1 + close_rel;
    let mut end = close + 1;
    if bracketed && bytes.get(end) == Some(&b']') {
      end += 1;
    }

    if bracketed {
      // `a["b"]` is a static member; `a.prototype["b"]` and `a#["b"]` are
      // instance members. The prototype/# prefix is folded into the mark.
      if text.ends_with(".prototype") {
        text.truncate(text.len() - ".prototype".len());
        text.push(PUNC_INSTANCE);
      } else if text.ends_with("prototype") && text.len() == "prototype".len() {
        text.truncate(0);
        text.push(PUNC_INSTANCE);
      } else if !text.ends_with(PUNC_INSTANCE) {
        text.push(PUNC_STATIC);
      }
    }
    text.push_str(&format!("@{{{}}}@", tokens.len()));
    tokens.push(longname[quote_at..close + 1].to_owned());
    i = end;
  }

  Tokenized { text, tokens }
}

fn restore(text: &str, tokens: &[String]) -> String {
  let mut out = text.to_owned();
  for (i, token) in tokens.iter().enumerate().rev() {
    out = out.replace(&format!("@{{{}}}@", i), token);
  }
  out
}

fn split_variation(name: &str) -> (String, Option<String>) {
  if !name.ends_with(')') {
    return (name.to_owned(), None);
  }
  let Some(open) = memrchr(b'(', name.as_bytes()) else {
    return (name.to_owned(), None);
  };
  let inner = &name[open + 1..name.len() - 1];
  if open == 0 || inner.is_empty() || inner.contains(')') {
    return (name.to_owned(), None);
  }
  (name[..open].to_owned(), Some(inner.to_owned()))
}

/// Splits a longname like `a.b#c(2)` into its parts.
///
/// `forced_memberof` pins the memberof portion, as an explicit `@memberof!`
/// does; the name becomes whatever follows it in the longname.
pub fn atomize(longname: &str, forced_memberof: Option<&str>) -> NameParts {
  let Tokenized { text, tokens } = tokenize(longname);
  let text = prototype_to_punc(&text);

  let mut memberof = String::new();
  let mut scope = String::new();
  let name;

  match forced_memberof {
    Some(forced) => {
      name = text.get(forced.len()..).unwrap_or("").to_owned();
      let mut forced_chars = forced.chars();
      match forced_chars.next_back() {
        Some(last) if is_scope_punc(last) => {
          let head = forced_chars.as_str();
          if !head.is_empty() {
            memberof = head.to_owned();
          }
          scope = last.to_string();
        }
        Some(_) => memberof = forced.to_owned(),
        None => {}
      }
    }
    None => {
      // The split point is the last scope mark that has at least one
      // character on each side.
      let bytes = text.as_bytes();
      let split = if bytes.len() >= 2 {
        memrchr3(
          PUNC_STATIC as u8,
          PUNC_INSTANCE as u8,
          PUNC_INNER as u8,
          &bytes[..bytes.len() - 1],
        )
        .filter(|&idx| idx >= 1)
      } else {
        None
      };
      match split {
        Some(idx) => {
          memberof = text[..idx].to_owned();
          scope = text[idx..idx + 1].to_owned();
          name = text[idx + 1..].to_owned();
        }
        None => name = text.clone(),
      }
    }
  }

  let (name, variation) = split_variation(&name);

  NameParts {
    longname: restore(&text, &tokens),
    memberof: restore(&memberof, &tokens),
    scope,
    name: restore(&name, &tokens),
    variation,
  }
}

/// Reassembles a longname from parts. Left inverse of [`atomize`] for all
/// valid decompositions.
pub fn combine(parts: &NameParts) -> String {
  let mut out = String::new();
  out.push_str(&parts.memberof);
  out.push_str(&parts.scope);
  out.push_str(&parts.name);
  if let Some(variation) = &parts.variation {
    out.push('(');
    out.push_str(variation);
    out.push(')');
  }
  out
}

/// Removes the variation, if any, from a longname.
pub fn strip_variation(longname: &str) -> String {
  let mut parts = atomize(longname, None);
  parts.variation = None;
  combine(&parts)
}

/// Inserts `ns:` immediately before the bare name segment of a longname, so
/// `lib.Panel#open` becomes `lib.Panel#event:open`. Idempotent: a name that
/// already carries a namespace is left alone.
pub fn apply_namespace(longname: &str, ns: &str) -> String {
  let parts = atomize(longname, None);
  if starts_with_namespace(&parts.name) || !parts.longname.ends_with(parts.name.as_str()) {
    return parts.longname;
  }
  let split = parts.longname.len() - parts.name.len();
  format!("{}{}:{}", &parts.longname[..split], ns, parts.name)
}

/// Whether `parent` is a strict ancestor of `child` in the longname
/// hierarchy. A name is never its own ancestor.
pub fn has_ancestor(parent: &str, child: &str) -> bool {
  if parent.is_empty() || child.is_empty() || !child.starts_with(parent) {
    return false;
  }
  let mut memberof = child.to_owned();
  loop {
    memberof = atomize(&memberof, None).memberof;
    if memberof.is_empty() {
      return false;
    }
    if memberof == parent {
      return true;
    }
  }
}

/// The result of splitting a `name description` string.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct NameAndDescription {
  pub name: String,
  pub description: String,
}

// `[name=default]` names may contain brackets and quoted strings; scan with
// a bracket stack, honoring string escapes. Returns None on unbalanced
// input so the caller can fall back to whitespace splitting.
fn split_name_matching_brackets(text: &str) -> Option<NameAndDescription> {
  let mut buffer = String::new();
  let mut stack = 0usize;
  let mut string_end: Option<char> = None;
  let mut chars = text.char_indices().peekable();
  let mut rest_start = text.len();

  while let Some((idx, c)) = chars.next() {
    buffer.push(c);
    if let Some(quote) = string_end {
      if c == '\\' {
        if let Some((_, escaped)) = chars.next() {
          buffer.push(escaped);
        }
      } else if c == quote {
        string_end = None;
      }
    } else if c == '"' || c == '\'' {
      string_end = Some(c);
    } else if c == '[' {
      stack += 1;
    } else if c == ']' {
      stack = stack.saturating_sub(1);
      if stack == 0 {
        rest_start = idx + 1;
        break;
      }
    }
  }

  if stack > 0 || string_end.is_some() {
    return None;
  }

  Some(NameAndDescription {
    name: buffer,
    description: strip_description_separator(&text[rest_start..]).to_owned(),
  })
}

// Strips the separator between a name and its description: either a hyphen
// on the same line as the name (`name - description`) or plain whitespace.
// A hyphen after a line break belongs to the description (it could be a
// Markdown list item).
fn strip_description_separator(rest: &str) -> &str {
  let same_line = rest.trim_start_matches([' ', '\t']);
  if let Some(after_dash) = same_line.strip_prefix('-') {
    return after_dash.trim_start();
  }
  rest.trim_start()
}

/// Splits a string that starts with a name and ends with a description, like
/// `[path=["home"]] - Path split into components`.
pub fn split_name_and_description(text: &str) -> NameAndDescription {
  if text.starts_with('[') {
    if let Some(result) = split_name_matching_brackets(text) {
      return result;
    }
    // Unbalanced input: fall back to everything up to the first `]`.
    if let Some(close) = text.find(']') {
      return NameAndDescription {
        name: text[..close + 1].to_owned(),
        description: strip_description_separator(&text[close + 1..]).to_owned(),
      };
    }
  }

  let name_end = text
    .find(char::is_whitespace)
    .unwrap_or(text.len());
  NameAndDescription {
    name: text[..name_end].to_owned(),
    description: strip_description_separator(&text[name_end..]).to_owned(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn atomize_splits_instance_members() {
    let parts = atomize("lib.Panel#open", None);
    assert_eq!(parts.name, "open");
    assert_eq!(parts.memberof, "lib.Panel");
    assert_eq!(parts.scope, "#");
  }

  #[test]
  fn atomize_splits_static_members() {
    let parts = atomize("elements.selected.getVisible", None);
    assert_eq!(parts.name, "getVisible");
    assert_eq!(parts.memberof, "elements.selected");
    assert_eq!(parts.scope, ".");
  }

  #[test]
  fn atomize_rewrites_prototype_to_instance_punc() {
    let parts = atomize("Validator.prototype.$element", None);
    assert_eq!(parts.name, "$element");
    assert_eq!(parts.memberof, "Validator");
    assert_eq!(parts.scope, "#");
  }

  #[test]
  fn atomize_splits_inner_members() {
    let parts = atomize("Button~_onclick", None);
    assert_eq!(parts.name, "_onclick");
    assert_eq!(parts.memberof, "Button");
    assert_eq!(parts.scope, "~");
  }

  #[test]
  fn atomize_leaves_global_names_whole() {
    let parts = atomize("close", None);
    assert_eq!(parts.name, "close");
    assert_eq!(parts.memberof, "");
    assert_eq!(parts.scope, "");
  }

  #[test]
  fn atomize_treats_bracketed_properties_as_atomic() {
    let parts = atomize("channels[\"#ops\"]#open", None);
    assert_eq!(parts.name, "open");
    assert_eq!(parts.memberof, "channels.\"#ops\"");
    assert_eq!(parts.scope, "#");
  }

  #[test]
  fn atomize_handles_consecutive_bracketed_properties() {
    let parts = atomize("channels[\"#bots\"][\"log.max\"]", None);
    assert_eq!(parts.name, "\"log.max\"");
    assert_eq!(parts.memberof, "channels.\"#bots\"");
    assert_eq!(parts.scope, ".");
  }

  #[test]
  fn atomize_handles_single_quoted_brackets() {
    let parts = atomize("channels['#ops']", None);
    assert_eq!(parts.name, "'#ops'");
    assert_eq!(parts.memberof, "channels");
    assert_eq!(parts.scope, ".");
  }

  #[test]
  fn atomize_keeps_quoted_whole_names_atomic() {
    for quoted in ["\"foo.bar\"", "'foo.bar'"] {
      let parts = atomize(quoted, None);
      assert_eq!(parts.name, quoted);
      assert_eq!(parts.longname, quoted);
      assert_eq!(parts.memberof, "");
      assert_eq!(parts.scope, "");
    }
  }

  #[test]
  fn atomize_finds_the_variation() {
    let parts = atomize("anim.fadein(2)", None);
    assert_eq!(parts.variation.as_deref(), Some("2"));
    assert_eq!(parts.name, "fadein");
    assert_eq!(parts.longname, "anim.fadein(2)");
  }

  #[test]
  fn combine_round_trips_atomize() {
    for longname in [
      "lib.Panel#open",
      "elements.selected.getVisible",
      "Button~_onclick",
      "close",
      "anim.fadein(2)",
      "channels.\"#ops\"#open",
      "module:maths/bigint",
    ] {
      assert_eq!(combine(&atomize(longname, None)), longname, "{}", longname);
    }
  }

  #[test]
  fn apply_namespace_inserts_before_the_name_only() {
    assert_eq!(apply_namespace("lib.Panel#open", "event"), "lib.Panel#event:open");
    assert_eq!(apply_namespace("maths/bigint", "module"), "module:maths/bigint");
  }

  #[test]
  fn apply_namespace_is_idempotent() {
    let once = apply_namespace("lib.Panel#open", "event");
    assert_eq!(apply_namespace(&once, "event"), once);
  }

  #[test]
  fn apply_namespace_respects_quoted_names() {
    assert_eq!(
      apply_namespace("foo.\"*dont't.look~in#here!\"", "event"),
      "foo.event:\"*dont't.look~in#here!\""
    );
  }

  #[test]
  fn has_ancestor_walks_the_memberof_chain() {
    assert!(has_ancestor("lib", "lib.Panel#open"));
    assert!(has_ancestor("lib.Panel", "lib.Panel#open"));
    assert!(!has_ancestor("lib.Panel#open", "lib.Panel"));
    assert!(!has_ancestor("libfoo", "lib.Panel"));
  }

  #[test]
  fn a_name_is_never_its_own_ancestor() {
    for name in ["lib.Panel#open", "close", "module:foo"] {
      assert!(!has_ancestor(name, name));
    }
  }

  #[test]
  fn basename_is_the_leading_identifier() {
    assert_eq!(get_basename("Foo"), "Foo");
    assert_eq!(get_basename("Foo.bar"), "Foo");
    assert_eq!(get_basename("Foo.prototype.bar"), "Foo");
    assert_eq!(get_basename("$jquery.fn"), "$jquery");
  }

  #[test]
  fn name_is_longname_requires_scope_punctuation() {
    assert!(name_is_longname("foo.bar", "foo"));
    assert!(!name_is_longname("foo.bar", "baz"));
    assert!(!name_is_longname("bar", "foo"));
    assert!(!name_is_longname("foobar", "foo"));
  }

  #[test]
  fn split_name_handles_plain_separators() {
    let parts = split_name_and_description("socket - The networking kind, not the wrench.");
    assert_eq!(parts.name, "socket");
    assert_eq!(parts.description, "The networking kind, not the wrench.");
  }

  #[test]
  fn split_name_keeps_dashes_after_line_breaks() {
    let parts = split_name_and_description("socket\n - The networking kind, not the wrench.");
    assert_eq!(parts.name, "socket");
    assert_eq!(parts.description, "- The networking kind, not the wrench.");
  }

  #[test]
  fn split_name_allows_brackets_in_default_values() {
    let parts =
      split_name_and_description("[path=[\"home\", \"user\"]] - Path split into components");
    assert_eq!(parts.name, "[path=[\"home\", \"user\"]]");
    assert_eq!(parts.description, "Path split into components");
  }

  #[test]
  fn split_name_tolerates_unmatched_brackets() {
    let parts =
      split_name_and_description("[path=[\"home\", \"user\"] - Path split into components");
    assert_eq!(parts.name, "[path=[\"home\", \"user\"]");
    assert_eq!(parts.description, "Path split into components");
  }

  #[test]
  fn split_name_tolerates_unmatched_quotes() {
    let parts =
      split_name_and_description("[path=[\"home\", \"user] - Path split into components");
    assert_eq!(parts.name, "[path=[\"home\", \"user]");
    assert_eq!(parts.description, "Path split into components");
  }

  #[test]
  fn strip_namespace_removes_one_prefix() {
    assert_eq!(strip_namespace("module:foo/bar"), "foo/bar");
    assert_eq!(strip_namespace("event:module:x"), "module:x");
    assert_eq!(strip_namespace("noNamespace"), "noNamespace");
  }

  #[test]
  fn prototype_to_punc_leaves_bare_prototype() {
    assert_eq!(prototype_to_punc("prototype"), "prototype");
    assert_eq!(prototype_to_punc("Foo.prototype.bar"), "Foo#bar");
    assert_eq!(prototype_to_punc("Foo.prototype"), "Foo#");
  }
}
