//! Raw doc-comment handling: unwrapping delimiters, splitting a comment into
//! `@tag` units, and parsing tag text into typed values.

use crate::dictionary::TagDef;
use crate::dictionary::TagDictionary;
use crate::name::split_name_and_description;
use memchr::memchr_iter;

/// Strips the `/** ... */` delimiters and the left margin of stars from a
/// doc comment, preserving interior indentation (needed for `@example`
/// blocks). Lines without a star margin keep their whitespace untouched.
pub fn unwrap_comment(src: &str) -> String {
  if src.is_empty() {
    return String::new();
  }

  let mut text = src;
  if text.starts_with("/**") {
    text = text[2..].trim_start_matches('*');
  }
  if let Some(stripped) = text.strip_suffix("*/") {
    text = stripped.trim_end_matches('*');
  }

  let lines: Vec<&str> = text
    .split('\n')
    .map(|line| {
      let without_margin = line.trim_start();
      match without_margin.strip_prefix('*') {
        // The margin is a star plus at most one space.
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
      }
    })
    .collect();

  lines.join("\n").trim_end().to_owned()
}

/// Prefixes a bare leading description with `@description`, or `@classdesc`
/// when the documented code is a class.
pub fn fix_description(src: &str, code_is_class: bool) -> String {
  let starts_with_tag = src.trim_start().starts_with('@');
  if starts_with_tag || src.trim().is_empty() {
    return src.to_owned();
  }
  let title = if code_is_class { "@classdesc" } else { "@description" };
  format!("{} {}", title, src)
}

/// One raw `@title text` unit split out of a comment, before dictionary
/// interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTag {
  pub title: String,
  pub text: String,
}

// An `@` splits tags only at the start of a line (possibly indented). An `@`
// in prose or a URL is left alone.
fn is_tag_boundary(src: &[u8], at: usize) -> bool {
  let mut i = at;
  while i > 0 {
    let b = src[i - 1];
    if b == b'\n' {
      return true;
    }
    if !(b == b' ' || b == b'\t' || b == b'\r') {
      return false;
    }
    i -= 1;
  }
  true
}

/// Splits unwrapped comment text into raw tags. Text before the first tag
/// boundary is ignored (the factory turns bare descriptions into
/// `@description` first).
pub fn to_tags(src: &str) -> Vec<RawTag> {
  let bytes = src.as_bytes();
  let mut boundaries: Vec<usize> = memchr_iter(b'@', bytes)
    .filter(|&idx| is_tag_boundary(bytes, idx))
    .collect();
  boundaries.push(src.len());

  let mut tags = Vec::new();
  for pair in boundaries.windows(2) {
    let segment = &src[pair[0] + 1..pair[1]];
    let title_end = segment
      .find(char::is_whitespace)
      .unwrap_or(segment.len());
    let title = &segment[..title_end];
    if title.is_empty() {
      continue;
    }
    // Keep the text's trailing whitespace; per-tag trim rules decide what
    // survives.
    let text = segment[title_end..].trim_start();
    tags.push(RawTag {
      title: title.to_owned(),
      text: text.to_owned(),
    });
  }
  tags
}

/// The parsed value of one tag.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TagValue {
  /// Type names from a `{...}` expression, split on top-level `|`.
  pub type_names: Vec<String>,
  /// The raw text inside the braces.
  pub type_expression: Option<String>,
  pub name: Option<String>,
  pub description: Option<String>,
  pub optional: Option<bool>,
  pub nullable: Option<bool>,
  pub variable: Option<bool>,
  pub defaultvalue: Option<String>,
}

/// One interpreted `@tagname value` unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
  pub original_title: String,
  /// The canonical title after synonym resolution.
  pub title: String,
  pub text: String,
  /// Present when the tag definition allows a type or a name.
  pub value: Option<TagValue>,
}

impl Tag {
  /// Builds a tag from a raw `title`/`text` pair, applying the definition's
  /// trim rules, `onTagText` transform, and value parsing. `code_name` is
  /// the symbol name from the code, used to protect significant whitespace.
  pub fn new(dict: &TagDictionary, title: &str, text: &str, code_name: Option<&str>) -> Tag {
    let original_title = title.trim().to_owned();
    let canonical = dict.normalize(&original_title);
    let def = dict.lookup(&canonical);

    let mut text = trim_tag_text(text, def, code_name);
    if !text.is_empty() {
      if let Some(transform) = def.and_then(|d| d.on_tag_text) {
        text = transform(&text);
      }
    }

    let value = match def {
      Some(def) if (def.can_have_type || def.can_have_name) && !text.is_empty() => {
        Some(parse_tag_value(&text, def.can_have_name))
      }
      _ => None,
    };

    Tag {
      original_title,
      title: canonical,
      text,
      value,
    }
  }

  /// The single-word form of the tag text, used by tags that take a
  /// longname operand.
  pub fn first_word(&self) -> &str {
    self.text.split_whitespace().next().unwrap_or("")
  }
}

fn trim_tag_text(text: &str, def: Option<&TagDef>, code_name: Option<&str>) -> String {
  // A symbol name with significant leading/trailing whitespace must not be
  // trimmed; quote it instead.
  if let Some(code_name) = code_name {
    if code_name == text && text != text.trim() && !text.is_empty() {
      return format!("\"{}\"", text);
    }
  }

  let keeps_whitespace = def.is_some_and(|d| d.keeps_whitespace);
  let removes_indent = def.is_some_and(|d| d.removes_indent);

  if !keeps_whitespace {
    return text.trim().to_owned();
  }

  let text = text.trim_matches(['\n', '\r', '\x0c']);
  if !removes_indent {
    return text.to_owned();
  }

  // Strip the first line's leading indentation from every line.
  let indent_len = text.len() - text.trim_start_matches([' ', '\t']).len();
  if indent_len == 0 {
    return text.to_owned();
  }
  let indent = text[..indent_len].to_owned();
  text
    .split('\n')
    .map(|line| line.strip_prefix(indent.as_str()).unwrap_or(line))
    .collect::<Vec<_>>()
    .join("\n")
}

// Extracts a balanced `{...}` expression from the start of the text.
// Returns the inner expression and the remainder.
fn extract_type_expression(text: &str) -> Option<(String, &str)> {
  if !text.starts_with('{') {
    return None;
  }
  let mut depth = 0usize;
  for (idx, c) in text.char_indices() {
    match c {
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth == 0 {
          return Some((text[1..idx].to_owned(), &text[idx + 1..]));
        }
      }
      _ => {}
    }
  }
  None
}

// Splits a type expression on top-level `|`, unwrapping one layer of
// parentheses, and peels the common modifiers. This is deliberately not a
// full type-expression parser; the expression text is preserved verbatim in
// `type_expression` for consumers that need more.
fn parse_type_names(expression: &str, value: &mut TagValue) {
  let mut expr = expression.trim();

  if let Some(stripped) = expr.strip_prefix('!') {
    value.nullable = Some(false);
    expr = stripped.trim_start();
  } else if let Some(stripped) = expr.strip_prefix('?') {
    value.nullable = Some(true);
    expr = stripped.trim_start();
  }
  if let Some(stripped) = expr.strip_prefix("...") {
    value.variable = Some(true);
    expr = stripped.trim_start();
  }
  if let Some(stripped) = expr.strip_suffix('=') {
    value.optional = Some(true);
    expr = stripped.trim_end();
  }
  if expr.starts_with('(') && expr.ends_with(')') {
    expr = &expr[1..expr.len() - 1];
  }

  let mut depth = 0i32;
  let mut start = 0;
  let bytes = expr.as_bytes();
  for (idx, &b) in bytes.iter().enumerate() {
    match b {
      b'(' | b'<' | b'{' | b'[' => depth += 1,
      b')' | b'>' | b'}' | b']' => depth -= 1,
      b'|' if depth == 0 => {
        let piece = expr[start..idx].trim();
        if !piece.is_empty() {
          value.type_names.push(piece.to_owned());
        }
        start = idx + 1;
      }
      _ => {}
    }
  }
  let piece = expr[start..].trim();
  if !piece.is_empty() {
    value.type_names.push(piece.to_owned());
  }
}

// `[name]` and `[name=default]` mark an optional operand with a default.
fn parse_optional_name(name: &str, value: &mut TagValue) -> String {
  let Some(inner) = name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) else {
    return name.to_owned();
  };
  value.optional = Some(true);

  match inner.split_once('=') {
    Some((name, default)) => {
      let default = default.trim();
      if !default.is_empty() {
        value.defaultvalue = Some(default.to_owned());
      }
      name.trim().to_owned()
    }
    None => inner.trim().to_owned(),
  }
}

fn parse_tag_value(text: &str, can_have_name: bool) -> TagValue {
  let mut value = TagValue::default();

  let rest = match extract_type_expression(text) {
    Some((expression, rest)) => {
      parse_type_names(&expression, &mut value);
      value.type_expression = Some(expression);
      rest.trim_start()
    }
    None => text,
  };

  if can_have_name {
    let parts = split_name_and_description(rest);
    if !parts.name.is_empty() && parts.name != "-" {
      value.name = Some(parse_optional_name(&parts.name, &mut value));
    }
    if !parts.description.is_empty() {
      value.description = Some(parts.description);
    }
  } else if !rest.is_empty() {
    value.description = Some(rest.trim().to_owned());
  }

  value
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dictionary::TagDictionary;

  #[test]
  fn unwrap_strips_delimiters_and_margin() {
    let src = "/**\n * Sets the volume.\n * @param {number} value\n */";
    assert_eq!(unwrap_comment(src), "\nSets the volume.\n@param {number} value");
  }

  #[test]
  fn unwrap_preserves_example_indentation() {
    let src = "/**\n * @example\n *     if (x) {\n *         go();\n *     }\n */";
    let unwrapped = unwrap_comment(src);
    assert!(unwrapped.contains("    if (x) {\n        go();"));
  }

  #[test]
  fn tags_split_only_at_line_starts() {
    let tags = to_tags("@author mail me at foo@example.com\n@since 1.0");
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].title, "author");
    assert_eq!(tags[0].text.trim_end(), "mail me at foo@example.com");
    assert_eq!(tags[1].title, "since");
  }

  #[test]
  fn indented_tags_still_split() {
    let tags = to_tags("@description one\n    @param {number} x\n");
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[1].title, "param");
  }

  #[test]
  fn param_value_parses_type_name_and_description() {
    let dict = TagDictionary::jsdoc();
    let tag = Tag::new(&dict, "param", "{string} name - The name.", None);
    let value = tag.value.unwrap();
    assert_eq!(value.type_names, vec!["string"]);
    assert_eq!(value.name.as_deref(), Some("name"));
    assert_eq!(value.description.as_deref(), Some("The name."));
  }

  #[test]
  fn param_value_parses_optional_names_with_defaults() {
    let dict = TagDictionary::jsdoc();
    let tag = Tag::new(&dict, "param", "{number} [volume=11] - Loudness.", None);
    let value = tag.value.unwrap();
    assert_eq!(value.name.as_deref(), Some("volume"));
    assert_eq!(value.optional, Some(true));
    assert_eq!(value.defaultvalue.as_deref(), Some("11"));
  }

  #[test]
  fn union_types_split_on_top_level_pipes() {
    let dict = TagDictionary::jsdoc();
    let tag = Tag::new(&dict, "param", "{(string|Array<(a|b)>)} x", None);
    let value = tag.value.unwrap();
    assert_eq!(value.type_names, vec!["string", "Array<(a|b)>"]);
  }

  #[test]
  fn nullable_variable_and_optional_modifiers() {
    let dict = TagDictionary::jsdoc();
    let value = Tag::new(&dict, "param", "{?number=} x", None).value.unwrap();
    assert_eq!(value.nullable, Some(true));
    assert_eq!(value.optional, Some(true));
    let value = Tag::new(&dict, "param", "{...string} rest", None).value.unwrap();
    assert_eq!(value.variable, Some(true));
  }

  #[test]
  fn synonyms_normalize_to_canonical_titles() {
    let dict = TagDictionary::jsdoc();
    let tag = Tag::new(&dict, "extends", "Base", None);
    assert_eq!(tag.title, "augments");
    assert_eq!(tag.original_title, "extends");
  }

  #[test]
  fn fix_description_prefixes_bare_text() {
    assert_eq!(fix_description("Hello.", false), "@description Hello.");
    assert_eq!(fix_description("Hello.", true), "@classdesc Hello.");
    assert_eq!(fix_description("@name foo", false), "@name foo");
  }
}
