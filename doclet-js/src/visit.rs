//! Per-kind extraction of structural facts ([`CodeInfo`]) from annotated
//! nodes: the syntactic name, the inferred kind, parameter names, and a
//! string-rendered value.

use crate::doclet::CodeInfo;
use crate::doclet::Kind;
use crate::name;
use crate::walk::Annotations;
use estree_js::ast::Ast;
use estree_js::ast::Comment;
use estree_js::ast::LitValue;
use estree_js::ast::MethodKind;
use estree_js::ast::NodeId;
use estree_js::ast::NodeKind;
use estree_js::ast::VarDeclKind;
use serde_json::Value;

/// Renders a node to the value JSDoc records for it: literal values keep
/// their type, object and array expressions render to JSON text, and named
/// things render to their (qualified) name.
pub fn node_to_value(ast: &Ast, ann: &Annotations, id: NodeId) -> Value {
  match ast.kind(id) {
    NodeKind::ArrayExpression { elements } => {
      let rendered: Vec<Value> = elements
        .iter()
        .map(|el| match el {
          Some(el) => node_to_value(ast, ann, *el),
          None => Value::Null,
        })
        .collect();
      Value::String(serde_json::to_string(&rendered).unwrap_or_default())
    }
    NodeKind::AssignmentExpression { left, .. } | NodeKind::AssignmentPattern { left, .. } => {
      node_to_value(ast, ann, *left)
    }
    NodeKind::ClassDeclaration(class) | NodeKind::ClassExpression(class) => match class.id {
      Some(class_id) => node_to_value(ast, ann, class_id),
      None => Value::String(String::new()),
    },
    NodeKind::ClassPrivateProperty { key, .. } => {
      // The leading `#` is omitted; it would collide with instance-scope
      // punctuation in longnames.
      node_to_value(ast, ann, *key)
    }
    NodeKind::ClassProperty { key, .. } => node_to_value(ast, ann, *key),
    NodeKind::ExportAllDeclaration { .. } | NodeKind::ExportDefaultDeclaration { .. } => {
      Value::String("module.exports".to_owned())
    }
    NodeKind::ExportNamedDeclaration { declaration, .. } => match declaration {
      Some(declaration) => {
        let inner = match ast.kind(*declaration) {
          NodeKind::VariableDeclaration { declarations, .. } => match declarations.first() {
            Some(&first) => node_to_string(ast, ann, first),
            None => String::new(),
          },
          _ => node_to_string(ast, ann, *declaration),
        };
        Value::String(format!("exports.{}", inner))
      }
      None => Value::String(String::new()),
    },
    NodeKind::ExportSpecifier { exported, .. } => {
      Value::String(format!("exports.{}", node_to_string(ast, ann, *exported)))
    }
    NodeKind::ArrowFunctionExpression(func)
    | NodeKind::FunctionDeclaration(func)
    | NodeKind::FunctionExpression(func) => match func.id {
      Some(func_id) => node_to_value(ast, ann, func_id),
      None => Value::String(String::new()),
    },
    NodeKind::Identifier { name } | NodeKind::PrivateIdentifier { name } => {
      Value::String(name.clone())
    }
    NodeKind::Literal { value, .. } => match value {
      LitValue::Str(s) => Value::String(s.clone()),
      LitValue::Num(n) => serde_json::Number::from_f64(*n)
        .map(Value::Number)
        .unwrap_or(Value::Null),
      LitValue::Bool(b) => Value::Bool(*b),
      LitValue::Null => Value::Null,
      LitValue::Regex(r) => Value::String(r.clone()),
      LitValue::BigInt(b) => Value::String(b.clone()),
    },
    NodeKind::MemberExpression { object, property, computed } => {
      let mut out = node_to_string(ast, ann, *object);
      if *computed {
        let raw = match ast.kind(*property) {
          NodeKind::Literal { raw, .. } => raw.clone(),
          _ => node_to_string(ast, ann, *property),
        };
        out.push('[');
        out.push_str(&raw);
        out.push(']');
      } else {
        out.push('.');
        out.push_str(&node_to_string(ast, ann, *property));
      }
      Value::String(out)
    }
    NodeKind::MethodDefinition { key, kind, is_static, .. } => {
      Value::String(method_definition_name(ast, ann, id, *key, *kind, *is_static))
    }
    NodeKind::ObjectExpression { properties } => {
      let mut rendered = serde_json::Map::new();
      for &prop in properties {
        if let NodeKind::Property { key, value, .. } = ast.kind(prop) {
          let key = node_to_string(ast, ann, *key);
          let value = match ast.kind(*value) {
            NodeKind::Literal { .. } => node_to_value(ast, ann, *value),
            _ => Value::String(String::new()),
          };
          rendered.insert(key, value);
        }
      }
      Value::String(serde_json::to_string(&Value::Object(rendered)).unwrap_or_default())
    }
    NodeKind::RestElement { argument } => node_to_value(ast, ann, *argument),
    NodeKind::ThisExpression => Value::String("this".to_owned()),
    NodeKind::UnaryExpression { operator, argument, .. } => {
      let inner = node_to_value(ast, ann, *argument);
      match (operator.as_str(), &inner) {
        ("-", Value::Number(n)) => n
          .as_f64()
          .and_then(|n| serde_json::Number::from_f64(-n))
          .map(Value::Number)
          .unwrap_or(inner),
        ("+", Value::Number(_)) => inner,
        _ => Value::String(format!("{}{}", operator, to_display(&inner))),
      }
    }
    NodeKind::VariableDeclarator { id: pat, .. } => node_to_value(ast, ann, *pat),
    _ => Value::String(String::new()),
  }
}

fn to_display(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Null => "null".to_owned(),
    Value::Number(n) => {
      let f = n.as_f64().unwrap_or(0.0);
      if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 {
        format!("{}", f as i64)
      } else {
        format!("{}", f)
      }
    }
    Value::Bool(b) => format!("{}", b),
    other => other.to_string(),
  }
}

/// [`node_to_value`] coerced to a string, the way names are rendered.
pub fn node_to_string(ast: &Ast, ann: &Annotations, id: NodeId) -> String {
  to_display(&node_to_value(ast, ann, id))
}

// A method's name includes the owning class and static/instance
// punctuation; a constructor is named after the class itself.
fn method_definition_name(
  ast: &Ast,
  ann: &Annotations,
  id: NodeId,
  key: NodeId,
  kind: MethodKind,
  is_static: bool,
) -> String {
  // parent is the ClassBody; grandparent is the class.
  let class = ann.nth_parent(id, 2);
  let class_parent = class.and_then(|c| ann.parent(c));
  let class_parent_kind = class_parent.map(|p| ast.kind(p));

  let mut owner = String::new();
  if let Some(class) = class {
    match ast.kind(class) {
      NodeKind::ClassExpression(_) => {
        // A class expression is named by whatever it is assigned to.
        if let Some(parent) = class_parent {
          owner = node_to_string(ast, ann, parent);
        }
      }
      _ => {
        if kind == MethodKind::Constructor
          && matches!(class_parent_kind, Some(NodeKind::ExportDefaultDeclaration { .. }))
        {
          owner = "module.exports".to_owned();
        } else if kind == MethodKind::Constructor
          && matches!(class_parent_kind, Some(NodeKind::ExportNamedDeclaration { .. }))
        {
          owner = node_to_string(ast, ann, class_parent.unwrap());
        } else if kind == MethodKind::Constructor {
          owner = node_to_string(ast, ann, class);
        } else if matches!(class_parent_kind, Some(NodeKind::ExportDefaultDeclaration { .. })) {
          owner = String::new();
        } else if let Some(class_payload) = ast.kind(class).as_class() {
          owner = match class_payload.id {
            Some(class_id) => node_to_string(ast, ann, class_id),
            None => String::new(),
          };
        }
      }
    }
  }

  if kind == MethodKind::Constructor {
    return owner;
  }
  let mut out = owner;
  if !out.is_empty() {
    out.push(if is_static { name::PUNC_STATIC } else { name::PUNC_INSTANCE });
  }
  out.push_str(&node_to_string(ast, ann, key));
  out
}

/// The parameter name list of a function-like node.
pub fn get_param_names(ast: &Ast, ann: &Annotations, id: NodeId) -> Vec<String> {
  let Some(func) = ast.kind(id).as_function() else {
    return Vec::new();
  };
  func
    .params
    .iter()
    .map(|&param| node_to_string(ast, ann, param))
    .collect()
}

/// The parameter nodes a doclet's code refers to: the node's own, or those
/// of its function value/initializer.
pub fn param_nodes(ast: &Ast, id: NodeId) -> Vec<NodeId> {
  if let Some(func) = ast.kind(id).as_function() {
    return func.params.clone();
  }
  let inner = match ast.kind(id) {
    NodeKind::MethodDefinition { value, .. } => Some(*value),
    NodeKind::VariableDeclarator { init, .. } => *init,
    NodeKind::Property { value, .. } => Some(*value),
    _ => None,
  };
  inner
    .and_then(|inner| ast.kind(inner).as_function().map(|f| f.params.clone()))
    .unwrap_or_default()
}

// The function payload behind a node, looking through method values and
// variable initializers; used for async/generator detection.
pub(crate) fn function_of(ast: &Ast, id: NodeId) -> Option<estree_js::ast::Function> {
  if let Some(func) = ast.kind(id).as_function() {
    return Some(func.clone());
  }
  let inner = match ast.kind(id) {
    NodeKind::MethodDefinition { value, .. } => Some(*value),
    NodeKind::VariableDeclarator { init, .. } => *init,
    _ => None,
  }?;
  ast.kind(inner).as_function().cloned()
}

fn quote_unsafe_name(name: String) -> String {
  let safe = name
    .chars()
    .all(|c| c == '$' || c == '_' || c.is_ascii_alphanumeric());
  if safe || name.is_empty() {
    name
  } else {
    format!("\"{}\"", name.replace('"', "\\\""))
  }
}

// What the code's shape implies the doclet kind should be, when no tag
// supplies one.
fn infer_kind(ast: &Ast, ann: &Annotations, value_node: NodeId, value_type: &str) -> Kind {
  match value_type {
    "FunctionDeclaration" | "FunctionExpression" | "ArrowFunctionExpression" => Kind::Function,
    "MethodDefinition" => match ast.kind(value_node) {
      NodeKind::MethodDefinition { kind: MethodKind::Constructor, .. } => Kind::Class,
      NodeKind::MethodDefinition { kind: MethodKind::Get | MethodKind::Set, .. } => Kind::Member,
      _ => Kind::Function,
    },
    "ClassDeclaration" | "ClassExpression" => Kind::Class,
    _ => {
      let parent_is_function = ann
        .parent(value_node)
        .is_some_and(|parent| ast.kind(parent).is_function());
      if parent_is_function {
        Kind::Param
      } else {
        Kind::Member
      }
    }
  }
}

/// Extracts the structural facts about a node: its syntactic name, the
/// value node, its rendered value, and its parameter names.
pub fn get_info(ast: &Ast, ann: &Annotations, id: NodeId) -> CodeInfo {
  let mut info = CodeInfo {
    id: Some(id),
    node: Some(id),
    ..CodeInfo::default()
  };
  let mut value_node = id;

  match ast.kind(id) {
    NodeKind::ArrowFunctionExpression(_) => {
      info.paramnames = get_param_names(ast, ann, id);
    }
    NodeKind::AssignmentExpression { left, right, .. } => {
      value_node = *right;
      info.name = node_to_string(ast, ann, *left);
      info.value = Some(node_to_value(ast, ann, *right));
      info.paramnames = get_param_names(ast, ann, *right);
    }
    NodeKind::AssignmentPattern { left, .. } => {
      info.name = node_to_string(ast, ann, *left);
      info.value = Some(node_to_value(ast, ann, id));
    }
    NodeKind::ClassDeclaration(class) => {
      let exported_default = ann
        .parent(id)
        .is_some_and(|p| matches!(ast.kind(p), NodeKind::ExportDefaultDeclaration { .. }));
      info.name = if exported_default {
        "module.exports".to_owned()
      } else {
        match class.id {
          Some(class_id) => node_to_string(ast, ann, class_id),
          None => String::new(),
        }
      };
      info.paramnames = constructor_param_names(ast, ann, class.body);
    }
    NodeKind::ClassExpression(class) => {
      info.name = match class.id {
        Some(class_id) => node_to_string(ast, ann, class_id),
        None => String::new(),
      };
      info.paramnames = constructor_param_names(ast, ann, class.body);
    }
    NodeKind::ClassPrivateProperty { .. } | NodeKind::ClassProperty { .. } => {
      info.name = node_to_string(ast, ann, id);
    }
    NodeKind::ExportAllDeclaration { .. } => {
      info.name = node_to_string(ast, ann, id);
    }
    NodeKind::ExportDefaultDeclaration { declaration } => {
      value_node = *declaration;
      info.name = node_to_string(ast, ann, id);
      info.paramnames = get_param_names(ast, ann, *declaration);
    }
    NodeKind::ExportNamedDeclaration { declaration, .. } => {
      info.name = node_to_string(ast, ann, id);
      match declaration {
        Some(declaration) => {
          info.node_type = Some(ast.kind(*declaration).type_name().to_owned());
          info.paramnames = get_param_names(ast, ann, *declaration);
          if let NodeKind::VariableDeclaration { kind: VarDeclKind::Const, .. } =
            ast.kind(*declaration)
          {
            info.kind_hint = Some(Kind::Constant);
          }
        }
        None => info.node_type = Some("ObjectExpression".to_owned()),
      }
    }
    NodeKind::ExportSpecifier { local, .. } => {
      info.name = node_to_string(ast, ann, id);
      info.node_type = Some(ast.kind(*local).type_name().to_owned());
      info.paramnames = get_param_names(ast, ann, *local);
    }
    NodeKind::FunctionDeclaration(func) => {
      info.name = match func.id {
        Some(func_id) => node_to_string(ast, ann, func_id),
        None => String::new(),
      };
      info.paramnames = get_param_names(ast, ann, id);
    }
    NodeKind::FunctionExpression(_) => {
      info.paramnames = get_param_names(ast, ann, id);
    }
    NodeKind::Identifier { name } => {
      info.name = name.clone();
    }
    NodeKind::MemberExpression { .. } => {
      info.name = node_to_string(ast, ann, id);
    }
    NodeKind::MethodDefinition { value, .. } => {
      info.name = node_to_string(ast, ann, id);
      info.paramnames = get_param_names(ast, ann, *value);
    }
    NodeKind::Property { key, value, .. } => {
      value_node = *value;
      info.name = quote_unsafe_name(node_to_string(ast, ann, *key));
      info.value = Some(node_to_value(ast, ann, *value));
      if ast.kind(id).is_accessor() {
        info.paramnames = get_param_names(ast, ann, *value);
        // Accessors document as members, not functions; the recorded type
        // is the accessor's rendered name rather than a node kind.
        info.node_type = Some(node_to_string(ast, ann, *value));
      }
    }
    NodeKind::RestElement { argument } => {
      info.name = node_to_string(ast, ann, *argument);
    }
    NodeKind::VariableDeclarator { id: pattern, init } => {
      value_node = (*init).unwrap_or(*pattern);
      info.name = node_to_string(ast, ann, *pattern);
      if let Some(init) = init {
        info.value = Some(node_to_value(ast, ann, *init));
      }
    }
    _ => {}
  }

  info.node = Some(value_node);
  if info.node_type.is_none() {
    info.node_type = Some(ast.kind(value_node).type_name().to_owned());
  }
  let value_type = info.node_type.clone().unwrap_or_default();
  info.inferred_kind = Some(infer_kind(ast, ann, value_node, &value_type));
  info
}

fn constructor_param_names(ast: &Ast, ann: &Annotations, class_body: NodeId) -> Vec<String> {
  let NodeKind::ClassBody { body } = ast.kind(class_body) else {
    return Vec::new();
  };
  for &member in body {
    if let NodeKind::MethodDefinition { kind: MethodKind::Constructor, value, .. } =
      ast.kind(member)
    {
      return get_param_names(ast, ann, *value);
    }
  }
  Vec::new()
}

/// Whether a raw comment is a doc comment: `/** ... */` but not `/*** ...`.
pub fn is_valid_jsdoc(raw: &str) -> bool {
  raw.len() > 4 && raw.starts_with("/**") && !raw.starts_with("/***")
}

/// The doc comment attached to a node: the closest (last) leading block
/// comment, if it is a valid doc comment.
pub fn leading_jsdoc_comment(comments: &[Comment]) -> Option<String> {
  let last_block = comments.iter().rev().find(|c| c.block)?;
  let raw = last_block.raw();
  is_valid_jsdoc(&raw).then_some(raw)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::walk::walk;
  use serde_json::json;

  fn parse(value: serde_json::Value) -> (Ast, Annotations) {
    let mut ast = estree_js::from_json(&value).unwrap();
    let result = walk(&mut ast);
    (ast, result.annotations)
  }

  fn find(ast: &Ast, order_kind: &str) -> NodeId {
    (0..ast.len())
      .map(|i| NodeId::from_raw(i as u32))
      .find(|&id| ast.kind(id).type_name() == order_kind)
      .unwrap()
  }

  #[test]
  fn member_expressions_render_dotted_and_computed_names() {
    let (ast, ann) = parse(json!({
      "type": "Program",
      "body": [{
        "type": "ExpressionStatement",
        "expression": {
          "type": "MemberExpression",
          "computed": true,
          "object": {
            "type": "MemberExpression",
            "computed": false,
            "object": { "type": "Identifier", "name": "foo" },
            "property": { "type": "Identifier", "name": "bar" }
          },
          "property": { "type": "Literal", "value": "#ops", "raw": "\"#ops\"" }
        }
      }]
    }));
    let member = find(&ast, "MemberExpression");
    assert_eq!(node_to_string(&ast, &ann, member), "foo.bar[\"#ops\"]");
  }

  #[test]
  fn assignment_info_names_the_left_side() {
    let (ast, ann) = parse(json!({
      "type": "Program",
      "body": [{
        "type": "ExpressionStatement",
        "expression": {
          "type": "AssignmentExpression",
          "operator": "=",
          "left": {
            "type": "MemberExpression",
            "computed": false,
            "object": { "type": "Identifier", "name": "Foo" },
            "property": { "type": "Identifier", "name": "bar" }
          },
          "right": {
            "type": "FunctionExpression",
            "id": null,
            "params": [{ "type": "Identifier", "name": "a" }],
            "body": { "type": "BlockStatement", "body": [] }
          }
        }
      }]
    }));
    let assignment = find(&ast, "AssignmentExpression");
    let info = get_info(&ast, &ann, assignment);
    assert_eq!(info.name, "Foo.bar");
    assert_eq!(info.paramnames, vec!["a"]);
    assert_eq!(info.node_type.as_deref(), Some("FunctionExpression"));
    assert_eq!(info.inferred_kind, Some(Kind::Function));
  }

  #[test]
  fn method_definition_names_carry_scope_punctuation() {
    let (ast, ann) = parse(json!({
      "type": "Program",
      "body": [{
        "type": "ClassDeclaration",
        "id": { "type": "Identifier", "name": "Panel" },
        "body": {
          "type": "ClassBody",
          "body": [
            {
              "type": "MethodDefinition",
              "kind": "method",
              "static": false,
              "key": { "type": "Identifier", "name": "open" },
              "value": {
                "type": "FunctionExpression", "id": null, "params": [],
                "body": { "type": "BlockStatement", "body": [] }
              }
            },
            {
              "type": "MethodDefinition",
              "kind": "method",
              "static": true,
              "key": { "type": "Identifier", "name": "create" },
              "value": {
                "type": "FunctionExpression", "id": null, "params": [],
                "body": { "type": "BlockStatement", "body": [] }
              }
            },
            {
              "type": "MethodDefinition",
              "kind": "constructor",
              "static": false,
              "key": { "type": "Identifier", "name": "constructor" },
              "value": {
                "type": "FunctionExpression", "id": null,
                "params": [{ "type": "Identifier", "name": "width" }],
                "body": { "type": "BlockStatement", "body": [] }
              }
            }
          ]
        }
      }]
    }));
    let names: Vec<String> = (0..ast.len())
      .map(|i| NodeId::from_raw(i as u32))
      .filter(|&id| ast.kind(id).type_name() == "MethodDefinition")
      .map(|id| node_to_string(&ast, &ann, id))
      .collect();
    assert_eq!(names, vec!["Panel#open", "Panel.create", "Panel"]);

    let class = find(&ast, "ClassDeclaration");
    let info = get_info(&ast, &ann, class);
    assert_eq!(info.name, "Panel");
    assert_eq!(info.paramnames, vec!["width"]);
    assert_eq!(info.inferred_kind, Some(Kind::Class));
  }

  #[test]
  fn variable_declarators_take_their_initializer_as_value_node() {
    let (ast, ann) = parse(json!({
      "type": "Program",
      "body": [{
        "type": "VariableDeclaration",
        "kind": "var",
        "declarations": [{
          "type": "VariableDeclarator",
          "id": { "type": "Identifier", "name": "answer" },
          "init": { "type": "Literal", "value": 42, "raw": "42" }
        }]
      }]
    }));
    let declarator = find(&ast, "VariableDeclarator");
    let info = get_info(&ast, &ann, declarator);
    assert_eq!(info.name, "answer");
    assert_eq!(info.value, Some(json!(42.0)));
    assert_eq!(info.node_type.as_deref(), Some("Literal"));
    assert_eq!(info.node, Some(find(&ast, "Literal")));
  }

  #[test]
  fn unsafe_property_names_are_quoted() {
    let (ast, ann) = parse(json!({
      "type": "Program",
      "body": [{
        "type": "VariableDeclaration",
        "kind": "var",
        "declarations": [{
          "type": "VariableDeclarator",
          "id": { "type": "Identifier", "name": "chars" },
          "init": {
            "type": "ObjectExpression",
            "properties": [{
              "type": "Property",
              "kind": "init",
              "computed": false,
              "key": { "type": "Literal", "value": "#ops", "raw": "\"#ops\"" },
              "value": { "type": "Literal", "value": 1, "raw": "1" }
            }]
          }
        }]
      }]
    }));
    let property = find(&ast, "Property");
    let info = get_info(&ast, &ann, property);
    assert_eq!(info.name, "\"#ops\"");
  }

  #[test]
  fn doc_comments_are_validated() {
    assert!(is_valid_jsdoc("/** ok */"));
    assert!(!is_valid_jsdoc("/* plain */"));
    assert!(!is_valid_jsdoc("/*** minifier-preserved */"));
    assert!(!is_valid_jsdoc("/**/"));
  }
}
