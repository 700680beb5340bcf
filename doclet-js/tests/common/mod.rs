//! Builders for ESTree JSON fixtures and a one-call parse helper.
#![allow(dead_code)]

use doclet_js::dictionary::TagDictionary;
use doclet_js::parser::Parser;
use doclet_js::parser::SourceFile;
use doclet_js::store::DocletStore;
use serde_json::json;
use serde_json::Value;

pub fn parse_one(program: Value) -> DocletStore {
  parse_named(vec![("test.js", program)])
}

pub fn parse_named(programs: Vec<(&str, Value)>) -> DocletStore {
  let files = programs
    .into_iter()
    .map(|(filename, program)| SourceFile {
      filename: filename.to_owned(),
      ast: estree_js::from_json(&program).expect("fixture must be a valid ESTree document"),
    })
    .collect();
  let mut parser = Parser::new(TagDictionary::jsdoc());
  parser.parse(files);
  parser.post_process();
  parser.finish().0
}

pub fn program(body: Vec<Value>) -> Value {
  json!({ "type": "Program", "body": body })
}

/// Attaches a doc comment to a node.
pub fn doc(comment: &str, mut node: Value) -> Value {
  let entry = json!({ "type": "CommentBlock", "value": comment });
  match node.get_mut("leadingComments").and_then(Value::as_array_mut) {
    Some(existing) => existing.push(entry),
    None => {
      node["leadingComments"] = json!([entry]);
    }
  }
  node
}

pub fn ident(name: &str) -> Value {
  json!({ "type": "Identifier", "name": name })
}

pub fn literal(value: Value) -> Value {
  let raw = value.to_string();
  json!({ "type": "Literal", "value": value, "raw": raw })
}

pub fn block(body: Vec<Value>) -> Value {
  json!({ "type": "BlockStatement", "body": body })
}

pub fn expr_stmt(expression: Value) -> Value {
  json!({ "type": "ExpressionStatement", "expression": expression })
}

pub fn empty_stmt() -> Value {
  json!({ "type": "EmptyStatement" })
}

pub fn assign(left: Value, right: Value) -> Value {
  json!({
    "type": "AssignmentExpression",
    "operator": "=",
    "left": left,
    "right": right
  })
}

pub fn member(object: Value, property: &str) -> Value {
  json!({
    "type": "MemberExpression",
    "computed": false,
    "object": object,
    "property": ident(property)
  })
}

pub fn func_decl(name: &str, params: Vec<Value>, body: Vec<Value>) -> Value {
  json!({
    "type": "FunctionDeclaration",
    "id": ident(name),
    "params": params,
    "body": block(body)
  })
}

pub fn func_expr(params: Vec<Value>, body: Vec<Value>) -> Value {
  json!({
    "type": "FunctionExpression",
    "id": null,
    "params": params,
    "body": block(body)
  })
}

pub fn var_decl(kind: &str, name: &str, init: Option<Value>) -> Value {
  json!({
    "type": "VariableDeclaration",
    "kind": kind,
    "declarations": [{
      "type": "VariableDeclarator",
      "id": ident(name),
      "init": init
    }]
  })
}

pub fn call(callee: Value, arguments: Vec<Value>) -> Value {
  json!({ "type": "CallExpression", "callee": callee, "arguments": arguments })
}

pub fn class_decl(name: &str, members: Vec<Value>) -> Value {
  json!({
    "type": "ClassDeclaration",
    "id": ident(name),
    "body": { "type": "ClassBody", "body": members }
  })
}

pub fn method(kind: &str, name: &str, is_static: bool, params: Vec<Value>, body: Vec<Value>) -> Value {
  json!({
    "type": "MethodDefinition",
    "kind": kind,
    "static": is_static,
    "computed": false,
    "key": ident(name),
    "value": func_expr(params, body)
  })
}
