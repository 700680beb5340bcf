use crate::ast::Ast;
use crate::ast::Class;
use crate::ast::Comment;
use crate::ast::Function;
use crate::ast::LitValue;
use crate::ast::MethodKind;
use crate::ast::NodeData;
use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::PropertyKind;
use crate::ast::VarDeclKind;
use crate::error::EstreeError;
use crate::error::EstreeErrorType;
use crate::error::EstreeResult;
use crate::loc::Loc;
use crate::loc::Pos;
use crate::loc::Span;
use serde_json::Value;

/// Builds an [`Ast`] arena from ESTree JSON.
///
/// The root must be a `Program` node or a `File` node wrapping one. Position
/// info is read from `range` pairs, `start`/`end` offsets, and `loc` objects,
/// all optional. Node types the builder does not recognize become
/// [`NodeKind::Unknown`] leaves; the build itself only fails on structurally
/// broken input (a non-object node, a missing required child).
pub fn build(value: &Value) -> EstreeResult<Ast> {
  let mut root = value;
  if type_of(value) == Some("File") {
    root = value
      .get("program")
      .ok_or_else(|| err(EstreeErrorType::MissingField("program"), value))?;
  }
  if type_of(root) != Some("Program") {
    return Err(err(EstreeErrorType::ExpectedProgram, root));
  }

  let mut builder = Builder { nodes: Vec::new() };
  let root_id = builder.add_node(root)?;
  Ok(Ast::new(builder.nodes, root_id))
}

fn type_of(value: &Value) -> Option<&str> {
  value.get("type").and_then(Value::as_str)
}

fn err(typ: EstreeErrorType, value: &Value) -> EstreeError {
  EstreeError::new(typ, type_of(value).map(str::to_owned))
}

fn read_pos(value: &Value) -> Option<Pos> {
  Some(Pos {
    line: value.get("line")?.as_u64()? as u32,
    column: value.get("column")?.as_u64()? as u32,
  })
}

fn read_span(value: &Value) -> Span {
  let loc = match value.get("loc") {
    Some(loc) => loc,
    None => return Span::default(),
  };
  let start = loc.get("start").and_then(read_pos).unwrap_or_default();
  let end = loc.get("end").and_then(read_pos).unwrap_or_default();
  Span { start, end }
}

fn read_range(value: &Value) -> Loc {
  if let Some(range) = value.get("range").and_then(Value::as_array) {
    if range.len() == 2 {
      if let (Some(start), Some(end)) = (range[0].as_u64(), range[1].as_u64()) {
        return Loc(start as usize, end as usize);
      }
    }
  }
  let start = value.get("start").and_then(Value::as_u64);
  let end = value.get("end").and_then(Value::as_u64);
  match (start, end) {
    (Some(start), Some(end)) => Loc(start as usize, end as usize),
    _ => Loc(0, 0),
  }
}

fn read_comments(value: &Value, field: &str) -> Vec<Comment> {
  let Some(list) = value.get(field).and_then(Value::as_array) else {
    return Vec::new();
  };
  list
    .iter()
    .filter_map(|c| {
      let block = matches!(type_of(c), Some("Block") | Some("CommentBlock"));
      let line = matches!(type_of(c), Some("Line") | Some("CommentLine"));
      if !block && !line {
        return None;
      }
      Some(Comment {
        block,
        text: c.get("value").and_then(Value::as_str).unwrap_or_default().to_owned(),
        span: read_span(c),
        range: read_range(c),
      })
    })
    .collect()
}

struct Builder {
  nodes: Vec<NodeData>,
}

impl Builder {
  fn add_node(&mut self, value: &Value) -> EstreeResult<NodeId> {
    if !value.is_object() {
      return Err(err(EstreeErrorType::ExpectedObject, value));
    }
    let type_name = type_of(value)
      .ok_or_else(|| err(EstreeErrorType::MissingField("type"), value))?
      .to_owned();

    // Reserve the slot first so parents receive lower ids than their
    // children, matching source order for sibling nodes.
    let id = NodeId::from_raw(self.nodes.len() as u32);
    self.nodes.push(NodeData {
      kind: NodeKind::Unknown { type_name: type_name.clone() },
      span: read_span(value),
      range: read_range(value),
      leading_comments: read_comments(value, "leadingComments"),
      trailing_comments: read_comments(value, "trailingComments"),
    });

    let kind = self.build_kind(&type_name, value)?;
    self.nodes[id.index()].kind = kind;
    Ok(id)
  }

  fn child(&mut self, value: &Value, field: &'static str) -> EstreeResult<NodeId> {
    let v = value
      .get(field)
      .filter(|v| !v.is_null())
      .ok_or_else(|| err(EstreeErrorType::MissingField(field), value))?;
    self.add_node(v)
  }

  fn opt_child(&mut self, value: &Value, field: &str) -> EstreeResult<Option<NodeId>> {
    match value.get(field) {
      Some(v) if !v.is_null() => Ok(Some(self.add_node(v)?)),
      _ => Ok(None),
    }
  }

  fn child_list(&mut self, value: &Value, field: &'static str) -> EstreeResult<Vec<NodeId>> {
    let Some(list) = value.get(field).and_then(Value::as_array) else {
      return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(list.len());
    for v in list {
      if !v.is_null() {
        out.push(self.add_node(v)?);
      }
    }
    Ok(out)
  }

  fn sparse_child_list(
    &mut self,
    value: &Value,
    field: &'static str,
  ) -> EstreeResult<Vec<Option<NodeId>>> {
    let Some(list) = value.get(field).and_then(Value::as_array) else {
      return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(list.len());
    for v in list {
      if v.is_null() {
        out.push(None);
      } else {
        out.push(Some(self.add_node(v)?));
      }
    }
    Ok(out)
  }

  fn function(&mut self, value: &Value) -> EstreeResult<Function> {
    Ok(Function {
      id: self.opt_child(value, "id")?,
      params: self.child_list(value, "params")?,
      body: self.opt_child(value, "body")?,
      generator: bool_field(value, "generator"),
      is_async: bool_field(value, "async"),
    })
  }

  fn class(&mut self, value: &Value) -> EstreeResult<Class> {
    Ok(Class {
      id: self.opt_child(value, "id")?,
      super_class: self.opt_child(value, "superClass")?,
      body: self.child(value, "body")?,
    })
  }

  fn build_kind(&mut self, type_name: &str, v: &Value) -> EstreeResult<NodeKind> {
    let kind = match type_name {
      "ArrayExpression" => NodeKind::ArrayExpression {
        elements: self.sparse_child_list(v, "elements")?,
      },
      "ArrayPattern" => NodeKind::ArrayPattern {
        elements: self.sparse_child_list(v, "elements")?,
      },
      "ArrowFunctionExpression" => NodeKind::ArrowFunctionExpression(self.function(v)?),
      "AssignmentExpression" => NodeKind::AssignmentExpression {
        operator: str_field(v, "operator"),
        left: self.child(v, "left")?,
        right: self.child(v, "right")?,
      },
      "AssignmentPattern" => NodeKind::AssignmentPattern {
        left: self.child(v, "left")?,
        right: self.child(v, "right")?,
      },
      "AwaitExpression" => NodeKind::AwaitExpression {
        argument: self.child(v, "argument")?,
      },
      "BinaryExpression" => NodeKind::BinaryExpression {
        operator: str_field(v, "operator"),
        left: self.child(v, "left")?,
        right: self.child(v, "right")?,
      },
      "BlockStatement" | "StaticBlock" => NodeKind::BlockStatement {
        body: self.child_list(v, "body")?,
      },
      "BreakStatement" => NodeKind::BreakStatement,
      "CallExpression" | "OptionalCallExpression" => NodeKind::CallExpression {
        callee: self.child(v, "callee")?,
        arguments: self.child_list(v, "arguments")?,
      },
      "CatchClause" => NodeKind::CatchClause {
        param: self.opt_child(v, "param")?,
        body: self.child(v, "body")?,
      },
      "ClassBody" => NodeKind::ClassBody {
        body: self.child_list(v, "body")?,
      },
      "ClassDeclaration" => NodeKind::ClassDeclaration(self.class(v)?),
      "ClassExpression" => NodeKind::ClassExpression(self.class(v)?),
      "ClassPrivateProperty" => NodeKind::ClassPrivateProperty {
        key: self.child(v, "key")?,
        value: self.opt_child(v, "value")?,
        is_static: bool_field(v, "static"),
      },
      // `PropertyDefinition` is the modern ESTree spelling; Babel-flavored
      // trees say `ClassProperty`. Private `PropertyDefinition` keys are
      // detected from the key kind by the builder's caller.
      "ClassProperty" | "PropertyDefinition" => {
        let key = self.child(v, "key")?;
        if matches!(self.nodes[key.index()].kind, NodeKind::PrivateIdentifier { .. }) {
          NodeKind::ClassPrivateProperty {
            key,
            value: self.opt_child(v, "value")?,
            is_static: bool_field(v, "static"),
          }
        } else {
          NodeKind::ClassProperty {
            key,
            value: self.opt_child(v, "value")?,
            computed: bool_field(v, "computed"),
            is_static: bool_field(v, "static"),
          }
        }
      }
      "ClassMethod" => NodeKind::MethodDefinition {
        key: self.child(v, "key")?,
        value: {
          // Babel inlines the function into the method node.
          let func = self.function(v)?;
          let id = NodeId::from_raw(self.nodes.len() as u32);
          self.nodes.push(NodeData {
            kind: NodeKind::FunctionExpression(func),
            span: read_span(v),
            range: read_range(v),
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
          });
          id
        },
        kind: method_kind(v),
        is_static: bool_field(v, "static"),
        computed: bool_field(v, "computed"),
      },
      "ConditionalExpression" => NodeKind::ConditionalExpression {
        test: self.child(v, "test")?,
        consequent: self.child(v, "consequent")?,
        alternate: self.child(v, "alternate")?,
      },
      "ContinueStatement" => NodeKind::ContinueStatement,
      "DebuggerStatement" => NodeKind::DebuggerStatement,
      "DoWhileStatement" => NodeKind::DoWhileStatement {
        body: self.child(v, "body")?,
        test: self.child(v, "test")?,
      },
      "EmptyStatement" => NodeKind::EmptyStatement,
      "ExportAllDeclaration" => NodeKind::ExportAllDeclaration {
        source: self.opt_child(v, "source")?,
      },
      "ExportDefaultDeclaration" => NodeKind::ExportDefaultDeclaration {
        declaration: self.child(v, "declaration")?,
      },
      "ExportNamedDeclaration" => NodeKind::ExportNamedDeclaration {
        declaration: self.opt_child(v, "declaration")?,
        specifiers: self.child_list(v, "specifiers")?,
        source: self.opt_child(v, "source")?,
      },
      "ExportSpecifier" => NodeKind::ExportSpecifier {
        local: self.child(v, "local")?,
        exported: self.child(v, "exported")?,
      },
      "ExpressionStatement" => NodeKind::ExpressionStatement {
        expression: self.child(v, "expression")?,
        directive: v.get("directive").and_then(Value::as_str).map(str::to_owned),
      },
      "ForInStatement" => NodeKind::ForInStatement {
        left: self.child(v, "left")?,
        right: self.child(v, "right")?,
        body: self.child(v, "body")?,
      },
      "ForOfStatement" => NodeKind::ForOfStatement {
        left: self.child(v, "left")?,
        right: self.child(v, "right")?,
        body: self.child(v, "body")?,
      },
      "ForStatement" => NodeKind::ForStatement {
        init: self.opt_child(v, "init")?,
        test: self.opt_child(v, "test")?,
        update: self.opt_child(v, "update")?,
        body: self.child(v, "body")?,
      },
      "FunctionDeclaration" => NodeKind::FunctionDeclaration(self.function(v)?),
      "FunctionExpression" => NodeKind::FunctionExpression(self.function(v)?),
      "Identifier" => NodeKind::Identifier {
        name: str_field(v, "name"),
      },
      "IfStatement" => NodeKind::IfStatement {
        test: self.child(v, "test")?,
        consequent: self.child(v, "consequent")?,
        alternate: self.opt_child(v, "alternate")?,
      },
      "ImportDeclaration" => NodeKind::ImportDeclaration {
        specifiers: self.child_list(v, "specifiers")?,
        source: self.child(v, "source")?,
      },
      "ImportDefaultSpecifier" => NodeKind::ImportDefaultSpecifier {
        local: self.child(v, "local")?,
      },
      "ImportNamespaceSpecifier" => NodeKind::ImportNamespaceSpecifier {
        local: self.child(v, "local")?,
      },
      "ImportSpecifier" => NodeKind::ImportSpecifier {
        imported: self.child(v, "imported")?,
        local: self.child(v, "local")?,
      },
      "Literal" => self.literal(v, v.get("value")),
      "StringLiteral" | "NumericLiteral" | "BooleanLiteral" | "NullLiteral" => {
        self.literal(v, v.get("value"))
      }
      "RegExpLiteral" => NodeKind::Literal {
        value: LitValue::Regex(str_field(v, "pattern")),
        raw: raw_of(v),
      },
      "BigIntLiteral" => NodeKind::Literal {
        value: LitValue::BigInt(str_field(v, "value")),
        raw: raw_of(v),
      },
      "LogicalExpression" => NodeKind::LogicalExpression {
        operator: str_field(v, "operator"),
        left: self.child(v, "left")?,
        right: self.child(v, "right")?,
      },
      "MemberExpression" | "OptionalMemberExpression" => NodeKind::MemberExpression {
        object: self.child(v, "object")?,
        property: self.child(v, "property")?,
        computed: bool_field(v, "computed"),
      },
      "MetaProperty" => NodeKind::MetaProperty,
      "MethodDefinition" => NodeKind::MethodDefinition {
        key: self.child(v, "key")?,
        value: self.child(v, "value")?,
        kind: method_kind(v),
        is_static: bool_field(v, "static"),
        computed: bool_field(v, "computed"),
      },
      "NewExpression" => NodeKind::NewExpression {
        callee: self.child(v, "callee")?,
        arguments: self.child_list(v, "arguments")?,
      },
      "ObjectExpression" => NodeKind::ObjectExpression {
        properties: self.child_list(v, "properties")?,
      },
      "ObjectPattern" => NodeKind::ObjectPattern {
        properties: self.child_list(v, "properties")?,
      },
      "PrivateIdentifier" => NodeKind::PrivateIdentifier {
        name: str_field(v, "name"),
      },
      "PrivateName" => NodeKind::PrivateIdentifier {
        name: v
          .get("id")
          .and_then(|id| id.get("name"))
          .and_then(Value::as_str)
          .unwrap_or_default()
          .to_owned(),
      },
      "Program" => NodeKind::Program {
        body: self.child_list(v, "body")?,
      },
      "Property" | "ObjectProperty" => NodeKind::Property {
        key: self.child(v, "key")?,
        value: self.child(v, "value")?,
        kind: property_kind(v),
        computed: bool_field(v, "computed"),
      },
      "RestElement" => NodeKind::RestElement {
        argument: self.child(v, "argument")?,
      },
      "ReturnStatement" => NodeKind::ReturnStatement {
        argument: self.opt_child(v, "argument")?,
      },
      "SequenceExpression" => NodeKind::SequenceExpression {
        expressions: self.child_list(v, "expressions")?,
      },
      "SpreadElement" => NodeKind::SpreadElement {
        argument: self.child(v, "argument")?,
      },
      "Super" => NodeKind::Super,
      "SwitchCase" => NodeKind::SwitchCase {
        test: self.opt_child(v, "test")?,
        consequent: self.child_list(v, "consequent")?,
      },
      "SwitchStatement" => NodeKind::SwitchStatement {
        discriminant: self.child(v, "discriminant")?,
        cases: self.child_list(v, "cases")?,
      },
      "TaggedTemplateExpression" => NodeKind::TaggedTemplateExpression {
        tag: self.child(v, "tag")?,
        quasi: self.child(v, "quasi")?,
      },
      "TemplateElement" => NodeKind::TemplateElement,
      "TemplateLiteral" => NodeKind::TemplateLiteral {
        quasis: self.child_list(v, "quasis")?,
        expressions: self.child_list(v, "expressions")?,
      },
      "ThisExpression" => NodeKind::ThisExpression,
      "ThrowStatement" => NodeKind::ThrowStatement {
        argument: self.child(v, "argument")?,
      },
      "TryStatement" => NodeKind::TryStatement {
        block: self.child(v, "block")?,
        handler: self.opt_child(v, "handler")?,
        finalizer: self.opt_child(v, "finalizer")?,
      },
      "UnaryExpression" => NodeKind::UnaryExpression {
        operator: str_field(v, "operator"),
        prefix: v.get("prefix").and_then(Value::as_bool).unwrap_or(true),
        argument: self.child(v, "argument")?,
      },
      "UpdateExpression" => NodeKind::UpdateExpression {
        operator: str_field(v, "operator"),
        prefix: bool_field(v, "prefix"),
        argument: self.child(v, "argument")?,
      },
      "VariableDeclaration" => NodeKind::VariableDeclaration {
        declarations: self.child_list(v, "declarations")?,
        kind: match v.get("kind").and_then(Value::as_str) {
          Some("let") => VarDeclKind::Let,
          Some("const") => VarDeclKind::Const,
          _ => VarDeclKind::Var,
        },
      },
      "VariableDeclarator" => NodeKind::VariableDeclarator {
        id: self.child(v, "id")?,
        init: self.opt_child(v, "init")?,
      },
      "WhileStatement" => NodeKind::WhileStatement {
        test: self.child(v, "test")?,
        body: self.child(v, "body")?,
      },
      "WithStatement" => NodeKind::WithStatement {
        object: self.child(v, "object")?,
        body: self.child(v, "body")?,
      },
      "YieldExpression" => NodeKind::YieldExpression {
        argument: self.opt_child(v, "argument")?,
      },
      _ => NodeKind::Unknown {
        type_name: type_name.to_owned(),
      },
    };
    Ok(kind)
  }

  fn literal(&mut self, v: &Value, value: Option<&Value>) -> NodeKind {
    let lit = match value {
      Some(Value::String(s)) => LitValue::Str(s.clone()),
      Some(Value::Number(n)) => LitValue::Num(n.as_f64().unwrap_or(0.0)),
      Some(Value::Bool(b)) => LitValue::Bool(*b),
      // Esprima-style regex literals have a null `value` and a `regex` field.
      _ => match v.get("regex") {
        Some(regex) => LitValue::Regex(
          regex.get("pattern").and_then(Value::as_str).unwrap_or_default().to_owned(),
        ),
        None => LitValue::Null,
      },
    };
    NodeKind::Literal { value: lit, raw: raw_of(v) }
  }
}

fn str_field(value: &Value, field: &str) -> String {
  value.get(field).and_then(Value::as_str).unwrap_or_default().to_owned()
}

fn bool_field(value: &Value, field: &str) -> bool {
  value.get(field).and_then(Value::as_bool).unwrap_or(false)
}

fn raw_of(value: &Value) -> String {
  match value.get("raw").and_then(Value::as_str) {
    Some(raw) => raw.to_owned(),
    None => value
      .get("value")
      .map(|v| match v {
        Value::String(s) => format!("{:?}", s),
        other => other.to_string(),
      })
      .unwrap_or_default(),
  }
}

fn method_kind(value: &Value) -> MethodKind {
  match value.get("kind").and_then(Value::as_str) {
    Some("constructor") => MethodKind::Constructor,
    Some("get") => MethodKind::Get,
    Some("set") => MethodKind::Set,
    _ => MethodKind::Method,
  }
}

fn property_kind(value: &Value) -> PropertyKind {
  match value.get("kind").and_then(Value::as_str) {
    Some("get") => PropertyKind::Get,
    Some("set") => PropertyKind::Set,
    _ => PropertyKind::Init,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn builds_a_minimal_program() {
    let ast = build(&json!({
      "type": "Program",
      "body": [
        {
          "type": "ExpressionStatement",
          "expression": { "type": "Literal", "value": 1, "raw": "1" }
        }
      ]
    }))
    .unwrap();
    assert_eq!(ast.len(), 3);
    assert!(matches!(ast.kind(ast.root()), NodeKind::Program { body } if body.len() == 1));
  }

  #[test]
  fn unwraps_babel_file_roots() {
    let ast = build(&json!({
      "type": "File",
      "program": { "type": "Program", "body": [] }
    }))
    .unwrap();
    assert!(matches!(ast.kind(ast.root()), NodeKind::Program { .. }));
  }

  #[test]
  fn rejects_non_program_roots() {
    let result = build(&json!({ "type": "Identifier", "name": "x" }));
    assert_eq!(result.unwrap_err().typ, EstreeErrorType::ExpectedProgram);
  }

  #[test]
  fn preserves_unknown_kinds_as_leaves() {
    let ast = build(&json!({
      "type": "Program",
      "body": [{ "type": "TSInterfaceDeclaration", "id": { "type": "Identifier", "name": "I" } }]
    }))
    .unwrap();
    let NodeKind::Program { body } = ast.kind(ast.root()) else { unreachable!() };
    assert!(matches!(
      ast.kind(body[0]),
      NodeKind::Unknown { type_name } if type_name == "TSInterfaceDeclaration"
    ));
  }

  #[test]
  fn reads_comment_attachments() {
    let ast = build(&json!({
      "type": "Program",
      "body": [{
        "type": "FunctionDeclaration",
        "id": { "type": "Identifier", "name": "foo" },
        "params": [],
        "body": { "type": "BlockStatement", "body": [] },
        "leadingComments": [
          { "type": "CommentBlock", "value": "* Doc. ", "start": 0, "end": 11 }
        ]
      }]
    }))
    .unwrap();
    let NodeKind::Program { body } = ast.kind(ast.root()) else { unreachable!() };
    let func = ast.node(body[0]);
    assert_eq!(func.leading_comments.len(), 1);
    assert_eq!(func.leading_comments[0].raw(), "/** Doc. */");
  }

  #[test]
  fn folds_property_definition_into_class_property() {
    let ast = build(&json!({
      "type": "Program",
      "body": [{
        "type": "ClassDeclaration",
        "id": { "type": "Identifier", "name": "A" },
        "body": {
          "type": "ClassBody",
          "body": [
            {
              "type": "PropertyDefinition",
              "key": { "type": "Identifier", "name": "b" },
              "value": { "type": "Literal", "value": 1, "raw": "1" },
              "static": false
            },
            {
              "type": "PropertyDefinition",
              "key": { "type": "PrivateIdentifier", "name": "c" },
              "value": null,
              "static": false
            }
          ]
        }
      }]
    }))
    .unwrap();
    let NodeKind::Program { body } = ast.kind(ast.root()) else { unreachable!() };
    let class = ast.kind(body[0]).as_class().unwrap().clone();
    let NodeKind::ClassBody { body: members } = ast.kind(class.body) else { unreachable!() };
    assert!(matches!(ast.kind(members[0]), NodeKind::ClassProperty { .. }));
    assert!(matches!(ast.kind(members[1]), NodeKind::ClassPrivateProperty { .. }));
  }
}
