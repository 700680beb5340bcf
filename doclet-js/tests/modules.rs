//! Module semantics: `@module` comments, `exports.*` and `module.exports`
//! name resolution, and inner-member defaults inside modules.

mod common;

use common::*;
use doclet_js::doclet::Kind;
use doclet_js::name::Scope;
use serde_json::json;

fn module_file(extra: Vec<serde_json::Value>) -> serde_json::Value {
  // /** @module color/mixer */
  // /** Blends two colors. */
  // exports.blend = function() {};
  // The walker hands the standalone module comment to the program node.
  let mut body = vec![json!({
    "type": "ExpressionStatement",
    "expression": assign(member(ident("exports"), "blend"), func_expr(vec![], vec![])),
    "leadingComments": [
      { "type": "CommentBlock", "value": "* @module color/mixer " },
      { "type": "CommentBlock", "value": "* Blends two colors. " }
    ]
  })];
  body.extend(extra);
  program(body)
}

#[test]
fn module_comment_names_the_module() {
  let store = parse_one(module_file(vec![]));
  let ids = store.by_longname("module:color/mixer");
  assert_eq!(ids.len(), 1);
  assert_eq!(store.get(ids[0]).kind, Some(Kind::Module));
}

#[test]
fn exports_assignments_become_static_module_members() {
  let store = parse_one(module_file(vec![]));
  let ids = store.by_longname("module:color/mixer.blend");
  assert_eq!(ids.len(), 1);
  let blend = store.get(ids[0]);
  assert_eq!(blend.memberof.as_deref(), Some("module:color/mixer"));
  assert_eq!(blend.scope, Some(Scope::Static));
  assert_eq!(blend.kind, Some(Kind::Function));
}

#[test]
fn undecorated_functions_in_a_module_are_inner_members() {
  let store = parse_one(module_file(vec![doc(
    "* Darkens a color. ",
    func_decl("darken", vec![ident("color")], vec![]),
  )]));

  let ids = store.by_longname("module:color/mixer~darken");
  assert_eq!(ids.len(), 1);
  assert_eq!(store.get(ids[0]).scope, Some(Scope::Inner));
}

#[test]
fn module_exports_assignment_documents_the_module_object() {
  // /** @module loader */
  // /** Loads things. */
  // module.exports = function() {};
  let store = parse_one(program(vec![json!({
    "type": "ExpressionStatement",
    "expression": assign(
      member(ident("module"), "exports"),
      func_expr(vec![], vec![])
    ),
    "leadingComments": [
      { "type": "CommentBlock", "value": "* @module loader " },
      { "type": "CommentBlock", "value": "* Loads things. " }
    ]
  })]));

  let documented: Vec<_> = store
    .by_longname("module:loader")
    .into_iter()
    .filter(|&id| store.get(id).is_documented())
    .collect();
  assert!(!documented.is_empty());
  let func = documented
    .iter()
    .find(|&&id| store.get(id).description.as_deref() == Some("Loads things."));
  assert!(func.is_some(), "the assigned function should document the module object");
}

#[test]
fn this_members_at_module_top_level_are_static() {
  // /** @module counter */
  // /** The count. */
  // this.count = 0;
  let store = parse_one(program(vec![json!({
    "type": "ExpressionStatement",
    "expression": assign(
      member(json!({ "type": "ThisExpression" }), "count"),
      literal(json!(0))
    ),
    "leadingComments": [
      { "type": "CommentBlock", "value": "* @module counter " },
      { "type": "CommentBlock", "value": "* The count. " }
    ]
  })]));

  let ids = store.by_longname("module:counter.count");
  assert_eq!(ids.len(), 1);
  assert_eq!(store.get(ids[0]).scope, Some(Scope::Static));
}
