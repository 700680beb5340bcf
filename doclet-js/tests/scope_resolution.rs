//! End-to-end longname resolution: memberof back-filling, local alias
//! tables, `this` binding, and anonymous-scope sentinels.

mod common;

use common::*;
use doclet_js::doclet::Kind;
use doclet_js::name::Scope;
use serde_json::json;
use serde_json::Value;

#[test]
fn static_member_assignment_resolves_against_the_declared_function() {
  // function Foo() {}
  // /** @memberof Foo */
  // Foo.bar = function() {};
  let store = parse_one(program(vec![
    func_decl("Foo", vec![], vec![]),
    expr_stmt(doc(
      "* @memberof Foo ",
      assign(member(ident("Foo"), "bar"), func_expr(vec![], vec![])),
    )),
  ]));

  let ids = store.by_longname("Foo.bar");
  assert_eq!(ids.len(), 1);
  let doclet = store.get(ids[0]);
  assert_eq!(doclet.memberof.as_deref(), Some("Foo"));
  assert_eq!(doclet.scope, Some(Scope::Static));
  assert_eq!(doclet.kind, Some(Kind::Function));
}

#[test]
fn undocumented_member_assignment_still_resolves_by_name_shape() {
  // function Foo() {}
  // /** Doc. */
  // Foo.bar = function() {};
  let store = parse_one(program(vec![
    func_decl("Foo", vec![], vec![]),
    expr_stmt(doc(
      "* Adds bar. ",
      assign(member(ident("Foo"), "bar"), func_expr(vec![], vec![])),
    )),
  ]));

  let ids = store.by_longname("Foo.bar");
  assert_eq!(ids.len(), 1);
  assert_eq!(store.get(ids[0]).description.as_deref(), Some("Adds bar."));
}

#[test]
fn local_alias_wins_over_a_same_named_global() {
  // /** Global impostor. */
  // var Panel = 1;
  // /** Container. */
  // function init() {
  //   /** Local alias. */
  //   var Panel = require('panel');
  //   /** Documented member. */
  //   Panel.baz = 1;
  // }
  let inner_var = doc(
    "* Local alias. ",
    var_decl("var", "Panel", Some(call(ident("require"), vec![literal(json!("panel"))]))),
  );
  let inner_assign = expr_stmt(doc(
    "* Documented member. ",
    assign(member(ident("Panel"), "baz"), literal(json!(1))),
  ));
  let store = parse_one(program(vec![
    doc("* Global impostor. ", var_decl("var", "Panel", Some(literal(json!(1))))),
    doc("* Container. ", func_decl("init", vec![], vec![inner_var, inner_assign])),
  ]));

  // The inner var resolves into the function's inner scope.
  assert_eq!(store.by_longname("init~Panel").len(), 1);

  // And the member assignment follows the local alias, not the global.
  let ids = store.by_longname("init~Panel.baz");
  assert_eq!(ids.len(), 1);
  assert_eq!(store.get(ids[0]).memberof.as_deref(), Some("init~Panel"));
  assert!(store.by_longname("Panel.baz").is_empty());
}

#[test]
fn this_inside_a_constructor_function_binds_to_the_class() {
  // /** @class */
  // function Person() {
  //   /** The name. */
  //   this.name = null;
  // }
  let body = expr_stmt(doc(
    "* The name. ",
    assign(member(json!({ "type": "ThisExpression" }), "name"), literal(Value::Null)),
  ));
  let store = parse_one(program(vec![doc(
    "* @class ",
    func_decl("Person", vec![], vec![body]),
  )]));

  let ids = store.by_longname("Person#name");
  assert_eq!(ids.len(), 1);
  let doclet = store.get(ids[0]);
  assert_eq!(doclet.memberof.as_deref(), Some("Person"));
  assert_eq!(doclet.scope, Some(Scope::Instance));
}

#[test]
fn es2015_class_members_resolve_instance_and_static_scope() {
  // /** A panel. */
  // class Panel {
  //   /** Makes one. */
  //   constructor(width) {}
  //   /** Opens it. */
  //   open() {}
  //   /** Builds one. */
  //   static create() {}
  // }
  let store = parse_one(program(vec![doc(
    "* A panel. ",
    class_decl("Panel", vec![
      doc("* Makes one. ", method("constructor", "constructor", false, vec![ident("width")], vec![])),
      doc("* Opens it. ", method("method", "open", false, vec![], vec![])),
      doc("* Builds one. ", method("method", "create", true, vec![], vec![])),
    ]),
  )]));

  let open = store.by_longname("Panel#open");
  assert_eq!(open.len(), 1);
  assert_eq!(store.get(open[0]).scope, Some(Scope::Instance));
  assert_eq!(store.get(open[0]).kind, Some(Kind::Function));

  let create = store.by_longname("Panel.create");
  assert_eq!(create.len(), 1);
  assert_eq!(store.get(create[0]).scope, Some(Scope::Static));

  // The constructor's docs merged into the class doclet.
  let merged: Vec<_> = store
    .by_longname("Panel")
    .into_iter()
    .filter(|&id| store.get(id).is_documented())
    .collect();
  assert_eq!(merged.len(), 1);
  let merged = store.get(merged[0]);
  assert_eq!(merged.kind, Some(Kind::Class));
  assert_eq!(merged.classdesc.as_deref(), Some("A panel."));
}

#[test]
fn this_inside_es2015_constructor_binds_to_the_class() {
  // class Point {
  //   constructor() {
  //     /** X coordinate. */
  //     this.x = 0;
  //   }
  // }
  let ctor_body = expr_stmt(doc(
    "* X coordinate. ",
    assign(member(json!({ "type": "ThisExpression" }), "x"), literal(json!(0))),
  ));
  let store = parse_one(program(vec![doc(
    "* A point. ",
    class_decl("Point", vec![method(
      "constructor",
      "constructor",
      false,
      vec![],
      vec![ctor_body],
    )]),
  )]));

  let ids = store.by_longname("Point#x");
  assert_eq!(ids.len(), 1);
  assert_eq!(store.get(ids[0]).description.as_deref(), Some("X coordinate."));
}

#[test]
fn vars_in_anonymous_functions_resolve_under_the_anonymous_sentinel() {
  // setTimeout(function() {
  //   /** Documented local. */
  //   var x = 1;
  // }, 0);
  let inner = doc("* Documented local. ", var_decl("var", "x", Some(literal(json!(1)))));
  let store = parse_one(program(vec![expr_stmt(call(
    ident("setTimeout"),
    vec![func_expr(vec![], vec![inner]), literal(json!(0))],
  ))]));

  let ids = store.by_longname("<anonymous>~x");
  assert_eq!(ids.len(), 1);

  // The placeholder itself never surfaces.
  assert!(store.iter().all(|d| d.longname.as_deref() != Some("<anonymous>")));
}

#[test]
fn function_declarations_do_not_leak_into_anonymous_scopes() {
  // setTimeout(function() {
  //   /** Documented inner function. */
  //   function go() {}
  // }, 0);
  let inner = doc("* Documented inner function. ", func_decl("go", vec![], vec![]));
  let store = parse_one(program(vec![expr_stmt(call(
    ident("setTimeout"),
    vec![func_expr(vec![], vec![inner]), literal(json!(0))],
  ))]));

  // Inner declarations are still members of the anonymous scope...
  let ids = store.by_longname("<anonymous>~go");
  assert_eq!(ids.len(), 1);
  // ...but their own funcscope is empty, so the name itself stays short.
  assert_eq!(store.get(ids[0]).name.as_deref(), Some("go"));
}

#[test]
fn object_literal_properties_resolve_through_the_object_doclet() {
  // /** @namespace */
  // var config = {
  //   /** The port. */
  //   port: 8080
  // };
  let object = json!({
    "type": "ObjectExpression",
    "properties": [{
      "type": "Property",
      "kind": "init",
      "computed": false,
      "key": doc("* The port. ", ident("port")),
      "value": literal(json!(8080))
    }]
  });
  let store = parse_one(program(vec![doc(
    "* @namespace ",
    var_decl("var", "config", Some(object)),
  )]));

  let ids = store.by_longname("config.port");
  assert_eq!(ids.len(), 1);
  assert_eq!(store.get(ids[0]).memberof.as_deref(), Some("config"));
}

#[test]
fn cross_file_scope_state_respects_file_order() {
  // a.js: /** @namespace */ var shared = {};
  // b.js: /** Doc. */ shared.thing = 1;
  let first = program(vec![doc(
    "* @namespace ",
    var_decl("var", "shared", Some(json!({ "type": "ObjectExpression", "properties": [] }))),
  )]);
  let second = program(vec![expr_stmt(doc(
    "* Doc. ",
    assign(member(ident("shared"), "thing"), literal(json!(1))),
  ))]);

  let store = parse_named(vec![("a.js", first), ("b.js", second)]);
  let ids = store.by_longname("shared.thing");
  assert_eq!(ids.len(), 1);
  assert_eq!(store.get(ids[0]).memberof.as_deref(), Some("shared"));
}
