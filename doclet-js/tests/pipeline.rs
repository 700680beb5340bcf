//! Pipeline behavior: event ordering, comment handling, virtual doclets,
//! and listener cancellation.

mod common;

use common::*;
use doclet_js::dictionary::TagDictionary;
use doclet_js::doclet::Doclet;
use doclet_js::doclet::Kind;
use doclet_js::event::Cancel;
use doclet_js::event::CommentEvent;
use doclet_js::event::Flow;
use doclet_js::event::ParseListener;
use doclet_js::event::SymbolEvent;
use doclet_js::name::Scope;
use doclet_js::parser::Parser;
use doclet_js::parser::SourceFile;
use doclet_js::store::DocletStore;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Recorder {
  events: Rc<RefCell<Vec<String>>>,
}

impl ParseListener for Recorder {
  fn parse_begin(&mut self, _files: &[String]) {
    self.events.borrow_mut().push("parseBegin".into());
  }
  fn file_begin(&mut self, _filename: &str, _cancel: &mut Cancel) {
    self.events.borrow_mut().push("fileBegin".into());
  }
  fn before_parse(&mut self, _filename: &str) {
    self.events.borrow_mut().push("beforeParse".into());
  }
  fn jsdoc_comment_found(&mut self, _event: &mut CommentEvent) {
    self.events.borrow_mut().push("jsdocCommentFound".into());
  }
  fn symbol_found(&mut self, _event: &mut SymbolEvent, _cancel: &mut Cancel) {
    self.events.borrow_mut().push("symbolFound".into());
  }
  fn new_doclet(&mut self, _doclet: &mut Doclet, _cancel: &mut Cancel) {
    self.events.borrow_mut().push("newDoclet".into());
  }
  fn file_complete(&mut self, _filename: &str) {
    self.events.borrow_mut().push("fileComplete".into());
  }
  fn parse_complete(&mut self, _files: &[String], _count: usize) {
    self.events.borrow_mut().push("parseComplete".into());
  }
  fn processing_complete(&mut self, _store: &DocletStore) {
    self.events.borrow_mut().push("processingComplete".into());
  }
}

fn simple_file() -> SourceFile {
  let ast = estree_js::from_json(&program(vec![doc(
    "* Greets. ",
    func_decl("greet", vec![], vec![]),
  )]))
  .unwrap();
  SourceFile { filename: "greet.js".into(), ast }
}

#[test]
fn events_fire_in_the_documented_order() {
  let events = Rc::new(RefCell::new(Vec::new()));
  let mut parser = Parser::new(TagDictionary::jsdoc());
  parser.add_listener(Box::new(Recorder { events: events.clone() }));

  parser.parse(vec![simple_file()]);
  parser.post_process();

  let recorded = events.borrow();
  let positions: Vec<usize> = [
    "parseBegin",
    "fileBegin",
    "beforeParse",
    "jsdocCommentFound",
    "symbolFound",
    "newDoclet",
    "fileComplete",
    "parseComplete",
    "processingComplete",
  ]
  .iter()
  .map(|name| {
    recorded
      .iter()
      .position(|e| e == name)
      .unwrap_or_else(|| panic!("event {} never fired", name))
  })
  .collect();
  let mut sorted = positions.clone();
  sorted.sort_unstable();
  assert_eq!(positions, sorted, "events out of order: {:?}", recorded);
}

struct FileSkipper;

impl ParseListener for FileSkipper {
  fn file_begin(&mut self, _filename: &str, cancel: &mut Cancel) {
    cancel.cancel();
  }
}

#[test]
fn cancelling_file_begin_skips_the_file() {
  let mut parser = Parser::new(TagDictionary::jsdoc());
  parser.add_listener(Box::new(FileSkipper));
  parser.parse(vec![simple_file()]);
  assert!(parser.results().is_empty());
}

struct DocletSuppressor;

impl ParseListener for DocletSuppressor {
  fn new_doclet(&mut self, doclet: &mut Doclet, cancel: &mut Cancel) {
    if doclet.name.as_deref() == Some("greet") {
      cancel.cancel();
    }
  }
}

struct WalkStopper {
  visited: usize,
}

impl ParseListener for WalkStopper {
  fn visit_node(&mut self, _node: estree_js::ast::NodeId, _filename: &str) -> Flow {
    self.visited += 1;
    if self.visited > 1 {
      Flow::Stop
    } else {
      Flow::Continue
    }
  }
}

#[test]
fn a_listener_can_stop_the_walk_early() {
  let mut parser = Parser::new(TagDictionary::jsdoc());
  parser.add_listener(Box::new(WalkStopper { visited: 0 }));
  // Processing stops before the documented function is reached.
  let ast = estree_js::from_json(&program(vec![
    expr_stmt(literal(json!(1))),
    doc("* Greets. ", func_decl("greet", vec![], vec![])),
  ]))
  .unwrap();
  parser.parse(vec![SourceFile { filename: "stop.js".into(), ast }]);
  assert!(parser.results().by_longname("greet").is_empty());
}

#[test]
fn cancelling_new_doclet_keeps_it_out_of_the_store() {
  let mut parser = Parser::new(TagDictionary::jsdoc());
  parser.add_listener(Box::new(DocletSuppressor));
  parser.parse(vec![simple_file()]);
  assert!(parser.results().by_longname("greet").is_empty());
}

#[test]
fn virtual_comments_become_standalone_doclets() {
  // A comment with its own @name documents a symbol that is not in the
  // code at all.
  let store = parse_one(program(vec![doc(
    "* The app config.\n@name config\n@namespace ",
    empty_stmt(),
  )]));

  let ids = store.by_longname("config");
  assert_eq!(ids.len(), 1);
  let doclet = store.get(ids[0]);
  assert_eq!(doclet.kind, Some(Kind::Namespace));
  assert_eq!(doclet.scope, Some(Scope::Global));
  assert_eq!(doclet.description.as_deref(), Some("The app config."));
}

#[test]
fn also_produces_multiple_doclets_from_one_comment() {
  let store = parse_one(program(vec![doc(
    "* Fade in.\n@name fadein\n@function\n@variation 1\n@also\nFade in slowly.\n@name fadein\n@function\n@variation 2 ",
    empty_stmt(),
  )]));

  assert_eq!(store.by_longname("fadein(1)").len(), 1);
  assert_eq!(store.by_longname("fadein(2)").len(), 1);
}

#[test]
fn standalone_file_comment_is_separated_from_the_first_declaration() {
  // /** @file Utilities. */
  // /** Greets. */
  // function greet() {}
  let mut func = doc("* @file Utilities. ", func_decl("greet", vec![], vec![]));
  func = doc("* Greets. ", func);
  let store = parse_one(program(vec![func]));

  let file_doclets = store.find(|d| d.kind == Some(Kind::File));
  assert_eq!(file_doclets.len(), 1);
  assert_eq!(file_doclets[0].description.as_deref(), Some("Utilities."));

  let greet = store.by_longname("greet");
  assert_eq!(greet.len(), 1);
  assert_eq!(store.get(greet[0]).description.as_deref(), Some("Greets."));
}

#[test]
fn default_and_rest_params_backfill_the_doclet() {
  // /** @param {number} a - First. @param {number} b @param {...string} rest */
  // function go(a, b = 3, ...rest) {}
  let params = vec![
    json!({ "type": "Identifier", "name": "a" }),
    json!({
      "type": "AssignmentPattern",
      "left": { "type": "Identifier", "name": "b" },
      "right": { "type": "Literal", "value": 3, "raw": "3" }
    }),
    json!({
      "type": "RestElement",
      "argument": { "type": "Identifier", "name": "rest" }
    }),
  ];
  let store = parse_one(program(vec![doc(
    "* Goes.\n@param {number} a - First.\n@param {number} b\n@param {...string} rest ",
    func_decl("go", params, vec![]),
  )]));

  let ids = store.by_longname("go");
  assert_eq!(ids.len(), 1);
  let params = store.get(ids[0]).params.clone().unwrap();
  assert_eq!(params.len(), 3);
  assert_eq!(params[1].name.as_deref(), Some("b"));
  assert_eq!(params[1].defaultvalue, Some(json!(3.0)));
  assert_eq!(params[2].variable, Some(true));
}

#[test]
fn enum_members_collect_onto_the_enum_doclet() {
  // /** @enum {number} */
  // var Level = {
  //   /** Lowest. */
  //   LOW: 1,
  //   HIGH: 2
  // };
  let object = json!({
    "type": "ObjectExpression",
    "properties": [
      {
        "type": "Property",
        "kind": "init",
        "computed": false,
        "key": doc("* Lowest. ", ident("LOW")),
        "value": literal(json!(1))
      },
      {
        "type": "Property",
        "kind": "init",
        "computed": false,
        "key": ident("HIGH"),
        "value": literal(json!(2))
      }
    ]
  });
  let store = parse_one(program(vec![doc(
    "* @enum {number} ",
    var_decl("var", "Level", Some(object)),
  )]));

  let ids = store.by_longname("Level");
  assert_eq!(ids.len(), 1);
  let level = store.get(ids[0]);
  assert_eq!(level.is_enum, Some(true));
  let properties = level.properties.clone().unwrap();
  assert_eq!(properties.len(), 2);
  assert_eq!(properties[0].name.as_deref(), Some("LOW"));
  // Members inherit the enum's type.
  assert_eq!(
    properties[0].type_.as_ref().map(|t| t.names.clone()),
    Some(vec!["number".to_owned()])
  );
}
