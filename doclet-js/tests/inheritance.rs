//! Post-parse graph transforms through the full pipeline: augment, mixes,
//! and borrows over doclets produced from parsed input.

mod common;

use common::*;
use doclet_js::name::Scope;

fn virtual_doclets(comments: &[&str]) -> Vec<serde_json::Value> {
  comments.iter().map(|c| doc(c, empty_stmt())).collect()
}

#[test]
fn children_gain_inherited_members() {
  let store = parse_one(program(virtual_doclets(&[
    "* @name Base\n@class ",
    "* The x property.\n@name x\n@member\n@memberof Base# ",
    "* @name Child\n@class\n@augments Base ",
  ])));

  let inherited = store.by_longname("Child#x");
  assert_eq!(inherited.len(), 1);
  let inherited = store.get(inherited[0]);
  assert_eq!(inherited.inherited, Some(true));
  assert_eq!(inherited.inherits.as_deref(), Some("Base#x"));
  assert_eq!(inherited.memberof.as_deref(), Some("Child"));
}

#[test]
fn own_declarations_are_not_overwritten_by_inherited_ones() {
  let store = parse_one(program(virtual_doclets(&[
    "* @name Base\n@class ",
    "* From the base.\n@name x\n@member\n@memberof Base# ",
    "* @name Child\n@class\n@augments Base ",
    "* The child's own x.\n@name x\n@member\n@memberof Child# ",
  ])));

  let own: Vec<_> = store
    .by_longname("Child#x")
    .into_iter()
    .map(|id| store.get(id))
    .collect();
  assert_eq!(own.len(), 1);
  assert_eq!(own[0].description.as_deref(), Some("The child's own x."));
  assert_ne!(own[0].inherited, Some(true));
}

#[test]
fn grandchildren_inherit_through_the_chain() {
  let store = parse_one(program(virtual_doclets(&[
    "* @name A\n@class ",
    "* Speaks.\n@name speak\n@function\n@memberof A# ",
    "* @name B\n@class\n@augments A ",
    "* @name C\n@class\n@augments B ",
  ])));

  assert_eq!(store.by_longname("B#speak").len(), 1);
  assert_eq!(store.by_longname("C#speak").len(), 1);
}

#[test]
fn mixins_copy_static_members_as_instance_members_of_classes() {
  let store = parse_one(program(virtual_doclets(&[
    "* @name Events\n@mixin ",
    "* Emits.\n@name emit\n@function\n@memberof Events ",
    "* @name Widget\n@class\n@mixes Events ",
  ])));

  let mixed = store.by_longname("Widget#emit");
  assert_eq!(mixed.len(), 1);
  let mixed = store.get(mixed[0]);
  assert_eq!(mixed.scope, Some(Scope::Instance));
  assert_eq!(mixed.mixed, Some(true));
}

#[test]
fn borrows_clone_members_under_new_names() {
  let store = parse_one(program(virtual_doclets(&[
    "* Trims a string.\n@name trim\n@function\n@memberof util ",
    "* @name Str\n@class\n@borrows util.trim as trimString ",
  ])));

  let cloned = store.by_longname("Str.trimString");
  assert_eq!(cloned.len(), 1);
  assert_eq!(store.get(cloned[0]).description.as_deref(), Some("Trims a string."));
}

#[test]
fn interface_implementations_are_cross_linked() {
  let store = parse_one(program(virtual_doclets(&[
    "* @name Startable\n@interface ",
    "* Starts the thing.\n@name start\n@function\n@memberof Startable# ",
    "* @name Engine\n@class\n@implements Startable ",
    "* Starts the engine.\n@name start\n@function\n@memberof Engine# ",
  ])));

  let implementation = store.by_longname("Engine#start");
  assert_eq!(implementation.len(), 1);
  let implements = store.get(implementation[0]).implements.clone().unwrap();
  assert_eq!(implements, vec!["Startable#start".to_owned()]);
}
