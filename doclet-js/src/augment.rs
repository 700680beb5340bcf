//! Inheritance flattening over the completed doclet store: copies inherited
//! members into subclasses (`@augments`), mixed-in members onto their hosts
//! (`@mixes`), and interface members onto implementations (`@implements`).
//!
//! The relationship graph is processed in dependency order so every parent
//! is fully resolved before its children. Cycles are reported with the
//! cycle's member longnames and the affected doclets are skipped; the rest
//! of the store still processes.

use crate::doclet;
use crate::doclet::Doclet;
use crate::doclet::Kind;
use crate::error::DocletError;
use crate::error::DocletErrorType;
use crate::name;
use crate::name::Scope;
use crate::store::DocletId;
use crate::store::DocletStore;
use ahash::AHashMap;
use ahash::AHashSet;
use itertools::Itertools;

// The kinds whose members can be inherited, mixed in, or implemented.
fn is_container_kind(kind: Option<Kind>) -> bool {
  matches!(
    kind,
    Some(Kind::Class) | Some(Kind::External) | Some(Kind::Interface) | Some(Kind::Mixin)
  )
}

fn relation_of(doclet: &Doclet, property: Relation) -> Option<&[String]> {
  match property {
    Relation::Augments => doclet.augments.as_deref(),
    Relation::Mixes => doclet.mixes.as_deref(),
    Relation::Implements => doclet.implements.as_deref(),
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Relation {
  Augments,
  Mixes,
  Implements,
}

// Longname -> direct parents, for every container doclet that carries the
// relation.
fn map_dependencies(store: &DocletStore, relation: Relation) -> AHashMap<String, Vec<String>> {
  let mut dependencies: AHashMap<String, Vec<String>> = AHashMap::new();
  for longname in store.longnames() {
    for id in store.by_longname(&longname) {
      let doclet = store.get(id);
      if !is_container_kind(doclet.kind) {
        continue;
      }
      let entry = dependencies.entry(longname.clone()).or_default();
      if let Some(parents) = relation_of(doclet, relation) {
        for parent in parents {
          if !entry.contains(parent) {
            entry.push(parent.clone());
          }
        }
      }
    }
  }
  dependencies
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
  Visiting,
  Done,
}

// Depth-first topological sort with cycle detection. Parents sort before
// the doclets that depend on them; members of a detected cycle are reported
// and excluded from the order.
fn sort_dependencies(
  dependencies: &AHashMap<String, Vec<String>>,
) -> (Vec<String>, Vec<DocletError>) {
  let mut marks: AHashMap<&str, Mark> = AHashMap::new();
  let mut sorted = Vec::new();
  let mut cyclic: AHashSet<String> = AHashSet::new();
  let mut errors = Vec::new();

  fn visit<'a>(
    key: &'a str,
    dependencies: &'a AHashMap<String, Vec<String>>,
    marks: &mut AHashMap<&'a str, Mark>,
    sorted: &mut Vec<String>,
    cyclic: &mut AHashSet<String>,
    errors: &mut Vec<DocletError>,
    stack: &mut Vec<String>,
  ) {
    match marks.get(key) {
      Some(Mark::Done) => return,
      Some(Mark::Visiting) => {
        // A back edge: everything from the first occurrence of `key` on
        // the stack is part of the cycle.
        let start = stack
          .iter()
          .position(|entry| entry.as_str() == key)
          .unwrap_or(0);
        let mut members: Vec<String> = stack[start..].to_vec();
        members.push(key.to_owned());
        cyclic.extend(members.iter().cloned());
        errors.push(DocletError::new(DocletErrorType::CyclicAugments(members)));
        return;
      }
      None => {}
    }
    marks.insert(key, Mark::Visiting);
    stack.push(key.to_owned());
    if let Some(parents) = dependencies.get(key) {
      for parent in parents {
        if let Some((parent_key, _)) = dependencies.get_key_value(parent) {
          visit(parent_key, dependencies, marks, sorted, cyclic, errors, stack);
        }
      }
    }
    stack.pop();
    marks.insert(key, Mark::Done);
    sorted.push(key.to_owned());
  }

  let mut stack = Vec::new();
  for key in dependencies.keys().sorted() {
    visit(key, dependencies, &mut marks, &mut sorted, &mut cyclic, &mut errors, &mut stack);
  }

  (
    sorted.into_iter().filter(|key| !cyclic.contains(key)).collect(),
    errors,
  )
}

// The members of a container, restricted to the given scopes.
fn members_in_scope(store: &DocletStore, longname: &str, scopes: &[Scope]) -> Vec<DocletId> {
  store
    .by_memberof(longname)
    .into_iter()
    .filter(|&id| {
      store
        .get(id)
        .scope
        .is_some_and(|scope| scopes.contains(&scope))
    })
    .collect()
}

fn change_memberof(longname: &str, new_memberof: &str) -> String {
  let mut parts = name::atomize(longname, None);
  parts.memberof = new_memberof.to_owned();
  name::combine(&parts)
}

fn mark_properties_inherited(doclet: &mut Doclet) {
  if let Some(properties) = &mut doclet.properties {
    for property in properties {
      property.inherited = Some(true);
    }
  }
}

// Whether any doclet under this longname asked for its docs to come from an
// ancestor.
fn explicitly_inherits(store: &DocletStore, longname: &str) -> bool {
  store.by_longname(longname).into_iter().any(|id| {
    let doclet = store.get(id);
    doclet.inheritdoc.is_some() || doclet.override_ == Some(true)
  })
}

// One synthesized member, deduplicated by longname (the last parent wins
// when multiple ancestors supply the same member name).
struct Additions {
  doclets: Vec<Doclet>,
  index: AHashMap<String, usize>,
}

impl Additions {
  fn new() -> Additions {
    Additions { doclets: Vec::new(), index: AHashMap::new() }
  }

  fn push(&mut self, doclet: Doclet) {
    let longname = doclet.longname.clone().unwrap_or_default();
    match self.index.get(&longname) {
      Some(&idx) => self.doclets[idx] = doclet,
      None => {
        self.index.insert(longname, self.doclets.len());
        self.doclets.push(doclet);
      }
    }
  }
}

fn commit_additions(store: &mut DocletStore, additions: Additions) {
  for doclet in additions.doclets {
    store.add(doclet);
  }
}

// Copies instance members down from each ancestor (nearest first) onto the
// inheriting doclet, skipping members the descendant overrides and
// documents itself.
fn inherited_additions(store: &mut DocletStore, child_longname: &str) -> Additions {
  let mut additions = Additions::new();

  for child_id in store.by_longname(child_longname) {
    let child = store.get(child_id);
    if !matches!(child.kind, Some(Kind::Class) | Some(Kind::Interface)) {
      continue;
    }
    let Some(parents) = child.augments.clone() else {
      continue;
    };
    let child_longname = child.longname.clone().unwrap_or_default();

    for parent in parents {
      for member_id in members_in_scope(store, &parent, &[Scope::Instance]) {
        let member = store.get(member_id);
        if !member.is_documented() {
          continue;
        }
        let member_longname = member.longname.clone().unwrap_or_default();
        let new_longname = change_memberof(&member_longname, &child_longname);

        // The descendant's own docs, unless it explicitly inherits.
        let own = store
          .documented_by_longname(&new_longname)
          .map(|id| store.get(id).clone())
          .filter(|own| own.inheritdoc.is_none())
          .unwrap_or_default();

        let mut copied = doclet::combine(&own, store.get(member_id));
        if copied.inherited != Some(true) {
          copied.inherits = copied.longname.clone();
        }
        copied.inherited = Some(true);
        copied.memberof = Some(child_longname.clone());
        copied.longname = Some(new_longname.clone());
        mark_properties_inherited(&mut copied);

        // Only note an override against the closest ancestor that actually
        // exists under the new longname.
        if store.has_longname(&new_longname) {
          copied.overrides = Some(member_longname.clone());
        } else {
          copied.overrides = None;
        }

        if !store.is_documented_longname(&new_longname) {
          additions.push(copied);
        } else if explicitly_inherits(store, &new_longname) {
          // Replace the descendant's docs with the ancestor's.
          for id in store.by_longname(&new_longname) {
            if store.get(id).is_documented() {
              store.get_mut(id).ignore = Some(true);
            }
          }
          copied.virtual_ = None;
          copied.inheritdoc = None;
          copied.override_ = None;
          additions.push(copied);
        } else {
          for id in store.by_longname(&new_longname) {
            if store.get(id).is_documented() {
              store.get_mut(id).overrides = Some(member_longname.clone());
            }
          }
        }
      }
    }
  }
  additions
}

// Copies static members of each mixin onto the mixing doclet; mixing into a
// class makes them instance members.
fn mixed_in_additions(store: &mut DocletStore, host_longname: &str) -> Additions {
  let mut additions = Additions::new();

  for host_id in store.by_longname(host_longname) {
    let host = store.get(host_id);
    let Some(mixes) = host.mixes.clone() else {
      continue;
    };
    let host_longname = host.longname.clone().unwrap_or_default();
    let host_is_class = host.kind == Some(Kind::Class);

    for mixin in mixes {
      for member_id in members_in_scope(store, &mixin, &[Scope::Static]) {
        if !store.get(member_id).is_documented() {
          continue;
        }
        let mut copied = store.get(member_id).clone();
        let copied_longname = copied.longname.clone().unwrap_or_default();

        // Record where the copy came from, collapsing chains: a member
        // mixed from A into B and then into C lists only the closest
        // source.
        let copied_short = name::atomize(&copied_longname, None).name;
        let mixes_list = copied.mixes.get_or_insert_with(Vec::new);
        mixes_list.retain(|entry| name::atomize(entry, None).name != copied_short);
        mixes_list.push(copied_longname);
        copied.mixed = Some(true);

        let new_longname = change_memberof(
          &copied.longname.clone().unwrap_or_default(),
          &host_longname,
        );
        copied.memberof = Some(host_longname.clone());
        copied.longname = Some(new_longname);
        if host_is_class {
          let mut parts =
            name::atomize(&copied.longname.clone().unwrap_or_default(), None);
          parts.scope = name::PUNC_INSTANCE.to_string();
          copied.longname = Some(name::combine(&parts));
          copied.scope = Some(Scope::Instance);
        }
        additions.push(copied);
      }
    }
  }
  additions
}

// Copies interface members onto implementations, and records the
// implements relationship on documented implementations.
fn implemented_additions(store: &mut DocletStore, impl_longname: &str) -> Additions {
  let mut additions = Additions::new();

  for impl_id in store.by_longname(impl_longname) {
    let implementor = store.get(impl_id);
    let Some(interfaces) = implementor.implements.clone() else {
      continue;
    };
    let impl_longname = implementor.longname.clone().unwrap_or_default();

    for interface in interfaces {
      for member_id in members_in_scope(store, &interface, &[Scope::Instance]) {
        let member = store.get(member_id);
        if !member.is_documented() {
          continue;
        }
        let member_longname = member.longname.clone().unwrap_or_default();
        let new_longname = change_memberof(&member_longname, &impl_longname);

        let own = store
          .documented_by_longname(&new_longname)
          .map(|id| store.get(id).clone())
          .filter(|own| own.inheritdoc.is_none())
          .unwrap_or_default();

        let mut copied = doclet::combine(&own, store.get(member_id));
        copied.memberof = Some(impl_longname.clone());
        copied.longname = Some(new_longname.clone());
        let implements_list = copied.implements.get_or_insert_with(Vec::new);
        if !implements_list.contains(&member_longname) {
          implements_list.push(member_longname.clone());
        }

        // Without an implementation in the code there is nothing to
        // annotate.
        if !store.has_longname(&new_longname) {
          continue;
        }

        if !store.is_documented_longname(&new_longname) {
          additions.push(copied);
        } else if explicitly_inherits(store, &new_longname) {
          for id in store.by_longname(&new_longname) {
            if store.get(id).is_documented() {
              store.get_mut(id).ignore = Some(true);
            }
          }
          copied.virtual_ = None;
          copied.inheritdoc = None;
          copied.override_ = None;
          additions.push(copied);
        } else {
          for id in store.by_longname(&new_longname) {
            if store.get(id).is_documented() {
              let implements =
                store.get_mut(id).implements.get_or_insert_with(Vec::new);
              if !implements.contains(&member_longname) {
                implements.push(member_longname.clone());
              }
            }
          }
        }
      }
    }
  }
  additions
}

fn augment(
  store: &mut DocletStore,
  relation: Relation,
  finder: fn(&mut DocletStore, &str) -> Additions,
) -> Vec<DocletError> {
  let dependencies = map_dependencies(store, relation);
  let (order, errors) = sort_dependencies(&dependencies);
  for longname in order {
    let additions = finder(store, &longname);
    commit_additions(store, additions);
  }
  errors
}

/// Adds doclets to reflect mixins.
pub fn add_mixed_in(store: &mut DocletStore) -> Vec<DocletError> {
  augment(store, Relation::Mixes, mixed_in_additions)
}

/// Adds and updates doclets to reflect interface implementations.
pub fn add_implemented(store: &mut DocletStore) -> Vec<DocletError> {
  augment(store, Relation::Implements, implemented_additions)
}

/// Adds doclets to reflect class inheritance.
pub fn add_inherited(store: &mut DocletStore) -> Vec<DocletError> {
  augment(store, Relation::Augments, inherited_additions)
}

/// Runs all augmentation passes: mixins, implementations, inheritance, and
/// implementations once more in case an interface was inherited.
pub fn augment_all(store: &mut DocletStore) -> Vec<DocletError> {
  let mut errors = add_mixed_in(store);
  errors.extend(add_implemented(store));
  errors.extend(add_inherited(store));
  errors.extend(add_implemented(store));
  errors
}
