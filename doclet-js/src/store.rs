//! The accumulated, indexed collection of doclets for a parse run.

use crate::doclet::Doclet;
use ahash::AHashMap;

/// A stable handle to a doclet within one store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocletId(u32);

impl DocletId {
  pub fn raw(self) -> u32 {
    self.0
  }

  fn index(self) -> usize {
    self.0 as usize
  }
}

/// All doclets produced by a parse run, with the indices downstream
/// consumers query: by longname (multi-valued; overloads share one), by
/// memberof (reverse lookup of a container's children), the documented
/// subset, and the doclets carrying `borrowed` entries.
///
/// The arena also holds cache-only doclets (the global sentinel, anonymous
/// placeholders); those are reachable by id but excluded from iteration and
/// the indices.
#[derive(Default)]
pub struct DocletStore {
  doclets: Vec<Doclet>,
  results: Vec<DocletId>,
  by_longname: AHashMap<String, Vec<DocletId>>,
  by_memberof: AHashMap<String, Vec<DocletId>>,
  documented: AHashMap<String, Vec<DocletId>>,
  borrowed: Vec<DocletId>,
}

impl DocletStore {
  pub fn new() -> DocletStore {
    DocletStore::default()
  }

  pub fn get(&self, id: DocletId) -> &Doclet {
    &self.doclets[id.index()]
  }

  pub fn get_mut(&mut self, id: DocletId) -> &mut Doclet {
    &mut self.doclets[id.index()]
  }

  /// Number of result doclets (cache-only entries excluded).
  pub fn len(&self) -> usize {
    self.results.len()
  }

  pub fn is_empty(&self) -> bool {
    self.results.is_empty()
  }

  /// Adds a doclet to the store and indexes it.
  pub fn add(&mut self, doclet: Doclet) -> DocletId {
    let id = DocletId(self.doclets.len() as u32);
    self.doclets.push(doclet);
    self.results.push(id);
    self.index(id);
    id
  }

  /// Adds a doclet reachable only by id: the global sentinel and anonymous
  /// placeholders, which must never surface in results.
  pub fn add_cache_only(&mut self, doclet: Doclet) -> DocletId {
    let id = DocletId(self.doclets.len() as u32);
    self.doclets.push(doclet);
    id
  }

  fn index(&mut self, id: DocletId) {
    let doclet = &self.doclets[id.index()];
    if let Some(longname) = doclet.longname.clone() {
      self.by_longname.entry(longname.clone()).or_default().push(id);
      if doclet.is_documented() {
        self.documented.entry(longname).or_default().push(id);
      }
    }
    if let Some(memberof) = doclet.memberof.clone() {
      self.by_memberof.entry(memberof).or_default().push(id);
    }
    if doclet.borrowed.is_some() {
      self.borrowed.push(id);
    }
  }

  /// Iterates over result doclets in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &Doclet> {
    self.results.iter().map(|id| &self.doclets[id.index()])
  }

  pub fn ids(&self) -> Vec<DocletId> {
    self.results.clone()
  }

  pub fn by_longname(&self, longname: &str) -> Vec<DocletId> {
    self.by_longname.get(longname).cloned().unwrap_or_default()
  }

  pub fn by_memberof(&self, memberof: &str) -> Vec<DocletId> {
    self.by_memberof.get(memberof).cloned().unwrap_or_default()
  }

  /// The most recently added documented doclet for a longname.
  pub fn documented_by_longname(&self, longname: &str) -> Option<DocletId> {
    self.documented.get(longname).and_then(|ids| ids.last()).copied()
  }

  pub fn is_documented_longname(&self, longname: &str) -> bool {
    self.documented.contains_key(longname)
  }

  pub fn has_longname(&self, longname: &str) -> bool {
    self.by_longname.contains_key(longname)
  }

  /// Longnames of every known doclet, in insertion order.
  pub fn longnames(&self) -> Vec<String> {
    let mut seen = ahash::AHashSet::new();
    self
      .results
      .iter()
      .filter_map(|id| self.doclets[id.index()].longname.clone())
      .filter(|longname| seen.insert(longname.clone()))
      .collect()
  }

  /// Doclets carrying `borrowed` entries.
  pub fn borrowed_ids(&self) -> Vec<DocletId> {
    self.borrowed.clone()
  }

  /// Result doclets matching a predicate.
  pub fn find<'a>(&'a self, predicate: impl Fn(&Doclet) -> bool + 'a) -> Vec<&'a Doclet> {
    self.iter().filter(|doclet| predicate(doclet)).collect()
  }

  /// Appends `ids` to the documented index for a longname; used by the
  /// post-processors when they synthesize inherited members.
  pub(crate) fn mark_documented(&mut self, longname: &str, id: DocletId) {
    self.documented.entry(longname.to_owned()).or_default().push(id);
  }

  pub(crate) fn index_memberof(&mut self, memberof: &str, id: DocletId) {
    self.by_memberof.entry(memberof.to_owned()).or_default().push(id);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dictionary::TagDictionary;
  use crate::doclet::Doclet;
  use crate::doclet::Meta;

  fn doclet(tags: &[&str]) -> Doclet {
    let comment = format!("/**\n{}\n*/", tags.join("\n"));
    Doclet::from_comment(&TagDictionary::jsdoc(), &comment, Meta::default()).unwrap()
  }

  #[test]
  fn indices_track_longname_and_memberof() {
    let mut store = DocletStore::new();
    let panel = store.add(doclet(&["@name Panel", "@class"]));
    let open = store.add(doclet(&["@name open", "@function", "@memberof Panel#"]));

    assert_eq!(store.by_longname("Panel"), vec![panel]);
    assert_eq!(store.by_memberof("Panel"), vec![open]);
    assert_eq!(store.len(), 2);
  }

  #[test]
  fn overloads_share_a_longname() {
    let mut store = DocletStore::new();
    let first = store.add(doclet(&["@name go", "@function"]));
    let second = store.add(doclet(&["@name go", "@function"]));
    assert_eq!(store.by_longname("go"), vec![first, second]);
  }

  #[test]
  fn cache_only_doclets_stay_out_of_results() {
    let mut store = DocletStore::new();
    let hidden = store.add_cache_only(doclet(&["@name secret", "@member"]));
    assert_eq!(store.len(), 0);
    assert!(store.by_longname("secret").is_empty());
    assert_eq!(store.get(hidden).name.as_deref(), Some("secret"));
  }

  #[test]
  fn documented_index_excludes_undocumented_doclets() {
    let mut store = DocletStore::new();
    let mut hidden = doclet(&["@name x", "@member"]);
    hidden.undocumented = Some(true);
    store.add(hidden);
    assert!(!store.is_documented_longname("x"));
    assert_eq!(store.by_longname("x").len(), 1);
  }

  #[test]
  fn find_filters_with_a_predicate() {
    let mut store = DocletStore::new();
    store.add(doclet(&["@name a", "@class"]));
    store.add(doclet(&["@name b", "@function"]));
    let classes = store.find(|d| d.kind == Some(crate::doclet::Kind::Class));
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name.as_deref(), Some("a"));
  }
}
