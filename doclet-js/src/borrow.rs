//! Resolution of `@borrows` tags: cloning a documented symbol under a new
//! name on the borrowing doclet.

use crate::name;
use crate::name::Scope;
use crate::store::DocletStore;

/// Creates doclets for borrowed symbols and adds them to the store.
///
/// Each `{from, as}` entry clones the doclets found under `from`, renames
/// them to live under the borrowing doclet (under `as` when given, else the
/// original short name), and clears the `borrowed` list. A source longname
/// with no doclets is silently dropped; the source simply was not
/// documented.
pub fn resolve_borrows(store: &mut DocletStore) {
  for borrower_id in store.borrowed_ids() {
    let borrower = store.get(borrower_id);
    let Some(entries) = borrower.borrowed.clone() else {
      continue;
    };
    let Some(borrower_longname) = borrower.longname.clone() else {
      continue;
    };

    for entry in entries {
      let source_ids = store.by_longname(&entry.from);
      if source_ids.is_empty() {
        tracing::debug!(from = %entry.from, "borrow source is not documented; skipping");
        continue;
      }

      let borrowed_as = entry.as_.clone().unwrap_or_else(|| entry.from.clone());
      let borrowed_as = match borrowed_as.strip_prefix("prototype.") {
        Some(rest) => format!("{}{}", name::PUNC_INSTANCE, rest),
        None => borrowed_as,
      };

      for source_id in source_ids {
        let mut clone = store.get(source_id).clone();

        // `#` in the borrowed name marks an instance member; anything else
        // is borrowed as a static member.
        let (scope, scope_punc) = if borrowed_as.contains(name::PUNC_INSTANCE) {
          (Scope::Instance, name::PUNC_INSTANCE)
        } else {
          (Scope::Static, name::PUNC_STATIC)
        };
        let short_name = borrowed_as
          .rsplit(name::PUNC_INSTANCE)
          .next()
          .unwrap_or(&borrowed_as)
          .to_owned();

        clone.scope = Some(scope);
        clone.name = Some(short_name.clone());
        clone.memberof = Some(borrower_longname.clone());
        clone.longname = Some(format!("{}{}{}", borrower_longname, scope_punc, short_name));
        store.add(clone);
      }
    }

    store.get_mut(borrower_id).borrowed = None;
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
  fn borrowed_members_are_cloned_and_renamed() {
    let mut store = DocletStore::new();
    store.add(doclet(&[
      "@name method",
      "@function",
      "@memberof A#",
      "@param {number} n",
    ]));
    store.add(doclet(&["@name B", "@class", "@borrows A#method as alias"]));

    resolve_borrows(&mut store);

    let cloned = store.by_longname("B.alias");
    assert_eq!(cloned.len(), 1);
    let cloned = store.get(cloned[0]);
    assert_eq!(cloned.memberof.as_deref(), Some("B"));
    assert_eq!(cloned.name.as_deref(), Some("alias"));
    assert_eq!(cloned.params.as_ref().map(|p| p.len()), Some(1));

    // The borrow is consumed.
    let borrower = store.by_longname("B")[0];
    assert!(store.get(borrower).borrowed.is_none());
  }

  #[test]
  fn instance_borrows_keep_instance_scope() {
    let mut store = DocletStore::new();
    store.add(doclet(&["@name trim", "@function", "@memberof util"]));
    store.add(doclet(&["@name Str", "@class", "@borrows util.trim as #trim"]));

    resolve_borrows(&mut store);

    let cloned = store.by_longname("Str#trim");
    assert_eq!(cloned.len(), 1);
    assert_eq!(store.get(cloned[0]).scope, Some(Scope::Instance));
  }

  #[test]
  fn unresolvable_borrows_are_dropped_silently() {
    let mut store = DocletStore::new();
    store.add(doclet(&["@name B", "@class", "@borrows missing#thing as x"]));
    resolve_borrows(&mut store);
    assert!(store.by_longname("B.x").is_empty());
    assert_eq!(store.len(), 1);
  }
}
