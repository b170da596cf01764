use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StoreError;

/// Identifier handed out by a [`Repository`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Id(u64);

impl Id {
    /// Placeholder carried by items that have not been stored yet
    pub const UNASSIGNED: Id = Id(0);

    pub(crate) fn new(raw: u64) -> Id {
        Id(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something a [`Repository`] can hold
pub trait Entity {
    /// Human readable kind used in error messages
    const KIND: &'static str;

    fn id(&self) -> Id;
    fn assign_id(&mut self, id: Id);
}

/// Where new items land in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    NewestFirst,
    InsertionOrder,
}

/// Ordered, in-memory list with unique ids
#[derive(Debug, Clone)]
pub struct Repository<T> {
    items: Vec<T>,
    ordering: Ordering,
    next_id: u64,
}

impl<T: Entity> Repository<T> {
    pub fn new(ordering: Ordering) -> Self {
        Self {
            items: Vec::new(),
            ordering,
            next_id: 1,
        }
    }

    /// Build a repository from items already in display order.
    /// Ids are assigned top to bottom, whatever the items carried.
    pub fn seeded(ordering: Ordering, items: Vec<T>) -> Self {
        let mut repo = Self::new(ordering);
        for mut item in items {
            let id = repo.allocate_id();
            item.assign_id(id);
            repo.items.push(item);
        }
        repo
    }

    fn allocate_id(&mut self) -> Id {
        let id = Id(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn create(&mut self, mut item: T) -> &T {
        let id = self.allocate_id();
        item.assign_id(id);
        match self.ordering {
            Ordering::NewestFirst => {
                self.items.insert(0, item);
                &self.items[0]
            }
            Ordering::InsertionOrder => {
                self.items.push(item);
                &self.items[self.items.len() - 1]
            }
        }
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// In-place access to every item. Callers must leave ids alone.
    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn get_mut(&mut self, id: Id) -> Result<&mut T, StoreError> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(StoreError::NotFound {
                entity: T::KIND,
                id,
            })
    }

    /// Apply `f` to the item with `id`
    pub fn update<F>(&mut self, id: Id, f: F) -> Result<&T, StoreError>
    where
        F: FnOnce(&mut T),
    {
        let item = self.get_mut(id)?;
        f(item);
        Ok(item)
    }

    /// Flip the boolean selected by `field` and return its new value
    pub fn toggle<F>(&mut self, id: Id, field: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut T) -> &mut bool,
    {
        let item = self.get_mut(id)?;
        let flag = field(item);
        *flag = !*flag;
        Ok(*flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Id,
        text: &'static str,
        pinned: bool,
    }

    impl Note {
        fn new(text: &'static str) -> Self {
            Self {
                id: Id::UNASSIGNED,
                text,
                pinned: false,
            }
        }
    }

    impl Entity for Note {
        const KIND: &'static str = "note";

        fn id(&self) -> Id {
            self.id
        }

        fn assign_id(&mut self, id: Id) {
            self.id = id;
        }
    }

    #[test]
    fn newest_first_prepends() {
        let mut repo = Repository::new(Ordering::NewestFirst);
        repo.create(Note::new("a"));
        repo.create(Note::new("b"));

        let texts: Vec<_> = repo.iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["b", "a"]);
    }

    #[test]
    fn insertion_order_appends() {
        let mut repo = Repository::new(Ordering::InsertionOrder);
        repo.create(Note::new("a"));
        repo.create(Note::new("b"));

        let texts: Vec<_> = repo.iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn ids_are_unique_after_seeding() {
        let mut repo = Repository::seeded(
            Ordering::NewestFirst,
            vec![Note::new("x"), Note::new("y")],
        );
        let created = repo.create(Note::new("z")).id();

        let mut ids: Vec<_> = repo.iter().map(|n| n.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&Id::UNASSIGNED));
        assert_eq!(repo.list()[0].id(), created);
    }

    #[test]
    fn update_and_toggle_by_id() {
        let mut repo = Repository::seeded(Ordering::InsertionOrder, vec![Note::new("x")]);
        let id = repo.list()[0].id();

        repo.update(id, |n| n.text = "edited").unwrap();
        assert_eq!(repo.get(id).unwrap().text, "edited");

        assert_eq!(repo.toggle(id, |n| &mut n.pinned), Ok(true));
        assert_eq!(repo.toggle(id, |n| &mut n.pinned), Ok(false));
    }

    #[test]
    fn iter_mut_edits_in_place_and_keeps_order() {
        let mut repo = Repository::seeded(
            Ordering::NewestFirst,
            vec![Note::new("x"), Note::new("y")],
        );
        for note in repo.iter_mut() {
            note.pinned = true;
        }
        let seen: Vec<_> = repo.iter().map(|n| (n.text, n.pinned)).collect();
        assert_eq!(seen, vec![("x", true), ("y", true)]);
    }

    #[test]
    fn missing_id_is_not_found() {
        let mut repo: Repository<Note> = Repository::new(Ordering::NewestFirst);
        let err = repo.update(Id(42), |_| {}).unwrap_err();
        assert_matches!(err, StoreError::NotFound { entity: "note", .. });
        assert!(err.is_not_found());
        assert!(repo.get(Id(42)).is_none());
    }
}
