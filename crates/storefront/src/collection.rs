//! Keyed lists and a persist-on-write list wrapper.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use bistro_core::{
    Category, CategoryId, ContactSubmission, Dish, DishId, GalleryImage, GalleryImageId,
    SubmissionId, Subscriber, SubscriberId, Testimonial, TestimonialId,
};

use crate::storage::{KeyValueStorage, Persistence, StorageError, read_json, write_json};

/// An entity with a stable identifier.
pub trait Identified {
    type Id: PartialEq;

    fn id(&self) -> &Self::Id;
}

macro_rules! identified {
    ($($ty:ty => $id:ty),* $(,)?) => {
        $(
            impl Identified for $ty {
                type Id = $id;

                fn id(&self) -> &Self::Id {
                    &self.id
                }
            }
        )*
    };
}

identified! {
    Dish => DishId,
    Category => CategoryId,
    GalleryImage => GalleryImageId,
    Testimonial => TestimonialId,
    Subscriber => SubscriberId,
    ContactSubmission => SubmissionId,
}

/// Find an item by ID.
pub fn find_by_id<'a, T: Identified>(items: &'a [T], id: &T::Id) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Append `item`, or replace the entry with the same ID in place.
pub fn upsert<T: Identified>(items: &mut Vec<T>, item: T) {
    if let Some(slot) = items.iter_mut().find(|existing| existing.id() == item.id()) {
        *slot = item;
    } else {
        items.push(item);
    }
}

/// Replace the entry with the same ID. Returns `false` if there is none.
pub fn replace<T: Identified>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => {
            *slot = item;
            true
        }
        None => false,
    }
}

/// Remove the entry with `id`, returning it.
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &T::Id) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}

/// A list stored as one JSON array under its own key, written after every
/// change.
///
/// Like the domain store, a failed write is logged and the in-memory list
/// keeps the change.
pub struct PersistedList<T> {
    key: &'static str,
    items: Vec<T>,
    storage: Arc<dyn KeyValueStorage>,
}

impl<T> PersistedList<T>
where
    T: Identified + Serialize + DeserializeOwned,
{
    /// Load the list stored under `key`.
    ///
    /// Missing, unavailable, or unreadable storage yields an empty list.
    pub fn load(storage: Arc<dyn KeyValueStorage>, key: &'static str) -> Self {
        let items = if storage.is_available() {
            match read_json::<Vec<T>>(storage.as_ref(), key) {
                Ok(items) => items.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(key, error = %e, "Discarding unreadable stored list");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Self {
            key,
            items,
            storage,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        find_by_id(&self.items, id)
    }

    /// Append an item and persist.
    pub fn push(&mut self, item: T) -> Persistence {
        self.items.push(item);
        self.persist()
    }

    /// Modify the item with `id` in place and persist.
    ///
    /// Returns `None` if no item has that ID.
    pub fn update(&mut self, id: &T::Id, f: impl FnOnce(&mut T)) -> Option<Persistence> {
        let item = self.items.iter_mut().find(|item| item.id() == id)?;
        f(item);
        Some(self.persist())
    }

    /// Remove the item with `id` and persist.
    ///
    /// Returns `None` if no item has that ID.
    pub fn remove(&mut self, id: &T::Id) -> Option<(T, Persistence)> {
        let removed = remove_by_id(&mut self.items, id)?;
        Some((removed, self.persist()))
    }

    fn persist(&self) -> Persistence {
        let result = if self.storage.is_available() {
            write_json(self.storage.as_ref(), self.key, &self.items)
        } else {
            Err(StorageError::Unavailable)
        };
        Persistence::from_result(self.key, result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, keys};
    use bistro_core::Price;

    fn testimonial(id: &str, quote: &str) -> Testimonial {
        Testimonial {
            id: TestimonialId::new(id),
            author: "Guest".to_string(),
            quote: quote.to_string(),
        }
    }

    #[test]
    fn test_upsert_replaces_existing_id() {
        let mut items = vec![testimonial("t1", "a"), testimonial("t2", "b")];
        upsert(&mut items, testimonial("t1", "changed"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quote, "changed");

        upsert(&mut items, testimonial("t3", "c"));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_replace_unknown_is_noop() {
        let mut items = vec![testimonial("t1", "a")];
        assert!(!replace(&mut items, testimonial("nope", "x")));
        assert_eq!(items, vec![testimonial("t1", "a")]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut dishes = vec![Dish {
            id: DishId::new("d1"),
            name: "Soup".into(),
            short_description: String::new(),
            description: String::new(),
            price: Price::from_cents(400),
            images: vec![],
            category_id: CategoryId::new("c1"),
            available: true,
            tags: Default::default(),
        }];
        assert!(remove_by_id(&mut dishes, &DishId::new("d2")).is_none());
        assert!(remove_by_id(&mut dishes, &DishId::new("d1")).is_some());
        assert!(dishes.is_empty());
    }

    #[test]
    fn test_persisted_list_writes_on_change_and_reloads() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        let mut list = PersistedList::<Testimonial>::load(storage.clone(), keys::TESTIMONIALS);
        assert!(list.items().is_empty());

        assert!(list.push(testimonial("t1", "great")).is_saved());
        list.update(&TestimonialId::new("t1"), |t| t.quote = "superb".into())
            .unwrap();

        let reloaded = PersistedList::<Testimonial>::load(storage, keys::TESTIMONIALS);
        assert_eq!(reloaded.items(), &[testimonial("t1", "superb")]);
    }

    #[test]
    fn test_persisted_list_keeps_memory_on_failure() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new().with_quota(2));
        let mut list = PersistedList::<Testimonial>::load(storage, keys::TESTIMONIALS);
        let outcome = list.push(testimonial("t1", "great"));
        assert!(matches!(outcome, Persistence::Failed(_)));
        assert_eq!(list.items().len(), 1);
    }

    #[test]
    fn test_persisted_list_discards_corrupt_data() {
        let memory = MemoryStorage::new();
        memory.set(keys::TESTIMONIALS, "{oops").unwrap();
        let list = PersistedList::<Testimonial>::load(Arc::new(memory), keys::TESTIMONIALS);
        assert!(list.items().is_empty());
    }
}
