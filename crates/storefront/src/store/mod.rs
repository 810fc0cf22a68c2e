//! Persistent domain store.
//!
//! [`DomainStore`] owns the [`SiteState`] aggregate. [`DomainStore::dispatch`]
//! is the single mutation entry point: it reduces the action into a new
//! state and then writes all six slices to storage, one key per slice.
//!
//! # Persistence failures
//!
//! A failed write is logged and reported as [`Persistence::Failed`], but the
//! in-memory change stays. Memory and storage may therefore diverge until
//! the next successful write.
//!
//! # Hydration
//!
//! [`DomainStore::hydrate`] loads the persisted slices once, at startup. It
//! only runs when the storage reports itself available, merges whatever
//! slices are present over the built-in defaults, and discards the whole
//! batch if any slice fails to parse.

mod action;
pub mod defaults;
mod reducer;
mod site;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::instrument;

pub use action::Action;
pub use reducer::reduce;
pub use site::SiteState;

use crate::storage::{KeyValueStorage, Persistence, StorageError, keys, read_json, write_json};

/// What [`DomainStore::hydrate`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// Hydration already ran for this store.
    AlreadyHydrated,
    /// Storage is not available; the store keeps its current state.
    Unavailable,
    /// No slice was stored; the built-in defaults were loaded.
    Defaults,
    /// The listed slices were restored over the defaults.
    Restored { slices: Vec<&'static str> },
    /// A slice could not be read or parsed; the defaults were loaded.
    Corrupt { key: &'static str, error: String },
}

/// Single-writer state container mirrored to key-value storage.
pub struct DomainStore {
    state: SiteState,
    storage: Arc<dyn KeyValueStorage>,
    hydrated: bool,
}

impl std::fmt::Debug for DomainStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainStore")
            .field("dishes", &self.state.dishes.len())
            .field("categories", &self.state.categories.len())
            .field("hydrated", &self.hydrated)
            .finish_non_exhaustive()
    }
}

impl DomainStore {
    /// Create a store holding the built-in defaults. Nothing is read until
    /// [`hydrate`](Self::hydrate) is called.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_state(storage, defaults::site_state())
    }

    /// Create a store holding `state`.
    #[must_use]
    pub fn with_state(storage: Arc<dyn KeyValueStorage>, state: SiteState) -> Self {
        Self {
            state,
            storage,
            hydrated: false,
        }
    }

    /// The current aggregate state.
    #[must_use]
    pub const fn state(&self) -> &SiteState {
        &self.state
    }

    /// Whether [`hydrate`](Self::hydrate) has run.
    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Apply `action` and persist the six slices.
    ///
    /// [`Action::Unknown`] leaves the state untouched and writes nothing.
    #[instrument(skip_all, fields(action = action.kind()))]
    pub fn dispatch(&mut self, action: Action) -> Persistence {
        if matches!(action, Action::Unknown) {
            tracing::debug!("Ignoring unknown action");
            return Persistence::Unchanged;
        }

        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, action);
        self.persist()
    }

    /// Load persisted slices. Runs at most once per store and never writes.
    #[instrument(skip(self))]
    pub fn hydrate(&mut self) -> Hydration {
        if self.hydrated {
            return Hydration::AlreadyHydrated;
        }
        self.hydrated = true;

        if !self.storage.is_available() {
            tracing::info!("Storage unavailable, skipping hydration");
            return Hydration::Unavailable;
        }

        let outcome = match self.load_slices() {
            Ok((state, slices)) if slices.is_empty() => {
                self.state = state;
                Hydration::Defaults
            }
            Ok((state, slices)) => {
                self.state = state;
                Hydration::Restored { slices }
            }
            Err((key, e)) => {
                tracing::warn!(key, error = %e, "Stored state is unreadable, loading defaults");
                self.state = defaults::site_state();
                Hydration::Corrupt {
                    key,
                    error: e.to_string(),
                }
            }
        };

        tracing::info!(outcome = ?outcome, "Hydrated domain store");
        outcome
    }

    /// Read every present slice over the defaults.
    fn load_slices(&self) -> Result<(SiteState, Vec<&'static str>), (&'static str, StorageError)> {
        let storage = self.storage.as_ref();
        let mut state = defaults::site_state();
        let mut slices = Vec::new();

        if let Some(content) = read_slice(storage, keys::SITE_CONTENT, &mut slices)? {
            state.site_content = content;
        }
        if let Some(dishes) = read_slice(storage, keys::DISHES, &mut slices)? {
            state.dishes = dishes;
        }
        if let Some(categories) = read_slice(storage, keys::CATEGORIES, &mut slices)? {
            state.categories = categories;
        }
        if let Some(gallery) = read_slice(storage, keys::GALLERY, &mut slices)? {
            state.gallery = gallery;
        }
        if let Some(testimonials) = read_slice(storage, keys::TESTIMONIALS, &mut slices)? {
            state.testimonials = testimonials;
        }
        if let Some(design) = read_slice(storage, keys::DESIGN, &mut slices)? {
            state.design = design;
        }

        Ok((state, slices))
    }

    fn persist(&self) -> Persistence {
        if !self.storage.is_available() {
            return Persistence::Unavailable;
        }
        Persistence::from_result("domain state", self.write_slices())
    }

    fn write_slices(&self) -> Result<(), StorageError> {
        let storage = self.storage.as_ref();
        let state = &self.state;
        write_json(storage, keys::SITE_CONTENT, &state.site_content)?;
        write_json(storage, keys::DISHES, &state.dishes)?;
        write_json(storage, keys::CATEGORIES, &state.categories)?;
        write_json(storage, keys::GALLERY, &state.gallery)?;
        write_json(storage, keys::TESTIMONIALS, &state.testimonials)?;
        write_json(storage, keys::DESIGN, &state.design)
    }
}

fn read_slice<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &'static str,
    present: &mut Vec<&'static str>,
) -> Result<Option<T>, (&'static str, StorageError)> {
    let value = read_json(storage, key).map_err(|e| (key, e))?;
    if value.is_some() {
        present.push(key);
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bistro_core::{CategoryId, DishId, Price, Testimonial, TestimonialId};

    use super::*;
    use crate::storage::MemoryStorage;

    fn memory() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_dispatch_persists_all_slices() {
        let storage = memory();
        let mut store = DomainStore::new(storage.clone());
        let outcome = store.dispatch(Action::DeleteDish {
            id: DishId::new("dish-1"),
        });
        assert!(matches!(outcome, Persistence::Saved));
        for key in keys::DOMAIN_SLICES {
            assert!(storage.get(key).unwrap().is_some(), "{key} was not written");
        }
    }

    #[test]
    fn test_unknown_action_writes_nothing() {
        let storage = memory();
        let mut store = DomainStore::new(storage.clone());
        let before = store.state().clone();
        assert!(matches!(
            store.dispatch(Action::Unknown),
            Persistence::Unchanged
        ));
        assert_eq!(store.state(), &before);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_round_trip_through_storage() {
        let storage = memory();
        let mut store = DomainStore::new(storage.clone());
        let mut dish = store.state().dish(&DishId::new("dish-3")).unwrap().clone();
        dish.price = Price::from_cents(2100);
        dish.available = false;
        let _ = store.dispatch(Action::UpdateDish { dish });
        let _ = store.dispatch(Action::AddTestimonial {
            testimonial: Testimonial {
                id: TestimonialId::new("t-new"),
                author: "Lena".into(),
                quote: "Great tart".into(),
            },
        });
        let _ = store.dispatch(Action::DeleteCategory {
            id: CategoryId::new("cat-drinks"),
        });

        let mut fresh = DomainStore::with_state(storage, SiteState::default());
        let outcome = fresh.hydrate();
        assert!(matches!(outcome, Hydration::Restored { ref slices } if slices.len() == 6));
        assert_eq!(fresh.state(), store.state());
    }

    #[test]
    fn test_hydrate_without_keys_loads_defaults() {
        let mut store = DomainStore::with_state(memory(), SiteState::default());
        assert_eq!(store.hydrate(), Hydration::Defaults);
        assert_eq!(store.state(), &defaults::site_state());
    }

    #[test]
    fn test_hydrate_merges_partial_slices_over_defaults() {
        let storage = memory();
        storage.set(keys::TESTIMONIALS, "[]").unwrap();
        let mut store = DomainStore::new(storage);
        assert_eq!(
            store.hydrate(),
            Hydration::Restored {
                slices: vec![keys::TESTIMONIALS]
            }
        );
        assert!(store.state().testimonials.is_empty());
        assert_eq!(store.state().dishes, defaults::site_state().dishes);
    }

    #[test]
    fn test_hydrate_with_corrupt_slice_falls_back_to_defaults() {
        let storage = memory();
        storage.set(keys::TESTIMONIALS, "[]").unwrap();
        storage.set(keys::DISHES, r#"[{"id":"x"}]"#).unwrap();
        let mut store = DomainStore::with_state(storage.clone(), SiteState::default());

        let outcome = store.hydrate();
        assert!(matches!(outcome, Hydration::Corrupt { key, .. } if key == keys::DISHES));
        assert_eq!(store.state(), &defaults::site_state());
        // Hydration never writes back.
        assert_eq!(storage.get(keys::DISHES).unwrap().as_deref(), Some(r#"[{"id":"x"}]"#));
    }

    #[test]
    fn test_hydrate_runs_once() {
        let storage = memory();
        let mut store = DomainStore::new(storage.clone());
        assert_eq!(store.hydrate(), Hydration::Defaults);
        storage.set(keys::GALLERY, "[]").unwrap();
        assert_eq!(store.hydrate(), Hydration::AlreadyHydrated);
        assert!(!store.state().gallery.is_empty());
    }

    #[test]
    fn test_hydrate_skipped_when_storage_unavailable() {
        let mut store = DomainStore::new(Arc::new(MemoryStorage::unavailable()));
        assert_eq!(store.hydrate(), Hydration::Unavailable);
        assert!(store.is_hydrated());
        assert!(matches!(
            store.dispatch(Action::DeleteDish {
                id: DishId::new("dish-1")
            }),
            Persistence::Unavailable
        ));
        assert!(store.state().dish(&DishId::new("dish-1")).is_none());
    }

    #[test]
    fn test_failed_write_keeps_in_memory_change() {
        let mut store = DomainStore::new(Arc::new(MemoryStorage::new().with_quota(64)));
        let outcome = store.dispatch(Action::DeleteDish {
            id: DishId::new("dish-2"),
        });
        assert!(matches!(outcome, Persistence::Failed(StorageError::QuotaExceeded { .. })));
        assert!(outcome.warning().is_some());
        assert!(store.state().dish(&DishId::new("dish-2")).is_none());
    }
}
