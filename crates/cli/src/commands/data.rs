//! Site state commands: init, export, import and reset.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use bistro_storefront::storage::{KeyValueStorage, Persistence, StorageError, keys};
use bistro_storefront::store::{Action, DomainStore, Hydration, SiteState, defaults};
use tracing::info;

use super::CommandError;

fn saved(persistence: Persistence) -> Result<(), CommandError> {
    match persistence {
        Persistence::Saved | Persistence::Unchanged => Ok(()),
        Persistence::Unavailable => Err(StorageError::Unavailable.into()),
        Persistence::Failed(e) => Err(e.into()),
    }
}

/// Load the stored state, failing on unreadable slices.
fn load(storage: Arc<dyn KeyValueStorage>) -> Result<DomainStore, CommandError> {
    let mut store = DomainStore::new(storage);
    match store.hydrate() {
        Hydration::Corrupt { key, error } => Err(CommandError::Corrupt { key, error }),
        Hydration::Unavailable => Err(StorageError::Unavailable.into()),
        _ => Ok(store),
    }
}

/// Write the built-in defaults.
///
/// # Errors
///
/// Refuses to overwrite stored state unless `force` is set.
pub fn init(storage: Arc<dyn KeyValueStorage>, force: bool) -> Result<(), CommandError> {
    let mut store = DomainStore::new(storage);
    let outcome = store.hydrate();
    if !force && matches!(outcome, Hydration::Restored { .. } | Hydration::Corrupt { .. }) {
        return Err(CommandError::AlreadyInitialized);
    }

    saved(store.dispatch(Action::SetState {
        state: Box::new(defaults::site_state()),
    }))?;
    info!(
        dishes = store.state().dishes.len(),
        categories = store.state().categories.len(),
        "Wrote default site state"
    );
    Ok(())
}

/// Write the stored state as pretty JSON to `output`, or stdout.
///
/// # Errors
///
/// Returns an error if a slice is unreadable or the output cannot be written.
pub fn export(
    storage: Arc<dyn KeyValueStorage>,
    output: Option<&Path>,
) -> Result<(), CommandError> {
    let store = load(storage)?;
    let json = serde_json::to_string_pretty(store.state())?;

    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!(path = %path.display(), "Exported site state");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

/// Replace the stored state with the document at `file`.
///
/// Sections missing from the document are stored empty.
///
/// # Errors
///
/// Returns an error if the file does not parse or the write fails.
pub fn import(storage: Arc<dyn KeyValueStorage>, file: &Path) -> Result<(), CommandError> {
    let raw = fs::read_to_string(file)?;
    let state: SiteState = serde_json::from_str(&raw)?;

    let mut store = DomainStore::new(storage);
    saved(store.dispatch(Action::SetState {
        state: Box::new(state),
    }))?;
    info!(
        path = %file.display(),
        dishes = store.state().dishes.len(),
        "Imported site state"
    );
    Ok(())
}

/// Delete the stored slices; with `all`, the guest lists too.
///
/// # Errors
///
/// Returns an error if a file cannot be removed.
pub fn reset(storage: &dyn KeyValueStorage, all: bool) -> Result<(), CommandError> {
    for key in keys::DOMAIN_SLICES {
        storage.remove(key)?;
    }
    if all {
        storage.remove(keys::SUBSCRIBERS)?;
        storage.remove(keys::CONTACT_SUBMISSIONS)?;
    }
    info!(all, "Reset site state");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::open_storage;

    #[test]
    fn test_init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_storage(dir.path());

        init(storage.clone(), false).unwrap();
        for key in keys::DOMAIN_SLICES {
            assert!(storage.get(key).unwrap().is_some(), "{key} missing");
        }

        assert!(matches!(
            init(storage.clone(), false),
            Err(CommandError::AlreadyInitialized)
        ));
        init(storage, true).unwrap();
    }

    #[test]
    fn test_export_import_roundtrip() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let file = source.path().join("export.json");

        init(open_storage(source.path()), false).unwrap();
        export(open_storage(source.path()), Some(&file)).unwrap();
        import(open_storage(target.path()), &file).unwrap();

        let restored = load(open_storage(target.path())).unwrap();
        assert_eq!(restored.state(), &defaults::site_state());
    }

    #[test]
    fn test_export_rejects_corrupt_slice() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_storage(dir.path());
        storage.set(keys::DISHES, "{not json").unwrap();

        let err = export(storage, Some(&dir.path().join("out.json"))).unwrap_err();
        assert!(matches!(err, CommandError::Corrupt { key, .. } if key == keys::DISHES));
    }

    #[test]
    fn test_import_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.json");
        fs::write(&file, "[1, 2").unwrap();

        assert!(matches!(
            import(open_storage(dir.path()), &file),
            Err(CommandError::Json(_))
        ));
    }

    #[test]
    fn test_reset_keeps_guest_lists_unless_all() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open_storage(dir.path());
        init(storage.clone(), false).unwrap();
        storage.set(keys::SUBSCRIBERS, "[]").unwrap();

        reset(storage.as_ref(), false).unwrap();
        assert!(storage.get(keys::DISHES).unwrap().is_none());
        assert!(storage.get(keys::SUBSCRIBERS).unwrap().is_some());

        reset(storage.as_ref(), true).unwrap();
        assert!(storage.get(keys::SUBSCRIBERS).unwrap().is_none());
    }
}
