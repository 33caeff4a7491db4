pub mod app_state;
pub(crate) mod lenient;
pub mod storage;

pub use app_state::AppState;
pub use storage::{FileStorage, MemoryStorage, Storage, STORAGE_KEY};

use crate::catalog::Catalog;
use crate::error::StorageError;
use tracing::{debug, warn};

/// Load the state record, falling back to a fresh state when it is absent,
/// unreadable or not a JSON object.
///
/// Never fails: every problem is logged and absorbed here.
pub fn load_state(storage: &dyn Storage, catalog: &Catalog) -> AppState {
    let raw = match storage.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("state: no stored record, starting fresh");
            return AppState::fresh(catalog);
        }
        Err(e) => {
            warn!("state: failed to read stored record, starting fresh: {}", e);
            return AppState::fresh(catalog);
        }
    };

    match serde_json::from_str::<AppState>(&raw) {
        Ok(mut state) => {
            if state.reconcile(catalog) {
                debug!("state: filled missing rule toggles from catalog defaults");
            }
            debug!(
                events = state.events.len(),
                risk_events = state.risk_events.len(),
                "state: loaded"
            );
            state
        }
        Err(e) => {
            warn!("state: stored record unparseable, starting fresh: {}", e);
            AppState::fresh(catalog)
        }
    }
}

/// Serialize the whole state and replace the stored record.
pub fn save_state(storage: &mut dyn Storage, state: &AppState) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(state)?;
    storage.write(&json)?;
    debug!(bytes = json.len(), "state: saved");
    Ok(())
}
