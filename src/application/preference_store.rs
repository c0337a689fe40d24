use crate::domain::errors::StorageError;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::AssetId;
use crate::domain::preferences::{DisplayPreferences, DisplayToggle, PersistedState, SortMode, Theme};
use crate::domain::selection::{FavoriteSet, SelectionSet};
use crate::{log_debug, log_warn};
use strum::IntoEnumIterator;

pub const KEY_SELECTION: &str = "selectedCryptos";
pub const KEY_FAVORITES: &str = "favorites";
pub const KEY_SORT_BY: &str = "sortBy";
pub const KEY_THEME: &str = "theme";

const COMPONENT: LogComponent = LogComponent::Application("PreferenceStore");

/// String key-value backend (`localStorage` in the browser)
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<K: KeyValueStorage + ?Sized> KeyValueStorage for std::rc::Rc<K> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Maps [`PersistedState`] onto individual storage entries.
///
/// Each field decodes on its own: a missing or corrupt entry falls back to
/// its default without affecting the others.
pub struct PreferenceStore<K> {
    backend: K,
    max_comparison: usize,
}

impl<K: KeyValueStorage> PreferenceStore<K> {
    pub fn new(backend: K, max_comparison: usize) -> Self {
        Self { backend, max_comparison }
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    pub fn load(&self) -> PersistedState {
        let selection = SelectionSet::from_ids(self.load_id_list(KEY_SELECTION), self.max_comparison);
        let favorites = FavoriteSet::from_ids(self.load_id_list(KEY_FAVORITES));

        let mut preferences = DisplayPreferences::default();
        for toggle in DisplayToggle::iter() {
            let on = self.backend.get(toggle.storage_key()).is_some_and(|raw| raw == "true");
            preferences.set_toggle(toggle, on);
        }
        if let Some(raw) = self.backend.get(KEY_SORT_BY) {
            preferences.sort_by = SortMode::parse_lenient(&raw);
        }
        preferences.theme = self
            .backend
            .get(KEY_THEME)
            .and_then(|raw| raw.parse::<Theme>().ok())
            .unwrap_or_default();

        log_debug!(
            COMPONENT,
            "📂 Loaded preferences: {} selected, {} favorites, sort={}",
            selection.len(),
            favorites.len(),
            preferences.sort_by
        );
        PersistedState { selection, favorites, preferences }
    }

    /// Writes every field; keeps going past a failed key and reports the first failure.
    pub fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        let selection: Vec<&AssetId> = state.selection.iter().collect();
        let favorites: Vec<&AssetId> = state.favorites.iter().collect();
        let prefs = &state.preferences;

        let mut entries = vec![
            (KEY_SELECTION.to_string(), encode_list(&selection)),
            (KEY_FAVORITES.to_string(), encode_list(&favorites)),
            (KEY_SORT_BY.to_string(), prefs.sort_by.to_string()),
            (KEY_THEME.to_string(), prefs.theme.to_string()),
        ];
        for toggle in DisplayToggle::iter() {
            entries.push((toggle.storage_key().to_string(), prefs.toggle(toggle).to_string()));
        }

        let mut first_error = None;
        for (key, value) in entries {
            if let Err(err) = self.backend.set(&key, &value) {
                log_warn!(COMPONENT, "⚠️ {}", err);
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn load_id_list(&self, key: &str) -> Vec<AssetId> {
        let Some(raw) = self.backend.get(key) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<AssetId>>(&raw) {
            Ok(ids) => ids,
            Err(err) => {
                log_warn!(COMPONENT, "⚠️ Ignoring malformed '{}': {}", key, err);
                Vec::new()
            }
        }
    }
}

fn encode_list(ids: &[&AssetId]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}
