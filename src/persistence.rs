// src/persistence.rs
//
// Lokalny magazyn klucz-wartość: jeden plik JSON, w nim rekord sesji pod
// kluczem STORE_KEY. Zapis jest best-effort - po awarii w trakcie zapisu
// stan może być o jedną operację do tyłu i to jest akceptowalne.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{SessionStore, STORE_KEY};

pub const DEFAULT_STORE_FILE: &str = "dermabeauty-store.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile(BTreeMap<String, Value>);

/// Wczytuje rekord sesji z pliku stanu. Brak pliku to normalny pierwszy
/// start; uszkodzony plik logujemy i zaczynamy od pustego rekordu -
/// żadnego schematu migracji tu nie ma.
pub async fn load_store(path: &Path) -> SessionStore {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(
                "Brak pliku stanu {} - start z pustą sesją",
                path.display()
            );
            return SessionStore::default();
        }
        Err(e) => {
            tracing::warn!("Nie można odczytać pliku stanu {}: {}", path.display(), e);
            return SessionStore::default();
        }
    };

    let store_file: StoreFile = match serde_json::from_slice(&bytes) {
        Ok(store_file) => store_file,
        Err(e) => {
            tracing::warn!(
                "Plik stanu {} jest uszkodzony ({}), start z pustą sesją",
                path.display(),
                e
            );
            return SessionStore::default();
        }
    };

    match store_file.0.get(STORE_KEY) {
        Some(value) => match serde_json::from_value::<SessionStore>(value.clone()) {
            Ok(store) => {
                tracing::info!(
                    "Odtworzono sesję z {} ({} pozycji w koszyku)",
                    path.display(),
                    store.cart.len()
                );
                store
            }
            Err(e) => {
                tracing::warn!("Rekord '{}' nie pasuje do schematu: {}", STORE_KEY, e);
                SessionStore::default()
            }
        },
        None => SessionStore::default(),
    }
}

/// Zapisuje migawkę rekordu sesji. Błąd zapisu jest logowany i połykany -
/// sklep działa dalej na stanie w pamięci.
pub async fn persist_store(path: &Path, snapshot: &SessionStore) {
    let record = match serde_json::to_value(snapshot) {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("Nie można zserializować rekordu sesji: {}", e);
            return;
        }
    };

    let mut store_file = StoreFile::default();
    store_file.0.insert(STORE_KEY.to_string(), record);

    let bytes = match serde_json::to_vec_pretty(&store_file) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Nie można zserializować pliku stanu: {}", e);
            return;
        }
    };

    if let Err(e) = tokio::fs::write(path, bytes).await {
        tracing::error!("Nie można zapisać pliku stanu {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::{Role, Theme, User};
    use std::path::PathBuf;

    fn temp_store_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dermabeauty-store-test-{}-{}.json", tag, uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn round_trip_preserves_cart_order_and_quantities() {
        let path = temp_store_path("roundtrip");
        let catalog = Catalog::seed();

        let mut store = SessionStore::default();
        store.add_to_cart(catalog.product("supplements-1").unwrap(), 2);
        store.add_to_cart(catalog.product("skincare-1").unwrap(), 1);
        store.set_user(User {
            id: "user-7".to_string(),
            name: "Dist".to_string(),
            email: "dist@dermabeauty.com".to_string(),
            role: Role::Distributor,
            is_logged_in: true,
        });
        store.set_theme(Theme::Dark);
        store.set_locale("ar".to_string());

        persist_store(&path, &store).await;
        let rehydrated = load_store(&path).await;
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(rehydrated, store);
        let ids: Vec<&str> = rehydrated
            .cart
            .iter()
            .map(|item| item.product.id.as_str())
            .collect();
        assert_eq!(ids, vec!["supplements-1", "skincare-1"]);
        assert_eq!(rehydrated.cart[0].quantity, 2);
    }

    #[tokio::test]
    async fn missing_file_rehydrates_as_default() {
        let path = temp_store_path("missing");
        let store = load_store(&path).await;
        assert_eq!(store, SessionStore::default());
        assert_eq!(store.locale, "en");
    }

    #[tokio::test]
    async fn corrupt_file_rehydrates_as_default() {
        let path = temp_store_path("corrupt");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let store = load_store(&path).await;
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(store, SessionStore::default());
    }

    #[tokio::test]
    async fn file_without_our_key_rehydrates_as_default() {
        let path = temp_store_path("other-key");
        tokio::fs::write(&path, br#"{"some-other-app": {"x": 1}}"#)
            .await
            .unwrap();

        let store = load_store(&path).await;
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(store, SessionStore::default());
    }
}
