// src/handlers.rs
//
// Handlery API JSON. Każda operacja mutująca kończy się zapisem migawki
// rekordu sesji do lokalnego pliku stanu (best-effort).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::filters::{ListingParams, filter_products};
use crate::models::{
    AddToCartPayload, CartDetailsResponse, ContactMessagePayload, DistributorApplicationPayload,
    LoginPayload, Product, ProductListResponse, PromotionPublic, SetLocalePayload, SetThemePayload,
    SubmissionReceipt, UpdateQuantityPayload, User,
};
use crate::state::AppState;

// --- KATALOG ---

pub async fn list_products(
    State(app_state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ProductListResponse>, AppError> {
    tracing::info!(
        "Obsłużono zapytanie GET /api/products z parametrami: {:?}",
        params
    );

    let data = filter_products(&app_state.catalog.products, &params);
    Ok(Json(ProductListResponse {
        total_matches: data.len(),
        data,
    }))
}

pub async fn get_product_details(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, AppError> {
    match app_state.catalog.product(&product_id) {
        Some(product) => Ok(Json(product.clone())),
        None => {
            tracing::warn!("Nie znaleziono produktu o ID: {}", product_id);
            Err(AppError::NotFound)
        }
    }
}

// --- KOSZYK ---

pub async fn get_cart_handler(
    State(app_state): State<AppState>,
) -> Result<Json<CartDetailsResponse>, AppError> {
    Ok(Json(app_state.read_store().cart_details()))
}

pub async fn add_item_to_cart_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<AddToCartPayload>,
) -> Result<Json<CartDetailsResponse>, AppError> {
    tracing::info!(
        "Dodawanie do koszyka: {} (ilość: {:?})",
        payload.product_id,
        payload.quantity
    );

    let product = app_state
        .catalog
        .product(&payload.product_id)
        .cloned()
        .ok_or(AppError::NotFound)?;

    {
        let mut store = app_state.write_store();
        store.add_to_cart(&product, payload.quantity.unwrap_or(1));
    }
    app_state.persist().await;

    Ok(Json(app_state.read_store().cart_details()))
}

pub async fn update_cart_item_quantity_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
    Json(payload): Json<UpdateQuantityPayload>,
) -> Result<Json<CartDetailsResponse>, AppError> {
    tracing::info!(
        "Zmiana ilości w koszyku: {} -> {}",
        product_id,
        payload.quantity
    );

    {
        let mut store = app_state.write_store();
        store.update_quantity(&product_id, payload.quantity);
    }
    app_state.persist().await;

    Ok(Json(app_state.read_store().cart_details()))
}

pub async fn remove_item_from_cart_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<CartDetailsResponse>, AppError> {
    tracing::info!("Usuwanie z koszyka: {}", product_id);

    {
        let mut store = app_state.write_store();
        store.remove_from_cart(&product_id);
    }
    app_state.persist().await;

    Ok(Json(app_state.read_store().cart_details()))
}

pub async fn clear_cart_handler(
    State(app_state): State<AppState>,
) -> Result<Json<CartDetailsResponse>, AppError> {
    tracing::info!("Czyszczenie koszyka");

    {
        let mut store = app_state.write_store();
        store.clear_cart();
    }
    app_state.persist().await;

    Ok(Json(app_state.read_store().cart_details()))
}

// --- SESJA UŻYTKOWNIKA ---

// Logowanie jest demonstracyjne: ustawia użytkownika w rekordzie sesji,
// żeby ceny i widoczność dystrybutorskie zaczęły działać. Prawdziwego
// uwierzytelniania świadomie tu nie ma.
pub async fn login_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate()?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        email: payload.email,
        role: payload.role,
        is_logged_in: true,
    };
    tracing::info!("Logowanie użytkownika {} (rola: {})", user.name, user.role);

    {
        let mut store = app_state.write_store();
        store.set_user(user.clone());
    }
    app_state.persist().await;

    Ok(Json(user))
}

pub async fn logout_handler(State(app_state): State<AppState>) -> Result<StatusCode, AppError> {
    tracing::info!("Wylogowanie użytkownika");

    {
        let mut store = app_state.write_store();
        store.clear_user();
    }
    app_state.persist().await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_theme_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SetThemePayload>,
) -> Result<StatusCode, AppError> {
    {
        let mut store = app_state.write_store();
        store.set_theme(payload.theme);
    }
    app_state.persist().await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_locale_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SetLocalePayload>,
) -> Result<StatusCode, AppError> {
    {
        let mut store = app_state.write_store();
        store.set_locale(payload.locale);
    }
    app_state.persist().await;

    Ok(StatusCode::NO_CONTENT)
}

// --- PROMOCJE ---

pub async fn list_promotions_handler(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<PromotionPublic>>, AppError> {
    let now = Utc::now();
    let promotions = app_state
        .catalog
        .promotions
        .iter()
        .map(|promotion| PromotionPublic {
            promotion: promotion.clone(),
            time_left: promotion.time_left_label(now),
            expired: promotion.is_expired_at(now),
        })
        .collect();
    Ok(Json(promotions))
}

// --- FORMULARZE ---

pub async fn submit_distributor_application_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<DistributorApplicationPayload>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), AppError> {
    payload.validate()?;

    let submission_id = app_state.submission_sink.submit_application(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmissionReceipt { submission_id }),
    ))
}

pub async fn submit_contact_message_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ContactMessagePayload>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), AppError> {
    payload.validate()?;

    let submission_id = app_state
        .submission_sink
        .submit_contact_message(&payload)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmissionReceipt { submission_id }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;
    use crate::models::Role;
    use crate::services::LoggingSubmissionSink;
    use crate::store::SessionStore;
    use std::sync::{Arc, RwLock};

    fn test_state() -> AppState {
        let store_file = std::env::temp_dir().join(format!(
            "dermabeauty-handlers-test-{}.json",
            Uuid::new_v4()
        ));
        AppState {
            catalog: &*CATALOG,
            store: Arc::new(RwLock::new(SessionStore::default())),
            store_file: Arc::new(store_file),
            submission_sink: Arc::new(LoggingSubmissionSink),
        }
    }

    #[tokio::test]
    async fn cart_flow_add_update_remove() {
        let state = test_state();

        let Json(details) = add_item_to_cart_handler(
            State(state.clone()),
            Json(AddToCartPayload {
                product_id: "skincare-1".into(),
                quantity: Some(2),
            }),
        )
        .await
        .unwrap();
        assert_eq!(details.total_items, 2);
        assert_eq!(details.total_price, 2 * 8999);

        let Json(details) = update_cart_item_quantity_handler(
            State(state.clone()),
            Path("skincare-1".to_string()),
            Json(UpdateQuantityPayload { quantity: 5 }),
        )
        .await
        .unwrap();
        assert_eq!(details.total_items, 5);

        let Json(details) = remove_item_from_cart_handler(
            State(state.clone()),
            Path("skincare-1".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(details.total_items, 0);
        assert!(details.items.is_empty());

        let _ = tokio::fs::remove_file(state.store_file.as_ref()).await;
    }

    #[tokio::test]
    async fn add_of_unknown_product_is_not_found() {
        let state = test_state();
        let result = add_item_to_cart_handler(
            State(state.clone()),
            Json(AddToCartPayload {
                product_id: "missing".into(),
                quantity: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn login_switches_cart_totals_to_distributor_prices() {
        let state = test_state();

        add_item_to_cart_handler(
            State(state.clone()),
            Json(AddToCartPayload {
                product_id: "skincare-1".into(),
                quantity: Some(1),
            }),
        )
        .await
        .unwrap();

        login_handler(
            State(state.clone()),
            Json(LoginPayload {
                name: "Dist".into(),
                email: "dist@dermabeauty.com".into(),
                role: Role::Distributor,
            }),
        )
        .await
        .unwrap();

        let Json(details) = get_cart_handler(State(state.clone())).await.unwrap();
        assert_eq!(details.total_price, 6599);

        logout_handler(State(state.clone())).await.unwrap();
        let Json(details) = get_cart_handler(State(state.clone())).await.unwrap();
        assert_eq!(details.total_price, 8999);

        let _ = tokio::fs::remove_file(state.store_file.as_ref()).await;
    }

    #[tokio::test]
    async fn invalid_login_payload_is_rejected() {
        let state = test_state();
        let result = login_handler(
            State(state),
            Json(LoginPayload {
                name: "".into(),
                email: "broken".into(),
                role: Role::Customer,
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
