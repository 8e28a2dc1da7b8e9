// src/main.rs

use axum::{
    Router,
    routing::{get, patch, post},
};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Deklaracje modułów
mod catalog; // dla src/catalog.rs
mod errors; // dla src/errors.rs
mod filters; // dla src/filters.rs
mod handlers; // dla src/handlers.rs
mod htmx_handlers;
mod models; // dla src/models.rs
mod persistence; // dla src/persistence.rs
mod response; // dla src/response.rs
mod seo; // dla src/seo.rs
mod services; // dla src/services.rs
mod sitemap_generator;
mod state; // dla src/state.rs
mod store; // dla src/store.rs

// Importy z własnych modułów
use crate::catalog::CATALOG;
use crate::handlers::*;
use crate::htmx_handlers::*;
use crate::services::LoggingSubmissionSink;
use crate::sitemap_generator::generate_sitemap_handler;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Inicjalizacja systemu logowania (tracing)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dermabeauty_storefront=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Inicjalizacja serwera...");

    // --- Statyczny katalog produktów ---
    let catalog = &*CATALOG;
    tracing::info!(
        "Załadowano katalog: {} produktów, {} promocji",
        catalog.products.len(),
        catalog.promotions.len()
    );

    // --- Odtworzenie rekordu sesji z lokalnego pliku stanu ---
    let store_file = PathBuf::from(
        env::var("STORE_FILE").unwrap_or_else(|_| persistence::DEFAULT_STORE_FILE.to_string()),
    );
    let session_store = persistence::load_store(&store_file).await;

    // Definicja AppState
    let app_state = AppState {
        catalog,
        store: Arc::new(RwLock::new(session_store)),
        store_file: Arc::new(store_file),
        submission_sink: Arc::new(LoggingSubmissionSink),
    };

    // Definicja routingu aplikacji
    let app = Router::new()
        // Strony (pełne wejścia i nawigacja HTMX)
        .route("/", get(home_page))
        .route("/products", get(products_page))
        .route("/products/{id}", get(product_page))
        .route("/promotions", get(promotions_page))
        .route("/business", get(business_page))
        .route("/company", get(company_page))
        .route("/contact", get(contact_page))
        .route("/login", get(login_page))
        .route("/sitemap.xml", get(generate_sitemap_handler))
        // Fragmenty HTMX
        .route("/htmx/products", get(list_products_htmx_handler))
        .route("/htmx/cart/details", get(get_cart_details_htmx_handler))
        .route(
            "/htmx/cart/add/{product_id}",
            post(add_item_to_cart_htmx_handler),
        )
        .route(
            "/htmx/cart/update/{product_id}",
            post(update_cart_item_htmx_handler),
        )
        .route(
            "/htmx/cart/remove/{product_id}",
            post(remove_item_from_cart_htmx_handler),
        )
        .route("/htmx/cart/clear", post(clear_cart_htmx_handler))
        .route("/htmx/session/login", post(login_htmx_handler))
        .route("/htmx/session/logout", post(logout_htmx_handler))
        .route("/htmx/session/theme", post(toggle_theme_htmx_handler))
        .route("/htmx/session/locale", post(set_locale_htmx_handler))
        .route(
            "/htmx/business/apply",
            post(submit_distributor_application_htmx_handler),
        )
        .route("/htmx/contact/send", post(submit_contact_message_htmx_handler))
        // API JSON
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product_details))
        .route(
            "/api/cart",
            get(get_cart_handler).delete(clear_cart_handler),
        )
        .route("/api/cart/items", post(add_item_to_cart_handler))
        .route(
            "/api/cart/items/{product_id}",
            patch(update_cart_item_quantity_handler).delete(remove_item_from_cart_handler),
        )
        .route("/api/session/login", post(login_handler))
        .route("/api/session/logout", post(logout_handler))
        .route("/api/session/theme", post(set_theme_handler))
        .route("/api/session/locale", post(set_locale_handler))
        .route("/api/promotions", get(list_promotions_handler))
        .route(
            "/api/business/applications",
            post(submit_distributor_application_handler),
        )
        .route(
            "/api/contact/messages",
            post(submit_contact_message_handler),
        )
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Adres i port, na którym serwer będzie nasłuchiwał
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Serwer nasłuchuje na {}", addr);

    // Utworzenie listenera TCP
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Nie można powiązać adresu {}: {}", addr, e);
            return; // Zakończ, jeśli nie można uruchomić serwera
        }
    };

    // Uruchomienie serwera Axum
    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Błąd serwera: {}", e);
    }
}
