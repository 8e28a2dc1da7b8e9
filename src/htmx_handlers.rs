// src/htmx_handlers.rs
//
// Strony i fragmenty Maud. Handlery stron obsługują i pełne wejścia
// (F5, link z zewnątrz), i nawigację HTMX - rozstrzyga build_response.
// Fragmenty koszyka i siatki produktów mają osobne endpointy, bo celują
// w mniejsze elementy niż #content.

use axum::extract::{Path, Query, State};
use axum::Form;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use chrono::Utc;
use maud::{Markup, PreEscaped, html};
use strum::IntoEnumIterator;
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;
use crate::filters::{DEFAULT_PRICE_MAX, DEFAULT_PRICE_MIN, ListingParams, SortKey, filter_products};
use crate::models::{
    Category, ContactMessagePayload, DistributorApplicationPayload, LoginPayload, Product, Theme,
    User,
};
use crate::response::{AppResponse, build_response};
use crate::seo::{SchemaBreadcrumbList, SchemaOrganization, SchemaProduct};
use crate::state::AppState;
use crate::store::SessionStore;

// --- FUNKCJE POMOCNICZE ---

fn format_price(price: i64) -> String {
    format!("${:.2}", (price as f64) / 100.0)
}

/// Odtwarza query string z aktywnych filtrów - do linków paginacji
/// historii i powrotów. Wartości domyślne są pomijane.
fn build_filter_query_string(params: &ListingParams) -> String {
    let mut query_parts = Vec::new();
    if let Some(s) = params.search() {
        query_parts.push(format!("search={}", urlencoding::encode(s)));
    }
    if let Some(category) = params.category() {
        query_parts.push(format!("category={}", category));
    }
    if let Some(brand) = params.brand() {
        query_parts.push(format!("brand={}", urlencoding::encode(brand)));
    }
    if params.price_min() != DEFAULT_PRICE_MIN {
        query_parts.push(format!("price_min={}", params.price_min()));
    }
    if params.price_max() != DEFAULT_PRICE_MAX {
        query_parts.push(format!("price_max={}", params.price_max()));
    }
    if params.distributor_only() {
        query_parts.push("distributor_only=true".to_string());
    }
    if params.sort_by() != SortKey::Popularity {
        query_parts.push(format!("sort_by={}", params.sort_by()));
    }
    query_parts.join("&")
}

fn json_ld_script<T: serde::Serialize>(schema: &T) -> Markup {
    match serde_json::to_string(schema) {
        Ok(json) => html! {
            script type="application/ld+json" { (PreEscaped(json)) }
        },
        Err(e) => {
            tracing::warn!("Nie można zserializować JSON-LD: {}", e);
            html! {}
        }
    }
}

fn render_star_rating(rating: f32, reviews: u32) -> Markup {
    let filled = rating.floor() as u32;
    html! {
        div ."flex items-center" {
            @for i in 0..5u32 {
                @if i < filled {
                    span ."text-yellow-400" { "★" }
                } @else {
                    span ."text-gray-300 dark:text-gray-600" { "☆" }
                }
            }
            span ."ml-2 text-sm text-gray-500 dark:text-gray-400" { "(" (reviews) ")" }
        }
    }
}

/// Nagłówek HX-Trigger po każdej operacji na koszyku - badge w headerze
/// i sumy w panelu aktualizuje Alpine po stronie klienta.
fn cart_trigger_headers(store: &SessionStore) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let trigger_payload = serde_json::json!({
        "updateCartCount": {
            "newCount": store.cart_item_count(),
            "newCartTotalPrice": store.cart_total(),
        }
    });
    if let Ok(trigger_value) = HeaderValue::from_str(&trigger_payload.to_string()) {
        headers.insert("HX-Trigger", trigger_value);
    } else {
        tracing::error!("Nie można utworzyć nagłówka HX-Trigger dla koszyka");
    }
    headers
}

fn render_form_errors(errors: &ValidationErrors) -> Markup {
    html! {
        div ."rounded-lg border border-red-200 bg-red-50 dark:bg-red-950/30 p-4 text-sm text-red-700 dark:text-red-400" {
            p ."font-semibold mb-1" { "Please correct the following:" }
            ul ."list-disc list-inside space-y-0.5" {
                @for (field, field_errors) in errors.field_errors() {
                    @for error in field_errors.iter() {
                        @let message = error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Field '{}' is invalid", field));
                        li { (message) }
                    }
                }
            }
        }
    }
}

// --- KARTY I SIATKA PRODUKTÓW ---

fn render_product_card(product: &Product, store: &SessionStore) -> Markup {
    let unit_price = store.unit_price(product);
    let has_distributor_price = store.is_distributor() && product.distributor_price.is_some();

    html! {
        div ."group rounded-2xl border bg-white dark:bg-gray-900 dark:border-gray-800 shadow-sm hover:shadow-lg transition-all duration-300 overflow-hidden flex flex-col" {
            a
                href=(format!("/products/{}", product.id))
                "hx-get"=(format!("/products/{}", product.id))
                "hx-target"="#content"
                "hx-swap"="innerHTML"
                "hx-push-url"=(format!("/products/{}", product.id))
                class="block relative aspect-square overflow-hidden"
            {
                @if let Some(image) = product.images.first() {
                    img src=(image) alt=(product.name)
                        class="w-full h-full object-cover group-hover:scale-105 transition-transform duration-300"
                        loading="lazy";
                } @else {
                    div ."w-full h-full bg-gray-100 dark:bg-gray-800 flex items-center justify-center text-sm text-gray-400" {
                        "No image"
                    }
                }
                div ."absolute top-3 left-3 flex flex-wrap gap-1" {
                    @if has_distributor_price {
                        span ."px-2 py-0.5 text-xs font-semibold rounded-full bg-blue-600 text-white" {
                            "Distributor Price"
                        }
                    }
                    @if product.is_distributor_only {
                        span ."px-2 py-0.5 text-xs font-semibold rounded-full bg-gray-200 text-gray-700" {
                            "Distributor Only"
                        }
                    }
                }
            }
            div ."p-5 flex flex-col flex-grow" {
                p ."text-sm text-gray-500 dark:text-gray-400 font-medium" { (product.brand) }
                h3 ."text-lg font-semibold text-gray-900 dark:text-gray-100 mb-2" { (product.name) }
                (render_star_rating(product.rating, product.reviews))
                div ."flex items-center justify-between mt-auto pt-4" {
                    div {
                        span ."text-xl font-bold text-gray-900 dark:text-white" { (format_price(unit_price)) }
                        @if has_distributor_price {
                            span ."ml-2 text-sm text-gray-400 line-through" { (format_price(product.price)) }
                        }
                    }
                    button
                        "hx-post"=(format!("/htmx/cart/add/{}", product.id))
                        "hx-swap"="none"
                        class="bg-gradient-to-r from-blue-600 to-purple-600 hover:from-blue-700 hover:to-purple-700 text-white text-sm font-medium py-2 px-4 rounded-lg transition-colors cursor-pointer transform active:scale-95"
                        title=(format!("Add {} to cart", product.name))
                    {
                        "Add to Cart"
                    }
                }
            }
        }
    }
}

fn render_product_grid(products: &[Product], store: &SessionStore) -> Markup {
    html! {
        div #products-grid-container {
            p ."text-sm text-gray-500 dark:text-gray-400 mb-4" {
                // Pusty wynik jest jawnie raportowany jako zero trafień.
                (products.len()) " products found"
            }
            @if products.is_empty() {
                div ."text-center py-12" {
                    p ."text-lg text-gray-500 dark:text-gray-400" {
                        "No products found matching your criteria."
                    }
                }
            } @else {
                div ."grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6" {
                    @for product in products {
                        (render_product_card(product, store))
                    }
                }
            }
        }
    }
}

/// Fragment siatki dla HTMX - każda zmiana filtra przelicza wynik od zera
/// z pełnego, statycznego katalogu. Adres w pasku przeglądarki dostaje
/// aktualny stan filtrów przez HX-Push-Url.
pub async fn list_products_htmx_handler(
    State(app_state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<(HeaderMap, Markup), AppError> {
    tracing::info!("MAUD: /htmx/products z parametrami: {:?}", params);

    let products = filter_products(&app_state.catalog.products, &params);

    let mut headers = HeaderMap::new();
    let query_string = build_filter_query_string(&params);
    let push_url = if query_string.is_empty() {
        "/products".to_string()
    } else {
        format!("/products?{}", query_string)
    };
    if let Ok(push_value) = HeaderValue::from_str(&push_url) {
        headers.insert("HX-Push-Url", push_value);
    }

    let store = app_state.read_store();
    Ok((headers, render_product_grid(&products, &store)))
}

// --- STRONA PRODUKTÓW ---

fn render_filter_sidebar(params: &ListingParams, store: &SessionStore, catalog_brands: &[&str]) -> Markup {
    html! {
        div ."rounded-2xl border bg-white dark:bg-gray-900 dark:border-gray-800 p-6 lg:sticky lg:top-24" {
            form
                "hx-get"="/htmx/products"
                "hx-target"="#products-grid-container"
                "hx-swap"="outerHTML"
                "hx-trigger"="change, input delay:300ms from:find input[name='search'], submit"
            {
                div ."flex items-center justify-between mb-6" {
                    h3 ."text-lg font-semibold" { "Filters" }
                    a href="/products"
                        "hx-get"="/products" "hx-target"="#content" "hx-push-url"="/products"
                        class="text-sm text-blue-600 hover:text-blue-800 hover:underline" {
                        "Clear Filters"
                    }
                }

                div ."mb-6" {
                    input type="search" name="search" placeholder="Search products..."
                        value=(params.search().unwrap_or(""))
                        class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                }

                div ."mb-6" {
                    label ."text-sm font-medium mb-2 block" { "Category" }
                    select name="category" class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm" {
                        option value="all" selected[params.category().is_none()] { "All Categories" }
                        @for category in Category::iter() {
                            option value=(category) selected[params.category() == Some(category)] {
                                (category.label())
                            }
                        }
                    }
                }

                div ."mb-6" {
                    label ."text-sm font-medium mb-2 block" { "Brand" }
                    select name="brand" class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm" {
                        option value="all" selected[params.brand().is_none()] { "All Brands" }
                        @for brand in catalog_brands {
                            option value=(brand) selected[params.brand() == Some(*brand)] { (brand) }
                        }
                    }
                }

                div ."mb-6" "x-data"=(format!("{{ min: {}, max: {} }}", params.price_min(), params.price_max())) {
                    label ."text-sm font-medium mb-2 block" {
                        "Price Range: "
                        span "x-text"="'$' + (min / 100) + ' - $' + (max / 100)" {}
                    }
                    input type="range" name="price_min" min="0" max=(DEFAULT_PRICE_MAX) step="1000"
                        value=(params.price_min()) "x-model"="min" class="w-full";
                    input type="range" name="price_max" min="0" max=(DEFAULT_PRICE_MAX) step="1000"
                        value=(params.price_max()) "x-model"="max" class="w-full";
                }

                @if store.is_distributor() {
                    div ."mb-6 flex items-center gap-2" {
                        input type="checkbox" name="distributor_only" value="true"
                            checked[params.distributor_only()]
                            class="rounded border-gray-300";
                        label ."text-sm font-medium" { "Distributor Only" }
                    }
                }

                div ."mb-2" {
                    label ."text-sm font-medium mb-2 block" { "Sort By" }
                    select name="sort_by" class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm" {
                        @for key in SortKey::iter() {
                            option value=(key) selected[params.sort_by() == key] { (key.label()) }
                        }
                    }
                }
            }
        }
    }
}

pub async fn products_page(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListingParams>,
) -> Result<AppResponse, AppError> {
    tracing::info!("MAUD: /products z parametrami: {:?}", params);

    let products = filter_products(&app_state.catalog.products, &params);
    let brands = app_state.catalog.brands();
    let markup = {
        let store = app_state.read_store();
        html! {
            section ."py-16 bg-gradient-to-r from-blue-50 to-purple-50 dark:from-blue-950/20 dark:to-purple-950/20" {
                div ."container mx-auto px-4 text-center" {
                    h1 ."text-4xl md:text-5xl font-bold mb-4" { "Our Products" }
                    p ."text-lg text-gray-600 dark:text-gray-300 max-w-2xl mx-auto" {
                        "Discover our complete range of premium beauty products and professional treatments."
                    }
                }
            }
            div ."container mx-auto px-4 py-8" {
                div ."flex flex-col lg:flex-row gap-8" {
                    div ."lg:w-80 shrink-0" {
                        (render_filter_sidebar(&params, &store, &brands))
                    }
                    div ."flex-1" {
                        (render_product_grid(&products, &store))
                    }
                }
            }
        }
    };

    build_response(&app_state, headers, markup).await
}

// --- SZCZEGÓŁY PRODUKTU ---

pub async fn product_page(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Result<AppResponse, AppError> {
    tracing::info!("MAUD: /products/{}", product_id);

    let Some(product) = app_state.catalog.product(&product_id) else {
        tracing::warn!("MAUD: Nie znaleziono produktu o ID: {}", product_id);
        return Err(AppError::NotFound);
    };

    let markup = {
        let store = app_state.read_store();
        let unit_price = store.unit_price(product);
        let has_distributor_price = store.is_distributor() && product.distributor_price.is_some();

        html! {
            (json_ld_script(&SchemaProduct::from_product(product)))
            (json_ld_script(&SchemaBreadcrumbList::for_product(product)))

            div ."container mx-auto px-4 py-10" {
                div ."grid grid-cols-1 md:grid-cols-2 gap-8 lg:gap-12" {
                    // --- Kolumna z obrazkami ---
                    div ."space-y-4" "x-data"=(format!(
                        "{{ mainImage: {} }}",
                        serde_json::to_string(product.images.first().map(String::as_str).unwrap_or(""))
                            .unwrap_or_else(|_| String::from("\"\""))
                    )) {
                        div ."aspect-square rounded-2xl overflow-hidden border dark:border-gray-800 bg-gray-50 dark:bg-gray-900" {
                            img "x-bind:src"="mainImage" alt=(product.name)
                                class="w-full h-full object-cover" loading="lazy";
                        }
                        @if product.images.len() > 1 {
                            div ."grid grid-cols-4 gap-2" {
                                @for (index, image_url) in product.images.iter().enumerate() {
                                    @let click_action = format!("mainImage = {}", serde_json::to_string(image_url).unwrap_or_default());
                                    button type="button" "@click"=(click_action)
                                        class="aspect-square rounded-lg overflow-hidden border-2 border-gray-200 hover:border-blue-500 transition-colors"
                                        aria-label=(format!("Show image {}", index + 1)) {
                                        img src=(image_url) alt=(format!("{} thumbnail {}", product.name, index + 1))
                                            class="w-full h-full object-cover" loading="lazy";
                                    }
                                }
                            }
                        }
                    }
                    // --- Kolumna z informacjami o produkcie ---
                    div ."flex flex-col" {
                        p ."text-sm font-medium text-gray-500 dark:text-gray-400" { (product.brand) }
                        h1 ."text-3xl lg:text-4xl font-bold tracking-tight text-gray-900 dark:text-white mb-3" {
                            (product.name)
                        }
                        (render_star_rating(product.rating, product.reviews))

                        div ."my-5" {
                            span ."text-3xl font-semibold text-blue-600" { (format_price(unit_price)) }
                            @if has_distributor_price {
                                span ."ml-3 text-lg text-gray-400 line-through" { (format_price(product.price)) }
                                span ."ml-2 px-2 py-0.5 text-xs font-semibold rounded-full bg-blue-600 text-white align-middle" {
                                    "Distributor Price"
                                }
                            }
                        }

                        p ."text-gray-600 dark:text-gray-300 mb-6" { (product.description) }

                        div ."flex flex-wrap gap-2 mb-6" {
                            @for tag in &product.tags {
                                span ."px-2 py-1 text-xs rounded-full bg-gray-100 dark:bg-gray-800 text-gray-600 dark:text-gray-300" {
                                    (tag)
                                }
                            }
                        }

                        div ."text-sm text-gray-500 dark:text-gray-400 mb-6 space-y-1" {
                            p { strong ."font-medium text-gray-900 dark:text-gray-100" { "Category: " } (product.category.label()) }
                            @if product.in_stock {
                                p { span ."px-2 py-0.5 inline-flex text-xs font-semibold rounded-full bg-green-100 text-green-800" { "In Stock" } }
                            } @else {
                                p { span ."px-2 py-0.5 inline-flex text-xs font-semibold rounded-full bg-red-100 text-red-800" { "Out of Stock" } }
                            }
                        }

                        div ."mt-auto" {
                            @if product.in_stock {
                                button
                                    "hx-post"=(format!("/htmx/cart/add/{}", product.id))
                                    "hx-swap"="none"
                                    class="w-full bg-gradient-to-r from-blue-600 to-purple-600 hover:from-blue-700 hover:to-purple-700 text-white font-semibold py-3 px-6 rounded-lg shadow-md transition-all duration-200 cursor-pointer transform active:scale-95"
                                    title=(format!("Add {} to cart", product.name))
                                {
                                    "Add to Cart"
                                }
                            } @else {
                                div ."w-full text-center py-3 px-6 rounded-lg bg-gray-100 dark:bg-gray-800 text-gray-500 font-semibold" {
                                    "Currently unavailable"
                                }
                            }
                            div ."mt-4" {
                                a href="/products"
                                    "hx-get"="/products" "hx-target"="#content" "hx-push-url"="/products"
                                    class="text-sm text-blue-600 hover:text-blue-800 hover:underline" {
                                    "← Back to all products"
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    build_response(&app_state, headers, markup).await
}

// --- KOSZYK ---

fn render_cart_details(store: &SessionStore) -> Markup {
    html! {
        @if store.cart.is_empty() {
            div ."flex flex-col items-center justify-center py-10 space-y-3" {
                p ."text-gray-600 dark:text-gray-300" { "Your cart is empty" }
            }
        } @else {
            ul role="list" ."my-4 divide-y divide-gray-200 dark:divide-gray-800 border-t border-b dark:border-gray-800" {
                @for item in &store.cart {
                    @let unit_price = store.unit_price(&item.product);
                    li ."flex py-4 gap-4" {
                        div ."h-20 w-20 flex-shrink-0 overflow-hidden rounded-md border dark:border-gray-800" {
                            @if let Some(image) = item.product.images.first() {
                                img src=(image) alt=(item.product.name) class="h-full w-full object-cover" loading="lazy";
                            } @else {
                                div ."h-full w-full bg-gray-100 dark:bg-gray-800 flex items-center justify-center text-xs text-gray-400" { "No image" }
                            }
                        }
                        div ."flex flex-1 flex-col" {
                            div ."flex justify-between text-sm font-medium text-gray-800 dark:text-gray-200" {
                                h3 { (item.product.name) }
                                p ."ml-4" { (format_price(unit_price * i64::from(item.quantity))) }
                            }
                            p ."text-xs text-gray-500" { (item.product.brand) }
                            @if store.is_distributor() && item.product.distributor_price.is_some() {
                                p ."text-xs" {
                                    span ."px-1.5 py-0.5 rounded-full bg-blue-100 text-blue-700 font-medium" { "Distributor Price" }
                                }
                            }
                            div ."flex flex-1 items-end justify-between text-xs mt-2" {
                                div ."flex items-center gap-2" {
                                    button type="button"
                                        "hx-post"=(format!("/htmx/cart/update/{}", item.product.id))
                                        "hx-vals"=(format!(r#"{{"quantity": {}}}"#, i64::from(item.quantity) - 1))
                                        "hx-target"="#cart-content-target"
                                        "hx-swap"="innerHTML"
                                        class="h-7 w-7 rounded border dark:border-gray-700 font-semibold hover:bg-gray-50 dark:hover:bg-gray-800" {
                                        "−"
                                    }
                                    span ."w-6 text-center text-sm font-medium" { (item.quantity) }
                                    button type="button"
                                        "hx-post"=(format!("/htmx/cart/update/{}", item.product.id))
                                        "hx-vals"=(format!(r#"{{"quantity": {}}}"#, i64::from(item.quantity) + 1))
                                        "hx-target"="#cart-content-target"
                                        "hx-swap"="innerHTML"
                                        class="h-7 w-7 rounded border dark:border-gray-700 font-semibold hover:bg-gray-50 dark:hover:bg-gray-800" {
                                        "+"
                                    }
                                }
                                button type="button"
                                    "hx-post"=(format!("/htmx/cart/remove/{}", item.product.id))
                                    "hx-target"="#cart-content-target"
                                    "hx-swap"="innerHTML"
                                    class="font-medium text-red-500 hover:text-red-700 transition-colors" {
                                    "Remove"
                                }
                            }
                        }
                    }
                }
            }
            div ."flex justify-between text-base font-semibold text-gray-900 dark:text-gray-100" {
                p { "Subtotal" }
                p { (format_price(store.cart_total())) }
            }
            button type="button"
                "hx-post"="/htmx/cart/clear"
                "hx-target"="#cart-content-target"
                "hx-swap"="innerHTML"
                class="mt-4 w-full text-center text-sm text-gray-500 hover:text-red-600 transition-colors" {
                "Clear cart"
            }
        }
    }
}

pub async fn get_cart_details_htmx_handler(
    State(app_state): State<AppState>,
) -> Result<(HeaderMap, Markup), AppError> {
    tracing::info!("MAUD: /htmx/cart/details - żądanie zawartości koszyka");

    let store = app_state.read_store();
    Ok((cart_trigger_headers(&store), render_cart_details(&store)))
}

pub async fn add_item_to_cart_htmx_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<(HeaderMap, StatusCode), AppError> {
    tracing::info!("MAUD HTMX: /htmx/cart/add/{}", product_id);

    let Some(product) = app_state.catalog.product(&product_id).cloned() else {
        tracing::warn!("MAUD AddToCart: nieznany produkt {}", product_id);
        return Err(AppError::NotFound);
    };

    let headers = {
        let mut store = app_state.write_store();
        store.add_to_cart(&product, 1);
        cart_trigger_headers(&store)
    };
    app_state.persist().await;

    Ok((headers, StatusCode::NO_CONTENT))
}

pub async fn update_cart_item_htmx_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
    Form(payload): Form<crate::models::UpdateQuantityPayload>,
) -> Result<(HeaderMap, Markup), AppError> {
    tracing::info!(
        "MAUD HTMX: /htmx/cart/update/{} -> {}",
        product_id,
        payload.quantity
    );

    let (headers, markup) = {
        let mut store = app_state.write_store();
        store.update_quantity(&product_id, payload.quantity);
        (cart_trigger_headers(&store), render_cart_details(&store))
    };
    app_state.persist().await;

    Ok((headers, markup))
}

pub async fn remove_item_from_cart_htmx_handler(
    State(app_state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<(HeaderMap, Markup), AppError> {
    tracing::info!("MAUD HTMX: /htmx/cart/remove/{}", product_id);

    let (headers, markup) = {
        let mut store = app_state.write_store();
        store.remove_from_cart(&product_id);
        (cart_trigger_headers(&store), render_cart_details(&store))
    };
    app_state.persist().await;

    Ok((headers, markup))
}

pub async fn clear_cart_htmx_handler(
    State(app_state): State<AppState>,
) -> Result<(HeaderMap, Markup), AppError> {
    tracing::info!("MAUD HTMX: /htmx/cart/clear");

    let (headers, markup) = {
        let mut store = app_state.write_store();
        store.clear_cart();
        (cart_trigger_headers(&store), render_cart_details(&store))
    };
    app_state.persist().await;

    Ok((headers, markup))
}

// --- STRONA GŁÓWNA ---

pub async fn home_page(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<AppResponse, AppError> {
    tracing::info!("MAUD: / - strona główna");

    let now = Utc::now();
    let banner_promotion = app_state
        .catalog
        .promotions
        .iter()
        .find(|p| p.is_active && !p.is_expired_at(now));

    let markup = {
        let store = app_state.read_store();
        html! {
            (json_ld_script(&SchemaOrganization::dermabeauty()))

            section ."py-20 bg-gradient-to-r from-blue-50 to-purple-50 dark:from-blue-950/20 dark:to-purple-950/20" {
                div ."container mx-auto px-4 text-center" {
                    h1 ."text-4xl md:text-6xl font-bold mb-4" { "Discover Your Natural Beauty" }
                    p ."text-lg text-gray-600 dark:text-gray-300 max-w-2xl mx-auto mb-8" {
                        "Premium skincare, hair care and beauty supplements, backed by dermatological science."
                    }
                    a href="/products"
                        "hx-get"="/products" "hx-target"="#content" "hx-push-url"="/products"
                        class="inline-block bg-gradient-to-r from-blue-600 to-purple-600 hover:from-blue-700 hover:to-purple-700 text-white font-semibold py-3 px-8 rounded-lg shadow-md transition-all" {
                        "Shop Now"
                    }
                }
            }

            @if let Some(promotion) = banner_promotion {
                section ."py-6 bg-red-600 text-white" {
                    div ."container mx-auto px-4 flex flex-col sm:flex-row items-center justify-center gap-2 text-center" {
                        span ."font-semibold" { (promotion.title) " · " (promotion.description) }
                        a href="/promotions"
                            "hx-get"="/promotions" "hx-target"="#content" "hx-push-url"="/promotions"
                            class="underline font-bold" {
                            "Use code " (promotion.code)
                        }
                    }
                }
            }

            section ."py-16" {
                div ."container mx-auto px-4" {
                    h2 ."text-3xl font-bold text-center mb-2" { "Shop by Category" }
                    p ."text-center text-gray-500 dark:text-gray-400 mb-10" {
                        "Everything your routine needs, in one place."
                    }
                    div ."grid grid-cols-2 lg:grid-cols-4 gap-6" {
                        @for category in Category::iter() {
                            a
                                href=(format!("/products?category={}", category))
                                "hx-get"=(format!("/products?category={}", category))
                                "hx-target"="#content"
                                "hx-push-url"=(format!("/products?category={}", category))
                                class="rounded-2xl border dark:border-gray-800 p-8 text-center hover:shadow-lg hover:border-blue-400 transition-all"
                            {
                                h3 ."text-lg font-semibold" { (category.label()) }
                            }
                        }
                    }
                }
            }

            section ."py-16 bg-gray-50 dark:bg-gray-900/40" {
                div ."container mx-auto px-4" {
                    h2 ."text-3xl font-bold text-center mb-2" { "Featured Products" }
                    p ."text-center text-gray-500 dark:text-gray-400 mb-10" {
                        "Our bestsellers, loved by customers and professionals alike."
                    }
                    div ."grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-6" {
                        @for product in app_state.catalog.featured() {
                            (render_product_card(product, &store))
                        }
                    }
                }
            }
        }
    };

    build_response(&app_state, headers, markup).await
}

// --- PROMOCJE ---

pub async fn promotions_page(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<AppResponse, AppError> {
    tracing::info!("MAUD: /promotions");

    let now = Utc::now();
    let markup = html! {
        section ."py-16 bg-gradient-to-r from-blue-50 to-purple-50 dark:from-blue-950/20 dark:to-purple-950/20" {
            div ."container mx-auto px-4 text-center" {
                h1 ."text-4xl md:text-5xl font-bold mb-4" { "Promotions" }
                p ."text-lg text-gray-600 dark:text-gray-300 max-w-2xl mx-auto" {
                    "Discover amazing deals and exclusive offers on our premium beauty products"
                }
            }
        }
        section ."py-16" {
            div ."container mx-auto px-4" {
                div ."grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-8" {
                    @for promotion in &app_state.catalog.promotions {
                        @let expired = promotion.is_expired_at(now);
                        // Schowek przeglądarki: zapis fire-and-forget, błąd
                        // ląduje w konsoli, a potwierdzenie po prostu się nie pokaże.
                        @let copy_action = format!(
                            "navigator.clipboard.writeText({}).then(() => {{ copied = true; setTimeout(() => copied = false, 2000) }}).catch(err => console.error('Failed to copy promo code:', err))",
                            serde_json::to_string(&promotion.code).unwrap_or_default()
                        );
                        div ."rounded-2xl border dark:border-gray-800 overflow-hidden shadow-sm hover:shadow-lg transition-all bg-white dark:bg-gray-900" {
                            div ."relative aspect-video overflow-hidden" {
                                img src=(promotion.image) alt=(promotion.title) class="w-full h-full object-cover" loading="lazy";
                                div ."absolute top-4 left-4" {
                                    span ."px-3 py-1 text-lg font-bold rounded-full bg-red-600 text-white" {
                                        "-" (promotion.discount) "%"
                                    }
                                }
                                div ."absolute bottom-4 left-4 text-white text-sm font-medium drop-shadow" {
                                    @if expired {
                                        span ."text-red-200" { "Expired" }
                                    } @else {
                                        span { (promotion.time_left_label(now)) }
                                    }
                                }
                            }
                            div ."p-6" {
                                h3 ."text-xl font-bold mb-2" { (promotion.title) }
                                p ."text-gray-500 dark:text-gray-400 mb-4" { (promotion.description) }
                                div ."flex items-center justify-between p-3 rounded-lg bg-gray-50 dark:bg-gray-800" "x-data"="{ copied: false }" {
                                    span ."font-mono font-bold tracking-wide" { (promotion.code) }
                                    button type="button" "@click"=(copy_action)
                                        class="text-sm font-medium text-blue-600 hover:text-blue-800 transition-colors" {
                                        span "x-show"="!copied" { "Copy" }
                                        span "x-show"="copied" ."text-green-600" { "Copied!" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    build_response(&app_state, headers, markup).await
}

// --- STRONA DYSTRYBUTORSKA ---

pub async fn business_page(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<AppResponse, AppError> {
    tracing::info!("MAUD: /business");

    let benefits = [
        (
            "Wholesale Pricing",
            "Access distributor prices up to 30% below retail on the full catalog.",
        ),
        (
            "Exclusive Products",
            "Professional treatments and products reserved for certified partners.",
        ),
        (
            "Marketing Support",
            "Campaign materials, product training and launch kits for your business.",
        ),
        (
            "Priority Support",
            "A dedicated account manager and priority order handling.",
        ),
    ];
    let requirements = [
        "Registered business with a valid tax ID",
        "Experience in the beauty or wellness industry",
        "Physical or online retail presence",
        "Commitment to brand guidelines",
    ];

    let markup = html! {
        section ."py-16 bg-gradient-to-r from-blue-50 to-purple-50 dark:from-blue-950/20 dark:to-purple-950/20" {
            div ."container mx-auto px-4 text-center" {
                h1 ."text-4xl md:text-5xl font-bold mb-4" { "Become a Distributor" }
                p ."text-lg text-gray-600 dark:text-gray-300 max-w-2xl mx-auto" {
                    "Partner with DermaBeauty and bring professional-grade beauty products to your customers."
                }
            }
        }
        section ."py-16" {
            div ."container mx-auto px-4 grid grid-cols-1 md:grid-cols-2 gap-12" {
                div {
                    h2 ."text-2xl font-bold mb-6" { "Partner Benefits" }
                    div ."space-y-4" {
                        @for (title, description) in benefits {
                            div ."rounded-xl border dark:border-gray-800 p-5" {
                                h3 ."font-semibold mb-1" { (title) }
                                p ."text-sm text-gray-500 dark:text-gray-400" { (description) }
                            }
                        }
                    }
                    h2 ."text-2xl font-bold mt-10 mb-6" { "Requirements" }
                    ul ."list-disc list-inside space-y-2 text-gray-600 dark:text-gray-300" {
                        @for requirement in requirements {
                            li { (requirement) }
                        }
                    }
                }
                div {
                    h2 ."text-2xl font-bold mb-6" { "Apply Now" }
                    div #application-result ."mb-4" {}
                    form
                        "hx-post"="/htmx/business/apply"
                        "hx-target"="#application-result"
                        "hx-swap"="innerHTML"
                        class="space-y-4"
                    {
                        div ."grid grid-cols-1 sm:grid-cols-2 gap-4" {
                            input type="text" name="business_name" placeholder="Business name *"
                                class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                            input type="text" name="contact_name" placeholder="Contact name *"
                                class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                        }
                        div ."grid grid-cols-1 sm:grid-cols-2 gap-4" {
                            input type="email" name="email" placeholder="E-mail *"
                                class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                            input type="tel" name="phone" placeholder="Phone *"
                                class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                        }
                        input type="text" name="address" placeholder="Business address *"
                            class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                        input type="text" name="tax_id" placeholder="Tax ID *"
                            class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                        textarea name="experience" rows="3" placeholder="Industry experience"
                            class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm" {}
                        textarea name="message" rows="3" placeholder="Anything else we should know?"
                            class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm" {}
                        button type="submit"
                            class="w-full bg-gradient-to-r from-blue-600 to-purple-600 hover:from-blue-700 hover:to-purple-700 text-white font-semibold py-3 px-6 rounded-lg shadow-md transition-all" {
                            "Submit Application"
                        }
                    }
                }
            }
        }
    };

    build_response(&app_state, headers, markup).await
}

pub async fn submit_distributor_application_htmx_handler(
    State(app_state): State<AppState>,
    Form(payload): Form<DistributorApplicationPayload>,
) -> Result<Markup, AppError> {
    tracing::info!("MAUD HTMX: /htmx/business/apply od {}", payload.email);

    if let Err(errors) = payload.validate() {
        return Err(AppError::UnprocessableEntityWithHtml(render_form_errors(
            &errors,
        )));
    }

    let submission_id = app_state.submission_sink.submit_application(&payload).await?;
    Ok(html! {
        div ."rounded-lg border border-green-200 bg-green-50 dark:bg-green-950/30 p-4 text-sm text-green-700 dark:text-green-400" {
            p ."font-semibold" { "Application received!" }
            p { "Our partnership team will get back to you within 3 business days. Reference: " (submission_id) }
        }
    })
}

// --- KONTAKT ---

pub async fn contact_page(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<AppResponse, AppError> {
    tracing::info!("MAUD: /contact");

    let markup = html! {
        section ."py-16 bg-gradient-to-r from-blue-50 to-purple-50 dark:from-blue-950/20 dark:to-purple-950/20" {
            div ."container mx-auto px-4 text-center" {
                h1 ."text-4xl md:text-5xl font-bold mb-4" { "Contact Us" }
                p ."text-lg text-gray-600 dark:text-gray-300 max-w-2xl mx-auto" {
                    "Questions about products, orders or partnerships? We're here to help."
                }
            }
        }
        section ."py-16" {
            div ."container mx-auto px-4 grid grid-cols-1 md:grid-cols-2 gap-12" {
                div {
                    h2 ."text-2xl font-bold mb-6" { "Send us a message" }
                    div #contact-result ."mb-4" {}
                    form
                        "hx-post"="/htmx/contact/send"
                        "hx-target"="#contact-result"
                        "hx-swap"="innerHTML"
                        class="space-y-4"
                    {
                        div ."grid grid-cols-1 sm:grid-cols-2 gap-4" {
                            input type="text" name="name" placeholder="Your name *"
                                class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                            input type="email" name="email" placeholder="E-mail *"
                                class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                        }
                        input type="text" name="subject" placeholder="Subject *"
                            class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                        textarea name="message" rows="5" placeholder="Message *"
                            class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm" {}
                        button type="submit"
                            class="w-full bg-gradient-to-r from-blue-600 to-purple-600 hover:from-blue-700 hover:to-purple-700 text-white font-semibold py-3 px-6 rounded-lg shadow-md transition-all" {
                            "Send Message"
                        }
                    }
                }
                div {
                    h2 ."text-2xl font-bold mb-6" { "Our Offices" }
                    div ."space-y-4" {
                        @for office in &app_state.catalog.offices {
                            div ."rounded-xl border dark:border-gray-800 p-5" {
                                h3 ."font-semibold mb-1" { (office.name) }
                                p ."text-sm text-gray-500 dark:text-gray-400" { (office.address) }
                                p ."text-sm text-gray-500 dark:text-gray-400" { (office.phone) }
                                a href=(format!("mailto:{}", office.email))
                                    class="text-sm text-blue-600 hover:underline" {
                                    (office.email)
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    build_response(&app_state, headers, markup).await
}

pub async fn submit_contact_message_htmx_handler(
    State(app_state): State<AppState>,
    Form(payload): Form<ContactMessagePayload>,
) -> Result<Markup, AppError> {
    tracing::info!("MAUD HTMX: /htmx/contact/send od {}", payload.email);

    if let Err(errors) = payload.validate() {
        return Err(AppError::UnprocessableEntityWithHtml(render_form_errors(
            &errors,
        )));
    }

    let submission_id = app_state
        .submission_sink
        .submit_contact_message(&payload)
        .await?;
    Ok(html! {
        div ."rounded-lg border border-green-200 bg-green-50 dark:bg-green-950/30 p-4 text-sm text-green-700 dark:text-green-400" {
            p ."font-semibold" { "Message sent!" }
            p { "We'll reply to your e-mail as soon as possible. Reference: " (submission_id) }
        }
    })
}

// --- O FIRMIE ---

pub async fn company_page(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<AppResponse, AppError> {
    tracing::info!("MAUD: /company");

    let milestones = [
        ("2008", "Company Founded", "DermaBeauty starts in a single New York lab."),
        ("2010", "First Product Launch", "The original Vitamin C serum line ships."),
        ("2014", "International Expansion", "Distribution reaches 12 countries."),
        ("2017", "Medical Division", "In-clinic professional treatments join the catalog."),
        ("2020", "Sustainability Initiative", "Recyclable packaging across all lines."),
        ("2023", "Innovation Hub", "A dedicated R&D center opens in Los Angeles."),
    ];
    let certificates = [
        "ISO 22716 Cosmetics GMP",
        "FDA Registered Facility",
        "Cruelty-Free Certified",
        "Dermatologist Tested",
    ];

    let markup = html! {
        section ."py-16 bg-gradient-to-r from-blue-50 to-purple-50 dark:from-blue-950/20 dark:to-purple-950/20" {
            div ."container mx-auto px-4 text-center" {
                h1 ."text-4xl md:text-6xl font-bold mb-6" { "Our Story" }
                p ."text-lg text-gray-600 dark:text-gray-300 max-w-3xl mx-auto" {
                    "For over fifteen years DermaBeauty has combined dermatological science with everyday beauty care, trusted by customers and professionals in dozens of countries."
                }
            }
        }
        section ."py-16" {
            div ."container mx-auto px-4" {
                h2 ."text-3xl font-bold text-center mb-10" { "Milestones" }
                div ."max-w-2xl mx-auto space-y-6" {
                    @for (year, title, description) in milestones {
                        div ."flex gap-6 items-start" {
                            span ."text-blue-600 font-bold w-16 shrink-0" { (year) }
                            div {
                                h3 ."font-semibold" { (title) }
                                p ."text-sm text-gray-500 dark:text-gray-400" { (description) }
                            }
                        }
                    }
                }
            }
        }
        section ."py-16 bg-gray-50 dark:bg-gray-900/40" {
            div ."container mx-auto px-4" {
                h2 ."text-3xl font-bold text-center mb-10" { "Certifications" }
                div ."grid grid-cols-2 lg:grid-cols-4 gap-6 max-w-4xl mx-auto" {
                    @for certificate in certificates {
                        div ."rounded-xl border dark:border-gray-800 p-6 text-center font-medium" {
                            (certificate)
                        }
                    }
                }
            }
        }
    };

    build_response(&app_state, headers, markup).await
}

// --- SESJA: LOGOWANIE, MOTYW, JĘZYK ---

pub async fn login_page(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<AppResponse, AppError> {
    tracing::info!("MAUD: /login");

    let markup = {
        let store = app_state.read_store();
        html! {
            section ."py-16" {
                div ."container mx-auto px-4 max-w-md" {
                    @if let Some(user) = &store.user {
                        div ."rounded-2xl border dark:border-gray-800 p-8 text-center space-y-4" {
                            h1 ."text-2xl font-bold" { "Signed in as " (user.name) }
                            p ."text-gray-500 dark:text-gray-400" { (user.email) " · " (user.role) }
                            button
                                "hx-post"="/htmx/session/logout"
                                class="w-full bg-gray-900 dark:bg-gray-100 dark:text-gray-900 text-white font-semibold py-3 px-6 rounded-lg" {
                                "Sign out"
                            }
                        }
                    } @else {
                        h1 ."text-3xl font-bold text-center mb-2" { "Sign In" }
                        p ."text-center text-sm text-gray-500 dark:text-gray-400 mb-8" {
                            "Demo sign-in: pick a role to preview customer or distributor pricing."
                        }
                        div #login-result ."mb-4" {}
                        form
                            "hx-post"="/htmx/session/login"
                            "hx-target"="#login-result"
                            "hx-swap"="innerHTML"
                            class="space-y-4"
                        {
                            input type="text" name="name" placeholder="Display name *"
                                class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                            input type="email" name="email" placeholder="E-mail *"
                                class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm";
                            select name="role" class="w-full rounded-lg border border-gray-300 dark:border-gray-700 dark:bg-gray-800 px-3 py-2 text-sm" {
                                option value="customer" selected { "Customer" }
                                option value="distributor" { "Distributor" }
                                option value="admin" { "Admin" }
                            }
                            button type="submit"
                                class="w-full bg-gradient-to-r from-blue-600 to-purple-600 hover:from-blue-700 hover:to-purple-700 text-white font-semibold py-3 px-6 rounded-lg shadow-md" {
                                "Sign In"
                            }
                        }
                    }
                }
            }
        }
    };

    build_response(&app_state, headers, markup).await
}

pub async fn login_htmx_handler(
    State(app_state): State<AppState>,
    Form(payload): Form<LoginPayload>,
) -> Result<(HeaderMap, StatusCode), AppError> {
    if let Err(errors) = payload.validate() {
        return Err(AppError::UnprocessableEntityWithHtml(render_form_errors(
            &errors,
        )));
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: payload.name,
        email: payload.email,
        role: payload.role,
        is_logged_in: true,
    };
    tracing::info!("MAUD: logowanie {} (rola: {})", user.name, user.role);

    {
        let mut store = app_state.write_store();
        store.set_user(user);
    }
    app_state.persist().await;

    // Pełne przeładowanie: ceny i widoczność zależne od roli zmieniają się
    // na każdej stronie, nie tylko w jednym fragmencie.
    let mut headers = HeaderMap::new();
    headers.insert("HX-Redirect", HeaderValue::from_static("/"));
    Ok((headers, StatusCode::NO_CONTENT))
}

pub async fn logout_htmx_handler(
    State(app_state): State<AppState>,
) -> Result<(HeaderMap, StatusCode), AppError> {
    tracing::info!("MAUD: wylogowanie");

    {
        let mut store = app_state.write_store();
        store.clear_user();
    }
    app_state.persist().await;

    let mut headers = HeaderMap::new();
    headers.insert("HX-Redirect", HeaderValue::from_static("/"));
    Ok((headers, StatusCode::NO_CONTENT))
}

pub async fn toggle_theme_htmx_handler(
    State(app_state): State<AppState>,
) -> Result<(HeaderMap, StatusCode), AppError> {
    {
        let mut store = app_state.write_store();
        let next = match store.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        store.set_theme(next);
    }
    app_state.persist().await;

    let mut headers = HeaderMap::new();
    headers.insert("HX-Refresh", HeaderValue::from_static("true"));
    Ok((headers, StatusCode::NO_CONTENT))
}

pub async fn set_locale_htmx_handler(
    State(app_state): State<AppState>,
    Form(payload): Form<crate::models::SetLocalePayload>,
) -> Result<(HeaderMap, StatusCode), AppError> {
    tracing::info!("MAUD: zmiana języka na {}", payload.locale);

    {
        let mut store = app_state.write_store();
        store.set_locale(payload.locale);
    }
    app_state.persist().await;

    let mut headers = HeaderMap::new();
    headers.insert("HX-Refresh", HeaderValue::from_static("true"));
    Ok((headers, StatusCode::NO_CONTENT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_price_renders_cents_as_dollars() {
        assert_eq!(format_price(8999), "$89.99");
        assert_eq!(format_price(0), "$0.00");
        assert_eq!(format_price(100), "$1.00");
    }

    #[test]
    fn filter_query_string_skips_defaults() {
        let params = ListingParams::default();
        assert_eq!(build_filter_query_string(&params), "");
    }

    #[test]
    fn filter_query_string_encodes_active_criteria() {
        let params: ListingParams = serde_json::from_value(serde_json::json!({
            "search": "vitamin c",
            "category": "skin-care",
            "sort_by": "priceAsc"
        }))
        .unwrap();
        let qs = build_filter_query_string(&params);
        assert!(qs.contains("search=vitamin%20c"));
        assert!(qs.contains("category=skin-care"));
        assert!(qs.contains("sort_by=priceAsc"));
    }
}
