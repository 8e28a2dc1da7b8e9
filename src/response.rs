// src/response.rs
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use lol_html::html_content::ContentType;
use lol_html::{HtmlRewriter, Settings, element};
use maud::Markup;
use tokio::fs;
use tokio_util::bytes::Bytes;

use crate::errors::AppError;
use crate::models::Theme;
use crate::state::AppState;

// Uniwersalny typ odpowiedzi: pełna strona albo fragment dla HTMX.
pub enum AppResponse {
    Full(Html<String>),
    Partial(Markup),
}

impl IntoResponse for AppResponse {
    fn into_response(self) -> Response {
        match self {
            AppResponse::Full(html) => html.into_response(),
            AppResponse::Partial(markup) => markup.into_response(),
        }
    }
}

/// Asynchronicznie wczytuje i modyfikuje szablon HTML.
/// Wstawia wyrenderowaną treść w `#content`, usuwa atrybuty HTMX
/// inicjujące ładowanie (żeby klient nie nadpisał treści po starcie)
/// i wstrzykuje zapisany motyw oraz licznik koszyka z rekordu sesji.
async fn serve_full_page(state: &AppState, content_markup: Markup) -> Result<AppResponse, AppError> {
    let shell_content = match fs::read("static/index.html").await {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            tracing::error!("Nie można wczytać pliku szablonu static/index.html: {}", e);
            return Err(AppError::InternalServerError(
                "page shell is missing".to_string(),
            ));
        }
    };

    let (theme, cart_count) = {
        let store = state.read_store();
        (store.theme, store.cart_item_count())
    };

    let content_string = content_markup.into_string();
    let mut response_body = Vec::new();

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                // Placeholder na treść strony
                element!("#content", |el| {
                    el.set_inner_content(&content_string, ContentType::Html);
                    el.remove_attribute("hx-trigger");
                    el.remove_attribute("hx-get");
                    Ok(())
                }),
                // Motyw z rekordu sesji, zanim cokolwiek się wyrenderuje
                element!("html", move |el| {
                    if theme == Theme::Dark {
                        el.set_attribute("class", "dark")?;
                    }
                    Ok(())
                }),
                // Badge koszyka od razu z poprawną liczbą sztuk
                element!("#cart-count", move |el| {
                    el.set_inner_content(&cart_count.to_string(), ContentType::Text);
                    Ok(())
                }),
            ],
            ..Settings::default()
        },
        |c: &[u8]| response_body.extend_from_slice(c),
    );

    rewriter
        .write(&shell_content)
        .map_err(|e| AppError::InternalServerError(format!("shell rewrite failed: {}", e)))?;
    rewriter
        .end()
        .map_err(|e| AppError::InternalServerError(format!("shell rewrite failed: {}", e)))?;

    let page = String::from_utf8(response_body)
        .map_err(|e| AppError::InternalServerError(format!("shell is not valid UTF-8: {}", e)))?;

    Ok(AppResponse::Full(Html(page)))
}

/// Dla żądań HTMX zwracamy sam fragment, dla pełnych odświeżeń (F5,
/// pierwsze wejście) budujemy całą stronę wokół niego.
pub async fn build_response(
    state: &AppState,
    headers: HeaderMap,
    page_content: Markup,
) -> Result<AppResponse, AppError> {
    if headers.contains_key("HX-Request") {
        Ok(AppResponse::Partial(page_content))
    } else {
        serve_full_page(state, page_content).await
    }
}
