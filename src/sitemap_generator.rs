// src/sitemap_generator.rs

use axum::extract::State;
use axum::{
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use quick_xml::se::to_string;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::errors::AppError;
use crate::models::Category;
use crate::seo::BASE_URL;
use crate::state::AppState;

// --- Struktury danych odzwierciedlające format sitemap.xml ---

#[derive(Serialize)]
#[serde(rename = "urlset")]
pub struct UrlSet {
    #[serde(rename = "@xmlns")]
    xmlns: String,
    #[serde(rename = "url")]
    pub urls: Vec<UrlEntry>,
}

#[derive(Serialize)]
pub struct UrlEntry {
    #[serde(rename = "loc")]
    pub location: String,
    #[serde(rename = "lastmod")]
    pub last_modified: String,
    #[serde(rename = "changefreq")]
    pub change_frequency: ChangeFreq,
    #[serde(rename = "priority")]
    pub priority: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

// --- Główny Handler ---

pub async fn generate_sitemap_handler(
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    let mut urls = Vec::new();

    // 1. Strony statyczne
    let static_pages = vec![
        ("", 1.0, ChangeFreq::Weekly), // Strona główna
        ("/products", 0.9, ChangeFreq::Daily),
        ("/promotions", 0.8, ChangeFreq::Daily),
        ("/business", 0.6, ChangeFreq::Monthly),
        ("/company", 0.5, ChangeFreq::Monthly),
        ("/contact", 0.5, ChangeFreq::Monthly),
    ];

    for (loc, prio, freq) in static_pages {
        urls.push(UrlEntry {
            location: format!("{}{}", BASE_URL, loc),
            last_modified: Utc::now().to_rfc3339(),
            change_frequency: freq,
            priority: prio,
        });
    }

    // 2. Strony kategorii (listing z preselekcją filtra)
    for category in Category::iter() {
        urls.push(UrlEntry {
            location: format!("{}/products?category={}", BASE_URL, category),
            last_modified: Utc::now().to_rfc3339(),
            change_frequency: ChangeFreq::Weekly,
            priority: 0.8,
        });
    }

    // 3. Strony produktów ze statycznego katalogu
    for product in &app_state.catalog.products {
        urls.push(UrlEntry {
            location: format!("{}/products/{}", BASE_URL, product.id),
            last_modified: product.created_at.to_rfc3339(),
            change_frequency: ChangeFreq::Monthly,
            priority: 0.7,
        });
    }

    let url_set = UrlSet {
        xmlns: "http://www.sitemaps.org/schemas/sitemap/0.9".to_string(),
        urls,
    };

    // Serializacja do XML
    let mut xml_output = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string();
    xml_output.push_str(&to_string(&url_set).map_err(|_| {
        AppError::InternalServerError("sitemap serialization failed".to_string())
    })?);

    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/xml; charset=utf-8"),
        )],
        xml_output,
    )
        .into_response())
}
