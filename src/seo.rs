// src/seo.rs

use serde::Serialize;

use crate::models::Product;

pub const BASE_URL: &str = "https://dermabeauty.com";

// --- Struktury dla Schema.org -> Product ---

#[derive(Serialize)]
pub struct SchemaBrand<'a> {
    #[serde(rename = "@type")]
    pub type_of: &'a str,
    pub name: &'a str,
}

#[derive(Serialize)]
pub struct SchemaAggregateRating {
    #[serde(rename = "@type")]
    pub type_of: &'static str,
    #[serde(rename = "ratingValue")]
    pub rating_value: f32,
    #[serde(rename = "reviewCount")]
    pub review_count: u32,
}

#[derive(Serialize)]
pub struct SchemaOffer<'a> {
    #[serde(rename = "@type")]
    pub type_of: &'a str,
    pub url: String,
    #[serde(rename = "priceCurrency")]
    pub price_currency: &'a str,
    pub price: String,
    pub availability: &'a str,
}

#[derive(Serialize)]
pub struct SchemaProduct<'a> {
    #[serde(rename = "@context")]
    pub context: &'a str,
    #[serde(rename = "@type")]
    pub type_of: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub sku: &'a str,
    pub image: &'a [String],
    pub brand: SchemaBrand<'a>,
    #[serde(rename = "aggregateRating")]
    pub aggregate_rating: SchemaAggregateRating,
    pub offers: SchemaOffer<'a>,
}

impl<'a> SchemaProduct<'a> {
    /// JSON-LD dla karty produktu. Cena zawsze bazowa - ceny
    /// dystrybutorskie nie wychodzą do indeksów wyszukiwarek.
    pub fn from_product(product: &'a Product) -> Self {
        SchemaProduct {
            context: "https://schema.org",
            type_of: "Product",
            name: &product.name,
            description: &product.description,
            sku: &product.id,
            image: &product.images,
            brand: SchemaBrand {
                type_of: "Brand",
                name: &product.brand,
            },
            aggregate_rating: SchemaAggregateRating {
                type_of: "AggregateRating",
                rating_value: product.rating,
                review_count: product.reviews,
            },
            offers: SchemaOffer {
                type_of: "Offer",
                url: format!("{}/products/{}", BASE_URL, product.id),
                price_currency: "USD",
                price: format!("{:.2}", (product.price as f64) / 100.0),
                availability: if product.in_stock {
                    "https://schema.org/InStock"
                } else {
                    "https://schema.org/OutOfStock"
                },
            },
        }
    }
}

// --- Struktury dla Schema.org -> Organization (dla strony głównej) ---

#[derive(Serialize)]
pub struct SchemaOrganization<'a> {
    #[serde(rename = "@context")]
    pub context: &'a str,
    #[serde(rename = "@type")]
    pub type_of: &'a str,
    pub name: &'a str,
    pub url: &'a str,
    pub logo: &'a str,
}

impl SchemaOrganization<'static> {
    pub fn dermabeauty() -> Self {
        SchemaOrganization {
            context: "https://schema.org",
            type_of: "Organization",
            name: "DermaBeauty",
            url: BASE_URL,
            logo: "https://dermabeauty.com/static/logo.png",
        }
    }
}

// --- Struktury dla Schema.org -> BreadcrumbList ("Okruszki") ---

#[derive(Serialize)]
pub struct SchemaBreadcrumbList<'a> {
    #[serde(rename = "@context")]
    pub context: &'a str,
    #[serde(rename = "@type")]
    pub type_of: &'a str,
    #[serde(rename = "itemListElement")]
    pub item_list: Vec<SchemaListItem>,
}

#[derive(Serialize)]
pub struct SchemaListItem {
    #[serde(rename = "@type")]
    pub type_of: &'static str,
    pub position: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

impl<'a> SchemaBreadcrumbList<'a> {
    pub fn for_product(product: &Product) -> Self {
        SchemaBreadcrumbList {
            context: "https://schema.org",
            type_of: "BreadcrumbList",
            item_list: vec![
                SchemaListItem {
                    type_of: "ListItem",
                    position: 1,
                    name: "Products".to_string(),
                    item: Some(format!("{}/products", BASE_URL)),
                },
                SchemaListItem {
                    type_of: "ListItem",
                    position: 2,
                    name: product.category.label().to_string(),
                    item: Some(format!(
                        "{}/products?category={}",
                        BASE_URL, product.category
                    )),
                },
                SchemaListItem {
                    type_of: "ListItem",
                    position: 3,
                    name: product.name.clone(),
                    item: None,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn product_schema_exposes_base_price_in_dollars() {
        let catalog = Catalog::seed();
        let product = catalog.product("skincare-1").unwrap();
        let schema = SchemaProduct::from_product(product);

        assert_eq!(schema.offers.price, "89.99");
        assert_eq!(schema.offers.price_currency, "USD");
        assert_eq!(schema.brand.name, "DermaClinical");

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["@type"], "Product");
        assert_eq!(json["aggregateRating"]["reviewCount"], 234);
    }

    #[test]
    fn breadcrumbs_walk_from_listing_to_product() {
        let catalog = Catalog::seed();
        let product = catalog.product("haircare-1").unwrap();
        let breadcrumbs = SchemaBreadcrumbList::for_product(product);

        assert_eq!(breadcrumbs.item_list.len(), 3);
        assert_eq!(breadcrumbs.item_list[1].name, "Hair Care");
        assert!(breadcrumbs.item_list[2].item.is_none());
    }
}
