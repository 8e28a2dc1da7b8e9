// src/filters.rs
use std::str::FromStr;

use serde::Deserialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::models::{Category, Product};

// Suwak cen w UI pracuje na pełnym zakresie katalogu: 0-500 USD.
pub const DEFAULT_PRICE_MIN: i64 = 0;
pub const DEFAULT_PRICE_MAX: i64 = 50_000;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    #[strum(serialize = "popularity")]
    Popularity,
    #[strum(serialize = "priceAsc")]
    PriceAsc,
    #[strum(serialize = "priceDesc")]
    PriceDesc,
    #[strum(serialize = "rating")]
    Rating,
    #[strum(serialize = "newest")]
    Newest,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Popularity => "Popularity",
            SortKey::PriceAsc => "Price: Low to High",
            SortKey::PriceDesc => "Price: High to Low",
            SortKey::Rating => "Highest Rated",
            SortKey::Newest => "Newest",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    // Filtry
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    price_min: Option<i64>,
    #[serde(default)]
    price_max: Option<i64>,
    #[serde(default)]
    distributor_only: Option<bool>,

    // Sortowanie
    #[serde(default)]
    sort_by: Option<SortKey>,
}

impl ListingParams {
    /// Fraza wyszukiwania; pusta lub sama z białych znaków znaczy "wszystko".
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Kategoria z selecta. Wartość "all" (i każda nieznana) przepuszcza wszystko.
    pub fn category(&self) -> Option<Category> {
        match self.category.as_deref() {
            None | Some("all") => None,
            Some(raw) => Category::from_str(raw).ok(),
        }
    }

    pub fn brand(&self) -> Option<&str> {
        match self.brand.as_deref() {
            None | Some("all") => None,
            Some(raw) => Some(raw),
        }
    }

    pub fn price_min(&self) -> i64 {
        self.price_min.unwrap_or(DEFAULT_PRICE_MIN)
    }

    pub fn price_max(&self) -> i64 {
        self.price_max.unwrap_or(DEFAULT_PRICE_MAX)
    }

    pub fn distributor_only(&self) -> bool {
        self.distributor_only.unwrap_or(false)
    }

    pub fn sort_by(&self) -> SortKey {
        self.sort_by.unwrap_or_default()
    }

    fn matches(&self, product: &Product) -> bool {
        let matches_search = match self.search() {
            Some(term) => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
            }
            None => true,
        };
        let matches_category = self
            .category()
            .is_none_or(|category| product.category == category);
        let matches_brand = self.brand().is_none_or(|brand| product.brand == brand);
        // Zakres cen zawsze porównujemy z ceną bazową, nie z ceną
        // widoczną dla roli - wynik filtrowania nie zmienia się po
        // zalogowaniu dystrybutora.
        let matches_price =
            product.price >= self.price_min() && product.price <= self.price_max();
        let matches_distributor = !self.distributor_only() || product.is_distributor_only;

        matches_search && matches_category && matches_brand && matches_price && matches_distributor
    }
}

/// Czysta funkcja filtrująca: koniunkcja wszystkich aktywnych predykatów,
/// potem stabilne sortowanie. Żaden produkt nie jest mutowany, pusty wynik
/// jest poprawną wartością. Liczy od zera przy każdym wywołaniu - katalog
/// jest mały i statyczny, cache nie jest potrzebny.
pub fn filter_products(catalog: &[Product], params: &ListingParams) -> Vec<Product> {
    let mut filtered: Vec<Product> = catalog
        .iter()
        .filter(|product| params.matches(product))
        .cloned()
        .collect();

    // sort_by/sort_by_key są stabilne, więc "popularity" i remisy
    // zachowują oryginalną kolejność katalogu.
    match params.sort_by() {
        SortKey::Popularity => {}
        SortKey::PriceAsc => filtered.sort_by_key(|p| p.price),
        SortKey::PriceDesc => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => filtered.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Newest => filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn products() -> Vec<Product> {
        Catalog::seed().products
    }

    fn params(configure: impl FnOnce(&mut ListingParams)) -> ListingParams {
        let mut params = ListingParams::default();
        configure(&mut params);
        params
    }

    #[test]
    fn no_criteria_returns_full_catalog_in_order() {
        let catalog = products();
        let result = filter_products(&catalog, &ListingParams::default());
        assert_eq!(result.len(), catalog.len());
        assert_eq!(result[0].id, "skincare-1");
        assert_eq!(result.last().unwrap().id, "medical-1");
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let catalog = products();
        let result = filter_products(&catalog, &params(|p| p.search = Some("VITAMIN".into())));

        // "Vitamin C Brightening Serum" po nazwie, suplement kolagenowy po opisie.
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["skincare-1", "supplements-1"]);
    }

    #[test]
    fn blank_search_matches_everything() {
        let catalog = products();
        let result = filter_products(&catalog, &params(|p| p.search = Some("   ".into())));
        assert_eq!(result.len(), catalog.len());
    }

    #[test]
    fn category_filter_with_brand_all_passes_brand_through() {
        let catalog = products();
        let result = filter_products(
            &catalog,
            &params(|p| {
                p.category = Some("hair-care".into());
                p.brand = Some("all".into());
            }),
        );
        assert_eq!(result.len(), 1);
        assert!(result.iter().all(|p| p.category == Category::HairCare));
    }

    #[test]
    fn brand_filter_is_exact() {
        let catalog = products();
        let result = filter_products(&catalog, &params(|p| p.brand = Some("HydraLux".into())));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "skincare-2");
    }

    #[test]
    fn price_range_bounds_are_inclusive_on_base_price() {
        let catalog = products();
        let result = filter_products(
            &catalog,
            &params(|p| {
                p.price_min = Some(4599);
                p.price_max = Some(7699);
            }),
        );
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["skincare-2", "haircare-1", "supplements-1"]);
    }

    #[test]
    fn price_range_ignores_distributor_price() {
        // medical-1: cena bazowa 19999, dystrybutora 14999. Górna granica
        // 15000 nie może go złapać, nawet jeśli cena wyświetlana byłaby niższa.
        let catalog = products();
        let result = filter_products(&catalog, &params(|p| p.price_max = Some(15_000)));
        assert!(result.iter().all(|p| p.id != "medical-1"));
    }

    #[test]
    fn sort_price_asc_starts_at_cheapest() {
        let catalog = products();
        let result = filter_products(&catalog, &params(|p| p.sort_by = Some(SortKey::PriceAsc)));

        let prices: Vec<i64> = result.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![4599, 6599, 7699, 8999, 19999]);
    }

    #[test]
    fn sort_price_desc_starts_at_most_expensive() {
        let catalog = products();
        let result = filter_products(&catalog, &params(|p| p.sort_by = Some(SortKey::PriceDesc)));
        assert_eq!(result[0].price, 19999);
    }

    #[test]
    fn sort_rating_puts_best_rated_first() {
        let catalog = products();
        let result = filter_products(&catalog, &params(|p| p.sort_by = Some(SortKey::Rating)));

        assert_eq!(result[0].id, "supplements-1"); // 4.9
        let rating_of = |id: &str| {
            result
                .iter()
                .position(|p| p.id == id)
                .expect("produkt ma być w wyniku")
        };
        assert!(rating_of("supplements-1") < rating_of("haircare-1")); // 4.9 przed 4.6
    }

    #[test]
    fn sort_rating_is_stable_for_ties() {
        // skincare-1 i medical-1 mają po 4.8 - kolejność katalogowa zostaje.
        let catalog = products();
        let result = filter_products(&catalog, &params(|p| p.sort_by = Some(SortKey::Rating)));
        let position = |id: &str| result.iter().position(|p| p.id == id).unwrap();
        assert!(position("skincare-1") < position("medical-1"));
    }

    #[test]
    fn sort_newest_uses_creation_timestamp_descending() {
        let catalog = products();
        let result = filter_products(&catalog, &params(|p| p.sort_by = Some(SortKey::Newest)));
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "medical-1",
                "supplements-1",
                "haircare-1",
                "skincare-2",
                "skincare-1"
            ]
        );
    }

    #[test]
    fn distributor_only_toggle_restricts_when_on() {
        let catalog = products();

        let all = filter_products(&catalog, &params(|p| p.distributor_only = Some(false)));
        assert_eq!(all.len(), catalog.len());

        let restricted = filter_products(&catalog, &params(|p| p.distributor_only = Some(true)));
        assert_eq!(restricted.len(), 1);
        assert!(restricted[0].is_distributor_only);
    }

    #[test]
    fn conjunction_of_all_filters_can_be_empty() {
        let catalog = products();
        let result = filter_products(
            &catalog,
            &params(|p| {
                p.search = Some("vitamin".into());
                p.category = Some("hair-care".into());
            }),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn unknown_category_value_passes_everything_through() {
        let catalog = products();
        let result = filter_products(&catalog, &params(|p| p.category = Some("gadgets".into())));
        assert_eq!(result.len(), catalog.len());
    }
}
