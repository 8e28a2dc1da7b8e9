// src/catalog.rs
//
// Statyczny katalog sklepu. Dane są wbudowane w binarkę, ładowane raz
// przy starcie i nigdy nie mutowane - filtrowanie zawsze pracuje na
// pełnej, niezmiennej liście.

use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;

use crate::models::{Category, Office, Product, Promotion};

pub static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::seed);

#[derive(Debug)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub promotions: Vec<Promotion>,
    pub offices: Vec<Office>,
}

impl Catalog {
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn promotion(&self, promotion_id: &str) -> Option<&Promotion> {
        self.promotions.iter().find(|p| p.id == promotion_id)
    }

    /// Pierwsze cztery produkty katalogu trafiają na stronę główną.
    pub fn featured(&self) -> &[Product] {
        &self.products[..self.products.len().min(4)]
    }

    /// Unikalne marki w kolejności pierwszego wystąpienia (lista do selecta).
    pub fn brands(&self) -> Vec<&str> {
        let mut brands: Vec<&str> = Vec::new();
        for product in &self.products {
            if !brands.contains(&product.brand.as_str()) {
                brands.push(&product.brand);
            }
        }
        brands
    }

    pub fn seed() -> Self {
        let now = Utc::now();
        Catalog {
            products: seed_products(),
            promotions: seed_promotions(now),
            offices: seed_offices(),
        }
    }
}

fn product_created_at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    // Daty dodania do katalogu są częścią danych, nie zegara procesu.
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: "skincare-1".to_string(),
            name: "Vitamin C Brightening Serum".to_string(),
            description:
                "Advanced vitamin C serum with 20% L-ascorbic acid for radiant, even-toned skin."
                    .to_string(),
            price: 8999,
            distributor_price: Some(6599),
            images: vec![
                "https://images.pexels.com/photos/5938567/pexels-photo-5938567.jpeg".to_string(),
                "https://images.pexels.com/photos/5938568/pexels-photo-5938568.jpeg".to_string(),
            ],
            category: Category::SkinCare,
            brand: "DermaClinical".to_string(),
            in_stock: true,
            rating: 4.8,
            reviews: 234,
            tags: vec![
                "vitamin-c".to_string(),
                "brightening".to_string(),
                "anti-aging".to_string(),
                "serum".to_string(),
            ],
            is_distributor_only: false,
            created_at: product_created_at(2024, 1, 15),
        },
        Product {
            id: "skincare-2".to_string(),
            name: "Hyaluronic Acid Moisturizer".to_string(),
            description: "Ultra-hydrating moisturizer with hyaluronic acid for plump, dewy skin."
                .to_string(),
            price: 7699,
            distributor_price: Some(5699),
            images: vec![
                "https://images.pexels.com/photos/5938569/pexels-photo-5938569.jpeg".to_string(),
                "https://images.pexels.com/photos/5938570/pexels-photo-5938570.jpeg".to_string(),
            ],
            category: Category::SkinCare,
            brand: "HydraLux".to_string(),
            in_stock: true,
            rating: 4.7,
            reviews: 189,
            tags: vec![
                "hyaluronic-acid".to_string(),
                "moisturizer".to_string(),
                "hydrating".to_string(),
            ],
            is_distributor_only: false,
            created_at: product_created_at(2024, 3, 2),
        },
        Product {
            id: "haircare-1".to_string(),
            name: "Keratin Repair Shampoo".to_string(),
            description:
                "Professional-grade keratin shampoo for damaged and chemically treated hair."
                    .to_string(),
            price: 4599,
            distributor_price: Some(3299),
            images: vec![
                "https://images.pexels.com/photos/4465124/pexels-photo-4465124.jpeg".to_string(),
                "https://images.pexels.com/photos/4465125/pexels-photo-4465125.jpeg".to_string(),
            ],
            category: Category::HairCare,
            brand: "KeratinPro".to_string(),
            in_stock: true,
            rating: 4.6,
            reviews: 156,
            tags: vec![
                "keratin".to_string(),
                "repair".to_string(),
                "shampoo".to_string(),
                "damaged-hair".to_string(),
            ],
            is_distributor_only: false,
            created_at: product_created_at(2024, 4, 20),
        },
        Product {
            id: "supplements-1".to_string(),
            name: "Collagen Beauty Complex".to_string(),
            description:
                "Marine collagen supplement with biotin and vitamin E for healthy skin, hair, and nails."
                    .to_string(),
            price: 6599,
            distributor_price: Some(4899),
            images: vec![
                "https://images.pexels.com/photos/4202325/pexels-photo-4202325.jpeg".to_string(),
                "https://images.pexels.com/photos/4202326/pexels-photo-4202326.jpeg".to_string(),
            ],
            category: Category::Supplements,
            brand: "NutriBeauty".to_string(),
            in_stock: true,
            rating: 4.9,
            reviews: 312,
            tags: vec![
                "collagen".to_string(),
                "beauty".to_string(),
                "supplement".to_string(),
                "marine".to_string(),
            ],
            is_distributor_only: false,
            created_at: product_created_at(2024, 6, 8),
        },
        Product {
            id: "medical-1".to_string(),
            name: "Professional Microdermabrasion Treatment".to_string(),
            description: "In-clinic microdermabrasion service performed by certified aestheticians."
                .to_string(),
            price: 19999,
            distributor_price: Some(14999),
            images: vec![
                "https://images.pexels.com/photos/3985299/pexels-photo-3985299.jpeg".to_string(),
                "https://images.pexels.com/photos/3985300/pexels-photo-3985300.jpeg".to_string(),
            ],
            category: Category::MedicalServices,
            brand: "MedSpa Pro".to_string(),
            in_stock: true,
            rating: 4.8,
            reviews: 89,
            tags: vec![
                "microdermabrasion".to_string(),
                "professional".to_string(),
                "treatment".to_string(),
            ],
            is_distributor_only: true,
            created_at: product_created_at(2024, 7, 1),
        },
    ]
}

fn seed_promotions(now: DateTime<Utc>) -> Vec<Promotion> {
    vec![
        Promotion {
            id: "promo-1".to_string(),
            title: "Summer Skincare Sale".to_string(),
            description: "Save 25% on all skincare products this summer!".to_string(),
            image: "https://images.pexels.com/photos/5938571/pexels-photo-5938571.jpeg".to_string(),
            discount: 25,
            code: "SUMMER25".to_string(),
            expires_at: now + Duration::days(7),
            is_active: true,
        },
        Promotion {
            id: "promo-2".to_string(),
            title: "Hair Care Bundle".to_string(),
            description: "Buy 2 hair care products and get 1 free!".to_string(),
            image: "https://images.pexels.com/photos/4465127/pexels-photo-4465127.jpeg".to_string(),
            discount: 33,
            code: "HAIR2FOR1".to_string(),
            expires_at: now + Duration::days(14),
            is_active: true,
        },
        Promotion {
            id: "promo-3".to_string(),
            title: "New Customer Discount".to_string(),
            description: "First-time customers get 15% off their entire order!".to_string(),
            image: "https://images.pexels.com/photos/5938572/pexels-photo-5938572.jpeg".to_string(),
            discount: 15,
            code: "WELCOME15".to_string(),
            expires_at: now + Duration::days(30),
            is_active: true,
        },
    ]
}

fn seed_offices() -> Vec<Office> {
    vec![
        Office {
            id: "office-1".to_string(),
            name: "Headquarters - New York".to_string(),
            address: "123 Beauty Ave, New York, NY 10001".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            email: "ny@dermabeauty.com".to_string(),
            latitude: 40.7128,
            longitude: -74.0060,
        },
        Office {
            id: "office-2".to_string(),
            name: "West Coast Office - Los Angeles".to_string(),
            address: "456 Wellness Blvd, Los Angeles, CA 90210".to_string(),
            phone: "+1 (555) 987-6543".to_string(),
            email: "la@dermabeauty.com".to_string(),
            latitude: 34.0522,
            longitude: -118.2437,
        },
        Office {
            id: "office-3".to_string(),
            name: "Distribution Center - Chicago".to_string(),
            address: "789 Commerce St, Chicago, IL 60601".to_string(),
            phone: "+1 (555) 456-7890".to_string(),
            email: "chicago@dermabeauty.com".to_string(),
            latitude: 41.8781,
            longitude: -87.6298,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn product_ids_are_unique() {
        let catalog = Catalog::seed();
        let ids: HashSet<&str> = catalog.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.products.len());
    }

    #[test]
    fn distributor_prices_are_lower_than_base_prices() {
        let catalog = Catalog::seed();
        for product in &catalog.products {
            if let Some(distributor_price) = product.distributor_price {
                assert!(
                    distributor_price < product.price,
                    "produkt {} ma cenę dystrybutora >= ceny bazowej",
                    product.id
                );
            }
        }
    }

    #[test]
    fn featured_returns_at_most_four_products() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.featured().len(), 4);
        assert_eq!(catalog.featured()[0].id, "skincare-1");
    }

    #[test]
    fn brands_are_distinct_and_in_catalog_order() {
        let catalog = Catalog::seed();
        assert_eq!(
            catalog.brands(),
            vec![
                "DermaClinical",
                "HydraLux",
                "KeratinPro",
                "NutriBeauty",
                "MedSpa Pro"
            ]
        );
    }

    #[test]
    fn lookup_by_id_finds_existing_and_rejects_unknown() {
        let catalog = Catalog::seed();
        assert!(catalog.product("haircare-1").is_some());
        assert!(catalog.product("nope").is_none());
        assert!(catalog.promotion("promo-2").is_some());
        assert!(catalog.promotion("promo-99").is_none());
    }
}
