// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use validator::Validate;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum Category {
    #[strum(serialize = "skin-care")]
    SkinCare,
    #[strum(serialize = "hair-care")]
    HairCare,
    #[strum(serialize = "supplements")]
    Supplements,
    #[strum(serialize = "medical-services")]
    MedicalServices,
}

impl Category {
    /// Etykieta do wyświetlenia w UI (wartość enum to slug z URL-i).
    pub fn label(&self) -> &'static str {
        match self {
            Category::SkinCare => "Skin Care",
            Category::HairCare => "Hair Care",
            Category::Supplements => "Supplements",
            Category::MedicalServices => "Medical Services",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Customer,
    Distributor,
    Admin,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

// Ceny trzymamy w centach (i64), formatowanie do dolarów dopiero przy renderowaniu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub distributor_price: Option<i64>,
    pub images: Vec<String>,
    pub category: Category,
    pub brand: String,
    pub in_stock: bool,
    pub rating: f32,
    pub reviews: u32,
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_distributor_only: bool,
    pub created_at: DateTime<Utc>,
}

/// Pozycja koszyka: produkt osadzony w całości, żeby zapisany stan
/// przetrwał restart bez dociągania danych z katalogu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_logged_in: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Promotion {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub discount: u8,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Promotion {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Etykieta odliczania w stylu "2d 4h left"; po terminie "Expired".
    pub fn time_left_label(&self, now: DateTime<Utc>) -> String {
        let distance = self.expires_at - now;
        if distance <= chrono::Duration::zero() {
            return "Expired".to_string();
        }
        let days = distance.num_days();
        let hours = distance.num_hours();
        let minutes = distance.num_minutes();
        if days > 0 {
            format!("{}d {}h left", days, hours - days * 24)
        } else if hours > 0 {
            format!("{}h {}m left", hours, minutes - hours * 60)
        } else {
            format!("{}m left", minutes)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Office {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
}

// --- STRUKTURY PAYLOAD DLA HANDLERÓW SESJI I KOSZYKA ---

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(length(min = 1, max = 100, message = "Display name is required"))]
    pub name: String,

    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,

    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartPayload {
    pub product_id: String,
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuantityPayload {
    pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetThemePayload {
    pub theme: Theme,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetLocalePayload {
    pub locale: String,
}

// --- STRUKTURY PAYLOAD DLA FORMULARZY ---

/// Wniosek o konto dystrybutora. Walidacja po stronie serwera, bo
/// sam formularz HTML to za mało.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DistributorApplicationPayload {
    #[validate(length(min = 1, max = 255, message = "Business name is required"))]
    pub business_name: String,

    #[validate(length(min = 1, max = 255, message = "Contact name is required"))]
    pub contact_name: String,

    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,

    #[validate(length(min = 1, max = 50, message = "Phone number is required"))]
    pub phone: String,

    #[validate(length(min = 1, max = 500, message = "Business address is required"))]
    pub address: String,

    #[validate(length(min = 1, max = 50, message = "Tax ID is required"))]
    pub tax_id: String,

    #[validate(length(max = 2000))]
    pub experience: Option<String>,

    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactMessagePayload {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "Subject is required"))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

// --- STRUKTURY ODPOWIEDZI API ---

#[derive(Debug, Serialize, Default)]
pub struct CartDetailsResponse {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: i64,
}

/// Wynik filtrowania katalogu. `total_matches` jest jawne, żeby pusty
/// wynik dało się odróżnić od braku odpowiedzi.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub total_matches: usize,
    pub data: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct PromotionPublic {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub time_left: String,
    pub expired: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    pub submission_id: uuid::Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;

    #[test]
    fn category_round_trips_through_slug() {
        assert_eq!(Category::SkinCare.to_string(), "skin-care");
        assert_eq!(
            Category::from_str("medical-services").unwrap(),
            Category::MedicalServices
        );
        assert!(Category::from_str("toys").is_err());
    }

    #[test]
    fn time_left_label_counts_down() {
        let now = Utc::now();
        let promo = Promotion {
            id: "promo-1".into(),
            title: "Test".into(),
            description: "".into(),
            image: "".into(),
            discount: 25,
            code: "TEST25".into(),
            expires_at: now + Duration::days(2) + Duration::hours(4),
            is_active: true,
        };
        assert_eq!(promo.time_left_label(now), "2d 4h left");
        assert!(!promo.is_expired_at(now));
    }

    #[test]
    fn time_left_label_switches_units_near_expiry() {
        let now = Utc::now();
        let mut promo = Promotion {
            id: "promo-1".into(),
            title: "Test".into(),
            description: "".into(),
            image: "".into(),
            discount: 25,
            code: "TEST25".into(),
            expires_at: now + Duration::hours(3) + Duration::minutes(30),
            is_active: true,
        };
        assert_eq!(promo.time_left_label(now), "3h 30m left");

        promo.expires_at = now + Duration::minutes(45);
        assert_eq!(promo.time_left_label(now), "45m left");

        promo.expires_at = now - Duration::minutes(1);
        assert_eq!(promo.time_left_label(now), "Expired");
        assert!(promo.is_expired_at(now));
    }

    #[test]
    fn distributor_application_requires_core_fields() {
        let application = DistributorApplicationPayload {
            business_name: "".into(),
            contact_name: "Jane Doe".into(),
            email: "not-an-email".into(),
            phone: "+1 555 123".into(),
            address: "123 Beauty Ave".into(),
            tax_id: "US-12345".into(),
            experience: None,
            message: None,
        };
        let errors = application.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("business_name"));
        assert!(errors.field_errors().contains_key("email"));
    }
}
