// src/store.rs
//
// Stan sesji sklepu: koszyk, zalogowany użytkownik, motyw i język.
// To jest dokładnie ten rekord, który trafia do lokalnego pliku stanu -
// jedna mutowalna struktura, wstrzykiwana przez AppState zamiast
// globalnego singletona.

use serde::{Deserialize, Serialize};

use crate::models::{CartDetailsResponse, CartItem, Product, Role, Theme, User};

/// Nazwa klucza, pod którym rekord jest zapisywany w pliku stanu.
pub const STORE_KEY: &str = "dermabeauty-store";

fn default_locale() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStore {
    #[serde(default)]
    pub cart: Vec<CartItem>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore {
            cart: Vec::new(),
            user: None,
            theme: Theme::Light,
            locale: default_locale(),
        }
    }
}

impl SessionStore {
    // --- OPERACJE NA KOSZYKU ---

    /// Dodaje produkt do koszyka. Istniejąca pozycja dostaje zwiększoną
    /// ilość, nowa ląduje na końcu listy. Górnego limitu nie ma.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) {
        if let Some(item) = self
            .cart
            .iter_mut()
            .find(|item| item.product.id == product.id)
        {
            item.quantity += quantity;
        } else {
            self.cart.push(CartItem {
                product: product.clone(),
                quantity,
            });
        }
    }

    /// Usuwa pozycję koszyka. Nieznane id to ciche no-op.
    pub fn remove_from_cart(&mut self, product_id: &str) {
        self.cart.retain(|item| item.product.id != product_id);
    }

    /// Ustawia ilość bezwzględnie (nie addytywnie); wartość <= 0 działa
    /// jak usunięcie pozycji. Nieznane id to ciche no-op.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(product_id);
            return;
        }
        if let Some(item) = self
            .cart
            .iter_mut()
            .find(|item| item.product.id == product_id)
        {
            item.quantity = quantity as u32;
        }
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Cena jednostkowa produktu dla bieżącej sesji: cena dystrybutora
    /// tylko gdy użytkownik ma rolę dystrybutora I produkt ją definiuje.
    pub fn unit_price(&self, product: &Product) -> i64 {
        match (self.is_distributor(), product.distributor_price) {
            (true, Some(distributor_price)) => distributor_price,
            _ => product.price,
        }
    }

    /// Suma koszyka w centach, z cenami zależnymi od roli.
    pub fn cart_total(&self) -> i64 {
        self.cart
            .iter()
            .map(|item| self.unit_price(&item.product) * i64::from(item.quantity))
            .sum()
    }

    /// Łączna liczba sztuk (badge przy ikonie koszyka).
    pub fn cart_item_count(&self) -> u32 {
        self.cart.iter().map(|item| item.quantity).sum()
    }

    /// Pełny widok koszyka budowany w jednym przejściu.
    pub fn cart_details(&self) -> CartDetailsResponse {
        CartDetailsResponse {
            items: self.cart.clone(),
            total_items: self.cart_item_count(),
            total_price: self.cart_total(),
        }
    }

    // --- OPERACJE NA SESJI UŻYTKOWNIKA ---

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn clear_user(&mut self) {
        self.user = None;
    }

    pub fn is_distributor(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.role == Role::Distributor)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn set_locale(&mut self, locale: String) {
        self.locale = locale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn store_with_user(role: Role) -> SessionStore {
        let mut store = SessionStore::default();
        store.set_user(User {
            id: "user-1".to_string(),
            name: "Test User".to_string(),
            email: "test@dermabeauty.com".to_string(),
            role,
            is_logged_in: true,
        });
        store
    }

    fn serum() -> Product {
        // skincare-1: 8999 / dystrybutor 6599
        Catalog::seed().product("skincare-1").unwrap().clone()
    }

    fn product_without_distributor_price() -> Product {
        let mut product = serum();
        product.distributor_price = None;
        product
    }

    #[test]
    fn add_to_cart_merges_quantities_for_same_product() {
        let mut store = SessionStore::default();
        let product = serum();
        store.add_to_cart(&product, 2);
        store.add_to_cart(&product, 3);

        assert_eq!(store.cart.len(), 1);
        assert_eq!(store.cart[0].quantity, 5);
        assert_eq!(store.cart_item_count(), 5);
    }

    #[test]
    fn cart_total_uses_base_price_for_customers() {
        let mut store = store_with_user(Role::Customer);
        store.add_to_cart(&serum(), 2);
        assert_eq!(store.cart_total(), 2 * 8999);
    }

    #[test]
    fn cart_total_uses_base_price_for_anonymous_sessions() {
        let mut store = SessionStore::default();
        store.add_to_cart(&serum(), 1);
        assert_eq!(store.cart_total(), 8999);
    }

    #[test]
    fn cart_total_uses_distributor_price_for_distributors() {
        let mut store = store_with_user(Role::Distributor);
        store.add_to_cart(&serum(), 2);
        assert_eq!(store.cart_total(), 2 * 6599);
    }

    #[test]
    fn cart_total_falls_back_to_base_price_without_distributor_price() {
        let mut store = store_with_user(Role::Distributor);
        store.add_to_cart(&product_without_distributor_price(), 3);
        assert_eq!(store.cart_total(), 3 * 8999);
    }

    #[test]
    fn update_quantity_is_absolute() {
        let mut store = SessionStore::default();
        let product = serum();
        store.add_to_cart(&product, 4);
        store.update_quantity(&product.id, 2);
        assert_eq!(store.cart[0].quantity, 2);
    }

    #[test]
    fn update_quantity_to_zero_removes_the_item() {
        let mut store = store_with_user(Role::Customer);
        let product = serum();
        store.add_to_cart(&product, 2);
        store.update_quantity(&product.id, 0);

        assert!(store.cart.is_empty());
        assert_eq!(store.cart_total(), 0);
    }

    #[test]
    fn update_quantity_negative_behaves_like_remove() {
        let mut store = SessionStore::default();
        let product = serum();
        store.add_to_cart(&product, 2);
        store.update_quantity(&product.id, -5);
        assert!(store.cart.is_empty());
    }

    #[test]
    fn remove_of_unknown_id_is_a_noop() {
        let mut store = SessionStore::default();
        store.add_to_cart(&serum(), 1);
        let before = store.clone();

        store.remove_from_cart("missing-id");
        store.update_quantity("missing-id", 7);

        assert_eq!(store, before);
    }

    #[test]
    fn clear_cart_empties_everything() {
        let mut store = SessionStore::default();
        let catalog = Catalog::seed();
        for product in &catalog.products {
            store.add_to_cart(product, 1);
        }
        store.clear_cart();
        assert!(store.cart.is_empty());
        assert_eq!(store.cart_details().total_items, 0);
    }

    #[test]
    fn cart_details_reports_totals_in_one_view() {
        let mut store = store_with_user(Role::Distributor);
        let catalog = Catalog::seed();
        store.add_to_cart(catalog.product("skincare-1").unwrap(), 1); // 6599
        store.add_to_cart(catalog.product("haircare-1").unwrap(), 2); // 2 * 3299

        let details = store.cart_details();
        assert_eq!(details.total_items, 3);
        assert_eq!(details.total_price, 6599 + 2 * 3299);
        assert_eq!(details.items.len(), 2);
    }

    #[test]
    fn logout_switches_totals_back_to_base_prices() {
        let mut store = store_with_user(Role::Distributor);
        store.add_to_cart(&serum(), 1);
        assert_eq!(store.cart_total(), 6599);

        store.clear_user();
        assert_eq!(store.cart_total(), 8999);
    }

    #[test]
    fn persisted_record_round_trips_through_json() {
        let mut store = store_with_user(Role::Distributor);
        let catalog = Catalog::seed();
        store.add_to_cart(catalog.product("skincare-2").unwrap(), 3);
        store.add_to_cart(catalog.product("supplements-1").unwrap(), 1);
        store.set_theme(Theme::Dark);
        store.set_locale("ar".to_string());

        let json = serde_json::to_string(&store).unwrap();
        let rehydrated: SessionStore = serde_json::from_str(&json).unwrap();

        assert_eq!(rehydrated, store);
        assert_eq!(rehydrated.cart_total(), store.cart_total());
    }
}
