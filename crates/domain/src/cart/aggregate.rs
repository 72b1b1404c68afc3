//! Cart aggregate implementation.

use chrono::{DateTime, Utc};
use common::{CartId, CartItemId, ProductId, UserId};
use rust_decimal::Decimal;

use super::{CartError, CartItem};

/// Cart aggregate root.
///
/// Owns the item collection for a single user. Product IDs are unique within
/// a cart: adding a product that is already present merges quantities instead
/// of appending a duplicate line.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    id: CartId,
    user_id: UserId,
    items: Vec<CartItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl Cart {
    /// Creates a new empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: CartId::new(),
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Reconstructs a cart from its persisted representation.
    pub fn restore(
        id: CartId,
        user_id: UserId,
        items: Vec<CartItem>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        version: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            items,
            created_at,
            updated_at,
            version,
        }
    }

    /// Adds a product to the cart.
    ///
    /// If a line for the product already exists, its quantity is increased by
    /// `quantity`; otherwise a new line is appended.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
        image_url: impl Into<String>,
    ) -> Result<(), CartError> {
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let merged = existing.quantity.saturating_add(quantity);
            existing.update_quantity(merged)?;
            self.updated_at = Utc::now();
            return Ok(());
        }

        let item = CartItem::new(product_id, name, price, quantity, image_url)?;
        self.items.push(item);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces the quantity of an existing line.
    pub fn update_item_quantity(
        &mut self,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<(), CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(CartError::ItemNotFound { item_id })?;
        item.update_quantity(quantity)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Removes a line, preserving the order of the remaining lines.
    pub fn remove_item(&mut self, item_id: CartItemId) -> Result<(), CartError> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or(CartError::ItemNotFound { item_id })?;
        self.items.remove(pos);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }

    /// Returns a line by its ID.
    pub fn get_item(&self, item_id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Sum of quantities over all lines.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of price × quantity over all lines.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn id(&self) -> CartId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Persistence version for optimistic concurrency.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(cart: &mut Cart, product_id: ProductId, cents: i64, quantity: u32) {
        cart.add_item(
            product_id,
            "Widget",
            Decimal::new(cents, 2),
            quantity,
            "https://example.com/widget.jpg",
        )
        .unwrap();
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new(UserId::new());
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.version(), 0);
    }

    #[test]
    fn add_item_appends_line() {
        let mut cart = Cart::new(UserId::new());
        add(&mut cart, ProductId::new(), 1000, 2);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.subtotal(), Decimal::new(2000, 2));
    }

    #[test]
    fn adding_same_product_merges_quantity() {
        let mut cart = Cart::new(UserId::new());
        let product_id = ProductId::new();

        // Spec scenario: 10.00 x 2 then the same product x 1 again.
        add(&mut cart, product_id, 1000, 2);
        assert_eq!(cart.subtotal(), Decimal::new(2000, 2));
        assert_eq!(cart.total_items(), 2);

        add(&mut cart, product_id, 1000, 1);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.subtotal(), Decimal::new(3000, 2));
    }

    #[test]
    fn add_item_rejects_zero_quantity() {
        let mut cart = Cart::new(UserId::new());
        let result = cart.add_item(ProductId::new(), "Widget", Decimal::ONE, 0, "");
        assert!(matches!(result, Err(CartError::InvalidQuantity { .. })));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_item_rejects_negative_price() {
        let mut cart = Cart::new(UserId::new());
        let result = cart.add_item(ProductId::new(), "Widget", Decimal::new(-500, 2), 1, "");
        assert!(matches!(result, Err(CartError::NegativePrice { .. })));
    }

    #[test]
    fn update_item_quantity() {
        let mut cart = Cart::new(UserId::new());
        add(&mut cart, ProductId::new(), 1000, 2);
        let item_id = cart.items()[0].id;

        cart.update_item_quantity(item_id, 5).unwrap();
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.subtotal(), Decimal::new(5000, 2));
    }

    #[test]
    fn update_unknown_item_fails() {
        let mut cart = Cart::new(UserId::new());
        let result = cart.update_item_quantity(CartItemId::new(), 2);
        assert!(matches!(result, Err(CartError::ItemNotFound { .. })));
    }

    #[test]
    fn update_to_zero_quantity_fails() {
        let mut cart = Cart::new(UserId::new());
        add(&mut cart, ProductId::new(), 1000, 2);
        let item_id = cart.items()[0].id;

        let result = cart.update_item_quantity(item_id, 0);
        assert!(matches!(result, Err(CartError::InvalidQuantity { .. })));
        // The line is untouched.
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn remove_item_preserves_order() {
        let mut cart = Cart::new(UserId::new());
        let p1 = ProductId::new();
        let p2 = ProductId::new();
        let p3 = ProductId::new();
        add(&mut cart, p1, 100, 1);
        add(&mut cart, p2, 200, 1);
        add(&mut cart, p3, 300, 1);

        let middle = cart.items()[1].id;
        cart.remove_item(middle).unwrap();

        let products: Vec<_> = cart.items().iter().map(|i| i.product_id).collect();
        assert_eq!(products, vec![p1, p3]);
    }

    #[test]
    fn remove_unknown_item_fails() {
        let mut cart = Cart::new(UserId::new());
        let result = cart.remove_item(CartItemId::new());
        assert!(matches!(result, Err(CartError::ItemNotFound { .. })));
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new(UserId::new());
        add(&mut cart, ProductId::new(), 1000, 2);
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn subtotal_sums_across_lines() {
        let mut cart = Cart::new(UserId::new());
        add(&mut cart, ProductId::new(), 1050, 2); // 21.00
        add(&mut cart, ProductId::new(), 333, 3); // 9.99
        assert_eq!(cart.subtotal(), Decimal::new(3099, 2));
        assert_eq!(cart.total_items(), 5);
    }
}
