//! The session cart state machine and price breakdown.
//!
//! A [`Cart`] is an ordered collection of lines, unique by product id. It
//! lives only in the shopper's session: created empty, mutated by the cart
//! routes, cleared after a successful checkout, and discarded with the
//! session. Every mutation validates against the product stock snapshot
//! taken at the time of the call; stock may drift server-side afterwards
//! and is re-validated by the backend at checkout.
//!
//! All refusals are advisory: the operation returns a [`CartRefusal`]
//! describing the user-facing notification and the cart is left unchanged.
//! No mutation is ever partially applied, so there is nothing to roll back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CheckoutItem, Product, ProductId};

/// Flat shipping fee charged on any non-empty order.
#[must_use]
pub fn flat_shipping_fee() -> Decimal {
    Decimal::new(50, 0)
}

/// Tax rate applied to the subtotal (5%).
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// One cart line: a product snapshot plus the chosen quantity.
///
/// Invariant: `1 <= qty` and `qty <= product.stock` at the time of the
/// last mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub qty: u32,
}

impl CartLine {
    /// Line subtotal: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.qty)
    }
}

/// An advisory refusal from a cart mutation.
///
/// The cart is unchanged when one of these is returned; the caller turns
/// it into a toast notification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartRefusal {
    /// The product has no stock at all.
    #[error("Sorry, this item is out of stock.")]
    OutOfStock,

    /// Adding one more would exceed the available stock.
    #[error("You cannot add more, only {available} units are available.")]
    CannotAddMore { available: i32 },

    /// The requested quantity exceeds the available stock.
    #[error("Only {available} units are available.")]
    StockLimit { available: i32 },

    /// The product has no line in the cart.
    #[error("That item is not in your cart.")]
    NotInCart,
}

/// Derived price breakdown for a cart (the order draft sent to checkout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    /// Totals for an empty cart: all zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            shipping: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// The shopping cart.
///
/// Lines keep insertion order and are unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The cart lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines (the cart badge count).
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.qty).sum()
    }

    /// Add one unit of `product` to the cart.
    ///
    /// Inserts a new line with `qty = 1`, or increments an existing line.
    /// The product snapshot on an existing line is refreshed so later
    /// stock checks see the latest values.
    ///
    /// # Errors
    ///
    /// Refuses with [`CartRefusal::OutOfStock`] when the product has no
    /// stock, or [`CartRefusal::CannotAddMore`] when the existing line
    /// already holds all available units. The cart is unchanged on refusal.
    pub fn add(&mut self, product: &Product) -> Result<(), CartRefusal> {
        if product.stock <= 0 {
            return Err(CartRefusal::OutOfStock);
        }

        if let Some(line) = self.line_mut(product.id) {
            if i64::from(line.qty) >= i64::from(product.stock) {
                return Err(CartRefusal::CannotAddMore {
                    available: product.stock,
                });
            }
            line.qty += 1;
            line.product = product.clone();
            return Ok(());
        }

        self.lines.push(CartLine {
            product: product.clone(),
            qty: 1,
        });
        Ok(())
    }

    /// Remove the line for `product_id`. No-op when absent.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product.id != product_id);
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity below 1 is equivalent to [`Cart::remove`].
    ///
    /// # Errors
    ///
    /// Refuses with [`CartRefusal::StockLimit`] when `new_qty` exceeds the
    /// line's stock snapshot, or [`CartRefusal::NotInCart`] when there is
    /// no line for `product_id`. The cart is unchanged on refusal.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        new_qty: u32,
    ) -> Result<(), CartRefusal> {
        let Some(line) = self.line_mut(product_id) else {
            return Err(CartRefusal::NotInCart);
        };

        if i64::from(new_qty) > i64::from(line.product.stock) {
            return Err(CartRefusal::StockLimit {
                available: line.product.stock,
            });
        }

        if new_qty < 1 {
            self.remove(product_id);
        } else {
            line.qty = new_qty;
        }
        Ok(())
    }

    /// Empty the cart. Called after a successful order placement.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Compute the price breakdown.
    ///
    /// Pure: `subtotal = Σ price·qty`, a flat shipping fee when the
    /// subtotal is positive, tax at 5% of the subtotal, and the grand
    /// total as the sum of all three.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        let subtotal: Decimal = self.lines.iter().map(CartLine::line_total).sum();
        let shipping = if subtotal > Decimal::ZERO {
            flat_shipping_fee()
        } else {
            Decimal::ZERO
        };
        let tax = subtotal * tax_rate();
        CartTotals {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// The cart contents as checkout line items.
    #[must_use]
    pub fn checkout_items(&self) -> Vec<CheckoutItem> {
        self.lines
            .iter()
            .map(|line| CheckoutItem {
                product_id: line.product.id,
                qty: line.qty,
            })
            .collect()
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CategoryId;

    fn product(id: i32, price: i64, stock: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(price, 0),
            stock,
            description: None,
            image: format!("/static/images/products/{id}.jpg"),
            category_id: CategoryId::new(1),
        }
    }

    #[test]
    fn test_add_out_of_stock_never_changes_cart() {
        let mut cart = Cart::new();
        let sold_out = product(1, 100, 0);

        assert_eq!(cart.add(&sold_out), Err(CartRefusal::OutOfStock));
        assert!(cart.is_empty());

        // Repeated attempts still leave the cart untouched.
        assert_eq!(cart.add(&sold_out), Err(CartRefusal::OutOfStock));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_inserts_then_increments() {
        let mut cart = Cart::new();
        let tee = product(1, 100, 3);

        cart.add(&tee).expect("first add");
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].qty, 1);

        cart.add(&tee).expect("second add");
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].qty, 2);
    }

    #[test]
    fn test_repeated_adds_never_exceed_stock() {
        let mut cart = Cart::new();
        let tee = product(1, 100, 3);

        for _ in 0..10 {
            let _ = cart.add(&tee);
        }

        assert_eq!(cart.lines()[0].qty, 3);
        assert_eq!(
            cart.add(&tee),
            Err(CartRefusal::CannotAddMore { available: 3 })
        );
        assert_eq!(cart.lines()[0].qty, 3);
    }

    #[test]
    fn test_add_keeps_lines_unique_by_product() {
        let mut cart = Cart::new();
        let tee = product(1, 100, 5);
        let jeans = product(2, 900, 2);

        cart.add(&tee).expect("add tee");
        cart.add(&jeans).expect("add jeans");
        cart.add(&tee).expect("add tee again");

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].product.id, ProductId::new(1));
        assert_eq!(cart.lines()[0].qty, 2);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100, 5)).expect("add");

        cart.remove(ProductId::new(99));
        assert_eq!(cart.lines().len(), 1);

        cart.remove(ProductId::new(1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_zero_is_remove() {
        let mut tracked = Cart::new();
        let mut removed = Cart::new();
        let tee = product(1, 100, 5);
        tracked.add(&tee).expect("add");
        removed.add(&tee).expect("add");

        tracked
            .update_quantity(ProductId::new(1), 0)
            .expect("update to zero");
        removed.remove(ProductId::new(1));

        assert_eq!(tracked, removed);
    }

    #[test]
    fn test_update_quantity_respects_stock() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100, 3)).expect("add");

        assert_eq!(
            cart.update_quantity(ProductId::new(1), 4),
            Err(CartRefusal::StockLimit { available: 3 })
        );
        assert_eq!(cart.lines()[0].qty, 1);

        cart.update_quantity(ProductId::new(1), 3)
            .expect("update within stock");
        assert_eq!(cart.lines()[0].qty, 3);
    }

    #[test]
    fn test_update_quantity_unknown_product() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.update_quantity(ProductId::new(1), 2),
            Err(CartRefusal::NotInCart)
        );
    }

    #[test]
    fn test_totals_worked_example() {
        // One item {price: 100, qty: 2}: 200 / 50 / 10 / 260.
        let mut cart = Cart::new();
        let tee = product(1, 100, 5);
        cart.add(&tee).expect("add");
        cart.add(&tee).expect("add");

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Decimal::new(200, 0));
        assert_eq!(totals.shipping, Decimal::new(50, 0));
        assert_eq!(totals.tax, Decimal::new(10, 0));
        assert_eq!(totals.total, Decimal::new(260, 0));
    }

    #[test]
    fn test_totals_is_pure() {
        let mut cart = Cart::new();
        cart.add(&product(1, 499, 5)).expect("add");
        cart.add(&product(2, 1299, 2)).expect("add");

        assert_eq!(cart.totals(), cart.totals());
    }

    #[test]
    fn test_empty_cart_pays_no_shipping() {
        assert_eq!(Cart::new().totals(), CartTotals::zero());
    }

    #[test]
    fn test_clear_then_totals_all_zero() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100, 5)).expect("add");
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.totals(), CartTotals::zero());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_checkout_items_mirrors_lines() {
        let mut cart = Cart::new();
        let tee = product(1, 100, 5);
        cart.add(&tee).expect("add");
        cart.add(&tee).expect("add");
        cart.add(&product(2, 900, 2)).expect("add");

        let items = cart.checkout_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id, ProductId::new(1));
        assert_eq!(items[0].qty, 2);
        assert_eq!(items[1].qty, 1);
    }

    #[test]
    fn test_fractional_prices_stay_exact() {
        let mut cart = Cart::new();
        let mut tee = product(1, 0, 5);
        tee.price = Decimal::new(19999, 2); // 199.99
        cart.add(&tee).expect("add");
        cart.add(&tee).expect("add");

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Decimal::new(39998, 2));
        assert_eq!(totals.tax, Decimal::new(199_990, 4)); // 19.999
        assert_eq!(totals.total, Decimal::new(4_699_790, 4)); // 469.979
    }
}
