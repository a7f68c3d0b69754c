//! # Cart
//!
//! The transient bill being built at the counter.
//!
//! The cart is a plain value owned by the caller (one per console session)
//! and passed into the pricing functions. Nothing here is shared or locked.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Console Action          Cart Method              Cart State Change     │
//! │  ──────────────          ───────────              ─────────────────     │
//! │  Pick Book ─────────────► add_book() ───────────► push / qty += n       │
//! │  Change Quantity ───────► update_quantity() ────► qty = n (0 removes)   │
//! │  Change Discount ───────► set_discount() ───────► discount = d          │
//! │  Click Remove ──────────► remove() ─────────────► line removed          │
//! │  Submit succeeded ──────► clear() ──────────────► empty                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::pricing::{compute_invoice_totals, InvoiceTotals};
use crate::types::{Book, BookId, DiscountPercent, LineItem, TaxRate};
use crate::validation::{
    validate_cart_size, validate_discount, validate_quantity, validate_unit_price,
};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Ordered line items awaiting submission.
///
/// ## Invariants
/// - Lines are unique by `book_id` (adding the same book raises its quantity)
/// - Every quantity is in `1..=999`
/// - At most 100 lines
///
/// Deserializing replays every line through the same checks as `add_book`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CartRecord")]
pub struct Cart {
    items: Vec<LineItem>,
}

/// Unchecked wire shape of a `Cart`.
#[derive(Deserialize)]
struct CartRecord {
    items: Vec<LineItem>,
}

impl TryFrom<CartRecord> for Cart {
    type Error = CoreError;

    fn try_from(record: CartRecord) -> CoreResult<Self> {
        let mut cart = Cart::new();
        for item in record.items {
            cart.add_line(item)?;
        }
        Ok(cart)
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` copies of `book`, or raises the quantity if the book is
    /// already in the cart. The price and title are frozen on first add.
    pub fn add_book(&mut self, book: &Book, quantity: i64) -> CoreResult<()> {
        self.add_line(LineItem::from_book(book, quantity))
    }

    fn add_line(&mut self, line: LineItem) -> CoreResult<()> {
        validate_quantity(line.quantity)?;
        validate_unit_price(line.unit_price)?;
        validate_discount(line.discount_percent)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.book_id == line.book_id) {
            let new_qty = item.quantity + line.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if validate_cart_size(self.items.len()).is_err() {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }

        self.items.push(line);
        Ok(())
    }

    /// Sets the quantity of a line. Zero removes it.
    pub fn update_quantity(&mut self, book_id: BookId, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove(book_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        self.line_mut(book_id)?.quantity = quantity;
        Ok(())
    }

    /// Sets the discount of a line.
    pub fn set_discount(&mut self, book_id: BookId, discount: DiscountPercent) -> CoreResult<()> {
        validate_discount(discount)?;
        self.line_mut(book_id)?.discount_percent = discount;
        Ok(())
    }

    pub fn remove(&mut self, book_id: BookId) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.book_id != book_id);

        if self.items.len() == initial_len {
            Err(CoreError::BookNotInCart(book_id))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn line(&self, book_id: BookId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.book_id == book_id)
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total number of copies across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Running totals for display while the bill is being built.
    pub fn totals(&self, apply_tax: bool, tax_rate: TaxRate) -> CoreResult<InvoiceTotals> {
        compute_invoice_totals(&self.items, apply_tax, tax_rate)
    }

    fn line_mut(&mut self, book_id: BookId) -> CoreResult<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|i| i.book_id == book_id)
            .ok_or(CoreError::BookNotInCart(book_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn test_book(id: BookId, price_cents: i64) -> Book {
        Book {
            id,
            isbn: None,
            title: format!("Book {id}"),
            author: None,
            unit_price: Money::from_cents(price_cents),
            stock_quantity: 50,
        }
    }

    #[test]
    fn test_cart_add_book() {
        let mut cart = Cart::new();
        cart.add_book(&test_book(1, 999), 2).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        let totals = cart.totals(false, TaxRate::zero()).unwrap();
        assert_eq!(totals.subtotal.cents(), 1998);
    }

    #[test]
    fn test_cart_add_same_book_increases_quantity() {
        let mut cart = Cart::new();
        let book = test_book(1, 999);

        cart.add_book(&book, 2).unwrap();
        cart.add_book(&book, 3).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_quantity_cap() {
        let mut cart = Cart::new();
        let book = test_book(1, 100);
        cart.add_book(&book, 998).unwrap();

        let err = cart.add_book(&book, 2).unwrap_err();
        assert_eq!(
            err,
            CoreError::QuantityTooLarge {
                requested: 1000,
                max: MAX_ITEM_QUANTITY
            }
        );
        assert_eq!(cart.total_quantity(), 998);
    }

    #[test]
    fn test_cart_line_cap() {
        let mut cart = Cart::new();
        for id in 0..MAX_CART_ITEMS as i64 {
            cart.add_book(&test_book(id, 100), 1).unwrap();
        }
        let err = cart.add_book(&test_book(1_000, 100), 1).unwrap_err();
        assert_eq!(err, CoreError::CartTooLarge { max: MAX_CART_ITEMS });
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_book(&test_book(1, 100), 2).unwrap();
        cart.update_quantity(1, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_unknown_book() {
        let mut cart = Cart::new();
        assert_eq!(cart.update_quantity(9, 2).unwrap_err(), CoreError::BookNotInCart(9));
        assert_eq!(cart.remove(9).unwrap_err(), CoreError::BookNotInCart(9));
    }

    #[test]
    fn test_update_negative_quantity_rejected() {
        let mut cart = Cart::new();
        cart.add_book(&test_book(1, 100), 2).unwrap();
        assert!(matches!(cart.update_quantity(1, -3), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_set_discount_feeds_totals() {
        let mut cart = Cart::new();
        cart.add_book(&test_book(1, 100_000), 2).unwrap();
        cart.set_discount(1, DiscountPercent::from_percent(10)).unwrap();

        let totals = cart.totals(true, TaxRate::from_bps(500)).unwrap();
        assert_eq!(totals.total_amount.cents(), 189_000);
        assert_eq!(cart.line(1).unwrap().discount_percent.bps(), 1_000);

        assert!(cart.set_discount(1, DiscountPercent::from_percent(150)).is_err());
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        let mut cart = Cart::new();
        cart.add_book(&test_book(1, 999), 2).unwrap();
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(serde_json::from_str::<Cart>(&json).unwrap(), cart);

        let duplicate = r#"{"items":[
            {"bookId":1,"title":"A","unitPrice":"1.00","quantity":2},
            {"bookId":1,"title":"A","unitPrice":"1.00","quantity":3}
        ]}"#;
        let merged: Cart = serde_json::from_str(duplicate).unwrap();
        assert_eq!(merged.item_count(), 1);
        assert_eq!(merged.total_quantity(), 5);

        let too_many = r#"{"items":[{"bookId":1,"title":"A","unitPrice":"1.00","quantity":1000}]}"#;
        assert!(serde_json::from_str::<Cart>(too_many).is_err());

        let zero = r#"{"items":[{"bookId":1,"title":"A","unitPrice":"1.00","quantity":0}]}"#;
        assert!(serde_json::from_str::<Cart>(zero).is_err());

        let bad_discount = r#"{"items":[
            {"bookId":1,"title":"A","unitPrice":"1.00","quantity":1,"discountPercent":"150"}
        ]}"#;
        assert!(serde_json::from_str::<Cart>(bad_discount).is_err());
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_book(&test_book(1, 999), 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }
}
