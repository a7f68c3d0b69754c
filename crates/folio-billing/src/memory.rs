//! # In-Memory Backend
//!
//! A single-process stand-in for the bookshop backend. Implements every
//! port, so the checkout pipeline runs end to end without a network.
//!
//! ## Commit Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit(invoice)                                                        │
//! │    1. duplicate id or invoice number ──────────► Rejected (409)        │
//! │    2. unknown customer ────────────────────────► Rejected (404)        │
//! │    3. any book unknown or short on stock ──────► Rejected (409)        │
//! │    4. decrement stock, store invoice, assign invoice_id                │
//! │                                                                         │
//! │  Steps 1-4 run under one write lock: either everything is applied      │
//! │  or nothing is.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invoices are stored as submitted. The persisted total always equals the
//! computed one.
//!
//! Transport failures can be injected with [`MemoryBackend::fail_next_reads`]
//! and [`MemoryBackend::fail_next_submits`].

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use folio_core::{Book, BookId, Customer, CustomerId, Invoice, InvoiceNumber, StockSnapshot};

use crate::error::{BillingError, BillingResult};
use crate::ports::{
    CommittedInvoice, CustomerDirectory, Inventory, InvoiceStore, SubmissionReceipt,
};

#[derive(Debug, Default)]
struct MemoryState {
    customers: BTreeMap<CustomerId, Customer>,
    books: BTreeMap<BookId, Book>,
    invoices: Vec<CommittedInvoice>,
    next_invoice_id: i64,
}

/// Customers, catalog and invoices held in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    read_failures: AtomicU32,
    submit_failures: AtomicU32,
    submit_calls: AtomicU32,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend seeded with a catalog and customer list.
    pub fn with_catalog(
        books: impl IntoIterator<Item = Book>,
        customers: impl IntoIterator<Item = Customer>,
    ) -> Self {
        let state = MemoryState {
            customers: customers.into_iter().map(|c| (c.id, c)).collect(),
            books: books.into_iter().map(|b| (b.id, b)).collect(),
            ..MemoryState::default()
        };
        MemoryBackend {
            state: RwLock::new(state),
            ..Self::default()
        }
    }

    pub async fn insert_book(&self, book: Book) {
        self.state.write().await.books.insert(book.id, book);
    }

    pub async fn insert_customer(&self, customer: Customer) {
        self.state.write().await.customers.insert(customer.id, customer);
    }

    /// Overwrites the stock of a known book. Returns false if the book is unknown.
    pub async fn set_stock(&self, book_id: BookId, quantity: i64) -> bool {
        match self.state.write().await.books.get_mut(&book_id) {
            Some(book) => {
                book.stock_quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub async fn stock(&self, book_id: BookId) -> Option<i64> {
        self.state.read().await.books.get(&book_id).map(|b| b.stock_quantity)
    }

    /// Number of committed invoices. Not subject to injected failures.
    pub async fn invoice_count(&self) -> usize {
        self.state.read().await.invoices.len()
    }

    /// Makes the next `n` reads fail with [`BillingError::Unavailable`].
    pub fn fail_next_reads(&self, n: u32) {
        self.read_failures.store(n, Ordering::SeqCst);
    }

    /// Makes the next `n` submissions fail with [`BillingError::Unavailable`].
    pub fn fail_next_submits(&self, n: u32) {
        self.submit_failures.store(n, Ordering::SeqCst);
    }

    /// Number of times `submit` has been called, successful or not.
    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> BillingResult<()> {
        if take_one(&self.read_failures) {
            return Err(BillingError::Unavailable("connection reset by peer".into()));
        }
        Ok(())
    }
}

/// Decrements `counter` if positive. Returns true if it did.
fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn rejected(status: u16, message: impl Into<String>) -> BillingError {
    BillingError::Rejected {
        status: Some(status),
        message: message.into(),
    }
}

// =============================================================================
// Port Implementations
// =============================================================================

#[async_trait]
impl CustomerDirectory for MemoryBackend {
    async fn customer(&self, id: CustomerId) -> BillingResult<Option<Customer>> {
        self.check_read()?;
        Ok(self.state.read().await.customers.get(&id).cloned())
    }

    async fn customers(&self) -> BillingResult<Vec<Customer>> {
        self.check_read()?;
        Ok(self.state.read().await.customers.values().cloned().collect())
    }
}

#[async_trait]
impl Inventory for MemoryBackend {
    async fn book(&self, id: BookId) -> BillingResult<Option<Book>> {
        self.check_read()?;
        Ok(self.state.read().await.books.get(&id).cloned())
    }

    async fn stock_snapshot(&self, book_ids: &[BookId]) -> BillingResult<StockSnapshot> {
        self.check_read()?;
        let state = self.state.read().await;
        Ok(book_ids
            .iter()
            .filter_map(|id| state.books.get(id).map(|b| (b.id, b.stock_quantity)))
            .collect())
    }
}

#[async_trait]
impl InvoiceStore for MemoryBackend {
    async fn submit(&self, invoice: &Invoice) -> BillingResult<SubmissionReceipt> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if take_one(&self.submit_failures) {
            return Err(BillingError::Unavailable("connection reset by peer".into()));
        }

        let mut state = self.state.write().await;

        if state.invoices.iter().any(|existing| {
            existing.invoice.id() == invoice.id()
                || existing.invoice.invoice_number() == invoice.invoice_number()
        }) {
            warn!(invoice_number = %invoice.invoice_number(), "Duplicate invoice rejected");
            return Err(rejected(
                409,
                format!("Invoice {} already exists", invoice.invoice_number()),
            ));
        }

        if !state.customers.contains_key(&invoice.customer_id()) {
            return Err(rejected(
                404,
                format!("Customer {} not found", invoice.customer_id()),
            ));
        }

        let mut needed: Vec<(BookId, i64)> = Vec::new();
        for item in invoice.items() {
            match needed.iter_mut().find(|(id, _)| *id == item.book_id) {
                Some(entry) => entry.1 += item.quantity,
                None => needed.push((item.book_id, item.quantity)),
            }
        }

        for (book_id, quantity) in &needed {
            let book = state
                .books
                .get(book_id)
                .ok_or_else(|| rejected(409, format!("Book {book_id} not found")))?;
            if book.stock_quantity < *quantity {
                warn!(
                    book_id,
                    available = book.stock_quantity,
                    requested = quantity,
                    "Insufficient stock at commit"
                );
                return Err(rejected(
                    409,
                    format!(
                        "Insufficient stock for '{}'. Available: {}, requested: {}",
                        book.title, book.stock_quantity, quantity
                    ),
                ));
            }
        }

        for (book_id, quantity) in &needed {
            if let Some(book) = state.books.get_mut(book_id) {
                book.stock_quantity -= quantity;
                debug!(book_id, remaining = book.stock_quantity, "Stock decremented");
            }
        }

        state.next_invoice_id += 1;
        let receipt = SubmissionReceipt {
            invoice_id: state.next_invoice_id,
            invoice_number: invoice.invoice_number().clone(),
            total_amount: invoice.total_amount(),
        };
        state.invoices.push(CommittedInvoice {
            invoice: invoice.clone(),
            receipt: receipt.clone(),
        });

        info!(
            invoice_id = receipt.invoice_id,
            invoice_number = %invoice.invoice_number(),
            total = %invoice.total_amount(),
            "Invoice committed"
        );

        Ok(receipt)
    }

    async fn invoice_by_number(
        &self,
        number: &InvoiceNumber,
    ) -> BillingResult<Option<CommittedInvoice>> {
        self.check_read()?;
        Ok(self
            .state
            .read()
            .await
            .invoices
            .iter()
            .find(|c| c.invoice.invoice_number() == number)
            .cloned())
    }

    async fn invoices_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> BillingResult<Vec<CommittedInvoice>> {
        self.check_read()?;
        Ok(self
            .state
            .read()
            .await
            .invoices
            .iter()
            .filter(|c| c.invoice.customer_id() == customer_id)
            .cloned()
            .collect())
    }

    async fn invoices(&self) -> BillingResult<Vec<CommittedInvoice>> {
        self.check_read()?;
        Ok(self.state.read().await.invoices.clone())
    }
}
