//! # Checkout Pipeline
//!
//! Turns the console's cart into a persisted invoice.
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          checkout(cart, request)                        │
//! │                                                                         │
//! │  1. empty cart? ─────────────────────────────► Core(EmptyCart)          │
//! │  2. customer selected? ──────────────────────► Core(MissingCustomer)    │
//! │  3. fetch customer        (read, retried) ───► CustomerNotFound         │
//! │  4. fetch stock snapshot  (read, retried)                               │
//! │  5. advisory stock check ────────────────────► StockUnavailable(issues) │
//! │  6. build invoice         (folio-core, pure) ► Core(InvalidInput)       │
//! │  7. submit                (ONCE, never retried) ► Rejected/Unavailable  │
//! │  8. clear cart, return outcome                                          │
//! │                                                                         │
//! │  Any failure before 8 leaves the cart exactly as it was.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## After Commit
//! Committed invoices are looked up by number, by customer, or all at once
//! (retried reads) and reprinted with the persisted total.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use folio_core::{
    build_invoice, validate_stock_availability, BookId, Cart, Cashier, Clock, CoreError, Customer,
    CustomerId, Invoice, InvoiceNumber, InvoiceOptions, InvoiceTotals, PaymentMethod, SystemClock,
};

use crate::config::BillingConfig;
use crate::error::{BillingError, BillingResult};
use crate::ports::{CommittedInvoice, CustomerDirectory, Inventory, InvoiceRenderer, InvoiceStore};
use crate::receipt::TextInvoiceRenderer;
use crate::retry::{with_retry, RetryPolicy};

// =============================================================================
// Request & Outcome
// =============================================================================

/// What the cashier chose on the submit form. Unset fields fall back to
/// the configured policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    pub cashier: Cashier,
    #[serde(default)]
    pub apply_tax: Option<bool>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutRequest {
    pub fn new(customer_id: CustomerId, cashier: Cashier) -> Self {
        CheckoutRequest {
            customer_id: Some(customer_id),
            cashier,
            apply_tax: None,
            payment_method: None,
            notes: None,
        }
    }

    pub fn with_tax(mut self, apply_tax: bool) -> Self {
        self.apply_tax = Some(apply_tax);
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// What a successful checkout returns: the invoice as submitted and the
/// backend's acknowledgement.
pub type CheckoutOutcome = CommittedInvoice;

// =============================================================================
// Checkout Service
// =============================================================================

/// Runs quotes, previews and submissions against the backend ports.
pub struct CheckoutService {
    customers: Arc<dyn CustomerDirectory>,
    inventory: Arc<dyn Inventory>,
    store: Arc<dyn InvoiceStore>,
    renderer: Arc<dyn InvoiceRenderer>,
    config: BillingConfig,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl CheckoutService {
    pub fn new(
        config: BillingConfig,
        customers: Arc<dyn CustomerDirectory>,
        inventory: Arc<dyn Inventory>,
        store: Arc<dyn InvoiceStore>,
        renderer: Arc<dyn InvoiceRenderer>,
    ) -> Self {
        CheckoutService {
            customers,
            inventory,
            store,
            renderer,
            retry: config.retry_policy(),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Service whose ports are all served by one backend, rendering with
    /// the configured text layout.
    pub fn with_backend<B>(config: BillingConfig, backend: Arc<B>) -> Self
    where
        B: CustomerDirectory + Inventory + InvoiceStore + 'static,
    {
        let renderer = Arc::new(TextInvoiceRenderer::from_config(&config));
        Self::new(config, backend.clone(), backend.clone(), backend, renderer)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Running totals for the cart under the configured tax rate.
    pub fn quote(&self, cart: &Cart, apply_tax: Option<bool>) -> BillingResult<InvoiceTotals> {
        let apply_tax = apply_tax.unwrap_or(self.config.billing.apply_tax);
        Ok(cart.totals(apply_tax, self.config.tax_rate())?)
    }

    /// Validates the cart against fresh backend data and builds the invoice,
    /// without submitting it.
    pub async fn prepare(&self, cart: &Cart, request: &CheckoutRequest) -> BillingResult<Invoice> {
        let customer = self.fetch_customer(cart, request).await?;

        let book_ids: Vec<BookId> = cart.items().iter().map(|i| i.book_id).collect();
        let snapshot = with_retry(&self.retry, "stock_snapshot", || {
            self.inventory.stock_snapshot(&book_ids)
        })
        .await?;
        debug!(books = snapshot.len(), "Stock snapshot fetched");

        let issues = validate_stock_availability(cart.items(), &snapshot);
        if !issues.is_empty() {
            warn!(issues = issues.len(), "Advisory stock check failed");
            return Err(BillingError::StockUnavailable(issues));
        }

        Ok(build_invoice(
            Some(&customer),
            cart.items(),
            &self.options(request),
            self.clock.as_ref(),
        )?)
    }

    /// Submits the cart as an invoice. The cart is cleared only on success.
    ///
    /// The submission is attempted exactly once. On a transport failure the
    /// cashier decides whether to try again.
    ///
    /// The backend's total is final. When it differs from the computed one
    /// the outcome reports it through [`CommittedInvoice::total_adjusted`]
    /// and [`CheckoutService::render_committed`] prints the persisted figure.
    pub async fn checkout(
        &self,
        cart: &mut Cart,
        request: &CheckoutRequest,
    ) -> BillingResult<CheckoutOutcome> {
        debug!(
            lines = cart.item_count(),
            customer_id = ?request.customer_id,
            "checkout"
        );

        let invoice = self.prepare(cart, request).await?;

        let receipt = match self.store.submit(&invoice).await {
            Ok(receipt) => receipt,
            Err(err) => {
                error!(
                    invoice_number = %invoice.invoice_number(),
                    error = %err,
                    "Invoice submission failed"
                );
                return Err(err);
            }
        };

        let outcome = CheckoutOutcome { invoice, receipt };
        if outcome.total_adjusted() {
            warn!(
                invoice_number = %outcome.invoice.invoice_number(),
                computed = %outcome.invoice.total_amount(),
                persisted = %outcome.receipt.total_amount,
                "Backend adjusted invoice total"
            );
        }

        cart.clear();
        info!(
            invoice_id = outcome.receipt.invoice_id,
            invoice_number = %outcome.invoice.invoice_number(),
            total = %outcome.receipt.total_amount,
            "Invoice submitted"
        );
        Ok(outcome)
    }

    /// Builds the invoice and renders it for the print preview. Nothing is
    /// submitted and stock is not checked.
    pub async fn preview(&self, cart: &Cart, request: &CheckoutRequest) -> BillingResult<String> {
        let customer = self.fetch_customer(cart, request).await?;
        let invoice = build_invoice(
            Some(&customer),
            cart.items(),
            &self.options(request),
            self.clock.as_ref(),
        )?;
        debug!(invoice_number = %invoice.invoice_number(), "Preview rendered");
        Ok(self.renderer.render(&invoice))
    }

    pub fn render(&self, invoice: &Invoice) -> String {
        self.renderer.render(invoice)
    }

    /// Bill for a committed invoice, showing the persisted total.
    pub fn render_committed(&self, committed: &CommittedInvoice) -> String {
        self.renderer.render_committed(committed)
    }

    // =========================================================================
    // Committed Invoices
    // =========================================================================

    pub async fn invoice_by_number(
        &self,
        number: &InvoiceNumber,
    ) -> BillingResult<Option<CommittedInvoice>> {
        with_retry(&self.retry, "invoice_by_number", || self.store.invoice_by_number(number)).await
    }

    /// A customer's purchase history, oldest first.
    pub async fn invoices_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> BillingResult<Vec<CommittedInvoice>> {
        with_retry(&self.retry, "invoices_for_customer", || {
            self.store.invoices_for_customer(customer_id)
        })
        .await
    }

    pub async fn invoices(&self) -> BillingResult<Vec<CommittedInvoice>> {
        with_retry(&self.retry, "invoices", || self.store.invoices()).await
    }

    /// Renders a committed invoice again for printing.
    pub async fn reprint(&self, number: &InvoiceNumber) -> BillingResult<String> {
        let committed = self
            .invoice_by_number(number)
            .await?
            .ok_or_else(|| BillingError::InvoiceNotFound(number.to_string()))?;
        debug!(
            invoice_number = %number,
            invoice_id = committed.receipt.invoice_id,
            "Reprinting invoice"
        );
        Ok(self.render_committed(&committed))
    }

    fn options(&self, request: &CheckoutRequest) -> InvoiceOptions {
        let mut options = self.config.invoice_options(request.cashier.clone());
        if let Some(apply_tax) = request.apply_tax {
            options.apply_tax = apply_tax;
        }
        if let Some(method) = request.payment_method {
            options.payment_method = method;
        }
        options.notes = request.notes.clone();
        options
    }

    /// Local checks first, so an empty cart never costs a round trip.
    async fn fetch_customer(
        &self,
        cart: &Cart,
        request: &CheckoutRequest,
    ) -> BillingResult<Customer> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        let id = request.customer_id.ok_or(CoreError::MissingCustomer)?;

        with_retry(&self.retry, "customer", || self.customers.customer(id))
            .await?
            .ok_or(BillingError::CustomerNotFound(id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use crate::ports::SubmissionReceipt;
    use folio_core::{Book, DiscountPercent, FixedClock, Money, StockIssue, StockSnapshot};
    use std::time::Duration;
    use tokio::time::Instant;

    fn book(id: BookId, title: &str, price_cents: i64, stock: i64) -> Book {
        Book {
            id,
            isbn: None,
            title: title.to_string(),
            author: None,
            unit_price: Money::from_cents(price_cents),
            stock_quantity: stock,
        }
    }

    fn customer() -> Customer {
        Customer {
            id: 42,
            account_number: "ACC-0042".to_string(),
            name: "Kamala Silva".to_string(),
            telephone: None,
            email: None,
        }
    }

    fn cashier() -> Cashier {
        Cashier {
            id: 3,
            name: "Front Desk".to_string(),
        }
    }

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::with_catalog(
            [book(1, "Yuganthaya", 100_000, 5), book(2, "Viragaya", 45_000, 1)],
            [customer()],
        ))
    }

    fn service(backend: Arc<MemoryBackend>) -> CheckoutService {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 15, 4, 30, 0).unwrap());
        CheckoutService::with_backend(BillingConfig::default(), backend).with_clock(Arc::new(clock))
    }

    fn reference_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_book(&book(1, "Yuganthaya", 100_000, 5), 2).unwrap();
        cart.set_discount(1, DiscountPercent::from_percent(10)).unwrap();
        cart
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_commits_and_clears_cart() {
        let backend = backend();
        let service = service(backend.clone());
        let mut cart = reference_cart();

        let outcome = service
            .checkout(&mut cart, &CheckoutRequest::new(42, cashier()))
            .await
            .unwrap();

        assert_eq!(outcome.invoice.total_amount().to_string(), "1890.00");
        assert_eq!(outcome.invoice.invoice_number().period(), "202403");
        assert_eq!(outcome.receipt.invoice_id, 1);
        assert!(!outcome.total_adjusted());
        assert!(cart.is_empty());
        assert_eq!(backend.stock(1).await, Some(3));
        assert_eq!(backend.submit_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stock_issue_keeps_cart() {
        let backend = backend();
        let service = service(backend.clone());
        let mut cart = Cart::new();
        cart.add_book(&book(2, "Viragaya", 45_000, 1), 2).unwrap();
        let before = cart.clone();

        let err = service
            .checkout(&mut cart, &CheckoutRequest::new(42, cashier()))
            .await
            .unwrap_err();

        assert!(matches!(
            err.stock_issues(),
            [StockIssue::InsufficientStock {
                book_id: 2,
                available: 1,
                requested: 2,
                ..
            }]
        ));
        assert!(err.is_user_recoverable());
        assert_eq!(cart, before);
        assert_eq!(backend.submit_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_book_removed_from_catalog() {
        let backend = backend();
        let service = service(backend);
        let mut cart = Cart::new();
        cart.add_book(&book(9, "Out of Print", 10_000, 1), 1).unwrap();

        let err = service
            .checkout(&mut cart, &CheckoutRequest::new(42, cashier()))
            .await
            .unwrap_err();

        assert!(matches!(err.stock_issues(), [StockIssue::BookNotFound { book_id: 9, .. }]));
        assert_eq!(cart.item_count(), 1);
    }

    /// Reports plenty of stock regardless of what the backend holds.
    struct StaleInventory;

    #[async_trait]
    impl Inventory for StaleInventory {
        async fn book(&self, _id: BookId) -> BillingResult<Option<Book>> {
            Ok(None)
        }

        async fn stock_snapshot(&self, book_ids: &[BookId]) -> BillingResult<StockSnapshot> {
            Ok(book_ids.iter().map(|id| (*id, 1_000)).collect())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_verdict_wins_over_stale_snapshot() {
        let backend = backend();
        let service = CheckoutService::new(
            BillingConfig::default(),
            backend.clone(),
            Arc::new(StaleInventory),
            backend.clone(),
            Arc::new(TextInvoiceRenderer::from_config(&BillingConfig::default())),
        );
        let mut cart = Cart::new();
        cart.add_book(&book(2, "Viragaya", 45_000, 1), 3).unwrap();

        let err = service
            .checkout(&mut cart, &CheckoutRequest::new(42, cashier()))
            .await
            .unwrap_err();

        match err {
            BillingError::Rejected { message, .. } => {
                assert_eq!(message, "Insufficient stock for 'Viragaya'. Available: 1, requested: 3")
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(backend.stock(2).await, Some(1));
    }

    /// Commits through the memory backend, then adds a surcharge to the
    /// persisted total the way a re-pricing backend would.
    struct RepricingStore {
        inner: Arc<MemoryBackend>,
        surcharge: Money,
    }

    impl RepricingStore {
        fn adjust(&self, mut committed: CommittedInvoice) -> CommittedInvoice {
            committed.receipt.total_amount = committed.receipt.total_amount + self.surcharge;
            committed
        }
    }

    #[async_trait]
    impl InvoiceStore for RepricingStore {
        async fn submit(&self, invoice: &Invoice) -> BillingResult<SubmissionReceipt> {
            let mut receipt = self.inner.submit(invoice).await?;
            receipt.total_amount = receipt.total_amount + self.surcharge;
            Ok(receipt)
        }

        async fn invoice_by_number(
            &self,
            number: &InvoiceNumber,
        ) -> BillingResult<Option<CommittedInvoice>> {
            Ok(self.inner.invoice_by_number(number).await?.map(|c| self.adjust(c)))
        }

        async fn invoices_for_customer(
            &self,
            customer_id: CustomerId,
        ) -> BillingResult<Vec<CommittedInvoice>> {
            let found = self.inner.invoices_for_customer(customer_id).await?;
            Ok(found.into_iter().map(|c| self.adjust(c)).collect())
        }

        async fn invoices(&self) -> BillingResult<Vec<CommittedInvoice>> {
            let found = self.inner.invoices().await?;
            Ok(found.into_iter().map(|c| self.adjust(c)).collect())
        }
    }

    fn repricing_service(backend: Arc<MemoryBackend>, surcharge_cents: i64) -> CheckoutService {
        let config = BillingConfig::default();
        let store = Arc::new(RepricingStore {
            inner: backend.clone(),
            surcharge: Money::from_cents(surcharge_cents),
        });
        let renderer = Arc::new(TextInvoiceRenderer::from_config(&config));
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 15, 4, 30, 0).unwrap());
        CheckoutService::new(config, backend.clone(), backend, store, renderer)
            .with_clock(Arc::new(clock))
    }

    #[tokio::test(start_paused = true)]
    async fn test_persisted_total_wins() {
        let backend = backend();
        let service = repricing_service(backend.clone(), 1);
        let mut cart = reference_cart();

        let outcome = service
            .checkout(&mut cart, &CheckoutRequest::new(42, cashier()))
            .await
            .unwrap();

        assert!(outcome.total_adjusted());
        assert_eq!(outcome.total_adjustment(), Money::from_cents(1));
        assert_eq!(outcome.persisted_total().to_string(), "1890.01");
        assert_eq!(outcome.invoice.total_amount().to_string(), "1890.00");
        assert!(cart.is_empty());

        let text = service.render_committed(&outcome);
        assert!(text.contains("Rs. 1890.01"), "persisted total missing in\n{text}");
        assert!(!text.contains("Rs. 1890.00"));

        let reprinted = service.reprint(outcome.invoice.invoice_number()).await.unwrap();
        assert_eq!(reprinted, text);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reprint_committed_invoice() {
        let backend = backend();
        let service = service(backend.clone());
        let mut cart = reference_cart();
        let outcome = service
            .checkout(&mut cart, &CheckoutRequest::new(42, cashier()))
            .await
            .unwrap();

        backend.fail_next_reads(2);
        let started = Instant::now();
        let text = service.reprint(outcome.invoice.invoice_number()).await.unwrap();

        assert_eq!(text, service.render_committed(&outcome));
        assert!(text.contains(outcome.invoice.invoice_number().as_str()));
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(backend.submit_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reprint_unknown_number() {
        let service = service(backend());
        let number: InvoiceNumber = "INV-202403-9999".parse().unwrap();

        let err = service.reprint(&number).await.unwrap_err();

        assert!(matches!(err, BillingError::InvoiceNotFound(ref n) if n == "INV-202403-9999"));
        assert!(err.is_user_recoverable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoice_history() {
        let backend = backend();
        backend.insert_customer(Customer {
            id: 43,
            name: "Ruwan Jayasinghe".to_string(),
            account_number: "ACC-0043".to_string(),
            ..customer()
        })
        .await;
        let service = service(backend.clone());

        let mut cart = reference_cart();
        let first = service
            .checkout(&mut cart, &CheckoutRequest::new(42, cashier()))
            .await
            .unwrap();
        cart.add_book(&book(2, "Viragaya", 45_000, 1), 1).unwrap();
        let mut config = BillingConfig::default();
        config.billing.invoice_prefix = "BR2".to_string();
        CheckoutService::with_backend(config, backend.clone())
            .checkout(&mut cart, &CheckoutRequest::new(43, cashier()))
            .await
            .unwrap();

        let history = service.invoices_for_customer(42).await.unwrap();
        assert_eq!(history, vec![first]);
        assert_eq!(service.invoices().await.unwrap().len(), 2);
        assert!(service.invoices_for_customer(7).await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_is_never_retried() {
        let backend = backend();
        backend.fail_next_submits(1);
        let service = service(backend.clone());
        let mut cart = reference_cart();

        let err = service
            .checkout(&mut cart, &CheckoutRequest::new(42, cashier()))
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::Unavailable(_)));
        assert_eq!(backend.submit_calls(), 1);
        assert_eq!(backend.invoice_count().await, 0);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_are_retried() {
        let backend = backend();
        backend.fail_next_reads(2);
        let service = service(backend.clone());
        let mut cart = reference_cart();
        let started = Instant::now();

        let outcome = service
            .checkout(&mut cart, &CheckoutRequest::new(42, cashier()))
            .await
            .unwrap();

        assert_eq!(outcome.receipt.total_amount.cents(), 189_000);
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(backend.submit_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_give_up() {
        let backend = backend();
        backend.fail_next_reads(3);
        let service = service(backend.clone());
        let mut cart = reference_cart();

        let err = service
            .checkout(&mut cart, &CheckoutRequest::new(42, cashier()))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(backend.submit_calls(), 0);
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_errors_come_first() {
        let backend = backend();
        backend.fail_next_reads(10);
        let service = service(backend);

        let mut empty = Cart::new();
        let no_customer = CheckoutRequest {
            customer_id: None,
            ..CheckoutRequest::new(42, cashier())
        };

        let err = service.checkout(&mut empty, &no_customer).await.unwrap_err();
        assert!(matches!(err, BillingError::Core(CoreError::EmptyCart)));

        let mut cart = reference_cart();
        let err = service.checkout(&mut cart, &no_customer).await.unwrap_err();
        assert!(matches!(err, BillingError::Core(CoreError::MissingCustomer)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_customer() {
        let service = service(backend());
        let mut cart = reference_cart();

        let err = service
            .checkout(&mut cart, &CheckoutRequest::new(7, cashier()))
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::CustomerNotFound(7)));
        assert!(!cart.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_overrides_policy() {
        let backend = backend();
        let service = service(backend.clone());
        let mut cart = reference_cart();
        let request = CheckoutRequest::new(42, cashier())
            .with_tax(false)
            .with_payment_method(PaymentMethod::Card)
            .with_notes("  gift wrap  ");

        let outcome = service.checkout(&mut cart, &request).await.unwrap();

        assert!(outcome.invoice.tax_amount().is_zero());
        assert_eq!(outcome.invoice.total_amount().to_string(), "1800.00");
        assert_eq!(outcome.invoice.payment_method(), PaymentMethod::Card);
        assert_eq!(outcome.invoice.notes(), Some("gift wrap"));
    }

    #[test]
    fn test_quote_uses_config() {
        let mut config = BillingConfig::default();
        config.billing.tax_rate_bps = 1_000;
        let service = CheckoutService::with_backend(config, backend());
        let cart = reference_cart();

        assert_eq!(service.quote(&cart, None).unwrap().tax_amount.to_string(), "180.00");
        assert!(service.quote(&cart, Some(false)).unwrap().tax_amount.is_zero());
        assert_eq!(service.quote(&Cart::new(), None).unwrap(), InvoiceTotals::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_does_not_submit() {
        let backend = backend();
        let service = service(backend.clone());
        let cart = reference_cart();

        let text = service.preview(&cart, &CheckoutRequest::new(42, cashier())).await.unwrap();

        assert!(text.contains("Invoice #: INV-202403-"));
        assert!(text.contains("Rs. 1890.00"));
        assert_eq!(backend.submit_calls(), 0);
        assert_eq!(backend.stock(1).await, Some(5));
    }

    #[test]
    fn test_request_wire_format() {
        let json = r#"{
            "customerId": 42,
            "cashier": {"id": 3, "name": "Front Desk"},
            "paymentMethod": "CARD"
        }"#;
        let request: CheckoutRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.customer_id, Some(42));
        assert_eq!(request.payment_method, Some(PaymentMethod::Card));
        assert_eq!(request.apply_tax, None);
    }
}
