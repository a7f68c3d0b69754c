//! # Plain-Text Receipt
//!
//! Fixed-width bill for the print preview and thermal printers.
//!
//! ## Layout (width 50)
//! ```text
//! ==================================================
//!                 FOLIO BOOKSHOP
//! ==================================================
//!
//! Invoice #: INV-202403-0042
//! Date: 2024-03-15 10:00:00 AM
//! Customer: Kamala Silva
//! Cashier: Front Desk
//! Payment: CASH
//!
//! --------------------------------------------------
//! Item                     Qty      Price     Total
//! --------------------------------------------------
//! Yuganthaya                 2    1000.00   1800.00
//! --------------------------------------------------
//! Subtotal:                                 2000.00
//! Discount:                                  200.00
//! Tax (5%):                                   90.00
//! TOTAL:                                Rs. 1890.00
//! ==================================================
//!            Thank You For Your Purchase
//! ==================================================
//! ```
//!
//! A committed invoice whose total the backend changed prints an
//! `Adjustment:` line above `TOTAL:`, and `TOTAL:` shows the persisted
//! figure.

use chrono::{FixedOffset, Offset, Utc};
use std::fmt::Write;

use folio_core::{Invoice, Money};

use crate::config::BillingConfig;
use crate::ports::{CommittedInvoice, InvoiceRenderer};

/// Columns taken by everything but the title: `" qty  price  total"`.
const FIXED_COLUMNS: usize = 26;
const AMOUNT_WIDTH: usize = 8;

/// Renders invoices as fixed-width text.
#[derive(Debug, Clone)]
pub struct TextInvoiceRenderer {
    store_name: String,
    currency_symbol: String,
    width: usize,
    utc_offset: FixedOffset,
}

impl TextInvoiceRenderer {
    pub fn new(
        store_name: impl Into<String>,
        currency_symbol: impl Into<String>,
        width: usize,
    ) -> Self {
        TextInvoiceRenderer {
            store_name: store_name.into(),
            currency_symbol: currency_symbol.into(),
            width,
            utc_offset: Utc.fix(),
        }
    }

    pub fn from_config(config: &BillingConfig) -> Self {
        Self::new(&config.store.name, &config.store.currency_symbol, config.receipt.width)
            .with_utc_offset_minutes(config.receipt.utc_offset_minutes)
    }

    /// Prints dates in the given local offset. Out-of-range offsets fall back to UTC.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        self
    }

    fn title_width(&self) -> usize {
        (self.width.saturating_sub(FIXED_COLUMNS + 1)).max(8)
    }

    /// Label on the left, amount flush with the table's total column.
    fn summary_line(&self, out: &mut String, label: &str, amount: &str) {
        let table_width = self.title_width() + FIXED_COLUMNS;
        let label_width = table_width.saturating_sub(amount.chars().count().max(AMOUNT_WIDTH));
        let _ = writeln!(out, "{label:<label_width$}{amount:>AMOUNT_WIDTH$}");
    }
}

/// Shortens `title` to `width` columns, marking the cut with a period.
fn fit_title(title: &str, width: usize) -> String {
    if title.chars().count() < width {
        title.to_string()
    } else {
        let mut short: String = title.chars().take(width - 1).collect();
        short.push('.');
        short
    }
}

impl TextInvoiceRenderer {
    /// Lays out the bill. `persisted_total`, when given, replaces the
    /// computed total.
    fn write_bill(&self, invoice: &Invoice, persisted_total: Option<Money>) -> String {
        let width = self.width;
        let tw = self.title_width();
        let heavy = "=".repeat(width);
        let light = "-".repeat(width);
        let mut out = String::new();

        let _ = writeln!(out, "{heavy}");
        let _ = writeln!(out, "{:^width$}", self.store_name.to_uppercase());
        let _ = writeln!(out, "{heavy}");
        let _ = writeln!(out);

        let local_date = invoice.invoice_date().with_timezone(&self.utc_offset);
        let _ = writeln!(out, "Invoice #: {}", invoice.invoice_number());
        let _ = writeln!(out, "Date: {}", local_date.format("%Y-%m-%d %I:%M:%S %p"));
        let _ = writeln!(out, "Customer: {}", invoice.customer_name());
        let _ = writeln!(out, "Cashier: {}", invoice.cashier_name());
        let _ = writeln!(out, "Payment: {}", invoice.payment_method());
        if let Some(notes) = invoice.notes() {
            let _ = writeln!(out, "Notes: {notes}");
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{light}");
        let _ = writeln!(out, "{:<tw$} {:>4} {:>10}  {:>8}", "Item", "Qty", "Price", "Total");
        let _ = writeln!(out, "{light}");

        for item in invoice.items() {
            let _ = writeln!(
                out,
                "{:<tw$} {:>4} {:>10}  {:>8}",
                fit_title(&item.title, tw),
                item.quantity,
                item.unit_price.to_string(),
                item.line_total.to_string()
            );
        }

        let _ = writeln!(out, "{light}");
        self.summary_line(&mut out, "Subtotal:", &invoice.subtotal().to_string());

        if invoice.discount_amount().is_positive() {
            self.summary_line(&mut out, "Discount:", &invoice.discount_amount().to_string());
        }

        if invoice.tax_amount().is_positive() {
            let label = match invoice.tax_rate() {
                Some(rate) => format!("Tax ({}%):", rate.percentage()),
                None => "Tax:".to_string(),
            };
            self.summary_line(&mut out, &label, &invoice.tax_amount().to_string());
        }

        let total_amount = persisted_total.unwrap_or_else(|| invoice.total_amount());
        let adjustment = total_amount - invoice.total_amount();
        if adjustment.is_positive() {
            self.summary_line(&mut out, "Adjustment:", &format!("+{adjustment}"));
        } else if adjustment.is_negative() {
            self.summary_line(&mut out, "Adjustment:", &adjustment.to_string());
        }

        let total = format!("{} {}", self.currency_symbol, total_amount);
        self.summary_line(&mut out, "TOTAL:", &total);

        let _ = writeln!(out, "{heavy}");
        let _ = writeln!(out, "{:^width$}", "Thank You For Your Purchase");
        let _ = writeln!(out, "{heavy}");

        out
    }
}

impl InvoiceRenderer for TextInvoiceRenderer {
    fn render(&self, invoice: &Invoice) -> String {
        self.write_bill(invoice, None)
    }

    fn render_committed(&self, committed: &CommittedInvoice) -> String {
        self.write_bill(&committed.invoice, Some(committed.persisted_total()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::ports::SubmissionReceipt;
    use folio_core::{
        build_invoice, Cashier, Customer, DiscountPercent, FixedClock, InvoiceOptions, LineItem,
    };

    fn invoice(items: &[LineItem], apply_tax: bool) -> Invoice {
        let customer = Customer {
            id: 42,
            account_number: "ACC-0042".to_string(),
            name: "Kamala Silva".to_string(),
            telephone: None,
            email: None,
        };
        let mut options = InvoiceOptions::new(Cashier {
            id: 3,
            name: "Front Desk".to_string(),
        });
        options.apply_tax = apply_tax;
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 15, 4, 30, 0).unwrap());
        build_invoice(Some(&customer), items, &options, &clock).unwrap()
    }

    fn reference_items() -> Vec<LineItem> {
        vec![LineItem::new(1, "Yuganthaya", Money::from_cents(100_000), 2)
            .with_discount(DiscountPercent::from_percent(10))]
    }

    fn renderer() -> TextInvoiceRenderer {
        TextInvoiceRenderer::new("Folio Bookshop", "Rs.", 50).with_utc_offset_minutes(330)
    }

    #[test]
    fn test_reference_bill() {
        let text = renderer().render(&invoice(&reference_items(), true));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1].trim(), "FOLIO BOOKSHOP");
        assert!(lines[4].starts_with("Invoice #: INV-202403-"));
        assert_eq!(lines[5], "Date: 2024-03-15 10:00:00 AM");
        assert_eq!(lines[6], "Customer: Kamala Silva");
        assert_eq!(lines[7], "Cashier: Front Desk");

        let row = format!("{:<23} {:>4} {:>10}  {:>8}", "Yuganthaya", 2, "1000.00", "1800.00");
        assert!(lines.contains(&row.as_str()), "missing row in\n{text}");

        assert!(text.contains("Discount:"));
        assert!(text.contains("Tax (5%):"));
        assert!(text.contains("Rs. 1890.00"));
        assert!(text.contains("Thank You For Your Purchase"));
    }

    #[test]
    fn test_zero_lines_are_omitted() {
        let items = vec![LineItem::new(1, "Madol Doova", Money::from_cents(45_000), 1)];
        let text = renderer().render(&invoice(&items, false));

        assert!(!text.contains("Discount:"));
        assert!(!text.contains("Tax"));
        assert!(text.contains("Subtotal:"));
        assert!(text.contains("Rs. 450.00"));
    }

    fn committed(invoice: Invoice, persisted_cents: i64) -> CommittedInvoice {
        let receipt = SubmissionReceipt {
            invoice_id: 11,
            invoice_number: invoice.invoice_number().clone(),
            total_amount: Money::from_cents(persisted_cents),
        };
        CommittedInvoice { invoice, receipt }
    }

    #[test]
    fn test_committed_bill_prints_persisted_total() {
        let bill = committed(invoice(&reference_items(), true), 189_050);
        let text = renderer().render_committed(&bill);

        assert!(text.contains("Rs. 1890.50"), "persisted total missing in\n{text}");
        assert!(!text.contains("Rs. 1890.00"));
        let adjustment = text.lines().find(|l| l.starts_with("Adjustment:")).unwrap();
        assert!(adjustment.ends_with("+0.50"));

        let lowered = committed(invoice(&reference_items(), true), 188_000);
        let text = renderer().render_committed(&lowered);
        assert!(text.contains("Rs. 1880.00"));
        assert!(text.lines().any(|l| l.starts_with("Adjustment:") && l.ends_with("-10.00")));
    }

    #[test]
    fn test_unadjusted_committed_bill_matches_preview() {
        let inv = invoice(&reference_items(), true);
        let total = inv.total_amount().cents();
        let text = renderer().render_committed(&committed(inv.clone(), total));

        assert_eq!(text, renderer().render(&inv));
        assert!(!text.contains("Adjustment:"));
    }

    #[test]
    fn test_long_title_is_truncated() {
        assert_eq!(fit_title("The Village in the Jungle", 23), "The Village in the Jun.");
        assert_eq!(fit_title("Gamperaliya", 23), "Gamperaliya");
    }

    #[test]
    fn test_lines_fit_width() {
        let items = vec![
            LineItem::new(
                1,
                "A Very Long Title That Keeps Going On",
                Money::from_cents(123_456),
                2,
            ),
            LineItem::new(2, "Kaliyugaya", Money::from_cents(80_000), 1),
        ];
        for width in [40, 50, 64] {
            let r = TextInvoiceRenderer::new("Folio", "Rs.", width);
            let text = r.render(&invoice(&items, true));
            for line in text.lines() {
                assert!(line.chars().count() <= width, "{line:?} wider than {width}");
            }
        }
    }

    #[test]
    fn test_fractional_tax_rate_label() {
        let customer = Customer {
            id: 1,
            account_number: "ACC-1".to_string(),
            name: "Sunil".to_string(),
            telephone: None,
            email: None,
        };
        let mut options = InvoiceOptions::new(Cashier {
            id: 1,
            name: "Desk".to_string(),
        });
        options.tax_rate = folio_core::TaxRate::from_bps(825);
        let inv = build_invoice(
            Some(&customer),
            &reference_items(),
            &options,
            &folio_core::SystemClock,
        )
        .unwrap();

        assert!(renderer().render(&inv).contains("Tax (8.25%):"));
    }
}
