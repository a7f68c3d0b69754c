//! # Billing Scenario Runner
//!
//! Runs a checkout scenario against the in-memory backend and prints the bill.
//!
//! ## Usage
//! ```bash
//! # Print preview only (nothing is submitted)
//! cargo run -p folio-billing -- crates/folio-billing/demos/bookshop.json
//!
//! # Submit the invoice and print the committed bill (persisted total)
//! cargo run -p folio-billing -- crates/folio-billing/demos/bookshop.json --submit
//!
//! # Use a specific config file
//! cargo run -p folio-billing -- scenario.json --config ./billing.toml
//! ```
//!
//! ## Scenario Format
//! ```json
//! {
//!   "books": [{ "id": 1, "title": "Yuganthaya", "unitPrice": "1000.00", "stockQuantity": 5 }],
//!   "customers": [{ "id": 42, "accountNumber": "ACC-0042", "name": "Kamala Silva" }],
//!   "cart": [{ "bookId": 1, "quantity": 2, "discountPercent": "10" }],
//!   "request": { "customerId": 42, "cashier": { "id": 3, "name": "Front Desk" } }
//! }
//! ```

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use folio_billing::{telemetry, BillingConfig, CheckoutRequest, CheckoutService, MemoryBackend};
use folio_core::{Book, BookId, Cart, Customer, DiscountPercent};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Scenario {
    books: Vec<Book>,
    customers: Vec<Customer>,
    cart: Vec<CartLine>,
    request: CheckoutRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartLine {
    book_id: BookId,
    quantity: i64,
    #[serde(default)]
    discount_percent: DiscountPercent,
}

fn print_usage() {
    println!("Folio Billing Scenario Runner");
    println!();
    println!("Usage: folio-billing <SCENARIO.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -s, --submit         Submit the invoice instead of previewing it");
    println!("  -c, --config <PATH>  Billing config file (default: platform config dir)");
    println!("  -h, --help           Show this help message");
}

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Args {
    scenario_path: PathBuf,
    config_path: Option<PathBuf>,
    submit: bool,
}

/// `Ok(None)` means `--help` was asked for.
fn parse_args(args: &[String]) -> Result<Option<Args>, String> {
    let mut scenario_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut submit = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--submit" | "-s" => submit = true,
            "--config" | "-c" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{} requires a path", args[i]))?;
                config_path = Some(PathBuf::from(path));
                i += 1;
            }
            "--help" | "-h" => return Ok(None),
            other => scenario_path = Some(PathBuf::from(other)),
        }
        i += 1;
    }

    let scenario_path = scenario_path.ok_or("missing scenario file")?;
    Ok(Some(Args {
        scenario_path,
        config_path,
        submit,
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let Args {
        scenario_path,
        config_path,
        submit,
    } = match parse_args(&args) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(message) => {
            print_usage();
            return Err(message.into());
        }
    };

    telemetry::init_tracing();

    let config = BillingConfig::load(config_path)?;
    let scenario: Scenario = serde_json::from_str(&std::fs::read_to_string(&scenario_path)?)?;
    info!(
        path = %scenario_path.display(),
        books = scenario.books.len(),
        lines = scenario.cart.len(),
        "Scenario loaded"
    );

    let mut cart = Cart::new();
    for line in &scenario.cart {
        let book = scenario
            .books
            .iter()
            .find(|b| b.id == line.book_id)
            .ok_or_else(|| format!("cart references unknown book {}", line.book_id))?;
        cart.add_book(book, line.quantity)?;
        if !line.discount_percent.is_zero() {
            cart.set_discount(line.book_id, line.discount_percent)?;
        }
    }

    let backend = Arc::new(MemoryBackend::with_catalog(scenario.books, scenario.customers));
    let service = CheckoutService::with_backend(config, backend);

    if submit {
        let outcome = service.checkout(&mut cart, &scenario.request).await?;
        print!("{}", service.render_committed(&outcome));
        println!();
        println!(
            "Submitted as #{} ({})",
            outcome.receipt.invoice_id, outcome.receipt.invoice_number
        );
        if outcome.total_adjusted() {
            println!(
                "Backend adjusted the total by {} (calculated {}, persisted {})",
                outcome.total_adjustment(),
                outcome.invoice.total_amount(),
                outcome.persisted_total()
            );
        }
    } else {
        print!("{}", service.preview(&cart, &scenario.request).await?);
    }

    Ok(())
}
