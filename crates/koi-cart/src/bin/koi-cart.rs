//! # koi-cart Command Line
//!
//! Drives the cart store against the local SQLite database.
//!
//! ## Usage
//! ```bash
//! koi-cart show
//! koi-cart add <product-id>
//! koi-cart remove <product-id>      # one unit
//! koi-cart drop <product-id>        # whole line
//! koi-cart clear
//! koi-cart share                    # print shared-cart payload
//! koi-cart import <payload>         # asks Merge / Replace / Cancel
//! koi-cart checkout                 # print the checkout link
//! ```
//!
//! Configuration comes from `koi.toml` and `KOI_*` environment variables
//! (see `CartConfig`). `--config <PATH>` points at a different file.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use koi_cart::{
    CartConfig, CartStore, ImportChoice, SharedCartImporter, SharedCartOutcome,
    SharedCartPrompt, SqlitePersistence,
};
use koi_core::CartTotals;
use koi_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: koi-cart [--config <PATH>] <COMMAND>

Commands:
  show                Show cart contents and totals
  add <ID>            Add one unit of a product
  remove <ID>         Remove one unit of a product
  drop <ID>           Remove a product's line entirely
  clear               Empty the cart
  share               Print the shared-cart payload
  import <PAYLOAD>    Import a shared-cart payload
  checkout            Print the checkout link";

/// Asks on the terminal. Blocks (on a worker thread) until a valid answer.
struct TerminalPrompt;

#[async_trait]
impl SharedCartPrompt for TerminalPrompt {
    async fn choose(&self, current: &CartTotals, incoming: usize) -> ImportChoice {
        let question = format!(
            "Your cart already has {} item(s) ({}). The shared cart has {} item(s).\n\
             [m]erge, [r]eplace or [c]ancel? ",
            current.total_items,
            current.total_price(),
            incoming
        );

        let answer = tokio::task::spawn_blocking(move || ask(&question)).await;
        match answer {
            Ok(choice) => choice,
            Err(e) => {
                warn!(error = %e, "Prompt task failed, cancelling import");
                ImportChoice::Cancel
            }
        }
    }
}

fn ask(question: &str) -> ImportChoice {
    let stdin = io::stdin();
    loop {
        print!("{question}");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            // EOF: nobody is going to answer
            Ok(0) | Err(_) => return ImportChoice::Cancel,
            Ok(_) => {}
        }

        match line.parse() {
            Ok(choice) => return choice,
            Err(msg) => println!("{msg}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let mut config_path = None;
    if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
        config_path = Some(PathBuf::from(args[1].clone()));
        args = args.split_off(2);
    }

    let config = CartConfig::load(config_path)?;
    let db_path = config.database_path()?;
    info!(?db_path, "Opening cart database");

    let db = Database::new(DbConfig::new(db_path)).await?;
    let persistence = Arc::new(SqlitePersistence::new(
        db.carts(),
        config.storage.cart_key.clone(),
    ));
    let mut store = CartStore::open(persistence, config.checkout.template()).await;

    let command = args.first().map(String::as_str).unwrap_or("show");
    let argument = args.get(1).map(String::as_str);

    match (command, argument) {
        ("show", _) => print_cart(&store),
        ("add", Some(id)) => match db.products().get_by_id(id).await? {
            Some(product) => {
                let quantity = store.add_item(&product).await;
                println!("{} x{}", product.name, quantity);
            }
            None => println!("No product with id {id}"),
        },
        ("remove", Some(id)) => {
            if !store.remove_item(id).await {
                println!("{id} is not in the cart");
            }
            print_cart(&store);
        }
        ("drop", Some(id)) => {
            if !store.remove_item_completely(id).await {
                println!("{id} is not in the cart");
            }
            print_cart(&store);
        }
        ("clear", _) => {
            store.clear_cart().await;
            println!("Cart cleared");
        }
        ("share", _) => println!("{}", store.shared_cart_payload()),
        ("import", Some(payload)) => {
            let importer = SharedCartImporter::new(db.products(), TerminalPrompt)
                .max_concurrent_lookups(config.import.max_concurrent_lookups);

            match importer.handle_shared_link(&mut store, payload).await? {
                SharedCartOutcome::NothingToImport => println!("Nothing to import"),
                SharedCartOutcome::Cancelled => println!("Import cancelled"),
                SharedCartOutcome::Imported { report, .. } => {
                    println!(
                        "Imported {} of {} item(s), {} skipped",
                        report.added,
                        report.requested,
                        report.skipped()
                    );
                    print_cart(&store);
                }
            }
        }
        ("checkout", _) => {
            if store.is_empty() {
                println!("Cart is empty");
            } else {
                println!("{}", store.checkout_link());
            }
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    db.close().await;
    Ok(())
}

fn print_cart(store: &CartStore) {
    if store.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in store.items() {
        println!(
            "{:<24} {:>3}x {:>10} {:>6}g",
            item.name,
            item.quantity,
            item.line_total().to_string(),
            item.line_weight()
        );
    }
    println!(
        "{} item(s), total {}, weight {}g",
        store.total_items(),
        store.total_price(),
        store.total_weight()
    );
}

/// Log filter from `RUST_LOG`, defaulting to `info,koi=debug,sqlx=warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,koi=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
