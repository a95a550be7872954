//! # Shopfloor Terminal Application
//!
//! Entry point: logging, database connection, and the top-level role menu.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (RUST_LOG controls verbosity)
//! 2. Resolve the database path (SHOPFLOOR_DB env var or ./shopfloor.db)
//! 3. Connect & run migrations
//! 4. Enter the role menu loop (customer / staff / exit)
//!
//! Everything interesting happens in `shopfloor-db`; this binary only
//! prompts, dispatches, and renders.

mod menu;

use std::env;

use tracing::info;
use tracing_subscriber::EnvFilter;

use shopfloor_db::{Database, DbConfig};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,shopfloor=info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let db_path = env::var("SHOPFLOOR_DB").unwrap_or_else(|_| "./shopfloor.db".to_string());
    info!(path = %db_path, "Starting shopfloor");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let (total, applied) = shopfloor_db::migrations::migration_status(db.pool()).await?;
    info!(total, applied, "Migration status");

    role_menu(&db).await;

    db.close().await;
    Ok(())
}

/// Top-level loop: pick a role, dispatch to its menu.
async fn role_menu(db: &Database) {
    loop {
        menu::clear_screen();
        println!();
        println!("===== Shopfloor =====");
        println!("Are you a customer or a staff member?");
        println!("1. Customer");
        println!("2. Staff");
        println!("3. Exit");

        match menu::prompt("Enter your choice: ").as_str() {
            "1" => customer_login(db).await,
            "2" => menu::staff_menu(db).await,
            "3" => {
                println!("Goodbye.");
                break;
            }
            _ => {
                println!("Invalid choice, please try again.");
                menu::pause();
            }
        }
    }
}

/// Credential-free "login": look the customer up by numeric id to establish
/// a session name, then enter the customer menu.
async fn customer_login(db: &Database) {
    let Some(customer_id) = menu::prompt_i64("Please enter your Customer ID to log in: ") else {
        menu::pause();
        return;
    };

    match db.customers().get_by_id(customer_id).await {
        Ok(Some(customer)) => menu::customer_menu(db, &customer).await,
        Ok(None) => {
            println!("Error: Customer ID not found.");
            menu::pause();
        }
        Err(err) => {
            menu::report_db_error(&err);
            menu::pause();
        }
    }
}
