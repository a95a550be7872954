//! # Menus, Prompts & Tables
//!
//! Presentation glue: numbered menus for each role, line-oriented prompts
//! with re-prompt on bad input, and fixed-width table rendering. Business
//! outcomes arrive as typed results from `shopfloor-db` and are mapped to
//! messages here; nothing in this module touches SQL.

use std::io::{self, Write};

use shopfloor_core::{validation, Customer, Money, NewProduct};
use shopfloor_db::{AddProductError, Database, DbError, DeleteOutcome, PurchaseError};

// =============================================================================
// Prompt Helpers
// =============================================================================

/// Clears the terminal screen (ANSI; falls back to scrolling on dumb terms).
pub fn clear_screen() {
    print!("\x1b[2J\x1b[H");
    let _ = io::stdout().flush();
}

/// Prints a prompt and reads one trimmed line from stdin.
pub fn prompt(message: &str) -> String {
    print!("{message}");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

/// Prompts for an integer; reports and returns None on a parse failure so the
/// caller can drop back to its menu.
pub fn prompt_i64(message: &str) -> Option<i64> {
    match prompt(message).parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            println!("Invalid input. Please enter a number.");
            None
        }
    }
}

/// "Press Enter to continue" gate between screens.
pub fn pause() {
    let _ = prompt("\nPress Enter to continue...");
}

/// Maps a storage failure to a user-facing line. Transient failures invite a
/// retry; everything else just reports.
pub fn report_db_error(err: &DbError) {
    if err.is_transient() {
        println!("Temporary database problem, please try again: {err}");
    } else {
        println!("Database error: {err}");
    }
}

// =============================================================================
// Customer Menu
// =============================================================================

pub async fn customer_menu(db: &Database, customer: &Customer) {
    loop {
        clear_screen();
        println!();
        println!("===== Customer Menu (Logged in as: {}) =====", customer.full_name());
        println!("1. View All Products");
        println!("2. Purchase a Product");
        println!("3. View My Purchase History");
        println!("4. Logout (Return to Main Menu)");

        match prompt("Enter your choice: ").as_str() {
            "1" => {
                view_products(db).await;
                pause();
            }
            "2" => purchase_product(db, customer.id).await,
            "3" => view_history(db, customer.id).await,
            "4" => break,
            _ => {
                println!("Invalid choice, please try again.");
                pause();
            }
        }
    }
}

async fn view_products(db: &Database) -> bool {
    let products = match db.products().list().await {
        Ok(products) => products,
        Err(err) => {
            report_db_error(&err);
            return false;
        }
    };

    println!();
    println!("--- Available Products ---");
    println!("{:<5}{:<24}{:<12}{}", "ID", "Name", "Price", "Stock");
    println!("{}", "-".repeat(50));
    for product in &products {
        println!(
            "{:<5}{:<24}{:<12}{}",
            product.id,
            product.name,
            product.price().to_string(),
            product.stock_quantity
        );
    }
    println!("{}", "-".repeat(50));
    true
}

async fn purchase_product(db: &Database, customer_id: i64) {
    if !view_products(db).await {
        pause();
        return;
    }

    let Some(product_id) = prompt_i64("Enter the Product ID you wish to buy: ") else {
        pause();
        return;
    };
    let Some(quantity) = prompt_i64("Enter the Quantity you wish to buy: ") else {
        pause();
        return;
    };
    if let Err(err) = validation::validate_quantity(quantity) {
        println!("\nInvalid quantity: {err}.");
        pause();
        return;
    }

    match db.purchases().purchase(customer_id, product_id, quantity).await {
        Ok(receipt) => {
            println!();
            println!(
                "Success! Purchase complete. Your Purchase ID is {}.",
                receipt.purchase_id
            );
            println!(
                "  {} x {} = {}",
                receipt.quantity,
                receipt.price_at_purchase(),
                receipt.total()
            );
        }
        Err(PurchaseError::ProductNotFound(id)) => {
            println!("\nError: no product with ID {id}.");
        }
        Err(PurchaseError::InsufficientStock { available, requested, .. }) => {
            println!("\nSorry, only {available} in stock (you asked for {requested}).");
        }
        Err(PurchaseError::InvalidQuantity(_)) => {
            println!("\nQuantity must be a positive number.");
        }
        Err(PurchaseError::Storage(err)) => report_db_error(&err),
    }
    pause();
}

async fn view_history(db: &Database, customer_id: i64) {
    match db.purchases().history(customer_id).await {
        Ok(entries) => {
            println!();
            println!("--- Your Purchase History ---");
            if entries.is_empty() {
                println!("You have no past purchases.");
            } else {
                println!("{:<12}{:<24}{:<6}{}", "Date", "Product", "Qty", "Price Paid");
                println!("{}", "-".repeat(50));
                for entry in &entries {
                    println!(
                        "{:<12}{:<24}{:<6}{}",
                        entry.purchase_date.format("%Y-%m-%d").to_string(),
                        entry.product_name,
                        entry.quantity,
                        entry.price_at_purchase()
                    );
                }
                println!("{}", "-".repeat(50));
            }
        }
        Err(err) => report_db_error(&err),
    }
    pause();
}

// =============================================================================
// Staff Menu
// =============================================================================

pub async fn staff_menu(db: &Database) {
    loop {
        clear_screen();
        println!();
        println!("===== Staff Menu =====");
        println!("1. View All Products");
        println!("2. Add a New Product");
        println!("3. Delete an Existing Product");
        println!("4. View All Customers");
        println!("5. View All Purchase Records");
        println!("6. Exit to Main Menu");

        match prompt("Enter your choice: ").as_str() {
            "1" => {
                view_products(db).await;
                pause();
            }
            "2" => add_product(db).await,
            "3" => delete_product(db).await,
            "4" => view_customers(db).await,
            "5" => view_ledger(db).await,
            "6" => break,
            _ => {
                println!("Invalid choice, please try again.");
                pause();
            }
        }
    }
}

async fn add_product(db: &Database) {
    println!();
    println!("--- Adding a New Product ---");

    let name = prompt("Enter product name: ");

    // Prices are entered in dollars but stored as cents.
    let price_cents = match prompt("Enter product price (e.g. 9.99): ").parse::<f64>() {
        Ok(dollars) if dollars.is_finite() => (dollars * 100.0).round() as i64,
        _ => {
            println!("Invalid input. Price must be a number.");
            pause();
            return;
        }
    };

    let Some(stock_quantity) = prompt_i64("Enter stock quantity: ") else {
        pause();
        return;
    };

    let new_product = NewProduct {
        name,
        price_cents,
        stock_quantity,
    };

    match db.products().insert(&new_product).await {
        Ok(id) => println!(
            "\nSuccess! Product '{}' was added with ID {} at {}.",
            new_product.name.trim(),
            id,
            Money::from_cents(new_product.price_cents)
        ),
        Err(AddProductError::Validation(err)) => println!("\nInvalid input: {err}."),
        Err(AddProductError::Storage(err)) => report_db_error(&err),
    }
    pause();
}

async fn delete_product(db: &Database) {
    if !view_products(db).await {
        pause();
        return;
    }

    let Some(product_id) = prompt_i64("\nEnter the ID of the product to delete: ") else {
        pause();
        return;
    };

    match db.products().delete(product_id).await {
        Ok(DeleteOutcome::Deleted) => {
            println!("\nSuccess! Product with ID {product_id} was deleted.");
        }
        Ok(DeleteOutcome::InUse) => {
            println!("\nWarning: this product is part of a past purchase and cannot be deleted.");
            println!("Consider setting its stock to 0 instead.");
        }
        Ok(DeleteOutcome::NotFound) => {
            println!("\nWarning: no product found with ID {product_id}.");
        }
        Err(err) => report_db_error(&err),
    }
    pause();
}

async fn view_customers(db: &Database) {
    match db.customers().list().await {
        Ok(customers) => {
            println!();
            println!("--- All Customers ---");
            println!("{:<5}{:<16}{:<16}{}", "ID", "First Name", "Last Name", "Email");
            println!("{}", "-".repeat(60));
            for customer in &customers {
                println!(
                    "{:<5}{:<16}{:<16}{}",
                    customer.id, customer.first_name, customer.last_name, customer.email
                );
            }
            println!("{}", "-".repeat(60));
        }
        Err(err) => report_db_error(&err),
    }
    pause();
}

async fn view_ledger(db: &Database) {
    match db.purchases().ledger().await {
        Ok(entries) => {
            println!();
            println!("--- All Purchase Records ---");
            println!(
                "{:<5}{:<12}{:<20}{:<20}{:<6}{:<10}{}",
                "ID", "Date", "Customer", "Product", "Qty", "Price", "Total"
            );
            println!("{}", "-".repeat(80));
            for entry in &entries {
                println!(
                    "{:<5}{:<12}{:<20}{:<20}{:<6}{:<10}{}",
                    entry.purchase_id,
                    entry.purchase_date.format("%Y-%m-%d").to_string(),
                    entry.customer_name,
                    entry.product_name,
                    entry.quantity,
                    entry.price_at_purchase().to_string(),
                    entry.total()
                );
            }
            println!("{}", "-".repeat(80));
        }
        Err(err) => report_db_error(&err),
    }
    pause();
}
