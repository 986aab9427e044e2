//! Text rendering for the command-line front end.

use crate::atm::{Account, Receipt};
use crate::inventory::Product;
use crate::money::Money;
use std::collections::BTreeMap;

pub fn welcome(account: &Account) -> String {
    format!("Welcome {}", account.name)
}

pub fn balance(balance: Money) -> String {
    format!("Your current balance is ${}", balance)
}

pub fn deposit(receipt: &Receipt) -> String {
    format!(
        "Deposited ${}. New balance is ${}",
        receipt.amount, receipt.balance
    )
}

pub fn withdrawal(receipt: &Receipt) -> String {
    format!(
        "Withdrew ${}. New balance is ${}",
        receipt.amount, receipt.balance
    )
}

pub fn history(entries: &[String]) -> String {
    let mut out = String::from("Transaction History:");
    for entry in entries {
        out.push('\n');
        out.push_str(entry);
    }
    out
}

pub fn product_line(id: &str, product: &Product) -> String {
    format!(
        "ID: {}, Name: {}, Quantity: {}, Price: ${}",
        id, product.name, product.quantity, product.price
    )
}

/// One line per product, with price. `empty` is returned when there are none.
pub fn product_list(products: &BTreeMap<String, Product>, empty: &str) -> String {
    render_lines(products, empty, product_line)
}

/// One line per product, without price.
pub fn stock_list(products: &BTreeMap<String, Product>, empty: &str) -> String {
    render_lines(products, empty, |id, product| {
        format!(
            "ID: {}, Name: {}, Quantity: {}",
            id, product.name, product.quantity
        )
    })
}

fn render_lines<F>(products: &BTreeMap<String, Product>, empty: &str, line: F) -> String
where
    F: Fn(&str, &Product) -> String,
{
    if products.is_empty() {
        return empty.to_string();
    }
    products
        .iter()
        .map(|(id, product)| line(id.as_str(), product))
        .collect::<Vec<_>>()
        .join("\n")
}
