//! Record Desk CLI
//!
//! Runs one ATM or inventory action against the JSON stores and prints the
//! result.
//!
//! # Usage
//!
//! ```bash
//! record-desk [--data-dir DIR] atm <pin> balance|history
//! record-desk [--data-dir DIR] atm <pin> deposit|withdraw <amount>
//! record-desk [--data-dir DIR] atm <pin> change-pin <old> <new>
//! record-desk [--data-dir DIR] inventory <user> <password> add|edit <id> <name> <qty> <price>
//! record-desk [--data-dir DIR] inventory <user> <password> delete|get <id>
//! record-desk [--data-dir DIR] inventory <user> <password> list|sales-summary
//! record-desk [--data-dir DIR] inventory <user> <password> low-stock <threshold>
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use record_desk::{
    display, AmountRequest, Atm, ChangePinRequest, DataPaths, DeskError, FileStorage, Inventory,
    ProductRequest, Result, ThresholdRequest, UserDirectory,
};
use std::env;
use std::process;

const USAGE: &str = "Usage: record-desk [--data-dir DIR] atm <pin> <command> [args...] \
                     | record-desk [--data-dir DIR] inventory <user> <password> <command> [args...]";

fn main() {
    env_logger::init();

    match run() {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (paths, rest) = split_data_dir(&args)?;

    match rest {
        [app, tail @ ..] if app == "atm" => run_atm(&paths, tail),
        [app, tail @ ..] if app == "inventory" => run_inventory(&paths, tail),
        _ => Err(usage()),
    }
}

fn split_data_dir(args: &[String]) -> Result<(DataPaths, &[String])> {
    match args {
        [flag, dir, rest @ ..] if flag == "--data-dir" => Ok((DataPaths::in_dir(dir), rest)),
        [flag] if flag == "--data-dir" => Err(DeskError::Usage(
            "--data-dir requires a directory".to_string(),
        )),
        _ => Ok((DataPaths::default(), args)),
    }
}

fn run_atm(paths: &DataPaths, args: &[String]) -> Result<String> {
    let (pin, command, rest) = match args {
        [pin, command, rest @ ..] => (pin, command.as_str(), rest),
        _ => return Err(usage()),
    };

    let mut atm = Atm::open(FileStorage::new(&paths.atm_accounts))?;
    let welcome = display::welcome(atm.login(pin)?);

    let result = match (command, rest) {
        ("balance", []) => display::balance(atm.balance()?),
        ("deposit", [amount]) => display::deposit(&atm.deposit(&AmountRequest::parse(amount)?)?),
        ("withdraw", [amount]) => {
            display::withdrawal(&atm.withdraw(&AmountRequest::parse(amount)?)?)
        }
        ("history", []) => display::history(atm.history()?),
        ("change-pin", [old_pin, new_pin]) => {
            atm.change_pin(&ChangePinRequest::parse(old_pin, new_pin)?)?;
            "PIN changed successfully".to_string()
        }
        _ => return Err(usage()),
    };

    atm.logout();
    Ok(format!("{}\n{}", welcome, result))
}

fn run_inventory(paths: &DataPaths, args: &[String]) -> Result<String> {
    let (username, password, command, rest) = match args {
        [username, password, command, rest @ ..] => (username, password, command.as_str(), rest),
        _ => return Err(usage()),
    };

    UserDirectory::new(FileStorage::new(&paths.inventory_users)).login(username, password)?;
    let mut inventory = Inventory::new(FileStorage::new(&paths.inventory_products));

    let output = match (command, rest) {
        ("add", [id, name, quantity, price]) => {
            inventory.add(&ProductRequest::parse(id, name, quantity, price)?)?;
            "Product added successfully".to_string()
        }
        ("edit", [id, name, quantity, price]) => {
            inventory.edit(&ProductRequest::parse(id, name, quantity, price)?)?;
            "Product updated successfully".to_string()
        }
        ("delete", [id]) => {
            inventory.delete(id)?;
            "Product deleted successfully".to_string()
        }
        ("get", [id]) => match inventory.get(id)? {
            Some(product) => display::product_line(id, &product),
            None => return Err(DeskError::ProductNotFound { id: id.to_string() }),
        },
        ("list", []) => display::product_list(&inventory.list()?, "No products available"),
        ("low-stock", [threshold]) => display::stock_list(
            &inventory.low_stock(ThresholdRequest::parse(threshold)?)?,
            "No products below threshold",
        ),
        ("sales-summary", []) => {
            display::product_list(&inventory.sales_summary()?, "No products with sales")
        }
        _ => return Err(usage()),
    };

    Ok(output)
}

fn usage() -> DeskError {
    DeskError::Usage(USAGE.to_string())
}
