//! # Record Desk
//!
//! Two small record stores kept in flat JSON files: ATM accounts keyed by PIN,
//! and an inventory of products gated by a username/password file.
//!
//! ## Design Principles
//!
//! - **Whole-file persistence**: a store is read in full and rewritten in full
//!   after every mutation; last writer wins
//! - **Fixed-point money**: 2 decimal places via `rust_decimal`
//! - **Validated requests**: free-text input becomes a typed request before it
//!   reaches a store
//! - **Injected storage**: stores are generic over [`Storage`], so tests run
//!   against [`MemoryStorage`]
//!
//! ## Example
//!
//! ```
//! use record_desk::{AmountRequest, Atm, MemoryStorage};
//!
//! let storage = MemoryStorage::with_contents(
//!     r#"{"1001": {"name": "Alice", "balance": 100.0, "transactions": []}}"#,
//! );
//! let mut atm = Atm::open(storage).unwrap();
//! atm.login("1001").unwrap();
//!
//! assert!(atm.withdraw(&AmountRequest::parse("150").unwrap()).is_err());
//! let receipt = atm.withdraw(&AmountRequest::parse("40").unwrap()).unwrap();
//! assert_eq!(receipt.balance.to_string(), "60.00");
//! assert_eq!(atm.history().unwrap(), ["Withdrew $40.00"]);
//! ```

pub mod atm;
pub mod config;
pub mod display;
pub mod error;
pub mod inventory;
pub mod money;
pub mod request;
pub mod storage;

pub use atm::{Account, Atm, Receipt};
pub use config::DataPaths;
pub use error::{DeskError, Result};
pub use inventory::{Inventory, Product, UserDirectory};
pub use money::Money;
pub use request::{AmountRequest, ChangePinRequest, ProductRequest, ThresholdRequest};
pub use storage::{load_records, save_records, FileStorage, MemoryStorage, Storage};
