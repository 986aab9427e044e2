//! Inventory users and products.
//!
//! Unlike the ATM session, nothing is kept resident here: each call reloads
//! its file, applies the change and writes the whole file back.

use crate::error::{DeskError, Result};
use crate::money::Money;
use crate::request::{ProductRequest, ThresholdRequest};
use crate::storage::{load_records, save_records, Storage};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stocked product, stored under its id.
///
/// Quantity and price are never negative. A stored product that breaks this
/// fails to load with [`DeskError::NegativeValue`] instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredProduct")]
pub struct Product {
    pub name: String,
    pub quantity: u32,
    pub price: Money,
}

/// On-disk shape of a [`Product`], before validation.
#[derive(Deserialize)]
struct StoredProduct {
    name: String,
    quantity: i64,
    price: Money,
}

impl TryFrom<StoredProduct> for Product {
    type Error = DeskError;

    fn try_from(stored: StoredProduct) -> Result<Self> {
        let quantity = u32::try_from(stored.quantity).map_err(|_| {
            if stored.quantity < 0 {
                DeskError::NegativeValue { field: "quantity" }
            } else {
                DeskError::InvalidNumber {
                    field: "quantity",
                    value: stored.quantity.to_string(),
                }
            }
        })?;
        if stored.price.is_negative() {
            return Err(DeskError::NegativeValue { field: "price" });
        }
        Ok(Product {
            name: stored.name,
            quantity,
            price: stored.price,
        })
    }
}

impl From<&ProductRequest> for Product {
    fn from(request: &ProductRequest) -> Self {
        Product {
            name: request.name.clone(),
            quantity: request.quantity,
            price: request.price,
        }
    }
}

/// Username to password map used to gate the inventory.
pub struct UserDirectory<S: Storage> {
    storage: S,
}

impl<S: Storage> UserDirectory<S> {
    pub fn new(storage: S) -> Self {
        UserDirectory { storage }
    }

    /// Returns `true` if `password` exactly matches the stored one.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let users: BTreeMap<String, String> = load_records(&self.storage)?;
        let matched = users.get(username).map(String::as_str) == Some(password);
        if matched {
            info!("User {} logged in", username);
        } else {
            debug!("Rejected login for {}", username);
        }
        Ok(matched)
    }

    /// Like [`UserDirectory::authenticate`], but a mismatch is an error.
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        if self.authenticate(username, password)? {
            Ok(())
        } else {
            Err(DeskError::InvalidCredentials)
        }
    }

}

/// Product store with CRUD and stock reports.
pub struct Inventory<S: Storage> {
    storage: S,
}

impl<S: Storage> Inventory<S> {
    pub fn new(storage: S) -> Self {
        Inventory { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stores the product, replacing any existing record with the same id.
    ///
    /// Returns the replaced record, if there was one.
    pub fn add(&mut self, request: &ProductRequest) -> Result<Option<Product>> {
        let mut products = self.load()?;
        let previous = products.insert(request.id.clone(), Product::from(request));
        if let Some(previous) = &previous {
            warn!(
                "Product {} already existed ({}), overwriting",
                request.id, previous.name
            );
        }
        save_records(&mut self.storage, &products)?;
        debug!("Added product {}", request.id);
        Ok(previous)
    }

    /// Replaces name, quantity and price of an existing product.
    ///
    /// Returns the record as it was before the edit.
    pub fn edit(&mut self, request: &ProductRequest) -> Result<Product> {
        let mut products = self.load()?;
        let slot = products
            .get_mut(&request.id)
            .ok_or_else(|| DeskError::ProductNotFound {
                id: request.id.clone(),
            })?;
        let previous = std::mem::replace(slot, Product::from(request));
        save_records(&mut self.storage, &products)?;
        debug!("Edited product {}", request.id);
        Ok(previous)
    }

    /// Removes a product and returns it.
    pub fn delete(&mut self, id: &str) -> Result<Product> {
        let mut products = self.load()?;
        let removed = products
            .remove(id)
            .ok_or_else(|| DeskError::ProductNotFound { id: id.to_string() })?;
        save_records(&mut self.storage, &products)?;
        debug!("Deleted product {}", id);
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.load()?.remove(id))
    }

    pub fn list(&self) -> Result<BTreeMap<String, Product>> {
        self.load()
    }

    /// Products whose quantity is strictly below `threshold`.
    pub fn low_stock(&self, threshold: ThresholdRequest) -> Result<BTreeMap<String, Product>> {
        let ThresholdRequest(threshold) = threshold;
        self.filter(|product| i64::from(product.quantity) < threshold)
    }

    /// Products with any stock left.
    ///
    /// No sales are recorded, so this is the in-stock listing shown under the
    /// "sales summary" heading.
    pub fn sales_summary(&self) -> Result<BTreeMap<String, Product>> {
        self.filter(|product| product.quantity > 0)
    }

    fn filter<F>(&self, keep: F) -> Result<BTreeMap<String, Product>>
    where
        F: Fn(&Product) -> bool,
    {
        let mut products = self.load()?;
        products.retain(|_, product| keep(product));
        Ok(products)
    }

    fn load(&self) -> Result<BTreeMap<String, Product>> {
        load_records(&self.storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn request(id: &str, name: &str, quantity: &str, price: &str) -> ProductRequest {
        ProductRequest::parse(id, name, quantity, price).unwrap()
    }

    fn stocked() -> Inventory<MemoryStorage> {
        let mut inventory = Inventory::new(MemoryStorage::new());
        inventory.add(&request("p1", "Widget", "10", "2.50")).unwrap();
        inventory.add(&request("p2", "Gadget", "0", "15")).unwrap();
        inventory.add(&request("p3", "Doohickey", "3", "0.99")).unwrap();
        inventory
    }

    #[test]
    fn test_authenticate_exact_match() {
        let users = UserDirectory::new(MemoryStorage::with_contents(r#"{"admin": "hunter2"}"#));
        assert!(users.authenticate("admin", "hunter2").unwrap());
        assert!(!users.authenticate("admin", "Hunter2").unwrap());
        assert!(!users.authenticate("nobody", "hunter2").unwrap());
    }

    #[test]
    fn test_login_maps_mismatch_to_error() {
        let users = UserDirectory::new(MemoryStorage::with_contents(r#"{"admin": "pw"}"#));
        assert!(users.login("admin", "pw").is_ok());
        assert!(matches!(
            users.login("admin", "nope").unwrap_err(),
            DeskError::InvalidCredentials
        ));
    }

    #[test]
    fn test_missing_user_file_rejects_everyone() {
        let users = UserDirectory::new(MemoryStorage::new());
        assert!(!users.authenticate("", "").unwrap());
    }

    #[test]
    fn test_add_and_get() {
        let inventory = stocked();
        let widget = inventory.get("p1").unwrap().unwrap();
        assert_eq!(widget.name, "Widget");
        assert_eq!(widget.quantity, 10);
        assert_eq!(widget.price.to_string(), "2.50");
        assert!(inventory.get("nope").unwrap().is_none());
    }

    #[test]
    fn test_add_overwrites_existing_id() {
        let mut inventory = stocked();
        let previous = inventory
            .add(&request("p1", "Widget v2", "1", "3"))
            .unwrap()
            .unwrap();

        assert_eq!(previous.name, "Widget");
        assert_eq!(inventory.get("p1").unwrap().unwrap().name, "Widget v2");
        assert_eq!(inventory.list().unwrap().len(), 3);
    }

    #[test]
    fn test_edit_replaces_record() {
        let mut inventory = stocked();
        let previous = inventory.edit(&request("p3", "Thing", "7", "1")).unwrap();

        assert_eq!(previous.name, "Doohickey");
        let edited = inventory.get("p3").unwrap().unwrap();
        assert_eq!(edited.name, "Thing");
        assert_eq!(edited.quantity, 7);
    }

    #[test]
    fn test_edit_missing_product_leaves_store_unchanged() {
        let mut inventory = stocked();
        let writes = inventory.storage().writes();
        let before = inventory.list().unwrap();

        let err = inventory.edit(&request("p9", "Ghost", "1", "1")).unwrap_err();

        assert!(matches!(err, DeskError::ProductNotFound { ref id } if id == "p9"));
        assert_eq!(inventory.list().unwrap(), before);
        assert_eq!(inventory.storage().writes(), writes);
    }

    #[test]
    fn test_delete() {
        let mut inventory = stocked();
        let removed = inventory.delete("p2").unwrap();
        assert_eq!(removed.name, "Gadget");
        assert!(inventory.get("p2").unwrap().is_none());

        assert!(matches!(
            inventory.delete("p2").unwrap_err(),
            DeskError::ProductNotFound { .. }
        ));
    }

    #[test]
    fn test_low_stock_is_strictly_below_threshold() {
        let inventory = stocked();
        let low = inventory.low_stock(ThresholdRequest(3)).unwrap();
        assert_eq!(low.keys().collect::<Vec<_>>(), ["p2"]);

        let low = inventory.low_stock(ThresholdRequest(11)).unwrap();
        assert_eq!(low.len(), 3);

        assert!(inventory.low_stock(ThresholdRequest(-1)).unwrap().is_empty());
    }

    #[test]
    fn test_sales_summary_lists_in_stock_products() {
        let inventory = stocked();
        let summary = inventory.sales_summary().unwrap();
        assert_eq!(summary.keys().collect::<Vec<_>>(), ["p1", "p3"]);
    }

    #[test]
    fn test_stored_negative_values_fail_without_wiping() {
        let contents = r#"{
            "p1": {"name": "Widget", "quantity": 4, "price": 1},
            "p2": {"name": "Backorder", "quantity": -3, "price": 1}
        }"#;
        let mut inventory = Inventory::new(MemoryStorage::with_contents(contents));

        let err = inventory.list().unwrap_err();
        assert!(matches!(err, DeskError::InvalidRecord { ref id, .. } if id == "p2"));
        assert!(err.to_string().contains("Value for quantity must not be negative"));

        assert!(inventory
            .add(&request("p3", "Gizmo", "1", "1"))
            .is_err());
        assert_eq!(inventory.storage().writes(), 0);
        assert_eq!(inventory.storage().contents(), Some(contents));
    }

    #[test]
    fn test_stored_negative_price_is_rejected() {
        let inventory = Inventory::new(MemoryStorage::with_contents(
            r#"{"p1": {"name": "Widget", "quantity": 4, "price": -0.5}}"#,
        ));
        assert!(matches!(
            inventory.get("p1").unwrap_err(),
            DeskError::InvalidRecord { .. }
        ));
    }

    #[test]
    fn test_reads_file_written_by_other_tools() {
        let inventory = Inventory::new(MemoryStorage::with_contents(
            r#"{
    "42": {
        "name": "Bolt",
        "quantity": 500,
        "price": 0.1
    }
}"#,
        ));
        let bolt = inventory.get("42").unwrap().unwrap();
        assert_eq!(bolt.quantity, 500);
        assert_eq!(bolt.price.to_string(), "0.10");
    }
}
