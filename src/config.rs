//! Locations of the backing files.

use std::path::{Path, PathBuf};

/// Paths of the three JSON stores.
///
/// The defaults are relative to the working directory: the ATM keeps its
/// accounts in `users.json`, the inventory keeps `data/users.json` and
/// `data/products.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub atm_accounts: PathBuf,
    pub inventory_users: PathBuf,
    pub inventory_products: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            atm_accounts: PathBuf::from("users.json"),
            inventory_users: PathBuf::from("data").join("users.json"),
            inventory_products: PathBuf::from("data").join("products.json"),
        }
    }
}

impl DataPaths {
    /// Places every store directly under `dir`.
    ///
    /// The ATM and inventory both use `users.json`; point them at different
    /// directories if both run against the same tree.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        DataPaths {
            atm_accounts: dir.join("users.json"),
            inventory_users: dir.join("users.json"),
            inventory_products: dir.join("products.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let paths = DataPaths::default();
        assert_eq!(paths.atm_accounts, Path::new("users.json"));
        assert_eq!(paths.inventory_users, Path::new("data/users.json"));
        assert_eq!(paths.inventory_products, Path::new("data/products.json"));
    }

    #[test]
    fn test_in_dir() {
        let paths = DataPaths::in_dir("/srv/desk");
        assert_eq!(paths.atm_accounts, Path::new("/srv/desk/users.json"));
        assert_eq!(paths.inventory_products, Path::new("/srv/desk/products.json"));
    }
}
