//! ATM accounts and the single-user session that mutates them.
//!
//! The whole account map is loaded once when the session opens and stays
//! resident; every successful mutation rewrites the backing file.

use crate::error::{DeskError, Result};
use crate::money::Money;
use crate::request::{AmountRequest, ChangePinRequest};
use crate::storage::{load_records, save_records, Storage};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One account, stored under its PIN.
///
/// # Invariants
///
/// - `balance >= 0` at all times
/// - `balance` only changes through [`Atm::deposit`] and [`Atm::withdraw`]
/// - `transactions` is append-only, oldest entry first
///
/// Loading a stored account with a negative balance fails with
/// [`DeskError::NegativeValue`], so the invariant also holds for files written
/// by other tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredAccount")]
pub struct Account {
    /// Account holder, shown in the welcome line.
    pub name: String,

    balance: Money,

    transactions: Vec<String>,
}

/// On-disk shape of an [`Account`], before validation.
#[derive(Deserialize)]
struct StoredAccount {
    name: String,
    balance: Money,
    #[serde(default)]
    transactions: Vec<String>,
}

impl TryFrom<StoredAccount> for Account {
    type Error = DeskError;

    fn try_from(stored: StoredAccount) -> Result<Self> {
        let mut account = Account::new(stored.name, stored.balance)?;
        account.transactions = stored.transactions;
        Ok(account)
    }
}

impl Account {
    /// Creates an account with an opening balance and an empty log.
    pub fn new(name: impl Into<String>, balance: Money) -> Result<Self> {
        if balance.is_negative() {
            return Err(DeskError::NegativeValue { field: "balance" });
        }
        Ok(Account {
            name: name.into(),
            balance,
            transactions: Vec::new(),
        })
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn transactions(&self) -> &[String] {
        &self.transactions
    }

    /// Fails without touching the account if the new balance would not fit.
    fn deposit(&mut self, amount: Money) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(DeskError::AmountTooLarge)?;
        self.transactions.push(format!("Deposited ${}", amount));
        Ok(())
    }

    /// Fails without touching the account if `amount` exceeds the balance.
    fn withdraw(&mut self, amount: Money) -> Result<()> {
        if amount > self.balance {
            return Err(DeskError::InsufficientFunds);
        }
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(DeskError::AmountTooLarge)?;
        self.transactions.push(format!("Withdrew ${}", amount));
        Ok(())
    }
}

/// Outcome of a deposit or withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub amount: Money,
    pub balance: Money,
}

/// An ATM session over an account store.
///
/// Only one PIN is logged in at a time. Every operation except [`Atm::login`]
/// acts on that PIN's account and fails with [`DeskError::NotLoggedIn`]
/// otherwise.
pub struct Atm<S: Storage> {
    storage: S,
    accounts: BTreeMap<String, Account>,
    current_pin: Option<String>,
}

impl<S: Storage> Atm<S> {
    /// Loads the account store. A missing or malformed backing starts empty.
    pub fn open(storage: S) -> Result<Self> {
        let accounts = load_records(&storage)?;
        debug!("Loaded {} accounts from {}", accounts.len(), storage.describe());
        Ok(Atm {
            storage,
            accounts,
            current_pin: None,
        })
    }

    /// Starts a session if `pin` belongs to an account.
    pub fn login(&mut self, pin: &str) -> Result<&Account> {
        let account = self.accounts.get(pin).ok_or(DeskError::InvalidPin)?;
        info!("Session opened for {}", account.name);
        self.current_pin = Some(pin.to_string());
        Ok(account)
    }

    pub fn logout(&mut self) {
        if self.current_pin.take().is_some() {
            info!("Session closed");
        }
    }

    pub fn current_pin(&self) -> Option<&str> {
        self.current_pin.as_deref()
    }

    /// The logged-in account.
    pub fn account(&self) -> Result<&Account> {
        let pin = self.session_pin()?;
        self.accounts.get(pin).ok_or(DeskError::AccountNotFound)
    }

    pub fn balance(&self) -> Result<Money> {
        self.account().map(Account::balance)
    }

    pub fn history(&self) -> Result<&[String]> {
        self.account().map(Account::transactions)
    }

    /// All accounts currently held in memory.
    pub fn accounts(&self) -> &BTreeMap<String, Account> {
        &self.accounts
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Credits the logged-in account and persists the store.
    pub fn deposit(&mut self, request: &AmountRequest) -> Result<Receipt> {
        let amount = request.amount();
        let pin = self.session_pin()?.to_string();
        let account = self
            .accounts
            .get_mut(&pin)
            .ok_or(DeskError::AccountNotFound)?;

        let before = account.clone();
        if let Err(e) = account.deposit(amount) {
            debug!("Deposit of {} refused: {}", amount, e);
            return Err(e);
        }
        let receipt = Receipt {
            amount,
            balance: account.balance,
        };

        self.persist_or_restore(|accounts| {
            accounts.insert(pin, before);
        })?;
        debug!("Deposited {}, balance now {}", amount, receipt.balance);
        Ok(receipt)
    }

    /// Debits the logged-in account and persists the store.
    ///
    /// Fails with [`DeskError::InsufficientFunds`] if the amount exceeds the
    /// balance; nothing is changed or written in that case.
    pub fn withdraw(&mut self, request: &AmountRequest) -> Result<Receipt> {
        let amount = request.amount();
        let pin = self.session_pin()?.to_string();
        let account = self
            .accounts
            .get_mut(&pin)
            .ok_or(DeskError::AccountNotFound)?;

        let before = account.clone();
        if let Err(e) = account.withdraw(amount) {
            debug!("Withdrawal of {} refused: {}", amount, e);
            return Err(e);
        }
        let receipt = Receipt {
            amount,
            balance: account.balance,
        };

        self.persist_or_restore(|accounts| {
            accounts.insert(pin, before);
        })?;
        debug!("Withdrew {}, balance now {}", amount, receipt.balance);
        Ok(receipt)
    }

    /// Moves the logged-in account to a new PIN.
    ///
    /// The record itself is unchanged; only its key and the session identity
    /// move.
    pub fn change_pin(&mut self, request: &ChangePinRequest) -> Result<()> {
        let current = self.session_pin()?.to_string();
        if request.old_pin != current {
            return Err(DeskError::PinMismatch);
        }
        if self.accounts.contains_key(&request.new_pin) {
            return Err(DeskError::PinInUse);
        }

        let account = self
            .accounts
            .remove(&current)
            .ok_or(DeskError::AccountNotFound)?;
        self.accounts.insert(request.new_pin.clone(), account);

        let new_pin = request.new_pin.clone();
        self.persist_or_restore(move |accounts| {
            if let Some(account) = accounts.remove(&new_pin) {
                accounts.insert(current, account);
            }
        })?;

        self.current_pin = Some(request.new_pin.clone());
        debug!("PIN changed for {}", self.account()?.name);
        Ok(())
    }

    fn session_pin(&self) -> Result<&str> {
        self.current_pin.as_deref().ok_or(DeskError::NotLoggedIn)
    }

    /// Writes the store; on failure applies `undo` so memory matches disk again.
    fn persist_or_restore<F>(&mut self, undo: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, Account>),
    {
        if let Err(e) = save_records(&mut self.storage, &self.accounts) {
            undo(&mut self.accounts);
            return Err(e);
        }
        Ok(())
    }
}
