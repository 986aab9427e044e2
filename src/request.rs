//! Typed requests built from free-text input.
//!
//! Every request is validated when it is parsed, so the store operations only
//! ever see well-formed values.

use crate::error::{DeskError, Result};
use crate::money::Money;
use std::str::FromStr;

/// A deposit or withdrawal amount. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRequest {
    amount: Money,
}

impl AmountRequest {
    pub fn parse(input: &str) -> Result<Self> {
        let amount = parse_money("amount", input)?;
        Self::new(amount)
    }

    pub fn new(amount: Money) -> Result<Self> {
        if !amount.is_positive() {
            return Err(DeskError::NonPositiveAmount);
        }
        Ok(AmountRequest { amount })
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}

/// A PIN change: the PIN the user believes is current, and the replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePinRequest {
    pub old_pin: String,
    pub new_pin: String,
}

impl ChangePinRequest {
    pub fn parse(old_pin: &str, new_pin: &str) -> Result<Self> {
        Ok(ChangePinRequest {
            old_pin: old_pin.to_string(),
            new_pin: required("new PIN", new_pin)?,
        })
    }
}

/// A full product record keyed by its id, as used by add and edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRequest {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: Money,
}

impl ProductRequest {
    pub fn parse(id: &str, name: &str, quantity: &str, price: &str) -> Result<Self> {
        let id = required("product ID", id)?;
        let name = required("product name", name)?;

        let quantity = parse_integer("quantity", quantity)?;
        let quantity = u32::try_from(quantity).map_err(|_| {
            if quantity < 0 {
                DeskError::NegativeValue { field: "quantity" }
            } else {
                DeskError::InvalidNumber {
                    field: "quantity",
                    value: quantity.to_string(),
                }
            }
        })?;

        let price = parse_money("price", price)?;
        if price.is_negative() {
            return Err(DeskError::NegativeValue { field: "price" });
        }

        Ok(ProductRequest {
            id,
            name,
            quantity,
            price,
        })
    }
}

/// Stock threshold for the low-stock report. Any integer is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdRequest(pub i64);

impl ThresholdRequest {
    pub fn parse(input: &str) -> Result<Self> {
        parse_integer("threshold", input).map(ThresholdRequest)
    }
}

fn required(field: &'static str, input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DeskError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

fn parse_money(field: &'static str, input: &str) -> Result<Money> {
    Money::from_str(input).map_err(|e| match e {
        rust_decimal::Error::ExceedsMaximumPossibleValue
        | rust_decimal::Error::LessThanMinimumPossibleValue => DeskError::AmountTooLarge,
        _ => DeskError::InvalidNumber {
            field,
            value: input.to_string(),
        },
    })
}

fn parse_integer(field: &'static str, input: &str) -> Result<i64> {
    input.trim().parse().map_err(|_| DeskError::InvalidNumber {
        field,
        value: input.to_string(),
    })
}
