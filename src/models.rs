// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Which running total a transaction feeds.
///
/// Records written by other clients may carry tags this build does not know;
/// they are kept as `Unknown` and ignored by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Income,
    Expense,
    Savings,
    Lend,
    Owe,
    Unknown(String),
}

impl Category {
    pub const KNOWN: [Category; 5] = [
        Category::Income,
        Category::Expense,
        Category::Savings,
        Category::Lend,
        Category::Owe,
    ];

    /// Strict parse used for user input: only the five known tags.
    pub fn known(s: &str) -> Option<Category> {
        Some(Category::from(s.trim().to_lowercase().as_str())).filter(Category::is_known)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Savings => "savings",
            Self::Lend => "lend",
            Self::Owe => "owe",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Quick-action caption.
    pub fn action_label(&self) -> &str {
        match self {
            Self::Income => "Earn",
            Self::Expense => "Spend",
            Self::Savings => "Save",
            Self::Lend => "I Lent Money",
            Self::Owe => "I Borrowed",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn form_title(&self) -> &str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Savings => "Savings",
            Self::Lend => "Loan (Lend)",
            Self::Owe => "Debt (Borrow)",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn label_prompt(&self) -> &'static str {
        match self {
            Self::Lend => "Who did you lend to?",
            Self::Owe => "Who did you borrow from?",
            _ => "Description",
        }
    }

    /// Sign shown next to the amount in the activity list.
    pub fn list_sign(&self) -> &'static str {
        match self {
            Self::Income => "+",
            Self::Expense | Self::Savings => "-",
            _ => "",
        }
    }

    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Self::Lend => Some("Asset"),
            Self::Owe => Some("Liability"),
            _ => None,
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s {
            "income" => Self::Income,
            "expense" => Self::Expense,
            "savings" => Self::Savings,
            "lend" => Self::Lend,
            "owe" => Self::Owe,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from(s.as_str())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque id of an anonymous session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(pub String);

impl Identity {
    pub fn uid(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned document id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: DocumentId,
    pub amount: Decimal,
    pub category: Category,
    pub label: String,
    /// `None` while the server has not stamped the record yet.
    pub created_at: Option<DateTime<Utc>>,
}

/// Validated input ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub category: Category,
    pub label: String,
}

/// Largest amount a single entry may carry: one trillion.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Raw input fields of the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub category: Category,
    pub amount: String,
    pub label: String,
}

impl EntryForm {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            amount: String::new(),
            label: String::new(),
        }
    }

    pub fn filled(category: Category, amount: &str, label: &str) -> Self {
        Self {
            category,
            amount: amount.to_string(),
            label: label.to_string(),
        }
    }

    pub fn validate(&self) -> Result<NewTransaction, ValidationError> {
        let raw = self.amount.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingAmount);
        }
        let amount = raw
            .parse::<Decimal>()
            .map_err(|_| ValidationError::InvalidAmount(raw.to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge {
                amount,
                max: MAX_AMOUNT,
            });
        }
        let label = self.label.trim();
        if label.is_empty() {
            return Err(ValidationError::MissingLabel);
        }
        Ok(NewTransaction {
            amount,
            category: self.category.clone(),
            label: label.to_string(),
        })
    }

    /// Reset the text fields, keeping the selected category.
    pub fn clear(&mut self) {
        self.amount.clear();
        self.label.clear();
    }
}

/// Running totals. Arithmetic saturates at the `Decimal` range, so records
/// written by other clients can never overflow the fold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub income: Decimal,
    pub expense: Decimal,
    pub savings: Decimal,
    pub owed_to_me: Decimal,
    pub i_owe: Decimal,
}

impl SummaryStats {
    /// Spendable funds.
    pub fn balance(&self) -> Decimal {
        self.income
            .saturating_sub(self.expense)
            .saturating_sub(self.savings)
    }

    /// Positive when the user is a net creditor.
    pub fn net_debt(&self) -> Decimal {
        self.owed_to_me.saturating_sub(self.i_owe)
    }

    pub fn record(&mut self, category: &Category, amount: Decimal) {
        let total = match category {
            Category::Income => &mut self.income,
            Category::Expense => &mut self.expense,
            Category::Savings => &mut self.savings,
            Category::Lend => &mut self.owed_to_me,
            Category::Owe => &mut self.i_owe,
            Category::Unknown(_) => return,
        };
        *total = total.saturating_add(amount);
    }
}
