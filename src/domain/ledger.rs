//! Expense tracking accounts.
//!
//! Amounts are integer minor units (cents). An account never goes negative:
//! an expense larger than the balance is rejected and leaves the account
//! untouched.

use crate::domain::kind::ErrorKind;
use std::collections::BTreeMap;

/// Error returned by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Amounts must be strictly positive
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),
    /// The expense exceeds the current balance
    #[error("insufficient balance: requested {requested}, available {balance}")]
    InsufficientBalance {
        /// Balance at the time of the request
        balance: i64,
        /// Amount that was requested
        requested: i64,
    },
    /// No expense was ever recorded under this category
    #[error("no expenses recorded for category '{0}'")]
    CategoryNotFound(String),
    /// No account with this name
    #[error("account '{0}' not found")]
    AccountNotFound(String),
    /// An account with this name is already open
    #[error("account '{0}' already exists")]
    AccountExists(String),
}

impl LedgerError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount(_) | LedgerError::AccountExists(_) => {
                ErrorKind::InvalidInput
            }
            LedgerError::InsufficientBalance { .. } => ErrorKind::ResourceExhausted,
            LedgerError::CategoryNotFound(_) | LedgerError::AccountNotFound(_) => {
                ErrorKind::NotFound
            }
        }
    }
}

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    /// Amount deducted
    pub amount: i64,
    /// Free-form category label
    pub category: String,
}

/// A single account with a balance and its expense history.
///
/// # Example
/// ```
/// use worker_throttle::{Account, LedgerError};
///
/// let mut account = Account::new("household", 5000);
/// account.add_expense(500, "food").unwrap();
/// assert_eq!(account.balance(), 4500);
///
/// let err = account.add_expense(6000, "x").unwrap_err();
/// assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
/// assert_eq!(account.balance(), 4500);
/// ```
#[derive(Debug, Clone)]
pub struct Account {
    name: String,
    balance: i64,
    expenses: Vec<Expense>,
}

impl Account {
    /// Open an account with an opening balance.
    pub fn new(name: impl Into<String>, opening_balance: i64) -> Self {
        Self {
            name: name.into(),
            balance: opening_balance,
            expenses: Vec::new(),
        }
    }

    /// Account name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current balance.
    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// All recorded expenses, oldest first.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Deduct an expense from the balance.
    ///
    /// # Errors
    /// `InvalidAmount` for non-positive amounts, `InsufficientBalance` when the
    /// amount exceeds the balance. The account is unchanged on error.
    pub fn add_expense(
        &mut self,
        amount: i64,
        category: impl Into<String>,
    ) -> Result<i64, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(LedgerError::InsufficientBalance {
                balance: self.balance,
                requested: amount,
            });
        }

        self.balance -= amount;
        self.expenses.push(Expense {
            amount,
            category: category.into(),
        });
        tracing::debug!(account = %self.name, amount, balance = self.balance, "expense recorded");
        Ok(self.balance)
    }

    /// Add income to the balance.
    ///
    /// # Errors
    /// `InvalidAmount` for non-positive amounts.
    pub fn add_income(&mut self, amount: i64) -> Result<i64, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }
        self.balance = self.balance.saturating_add(amount);
        Ok(self.balance)
    }

    /// Total spent under a category.
    ///
    /// # Errors
    /// `CategoryNotFound` if no expense was recorded under `category`.
    pub fn total_for(&self, category: &str) -> Result<i64, LedgerError> {
        let mut matched = self
            .expenses
            .iter()
            .filter(|e| e.category == category)
            .peekable();

        if matched.peek().is_none() {
            return Err(LedgerError::CategoryNotFound(category.to_string()));
        }
        Ok(matched.map(|e| e.amount).sum())
    }

    /// Totals per category, sorted by category name.
    pub fn totals_by_category(&self) -> BTreeMap<&str, i64> {
        let mut totals = BTreeMap::new();
        for expense in &self.expenses {
            *totals.entry(expense.category.as_str()).or_insert(0) += expense.amount;
        }
        totals
    }
}

/// A set of named accounts.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    accounts: BTreeMap<String, Account>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new account.
    ///
    /// # Errors
    /// `AccountExists` if the name is taken.
    pub fn open(
        &mut self,
        name: impl Into<String>,
        opening_balance: i64,
    ) -> Result<&mut Account, LedgerError> {
        let name = name.into();
        match self.accounts.entry(name) {
            std::collections::btree_map::Entry::Occupied(e) => {
                Err(LedgerError::AccountExists(e.key().clone()))
            }
            std::collections::btree_map::Entry::Vacant(e) => {
                let account = Account::new(e.key().clone(), opening_balance);
                Ok(e.insert(account))
            }
        }
    }

    /// Look up an account.
    pub fn account(&self, name: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .get(name)
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))
    }

    /// Look up an account for modification.
    pub fn account_mut(&mut self, name: &str) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(name)
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))
    }

    /// Sum of all balances.
    pub fn total_balance(&self) -> i64 {
        self.accounts.values().map(Account::balance).sum()
    }

    /// Number of open accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if no account is open.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_reduces_balance() {
        let mut account = Account::new("main", 5000);
        assert_eq!(account.add_expense(500, "food"), Ok(4500));
        assert_eq!(account.balance(), 4500);
        assert_eq!(account.expenses().len(), 1);
    }

    #[test]
    fn test_insufficient_balance_leaves_account_unchanged() {
        let mut account = Account::new("main", 5000);
        account.add_expense(500, "food").unwrap();

        let err = account.add_expense(6000, "x").unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                balance: 4500,
                requested: 6000
            }
        );
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
        assert_eq!(account.balance(), 4500);
        assert_eq!(account.expenses().len(), 1);
    }

    #[test]
    fn test_spending_entire_balance_is_allowed() {
        let mut account = Account::new("main", 100);
        assert_eq!(account.add_expense(100, "rent"), Ok(0));
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let mut account = Account::new("main", 100);
        assert_eq!(
            account.add_expense(0, "food"),
            Err(LedgerError::InvalidAmount(0))
        );
        assert_eq!(account.add_income(-5), Err(LedgerError::InvalidAmount(-5)));
        assert_eq!(
            LedgerError::InvalidAmount(0).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_category_totals() {
        let mut account = Account::new("main", 10_000);
        account.add_expense(300, "food").unwrap();
        account.add_expense(200, "food").unwrap();
        account.add_expense(1000, "rent").unwrap();

        assert_eq!(account.total_for("food"), Ok(500));
        let err = account.total_for("travel").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let totals = account.totals_by_category();
        assert_eq!(totals.get("rent"), Some(&1000));
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn test_ledger_lookup() {
        let mut ledger = Ledger::new();
        ledger.open("alice", 1000).unwrap();
        ledger.open("bob", 250).unwrap();

        assert!(matches!(
            ledger.open("alice", 1),
            Err(LedgerError::AccountExists(_))
        ));

        ledger.account_mut("bob").unwrap().add_income(50).unwrap();
        assert_eq!(ledger.account("bob").unwrap().balance(), 300);
        assert_eq!(ledger.total_balance(), 1300);

        let err = ledger.account("carol").unwrap_err();
        assert_eq!(err, LedgerError::AccountNotFound("carol".to_string()));
    }
}
