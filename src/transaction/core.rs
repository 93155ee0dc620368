//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, user::UserID};

/// A type alias for transaction IDs.
pub type TransactionId = i64;

/// The minimum number of characters a transaction description must have.
pub const MIN_DESCRIPTION_LENGTH: usize = 2;

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction brought money in or took money out.
///
/// Amounts are always positive; this type carries the direction. The two
/// expense variants are treated identically for totals and category
/// breakdowns (the "expense family").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionType {
    /// Money coming in, e.g. a salary payment.
    Revenue,
    /// A recurring expense with a fixed amount, e.g. rent.
    FixedExpense,
    /// An expense that varies from month to month, e.g. groceries.
    VariableExpense,
}

impl TransactionType {
    /// All transaction types, in the order they appear in form selects.
    pub const ALL: [TransactionType; 3] = [
        TransactionType::Revenue,
        TransactionType::FixedExpense,
        TransactionType::VariableExpense,
    ];

    /// The canonical string stored in the database and used in forms.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Revenue => "revenue",
            TransactionType::FixedExpense => "fixed-expense",
            TransactionType::VariableExpense => "variable-expense",
        }
    }

    /// The human readable label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Revenue => "Revenue",
            TransactionType::FixedExpense => "Fixed expense",
            TransactionType::VariableExpense => "Variable expense",
        }
    }

    /// Whether this type belongs to the expense family.
    ///
    /// This is an exact membership test against the closed set of expense
    /// variants, not a string-prefix check, so a malformed type can never be
    /// silently counted as an expense.
    pub fn is_expense(self) -> bool {
        matches!(
            self,
            TransactionType::FixedExpense | TransactionType::VariableExpense
        )
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "revenue" => Ok(TransactionType::Revenue),
            "fixed-expense" => Ok(TransactionType::FixedExpense),
            "variable-expense" => Ok(TransactionType::VariableExpense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

/// An event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the user the transaction belongs to.
    pub user_id: UserID,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction.
    ///
    /// Always positive; [Transaction::transaction_type] carries the
    /// direction.
    pub amount: Decimal,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction is revenue or one of the expense variants.
    pub transaction_type: TransactionType,
    /// The category of the transaction, e.g. "Housing", "Transport".
    pub category: Option<String>,
    /// How the transaction was paid, e.g. "Credit card", "Pix".
    pub payment_method: Option<String>,
    /// When the transaction was recorded, set by the database.
    pub created_at: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        description: &str,
        amount: Decimal,
        date: Date,
        transaction_type: TransactionType,
    ) -> TransactionBuilder {
        TransactionBuilder {
            description: description.to_owned(),
            amount,
            date,
            transaction_type,
            category: None,
            payment_method: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The required fields are set up front and the optional fields through the
/// builder methods. Pass the finished builder to [create_transaction] or
/// [update_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A human-readable description of the transaction,
    /// e.g. "Salary - January", "Rent".
    pub description: String,

    /// The monetary amount of the transaction. Must be greater than zero.
    pub amount: Decimal,

    /// The date when the transaction occurred.
    pub date: Date,

    /// Whether the transaction is revenue or one of the expense variants.
    pub transaction_type: TransactionType,

    /// The category of the transaction, e.g. "Housing", "Transport".
    pub category: Option<String>,

    /// How the transaction was paid, e.g. "Credit card", "Pix".
    pub payment_method: Option<String>,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    ///
    /// An empty string is treated the same as no category.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|value| !value.is_empty());
        self
    }

    /// Set the payment method for the transaction.
    ///
    /// An empty string is treated the same as no payment method.
    pub fn payment_method(mut self, payment_method: Option<String>) -> Self {
        self.payment_method = payment_method.filter(|value| !value.is_empty());
        self
    }

    /// Check the field constraints that must hold before the builder may be
    /// written to the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DescriptionTooShort] if the description has fewer than
    ///   [MIN_DESCRIPTION_LENGTH] characters,
    /// - or [Error::NonPositiveAmount] if the amount is zero or negative.
    fn validate(&self) -> Result<(), Error> {
        if self.description.trim().chars().count() < MIN_DESCRIPTION_LENGTH {
            return Err(Error::DescriptionTooShort);
        }

        if self.amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// The validation errors below are detected before any database call.
///
/// # Errors
/// This function will return a:
/// - [Error::DescriptionTooShort] if the description is under the minimum length,
/// - or [Error::NonPositiveAmount] if the amount is zero or negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    owner: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, description, amount, date, type, category, payment_method)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, description, amount, date, type, category, payment_method, created_at",
        )?
        .query_one(
            (
                owner.as_i64(),
                &builder.description,
                builder.amount.to_string(),
                builder.date,
                builder.transaction_type.as_str(),
                &builder.category,
                &builder.payment_method,
            ),
            map_transaction_row,
        )
        .map_err(Error::from)?;

    Ok(transaction)
}

/// Retrieve one of `owner`'s transactions from the database by its `id`.
///
/// Another owner's transaction with the same `id` behaves as a missing row.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of `owner`'s transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    owner: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, description, amount, date, type, category, payment_method, created_at \
            FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        )?
        .query_one((id, owner.as_i64()), map_transaction_row)
        .map_err(Error::from)?;

    Ok(transaction)
}

/// Replace the mutable fields of one of `owner`'s transactions.
///
/// The id, owner and creation timestamp are retained; everything else is
/// overwritten with the contents of `builder`.
///
/// # Errors
/// This function will return a:
/// - [Error::DescriptionTooShort] if the description is under the minimum length,
/// - or [Error::NonPositiveAmount] if the amount is zero or negative,
/// - or [Error::UpdateMissingTransaction] if `id` does not refer to one of
///   `owner`'s transactions,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    owner: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    builder.validate()?;

    let rows_affected = connection.execute(
        "UPDATE \"transaction\" \
        SET description = ?1, amount = ?2, date = ?3, type = ?4, category = ?5, payment_method = ?6 \
        WHERE id = ?7 AND user_id = ?8",
        (
            &builder.description,
            builder.amount.to_string(),
            builder.date,
            builder.transaction_type.as_str(),
            &builder.category,
            &builder.payment_method,
            id,
            owner.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete one of `owner`'s transactions by its `id`.
///
/// Deletion is permanent, there is no soft delete.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to one of
///   `owner`'s transactions,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    owner: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                amount TEXT NOT NULL,
                date TEXT NOT NULL,
                type TEXT NOT NULL,
                category TEXT,
                payment_method TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    // Composite index used by the transactions page and dashboard queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_owner_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The amount and type columns hold canonical text encodings; a row whose
/// type string is not one of the known variants is rejected here as a
/// data-integrity error rather than miscategorized.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id: i64 = row.get(1)?;
    let description = row.get(2)?;
    let amount_text: String = row.get(3)?;
    let amount = Decimal::from_str(&amount_text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error)))?;
    let date = row.get(4)?;
    let type_text: String = row.get(5)?;
    let transaction_type = TransactionType::from_str(&type_text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(error)))?;
    let category = row.get(6)?;
    let payment_method = row.get(7)?;
    let created_at = row.get(8)?;

    Ok(Transaction {
        id,
        user_id: UserID::new(user_id),
        description,
        amount,
        date,
        transaction_type,
        category,
        payment_method,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod transaction_type_tests {
    use std::str::FromStr;

    use crate::Error;

    use super::TransactionType;

    #[test]
    fn round_trips_canonical_strings() {
        for transaction_type in TransactionType::ALL {
            let parsed = TransactionType::from_str(transaction_type.as_str()).unwrap();

            assert_eq!(parsed, transaction_type);
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let result = TransactionType::from_str("despesa");

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("despesa".to_owned()))
        );
    }

    #[test]
    fn expense_family_is_exact_membership() {
        assert!(!TransactionType::Revenue.is_expense());
        assert!(TransactionType::FixedExpense.is_expense());
        assert!(TransactionType::VariableExpense.is_expense());
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        user::{UserID, create_user},
    };

    use super::{
        Transaction, TransactionType, create_transaction, delete_transaction, get_transaction,
        update_transaction,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_user(
            "test@example.com",
            crate::PasswordHash::new_unchecked("hash"),
            &conn,
        )
        .unwrap();
        conn
    }

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn owner() -> UserID {
        UserID::new(1)
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(
                "Salário",
                dec("5000.00"),
                date!(2025 - 10 - 05),
                TransactionType::Revenue,
            ),
            owner(),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, dec("5000.00"));
                assert_eq!(transaction.user_id, owner());
                assert_eq!(transaction.transaction_type, TransactionType::Revenue);
                assert!(!transaction.created_at.is_empty());
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_keeps_exact_decimal_amount() {
        let conn = get_test_connection();

        let created = create_transaction(
            Transaction::build(
                "Coffee",
                dec("0.10"),
                date!(2025 - 10 - 05),
                TransactionType::VariableExpense,
            ),
            owner(),
            &conn,
        )
        .unwrap();
        let fetched = get_transaction(created.id, owner(), &conn).unwrap();

        assert_eq!(fetched.amount, dec("0.10"));
    }

    #[test]
    fn create_fails_on_short_description() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(
                "a",
                dec("12.34"),
                date!(2025 - 10 - 05),
                TransactionType::Revenue,
            ),
            owner(),
            &conn,
        );

        assert_eq!(result, Err(Error::DescriptionTooShort));
    }

    #[test]
    fn create_fails_on_non_positive_amount() {
        let conn = get_test_connection();

        for amount in ["0", "-12.34"] {
            let result = create_transaction(
                Transaction::build(
                    "Rent",
                    dec(amount),
                    date!(2025 - 10 - 05),
                    TransactionType::FixedExpense,
                ),
                owner(),
                &conn,
            );

            assert_eq!(result, Err(Error::NonPositiveAmount(dec(amount))));
        }
    }

    #[test]
    fn create_drops_empty_category() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            Transaction::build(
                "Mercado",
                dec("45.67"),
                date!(2025 - 10 - 05),
                TransactionType::VariableExpense,
            )
            .category(Some("".to_owned()))
            .payment_method(Some("".to_owned())),
            owner(),
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.category, None);
        assert_eq!(transaction.payment_method, None);
    }

    #[test]
    fn get_is_owner_scoped() {
        let conn = get_test_connection();
        create_user(
            "other@example.com",
            crate::PasswordHash::new_unchecked("hash"),
            &conn,
        )
        .unwrap();
        let transaction = create_transaction(
            Transaction::build(
                "Salário",
                dec("5000.00"),
                date!(2025 - 10 - 05),
                TransactionType::Revenue,
            ),
            owner(),
            &conn,
        )
        .unwrap();

        let result = get_transaction(transaction.id, UserID::new(2), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_replaces_mutable_fields() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(
                "Aluguel",
                dec("1200.00"),
                date!(2025 - 10 - 01),
                TransactionType::FixedExpense,
            ),
            owner(),
            &conn,
        )
        .unwrap();

        update_transaction(
            transaction.id,
            Transaction::build(
                "Aluguel + condomínio",
                dec("1350.00"),
                date!(2025 - 10 - 02),
                TransactionType::FixedExpense,
            )
            .category(Some("Housing".to_owned())),
            owner(),
            &conn,
        )
        .unwrap();

        let updated = get_transaction(transaction.id, owner(), &conn).unwrap();
        assert_eq!(updated.description, "Aluguel + condomínio");
        assert_eq!(updated.amount, dec("1350.00"));
        assert_eq!(updated.date, date!(2025 - 10 - 02));
        assert_eq!(updated.category, Some("Housing".to_owned()));
        // The id, owner and creation timestamp must be retained.
        assert_eq!(updated.id, transaction.id);
        assert_eq!(updated.user_id, transaction.user_id);
        assert_eq!(updated.created_at, transaction.created_at);
    }

    #[test]
    fn update_fails_on_missing_transaction() {
        let conn = get_test_connection();

        let result = update_transaction(
            42,
            Transaction::build(
                "Rent",
                dec("1200.00"),
                date!(2025 - 10 - 01),
                TransactionType::FixedExpense,
            ),
            owner(),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(
                "Mercado",
                dec("45.67"),
                date!(2025 - 10 - 05),
                TransactionType::VariableExpense,
            ),
            owner(),
            &conn,
        )
        .unwrap();

        delete_transaction(transaction.id, owner(), &conn).unwrap();

        assert_eq!(
            get_transaction(transaction.id, owner(), &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_fails_on_missing_transaction() {
        let conn = get_test_connection();

        let result = delete_transaction(42, owner(), &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn delete_is_owner_scoped() {
        let conn = get_test_connection();
        create_user(
            "other@example.com",
            crate::PasswordHash::new_unchecked("hash"),
            &conn,
        )
        .unwrap();
        let transaction = create_transaction(
            Transaction::build(
                "Salário",
                dec("5000.00"),
                date!(2025 - 10 - 05),
                TransactionType::Revenue,
            ),
            owner(),
            &conn,
        )
        .unwrap();

        let result = delete_transaction(transaction.id, UserID::new(2), &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
        assert!(get_transaction(transaction.id, owner(), &conn).is_ok());
    }

    #[test]
    fn malformed_type_is_a_data_integrity_error() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO \"transaction\" (user_id, description, amount, date, type) \
            VALUES (1, 'Mystery', '10.00', '2025-10-05', 'despesa misteriosa')",
            (),
        )
        .unwrap();

        let result = get_transaction(1, owner(), &conn);

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("despesa misteriosa".to_owned()))
        );
    }
}
