//! The filtered retrieval query for the transactions page.
//!
//! Translates a user-specified filter set into SQL predicates applied to the
//! owner's transactions. All present predicates are conjoined; absent fields
//! place no restriction on the result.

use rusqlite::{Connection, types::ToSql};
use time::Date;

use crate::{Error, user::UserID};

use super::core::{Transaction, TransactionType, map_transaction_row};

/// The filter set for retrieving transactions.
///
/// Treat values of this type as immutable: a change in the UI produces a new
/// filter and a new retrieval, never an in-place edit of old results.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Keep transactions dated on or after this date.
    pub date_from: Option<Date>,
    /// Keep transactions dated on or before this date.
    pub date_to: Option<Date>,
    /// Keep transactions whose description contains this text,
    /// compared case-insensitively.
    pub description: Option<String>,
    /// Keep transactions of exactly this type.
    pub transaction_type: Option<TransactionType>,
}

impl TransactionFilter {
    /// The filter that matches all of an owner's transactions.
    ///
    /// Clearing the filters on the transactions page resets to this value.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Retrieve the transactions of `owner` that satisfy every present predicate
/// in `filter`, ordered by date descending.
///
/// Rows with the same date are ordered by ID ascending so that the table
/// display is reproducible across re-fetches with identical filters.
///
/// When `owner` is `None` (no authenticated user) the result is an empty
/// list, never an error.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails, or a data-integrity error
/// from row mapping such as [Error::InvalidTransactionType].
pub fn list_transactions(
    owner: Option<UserID>,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let Some(owner) = owner else {
        return Ok(Vec::new());
    };

    let mut query = String::from(
        "SELECT id, user_id, description, amount, date, type, category, payment_method, created_at \
        FROM \"transaction\" WHERE user_id = ?",
    );
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(owner.as_i64())];

    if let Some(date_from) = filter.date_from {
        query.push_str(" AND date >= ?");
        params.push(Box::new(date_from));
    }

    if let Some(date_to) = filter.date_to {
        query.push_str(" AND date <= ?");
        params.push(Box::new(date_to));
    }

    if let Some(description) = filter.description.as_deref()
        && !description.is_empty()
    {
        query.push_str(" AND description LIKE ? ESCAPE '\\'");
        params.push(Box::new(format!("%{}%", escape_like_pattern(description))));
    }

    if let Some(transaction_type) = filter.transaction_type {
        query.push_str(" AND type = ?");
        params.push(Box::new(transaction_type.as_str()));
    }

    query.push_str(" ORDER BY date DESC, id ASC");

    connection
        .prepare(&query)?
        .query_map(
            rusqlite::params_from_iter(params.iter().map(|param| param.as_ref())),
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Escape the SQL LIKE wildcards in a literal search string.
///
/// The search text is user input and must match literally, so `%`, `_` and
/// the escape character itself are prefixed with a backslash.
fn escape_like_pattern(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{Transaction, TransactionType, create_transaction},
        user::{UserID, create_user},
    };

    use super::{TransactionFilter, escape_like_pattern, list_transactions};

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

    /// Inserts the fixture set used by most of the tests below.
    fn insert_sample_transactions(conn: &Connection) {
        let transactions = [
            ("Salário", "5000.00", date!(2025 - 10 - 01), TransactionType::Revenue),
            ("Aluguel", "1200.00", date!(2025 - 10 - 05), TransactionType::FixedExpense),
            ("Mercado", "450.75", date!(2025 - 10 - 15), TransactionType::VariableExpense),
            ("Restaurante", "89.90", date!(2025 - 10 - 20), TransactionType::VariableExpense),
        ];

        for (description, amount, date, transaction_type) in transactions {
            create_transaction(
                Transaction::build(description, dec(amount), date, transaction_type),
                owner(),
                conn,
            )
            .unwrap();
        }
    }

    #[test]
    fn empty_filter_returns_all_transactions_date_descending() {
        let conn = get_test_connection();
        insert_sample_transactions(&conn);

        let got = list_transactions(Some(owner()), &TransactionFilter::none(), &conn).unwrap();

        assert_eq!(got.len(), 4);
        let dates: Vec<_> = got.iter().map(|transaction| transaction.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 10 - 20),
                date!(2025 - 10 - 15),
                date!(2025 - 10 - 05),
                date!(2025 - 10 - 01),
            ]
        );
    }

    #[test]
    fn missing_owner_returns_empty_list() {
        let conn = get_test_connection();
        insert_sample_transactions(&conn);

        let got = list_transactions(None, &TransactionFilter::none(), &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn same_date_rows_are_ordered_by_id() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        for i in 1..=3 {
            create_transaction(
                Transaction::build(
                    &format!("transaction #{i}"),
                    dec("10.00"),
                    today,
                    TransactionType::VariableExpense,
                ),
                owner(),
                &conn,
            )
            .unwrap();
        }

        let first = list_transactions(Some(owner()), &TransactionFilter::none(), &conn).unwrap();
        let second = list_transactions(Some(owner()), &TransactionFilter::none(), &conn).unwrap();

        let ids: Vec<_> = first.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(first, second, "identical filters should be reproducible");
    }

    #[test]
    fn date_from_is_inclusive() {
        let conn = get_test_connection();
        insert_sample_transactions(&conn);

        let filter = TransactionFilter {
            date_from: Some(date!(2025 - 10 - 15)),
            ..Default::default()
        };
        let got = list_transactions(Some(owner()), &filter, &conn).unwrap();

        assert_eq!(got.len(), 2);
        assert!(
            got.iter()
                .all(|transaction| transaction.date >= date!(2025 - 10 - 15)),
            "a transaction dated exactly on the boundary must be included"
        );
        assert!(
            got.iter()
                .any(|transaction| transaction.date == date!(2025 - 10 - 15))
        );
    }

    #[test]
    fn date_to_is_inclusive() {
        let conn = get_test_connection();
        insert_sample_transactions(&conn);

        let filter = TransactionFilter {
            date_to: Some(date!(2025 - 10 - 05)),
            ..Default::default()
        };
        let got = list_transactions(Some(owner()), &filter, &conn).unwrap();

        assert_eq!(got.len(), 2);
        assert!(
            got.iter()
                .any(|transaction| transaction.date == date!(2025 - 10 - 05))
        );
    }

    #[test]
    fn description_filter_is_case_insensitive_substring() {
        let conn = get_test_connection();
        insert_sample_transactions(&conn);

        let filter = TransactionFilter {
            description: Some("sal".to_owned()),
            ..Default::default()
        };
        let got = list_transactions(Some(owner()), &filter, &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].description, "Salário");
    }

    #[test]
    fn empty_description_filter_is_ignored() {
        let conn = get_test_connection();
        insert_sample_transactions(&conn);

        let filter = TransactionFilter {
            description: Some("".to_owned()),
            ..Default::default()
        };
        let got = list_transactions(Some(owner()), &filter, &conn).unwrap();

        assert_eq!(got.len(), 4);
    }

    #[test]
    fn description_filter_treats_wildcards_literally() {
        let conn = get_test_connection();
        create_transaction(
            Transaction::build(
                "100% cotton shirt",
                dec("59.90"),
                date!(2025 - 10 - 10),
                TransactionType::VariableExpense,
            ),
            owner(),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(
                "Plain shirt",
                dec("39.90"),
                date!(2025 - 10 - 11),
                TransactionType::VariableExpense,
            ),
            owner(),
            &conn,
        )
        .unwrap();

        let filter = TransactionFilter {
            description: Some("100%".to_owned()),
            ..Default::default()
        };
        let got = list_transactions(Some(owner()), &filter, &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].description, "100% cotton shirt");
    }

    #[test]
    fn type_filter_is_exact_match() {
        let conn = get_test_connection();
        insert_sample_transactions(&conn);

        let filter = TransactionFilter {
            transaction_type: Some(TransactionType::FixedExpense),
            ..Default::default()
        };
        let got = list_transactions(Some(owner()), &filter, &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].description, "Aluguel");
    }

    #[test]
    fn all_predicates_are_conjoined() {
        let conn = get_test_connection();
        insert_sample_transactions(&conn);

        let filter = TransactionFilter {
            date_from: Some(date!(2025 - 10 - 01)),
            date_to: Some(date!(2025 - 10 - 16)),
            description: Some("m".to_owned()),
            transaction_type: Some(TransactionType::VariableExpense),
        };
        let got = list_transactions(Some(owner()), &filter, &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].description, "Mercado");
    }

    #[test]
    fn results_are_scoped_to_the_owner() {
        let conn = get_test_connection();
        insert_sample_transactions(&conn);
        create_user(
            "other@example.com",
            crate::PasswordHash::new_unchecked("hash"),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(
                "Someone else's salary",
                dec("9999.00"),
                date!(2025 - 10 - 01),
                TransactionType::Revenue,
            ),
            UserID::new(2),
            &conn,
        )
        .unwrap();

        let got = list_transactions(Some(owner()), &TransactionFilter::none(), &conn).unwrap();

        assert_eq!(got.len(), 4);
        assert!(got.iter().all(|transaction| transaction.user_id == owner()));
    }

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a_b"), "a\\_b");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
        assert_eq!(escape_like_pattern("plain"), "plain");
    }
}
