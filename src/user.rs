//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// Every transaction belongs to exactly one user; all reads and writes are
/// scoped to the authenticated user's ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The email address the user signs in with.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// This function will return a:
/// - [Error::DuplicateEmail] if `email` already belongs to a registered user,
/// - or [Error::SqlError] if an SQL related error occurred.
pub fn create_user(
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let id = connection
        .prepare("INSERT INTO user (email, password) VALUES (?1, ?2) RETURNING id")?
        .query_one((email, password_hash.to_string()), |row| row.get(0))
        .map_err(Error::from)?;

    Ok(User {
        id: UserID::new(id),
        email: email.to_owned(),
        password_hash,
    })
}

/// Retrieve a user from the database by their `email`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::NotFound] if the email does not belong to a registered user,
/// - or [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    let user = connection
        .prepare("SELECT id, email, password FROM user WHERE email = :email")?
        .query_one(&[(":email", email)], |row| {
            let raw_password_hash: String = row.get(2)?;

            Ok(User {
                id: UserID::new(row.get(0)?),
                email: row.get(1)?,
                password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            })
        })?;

    Ok(user)
}

/// Overwrite the password hash for the user with `user_id`.
///
/// # Errors
///
/// This function will return a:
/// - [Error::NotFound] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if an SQL related error occurred.
pub fn set_user_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.to_string(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{Error, PasswordHash, db::initialize};

    use super::{UserID, create_user, get_user_by_email, set_user_password};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn test_hash() -> PasswordHash {
        PasswordHash::new_unchecked("averyrealhash")
    }

    #[test]
    fn create_and_get_user() {
        let conn = get_test_connection();

        let created = create_user("test@example.com", test_hash(), &conn).unwrap();
        let fetched = get_user_by_email("test@example.com", &conn).unwrap();

        assert_eq!(created, fetched);
    }

    #[test]
    fn create_fails_on_duplicate_email() {
        let conn = get_test_connection();
        create_user("test@example.com", test_hash(), &conn).unwrap();

        let result = create_user("test@example.com", test_hash(), &conn);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_fails_on_unknown_email() {
        let conn = get_test_connection();

        let result = get_user_by_email("nobody@example.com", &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn set_password_overwrites_hash() {
        let conn = get_test_connection();
        let user = create_user("test@example.com", test_hash(), &conn).unwrap();

        let new_hash = PasswordHash::new_unchecked("anotherhash");
        set_user_password(user.id, &new_hash, &conn).unwrap();

        let fetched = get_user_by_email("test@example.com", &conn).unwrap();
        assert_eq!(fetched.password_hash, new_hash);
    }

    #[test]
    fn set_password_fails_on_missing_user() {
        let conn = get_test_connection();

        let result = set_user_password(UserID::new(42), &test_hash(), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }
}
