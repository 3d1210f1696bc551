//! Registering users who own ledgers.

use std::str::FromStr;

use email_address::EmailAddress;

use crate::{
    Error,
    models::{PasswordHash, User},
    stores::UserStore,
};

/// Validate the username and email, then create the user.
///
/// # Errors
/// This function will return a:
/// - [Error::ValidationError] if `username` is blank or `email` is not a valid email address,
/// - [Error::DuplicateUsername] or [Error::DuplicateEmail] if another user already has them,
/// - or an error from the store.
pub fn register_user<U>(
    user_store: &mut U,
    username: &str,
    email: &str,
    password_hash: PasswordHash,
) -> Result<User, Error>
where
    U: UserStore,
{
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::validation("username", "username cannot be empty"));
    }

    let email = EmailAddress::from_str(email.trim())
        .map_err(|error| Error::validation("email", error.to_string()))?;

    let user = user_store.create(username, email, password_hash)?;
    tracing::info!("registered user {} ({})", user.id, user.username);

    Ok(user)
}

#[cfg(test)]
mod tests {
    use crate::{
        Error, ledger::test_utils::LedgerFixture, models::PasswordHash, stores::UserStore,
    };

    #[test]
    fn registers_user() {
        let mut fixture = LedgerFixture::new();

        let user = fixture
            .ledger
            .register_user(
                " alice ",
                "alice@example.com",
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(user.email.as_str(), "alice@example.com");
        assert_eq!(fixture.ledger.user_store().get(user.id), Ok(user));
    }

    #[test]
    fn rejects_blank_username() {
        let mut fixture = LedgerFixture::new();

        let got = fixture.ledger.register_user(
            "  ",
            "alice@example.com",
            PasswordHash::new_unchecked("hunter2"),
        );

        assert!(matches!(
            got,
            Err(Error::ValidationError {
                field: "username",
                ..
            })
        ));
    }

    #[test]
    fn rejects_invalid_email() {
        let mut fixture = LedgerFixture::new();

        let got = fixture.ledger.register_user(
            "alice",
            "not an email",
            PasswordHash::new_unchecked("hunter2"),
        );

        assert!(matches!(
            got,
            Err(Error::ValidationError { field: "email", .. })
        ));
    }

    #[test]
    fn rejects_taken_username_and_email() {
        let mut fixture = LedgerFixture::new();
        fixture.user("alice");

        let same_name = fixture.ledger.register_user(
            "alice",
            "other@example.com",
            PasswordHash::new_unchecked("hunter2"),
        );
        let same_email = fixture.ledger.register_user(
            "alicia",
            "alice@example.com",
            PasswordHash::new_unchecked("hunter2"),
        );

        assert_eq!(same_name, Err(Error::DuplicateUsername));
        assert_eq!(same_email, Err(Error::DuplicateEmail));
    }
}
