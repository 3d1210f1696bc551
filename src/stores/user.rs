//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{PasswordHash, User, UserID},
};

/// Handles the creation and retrieval of User objects.
pub trait UserStore {
    /// Create a new user.
    ///
    /// Implementers must reject a `username` or `email` that is already
    /// registered with [Error::DuplicateUsername] or [Error::DuplicateEmail].
    fn create(
        &mut self,
        username: &str,
        email: EmailAddress,
        password_hash: PasswordHash,
    ) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their email.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;
}
