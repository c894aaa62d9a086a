//! Password validation and hashing.
//!
//! Passwords are checked for strength with zxcvbn before being hashed with
//! bcrypt. Only the hash is ever stored.

use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// The minimum zxcvbn score for a password to be accepted.
const MINIMUM_PASSWORD_SCORE: Score = Score::Three;

/// A password that has been checked for strength.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Validate the strength of a raw password.
    ///
    /// # Errors
    /// Returns [Error::TooWeak] with a user-facing explanation if the password
    /// is too easy to guess.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let entropy = zxcvbn(raw_password, &[]);

        if entropy.score() < MINIMUM_PASSWORD_SCORE {
            let details = entropy
                .feedback()
                .and_then(|feedback| feedback.warning())
                .map(|warning| warning.to_string())
                .unwrap_or_else(|| "Try a longer password with more variety.".to_owned());

            return Err(Error::TooWeak(details));
        }

        Ok(Self(raw_password.to_owned()))
    }
}

/// A bcrypt password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a validated password.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the underlying hashing library fails.
    pub fn new(password: ValidatedPassword) -> Result<Self, Error> {
        Self::from_raw_password(&password.0)
    }

    /// Hash a raw password without strength validation.
    ///
    /// Callers are responsible for having validated the password separately,
    /// e.g. the test data seeder.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the underlying hashing library fails.
    pub fn from_raw_password(raw_password: &str) -> Result<Self, Error> {
        bcrypt::hash(raw_password, bcrypt::DEFAULT_COST)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash string that was previously produced by [PasswordHash::new],
    /// e.g. one read back from the database.
    pub fn new_unchecked(hash: &str) -> Self {
        Self(hash.to_owned())
    }

    /// Check whether `raw_password` matches this hash.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the stored hash cannot be parsed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        bcrypt::verify(raw_password, &self.0)
            .map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::Error;

    use super::ValidatedPassword;

    #[test]
    fn accepts_strong_password() {
        let result = ValidatedPassword::new("correcthorsebatterystaple");

        assert!(result.is_ok());
    }

    #[test]
    fn rejects_weak_password() {
        let result = ValidatedPassword::new("password");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }
}

#[cfg(test)]
mod password_hash_tests {
    use super::{PasswordHash, ValidatedPassword};

    #[test]
    fn hash_verifies_correct_password() {
        let raw_password = "correcthorsebatterystaple";
        let hash =
            PasswordHash::new(ValidatedPassword::new(raw_password).unwrap()).unwrap();

        assert_eq!(hash.verify(raw_password), Ok(true));
    }

    #[test]
    fn hash_rejects_wrong_password() {
        let hash =
            PasswordHash::new(ValidatedPassword::new("correcthorsebatterystaple").unwrap())
                .unwrap();

        assert_eq!(hash.verify("incorrecthorsebatterystaple"), Ok(false));
    }

    #[test]
    fn hash_does_not_contain_plaintext() {
        let raw_password = "correcthorsebatterystaple";
        let hash = PasswordHash::from_raw_password(raw_password).unwrap();

        assert!(!hash.as_ref().contains(raw_password));
    }
}
