//! Cryptographic adapters.

mod argon2;

pub use self::argon2::Argon2PasswordHasher;
