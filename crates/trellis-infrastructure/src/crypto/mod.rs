//! Cryptographic services module
//!
//! - HS256 JSON Web Tokens carrying the `userId` claim
//! - PBKDF2-HMAC-SHA512 password hashing with per-user salt

mod jwt;
mod password;

pub use jwt::{Claims, JwtService};
pub use password::PasswordService;
