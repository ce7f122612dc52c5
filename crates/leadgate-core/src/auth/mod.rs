//! Authentication: credential hashing, token issuance, and the single
//! authorization component consumed by the HTTP layer.

pub mod password;
pub mod service;
pub mod token;

pub use password::PasswordHasher;
pub use service::AuthService;
pub use token::{Claims, TokenService};
