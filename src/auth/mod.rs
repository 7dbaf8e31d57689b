//! Authentication and authorization.
//!
//! ## Components
//! - `models`: roles, JWT claims, the verified `Identity`
//! - `token`: HS256 token signing and verification
//! - `middleware`: bearer-token authenticator (401 / 400)
//! - `policy`: per-operation role table and the authorizer (403)
//! - `password`: Argon2 hashing

pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod token;

pub use middleware::{authenticate, bearer_token};
pub use models::{Claims, Identity, Role};
pub use policy::{Operation, authorize, guarded};
pub use token::{TokenError, TokenService};
