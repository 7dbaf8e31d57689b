//! User accounts: `/api/users/*`.

pub mod handlers;
pub mod service;
pub mod types;

pub use service::AccountService;
