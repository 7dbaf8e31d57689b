//! Job postings: `/api/jobs/*`.

pub mod handlers;
pub mod service;
pub mod types;

pub use service::JobService;
