//! One-time passwords for the password-reset flow.
//!
//! `OtpManager::issue` hands back a 6-digit code to be mailed to the user;
//! `OtpManager::verify` accepts it once, within the TTL. Expiry is checked
//! lazily on verify and swept periodically by a background task.

pub mod clock;
pub mod manager;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{DEFAULT_OTP_TTL, OtpManager};
