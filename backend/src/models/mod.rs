//! Response data models.
//!
//! Purpose: Define the payload shapes shared by the demo applications and
//! document their serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Envelope (alias to `envelope::Envelope`) — generic success envelope.
//! - HttpError (alias to `error::HttpError`) — abort signal with renderings.
//! - AppError (alias to `error::AppError`) — abort or unhandled failure.
//! - UserData (alias to `user::UserData`) — flat user record.

pub mod envelope;
pub mod error;
pub mod user;
pub use self::envelope::Envelope;
pub use self::error::{AppError, HttpError, UnknownStatus};
pub use self::user::UserData;

/// Convenient handler result alias.
pub type AppResult<T> = Result<T, AppError>;
