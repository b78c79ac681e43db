//! Domain models for the storefront.
//!
//! - [`user`] - Stored accounts
//! - [`session`] - The authenticated principal of a request

pub mod session;
pub mod user;

pub use session::CurrentUser;
pub use user::{NewUser, User};
