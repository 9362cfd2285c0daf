//! Data models shared by the session layer and the UI.
//!
//! - `User`, `Credentials`: identity of the signed-in person
//! - `StoredSession`: the single persisted session record
//! - `Post`: dashboard content from the demo API

pub mod post;
pub mod user;

pub use post::Post;
pub use user::{Credentials, RegisteredUser, StoredSession, User};
