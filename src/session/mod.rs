//! Authentication session management
//!
//! One `SessionStore` is live per running client. It owns the current token
//! and cached user profile, persists them through the platform key-value
//! store, and publishes every change on a watch channel so UI collaborators
//! can react to invalidation (the "please sign in again" signal).

mod store;

pub use store::{Session, SessionStore, UserProfile, PROFILE_KEY, TOKEN_KEY};
