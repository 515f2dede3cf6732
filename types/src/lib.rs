//! Plain data shared by the casino & church engine and its front ends.

pub mod casino;
pub mod progress;

pub use progress::{ProgressState, Realm, STORAGE_KEY};
