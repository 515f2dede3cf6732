pub mod casino;
pub mod clock;
pub mod decay;
pub mod notify;
pub mod state_transition;
pub mod store;
pub mod ticker;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

mod state;

pub use clock::{Clock, SystemClock};
pub use state::{FileStorage, Memory, Storage, StorageError};
pub use state_transition::Action;
pub use store::ProgressStore;
