pub mod assignment;
pub mod sync;

pub use assignment::Assignment;
pub use sync::{SyncOutcome, SyncStats};
