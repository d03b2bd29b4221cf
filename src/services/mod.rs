pub mod labels;
pub mod sync_service;

pub use labels::{LABEL_COLORS, LabelAllocator};
pub use sync_service::{ExistingCard, SyncService};
