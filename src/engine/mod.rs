mod dedup;
mod errors;
mod reconciler;

pub use dedup::{
    filter_duplicates, find_duplicate_groups, is_duplicate_pair, DuplicateGroup, GroupingStrategy,
    DEFAULT_WINDOW_MS, PRESUBMIT_LOOKBACK_MS,
};
pub use errors::ReconcileError;
pub use reconciler::{ReconcileEngine, ReconcileReport};
