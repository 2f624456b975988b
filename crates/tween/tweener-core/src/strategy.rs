//! Merge policies for data present only on the `to` side of a transition.

use serde::{Deserialize, Serialize};

/// When a field (entity animation) or an entity (collection animation)
/// that exists only in `to` shows up in the output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeStrategy {
    /// Present with its target value from the very first update.
    #[default]
    MergeWithFirstTick,
    /// Absent until the finishing update, then appears verbatim.
    MergeWithLastTick,
}
