use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Content,
    Visual,
    Merge,
    Publish,
    PublishStatusChange,
    Report,
}

impl Stage {
    /// Every stage in the order the coordinator runs them.
    pub const ALL: [Stage; 6] = [
        Stage::Content,
        Stage::Visual,
        Stage::Merge,
        Stage::Publish,
        Stage::PublishStatusChange,
        Stage::Report,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Content => "content",
            Stage::Visual => "visual",
            Stage::Merge => "merge",
            Stage::Publish => "publish",
            Stage::PublishStatusChange => "publish_status_change",
            Stage::Report => "report",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
