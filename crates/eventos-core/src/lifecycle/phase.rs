use serde::Serialize;
use strum::{Display, IntoStaticStr};

use super::feedback::Feedback;

/// Where a view is in its load/edit/submit cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    LoadFailed,
    Viewing,
    Editing,
    Submitting,
    SubmitSucceeded,
    SubmitFailed,
}

impl Phase {
    /// A request is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Loading | Self::Submitting)
    }
}

/// Snapshot published to observers after every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub phase: Phase,
    pub loading: bool,
    pub feedback: Feedback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_snake_case() {
        assert_eq!(Phase::SubmitFailed.to_string(), "submit_failed");
        assert_eq!(Phase::default(), Phase::Idle);
        assert!(Phase::Loading.is_busy());
        assert!(!Phase::Editing.is_busy());
    }
}
