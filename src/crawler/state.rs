/// Crawl lifecycle states
///
/// ```text
/// Idle -> Running -> Completed | Stopped | Failed
/// Idle -> Failed            (malformed seed or limits)
/// ```
use std::fmt;

/// Represents the current state of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Session created, not started
    Idle,

    /// Frontier is being processed
    Running,

    /// Frontier exhausted or page limit reached
    Completed,

    /// A stop was requested between fetches
    Stopped,

    /// The crawl could not start
    Failed,
}

impl CrawlState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped | Self::Failed)
    }

    /// Checks whether moving from `self` to `to` is allowed
    pub fn can_transition_to(&self, to: CrawlState) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Running)
                | (Self::Idle, Self::Failed)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Stopped)
                | (Self::Running, Self::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CrawlState; 5] = [
        CrawlState::Idle,
        CrawlState::Running,
        CrawlState::Completed,
        CrawlState::Stopped,
        CrawlState::Failed,
    ];

    #[test]
    fn test_valid_transitions() {
        assert!(CrawlState::Idle.can_transition_to(CrawlState::Running));
        assert!(CrawlState::Idle.can_transition_to(CrawlState::Failed));
        assert!(CrawlState::Running.can_transition_to(CrawlState::Completed));
        assert!(CrawlState::Running.can_transition_to(CrawlState::Stopped));
        assert!(CrawlState::Running.can_transition_to(CrawlState::Failed));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(!from.can_transition_to(to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_idle_cannot_skip_to_completion() {
        assert!(!CrawlState::Idle.can_transition_to(CrawlState::Completed));
        assert!(!CrawlState::Idle.can_transition_to(CrawlState::Stopped));
        assert!(!CrawlState::Running.can_transition_to(CrawlState::Idle));
    }

    #[test]
    fn test_display() {
        assert_eq!(CrawlState::Completed.to_string(), "completed");
        assert!(!CrawlState::Running.is_terminal());
    }
}
