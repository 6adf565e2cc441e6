//! Runtime events.

/// Events emitted by the runtime after each page operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// Initial learning completed for a page.
    Learned {
        /// Page name.
        page: String,
        /// Number of noise patterns learned.
        patterns: usize,
    },
    /// A page was learned again, either because a snapshot went missing or
    /// because the relearn policy asked for it.
    Relearned {
        /// Page name.
        page: String,
        /// Number of noise patterns learned.
        patterns: usize,
    },
    /// A poll found nothing beyond noise.
    Unchanged {
        /// Page name.
        page: String,
    },
    /// A poll found a real change.
    Changed {
        /// Page name.
        page: String,
        /// Filtered diff text.
        detail: String,
    },
    /// A page could not be polled this cycle.
    FetchFailed {
        /// Page name.
        page: String,
        /// Error message.
        error: String,
    },
}

impl RuntimeEvent {
    /// Returns the page name associated with this event.
    pub fn page(&self) -> &str {
        match self {
            RuntimeEvent::Learned { page, .. } => page,
            RuntimeEvent::Relearned { page, .. } => page,
            RuntimeEvent::Unchanged { page } => page,
            RuntimeEvent::Changed { page, .. } => page,
            RuntimeEvent::FetchFailed { page, .. } => page,
        }
    }

    /// Returns true if this event reports a change.
    pub fn is_change(&self) -> bool {
        matches!(self, RuntimeEvent::Changed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_page() {
        let event = RuntimeEvent::Learned {
            page: "news".to_string(),
            patterns: 2,
        };
        assert_eq!(event.page(), "news");

        let event = RuntimeEvent::FetchFailed {
            page: "status".to_string(),
            error: "timed out".to_string(),
        };
        assert_eq!(event.page(), "status");
    }

    #[test]
    fn test_event_is_change() {
        let event = RuntimeEvent::Changed {
            page: "news".to_string(),
            detail: "1c1".to_string(),
        };
        assert!(event.is_change());
        assert!(!RuntimeEvent::Unchanged {
            page: "news".to_string()
        }
        .is_change());
    }
}
