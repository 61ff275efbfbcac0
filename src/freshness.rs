//! Response freshness tracking.
//!
//! Two small pieces keep presentation honest about data provenance:
//!
//! - [`Observation`] tags every value handed to the renderer as live,
//!   stale, or unavailable, so a carried-forward snapshot or a demo record
//!   can never masquerade as fresh data.
//! - [`SequenceGuard`] assigns each outbound request a monotonically
//!   increasing tag and refuses to apply responses whose tag is older than
//!   the last one applied. A late response for a superseded request is
//!   discarded instead of silently overwriting newer state.

/// A fetched value tagged with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation<T> {
    /// Fresh data from the backend
    Live(T),
    /// Previously fetched data carried forward after a failed refresh
    Stale(T),
    /// No data; carries the failure reason
    Unavailable(String),
}

impl<T> Observation<T> {
    /// The carried data, if any.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Live(data) | Self::Stale(data) => Some(data),
            Self::Unavailable(_) => None,
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    /// Short marker for human output; empty for live data.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Live(_) => "",
            Self::Stale(_) => "[stale]",
            Self::Unavailable(_) => "[unavailable]",
        }
    }
}

/// Monotonic request ordering guard.
///
/// `begin` issues a tag per request; `try_apply` accepts a tag only if it
/// is newer than everything applied so far.
#[derive(Debug, Default)]
pub struct SequenceGuard {
    /// Tag handed to the most recent request
    issued: u64,
    /// Newest tag whose response was applied
    applied: u64,
    /// Responses rejected as out of order (for stats)
    discarded: u64,
}

impl SequenceGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the tag for the next outbound request.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Attempt to apply the response for `tag`.
    ///
    /// Returns `true` and advances the applied watermark when the tag is
    /// newer than the last applied one; returns `false` for responses that
    /// arrive after a newer response has already been applied.
    pub fn try_apply(&mut self, tag: u64) -> bool {
        if tag > self.applied {
            self.applied = tag;
            true
        } else {
            self.discarded += 1;
            false
        }
    }

    /// Number of responses rejected as out of order.
    #[must_use]
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_order_responses_apply() {
        let mut guard = SequenceGuard::new();

        let a = guard.begin();
        let b = guard.begin();
        assert!(guard.try_apply(a));
        assert!(guard.try_apply(b));
        assert_eq!(guard.discarded(), 0);
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut guard = SequenceGuard::new();

        let older = guard.begin();
        let newer = guard.begin();

        // Newer response lands first; the older one must not overwrite it.
        assert!(guard.try_apply(newer));
        assert!(!guard.try_apply(older));
        assert_eq!(guard.discarded(), 1);
    }

    #[test]
    fn test_duplicate_tag_discarded() {
        let mut guard = SequenceGuard::new();

        let tag = guard.begin();
        assert!(guard.try_apply(tag));
        assert!(!guard.try_apply(tag));
    }

    #[test]
    fn test_observation_accessors() {
        let live = Observation::Live(1);
        let stale = Observation::Stale(2);
        let gone: Observation<i32> = Observation::Unavailable("timeout".into());

        assert!(live.is_live());
        assert_eq!(live.data(), Some(&1));
        assert_eq!(stale.data(), Some(&2));
        assert_eq!(stale.marker(), "[stale]");
        assert_eq!(gone.data(), None);
        assert_eq!(gone.marker(), "[unavailable]");
    }
}
