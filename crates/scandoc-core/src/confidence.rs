use crate::Quad;

/// Confidence gained per detection cycle that produces a candidate.
pub const CONFIDENCE_STEP: f32 = 0.5;

/// Validity requires strictly more than this accumulated confidence,
/// i.e. at least three consecutive successful cycles.
const VALID_THRESHOLD: f32 = 1.0;

/// Smooths the noisy per-cycle detector into a stable go/no-go signal.
///
/// One call to [`observe`](Self::observe) is one detection cycle. A cycle
/// with a candidate adds [`CONFIDENCE_STEP`] and replaces the retained
/// candidate regardless of geometric similarity to the previous one (there
/// is no identity tracking across cycles). A cycle with no candidate drops
/// straight back to the empty state. Confidence never decreases otherwise.
#[derive(Clone, Debug, Default)]
pub struct ConfidenceTracker {
    confidence: f32,
    last: Option<Quad>,
}

impl ConfidenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one detection cycle.
    pub fn observe(&mut self, candidate: Option<Quad>) {
        match candidate {
            Some(quad) => {
                self.confidence += CONFIDENCE_STEP;
                self.last = Some(quad);
            }
            None => {
                self.confidence = 0.0;
                self.last = None;
            }
        }
    }

    /// Whether the retained candidate is trustworthy enough to overlay or
    /// to drive perspective correction at capture.
    pub fn is_valid(&self) -> bool {
        self.confidence > VALID_THRESHOLD
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Candidate accepted by the most recent successful cycle. Between
    /// timer-gated cycles this is what overlays keep drawing, even though
    /// the live frame may have moved.
    pub fn last_quad(&self) -> Option<&Quad> {
        self.last.as_ref()
    }

    pub fn reset(&mut self) {
        self.confidence = 0.0;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn candidate() -> Quad {
        Quad::axis_aligned(10.0, 10.0, 90.0, 90.0)
    }

    #[test]
    fn two_cycles_reach_the_boundary_but_stay_invalid() {
        let mut tracker = ConfidenceTracker::new();
        tracker.observe(Some(candidate()));
        tracker.observe(Some(candidate()));
        assert_relative_eq!(tracker.confidence(), 1.0);
        assert!(!tracker.is_valid());
    }

    #[test]
    fn third_cycle_crosses_the_boundary() {
        let mut tracker = ConfidenceTracker::new();
        for _ in 0..3 {
            tracker.observe(Some(candidate()));
        }
        assert_relative_eq!(tracker.confidence(), 1.5);
        assert!(tracker.is_valid());
        assert_eq!(tracker.last_quad(), Some(&candidate()));
    }

    #[test]
    fn a_miss_resets_immediately() {
        let mut tracker = ConfidenceTracker::new();
        for _ in 0..5 {
            tracker.observe(Some(candidate()));
        }
        assert!(tracker.is_valid());

        tracker.observe(None);
        assert_relative_eq!(tracker.confidence(), 0.0);
        assert!(!tracker.is_valid());
        assert!(tracker.last_quad().is_none());
    }

    #[test]
    fn a_miss_mid_run_discards_earlier_progress() {
        let mut tracker = ConfidenceTracker::new();
        tracker.observe(None);
        tracker.observe(Some(candidate()));
        tracker.observe(Some(candidate()));
        // only reached 1.0 after the reset on cycle 1
        assert!(!tracker.is_valid());
    }

    #[test]
    fn latest_candidate_replaces_the_previous_one() {
        let mut tracker = ConfidenceTracker::new();
        tracker.observe(Some(candidate()));
        let replacement = Quad::axis_aligned(20.0, 20.0, 60.0, 80.0);
        tracker.observe(Some(replacement));
        assert_eq!(tracker.last_quad(), Some(&replacement));
    }
}
