//! Behavior score

use super::detector::EventFlags;

/// Score of a sample with no events
pub const MAX_SCORE: u8 = 100;

/// Deduction per triggered event
pub const EVENT_PENALTY: u8 = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct BehaviorScorer;

impl BehaviorScorer {
    /// `100 - 20 * events`, floored at 0
    pub fn score(&self, flags: &EventFlags) -> u8 {
        MAX_SCORE.saturating_sub(EVENT_PENALTY.saturating_mul(flags.count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_flag_combinations() {
        let scorer = BehaviorScorer;
        let mut seen = Vec::new();

        for bits in 0u8..8 {
            let flags = EventFlags {
                harsh_braking: bits & 1 != 0,
                rapid_acceleration: bits & 2 != 0,
                sharp_turn: bits & 4 != 0,
            };
            let score = scorer.score(&flags);
            assert_eq!(score, 100 - 20 * bits.count_ones() as u8);
            seen.push(score);
        }

        seen.sort_unstable();
        assert_eq!(seen, vec![40, 60, 60, 60, 80, 80, 80, 100]);
    }

    #[test]
    fn test_no_events_is_max() {
        assert_eq!(BehaviorScorer.score(&EventFlags::default()), MAX_SCORE);
    }
}
