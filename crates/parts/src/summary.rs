use serde::{Deserialize, Serialize};

use crate::line::PartQuantities;
use crate::status::PartState;

/// Number of part lines in each state.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub not_ordered: usize,
    pub on_order: usize,
    pub received: usize,
    pub returned: usize,
}

impl StatusCount {
    pub fn get(&self, state: PartState) -> usize {
        match state {
            PartState::NotOrdered => self.not_ordered,
            PartState::OnOrder => self.on_order,
            PartState::Received => self.received,
            PartState::Returned => self.returned,
        }
    }

    pub fn increment(&mut self, state: PartState) {
        match state {
            PartState::NotOrdered => self.not_ordered += 1,
            PartState::OnOrder => self.on_order += 1,
            PartState::Received => self.received += 1,
            PartState::Returned => self.returned += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.not_ordered + self.on_order + self.received + self.returned
    }
}

/// Per-vehicle status counts with the derived completion percentage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub counts: StatusCount,
    pub completion_pct: u8,
}

impl StatusSummary {
    /// Aggregate already-filtered lines and derive the percentage.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator,
        I::Item: PartQuantities,
    {
        let counts = aggregate(lines);
        Self {
            counts,
            completion_pct: completion_percentage(&counts),
        }
    }
}

/// Count lines per state in a single pass.
///
/// Does not filter: callers apply [`crate::filter_displayable`] first when the
/// result is meant for display.
pub fn aggregate<I>(lines: I) -> StatusCount
where
    I: IntoIterator,
    I::Item: PartQuantities,
{
    let mut counts = StatusCount::default();
    for line in lines {
        counts.increment(line.state());
    }
    counts
}

/// Share of lines that are received or returned, as a whole percentage.
///
/// An empty summary is 100: nothing required means nothing outstanding.
/// Rounds half up.
pub fn completion_percentage(counts: &StatusCount) -> u8 {
    let total = counts.total() as u64;
    if total == 0 {
        return 100;
    }
    let done = (counts.received + counts.returned) as u64;
    // round(100 * done / total) == floor((200 * done + total) / (2 * total))
    let pct = (200 * done + total) / (2 * total);
    pct.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::displayable::filter_displayable;
    use crate::line::PartLine;
    use partsapp_core::RoNumber;
    use proptest::prelude::*;

    fn counts(not_ordered: usize, on_order: usize, received: usize, returned: usize) -> StatusCount {
        StatusCount {
            not_ordered,
            on_order,
            received,
            returned,
        }
    }

    #[test]
    fn empty_input_is_all_zero_and_complete() {
        let c = aggregate(Vec::<PartLine>::new());
        assert_eq!(c, StatusCount::default());
        assert_eq!(completion_percentage(&c), 100);
    }

    #[test]
    fn one_line_per_state_is_half_done() {
        let lines: [(i64, i64, i64, i64); 4] = [(1, 0, 0, 0), (1, 2, 0, 0), (1, 2, 2, 0), (1, 2, 2, 2)];
        let c = aggregate(lines);
        assert_eq!(c, counts(1, 1, 1, 1));
        assert_eq!(completion_percentage(&c), 50);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1/8 = 12.5% -> 13
        assert_eq!(completion_percentage(&counts(7, 0, 1, 0)), 13);
        // 2/3 = 66.67% -> 67
        assert_eq!(completion_percentage(&counts(1, 0, 2, 0)), 67);
        // 1/3 = 33.33% -> 33
        assert_eq!(completion_percentage(&counts(2, 0, 0, 1)), 33);
        assert_eq!(completion_percentage(&counts(0, 3, 0, 0)), 0);
        assert_eq!(completion_percentage(&counts(0, 0, 4, 2)), 100);
    }

    #[test]
    fn summary_of_filtered_vehicle_lines() {
        let ro = RoNumber::new(7781).unwrap();
        let mut sublet = PartLine::with_quantities(ro, 3, 1, 1, 1, 0);
        sublet.part_type = "Sublet".to_string();
        let lines = vec![
            PartLine::with_quantities(ro, 1, 1, 1, 1, 0),
            PartLine::with_quantities(ro, 2, 0, 0, 0, 0),
            sublet,
            PartLine::with_quantities(ro, 4, 2, 2, 0, 0),
        ];
        let summary = StatusSummary::from_lines(&filter_displayable(lines));
        assert_eq!(summary.counts, counts(0, 1, 1, 0));
        assert_eq!(summary.completion_pct, 50);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: no line is dropped or double-counted.
        #[test]
        fn bucket_sum_equals_line_count(
            lines in prop::collection::vec((0i64..5, 0i64..5, 0i64..5, 0i64..5), 0..64)
        ) {
            let c = aggregate(lines.iter());
            prop_assert_eq!(c.total(), lines.len());
        }

        #[test]
        fn percentage_stays_in_range(
            n in 0usize..500, o in 0usize..500, r in 0usize..500, t in 0usize..500,
        ) {
            let pct = completion_percentage(&counts(n, o, r, t));
            prop_assert!(pct <= 100);
        }

        #[test]
        fn percentage_matches_float_rounding(
            n in 0usize..200, o in 0usize..200, r in 0usize..200, t in 0usize..200,
        ) {
            let c = counts(n, o, r, t);
            prop_assume!(c.total() > 0);
            let exact = 100.0 * (r + t) as f64 / c.total() as f64;
            let expected = (exact + 0.5).floor() as u8;
            prop_assert_eq!(completion_percentage(&c), expected);
        }
    }
}
