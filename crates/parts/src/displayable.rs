use crate::line::PartLine;

/// Category of out-of-band sublet work, never shown with regular parts.
pub const SUBLET_CATEGORY: &str = "Sublet";

/// Whether a line belongs in part listings and status summaries.
///
/// A line is shown when the repair order actually needs it (`requested_qty > 0`)
/// and it is not sublet work.
pub fn is_displayable(line: &PartLine) -> bool {
    line.requested_qty > 0 && line.part_type != SUBLET_CATEGORY
}

/// Keep only displayable lines, preserving their relative order.
pub fn filter_displayable(lines: Vec<PartLine>) -> Vec<PartLine> {
    lines.into_iter().filter(is_displayable).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use partsapp_core::RoNumber;
    use proptest::prelude::*;

    fn line(n: i64, requested: i64, part_type: &str) -> PartLine {
        let mut l = PartLine::with_quantities(RoNumber::new(100).unwrap(), n, requested, 0, 0, 0);
        l.part_type = part_type.to_string();
        l
    }

    #[test]
    fn drops_unrequested_and_sublet_lines() {
        let lines = vec![
            line(1, 1, "OEM"),
            line(2, 0, "OEM"),
            line(3, 2, "Sublet"),
            line(4, 3, "Aftermarket"),
        ];
        let kept: Vec<i64> = filter_displayable(lines).iter().map(|l| l.line).collect();
        assert_eq!(kept, vec![1, 4]);
    }

    #[test]
    fn sublet_match_is_exact() {
        assert!(is_displayable(&line(1, 1, "sublet")));
        assert!(is_displayable(&line(1, 1, "Sublet Paint")));
        assert!(!is_displayable(&line(1, 1, "Sublet")));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(filter_displayable(Vec::new()).is_empty());
    }

    fn arb_line() -> impl Strategy<Value = PartLine> {
        (0i64..50, -2i64..4, prop_oneof![Just("OEM"), Just("Sublet"), Just("Used")])
            .prop_map(|(n, requested, part_type)| line(n, requested, part_type))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn filtering_is_idempotent(lines in prop::collection::vec(arb_line(), 0..40)) {
            let once = filter_displayable(lines);
            let twice = filter_displayable(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn filtering_preserves_relative_order(lines in prop::collection::vec(arb_line(), 0..40)) {
            let expected: Vec<PartLine> = lines.iter().filter(|l| is_displayable(l)).cloned().collect();
            prop_assert_eq!(filter_displayable(lines), expected);
        }

        #[test]
        fn kept_lines_are_all_displayable(lines in prop::collection::vec(arb_line(), 0..40)) {
            for l in filter_displayable(lines) {
                prop_assert!(l.requested_qty > 0);
                prop_assert_ne!(l.part_type.as_str(), SUBLET_CATEGORY);
            }
        }
    }
}
