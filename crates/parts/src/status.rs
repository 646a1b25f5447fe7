//! Part fulfillment status.
//!
//! This is the only place the status rules live. Every view that shows or
//! counts a part's status goes through [`classify`].

use serde::{Deserialize, Serialize};

/// Fulfillment state of one part line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartState {
    NotOrdered,
    OnOrder,
    Received,
    Returned,
}

/// Indicator colour shown next to a part's status label.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Red,
    Yellow,
    Green,
    Blue,
}

impl PartState {
    pub const ALL: [PartState; 4] = [
        PartState::NotOrdered,
        PartState::OnOrder,
        PartState::Received,
        PartState::Returned,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PartState::NotOrdered => "Not Ordered",
            PartState::OnOrder => "Ordered",
            PartState::Received => "Received",
            PartState::Returned => "Returned",
        }
    }

    pub fn color(self) -> StatusColor {
        match self {
            PartState::NotOrdered => StatusColor::Red,
            PartState::OnOrder => StatusColor::Yellow,
            PartState::Received => StatusColor::Green,
            PartState::Returned => StatusColor::Blue,
        }
    }

    /// Position of the state when a parts table is sorted by status.
    pub fn sort_order(self) -> u8 {
        match self {
            PartState::NotOrdered => 0,
            PartState::OnOrder => 1,
            PartState::Received => 2,
            PartState::Returned => 3,
        }
    }

    /// Wire name (`not_ordered`, `on_order`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            PartState::NotOrdered => "not_ordered",
            PartState::OnOrder => "on_order",
            PartState::Received => "received",
            PartState::Returned => "returned",
        }
    }
}

impl core::fmt::Display for PartState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl StatusColor {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusColor::Red => "red",
            StatusColor::Yellow => "yellow",
            StatusColor::Green => "green",
            StatusColor::Blue => "blue",
        }
    }
}

/// Derive the state of a part line from its four quantities.
///
/// Rules are checked in order and the first match wins; they overlap on raw
/// inputs, so the order is part of the contract. A fully returned line reads
/// as `Returned` even though it was received first.
///
/// The requested quantity never changes the outcome; every rule keys off the
/// other three quantities.
///
/// - No IO
/// - No panics
/// - Total over any integer input, consistent or not
pub fn classify(_requested_qty: i64, ordered_qty: i64, received_qty: i64, returned_qty: i64) -> PartState {
    if returned_qty > 0 && returned_qty == received_qty {
        return PartState::Returned;
    }
    if received_qty > 0 {
        return PartState::Received;
    }
    if ordered_qty > 0 && received_qty == 0 {
        return PartState::OnOrder;
    }
    PartState::NotOrdered
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fully_returned_line_is_returned() {
        assert_eq!(classify(1, 2, 3, 3), PartState::Returned);
        assert_eq!(classify(0, 0, 3, 3), PartState::Returned);
    }

    #[test]
    fn partially_returned_line_is_still_received() {
        assert_eq!(classify(4, 4, 4, 1), PartState::Received);
    }

    #[test]
    fn received_wins_over_ordered() {
        assert_eq!(classify(2, 0, 5, 0), PartState::Received);
        assert_eq!(classify(2, 9, 5, 0), PartState::Received);
    }

    #[test]
    fn ordered_but_not_received_is_on_order() {
        assert_eq!(classify(1, 4, 0, 0), PartState::OnOrder);
        assert_eq!(classify(0, 4, 0, 0), PartState::OnOrder);
    }

    #[test]
    fn nothing_ordered_is_not_ordered() {
        assert_eq!(classify(5, 0, 0, 0), PartState::NotOrdered);
        assert_eq!(classify(0, 0, 0, 0), PartState::NotOrdered);
    }

    #[test]
    fn returned_without_receipt_falls_through() {
        // returned > 0 but != received, and nothing received.
        assert_eq!(classify(1, 2, 0, 1), PartState::OnOrder);
        assert_eq!(classify(1, 0, 0, 1), PartState::NotOrdered);
    }

    #[test]
    fn display_metadata_is_fixed() {
        let meta: Vec<_> = PartState::ALL
            .iter()
            .map(|s| (s.label(), s.color().as_str(), s.sort_order()))
            .collect();
        assert_eq!(
            meta,
            vec![
                ("Not Ordered", "red", 0),
                ("Ordered", "yellow", 1),
                ("Received", "green", 2),
                ("Returned", "blue", 3),
            ]
        );
    }

    #[test]
    fn states_serialize_as_wire_names() {
        for state in PartState::ALL {
            let json = serde_json::to_value(state).unwrap();
            assert_eq!(json, serde_json::Value::String(state.as_str().to_string()));
        }
        let color = serde_json::to_value(StatusColor::Yellow).unwrap();
        assert_eq!(color, "yellow");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 1000,
            ..ProptestConfig::default()
        })]

        /// Property: any non-negative tuple classifies without panicking.
        #[test]
        fn classify_is_total(
            r in 0i64..1_000,
            o in 0i64..1_000,
            rc in 0i64..1_000,
            rt in 0i64..1_000,
        ) {
            let state = classify(r, o, rc, rt);
            prop_assert!(PartState::ALL.contains(&state));
        }

        /// Property: inconsistent and negative inputs are tolerated too.
        #[test]
        fn classify_tolerates_any_integers(
            r in any::<i64>(),
            o in any::<i64>(),
            rc in any::<i64>(),
            rt in any::<i64>(),
        ) {
            let _ = classify(r, o, rc, rt);
        }

        /// Property: the requested quantity never changes the state.
        #[test]
        fn requested_qty_does_not_affect_state(
            r1 in any::<i64>(),
            r2 in any::<i64>(),
            o in -10i64..10,
            rc in -10i64..10,
            rt in -10i64..10,
        ) {
            prop_assert_eq!(classify(r1, o, rc, rt), classify(r2, o, rc, rt));
        }

        #[test]
        fn equal_received_and_returned_is_returned(r in 0i64..100, o in 0i64..100, n in 1i64..100) {
            prop_assert_eq!(classify(r, o, n, n), PartState::Returned);
        }

        #[test]
        fn received_without_returns_is_received(r in 0i64..100, o in 0i64..100, n in 1i64..100) {
            prop_assert_eq!(classify(r, o, n, 0), PartState::Received);
        }

        #[test]
        fn ordered_only_is_on_order(r in 0i64..100, o in 1i64..100) {
            prop_assert_eq!(classify(r, o, 0, 0), PartState::OnOrder);
        }

        #[test]
        fn classify_is_deterministic(
            r in 0i64..50, o in 0i64..50, rc in 0i64..50, rt in 0i64..50,
        ) {
            prop_assert_eq!(classify(r, o, rc, rt), classify(r, o, rc, rt));
        }
    }
}
