use crate::slot::VisaSlot;
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashSet;

/// How a slot location is matched against the configured target set. The
/// deployed scripts disagreed on this historically, so it is configuration
/// rather than a code path.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LocationMatchMode {
    /// Case-sensitive set membership.
    #[default]
    Exact,
    /// The location contains any configured target as a substring.
    Substring,
}

#[derive(Debug, Default)]
pub struct LocationPartition {
    /// Order-preserving subsequence of slots at targeted locations.
    pub targeted: Vec<VisaSlot>,
    /// Distinct locations of the remaining slots, first-seen order. These are
    /// reported for operator awareness but never notified.
    pub other_locations: Vec<String>,
}

pub fn partition_by_location(
    slots: Vec<VisaSlot>,
    targets: &HashSet<String>,
    mode: LocationMatchMode,
) -> LocationPartition {
    let (targeted, others): (Vec<_>, Vec<_>) = slots
        .into_iter()
        .partition(|slot| is_targeted(&slot.location, targets, mode));
    let other_locations = others
        .into_iter()
        .map(|slot| slot.location)
        .unique()
        .collect_vec();
    LocationPartition {
        targeted,
        other_locations,
    }
}

fn is_targeted(location: &str, targets: &HashSet<String>, mode: LocationMatchMode) -> bool {
    match mode {
        LocationMatchMode::Exact => targets.contains(location),
        LocationMatchMode::Substring => targets
            .iter()
            .any(|target| location.contains(target.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn slot(location: &str) -> VisaSlot {
        VisaSlot::new(
            location.to_string(),
            "20 Nov, 2025".to_string(),
            1,
            format!("raw-{location}"),
            "F-1 (Regular)".to_string(),
            Utc::now(),
        )
    }

    fn targets() -> HashSet<String> {
        ["CHENNAI".to_string(), "CHENNAI VAC".to_string()]
            .into_iter()
            .collect()
    }

    #[test]
    fn exact_matching_is_case_sensitive_set_membership() {
        let slots = vec![
            slot("CHENNAI"),
            slot("Chennai"),
            slot("MUMBAI"),
            slot("CHENNAI VAC"),
            slot("NEW DELHI VAC"),
        ];

        let partition = partition_by_location(slots, &targets(), LocationMatchMode::Exact);

        let targeted = partition
            .targeted
            .iter()
            .map(|slot| slot.location.as_str())
            .collect::<Vec<_>>();
        assert_eq!(targeted, vec!["CHENNAI", "CHENNAI VAC"]);
        assert_eq!(
            partition.other_locations,
            vec!["Chennai", "MUMBAI", "NEW DELHI VAC"]
        );
    }

    #[rstest]
    #[case("CHENNAI", true)]
    #[case("CHENNAI VAC", true)]
    #[case("VFS CHENNAI CENTRE", true)]
    #[case("MUMBAI", false)]
    #[case("chennai", false)]
    fn substring_matching_looks_for_any_target_inside_the_location(
        #[case] location: &str,
        #[case] expected: bool,
    ) {
        let partition = partition_by_location(
            vec![slot(location)],
            &targets(),
            LocationMatchMode::Substring,
        );
        assert_eq!(partition.targeted.len() == 1, expected);
    }

    #[test]
    fn other_locations_are_deduplicated_in_first_seen_order() {
        let slots = vec![
            slot("MUMBAI"),
            slot("KOLKATA"),
            slot("MUMBAI"),
            slot("CHENNAI"),
        ];

        let partition = partition_by_location(slots, &targets(), LocationMatchMode::Exact);

        assert_eq!(partition.other_locations, vec!["MUMBAI", "KOLKATA"]);
    }
}
