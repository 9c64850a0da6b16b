use crate::slot::VisaSlot;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Keeps the slots created within `threshold_minutes` of `reference`,
/// preserving input order. The threshold is inclusive.
pub fn recent_slots(
    slots: Vec<VisaSlot>,
    reference: DateTime<Utc>,
    threshold_minutes: i64,
) -> Vec<VisaSlot> {
    slots
        .into_iter()
        .filter(|slot| {
            let age = slot.age_minutes(reference);
            if age > threshold_minutes {
                debug!(
                    "Skipping older slot at {}: {age} minute(s) old",
                    slot.location
                );
                return false;
            }
            true
        })
        .collect()
}
