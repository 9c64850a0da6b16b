use anyhow::Context;
use serde::{Deserialize, Serialize};
use slot_availability::slot::VisaSlot;
use std::collections::HashSet;
use std::path::Path;

const KEY_DELIMITER: &str = ":";

/// The dedup identity of a slot: location, earliest date and raw creation
/// timestamp. The appointment count is deliberately excluded so a count
/// change on an already-announced slot does not read as a new slot.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NotificationIdempotencyKey(String);

impl NotificationIdempotencyKey {
    pub fn for_slot(slot: &VisaSlot) -> Self {
        Self(
            [
                slot.location.as_str(),
                slot.earliest_date.as_str(),
                slot.created_on_raw.as_str(),
            ]
            .join(KEY_DELIMITER),
        )
    }
}

/// The set of identities already announced. Grows monotonically for the life
/// of the registry; identities are inserted when a slot is first selected for
/// notification, regardless of whether delivery later succeeds, so a slot is
/// announced at most once.
#[derive(Debug, Default)]
pub struct NotifiedSlotsRegistry {
    notified: HashSet<NotificationIdempotencyKey>,
}

impl NotifiedSlotsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the order-preserving subset of `slots` whose identity has not
    /// been seen before, recording every identity passed in.
    pub fn filter_new(&mut self, slots: &[VisaSlot]) -> Vec<VisaSlot> {
        slots
            .iter()
            .filter(|slot| {
                self.notified
                    .insert(NotificationIdempotencyKey::for_slot(slot))
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.notified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notified.is_empty()
    }

    /// Loads a snapshot written by [`NotifiedSlotsRegistry::persist`]. A
    /// missing file is an empty registry, so first runs need no setup.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read the dedup snapshot at {}", path.display()))?;
        let notified = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed dedup snapshot at {}", path.display()))?;
        Ok(Self { notified })
    }

    pub fn persist(&self, path: &Path) -> anyhow::Result<()> {
        let contents =
            serde_json::to_string(&self.notified).context("Failed to serialize the dedup keys")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write the dedup snapshot at {}", path.display()))
    }
}
