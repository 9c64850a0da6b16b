use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slot_availability::slot::VisaSlot;

const BATCH_SEPARATOR: &str = "---------------------\n🎯 New Slot Batch\n---------------------";

/// One outbound payload. Order within a batch is meaningful: the separator
/// announces the batch before the individual slot messages follow.
#[derive(Clone, Debug)]
pub enum Notification {
    BatchSeparator,
    NewSlot {
        slot: VisaSlot,
        reference_time: DateTime<Utc>,
    },
}

impl Notification {
    pub fn message_text(&self) -> String {
        match self {
            Notification::BatchSeparator => BATCH_SEPARATOR.to_string(),
            Notification::NewSlot {
                slot,
                reference_time,
            } => format!(
                "🚨 New {} slot available!\n📍 Location: {}\n📅 Earliest Date: {}\n🎟️ No of Appointments: {}\n⏱️ Created {}",
                slot.visa_category,
                slot.location,
                slot.earliest_date,
                slot.appointment_count,
                slot.relative_age_text(*reference_time)
            ),
        }
    }
}

#[async_trait]
pub trait DeliveryStrategy: Send + Sync {
    /// Delivers the payloads in order. A failure for one destination must not
    /// prevent delivery to the remaining destinations.
    async fn deliver(&self, notifications: Vec<Notification>) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn a_slot_message_lists_every_field_on_its_own_line() {
        let reference_time = Utc::now();
        let slot = VisaSlot::new(
            "CHENNAI".to_string(),
            "15 Dec, 2025".to_string(),
            4,
            "2025-03-01 10:00:00".to_string(),
            "F-1 (Regular)".to_string(),
            reference_time - Duration::minutes(2),
        );

        let text = Notification::NewSlot {
            slot,
            reference_time,
        }
        .message_text();

        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "🚨 New F-1 (Regular) slot available!");
        assert_eq!(lines[1], "📍 Location: CHENNAI");
        assert_eq!(lines[2], "📅 Earliest Date: 15 Dec, 2025");
        assert_eq!(lines[3], "🎟️ No of Appointments: 4");
        assert_eq!(lines[4], "⏱️ Created 2 minutes ago");
    }

    #[test]
    fn the_batch_separator_is_a_three_line_banner() {
        let text = Notification::BatchSeparator.message_text();
        assert_eq!(text.lines().count(), 3);
    }
}
