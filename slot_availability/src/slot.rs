use chrono::{DateTime, Utc};

/// One appointment-availability record from the feed.
///
/// `created_at` is the normalized, offset-corrected UTC instant computed once
/// at construction (see `shared_kernel::date_time::feed_clock`); `location`
/// and `earliest_date` are kept exactly as the feed reported them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VisaSlot {
    pub location: String,
    pub earliest_date: String,
    pub appointment_count: u32,
    pub created_on_raw: String,
    pub visa_category: String,
    created_at: DateTime<Utc>,
}

impl VisaSlot {
    pub fn new(
        location: String,
        earliest_date: String,
        appointment_count: u32,
        created_on_raw: String,
        visa_category: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            location,
            earliest_date,
            appointment_count,
            created_on_raw,
            visa_category,
            created_at,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whole minutes elapsed between creation and `reference`. A negative age
    /// (clock skew, offset overshoot) is not an error; callers treat it the
    /// same as a freshly created slot.
    pub fn age_minutes(&self, reference: DateTime<Utc>) -> i64 {
        (reference - self.created_at).num_minutes()
    }

    pub fn relative_age_text(&self, reference: DateTime<Utc>) -> String {
        let minutes = self.age_minutes(reference);
        if minutes < 1 {
            return "just now".to_string();
        }
        if minutes < 60 {
            return format!("{minutes} minute{} ago", plural(minutes));
        }
        if minutes < 1440 {
            let hours = minutes / 60;
            let remainder = minutes % 60;
            return if remainder == 0 {
                format!("{hours} hour{} ago", plural(hours))
            } else {
                format!(
                    "{hours} hour{} {remainder} minute{} ago",
                    plural(hours),
                    plural(remainder)
                )
            };
        }
        let days = minutes / 1440;
        format!("{days} day{} ago", plural(days))
    }
}

fn plural(quantity: i64) -> &'static str {
    if quantity == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    fn slot_created_minutes_ago(reference: DateTime<Utc>, minutes: i64) -> VisaSlot {
        VisaSlot::new(
            "CHENNAI".to_string(),
            "15 Dec, 2025".to_string(),
            4,
            "2025-03-01 10:00:00".to_string(),
            "F-1 (Regular)".to_string(),
            reference - Duration::minutes(minutes),
        )
    }

    #[rstest]
    #[case(0, "just now")]
    #[case(1, "1 minute ago")]
    #[case(59, "59 minutes ago")]
    #[case(60, "1 hour ago")]
    #[case(90, "1 hour 30 minutes ago")]
    #[case(61, "1 hour 1 minute ago")]
    #[case(120, "2 hours ago")]
    #[case(1439, "23 hours 59 minutes ago")]
    #[case(1440, "1 day ago")]
    #[case(2880, "2 days ago")]
    fn relative_age_text_boundaries(#[case] age_minutes: i64, #[case] expected: &str) {
        let reference = Utc::now();
        let slot = slot_created_minutes_ago(reference, age_minutes);
        assert_eq!(slot.relative_age_text(reference), expected);
    }

    #[test]
    fn a_slot_created_after_the_reference_reads_as_just_now() {
        let reference = Utc::now();
        let slot = slot_created_minutes_ago(reference, -5);
        assert_eq!(slot.age_minutes(reference), -5);
        assert_eq!(slot.relative_age_text(reference), "just now");
    }
}
