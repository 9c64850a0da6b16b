use notifications::contracts::send_notification::telegram::TelegramSettings;
use serde::Deserialize;
use slot_availability::contracts::fetch_open_slots::FeedSettings;
use slot_availability::filters::location::LocationMatchMode;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub feed: FeedSettings,
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub tracker: TrackerSettings,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub timezone: String,
    pub recency_threshold_minutes: i64,
    pub targeted_locations: HashSet<String>,
    pub location_match_mode: LocationMatchMode,
    /// Correction added to every feed creation timestamp, in minutes. The
    /// feed's stated local time trails the instant the record appears by a
    /// constant 5h30m; see `shared_kernel::date_time::feed_clock`.
    pub created_on_offset_minutes: i64,
    /// When set, the dedup registry is loaded from and persisted to this file
    /// so restarts do not re-announce known slots.
    pub dedup_snapshot_file: Option<PathBuf>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            timezone: "Asia/Kolkata".to_string(),
            recency_threshold_minutes: 3,
            targeted_locations: ["CHENNAI".to_string(), "CHENNAI VAC".to_string()]
                .into_iter()
                .collect(),
            location_match_mode: LocationMatchMode::Exact,
            created_on_offset_minutes: 330,
            dedup_snapshot_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_load_from_the_configuration_directory() {
        let settings = shared_kernel::configuration::config::<Settings>().unwrap();

        assert_eq!(settings.feed.visa_category, "F-1 (Regular)");
        assert_eq!(settings.tracker.recency_threshold_minutes, 3);
        assert_eq!(settings.tracker.timezone, "Asia/Kolkata");
        assert_eq!(settings.tracker.created_on_offset_minutes, 330);
        assert_eq!(
            settings.tracker.location_match_mode,
            LocationMatchMode::Exact
        );
        assert!(settings
            .tracker
            .targeted_locations
            .contains("CHENNAI VAC"));
    }
}
