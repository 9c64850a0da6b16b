use crate::slot::VisaSlot;
use anyhow::Context;
use async_trait::async_trait;
use itertools::Itertools;
use serde::Deserialize;
use shared_kernel::date_time::feed_clock::FeedClock;
use shared_kernel::http_client::HttpClient;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

#[derive(Clone, Debug, Deserialize)]
pub struct FeedSettings {
    pub url: String,
    #[serde(default = "default_visa_category")]
    pub visa_category: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub referer: String,
    pub accept_language: String,
}

fn default_visa_category() -> String {
    "F-1 (Regular)".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

#[async_trait]
pub trait OpenSlotsFetcher: Send + Sync {
    async fn fetch_open_slots(&self) -> anyhow::Result<Vec<VisaSlot>>;
}

pub struct FetchOpenSlotsInteractor {
    settings: FeedSettings,
    clock: FeedClock,
}

/// Wire shape of the public availability feed. Entries are grouped by visa
/// category; each entry carries more fields than we read and those are
/// ignored on deserialization.
#[derive(Debug, Deserialize)]
struct AvailabilityFeed {
    #[serde(default)]
    result: HashMap<String, Vec<SlotRecord>>,
}

#[derive(Debug, Deserialize)]
struct SlotRecord {
    visa_location: String,
    earliest_date: String,
    no_of_apnts: u32,
    createdon: String,
}

impl FetchOpenSlotsInteractor {
    pub fn new(settings: FeedSettings, clock: FeedClock) -> Self {
        Self { settings, clock }
    }

    fn headers(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("User-Agent", self.settings.user_agent.clone()),
            ("Referer", self.settings.referer.clone()),
            ("Accept-Language", self.settings.accept_language.clone()),
            ("Accept", "application/json".to_string()),
        ])
    }

    fn to_slot(&self, record: SlotRecord) -> Option<VisaSlot> {
        match self.clock.normalize_creation_time(&record.createdon) {
            Ok(created_at) => Some(VisaSlot::new(
                record.visa_location,
                record.earliest_date,
                record.no_of_apnts,
                record.createdon,
                self.settings.visa_category.clone(),
                created_at,
            )),
            Err(err) => {
                // One bad record never aborts the batch.
                warn!(
                    "Skipping slot at {}: unusable creation time: {err}",
                    record.visa_location
                );
                None
            }
        }
    }
}

#[async_trait]
impl OpenSlotsFetcher for FetchOpenSlotsInteractor {
    #[tracing::instrument(skip(self), level = "info")]
    async fn fetch_open_slots(&self) -> anyhow::Result<Vec<VisaSlot>> {
        let url = Url::parse(&self.settings.url).context("Invalid feed URL")?;
        let timeout = Duration::from_secs(self.settings.timeout_seconds);

        let mut feed: AvailabilityFeed =
            HttpClient::get_with_headers(url, self.headers(), timeout)
                .await
                .context("Failed to fetch the availability feed")?;

        let records = feed
            .result
            .remove(&self.settings.visa_category)
            .unwrap_or_default();
        info!(
            "Fetched {} {} entries",
            records.len(),
            self.settings.visa_category
        );

        Ok(records
            .into_iter()
            .filter_map(|record| self.to_slot(record))
            .collect_vec())
    }
}
