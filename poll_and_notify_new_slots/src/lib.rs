pub mod config;

use crate::config::TrackerSettings;
use itertools::Itertools;
use notifications::delivery::{DeliveryStrategy, Notification};
use notifications::idempotency::NotifiedSlotsRegistry;
use shared_kernel::date_time::feed_clock::FeedClock;
use slot_availability::contracts::fetch_open_slots::OpenSlotsFetcher;
use slot_availability::filters::location::{partition_by_location, LocationMatchMode};
use slot_availability::filters::recency::recent_slots;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// One evaluation cycle: fetch the feed, keep the recently created slots at
/// the targeted locations, drop everything already announced, deliver the
/// rest. The registry is externally owned; its mutex serializes cycles so an
/// identity can only be claimed as new once.
pub struct NewSlotsNotifier {
    fetcher: Arc<dyn OpenSlotsFetcher>,
    delivery: Arc<dyn DeliveryStrategy>,
    registry: Arc<Mutex<NotifiedSlotsRegistry>>,
    clock: FeedClock,
    recency_threshold_minutes: i64,
    targeted_locations: HashSet<String>,
    location_match_mode: LocationMatchMode,
}

impl NewSlotsNotifier {
    pub fn new(
        fetcher: Arc<dyn OpenSlotsFetcher>,
        delivery: Arc<dyn DeliveryStrategy>,
        registry: Arc<Mutex<NotifiedSlotsRegistry>>,
        clock: FeedClock,
        settings: &TrackerSettings,
    ) -> Self {
        Self {
            fetcher,
            delivery,
            registry,
            clock,
            recency_threshold_minutes: settings.recency_threshold_minutes,
            targeted_locations: settings.targeted_locations.clone(),
            location_match_mode: settings.location_match_mode,
        }
    }

    /// Runs one cycle and returns the number of individual slot notifications
    /// sent. Never returns an error: a failed cycle notifies nothing and
    /// reports the failure through logs.
    #[tracing::instrument(skip(self))]
    pub async fn run_once(&self) -> usize {
        let reference_time = self.clock.now();

        let slots = match self.fetcher.fetch_open_slots().await {
            Ok(slots) => slots,
            Err(err) => {
                error!("Failed to fetch open slots: {err:?}");
                return 0;
            }
        };

        // Recency runs before location so stale slots never show up in the
        // other-locations report.
        let recent = recent_slots(slots, reference_time, self.recency_threshold_minutes);
        if recent.is_empty() {
            info!("No recent slots this cycle");
            return 0;
        }

        let partition =
            partition_by_location(recent, &self.targeted_locations, self.location_match_mode);
        if !partition.other_locations.is_empty() {
            info!(
                "Other recent locations seen this cycle: {}",
                partition.other_locations.iter().join(", ")
            );
        }
        if partition.targeted.is_empty() {
            info!("No recent slots at targeted locations");
            return 0;
        }

        let new_slots = {
            let mut registry = self.registry.lock().await;
            registry.filter_new(&partition.targeted)
        };
        if new_slots.is_empty() {
            info!("All targeted slots were already announced");
            return 0;
        }

        let notified = new_slots.len();
        info!("Announcing {notified} new slot(s)");
        let notifications = std::iter::once(Notification::BatchSeparator)
            .chain(new_slots.into_iter().map(|slot| Notification::NewSlot {
                slot,
                reference_time,
            }))
            .collect_vec();

        if let Err(err) = self.delivery.deliver(notifications).await {
            // The registry keeps the identities anyway: an attempted slot is
            // never announced twice.
            error!("Failed to deliver notifications: {err:?}");
        }
        notified
    }
}
