use notifications::contracts::send_notification::telegram::TelegramStrategy;
use notifications::idempotency::NotifiedSlotsRegistry;
use poll_and_notify_new_slots::config::Settings;
use poll_and_notify_new_slots::NewSlotsNotifier;
use shared_kernel::date_time::feed_clock::FeedClock;
use slot_availability::contracts::fetch_open_slots::FetchOpenSlotsInteractor;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared_kernel::tracing::config_telemetry();
    start().await
}

async fn start() -> anyhow::Result<()> {
    let started_at = std::time::Instant::now();
    let Settings {
        feed,
        telegram,
        tracker,
    } = shared_kernel::configuration::config::<Settings>()?;

    let clock = FeedClock::new(&tracker.timezone, tracker.created_on_offset_minutes)?;
    let fetcher = Arc::new(FetchOpenSlotsInteractor::new(feed, clock));
    let delivery = Arc::new(TelegramStrategy::new(&telegram)?);

    let registry = match tracker.dedup_snapshot_file.as_deref() {
        Some(path) => NotifiedSlotsRegistry::load(path)?,
        None => NotifiedSlotsRegistry::new(),
    };
    let registry = Arc::new(Mutex::new(registry));

    let notifier = NewSlotsNotifier::new(fetcher, delivery, Arc::clone(&registry), clock, &tracker);
    let notified = notifier.run_once().await;

    if let Some(path) = tracker.dedup_snapshot_file.as_deref() {
        registry.lock().await.persist(path)?;
    }

    info!(
        "Cycle finished in {:?}, {notified} notification(s) sent",
        started_at.elapsed()
    );
    Ok(())
}
