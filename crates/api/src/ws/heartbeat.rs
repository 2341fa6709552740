use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::ws::registry::SubscriptionRegistry;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn the keep-alive task.
///
/// Every interval each channel gets a Ping frame; channels whose socket task
/// has already gone away are dropped from the registry and their groups.
pub fn start_heartbeat(
    registry: Arc<SubscriptionRegistry>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            let stale = registry.ping_all().await;
            let live = registry.connection_count().await;
            if stale > 0 {
                tracing::info!(stale, live, "Dropped stale WebSocket channels");
            } else {
                tracing::debug!(live, "WebSocket heartbeat ping");
            }
        }
        tracing::info!("Heartbeat stopped");
    })
}
