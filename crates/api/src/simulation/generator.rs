use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use vitals_core::simulation;
use vitals_core::types::DbId;
use vitals_db::models::vital_sign::CreateVitalSign;

use crate::store::ReadingStore;

/// Outcome of one simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationReport {
    /// Ticks attempted.
    pub ticks: u32,
    /// Readings the store accepted.
    pub persisted: u32,
    /// Ticks whose write failed. These are not retried.
    pub failed: u32,
    /// Whether the run was stopped before its duration elapsed.
    pub cancelled: bool,
}

/// Produces synthetic readings for one patient.
///
/// Ticks are strictly sequential: synthesize, persist, then wait
/// `tick_interval`. The run ends once `duration` has elapsed since start
/// or the cancellation token fires, whichever is first.
pub struct VitalGenerator<R> {
    patient_id: DbId,
    store: Arc<dyn ReadingStore>,
    rng: R,
    duration: Duration,
    tick_interval: Duration,
}

impl<R: Rng + Send> VitalGenerator<R> {
    pub fn new(
        patient_id: DbId,
        store: Arc<dyn ReadingStore>,
        rng: R,
        duration: Duration,
        tick_interval: Duration,
    ) -> Self {
        Self {
            patient_id,
            store,
            rng,
            duration,
            tick_interval,
        }
    }

    /// Run until the duration elapses or `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) -> SimulationReport {
        let started = Instant::now();
        let mut report = SimulationReport::default();

        tracing::info!(
            patient_id = self.patient_id,
            duration_secs = self.duration.as_secs(),
            tick_millis = self.tick_interval.as_millis() as u64,
            "Simulation started"
        );

        while started.elapsed() < self.duration {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            self.tick(&mut report).await;

            tokio::select! {
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(self.tick_interval) => {}
            }
        }

        tracing::info!(
            patient_id = self.patient_id,
            ticks = report.ticks,
            persisted = report.persisted,
            failed = report.failed,
            cancelled = report.cancelled,
            "Simulation finished"
        );
        report
    }

    /// Synthesize and persist one reading.
    ///
    /// A failed write is logged and counted; the loop carries on with the
    /// next tick.
    async fn tick(&mut self, report: &mut SimulationReport) {
        report.ticks += 1;

        let reading = simulation::next_reading(&mut self.rng);
        let input = CreateVitalSign::from_values(reading.values, Some(Utc::now()));

        match self.store.create_reading(self.patient_id, &input).await {
            Ok(vital) => {
                report.persisted += 1;
                tracing::debug!(
                    patient_id = self.patient_id,
                    vital_id = vital.id,
                    target = %reading.target,
                    cause = ?reading.cause,
                    "Simulated reading stored"
                );
            }
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    patient_id = self.patient_id,
                    error = %e,
                    "Simulated reading not stored"
                );
            }
        }
    }
}
