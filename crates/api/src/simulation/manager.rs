use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use vitals_core::error::CoreError;
use vitals_core::types::DbId;

use super::generator::{SimulationReport, VitalGenerator};
use crate::config::SimulationConfig;
use crate::error::AppResult;
use crate::store::ReadingStore;

/// Bookkeeping for a run that has not finished yet.
struct ActiveRun {
    run_id: u64,
    cancel: CancellationToken,
}

/// Caller-side handle to a started run.
///
/// Dropping the handle does not stop the run.
#[derive(Debug)]
pub struct SimulationHandle {
    patient_id: DbId,
    cancel: CancellationToken,
    join: JoinHandle<SimulationReport>,
}

impl SimulationHandle {
    pub fn patient_id(&self) -> DbId {
        self.patient_id
    }

    /// Request early termination. The in-flight tick, if any, completes first.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the run to end and return its report.
    pub async fn wait(self) -> Result<SimulationReport, JoinError> {
        self.join.await
    }
}

/// Starts and tracks simulation runs, at most one per patient.
pub struct SimulationManager {
    store: Arc<dyn ReadingStore>,
    config: SimulationConfig,
    active: Arc<Mutex<HashMap<DbId, ActiveRun>>>,
    tracker: TaskTracker,
    next_run_id: AtomicU64,
}

impl SimulationManager {
    pub fn new(store: Arc<dyn ReadingStore>, config: SimulationConfig) -> Self {
        Self {
            store,
            config,
            active: Arc::new(Mutex::new(HashMap::new())),
            tracker: TaskTracker::new(),
            next_run_id: AtomicU64::new(1),
        }
    }

    /// Start a run for `patient_id` using the configured seeding policy.
    ///
    /// With a base seed configured each patient gets a reproducible stream
    /// derived from the seed and its id; otherwise the OS seeds the run.
    pub async fn start(&self, patient_id: DbId) -> AppResult<SimulationHandle> {
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(patient_id as u64)),
            None => StdRng::from_os_rng(),
        };
        self.start_with_rng(patient_id, rng).await
    }

    /// Start a run driven by the given random source.
    ///
    /// Fails with `NotFound` if the patient does not exist and `Conflict`
    /// if a run for the patient is still active.
    pub async fn start_with_rng<R>(&self, patient_id: DbId, rng: R) -> AppResult<SimulationHandle>
    where
        R: Rng + Send + 'static,
    {
        if self.store.find_patient(patient_id).await?.is_none() {
            tracing::warn!(patient_id, "Simulation not started: patient not found");
            return Err(CoreError::patient_not_found(patient_id).into());
        }

        let mut active = self.active.lock().await;
        if active.contains_key(&patient_id) {
            return Err(CoreError::Conflict(format!(
                "A simulation is already running for patient {patient_id}"
            ))
            .into());
        }

        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        active.insert(
            patient_id,
            ActiveRun {
                run_id,
                cancel: cancel.clone(),
            },
        );

        let generator = VitalGenerator::new(
            patient_id,
            Arc::clone(&self.store),
            rng,
            self.config.duration,
            self.config.tick_interval,
        );
        let registry = Arc::clone(&self.active);
        let token = cancel.clone();
        let join = self.tracker.spawn(async move {
            let report = generator.run(token).await;
            let mut active = registry.lock().await;
            if active.get(&patient_id).is_some_and(|run| run.run_id == run_id) {
                active.remove(&patient_id);
            }
            report
        });

        Ok(SimulationHandle {
            patient_id,
            cancel,
            join,
        })
    }

    /// Cancel the active run for a patient. Returns `false` if none is active.
    pub async fn stop(&self, patient_id: DbId) -> bool {
        match self.active.lock().await.remove(&patient_id) {
            Some(run) => {
                run.cancel.cancel();
                tracing::info!(patient_id, "Simulation stop requested");
                true
            }
            None => false,
        }
    }

    pub async fn is_running(&self, patient_id: DbId) -> bool {
        self.active.lock().await.contains_key(&patient_id)
    }

    pub async fn active_count(&self) -> usize {
        self.active.lock().await.len()
    }

    /// Cancel every run and wait up to `timeout` for them to finish.
    pub async fn shutdown(&self, timeout: Duration) {
        let runs: Vec<ActiveRun> = self.active.lock().await.drain().map(|(_, run)| run).collect();
        for run in &runs {
            run.cancel.cancel();
        }
        self.tracker.close();

        if tokio::time::timeout(timeout, self.tracker.wait()).await.is_err() {
            tracing::warn!(
                remaining = self.tracker.len(),
                "Simulation runs did not finish before shutdown timeout"
            );
        } else {
            tracing::info!(cancelled = runs.len(), "All simulation runs stopped");
        }
    }
}
