use std::time::Instant;

use fanout_common::{
    BatchSummary, CommandTemplate, Config, ConfigError, RunResultSet, TaskRecord,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::limiter::Limiter;
use crate::task::Task;

/// Corre un batch: una tarea por target, todas a la vez pero con a lo
/// sumo `max_concurrency` subprocesos vivos. No reintenta nada por su cuenta.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: Config,
}

enum Slot {
    /// Tarea lanzada; `fallback` se usa si el task del runtime hace panic
    Running {
        handle: JoinHandle<Task>,
        fallback: TaskRecord,
    },
    /// El target no se pudo convertir en tarea
    Rejected(TaskRecord),
}

impl Scheduler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run_batch(
        &self,
        command_template: &str,
        targets: Vec<String>,
        max_concurrency: usize,
    ) -> Result<RunResultSet, ConfigError> {
        // el template se valida antes que el limiter: ambos son fatales
        CommandTemplate::parse(command_template)?;
        let limiter = Limiter::new(max_concurrency)?;
        self.run_batch_with_limiter(command_template, targets, limiter)
            .await
    }

    /// Igual que [`Scheduler::run_batch`] con un limiter provisto por el caller.
    pub async fn run_batch_with_limiter(
        &self,
        command_template: &str,
        targets: Vec<String>,
        limiter: Limiter,
    ) -> Result<RunResultSet, ConfigError> {
        let template = CommandTemplate::parse(command_template)?;
        let started = Instant::now();

        info!(
            "lanzando batch: {} targets, concurrencia={}, reintentos={}",
            targets.len(),
            limiter.max(),
            self.config.retry_limit
        );

        let mut slots = Vec::with_capacity(targets.len());
        for target in &targets {
            match Task::from_template(&template, target, limiter.clone(), self.config.retry_limit) {
                Ok(task) => {
                    let fallback = task.to_record();
                    let handle = tokio::spawn(task.run());
                    slots.push(Slot::Running { handle, fallback });
                }
                Err(e) => {
                    warn!("target {:?} descartado: {}", target, e);
                    slots.push(Slot::Rejected(TaskRecord::construction_failed(
                        target,
                        &e.to_string(),
                        self.config.retry_limit,
                    )));
                }
            }
        }

        // se espera en orden de entrada, no de finalización
        let mut records = Vec::with_capacity(slots.len());
        for slot in slots {
            let record = match slot {
                Slot::Running { handle, fallback } => match handle.await {
                    Ok(task) => {
                        if let Some(failure) = task.failure() {
                            debug!("target {:?} falló: {:?}", task.target(), failure);
                        }
                        task.to_record()
                    }
                    Err(e) => {
                        warn!("panic o join error en target {:?}: {}", fallback.target, e);
                        TaskRecord {
                            error_message: Some(format!("la tarea hizo panic: {e}")),
                            ..fallback
                        }
                    }
                },
                Slot::Rejected(record) => record,
            };
            records.push(record);
        }

        let results = RunResultSet::new(records);
        let summary = BatchSummary::from_results(&results, started.elapsed());
        info!(
            "batch terminado: total={}, ok={}, fallidas={}, sin correr={}, {} ms (pico de concurrencia={})",
            summary.total_tasks,
            summary.succeeded_tasks,
            summary.failed_tasks,
            summary.not_run_tasks,
            summary.elapsed_ms,
            limiter.peak()
        );

        Ok(results)
    }
}
