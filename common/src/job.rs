use std::time::Duration;

use crate::results::RunResultSet;

/// Métricas de un batch terminado (sólo para logs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total_tasks: usize,
    pub succeeded_tasks: usize,
    /// Terminaron con exit code != 0, por señal o sin poder lanzarse (127)
    pub failed_tasks: usize,
    /// Sin status: no se construyeron o el task del runtime hizo panic
    pub not_run_tasks: usize,
    pub elapsed_ms: u64,
}

impl BatchSummary {
    pub fn from_results(results: &RunResultSet, elapsed: Duration) -> Self {
        let mut summary = BatchSummary {
            total_tasks: results.len(),
            elapsed_ms: elapsed.as_millis() as u64,
            ..Default::default()
        };

        for record in results.iter() {
            match record.status_code {
                Some(0) => summary.succeeded_tasks += 1,
                Some(_) => summary.failed_tasks += 1,
                None => summary.not_run_tasks += 1,
            }
        }

        summary
    }
}
