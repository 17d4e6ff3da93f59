use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use fanout_common::ConfigError;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Limita cuántos subprocesos corren a la vez.
///
/// Se clona barato: todas las copias comparten el mismo semáforo.
/// Además lleva la cuenta de slots ocupados y del máximo observado.
#[derive(Debug, Clone)]
pub struct Limiter {
    semaphore: Arc<Semaphore>,
    max: usize,
    stats: Arc<SlotStats>,
}

#[derive(Debug, Default)]
struct SlotStats {
    in_use: AtomicUsize,
    peak: AtomicUsize,
}

/// Slot reservado. Al hacer drop se devuelve al limiter, en cualquier
/// camino de salida (ok, error o panic).
#[derive(Debug)]
pub struct Permit {
    _permit: OwnedSemaphorePermit,
    stats: Arc<SlotStats>,
}

impl Limiter {
    pub fn new(max: usize) -> Result<Self, ConfigError> {
        if max == 0 || max > Semaphore::MAX_PERMITS {
            return Err(ConfigError::InvalidConcurrency {
                value: max,
                max: Semaphore::MAX_PERMITS,
            });
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(max)),
            max,
            stats: Arc::new(SlotStats::default()),
        })
    }

    /// Espera hasta que haya un slot libre y lo reserva.
    pub async fn acquire(&self) -> Result<Permit, AcquireError> {
        let permit = self.semaphore.clone().acquire_owned().await?;

        let now = self.stats.in_use.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak.fetch_max(now, Ordering::SeqCst);

        Ok(Permit {
            _permit: permit,
            stats: self.stats.clone(),
        })
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn in_use(&self) -> usize {
        self.stats.in_use.load(Ordering::SeqCst)
    }

    /// Máximo de slots ocupados al mismo tiempo desde que se creó.
    pub fn peak(&self) -> usize {
        self.stats.peak.load(Ordering::SeqCst)
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Permit {
    /// Devuelve el slot. Equivale a hacer drop.
    pub fn release(self) {}
}

impl Drop for Permit {
    fn drop(&mut self) {
        // se descuenta antes de que `_permit` libere el semáforo
        self.stats.in_use.fetch_sub(1, Ordering::SeqCst);
    }
}
