//! Engine de ejecución concurrente.
//!
//! - [`Limiter`]: semáforo que acota los subprocesos vivos.
//! - [`Task`]: un comando contra un target (spawn, captura, reintento manual).
//! - [`Scheduler`]: arma las tareas, las corre y junta los resultados en orden.

pub mod limiter;
pub mod scheduler;
pub mod task;

pub use limiter::{Limiter, Permit};
pub use scheduler::Scheduler;
pub use task::{Task, TaskFailure, TaskState, DEFAULT_SHELL, SPAWN_FAILURE_STATUS};
