use serde::{Deserialize, Serialize};

/// Registro serializable del estado terminal de una tarea.
/// Lista de campos fija: el limiter compartido nunca forma parte del output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Target original, sin escapar
    pub target: String,
    /// Comando ya renderizado (target escapado)
    pub command: String,
    /// stdout recortado; `None` si nunca corrió
    pub raw_result: Option<String>,
    /// stderr recortado; `None` si nunca corrió
    pub error_message: Option<String>,
    pub status_code: Option<i32>,
    pub retries_remaining: u32,
}

impl TaskRecord {
    /// Entrada para un target que no se pudo convertir en tarea.
    pub fn construction_failed(target: &str, error: &str, retries_remaining: u32) -> Self {
        Self {
            target: target.to_string(),
            command: String::new(),
            raw_result: None,
            error_message: Some(error.to_string()),
            status_code: None,
            retries_remaining,
        }
    }
}
