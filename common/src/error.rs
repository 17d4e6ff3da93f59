//! Errores compartidos por el engine y la CLI.
//!
//! - [`TemplateError`]: el template del comando no se puede renderizar.
//! - [`ConfigError`]: configuración inválida, fatal antes de lanzar procesos.
//! - [`FanoutError`]: errores fatales del batch completo (config, I/O).
//!
//! Los fallos de cada target (spawn, exit code != 0) NO son errores:
//! quedan como datos dentro del resultado de esa tarea.

use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("el template del comando no tiene ningún placeholder `{{}}`")]
    NoPlaceholder,

    #[error("el template del comando tiene {found} placeholders `{{}}`, se esperaba exactamente uno")]
    TooManyPlaceholders { found: usize },

    /// Un target con byte NUL no se puede pasar como argumento al shell.
    #[error("el target contiene un byte NUL y no puede pasarse al shell")]
    NulInTarget,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("concurrencia inválida: {value} (debe estar entre 1 y {max})")]
    InvalidConcurrency { value: usize, max: usize },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

#[derive(Error, Debug)]
pub enum FanoutError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("error de I/O en {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error serializando resultados: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FanoutError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FanoutError::Io {
            path: path.into(),
            source,
        }
    }

    /// Etiqueta corta para logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            FanoutError::Config(_) => "config",
            FanoutError::Io { .. } => "io",
            FanoutError::Serialize(_) => "serialize",
        }
    }
}
