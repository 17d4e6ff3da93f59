use std::env;

pub const RETRY_LIMIT_VAR: &str = "LIMIT_OF_ATTEMPTS_TO_RETRY";
pub const DEBUG_VAR: &str = "DEFAULT_DEBUGGING";

pub const DEFAULT_RETRY_LIMIT: u32 = 5;

/// Configuración del proceso. Se lee una sola vez al arrancar y se pasa
/// explícitamente al scheduler; el engine no consulta el entorno.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Reintentos manuales disponibles para cada tarea
    pub retry_limit: u32,
    /// Activa logs de debug
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry_limit: DEFAULT_RETRY_LIMIT,
            debug: false,
        }
    }
}

impl Config {
    /// Lee `LIMIT_OF_ATTEMPTS_TO_RETRY` y `DEFAULT_DEBUGGING`.
    ///
    /// Valores inválidos se ignoran y se usa el default; los avisos se
    /// devuelven aparte porque el logging todavía no está inicializado.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let retry_limit = match lookup(RETRY_LIMIT_VAR) {
            None => DEFAULT_RETRY_LIMIT,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warnings.push(format!(
                        "{}={:?} no es un entero positivo, usando {}",
                        RETRY_LIMIT_VAR, raw, DEFAULT_RETRY_LIMIT
                    ));
                    DEFAULT_RETRY_LIMIT
                }
            },
        };

        let debug = match lookup(DEBUG_VAR) {
            None => false,
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                warnings.push(format!("{}={:?} no es un booleano, usando false", DEBUG_VAR, raw));
                false
            }),
        };

        (Self { retry_limit, debug }, warnings)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
