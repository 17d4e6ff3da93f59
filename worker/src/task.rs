use std::process::{ExitStatus, Stdio};

use fanout_common::{CommandTemplate, TaskRecord, TemplateError};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::limiter::Limiter;

/// Status que se registra cuando el comando ni siquiera pudo lanzarse.
pub const SPAWN_FAILURE_STATUS: i32 = 127;

pub const DEFAULT_SHELL: &str = "sh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Creada, todavía sin correr
    Pending,
    /// El subproceso terminó al menos una vez y hay output/status
    Ran,
}

/// Clasificación del último run de una tarea que falló.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFailure {
    /// El shell no se pudo lanzar
    SpawnFailed(String),
    /// El comando terminó con status != 0
    NonZeroExit(i32),
}

/// Una ejecución del comando contra un target.
///
/// Es dueña de su subproceso mientras corre; el limiter es compartido.
#[derive(Debug)]
pub struct Task {
    command: String,
    target: String,
    limiter: Limiter,
    shell: String,
    raw_result: Option<String>,
    error_message: Option<String>,
    status_code: Option<i32>,
    retries_remaining: u32,
    executions: u32,
    spawn_error: Option<String>,
}

impl Task {
    /// Valida el template y construye la tarea. No lanza nada todavía.
    pub fn create(
        command_template: &str,
        target: &str,
        limiter: Limiter,
        retry_limit: u32,
    ) -> Result<Self, TemplateError> {
        let template = CommandTemplate::parse(command_template)?;
        Self::from_template(&template, target, limiter, retry_limit)
    }

    /// Igual que [`Task::create`] con un template ya validado.
    pub fn from_template(
        template: &CommandTemplate,
        target: &str,
        limiter: Limiter,
        retry_limit: u32,
    ) -> Result<Self, TemplateError> {
        Ok(Self {
            command: template.render(target)?,
            target: target.to_string(),
            limiter,
            shell: DEFAULT_SHELL.to_string(),
            raw_result: None,
            error_message: None,
            status_code: None,
            retries_remaining: retry_limit,
            executions: 0,
            spawn_error: None,
        })
    }

    /// Cambia el intérprete usado para `<shell> -c <command>`.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Reserva un slot del limiter, corre el comando con `sh -c` y guarda
    /// stdout, stderr y status. Nunca devuelve error: si el proceso no se
    /// puede lanzar queda registrado en la propia tarea.
    pub async fn run(mut self) -> Self {
        let _permit = match self.limiter.acquire().await {
            Ok(p) => p,
            Err(e) => {
                self.record_spawn_failure(format!("limiter cerrado: {e}"));
                return self;
            }
        };

        debug!("lanzando tarea target={:?} cmd={:?}", self.target, self.command);
        self.executions += 1;

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(out) => {
                self.raw_result = Some(String::from_utf8_lossy(&out.stdout).trim().to_string());
                self.error_message = Some(String::from_utf8_lossy(&out.stderr).trim().to_string());
                self.status_code = Some(exit_code(out.status));
                self.spawn_error = None;
                debug!(
                    "terminó tarea target={:?} status={:?}",
                    self.target, self.status_code
                );
            }
            Err(e) => {
                warn!("no se pudo lanzar {:?}: {}", self.command, e);
                self.record_spawn_failure(format!("no se pudo lanzar el comando: {e}"));
            }
        }

        self
    }

    /// Vuelve a correr la tarea si le quedan reintentos; si no, no hace nada.
    /// El scheduler nunca lo llama solo: es para quien quiera orquestar reintentos.
    pub async fn rerun(mut self) -> Self {
        if self.retries_remaining == 0 {
            debug!("sin reintentos para target={:?}", self.target);
            return self;
        }
        self.retries_remaining -= 1;
        self.run().await
    }

    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            target: self.target.clone(),
            command: self.command.clone(),
            raw_result: self.raw_result.clone(),
            error_message: self.error_message.clone(),
            status_code: self.status_code,
            retries_remaining: self.retries_remaining,
        }
    }

    pub fn state(&self) -> TaskState {
        if self.status_code.is_some() {
            TaskState::Ran
        } else {
            TaskState::Pending
        }
    }

    pub fn failure(&self) -> Option<TaskFailure> {
        if let Some(msg) = &self.spawn_error {
            return Some(TaskFailure::SpawnFailed(msg.clone()));
        }
        match self.status_code {
            Some(0) | None => None,
            Some(code) => Some(TaskFailure::NonZeroExit(code)),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn raw_result(&self) -> Option<&str> {
        self.raw_result.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn status_code(&self) -> Option<i32> {
        self.status_code
    }

    pub fn retries_remaining(&self) -> u32 {
        self.retries_remaining
    }

    /// Cuántas veces se lanzó el subproceso
    pub fn executions(&self) -> u32 {
        self.executions
    }

    fn record_spawn_failure(&mut self, msg: String) {
        self.raw_result = Some(String::new());
        self.error_message = Some(msg.clone());
        self.status_code = Some(SPAWN_FAILURE_STATUS);
        self.spawn_error = Some(msg);
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    // terminado por señal: -señal
    status
        .code()
        .or_else(|| status.signal().map(|s| -s))
        .unwrap_or(SPAWN_FAILURE_STATUS)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(SPAWN_FAILURE_STATUS)
}
