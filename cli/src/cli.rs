use anyhow::Result;
use clap::Parser;
use fanout_common::{read_targets, write_results, CommandTemplate, Config, ConfigError, FanoutError};
use fanout_worker::{Limiter, Scheduler};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fanout")]
#[command(about = "Corre un comando contra cada target de un archivo, con concurrencia acotada")]
pub struct Cli {
    /// Comando a correr; `{}` se reemplaza por el target (escapado para el shell)
    #[arg(short = 'c', long = "command", value_name = "TEMPLATE")]
    pub command: String,

    /// Archivo con un target por línea
    #[arg(short = 'f', long = "file-input", value_name = "PATH")]
    pub file_input: PathBuf,

    /// Archivo JSON donde se escriben los resultados
    #[arg(short = 'r', long = "file-output", value_name = "PATH")]
    pub file_output: PathBuf,

    /// Máximo de instancias corriendo a la vez
    #[arg(short = 'i', long = "concurrent-instances", value_name = "N")]
    pub concurrent_instances: usize,
}

/// Valida, lee los targets, corre el batch y escribe los resultados.
/// Si algo falla antes de escribir, el archivo de salida no se toca.
pub async fn run(args: Cli, config: Config) -> Result<()> {
    // 1) config: template y concurrencia, antes de tocar archivos
    CommandTemplate::parse(&args.command)
        .map_err(|e| FanoutError::Config(ConfigError::from(e)))?;
    let limiter = Limiter::new(args.concurrent_instances).map_err(FanoutError::Config)?;

    // 2) targets
    let targets = read_targets(&args.file_input)?;
    info!(
        "{} targets leídos de {}",
        targets.len(),
        args.file_input.display()
    );

    // 3) batch
    let results = Scheduler::new(config)
        .run_batch_with_limiter(&args.command, targets, limiter)
        .await
        .map_err(FanoutError::Config)?;

    // 4) resultados
    write_results(&args.file_output, &results)?;
    info!(
        "{} resultados escritos en {}",
        results.len(),
        args.file_output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::Value;
    use std::{env, fs, path::Path};

    fn temp_dir(sub: &str) -> PathBuf {
        let base = env::temp_dir().join("fanout_cli_tests").join(sub);
        let _ = fs::remove_dir_all(&base);
        fs::create_dir_all(&base).unwrap();
        base
    }

    fn args(command: &str, input: &Path, output: &Path, n: usize) -> Cli {
        Cli {
            command: command.to_string(),
            file_input: input.to_path_buf(),
            file_output: output.to_path_buf(),
            concurrent_instances: n,
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_short_and_long_flags() {
        let cli = Cli::try_parse_from([
            "fanout",
            "-c",
            "ping -c1 {}",
            "--file-input",
            "hosts.txt",
            "-r",
            "out.json",
            "--concurrent-instances",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.command, "ping -c1 {}");
        assert_eq!(cli.file_input, PathBuf::from("hosts.txt"));
        assert_eq!(cli.file_output, PathBuf::from("out.json"));
        assert_eq!(cli.concurrent_instances, 4);
    }

    #[test]
    fn all_flags_are_required() {
        let res = Cli::try_parse_from(["fanout", "-c", "echo {}", "-f", "in.txt", "-r", "out.json"]);
        assert!(res.is_err());

        let res = Cli::try_parse_from(["fanout", "-c", "echo {}", "-f", "in.txt", "-r", "out.json", "-i", "-1"]);
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn run_writes_one_entry_per_target_in_order() {
        let tmp = temp_dir("happy");
        let input = tmp.join("targets.txt");
        let output = tmp.join("out").join("results.json");
        fs::write(&input, "a\n b \na\n").unwrap();

        run(args("echo {}", &input, &output, 2), Config::default())
            .await
            .unwrap();

        let content: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let entries = content.as_array().unwrap();
        assert_eq!(entries.len(), 3);

        let targets: Vec<_> = entries.iter().map(|e| e["target"].as_str().unwrap()).collect();
        assert_eq!(targets, vec!["a", "b", "a"]);
        for e in entries {
            assert_eq!(e["raw_result"], e["target"]);
            assert_eq!(e["status_code"], 0);
            assert_eq!(e["retries_remaining"], 5);
        }
    }

    #[tokio::test]
    async fn malformed_template_leaves_output_untouched() {
        let tmp = temp_dir("bad_template");
        let input = tmp.join("targets.txt");
        let output = tmp.join("results.json");
        fs::write(&input, "a\n").unwrap();

        let err = run(args("echo {} {}", &input, &output, 1), Config::default())
            .await
            .unwrap_err();

        let err = err.downcast_ref::<FanoutError>().unwrap();
        assert_eq!(err.as_label(), "config");
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn zero_concurrency_is_a_config_error() {
        let tmp = temp_dir("zero");
        let input = tmp.join("targets.txt");
        let output = tmp.join("results.json");
        fs::write(&input, "a\n").unwrap();
        fs::write(&output, "previo").unwrap();

        let err = run(args("echo {}", &input, &output, 0), Config::default())
            .await
            .unwrap_err();

        assert_eq!(err.downcast_ref::<FanoutError>().unwrap().as_label(), "config");
        assert_eq!(fs::read_to_string(&output).unwrap(), "previo");
    }

    #[tokio::test]
    async fn missing_input_is_an_io_error() {
        let tmp = temp_dir("missing_input");
        let output = tmp.join("results.json");

        let err = run(
            args("echo {}", &tmp.join("no_existe.txt"), &output, 1),
            Config::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.downcast_ref::<FanoutError>().unwrap().as_label(), "io");
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn failing_targets_are_data_not_errors() {
        let tmp = temp_dir("failing");
        let input = tmp.join("targets.txt");
        let output = tmp.join("results.json");
        fs::write(&input, "x\n").unwrap();

        run(args("false {}", &input, &output, 1), Config::default())
            .await
            .unwrap();

        let content: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(content[0]["status_code"], 1);
        assert_eq!(content[0]["command"], "false x");
    }
}
