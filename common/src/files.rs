use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::error::FanoutError;
use crate::results::RunResultSet;

/// Lee los targets: uno por línea, recortados. Las líneas en blanco se
/// conservan como targets vacíos; un salto de línea final no agrega uno extra.
pub fn read_targets(path: impl AsRef<Path>) -> Result<Vec<String>, FanoutError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| FanoutError::io(path, e))?;

    Ok(content.lines().map(|line| line.trim().to_string()).collect())
}

/// Escribe los resultados como un array JSON.
///
/// Se escribe primero a un archivo temporal al lado del destino y después
/// se renombra, así un error nunca deja un output a medias.
pub fn write_results(path: impl AsRef<Path>, results: &RunResultSet) -> Result<(), FanoutError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| FanoutError::io(parent, e))?;
        }
    }

    let tmp_path = temp_path_for(path);
    let written = write_json(&tmp_path, results);
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        FanoutError::io(path, e)
    })
}

fn write_json(path: &Path, results: &RunResultSet) -> Result<(), FanoutError> {
    let file = File::create(path).map_err(|e| FanoutError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, results)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| FanoutError::io(path, e))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "results".into());
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskRecord;
    use serde_json::{json, Value};
    use std::env;

    fn temp_dir(sub: &str) -> PathBuf {
        let base = env::temp_dir().join("fanout_files_tests").join(sub);
        let _ = fs::remove_dir_all(&base);
        fs::create_dir_all(&base).unwrap();
        base
    }

    #[test]
    fn read_targets_trims_and_keeps_blank_lines() {
        let tmp = temp_dir("read_basic");
        let input = tmp.join("targets.txt");
        fs::write(&input, "  a  \nb\r\n\nb\n").unwrap();

        let targets = read_targets(&input).unwrap();

        assert_eq!(targets, vec!["a", "b", "", "b"]);
    }

    #[test]
    fn read_targets_on_empty_file_is_empty() {
        let tmp = temp_dir("read_empty");
        let input = tmp.join("empty.txt");
        fs::File::create(&input).unwrap();

        assert!(read_targets(&input).unwrap().is_empty());
    }

    #[test]
    fn read_targets_missing_file_is_io_error() {
        let tmp = temp_dir("read_missing");
        let err = read_targets(tmp.join("no_existe.txt")).unwrap_err();

        assert_eq!(err.as_label(), "io");
        assert!(err.to_string().contains("no_existe.txt"));
    }

    #[test]
    fn write_results_produces_ordered_json_array() {
        let tmp = temp_dir("write_basic");
        let output = tmp.join("nested").join("out.json");

        let results = RunResultSet::new(vec![
            TaskRecord {
                target: "a".to_string(),
                command: "echo a".to_string(),
                raw_result: Some("a".to_string()),
                error_message: Some(String::new()),
                status_code: Some(0),
                retries_remaining: 5,
            },
            TaskRecord::construction_failed("b\0", "NUL", 5),
        ]);

        write_results(&output, &results).unwrap();

        let content: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            content,
            json!([
                {
                    "target": "a",
                    "command": "echo a",
                    "raw_result": "a",
                    "error_message": "",
                    "status_code": 0,
                    "retries_remaining": 5
                },
                {
                    "target": "b\u{0}",
                    "command": "",
                    "raw_result": null,
                    "error_message": "NUL",
                    "status_code": null,
                    "retries_remaining": 5
                }
            ])
        );

        // no deben quedar temporales
        let leftovers: Vec<_> = fs::read_dir(tmp.join("nested")).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn write_results_into_missing_dir_that_cannot_be_created_fails() {
        let tmp = temp_dir("write_blocked");
        // un archivo donde debería ir un directorio
        let blocker = tmp.join("blocker");
        fs::write(&blocker, "x").unwrap();
        let output = blocker.join("out.json");

        let err = write_results(&output, &RunResultSet::default()).unwrap_err();

        assert_eq!(err.as_label(), "io");
        assert!(!output.exists());
    }
}
