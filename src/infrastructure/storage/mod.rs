//! Session artifacts on disk
//!
//! - `<stamp>-result.json`: the best configuration and its score
//! - `<stamp>-dump.json`: the minimizer state, reloadable as session history
//!
//! Files are written to a temporary sibling and renamed into place so that a
//! crash mid-write never leaves a truncated dump behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::models::{BestResult, OptimizeResult, SessionHistory};
use crate::services::setup::SessionContext;

/// Failures reading history files or writing artifacts.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Invalid history file {path}: {message}")]
    Corrupt { path: String, message: String },
}

/// Load one dump written by an earlier session.
pub fn load_history(path: impl AsRef<Path>) -> Result<SessionHistory, StorageError> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let raw = fs::read_to_string(path).map_err(|e| StorageError::Read {
        path: shown.clone(),
        message: e.to_string(),
    })?;
    let result: OptimizeResult = serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
        path: shown.clone(),
        message: e.to_string(),
    })?;

    if result.x_iters.len() != result.func_vals.len() {
        return Err(StorageError::Corrupt {
            path: shown,
            message: format!(
                "{} configurations but {} objective values",
                result.x_iters.len(),
                result.func_vals.len()
            ),
        });
    }

    debug!(path = %shown, points = result.x_iters.len(), "loaded session history");
    Ok(result.to_history().with_source(path))
}

/// Load every dump in order.
pub fn load_histories(paths: &[PathBuf]) -> Result<Vec<SessionHistory>, StorageError> {
    paths.iter().map(load_history).collect()
}

/// Writes the artifacts of one session.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    result_path: PathBuf,
    dump_path: PathBuf,
}

impl ArtifactStore {
    /// Store writing to the given paths.
    pub fn new(result_path: PathBuf, dump_path: PathBuf) -> Self {
        Self {
            result_path,
            dump_path,
        }
    }

    /// Store writing to the session's stamped paths.
    pub fn for_session(context: &SessionContext) -> Self {
        Self::new(context.result_path(), context.dump_path())
    }

    /// Where the best-result record goes.
    pub fn result_path(&self) -> &Path {
        &self.result_path
    }

    /// Where the minimizer state goes.
    pub fn dump_path(&self) -> &Path {
        &self.dump_path
    }

    /// Write the best-result record.
    pub fn write_result(&self, best: &BestResult) -> Result<(), StorageError> {
        write_json(&self.result_path, best)?;
        info!("Saving best result to {}.", self.result_path.display());
        Ok(())
    }

    /// Write (or overwrite) the dump; also used as a per-trial checkpoint.
    pub fn write_dump(&self, result: &OptimizeResult) -> Result<(), StorageError> {
        write_json(&self.dump_path, result)?;
        debug!(path = %self.dump_path.display(), points = result.x_iters.len(), "dump written");
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let write_err = |e: &dyn std::fmt::Display| StorageError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let json = serde_json::to_string_pretty(value).map_err(|e| write_err(&e))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| write_err(&e))?;
    fs::rename(&tmp, path).map_err(|e| write_err(&e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Bounds, Parameter, ParameterSpace};

    fn result() -> OptimizeResult {
        OptimizeResult::from_evaluations(
            vec![Bounds::new(50, 180), Bounds::new(2, 8)],
            vec![vec![77, 8], vec![120, 4], vec![60, 2]],
            vec![-150.0, -160.5, -140.0],
            Some(4.0),
            "search",
        )
        .unwrap()
    }

    #[test]
    fn dump_reloads_as_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("r.json"), dir.path().join("d.json"));
        store.write_dump(&result()).unwrap();

        let history = load_history(store.dump_path()).unwrap();

        assert_eq!(history.bounds, vec![Bounds::new(50, 180), Bounds::new(2, 8)]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.observations[1].configuration, vec![120, 4]);
        assert_eq!(history.observations[1].score, -160.5);
        assert_eq!(history.source.as_deref(), Some(store.dump_path()));
        assert!(!dir.path().join("d.json.tmp").exists());
    }

    #[test]
    fn result_file_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("r.json"), dir.path().join("d.json"));
        let space = ParameterSpace::new(vec![
            Parameter::new("maximumInliningDepth", (2, 8), 8),
            Parameter::new("maximumInliningRecursion", (1, 5), 3),
        ])
        .unwrap();

        store
            .write_result(&BestResult::new(&space, &[4, 2], -160.5, true))
            .unwrap();

        let raw = fs::read_to_string(store.result_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["parameters"]["maximumInliningDepth"], 4);
        assert_eq!(value["parameters"]["maximumInliningRecursion"], 2);
        assert_eq!(value["score"], 160.5);
    }

    #[test]
    fn mismatched_lengths_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{"x":[1],"fun":1.0,"x_iters":[[1],[2]],"func_vals":[1.0],"bounds":[[0,5]]}"#,
        )
        .unwrap();

        assert!(matches!(load_history(&path), Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn missing_file_is_read_error() {
        assert!(matches!(
            load_history("/nonexistent/jsc-tune/dump.json"),
            Err(StorageError::Read { .. })
        ));
    }
}
