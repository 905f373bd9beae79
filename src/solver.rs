use futures::future::join_all;
use std::path::{Path, PathBuf};
use tokio::spawn;
use tracing::{debug, error};

use crate::input::{parse_document, Error, ShareDocument, SharePolicy};
use crate::sss::Secret;

/// A share file that reconstructed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solved {
    pub document: ShareDocument,
    pub secret: Secret,
}

/// The outcome of solving one share file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<Solved, Error>,
}

/// Reads one share file and reconstructs its secret.
///
/// # Arguments
/// * `path` - The JSON share file to read.
/// * `policy` - What to do with shares that do not decode.
pub async fn solve_file(path: impl AsRef<Path>, policy: SharePolicy) -> Result<Solved, Error> {
    let path = path.as_ref();
    debug!("Reading share file {}", path.display());

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let document = parse_document(&json, policy)?;
    let secret = document.reconstruct()?;
    debug!("Reconstructed secret for {}", path.display());

    Ok(Solved { document, secret })
}

/// Solves every share file on its own task.
///
/// Files share nothing, so they run concurrently and a failure in one never affects the others.
/// The reports come back in the order of `paths`.
pub async fn solve_files(paths: Vec<PathBuf>, policy: SharePolicy) -> Vec<FileReport> {
    let tasks = paths.into_iter().map(|path| {
        let task_path = path.clone();
        let handle = spawn(async move { solve_file(task_path, policy).await });

        async move {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => Err(Error::Task(err)),
            };
            if let Err(e) = &result {
                error!("Error solving {}: {}", path.display(), e);
            }
            FileReport { path, result }
        }
    });

    join_all(tasks).await
}
