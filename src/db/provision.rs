//! Copying the schema-only template over the output database.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("template database not found: {0}")]
    TemplateMissing(PathBuf),
    #[error("template and target are the same file: {0}")]
    SamePath(PathBuf),
    #[error("failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to remove stale file {path}: {source}")]
    Stale {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy {template} to {target}: {source}")]
    Copy {
        template: PathBuf,
        target: PathBuf,
        source: std::io::Error,
    },
}

const SIDECAR_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// Copy the template database byte-for-byte to `target`, replacing any
/// previous output. Returns the number of bytes copied.
///
/// # Errors
/// Fails before writing anything if the template is missing.
pub async fn provision_template(template: &Path, target: &Path) -> Result<u64, ProvisionError> {
    let is_file = tokio::fs::metadata(template)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(ProvisionError::TemplateMissing(template.to_path_buf()));
    }

    if let (Ok(a), Ok(b)) = (
        tokio::fs::canonicalize(template).await,
        tokio::fs::canonicalize(target).await,
    ) {
        if a == b {
            return Err(ProvisionError::SamePath(a));
        }
    }

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ProvisionError::OutputDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
    }

    for suffix in SIDECAR_SUFFIXES {
        let mut sidecar = target.as_os_str().to_owned();
        sidecar.push(suffix);
        let sidecar = PathBuf::from(sidecar);
        match tokio::fs::remove_file(&sidecar).await {
            Ok(()) => debug!(path = %sidecar.display(), "Removed stale sidecar"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ProvisionError::Stale {
                    path: sidecar,
                    source,
                })
            }
        }
    }

    let bytes = tokio::fs::copy(template, target)
        .await
        .map_err(|source| ProvisionError::Copy {
            template: template.to_path_buf(),
            target: target.to_path_buf(),
            source,
        })?;

    info!(
        template = %template.display(),
        target = %target.display(),
        bytes,
        "Provisioned output database from template"
    );
    Ok(bytes)
}
