use crate::db::ProvisionError;
use crate::orchestration::LoadError;
use crate::workbook::ExtractError;
use thiserror::Error;

/// Fatal errors of a database build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Provisioning failed: {0}")]
    Provision(#[from] ProvisionError),
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("Load failed: {0}")]
    Load(#[from] LoadError),
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}
