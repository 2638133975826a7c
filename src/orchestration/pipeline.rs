use crate::config::Config;
use crate::db::{open_database, provision_template, ProvisionError, Repository};
use crate::error::BuildError;
use crate::orchestration::loader::{LoadReport, Loader};
use crate::workbook::{extract, ExtractError, WorkbookSource, XlsxWorkbook};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info};

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub report: LoadReport,
    /// Row count of every content table after the load.
    pub tables: BTreeMap<String, i64>,
    pub orphan_tags: i64,
    pub digest: String,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.report.is_clean() && self.orphan_tags == 0
    }
}

/// Run the whole job against the configured `.xlsx` workbook.
///
/// # Errors
/// See [`build_with`].
pub async fn run(config: &Config) -> Result<RunSummary, BuildError> {
    build_with(config, || XlsxWorkbook::open(&config.source_workbook)).await
}

/// Provision, extract and load, in that order.
///
/// The workbook is only opened once the template has been copied, and the
/// database is only opened once every sheet has been read.
///
/// # Errors
/// Fails on a missing template, any extraction error, a connection-level
/// database error, or the first failed row under the abort policy.
pub async fn build_with<W, F>(config: &Config, open_workbook: F) -> Result<RunSummary, BuildError>
where
    W: WorkbookSource,
    F: FnOnce() -> Result<W, ExtractError>,
{
    provision(config).await?;

    let mut workbook = open_workbook()?;
    let extracted = extract(&mut workbook)?;
    info!(rows = extracted.total_rows(), "Extraction complete");

    let pool = open_database(&config.target_database, false).await?;
    let repo = Repository::new(pool);

    let report = match Loader::new(config.failure_policy)
        .load(&repo, &extracted)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            repo.close().await;
            return Err(e.into());
        }
    };

    let summary = summarize(&repo, report).await;
    repo.close().await;
    let summary = summary?;

    info!(
        digest = %summary.digest,
        failures = summary.report.failures.len(),
        "Database written to {}",
        config.target_database.display()
    );
    Ok(summary)
}

async fn provision(config: &Config) -> Result<u64, ProvisionError> {
    provision_template(&config.template_database, &config.target_database)
        .await
        .inspect_err(|e| error!(error = %e, "Template provisioning failed"))
}

async fn summarize(repo: &Repository, report: LoadReport) -> Result<RunSummary, sqlx::Error> {
    let tables = repo
        .table_counts()
        .await?
        .into_iter()
        .map(|(table, count)| (table.to_string(), count))
        .collect();
    let orphan_tags = repo.count_orphan_tags().await?;
    let digest = repo.content_digest().await?;

    Ok(RunSummary {
        report,
        tables,
        orphan_tags,
        digest,
    })
}
