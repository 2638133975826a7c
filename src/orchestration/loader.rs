use crate::config::FailurePolicy;
use crate::db::repo::{clear_content, Persist};
use crate::db::Repository;
use crate::domain::{
    Hagiography, MagisterialText, Prayer, ScriptureReading, Sheet, SheetRecord, Station,
};
use crate::workbook::{Extracted, SourceRow};
use serde::Serialize;
use sqlx::sqlite::SqliteConnection;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Full-replace loader for the six content tables.
#[derive(Debug, Clone, Copy)]
pub struct Loader {
    policy: FailurePolicy,
}

impl Loader {
    pub fn new(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    /// Clear the content tables and insert every extracted row.
    ///
    /// Runs in a single transaction. Under [`FailurePolicy::Abort`] the first
    /// failed row rolls the whole load back; under [`FailurePolicy::Collect`]
    /// failed rows are reported and the rest is committed.
    ///
    /// # Errors
    /// Returns an error on connection-level failures, or on the first failed
    /// row when aborting.
    pub async fn load(
        &self,
        repo: &Repository,
        extracted: &Extracted,
    ) -> Result<LoadReport, LoadError> {
        let mut tx = repo.pool().begin().await?;
        clear_content(&mut *tx).await?;
        info!("Cleared content tables");

        let mut report = LoadReport::default();
        self.load_sheet::<ScriptureReading>(&mut *tx, extracted, &mut report)
            .await?;
        self.load_sheet::<Station>(&mut *tx, extracted, &mut report)
            .await?;
        self.load_sheet::<MagisterialText>(&mut *tx, extracted, &mut report)
            .await?;
        self.load_sheet::<Hagiography>(&mut *tx, extracted, &mut report)
            .await?;
        self.load_sheet::<Prayer>(&mut *tx, extracted, &mut report)
            .await?;

        tx.commit().await?;
        Ok(report)
    }

    async fn load_sheet<R>(
        &self,
        conn: &mut SqliteConnection,
        extracted: &Extracted,
        report: &mut LoadReport,
    ) -> Result<(), LoadError>
    where
        R: SheetRecord + Persist,
    {
        let sheet = R::SHEET;
        let rows = extracted.rows(sheet);
        let mut inserted = 0usize;

        for row in rows {
            match self.load_row::<R>(conn, row).await? {
                Ok(children) => {
                    inserted += 1;
                    report.tags_inserted += children;
                }
                Err((stage, reason)) => {
                    let failure = RowFailure {
                        sheet,
                        row: row.number,
                        stage,
                        reason,
                    };
                    match self.policy {
                        FailurePolicy::Abort => return Err(LoadError::Aborted(failure)),
                        FailurePolicy::Collect => {
                            warn!(
                                sheet = %failure.sheet,
                                row = failure.row,
                                stage = ?failure.stage,
                                reason = %failure.reason,
                                "Skipping row"
                            );
                            report.failures.push(failure);
                        }
                    }
                }
            }
        }

        info!(sheet = %sheet, table = sheet.table(), inserted, total = rows.len(), "Loaded sheet");
        report.inserted.insert(sheet, inserted);
        Ok(())
    }

    /// Parse and insert one row. The outer error is fatal to the load; the
    /// inner one is a row failure subject to the policy.
    async fn load_row<R>(
        &self,
        conn: &mut SqliteConnection,
        row: &SourceRow,
    ) -> Result<Result<usize, (FailureStage, String)>, LoadError>
    where
        R: SheetRecord + Persist,
    {
        let record = match R::from_cells(&row.cells) {
            Ok(record) => record,
            Err(e) => return Ok(Err((FailureStage::Parse, e.to_string()))),
        };

        match record.insert(conn).await {
            Ok(id) => {
                debug!(sheet = %R::SHEET, row = row.number, id, "Inserted row");
                Ok(Ok(record.child_rows()))
            }
            // Statement-level failures (constraints, type affinity) belong to
            // the row; anything else means the connection is unusable.
            Err(sqlx::Error::Database(e)) => Ok(Err((FailureStage::Insert, e.to_string()))),
            Err(e) => Err(LoadError::Db(e)),
        }
    }
}

/// Stage at which a row failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Parse,
    Insert,
}

/// A worksheet row that was not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub sheet: Sheet,
    /// 1-based row number in the worksheet.
    pub row: usize,
    pub stage: FailureStage,
    pub reason: String,
}

impl std::fmt::Display for RowFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self.stage {
            FailureStage::Parse => "parse",
            FailureStage::Insert => "insert",
        };
        write!(f, "{} row {} ({}): {}", self.sheet, self.row, stage, self.reason)
    }
}

/// Outcome of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Records inserted per sheet.
    pub inserted: BTreeMap<Sheet, usize>,
    pub tags_inserted: usize,
    pub failures: Vec<RowFailure>,
}

impl LoadReport {
    pub fn inserted(&self, sheet: Sheet) -> usize {
        self.inserted.get(&sheet).copied().unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("load aborted at {0}")]
    Aborted(RowFailure),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}
