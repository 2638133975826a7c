//! Repository layer for the content tables.
//!
//! Inserts run on a borrowed connection so the loader can keep the whole load
//! inside one transaction; read-side checks run on the pool.

use super::schema::CONTENT_TABLES;
use crate::domain::{Hagiography, MagisterialText, Prayer, ScriptureReading, Station};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::{Connection, Row};
use std::collections::HashMap;

/// A record that can be written to its content table.
#[async_trait]
pub trait Persist {
    /// Insert the record and return the generated row id.
    ///
    /// # Errors
    /// Returns an error if any statement fails; nothing of the record is kept.
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error>;

    /// Dependent rows written alongside the record.
    fn child_rows(&self) -> usize {
        0
    }
}

#[async_trait]
impl Persist for ScriptureReading {
    /// Insert the reading and its tags as one unit.
    ///
    /// The tags reference the id generated for the reading, read back from the
    /// same statement before anything else runs on the connection.
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let mut unit = conn.begin().await?;
        match insert_reading_rows(&mut *unit, self).await {
            Ok(reading_id) => {
                unit.commit().await?;
                Ok(reading_id)
            }
            Err(e) => {
                unit.rollback().await?;
                Err(e)
            }
        }
    }

    fn child_rows(&self) -> usize {
        self.tags.len()
    }
}

async fn insert_reading_rows(
    conn: &mut SqliteConnection,
    reading: &ScriptureReading,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO evangelium (book, chapter, verse0, verse1, title, quote, comment)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(reading.book.as_deref())
    .bind(reading.chapter)
    .bind(reading.verse_start)
    .bind(reading.verse_end)
    .bind(reading.title.as_deref())
    .bind(reading.quote.as_deref())
    .bind(reading.comment.as_deref())
    .execute(&mut *conn)
    .await?;
    let reading_id = result.last_insert_rowid();

    for tag in &reading.tags {
        sqlx::query("INSERT INTO evangelium_tags (tag, evangelium_id) VALUES (?, ?)")
            .bind(tag.as_str())
            .bind(reading_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(reading_id)
}

#[async_trait]
impl Persist for Station {
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO viacrucis (number, title, image, caption, comment, author, copyright)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(self.number)
        .bind(self.title.as_deref())
        .bind(self.image.as_deref())
        .bind(self.caption.as_deref())
        .bind(self.comment.as_deref())
        .bind(self.author.as_deref())
        .bind(self.copyright.as_deref())
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl Persist for MagisterialText {
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO pontifex (author, title, date, text) VALUES (?, ?, ?, ?)")
            .bind(self.author.as_deref())
            .bind(self.title.as_deref())
            .bind(self.date.as_deref())
            .bind(self.text.as_deref())
            .execute(&mut *conn)
            .await?;

        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl Persist for Hagiography {
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let result =
            sqlx::query("INSERT INTO saints (title, subtitle, text, copyright) VALUES (?, ?, ?, ?)")
                .bind(self.title.as_str())
                .bind(self.subtitle.as_str())
                .bind(self.text.as_str())
                .bind(self.copyright.as_str())
                .execute(&mut *conn)
                .await?;

        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl Persist for Prayer {
    async fn insert(&self, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO prayers (category, title, text) VALUES (?, ?, ?)")
            .bind(self.category.as_deref())
            .bind(self.title.as_deref())
            .bind(self.text.as_deref())
            .execute(&mut *conn)
            .await?;

        Ok(result.last_insert_rowid())
    }
}

/// Delete every row from the six content tables, tags first.
///
/// # Errors
/// Returns an error if any delete fails.
pub async fn clear_content(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for table in CONTENT_TABLES {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Data columns per table, in insert order; tags are digested separately.
const DIGEST_COLUMNS: [(&str, &str); 5] = [
    ("evangelium", "book, chapter, verse0, verse1, title, quote, comment"),
    ("viacrucis", "number, title, image, caption, comment, author, copyright"),
    ("pontifex", "author, title, date, text"),
    ("saints", "title, subtitle, text, copyright"),
    ("prayers", "category, title, text"),
];

/// Repository for the output database.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for the connection to finish its writes.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Count the rows of one content table.
    ///
    /// # Errors
    /// Returns an error if the table does not exist.
    pub async fn count_rows(&self, table: &str) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(&format!("SELECT COUNT(*) AS n FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n"))
    }

    /// Row counts for all six content tables.
    pub async fn table_counts(&self) -> Result<Vec<(&'static str, i64)>, sqlx::Error> {
        let mut counts = Vec::with_capacity(CONTENT_TABLES.len());
        for table in CONTENT_TABLES {
            counts.push((table, self.count_rows(table).await?));
        }
        Ok(counts)
    }

    /// Number of tag rows whose parent reading does not exist.
    pub async fn count_orphan_tags(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS n
            FROM evangelium_tags t
            LEFT JOIN evangelium e ON e.id = t.evangelium_id
            WHERE e.id IS NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get::<i64, _>("n"))
    }

    /// Tags of one reading, in insertion order.
    pub async fn query_tags(&self, reading_id: i64) -> Result<Vec<String>, sqlx::Error> {
        let rows = sqlx::query("SELECT tag FROM evangelium_tags WHERE evangelium_id = ? ORDER BY id")
            .bind(reading_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get::<String, _>("tag")).collect())
    }

    /// Ids of all readings, in insertion order.
    pub async fn query_reading_ids(&self) -> Result<Vec<i64>, sqlx::Error> {
        let rows = sqlx::query("SELECT id FROM evangelium ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get::<i64, _>("id")).collect())
    }

    /// SHA-256 over the loaded content, independent of generated ids.
    ///
    /// Values are hashed as SQL literals (`quote()`), so NULL, `''` and `3`
    /// versus `'3'` all hash differently. Tags are hashed with the position
    /// of their reading instead of its id.
    pub async fn content_digest(&self) -> Result<String, sqlx::Error> {
        use sha2::{Digest, Sha256};

        fn hash_var(hasher: &mut Sha256, data: &str) {
            hasher.update((data.len() as u32).to_le_bytes());
            hasher.update(data.as_bytes());
        }

        let mut hasher = Sha256::new();
        let mut reading_positions: HashMap<i64, u64> = HashMap::new();

        for (table, columns) in DIGEST_COLUMNS {
            let quoted: Vec<String> = columns
                .split(", ")
                .map(|c| format!("quote({})", c))
                .collect();
            let sql = format!("SELECT id, {} FROM {} ORDER BY id", quoted.join(", "), table);
            let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

            hash_var(&mut hasher, table);
            hasher.update((rows.len() as u64).to_le_bytes());
            for (position, row) in rows.iter().enumerate() {
                if table == "evangelium" {
                    reading_positions.insert(row.get::<i64, _>(0), position as u64);
                }
                for idx in 1..row.len() {
                    hash_var(&mut hasher, &row.get::<String, _>(idx));
                }
            }
        }

        let tags = sqlx::query("SELECT evangelium_id, tag FROM evangelium_tags ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        hash_var(&mut hasher, "evangelium_tags");
        hasher.update((tags.len() as u64).to_le_bytes());
        for row in &tags {
            let parent = reading_positions
                .get(&row.get::<i64, _>(0))
                .copied()
                .unwrap_or(u64::MAX);
            hasher.update(parent.to_le_bytes());
            hash_var(&mut hasher, &row.get::<String, _>(1));
        }

        Ok(hex::encode(hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::open_database;
    use crate::db::schema::create_template;
    use tempfile::TempDir;

    async fn setup_repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        create_template(&db_path).await.expect("create_template failed");
        let pool = open_database(&db_path, false).await.expect("open failed");
        (Repository::new(pool), temp_dir)
    }

    fn reading(title: &str, tags: &[&str]) -> ScriptureReading {
        ScriptureReading {
            book: Some("John".to_string()),
            chapter: Some(3),
            verse_start: Some(16),
            verse_end: Some(17),
            title: Some(title.to_string()),
            quote: Some("For God so loved the world".to_string()),
            comment: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_reading_tags_reference_generated_id() {
        let (repo, _temp) = setup_repo().await;
        let mut conn = repo.pool().acquire().await.unwrap();

        let first = reading("First", &["faith", "hope"])
            .insert(&mut conn)
            .await
            .unwrap();
        let second = reading("Second", &["love"]).insert(&mut conn).await.unwrap();
        drop(conn);

        assert_ne!(first, second);
        assert_eq!(repo.query_tags(first).await.unwrap(), vec!["faith", "hope"]);
        assert_eq!(repo.query_tags(second).await.unwrap(), vec!["love"]);
        assert_eq!(repo.count_orphan_tags().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_hagiography_stores_empty_strings() {
        let (repo, _temp) = setup_repo().await;
        let mut conn = repo.pool().acquire().await.unwrap();
        Hagiography {
            title: "St. Clare".to_string(),
            subtitle: String::new(),
            text: "Life".to_string(),
            copyright: String::new(),
        }
        .insert(&mut conn)
        .await
        .unwrap();
        drop(conn);

        let row: (Option<String>, Option<String>) =
            sqlx::query_as("SELECT subtitle, copyright FROM saints")
                .fetch_one(repo.pool())
                .await
                .unwrap();
        assert_eq!(row.0.as_deref(), Some(""));
        assert_eq!(row.1.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_clear_content_empties_all_tables() {
        let (repo, _temp) = setup_repo().await;
        let mut conn = repo.pool().acquire().await.unwrap();
        reading("R", &["a"]).insert(&mut conn).await.unwrap();
        Prayer {
            category: Some("Marian".to_string()),
            title: Some("Ave Maria".to_string()),
            text: None,
        }
        .insert(&mut conn)
        .await
        .unwrap();

        clear_content(&mut conn).await.expect("clear failed");
        drop(conn);

        for (table, count) in repo.table_counts().await.unwrap() {
            assert_eq!(count, 0, "table {} not cleared", table);
        }
    }

    #[tokio::test]
    async fn test_digest_ignores_generated_ids() {
        let (repo_a, _temp_a) = setup_repo().await;
        let (repo_b, _temp_b) = setup_repo().await;

        let mut conn = repo_a.pool().acquire().await.unwrap();
        reading("R", &["a", "b"]).insert(&mut conn).await.unwrap();
        drop(conn);

        // Burn a few ids in the second database so its ids differ.
        let mut conn = repo_b.pool().acquire().await.unwrap();
        for _ in 0..3 {
            reading("Scratch", &["x"]).insert(&mut conn).await.unwrap();
        }
        clear_content(&mut conn).await.unwrap();
        reading("R", &["a", "b"]).insert(&mut conn).await.unwrap();
        drop(conn);

        assert_ne!(repo_a.query_reading_ids().await.unwrap(), repo_b.query_reading_ids().await.unwrap());
        assert_eq!(
            repo_a.content_digest().await.unwrap(),
            repo_b.content_digest().await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_digest_distinguishes_null_from_empty() {
        let (repo_a, _temp_a) = setup_repo().await;
        let (repo_b, _temp_b) = setup_repo().await;

        let mut conn = repo_a.pool().acquire().await.unwrap();
        let mut r = reading("R", &[]);
        r.comment = None;
        r.insert(&mut conn).await.unwrap();
        drop(conn);

        let mut conn = repo_b.pool().acquire().await.unwrap();
        let mut r = reading("R", &[]);
        r.comment = Some(String::new());
        r.insert(&mut conn).await.unwrap();
        drop(conn);

        assert_ne!(
            repo_a.content_digest().await.unwrap(),
            repo_b.content_digest().await.unwrap()
        );
    }
}
