//! Shared fixtures: schema-only templates and `.xlsx` workbooks on disk.

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vitaminav_db_builder::config::{Config, FailurePolicy};
use vitaminav_db_builder::create_template;

/// A cell written to a fixture workbook.
#[derive(Debug, Clone)]
pub enum Fx {
    S(&'static str),
    N(f64),
    Blank,
}

pub type SheetFixture = Vec<Vec<Fx>>;

pub fn write_workbook(path: &Path, sheets: &[(&str, SheetFixture)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Fx::S(s) => {
                        worksheet.write_string(r as u32, c as u16, *s).unwrap();
                    }
                    Fx::N(n) => {
                        worksheet.write_number(r as u32, c as u16, *n).unwrap();
                    }
                    Fx::Blank => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

pub fn strings(values: &[&'static str]) -> Vec<Fx> {
    values
        .iter()
        .map(|s| if s.is_empty() { Fx::Blank } else { Fx::S(s) })
        .collect()
}

pub fn scripture_sheet() -> SheetFixture {
    vec![
        strings(&[
            "book", "chapter", "verse0", "verse1", "title", "reference", "tags", "quote",
            "comment",
        ]),
        strings(&[
            "John", "3", "16", "16", "Title1", "Quote1", "tagA,tagB", "C1", "Auth1",
        ]),
        vec![
            Fx::S("Matthew"),
            Fx::N(5.0),
            Fx::N(3.0),
            Fx::N(12.0),
            Fx::S("Beatitudes"),
            Fx::S("Mt 5:3-12"),
            Fx::S(" TagA , tagB"),
            Fx::S("Blessed are the poor in spirit"),
            Fx::Blank,
        ],
    ]
}

pub fn stations_sheet() -> SheetFixture {
    vec![
        strings(&[
            "number", "title", "image", "caption", "comment", "author", "copyright",
        ]),
        vec![
            Fx::N(1.0),
            Fx::S("Jesus is condemned to death"),
            Fx::S("stations/01.jpg"),
            Fx::S("Ecce homo"),
            Fx::S("Meditation"),
            Fx::S("Anonymous"),
            Fx::Blank,
        ],
        vec![
            Fx::N(2.0),
            Fx::S("Jesus takes up his cross"),
            Fx::S("stations/02.jpg"),
        ],
    ]
}

pub fn magisterial_sheet() -> SheetFixture {
    vec![
        strings(&["author", "title", "date", "text"]),
        strings(&["Francis", "Laudato si'", "2015-05-24", "Praise be to you"]),
    ]
}

pub fn hagiography_sheet() -> SheetFixture {
    vec![
        strings(&["title", "subtitle", "text", "copyright"]),
        strings(&["St. Francis", "", "Born in Assisi", ""]),
        strings(&["St. Clare", "Virgin", "Founded the Poor Clares", "CC-BY"]),
    ]
}

pub fn prayers_sheet() -> SheetFixture {
    vec![
        strings(&["category", "title", "text"]),
        strings(&["Marian", "Ave Maria", "Hail Mary, full of grace"]),
    ]
}

pub fn full_workbook() -> Vec<(&'static str, SheetFixture)> {
    vec![
        ("Evangelium", scripture_sheet()),
        ("ViaCrucis", stations_sheet()),
        ("Pontifex", magisterial_sheet()),
        ("Saints", hagiography_sheet()),
        ("Prayers", prayers_sheet()),
    ]
}

/// Scratch directory holding a template, a workbook path and an output path.
pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
}

impl Fixture {
    pub async fn new(sheets: &[(&str, SheetFixture)]) -> Self {
        let dir = TempDir::new().unwrap();
        let config = Config {
            source_workbook: dir.path().join("db_source.xlsx"),
            template_database: dir.path().join("vitaminav.template.db"),
            target_database: dir.path().join("assets").join("vitaminav.db"),
            failure_policy: FailurePolicy::Collect,
        };
        create_template(&config.template_database)
            .await
            .expect("create_template failed");
        write_workbook(&config.source_workbook, sheets);
        Self { dir, config }
    }

    pub fn target(&self) -> PathBuf {
        self.config.target_database.clone()
    }
}
