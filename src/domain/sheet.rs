//! The five fixed worksheets of the source workbook.

use serde::Serialize;

/// A worksheet of the source workbook, identified by its fixed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sheet {
    /// Scripture readings and their tags.
    Scripture,
    /// Way of the cross stations.
    WayOfCross,
    /// Papal and magisterial texts.
    Magisterial,
    /// Lives of the saints.
    Hagiography,
    /// Prayers.
    Prayers,
}

impl Sheet {
    /// All sheets in workbook order.
    pub const ALL: [Sheet; 5] = [
        Sheet::Scripture,
        Sheet::WayOfCross,
        Sheet::Magisterial,
        Sheet::Hagiography,
        Sheet::Prayers,
    ];

    /// 1-based position of the sheet in the workbook.
    pub fn index(&self) -> usize {
        match self {
            Sheet::Scripture => 1,
            Sheet::WayOfCross => 2,
            Sheet::Magisterial => 3,
            Sheet::Hagiography => 4,
            Sheet::Prayers => 5,
        }
    }

    /// Target table the sheet's rows are loaded into.
    pub fn table(&self) -> &'static str {
        match self {
            Sheet::Scripture => "evangelium",
            Sheet::WayOfCross => "viacrucis",
            Sheet::Magisterial => "pontifex",
            Sheet::Hagiography => "saints",
            Sheet::Prayers => "prayers",
        }
    }
}

impl std::fmt::Display for Sheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Sheet::Scripture => "scripture",
            Sheet::WayOfCross => "way_of_cross",
            Sheet::Magisterial => "magisterial",
            Sheet::Hagiography => "hagiography",
            Sheet::Prayers => "prayers",
        };
        write!(f, "{} (sheet {})", name, self.index())
    }
}
