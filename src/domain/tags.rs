//! Scripture tag normalization.

use super::Cell;

/// Split a comma-separated tag cell into normalized tags.
///
/// Each piece is trimmed and lowercased. Pieces that are empty after trimming
/// are dropped, so `"a,,b, "` yields two tags and a blank cell yields none.
pub fn normalize_tags(cell: &Cell) -> Vec<String> {
    let Some(raw) = cell.as_text() else {
        return Vec::new();
    };

    raw.split(',')
        .map(|piece| piece.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}
