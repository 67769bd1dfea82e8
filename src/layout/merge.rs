//! Merged cell regions.
//!
//! The top-left cell of a region is its anchor and carries the spans; every
//! other cell inside is suppressed. Overlapping regions are not validated:
//! the last region listed that covers a cell decides its role.

use crate::cell_ref::{parse_cell_range, CellRange};

/// What a cell is with respect to merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRole {
    /// Not merged.
    Single,
    /// Top-left cell of a region.
    Anchor { colspan: u32, rowspan: u32 },
    /// Inside a region but not its anchor; not rendered.
    Covered { anchor_col: u32, anchor_row: u32 },
}

/// All merge regions of a sheet.
#[derive(Debug, Clone, Default)]
pub struct MergeMap {
    regions: Vec<CellRange>,
}

impl MergeMap {
    /// Parse merge references, dropping malformed ones.
    pub fn from_refs<S: AsRef<str>>(refs: &[S]) -> Self {
        let regions = refs
            .iter()
            .filter_map(|r| match parse_cell_range(r.as_ref()) {
                Ok(range) => Some(range),
                Err(err) => {
                    log::debug!("dropping merge: {err}");
                    None
                }
            })
            .collect();
        Self { regions }
    }

    pub fn regions(&self) -> &[CellRange] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The region deciding the cell at `(col, row)`, if any.
    pub fn region_at(&self, col: u32, row: u32) -> Option<&CellRange> {
        self.regions.iter().rev().find(|r| r.contains(col, row))
    }

    pub fn role(&self, col: u32, row: u32) -> MergeRole {
        match self.region_at(col, row) {
            None => MergeRole::Single,
            Some(r) if r.start_col == col && r.start_row == row => MergeRole::Anchor {
                colspan: r.width(),
                rowspan: r.height(),
            },
            Some(r) => MergeRole::Covered {
                anchor_col: r.start_col,
                anchor_row: r.start_row,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_and_covered() {
        let merges = MergeMap::from_refs(&["C2:D3"]);
        assert_eq!(
            merges.role(2, 1),
            MergeRole::Anchor {
                colspan: 2,
                rowspan: 2
            }
        );
        assert_eq!(
            merges.role(3, 2),
            MergeRole::Covered {
                anchor_col: 2,
                anchor_row: 1
            }
        );
        assert_eq!(merges.role(4, 1), MergeRole::Single);
    }

    #[test]
    fn test_last_region_wins() {
        let merges = MergeMap::from_refs(&["A1:B2", "B2:C3"]);
        assert_eq!(
            merges.role(1, 1),
            MergeRole::Anchor {
                colspan: 2,
                rowspan: 2
            }
        );
        assert_eq!(
            merges.role(0, 0),
            MergeRole::Anchor {
                colspan: 2,
                rowspan: 2
            }
        );
    }

    #[test]
    fn test_malformed_refs_dropped() {
        let merges = MergeMap::from_refs(&["A1:B1", "nope", "Z0:Z1"]);
        assert_eq!(merges.regions().len(), 1);
    }

    #[test]
    fn test_each_region_has_one_anchor() {
        let merges = MergeMap::from_refs(&["B2:D4"]);
        let anchors = (0..6)
            .flat_map(|c| (0..6).map(move |r| (c, r)))
            .filter(|&(c, r)| matches!(merges.role(c, r), MergeRole::Anchor { .. }))
            .count();
        assert_eq!(anchors, 1);
    }
}
