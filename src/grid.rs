//! Diagram grid: rows stack upward from the origin, columns run rightward.
//!
//! Rows and columns are numbered from 1. A lane that names a row or column
//! past the end of the grid grows the grid with the default corridor extent.

use serde::{Deserialize, Serialize};

use crate::errors::{LayoutError, Result};
use crate::types::{BBox, Length, Point, Position, RectSize};

/// Per-diagram settings supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSettings {
    pub diagram_type: String,
    pub notation: String,
    #[serde(default)]
    pub origin: Position,
    pub size: RectSize,
    /// Row heights, bottom row first
    #[serde(default)]
    pub rows: Vec<Length>,
    /// Column widths, leftmost column first
    #[serde(default)]
    pub cols: Vec<Length>,
}

/// Which family of lanes a coordinate is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Horizontal corridor, resolves to a y coordinate
    Row,
    /// Vertical corridor, resolves to an x coordinate
    Column,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    origin: Position,
    row_heights: Vec<Length>,
    col_widths: Vec<Length>,
    new_row_height: Length,
    new_col_width: Length,
}

impl Grid {
    pub fn new(
        origin: Position,
        row_heights: Vec<Length>,
        col_widths: Vec<Length>,
        new_row_height: Length,
        new_col_width: Length,
    ) -> Result<Self> {
        for &value in row_heights
            .iter()
            .chain(col_widths.iter())
            .chain([new_row_height, new_col_width].iter())
        {
            if !(value.is_finite() && value > Length::ZERO) {
                return Err(LayoutError::InvalidGrid { value });
            }
        }
        Ok(Grid {
            origin,
            row_heights,
            col_widths,
            new_row_height,
            new_col_width,
        })
    }

    pub fn rows(&self) -> usize {
        self.row_heights.len()
    }

    pub fn cols(&self) -> usize {
        self.col_widths.len()
    }

    fn extents(&self, axis: Axis) -> &[Length] {
        match axis {
            Axis::Row => &self.row_heights,
            Axis::Column => &self.col_widths,
        }
    }

    /// Grow the grid so that `lane` exists on `axis`
    pub fn ensure(&mut self, axis: Axis, lane: u32) {
        let (extents, fill) = match axis {
            Axis::Row => (&mut self.row_heights, self.new_row_height),
            Axis::Column => (&mut self.col_widths, self.new_col_width),
        };
        let wanted = lane as usize;
        if extents.len() < wanted {
            extents.resize(wanted, fill);
        }
    }

    /// Start coordinate and extent of an existing lane, `None` for lane 0 or a lane past the end
    pub fn span(&self, axis: Axis, lane: u32) -> Option<(Length, Length)> {
        let index = (lane as usize).checked_sub(1)?;
        let extents = self.extents(axis);
        let extent = *extents.get(index)?;
        let base = match axis {
            Axis::Row => self.origin.y,
            Axis::Column => self.origin.x,
        };
        let start = extents[..index].iter().fold(base, |acc, &e| acc + e);
        Some((start, extent))
    }

    /// Start coordinate and extent `lane` has, or would have once the grid grows to reach it
    pub fn projected_span(&self, axis: Axis, lane: u32) -> Option<(Length, Length)> {
        let index = (lane as usize).checked_sub(1)?;
        let extents = self.extents(axis);
        if index < extents.len() {
            return self.span(axis, lane);
        }
        let (base, fill) = match axis {
            Axis::Row => (self.origin.y, self.new_row_height),
            Axis::Column => (self.origin.x, self.new_col_width),
        };
        let end = extents.iter().fold(base, |acc, &e| acc + e);
        Some((end + fill * (index - extents.len()) as f64, fill))
    }

    /// Box covering `row_span` rows starting at `row` and `col_span` columns starting at `col`
    pub fn cell_box(&self, row: u32, col: u32, row_span: u32, col_span: u32) -> Option<BBox<Length>> {
        if row_span == 0 || col_span == 0 {
            return None;
        }
        let (bottom, _) = self.span(Axis::Row, row)?;
        let (top_start, top_height) = self.span(Axis::Row, row + row_span - 1)?;
        let (left, _) = self.span(Axis::Column, col)?;
        let (right_start, right_width) = self.span(Axis::Column, col + col_span - 1)?;
        Some(BBox {
            min: Point::new(left, bottom),
            max: Point::new(right_start + right_width, top_start + top_height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pos;

    fn grid() -> Grid {
        Grid::new(
            pos(10.0, 20.0),
            vec![Length(100.0), Length(50.0)],
            vec![Length(200.0)],
            Length(60.0),
            Length(80.0),
        )
        .unwrap()
    }

    #[test]
    fn spans_accumulate_from_origin() {
        let g = grid();
        assert_eq!(g.span(Axis::Row, 1), Some((Length(20.0), Length(100.0))));
        assert_eq!(g.span(Axis::Row, 2), Some((Length(120.0), Length(50.0))));
        assert_eq!(g.span(Axis::Column, 1), Some((Length(10.0), Length(200.0))));
        assert_eq!(g.span(Axis::Row, 0), None);
        assert_eq!(g.span(Axis::Row, 3), None);
    }

    #[test]
    fn ensure_adds_default_corridors() {
        let mut g = grid();
        g.ensure(Axis::Column, 3);
        assert_eq!(g.cols(), 3);
        assert_eq!(g.span(Axis::Column, 3), Some((Length(290.0), Length(80.0))));
        g.ensure(Axis::Column, 2);
        assert_eq!(g.cols(), 3);
    }

    #[test]
    fn projected_span_does_not_grow_the_grid() {
        let g = grid();
        assert_eq!(g.projected_span(Axis::Row, 2), g.span(Axis::Row, 2));
        assert_eq!(g.projected_span(Axis::Column, 4), Some((Length(370.0), Length(80.0))));
        assert_eq!(g.projected_span(Axis::Column, 0), None);
        assert_eq!(g.cols(), 1);
    }

    #[test]
    fn cell_box_covers_the_span() {
        let g = grid();
        let cell = g.cell_box(1, 1, 2, 1).unwrap();
        assert_eq!(cell.min, pos(10.0, 20.0));
        assert_eq!(cell.max, pos(210.0, 170.0));
        assert!(g.cell_box(1, 1, 0, 1).is_none());
        assert!(g.cell_box(2, 1, 2, 1).is_none());
    }

    #[test]
    fn non_positive_extents_are_rejected() {
        let err = Grid::new(pos(0.0, 0.0), vec![Length(0.0)], vec![], Length(1.0), Length(1.0)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidGrid { value } if value == Length(0.0)));
    }
}
