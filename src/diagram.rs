//! Per-build diagram state: style access, grid, nodes and the lane allocator.
//!
//! A `Diagram` is built once per drawing. Connectors are constructed against
//! it in document order, which is what makes rut assignment reproducible.

use std::rc::Rc;

use crate::connection::NodeFace;
use crate::errors::{LayoutError, Result};
use crate::grid::{Axis, DiagramSettings, Grid};
use crate::lanes::LaneAllocator;
use crate::node::{Node, NodePlacement, NodeSet};
use crate::style::{ConnectorLayoutSpec, STANDARD_LAYOUT, StyleLookup, require};
use crate::types::{BBox, Length, Position};

pub struct Diagram {
    style: Rc<dyn StyleLookup>,
    pub diagram_type: String,
    pub notation: String,
    bounds: BBox<Length>,
    grid: Grid,
    layout: ConnectorLayoutSpec,
    lanes: LaneAllocator,
    nodes: NodeSet,
}

impl std::fmt::Debug for Diagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagram")
            .field("diagram_type", &self.diagram_type)
            .field("notation", &self.notation)
            .field("bounds", &self.bounds)
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl Diagram {
    pub fn new(settings: &DiagramSettings, style: Rc<dyn StyleLookup>) -> Result<Self> {
        let layout = require(style.connector_layout(STANDARD_LAYOUT), "connector layout", || {
            STANDARD_LAYOUT.to_string()
        })?
        .clone();
        layout.validate()?;
        for value in [settings.size.width, settings.size.height] {
            if !(value.is_finite() && value > Length::ZERO) {
                return Err(LayoutError::InvalidGrid { value });
            }
        }
        let grid = Grid::new(
            settings.origin,
            settings.rows.clone(),
            settings.cols.clone(),
            layout.default_new_path_row_height,
            layout.default_new_path_col_width,
        )?;
        Ok(Diagram {
            diagram_type: settings.diagram_type.clone(),
            notation: settings.notation.clone(),
            bounds: BBox::from_corner(settings.origin, settings.size),
            grid,
            lanes: LaneAllocator::new(layout.rut_limit()),
            layout,
            nodes: NodeSet::new(),
            style,
        })
    }

    pub fn style(&self) -> &dyn StyleLookup {
        self.style.as_ref()
    }

    /// The "standard" connector layout record, fetched once at construction
    pub fn layout(&self) -> &ConnectorLayoutSpec {
        &self.layout
    }

    pub fn bounds(&self) -> BBox<Length> {
        self.bounds
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Symbol group holding the icons of this diagram's notation
    pub fn symbol_group(&self) -> String {
        format!("{} {}", self.notation, self.diagram_type)
    }

    pub fn place_node(&mut self, placement: &NodePlacement) -> Result<Rc<Node>> {
        let node = Node::place(placement, &self.grid)?;
        self.nodes.insert(node)
    }

    pub fn node(&self, name: &str, relationship: &str) -> Result<Rc<Node>> {
        self.nodes.get(name, relationship)
    }

    pub fn face_point(&self, node: &Node, face: NodeFace, anchor: i32) -> Result<Position> {
        node.face_point(face, anchor, &self.layout)
    }

    /// Reserve a rut in a row or column lane and return its canvas coordinate.
    ///
    /// Rut `r` sits `r` steps from the lane centre, one step being the lane
    /// extent divided by `default_rut_positions + 1`.
    pub fn claim_rut(&mut self, connector: &str, axis: Axis, lane: u32, rut: Option<i32>) -> Result<Length> {
        if lane == 0 {
            return Err(LayoutError::InvalidLane {
                connector: connector.to_string(),
            });
        }
        let (start, extent) = self
            .grid
            .projected_span(axis, lane)
            .ok_or_else(|| LayoutError::InvalidLane {
                connector: connector.to_string(),
            })?;
        let (low, high) = match axis {
            Axis::Row => (self.bounds.min.y, self.bounds.max.y),
            Axis::Column => (self.bounds.min.x, self.bounds.max.x),
        };
        if start < low || start + extent > high {
            return Err(LayoutError::LaneOutOfBounds {
                connector: connector.to_string(),
                axis: axis.as_str(),
                lane,
            });
        }
        self.grid.ensure(axis, lane);
        let rut = self.lanes.claim(connector, axis, lane, rut)?;
        let step = extent / f64::from(self.layout.default_rut_positions + 1);
        Ok(start + extent / 2.0 + step * f64::from(rut))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleDb;
    use crate::types::{Size, pos};

    fn diagram() -> Diagram {
        let style = StyleDb::from_yaml_str(
            r#"
layout:
  - name: standard
    default_stem_positions: 3
    default_rut_positions: 3
    default_new_path_row_height: 40
    default_new_path_col_width: 40
"#,
        )
        .unwrap();
        let settings = DiagramSettings {
            diagram_type: "class".into(),
            notation: "xUML".into(),
            origin: pos(0.0, 0.0),
            size: Size::new(Length(300.0), Length(400.0)),
            rows: vec![Length(100.0)],
            cols: vec![Length(200.0)],
        };
        Diagram::new(&settings, Rc::new(style)).unwrap()
    }

    #[test]
    fn ruts_spread_around_lane_centre() {
        let mut d = diagram();
        assert_eq!(d.claim_rut("R1", Axis::Row, 1, None).unwrap(), Length(50.0));
        assert_eq!(d.claim_rut("R2", Axis::Row, 1, None).unwrap(), Length(75.0));
        assert_eq!(d.claim_rut("R3", Axis::Row, 1, None).unwrap(), Length(25.0));
    }

    #[test]
    fn lanes_past_the_grid_use_default_extent() {
        let mut d = diagram();
        assert_eq!(d.claim_rut("R1", Axis::Column, 2, None).unwrap(), Length(220.0));
        assert_eq!(d.grid().cols(), 2);
    }

    #[test]
    fn lanes_outside_the_diagram_are_rejected() {
        let mut d = diagram();
        // columns of 40 past a 200 wide column fit up to column 6 in 400
        assert_eq!(d.claim_rut("R1", Axis::Column, 6, None).unwrap(), Length(380.0));
        for lane in [7, 2_000_000, u32::MAX] {
            let err = d.claim_rut("R2", Axis::Column, lane, None).unwrap_err();
            assert!(matches!(err, LayoutError::LaneOutOfBounds { axis: "column", lane: l, .. } if l == lane));
        }
        assert_eq!(d.grid().cols(), 6);
    }

    #[test]
    fn lane_zero_is_rejected() {
        let mut d = diagram();
        assert!(matches!(d.claim_rut("R1", Axis::Row, 0, None), Err(LayoutError::InvalidLane { .. })));
    }

    #[test]
    fn missing_standard_layout_is_config_error() {
        let settings = DiagramSettings {
            diagram_type: "class".into(),
            notation: "xUML".into(),
            origin: pos(0.0, 0.0),
            size: Size::new(Length(10.0), Length(10.0)),
            rows: vec![],
            cols: vec![],
        };
        let err = Diagram::new(&settings, Rc::new(StyleDb::default())).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn extreme_position_counts_are_rejected() {
        let style = StyleDb {
            layout: vec![ConnectorLayoutSpec {
                name: STANDARD_LAYOUT.into(),
                default_stem_positions: 3,
                default_rut_positions: u32::MAX,
                default_new_path_row_height: Length(40.0),
                default_new_path_col_width: Length(40.0),
            }],
            ..StyleDb::default()
        };
        let settings = DiagramSettings {
            diagram_type: "class".into(),
            notation: "xUML".into(),
            origin: pos(0.0, 0.0),
            size: Size::new(Length(10.0), Length(10.0)),
            rows: vec![],
            cols: vec![],
        };
        let err = Diagram::new(&settings, Rc::new(style)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidNumber { field: "default_rut_positions", .. }));
    }

    #[test]
    fn symbol_group_joins_notation_and_type() {
        assert_eq!(diagram().symbol_group(), "xUML class");
    }
}
