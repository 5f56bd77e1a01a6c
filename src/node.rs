//! Nodes placed on the grid and the anchor points on their faces

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::connection::NodeFace;
use crate::errors::{LayoutError, Result};
use crate::grid::Grid;
use crate::log::warn;
use crate::style::ConnectorLayoutSpec;
use crate::types::{BBox, Length, Point, Position, RectSize};

/// Where a node sits on the grid, as written in a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePlacement {
    pub name: String,
    pub row: u32,
    pub col: u32,
    #[serde(default = "one")]
    pub row_span: u32,
    #[serde(default = "one")]
    pub col_span: u32,
    pub size: RectSize,
}

fn one() -> u32 {
    1
}

/// A node rectangle on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub bbox: BBox<Length>,
}

impl Node {
    /// Centre a node of the requested size in its cell span
    pub fn place(placement: &NodePlacement, grid: &Grid) -> Result<Node> {
        let cell = grid
            .cell_box(placement.row, placement.col, placement.row_span, placement.col_span)
            .ok_or_else(|| LayoutError::InvalidSpan {
                node: placement.name.clone(),
            })?;
        let center = cell.center();
        let half_w = placement.size.width / 2.0;
        let half_h = placement.size.height / 2.0;
        let bbox = BBox {
            min: Point::new(center.x - half_w, center.y - half_h),
            max: Point::new(center.x + half_w, center.y + half_h),
        };
        if !cell.contains_box(&bbox) {
            warn!(node = %placement.name, "node is larger than its grid cells");
        }
        Ok(Node {
            name: placement.name.clone(),
            bbox,
        })
    }

    /// Point on `face` at signed stem position `anchor`, 0 being the face centre.
    ///
    /// The face is cut into `default_stem_positions + 1` equal intervals.
    pub fn face_point(&self, face: NodeFace, anchor: i32, layout: &ConnectorLayoutSpec) -> Result<Position> {
        let limit = layout.anchor_limit();
        if anchor.unsigned_abs() > limit.unsigned_abs() {
            return Err(LayoutError::AnchorOutOfRange {
                node: self.name.clone(),
                face,
                anchor,
                limit,
            });
        }
        let intervals = f64::from(layout.default_stem_positions + 1);
        let center = self.bbox.center();
        let point = match face {
            NodeFace::Top | NodeFace::Bottom => {
                let step = self.bbox.width() / intervals;
                let y = if face == NodeFace::Top { self.bbox.max.y } else { self.bbox.min.y };
                Point::new(center.x + step * f64::from(anchor), y)
            }
            NodeFace::Left | NodeFace::Right => {
                let step = self.bbox.height() / intervals;
                let x = if face == NodeFace::Right { self.bbox.max.x } else { self.bbox.min.x };
                Point::new(x, center.y + step * f64::from(anchor))
            }
        };
        Ok(point)
    }

    /// True when `point` lies on `face`, corners included
    pub fn face_contains(&self, face: NodeFace, point: Position) -> bool {
        match face {
            NodeFace::Top | NodeFace::Bottom => point.x >= self.bbox.min.x && point.x <= self.bbox.max.x,
            NodeFace::Left | NodeFace::Right => point.y >= self.bbox.min.y && point.y <= self.bbox.max.y,
        }
    }
}

/// Nodes of one diagram, looked up by name
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    nodes: BTreeMap<String, Rc<Node>>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> Result<Rc<Node>> {
        if self.nodes.contains_key(&node.name) {
            return Err(LayoutError::DuplicateNode { node: node.name });
        }
        let node = Rc::new(node);
        self.nodes.insert(node.name.clone(), Rc::clone(&node));
        Ok(node)
    }

    /// Look up a node on behalf of `relationship`
    pub fn get(&self, name: &str, relationship: &str) -> Result<Rc<Node>> {
        self.nodes.get(name).cloned().ok_or_else(|| LayoutError::UnknownNode {
            node: name.to_string(),
            relationship: relationship.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Size, pos};

    fn layout() -> ConnectorLayoutSpec {
        ConnectorLayoutSpec {
            name: "standard".into(),
            default_stem_positions: 3,
            default_rut_positions: 3,
            default_new_path_row_height: Length(50.0),
            default_new_path_col_width: Length(50.0),
        }
    }

    fn aircraft() -> Node {
        let grid = Grid::new(
            pos(0.0, 0.0),
            vec![Length(100.0)],
            vec![Length(200.0)],
            Length(50.0),
            Length(50.0),
        )
        .unwrap();
        let placement = NodePlacement {
            name: "Aircraft".into(),
            row: 1,
            col: 1,
            row_span: 1,
            col_span: 1,
            size: Size::new(Length(40.0), Length(80.0)),
        };
        Node::place(&placement, &grid).unwrap()
    }

    #[test]
    fn node_is_centred_in_its_cell() {
        let node = aircraft();
        assert_eq!(node.bbox.min, pos(60.0, 30.0));
        assert_eq!(node.bbox.max, pos(140.0, 70.0));
    }

    #[test]
    fn face_points_step_along_the_face() {
        let node = aircraft();
        let spec = layout();
        assert_eq!(node.face_point(NodeFace::Right, 0, &spec).unwrap(), pos(140.0, 50.0));
        assert_eq!(node.face_point(NodeFace::Left, -1, &spec).unwrap(), pos(60.0, 40.0));
        assert_eq!(node.face_point(NodeFace::Top, 1, &spec).unwrap(), pos(120.0, 70.0));
        assert_eq!(node.face_point(NodeFace::Bottom, 0, &spec).unwrap(), pos(100.0, 30.0));
    }

    #[test]
    fn anchor_beyond_the_face_is_rejected() {
        let err = aircraft().face_point(NodeFace::Top, 2, &layout()).unwrap_err();
        assert!(matches!(err, LayoutError::AnchorOutOfRange { anchor: 2, limit: 1, .. }));
        let err = aircraft().face_point(NodeFace::Left, i32::MIN, &layout()).unwrap_err();
        assert!(matches!(err, LayoutError::AnchorOutOfRange { anchor: i32::MIN, .. }));
    }

    #[test]
    fn lookup_names_the_relationship() {
        let mut set = NodeSet::new();
        set.insert(aircraft()).unwrap();
        assert!(set.get("Aircraft", "R1").is_ok());
        let err = set.get("Pilot", "R1").unwrap_err();
        assert!(matches!(err, LayoutError::UnknownNode { ref node, ref relationship } if node == "Pilot" && relationship == "R1"));
        assert!(matches!(set.insert(aircraft()), Err(LayoutError::DuplicateNode { .. })));
    }
}
