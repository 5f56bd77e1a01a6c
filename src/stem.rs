//! Stems: the short line from a node face to where a connector picks it up.
//!
//! A stem is built by its connector and drawn only by its connector.

use std::rc::Rc;

use crate::connection::{HorizAlign, IconOrientation, NodeFace, StemName, Stretch, TextBlock};
use crate::diagram::Diagram;
use crate::errors::{LayoutError, Result};
use crate::log::info;
use crate::node::Node;
use crate::style::{key2, key3, require};
use crate::surface::DrawingSurface;
use crate::types::{BBox, Length, Point, Position, RectSize};

/// A measured stem name, ready to place
#[derive(Debug, Clone, PartialEq)]
struct MeasuredName {
    side: i32,
    text: String,
    block: TextBlock,
    size: RectSize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stem {
    pub connector: String,
    pub stem_position: String,
    pub semantic: String,
    pub node: Rc<Node>,
    pub face: NodeFace,
    pub stretch: Stretch,
    pub minimum_length: Length,
    root: Position,
    vine: Position,
    name: Option<MeasuredName>,
}

/// Reject a name side other than +1 or -1
pub(crate) fn check_side(side: i32) -> Result<()> {
    if side == 1 || side == -1 {
        Ok(())
    } else {
        Err(LayoutError::InvalidNameSide { side })
    }
}

impl Stem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        diagram: &Diagram,
        surface: &dyn DrawingSurface,
        connector: &str,
        stem_position: &str,
        semantic: &str,
        node: Rc<Node>,
        face: NodeFace,
        root: Position,
        name: Option<StemName>,
    ) -> Result<Stem> {
        if let Some(name) = &name {
            check_side(name.side)?;
        }
        let spec = require(
            diagram.style().stem_position(stem_position, &diagram.diagram_type),
            "stem position",
            || key2(stem_position, &diagram.diagram_type),
        )?;

        let vine = match spec.stretch {
            Stretch::Fixed | Stretch::Free => root + face.outward() * spec.minimum_length,
            Stretch::Hanging => root,
        };

        let name = name.map(|name| {
            let block = TextBlock::wrap(&name.text, name.wrap);
            let size = surface.measure_text_block(&format!("{stem_position} name"), &block.lines);
            MeasuredName {
                side: name.side,
                text: name.text,
                block,
                size,
            }
        });

        Ok(Stem {
            connector: connector.to_string(),
            stem_position: stem_position.to_string(),
            semantic: semantic.to_string(),
            node,
            face,
            stretch: spec.stretch,
            minimum_length: spec.minimum_length,
            root,
            vine,
            name,
        })
    }

    /// End touching the node face
    pub fn root(&self) -> Position {
        self.root
    }

    /// Far end, where the connector line picks the stem up
    pub fn vine(&self) -> Position {
        self.vine
    }

    pub fn is_hanging(&self) -> bool {
        self.stretch == Stretch::Hanging
    }

    /// Set the far end of a stem whose length is decided by its connector
    pub(crate) fn set_vine(&mut self, vine: Position) {
        self.vine = vine;
    }

    /// Move the root along the face, keeping the stem length
    pub(crate) fn move_root(&mut self, root: Position) {
        let shift = root - self.root;
        self.root = root;
        self.vine = self.vine + shift;
    }

    /// Horizontal when both ends share a y coordinate; a zero-length stem follows its face
    pub fn is_horizontal(&self) -> bool {
        if self.root == self.vine {
            self.face.is_horizontal()
        } else {
            self.root.y == self.vine.y
        }
    }

    pub(crate) fn draw_line(&self, asset: &str, surface: &mut dyn DrawingSurface) {
        if self.root != self.vine {
            surface.draw_line_segment(asset, self.root, self.vine);
        }
    }

    /// Lower-left corner and alignment of the stem name
    fn name_corner(&self, name: &MeasuredName, diagram: &Diagram) -> Result<(Position, HorizAlign)> {
        let spec = require(
            diagram
                .style()
                .name_placement(&self.stem_position, &diagram.diagram_type, &diagram.notation),
            "name placement",
            || key3(&self.stem_position, &diagram.diagram_type, &diagram.notation),
        )?;
        let size = name.size;
        let root = self.root;

        let (x, y, align) = if self.is_horizontal() {
            let (x, align) = if self.face == NodeFace::Left {
                (root.x - spec.horizontal_face_buffer - size.width, HorizAlign::Right)
            } else {
                (root.x + spec.horizontal_face_buffer, HorizAlign::Left)
            };
            let y = if name.side == 1 {
                root.y + spec.vertical_axis_buffer
            } else {
                root.y - spec.vertical_axis_buffer - size.height
            };
            (x, y, align)
        } else {
            let (x, align) = if name.side == 1 {
                (root.x + spec.horizontal_axis_buffer, HorizAlign::Left)
            } else {
                (root.x - spec.horizontal_axis_buffer - size.width, HorizAlign::Right)
            };
            let y = if self.face == NodeFace::Bottom {
                root.y - spec.vertical_face_buffer - size.height
            } else {
                root.y + spec.vertical_face_buffer
            };
            (x, y, align)
        };

        let corner = Point::new(x, y);
        if !diagram.bounds().contains_box(&BBox::from_corner(corner, size)) {
            return Err(LayoutError::NameOutOfBounds {
                owner: format!("{} stem on [{}] of {}", self.stem_position, self.node.name, self.connector),
                text: name.text.clone(),
            });
        }
        Ok((corner, align))
    }

    /// Draw the name and icon decorations
    pub(crate) fn render(&self, diagram: &Diagram, surface: &mut dyn DrawingSurface) -> Result<()> {
        if let Some(name) = &self.name {
            let (corner, align) = self.name_corner(name, diagram)?;
            surface.place_text_block(
                &format!("{} name", self.stem_position),
                corner,
                &name.block.lines,
                align,
            );
        }

        let Some(icon) =
            diagram
                .style()
                .icon_placement(&self.stem_position, &diagram.diagram_type, &diagram.notation)
        else {
            info!(
                stem_position = %self.stem_position,
                connector = %self.connector,
                "no icon placement, drawing stem without icon"
            );
            return Ok(());
        };

        let anchor = match icon.orientation {
            IconOrientation::Root => self.root,
            IconOrientation::Vine => self.vine,
        };
        let angle = if self.is_hanging() {
            self.face.opposite().stem_angle()
        } else {
            self.face.stem_angle()
        };
        surface.place_symbol(&diagram.symbol_group(), &self.semantic, anchor, angle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DiagramSettings;
    use crate::node::NodePlacement;
    use crate::style::StyleDb;
    use crate::surface::{DrawCall, RecordingSurface, TextMetrics};
    use crate::types::{Angle, Size, pos};

    const STYLE: &str = r#"
layout:
  - name: standard
    default_stem_positions: 3
    default_rut_positions: 3
    default_new_path_row_height: 50
    default_new_path_col_width: 50
stem_positions:
  - { name: class mult, diagram_type: class, stretch: fixed, minimum_length: 20 }
  - { name: associative mult, diagram_type: class, stretch: hanging, minimum_length: 10 }
name_placements:
  - stem_position: class mult
    diagram_type: class
    notation: xUML
    vertical_axis_buffer: 3
    horizontal_axis_buffer: 4
    vertical_face_buffer: 5
    horizontal_face_buffer: 6
icon_placements:
  - { stem_position: associative mult, diagram_type: class, notation: xUML, orientation: root }
"#;

    fn setup() -> (Diagram, Rc<Node>, RecordingSurface) {
        let style = StyleDb::from_yaml_str(STYLE).unwrap();
        let settings = DiagramSettings {
            diagram_type: "class".into(),
            notation: "xUML".into(),
            origin: pos(0.0, 0.0),
            size: Size::new(Length(200.0), Length(200.0)),
            rows: vec![Length(200.0)],
            cols: vec![Length(200.0)],
        };
        let mut diagram = Diagram::new(&settings, Rc::new(style)).unwrap();
        let node = diagram
            .place_node(&NodePlacement {
                name: "Aircraft".into(),
                row: 1,
                col: 1,
                row_span: 1,
                col_span: 1,
                size: Size::new(Length(40.0), Length(60.0)),
            })
            .unwrap();
        let surface = RecordingSurface::with_metrics(TextMetrics::Monospace {
            char_width: Length(5.0),
            line_height: Length(10.0),
        });
        (diagram, node, surface)
    }

    fn stem(
        diagram: &Diagram,
        node: &Rc<Node>,
        surface: &RecordingSurface,
        position: &str,
        face: NodeFace,
        name: Option<StemName>,
    ) -> Result<Stem> {
        let root = diagram.face_point(node, face, 0).unwrap();
        Stem::new(diagram, surface, "R1", position, "Mc mult", Rc::clone(node), face, root, name)
    }

    fn name(side: i32) -> Option<StemName> {
        Some(StemName {
            text: "1..*".into(),
            side,
            wrap: 1,
        })
    }

    #[test]
    fn fixed_vine_extends_along_face_axis() {
        let (diagram, node, surface) = setup();
        let s = stem(&diagram, &node, &surface, "class mult", NodeFace::Right, None).unwrap();
        assert_eq!(s.root(), pos(130.0, 100.0));
        assert_eq!(s.vine(), pos(150.0, 100.0));
        assert!(s.is_horizontal());
        let s = stem(&diagram, &node, &surface, "class mult", NodeFace::Bottom, None).unwrap();
        assert_eq!(s.vine(), pos(100.0, 60.0));
        assert!(!s.is_horizontal());
    }

    #[test]
    fn hanging_vine_waits_for_connector() {
        let (diagram, node, surface) = setup();
        let s = stem(&diagram, &node, &surface, "associative mult", NodeFace::Top, None).unwrap();
        assert_eq!(s.vine(), s.root());
        assert!(s.is_hanging());
    }

    #[test]
    fn bad_side_is_rejected_before_lookup() {
        let (diagram, node, surface) = setup();
        let err = stem(&diagram, &node, &surface, "no such position", NodeFace::Top, name(0)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidNameSide { side: 0 }));
    }

    #[test]
    fn unknown_stem_position_is_config_error() {
        let (diagram, node, surface) = setup();
        let err = stem(&diagram, &node, &surface, "no such position", NodeFace::Top, None).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn vertical_stem_name_sits_beside_axis() {
        let (diagram, node, mut surface) = setup();
        let s = stem(&diagram, &node, &surface, "class mult", NodeFace::Top, name(-1)).unwrap();
        s.render(&diagram, &mut surface).unwrap();
        // root (100, 120), text 20 x 10
        assert_eq!(
            surface.calls(),
            &[DrawCall::Text {
                asset: "class mult name".into(),
                lower_left: pos(76.0, 125.0),
                lines: vec!["1..*".into()],
                align: HorizAlign::Right,
            }]
        );
    }

    #[test]
    fn bottom_face_name_hangs_below_root() {
        let (diagram, node, mut surface) = setup();
        let s = stem(&diagram, &node, &surface, "class mult", NodeFace::Bottom, name(1)).unwrap();
        s.render(&diagram, &mut surface).unwrap();
        // root (100, 80), text 20 x 10, vertical face buffer 5
        assert_eq!(
            surface.calls(),
            &[DrawCall::Text {
                asset: "class mult name".into(),
                lower_left: pos(104.0, 65.0),
                lines: vec!["1..*".into()],
                align: HorizAlign::Left,
            }]
        );
    }

    #[test]
    fn named_stem_without_name_placement_is_config_error() {
        let (diagram, node, mut surface) = setup();
        let s = stem(&diagram, &node, &surface, "associative mult", NodeFace::Top, name(1)).unwrap();
        let err = s.render(&diagram, &mut surface).unwrap_err();
        assert!(err.is_config());
        assert!(matches!(
            err,
            LayoutError::MissingStyle { table: "name placement", ref key } if key == "associative mult/class/xUML"
        ));
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn hanging_icon_uses_opposite_face_angle() {
        let (diagram, node, mut surface) = setup();
        let s = stem(&diagram, &node, &surface, "associative mult", NodeFace::Top, None).unwrap();
        s.render(&diagram, &mut surface).unwrap();
        assert_eq!(
            surface.calls(),
            &[DrawCall::Symbol {
                group: "xUML class".into(),
                name: "Mc mult".into(),
                pin: pos(100.0, 120.0),
                angle: Angle(270.0),
            }]
        );
    }
}
