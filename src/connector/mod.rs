//! Connectors: stems plus the line that joins them.
//!
//! Routing happens when a connector is constructed, so every lane claim is
//! made in the order connectors are built. Rendering only issues draw calls
//! and may happen once.

mod binary;
mod route;
mod tree;
mod unary;

pub use binary::{BinaryConnector, BinaryLayout, Routing};
pub use tree::{Branch, TreeConnector, TreeLayout};
pub use unary::{UnaryConnector, UnaryLayout};

use enum_dispatch::enum_dispatch;
use glam::DVec2;

use crate::connection::{ConnectorName, HorizAlign, NodeFace, TextBlock};
use crate::diagram::Diagram;
use crate::errors::{LayoutError, Result};
use crate::stem::{Stem, check_side};
use crate::style::{ConnectorNameSpec, key3, require};
use crate::surface::DrawingSurface;
use crate::types::{BBox, Length, Point, Position, RectSize};

/// Lifecycle of a connector; construction leaves it routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorState {
    Routed,
    Rendered,
}

#[enum_dispatch]
pub trait Connector {
    /// Relationship or transition identifier
    fn id(&self) -> &str;

    fn connector_type(&self) -> &str;

    fn state(&self) -> ConnectorState;

    /// Every stem owned by this connector
    fn stems(&self) -> Vec<&Stem>;

    /// Line segments joining the stems, not counting the stems themselves
    fn line_segments(&self) -> Vec<(Position, Position)>;

    /// Issue the draw calls for the line, the stems and the connector name
    fn render(&mut self, diagram: &Diagram, surface: &mut dyn DrawingSurface) -> Result<()>;
}

#[enum_dispatch(Connector)]
#[derive(Debug, Clone)]
pub enum AnyConnector {
    Unary(UnaryConnector),
    Binary(BinaryConnector),
    Tree(TreeConnector),
}

/// Move a connector to the rendered state, refusing a second render
fn begin_render(state: &mut ConnectorState, id: &str) -> Result<()> {
    if *state == ConnectorState::Rendered {
        return Err(LayoutError::AlreadyRendered { connector: id.to_string() });
    }
    *state = ConnectorState::Rendered;
    Ok(())
}

/// Consecutive point pairs of a polyline
fn segments_of(points: &[Position]) -> Vec<(Position, Position)> {
    points.windows(2).map(|w| (w[0], w[1])).collect()
}

/// A measured connector name and the spacing rules for its connector type
#[derive(Debug, Clone, PartialEq)]
struct PlacedName {
    name: ConnectorName,
    block: TextBlock,
    size: RectSize,
    spec: ConnectorNameSpec,
    asset: String,
}

impl PlacedName {
    /// Validate and measure a connector name.
    ///
    /// A connector type whose spec is not optional must be given a name.
    fn measure(
        diagram: &Diagram,
        surface: &dyn DrawingSurface,
        id: &str,
        connector_type: &str,
        name: Option<ConnectorName>,
    ) -> Result<Option<PlacedName>> {
        let spec = diagram
            .style()
            .connector_name(connector_type, &diagram.diagram_type, &diagram.notation);
        let Some(name) = name else {
            if spec.is_some_and(|s| !s.optional) {
                return Err(LayoutError::MissingConnectorName { connector: id.to_string() });
            }
            return Ok(None);
        };
        check_side(name.side)?;
        let spec = require(spec, "connector name", || {
            key3(connector_type, &diagram.diagram_type, &diagram.notation)
        })?
        .clone();
        let asset = format!("{connector_type} name");
        let block = TextBlock::wrap(&name.text, name.wrap);
        let size = surface.measure_text_block(&asset, &block.lines);
        Ok(Some(PlacedName {
            name,
            block,
            size,
            spec,
            asset,
        }))
    }

    fn place(
        &self,
        id: &str,
        diagram: &Diagram,
        surface: &mut dyn DrawingSurface,
        corner: Position,
        align: HorizAlign,
    ) -> Result<()> {
        if !diagram.bounds().contains_box(&BBox::from_corner(corner, self.size)) {
            return Err(LayoutError::NameOutOfBounds {
                owner: id.to_string(),
                text: self.name.text.clone(),
            });
        }
        surface.place_text_block(&self.asset, corner, &self.block.lines, align);
        Ok(())
    }

    /// Place the name beside segment number `bend`, shifted `notch` steps from its midpoint
    fn place_on_segments(
        &self,
        id: &str,
        segments: &[(Position, Position)],
        diagram: &Diagram,
        surface: &mut dyn DrawingSurface,
    ) -> Result<()> {
        let bend = self.name.bend;
        let (from, to) = bend
            .checked_sub(1)
            .and_then(|i| segments.get(i))
            .copied()
            .ok_or_else(|| LayoutError::InvalidBend {
                connector: id.to_string(),
                bend,
                segments: segments.len(),
            })?;

        let layout = diagram.layout();
        let limit = layout.anchor_limit();
        let notch = self.name.notch;
        if notch.unsigned_abs() > limit.unsigned_abs() {
            return Err(LayoutError::NotchOutOfRange {
                connector: id.to_string(),
                notch,
                limit,
            });
        }

        let (a, b) = (from.to_dvec2(), to.to_dvec2());
        let step = a.distance(b) / f64::from(layout.default_stem_positions + 1);
        let anchor: DVec2 = (a + b) * 0.5 + (b - a).normalize_or_zero() * step * f64::from(notch);
        let anchor = Position::from_dvec2(anchor);

        let size = self.size;
        let spec = &self.spec;
        let (corner, align) = if from.y == to.y {
            let y = if self.name.side == 1 {
                anchor.y + spec.vertical_axis_buffer
            } else {
                anchor.y - spec.vertical_axis_buffer - size.height
            };
            (Point::new(anchor.x - size.width / 2.0, y), HorizAlign::Center)
        } else {
            let y = anchor.y - size.height / 2.0;
            if self.name.side == 1 {
                (Point::new(anchor.x + spec.horizontal_axis_buffer, y), HorizAlign::Left)
            } else {
                (
                    Point::new(anchor.x - spec.horizontal_axis_buffer - size.width, y),
                    HorizAlign::Right,
                )
            }
        };
        self.place(id, diagram, surface, corner, align)
    }

    /// Place the name beyond the free end of a one-stem connector
    fn place_past_end(
        &self,
        id: &str,
        vine: Position,
        face: NodeFace,
        diagram: &Diagram,
        surface: &mut dyn DrawingSurface,
    ) -> Result<()> {
        let size = self.size;
        let spec = &self.spec;
        let side = self.name.side;
        let (x, y, align) = if face.is_horizontal() {
            let (x, align) = if face == NodeFace::Left {
                (vine.x - spec.horizontal_end_buffer - size.width, HorizAlign::Right)
            } else {
                (vine.x + spec.horizontal_end_buffer, HorizAlign::Left)
            };
            let y = if side == 1 {
                vine.y + spec.vertical_axis_buffer
            } else {
                vine.y - spec.vertical_axis_buffer - size.height
            };
            (x, y, align)
        } else {
            let (x, align) = if side == 1 {
                (vine.x + spec.horizontal_axis_buffer, HorizAlign::Left)
            } else {
                (vine.x - spec.horizontal_axis_buffer - size.width, HorizAlign::Right)
            };
            let y = if face == NodeFace::Bottom {
                vine.y - spec.vertical_end_buffer - size.height
            } else {
                vine.y + spec.vertical_end_buffer
            };
            (x, y, align)
        };
        self.place(id, diagram, surface, Point::new(x, y), align)
    }
}

/// Along-axis extent of a set of points lying on one horizontal or vertical line
fn extent_along(points: &[Position], horizontal: bool) -> Option<(Length, Length)> {
    let along = |p: &Position| if horizontal { p.x } else { p.y };
    let first = along(points.first()?);
    Some(
        points
            .iter()
            .map(along)
            .fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))),
    )
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::grid::DiagramSettings;
    use crate::style::StyleDb;
    use crate::surface::{DrawCall, RecordingSurface, TextMetrics};
    use crate::types::{Size, pos};

    const STYLE: &str = r#"
layout:
  - name: standard
    default_stem_positions: 3
    default_rut_positions: 3
    default_new_path_row_height: 50
    default_new_path_col_width: 50
connector_names:
  - connector_type: binary association
    diagram_type: class
    notation: xUML
    vertical_axis_buffer: 4
    horizontal_axis_buffer: 6
    vertical_end_buffer: 2
    horizontal_end_buffer: 2
"#;

    fn setup() -> (Diagram, RecordingSurface) {
        let settings = DiagramSettings {
            diagram_type: "class".into(),
            notation: "xUML".into(),
            origin: pos(0.0, 0.0),
            size: Size::new(Length(200.0), Length(200.0)),
            rows: vec![Length(200.0)],
            cols: vec![Length(200.0)],
        };
        let diagram = Diagram::new(&settings, Rc::new(StyleDb::from_yaml_str(STYLE).unwrap())).unwrap();
        let surface = RecordingSurface::with_metrics(TextMetrics::Monospace {
            char_width: Length(5.0),
            line_height: Length(10.0),
        });
        (diagram, surface)
    }

    /// An up-then-right route, each leg 160 long
    fn elbow() -> Vec<(Position, Position)> {
        segments_of(&[pos(20.0, 20.0), pos(20.0, 180.0), pos(180.0, 180.0)])
    }

    fn place(side: i32, bend: usize, notch: i32) -> Result<Vec<DrawCall>> {
        let (diagram, mut surface) = setup();
        let name = ConnectorName {
            text: "R1".into(),
            side,
            bend,
            notch,
            wrap: 1,
        };
        let placed = PlacedName::measure(&diagram, &surface, "R1", "binary association", Some(name))?
            .expect("name was supplied");
        placed.place_on_segments("R1", &elbow(), &diagram, &mut surface)?;
        Ok(surface.calls().to_vec())
    }

    fn text_at(lower_left: Position, align: HorizAlign) -> Vec<DrawCall> {
        vec![DrawCall::Text {
            asset: "binary association name".into(),
            lower_left,
            lines: vec!["R1".into()],
            align,
        }]
    }

    #[test]
    fn notch_steps_along_second_bend() {
        // midpoint (100, 180), step 160 / 4 = 40, text 10 x 10
        assert_eq!(place(1, 2, 1).unwrap(), text_at(pos(135.0, 184.0), HorizAlign::Center));
        assert_eq!(place(-1, 2, 0).unwrap(), text_at(pos(95.0, 166.0), HorizAlign::Center));
    }

    #[test]
    fn vertical_bend_name_sits_beside_segment() {
        // midpoint (20, 100) moved one step back to (20, 60)
        assert_eq!(place(-1, 1, -1).unwrap(), text_at(pos(4.0, 55.0), HorizAlign::Right));
        assert_eq!(place(1, 1, 0).unwrap(), text_at(pos(26.0, 95.0), HorizAlign::Left));
    }

    #[test]
    fn bend_must_name_an_existing_segment() {
        for bend in [0, 3] {
            let err = place(1, bend, 0).unwrap_err();
            assert!(matches!(err, LayoutError::InvalidBend { bend: b, segments: 2, .. } if b == bend));
        }
    }

    #[test]
    fn notch_beyond_stem_positions_is_rejected() {
        for notch in [2, -2, i32::MIN] {
            let err = place(1, 1, notch).unwrap_err();
            assert!(matches!(err, LayoutError::NotchOutOfRange { notch: n, limit: 1, .. } if n == notch));
        }
    }

    #[test]
    fn required_name_must_be_supplied() {
        let (diagram, surface) = setup();
        let mut style = StyleDb::from_yaml_str(STYLE).unwrap();
        style.connector_names[0].optional = false;
        let strict = Diagram::new(
            &DiagramSettings {
                diagram_type: diagram.diagram_type.clone(),
                notation: diagram.notation.clone(),
                origin: pos(0.0, 0.0),
                size: Size::new(Length(200.0), Length(200.0)),
                rows: vec![],
                cols: vec![],
            },
            Rc::new(style),
        )
        .unwrap();
        assert!(PlacedName::measure(&diagram, &surface, "R1", "binary association", None).unwrap().is_none());
        let err = PlacedName::measure(&strict, &surface, "R1", "binary association", None).unwrap_err();
        assert!(matches!(err, LayoutError::MissingConnectorName { .. }));
    }
}
