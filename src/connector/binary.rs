//! Binary connectors: two stems joined by a straight or bent line, with an
//! optional tertiary stem hanging from the line.

use crate::connection::{ConnectorName, PathPoint};
use crate::diagram::Diagram;
use crate::errors::{LayoutError, Result};
use crate::log::{debug, info};
use crate::stem::Stem;
use crate::surface::DrawingSurface;
use crate::types::{Point, Position};

use super::route::{bend_route, perpendicular_foot};
use super::{Connector, ConnectorState, PlacedName, begin_render, segments_of};

/// How the two stems are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// One segment between the two vines
    Straight,
    /// Orthogonal polyline through lanes
    Bent,
}

/// Everything needed to build a binary connector
#[derive(Debug, Clone)]
pub struct BinaryLayout {
    pub id: String,
    pub connector_type: String,
    pub t_stem: Stem,
    pub p_stem: Stem,
    pub tertiary: Option<Stem>,
    pub path: Vec<PathPoint>,
    pub name: Option<ConnectorName>,
    /// Node the model declares on the t side, used to undo a reversed layout
    pub model_t_node: Option<String>,
}

impl BinaryLayout {
    pub fn new(id: impl Into<String>, connector_type: impl Into<String>, t_stem: Stem, p_stem: Stem) -> Self {
        Self {
            id: id.into(),
            connector_type: connector_type.into(),
            t_stem,
            p_stem,
            tertiary: None,
            path: Vec::new(),
            name: None,
            model_t_node: None,
        }
    }

    pub fn with_tertiary(mut self, stem: Stem) -> Self {
        self.tertiary = Some(stem);
        self
    }

    pub fn with_path(mut self, path: Vec<PathPoint>) -> Self {
        self.path = path;
        self
    }

    /// Swap the sides when the layout lists them opposite to the model
    fn normalize(&mut self) {
        let Some(model_t) = self.model_t_node.as_deref() else {
            return;
        };
        if self.t_stem.node.name != model_t && self.p_stem.node.name == model_t {
            info!(
                connector = %self.id,
                t = %self.p_stem.node.name,
                p = %self.t_stem.node.name,
                "stems listed in reverse model order, swapping"
            );
            std::mem::swap(&mut self.t_stem, &mut self.p_stem);
            self.path.reverse();
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinaryConnector {
    id: String,
    connector_type: String,
    t_stem: Stem,
    p_stem: Stem,
    tertiary: Option<Stem>,
    routing: Routing,
    points: Vec<Position>,
    name: Option<PlacedName>,
    state: ConnectorState,
}

impl BinaryConnector {
    /// Decide the routing mode and compute the line, claiming ruts as needed
    pub fn new(diagram: &mut Diagram, surface: &dyn DrawingSurface, mut layout: BinaryLayout) -> Result<Self> {
        layout.normalize();
        let BinaryLayout {
            id,
            connector_type,
            mut t_stem,
            mut p_stem,
            mut tertiary,
            path,
            name,
            ..
        } = layout;

        let name = PlacedName::measure(diagram, surface, &id, &connector_type, name)?;

        let routing = if path.is_empty() && t_stem.face.opposite() == p_stem.face {
            Routing::Straight
        } else {
            Routing::Bent
        };
        debug!(connector = %id, ?routing, "routing chosen");

        let points = match routing {
            Routing::Straight => {
                // the p stem slides along its face to meet the t stem's axis
                let root = p_stem.root();
                let aligned = if t_stem.face.is_horizontal() {
                    Point::new(root.x, t_stem.root().y)
                } else {
                    Point::new(t_stem.root().x, root.y)
                };
                if !p_stem.node.face_contains(p_stem.face, aligned) {
                    return Err(LayoutError::NoStraightPath {
                        connector: id,
                        from: t_stem.node.name.clone(),
                        to: p_stem.node.name.clone(),
                    });
                }
                p_stem.move_root(aligned);
                vec![t_stem.vine(), p_stem.vine()]
            }
            Routing::Bent => bend_route(
                diagram,
                &id,
                t_stem.vine(),
                t_stem.face.is_horizontal(),
                &path,
                p_stem.vine(),
                p_stem.face.is_horizontal(),
            )?,
        };

        if let Some(stem) = tertiary.as_mut() {
            let foot = perpendicular_foot(&points, stem.root(), stem.face.outward()).ok_or_else(|| {
                LayoutError::UnreachableStem {
                    connector: id.clone(),
                    node: stem.node.name.clone(),
                }
            })?;
            stem.set_vine(foot);
        }

        Ok(BinaryConnector {
            id,
            connector_type,
            t_stem,
            p_stem,
            tertiary,
            routing,
            points,
            name,
            state: ConnectorState::Routed,
        })
    }

    pub fn routing(&self) -> Routing {
        self.routing
    }

    /// Vertices of the joining line, t vine first
    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn t_stem(&self) -> &Stem {
        &self.t_stem
    }

    pub fn p_stem(&self) -> &Stem {
        &self.p_stem
    }

    pub fn tertiary(&self) -> Option<&Stem> {
        self.tertiary.as_ref()
    }
}

impl Connector for BinaryConnector {
    fn id(&self) -> &str {
        &self.id
    }

    fn connector_type(&self) -> &str {
        &self.connector_type
    }

    fn state(&self) -> ConnectorState {
        self.state
    }

    fn stems(&self) -> Vec<&Stem> {
        let mut stems = vec![&self.t_stem, &self.p_stem];
        stems.extend(self.tertiary.as_ref());
        stems
    }

    fn line_segments(&self) -> Vec<(Position, Position)> {
        segments_of(&self.points)
    }

    fn render(&mut self, diagram: &Diagram, surface: &mut dyn DrawingSurface) -> Result<()> {
        begin_render(&mut self.state, &self.id)?;
        let asset = self.connector_type.as_str();

        self.t_stem.draw_line(asset, surface);
        self.p_stem.draw_line(asset, surface);
        match (self.routing, self.points.as_slice()) {
            (Routing::Straight, &[from, to]) => surface.draw_line_segment(asset, from, to),
            _ => surface.draw_polyline(asset, &self.points),
        }
        if let Some(stem) = &self.tertiary {
            stem.draw_line(asset, surface);
        }

        for stem in self.stems() {
            stem.render(diagram, surface)?;
        }

        if let Some(name) = &self.name {
            name.place_on_segments(&self.id, &self.line_segments(), diagram, surface)?;
        }
        Ok(())
    }
}
