//! Tree connectors, as used for generalizations: a trunk stem and one or
//! more branches of leaf stems.
//!
//! Every branch is one axis line perpendicular to the trunk. Branch 0 meets
//! the trunk; each later branch is joined to the one before it by an offshoot
//! running along the axis of its graft leaf.

use crate::connection::{ConnectorName, PathPoint};
use crate::diagram::Diagram;
use crate::errors::{LayoutError, Result};
use crate::grid::Axis;
use crate::stem::Stem;
use crate::surface::DrawingSurface;
use crate::types::{Length, Point, Position};

use super::{Connector, ConnectorState, PlacedName, begin_render, extent_along};

/// One branch as requested by a layout
#[derive(Debug, Clone)]
pub struct Branch {
    /// Lane of the branch axis; optional on the first branch only
    pub path: Option<PathPoint>,
    pub leaves: Vec<Stem>,
    /// Leaf whose axis carries the offshoot back to the previous branch
    pub graft: usize,
}

#[derive(Debug, Clone)]
pub struct TreeLayout {
    pub id: String,
    pub connector_type: String,
    pub trunk: Stem,
    pub branches: Vec<Branch>,
    pub name: Option<ConnectorName>,
}

impl TreeLayout {
    pub fn new(id: impl Into<String>, connector_type: impl Into<String>, trunk: Stem, branches: Vec<Branch>) -> Self {
        Self {
            id: id.into(),
            connector_type: connector_type.into(),
            trunk,
            branches,
            name: None,
        }
    }
}

#[derive(Debug, Clone)]
struct RoutedBranch {
    leaves: Vec<Stem>,
    /// Segments joining leaf vines to the axis
    extensions: Vec<(Position, Position)>,
    axis: (Position, Position),
    offshoot: Option<(Position, Position)>,
}

#[derive(Debug, Clone)]
pub struct TreeConnector {
    id: String,
    connector_type: String,
    trunk: Stem,
    trunk_extension: Option<(Position, Position)>,
    branches: Vec<RoutedBranch>,
    name: Option<PlacedName>,
    state: ConnectorState,
}

/// Point on the line `coordinate` (a y for horizontal axes, an x otherwise) at `along`
fn on_axis(horizontal: bool, coordinate: Length, along: Length) -> Position {
    if horizontal {
        Point::new(along, coordinate)
    } else {
        Point::new(coordinate, along)
    }
}

/// Point where `stem` meets the axis line at `coordinate`.
///
/// A hanging stem is stretched to that point. Any other stem keeps its own
/// length and is joined to the axis by an extension from its vine.
fn reach_axis(
    id: &str,
    stem: &mut Stem,
    horizontal: bool,
    coordinate: Length,
) -> Result<(Position, Option<(Position, Position)>)> {
    let root = stem.root();
    let (along, gap) = if horizontal {
        (root.x, (coordinate - root.y).raw() * stem.face.outward().dy())
    } else {
        (root.y, (coordinate - root.x).raw() * stem.face.outward().dx())
    };
    let meet = on_axis(horizontal, coordinate, along);
    let unreachable = || LayoutError::UnreachableStem {
        connector: id.to_string(),
        node: stem.node.name.clone(),
    };

    if stem.is_hanging() {
        if gap < 0.0 {
            return Err(unreachable());
        }
        stem.set_vine(meet);
        return Ok((meet, None));
    }
    if meet == stem.vine() {
        return Ok((meet, None));
    }
    if gap < stem.minimum_length.raw() {
        return Err(unreachable());
    }
    Ok((meet, Some((stem.vine(), meet))))
}

impl TreeConnector {
    pub fn new(diagram: &mut Diagram, surface: &dyn DrawingSurface, layout: TreeLayout) -> Result<Self> {
        let TreeLayout {
            id,
            connector_type,
            mut trunk,
            branches,
            name,
        } = layout;
        let invalid = |reason: String| LayoutError::InvalidTree {
            connector: id.clone(),
            reason,
        };

        if branches.is_empty() {
            return Err(invalid("a tree needs at least one branch".into()));
        }
        // branch axes run across the trunk
        let horizontal = !trunk.face.is_horizontal();
        let lane_axis = if horizontal { Axis::Row } else { Axis::Column };

        for (k, branch) in branches.iter().enumerate() {
            if branch.leaves.is_empty() {
                return Err(invalid(format!("branch {} has no leaves", k + 1)));
            }
            if k > 0 && branch.graft >= branch.leaves.len() {
                return Err(invalid(format!("branch {} has no leaf {} to graft", k + 1, branch.graft)));
            }
            if let Some(leaf) = branch.leaves.iter().find(|l| l.face.is_horizontal() == horizontal) {
                return Err(invalid(format!(
                    "leaf stem on [{}] is not parallel to the trunk",
                    leaf.node.name
                )));
            }
        }

        let name = PlacedName::measure(diagram, surface, &id, &connector_type, name)?;

        let mut coordinates = Vec::with_capacity(branches.len());
        for (k, branch) in branches.iter().enumerate() {
            let coordinate = match (&branch.path, k) {
                (Some(p), _) => diagram.claim_rut(&id, lane_axis, p.lane, p.rut)?,
                (None, 0) if !trunk.is_hanging() => {
                    let vine = trunk.vine();
                    if horizontal { vine.y } else { vine.x }
                }
                (None, 0) => return Err(invalid("a hanging trunk needs a path for its first branch".into())),
                (None, _) => return Err(invalid(format!("branch {} needs a path", k + 1))),
            };
            coordinates.push(coordinate);
        }

        let (trunk_meet, trunk_extension) = reach_axis(&id, &mut trunk, horizontal, coordinates[0])?;

        let mut routed: Vec<RoutedBranch> = Vec::with_capacity(branches.len());
        // points each axis must cover
        let mut covers: Vec<Vec<Position>> = vec![Vec::new(); branches.len()];
        covers[0].push(trunk_meet);

        for (k, branch) in branches.into_iter().enumerate() {
            let coordinate = coordinates[k];
            let mut leaves = branch.leaves;
            let mut meets = Vec::with_capacity(leaves.len());
            let mut extensions = Vec::new();
            for leaf in leaves.iter_mut() {
                let (meet, extension) = reach_axis(&id, leaf, horizontal, coordinate)?;
                meets.push(meet);
                extensions.extend(extension);
                covers[k].push(meet);
            }
            let offshoot = if k > 0 {
                let graft = meets[branch.graft];
                let along = if horizontal { graft.x } else { graft.y };
                let joint = on_axis(horizontal, coordinates[k - 1], along);
                covers[k - 1].push(joint);
                Some((graft, joint))
            } else {
                None
            };
            routed.push(RoutedBranch {
                leaves,
                extensions,
                axis: (Position::default(), Position::default()),
                offshoot,
            });
        }

        for (k, branch) in routed.iter_mut().enumerate() {
            let (lo, hi) = extent_along(&covers[k], horizontal)
                .ok_or_else(|| invalid(format!("branch {} is empty", k + 1)))?;
            branch.axis = (
                on_axis(horizontal, coordinates[k], lo),
                on_axis(horizontal, coordinates[k], hi),
            );
        }

        Ok(TreeConnector {
            id,
            connector_type,
            trunk,
            trunk_extension,
            branches: routed,
            name,
            state: ConnectorState::Routed,
        })
    }

    pub fn trunk(&self) -> &Stem {
        &self.trunk
    }

    /// Axis line of each branch, in branch order
    pub fn branch_axes(&self) -> Vec<(Position, Position)> {
        self.branches.iter().map(|b| b.axis).collect()
    }
}

impl Connector for TreeConnector {
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
        std::iter::once(&self.trunk)
            .chain(self.branches.iter().flat_map(|b| b.leaves.iter()))
            .collect()
    }

    fn line_segments(&self) -> Vec<(Position, Position)> {
        let branches = self.branches.iter().flat_map(|b| {
            std::iter::once(b.axis)
                .chain(b.offshoot)
                .chain(b.extensions.iter().copied())
        });
        self.trunk_extension
            .into_iter()
            .chain(branches)
            .filter(|(a, b)| a != b)
            .collect()
    }

    fn render(&mut self, diagram: &Diagram, surface: &mut dyn DrawingSurface) -> Result<()> {
        begin_render(&mut self.state, &self.id)?;
        let asset = self.connector_type.as_str();

        for (from, to) in self.line_segments() {
            surface.draw_line_segment(asset, from, to);
        }
        for stem in self.stems() {
            stem.draw_line(asset, surface);
        }
        for stem in self.stems() {
            stem.render(diagram, surface)?;
        }

        if let Some(name) = &self.name {
            name.place_on_segments(&self.id, &self.branch_axes(), diagram, surface)?;
        }
        Ok(())
    }
}
