//! Connector and stem geometry for grid-laid-out model diagrams.
//!
//! Given nodes already placed on a grid and a list of relationships, this
//! crate computes exact point geometry for each connector: its stems, the
//! line joining them, stem icons and the names of stems and connectors. The
//! results are handed to a [`DrawingSurface`] in a deterministic order.
//!
//! ```no_run
//! use std::rc::Rc;
//! use stemwork::{LayoutDoc, RecordingSurface, StyleDb, draw};
//!
//! # fn main() -> Result<(), stemwork::LayoutError> {
//! let style = StyleDb::from_path("style.yaml")?;
//! let doc = LayoutDoc::from_yaml_str(&std::fs::read_to_string("layout.yaml")?)?;
//! let mut surface = RecordingSurface::new();
//! draw(&doc, Rc::new(style), &mut surface)?;
//! println!("{}", surface.transcript());
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod connector;
pub mod diagram;
pub mod errors;
pub mod grid;
pub mod lanes;
pub mod layout;
mod log;
pub mod node;
pub mod stem;
pub mod style;
pub mod surface;
pub mod types;

pub use connection::{ConnectorName, HorizAlign, IconOrientation, NodeFace, PathPoint, StemName, Stretch, TextBlock};
pub use connector::{
    AnyConnector, BinaryConnector, BinaryLayout, Branch, Connector, ConnectorState, Routing, TreeConnector,
    TreeLayout, UnaryConnector, UnaryLayout,
};
pub use diagram::Diagram;
pub use errors::{LayoutError, Result};
pub use grid::{Axis, DiagramSettings, Grid};
pub use layout::{
    BranchLayout, ConnectorLayout, LayoutDoc, StemLayout, build_connectors, build_diagram, draw, render_connectors,
};
pub use node::{Node, NodePlacement, NodeSet};
pub use stem::Stem;
pub use style::{
    ConnectorLayoutSpec, ConnectorNameSpec, IconPlacementSpec, NamePlacementSpec, STANDARD_LAYOUT, StemPositionSpec,
    StyleDb, StyleLookup,
};
pub use surface::{DrawCall, DrawingSurface, RecordingSurface, TextMetrics};
pub use types::{Angle, BBox, Length, Point, Position, RectSize, Size, pos};
