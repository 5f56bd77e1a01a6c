//! Layout records and the driver that turns them into drawn connectors.
//!
//! Connectors are built and rendered in document order so that lane claims,
//! and therefore the whole draw transcript, repeat exactly for the same input.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::connection::{ConnectorName, NodeFace, PathPoint, StemName};
use crate::connector::{
    AnyConnector, BinaryConnector, BinaryLayout, Branch, Connector, TreeConnector, TreeLayout, UnaryConnector,
    UnaryLayout,
};
use crate::diagram::Diagram;
use crate::errors::{LayoutError, Result};
use crate::grid::DiagramSettings;
use crate::log::debug;
use crate::node::NodePlacement;
use crate::stem::Stem;
use crate::style::StyleLookup;
use crate::surface::DrawingSurface;

/// A stem as written in a layout: node by name, face and anchor index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemLayout {
    pub node: String,
    pub face: NodeFace,
    #[serde(default)]
    pub anchor: i32,
    pub stem_position: String,
    pub semantic: String,
    #[serde(default)]
    pub name: Option<StemName>,
}

impl StemLayout {
    pub fn resolve(&self, diagram: &Diagram, surface: &dyn DrawingSurface, connector: &str) -> Result<Stem> {
        let node = diagram.node(&self.node, connector)?;
        let root = diagram.face_point(&node, self.face, self.anchor)?;
        Stem::new(
            diagram,
            surface,
            connector,
            &self.stem_position,
            &self.semantic,
            node,
            self.face,
            root,
            self.name.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchLayout {
    #[serde(default)]
    pub path: Option<PathPoint>,
    pub leaves: Vec<StemLayout>,
    #[serde(default)]
    pub graft: usize,
}

/// One relationship or transition to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConnectorLayout {
    Unary {
        id: String,
        connector_type: String,
        stem: StemLayout,
        #[serde(default)]
        name: Option<ConnectorName>,
    },
    Binary {
        id: String,
        connector_type: String,
        t: StemLayout,
        p: StemLayout,
        #[serde(default)]
        tertiary: Option<StemLayout>,
        #[serde(default)]
        path: Vec<PathPoint>,
        #[serde(default)]
        name: Option<ConnectorName>,
        /// Node the model puts on the t side
        #[serde(default)]
        model_t: Option<String>,
    },
    Tree {
        id: String,
        connector_type: String,
        trunk: StemLayout,
        branches: Vec<BranchLayout>,
        #[serde(default)]
        name: Option<ConnectorName>,
    },
}

impl ConnectorLayout {
    pub fn id(&self) -> &str {
        match self {
            ConnectorLayout::Unary { id, .. } => id,
            ConnectorLayout::Binary { id, .. } => id,
            ConnectorLayout::Tree { id, .. } => id,
        }
    }

    /// Resolve nodes and route the connector
    pub fn build(&self, diagram: &mut Diagram, surface: &dyn DrawingSurface) -> Result<AnyConnector> {
        let connector: AnyConnector = match self {
            ConnectorLayout::Unary {
                id,
                connector_type,
                stem,
                name,
            } => {
                let mut layout = UnaryLayout::new(id, connector_type, stem.resolve(diagram, surface, id)?);
                layout.name = name.clone();
                UnaryConnector::new(diagram, surface, layout)?.into()
            }
            ConnectorLayout::Binary {
                id,
                connector_type,
                t,
                p,
                tertiary,
                path,
                name,
                model_t,
            } => {
                let mut layout = BinaryLayout::new(
                    id,
                    connector_type,
                    t.resolve(diagram, surface, id)?,
                    p.resolve(diagram, surface, id)?,
                )
                .with_path(path.clone());
                if let Some(stem) = tertiary {
                    layout = layout.with_tertiary(stem.resolve(diagram, surface, id)?);
                }
                layout.name = name.clone();
                layout.model_t_node = model_t.clone();
                BinaryConnector::new(diagram, surface, layout)?.into()
            }
            ConnectorLayout::Tree {
                id,
                connector_type,
                trunk,
                branches,
                name,
            } => {
                let trunk = trunk.resolve(diagram, surface, id)?;
                let branches = branches
                    .iter()
                    .map(|b| {
                        let leaves = b
                            .leaves
                            .iter()
                            .map(|leaf| leaf.resolve(diagram, surface, id))
                            .collect::<Result<Vec<_>>>()?;
                        Ok(Branch {
                            path: b.path,
                            leaves,
                            graft: b.graft,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let mut layout = TreeLayout::new(id, connector_type, trunk, branches);
                layout.name = name.clone();
                TreeConnector::new(diagram, surface, layout)?.into()
            }
        };
        Ok(connector)
    }
}

/// A complete layout document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDoc {
    pub diagram: DiagramSettings,
    #[serde(default)]
    pub nodes: Vec<NodePlacement>,
    #[serde(default)]
    pub connectors: Vec<ConnectorLayout>,
}

impl LayoutDoc {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|source| LayoutError::LayoutYaml { source })
    }
}

/// Create the diagram and place every node
pub fn build_diagram(doc: &LayoutDoc, style: Rc<dyn StyleLookup>) -> Result<Diagram> {
    let mut diagram = Diagram::new(&doc.diagram, style)?;
    for placement in &doc.nodes {
        diagram.place_node(placement)?;
    }
    Ok(diagram)
}

/// Build connectors in document order, stopping at the first error
pub fn build_connectors(
    diagram: &mut Diagram,
    surface: &dyn DrawingSurface,
    layouts: &[ConnectorLayout],
) -> Result<Vec<AnyConnector>> {
    layouts
        .iter()
        .map(|layout| {
            debug!(connector = layout.id(), "building connector");
            layout.build(diagram, surface)
        })
        .collect()
}

pub fn render_connectors(
    diagram: &Diagram,
    surface: &mut dyn DrawingSurface,
    connectors: &mut [AnyConnector],
) -> Result<()> {
    for connector in connectors.iter_mut() {
        connector.render(diagram, surface)?;
    }
    Ok(())
}

/// Build and draw a whole layout document onto `surface`
pub fn draw(doc: &LayoutDoc, style: Rc<dyn StyleLookup>, surface: &mut dyn DrawingSurface) -> Result<Vec<AnyConnector>> {
    let mut diagram = build_diagram(doc, style)?;
    let mut connectors = build_connectors(&mut diagram, surface, &doc.connectors)?;
    render_connectors(&diagram, surface, &mut connectors)?;
    Ok(connectors)
}
