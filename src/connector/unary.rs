//! Unary connectors: a single stem with nothing at the far end, such as an
//! initial or deletion transition.

use crate::connection::ConnectorName;
use crate::diagram::Diagram;
use crate::errors::{LayoutError, Result};
use crate::stem::Stem;
use crate::surface::DrawingSurface;
use crate::types::Position;

use super::{Connector, ConnectorState, PlacedName, begin_render};

#[derive(Debug, Clone)]
pub struct UnaryLayout {
    pub id: String,
    pub connector_type: String,
    pub stem: Stem,
    pub name: Option<ConnectorName>,
}

impl UnaryLayout {
    pub fn new(id: impl Into<String>, connector_type: impl Into<String>, stem: Stem) -> Self {
        Self {
            id: id.into(),
            connector_type: connector_type.into(),
            stem,
            name: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnaryConnector {
    id: String,
    connector_type: String,
    stem: Stem,
    name: Option<PlacedName>,
    state: ConnectorState,
}

impl UnaryConnector {
    pub fn new(diagram: &Diagram, surface: &dyn DrawingSurface, layout: UnaryLayout) -> Result<Self> {
        let UnaryLayout {
            id,
            connector_type,
            stem,
            name,
        } = layout;
        // nothing else can set the far end of a lone stem
        if stem.is_hanging() {
            return Err(LayoutError::UnreachableStem {
                connector: id,
                node: stem.node.name.clone(),
            });
        }
        let name = PlacedName::measure(diagram, surface, &id, &connector_type, name)?;
        Ok(UnaryConnector {
            id,
            connector_type,
            stem,
            name,
            state: ConnectorState::Routed,
        })
    }

    pub fn stem(&self) -> &Stem {
        &self.stem
    }
}

impl Connector for UnaryConnector {
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
        vec![&self.stem]
    }

    fn line_segments(&self) -> Vec<(Position, Position)> {
        Vec::new()
    }

    fn render(&mut self, diagram: &Diagram, surface: &mut dyn DrawingSurface) -> Result<()> {
        begin_render(&mut self.state, &self.id)?;
        self.stem.draw_line(&self.connector_type, surface);
        self.stem.render(diagram, surface)?;
        if let Some(name) = &self.name {
            name.place_past_end(&self.id, self.stem.vine(), self.stem.face, diagram, surface)?;
        }
        Ok(())
    }
}
