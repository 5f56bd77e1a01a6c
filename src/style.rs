//! Style lookup: read-only per-type layout constants
//!
//! The engine never reaches for a global database. Every diagram is handed a
//! [`StyleLookup`] implementation; [`StyleDb`] is the in-crate one, loaded
//! from YAML. Each query returns zero or one record.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::connection::{IconOrientation, Stretch};
use crate::errors::{LayoutError, Result};
use crate::types::{Length, NumericError};

/// Name of the connector layout record every diagram uses
pub const STANDARD_LAYOUT: &str = "standard";

/// Diagram-wide connector spacing defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorLayoutSpec {
    pub name: String,
    /// Anchor positions along a node face (and notch steps along a segment)
    pub default_stem_positions: u32,
    /// Ruts available in one lane
    pub default_rut_positions: u32,
    pub default_new_path_row_height: Length,
    pub default_new_path_col_width: Length,
}

impl ConnectorLayoutSpec {
    /// Largest signed anchor index on a face
    pub fn anchor_limit(&self) -> i32 {
        (self.default_stem_positions / 2) as i32
    }

    /// Largest signed rut index in a lane
    pub fn rut_limit(&self) -> i32 {
        (self.default_rut_positions / 2) as i32
    }

    /// Reject position counts too large to lay out and negative path extents
    pub fn validate(&self) -> Result<()> {
        position_count("default_stem_positions", self.default_stem_positions)?;
        position_count("default_rut_positions", self.default_rut_positions)?;
        non_negative("default_new_path_row_height", self.default_new_path_row_height)?;
        non_negative("default_new_path_col_width", self.default_new_path_col_width)
    }
}

/// Largest stem or rut position count a layout record may ask for
pub const MAX_POSITIONS: u32 = 999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemPositionSpec {
    pub name: String,
    pub diagram_type: String,
    pub stretch: Stretch,
    pub minimum_length: Length,
}

/// Distances used to pin a stem name next to its stem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamePlacementSpec {
    pub stem_position: String,
    pub diagram_type: String,
    pub notation: String,
    pub vertical_axis_buffer: Length,
    pub horizontal_axis_buffer: Length,
    pub vertical_face_buffer: Length,
    pub horizontal_face_buffer: Length,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconPlacementSpec {
    pub stem_position: String,
    pub diagram_type: String,
    pub notation: String,
    pub orientation: IconOrientation,
}

/// Distances used to pin a connector name next to its line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorNameSpec {
    pub connector_type: String,
    pub diagram_type: String,
    pub notation: String,
    pub vertical_axis_buffer: Length,
    pub horizontal_axis_buffer: Length,
    pub vertical_end_buffer: Length,
    pub horizontal_end_buffer: Length,
    /// Connectors of this type may be drawn without a name
    #[serde(default = "yes")]
    pub optional: bool,
}

fn yes() -> bool {
    true
}

/// Read-only query capability injected into every diagram
pub trait StyleLookup {
    fn connector_layout(&self, name: &str) -> Option<&ConnectorLayoutSpec>;

    fn stem_position(&self, name: &str, diagram_type: &str) -> Option<&StemPositionSpec>;

    fn name_placement(
        &self,
        stem_position: &str,
        diagram_type: &str,
        notation: &str,
    ) -> Option<&NamePlacementSpec>;

    fn icon_placement(
        &self,
        stem_position: &str,
        diagram_type: &str,
        notation: &str,
    ) -> Option<&IconPlacementSpec>;

    fn connector_name(
        &self,
        connector_type: &str,
        diagram_type: &str,
        notation: &str,
    ) -> Option<&ConnectorNameSpec>;
}

/// Turn an absent record into a configuration error
pub(crate) fn require<T>(found: Option<T>, table: &'static str, key: impl FnOnce() -> String) -> Result<T> {
    found.ok_or_else(|| LayoutError::MissingStyle { table, key: key() })
}

/// In-memory style tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDb {
    pub layout: Vec<ConnectorLayoutSpec>,
    pub stem_positions: Vec<StemPositionSpec>,
    pub name_placements: Vec<NamePlacementSpec>,
    pub icon_placements: Vec<IconPlacementSpec>,
    pub connector_names: Vec<ConnectorNameSpec>,
}

impl StyleDb {
    /// Parse and validate a YAML style document
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let db: StyleDb = serde_yaml::from_str(text)?;
        db.validate()?;
        Ok(db)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Reject duplicate keys and unusable distances
    pub fn validate(&self) -> Result<()> {
        unique("connector layout", self.layout.iter().map(|r| r.name.clone()))?;
        unique(
            "stem position",
            self.stem_positions.iter().map(|r| key2(&r.name, &r.diagram_type)),
        )?;
        unique(
            "name placement",
            self.name_placements
                .iter()
                .map(|r| key3(&r.stem_position, &r.diagram_type, &r.notation)),
        )?;
        unique(
            "icon placement",
            self.icon_placements
                .iter()
                .map(|r| key3(&r.stem_position, &r.diagram_type, &r.notation)),
        )?;
        unique(
            "connector name",
            self.connector_names
                .iter()
                .map(|r| key3(&r.connector_type, &r.diagram_type, &r.notation)),
        )?;

        for r in &self.layout {
            r.validate()?;
        }
        for r in &self.stem_positions {
            non_negative("minimum_length", r.minimum_length)?;
        }
        for r in &self.name_placements {
            non_negative("vertical_axis_buffer", r.vertical_axis_buffer)?;
            non_negative("horizontal_axis_buffer", r.horizontal_axis_buffer)?;
            non_negative("vertical_face_buffer", r.vertical_face_buffer)?;
            non_negative("horizontal_face_buffer", r.horizontal_face_buffer)?;
        }
        for r in &self.connector_names {
            non_negative("vertical_axis_buffer", r.vertical_axis_buffer)?;
            non_negative("horizontal_axis_buffer", r.horizontal_axis_buffer)?;
            non_negative("vertical_end_buffer", r.vertical_end_buffer)?;
            non_negative("horizontal_end_buffer", r.horizontal_end_buffer)?;
        }
        Ok(())
    }
}

impl StyleLookup for StyleDb {
    fn connector_layout(&self, name: &str) -> Option<&ConnectorLayoutSpec> {
        self.layout.iter().find(|r| r.name == name)
    }

    fn stem_position(&self, name: &str, diagram_type: &str) -> Option<&StemPositionSpec> {
        self.stem_positions
            .iter()
            .find(|r| r.name == name && r.diagram_type == diagram_type)
    }

    fn name_placement(
        &self,
        stem_position: &str,
        diagram_type: &str,
        notation: &str,
    ) -> Option<&NamePlacementSpec> {
        self.name_placements.iter().find(|r| {
            r.stem_position == stem_position && r.diagram_type == diagram_type && r.notation == notation
        })
    }

    fn icon_placement(
        &self,
        stem_position: &str,
        diagram_type: &str,
        notation: &str,
    ) -> Option<&IconPlacementSpec> {
        self.icon_placements.iter().find(|r| {
            r.stem_position == stem_position && r.diagram_type == diagram_type && r.notation == notation
        })
    }

    fn connector_name(
        &self,
        connector_type: &str,
        diagram_type: &str,
        notation: &str,
    ) -> Option<&ConnectorNameSpec> {
        self.connector_names.iter().find(|r| {
            r.connector_type == connector_type && r.diagram_type == diagram_type && r.notation == notation
        })
    }
}

pub(crate) fn key2(a: &str, b: &str) -> String {
    format!("{a}/{b}")
}

pub(crate) fn key3(a: &str, b: &str, c: &str) -> String {
    format!("{a}/{b}/{c}")
}

fn unique(table: &'static str, keys: impl Iterator<Item = String>) -> Result<()> {
    let mut seen = BTreeSet::new();
    for key in keys {
        if !seen.insert(key.clone()) {
            return Err(LayoutError::DuplicateStyle { table, key });
        }
    }
    Ok(())
}

fn position_count(field: &'static str, value: u32) -> Result<()> {
    if value > MAX_POSITIONS {
        return Err(LayoutError::InvalidNumber {
            field,
            source: NumericError::TooLarge,
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: Length) -> Result<()> {
    Length::try_non_negative(value.raw())
        .map(|_| ())
        .map_err(|source| LayoutError::InvalidNumber { field, source })
}
