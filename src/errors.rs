//! Error types with diagnostics using miette
//!
//! Codes are grouped by who can fix the problem:
//! - `stemwork::config::*` - the style database is incomplete or malformed
//! - `stemwork::layout::*` - the layout (or model) supplied by the user is wrong
//! - `stemwork::render::*` - the engine was driven out of order

use miette::Diagnostic;
use thiserror::Error;

use crate::connection::NodeFace;
use crate::types::{Length, NumericError};

pub type Result<T, E = LayoutError> = std::result::Result<T, E>;

#[derive(Error, Diagnostic, Debug)]
pub enum LayoutError {
    // ========================================================================
    // Configuration integrity
    // ========================================================================
    #[error("no {table} entry for {key}")]
    #[diagnostic(
        code(stemwork::config::missing_style),
        help("the style database does not cover this combination; add the missing row to the style configuration")
    )]
    MissingStyle { table: &'static str, key: String },

    #[error("duplicate {table} entry for {key}")]
    #[diagnostic(code(stemwork::config::duplicate_style))]
    DuplicateStyle { table: &'static str, key: String },

    #[error("invalid style configuration")]
    #[diagnostic(code(stemwork::config::invalid_yaml))]
    StyleYaml(#[from] serde_yaml::Error),

    #[error("cannot read style configuration")]
    #[diagnostic(code(stemwork::config::io))]
    StyleIo(#[from] std::io::Error),

    #[error("invalid value for {field}: {source}")]
    #[diagnostic(code(stemwork::config::invalid_number))]
    InvalidNumber {
        field: &'static str,
        #[source]
        source: NumericError,
    },

    // ========================================================================
    // User input
    // ========================================================================
    #[error("invalid layout document")]
    #[diagnostic(code(stemwork::layout::invalid_yaml))]
    LayoutYaml {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("name side must be 1 or -1, got {side}")]
    #[diagnostic(code(stemwork::layout::invalid_name_side))]
    InvalidNameSide { side: i32 },

    #[error("relationship {relationship} refers to undeclared node [{node}]")]
    #[diagnostic(
        code(stemwork::layout::unknown_node),
        help("check that [{node}] is spelled as in the model and has a node placement in the layout")
    )]
    UnknownNode { node: String, relationship: String },

    #[error("name \"{text}\" of {owner} does not fit on the diagram")]
    #[diagnostic(
        code(stemwork::layout::name_out_of_bounds),
        help("rewrap the name onto more lines, flip it to the other side, or move the connector away from the diagram edge")
    )]
    NameOutOfBounds { owner: String, text: String },

    #[error("{connector}: bend {bend} does not exist, the line has {segments} segment(s)")]
    #[diagnostic(code(stemwork::layout::invalid_bend))]
    InvalidBend { connector: String, bend: usize, segments: usize },

    #[error("{connector}: notch {notch} is outside -{limit}..={limit}")]
    #[diagnostic(code(stemwork::layout::notch_out_of_range))]
    NotchOutOfRange { connector: String, notch: i32, limit: i32 },

    #[error("anchor {anchor} is outside -{limit}..={limit} on the {face} face of [{node}]")]
    #[diagnostic(code(stemwork::layout::anchor_out_of_range))]
    AnchorOutOfRange { node: String, face: NodeFace, anchor: i32, limit: i32 },

    #[error("{connector}: no straight line joins [{from}] and [{to}]")]
    #[diagnostic(
        code(stemwork::layout::no_straight_path),
        help("align the two nodes, adjust the stem anchor, or give the connector a bend path")
    )]
    NoStraightPath { connector: String, from: String, to: String },

    #[error("{connector}: {axis} lane {lane} has no free rut (capacity {capacity})")]
    #[diagnostic(
        code(stemwork::layout::lane_exhausted),
        help("route some connectors through a different lane")
    )]
    LaneExhausted { connector: String, axis: &'static str, lane: u32, capacity: u32 },

    #[error("{connector}: rut {rut} is outside lane {lane} (-{limit}..={limit})")]
    #[diagnostic(code(stemwork::layout::rut_out_of_range))]
    RutOutOfRange { connector: String, lane: u32, rut: i32, limit: i32 },

    #[error("{connector}: lane number must start at 1")]
    #[diagnostic(code(stemwork::layout::invalid_lane))]
    InvalidLane { connector: String },

    #[error("{connector}: {axis} lane {lane} lies outside the diagram")]
    #[diagnostic(
        code(stemwork::layout::lane_out_of_bounds),
        help("route through a row or column inside the diagram, or enlarge the diagram")
    )]
    LaneOutOfBounds {
        connector: String,
        axis: &'static str,
        lane: u32,
    },

    #[error("{connector}: stem from [{node}] cannot reach the connector line")]
    #[diagnostic(
        code(stemwork::layout::unreachable_stem),
        help("move the stem so that it meets a line segment at a right angle")
    )]
    UnreachableStem { connector: String, node: String },

    #[error("{connector}: {reason}")]
    #[diagnostic(code(stemwork::layout::invalid_tree))]
    InvalidTree { connector: String, reason: String },

    #[error("{connector} requires a name")]
    #[diagnostic(code(stemwork::layout::missing_connector_name))]
    MissingConnectorName { connector: String },

    #[error("node [{node}] occupies an invalid grid span")]
    #[diagnostic(code(stemwork::layout::invalid_span))]
    InvalidSpan { node: String },

    #[error("node [{node}] is declared twice")]
    #[diagnostic(code(stemwork::layout::duplicate_node))]
    DuplicateNode { node: String },

    #[error("grid dimension {value} must be positive")]
    #[diagnostic(code(stemwork::layout::invalid_grid))]
    InvalidGrid { value: Length },

    // ========================================================================
    // Lifecycle
    // ========================================================================
    #[error("{connector} has already been rendered")]
    #[diagnostic(code(stemwork::render::already_rendered))]
    AlreadyRendered { connector: String },
}

impl LayoutError {
    /// True for errors the style database maintainer must fix
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            LayoutError::MissingStyle { .. }
                | LayoutError::DuplicateStyle { .. }
                | LayoutError::StyleYaml(_)
                | LayoutError::StyleIo(_)
                | LayoutError::InvalidNumber { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_node_message_names_node_and_relationship() {
        let err = LayoutError::UnknownNode {
            node: "Aircraft".into(),
            relationship: "R1".into(),
        };
        assert_eq!(err.to_string(), "relationship R1 refers to undeclared node [Aircraft]");
        assert!(!err.is_config());
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("[Aircraft]"));
    }

    #[test]
    fn missing_style_is_config_error() {
        let err = LayoutError::MissingStyle {
            table: "name placement",
            key: "class face/class/xUML".into(),
        };
        assert!(err.is_config());
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("stemwork::config::missing_style")
        );
    }
}
