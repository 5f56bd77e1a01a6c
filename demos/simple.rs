use std::rc::Rc;

use stemwork::{LayoutDoc, RecordingSurface, StyleDb};
use tracing_subscriber::EnvFilter;

const STYLE: &str = r#"
layout:
  - name: standard
    default_stem_positions: 3
    default_rut_positions: 3
    default_new_path_row_height: 50
    default_new_path_col_width: 50
stem_positions:
  - { name: class mult, diagram_type: class, stretch: free, minimum_length: 20 }
  - { name: associative mult, diagram_type: class, stretch: hanging, minimum_length: 10 }
name_placements:
  - stem_position: class mult
    diagram_type: class
    notation: xUML
    vertical_axis_buffer: 3
    horizontal_axis_buffer: 4
    vertical_face_buffer: 5
    horizontal_face_buffer: 10
icon_placements:
  - { stem_position: associative mult, diagram_type: class, notation: xUML, orientation: root }
connector_names:
  - connector_type: binary association
    diagram_type: class
    notation: xUML
    vertical_axis_buffer: 4
    horizontal_axis_buffer: 6
    vertical_end_buffer: 2
    horizontal_end_buffer: 2
"#;

const LAYOUT: &str = r#"
diagram:
  diagram_type: class
  notation: xUML
  size: { height: 300, width: 500 }
  rows: [100, 100, 100]
  cols: [100, 100, 100, 100, 100]
nodes:
  - { name: Pilot, row: 2, col: 1, size: { height: 40, width: 60 } }
  - { name: Aircraft, row: 2, col: 4, size: { height: 40, width: 60 } }
  - { name: Flight, row: 3, col: 2, size: { height: 40, width: 60 } }
connectors:
  - kind: binary
    id: R1
    connector_type: binary association
    t: { node: Pilot, face: right, stem_position: class mult, semantic: Mc mult, name: { text: flies, side: 1 } }
    p: { node: Aircraft, face: left, stem_position: class mult, semantic: 1 mult, name: { text: is flown by, side: -1 } }
    tertiary: { node: Flight, face: bottom, stem_position: associative mult, semantic: associative mult }
    name: { text: R1, side: -1 }
"#;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // stemwork-demo [style.yaml [layout.yaml]]
    let mut args = std::env::args().skip(1);
    let style = match args.next() {
        Some(path) => StyleDb::from_path(path)?,
        None => StyleDb::from_yaml_str(STYLE)?,
    };
    let doc = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path).map_err(|e| miette::miette!("cannot read {path}: {e}"))?;
            LayoutDoc::from_yaml_str(&text)?
        }
        None => LayoutDoc::from_yaml_str(LAYOUT)?,
    };

    let mut surface = RecordingSurface::new();
    let connectors = stemwork::draw(&doc, Rc::new(style), &mut surface)?;
    tracing::info!(count = connectors.len(), "connectors drawn");
    println!("{}", surface.transcript());
    Ok(())
}
