use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;
use stemwork::{AnyConnector, Connector, LayoutDoc, RecordingSurface, StyleDb, draw};

/// A fixture carries its own style tables next to the layout
#[derive(Debug, Deserialize)]
struct Fixture {
    style: StyleDb,
    layout: LayoutDoc,
    /// Diagnostic code the layout must fail with
    #[serde(default)]
    expect_error: Option<String>,
}

fn render(fixture: &Fixture) -> (stemwork::Result<Vec<AnyConnector>>, RecordingSurface) {
    let mut surface = RecordingSurface::new();
    let style = Rc::new(fixture.style.clone());
    let result = draw(&fixture.layout, style, &mut surface);
    (result, surface)
}

fn check_geometry(connector: &AnyConnector) -> Result<(), String> {
    for (a, b) in connector.line_segments() {
        if a.x != b.x && a.y != b.y {
            return Err(format!("{}: segment {a} -> {b} is not orthogonal", connector.id()));
        }
    }
    for stem in connector.stems() {
        let (root, vine) = (stem.root(), stem.vine());
        if root.x != vine.x && root.y != vine.y {
            return Err(format!("{}: stem on [{}] is not orthogonal", connector.id(), stem.node.name));
        }
        if !stem.is_hanging() && vine != root + stem.face.outward() * stem.minimum_length {
            return Err(format!("{}: stem on [{}] moved off its minimum length", connector.id(), stem.node.name));
        }
    }
    if let AnyConnector::Binary(binary) = connector {
        let points = binary.points();
        if points.first() != Some(&binary.t_stem().vine()) || points.last() != Some(&binary.p_stem().vine()) {
            return Err(format!("{}: line does not join the stem vines", connector.id()));
        }
    }
    Ok(())
}

fn check_fixture(path: &Path) -> datatest_stable::Result<()> {
    use miette::Diagnostic;

    let text = std::fs::read_to_string(path)?;
    let fixture: Fixture = serde_yaml::from_str(&text)?;
    fixture.style.validate()?;

    let (first, surface) = render(&fixture);
    match (&fixture.expect_error, first) {
        (Some(code), Ok(_)) => return Err(format!("expected error {code}, layout succeeded").into()),
        (Some(code), Err(err)) => {
            let actual = err.code().map(|c| c.to_string()).unwrap_or_default();
            if &actual != code {
                return Err(format!("expected error {code}, got {actual}: {err}").into());
            }
            return Ok(());
        }
        (None, Err(err)) => return Err(format!("{:?}", miette::Report::new(err)).into()),
        (None, Ok(connectors)) => {
            for connector in &connectors {
                check_geometry(connector)?;
            }
        }
    }

    let (_, again) = render(&fixture);
    let (a, b) = (surface.transcript(), again.transcript());
    if a != b {
        let diff = dissimilar::diff(&a, &b)
            .into_iter()
            .map(|chunk| match chunk {
                dissimilar::Chunk::Equal(s) => s.to_string(),
                dissimilar::Chunk::Delete(s) => format!("[-{s}-]"),
                dissimilar::Chunk::Insert(s) => format!("{{+{s}+}}"),
            })
            .collect::<String>();
        return Err(format!("layout is not deterministic:\n{diff}").into());
    }
    Ok(())
}

datatest_stable::harness! {
    { test = check_fixture, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.yaml$" },
}
