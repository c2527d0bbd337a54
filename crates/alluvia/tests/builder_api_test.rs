//! Integration tests for the ChartBuilder API
//!
//! These tests drive the public API end to end: parse, validate, lay out,
//! color and render.

use alluvia::{
    AlluviaError, ChartBuilder, ValidationError,
    color::Color,
    config::{AppConfig, ColorConfig, ColorMode, LayoutConfig, StyleConfig},
    data::{ChartData, LineRecord, NodeStyle, Placement},
    identifier::Id,
};

const SUBNODE_CHART: &str = r#"{
    "categories": ["A", "B", "C"],
    "nodes": {
        "A": {
            "a1": { "facecolor": "red" },
            "a2": { "facecolor": "blue" },
            "a3": { "facecolor": "grey" }
        },
        "B": {
            "b1": {
                "facecolor": "gainsboro",
                "subnodes": {
                    "b1.1": { "facecolor": "forestgreen" },
                    "b1.2": { "facecolor": "limegreen" }
                }
            },
            "b2": { "facecolor": "orange" }
        },
        "C": {
            "c1": { "facecolor": "purple" },
            "c2": { "facecolor": "cyan" },
            "c3": { "facecolor": "magenta" }
        }
    },
    "lines": {
        "1": { "A": "a1", "B": { "node": "b1", "subnode": "b1.1" }, "C": "c1" },
        "2": { "A": "a1", "B": "b2", "C": "c2" },
        "3": { "A": "a2", "B": { "node": "b1", "subnode": "b1.2" }, "C": "c2" },
        "4": { "A": "a2", "B": "b2", "C": "c1" },
        "5": { "A": "a2", "B": { "node": "b1", "subnode": "b1.1" }, "C": "c3" },
        "6": { "A": "a3", "B": "b2", "C": "c3" }
    }
}"#;

fn config(layout: LayoutConfig, color: ColorConfig) -> AppConfig {
    AppConfig::new(layout, color, StyleConfig::default())
}

#[test]
fn test_builder_api_exists() {
    let _builder = ChartBuilder::default();
}

#[test]
fn test_render_chart() {
    let builder = ChartBuilder::default();
    let data = builder.parse(SUBNODE_CHART).expect("Failed to parse chart");
    let chart = builder.layout(&data).expect("Failed to lay out chart");
    let svg = builder.render_svg(&chart).expect("Failed to render chart");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert_eq!(svg.matches("<polyline").count(), 6);
}

#[test]
fn test_anchor_node_colors_from_middle_anchor() {
    let builder = ChartBuilder::new(config(
        LayoutConfig::default().with_anchor("B"),
        ColorConfig::new(ColorMode::AnchorNode),
    ));
    let data = builder.parse(SUBNODE_CHART).unwrap();
    let chart = builder.layout(&data).unwrap();

    assert_eq!(chart.layout().anchor(), Id::new("B"));
    assert_eq!(chart.color(Id::new("1")), Color::new("forestgreen").unwrap());
    assert_eq!(chart.color(Id::new("3")), Color::new("limegreen").unwrap());
    assert_eq!(chart.color(Id::new("2")), Color::new("orange").unwrap());
}

#[test]
fn test_line_ids_render_with_middle_anchor() {
    let builder = ChartBuilder::new(config(
        LayoutConfig::default()
            .with_anchor("B")
            .with_show_line_ids(true),
        ColorConfig::new(ColorMode::CategoryColormap),
    ));
    let data = builder.parse(SUBNODE_CHART).unwrap();
    let chart = builder.layout(&data).unwrap();

    assert_eq!(chart.layout().line_ids().len(), 6);
    assert!(chart.layout().min_x() < 0.0);
    for path in chart.layout().paths().values() {
        assert_eq!(path.segments().len(), 6);
    }

    let svg = builder.render_svg(&chart).unwrap();
    assert!(svg.contains("line-ids"));
}

#[test]
fn test_same_seed_gives_identical_charts() {
    let builder = ChartBuilder::new(config(
        LayoutConfig::default(),
        ColorConfig::new(ColorMode::Random).with_seed(7),
    ));
    let data = builder.parse(SUBNODE_CHART).unwrap();

    let first = builder.layout(&data).unwrap();
    let second = builder.layout(&data).unwrap();
    assert_eq!(first.layout(), second.layout());
    assert_eq!(first.colors(), second.colors());
    assert_eq!(
        builder.render_svg(&first).unwrap(),
        builder.render_svg(&second).unwrap()
    );
}

#[test]
fn test_parse_invalid_json_returns_error() {
    let builder = ChartBuilder::default();
    let result = builder.parse("{ not json");
    assert!(matches!(result, Err(AlluviaError::Parse(_))));
}

#[test]
fn test_validation_error_surfaces() {
    let builder = ChartBuilder::default();
    let data = builder
        .parse(r#"{ "categories": ["A"], "nodes": { "A": { "a1": {} } }, "lines": { "1": { "A": "a9" } } }"#)
        .unwrap();

    let result = builder.layout(&data);
    assert!(matches!(
        result,
        Err(AlluviaError::Validation(ValidationError::UnknownNode { .. }))
    ));
}

#[test]
fn test_invalid_layout_config_is_rejected() {
    let builder = ChartBuilder::new(config(
        LayoutConfig::default().with_nodes_x_share(1.5),
        ColorConfig::default(),
    ));
    let data = builder.parse(SUBNODE_CHART).unwrap();
    assert!(matches!(builder.layout(&data), Err(AlluviaError::Config(_))));
}

#[test]
fn test_builder_reusability() {
    let builder = ChartBuilder::default();

    let first = builder.parse(SUBNODE_CHART).unwrap();
    let second = builder
        .parse(r#"{ "categories": ["X"], "nodes": { "X": { "x": {} } }, "lines": { "1": { "X": "x" } } }"#)
        .unwrap();

    let svg1 = builder.render_svg(&builder.layout(&first).unwrap()).unwrap();
    let svg2 = builder.render_svg(&builder.layout(&second).unwrap()).unwrap();
    assert_ne!(svg1, svg2);
}

#[test]
fn test_crowded_node_is_rejected_before_layout() {
    let mut data = ChartData::new(["A"]);
    for node in 0..15 {
        data.add_node("A", format!("a{node}").as_str(), NodeStyle::new());
    }
    for line in 0..100usize {
        let node = if line < 86 { 0 } else { line - 85 };
        data.add_line(
            line,
            LineRecord::from_iter([("A", Placement::new(format!("a{node}").as_str()))]),
        );
    }

    let result = ChartBuilder::default().layout(&data);
    assert!(matches!(
        result,
        Err(AlluviaError::Validation(ValidationError::LinesOverflowNode { .. }))
    ));
}
