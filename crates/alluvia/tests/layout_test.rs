//! Layout behaviour through the public API.

use float_cmp::{approx_eq, assert_approx_eq};
use proptest::prelude::*;

use alluvia::{
    ChartBuilder,
    config::{AppConfig, ColorConfig, LayoutConfig, StyleConfig},
    data::{ChartData, LineRecord, NodeStyle, Placement},
    identifier::Id,
    layout::{Engine, Layout, slots::LINE_SPACE_SHARE, subnodes::SUBNODE_REL_SIZE},
    path::SegmentKind,
};

const EPSILON: f32 = 1e-5;

fn lay_out(data: &ChartData, config: &LayoutConfig) -> Layout {
    let anchor = alluvia::validate::validate(data, config).expect("chart should be valid");
    Engine::new(config)
        .calculate(data, anchor)
        .expect("layout should succeed")
}

/// Three categories of two nodes each; lines 1 and 2 stay on the top nodes,
/// lines 3 and 4 on the bottom ones.
fn balanced_chart() -> ChartData {
    let mut data = ChartData::new(["A", "B", "C"]);
    for category in ["A", "B", "C"] {
        let lower = category.to_lowercase();
        data.add_node(category, format!("{lower}1").as_str(), NodeStyle::new())
            .add_node(category, format!("{lower}2").as_str(), NodeStyle::new());
    }
    for (line, suffix) in [("1", "1"), ("2", "1"), ("3", "2"), ("4", "2")] {
        data.add_line(
            line,
            LineRecord::from_iter([
                ("A", Placement::new(format!("a{suffix}").as_str())),
                ("B", Placement::new(format!("b{suffix}").as_str())),
                ("C", Placement::new(format!("c{suffix}").as_str())),
            ]),
        );
    }
    data
}

#[test]
fn test_balanced_chart_splits_height_evenly() {
    let config = LayoutConfig::default();
    let layout = lay_out(&balanced_chart(), &config);

    let free = 1.0 - 2.0 * config.node_min_height() - config.node_gap();
    for category in layout.categories() {
        assert_eq!(category.nodes().len(), 2);
        for node in category.nodes() {
            assert_approx_eq!(
                f32,
                node.bounds().height(),
                config.node_min_height() + free / 2.0,
                epsilon = EPSILON
            );
        }

        let slots: Vec<f32> = category.slots().values().copied().collect();
        assert_eq!(slots.len(), 4);
        assert!(slots.windows(2).all(|pair| pair[0] > pair[1]));
    }

    for path in layout.paths().values() {
        assert_eq!(path.segments().len(), 5);
    }
}

#[test]
fn test_single_line_is_centered() {
    let mut data = ChartData::new(["A", "B"]);
    data.add_node("A", "a", NodeStyle::new())
        .add_node("B", "b", NodeStyle::new())
        .add_line(
            "only",
            LineRecord::from_iter([("A", Placement::new("a")), ("B", Placement::new("b"))]),
        );

    let layout = lay_out(&data, &LayoutConfig::default());
    for category in layout.categories() {
        assert_eq!(category.nodes().len(), 1);
        let node = &category.nodes()[0];
        assert_approx_eq!(f32, node.bounds().height(), 1.0, epsilon = EPSILON);
        assert_approx_eq!(f32, category.line_spacing(), LINE_SPACE_SHARE, epsilon = EPSILON);
        assert_approx_eq!(
            f32,
            category.slot(Id::new("only")).unwrap(),
            node.bounds().center().y(),
            epsilon = EPSILON
        );
    }
}

#[test]
fn test_subnodes_span_their_lines() {
    let mut data = ChartData::new(["A", "B"]);
    data.add_node("A", "n", NodeStyle::new())
        .add_subnode("A", "n", "X", NodeStyle::new())
        .add_subnode("A", "n", "Y", NodeStyle::new())
        .add_subnode("A", "n", "Z", NodeStyle::new())
        .add_node("B", "m", NodeStyle::new());
    for (line, subnode) in [("1", "X"), ("2", "Y"), ("3", "X")] {
        data.add_line(
            line,
            LineRecord::from_iter([
                ("A", Placement::with_subnode("n", subnode)),
                ("B", Placement::new("m")),
            ]),
        );
    }

    let layout = lay_out(&data, &LayoutConfig::default());
    let category = layout.category(Id::new("A")).unwrap();
    let spacing = category.line_spacing();
    let margin = SUBNODE_REL_SIZE * spacing;
    let node = category.node(Id::new("n")).unwrap();

    let x = node.subnode(Id::new("X")).expect("X holds lines");
    let y = node.subnode(Id::new("Y")).expect("Y holds a line");
    assert!(node.subnode(Id::new("Z")).is_none());

    assert_approx_eq!(f32, x.bounds().height(), spacing + margin, epsilon = EPSILON);
    assert_approx_eq!(f32, y.bounds().height(), margin, epsilon = EPSILON);
    assert_approx_eq!(
        f32,
        x.bounds().width(),
        node.bounds().width() * SUBNODE_REL_SIZE,
        epsilon = EPSILON
    );
    assert!(x.bounds().min_y() > y.bounds().max_y() - EPSILON);

    // Lines of X are adjacent, above the line of Y
    let order: Vec<Id> = category.slots().keys().copied().collect();
    assert_eq!(order, vec![Id::new("1"), Id::new("3"), Id::new("2")]);
}

#[test]
fn test_segment_count_follows_category_count() {
    let mut data = ChartData::new(["A", "B", "C", "D"]);
    for category in ["A", "B", "C", "D"] {
        data.add_node(category, "n", NodeStyle::new());
    }
    data.add_line(
        "1",
        LineRecord::from_iter(["A", "B", "C", "D"].map(|c| (c, Placement::new("n")))),
    );

    let layout = lay_out(&data, &LayoutConfig::default().with_anchor("C"));
    assert_eq!(layout.path(Id::new("1")).unwrap().segments().len(), 7);

    let layout = lay_out(
        &data,
        &LayoutConfig::default().with_anchor("C").with_show_line_ids(true),
    );
    let segments = layout.path(Id::new("1")).unwrap().segments();
    assert_eq!(segments.len(), 8);
    assert_eq!(segments.last().unwrap().name(), "id_1");
}

#[test]
fn test_single_category_with_line_ids() {
    let mut data = ChartData::new(["A"]);
    data.add_node("A", "n", NodeStyle::new())
        .add_line("1", LineRecord::from_iter([("A", Placement::new("n"))]))
        .add_line("2", LineRecord::from_iter([("A", Placement::new("n"))]));

    let config = LayoutConfig::default().with_show_line_ids(true);
    let layout = lay_out(&data, &config);

    assert_eq!(layout.line_ids().len(), 2);
    assert!(layout.min_x() < 0.0);
    for path in layout.paths().values() {
        assert_eq!(path.segments().len(), 2);
    }
}

#[test]
fn test_layout_is_deterministic() {
    let builder = ChartBuilder::new(AppConfig::new(
        LayoutConfig::default().with_anchor("B"),
        ColorConfig::default().with_seed(42),
        StyleConfig::default(),
    ));
    let data = balanced_chart();

    let first = builder.layout(&data).unwrap();
    let second = builder.layout(&data).unwrap();
    assert_eq!(first.layout(), second.layout());
    assert_eq!(first.colors(), second.colors());
}

/// Random charts: `categories` columns of three nodes, each line picking a
/// node index per column.
fn chart_strategy() -> impl Strategy<Value = (ChartData, usize)> {
    (1usize..=4)
        .prop_flat_map(|categories| {
            (
                Just(categories),
                0..categories,
                prop::collection::vec(prop::collection::vec(0usize..3, categories), 1..16),
            )
        })
        .prop_map(|(count, anchor, lines)| {
            let names: Vec<String> = (0..count).map(|index| format!("C{index}")).collect();
            let mut data = ChartData::new(names.iter().map(String::as_str));
            for name in &names {
                for node in 0..3 {
                    data.add_node(name.as_str(), format!("{name}n{node}").as_str(), NodeStyle::new());
                }
            }
            for (line, picks) in lines.iter().enumerate() {
                let record = names
                    .iter()
                    .zip(picks)
                    .map(|(name, pick)| {
                        (name.as_str(), Placement::new(format!("{name}n{pick}").as_str()))
                    })
                    .collect::<LineRecord>();
                data.add_line(line, record);
            }
            (data, anchor)
        })
}

proptest! {
    #[test]
    fn prop_layout_invariants((data, anchor) in chart_strategy()) {
        let anchor = data.categories()[anchor];
        let config = LayoutConfig::default().with_anchor(anchor);
        let layout = lay_out(&data, &config);
        let lines = data.lines().len();

        for category in layout.categories() {
            // Node heights and gaps fill the unit height
            let nodes = category.nodes();
            let used: f32 = nodes.iter().map(|node| node.bounds().height()).sum::<f32>()
                + (nodes.len() - 1) as f32 * config.node_gap();
            prop_assert!(approx_eq!(f32, used, 1.0, epsilon = 1e-4));
            for node in nodes {
                prop_assert!(node.bounds().height() >= config.node_min_height() - EPSILON);
                prop_assert!(node.bounds().min_y() >= -EPSILON);
            }

            // Every line has a slot, strictly descending in slot order
            let slots: Vec<f32> = category.slots().values().copied().collect();
            prop_assert_eq!(slots.len(), lines);
            prop_assert!(slots.windows(2).all(|pair| pair[0] > pair[1]));

            // Slots lie inside the node of the line
            for (line, &y) in category.slots() {
                let placement = data.line(*line).unwrap().placement(category.name()).unwrap();
                let node = category.node(placement.node()).unwrap();
                prop_assert!(y > node.bounds().min_y() && y < node.bounds().max_y());
            }
        }

        let expected = 2 * (data.categories().len() - 1) + 1;
        for path in layout.paths().values() {
            prop_assert_eq!(path.segments().len(), expected);
            for segment in path.segments() {
                if segment.kind() == SegmentKind::Straight {
                    prop_assert!(approx_eq!(f32, segment.start().y(), segment.finish().y()));
                    prop_assert!(segment.start().x() <= segment.finish().x());
                }
            }
        }
    }

    #[test]
    fn prop_lines_sharing_a_node_keep_the_previous_order((data, anchor) in chart_strategy()) {
        let config = LayoutConfig::default().with_anchor(data.categories()[anchor]);
        let layout = lay_out(&data, &config);
        let categories = layout.categories();

        for (index, category) in categories.iter().enumerate() {
            if index == anchor {
                continue;
            }
            let previous = if index < anchor { &categories[index + 1] } else { &categories[index - 1] };
            let rank = |line: &Id| previous.slots().get_index_of(line).unwrap();

            for node in category.nodes() {
                let members: Vec<&Id> = category
                    .slots()
                    .keys()
                    .filter(|line| {
                        data.line(**line).unwrap().placement(category.name()).unwrap().node()
                            == node.label()
                    })
                    .collect();
                prop_assert!(members.windows(2).all(|pair| rank(pair[0]) < rank(pair[1])));
            }
        }
    }
}
