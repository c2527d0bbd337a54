//! Chart input model.
//!
//! A chart is described by three pieces of data:
//!
//! - the ordered list of categories (stages), which fixes the left-to-right order,
//! - for every category, the node labels in top-to-bottom display order, each with
//!   an optional style and optional subnodes,
//! - for every line, the node (and optionally the subnode) it passes through in
//!   each category.
//!
//! All collections preserve declaration order, which is the only ordering the
//! layout engine uses.
//!
//! # JSON
//!
//! ```
//! # use alluvia::data::ChartData;
//! let data = ChartData::from_json(r#"{
//!     "categories": ["A", "B"],
//!     "nodes": {
//!         "A": { "a1": { "facecolor": "red" }, "a2": {} },
//!         "B": { "b1": { "subnodes": { "b1.1": {}, "b1.2": {} } } }
//!     },
//!     "lines": {
//!         "1": { "A": "a1", "B": { "node": "b1", "subnode": "b1.1" } },
//!         "2": { "A": { "node": "a2" }, "B": { "node": "b1", "subnode": "b1.2" } }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(data.categories().len(), 2);
//! assert_eq!(data.lines().len(), 2);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};

use alluvia_core::{color::Color, identifier::Id};

use crate::error::AlluviaError;

/// Presentation attributes of a node or subnode.
///
/// The layout engine never reads these; they are merged with the computed
/// geometry by the renderer and by the anchor-node color policy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    edgecolor: Option<Color>,
    facecolor: Option<Color>,
    #[serde(deserialize_with = "deserialize_opacity")]
    opacity: Option<f32>,
}

impl NodeStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edgecolor(mut self, color: Color) -> Self {
        self.edgecolor = Some(color);
        self
    }

    pub fn with_facecolor(mut self, color: Color) -> Self {
        self.facecolor = Some(color);
        self
    }

    /// Sets the opacity, clamped to `[0, 1]`.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    /// Edge color, `black` when unset.
    pub fn edgecolor(&self) -> Color {
        self.edgecolor.unwrap_or_default()
    }

    /// Face color, `slategrey` when unset.
    pub fn facecolor(&self) -> Color {
        self.facecolor.unwrap_or_else(default_facecolor)
    }

    /// Opacity in `[0, 1]`, fully opaque when unset.
    pub fn opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0)
    }
}

fn deserialize_opacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    let opacity = f32::deserialize(deserializer)?;
    if (0.0..=1.0).contains(&opacity) {
        Ok(Some(opacity))
    } else {
        Err(de::Error::custom(format!(
            "opacity must be between 0 and 1, got {opacity}"
        )))
    }
}

fn default_facecolor() -> Color {
    Color::new("slategrey").expect("'slategrey' is a valid CSS color")
}

/// A node declared in a category.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NodeDefinition {
    #[serde(flatten)]
    style: NodeStyle,

    /// Subnode labels in display order.
    #[serde(default)]
    subnodes: IndexMap<Id, NodeStyle>,
}

impl NodeDefinition {
    pub fn new(style: NodeStyle) -> Self {
        Self {
            style,
            subnodes: IndexMap::new(),
        }
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    pub fn subnodes(&self) -> &IndexMap<Id, NodeStyle> {
        &self.subnodes
    }

    pub fn has_subnodes(&self) -> bool {
        !self.subnodes.is_empty()
    }

    pub fn subnode(&self, label: Id) -> Option<&NodeStyle> {
        self.subnodes.get(&label)
    }
}

/// Where a line passes through one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "PlacementRepr")]
pub struct Placement {
    node: Id,
    subnode: Option<Id>,
}

/// Accepts a bare node label as shorthand for `{ "node": label }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlacementRepr {
    Label(Id),
    Full {
        node: Id,
        #[serde(default)]
        subnode: Option<Id>,
    },
}

impl From<PlacementRepr> for Placement {
    fn from(repr: PlacementRepr) -> Self {
        match repr {
            PlacementRepr::Label(node) => Self::new(node),
            PlacementRepr::Full { node, subnode } => Self { node, subnode },
        }
    }
}

impl Placement {
    pub fn new(node: impl Into<Id>) -> Self {
        Self {
            node: node.into(),
            subnode: None,
        }
    }

    pub fn with_subnode(node: impl Into<Id>, subnode: impl Into<Id>) -> Self {
        Self {
            node: node.into(),
            subnode: Some(subnode.into()),
        }
    }

    pub fn node(&self) -> Id {
        self.node
    }

    pub fn subnode(&self) -> Option<Id> {
        self.subnode
    }
}

/// The placements of one line, keyed by category.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct LineRecord {
    placements: IndexMap<Id, Placement>,
}

impl LineRecord {
    pub fn placement(&self, category: Id) -> Option<Placement> {
        self.placements.get(&category).copied()
    }

    pub fn placements(&self) -> impl Iterator<Item = (Id, Placement)> + '_ {
        self.placements.iter().map(|(category, placement)| (*category, *placement))
    }
}

impl<C: Into<Id>> FromIterator<(C, Placement)> for LineRecord {
    fn from_iter<I: IntoIterator<Item = (C, Placement)>>(iter: I) -> Self {
        Self {
            placements: iter
                .into_iter()
                .map(|(category, placement)| (category.into(), placement))
                .collect(),
        }
    }
}

/// Complete input of one chart.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChartData {
    categories: Vec<Id>,
    nodes: IndexMap<Id, IndexMap<Id, NodeDefinition>>,
    #[serde(default)]
    lines: IndexMap<Id, LineRecord>,
}

impl ChartData {
    /// Creates an empty chart with the given categories, left to right.
    pub fn new<I, C>(categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Id>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
            nodes: IndexMap::new(),
            lines: IndexMap::new(),
        }
    }

    /// Parses a chart from its JSON description.
    ///
    /// # Errors
    ///
    /// Returns [`AlluviaError::Parse`] for malformed JSON, unknown shapes or
    /// invalid color strings. Structural problems such as unknown node labels
    /// are left to [`crate::validate`].
    pub fn from_json(source: &str) -> Result<Self, AlluviaError> {
        serde_json::from_str(source).map_err(|err| AlluviaError::Parse(err.to_string()))
    }

    /// Declares a node at the bottom of a category's node stack.
    pub fn add_node(
        &mut self,
        category: impl Into<Id>,
        label: impl Into<Id>,
        style: NodeStyle,
    ) -> &mut Self {
        self.nodes
            .entry(category.into())
            .or_default()
            .insert(label.into(), NodeDefinition::new(style));
        self
    }

    /// Declares a subnode of an existing node, or of a new unstyled node.
    pub fn add_subnode(
        &mut self,
        category: impl Into<Id>,
        node: impl Into<Id>,
        label: impl Into<Id>,
        style: NodeStyle,
    ) -> &mut Self {
        self.nodes
            .entry(category.into())
            .or_default()
            .entry(node.into())
            .or_default()
            .subnodes
            .insert(label.into(), style);
        self
    }

    /// Adds a line; its position in the insertion order is its initial rank.
    pub fn add_line(&mut self, id: impl Into<Id>, record: LineRecord) -> &mut Self {
        self.lines.insert(id.into(), record);
        self
    }

    pub fn categories(&self) -> &[Id] {
        &self.categories
    }

    pub fn category_index(&self, category: Id) -> Option<usize> {
        self.categories.iter().position(|c| *c == category)
    }

    /// All node definitions, keyed by category.
    pub fn node_definitions(&self) -> &IndexMap<Id, IndexMap<Id, NodeDefinition>> {
        &self.nodes
    }

    /// Node definitions of one category, in display order.
    pub fn nodes(&self, category: Id) -> Option<&IndexMap<Id, NodeDefinition>> {
        self.nodes.get(&category)
    }

    pub fn node(&self, category: Id, label: Id) -> Option<&NodeDefinition> {
        self.nodes.get(&category)?.get(&label)
    }

    pub fn lines(&self) -> &IndexMap<Id, LineRecord> {
        &self.lines
    }

    pub fn line(&self, id: Id) -> Option<&LineRecord> {
        self.lines.get(&id)
    }
}
