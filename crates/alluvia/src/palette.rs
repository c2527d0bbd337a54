//! Line color policies.
//!
//! Colors are chosen after layout, one per line, according to the configured
//! [`ColorMode`]. None of the policies influence geometry.

use indexmap::IndexMap;
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use alluvia_core::{color::Color, identifier::Id};

use crate::{
    config::{ColorConfig, ColorMode},
    data::ChartData,
    error::AlluviaError,
    layout::Layout,
};

/// The `tab20` qualitative colormap.
pub const TAB20: [(u8, u8, u8); 20] = [
    (0x1f, 0x77, 0xb4),
    (0xae, 0xc7, 0xe8),
    (0xff, 0x7f, 0x0e),
    (0xff, 0xbb, 0x78),
    (0x2c, 0xa0, 0x2c),
    (0x98, 0xdf, 0x8a),
    (0xd6, 0x27, 0x28),
    (0xff, 0x98, 0x96),
    (0x94, 0x67, 0xbd),
    (0xc5, 0xb0, 0xd5),
    (0x8c, 0x56, 0x4b),
    (0xc4, 0x9c, 0x94),
    (0xe3, 0x77, 0xc2),
    (0xf7, 0xb6, 0xd2),
    (0x7f, 0x7f, 0x7f),
    (0xc7, 0xc7, 0xc7),
    (0xbc, 0xbd, 0x22),
    (0xdb, 0xdb, 0x8d),
    (0x17, 0xbe, 0xcf),
    (0x9e, 0xda, 0xe5),
];

/// Entry `index` of `count` evenly spaced samples of [`TAB20`].
pub fn tab20(index: usize, count: usize) -> Color {
    let position = index as f32 / count.max(1) as f32 * TAB20.len() as f32;
    let (red, green, blue) = TAB20[(position as usize).min(TAB20.len() - 1)];
    Color::from_rgb8(red, green, blue)
}

/// Chooses one color per line of `data`, keyed by line id in input order.
///
/// # Errors
///
/// Returns [`AlluviaError::Reference`] when a line's node (or subnode) at
/// the anchor category is not declared.
pub fn assign_colors(
    config: &ColorConfig,
    data: &ChartData,
    layout: &Layout,
) -> Result<IndexMap<Id, Color>, AlluviaError> {
    let colors = match config.mode() {
        ColorMode::Random => match config.seed() {
            Some(seed) => random_colors(&mut StdRng::seed_from_u64(seed), data),
            None => random_colors(&mut rand::rng(), data),
        },
        ColorMode::CategoryColormap => category_colormap(data, layout.anchor())?,
        ColorMode::AnchorNode => anchor_node_colors(data, layout.anchor())?,
    };
    debug!(mode:% = config.mode(), lines = colors.len(); "Line colors assigned");
    Ok(colors)
}

fn random_colors<R: Rng>(rng: &mut R, data: &ChartData) -> IndexMap<Id, Color> {
    data.lines()
        .keys()
        .map(|&line| (line, Color::from_rgb8(rng.random(), rng.random(), rng.random())))
        .collect()
}

fn category_colormap(data: &ChartData, anchor: Id) -> Result<IndexMap<Id, Color>, AlluviaError> {
    let nodes = data.nodes(anchor).ok_or_else(|| {
        AlluviaError::Reference(format!("anchor category `{anchor}` has no nodes"))
    })?;
    let node_colors: IndexMap<Id, Color> = nodes
        .keys()
        .enumerate()
        .map(|(index, &label)| (label, tab20(index, nodes.len())))
        .collect();

    data.lines()
        .iter()
        .map(|(&line, record)| {
            let placement = record.placement(anchor).ok_or_else(|| missing(line, anchor))?;
            let color = node_colors.get(&placement.node()).ok_or_else(|| {
                AlluviaError::Reference(format!(
                    "line `{line}` passes unknown node `{}` in category `{anchor}`",
                    placement.node()
                ))
            })?;
            Ok((line, *color))
        })
        .collect()
}

fn anchor_node_colors(data: &ChartData, anchor: Id) -> Result<IndexMap<Id, Color>, AlluviaError> {
    data.lines()
        .iter()
        .map(|(&line, record)| {
            let placement = record.placement(anchor).ok_or_else(|| missing(line, anchor))?;
            let node = data.node(anchor, placement.node()).ok_or_else(|| {
                AlluviaError::Reference(format!(
                    "line `{line}` passes unknown node `{}` in category `{anchor}`",
                    placement.node()
                ))
            })?;
            let style = match placement.subnode() {
                Some(subnode) => node.subnode(subnode).ok_or_else(|| {
                    AlluviaError::Reference(format!(
                        "line `{line}` passes unknown subnode `{subnode}` of node `{}` in category `{anchor}`",
                        placement.node()
                    ))
                })?,
                None => node.style(),
            };
            Ok((line, style.facecolor()))
        })
        .collect()
}

fn missing(line: Id, anchor: Id) -> AlluviaError {
    AlluviaError::Reference(format!(
        "line `{line}` has no node in anchor category `{anchor}`"
    ))
}
