//! Rainbow delimiters
//!
//!     A presentation pass over rendered markup. Every delimiter element is assigned a palette
//!     color from the depth of the collection it belongs to, cycling through the palette:
//!
//!         (a [b {c}])    ( and ) get rainbow-0, [ and ] rainbow-1, { and } rainbow-2
//!
//!     The pass walks the element tree built by [`parse_markup`] and produces [`Decorations`]: a
//!     map from the path of a delimiter element (child indices from the walked node) to its color.
//!     Nothing is mutated until [`apply_decorations`] adds the colors as classes, so computing
//!     colors stays a pure function of the tree.

use crate::quill::ast::MarkupError;
use crate::quill::markup::{parse_markup, Element, RenderedNode, COLLECTION_CLASS, DELIMITER_CLASS};
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A palette class name, e.g. `rainbow-3`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const DEFAULT_PALETTE_SIZE: usize = 10;

/// `rainbow-0` through `rainbow-9`
pub static DEFAULT_PALETTE: Lazy<Palette> = Lazy::new(|| Palette {
    colors: (0..DEFAULT_PALETTE_SIZE)
        .map(|i| ColorToken::new(format!("rainbow-{}", i)))
        .collect(),
});

/// An ordered, non-empty list of colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<ColorToken>,
}

impl Palette {
    /// `None` for an empty list
    pub fn new<I, S>(colors: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<ColorToken> = colors.into_iter().map(ColorToken::new).collect();
        if colors.is_empty() {
            None
        } else {
            Some(Self { colors })
        }
    }

    /// Color for a nesting level, cycling
    pub fn color(&self, level: usize) -> &ColorToken {
        &self.colors[level % self.colors.len()]
    }

    pub fn colors(&self) -> &[ColorToken] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        DEFAULT_PALETTE.clone()
    }
}

/// Child indices from a walked element down to a node
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

// As a string, so decorations serialize as a JSON object
impl Serialize for NodePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub type Decorations = BTreeMap<NodePath, ColorToken>;

/// Colors for every delimiter under `node`, whose own delimiters sit at `level`
///
/// Delimiter children get `palette.color(level)`, collection children are walked at
/// `level + 1`, anything else is skipped. Paths are relative to `node`.
pub fn assign_delimiter_colors(node: &Element, level: usize, palette: &Palette) -> Decorations {
    let mut decorations = Decorations::new();
    collect_colors(node, &NodePath::root(), level, palette, &mut decorations);
    decorations
}

fn collect_colors(
    node: &Element,
    path: &NodePath,
    level: usize,
    palette: &Palette,
    decorations: &mut Decorations,
) {
    for (index, child) in node.children.iter().enumerate() {
        let RenderedNode::Element(element) = child else {
            continue;
        };
        if element.has_class(DELIMITER_CLASS) {
            decorations.insert(path.child(index), palette.color(level).clone());
        } else if element.has_class(COLLECTION_CLASS) {
            collect_colors(element, &path.child(index), level + 1, palette, decorations);
        }
    }
}

/// Colors for a whole rendered document; top-level delimiters get the first color
pub fn decorate(root: &Element, palette: &Palette) -> Decorations {
    let mut decorations = Decorations::new();
    for (index, child) in root.children.iter().enumerate() {
        if let RenderedNode::Element(element) = child {
            if element.has_class(COLLECTION_CLASS) {
                collect_colors(element, &NodePath(vec![index]), 0, palette, &mut decorations);
            }
        }
    }
    decorations
}

/// Add each color as a class on the node its path names
///
/// Returns how many paths resolved to an element.
pub fn apply_decorations(root: &mut Element, decorations: &Decorations) -> usize {
    let mut applied = 0;
    for (path, color) in decorations {
        if let Some(element) = root.element_at_mut(path.indices()) {
            element.add_class(color.as_str());
            applied += 1;
        }
    }
    applied
}

/// Parse, decorate and re-serialize rendered markup
pub fn decorate_markup(
    markup: &str,
    separator: &str,
    palette: &Palette,
) -> Result<(String, Decorations), MarkupError> {
    let mut root = parse_markup(markup, separator)?;
    let decorations = decorate(&root, palette);
    apply_decorations(&mut root, &decorations);
    Ok((root.to_markup(separator), decorations))
}
