//! A2UI Component Catalog
//!
//! Names the component types the resolver understands and maps type tags to
//! whatever widget implementation a renderer provides.

use std::collections::HashMap;
use std::fmt;

/// Component type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    // Layout
    Column,
    Row,
    List,
    Card,

    // Display
    Text,
    Image,
    Icon,
    Divider,

    // Interactive
    Button,
    TextField,
    CheckBox,
    Slider,
    MultipleChoice,

    // Container
    Modal,
    Tabs,
}

impl ComponentKind {
    /// Get the A2UI component type name
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Column => "Column",
            ComponentKind::Row => "Row",
            ComponentKind::List => "List",
            ComponentKind::Card => "Card",
            ComponentKind::Text => "Text",
            ComponentKind::Image => "Image",
            ComponentKind::Icon => "Icon",
            ComponentKind::Divider => "Divider",
            ComponentKind::Button => "Button",
            ComponentKind::TextField => "TextField",
            ComponentKind::CheckBox => "CheckBox",
            ComponentKind::Slider => "Slider",
            ComponentKind::MultipleChoice => "MultipleChoice",
            ComponentKind::Modal => "Modal",
            ComponentKind::Tabs => "Tabs",
        }
    }

    /// Parse from a type tag. Matching is exact and case-sensitive.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|kind| kind.name() == s)
    }

    /// Get all component types
    pub fn all() -> &'static [ComponentKind] {
        &[
            ComponentKind::Column,
            ComponentKind::Row,
            ComponentKind::List,
            ComponentKind::Card,
            ComponentKind::Text,
            ComponentKind::Image,
            ComponentKind::Icon,
            ComponentKind::Divider,
            ComponentKind::Button,
            ComponentKind::TextField,
            ComponentKind::CheckBox,
            ComponentKind::Slider,
            ComponentKind::MultipleChoice,
            ComponentKind::Modal,
            ComponentKind::Tabs,
        ]
    }

    /// Whether the type lays out other components.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ComponentKind::Column
                | ComponentKind::Row
                | ComponentKind::List
                | ComponentKind::Card
                | ComponentKind::Modal
                | ComponentKind::Tabs
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pluggable mapping from type tag to a widget implementation.
///
/// Lookup is an exact string match. Flagging unknown types is the tree
/// resolver's job, so a missing entry here just means the renderer has no
/// widget for that tag.
///
/// # Example
///
/// ```rust,ignore
/// let mut catalog: Catalog<fn(&RenderNode) -> String> = Catalog::new();
/// catalog.register("Text", render_text);
///
/// if let Some(render) = catalog.get(&node.type_tag) {
///     println!("{}", render(&node));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Catalog<W> {
    widgets: HashMap<String, W>,
}

impl<W> Default for Catalog<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Catalog<W> {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Catalog {
            widgets: HashMap::new(),
        }
    }

    /// Register a widget for a type tag, returning the one it replaces.
    pub fn register(&mut self, type_tag: impl Into<String>, widget: W) -> Option<W> {
        self.widgets.insert(type_tag.into(), widget)
    }

    /// Register a widget for a known component kind.
    pub fn register_kind(&mut self, kind: ComponentKind, widget: W) -> Option<W> {
        self.register(kind.name(), widget)
    }

    /// Get the widget for a type tag
    pub fn get(&self, type_tag: &str) -> Option<&W> {
        self.widgets.get(type_tag)
    }

    /// Check if a type tag has a widget
    pub fn contains(&self, type_tag: &str) -> bool {
        self.widgets.contains_key(type_tag)
    }

    /// Known component kinds without a registered widget
    pub fn missing_kinds(&self) -> Vec<ComponentKind> {
        ComponentKind::all()
            .iter()
            .copied()
            .filter(|kind| !self.contains(kind.name()))
            .collect()
    }

    /// Number of registered widgets
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
