//! A2UI Surface
//!
//! One independently addressable UI region: its component definitions, its
//! data model, an optional root and a readiness flag.

use indexmap::IndexMap;
use serde_json::Value;

use super::data_model::{DataEntry, DataModel};
use super::message::{ComponentDefinition, SurfaceStyles};
use super::resolver::{RenderNode, TreeResolver};
use super::value::resolve_value;

/// Lifecycle of a surface.
///
/// `Ready` is terminal: later updates still mutate the surface in place but
/// never revert readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceState {
    /// Created, nothing applied yet
    #[default]
    Empty,
    /// Components or data arrived, no `beginRendering` yet
    Accumulating,
    /// `beginRendering` seen
    Ready,
}

/// Represents a UI surface with its components and data model.
#[derive(Debug, Clone)]
pub struct Surface {
    id: String,

    /// Component definitions by ID, in first-definition order
    components: IndexMap<String, ComponentDefinition>,

    data_model: DataModel,

    /// Root component ID, once `beginRendering` names one
    root_id: Option<String>,

    styles: Option<SurfaceStyles>,

    state: SurfaceState,
}

impl Surface {
    /// Create a new, empty surface
    pub fn new(id: impl Into<String>) -> Self {
        Surface {
            id: id.into(),
            components: IndexMap::new(),
            data_model: DataModel::new(),
            root_id: None,
            styles: None,
            state: SurfaceState::Empty,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SurfaceState::Ready
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root_id.as_deref()
    }

    pub fn styles(&self) -> Option<&SurfaceStyles> {
        self.styles.as_ref()
    }

    pub fn data_model(&self) -> &DataModel {
        &self.data_model
    }

    /// Get a component by ID
    pub fn get_component(&self, id: &str) -> Option<&ComponentDefinition> {
        self.components.get(id)
    }

    /// All component definitions, in first-definition order
    pub fn components(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.components.values()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Whether any component has been defined.
    pub fn has_content(&self) -> bool {
        !self.components.is_empty()
    }

    /// Upsert each definition by id (last write wins). Returns the ids touched.
    pub fn apply_surface_update(&mut self, components: Vec<ComponentDefinition>) -> Vec<String> {
        self.accumulate();
        let mut ids = Vec::with_capacity(components.len());
        for definition in components {
            ids.push(definition.id.clone());
            self.components.insert(definition.id.clone(), definition);
        }
        log::debug!(
            "[A2UI surface] '{}' now has {} components",
            self.id,
            self.components.len()
        );
        ids
    }

    /// Decode `entries` and merge them at `path` (absent means the root).
    pub fn apply_data_model_update(&mut self, path: Option<&str>, entries: &[DataEntry]) {
        self.accumulate();
        self.data_model.apply_entries(path.unwrap_or(""), entries);
    }

    /// Set the root when one is given and mark the surface ready.
    pub fn apply_begin_rendering(&mut self, root: Option<String>, styles: Option<SurfaceStyles>) {
        if let Some(root) = root.filter(|r| !r.is_empty()) {
            self.root_id = Some(root);
        }
        if styles.is_some() {
            self.styles = styles;
        }
        if self.state != SurfaceState::Ready {
            log::info!("[A2UI surface] '{}' ready (root: {:?})", self.id, self.root_id);
        }
        self.state = SurfaceState::Ready;
    }

    /// Resolve a property value against this surface's data model.
    pub fn resolve(&self, value: &Value) -> Option<Value> {
        resolve_value(value, &self.data_model)
    }

    /// Resolve the component tree with the default depth cap.
    pub fn render_tree(&self) -> Option<RenderNode> {
        TreeResolver::default().resolve(self)
    }

    fn accumulate(&mut self) {
        if self.state == SurfaceState::Empty {
            self.state = SurfaceState::Accumulating;
        }
    }
}
