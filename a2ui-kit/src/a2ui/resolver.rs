//! A2UI Component Tree Resolver
//!
//! Turns a surface (flat component definitions plus a data model) into a
//! tree of [`RenderNode`]s with every bound value looked up.
//!
//! Component graphs come from a language model, so they may be dangling,
//! cyclic or absurdly deep. Resolution is total: a bad branch becomes `None`
//! or a placeholder node, never a panic or an error.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use super::action::ButtonAction;
use super::catalog::ComponentKind;
use super::config::{A2uiConfig, DEFAULT_MAX_DEPTH};
use super::error::ResolveError;
use super::message::{ComponentDefinition, ComponentType};
use super::surface::Surface;
use super::value::{resolve_value_scoped, scoped_path};

/// Type tag of the synthetic node holding implicit roots.
pub const GROUP_TAG: &str = "Group";

/// What a render node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// A component from the catalog
    Component,
    /// A type tag outside the catalog; rendered as a placeholder
    UnknownType,
    /// A component that failed to resolve; rendered as a placeholder
    Error,
    /// Sibling implicit roots of a surface without a usable root
    Group,
}

/// Resolved children of a node.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum RenderChildren {
    #[default]
    None,
    Single(Box<RenderNode>),
    /// Positions are kept; dangling or cyclic entries are `None`
    List(Vec<Option<RenderNode>>),
}

/// A component ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub kind: NodeKind,

    /// Catalog lookup key
    pub type_tag: String,

    /// Properties with bound values resolved; unresolvable ones are omitted
    pub props: Map<String, Value>,

    pub children: RenderChildren,

    /// Present on Button nodes that declare an action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ButtonAction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenderNode {
    fn new(id: Option<String>, kind: NodeKind, type_tag: impl Into<String>) -> Self {
        RenderNode {
            id,
            kind,
            type_tag: type_tag.into(),
            props: Map::new(),
            children: RenderChildren::None,
            action: None,
            error: None,
        }
    }

    /// The catalog kind, for component nodes
    pub fn component_kind(&self) -> Option<ComponentKind> {
        match self.kind {
            NodeKind::Component => ComponentKind::parse(&self.type_tag),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, NodeKind::UnknownType | NodeKind::Error)
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Resolved children, skipping empty positions
    pub fn child_nodes(&self) -> Vec<&RenderNode> {
        match &self.children {
            RenderChildren::None => Vec::new(),
            RenderChildren::Single(child) => vec![child.as_ref()],
            RenderChildren::List(children) => children.iter().flatten().collect(),
        }
    }

    /// Depth-first search by component id
    pub fn find(&self, id: &str) -> Option<&RenderNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.child_nodes().into_iter().find_map(|child| child.find(id))
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self
            .child_nodes()
            .into_iter()
            .map(RenderNode::node_count)
            .sum::<usize>()
    }
}

/// One step of the current branch; the chain up to the root is the set of
/// ids already on the path.
struct Branch<'a> {
    id: &'a str,
    parent: Option<&'a Branch<'a>>,
}

impl Branch<'_> {
    fn contains(&self, id: &str) -> bool {
        let mut current = Some(self);
        while let Some(branch) = current {
            if branch.id == id {
                return true;
            }
            current = branch.parent;
        }
        false
    }
}

/// Surface-to-tree resolver.
///
/// # Example
///
/// ```rust,ignore
/// let resolver = TreeResolver::new(20);
/// if let Some(tree) = resolver.resolve(&surface) {
///     render(&tree);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeResolver {
    max_depth: usize,
}

impl Default for TreeResolver {
    fn default() -> Self {
        TreeResolver::new(DEFAULT_MAX_DEPTH)
    }
}

impl TreeResolver {
    pub fn new(max_depth: usize) -> Self {
        TreeResolver { max_depth }
    }

    pub fn with_config(config: &A2uiConfig) -> Self {
        TreeResolver::new(config.max_depth)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolve a whole surface.
    ///
    /// A defined root wins. Otherwise every component no other component
    /// references becomes a child of a [`NodeKind::Group`] node, in
    /// definition order. A surface without components resolves to `None`.
    pub fn resolve(&self, surface: &Surface) -> Option<RenderNode> {
        if let Some(root) = surface.root_id() {
            if surface.get_component(root).is_some() {
                return self.resolve_component(surface, root);
            }
            log::debug!(
                "[A2UI resolver] Root '{}' of '{}' is not defined yet, using implicit roots",
                root,
                surface.id()
            );
        }

        if !surface.has_content() {
            return None;
        }

        let referenced = referenced_ids(surface);
        let children = surface
            .components()
            .filter(|def| !referenced.contains(def.id.as_str()))
            .filter_map(|def| self.resolve_component(surface, &def.id))
            .map(Some)
            .collect();

        let mut group = RenderNode::new(None, NodeKind::Group, GROUP_TAG);
        group.children = RenderChildren::List(children);
        Some(group)
    }

    /// Resolve the subtree rooted at one component.
    pub fn resolve_component(&self, surface: &Surface, id: &str) -> Option<RenderNode> {
        self.resolve_id(surface, id, None, None, 0)
    }

    fn resolve_id(
        &self,
        surface: &Surface,
        id: &str,
        scope: Option<&str>,
        parent: Option<&Branch<'_>>,
        depth: usize,
    ) -> Option<RenderNode> {
        if depth > self.max_depth {
            log::warn!(
                "[A2UI resolver] Depth limit {} reached at '{}', pruning branch",
                self.max_depth,
                id
            );
            return None;
        }
        if parent.is_some_and(|branch| branch.contains(id)) {
            log::warn!("[A2UI resolver] Cycle at '{}', pruning branch", id);
            return None;
        }
        let Some(definition) = surface.get_component(id) else {
            log::debug!("[A2UI resolver] Dangling reference to '{}'", id);
            return None;
        };

        let branch = Branch {
            id: definition.id.as_str(),
            parent,
        };

        match self.build_node(surface, definition, scope, &branch, depth) {
            Ok(node) => Some(node),
            Err(e) => {
                log::warn!("[A2UI resolver] Failed to resolve '{}': {}", id, e);
                let mut node = RenderNode::new(
                    Some(definition.id.clone()),
                    NodeKind::Error,
                    definition.component.type_name(),
                );
                node.error = Some(e.to_string());
                Some(node)
            }
        }
    }

    fn build_node(
        &self,
        surface: &Surface,
        definition: &ComponentDefinition,
        scope: Option<&str>,
        branch: &Branch<'_>,
        depth: usize,
    ) -> Result<RenderNode, ResolveError> {
        let id = Some(definition.id.clone());

        let (kind, props) = match &definition.component {
            ComponentType::Known { kind, props } => (*kind, props),
            ComponentType::Unknown { type_name, .. } => {
                log::warn!(
                    "[A2UI resolver] Unknown component type '{}' for '{}'",
                    type_name,
                    definition.id
                );
                return Ok(RenderNode::new(id, NodeKind::UnknownType, type_name.as_str()));
            }
        };

        let empty = Map::new();
        let props = match props {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => {
                return Err(ResolveError::InvalidProps {
                    type_name: kind.name().to_string(),
                });
            }
        };

        let data_model = surface.data_model();
        let mut node = RenderNode::new(id, NodeKind::Component, kind.name());

        for (key, value) in props {
            match key.as_str() {
                "child" | "children" => continue,
                "action" if kind == ComponentKind::Button => continue,
                _ => {}
            }
            if let Some(resolved) = resolve_value_scoped(value, data_model, scope) {
                node.props.insert(key.clone(), resolved);
            }
        }

        if kind == ComponentKind::Button {
            node.action = props.get("action").map(|action| {
                ButtonAction::from_value(action, data_model, scope, surface.id(), &definition.id)
            });
        }

        node.children = self.resolve_children(surface, props, scope, branch, depth)?;
        Ok(node)
    }

    fn resolve_children(
        &self,
        surface: &Surface,
        props: &Map<String, Value>,
        scope: Option<&str>,
        branch: &Branch<'_>,
        depth: usize,
    ) -> Result<RenderChildren, ResolveError> {
        match props.get("children") {
            None | Some(Value::Null) => {}
            Some(children) => {
                return match parse_children(children)? {
                    ChildRefs::List(ids) => Ok(RenderChildren::List(
                        ids.into_iter()
                            .map(|id| self.resolve_id(surface, id, scope, Some(branch), depth + 1))
                            .collect(),
                    )),
                    ChildRefs::Template {
                        component_id,
                        data_binding,
                    } => Ok(RenderChildren::List(self.expand_template(
                        surface,
                        component_id,
                        data_binding,
                        scope,
                        branch,
                        depth,
                    ))),
                };
            }
        }

        match props.get("child") {
            None | Some(Value::Null) => Ok(RenderChildren::None),
            Some(Value::String(child)) => Ok(self
                .resolve_id(surface, child, scope, Some(branch), depth + 1)
                .map_or(RenderChildren::None, |node| RenderChildren::Single(Box::new(node)))),
            Some(other) => Err(ResolveError::InvalidChild {
                found: other.to_string(),
            }),
        }
    }

    /// One child per element of the bound collection, each scoped to its
    /// element's path.
    fn expand_template(
        &self,
        surface: &Surface,
        component_id: &str,
        data_binding: &str,
        scope: Option<&str>,
        branch: &Branch<'_>,
        depth: usize,
    ) -> Vec<Option<RenderNode>> {
        let path = scoped_path(data_binding, scope);
        let base = path.trim_end_matches('/');

        let item_keys: Vec<String> = match surface.data_model().get(&path) {
            Some(Value::Array(items)) => (0..items.len()).map(|i| i.to_string()).collect(),
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            _ => {
                log::debug!("[A2UI resolver] Template binding '{}' is not a collection", path);
                Vec::new()
            }
        };

        item_keys
            .into_iter()
            .map(|key| {
                let item_scope = format!("{}/{}", base, key);
                self.resolve_id(surface, component_id, Some(&item_scope), Some(branch), depth + 1)
            })
            .collect()
    }
}

/// Child references declared by one component.
enum ChildRefs<'a> {
    List(Vec<&'a str>),
    Template {
        component_id: &'a str,
        data_binding: &'a str,
    },
}

fn parse_children(children: &Value) -> Result<ChildRefs<'_>, ResolveError> {
    match children {
        // Bare arrays are a common shorthand for explicitList.
        Value::Array(items) => id_list(items).map(ChildRefs::List),
        Value::Object(map) => {
            if let Some(list) = map.get("explicitList") {
                let Value::Array(items) = list else {
                    return Err(ResolveError::InvalidChildren {
                        reason: "explicitList is not an array".to_string(),
                    });
                };
                return id_list(items).map(ChildRefs::List);
            }
            if let Some(template) = map.get("template") {
                let field = |name: &str| template.get(name).and_then(Value::as_str);
                return match (field("componentId"), field("dataBinding")) {
                    (Some(component_id), Some(data_binding)) => Ok(ChildRefs::Template {
                        component_id,
                        data_binding,
                    }),
                    _ => Err(ResolveError::InvalidChildren {
                        reason: "template needs string componentId and dataBinding".to_string(),
                    }),
                };
            }
            Err(ResolveError::InvalidChildren {
                reason: "expected explicitList or template".to_string(),
            })
        }
        other => Err(ResolveError::InvalidChildren {
            reason: format!("unexpected {}", other),
        }),
    }
}

fn id_list(items: &[Value]) -> Result<Vec<&str>, ResolveError> {
    items
        .iter()
        .map(|item| {
            item.as_str().ok_or_else(|| ResolveError::InvalidChildren {
                reason: format!("child id must be a string, got {}", item),
            })
        })
        .collect()
}

/// Ids referenced by any component as a child, list member or template.
fn referenced_ids(surface: &Surface) -> HashSet<&str> {
    let mut referenced = HashSet::new();
    for definition in surface.components() {
        let Value::Object(props) = definition.component.props() else {
            continue;
        };
        if let Some(Value::String(child)) = props.get("child") {
            referenced.insert(child.as_str());
        }
        if let Some(children) = props.get("children") {
            match parse_children(children) {
                Ok(ChildRefs::List(ids)) => referenced.extend(ids),
                Ok(ChildRefs::Template { component_id, .. }) => {
                    referenced.insert(component_id);
                }
                Err(_) => {}
            }
        }
    }
    referenced
}
