//! A2UI Surface Manager
//!
//! Owns every surface of a conversation and routes messages to them.

use indexmap::IndexMap;
use indexmap::map::Entry;

use super::config::A2uiConfig;
use super::message::A2uiMessage;
use super::sse::parse_messages;
use super::surface::Surface;

/// Events emitted while applying messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A message referenced a surface that did not exist yet
    Created { surface_id: String },
    /// Components were upserted
    ComponentsUpdated { surface_id: String, ids: Vec<String> },
    /// Data was merged at `path`
    DataModelUpdated { surface_id: String, path: String },
    /// `beginRendering` was applied
    Ready { surface_id: String, root: Option<String> },
    /// The surface was removed
    Deleted { surface_id: String },
}

impl SurfaceEvent {
    pub fn surface_id(&self) -> &str {
        match self {
            SurfaceEvent::Created { surface_id }
            | SurfaceEvent::ComponentsUpdated { surface_id, .. }
            | SurfaceEvent::DataModelUpdated { surface_id, .. }
            | SurfaceEvent::Ready { surface_id, .. }
            | SurfaceEvent::Deleted { surface_id } => surface_id,
        }
    }
}

/// Registry of surfaces keyed by id.
///
/// One manager per conversation or rendering session; there is no global
/// instance. Surfaces are created lazily on first reference and removed only
/// by `deleteSurface` or [`reset`](Self::reset).
///
/// # Example
///
/// ```rust,ignore
/// let mut manager = SurfaceManager::new();
/// let events = manager.process_content(llm_response);
///
/// if let Some(surface) = manager.default_surface() {
///     let tree = surface.render_tree();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SurfaceManager {
    /// Active surfaces by ID, in creation order
    surfaces: IndexMap<String, Surface>,

    /// Surface receiving messages without a `surfaceId`
    default_surface_id: String,
}

impl Default for SurfaceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceManager {
    pub fn new() -> Self {
        Self::with_config(&A2uiConfig::default())
    }

    pub fn with_config(config: &A2uiConfig) -> Self {
        SurfaceManager {
            surfaces: IndexMap::new(),
            default_surface_id: config.default_surface_id.clone(),
        }
    }

    pub fn default_surface_id(&self) -> &str {
        &self.default_surface_id
    }

    /// Apply a single message in stream order.
    ///
    /// Returns a list of events that occurred as a result of processing.
    pub fn process_message(&mut self, message: A2uiMessage) -> Vec<SurfaceEvent> {
        let mut events = Vec::new();

        match message {
            A2uiMessage::SurfaceUpdate(msg) => {
                let surface = self.ensure_surface(msg.surface_id.as_deref(), &mut events);
                let ids = surface.apply_surface_update(msg.components);
                events.push(SurfaceEvent::ComponentsUpdated {
                    surface_id: surface.id().to_string(),
                    ids,
                });
            }
            A2uiMessage::DataModelUpdate(msg) => {
                let surface = self.ensure_surface(msg.surface_id.as_deref(), &mut events);
                let Some(contents) = msg.contents else {
                    log::debug!("[A2UI manager] dataModelUpdate for '{}' has no contents", surface.id());
                    return events;
                };
                surface.apply_data_model_update(msg.path.as_deref(), &contents);
                let path = msg.path.filter(|p| !p.is_empty()).unwrap_or_else(|| "/".to_string());
                events.push(SurfaceEvent::DataModelUpdated {
                    surface_id: surface.id().to_string(),
                    path,
                });
            }
            A2uiMessage::BeginRendering(msg) => {
                let surface = self.ensure_surface(msg.surface_id.as_deref(), &mut events);
                surface.apply_begin_rendering(msg.root, msg.styles);
                events.push(SurfaceEvent::Ready {
                    surface_id: surface.id().to_string(),
                    root: surface.root_id().map(str::to_string),
                });
            }
            A2uiMessage::DeleteSurface(msg) => {
                if self.delete_surface(&msg.surface_id) {
                    events.push(SurfaceEvent::Deleted {
                        surface_id: msg.surface_id,
                    });
                }
            }
        }

        events
    }

    /// Process multiple A2UI messages in order
    pub fn process_messages(&mut self, messages: Vec<A2uiMessage>) -> Vec<SurfaceEvent> {
        let mut events = Vec::new();
        for message in messages {
            events.extend(self.process_message(message));
        }
        events
    }

    /// Parse a complete response text and apply every message in it.
    pub fn process_content(&mut self, text: &str) -> Vec<SurfaceEvent> {
        self.process_messages(parse_messages(text))
    }

    /// Get a surface by ID
    pub fn get_surface(&self, surface_id: &str) -> Option<&Surface> {
        self.surfaces.get(surface_id)
    }

    /// The surface that id-less messages go to
    pub fn default_surface(&self) -> Option<&Surface> {
        self.surfaces.get(&self.default_surface_id)
    }

    /// Surfaces that have seen `beginRendering`
    pub fn ready_surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.values().filter(|s| s.is_ready())
    }

    /// All surfaces, in creation order
    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.values()
    }

    /// Get all surface IDs
    pub fn surface_ids(&self) -> impl Iterator<Item = &str> {
        self.surfaces.keys().map(String::as_str)
    }

    /// Remove a surface. Returns whether it existed.
    pub fn delete_surface(&mut self, surface_id: &str) -> bool {
        if surface_id.is_empty() {
            log::debug!("[A2UI manager] Ignoring deleteSurface with empty id");
            return false;
        }
        match self.surfaces.shift_remove(surface_id) {
            Some(_) => {
                log::info!("[A2UI manager] Deleted surface '{}'", surface_id);
                true
            }
            None => {
                log::debug!("[A2UI manager] deleteSurface for unknown surface '{}'", surface_id);
                false
            }
        }
    }

    /// Drop every surface
    pub fn reset(&mut self) {
        self.surfaces.clear();
    }

    /// Whether any surface holds components
    pub fn has_content(&self) -> bool {
        self.surfaces.values().any(Surface::has_content)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    fn ensure_surface(
        &mut self,
        surface_id: Option<&str>,
        events: &mut Vec<SurfaceEvent>,
    ) -> &mut Surface {
        let id = surface_id
            .filter(|id| !id.is_empty())
            .unwrap_or(self.default_surface_id.as_str())
            .to_string();

        match self.surfaces.entry(id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let id = entry.key().clone();
                log::info!("[A2UI manager] Created surface '{}'", id);
                events.push(SurfaceEvent::Created {
                    surface_id: id.clone(),
                });
                entry.insert(Surface::new(id))
            }
        }
    }
}
