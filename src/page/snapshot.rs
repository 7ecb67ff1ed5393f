use std::path::Path;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::page::document::PageDocument;
use crate::page::error::PageError;
use crate::page::page_model::{ElementDescriptor, LayoutBox, NodeId, UiEvent};

// ============================================================================
// Snapshot file model (JSON or YAML)
// ============================================================================

/// How a field reacts when the engine writes to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldBehavior {
    /// Stores whatever is written.
    #[default]
    Accept,
    /// Framework-controlled field that snaps back to an empty value.
    Revert,
    /// Value writes work but every event dispatch throws.
    RejectEvents,
    /// Value writes throw.
    Faulty,
}

/// One input element as captured in a snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotInput {
    #[serde(flatten)]
    pub element: ElementDescriptor,
    #[serde(default)]
    pub behavior: FieldBehavior,
}

/// An embedded frame and, if it was captured, its document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    #[serde(default)]
    pub src: String,
    #[serde(rename = "sameOrigin", default = "default_true")]
    pub same_origin: bool,
    #[serde(default)]
    pub page: PageSnapshot,
}

/// Serialized page: the format `fill` and `discover` read from disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub inputs: Vec<SnapshotInput>,
    #[serde(default)]
    pub frames: Vec<FrameSnapshot>,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// SnapshotPage: in-memory PageDocument
// ============================================================================

/// What happened to one node while the engine worked on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeActivity {
    pub focus_count: usize,
    pub writes: Vec<String>,
    pub events: Vec<UiEvent>,
}

#[derive(Debug)]
struct SnapshotNode {
    element: ElementDescriptor,
    behavior: FieldBehavior,
    attached: bool,
    activity: NodeActivity,
}

#[derive(Debug)]
struct SnapshotFrame {
    src: String,
    same_origin: bool,
    page: SnapshotPage,
}

/// A page document held in memory, built from a [`PageSnapshot`].
///
/// Inputs can be added, hidden or detached while a fill invocation is in
/// flight, which is how late-rendering pages are reproduced.
#[derive(Debug, Default)]
pub struct SnapshotPage {
    url: Option<String>,
    title: String,
    nodes: Mutex<Vec<SnapshotNode>>,
    frames: Vec<SnapshotFrame>,
}

impl SnapshotPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: PageSnapshot) -> Self {
        let nodes = snapshot
            .inputs
            .into_iter()
            .map(|input| SnapshotNode {
                element: input.element,
                behavior: input.behavior,
                attached: true,
                activity: NodeActivity::default(),
            })
            .collect();

        let frames = snapshot
            .frames
            .into_iter()
            .map(|frame| SnapshotFrame {
                src: frame.src,
                same_origin: frame.same_origin,
                page: SnapshotPage::from_snapshot(frame.page),
            })
            .collect();

        Self {
            url: snapshot.url,
            title: snapshot.title,
            nodes: Mutex::new(nodes),
            frames,
        }
    }

    /// Load a snapshot file; `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, PageError> {
        let shown = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| PageError::SnapshotRead {
            path: shown.clone(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        let snapshot: PageSnapshot = if is_json {
            serde_json::from_str(&content).map_err(|e| PageError::SnapshotParse {
                path: shown.clone(),
                reason: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| PageError::SnapshotParse {
                path: shown.clone(),
                reason: e.to_string(),
            })?
        };

        debug!(
            path = %shown,
            inputs = snapshot.inputs.len(),
            frames = snapshot.frames.len(),
            "loaded page snapshot"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn with_input(self, element: ElementDescriptor) -> Self {
        self.with_input_behavior(element, FieldBehavior::Accept)
    }

    pub fn with_input_behavior(self, element: ElementDescriptor, behavior: FieldBehavior) -> Self {
        self.push_input(element, behavior);
        self
    }

    pub fn with_frame(mut self, src: &str, same_origin: bool, page: SnapshotPage) -> Self {
        self.frames.push(SnapshotFrame {
            src: src.to_string(),
            same_origin,
            page,
        });
        self
    }

    /// Append an input at the end of the document, as a script would.
    pub fn push_input(&self, element: ElementDescriptor, behavior: FieldBehavior) -> NodeId {
        let mut nodes = self.nodes.lock();
        nodes.push(SnapshotNode {
            element,
            behavior,
            attached: true,
            activity: NodeActivity::default(),
        });
        nodes.len() - 1
    }

    pub fn detach(&self, node: NodeId) {
        if let Some(n) = self.nodes.lock().get_mut(node) {
            n.attached = false;
        }
    }

    pub fn set_layout(&self, node: NodeId, layout: LayoutBox) {
        if let Some(n) = self.nodes.lock().get_mut(node) {
            n.element.layout = layout;
        }
    }

    pub fn set_behavior(&self, node: NodeId, behavior: FieldBehavior) {
        if let Some(n) = self.nodes.lock().get_mut(node) {
            n.behavior = behavior;
        }
    }

    pub fn activity(&self, node: NodeId) -> NodeActivity {
        self.nodes
            .lock()
            .get(node)
            .map(|n| n.activity.clone())
            .unwrap_or_default()
    }

    /// Same-origin frame page by index, regardless of the capability check.
    pub fn frame_page(&self, index: usize) -> Option<&SnapshotPage> {
        self.frames.get(index).map(|f| &f.page)
    }

    pub fn frame_src(&self, index: usize) -> Option<&str> {
        self.frames.get(index).map(|f| f.src.as_str())
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn with_attached<T>(
        &self,
        node: NodeId,
        f: impl FnOnce(&mut SnapshotNode) -> Result<T, PageError>,
    ) -> Result<T, PageError> {
        let mut nodes = self.nodes.lock();
        let n = nodes.get_mut(node).ok_or(PageError::ElementNotFound(node))?;
        if !n.attached {
            return Err(PageError::Detached(node));
        }
        f(n)
    }
}

impl PageDocument for SnapshotPage {
    fn input_elements(&self) -> Vec<NodeId> {
        self.nodes
            .lock()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.attached && n.element.is_input())
            .map(|(i, _)| i)
            .collect()
    }

    fn describe(&self, node: NodeId) -> Option<ElementDescriptor> {
        self.nodes.lock().get(node).map(|n| n.element.clone())
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.lock().get(node).map_or(false, |n| n.attached)
    }

    fn focus(&self, node: NodeId) -> Result<(), PageError> {
        self.with_attached(node, |n| {
            n.activity.focus_count += 1;
            Ok(())
        })
    }

    fn set_value(&self, node: NodeId, value: &str) -> Result<(), PageError> {
        self.with_attached(node, |n| {
            n.activity.writes.push(value.to_string());
            match n.behavior {
                FieldBehavior::Accept | FieldBehavior::RejectEvents => {
                    n.element.value = value.to_string();
                    Ok(())
                }
                FieldBehavior::Revert => {
                    n.element.value.clear();
                    Ok(())
                }
                FieldBehavior::Faulty => Err(PageError::WriteRejected {
                    node,
                    reason: "field refuses programmatic writes".into(),
                }),
            }
        })
    }

    fn value(&self, node: NodeId) -> Result<String, PageError> {
        self.with_attached(node, |n| Ok(n.element.value.clone()))
    }

    fn dispatch(&self, node: NodeId, event: UiEvent) -> Result<(), PageError> {
        self.with_attached(node, |n| {
            if n.behavior == FieldBehavior::RejectEvents {
                return Err(PageError::EventFailed {
                    event: event.name(),
                    node,
                    reason: "listener threw".into(),
                });
            }
            n.activity.events.push(event);
            Ok(())
        })
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn frame_document(&self, index: usize) -> Option<&dyn PageDocument> {
        self.frames
            .get(index)
            .filter(|f| f.same_origin)
            .map(|f| &f.page as &dyn PageDocument)
    }
}
