use serde::{Deserialize, Serialize};

/// Index of an element within the document that owns it.
pub type NodeId = usize;

/// Layout facts needed to decide whether an element is on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_display")]
    pub display: String,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(rename = "offsetParent", default = "default_true")]
    pub has_offset_parent: bool,
}

impl Default for LayoutBox {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            display: default_display(),
            visibility: default_visibility(),
            opacity: default_opacity(),
            has_offset_parent: true,
        }
    }
}

impl LayoutBox {
    /// A box that takes no space, as produced by `display: none`.
    pub fn collapsed() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            display: "none".into(),
            visibility: default_visibility(),
            opacity: default_opacity(),
            has_offset_parent: false,
        }
    }
}

/// Read-only attribute snapshot of one input element.
///
/// Everything the classifier and scorer look at lives here; nothing in this
/// struct is mutated by detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(rename = "type", default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(rename = "className", default)]
    pub class_name: Option<String>,
    #[serde(rename = "testId", default)]
    pub test_id: Option<String>,
    #[serde(rename = "dataCy", default)]
    pub data_cy: Option<String>,
    #[serde(rename = "ariaLabel", default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub autocomplete: Option<String>,
    /// Classes of enclosing elements, nearest first.
    #[serde(rename = "containerClasses", default)]
    pub container_classes: Vec<String>,
    /// `data-testid` / `data-cy` values of enclosing elements.
    #[serde(rename = "containerTestIds", default)]
    pub container_test_ids: Vec<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub layout: LayoutBox,
}

/// An empty `<input>` with default layout, same as a snapshot entry that
/// only lists its attributes.
impl Default for ElementDescriptor {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            input_type: None,
            name: None,
            id: None,
            placeholder: None,
            class_name: None,
            test_id: None,
            data_cy: None,
            aria_label: None,
            autocomplete: None,
            container_classes: Vec::new(),
            container_test_ids: Vec::new(),
            value: String::new(),
            readonly: false,
            disabled: false,
            layout: LayoutBox::default(),
        }
    }
}

impl ElementDescriptor {
    /// Declared type as the browser reports it; a missing attribute reads as `text`.
    pub fn declared_type(&self) -> &str {
        self.input_type.as_deref().unwrap_or("text")
    }

    pub fn is_input(&self) -> bool {
        self.tag.eq_ignore_ascii_case("input")
    }

    /// Truly visible and interactable.
    pub fn is_visible(&self) -> bool {
        let layout = &self.layout;
        layout.has_offset_parent
            && layout.width > 0.0
            && layout.height > 0.0
            && layout.display != "none"
            && layout.visibility != "hidden"
            && layout.opacity > 0.0
            && !self.disabled
            && !self.readonly
    }

    /// `tag#id.class1.class2`, the locator reported back to the caller.
    pub fn locator(&self) -> String {
        let mut out = self.tag.to_lowercase();
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            out.push('#');
            out.push_str(id);
        }
        if let Some(classes) = &self.class_name {
            for class in classes.split_whitespace() {
                out.push('.');
                out.push_str(class);
            }
        }
        out
    }
}

/// Synthetic UI events dispatched while filling a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiEvent {
    Focus,
    Input,
    Change,
    Blur,
    KeyDown,
    KeyUp,
}

impl UiEvent {
    /// Fixed order dispatched right after the value is written.
    pub const FILL_SEQUENCE: [UiEvent; 6] = [
        UiEvent::Focus,
        UiEvent::Input,
        UiEvent::Change,
        UiEvent::Blur,
        UiEvent::KeyDown,
        UiEvent::KeyUp,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Focus => "focus",
            UiEvent::Input => "input",
            UiEvent::Change => "change",
            UiEvent::Blur => "blur",
            UiEvent::KeyDown => "keydown",
            UiEvent::KeyUp => "keyup",
        }
    }
}

/// Where a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrigin {
    Primary,
    NestedFrame,
}

// Serde default helpers
fn default_width() -> f32 { 200.0 }
fn default_height() -> f32 { 32.0 }
fn default_display() -> String { "inline-block".to_string() }
fn default_visibility() -> String { "visible".to_string() }
fn default_opacity() -> f32 { 1.0 }
fn default_true() -> bool { true }
fn default_tag() -> String { "input".to_string() }
