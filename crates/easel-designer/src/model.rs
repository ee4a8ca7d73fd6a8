//! Document model: items, styles, canvas configuration and the document
//! snapshot the reducer transforms.
//!
//! Every type here serializes with camelCase field names so that stored
//! sessions and interchange files read the same as the editor's wire format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Opaque item identifier.
pub type ItemId = String;

/// Opaque group identifier shared by the members of a group.
pub type GroupId = String;

/// Smallest allowed view zoom factor.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed view zoom factor.
pub const MAX_SCALE: f64 = 5.0;
/// Zoom factor of a fresh or freshly imported document.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Visual kind of an item.
///
/// The core never branches on this beyond naming things in history
/// descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Text,
    Heading,
    Image,
    Button,
    Shape,
    Container,
    Divider,
    Video,
    Icon,
}

impl ItemKind {
    /// Human-readable label used when an item has no name of its own.
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Text => "Text",
            ItemKind::Heading => "Heading",
            ItemKind::Image => "Image",
            ItemKind::Button => "Button",
            ItemKind::Shape => "Shape",
            ItemKind::Container => "Container",
            ItemKind::Divider => "Divider",
            ItemKind::Video => "Video",
            ItemKind::Icon => "Icon",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Geometry and decoration of an item.
///
/// `x`, `y`, `width`, `height` and `z_index` are load-bearing; everything
/// else (colors, fonts, borders) is carried opaquely in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub z_index: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Style {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            z_index: 0,
            extra: Map::new(),
        }
    }

    /// Returns (left, top, right, bottom).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Partial style used by `UPDATE`; present fields overwrite, absent fields stay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StylePatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// Sets one decorative field.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Shallow-merges this patch over `style`.
    pub fn apply(&self, style: &Style) -> Style {
        let mut merged = style.clone();
        if let Some(x) = self.x {
            merged.x = x;
        }
        if let Some(y) = self.y {
            merged.y = y;
        }
        if let Some(width) = self.width {
            merged.width = width;
        }
        if let Some(height) = self.height {
            merged.height = height;
        }
        if let Some(z_index) = self.z_index {
            merged.z_index = z_index;
        }
        for (key, value) in &self.extra {
            merged.extra.insert(key.clone(), value.clone());
        }
        merged
    }
}

fn default_visible() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A positioned entity on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub style: Style,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_group: bool,
    /// Containing item, for kinds nested inside a container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ItemId>,
}

impl Item {
    /// Creates a visible, unlocked, ungrouped item.
    pub fn new(id: impl Into<ItemId>, kind: ItemKind, style: Style) -> Self {
        Self {
            id: id.into(),
            kind,
            style,
            props: Map::new(),
            visible: true,
            locked: false,
            group_id: None,
            is_group: false,
            parent_id: None,
        }
    }

    /// Creates an item with a fresh random id.
    pub fn with_generated_id(kind: ItemKind, style: Style) -> Self {
        Self::new(generate_item_id(), kind, style)
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    /// Name shown in history descriptions: the `name` prop when set,
    /// otherwise the kind label.
    pub fn display_name(&self) -> String {
        match self.props.get("name").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => self.kind.label().to_string(),
        }
    }
}

/// Partial item used by `UPDATE`.
///
/// Top-level fields are replaced wholesale; `style` is merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ItemKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StylePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl ItemPatch {
    pub fn style(style: StylePatch) -> Self {
        Self {
            style: Some(style),
            ..Default::default()
        }
    }

    pub fn props(props: Map<String, Value>) -> Self {
        Self {
            props: Some(props),
            ..Default::default()
        }
    }

    pub fn apply(&self, item: &Item) -> Item {
        let mut merged = item.clone();
        if let Some(kind) = self.kind {
            merged.kind = kind;
        }
        if let Some(style) = &self.style {
            merged.style = style.apply(&item.style);
        }
        if let Some(props) = &self.props {
            merged.props = props.clone();
        }
        if let Some(visible) = self.visible {
            merged.visible = visible;
        }
        if let Some(locked) = self.locked {
            merged.locked = locked;
        }
        merged
    }
}

/// Canvas size and background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_background() -> String {
    "#ffffff".to_string()
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            background: default_background(),
        }
    }
}

/// Partial canvas configuration used by `SET_CANVAS_CONFIG`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl CanvasConfigPatch {
    pub fn apply(&self, config: &CanvasConfig) -> CanvasConfig {
        CanvasConfig {
            width: self.width.unwrap_or(config.width),
            height: self.height.unwrap_or(config.height),
            background: self
                .background
                .clone()
                .unwrap_or_else(|| config.background.clone()),
        }
    }
}

/// Orientation of an alignment guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// A horizontal line; `position` is a y coordinate.
    Horizontal,
    /// A vertical line; `position` is an x coordinate.
    Vertical,
}

/// An alignment guide to draw while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapLine {
    pub orientation: Orientation,
    pub position: f64,
}

impl SnapLine {
    pub fn vertical(x: f64) -> Self {
        Self {
            orientation: Orientation::Vertical,
            position: x,
        }
    }

    pub fn horizontal(y: f64) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            position: y,
        }
    }
}

/// Auxiliary editor panels whose visibility travels with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Layers,
    Properties,
    History,
}

/// Panel visibility flags. Opaque to the reducer beyond storing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelFlags {
    pub layers: bool,
    pub properties: bool,
    pub history: bool,
}

impl Default for PanelFlags {
    fn default() -> Self {
        Self {
            layers: true,
            properties: true,
            history: false,
        }
    }
}

impl PanelFlags {
    pub fn get(&self, panel: Panel) -> bool {
        match panel {
            Panel::Layers => self.layers,
            Panel::Properties => self.properties,
            Panel::History => self.history,
        }
    }

    pub fn set(&mut self, panel: Panel, visible: bool) {
        match panel {
            Panel::Layers => self.layers = visible,
            Panel::Properties => self.properties = visible,
            Panel::History => self.history = visible,
        }
    }
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

/// The present snapshot of an edited document.
///
/// `items` is in z-order, back to front. Snap lines are per-frame feedback
/// and are never written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub selected_id: Option<ItemId>,
    #[serde(default)]
    pub selected_ids: Vec<ItemId>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub canvas_config: CanvasConfig,
    #[serde(skip_serializing, default)]
    pub snap_lines: Vec<SnapLine>,
    #[serde(default)]
    pub panels: PanelFlags,
}

impl Default for Document {
    fn default() -> Self {
        Self::with_canvas(CanvasConfig::default())
    }
}

impl Document {
    /// Creates an empty document on a canvas.
    pub fn with_canvas(canvas_config: CanvasConfig) -> Self {
        Self {
            items: Vec::new(),
            selected_id: None,
            selected_ids: Vec::new(),
            scale: DEFAULT_SCALE,
            canvas_config,
            snap_lines: Vec::new(),
            panels: PanelFlags::default(),
        }
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|selected| selected == id)
    }

    /// Ids of every member of `group_id`, in z-order.
    pub fn group_members(&self, group_id: &str) -> Vec<&ItemId> {
        self.items
            .iter()
            .filter(|item| item.group_id.as_deref() == Some(group_id))
            .map(|item| &item.id)
            .collect()
    }

    /// Group id → member ids, rebuilt from the items' back-references.
    pub fn group_index(&self) -> HashMap<&str, Vec<&str>> {
        group_index(&self.items)
    }
}

/// Group id → member ids, in z-order.
pub fn group_index(items: &[Item]) -> HashMap<&str, Vec<&str>> {
    let mut index: HashMap<&str, Vec<&str>> = HashMap::new();
    for item in items {
        if let Some(group_id) = item.group_id.as_deref() {
            index.entry(group_id).or_default().push(item.id.as_str());
        }
    }
    index
}

/// Generates a fresh item id.
pub fn generate_item_id() -> ItemId {
    format!("item-{}", uuid::Uuid::new_v4())
}

/// Generates a fresh group id.
pub fn generate_group_id() -> GroupId {
    format!("group-{}", uuid::Uuid::new_v4())
}
