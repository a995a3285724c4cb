//! The element tree model.
//!
//! An [`Element`] is one visual unit on a slide: a type tag, a free-form
//! property bag, and (for containers) an ordered list of child elements.
//! Element ids are unique across a whole page, at every depth.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Free-form property bag carried by every element.
pub type Props = Map<String, Value>;

// ---------------------------------------------------------------------------
// Element type
// ---------------------------------------------------------------------------

/// The closed set of element types the builder knows how to edit and render.
///
/// Type strings this build does not recognise are kept verbatim in
/// [`ElementType::Unknown`] so that content written by a newer editor
/// survives a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementType {
    Text,
    Image,
    Button,
    Divider,
    Video,
    Map,
    Spacer,
    Countdown,
    Rsvp,
    Guestbook,
    Gallery,
    Container,
    Unknown(String),
}

impl ElementType {
    /// Every known element type, in palette order.
    pub const KNOWN: &'static [ElementType] = &[
        ElementType::Text,
        ElementType::Image,
        ElementType::Button,
        ElementType::Divider,
        ElementType::Video,
        ElementType::Map,
        ElementType::Spacer,
        ElementType::Countdown,
        ElementType::Rsvp,
        ElementType::Guestbook,
        ElementType::Gallery,
        ElementType::Container,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Button => "button",
            ElementType::Divider => "divider",
            ElementType::Video => "video",
            ElementType::Map => "map",
            ElementType::Spacer => "spacer",
            ElementType::Countdown => "countdown",
            ElementType::Rsvp => "rsvp",
            ElementType::Guestbook => "guestbook",
            ElementType::Gallery => "gallery",
            ElementType::Container => "container",
            ElementType::Unknown(other) => other,
        }
    }

    /// Whether elements of this type are created with a child list.
    pub fn is_container(&self) -> bool {
        matches!(self, ElementType::Container)
    }
}

impl From<&str> for ElementType {
    fn from(value: &str) -> Self {
        match value {
            "text" => ElementType::Text,
            "image" => ElementType::Image,
            "button" => ElementType::Button,
            "divider" => ElementType::Divider,
            "video" => ElementType::Video,
            "map" => ElementType::Map,
            "spacer" => ElementType::Spacer,
            "countdown" => ElementType::Countdown,
            "rsvp" => ElementType::Rsvp,
            "guestbook" => ElementType::Guestbook,
            "gallery" => ElementType::Gallery,
            "container" => ElementType::Container,
            other => ElementType::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ElementType {
    fn from(value: String) -> Self {
        ElementType::from(value.as_str())
    }
}

impl From<ElementType> for String {
    fn from(value: ElementType) -> Self {
        match value {
            ElementType::Unknown(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// A node of the element tree.
///
/// `children` is `None` for leaf types. Content saved by older editors keeps
/// nested elements under `elements`; that key is accepted on read and
/// written back as `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    #[serde(default)]
    pub props: Props,
    #[serde(default, alias = "elements", skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,
}

impl Element {
    /// Create a new element of `kind` with a fresh id and the type's
    /// default properties. Containers start with an empty child list.
    pub fn new(kind: ElementType) -> Self {
        let props = default_props(&kind);
        let children = kind.is_container().then(Vec::new);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            props,
            children,
        }
    }

    /// Create a leaf element with an explicit id and property bag.
    pub fn leaf(id: impl Into<String>, kind: ElementType, props: Props) -> Self {
        Self {
            id: id.into(),
            kind,
            props,
            children: None,
        }
    }

    /// Create a container element with an explicit id and children.
    pub fn container(id: impl Into<String>, props: Props, children: Vec<Element>) -> Self {
        Self {
            id: id.into(),
            kind: ElementType::Container,
            props,
            children: Some(children),
        }
    }

    /// Copy this node's own fields, substituting a new child list.
    pub fn with_children(&self, children: Vec<Element>) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind.clone(),
            props: self.props.clone(),
            children: Some(children),
        }
    }

    /// Copy this node with `patch` shallow-merged over its props.
    pub fn with_merged_props(&self, patch: &Props) -> Self {
        let mut props = self.props.clone();
        for (key, value) in patch {
            props.insert(key.clone(), value.clone());
        }
        Self {
            props,
            ..self.clone()
        }
    }

    /// Children as a slice, empty for leaves.
    pub fn child_slice(&self) -> &[Element] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Default property bag for a newly created element of `kind`.
pub fn default_props(kind: &ElementType) -> Props {
    let value = match kind {
        ElementType::Text => json!({
            "content": "Add your text here",
            "align": "left",
            "fontSize": "16px",
            "color": "#000000",
            "fontWeight": "normal",
        }),
        ElementType::Image => json!({
            "src": "https://placehold.co/600x400",
            "alt": "Image",
            "width": "100%",
            "align": "center",
        }),
        ElementType::Button => json!({
            "text": "Click Me",
            "link": "#",
            "variant": "default",
            "align": "center",
        }),
        ElementType::Video => json!({
            "url": "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "height": "300px",
        }),
        ElementType::Map => json!({
            "keyword": "Monas, Jakarta",
            "height": "300px",
        }),
        ElementType::Divider => json!({
            "color": "#e5e7eb",
            "width": "100%",
            "style": "solid",
            "thickness": "1px",
        }),
        ElementType::Spacer => json!({ "height": "50px" }),
        ElementType::Countdown => json!({
            "targetDate": "2025-12-31T23:59",
            "color": "#000000",
            "bgColor": "#f3f4f6",
        }),
        ElementType::Rsvp => json!({
            "title": "RSVP",
            "description": "Please let us know if you will attend",
        }),
        ElementType::Guestbook => json!({
            "title": "Guestbook",
            "description": "Leave a message for us!",
        }),
        ElementType::Gallery => json!({
            "images": "https://placehold.co/400x400\nhttps://placehold.co/400x400\nhttps://placehold.co/400x400",
        }),
        ElementType::Container => json!({
            "layout": "horizontal",
            "gap": "16px",
            "width": "100%",
            "justifyContent": "flex-start",
            "alignItems": "flex-start",
            "flexWrap": "nowrap",
        }),
        ElementType::Unknown(_) => json!({}),
    };

    match value {
        Value::Object(map) => map,
        _ => Props::new(),
    }
}
