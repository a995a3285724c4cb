//! Virtual HTML nodes produced by the renderer.

/// Virtual HTML node.
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    Element(VElement),
    /// Text content, escaped on output.
    Text(String),
    /// Pre-built markup or stylesheet/script body, written as is.
    Raw(String),
    Fragment(Vec<VNode>),
}

impl VNode {
    pub fn text(text: impl Into<String>) -> Self {
        VNode::Text(text.into())
    }

    pub fn empty() -> Self {
        VNode::Fragment(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, VNode::Fragment(children) if children.is_empty())
    }
}

/// Virtual element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub class_names: Vec<String>,
    pub inline_styles: Vec<(String, String)>,
    pub children: Vec<VNode>,
}

impl VElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        if !class_name.is_empty() {
            self.class_names.push(class_name);
        }
        self
    }

    pub fn style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inline_styles.push((name.into(), value.into()));
        self
    }

    /// Set a style only when a value is present.
    pub fn style_opt(self, name: &str, value: Option<&String>) -> Self {
        match value {
            Some(v) => self.style(name, v.as_str()),
            None => self,
        }
    }

    pub fn styles<I, K>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = (K, String)>,
        K: Into<String>,
    {
        self.inline_styles
            .extend(styles.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    pub fn child(mut self, node: impl Into<VNode>) -> Self {
        let node = node.into();
        if !node.is_empty() {
            self.children.push(node);
        }
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = VNode>,
    {
        self.children
            .extend(nodes.into_iter().filter(|n| !n.is_empty()));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<VElement> for VNode {
    fn from(element: VElement) -> Self {
        VNode::Element(element)
    }
}
