//! Render tree handed to the external compositor.
//!
//! # Responsibility
//! - Describe view output as typed nodes: elements, text leaves and
//!   delegations to other named views (checkbox, edit-text, link).
//!
//! # Invariants
//! - Attribute iteration order is deterministic.
//! - The core never materializes nodes onto a display surface.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderNode {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<RenderNode>,
    },
    Text {
        text: String,
    },
    /// Placeholder materialized by another named view.
    Delegate {
        view: String,
        attributes: BTreeMap<String, String>,
        children: Vec<RenderNode>,
    },
}

impl RenderNode {
    /// Empty element node.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Node handing rendering to the named compositor view.
    pub fn delegate(view: impl Into<String>) -> Self {
        Self::Delegate {
            view: view.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute. No-op on text leaves.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attributes, .. } | Self::Delegate { attributes, .. } = &mut self {
            attributes.insert(name.into(), value.into());
        }
        self
    }

    /// Appends a child. No-op on text leaves.
    pub fn child(mut self, node: RenderNode) -> Self {
        if let Self::Element { children, .. } | Self::Delegate { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    pub fn children_from(mut self, nodes: impl IntoIterator<Item = RenderNode>) -> Self {
        if let Self::Element { children, .. } | Self::Delegate { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    /// Element tag or delegate view name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag.as_str()),
            Self::Delegate { view, .. } => Some(view.as_str()),
            Self::Text { .. } => None,
        }
    }

    /// Attribute value on elements and delegates; text nodes have none.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element { attributes, .. } | Self::Delegate { attributes, .. } => {
                attributes.get(name).map(String::as_str)
            }
            Self::Text { .. } => None,
        }
    }

    /// Child nodes; empty for text.
    pub fn children(&self) -> &[RenderNode] {
        match self {
            Self::Element { children, .. } | Self::Delegate { children, .. } => children.as_slice(),
            Self::Text { .. } => &[],
        }
    }

    /// Concatenated text of this subtree in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { text } => out.push_str(text),
            _ => self
                .children()
                .iter()
                .for_each(|child| child.collect_text(out)),
        }
    }

    /// Depth-first search for nodes whose tag or view name is `name`.
    pub fn find_all<'n>(&'n self, name: &str, found: &mut Vec<&'n RenderNode>) {
        if self.name() == Some(name) {
            found.push(self);
        }
        for child in self.children() {
            child.find_all(name, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RenderNode;

    #[test]
    fn builders_nest_and_serialize_with_type_tag() {
        let node = RenderNode::element("span")
            .attr("class", "habit-dot")
            .child(RenderNode::text("Ex"));
        assert_eq!(node.attribute("class"), Some("habit-dot"));
        assert_eq!(node.text_content(), "Ex");

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "element");
        assert_eq!(json["children"][0]["text"], "Ex");
    }

    #[test]
    fn text_leaves_ignore_attributes() {
        let node = RenderNode::text("x").attr("a", "b").child(RenderNode::text("y"));
        assert_eq!(node, RenderNode::text("x"));
    }
}
