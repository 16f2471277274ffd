use serde::{Deserialize, Serialize};

use super::node::{DomNode, Element};

/// Elements dropped from a content snapshot before conversion.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct PruneRules {
    /// Tag names removed with their whole subtree.
    pub tags: Vec<String>,
    /// Elements carrying any of these classes are removed with their subtree.
    pub classes: Vec<String>,
}

impl Default for PruneRules {
    fn default() -> Self {
        Self {
            tags: vec!["script".to_string(), "style".to_string(), "template".to_string()],
            classes: vec![
                // code block copy buttons
                "md-clipboard".to_string(),
                "copy-button".to_string(),
                // heading permalinks
                "headerlink".to_string(),
                // edit / view-source buttons
                "md-content__button".to_string(),
            ],
        }
    }
}

impl PruneRules {
    fn drops(&self, element: &Element) -> bool {
        self.tags.iter().any(|tag| tag.eq_ignore_ascii_case(&element.tag))
            || element
                .classes()
                .any(|class| self.classes.iter().any(|c| c == class))
    }

    /// Removes matching elements anywhere below `node`. The root is kept even
    /// when it matches.
    pub fn apply(&self, node: &mut DomNode) {
        if let DomNode::Element(element) = node {
            self.apply_children(element);
        }
    }

    fn apply_children(&self, element: &mut Element) {
        element.children.retain(|child| match child {
            DomNode::Element(el) => !self.drops(el),
            DomNode::Text(_) => true,
        });
        for child in &mut element.children {
            if let DomNode::Element(el) = child {
                self.apply_children(el);
            }
        }
    }
}
