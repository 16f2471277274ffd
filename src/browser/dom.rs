use leptos::prelude::document;
use wasm_bindgen::JsCast;
use web_sys::{Element as WebElement, Node};

use crate::fallback::{DomNode, Element};

/// Copies a live DOM subtree into the owned snapshot model. Read-only.
pub fn snapshot(node: &Node) -> Option<DomNode> {
    match node.node_type() {
        Node::ELEMENT_NODE => {
            let element = node.dyn_ref::<WebElement>()?;
            let mut out = Element::new(element.local_name());
            for name in element.get_attribute_names().iter().filter_map(|n| n.as_string()) {
                if let Some(value) = element.get_attribute(&name) {
                    out = out.with_attr(name, value);
                }
            }
            let children = node.child_nodes();
            for index in 0..children.length() {
                if let Some(child) = children.get(index).as_ref().and_then(snapshot) {
                    out.children.push(child);
                }
            }
            Some(out.into())
        }
        Node::TEXT_NODE | Node::CDATA_SECTION_NODE => {
            Some(DomNode::text(node.node_value().unwrap_or_default()))
        }
        _ => None,
    }
}

pub fn query(selector: &str) -> Option<WebElement> {
    document().query_selector(selector).ok().flatten()
}

pub fn meta_content(name: &str) -> Option<String> {
    query(&format!("meta[name=\"{name}\"]"))?.get_attribute("content")
}
