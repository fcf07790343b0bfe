//! A small owned element tree.
//!
//! Just enough of a DOM for the component to render into and for the harness to
//! assert against: text content, serialized inner HTML, attributes, and
//! `querySelector`-style lookups by tag name, `#id`, or a descendant chain of
//! those (`"#weather-app a"`).

use std::fmt::Write as _;

const VOID_ELEMENTS: &[&str] = &["br", "img", "input"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text_content(text);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.append_child(child);
        self
    }

    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    pub fn append_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Drop every child.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Swap out all children at once.
    pub fn replace_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    pub fn set_text_content(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(el) => el.collect_text(out),
            }
        }
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            write_node(child, &mut out);
        }
        out
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }

    /// First element (self excluded) matching `selector`, in document order.
    pub fn query_selector(&self, selector: &str) -> Option<&Element> {
        let steps: Vec<&str> = selector.split_whitespace().collect();
        if steps.is_empty() {
            return None;
        }
        self.find_descendant(&steps)
    }

    pub fn query_selector_mut(&mut self, selector: &str) -> Option<&mut Element> {
        let steps: Vec<&str> = selector.split_whitespace().collect();
        if steps.is_empty() {
            return None;
        }
        self.find_descendant_mut(&steps)
    }

    fn find_descendant(&self, steps: &[&str]) -> Option<&Element> {
        for child in self.child_elements() {
            if child.matches(steps[0]) {
                if steps.len() == 1 {
                    return Some(child);
                }
                if let Some(found) = child.find_descendant(&steps[1..]) {
                    return Some(found);
                }
            }
            if let Some(found) = child.find_descendant(steps) {
                return Some(found);
            }
        }
        None
    }

    fn find_descendant_mut(&mut self, steps: &[&str]) -> Option<&mut Element> {
        // Locate by path first, then walk it mutably; keeps the borrow checker simple.
        let path = self.path_to(steps)?;
        let mut current = self;
        for index in path {
            current = match current.children.get_mut(index) {
                Some(Node::Element(el)) => el,
                _ => return None,
            };
        }
        Some(current)
    }

    fn path_to(&self, steps: &[&str]) -> Option<Vec<usize>> {
        for (index, child) in self.children.iter().enumerate() {
            let Node::Element(child) = child else {
                continue;
            };
            if child.matches(steps[0]) {
                if steps.len() == 1 {
                    return Some(vec![index]);
                }
                if let Some(mut rest) = child.path_to(&steps[1..]) {
                    rest.insert(0, index);
                    return Some(rest);
                }
            }
            if let Some(mut rest) = child.path_to(steps) {
                rest.insert(0, index);
                return Some(rest);
            }
        }
        None
    }

    fn matches(&self, simple: &str) -> bool {
        match simple.strip_prefix('#') {
            Some(id) => self.id() == Some(id),
            None => self.tag.eq_ignore_ascii_case(simple),
        }
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => escape_into(t, false, out),
        Node::Element(el) => write_element(el, out),
    }
}

fn write_element(el: &Element, out: &mut String) {
    let _ = write!(out, "<{}", el.tag);
    for (name, value) in &el.attributes {
        let _ = write!(out, " {name}=\"");
        escape_into(value, true, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.tag.as_str()) {
        return;
    }

    for child in &el.children {
        write_node(child, out);
    }
    let _ = write!(out, "</{}>", el.tag);
}

fn escape_into(text: &str, in_attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !in_attribute => out.push_str("&lt;"),
            '>' if !in_attribute => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
