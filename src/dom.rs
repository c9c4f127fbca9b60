use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A page element. Widgets render into these and read card metadata from
/// their `data-*` attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub display: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn set_display(&mut self, display: &str) {
        self.display = Some(display.to_string());
    }

    /// Drops all children, the equivalent of emptying `innerHTML`.
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(child);
    }
}

/// Elements addressed by id, kept in insertion (document) order so class
/// queries return them the way the markup lists them.
#[derive(Debug, Default, Clone)]
pub struct Document {
    order: Vec<String>,
    elements: HashMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn with(mut self, id: &str, element: Element) -> Self {
        self.insert(id, element);
        self
    }

    pub fn insert(&mut self, id: &str, element: Element) {
        if self.elements.insert(id.to_string(), element).is_none() {
            self.order.push(id.to_string());
        }
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Ids of every element carrying `class`, in document order.
    pub fn ids_by_class(&self, class: &str) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| {
                self.elements
                    .get(id.as_str())
                    .is_some_and(|element| element.has_class(class))
            })
            .cloned()
            .collect()
    }

    pub fn first_by_class(&self, class: &str) -> Option<String> {
        self.ids_by_class(class).into_iter().next()
    }

    /// Builds a click target from a chain of ids, innermost first. Ids that
    /// are not in the document become bare `div` nodes.
    pub fn target(&self, ids: &[&str]) -> Target {
        let path = ids
            .iter()
            .map(|id| match self.get(id) {
                Some(element) => Node::from_element(id, element),
                None => Node::new("div").with_id(id),
            })
            .collect();
        Target::new(path)
    }
}

/// One step of a click target's ancestor chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Node {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn from_element(id: &str, element: &Element) -> Self {
        Node {
            tag: element.tag.clone(),
            id: Some(id.to_string()),
            classes: element.classes.iter().cloned().collect(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is(&self, tag: &str, class: &str) -> bool {
        self.tag == tag && self.has_class(class)
    }
}

/// The element a click landed on plus its ancestors, innermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Target {
    path: Vec<Node>,
}

impl Target {
    pub fn new(path: Vec<Node>) -> Self {
        Target { path }
    }

    pub fn innermost(&self) -> Option<&Node> {
        self.path.first()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.path.iter().any(|node| node.id.as_deref() == Some(id))
    }

    pub fn contains_class(&self, class: &str) -> bool {
        self.path.iter().any(|node| node.has_class(class))
    }

    /// First node, walking outwards, whose tag is one of `tags`.
    pub fn closest(&self, tags: &[&str]) -> Option<&Node> {
        self.path.iter().find(|node| tags.contains(&node.tag.as_str()))
    }

    pub fn find_class(&self, class: &str) -> Option<&Node> {
        self.path.iter().find(|node| node.has_class(class))
    }
}
