use super::markable::MarkableDocument;
use std::fmt;

/// Handle to an element of an [`ElementTree`]. Handles are never reused, a
/// removed element keeps its handle but is no longer part of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn from_index(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub content: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attached: bool,
}

impl Element {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: Vec::new(),
            content: String::new(),
            parent,
            children: Vec::new(),
            attached: true,
        }
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// In-memory document tree: an arena of elements hanging off a `body` root,
/// plus the document-wide current page state.
#[derive(Debug, Clone)]
pub struct ElementTree {
    elements: Vec<Element>,
    root: Option<ElementId>,
    current_page: Option<String>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body", None)],
            root: Some(ElementId(0)),
            current_page: None,
        }
    }

    /// A tree whose host document is not attached yet: it has no root.
    pub fn detached() -> Self {
        Self {
            elements: Vec::new(),
            root: None,
            current_page: None,
        }
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0).filter(|element| element.attached)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0).filter(|element| element.attached)
    }

    /// True if `id` is currently part of the document.
    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(Element::children).unwrap_or(&[])
    }

    /// Append an element carrying `content` as text.
    pub fn append_with_text(&mut self, parent: ElementId, tag: &str, content: &str) -> ElementId {
        let id = self.append_element(parent, tag);
        self.set_content(id, content);
        id
    }

    /// Number of attached elements, root included.
    pub fn len(&self) -> usize {
        self.elements.iter().filter(|element| element.attached).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn collect_subtree(&self, id: ElementId, out: &mut Vec<ElementId>) {
        if let Some(element) = self.get(id) {
            for &child in &element.children {
                out.push(child);
                self.collect_subtree(child, out);
            }
        }
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkableDocument for ElementTree {
    type Element = ElementId;

    fn root(&self) -> Option<ElementId> {
        self.root
    }

    fn elements(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect_subtree(root, &mut out);
        }
        out
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.get(element).and_then(|e| e.parent)
    }

    fn has_marker(&self, element: ElementId, token: &str) -> bool {
        self.get(element)
            .is_some_and(|e| e.classes.iter().any(|class| class == token))
    }

    fn add_marker(&mut self, element: ElementId, token: &str) {
        if let Some(e) = self.get_mut(element) {
            if !e.classes.iter().any(|class| class == token) {
                e.classes.push(token.to_string());
            }
        }
    }

    fn remove_marker(&mut self, element: ElementId, token: &str) {
        if let Some(e) = self.get_mut(element) {
            e.classes.retain(|class| class != token);
        }
    }

    fn markers(&self, element: ElementId) -> Vec<String> {
        self.get(element)
            .map(|e| e.classes.clone())
            .unwrap_or_default()
    }

    // Replaces in place so the marker keeps its position in the class list.
    fn swap_marker(&mut self, element: ElementId, old: &str, new: &str) {
        if old == new {
            return;
        }
        if let Some(e) = self.get_mut(element) {
            let Some(pos) = e.classes.iter().position(|class| class == old) else {
                return;
            };
            if e.classes.iter().any(|class| class == new) {
                e.classes.remove(pos);
            } else {
                e.classes[pos] = new.to_string();
            }
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.get(element).and_then(|e| {
            e.attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(e) = self.get_mut(element) {
            match e.attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => e.attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(e) = self.get_mut(element) {
            e.attributes.retain(|(key, _)| key != name);
        }
    }

    fn content(&self, element: ElementId) -> String {
        self.get(element)
            .map(|e| e.content.clone())
            .unwrap_or_default()
    }

    fn set_content(&mut self, element: ElementId, content: &str) {
        if let Some(e) = self.get_mut(element) {
            e.content = content.to_string();
        }
    }

    fn append_element(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        let attached_parent = self.contains(parent);
        let mut element = Element::new(tag, attached_parent.then_some(parent));
        element.attached = attached_parent;
        self.elements.push(element);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    fn remove_element(&mut self, element: ElementId) {
        if Some(element) == self.root || !self.contains(element) {
            return;
        }
        let mut subtree = vec![element];
        self.collect_subtree(element, &mut subtree);

        if let Some(parent) = self.parent(element) {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|&child| child != element);
            }
        }
        for id in subtree {
            if let Some(e) = self.elements.get_mut(id.0) {
                e.attached = false;
            }
        }
    }

    fn current_page(&self) -> Option<String> {
        self.current_page.clone()
    }

    fn set_current_page(&mut self, page_id: Option<&str>) {
        self.current_page = page_id.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_in_document_order() {
        let mut tree = ElementTree::new();
        let root = tree.root().unwrap();
        let header = tree.append_element(root, "header");
        let main = tree.append_element(root, "main");
        let title = tree.append_element(header, "h1");
        let para = tree.append_element(main, "p");

        assert_eq!(tree.elements(), vec![header, title, main, para]);
        assert_eq!(tree.parent(title), Some(header));
        assert_eq!(tree.children(root), &[header, main]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_markers_are_a_set() {
        let mut tree = ElementTree::new();
        let root = tree.root().unwrap();
        let div = tree.append_element(root, "div");

        tree.add_marker(div, "home");
        tree.add_marker(div, "home");
        tree.add_marker(div, "about");
        assert_eq!(tree.markers(div), vec!["home", "about"]);

        tree.remove_marker(div, "home");
        tree.remove_marker(div, "home");
        assert_eq!(tree.markers(div), vec!["about"]);
    }

    #[test]
    fn test_swap_marker_keeps_position() {
        let mut tree = ElementTree::new();
        let root = tree.root().unwrap();
        let div = tree.append_element(root, "div");
        tree.add_marker(div, "home");
        tree.add_marker(div, "about");
        tree.add_marker(div, "paged-element");

        tree.swap_marker(div, "about", "contact");
        assert_eq!(tree.markers(div), vec!["home", "contact", "paged-element"]);

        // Swapping onto a marker already present collapses the two.
        tree.swap_marker(div, "home", "contact");
        assert_eq!(tree.markers(div), vec!["contact", "paged-element"]);

        tree.swap_marker(div, "contact", "contact");
        assert_eq!(tree.markers(div), vec!["contact", "paged-element"]);

        // Nothing happens when the old marker is absent.
        tree.swap_marker(div, "missing", "other");
        assert_eq!(tree.markers(div), vec!["contact", "paged-element"]);
    }

    #[test]
    fn test_attributes() {
        let mut tree = ElementTree::new();
        let root = tree.root().unwrap();
        let link = tree.append_element(root, "a");

        assert_eq!(tree.attribute(link, "href"), None);
        tree.set_attribute(link, "href", "#!home");
        tree.set_attribute(link, "href", "#!about");
        assert_eq!(tree.attribute(link, "href").as_deref(), Some("#!about"));
        tree.remove_attribute(link, "href");
        assert_eq!(tree.attribute(link, "href"), None);
    }

    #[test]
    fn test_remove_element_detaches_subtree() {
        let mut tree = ElementTree::new();
        let root = tree.root().unwrap();
        let section = tree.append_element(root, "section");
        let inner = tree.append_with_text(section, "p", "hello");
        let other = tree.append_element(root, "footer");

        tree.remove_element(section);

        assert!(!tree.contains(section));
        assert!(!tree.contains(inner));
        assert_eq!(tree.elements(), vec![other]);
        assert_eq!(tree.content(inner), "");

        // The root can never be removed.
        tree.remove_element(root);
        assert!(tree.contains(root));
    }

    #[test]
    fn test_detached_tree_has_no_elements() {
        let tree = ElementTree::detached();
        assert_eq!(tree.root(), None);
        assert!(tree.elements().is_empty());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_current_page_state() {
        let mut tree = ElementTree::new();
        assert_eq!(tree.current_page(), None);
        tree.set_current_page(Some("home"));
        assert_eq!(tree.current_page().as_deref(), Some("home"));
        tree.set_current_page(None);
        assert_eq!(tree.current_page(), None);
    }
}
