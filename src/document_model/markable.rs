//! Capability interface over a markable document tree.
//!
//! The page model is written purely against this trait so that it can run on
//! the in-memory [`ElementTree`](super::ElementTree) as well as on any host
//! document engine that can expose markers and attributes on its elements.

use std::fmt::Debug;

pub trait MarkableDocument {
    /// Handle to an element of the document.
    type Element: Copy + Eq + Debug;

    /// Root content container, `None` while the host is not attached.
    fn root(&self) -> Option<Self::Element>;

    /// Every element under the root (root excluded) in document order.
    fn elements(&self) -> Vec<Self::Element>;

    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    fn has_marker(&self, element: Self::Element, token: &str) -> bool;

    /// Add `token` to the element's marker set. No-op if already present.
    fn add_marker(&mut self, element: Self::Element, token: &str);

    /// Remove `token` from the element's marker set. No-op if absent.
    fn remove_marker(&mut self, element: Self::Element, token: &str);

    /// Marker set of the element in insertion order.
    fn markers(&self, element: Self::Element) -> Vec<String>;

    /// Replace `old` by `new` on an element carrying `old`.
    ///
    /// Hosts with an atomic replace should override this.
    fn swap_marker(&mut self, element: Self::Element, old: &str, new: &str) {
        if self.has_marker(element, old) {
            self.remove_marker(element, old);
            self.add_marker(element, new);
        }
    }

    fn attribute(&self, element: Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: Self::Element, name: &str, value: &str);

    fn remove_attribute(&mut self, element: Self::Element, name: &str);

    /// Text content of the element.
    fn content(&self, element: Self::Element) -> String;

    fn set_content(&mut self, element: Self::Element, content: &str);

    /// Create a new element with `tag` as last child of `parent`.
    fn append_element(&mut self, parent: Self::Element, tag: &str) -> Self::Element;

    /// Detach the element and its subtree from the document.
    fn remove_element(&mut self, element: Self::Element);

    /// Document-wide current page state.
    fn current_page(&self) -> Option<String>;

    fn set_current_page(&mut self, page_id: Option<&str>);
}
