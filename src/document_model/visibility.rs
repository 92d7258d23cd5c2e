//! Applies the current page to the document: paged elements member of the
//! current page get the visible marker, links to the current page get the
//! active link marker. Everything else loses them.

use super::markable::MarkableDocument;
use super::markers::{PAGE_LINK_ACTIVE_CLASS_NAME, PAGED_CLASS_NAME, PAGED_VISIBLE_CLASS_NAME};
use super::pages::link_page;
use log::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    pub visible: usize,
    pub hidden: usize,
    pub active_links: usize,
}

pub fn apply<D: MarkableDocument>(
    document: &mut D,
    current_page: Option<&str>,
) -> VisibilityReport {
    let mut report = VisibilityReport::default();

    for element in document.elements() {
        if document.has_marker(element, PAGED_CLASS_NAME) {
            if current_page.is_some_and(|page| document.has_marker(element, page)) {
                document.add_marker(element, PAGED_VISIBLE_CLASS_NAME);
                report.visible += 1;
            } else {
                document.remove_marker(element, PAGED_VISIBLE_CLASS_NAME);
                report.hidden += 1;
            }
        } else {
            document.remove_marker(element, PAGED_VISIBLE_CLASS_NAME);
        }

        if current_page.is_some() && link_page(document, element).as_deref() == current_page {
            document.add_marker(element, PAGE_LINK_ACTIVE_CLASS_NAME);
            report.active_links += 1;
        } else {
            document.remove_marker(element, PAGE_LINK_ACTIVE_CLASS_NAME);
        }
    }

    debug!(
        "visibility applied for {current_page:?}: {} visible, {} hidden, {} active link(s)",
        report.visible, report.hidden, report.active_links
    );
    report
}

/// Whether `element` shows under `current_page`, taking paged ancestors into
/// account: an element is hidden as soon as itself or one of its ancestors is
/// paged without being a member of the current page.
pub fn is_shown<D: MarkableDocument>(
    document: &D,
    element: D::Element,
    current_page: Option<&str>,
) -> bool {
    let mut current = Some(element);
    while let Some(node) = current {
        if document.has_marker(node, PAGED_CLASS_NAME)
            && !current_page.is_some_and(|page| document.has_marker(node, page))
        {
            return false;
        }
        current = document.parent(node);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::pages::PageManager;
    use crate::document_model::tree::ElementTree;

    #[test]
    fn test_apply_marks_visible_and_active_links() {
        let mut doc = ElementTree::new();
        let manager = PageManager::new();
        manager.create_page(&mut doc, "home", "Home").unwrap();
        manager.create_page(&mut doc, "about", "About").unwrap();
        let root = doc.root().unwrap();
        let on_home = doc.append_element(root, "div");
        let on_about = doc.append_element(root, "div");
        let everywhere = doc.append_element(root, "div");
        let link = doc.append_element(root, "a");
        manager.add_to_page(&mut doc, on_home, "home").unwrap();
        manager.add_to_page(&mut doc, on_about, "about").unwrap();
        manager.link_to_page(&mut doc, link, "home").unwrap();

        let report = apply(&mut doc, Some("home"));
        assert_eq!(
            report,
            VisibilityReport {
                visible: 1,
                hidden: 1,
                active_links: 1
            }
        );
        assert!(doc.has_marker(on_home, PAGED_VISIBLE_CLASS_NAME));
        assert!(!doc.has_marker(on_about, PAGED_VISIBLE_CLASS_NAME));
        assert!(!doc.has_marker(everywhere, PAGED_VISIBLE_CLASS_NAME));
        assert!(doc.has_marker(link, PAGE_LINK_ACTIVE_CLASS_NAME));

        apply(&mut doc, Some("about"));
        assert!(!doc.has_marker(on_home, PAGED_VISIBLE_CLASS_NAME));
        assert!(doc.has_marker(on_about, PAGED_VISIBLE_CLASS_NAME));
        assert!(!doc.has_marker(link, PAGE_LINK_ACTIVE_CLASS_NAME));
    }

    #[test]
    fn test_unpaged_element_loses_stale_visible_marker() {
        let mut doc = ElementTree::new();
        let manager = PageManager::new();
        manager.create_page(&mut doc, "home", "Home").unwrap();
        let root = doc.root().unwrap();
        let element = doc.append_element(root, "div");
        manager.add_to_page(&mut doc, element, "home").unwrap();
        apply(&mut doc, Some("home"));

        manager.remove_from_all_pages(&mut doc, element);
        apply(&mut doc, Some("home"));

        assert!(doc.markers(element).is_empty());
    }

    #[test]
    fn test_is_shown_inherits_from_paged_parent() {
        let mut doc = ElementTree::new();
        let manager = PageManager::new();
        manager.create_page(&mut doc, "home", "Home").unwrap();
        manager.create_page(&mut doc, "about", "About").unwrap();
        let root = doc.root().unwrap();
        let section = doc.append_element(root, "section");
        let child = doc.append_element(section, "p");
        manager.add_to_page(&mut doc, section, "about").unwrap();

        assert!(!is_shown(&doc, child, Some("home")));
        assert!(is_shown(&doc, child, Some("about")));
        assert!(!is_shown(&doc, child, None));
        assert!(is_shown(&doc, root, None));
    }
}
