//! Page registry and page membership of content elements.
//!
//! Pages live in the document itself as `<a data-silex-type="page" id="...">`
//! entries whose content is the display name. Content elements join a page by
//! carrying the page id as a marker, and links point at a page through a
//! `#!<page id>` target. The manager keeps these three in sync.

use super::error::{PageError, PageResult};
use super::markable::MarkableDocument;
use super::markers::{
    ID_ATTR, LINK_ATTR, PAGE_CLASS_NAME, PAGE_TAG, PAGE_TYPE, PAGED_CLASS_NAME, RESERVED_TOKENS,
    TYPE_ATTR, page_link,
};
use super::observer::{ObserverId, ObserverList, SharedObserver};
use log::{debug, info};
use regex::Regex;
use std::sync::LazyLock;

static PAGE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*$").expect("page id pattern"));

// Anything before the `#!` is adornment kept verbatim on retarget.
static LINK_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>[^#]*#!)(?P<page>[^#\s]+)$").expect("link target pattern")
});

/// A page registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub display_name: String,
}

pub struct PageManager<D: MarkableDocument> {
    observers: ObserverList<D>,
}

impl<D: MarkableDocument> PageManager<D> {
    pub fn new() -> Self {
        Self {
            observers: ObserverList::new(),
        }
    }

    /// Register a collaborator redrawn on every current page change.
    pub fn subscribe(&mut self, observer: SharedObserver<D>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Page ids in document order, empty if the document is not attached.
    pub fn pages(&self, document: &D) -> Vec<String> {
        self.try_pages(document).unwrap_or_default()
    }

    /// Like [`pages`](Self::pages) but reports a missing document root.
    pub fn try_pages(&self, document: &D) -> PageResult<Vec<String>> {
        if document.root().is_none() {
            return Err(PageError::NotFound("document root".to_string()));
        }
        Ok(page_entries_of(document)
            .into_iter()
            .map(|(_, id)| id)
            .collect())
    }

    /// Registry entries with their display names, in document order.
    pub fn page_entries(&self, document: &D) -> Vec<Page> {
        registry(document)
    }

    pub fn current_page(&self, document: &D) -> Option<String> {
        document.current_page()
    }

    /// Activate `page_id` and redraw every observer.
    pub fn set_current_page(&self, document: &mut D, page_id: &str) -> PageResult<()> {
        if find_page(document, page_id).is_none() {
            return Err(PageError::InvalidArgument(format!(
                "cannot open unknown page {page_id}"
            )));
        }
        document.set_current_page(Some(page_id));
        debug!("current page is now {page_id}");
        self.refresh(document);
        Ok(())
    }

    /// Display name of the page, empty if there is no such page.
    pub fn display_name(&self, document: &D, page_id: &str) -> String {
        find_page(document, page_id)
            .map(|element| document.content(element))
            .unwrap_or_default()
    }

    /// Append a new page entry to the document and open it.
    pub fn create_page(
        &self,
        document: &mut D,
        page_id: &str,
        display_name: &str,
    ) -> PageResult<D::Element> {
        let root = document
            .root()
            .ok_or_else(|| PageError::NotFound("document root".to_string()))?;
        validate_page_id(page_id)?;
        validate_display_name(display_name)?;
        if find_page(document, page_id).is_some() {
            return Err(PageError::DuplicateId(page_id.to_string()));
        }

        let entry = document.append_element(root, PAGE_TAG);
        document.set_attribute(entry, ID_ATTR, page_id);
        document.set_attribute(entry, TYPE_ATTR, PAGE_TYPE);
        document.set_content(entry, display_name);
        document.add_marker(entry, PAGE_CLASS_NAME);
        info!("created page {page_id} ({display_name})");

        self.set_current_page(document, page_id)?;
        Ok(entry)
    }

    /// Rename a page; membership markers and links follow the new id.
    pub fn rename_page(
        &self,
        document: &mut D,
        old_id: &str,
        new_id: &str,
        new_display_name: &str,
    ) -> PageResult<()> {
        let entry =
            find_page(document, old_id).ok_or_else(|| PageError::NotFound(old_id.to_string()))?;
        validate_page_id(new_id)?;
        validate_display_name(new_display_name)?;
        if new_id != old_id && find_page(document, new_id).is_some() {
            return Err(PageError::DuplicateId(new_id.to_string()));
        }

        document.set_attribute(entry, ID_ATTR, new_id);
        document.set_content(entry, new_display_name);
        if new_id == old_id {
            info!("renamed page {old_id} to {new_display_name:?}");
            return self.set_current_page(document, new_id);
        }

        let mut links = 0;
        let mut members = 0;
        for element in document.elements() {
            if let Some(prefix) = link_prefix_for(document, element, old_id) {
                document.set_attribute(element, LINK_ATTR, &format!("{prefix}{new_id}"));
                links += 1;
            }
            if document.has_marker(element, old_id) {
                document.swap_marker(element, old_id, new_id);
                members += 1;
            }
        }
        info!("renamed page {old_id} to {new_id}: {links} link(s), {members} element(s) updated");

        self.set_current_page(document, new_id)
    }

    /// Remove a page entry and every reference to it.
    ///
    /// Returns the elements which were visible on this page only, in document
    /// order. They are left in the document for the caller to decide on.
    pub fn remove_page(
        &self,
        document: &mut D,
        page_id: &str,
    ) -> PageResult<Vec<D::Element>> {
        let entry =
            find_page(document, page_id).ok_or_else(|| PageError::NotFound(page_id.to_string()))?;
        document.remove_element(entry);

        let remaining = self.pages(document);
        let mut orphans = Vec::new();
        for element in document.elements() {
            if link_prefix_for(document, element, page_id).is_some() {
                document.remove_attribute(element, LINK_ATTR);
            }
            if document.has_marker(element, page_id) {
                document.remove_marker(element, page_id);
                if !remaining.iter().any(|page| document.has_marker(element, page)) {
                    document.remove_marker(element, PAGED_CLASS_NAME);
                    orphans.push(element);
                }
            }
        }
        info!(
            "removed page {page_id}, {} element(s) left without page",
            orphans.len()
        );

        match remaining.first() {
            Some(first) => self.set_current_page(document, first)?,
            None => {
                document.set_current_page(None);
                debug!("no page left, current page cleared");
                self.refresh(document);
            }
        }
        Ok(orphans)
    }

    /// Make `element` visible on `page_id`. Calling it twice changes nothing.
    pub fn add_to_page(
        &self,
        document: &mut D,
        element: D::Element,
        page_id: &str,
    ) -> PageResult<()> {
        if find_page(document, page_id).is_none() {
            return Err(PageError::NotFound(page_id.to_string()));
        }
        document.add_marker(element, page_id);
        document.add_marker(element, PAGED_CLASS_NAME);
        debug!("{element:?} added to page {page_id}");
        Ok(())
    }

    /// Hide `element` from `page_id`; it stops being paged with its last page.
    pub fn remove_from_page(&self, document: &mut D, element: D::Element, page_id: &str) {
        if !is_membership_token(document, page_id) {
            debug!("{page_id} is not a page, {element:?} left untouched");
            return;
        }
        document.remove_marker(element, page_id);
        if self.pages_for_element(document, element).is_empty() {
            document.remove_marker(element, PAGED_CLASS_NAME);
        }
        debug!("{element:?} removed from page {page_id}");
    }

    /// Make `element` visible on every page again.
    pub fn remove_from_all_pages(&self, document: &mut D, element: D::Element) {
        for page in self.pages_for_element(document, element) {
            document.remove_marker(element, &page);
        }
        document.remove_marker(element, PAGED_CLASS_NAME);
        debug!("{element:?} removed from all pages");
    }

    /// Pages `element` is visible on, in registry order.
    pub fn pages_for_element(&self, document: &D, element: D::Element) -> Vec<String> {
        self.pages(document)
            .into_iter()
            .filter(|page| document.has_marker(element, page))
            .collect()
    }

    /// Whether `element` is a member of `page_id`, the current page by default.
    pub fn is_in_page(&self, document: &D, element: D::Element, page_id: Option<&str>) -> bool {
        match page_id {
            Some(page) => {
                is_membership_token(document, page) && document.has_marker(element, page)
            }
            None => document
                .current_page()
                .is_some_and(|page| document.has_marker(element, &page)),
        }
    }

    /// Nearest ancestor of `element` whose visibility is page scoped.
    pub fn parent_page(&self, document: &D, element: D::Element) -> Option<D::Element> {
        parent_page(document, element)
    }

    /// Point `element` at `page_id` for in-document navigation.
    pub fn link_to_page(
        &self,
        document: &mut D,
        element: D::Element,
        page_id: &str,
    ) -> PageResult<()> {
        if find_page(document, page_id).is_none() {
            return Err(PageError::NotFound(page_id.to_string()));
        }
        document.set_attribute(element, LINK_ATTR, &page_link(page_id));
        Ok(())
    }

    pub fn clear_link(&self, document: &mut D, element: D::Element) {
        document.remove_attribute(element, LINK_ATTR);
    }

    /// Page id `element` links to, if its link target points at a page.
    pub fn link_target(&self, document: &D, element: D::Element) -> Option<String> {
        link_page(document, element)
    }

    /// Redraw every observer without changing the current page.
    pub fn refresh(&self, document: &D) {
        let pages = self.pages(document);
        let current = document.current_page();
        self.observers.notify(document, &pages, current.as_deref());
    }
}

impl<D: MarkableDocument> Default for PageManager<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry entries of `document` with their display names, in document order.
pub fn registry<D: MarkableDocument>(document: &D) -> Vec<Page> {
    page_entries_of(document)
        .into_iter()
        .map(|(element, id)| Page {
            display_name: document.content(element),
            id,
        })
        .collect()
}

/// Nearest strict ancestor of `element` carrying the paged marker.
pub fn parent_page<D: MarkableDocument>(document: &D, element: D::Element) -> Option<D::Element> {
    let mut current = document.parent(element);
    while let Some(ancestor) = current {
        if document.has_marker(ancestor, PAGED_CLASS_NAME) {
            return Some(ancestor);
        }
        current = document.parent(ancestor);
    }
    None
}

/// Page id targeted by the link of `element`, if any.
pub fn link_page<D: MarkableDocument>(document: &D, element: D::Element) -> Option<String> {
    let target = document.attribute(element, LINK_ATTR)?;
    LINK_TARGET
        .captures(&target)
        .and_then(|caps| caps.name("page"))
        .map(|page| page.as_str().to_string())
}

/// Whether `element` is a page registry entry.
pub fn is_page_entry<D: MarkableDocument>(document: &D, element: D::Element) -> bool {
    document.attribute(element, TYPE_ATTR).as_deref() == Some(PAGE_TYPE)
}

fn page_entries_of<D: MarkableDocument>(document: &D) -> Vec<(D::Element, String)> {
    document
        .elements()
        .into_iter()
        .filter(|&element| is_page_entry(document, element))
        .filter_map(|element| {
            document
                .attribute(element, ID_ATTR)
                .map(|id| (element, id))
        })
        .collect()
}

/// Only registered page ids are membership markers, never the reserved classes.
fn is_membership_token<D: MarkableDocument>(document: &D, token: &str) -> bool {
    !RESERVED_TOKENS.contains(&token) && find_page(document, token).is_some()
}

fn find_page<D: MarkableDocument>(document: &D, page_id: &str) -> Option<D::Element> {
    page_entries_of(document)
        .into_iter()
        .find(|(_, id)| id == page_id)
        .map(|(element, _)| element)
}

/// Adornment before the page id when `element` links to `page_id`.
fn link_prefix_for<D: MarkableDocument>(
    document: &D,
    element: D::Element,
    page_id: &str,
) -> Option<String> {
    let target = document.attribute(element, LINK_ATTR)?;
    let caps = LINK_TARGET.captures(&target)?;
    if caps.name("page")?.as_str() != page_id {
        return None;
    }
    caps.name("prefix").map(|prefix| prefix.as_str().to_string())
}

fn validate_page_id(page_id: &str) -> PageResult<()> {
    if !PAGE_ID.is_match(page_id) {
        return Err(PageError::InvalidArgument(format!(
            "page id {page_id:?} must be a single token of letters, digits, '_' or '-'"
        )));
    }
    if RESERVED_TOKENS.contains(&page_id) {
        return Err(PageError::InvalidArgument(format!(
            "page id {page_id:?} is a reserved marker"
        )));
    }
    Ok(())
}

fn validate_display_name(display_name: &str) -> PageResult<()> {
    if display_name.trim().is_empty() {
        return Err(PageError::InvalidArgument(
            "display name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
