//! Marker vocabulary shared with the page runtime embedded in published sites.
//! These values are read back by that runtime and must not change.

/// Class carried by every page registry entry.
pub const PAGE_CLASS_NAME: &str = "page-element";

/// Class carried by elements whose visibility is scoped to some pages.
pub const PAGED_CLASS_NAME: &str = "paged-element";

/// Class set on paged elements visible under the current page.
pub const PAGED_VISIBLE_CLASS_NAME: &str = "paged-element-visible";

/// Class set on links pointing at the current page.
pub const PAGE_LINK_ACTIVE_CLASS_NAME: &str = "page-link-active";

/// Tag of page registry entries.
pub const PAGE_TAG: &str = "a";

/// Attribute typing an element as a page registry entry.
pub const TYPE_ATTR: &str = "data-silex-type";

/// Value of [`TYPE_ATTR`] on page registry entries.
pub const PAGE_TYPE: &str = "page";

/// Attribute holding the element id, which is the page id for registry entries.
pub const ID_ATTR: &str = "id";

/// Attribute holding an in-document link target.
pub const LINK_ATTR: &str = "data-silex-href";

/// Prefix wrapped around the page id in a link target.
pub const PAGE_LINK_PREFIX: &str = "#!";

/// Tokens that can never be used as page ids because membership markers
/// share the class namespace with these.
pub const RESERVED_TOKENS: [&str; 4] = [
    PAGE_CLASS_NAME,
    PAGED_CLASS_NAME,
    PAGED_VISIBLE_CLASS_NAME,
    PAGE_LINK_ACTIVE_CLASS_NAME,
];

/// Build the link target value pointing at `page_id`.
pub fn page_link(page_id: &str) -> String {
    format!("{PAGE_LINK_PREFIX}{page_id}")
}
