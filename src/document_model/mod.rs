/// Document model subsystem - The edited document and its page structure
///
/// This module contains the markable document abstraction, the in-memory
/// element tree, the page registry & membership manager and the step applying
/// the current page to element visibility.
pub mod error;
pub mod markable;
pub mod markers;
pub mod observer;
pub mod pages;
pub mod tree;
pub mod visibility;

// Re-export main types for convenience
pub use error::{PageError, PageResult};
pub use markable::MarkableDocument;
pub use observer::{ObserverId, PageObserver, SharedObserver};
pub use pages::{Page, PageManager, is_page_entry, link_page, parent_page, registry};
pub use tree::{ElementId, ElementTree};
