/// View subsystem - Terminal rendering of the page tool and the stage
///
/// Both views are page observers: the page manager redraws them whenever the
/// current page changes. They only see documents through the StageViewModel
/// and MarkableDocument traits.

pub mod output;
pub mod page_tool;
pub mod stage;
pub mod style;
pub mod view_model;

// Re-export public interface
pub use output::write_frame;
pub use page_tool::PageTool;
pub use stage::Stage;
pub use view_model::StageViewModel;
