/// Controller subsystem - Page command language and the editing session
///
/// Commands are parsed from text lines into typed PageCommand values and run
/// against an EditorSession, which owns the document, the page manager and
/// the views redrawn by it.

pub mod command;
pub mod session;

// Re-export public interface
pub use command::{CommandError, PageCommand};
pub use session::{EditorSession, SessionError};
