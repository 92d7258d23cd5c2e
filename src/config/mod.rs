/// Configuration subsystem - Editor settings and preferences
///
/// This module handles loading configuration from .pagescoperc files,
/// providing centralized settings for the views and the editing session.
pub mod rc;

// Re-export public interface
pub use rc::{RcConfig, RcLoader};
