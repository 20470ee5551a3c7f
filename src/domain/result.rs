//! Result type alias for listsync

use super::errors::SyncError;

/// Result type alias for listsync operations
///
/// # Examples
///
/// ```
/// use listsync::domain::result::Result;
/// use listsync::domain::errors::SyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
