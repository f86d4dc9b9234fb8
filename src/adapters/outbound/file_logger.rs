use crate::domains::logger::{DomainLogger, FileLogger};
use std::sync::Arc;

/// Installs the global `fast_log` appender and returns a logger writing into it.
///
/// `fast_log` can only be initialised once per process; a second call fails.
pub fn init_file_logger(path: &str, level: &str) -> Result<Arc<dyn DomainLogger>, String> {
    FileLogger::init(path, level).map_err(|e| format!("failed to initialise fast_log at {}: {}", path, e))?;
    Ok(Arc::new(FileLogger))
}
