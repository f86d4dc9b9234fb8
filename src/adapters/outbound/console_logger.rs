use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Prints to stdout, errors to stderr, each line tagged with a component name.
pub struct ConsoleLogger {
    tag: String,
}

impl ConsoleLogger {
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_string() }
    }
}

impl DomainLogger for ConsoleLogger {
    fn info(&self, msg: &str) {
        println!("[{}] {}", self.tag, msg);
    }

    fn warn(&self, msg: &str) {
        println!("[{}] WARN: {}", self.tag, msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("[{}] ERROR: {}", self.tag, msg);
    }
}

/// Console-backed logger, the fallback when no file sink is configured.
pub fn init_console_logger(tag: &str) -> Arc<dyn DomainLogger> {
    Arc::new(ConsoleLogger::new(tag))
}
