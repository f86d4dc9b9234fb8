use crate::domains::logger::{DomainLogger, LogLevel};
use std::sync::Arc;

/// Fans each message out to every attached sink, in order.
#[derive(Default)]
pub struct MultiLogger {
    sinks: Vec<Arc<dyn DomainLogger>>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<Arc<dyn DomainLogger>>) -> Self {
        Self { sinks }
    }

    pub fn with(mut self, sink: Arc<dyn DomainLogger>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn broadcast(&self, level: LogLevel, msg: &str) {
        for sink in &self.sinks {
            sink.log(level, msg);
        }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.broadcast(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.broadcast(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.broadcast(LogLevel::Error, msg);
    }
}

/// Console always, plus the file sink when it can be opened.
pub fn init_combined_logger(path: &str, level: &str) -> Arc<dyn DomainLogger> {
    let console = crate::adapters::outbound::init_console_logger("vantage");
    match crate::adapters::outbound::file_logger::init_file_logger(path, level) {
        Ok(file) => Arc::new(MultiLogger::new(vec![file, console])) as Arc<dyn DomainLogger>,
        Err(e) => {
            console.warn(&format!("file logging disabled: {}", e));
            console
        }
    }
}
