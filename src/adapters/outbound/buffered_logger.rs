use crate::domains::logger::{DomainLogger, LogLevel};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

struct LogMessage {
    level: LogLevel,
    msg: String,
}

struct BufferedLogger {
    sender: mpsc::Sender<LogMessage>,
}

impl BufferedLogger {
    fn enqueue(&self, level: LogLevel, msg: &str) {
        // Never blocks the planner; a full buffer drops the message.
        let _ = self.sender.try_send(LogMessage {
            level,
            msg: msg.to_string(),
        });
    }
}

impl DomainLogger for BufferedLogger {
    fn info(&self, msg: &str) {
        self.enqueue(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.enqueue(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.enqueue(LogLevel::Error, msg);
    }
}

/// Forwards to `sink` from a background task. Must be called inside a tokio runtime.
///
/// The returned handle finishes once every clone of the logger has been dropped
/// and the queue is drained.
pub fn init_buffered_logger(sink: Arc<dyn DomainLogger>, capacity: usize) -> (Arc<dyn DomainLogger>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<LogMessage>(capacity.max(1));

    let drain = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            sink.log(message.level, &message.msg);
        }
    });

    (Arc::new(BufferedLogger { sender: tx }), drain)
}
