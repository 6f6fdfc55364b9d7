//! Progress events emitted during an analysis run.
//!
//! The event stream is the only contract a front end depends on: it is
//! ordered, multi-producer / single-consumer, and sending never blocks.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::report::AnalysisReport;

/// One progress notification.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    /// Short status line, e.g. the card currently being fetched.
    Status(String),
    /// Log line worth showing to the user.
    Log(String),
    /// Number of unique cards about to be processed.
    ProgressInit(usize),
    /// Index (1-based) of the card just processed.
    Progress(usize),
    /// Terminal: the completed report.
    Finished(Box<AnalysisReport>),
    /// Terminal: the run failed.
    Failed(String),
}

impl AnalysisEvent {
    /// Returns `true` for `Finished` and `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Failed(_))
    }
}

/// Fire-and-forget sender half of the event stream.
///
/// A sink without a channel, or whose receiver was dropped, silently
/// discards events.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<UnboundedSender<AnalysisEvent>>,
}

impl EventSink {
    /// Creates a connected sink and its receiver.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<AnalysisEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that discards everything.
    #[must_use]
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: AnalysisEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn status(&self, message: impl Into<String>) {
        self.emit(AnalysisEvent::Status(message.into()));
    }

    pub fn log(&self, message: impl Into<String>) {
        self.emit(AnalysisEvent::Log(message.into()));
    }
}
