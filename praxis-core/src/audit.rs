//! Audit hooks for raw completions
//!
//! Every completion handed to an [`ObservedParser`] is passed verbatim to its
//! hooks before parsing, whether or not the parse succeeds. Hooks are
//! fire-and-forget: a failing hook is logged and ignored, and hooks never
//! block, so they cannot change or delay the parse outcome.
//!
//! # Example
//!
//! ```rust,ignore
//! use praxis_core::audit::{audit_channel_from_config, LoggingAuditHook, ObservedParser};
//!
//! let (hook, mut rx) = audit_channel_from_config(&config.audit)?;
//! let parser = ObservedParser::new(CompletionParser::new())
//!     .with_hook(Arc::new(LoggingAuditHook))
//!     .with_hook(Arc::new(hook));
//!
//! let decision = parser.parse(completion)?;
//! let record = rx.recv().await;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{AuditConfig, PraxisConfig};
use crate::parsing::{CompletionParser, Decision, OutputParser, ParseResult};

/// Error raised by an audit hook
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    /// The sink is at capacity
    #[error("audit channel is full")]
    ChannelFull,

    /// The receiving side has gone away
    #[error("audit channel is closed")]
    ChannelClosed,

    /// A channel was requested with room for no records
    #[error("audit channel capacity must be greater than zero")]
    ZeroCapacity,

    /// Any other sink failure
    #[error("audit sink failed: {0}")]
    Sink(String),
}

/// One observed completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Record ID
    pub id: Uuid,

    /// Execution the completion belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,

    /// Agent that produced the completion
    pub sender: String,

    /// Verbatim completion text
    pub content: String,

    /// When the completion was observed
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Create a record for a completion
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            execution_id: None,
            sender: sender.into(),
            content: content.into(),
            recorded_at: Utc::now(),
        }
    }

    /// Set execution ID
    pub fn with_execution_id(mut self, execution_id: impl Into<String>) -> Self {
        self.execution_id = Some(execution_id.into());
        self
    }
}

/// Observer notified with every raw completion
pub trait AuditHook: Send + Sync {
    /// Observe a completion. Must not block.
    fn observe(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// Hook that writes each completion to the `tracing` log
pub struct LoggingAuditHook;

impl AuditHook for LoggingAuditHook {
    fn observe(&self, record: &AuditRecord) -> Result<(), AuditError> {
        info!(
            record_id = %record.id,
            execution_id = record.execution_id.as_deref().unwrap_or("-"),
            sender = %record.sender,
            content_length = record.content.len(),
            content = %record.content,
            "Completion received"
        );
        Ok(())
    }
}

/// Sender half of an audit channel
pub type AuditSender = mpsc::Sender<AuditRecord>;

/// Receiver half of an audit channel
pub type AuditReceiver = mpsc::Receiver<AuditRecord>;

/// Hook that forwards records to a bounded channel without waiting
#[derive(Clone)]
pub struct ChannelAuditHook {
    sender: AuditSender,
}

impl ChannelAuditHook {
    /// Create a hook over an existing sender
    pub fn new(sender: AuditSender) -> Self {
        Self { sender }
    }
}

impl AuditHook for ChannelAuditHook {
    fn observe(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.sender.try_send(record.clone()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => AuditError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => AuditError::ChannelClosed,
        })
    }
}

/// Create a bounded audit channel and a hook feeding it
///
/// # Errors
///
/// Returns [`AuditError::ZeroCapacity`] if `capacity` is zero.
pub fn audit_channel(
    capacity: usize,
) -> Result<(ChannelAuditHook, AuditReceiver), AuditError> {
    if capacity == 0 {
        return Err(AuditError::ZeroCapacity);
    }
    let (tx, rx) = mpsc::channel(capacity);
    Ok((ChannelAuditHook::new(tx), rx))
}

/// Create an audit channel sized by `audit.channel_capacity`
pub fn audit_channel_from_config(
    config: &AuditConfig,
) -> Result<(ChannelAuditHook, AuditReceiver), AuditError> {
    audit_channel(config.channel_capacity)
}

/// Completion parser that notifies audit hooks on every call
#[derive(Clone)]
pub struct ObservedParser {
    parser: CompletionParser,
    hooks: Vec<Arc<dyn AuditHook>>,
    enabled: bool,
    sender: String,
    execution_id: Option<String>,
}

impl std::fmt::Debug for ObservedParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservedParser")
            .field("parser", &self.parser)
            .field("hook_count", &self.hooks.len())
            .field("enabled", &self.enabled)
            .field("sender", &self.sender)
            .finish()
    }
}

impl ObservedParser {
    /// Wrap a parser with no hooks
    pub fn new(parser: CompletionParser) -> Self {
        let defaults = AuditConfig::default();
        Self {
            parser,
            hooks: Vec::new(),
            enabled: defaults.enabled,
            sender: defaults.sender,
            execution_id: defaults.execution_id,
        }
    }

    /// Build from configuration; hooks are added separately
    pub fn from_config(config: &PraxisConfig) -> Self {
        Self {
            parser: CompletionParser::with_config(config.parser.clone()),
            hooks: Vec::new(),
            enabled: config.audit.enabled,
            sender: config.audit.sender.clone(),
            execution_id: config.audit.execution_id.clone(),
        }
    }

    /// Register a hook
    pub fn with_hook(mut self, hook: Arc<dyn AuditHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Set the sender recorded on each completion
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Set the execution ID recorded on each completion
    pub fn with_execution_id(mut self, execution_id: impl Into<String>) -> Self {
        self.execution_id = Some(execution_id.into());
        self
    }

    /// Number of registered hooks
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// The wrapped parser
    pub fn inner(&self) -> &CompletionParser {
        &self.parser
    }

    /// Pass the completion to every hook, ignoring failures
    pub fn notify(&self, raw: &str) {
        if !self.enabled || self.hooks.is_empty() {
            return;
        }

        let mut record = AuditRecord::new(self.sender.clone(), raw);
        record.execution_id = self.execution_id.clone();

        for hook in &self.hooks {
            if let Err(e) = hook.observe(&record) {
                warn!(record_id = %record.id, error = %e, "Audit hook failed");
            }
        }
    }
}

impl OutputParser for ObservedParser {
    type Output = Decision;

    fn parse(&self, raw: &str) -> ParseResult<Decision> {
        self.notify(raw);
        self.parser.parse(raw)
    }

    fn can_parse(&self, raw: &str) -> bool {
        self.parser.can_parse(raw)
    }

    fn name(&self) -> &'static str {
        "observed-react-completion"
    }
}
