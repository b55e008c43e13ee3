//! Domain Event Envelope
//!
//! Aggregates raise plain change events (`root_id`, `occurred_utc` and the
//! event specific fields). When the use-case layer persists them, each event
//! is wrapped in an [`EventEnvelope`] carrying CloudEvents style metadata and
//! the tracing ids of the execution that produced it.
//!
//! # Event Type Format
//!
//! `{domain}:{aggregate}:{action}`, e.g. `identity:end-user:membership-added`
//!
//! # Subject / Message Group
//!
//! Subject: `{domain}.{aggregate}.{id}` (e.g. `identity.end-user.user_0HZX...`)
//! Message group: `{domain}:{aggregate}:{id}`. Events in the same group are
//! delivered in stream order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::ChangeEvent;
use super::error::UseCaseError;
use super::execution_context::ExecutionContext;
use crate::shared::{prefixes, IdGenerator};

pub const SPEC_VERSION: &str = "1.0";

/// Read access to the metadata of a persisted event.
pub trait DomainEvent: Send + Sync {
    fn event_id(&self) -> &str;
    fn event_type(&self) -> &str;
    fn spec_version(&self) -> &str;
    fn source(&self) -> &str;
    fn subject(&self) -> &str;
    fn time(&self) -> DateTime<Utc>;
    fn execution_id(&self) -> &str;
    fn correlation_id(&self) -> &str;
    fn causation_id(&self) -> Option<&str>;
    fn principal_id(&self) -> &str;
    fn message_group(&self) -> &str;
    /// Event-specific payload as JSON.
    fn to_data_json(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub event_id: String,
    pub event_type: String,
    pub spec_version: String,
    pub source: String,
    pub subject: String,
    pub time: DateTime<Utc>,
    pub execution_id: String,
    pub correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<String>,
    pub principal_id: String,
    pub message_group: String,
}

impl EventMetadata {
    pub fn builder() -> EventMetadataBuilder {
        EventMetadataBuilder::default()
    }
}

/// Builder for [`EventMetadata`]; `.from(ctx)` copies the tracing ids.
#[derive(Default)]
pub struct EventMetadataBuilder {
    event_id: Option<String>,
    event_type: Option<String>,
    source: Option<String>,
    subject: Option<String>,
    message_group: Option<String>,
    time: Option<DateTime<Utc>>,
    execution_id: Option<String>,
    correlation_id: Option<String>,
    causation_id: Option<String>,
    principal_id: Option<String>,
}

impl EventMetadataBuilder {
    pub fn from(mut self, ctx: &ExecutionContext) -> Self {
        self.execution_id = Some(ctx.execution_id.clone());
        self.correlation_id = Some(ctx.correlation_id.clone());
        self.causation_id = ctx.causation_id.clone();
        self.principal_id = Some(ctx.principal_id.clone());
        self
    }

    pub fn event_id(mut self, id: impl Into<String>) -> Self {
        self.event_id = Some(id.into());
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn message_group(mut self, group: impl Into<String>) -> Self {
        self.message_group = Some(group.into());
        self
    }

    /// Defaults to now when not set.
    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn build(self) -> Result<EventMetadata, UseCaseError> {
        fn required(value: Option<String>, field: &str) -> Result<String, UseCaseError> {
            value.ok_or_else(|| {
                UseCaseError::commit(format!("Event metadata is missing '{}'", field))
            })
        }

        Ok(EventMetadata {
            event_id: self
                .event_id
                .unwrap_or_else(|| IdGenerator::generate(prefixes::EVENT)),
            event_type: required(self.event_type, "event_type")?,
            spec_version: SPEC_VERSION.to_string(),
            source: required(self.source, "source")?,
            subject: required(self.subject, "subject")?,
            time: self.time.unwrap_or_else(Utc::now),
            execution_id: required(self.execution_id, "execution_id")?,
            correlation_id: required(self.correlation_id, "correlation_id")?,
            causation_id: self.causation_id,
            principal_id: required(self.principal_id, "principal_id")?,
            message_group: required(self.message_group, "message_group")?,
        })
    }
}

/// A persisted change event with its metadata and position in the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope<E> {
    pub metadata: EventMetadata,
    /// 1-based position of the event in its aggregate stream
    pub stream_version: u64,
    pub event: E,
}

impl<E: ChangeEvent> EventEnvelope<E> {
    /// Wrap `event`; `occurred_utc` becomes the envelope time.
    pub fn wrap(
        ctx: &ExecutionContext,
        source: &str,
        aggregate_type: &str,
        stream_version: u64,
        event: E,
    ) -> Result<Self, UseCaseError> {
        let domain = source.split(':').next_back().unwrap_or(source);
        let root_id = event.root_id();

        let metadata = EventMetadata::builder()
            .from(ctx)
            .event_type(format!("{}:{}:{}", domain, aggregate_type, event.action()))
            .source(source)
            .subject(format!("{}.{}.{}", domain, aggregate_type, root_id))
            .message_group(format!("{}:{}:{}", domain, aggregate_type, root_id))
            .time(event.occurred_utc())
            .build()?;

        Ok(Self {
            metadata,
            stream_version,
            event,
        })
    }
}

impl<E: ChangeEvent> DomainEvent for EventEnvelope<E> {
    fn event_id(&self) -> &str {
        &self.metadata.event_id
    }

    fn event_type(&self) -> &str {
        &self.metadata.event_type
    }

    fn spec_version(&self) -> &str {
        &self.metadata.spec_version
    }

    fn source(&self) -> &str {
        &self.metadata.source
    }

    fn subject(&self) -> &str {
        &self.metadata.subject
    }

    fn time(&self) -> DateTime<Utc> {
        self.metadata.time
    }

    fn execution_id(&self) -> &str {
        &self.metadata.execution_id
    }

    fn correlation_id(&self) -> &str {
        &self.metadata.correlation_id
    }

    fn causation_id(&self) -> Option<&str> {
        self.metadata.causation_id.as_deref()
    }

    fn principal_id(&self) -> &str {
        &self.metadata.principal_id
    }

    fn message_group(&self) -> &str {
        &self.metadata.message_group
    }

    fn to_data_json(&self) -> String {
        serde_json::to_string(&self.event).unwrap_or_else(|_| "{}".to_string())
    }
}
