//! Use Case Infrastructure
//!
//! - `UseCaseResult<T>` / `UseCaseError` - categorized outcomes
//! - `Aggregate` / `ChangeEvent` - event-sourced state with `raise` and replay
//! - `EventEnvelope` / `DomainEvent` - persisted events with tracing metadata
//! - `ExecutionContext` - acting principal and tracing ids
//! - `EventStore` - versioned stream persistence seam

pub mod aggregate;
pub mod domain_event;
pub mod error;
pub mod event_store;
pub mod execution_context;
pub mod result;

pub use aggregate::{Aggregate, ChangeEvent, ChangeLog};
pub use domain_event::{DomainEvent, EventEnvelope, EventMetadata, EventMetadataBuilder};
pub use error::{ErrorDetails, UseCaseError};
pub use event_store::{EventStore, InMemoryEventStore};
pub use execution_context::ExecutionContext;
pub use result::UseCaseResult;
