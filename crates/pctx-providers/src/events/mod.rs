//! Event Publisher Implementations
//!
//! Backends for delivering [`ProviderEvent`]s to observers.
//!
//! | Provider | Delivery | Description |
//! |----------|----------|-------------|
//! | `NullEventPublisher` | none | Discards all events |
//! | `TokioEventBusProvider` | async stream | Tokio broadcast channel |
//! | `CallbackEventPublisher` | synchronous callback | Typed observer registration |

pub mod callback;
pub mod null;
pub mod tokio;

pub use callback::{CallbackEventPublisher, SubscriptionId};
pub use null::NullEventPublisher;
pub use self::tokio::TokioEventBusProvider;

pub use pctx_domain::events::{EventPublisher, ProviderEvent};
pub use pctx_domain::ports::{EventBusProvider, ProviderEventStream};
