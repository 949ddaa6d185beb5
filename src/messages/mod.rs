//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and Provider layers.

pub mod provider;
pub mod render;
pub mod ui_events;

pub use provider::{ProviderCommand, ProviderResponse};
pub use render::RenderState;
pub use ui_events::UiEvent;
