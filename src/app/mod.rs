//! App layer - central state management and command processing
//!
//! The App actor receives UI events, provider responses and provider events,
//! updates the wallet session, and emits provider commands and render state.

pub mod state;
pub mod actor;
pub mod commands;
pub mod status;

pub use state::{SessionState, WalletSession};
pub use actor::{AppActor, SessionExit};
