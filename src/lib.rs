//! # ETH Wallet TUI
//!
//! A terminal wallet session on top of an EIP-1193 style provider.
//!
//! ## Features
//! - Connects to the wallet and shows the active account and its balance
//! - Sends ETH transfers and waits for confirmation
//! - Status messages that clear themselves after a few seconds
//! - Reloads the whole session when the account or chain changes
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (Wallet session state machine)
//! - Provider Layer (Tokio runtime, JSON-RPC)

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod messages;
pub mod models;
pub mod provider;
pub mod ui;
pub mod units;

// Re-export commonly used types
pub use app::{AppActor, SessionExit, WalletSession};
pub use config::Config;
pub use error::{ConfigError, ProviderError, WalletError};
pub use messages::{ProviderCommand, ProviderResponse, RenderState, UiEvent};
pub use models::{ConnectionStatus, ProviderEvent, StatusMessage, TransferPhase};
pub use provider::{InjectedProvider, JsonRpcProvider, ProviderActor};
pub use units::{format_balance, parse_amount};
