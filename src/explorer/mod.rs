//! Public explorer API clients.
//!
//! # Data Flow
//!
//! ```text
//! ExplorerConfig ──> build_client ──┬──> UtxoExplorer (BlockCypher-style)
//!                                   ├──> EvmExplorer  (Etherscan-style)
//!                                   └──> TronExplorer (Tronscan-style)
//!                                              │
//!                                              ▼
//!                                   chains::source traits
//! ```
//!
//! # Design Decisions
//!
//! - Each client implements exactly one source trait; adapters never see
//!   HTTP, URLs, or response envelopes.
//! - Response structs mirror the wire format and stay private; mapping
//!   functions translate into the source-trait types.
//! - Timeouts and malformed bodies map to typed `ChainError` variants so
//!   the verifier can report them uniformly.

pub mod evm_api;
mod http;
pub mod tron_api;
pub mod utxo_api;

pub use evm_api::EvmExplorer;
pub use tron_api::TronExplorer;
pub use utxo_api::UtxoExplorer;
