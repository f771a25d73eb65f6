//! Connectors for the two federal legislature open-data APIs.
//!
//! [`CamaraClient`] talks to the lower chamber (deputies, their expenses and
//! votes, recent propositions); [`SenadoClient`] talks to the upper chamber's
//! current-members list. Both normalize their differently-shaped payloads
//! into the shared `fiscaliza-core` records through the adapters in
//! [`normalize`], so nothing downstream branches on which source a record
//! came from.

pub mod camara;
pub mod client;
pub mod error;
pub mod normalize;
pub mod senado;
pub mod types;

mod retry;

pub use camara::CamaraClient;
pub use client::SourceConfig;
pub use error::SourceError;
pub use senado::SenadoClient;
