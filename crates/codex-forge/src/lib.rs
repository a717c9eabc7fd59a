//! Entry construction pipeline
//!
//! This crate is the orchestration core: it takes raw artifact bytes (whole
//! or chunked), computes the integrity token, obtains an anchor, assembles
//! and signs the entry, optionally persists artifact and entry to external
//! storage, performs the self-referential location rewrite, and runs the
//! schema validator as the final gate. Each entry-creation request is one
//! logical task; concurrent requests share nothing but the credential
//! store.
//!
//! # Example
//!
//! ```no_run
//! use codex_forge::{Forge, ForgeRequest, Payload};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let forge = Forge::local();
//! let outcome = forge
//!     .create_entry(ForgeRequest::new(Payload::Whole(b"Hello".to_vec()), "hello.txt"))
//!     .await?;
//! println!("{}", outcome.entry.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

pub mod chunks;
pub mod classify;
pub mod error;
pub mod pipeline;

pub use chunks::ChunkBuffer;
pub use classify::{
    content_kind, fallback_summary, fallback_tag, ClassifyError, ContentKind, HeuristicClassifier,
    TextClassifier,
};
pub use error::{BuildError, Phase, Result};
pub use pipeline::{BuildOutcome, Forge, ForgeConfig, ForgeRequest, Payload};
