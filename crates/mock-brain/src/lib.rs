//! Mock brain implementations for relay and workflow tests.
//!
//! - `EchoBrain` - Echoes messages back, optionally prefixed
//! - `ScriptedBrain` - Replays canned replies and records what it was asked
//! - `FailingBrain` - Always fails, for exercising fallback paths
//! - `DelayedBrain` - Wraps another brain with artificial delay
//!
//! For production use, see the `groq-brain` crate.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, EchoBrain, InboundMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = EchoBrain::new();
//!     let response = brain.process(InboundMessage::direct("web", "Hello!", 0)).await?;
//!     assert_eq!(response.text, "Hello!");
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod failing;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, HistoryMessage, InboundMessage, OutboundMessage};

pub use delayed::DelayedBrain;
pub use echo::EchoBrain;
pub use failing::FailingBrain;
pub use scripted::ScriptedBrain;
