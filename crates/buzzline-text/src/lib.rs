//! Text handling for Buzzline.
//!
//! Three independent concerns live here:
//!
//! - **Sanitize** ([`clean_content`]) — scrubbing user-supplied text before
//!   it enters a room's message feed.
//! - **Judge** ([`judge_answer`]) — deciding whether a submitted answer
//!   matches a question's canonical answer.
//! - **Names** ([`generate_id`], [`generate_name`]) — minting opaque
//!   identifiers and friendly default display names.
//!
//! All functions are pure (modulo the RNG in name generation), which keeps
//! the game logic that builds on them deterministic and easy to test.

mod judge;
mod names;
mod sanitize;

pub use judge::judge_answer;
pub use names::{generate_id, generate_name};
pub use sanitize::clean_content;
