//! Simplified bidirectional text
//!
//! Reorders logical-order text with mixed directions into visual order one
//! paragraph at a time. Only four direction classes exist (see
//! [`Direction`]), brackets are paired up to [`BRACKET_DEPTH`] deep, and an
//! optional position map translates cursor positions between the two
//! orderings.
//!
//! ```
//! use fos_textcore::bidi::{BaseDirection, BidiResolver, BracketStack};
//!
//! let resolver = BidiResolver::new();
//! let text = "ab \u{05D0}\u{05D1}";
//! let mut out = vec![0u8; text.len()];
//! let mut stack = BracketStack::new();
//! resolver.resolve_paragraph(text.as_bytes(), BaseDirection::Ltr, Some(&mut out), None, &mut stack);
//! assert_eq!(out, "ab \u{05D1}\u{05D0}".as_bytes());
//! ```

mod brackets;
mod class;
mod position;
mod resolver;

pub use brackets::{mirror, BracketStack, BRACKET_DEPTH};
pub use class::{classify, BaseDirection, Direction, RLO};
pub use position::PositionEntry;
pub use resolver::{BidiConfig, BidiResolver, BidiRun, Runs, TextAlign};
