//! Delimiter-run matching engine.
//!
//! Ambiguous punctuation runs (`*`, `_`, or any character an extension
//! registers) are scanned into [`DelimiterRun`] placeholders, then paired
//! into nested [`SpanNode`](crate::syntax::SpanNode)s once the whole leaf
//! block is scanned. Each governed character has one
//! [`DelimiterDescriptor`] controlling span widths and intraword behavior.

mod descriptor;
pub mod matcher;
mod parser;
mod run;

pub use descriptor::{DelimiterDescriptor, DescriptorSet};
pub use parser::DelimiterParser;
pub use run::DelimiterRun;
