//! Error types for pipeline assembly.

/// Error raised while assembling a pipeline or configuring a renderer.
///
/// Parsing and rendering themselves never fail: unmatched delimiter runs
/// become literal text and unclaimed nodes are skipped.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A delimiter descriptor is already registered for this character.
    #[error("delimiter character '{0}' is already registered")]
    DuplicateDescriptor(char),

    /// A delimiter descriptor has invalid settings.
    #[error("invalid delimiter descriptor for '{character}': {reason}")]
    InvalidDescriptor {
        character: char,
        reason: &'static str,
    },

    /// A registry or decision chain was modified after it was frozen.
    #[error("{0} is frozen and can no longer be modified")]
    Frozen(&'static str),
}
