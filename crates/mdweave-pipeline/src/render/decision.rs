//! Chained per-node decisions.
//!
//! A renderer that lets extensions influence one of its choices (the tag of
//! an emphasis span, for instance) exposes a [`DecisionChain`]. Extensions
//! push strategies onto it; the most recently pushed strategy is asked
//! first and answers `None` to defer to the ones registered before it.

use crate::error::PipelineError;

/// One strategy in a [`DecisionChain`].
///
/// Implemented for every `Fn(&N) -> Option<O>` closure.
pub trait Decision<N: ?Sized, O>: Send + Sync {
    fn decide(&self, node: &N) -> Option<O>;
}

impl<N: ?Sized, O, F> Decision<N, O> for F
where
    F: Fn(&N) -> Option<O> + Send + Sync,
{
    fn decide(&self, node: &N) -> Option<O> {
        self(node)
    }
}

/// Ordered list of strategies, evaluated newest first.
///
/// ```
/// use mdweave_pipeline::render::DecisionChain;
///
/// let mut tags: DecisionChain<u32, &'static str> = DecisionChain::new("tag chain");
/// tags.push(|width: &u32| Some(if *width == 2 { "strong" } else { "em" })).unwrap();
/// tags.push(|width: &u32| (*width == 3).then_some("mark")).unwrap();
///
/// assert_eq!(tags.decide(&3), Some("mark"));
/// assert_eq!(tags.decide(&2), Some("strong"));
///
/// tags.freeze();
/// assert!(tags.push(|_: &u32| None).is_err());
/// ```
pub struct DecisionChain<N: ?Sized, O> {
    name: &'static str,
    strategies: Vec<Box<dyn Decision<N, O>>>,
    frozen: bool,
}

impl<N: ?Sized, O> std::fmt::Debug for DecisionChain<N, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionChain")
            .field("name", &self.name)
            .field("strategies", &self.strategies.len())
            .field("frozen", &self.frozen)
            .finish()
    }
}

impl<N: ?Sized, O> DecisionChain<N, O> {
    /// Empty chain. `name` identifies it in [`PipelineError::Frozen`].
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            strategies: Vec::new(),
            frozen: false,
        }
    }

    /// Register a strategy that takes precedence over all earlier ones.
    pub fn push(&mut self, strategy: impl Decision<N, O> + 'static) -> Result<(), PipelineError> {
        if self.frozen {
            return Err(PipelineError::Frozen(self.name));
        }
        self.strategies.push(Box::new(strategy));
        Ok(())
    }

    /// Ask strategies newest first; the first `Some` wins.
    pub fn decide(&self, node: &N) -> Option<O> {
        self.strategies
            .iter()
            .rev()
            .find_map(|strategy| strategy.decide(node))
    }

    /// Reject further registrations.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SpanNode;

    fn node(delimiter: char, width: usize) -> SpanNode {
        SpanNode {
            delimiter,
            width,
            children: Vec::new(),
        }
    }

    fn chain() -> DecisionChain<SpanNode, &'static str> {
        let mut chain = DecisionChain::new("emphasis tags");
        chain
            .push(|span: &SpanNode| match (span.delimiter, span.width) {
                ('*' | '_', 2) => Some("strong"),
                ('*' | '_', 1) => Some("em"),
                _ => None,
            })
            .unwrap();
        chain
    }

    struct Citation;

    impl Decision<SpanNode, &'static str> for Citation {
        fn decide(&self, span: &SpanNode) -> Option<&'static str> {
            (span.delimiter == '"' && span.width == 2).then_some("cite")
        }
    }

    #[test]
    fn test_newer_strategy_takes_precedence_and_defers() {
        let mut chain = chain();
        chain.push(Citation).unwrap();

        assert_eq!(chain.decide(&node('"', 2)), Some("cite"));
        assert_eq!(chain.decide(&node('*', 1)), Some("em"));
        assert_eq!(chain.decide(&node('*', 2)), Some("strong"));
        assert_eq!(chain.decide(&node('~', 2)), None);
    }

    #[test]
    fn test_frozen_chain_rejects_push() {
        let mut chain = chain();
        chain.freeze();

        let err = chain.push(Citation).unwrap_err();
        assert!(matches!(err, PipelineError::Frozen("emphasis tags")));
        assert_eq!(chain.len(), 1);
        assert!(chain.is_frozen());
    }

    #[test]
    fn test_empty_chain_decides_nothing() {
        let chain: DecisionChain<SpanNode, &'static str> = DecisionChain::new("empty");
        assert!(chain.is_empty());
        assert_eq!(chain.decide(&node('*', 1)), None);
    }

    #[test]
    fn test_chain_is_send_sync() {
        static_assertions::assert_impl_all!(DecisionChain<SpanNode, &'static str>: Send, Sync);
    }
}
