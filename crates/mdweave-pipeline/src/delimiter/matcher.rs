//! Pairing of delimiter runs into spans.
//!
//! Works on the flat inline list produced by scanning one leaf block. Runs
//! sit in the list as [`Inline::Delimiter`] placeholders; pairing replaces
//! the nodes between an opener and its closer with a [`SpanNode`] and
//! decrements both runs. Whatever is left afterwards becomes literal text.

use tracing::trace;

use super::{DelimiterDescriptor, DelimiterRun, DescriptorSet};
use crate::syntax::{Inline, Literal, SpanNode};

/// Index of a placeholder in the inline list.
#[derive(Clone, Copy, Debug)]
struct StackEntry {
    node: usize,
}

fn run_at(inlines: &[Inline], index: usize) -> Option<DelimiterRun> {
    match inlines.get(index) {
        Some(Inline::Delimiter(run)) => Some(*run),
        _ => None,
    }
}

fn run_at_mut(inlines: &mut [Inline], index: usize) -> Option<&mut DelimiterRun> {
    match inlines.get_mut(index) {
        Some(Inline::Delimiter(run)) => Some(run),
        _ => None,
    }
}

/// Pair delimiter runs in `inlines`, then literalize the remainder.
///
/// Nested inline lists (link labels) are expected to have been resolved
/// when they were parsed; leftovers inside them are still literalized.
pub fn resolve(inlines: &mut Vec<Inline>, descriptors: &DescriptorSet) {
    pair_runs(inlines, descriptors);
    literalize(inlines);
}

fn pair_runs(inlines: &mut Vec<Inline>, descriptors: &DescriptorSet) {
    let mut stack: Vec<StackEntry> = inlines
        .iter()
        .enumerate()
        .filter(|(_, inline)| matches!(inline, Inline::Delimiter(_)))
        .map(|(node, _)| StackEntry { node })
        .collect();

    let mut current = 0;
    while current < stack.len() {
        let Some(closer) = run_at(inlines, stack[current].node) else {
            stack.remove(current);
            continue;
        };
        let Some(descriptor) = descriptors.get(closer.character) else {
            stack.remove(current);
            continue;
        };

        if !closer.can_close || closer.width < descriptor.min_width {
            current += 1;
            continue;
        }

        let Some(opener_index) = find_opener(inlines, &stack[..current], &closer, descriptor) else {
            if closer.can_open {
                current += 1;
            } else {
                stack.remove(current);
            }
            continue;
        };

        let opener_node = stack[opener_index].node;
        let closer_node = stack[current].node;
        let Some(opener) = run_at(inlines, opener_node) else {
            break;
        };

        let width = if descriptor.is_two_level() {
            opener.width.min(closer.width).min(descriptor.max_width)
        } else {
            descriptor.max_width
        };

        if let Some(run) = run_at_mut(inlines, opener_node) {
            run.width -= width;
        }
        if let Some(run) = run_at_mut(inlines, closer_node) {
            run.width -= width;
        }

        let children: Vec<Inline> = inlines.drain(opener_node + 1..closer_node).collect();
        let drained = children.len();
        inlines.insert(
            opener_node + 1,
            Inline::Span(SpanNode {
                delimiter: closer.character,
                width,
                children,
            }),
        );

        // Entries between opener and closer now live inside the span.
        stack.drain(opener_index + 1..current);
        current = opener_index + 1;
        for entry in &mut stack[current..] {
            entry.node = entry.node + 1 - drained;
        }

        let opener_left = opener.width - width;
        if opener_left < descriptor.min_width {
            stack.remove(opener_index);
            current -= 1;
        }

        let closer_left = closer.width - width;
        if closer_left < descriptor.min_width {
            stack.remove(current);
        }
    }
}

/// Nearest stack entry below the closer that can open a span with it.
fn find_opener(
    inlines: &[Inline],
    below: &[StackEntry],
    closer: &DelimiterRun,
    descriptor: &DelimiterDescriptor,
) -> Option<usize> {
    below.iter().rposition(|entry| {
        run_at(inlines, entry.node).is_some_and(|opener| {
            opener.character == closer.character
                && opener.can_open
                && opener.width >= descriptor.min_width
                && !violates_rule_of_three(&opener, closer, descriptor)
        })
    })
}

/// Rule of three, measured in units of the descriptor's minimum width.
///
/// Only two-level descriptors are subject to it.
fn violates_rule_of_three(
    opener: &DelimiterRun,
    closer: &DelimiterRun,
    descriptor: &DelimiterDescriptor,
) -> bool {
    if !descriptor.is_two_level() || !(opener.can_close || closer.can_open) {
        return false;
    }
    let opener_units = opener.original_width / descriptor.min_width;
    let closer_units = closer.original_width / descriptor.min_width;
    (opener_units + closer_units).is_multiple_of(3)
        && !(opener_units.is_multiple_of(3) && closer_units.is_multiple_of(3))
}

/// Replace every remaining placeholder with literal text, dropping empty
/// ones, and merge adjacent plain literals.
fn literalize(inlines: &mut Vec<Inline>) {
    let mut out: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines.drain(..) {
        let inline = match inline {
            Inline::Delimiter(run) if run.width == 0 => continue,
            Inline::Delimiter(run) => {
                trace!(
                    character = %run.character,
                    width = run.width,
                    "unmatched delimiter run kept as text"
                );
                Inline::text(std::iter::repeat_n(run.character, run.width).collect::<String>())
            }
            Inline::Span(mut span) => {
                literalize(&mut span.children);
                Inline::Span(span)
            }
            Inline::Link(mut link) => {
                literalize(&mut link.children);
                Inline::Link(link)
            }
            other => other,
        };
        push_merged(&mut out, inline);
    }
    *inlines = out;
}

/// Push `inline`, appending it to a preceding literal when it is plain text.
pub(crate) fn push_merged(out: &mut Vec<Inline>, inline: Inline) {
    if let Inline::Literal(Literal {
        content,
        first_char_escaped: false,
    }) = &inline
        && let Some(Inline::Literal(previous)) = out.last_mut()
    {
        previous.content.push_str(content);
        return;
    }
    out.push(inline);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn descriptors() -> DescriptorSet {
        let mut set = DescriptorSet::new();
        set.add(DelimiterDescriptor::new('*', 1, 2, true).unwrap()).unwrap();
        set.add(DelimiterDescriptor::new('"', 2, 2, false).unwrap()).unwrap();
        set
    }

    fn run(character: char, width: usize, can_open: bool, can_close: bool) -> Inline {
        Inline::Delimiter(DelimiterRun {
            character,
            original_width: width,
            width,
            can_open,
            can_close,
        })
    }

    fn span(delimiter: char, width: usize, children: Vec<Inline>) -> Inline {
        Inline::Span(SpanNode {
            delimiter,
            width,
            children,
        })
    }

    #[test]
    fn test_simple_pair() {
        let mut inlines = vec![
            run('*', 1, true, false),
            Inline::text("em"),
            run('*', 1, false, true),
        ];
        resolve(&mut inlines, &descriptors());
        assert_eq!(inlines, vec![span('*', 1, vec![Inline::text("em")])]);
    }

    #[test]
    fn test_triple_run_nests_strong_inside_em() {
        let mut inlines = vec![
            run('*', 3, true, false),
            Inline::text("x"),
            run('*', 3, false, true),
        ];
        resolve(&mut inlines, &descriptors());
        assert_eq!(
            inlines,
            vec![span('*', 1, vec![span('*', 2, vec![Inline::text("x")])])]
        );
    }

    #[test]
    fn test_leftover_opener_width_becomes_text_before_span() {
        let mut inlines = vec![
            run('*', 2, true, false),
            Inline::text("foo"),
            run('*', 1, false, true),
        ];
        resolve(&mut inlines, &descriptors());
        assert_eq!(
            inlines,
            vec![Inline::text("*"), span('*', 1, vec![Inline::text("foo")])]
        );
    }

    #[test]
    fn test_fixed_width_descriptor_consumes_exactly_max() {
        let mut inlines = vec![
            run('"', 3, true, false),
            Inline::text("q"),
            run('"', 2, false, true),
        ];
        resolve(&mut inlines, &descriptors());
        assert_eq!(
            inlines,
            vec![Inline::text("\""), span('"', 2, vec![Inline::text("q")])]
        );
    }

    #[test]
    fn test_different_characters_do_not_pair() {
        let mut inlines = vec![
            run('*', 2, true, false),
            Inline::text("x"),
            run('"', 2, false, true),
        ];
        resolve(&mut inlines, &descriptors());
        assert_eq!(inlines, vec![Inline::text("**x\"\"")]);
    }

    #[test]
    fn test_rule_of_three_blocks_pairing() {
        // `*foo**bar*`: the inner `**` may open and close, 1 + 2 is a multiple of 3.
        let mut inlines = vec![
            run('*', 1, true, false),
            Inline::text("foo"),
            run('*', 2, true, true),
            Inline::text("bar"),
            run('*', 1, false, true),
        ];
        resolve(&mut inlines, &descriptors());
        assert_eq!(inlines, vec![span('*', 1, vec![Inline::text("foo**bar")])]);
    }

    #[test]
    fn test_rule_of_three_skipped_for_fixed_width() {
        // One unit plus two units, both runs able to open and close.
        let mut inlines = vec![
            run('"', 2, true, true),
            Inline::text("a"),
            run('"', 4, true, true),
        ];
        resolve(&mut inlines, &descriptors());
        assert_eq!(
            inlines,
            vec![span('"', 2, vec![Inline::text("a")]), Inline::text("\"\"")]
        );
    }

    #[test]
    fn test_unmatched_runs_become_text() {
        let mut inlines = vec![run('*', 1, true, false), Inline::text("open")];
        resolve(&mut inlines, &descriptors());
        assert_eq!(inlines, vec![Inline::text("*open")]);
    }

    #[test]
    fn test_closer_without_opener_is_dropped() {
        let mut inlines = vec![
            Inline::text("a"),
            run('*', 1, false, true),
            run('*', 1, true, false),
            Inline::text("b"),
            run('*', 1, false, true),
        ];
        resolve(&mut inlines, &descriptors());
        assert_eq!(
            inlines,
            vec![Inline::text("a*"), span('*', 1, vec![Inline::text("b")])]
        );
    }

    #[test]
    fn test_no_placeholders_remain_in_nested_children() {
        let mut inlines = vec![
            run('*', 1, true, false),
            run('"', 2, true, false),
            Inline::text("x"),
            run('*', 1, false, true),
        ];
        resolve(&mut inlines, &descriptors());
        assert_eq!(inlines, vec![span('*', 1, vec![Inline::text("\"\"x")])]);
    }
}
