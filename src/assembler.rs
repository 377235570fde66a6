use rand::seq::IndexedRandom;
use rand::Rng;

/// Delimiter between skeleton fragments.
pub const FRAGMENT_DELIMITER: &str = ", ";

/// Sample up to `n` keywords uniformly without replacement.
///
/// A source shorter than `n` is returned whole; an empty source yields an
/// empty pick. This never fails.
pub fn pick<R: Rng + ?Sized>(rng: &mut R, source: &[String], n: usize) -> Vec<String> {
    if source.is_empty() || n == 0 {
        return Vec::new();
    }
    source.choose_multiple(rng, n.min(source.len())).cloned().collect()
}

/// Join the core idea and the per-category picks into a skeleton string.
///
/// Fragments are appended in the order given; empty fragments are
/// skipped. Returns `None` when nothing at all was picked so callers can
/// surface the empty state instead of queueing an empty prompt.
pub fn assemble(core_idea: &str, picks: &[Vec<String>]) -> Option<String> {
    let mut fragments: Vec<&str> = Vec::new();
    let idea = core_idea.trim();
    if !idea.is_empty() {
        fragments.push(idea);
    }
    for picked in picks {
        if let Some(first) = picked.first() {
            let fragment = first.trim();
            if !fragment.is_empty() {
                fragments.push(fragment);
            }
        }
    }
    if fragments.is_empty() {
        tracing::debug!("Skeleton came out empty");
        None
    } else {
        Some(fragments.join(FRAGMENT_DELIMITER))
    }
}
