use crate::dom::dom_model::Document;
use crate::hints::hint_model::{Candidate, ViewportPolicy, VisibilityPolicy};

/// Keep the candidates a user can actually see under `policy`.
///
/// Idempotent: filtering an already filtered list changes nothing.
pub fn filter_visible(doc: &Document, candidates: Vec<Candidate>, policy: VisibilityPolicy) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| is_visible(doc, c, policy))
        .collect()
}

pub fn is_visible(doc: &Document, candidate: &Candidate, policy: VisibilityPolicy) -> bool {
    if candidate.rect.is_empty() {
        return false;
    }
    if !doc.is_laid_out(candidate.node) || doc.is_visibility_hidden(candidate.node) {
        return false;
    }

    // Part on screen right now: inside every clipping ancestor and the viewport.
    let on_screen = doc
        .clipped_rect(candidate.node)
        .and_then(|clipped| clipped.intersection(&doc.viewport()));
    if policy.viewport == ViewportPolicy::OnScreen && on_screen.is_none() {
        return false;
    }

    // Hit testing only works for points that are actually painted.
    if policy.check_occlusion {
        if let Some(shown) = on_screen {
            return match doc.element_from_point(shown.center()) {
                Some(hit) => doc.is_descendant_of(hit, candidate.node),
                None => false,
            };
        }
    }

    true
}
