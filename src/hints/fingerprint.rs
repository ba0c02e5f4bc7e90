use sha1::{Digest, Sha1};

use crate::dom::dom_model::Document;
use crate::hints::hint_model::Hint;

/// SHA-1 over every (label, node path) pair. Equal fingerprints mean the
/// same elements got the same labels.
pub fn hint_fingerprint(hints: &[Hint], doc: &Document) -> String {
    let mut hasher = Sha1::new();
    for hint in hints {
        hasher.update(hint.label.as_str().as_bytes());
        hasher.update(b"=");
        hasher.update(doc.node_path(hint.candidate.node).as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}
