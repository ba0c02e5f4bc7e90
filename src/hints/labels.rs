use std::collections::VecDeque;

use crate::hints::hint_model::{Label, LabelConfig, OverflowPolicy};

/// Result of allocating labels for a candidate list.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub labels: Vec<Label>,
    /// Candidates that did not get a label (truncation policy only).
    pub dropped: usize,
}

/// Allocate `count` prefix-free labels.
///
/// Labels are the leaves of a complete tree over the alphabet, grown
/// breadth-first: the shallowest leaf is split into one child per symbol
/// until there are enough leaves. Few candidates get single characters and
/// length grows one level at a time. The output only depends on `count` and
/// the config.
pub fn allocate(count: usize, config: &LabelConfig) -> Allocation {
    let symbols = config.symbols();
    if count == 0 || symbols.len() < 2 {
        return Allocation {
            labels: vec![],
            dropped: count,
        };
    }

    let wanted = match config.overflow {
        OverflowPolicy::Truncate => count.min(config.capacity()),
        OverflowPolicy::Extend => count,
    };

    let mut leaves: VecDeque<String> = VecDeque::from([String::new()]);
    while leaves.len() < wanted || leaves.front().is_some_and(String::is_empty) {
        let Some(parent) = leaves.pop_front() else {
            break;
        };
        for symbol in &symbols {
            let mut child = parent.clone();
            child.push(*symbol);
            leaves.push_back(child);
        }
    }

    let labels = leaves.into_iter().take(wanted).map(Label::new).collect();
    Allocation {
        labels,
        dropped: count - wanted,
    }
}

/// True when no label is a proper prefix of (or equal to) another.
pub fn is_prefix_free(labels: &[Label]) -> bool {
    labels.iter().enumerate().all(|(i, a)| {
        labels
            .iter()
            .enumerate()
            .all(|(j, b)| i == j || !b.starts_with(a.as_str()))
    })
}
