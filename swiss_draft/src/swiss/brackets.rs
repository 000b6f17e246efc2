//! Score brackets.
//!
//! Active competitors are grouped by stage score, best first. A score group
//! larger than the configured cap is cut into consecutive sub-brackets in
//! ranking order, so every bracket keeps its members' common score.

use std::cmp::Ordering;

use super::models::{EnrollmentId, RankingKey};

/// A competitor eligible for pairing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contender {
    pub id: EnrollmentId,
    pub key: RankingKey,
}

impl Contender {
    pub fn new(id: EnrollmentId, key: RankingKey) -> Self {
        Self { id, key }
    }
}

/// Competitors sharing a score
#[derive(Debug, Clone, PartialEq)]
pub struct Bracket {
    pub score: u32,
    pub members: Vec<EnrollmentId>,
}

impl Bracket {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Build ordered score brackets
///
/// # Arguments
///
/// * `contenders` - Active competitors in any order
/// * `max_size` - Largest allowed bracket; values below 1 are treated as 1
///
/// # Returns
///
/// * `Vec<Bracket>` - Brackets from highest to lowest score. Every competitor
///   appears in exactly one bracket and no bracket exceeds `max_size`.
pub fn build_brackets(contenders: &[Contender], max_size: usize) -> Vec<Bracket> {
    let max_size = max_size.max(1);

    let mut ranked = contenders.to_vec();
    ranked.sort_by(|a, b| ranking_order(a, b));

    let mut brackets = Vec::new();
    let mut start = 0;
    while start < ranked.len() {
        let score = ranked[start].key.score;
        let end = ranked[start..]
            .iter()
            .position(|c| c.key.score != score)
            .map_or(ranked.len(), |offset| start + offset);

        for chunk in ranked[start..end].chunks(max_size) {
            brackets.push(Bracket {
                score,
                members: chunk.iter().map(|c| c.id).collect(),
            });
        }
        start = end;
    }

    brackets
}

/// Best first, then ascending ID for a stable order between equal keys
fn ranking_order(a: &Contender, b: &Contender) -> Ordering {
    b.key.compare(&a.key).then_with(|| a.id.cmp(&b.id))
}
