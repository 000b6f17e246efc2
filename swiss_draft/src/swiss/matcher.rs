//! Bracket-by-bracket Swiss pairing.
//!
//! Each bracket becomes a graph whose edges join competitors that have not
//! met yet. Edge weights are drawn at random so equivalent pairings are
//! chosen fairly, and edges touching a competitor pushed down from a higher
//! bracket get the top weight so leftovers are absorbed first. A
//! maximum-cardinality maximum-weight matching picks the pairs; whoever is
//! left unmatched cascades into the next bracket.
//!
//! The matcher only produces a [`PairingPlan`]. Nothing is written until the
//! caller commits the plan, so a failed pairing leaves no partial state.

use rand::Rng;
use std::collections::BTreeMap;

use super::blossom::{WeightedEdge, max_weight_matching};
use super::brackets::Bracket;
use super::errors::PairingError;
use super::models::{Enrollment, EnrollmentId};
use crate::config::SwissConfig;

/// Read access to the pairing history the matcher needs
pub trait PairingHistory {
    /// Whether `a` and `b` have already met in the current stage
    fn have_played(&self, a: EnrollmentId, b: EnrollmentId) -> bool;

    /// Nominal stage score of a competitor
    fn score_of(&self, id: EnrollmentId) -> u32;

    /// Whether a competitor already received a bye in the current stage
    fn had_bye(&self, id: EnrollmentId) -> bool;
}

impl PairingHistory for BTreeMap<EnrollmentId, Enrollment> {
    fn have_played(&self, a: EnrollmentId, b: EnrollmentId) -> bool {
        self.get(&a).is_some_and(|e| e.has_played(b))
    }

    fn score_of(&self, id: EnrollmentId) -> u32 {
        self.get(&id).map_or(0, |e| e.stage.score)
    }

    fn had_bye(&self, id: EnrollmentId) -> bool {
        self.get(&id).is_some_and(|e| e.had_bye)
    }
}

/// Outcome of pairing one round, not yet applied to any state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingPlan {
    /// Pairs in table order, higher-ranked competitor first
    pub pairs: Vec<(EnrollmentId, EnrollmentId)>,
    pub byes: Vec<EnrollmentId>,
    /// Pairs that repeat an earlier meeting (repeat fallback only)
    pub repeat_pairs: usize,
}

impl PairingPlan {
    /// Every competitor placed by this plan
    pub fn participants(&self) -> impl Iterator<Item = EnrollmentId> + '_ {
        self.pairs
            .iter()
            .flat_map(|&(a, b)| [a, b])
            .chain(self.byes.iter().copied())
    }
}

/// Swiss pairing engine
#[derive(Debug, Clone)]
pub struct Matcher {
    config: SwissConfig,
}

impl Matcher {
    pub fn new(config: SwissConfig) -> Self {
        Self { config }
    }

    /// Pair a round
    ///
    /// # Arguments
    ///
    /// * `brackets` - Score brackets, highest first
    /// * `history` - Previous meetings, scores and byes
    /// * `rng` - Source of the random edge weights
    ///
    /// # Errors
    ///
    /// Returns [`PairingError::Unresolvable`] when two or more competitors
    /// remain unpaired after the lowest bracket and the repeat fallback is
    /// disabled.
    pub fn plan<H, R>(
        &self,
        brackets: &[Bracket],
        history: &H,
        rng: &mut R,
    ) -> Result<PairingPlan, PairingError>
    where
        H: PairingHistory + ?Sized,
        R: Rng + ?Sized,
    {
        let mut plan = PairingPlan::default();
        let mut carried: Vec<EnrollmentId> = Vec::new();

        for (idx, bracket) in brackets.iter().enumerate() {
            let lowest = idx + 1 == brackets.len();

            let mut pool = std::mem::take(&mut carried);
            pool.extend(bracket.members.iter().copied());

            let edges = self.bracket_edges(&pool, bracket.score, lowest, history, rng);
            let mates = max_weight_matching(pool.len(), &edges, true);

            let (pairs, leftover) = collect_pairs(&pool, &mates);
            log::debug!(
                "Bracket {} (score {}): {} pairs, {} carried",
                idx + 1,
                bracket.score,
                pairs.len(),
                leftover.len()
            );
            plan.pairs.extend(pairs);
            carried = leftover;
        }

        match carried.len() {
            0 => {}
            1 => plan.byes.push(self.assign_bye(&carried, history)),
            _ if self.config.allow_repeat_fallback => {
                self.pair_with_repeats(&carried, history, rng, &mut plan);
            }
            _ => return Err(PairingError::Unresolvable { leftover: carried }),
        }

        Ok(plan)
    }

    fn bracket_edges<H, R>(
        &self,
        pool: &[EnrollmentId],
        score: u32,
        lowest: bool,
        history: &H,
        rng: &mut R,
    ) -> Vec<WeightedEdge>
    where
        H: PairingHistory + ?Sized,
        R: Rng + ?Sized,
    {
        let pushdown = self.config.pushdown_edge_weight;
        let mut edges = Vec::new();
        for i in 0..pool.len() {
            for j in (i + 1)..pool.len() {
                let (a, b) = (pool[i], pool[j]);
                if history.have_played(a, b) {
                    continue;
                }
                let random =
                    rng.random_range(self.config.min_edge_weight..=self.config.max_edge_weight);
                let pushed_down =
                    history.score_of(a) != score || history.score_of(b) != score;
                let mut weight = if pushed_down { pushdown } else { random };
                if lowest {
                    // The single leftover of the lowest bracket gets the bye
                    weight += self.bye_bonus(a, b, history);
                }
                edges.push(WeightedEdge::new(i, j, weight));
            }
        }
        edges
    }

    /// Extra weight pulling competitors with a previous bye into a match
    fn bye_bonus<H>(&self, a: EnrollmentId, b: EnrollmentId, history: &H) -> i64
    where
        H: PairingHistory + ?Sized,
    {
        let had_bye = [a, b].iter().filter(|&&id| history.had_bye(id)).count() as i64;
        had_bye * self.config.pushdown_edge_weight
    }

    /// Prefer a competitor without a previous bye
    fn assign_bye<H>(&self, candidates: &[EnrollmentId], history: &H) -> EnrollmentId
    where
        H: PairingHistory + ?Sized,
    {
        let chosen = candidates
            .iter()
            .copied()
            .find(|&id| !history.had_bye(id))
            .unwrap_or(candidates[0]);
        if history.had_bye(chosen) {
            log::warn!("Enrollment {} receives a second bye", chosen);
        }
        chosen
    }

    /// Last resort: pair leftovers ignoring previous meetings
    fn pair_with_repeats<H, R>(
        &self,
        leftover: &[EnrollmentId],
        history: &H,
        rng: &mut R,
        plan: &mut PairingPlan,
    ) where
        H: PairingHistory + ?Sized,
        R: Rng + ?Sized,
    {
        let mut edges = Vec::new();
        for i in 0..leftover.len() {
            for j in (i + 1)..leftover.len() {
                let (a, b) = (leftover[i], leftover[j]);
                let mut weight =
                    rng.random_range(self.config.min_edge_weight..=self.config.max_edge_weight);
                weight += self.bye_bonus(a, b, history);
                // Fresh pairings still beat rematches
                if !history.have_played(a, b) {
                    weight += 3 * self.config.pushdown_edge_weight;
                }
                edges.push(WeightedEdge::new(i, j, weight));
            }
        }

        let mates = max_weight_matching(leftover.len(), &edges, true);
        let (pairs, rest) = collect_pairs(leftover, &mates);

        let repeats = pairs
            .iter()
            .filter(|&&(a, b)| history.have_played(a, b))
            .count();
        log::warn!(
            "Repeat fallback paired {} leftovers with {} rematches",
            leftover.len(),
            repeats
        );

        plan.repeat_pairs += repeats;
        plan.pairs.extend(pairs);
        if !rest.is_empty() {
            plan.byes.push(self.assign_bye(&rest, history));
        }
    }
}

fn collect_pairs(
    pool: &[EnrollmentId],
    mates: &[Option<usize>],
) -> (Vec<(EnrollmentId, EnrollmentId)>, Vec<EnrollmentId>) {
    let mut pairs = Vec::new();
    let mut leftover = Vec::new();
    for (i, mate) in mates.iter().enumerate() {
        match mate {
            Some(j) if i < *j => pairs.push((pool[i], pool[*j])),
            Some(_) => {}
            None => leftover.push(pool[i]),
        }
    }
    (pairs, leftover)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swiss::brackets::{Contender, build_brackets};
    use crate::swiss::models::RankingKey;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    fn field(size: i64) -> BTreeMap<EnrollmentId, Enrollment> {
        (1..=size)
            .map(|id| (id, Enrollment::new(id, format!("player{id}"))))
            .collect()
    }

    fn meet(field: &mut BTreeMap<EnrollmentId, Enrollment>, a: EnrollmentId, b: EnrollmentId) {
        if let Some(e) = field.get_mut(&a) {
            e.pairings.insert(b);
        }
        if let Some(e) = field.get_mut(&b) {
            e.pairings.insert(a);
        }
    }

    fn brackets(field: &BTreeMap<EnrollmentId, Enrollment>) -> Vec<Bracket> {
        let contenders: Vec<Contender> = field
            .values()
            .map(|e| {
                Contender::new(
                    e.id,
                    RankingKey {
                        score: e.stage.score,
                        ..RankingKey::default()
                    },
                )
            })
            .collect();
        build_brackets(&contenders, 25)
    }

    fn assert_disjoint(plan: &PairingPlan) {
        let mut seen = BTreeSet::new();
        for id in plan.participants() {
            assert!(seen.insert(id), "enrollment {id} placed twice");
        }
    }

    #[test]
    fn test_odd_field_gets_one_bye() {
        let field = field(9);
        let matcher = Matcher::new(SwissConfig::default());
        let mut rng = StdRng::seed_from_u64(7);

        let plan = matcher
            .plan(&brackets(&field), &field, &mut rng)
            .expect("pairing succeeds");

        assert_eq!(plan.pairs.len(), 4);
        assert_eq!(plan.byes.len(), 1);
        assert_eq!(plan.repeat_pairs, 0);
        assert_disjoint(&plan);
    }

    #[test]
    fn test_same_seed_same_pairing() {
        let field = field(16);
        let matcher = Matcher::new(SwissConfig::default());

        let first = matcher
            .plan(&brackets(&field), &field, &mut StdRng::seed_from_u64(42))
            .expect("pairing succeeds");
        let second = matcher
            .plan(&brackets(&field), &field, &mut StdRng::seed_from_u64(42))
            .expect("pairing succeeds");

        assert_eq!(first, second);
    }

    #[test]
    fn test_avoids_previous_opponents() {
        let mut field = field(4);
        meet(&mut field, 1, 2);
        meet(&mut field, 3, 4);
        let matcher = Matcher::new(SwissConfig::default());

        for seed in 0..20 {
            let plan = matcher
                .plan(&brackets(&field), &field, &mut StdRng::seed_from_u64(seed))
                .expect("pairing succeeds");
            assert_eq!(plan.pairs.len(), 2);
            for &(a, b) in &plan.pairs {
                assert!(!field.have_played(a, b), "{a} and {b} met again");
            }
        }
    }

    #[test]
    fn test_leftover_cascades_into_lower_bracket() {
        let mut field = field(4);
        // 1 and 2 lead but have already met, so one of them drops down
        for id in [1, 2] {
            if let Some(e) = field.get_mut(&id) {
                e.stage.score = 3;
            }
        }
        meet(&mut field, 1, 2);
        let matcher = Matcher::new(SwissConfig::default());

        let plan = matcher
            .plan(&brackets(&field), &field, &mut StdRng::seed_from_u64(1))
            .expect("pairing succeeds");

        assert_eq!(plan.pairs.len(), 2);
        assert!(plan.byes.is_empty());
        for &(a, b) in &plan.pairs {
            assert!(!field.have_played(a, b));
        }
    }

    #[test]
    fn test_bye_goes_to_competitor_without_previous_bye() {
        let mut field = field(3);
        for id in [1, 2] {
            if let Some(e) = field.get_mut(&id) {
                e.had_bye = true;
            }
        }
        let matcher = Matcher::new(SwissConfig::default());

        for seed in 0..10 {
            let plan = matcher
                .plan(&brackets(&field), &field, &mut StdRng::seed_from_u64(seed))
                .expect("pairing succeeds");
            assert_eq!(plan.byes, vec![3]);
        }
    }

    #[test]
    fn test_unresolvable_leftovers_fail() {
        let mut field = field(2);
        meet(&mut field, 1, 2);
        let matcher = Matcher::new(SwissConfig::default());

        let err = matcher
            .plan(&brackets(&field), &field, &mut StdRng::seed_from_u64(3))
            .expect_err("everyone has already met");

        assert_eq!(err, PairingError::Unresolvable { leftover: vec![1, 2] });
    }

    #[test]
    fn test_repeat_fallback_pairs_leftovers() {
        let mut field = field(2);
        meet(&mut field, 1, 2);
        let matcher = Matcher::new(SwissConfig {
            allow_repeat_fallback: true,
            ..SwissConfig::default()
        });

        let plan = matcher
            .plan(&brackets(&field), &field, &mut StdRng::seed_from_u64(3))
            .expect("fallback pairs anyway");

        assert_eq!(plan.pairs, vec![(1, 2)]);
        assert_eq!(plan.repeat_pairs, 1);
    }

    #[test]
    fn test_large_field_spanning_split_brackets() {
        let field = field(60);
        let matcher = Matcher::new(SwissConfig::default());

        let plan = matcher
            .plan(&brackets(&field), &field, &mut StdRng::seed_from_u64(11))
            .expect("pairing succeeds");

        assert_eq!(plan.pairs.len(), 30);
        assert!(plan.byes.is_empty());
        assert_disjoint(&plan);
    }
}
