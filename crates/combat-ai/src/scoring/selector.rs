//! Action selection over the scored candidates.
//!
//! [`ActionScorer::select`] returns the best candidate after jitter;
//! [`ActionScorer::select_top_k`] samples uniformly among the best few for
//! fighters meant to play erratically.

use super::{ProfileWeights, Score, actions};
use crate::action::Action;
use crate::config::AiConfig;
use crate::context::DecisionContext;
use crate::rng::RandomSource;

/// Utility selector. Stateless: nothing survives between calls.
pub struct ActionScorer;

impl ActionScorer {
    /// Selects the best action for the given context and profile.
    ///
    /// Legal scores are multiplied by a factor drawn uniformly from the
    /// configured jitter range; blocked candidates are skipped entirely. The
    /// strictly greatest score wins, so ties go to the earlier candidate.
    pub fn select(
        ctx: &DecisionContext,
        weights: &ProfileWeights,
        config: &AiConfig,
        rng: &mut dyn RandomSource,
    ) -> (Action, Score) {
        let mut best: Option<(Action, Score)> = None;

        for action in Action::candidates() {
            let score = actions::score(action, ctx, weights);
            if !score.is_possible {
                tracing::debug!("  Action {action}: blocked");
                continue;
            }

            let jittered = score.scaled(rng.range_f64(config.jitter_min, config.jitter_max));
            tracing::debug!(
                "  Action {action}: score={:.1} (jittered={:.1})",
                score.value(),
                jittered.value()
            );

            if best.is_none_or(|(_, b)| jittered.value() > b.value()) {
                best = Some((action, jittered));
            }
        }

        // Idle is always legal, so `best` is only empty if the candidate
        // list itself changes.
        let (action, score) = best.unwrap_or((Action::Idle, Score::new(-100.0)));
        tracing::debug!("ActionScorer: best action = {action} (score={:.1})", score.value());
        (action, score)
    }

    /// Samples uniformly among the `k` best legal candidates (no jitter).
    ///
    /// Candidates are stable-sorted by descending score, so equal scores keep
    /// their candidate order when the pool is cut. Returns idle when nothing
    /// is legal.
    pub fn select_top_k(
        ctx: &DecisionContext,
        weights: &ProfileWeights,
        k: usize,
        rng: &mut dyn RandomSource,
    ) -> Action {
        let mut scored: Vec<(Action, Score)> = Self::evaluate_all(ctx, weights)
            .into_iter()
            .filter(|(_, score)| score.is_possible)
            .collect();
        scored.sort_by(|a, b| b.1.value().total_cmp(&a.1.value()));
        scored.truncate(k.max(1));

        tracing::debug!(
            "ActionScorer: top-{} pool = {:?}",
            k,
            scored.iter().map(|(a, _)| *a).collect::<Vec<_>>()
        );

        if scored.is_empty() {
            return Action::Idle;
        }
        scored[rng.index(scored.len())].0
    }

    /// Scores every candidate without jitter, in candidate order.
    pub fn evaluate_all(
        ctx: &DecisionContext,
        weights: &ProfileWeights,
    ) -> [(Action, Score); Action::COUNT] {
        Action::candidates().map(|action| (action, actions::score(action, ctx, weights)))
    }
}
