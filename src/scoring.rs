use std::collections::BTreeMap;

use ordered_float::NotNan;
use serde::Serialize;

use crate::{Criterion, CriterionId, Normalized, NormalizedRow, WeightVector};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedItem<Id> {
    /// 1-based position after sorting by descending score.
    pub rank: usize,
    pub item_id: Id,
    pub score: Normalized,
    pub norm_values: BTreeMap<CriterionId, Normalized>,
    pub raw_values: BTreeMap<CriterionId, f64>,
    /// `weight × normalized value` per criterion. These sum to `score`.
    pub contributions: BTreeMap<CriterionId, Normalized>,
}

/// Score each row with [simple additive weighting](https://en.wikipedia.org/wiki/Weighted_sum_model)
/// and rank the results.
///
/// `weights` and `criteria` are index-aligned. Rows with equal scores keep their relative input
/// order, so the ranking is reproducible for tied items.
pub fn score<Id: Clone>(
    rows: &[NormalizedRow<Id>],
    weights: &WeightVector,
    criteria: &[&Criterion],
) -> Vec<RankedItem<Id>> {
    debug_assert_eq!(weights.len(), criteria.len());
    let mut ranked: Vec<RankedItem<Id>> = rows
        .iter()
        .map(|row| {
            let contributions: BTreeMap<CriterionId, Normalized> = criteria
                .iter()
                .zip(weights.iter())
                .map(|(c, w)| {
                    let r = row.norm_values.get(c.id).copied().unwrap_or(Normalized::ZERO);
                    (c.id, w * r)
                })
                .collect();
            RankedItem {
                rank: 0,
                item_id: row.item_id.clone(),
                score: contributions.values().copied().sum(),
                norm_values: row.norm_values.clone(),
                raw_values: row.raw_values.clone(),
                contributions,
            }
        })
        .collect();

    // `permutation::sort_by` sorts indices with a stable sort, so ties resolve to input order.
    let scores: Vec<NotNan<f64>> = ranked.iter().map(|r| r.score.as_inner()).collect();
    let mut order =
        permutation::sort_by(&scores[..], |a: &NotNan<f64>, b: &NotNan<f64>| b.cmp(a));
    order.apply_slice_in_place(&mut ranked);
    for (position, item) in ranked.iter_mut().enumerate() {
        item.rank = position + 1;
    }
    ranked
}

#[cfg(test)]
mod test {
    use proptest::{prop_assert, prop_assert_eq, proptest};

    use super::score;
    use crate::{
        normalize::normalize,
        num::assert_within,
        roc_weights,
        test::{items, TestItem, BENEFIT, COST},
        Normalized,
    };

    #[test]
    fn single_criterion_scenario() {
        let items = TestItem::column(&[10.0, 5.0, 0.0]);
        let matrix = normalize(&items, &[&BENEFIT]).unwrap();
        let ranked = score(&matrix.rows, &roc_weights(1).unwrap(), &[&BENEFIT]);
        let summary: Vec<(usize, usize, f64)> = ranked
            .iter()
            .map(|r| (r.rank, r.item_id, r.score.as_f64()))
            .collect();
        assert_eq!(summary, vec![(1, 0, 1.0), (2, 1, 0.5), (3, 2, 0.0)]);
    }

    #[test]
    fn ties_keep_input_order() {
        let items = TestItem::column(&[1.0, 3.0, 1.0, 3.0, 1.0]);
        let matrix = normalize(&items, &[&BENEFIT]).unwrap();
        let ranked = score(&matrix.rows, &roc_weights(1).unwrap(), &[&BENEFIT]);
        let ids: Vec<usize> = ranked.iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn contributions_follow_priority() {
        let items = vec![TestItem::new(0, 10.0, 1.0), TestItem::new(1, 5.0, 2.0)];
        let criteria = [&COST, &BENEFIT];
        let weights = roc_weights(2).unwrap();
        let matrix = normalize(&items, &criteria).unwrap();
        let ranked = score(&matrix.rows, &weights, &criteria);

        // Item 0 is cheapest on the higher-priority cost criterion.
        assert_eq!(ranked[0].item_id, 0);
        assert_within(ranked[0].contributions[COST.id].as_f64(), 0.75, 1e-12);
        assert_within(ranked[0].contributions[BENEFIT.id].as_f64(), 0.25, 1e-12);
        assert_eq!(ranked[0].score, Normalized::ONE);
        assert_within(ranked[1].contributions[COST.id].as_f64(), 0.375, 1e-12);
        assert_within(ranked[1].contributions[BENEFIT.id].as_f64(), 0.125, 1e-12);
    }

    proptest! {
        #[test]
        fn ranking_invariants(items in items(1..=24)) {
            let criteria = [&BENEFIT, &COST];
            let matrix = normalize(&items, &criteria).unwrap();
            let ranked = score(&matrix.rows, &roc_weights(2).unwrap(), &criteria);

            prop_assert_eq!(ranked.len(), items.len());
            for (position, item) in ranked.iter().enumerate() {
                prop_assert_eq!(item.rank, position + 1);
                let total: f64 = item.contributions.values().map(|c| c.as_f64()).sum();
                prop_assert!((total - item.score.as_f64()).abs() <= 1e-4);
            }
            let max = ranked.iter().map(|r| r.score).max().unwrap();
            prop_assert_eq!(ranked[0].score, max);
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].item_id < pair[1].item_id);
                }
            }
        }
    }
}
