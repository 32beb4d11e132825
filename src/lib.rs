pub mod criteria;
mod error;
pub mod normalize;
pub mod num;
pub mod scoring;
pub mod weights;

use std::collections::{BTreeMap, BTreeSet};

pub use arrayvec::ArrayVec;
use serde::Serialize;

pub use crate::criteria::{Criterion, CriterionId, Polarity, Registry};
pub use crate::error::Error;
pub use crate::normalize::{NormalizedMatrix, NormalizedRow};
pub use crate::num::Normalized;
pub use crate::scoring::RankedItem;
pub use crate::weights::{roc_weights, WeightVector};

/// A caller-owned record with a raw value for each criterion key. Implementations should return
/// `0.0` for keys they do not carry.
pub trait Item {
    type Id: Clone + std::fmt::Display;
    fn id(&self) -> Self::Id;
    fn value(&self, key: &str) -> f64;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluationResult<Id> {
    pub ordered_criteria: Vec<Criterion>,
    pub weight_vector: WeightVector,
    pub weight_map: BTreeMap<CriterionId, Normalized>,
    pub normalized_rows: Vec<NormalizedRow<Id>>,
    pub max_values: BTreeMap<CriterionId, f64>,
    /// Column minimums, for cost criteria only.
    pub min_values: BTreeMap<CriterionId, f64>,
    pub ranking: Vec<RankedItem<Id>>,
}

impl<Id: PartialEq> EvaluationResult<Id> {
    /// The best `LIMIT` ranked items, rank 1 first.
    pub fn podium<const LIMIT: usize>(&self) -> ArrayVec<&RankedItem<Id>, LIMIT> {
        self.ranking.iter().take(LIMIT).collect()
    }

    pub fn find(&self, item_id: &Id) -> Option<&RankedItem<Id>> {
        self.ranking.iter().find(|r| &r.item_id == item_id)
    }
}

/// Entry point for ranking items against a [`Registry`]. Holds no state between calls: the
/// priority order is passed to every [`Evaluator::evaluate`] call, and the same inputs always
/// produce the same result.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator {
    registry: &'static Registry,
}

impl Evaluator {
    pub const fn new(registry: &'static Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'static Registry {
        self.registry
    }

    /// Rank `items` by SAW over ROC weights derived from `priority_order` (most important first).
    ///
    /// Fails without a partial result when either input is empty, when an id is not registered or
    /// repeated, or when an item carries a negative or non-finite raw value.
    #[tracing::instrument(skip_all, fields(items = items.len(), criteria = priority_order.len()))]
    pub fn evaluate<I, S>(
        &self,
        items: &[I],
        priority_order: &[S],
    ) -> Result<EvaluationResult<I::Id>, Error>
    where
        I: Item,
        S: AsRef<str>,
    {
        if items.is_empty() {
            return Err(Error::EmptyInput("items"));
        }
        if priority_order.is_empty() {
            return Err(Error::EmptyInput("priority order"));
        }
        let criteria = self.resolve(priority_order)?;

        let weight_vector = roc_weights(criteria.len())?;
        let weight_map: BTreeMap<CriterionId, Normalized> = criteria
            .iter()
            .zip(weight_vector.iter())
            .map(|(c, w)| (c.id, w))
            .collect();
        tracing::debug!(weights = ?weight_vector, "derived ROC weights");

        let NormalizedMatrix {
            rows,
            max_values,
            min_values,
        } = normalize::normalize(items, &criteria)?;
        let ranking = scoring::score(&rows, &weight_vector, &criteria);
        tracing::debug!(ranked = ranking.len(), "scored items");

        Ok(EvaluationResult {
            ordered_criteria: criteria.into_iter().copied().collect(),
            weight_vector,
            weight_map,
            normalized_rows: rows,
            max_values,
            min_values,
            ranking,
        })
    }

    fn resolve<S: AsRef<str>>(
        &self,
        priority_order: &[S],
    ) -> Result<Vec<&'static Criterion>, Error> {
        let mut seen: BTreeSet<CriterionId> = BTreeSet::new();
        priority_order
            .iter()
            .map(|id| {
                let id = id.as_ref();
                let criterion = self
                    .registry
                    .get(id)
                    .ok_or_else(|| Error::UnknownCriterion(id.to_string()))?;
                if !seen.insert(criterion.id) {
                    return Err(Error::DuplicateCriterion(id.to_string()));
                }
                Ok(criterion)
            })
            .collect()
    }
}
