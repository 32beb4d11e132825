use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Criterion, CriterionId, Error, Item, Normalized, Polarity};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedRow<Id> {
    pub item_id: Id,
    pub raw_values: BTreeMap<CriterionId, f64>,
    pub norm_values: BTreeMap<CriterionId, Normalized>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedMatrix<Id> {
    /// One row per item, in input order.
    pub rows: Vec<NormalizedRow<Id>>,
    pub max_values: BTreeMap<CriterionId, f64>,
    /// Only cost criteria have an entry, since only they normalize against the minimum.
    pub min_values: BTreeMap<CriterionId, f64>,
}

/// Scale each item's raw criterion values into [0, 1]:
/// - benefit: `x / max`, or 0 when every value is 0
/// - cost: `min / x`, or 0 when `x` is 0
///
/// Raw values must be finite and non-negative. Anything else is rejected with
/// [`Error::InvalidValue`] rather than clamped.
pub fn normalize<I>(
    items: &[I],
    criteria: &[&Criterion],
) -> Result<NormalizedMatrix<I::Id>, Error>
where
    I: Item,
{
    let raw: Vec<(I::Id, Vec<f64>)> = items
        .iter()
        .map(|item| {
            let values = criteria
                .iter()
                .map(|c| raw_value(item, c))
                .collect::<Result<Vec<f64>, Error>>()?;
            Ok((item.id(), values))
        })
        .collect::<Result<_, Error>>()?;

    let mut max_values: BTreeMap<CriterionId, f64> = BTreeMap::new();
    let mut min_values: BTreeMap<CriterionId, f64> = BTreeMap::new();
    let mut bounds: Vec<(f64, f64)> = Vec::with_capacity(criteria.len());
    for (j, criterion) in criteria.iter().enumerate() {
        let column = raw.iter().map(|(_, values)| values[j]);
        let max = column.clone().fold(0.0, f64::max);
        let min = column.fold(f64::INFINITY, f64::min);
        max_values.insert(criterion.id, max);
        if criterion.polarity == Polarity::Cost {
            min_values.insert(criterion.id, min);
        }
        bounds.push((min, max));
    }

    let rows = raw
        .into_iter()
        .map(|(item_id, values)| {
            let mut raw_values = BTreeMap::new();
            let mut norm_values = BTreeMap::new();
            for ((criterion, x), (min, max)) in criteria.iter().zip(values).zip(&bounds) {
                let r = match criterion.polarity {
                    Polarity::Benefit => Normalized::ratio(x, *max),
                    Polarity::Cost => Normalized::ratio(*min, x),
                };
                raw_values.insert(criterion.id, x);
                norm_values.insert(criterion.id, r);
            }
            NormalizedRow {
                item_id,
                raw_values,
                norm_values,
            }
        })
        .collect();

    Ok(NormalizedMatrix {
        rows,
        max_values,
        min_values,
    })
}

fn raw_value<I: Item>(item: &I, criterion: &Criterion) -> Result<f64, Error> {
    let value = item.value(criterion.key);
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidValue {
            item: item.id().to_string(),
            criterion: criterion.id.to_string(),
            value,
        });
    }
    // Fold -0.0 into 0.0 so it cannot leak into serialized output.
    if value == 0.0 {
        return Ok(0.0);
    }
    Ok(value)
}

#[cfg(test)]
mod test {
    use proptest::{prop_assert, prop_assert_eq, proptest};

    use super::normalize;
    use crate::{
        test::{items, TestItem, BENEFIT, COST},
        Criterion, Error, Normalized,
    };

    fn column(items: &[TestItem], criterion: &'static Criterion) -> Vec<f64> {
        normalize(items, &[criterion])
            .unwrap()
            .rows
            .iter()
            .map(|row| row.norm_values[criterion.id].as_f64())
            .collect()
    }

    #[test]
    fn benefit_scales_by_max() {
        let items = TestItem::column(&[10.0, 5.0, 0.0]);
        assert_eq!(column(&items, &BENEFIT), vec![1.0, 0.5, 0.0]);
        let matrix = normalize(&items, &[&BENEFIT]).unwrap();
        assert_eq!(matrix.max_values[BENEFIT.id], 10.0);
        assert!(matrix.min_values.is_empty());
    }

    #[test]
    fn cost_scales_by_min() {
        let items = TestItem::column(&[2.0, 4.0, 8.0]);
        assert_eq!(column(&items, &COST), vec![1.0, 0.5, 0.25]);
        let matrix = normalize(&items, &[&COST]).unwrap();
        assert_eq!(matrix.min_values[COST.id], 2.0);
    }

    #[test]
    fn cost_zero_value() {
        let items = TestItem::column(&[0.0, 4.0]);
        assert_eq!(column(&items, &COST), vec![0.0, 0.0]);
    }

    #[test]
    fn all_zero_criterion() {
        let items = TestItem::column(&[0.0, 0.0, 0.0]);
        assert_eq!(column(&items, &BENEFIT), vec![0.0, 0.0, 0.0]);
        assert_eq!(column(&items, &COST), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn raw_values_kept_at_full_precision() {
        let items = TestItem::column(&[3.0, 1.0]);
        let matrix = normalize(&items, &[&BENEFIT]).unwrap();
        assert_eq!(matrix.rows[1].raw_values[BENEFIT.id], 1.0);
        assert_eq!(matrix.rows[1].norm_values[BENEFIT.id].as_f64(), 1.0 / 3.0);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let items = TestItem::column(&[1.0, bad]);
            match normalize(&items, &[&BENEFIT]) {
                Err(Error::InvalidValue { item, criterion, .. }) => {
                    assert_eq!(item, "1");
                    assert_eq!(criterion, BENEFIT.id);
                }
                other => panic!("expected InvalidValue, got {other:?}"),
            }
        }
    }

    #[test]
    fn negative_zero_is_zero() {
        let items = TestItem::column(&[-0.0, 2.0]);
        let matrix = normalize(&items, &[&BENEFIT]).unwrap();
        assert!(matrix.rows[0].raw_values[BENEFIT.id].is_sign_positive());
    }

    proptest! {
        #[test]
        fn benefit_max_is_one(items in items(1..=16)) {
            let matrix = normalize(&items, &[&BENEFIT]).unwrap();
            let max = matrix.max_values[BENEFIT.id];
            for row in &matrix.rows {
                let r = row.norm_values[BENEFIT.id];
                prop_assert!(r >= Normalized::ZERO && r <= Normalized::ONE);
                if max > 0.0 && row.raw_values[BENEFIT.id] == max {
                    prop_assert_eq!(r, Normalized::ONE);
                }
                if max == 0.0 {
                    prop_assert_eq!(r, Normalized::ZERO);
                }
            }
        }

        #[test]
        fn cost_min_is_one(items in items(1..=16)) {
            let matrix = normalize(&items, &[&COST]).unwrap();
            let min = matrix.min_values[COST.id];
            for row in &matrix.rows {
                if min > 0.0 && row.raw_values[COST.id] == min {
                    prop_assert_eq!(row.norm_values[COST.id], Normalized::ONE);
                }
            }
        }
    }
}
