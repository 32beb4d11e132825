use serde::Serialize;

/// Identifier of a registered criterion, e.g. `"C1"`.
pub type CriterionId = &'static str;

/// Whether larger raw values are better (`Benefit`) or worse (`Cost`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Benefit,
    Cost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: &'static str,
    /// Field of an [`crate::Item`] holding this criterion's raw value.
    pub key: &'static str,
    pub polarity: Polarity,
}

impl Criterion {
    pub const fn benefit(id: CriterionId, name: &'static str, key: &'static str) -> Self {
        Self {
            id,
            name,
            key,
            polarity: Polarity::Benefit,
        }
    }

    pub const fn cost(id: CriterionId, name: &'static str, key: &'static str) -> Self {
        Self {
            id,
            name,
            key,
            polarity: Polarity::Cost,
        }
    }
}

/// Immutable catalog of the criteria an [`crate::Evaluator`] can resolve. Registries are meant to
/// be declared as `static` items so that every evaluation shares the same catalog.
#[derive(Clone, Copy, Debug)]
pub struct Registry {
    criteria: &'static [Criterion],
}

impl Registry {
    pub const fn new(criteria: &'static [Criterion]) -> Self {
        Self { criteria }
    }

    pub fn get(&self, id: &str) -> Option<&'static Criterion> {
        self.criteria.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Criterion> {
        self.criteria.iter()
    }

    /// Criterion ids in declaration order. This doubles as the default priority order.
    pub fn ids(&self) -> impl Iterator<Item = CriterionId> {
        self.criteria.iter().map(|c| c.id)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::{Criterion, Polarity, Registry};

    static CRITERIA: [Criterion; 2] = [
        Criterion::benefit("C1", "Views", "views"),
        Criterion::cost("C2", "Duration", "duration"),
    ];
    static REGISTRY: Registry = Registry::new(&CRITERIA);

    #[test]
    fn lookup() {
        assert_eq!(REGISTRY.get("C2").map(|c| c.key), Some("duration"));
        assert_eq!(REGISTRY.get("C2").map(|c| c.polarity), Some(Polarity::Cost));
        assert!(REGISTRY.get("C3").is_none());
        assert!(REGISTRY.get("c1").is_none());
    }

    #[test]
    fn declaration_order() {
        assert_eq!(REGISTRY.ids().collect::<Vec<_>>(), vec!["C1", "C2"]);
        assert_eq!(REGISTRY.len(), 2);
        assert!(!REGISTRY.is_empty());
    }
}
