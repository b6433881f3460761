//! [Open Metrics StateSet](https://github.com/prometheus/OpenMetrics/blob/main/specification/OpenMetrics.md#stateset) metric type.

use std::sync::{atomic::AtomicBool, atomic::Ordering, Arc};

use crate::{
    error::{Error, Result},
    raw::{MetricType, TypedMetric},
    snapshot::{Cell, MetricData},
};

struct State {
    name: String,
    enabled: AtomicBool,
}

/// A set of independent boolean states, also called a bitset.
///
/// Unlike an enum-style single-choice state, each state here toggles independently: exactly one
/// state being `true` at a time is *not* enforced. States are serialized sorted by name ascending,
/// regardless of declaration order, for deterministic output across runs.
#[derive(Clone)]
pub struct StateSet {
    states: Arc<Vec<State>>,
}

impl StateSet {
    /// Creates a state set from an ordered list of state names, all initially `false`.
    ///
    /// Rejects an empty list and duplicate names.
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let mut states = Vec::new();
        for name in names {
            let name = name.into();
            if states.iter().any(|s: &State| s.name == name) {
                return Err(Error::invalid_label(format!(
                    "duplicate state name {name:?} in state set"
                )));
            }
            states.push(State { name, enabled: AtomicBool::new(false) });
        }
        if states.is_empty() {
            return Err(Error::missing_required("state set must declare at least one state"));
        }
        Ok(Self { states: Arc::new(states) })
    }

    /// Sets a single state's value. Returns [`Error::invalid_label`] if `name` was not declared.
    pub fn set(&self, name: &str, value: bool) -> Result<()> {
        let state = self
            .states
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::invalid_label(format!("unknown state {name:?}")))?;
        state.enabled.store(value, Ordering::Relaxed);
        Ok(())
    }

    /// Returns the current value of a single state, or `None` if `name` was not declared.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.states.iter().find(|s| s.name == name).map(|s| s.enabled.load(Ordering::Relaxed))
    }
}

impl TypedMetric for StateSet {
    const TYPE: MetricType = MetricType::StateSet;
}

impl Cell for StateSet {
    fn collect_data(&self) -> MetricData {
        let mut states: Vec<_> = self
            .states
            .iter()
            .map(|s| (s.name.clone(), s.enabled.load(Ordering::Relaxed)))
            .collect();
        states.sort_by(|a, b| a.0.cmp(&b.0));
        MetricData::StateSet { states }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_independent_and_sorted_by_name() {
        let set = StateSet::new(["b", "a", "c"]).unwrap();
        set.set("b", true).unwrap();
        set.set("c", true).unwrap();

        match set.collect_data() {
            MetricData::StateSet { states } => {
                assert_eq!(
                    states,
                    vec![
                        ("a".to_string(), false),
                        ("b".to_string(), true),
                        ("c".to_string(), true),
                    ]
                );
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_rejects_empty_and_duplicate() {
        assert!(StateSet::new(Vec::<&str>::new()).is_err());
        assert!(StateSet::new(["a", "a"]).is_err());
    }

    #[test]
    fn test_set_unknown_state_errors() {
        let set = StateSet::new(["a"]).unwrap();
        assert!(set.set("b", true).is_err());
    }
}
