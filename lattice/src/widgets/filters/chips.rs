//! Applied-filter chips.

use std::collections::HashMap;

use serde_json::Value;

use crate::params::Params;
use crate::utils::value_key;

use super::Filter;

/// One removable chip: a currently-active filter value.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    /// The filter's param key.
    pub name: String,
    /// The raw value this chip stands for.
    pub value: Value,
    /// Display label resolved from the filter's options, falling back to
    /// the raw value.
    pub label: String,
}

/// Computes the chip row from the ambient params and emits removal deltas.
///
/// Label lookups go through a prebuilt per-filter value → label map, so
/// rendering N chips costs N map hits, not N option scans.
#[derive(Debug, Clone)]
pub struct AppliedFilters {
    filters: Vec<Filter>,
    label_maps: HashMap<String, HashMap<String, String>>,
}

impl AppliedFilters {
    pub fn new(filters: Vec<Filter>) -> Self {
        let label_maps = filters
            .iter()
            .map(|filter| (filter.name.clone(), filter.label_map()))
            .collect();
        Self {
            filters,
            label_maps,
        }
    }

    fn label_for(&self, name: &str, value: &Value) -> String {
        let raw = value_key(value);
        self.label_maps
            .get(name)
            .and_then(|map| map.get(&raw))
            .cloned()
            .unwrap_or(raw)
    }

    /// One chip per active array element, one per active scalar value,
    /// for every param key that corresponds to a known filter.
    pub fn chips(&self, params: &Params) -> Vec<Chip> {
        let mut chips = Vec::new();
        for filter in &self.filters {
            if !params.is_active(&filter.name) {
                continue;
            }
            match params.get(&filter.name) {
                Some(Value::Array(values)) => {
                    for value in values {
                        chips.push(Chip {
                            name: filter.name.clone(),
                            value: value.clone(),
                            label: self.label_for(&filter.name, value),
                        });
                    }
                }
                Some(value) => chips.push(Chip {
                    name: filter.name.clone(),
                    value: value.clone(),
                    label: self.label_for(&filter.name, value),
                }),
                None => {}
            }
        }
        chips
    }

    /// The params that removing one chip produces.
    ///
    /// Array-valued filters drop just the chip's element; scalar filters
    /// lose the whole key.
    pub fn without_chip(&self, params: &Params, chip: &Chip) -> Params {
        match params.get(&chip.name) {
            Some(Value::Array(values)) => {
                let remaining: Vec<Value> = values
                    .iter()
                    .filter(|value| *value != &chip.value)
                    .cloned()
                    .collect();
                let value = if remaining.is_empty() {
                    Value::Null
                } else {
                    Value::Array(remaining)
                };
                params.merged([(chip.name.clone(), value)])
            }
            Some(_) => params.without(&chip.name),
            None => params.clone(),
        }
    }
}
