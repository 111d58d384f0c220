//! merge
//!
//! Three-way JSON merge used to reconcile a locally persisted draft with the
//! current server state.
//!
//! # Inputs
//!
//! - `base`: the snapshot the draft was started from (last synced state)
//! - `latest`: the current server-side snapshot
//! - `modified`: the user's locally edited snapshot
//!
//! # Rules
//!
//! The merge recurses by the shape of the values at each position:
//!
//! - **Scalars and mismatched shapes**: if the user left the value untouched
//!   (`base == modified`) the upstream value is adopted, otherwise the user's
//!   value wins outright. There is no "both changed" outcome: when both sides
//!   diverge from `base`, `modified` is returned.
//! - **Mappings**: merged key by key over the union of keys. A key the user
//!   removed stays removed. A key only upstream added is adopted. A key the
//!   user did not change takes the upstream value. A key the user changed is
//!   merged recursively when both `base` and `latest` have it, and taken
//!   as-is otherwise.
//! - **Lists**: when every element of all three lists is a mapping with an
//!   `id`, elements are matched by `id` and merged as mappings; elements of
//!   `modified` without a match in both `base` and `latest` pass through.
//!   Otherwise lists merge positionally.
//!
//! # Positional growth on both sides
//!
//! When `latest` and `modified` both grew past `base`, indices that exist in
//! `modified` take the user's element and only the part of `latest` beyond
//! `modified`'s length is appended. Upstream elements added at indices the
//! user also filled are dropped.
//!
//! Elements past the end of a truncated `modified` are dropped when `base`
//! had them: like a removed key, a removed element stays removed. Only
//! upstream additions beyond `base`'s length survive a truncation.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use spedit::merge::merge;
//!
//! let base = json!({"nested": {"a": 1, "b": 2}});
//! let latest = json!({"nested": {"a": 1, "b": 3}});
//! let modified = json!({"nested": {"a": 99, "b": 2}});
//!
//! assert_eq!(merge(&base, &latest, &modified), json!({"nested": {"a": 99, "b": 3}}));
//! ```

pub mod sanitize;

pub use sanitize::sanitize;

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::core::json::{deep_equals, has_id};

/// Merge `modified` onto `latest` using `base` as the common ancestor.
///
/// Pure and total: every well-formed input produces a value.
pub fn merge(base: &Value, latest: &Value, modified: &Value) -> Value {
    merge_value(base, latest, modified)
}

fn merge_value(base: &Value, latest: &Value, modified: &Value) -> Value {
    if deep_equals(base, modified) {
        return latest.clone();
    }

    match (base, latest, modified) {
        (Value::Object(b), Value::Object(l), Value::Object(m)) => {
            Value::Object(merge_maps(b, l, m))
        }
        (Value::Array(b), Value::Array(l), Value::Array(m)) => Value::Array(merge_lists(b, l, m)),
        _ => modified.clone(),
    }
}

fn merge_maps(
    base: &Map<String, Value>,
    latest: &Map<String, Value>,
    modified: &Map<String, Value>,
) -> Map<String, Value> {
    let mut result = Map::new();

    // Base order first, then keys added upstream, then keys added by the user.
    let keys = base
        .keys()
        .chain(latest.keys().filter(|key| !base.contains_key(*key)))
        .chain(
            modified
                .keys()
                .filter(|key| !base.contains_key(*key) && !latest.contains_key(*key)),
        );

    for key in keys {
        let base_val = base.get(key);
        let latest_val = latest.get(key);

        let Some(modified_val) = modified.get(key) else {
            // Removed by the user: stays removed. Added upstream only: adopt.
            if base_val.is_none() {
                if let Some(latest_val) = latest_val {
                    result.insert(key.clone(), latest_val.clone());
                }
            }
            continue;
        };

        let merged = match (base_val, latest_val) {
            (Some(b), _) if deep_equals(b, modified_val) => {
                latest_val.unwrap_or(modified_val).clone()
            }
            (Some(b), Some(l)) => merge_value(b, l, modified_val),
            _ => modified_val.clone(),
        };
        result.insert(key.clone(), merged);
    }

    result
}

fn merge_lists(base: &[Value], latest: &[Value], modified: &[Value]) -> Vec<Value> {
    let id_keyed = |list: &[Value]| list.iter().all(has_id);

    if id_keyed(base) && id_keyed(latest) && id_keyed(modified) {
        merge_id_lists(base, latest, modified)
    } else {
        merge_index_lists(base, latest, modified)
    }
}

/// Index elements by their serialized `id`; later duplicates win.
fn index_by_id(list: &[Value]) -> HashMap<String, &Map<String, Value>> {
    list.iter()
        .filter_map(|item| {
            let map = item.as_object()?;
            let id = map.get("id")?;
            Some((id_key(id), map))
        })
        .collect()
}

/// Integers key exactly; a float keys as an integer when it holds one.
fn id_key(id: &Value) -> String {
    const EXACT: f64 = 9_007_199_254_740_992.0;

    match id {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() <= EXACT => (f as i64).to_string(),
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        other => other.to_string(),
    }
}

fn merge_id_lists(base: &[Value], latest: &[Value], modified: &[Value]) -> Vec<Value> {
    let base_by_id = index_by_id(base);
    let latest_by_id = index_by_id(latest);

    modified
        .iter()
        .map(|item| {
            let matched = item.as_object().and_then(|map| {
                let key = id_key(map.get("id")?);
                Some((map, base_by_id.get(&key)?, latest_by_id.get(&key)?))
            });
            match matched {
                Some((m, b, l)) => Value::Object(merge_maps(b, l, m)),
                None => item.clone(),
            }
        })
        .collect()
}

fn merge_index_lists(base: &[Value], latest: &[Value], modified: &[Value]) -> Vec<Value> {
    let len = base.len().max(latest.len()).max(modified.len());
    let mut result = Vec::with_capacity(len);

    for i in 0..len {
        match (base.get(i), latest.get(i), modified.get(i)) {
            (Some(b), Some(l), Some(m)) => result.push(merge_value(b, l, m)),
            (_, _, Some(m)) => result.push(m.clone()),
            (None, Some(l), None) => result.push(l.clone()),
            (Some(_), _, None) | (None, None, None) => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod scalars {
        use super::*;

        #[test]
        fn untouched_adopts_latest() {
            assert_eq!(merge(&json!(1), &json!(2), &json!(1)), json!(2));
        }

        #[test]
        fn user_change_wins() {
            assert_eq!(merge(&json!(1), &json!(1), &json!(3)), json!(3));
        }

        #[test]
        fn user_wins_when_both_changed() {
            assert_eq!(merge(&json!("a0"), &json!("a1"), &json!("a2")), json!("a2"));
        }

        #[test]
        fn type_mismatch_follows_scalar_rule() {
            assert_eq!(
                merge(&json!({"a": 1}), &json!([1]), &json!("replaced")),
                json!("replaced")
            );
            assert_eq!(merge(&json!(null), &json!({"a": 1}), &json!(null)), json!({"a": 1}));
        }
    }

    mod maps {
        use super::*;

        #[test]
        fn returns_latest_when_no_user_changes() {
            let result = merge(&json!({"a": 1, "b": 2}), &json!({"a": 1, "b": 3}), &json!({"a": 1, "b": 2}));
            assert_eq!(result, json!({"a": 1, "b": 3}));
        }

        #[test]
        fn preserves_user_changes() {
            let result = merge(&json!({"a": 1, "b": 2}), &json!({"a": 1, "b": 2}), &json!({"a": 1, "b": 99}));
            assert_eq!(result, json!({"a": 1, "b": 99}));
        }

        #[test]
        fn user_change_wins_over_upstream_change() {
            let result = merge(&json!({"a": 1}), &json!({"a": 2}), &json!({"a": 3}));
            assert_eq!(result, json!({"a": 3}));
        }

        #[test]
        fn user_removal_wins() {
            let result = merge(&json!({"a": 1, "b": 2}), &json!({"a": 1, "b": 2}), &json!({"a": 1}));
            assert_eq!(result, json!({"a": 1}));
        }

        #[test]
        fn user_removal_wins_over_upstream_edit() {
            let result = merge(&json!({"a": 1, "b": 2}), &json!({"a": 1, "b": 5}), &json!({"a": 2}));
            assert_eq!(result, json!({"a": 2}));
        }

        #[test]
        fn upstream_addition_adopted() {
            let result = merge(&json!({"a": 1}), &json!({"a": 1, "b": 2}), &json!({"a": 1}));
            assert_eq!(result, json!({"a": 1, "b": 2}));
        }

        #[test]
        fn upstream_addition_adopted_alongside_user_edit() {
            let result = merge(&json!({"a": 1}), &json!({"a": 1, "b": 2}), &json!({"a": 5}));
            assert_eq!(result, json!({"a": 5, "b": 2}));
        }

        #[test]
        fn upstream_removal_of_untouched_key_keeps_user_copy() {
            // Unchanged by the user but gone upstream: nothing to adopt, keep modified.
            let result = merge(&json!({"a": 1, "b": 2}), &json!({"a": 1}), &json!({"a": 7, "b": 2}));
            assert_eq!(result, json!({"a": 7, "b": 2}));
        }

        #[test]
        fn user_addition_kept() {
            let result = merge(&json!({"a": 1}), &json!({"a": 2}), &json!({"a": 1, "c": true}));
            assert_eq!(result, json!({"a": 2, "c": true}));
        }

        #[test]
        fn nested_maps_merge_recursively() {
            let base = json!({"nested": {"a": 1, "b": 2}});
            let latest = json!({"nested": {"a": 1, "b": 3}});
            let modified = json!({"nested": {"a": 99, "b": 2}});
            assert_eq!(merge(&base, &latest, &modified), json!({"nested": {"a": 99, "b": 3}}));
        }

        #[test]
        fn result_preserves_first_seen_key_order() {
            let result = merge(&json!({"b": 1, "a": 1}), &json!({"b": 1, "a": 1, "c": 1}), &json!({"b": 2, "a": 1}));
            let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
            assert_eq!(keys, vec!["b", "a", "c"]);
        }

        #[test]
        fn key_union_orders_base_then_upstream_then_user() {
            let base = json!({"m": 1, "k": 1});
            let latest = json!({"z": 1, "k": 1, "m": 1, "u": 1});
            let modified = json!({"x": 1, "k": 1, "u": 2, "m": 1});
            let result = merge(&base, &latest, &modified);
            let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
            assert_eq!(keys, vec!["m", "k", "z", "u", "x"]);
            assert_eq!(result["u"], json!(2));
        }

        #[test]
        fn wide_mappings_keep_every_key_once() {
            let wide = |offset: usize| {
                Value::Object(
                    (0..2000)
                        .map(|i| (format!("k{}", i + offset), json!(i)))
                        .collect(),
                )
            };
            let result = merge(&wide(0), &wide(500), &wide(1000));
            let map = result.as_object().unwrap();
            assert_eq!(map.len(), 2000);
            assert!(map.contains_key("k2999"));
            assert!(!map.contains_key("k0"));
        }
    }

    mod lists {
        use super::*;

        #[test]
        fn id_keyed_elements_merge_independently() {
            let base = json!({"items": [{"id": "a", "v": 1}, {"id": "b", "v": 2}]});
            let latest = json!({"items": [{"id": "a", "v": 1}, {"id": "b", "v": 3}]});
            let modified = json!({"items": [{"id": "a", "v": 99}, {"id": "b", "v": 2}]});
            assert_eq!(
                merge(&base, &latest, &modified),
                json!({"items": [{"id": "a", "v": 99}, {"id": "b", "v": 3}]})
            );
        }

        #[test]
        fn id_keyed_follows_user_order() {
            let base = json!([{"id": 1, "v": 1}, {"id": 2, "v": 2}]);
            let latest = json!([{"id": 1, "v": 10}, {"id": 2, "v": 2}]);
            let modified = json!([{"id": 2, "v": 2}, {"id": 1, "v": 1}]);
            assert_eq!(
                merge(&base, &latest, &modified),
                json!([{"id": 2, "v": 2}, {"id": 1, "v": 10}])
            );
        }

        #[test]
        fn id_keyed_unmatched_user_element_passes_through() {
            let base = json!([{"id": "a", "v": 1}]);
            let latest = json!([{"id": "a", "v": 2}]);
            let modified = json!([{"id": "a", "v": 1}, {"id": "new", "v": 5}]);
            assert_eq!(
                merge(&base, &latest, &modified),
                json!([{"id": "a", "v": 2}, {"id": "new", "v": 5}])
            );
        }

        #[test]
        fn id_keyed_upstream_only_element_is_not_added() {
            let base = json!([{"id": "a", "v": 1}]);
            let latest = json!([{"id": "a", "v": 1}, {"id": "b", "v": 1}]);
            let modified = json!([{"id": "a", "v": 2}]);
            assert_eq!(merge(&base, &latest, &modified), json!([{"id": "a", "v": 2}]));
        }

        #[test]
        fn id_matching_is_numeric() {
            let base = json!([{"id": 1, "v": 1}]);
            let latest = json!([{"id": 1.0, "v": 1, "w": true}]);
            let modified = json!([{"id": 1, "v": 2}]);
            assert_eq!(
                merge(&base, &latest, &modified),
                json!([{"id": 1.0, "v": 2, "w": true}])
            );
        }

        #[test]
        fn large_integer_ids_stay_distinct() {
            let base = json!([{"id": 9007199254740992u64, "v": 1}, {"id": 9007199254740993u64, "v": 1}]);
            let latest = json!([{"id": 9007199254740992u64, "v": 5}, {"id": 9007199254740993u64, "v": 1}]);
            let modified = json!([{"id": 9007199254740992u64, "v": 1}, {"id": 9007199254740993u64, "v": 7}]);
            assert_eq!(
                merge(&base, &latest, &modified),
                json!([{"id": 9007199254740992u64, "v": 5}, {"id": 9007199254740993u64, "v": 7}])
            );
        }

        #[test]
        fn id_key_normalises_integral_floats() {
            assert_eq!(id_key(&json!(1)), id_key(&json!(1.0)));
            assert_eq!(id_key(&json!(-3)), id_key(&json!(-3.0)));
            assert_ne!(id_key(&json!(1)), id_key(&json!(1.5)));
            assert_ne!(id_key(&json!(9007199254740992u64)), id_key(&json!(9007199254740993u64)));
            assert_ne!(id_key(&json!(1)), id_key(&json!("1")));
        }

        #[test]
        fn index_based_merge() {
            let base = json!({"tags": ["a", "b"]});
            let latest = json!({"tags": ["a", "c"]});
            let modified = json!({"tags": ["x", "b"]});
            assert_eq!(merge(&base, &latest, &modified), json!({"tags": ["x", "c"]}));
        }

        #[test]
        fn mixed_elements_merge_positionally() {
            let base = json!([{"id": 1}, "b"]);
            let latest = json!([{"id": 1}, "c"]);
            let modified = json!([{"id": 2}, "b"]);
            assert_eq!(merge(&base, &latest, &modified), json!([{"id": 2}, "c"]));
        }

        #[test]
        fn latest_tail_appended() {
            let base = json!(["a"]);
            let latest = json!(["a", "b", "c"]);
            let modified = json!(["z"]);
            assert_eq!(merge(&base, &latest, &modified), json!(["z", "b", "c"]));
        }

        #[test]
        fn modified_tail_kept() {
            let base = json!(["a"]);
            let latest = json!(["b"]);
            let modified = json!(["a", "x", "y"]);
            assert_eq!(merge(&base, &latest, &modified), json!(["b", "x", "y"]));
        }

        #[test]
        fn growth_on_both_sides() {
            // User slots win; only upstream elements past the user's length survive.
            let base = json!(["a"]);
            let latest = json!(["a", "l1", "l2", "l3"]);
            let modified = json!(["a", "m1"]);
            assert_eq!(merge(&base, &latest, &modified), json!(["a", "m1", "l2", "l3"]));
        }

        #[test]
        fn user_truncation_keeps_upstream_additions_only() {
            let base = json!(["a", "b", "c"]);
            let latest = json!(["a", "b", "c", "d"]);
            let modified = json!(["a"]);
            assert_eq!(merge(&base, &latest, &modified), json!(["a", "d"]));
        }

        #[test]
        fn user_truncation_without_upstream_change() {
            let base = json!(["a", "b", "c"]);
            let modified = json!(["a", "b"]);
            assert_eq!(merge(&base, &base, &modified), modified);
        }
    }
}
