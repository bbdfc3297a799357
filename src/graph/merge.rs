//! Merge-update support for property records
//!
//! A merge update overlays only the fields the caller supplied: `null`
//! fields in the patch leave the stored value alone, nested objects are
//! merged key by key, everything else is overwritten.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Overlay `patch` onto `base`, returning the merged record.
pub fn merge_properties<T>(base: &T, patch: &T) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    apply_patch(base, serde_json::to_value(patch)?)
}

/// Overlay a raw JSON patch onto `base`.
///
/// Keys the record does not know are dropped on the way back.
pub fn apply_patch<T>(base: &T, patch: Value) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = serde_json::to_value(base)?;
    overlay(&mut merged, patch);
    serde_json::from_value(merged)
}

fn overlay(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                if value.is_null() {
                    continue;
                }
                match base_map.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        overlay(existing, value)
                    }
                    _ => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => {
            if !patch.is_null() {
                *base = patch;
            }
        }
    }
}
