//! Property merger: reconciles one property value into another.
//!
//! The rules, in evaluation order:
//!
//! | target \ source | Null   | same container kind | anything else |
//! |-----------------|--------|---------------------|---------------|
//! | absent / Null   | keep   | adopt source        | adopt source  |
//! | Bag             | keep   | shallow overwrite   | source wins   |
//! | List            | keep   | typed append        | source wins   |
//! | Map             | keep   | typed upsert        | source wins   |
//! | scalar          | keep   | source wins         | source wins   |
//!
//! Keys in the [`SkipSet`] are never written. Structural merges are not
//! transactional: items applied before a type mismatch stay applied.

use tracing::trace;

use crate::model::{Bag, List, Map, Value, ValueType};
use crate::skip::SkipSet;
use crate::{Error, Result};

/// Merge `source` into `target[key]`.
///
/// An absent key is treated as a `Null` target value.
pub fn merge_property(target: &mut Bag, key: &str, source: &Value, skip: &SkipSet) -> Result<()> {
    if source.is_null() {
        return Ok(());
    }
    if skip.contains(key) {
        return Err(Error::ReservedKey(key.to_owned()));
    }

    let Some(current) = target.get_mut(key).filter(|v| !v.is_null()) else {
        target.insert(key, source.clone());
        return Ok(());
    };

    match (current, source) {
        (Value::Bag(into), Value::Bag(from)) => merge_bags(into, from, skip),
        (Value::List(into), Value::List(from)) => merge_lists(into, from)?,
        (Value::Map(into), Value::Map(from)) => merge_maps(into, from)?,
        (current, source) => *current = source.clone(),
    }
    trace!(key, "merged property");
    Ok(())
}

/// One level deep: every non-skipped source member overwrites the target's.
fn merge_bags(into: &mut Bag, from: &Bag, skip: &SkipSet) {
    for (key, value) in from.iter().filter(|(k, _)| !skip.contains(k)) {
        into.insert(key, value.clone());
    }
}

fn merge_lists(into: &mut List, from: &List) -> Result<()> {
    for item in &from.items {
        if !item.is_assignable_to(into.elem_type) {
            return Err(Error::TypeMismatch {
                found: item.type_name().to_owned(),
                expected: into.elem_type.to_string(),
            });
        }
        into.items.push(item.clone());
    }
    Ok(())
}

/// Null-valued source entries are dropped without error.
fn merge_maps(into: &mut Map, from: &Map) -> Result<()> {
    let key_fits = ValueType::String.is_assignable_to(into.key_type);
    for (key, value) in from.iter() {
        if value.is_null() {
            continue;
        }
        if !key_fits || !value.is_assignable_to(into.value_type) {
            return Err(Error::TypeMismatch {
                found: format!("{}-{}", ValueType::String, value.type_name()),
                expected: format!("{}-{}", into.key_type, into.value_type),
            });
        }
        into.upsert(key.to_owned(), value.clone());
    }
    Ok(())
}
