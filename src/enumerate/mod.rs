//! Session-less discovery of counter objects, items and paths.
//!
//! These run directly against a [`Provider`] through the growing-buffer
//! convention and are typically used before a session is opened to find
//! valid counter paths. Results are decoded, deduplicated and stable for a
//! given provider snapshot — no ordering beyond that is promised.


use std::collections::HashSet;

use crate::buffer;
use crate::ffi::bindings as b;
use crate::ffi::split_wide_list;
use crate::provider::Provider;
use crate::status::Result;

/// Tiered visibility filter controlling how many counter objects are
/// disclosed. Each wider tier is a superset of the previous one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetailLevel {
    #[default]
    Novice,
    Advanced,
    Expert,
    Wizard,
}

impl DetailLevel {
    pub fn bits(self) -> u32 {
        match self {
            DetailLevel::Novice => b::PERF_DETAIL_NOVICE,
            DetailLevel::Advanced => b::PERF_DETAIL_ADVANCED,
            DetailLevel::Expert => b::PERF_DETAIL_EXPERT,
            DetailLevel::Wizard => b::PERF_DETAIL_WIZARD,
        }
    }
}

/// The counter and instance names available under one object.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectItems {
    pub counters: Vec<String>,
    pub instances: Vec<String>,
}

/// Lists the counter object (category) names visible at the given detail
/// level.
pub fn enumerate_objects(
    provider: &dyn Provider,
    source: Option<&str>,
    machine: Option<&str>,
    detail: DetailLevel,
) -> Result<Vec<String>> {
    let blob = buffer::grow::<u16, _>(|len, buf| {
        provider.enum_objects(source, machine, detail, true, len, buf)
    })?;
    Ok(dedup(split_wide_list(&blob)))
}

/// Lists the counter names and instance names available under one object.
pub fn enumerate_object_items(
    provider: &dyn Provider,
    object: &str,
    source: Option<&str>,
    machine: Option<&str>,
    detail: DetailLevel,
) -> Result<ObjectItems> {
    let (counters, instances) =
        buffer::grow_pair::<u16, _>(|counters_len, counters_buf, instances_len, instances_buf| {
            provider.enum_object_items(
                source,
                machine,
                object,
                detail,
                counters_len,
                counters_buf,
                instances_len,
                instances_buf,
            )
        })?;
    Ok(ObjectItems {
        counters: dedup(split_wide_list(&counters)),
        instances: dedup(split_wide_list(&instances)),
    })
}

/// Resolves a counter path containing wildcard segments into every concrete
/// matching path.
///
/// The two flags independently suppress expansion of the counter-name
/// segment and the instance segment; with both suppressed the provider
/// returns only the literal input path.
pub fn expand_wildcards(
    provider: &dyn Provider,
    source: Option<&str>,
    path: &str,
    expand_counters: bool,
    expand_instances: bool,
) -> Result<Vec<String>> {
    let mut flags = 0;
    if !expand_counters {
        flags |= b::PDH_NOEXPANDCOUNTERS;
    }
    if !expand_instances {
        flags |= b::PDH_NOEXPANDINSTANCES;
    }

    let blob = buffer::grow::<u16, _>(|len, buf| {
        provider.expand_wildcard_path(source, path, flags, len, buf)
    })?;
    Ok(dedup(split_wide_list(&blob)))
}

// Insertion-stable dedup; provider lists are already mostly unique, this
// just guards against duplicate entries across refreshes.
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
