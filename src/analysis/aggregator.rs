//! Hit aggregation and statistics.
//!
//! This module turns per-platform response records into the run summary:
//! hit counts and percentages, the winning/gap prompt partition and the
//! week-over-week delta.

use crate::models::{Platform, PlatformStats, PromptHits, ResponseRecord, Summary};
use std::collections::{BTreeMap, HashMap};

/// Records per platform, in catalog order.
pub type PlatformRecords = BTreeMap<Platform, Vec<ResponseRecord>>;

/// Integer percentage of `hits` in `total`, rounding halves to even.
///
/// A zero total yields 0.
pub fn percent(hits: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (hits as f64 / total as f64 * 100.0).round_ties_even() as i64
}

/// Count the mentions in a record list.
pub fn count_hits(records: &[ResponseRecord]) -> usize {
    records.iter().filter(|r| r.mentioned).count()
}

/// Hit statistics per platform.
pub fn per_platform_stats(records: &PlatformRecords) -> BTreeMap<Platform, PlatformStats> {
    records
        .iter()
        .map(|(platform, list)| {
            let hits = count_hits(list);
            let stats = PlatformStats {
                hits,
                total: list.len(),
                pct: percent(hits, list.len()),
            };
            (*platform, stats)
        })
        .collect()
}

/// Map every prompt to the platforms that mentioned the brand for it.
///
/// Prompts keep first-seen order, which is catalog order.
pub fn prompt_hits(records: &PlatformRecords) -> Vec<PromptHits> {
    let mut hits: Vec<PromptHits> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (platform, list) in records {
        for record in list {
            let slot = *index.entry(record.prompt.as_str()).or_insert_with(|| {
                hits.push(PromptHits {
                    prompt: record.prompt.clone(),
                    category: record.category.clone(),
                    platforms: Vec::new(),
                });
                hits.len() - 1
            });

            let entry = &mut hits[slot];
            if record.mentioned && !entry.platforms.contains(platform) {
                entry.platforms.push(*platform);
            }
        }
    }

    hits
}

/// Split prompts into (winning, gap) by whether any platform mentioned the brand.
pub fn partition_prompts(hits: Vec<PromptHits>) -> (Vec<PromptHits>, Vec<PromptHits>) {
    hits.into_iter().partition(|h| !h.platforms.is_empty())
}

/// Build the run summary.
///
/// `previous_pct` is the overall percentage of the latest stored snapshot,
/// or `None` when there is none.
pub fn summarize(records: &PlatformRecords, previous_pct: Option<i64>) -> Summary {
    let total_queries: usize = records.values().map(Vec::len).sum();
    let total_hits: usize = records.values().map(|list| count_hits(list)).sum();
    let overall_pct = percent(total_hits, total_queries);

    let (winning_prompts, gap_prompts) = partition_prompts(prompt_hits(records));

    Summary {
        total_hits,
        total_queries,
        overall_pct,
        per_platform: per_platform_stats(records),
        winning_prompts,
        gap_prompts,
        wow_delta: previous_pct.map(|prev| overall_pct - prev),
    }
}
