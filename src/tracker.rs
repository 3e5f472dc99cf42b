//! Run orchestration.
//!
//! Dispatches the catalog, classifies the answers and builds the weekly
//! snapshot. Persistence and delivery are left to the caller.

use crate::analysis::{count_hits, summarize, PlatformRecords};
use crate::config::Config;
use crate::detect::BrandDetector;
use crate::dispatch::{Dispatcher, PlatformResults};
use crate::models::{PromptEntry, ResponseRecord, Snapshot};
use crate::store::SnapshotStore;
use tracing::{info, warn};

/// Turn raw outcomes into response records.
///
/// Outcomes are matched to prompts by position.
pub fn build_records(
    prompts: &[PromptEntry],
    results: &PlatformResults,
    detector: &BrandDetector,
) -> PlatformRecords {
    results
        .iter()
        .map(|(platform, outcomes)| {
            let records = prompts
                .iter()
                .zip(outcomes)
                .map(|(prompt, outcome)| {
                    ResponseRecord::new(prompt, outcome, detector.is_mention(outcome))
                })
                .collect();
            (*platform, records)
        })
        .collect()
}

/// Assemble the snapshot for a run.
pub fn build_snapshot(week: &str, records: PlatformRecords, previous_pct: Option<i64>) -> Snapshot {
    let summary = summarize(&records, previous_pct);
    Snapshot {
        week: week.to_string(),
        platforms: records,
        summary,
    }
}

/// One weekly run over the configured catalog.
pub struct Tracker<'a> {
    prompts: &'a [PromptEntry],
    detector: BrandDetector,
    dispatcher: Dispatcher,
    store: &'a SnapshotStore,
}

impl<'a> Tracker<'a> {
    pub fn new(config: &'a Config, dispatcher: Dispatcher, store: &'a SnapshotStore) -> Self {
        Self {
            prompts: &config.prompts,
            detector: BrandDetector::new(&config.brand.variants),
            dispatcher,
            store,
        }
    }

    /// Query every platform and build the snapshot for `week`.
    ///
    /// The previous snapshot is read before anything is written, so the
    /// delta is against the last completed run.
    pub async fn run(&self, week: &str) -> Snapshot {
        info!(
            "Running visibility tracker: {} prompts, week of {}",
            self.prompts.len(),
            week
        );

        let previous_pct = match self.store.latest_overall_pct() {
            Ok(pct) => pct,
            Err(e) => {
                warn!("Ignoring previous snapshot: {}", e);
                None
            }
        };

        let results = self.dispatcher.run_all(self.prompts).await;
        let records = build_records(self.prompts, &results, &self.detector);

        for (platform, list) in &records {
            info!(
                "[{}] brand mentioned in {}/{} responses",
                platform.label(),
                count_hits(list),
                list.len()
            );
        }

        let snapshot = build_snapshot(week, records, previous_pct);
        info!(
            "Overall: {}/{} ({}%)",
            snapshot.summary.total_hits, snapshot.summary.total_queries, snapshot.summary.overall_pct
        );
        snapshot
    }
}
