use crate::pipeline::ingestion::existing::ExistingStationSet;
use crate::pipeline::processing::key::DedupKey;
use crate::types::CanonicalStation;
use tracing::info;

/// Keep the candidates whose key is not already in `existing`, in input order.
///
/// With no existing set (full init) every candidate is novel.
pub fn filter_novel(
    candidates: Vec<CanonicalStation>,
    existing: Option<&ExistingStationSet>,
    key: DedupKey,
) -> Vec<CanonicalStation> {
    let Some(existing) = existing else {
        info!(novel = candidates.len(), "No existing dataset, all stations are new");
        return candidates;
    };

    let known = existing.keys(key);
    let total = candidates.len();
    let novel: Vec<_> = candidates
        .into_iter()
        .filter(|c| !known.contains(&key.for_station(c)))
        .collect();

    info!(candidates = total, known = known.len(), novel = novel.len(), "Filtered known stations");
    novel
}
