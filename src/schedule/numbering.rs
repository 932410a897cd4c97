use std::collections::HashSet;

use serde::Serialize;

use super::models::{Episode, EpisodeId, EPISODE_ID_PREFIX};

/// Number the first bare episode (`1`) is re-based onto.
pub const DEFAULT_NUMBERING_START: u32 = 48;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NumberingReport {
    pub renumbered: usize,
    /// Bare ids left alone because their target number was already taken.
    pub skipped: usize,
    pub malformed: usize,
}

pub fn canonical_label(number: u32) -> String {
    format!("{}{}", EPISODE_ID_PREFIX, number)
}

/// Rewrites bare ids `k` to canonical `start + k - 1` in place.
///
/// Canonical ids stay as they are. Malformed ids are logged and left alone.
/// A bare id whose target is already held by another row is not rewritten,
/// so this pass never creates a duplicate. Row order is untouched.
pub fn renumber(episodes: &mut [Episode], start: u32) -> NumberingReport {
    let mut taken: HashSet<u32> = episodes
        .iter()
        .filter_map(|e| match e.id {
            EpisodeId::Canonical(n) => Some(n),
            _ => None,
        })
        .collect();

    let mut report = NumberingReport::default();

    for episode in episodes.iter_mut() {
        let k = match &episode.id {
            EpisodeId::Canonical(_) => continue,
            EpisodeId::Malformed(text) => {
                log::warn!("Leaving unparsable episode id {:?} as-is", text);
                report.malformed += 1;
                continue;
            }
            EpisodeId::Bare(k) => *k,
        };

        let target = (start as u64 + k as u64)
            .checked_sub(1)
            .and_then(|n| u32::try_from(n).ok());
        match target {
            Some(target) if taken.insert(target) => {
                episode.id = EpisodeId::Canonical(target);
                report.renumbered += 1;
            }
            _ => {
                log::warn!(
                    "Not renumbering bare id {}: target {} unavailable",
                    k,
                    target.map(canonical_label).unwrap_or_default()
                );
                report.skipped += 1;
            }
        }
    }

    if report.renumbered > 0 {
        log::info!(
            "Renumbered {} episodes from {}",
            report.renumbered,
            canonical_label(start)
        );
    }
    report
}
