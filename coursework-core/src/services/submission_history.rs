use std::collections::BTreeMap;

use crate::database::entities::{submission_versions, submissions};

/// One entry per attempt `1..=current`, ascending.
///
/// The current attempt always reflects the live row, since grading updates
/// the submission after its version snapshot was written. Attempts with no
/// stored version (rows from before versions were kept) are skipped, except
/// the current one which is synthesised from the live row.
pub fn assemble_history(
    submission: &submissions::Model,
    versions: Vec<submission_versions::Model>,
    include_current: bool,
) -> Vec<submission_versions::Model> {
    let current = submission.current_attempt();
    if current < 1 {
        return Vec::new();
    }

    let mut by_attempt: BTreeMap<i32, submission_versions::Model> = versions
        .into_iter()
        .filter(|version| version.attempt >= 1 && version.attempt < current)
        .map(|version| (version.attempt, version))
        .collect();

    if include_current {
        by_attempt.insert(current, submission_versions::Model::snapshot_of(submission));
    }

    by_attempt.into_values().collect()
}
