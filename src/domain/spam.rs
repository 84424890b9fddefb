use crate::entities::booking::BookingSubmission;

/// Submissions completed faster than this are treated as automated. A human
/// reading the form and typing a 10+ character message takes longer.
pub const MIN_SUBMIT_MS: i64 = 1800;

/// Pure bot-suspicion predicate. The caller only learns the boolean, never
/// which check fired; both bot paths get the same uniform success response.
///
/// `started_at` is client-reported and therefore spoofable. This is a
/// known-weak heuristic against naive automation, not a security boundary.
pub fn is_suspected_bot(submission: &BookingSubmission, now_ms: i64) -> bool {
    if !submission.company.is_empty() {
        return true;
    }

    now_ms.saturating_sub(submission.started_at) < MIN_SUBMIT_MS
}
