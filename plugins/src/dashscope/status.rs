use taskrelay_core::api::TaskStatus;

/// Vendor `task_status` to canonical status. Total: unknown strings are
/// treated as a transient state and map to `Queued` so callers keep polling.
pub fn map_status(vendor_status: &str) -> TaskStatus {
    match vendor_status {
        "PENDING" => TaskStatus::Queued,
        "RUNNING" => TaskStatus::InProgress,
        "SUCCEEDED" => TaskStatus::Success,
        "FAILED" | "CANCELED" | "UNKNOWN" => TaskStatus::Failure,
        _ => TaskStatus::Queued,
    }
}
