use crate::cache::QueryKey;
use crate::gateway::{Gateway, RequestDescriptor};
use hms_api::{AbsenceRequest, ApiResult};

pub fn early_absence_requests_key() -> QueryKey {
    QueryKey::new(["monitor", "absence-requests", "early"])
}

/// Requests submitted before the cutoff; the monitor triages these.
pub async fn early_absence_requests(gateway: &Gateway) -> ApiResult<Vec<AbsenceRequest>> {
    gateway
        .send(RequestDescriptor::get("/api/monitor/absence-requests/early"))
        .await
}

pub async fn approve_absence(gateway: &Gateway, id: i64, comments: Option<&str>) -> ApiResult<()> {
    gateway
        .send_unit(
            RequestDescriptor::put(format!("/api/monitor/absence-requests/{id}/approve"))
                .query_opt("comments", comments),
        )
        .await
}

pub async fn reject_absence(gateway: &Gateway, id: i64, reason: &str) -> ApiResult<()> {
    gateway
        .send_unit(
            RequestDescriptor::put(format!("/api/monitor/absence-requests/{id}/reject"))
                .query("reason", reason),
        )
        .await
}
