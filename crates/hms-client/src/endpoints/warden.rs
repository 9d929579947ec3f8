use crate::cache::QueryKey;
use crate::gateway::{Gateway, RequestDescriptor};
use hms_api::{
    AbsenceRequest, ApiResult, CutoffTimeRequest, DeletionRequest, MonthlyExpenseResponse,
    SystemSettingResponse,
};

pub fn deletion_requests_key() -> QueryKey {
    QueryKey::new(["warden", "deletion-requests"])
}

pub fn expenses_key() -> QueryKey {
    QueryKey::new(["warden", "expenses"])
}

pub fn expenses_by_month_key(month_year: &str) -> QueryKey {
    QueryKey::new(["warden".to_string(), "expenses".to_string(), month_year.to_string()])
}

pub fn late_absence_requests_key() -> QueryKey {
    QueryKey::new(["warden", "absence-requests", "late"])
}

pub fn settings_key() -> QueryKey {
    QueryKey::new(["warden", "settings"])
}

pub fn cutoff_time_key() -> QueryKey {
    QueryKey::new(["warden", "settings", "cutoff"])
}

pub async fn deletion_requests(gateway: &Gateway) -> ApiResult<Vec<DeletionRequest>> {
    gateway
        .send(RequestDescriptor::get("/api/warden/deletion-requests"))
        .await
}

pub async fn approve_deletion(gateway: &Gateway, id: i64) -> ApiResult<()> {
    gateway
        .send_unit(RequestDescriptor::put(format!(
            "/api/warden/deletion-requests/{id}/approve"
        )))
        .await
}

pub async fn reject_deletion(gateway: &Gateway, id: i64, reason: &str) -> ApiResult<()> {
    gateway
        .send_unit(
            RequestDescriptor::put(format!("/api/warden/deletion-requests/{id}/reject"))
                .query("reason", reason),
        )
        .await
}

pub async fn expenses(gateway: &Gateway) -> ApiResult<Vec<MonthlyExpenseResponse>> {
    gateway
        .send(RequestDescriptor::get("/api/warden/expenses"))
        .await
}

pub async fn expenses_by_month(
    gateway: &Gateway,
    month_year: &str,
) -> ApiResult<MonthlyExpenseResponse> {
    gateway
        .send(RequestDescriptor::get(format!("/api/warden/expenses/{month_year}")))
        .await
}

/// Late requests are the warden's queue; early ones go to the monitor.
pub async fn late_absence_requests(gateway: &Gateway) -> ApiResult<Vec<AbsenceRequest>> {
    gateway
        .send(RequestDescriptor::get("/api/warden/absence-requests/late"))
        .await
}

pub async fn approve_absence(gateway: &Gateway, id: i64, comments: Option<&str>) -> ApiResult<()> {
    gateway
        .send_unit(
            RequestDescriptor::put(format!("/api/warden/absence-requests/{id}/approve"))
                .query_opt("comments", comments),
        )
        .await
}

pub async fn reject_absence(gateway: &Gateway, id: i64, reason: &str) -> ApiResult<()> {
    gateway
        .send_unit(
            RequestDescriptor::put(format!("/api/warden/absence-requests/{id}/reject"))
                .query("reason", reason),
        )
        .await
}

pub async fn settings(gateway: &Gateway) -> ApiResult<Vec<SystemSettingResponse>> {
    gateway
        .send(RequestDescriptor::get("/api/warden/settings"))
        .await
}

/// The cutoff's `data` is the bare `HH:MM` string.
pub async fn cutoff_time(gateway: &Gateway) -> ApiResult<String> {
    gateway
        .send(RequestDescriptor::get("/api/warden/settings/absence-cutoff-time"))
        .await
}

pub async fn update_cutoff_time(gateway: &Gateway, cutoff_time: &str) -> ApiResult<()> {
    let body = CutoffTimeRequest {
        cutoff_time: cutoff_time.to_string(),
    };
    gateway
        .send_unit(RequestDescriptor::put("/api/warden/settings/absence-cutoff-time").json(&body)?)
        .await
}
