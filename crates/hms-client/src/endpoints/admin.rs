use crate::cache::QueryKey;
use crate::gateway::{Gateway, RequestDescriptor};
use bytes::Bytes;
use hms_api::{ApiResult, PaymentRequest, RegistrationRequestResponse, StudentListResponse};

pub fn registration_requests_key() -> QueryKey {
    QueryKey::new(["admin", "registration-requests"])
}

pub fn students_key(query: Option<&str>) -> QueryKey {
    match query {
        Some(query) if !query.is_empty() => {
            QueryKey::new(["admin".to_string(), "students".to_string(), query.to_string()])
        }
        _ => QueryKey::new(["admin", "students"]),
    }
}

/// Seed the pool of form numbers registrations must quote.
pub async fn add_form_numbers(gateway: &Gateway, form_numbers: &[String]) -> ApiResult<()> {
    gateway
        .send_unit(RequestDescriptor::post("/api/admin/form-numbers").json(&form_numbers)?)
        .await
}

pub async fn registration_requests(
    gateway: &Gateway,
) -> ApiResult<Vec<RegistrationRequestResponse>> {
    gateway
        .send(RequestDescriptor::get("/api/admin/registration-requests"))
        .await
}

pub async fn approve_registration(gateway: &Gateway, id: i64) -> ApiResult<()> {
    gateway
        .send_unit(RequestDescriptor::put(format!(
            "/api/admin/registration-requests/{id}/approve"
        )))
        .await
}

pub async fn reject_registration(gateway: &Gateway, id: i64, comments: &str) -> ApiResult<()> {
    gateway
        .send_unit(
            RequestDescriptor::put(format!("/api/admin/registration-requests/{id}/reject"))
                .query("comments", comments),
        )
        .await
}

/// List students; a non-empty `query` filters server-side.
pub async fn students(
    gateway: &Gateway,
    query: Option<&str>,
) -> ApiResult<Vec<StudentListResponse>> {
    gateway
        .send(
            RequestDescriptor::get("/api/admin/students")
                .query_opt("query", query.filter(|q| !q.is_empty())),
        )
        .await
}

pub async fn assign_monitor(gateway: &Gateway, student_id: i64) -> ApiResult<()> {
    gateway
        .send_unit(RequestDescriptor::post(format!("/api/admin/monitor/{student_id}")))
        .await
}

pub async fn enter_expense(
    gateway: &Gateway,
    month_year: &str,
    total_amount: f64,
) -> ApiResult<()> {
    gateway
        .send_unit(
            RequestDescriptor::post("/api/admin/expenses")
                .query("monthYear", month_year)
                .query("totalAmount", total_amount),
        )
        .await
}

/// Ask the warden to delete a student; the deletion itself happens only
/// after warden approval.
pub async fn request_deletion(gateway: &Gateway, student_id: i64, reason: &str) -> ApiResult<()> {
    gateway
        .send_unit(
            RequestDescriptor::post(format!("/api/admin/deletion-request/{student_id}"))
                .query("reason", reason),
        )
        .await
}

pub async fn record_payment(gateway: &Gateway, payment: &PaymentRequest) -> ApiResult<()> {
    gateway
        .send_unit(RequestDescriptor::post("/api/admin/payments").json(payment)?)
        .await
}

/// Fetch a student photo through the authenticated gateway; the file
/// route is protected, so a plain `<img src>` cannot reach it.
pub async fn student_photo(gateway: &Gateway, filename: &str) -> ApiResult<Bytes> {
    gateway
        .send_bytes(RequestDescriptor::get(format!(
            "/api/admin/files/student-photo/{filename}"
        )))
        .await
}
