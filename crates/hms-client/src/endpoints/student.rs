use crate::cache::QueryKey;
use crate::gateway::{Gateway, MultipartPayload, RequestDescriptor};
use hms_api::{
    AbsenceRequestSubmission, ApiResult, Attendance, StudentDashboardResponse,
    StudentRegistration,
};
use hms_forms::FileUpload;

pub fn dashboard_key() -> QueryKey {
    QueryKey::new(["student", "dashboard"])
}

pub fn attendance_history_key(months: Option<u32>) -> QueryKey {
    match months {
        Some(months) => QueryKey::new(["student".to_string(), "attendance".to_string(), months.to_string()]),
        None => QueryKey::new(["student", "attendance"]),
    }
}

/// Submit a registration: twelve text parts plus the photo file part.
/// Anonymous; the gateway attaches no token when the session has none.
pub async fn register(
    gateway: &Gateway,
    registration: &StudentRegistration,
    photo: &FileUpload,
) -> ApiResult<()> {
    let payload = MultipartPayload::new()
        .text("formNumber", &registration.form_number)
        .text("email", &registration.email)
        .text("password", &registration.password)
        .text("enrollmentNo", &registration.enrollment_no)
        .text("fullName", &registration.full_name)
        .text("phone", &registration.phone)
        .text("department", &registration.department)
        .text("batch", &registration.batch)
        .text("pincode", &registration.pincode)
        .text("district", &registration.district)
        .text("tehsil", &registration.tehsil)
        .text("guardianPhone", &registration.guardian_phone)
        .file(
            "photo",
            &photo.file_name,
            &photo.content_type,
            photo.bytes.clone(),
        );
    gateway
        .send_unit(RequestDescriptor::post("/api/students/register").multipart(payload))
        .await
}

pub async fn submit_absence_request(
    gateway: &Gateway,
    submission: &AbsenceRequestSubmission,
) -> ApiResult<()> {
    gateway
        .send_unit(RequestDescriptor::post("/api/students/absence-request").json(submission)?)
        .await
}

pub async fn attendance_history(
    gateway: &Gateway,
    months: Option<u32>,
) -> ApiResult<Vec<Attendance>> {
    gateway
        .send(RequestDescriptor::get("/api/students/attendance-history").query_opt("months", months))
        .await
}

pub async fn dashboard(gateway: &Gateway) -> ApiResult<StudentDashboardResponse> {
    gateway
        .send(RequestDescriptor::get("/api/students/dashboard"))
        .await
}
