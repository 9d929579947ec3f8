//! Domain records mirrored from the server.
//!
//! These are read-only views: the client renders what the server returns
//! and sends back only the primitive inputs a mutation requires. Derived
//! fields (`is_late_request`, bill proration, balances) are never computed
//! here.
use crate::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub role: Role,
    pub is_monitor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// Status shared by registration, absence, and deletion requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_id: i64,
    pub user: User,
    pub enrollment_no: String,
    pub full_name: String,
    pub phone: String,
    pub department: String,
    pub batch: String,
    pub pincode: String,
    pub district: String,
    pub tehsil: String,
    pub guardian_phone: String,
    pub photo_url: String,
    pub is_monitor: bool,
    pub current_balance: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Flattened row shape used by the admin student list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentListResponse {
    pub student_id: i64,
    pub enrollment_no: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub batch: String,
    pub district: String,
    pub is_monitor: bool,
    pub current_balance: f64,
    pub created_at: String,
}

/// The twelve text fields of a registration submission. The photo travels
/// beside this as a multipart file part, not inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRegistration {
    pub form_number: String,
    pub email: String,
    pub password: String,
    pub enrollment_no: String,
    pub full_name: String,
    pub phone: String,
    pub department: String,
    pub batch: String,
    pub pincode: String,
    pub district: String,
    pub tehsil: String,
    pub guardian_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequestResponse {
    pub request_id: i64,
    pub form_number: String,
    pub email: String,
    pub enrollment_no: String,
    pub full_name: String,
    pub phone: String,
    pub department: String,
    pub batch: String,
    pub pincode: String,
    pub district: String,
    pub tehsil: String,
    pub guardian_phone: String,
    pub photo_url: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// Abbreviated student reference embedded in other records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub student_id: i64,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_no: Option<String>,
}

/// Abbreviated user reference for approver fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub user_id: i64,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub attendance_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentRef>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceRequest {
    pub request_id: i64,
    pub student: StudentRef,
    pub request_date: NaiveDate,
    pub absence_date: NaiveDate,
    pub reason: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
    /// Computed server-side against the cutoff time; never derived here.
    pub is_late_request: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceRequestSubmission {
    pub absence_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Pending,
    PartiallyPaid,
    FullyPaid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub bill_id: i64,
    pub student: StudentRef,
    pub month_year: String,
    pub amount_due: f64,
    pub amount_paid: f64,
    pub present_days: u32,
    pub total_days: u32,
    pub status: BillStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Online,
    Cheque,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub student_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboardResponse {
    pub current_balance: f64,
    pub pending_bill_amount: f64,
    pub net_balance: f64,
    pub monthly_expenses: f64,
    pub present_days_this_month: u32,
    pub total_days_this_month: u32,
    pub is_monitor: bool,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettingResponse {
    pub setting_id: i64,
    pub setting_key: String,
    pub setting_value: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    pub updated_at: String,
}

/// Body for updating the absence cutoff. `HH:MM`, 24-hour clock; the form
/// schema validates the shape before it reaches the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutoffTimeRequest {
    pub cutoff_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedBy {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionRequest {
    pub request_id: i64,
    pub student: StudentRef,
    pub requested_by: RequestedBy,
    pub reason: String,
    pub status: RequestStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpenseRequest {
    /// `YYYY-MM`.
    pub month_year: String,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpenseResponse {
    pub expense_id: i64,
    pub month_year: String,
    pub total_amount: f64,
    pub created_at: String,
}
