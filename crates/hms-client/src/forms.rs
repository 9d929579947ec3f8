//! Concrete form schemas, and the conversions from validated values into
//! wire-ready request records.
//!
//! Field identifiers match the wire names, so a server-side validation
//! envelope keyed by field maps straight back onto the form.
use hms_api::{AbsenceRequestSubmission, PaymentMethod, PaymentRequest, StudentRegistration};
use hms_forms::{
    FieldId, FieldSpec, FileUpload, FormSchema, FormStep, FormStepper, FormValues, Rule, StepPlan,
};
use thiserror::Error;

/// Largest photo the registration form accepts.
pub const PHOTO_MAX_BYTES: usize = 2 * 1024 * 1024;

const PHONE_PATTERN: &str = r"^[6-9]\d{9}$";
const PHONE_MESSAGE: &str = "Please enter a valid 10-digit phone number";

#[derive(Debug, Error)]
pub enum PayloadError {
    /// Only reachable if a schema stops requiring a field the conversion
    /// still reads.
    #[error("submitted form is missing field: {0}")]
    MissingField(FieldId),
    #[error("field {field} is not usable: {message}")]
    InvalidField { field: FieldId, message: String },
}

pub fn login_form() -> FormStepper {
    let schema = FormSchema::new(vec![
        FieldSpec::new("email", "Email", vec![Rule::Required, Rule::Email]),
        FieldSpec::new("password", "Password", vec![Rule::Required, Rule::MinLen(6)]),
    ])
    .expect("login schema");
    let plan = StepPlan::single_step(&schema);
    FormStepper::new(schema, plan)
}

/// Thirteen fields over four steps: personal, academic, address, photo.
pub fn registration_form() -> FormStepper {
    let schema = FormSchema::new(vec![
        FieldSpec::new("fullName", "Full name", vec![Rule::Required, Rule::MinLen(2)]),
        FieldSpec::new("email", "Email", vec![Rule::Required, Rule::Email]),
        FieldSpec::new("password", "Password", vec![Rule::Required, Rule::MinLen(6)]),
        FieldSpec::new(
            "phone",
            "Phone",
            vec![Rule::Required, Rule::pattern(PHONE_PATTERN, PHONE_MESSAGE)],
        ),
        FieldSpec::new(
            "guardianPhone",
            "Guardian phone",
            vec![Rule::Required, Rule::pattern(PHONE_PATTERN, PHONE_MESSAGE)],
        ),
        FieldSpec::new("formNumber", "Form number", vec![Rule::Required]),
        FieldSpec::new("enrollmentNo", "Enrollment number", vec![Rule::Required]),
        FieldSpec::new("department", "Department", vec![Rule::Required]),
        FieldSpec::new("batch", "Batch", vec![Rule::Required]),
        FieldSpec::new(
            "pincode",
            "Pincode",
            vec![
                Rule::Required,
                Rule::pattern(r"^\d{6}$", "Please enter a valid 6-digit pincode"),
            ],
        ),
        FieldSpec::new("district", "District", vec![Rule::Required]),
        FieldSpec::new("tehsil", "Tehsil", vec![Rule::Required]),
        FieldSpec::new(
            "photo",
            "Photo",
            vec![
                Rule::FileRequired,
                Rule::FileContentType(vec![
                    "image/jpeg".to_string(),
                    "image/png".to_string(),
                ]),
                Rule::FileMaxBytes(PHOTO_MAX_BYTES),
            ],
        ),
    ])
    .expect("registration schema");
    let plan = StepPlan::new(
        &schema,
        vec![
            FormStep::new(
                "Personal details",
                ids(["fullName", "email", "password", "phone", "guardianPhone"]),
            ),
            FormStep::new(
                "Academic details",
                ids(["formNumber", "enrollmentNo", "department", "batch"]),
            ),
            FormStep::new("Address", ids(["pincode", "district", "tehsil"])),
            FormStep::new("Photo", ids(["photo"])),
        ],
    )
    .expect("registration plan");
    FormStepper::new(schema, plan)
}

pub fn absence_request_form() -> FormStepper {
    let schema = FormSchema::new(vec![
        FieldSpec::new(
            "absenceDate",
            "Absence date",
            vec![
                Rule::Required,
                Rule::pattern(r"^\d{4}-\d{2}-\d{2}$", "Please pick a valid date"),
            ],
        ),
        FieldSpec::new("reason", "Reason", vec![Rule::Required, Rule::MinLen(5)]),
    ])
    .expect("absence schema");
    let plan = StepPlan::single_step(&schema);
    FormStepper::new(schema, plan)
}

pub fn payment_form() -> FormStepper {
    let schema = FormSchema::new(vec![
        FieldSpec::new(
            "studentId",
            "Student",
            vec![Rule::Required, Rule::pattern(r"^\d+$", "Please select a student")],
        ),
        FieldSpec::new(
            "amount",
            "Amount",
            vec![
                Rule::Required,
                Rule::pattern(
                    r"^(0*[1-9]\d*)(\.\d{1,2})?$",
                    "Amount must be a positive number",
                ),
            ],
        ),
        FieldSpec::new("method", "Payment method", vec![Rule::Required]),
        FieldSpec::new("transactionId", "Transaction id", vec![]),
    ])
    .expect("payment schema");
    let plan = StepPlan::single_step(&schema);
    FormStepper::new(schema, plan)
}

pub fn cutoff_form() -> FormStepper {
    let schema = FormSchema::new(vec![FieldSpec::new(
        "cutoffTime",
        "Cutoff time",
        vec![
            Rule::Required,
            Rule::pattern(
                r"^([01]\d|2[0-3]):[0-5]\d$",
                "Please enter a time as HH:MM (24-hour)",
            ),
        ],
    )])
    .expect("cutoff schema");
    let plan = StepPlan::single_step(&schema);
    FormStepper::new(schema, plan)
}

/// Turn submitted registration values into the request record plus the
/// photo upload the multipart body needs.
pub fn registration_payload(
    values: &FormValues,
) -> Result<(StudentRegistration, FileUpload), PayloadError> {
    let registration = StudentRegistration {
        form_number: required_text(values, "formNumber")?,
        email: required_text(values, "email")?,
        password: required_text(values, "password")?,
        enrollment_no: required_text(values, "enrollmentNo")?,
        full_name: required_text(values, "fullName")?,
        phone: required_text(values, "phone")?,
        department: required_text(values, "department")?,
        batch: required_text(values, "batch")?,
        pincode: required_text(values, "pincode")?,
        district: required_text(values, "district")?,
        tehsil: required_text(values, "tehsil")?,
        guardian_phone: required_text(values, "guardianPhone")?,
    };
    let photo_id = FieldId::new("photo");
    let photo = values
        .file(&photo_id)
        .cloned()
        .ok_or(PayloadError::MissingField(photo_id))?;
    Ok((registration, photo))
}

pub fn absence_submission(values: &FormValues) -> Result<AbsenceRequestSubmission, PayloadError> {
    let field = FieldId::new("absenceDate");
    let raw = required_text(values, "absenceDate")?;
    let absence_date = raw
        .parse()
        .map_err(|err: chrono::ParseError| PayloadError::InvalidField {
            field,
            message: err.to_string(),
        })?;
    Ok(AbsenceRequestSubmission {
        absence_date,
        reason: required_text(values, "reason")?,
    })
}

pub fn payment_request(values: &FormValues) -> Result<PaymentRequest, PayloadError> {
    let student_id = parse_field(values, "studentId")?;
    let amount = parse_field(values, "amount")?;
    let method_raw = required_text(values, "method")?;
    let method = match method_raw.as_str() {
        "CASH" => PaymentMethod::Cash,
        "ONLINE" => PaymentMethod::Online,
        "CHEQUE" => PaymentMethod::Cheque,
        other => {
            return Err(PayloadError::InvalidField {
                field: FieldId::new("method"),
                message: format!("unknown payment method: {other}"),
            });
        }
    };
    let transaction_id = values
        .text(&FieldId::new("transactionId"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    Ok(PaymentRequest {
        student_id,
        amount,
        method,
        transaction_id,
    })
}

fn required_text(values: &FormValues, id: &str) -> Result<String, PayloadError> {
    let field = FieldId::new(id);
    values
        .text(&field)
        .map(str::to_string)
        .ok_or(PayloadError::MissingField(field))
}

fn parse_field<T>(values: &FormValues, id: &str) -> Result<T, PayloadError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = required_text(values, id)?;
    raw.parse().map_err(|err: T::Err| PayloadError::InvalidField {
        field: FieldId::new(id),
        message: err.to_string(),
    })
}

fn ids<const N: usize>(names: [&str; N]) -> Vec<FieldId> {
    names.into_iter().map(FieldId::new).collect()
}
