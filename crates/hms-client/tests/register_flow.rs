mod common;

use common::spawn_mock_api;
use hms_client::endpoints::student;
use hms_client::forms::{registration_form, registration_payload};
use hms_client::Client;
use hms_forms::{FieldId, FileUpload, SubmitError};
use std::sync::atomic::Ordering;

fn fill_text_fields(form: &mut hms_forms::FormStepper) {
    for (id, value) in [
        ("fullName", "Asha Kumar"),
        ("email", "asha@hostel.edu"),
        ("password", "secret1"),
        ("phone", "9876543210"),
        ("guardianPhone", "9876543211"),
        ("formNumber", "FRM-001"),
        ("enrollmentNo", "EN-2024-17"),
        ("department", "Physics"),
        ("batch", "2024"),
        ("pincode", "110001"),
        ("district", "Jaipur"),
        ("tehsil", "Sanganer"),
    ] {
        form.set_text(id, value);
    }
}

#[tokio::test]
async fn missing_photo_blocks_submission_without_any_network_call() {
    let api = spawn_mock_api().await;
    let mut form = registration_form();
    fill_text_fields(&mut form);
    form.next().expect("personal");
    form.next().expect("academic");
    form.next().expect("address");
    assert!(form.is_last_step());

    let err = form.submit().expect_err("photo missing");
    match err {
        SubmitError::Invalid { errors } => {
            assert_eq!(
                errors.get(&FieldId::new("photo")).map(String::as_str),
                Some("Photo is required")
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(api.state.register_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn completed_form_registers_over_multipart() {
    let api = spawn_mock_api().await;
    let client = Client::new(&api.client_config()).expect("client");

    let mut form = registration_form();
    fill_text_fields(&mut form);
    form.next().expect("personal");
    form.next().expect("academic");
    form.next().expect("address");
    form.set_file(
        "photo",
        FileUpload::new("me.jpg", "image/jpeg", &b"\xff\xd8\xff\xe0 fake jpeg"[..]),
    );
    let values = form.submit().expect("submit");
    let (registration, photo) = registration_payload(&values).expect("payload");

    // Registration happens signed out; no token is attached.
    student::register(&client.gateway, &registration, &photo)
        .await
        .expect("register");
    assert_eq!(api.state.register_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_side_rejection_maps_to_a_validation_error() {
    let api = spawn_mock_api().await;
    let client = Client::new(&api.client_config()).expect("client");
    let mut form = registration_form();
    fill_text_fields(&mut form);
    form.next().expect("personal");
    form.next().expect("academic");
    form.next().expect("address");
    form.set_file("photo", FileUpload::new("empty.png", "image/png", Vec::<u8>::new()));
    // The client accepts the zero-byte file; the server does not.
    let values = form.submit().expect("submit");
    let (registration, photo) = registration_payload(&values).expect("payload");
    let err = student::register(&client.gateway, &registration, &photo)
        .await
        .expect_err("server rejects");
    assert!(matches!(err, hms_api::ApiError::Validation { .. }));
}
