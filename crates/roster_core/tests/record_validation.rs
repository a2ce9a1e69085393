use roster_core::{validate, Record, RecordInput, RecordValidationError};

const NAME: &str = "Jane Doe";
const ID: &str = "101";
const EMAIL: &str = "jane@x.com";
const CONTACT: &str = "1234567890";

#[test]
fn any_blank_field_reports_all_fields_required() {
    let cases = [
        ("", ID, EMAIL, CONTACT),
        (NAME, "   ", EMAIL, CONTACT),
        (NAME, ID, "\t", CONTACT),
        (NAME, ID, EMAIL, ""),
        ("", "", "", ""),
    ];
    for (name, id, email, contact) in cases {
        let err = validate(name, id, email, contact).unwrap_err();
        assert_eq!(err, RecordValidationError::MissingField);
        assert_eq!(err.to_string(), "all fields required");
    }
}

#[test]
fn blank_field_wins_over_other_invalid_fields() {
    let err = validate("R2D2", "abc", "nope", "").unwrap_err();
    assert_eq!(err, RecordValidationError::MissingField);
}

#[test]
fn checks_run_in_fixed_order() {
    assert_eq!(
        validate("R2D2", "abc", "nope", "12").unwrap_err(),
        RecordValidationError::InvalidName
    );
    assert_eq!(
        validate(NAME, "abc", "nope", "12").unwrap_err(),
        RecordValidationError::InvalidId
    );
    assert_eq!(
        validate(NAME, ID, "nope", "12").unwrap_err(),
        RecordValidationError::InvalidEmail
    );
    assert_eq!(
        validate(NAME, ID, EMAIL, "12").unwrap_err(),
        RecordValidationError::InvalidContact
    );
}

#[test]
fn names_with_digits_or_symbols_are_rejected() {
    for name in ["Jane2", "Jane-Doe", "Jane_Doe", "Jane.", "J@ne"] {
        let err = validate(name, ID, EMAIL, CONTACT).unwrap_err();
        assert_eq!(err.to_string(), "name must be letters/spaces only", "{name}");
    }
    for name in ["Jane", "Jane Doe", "Mary Ann van Dyke"] {
        assert!(validate(name, ID, EMAIL, CONTACT).is_ok(), "{name}");
    }
}

#[test]
fn id_and_contact_reject_non_digits() {
    assert_eq!(
        validate(NAME, "10a", EMAIL, CONTACT).unwrap_err().to_string(),
        "id must be numeric"
    );
    for contact in ["12345abcde", "123 456 7890", "123456789"] {
        assert_eq!(
            validate(NAME, ID, EMAIL, contact).unwrap_err().to_string(),
            "contact must be numeric, length ≥ 10",
            "{contact}"
        );
    }
}

#[test]
fn email_shape_is_enforced() {
    for email in ["janex.com", "jane@xcom", "jane@x .com", "jane@@x.com", "@x.com"] {
        assert_eq!(
            validate(NAME, ID, email, CONTACT).unwrap_err(),
            RecordValidationError::InvalidEmail,
            "{email}"
        );
    }
    assert!(validate(NAME, ID, "a@b.co", CONTACT).is_ok());
}

#[test]
fn success_returns_trimmed_values() {
    let record = RecordInput::new("  Jane Doe ", " 101", "jane@x.com\n", " 1234567890 ")
        .validate()
        .unwrap();
    assert_eq!(
        record,
        Record {
            name: NAME.to_string(),
            id: ID.to_string(),
            email: EMAIL.to_string(),
            contact: CONTACT.to_string(),
        }
    );
}
