// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field validation.
//!
//! Each validator collects every complaint it finds and reports them
//! together as one `DomainError::InvalidFields`, joined with `". "`.

use time::OffsetDateTime;
use uuid::{Uuid, Variant, Version};

use crate::constants::end_of_time;
use crate::error::DomainError;
use crate::patch::{CarPatch, ResidentPatch};
use crate::types::{Admin, CarFields, Relationship, Resident};

const MAX_LICENSE_PLATE_LEN: usize = 8;
const MAX_PHONE_LEN: usize = 20;

const RESIDENT_ID_MESSAGE: &str = "residentID must start with a capital letter, followed by 7 numbers";
const LICENSE_PLATE_CHARS_MESSAGE: &str = "licensePlate can only be letters or numbers";
const LICENSE_PLATE_LEN_MESSAGE: &str = "licensePlate can be maximum 8 characters";
const COLOR_MESSAGE: &str = "color must be one word only letters";
const MAKE_MESSAGE: &str = "make can only have spaces, letters, numbers, and dashes";
const MODEL_MESSAGE: &str = "model can only have spaces, letters, numbers, and dashes";
const FIRST_NAME_MESSAGE: &str = "first name can only be alphabetic letters and spaces";
const LAST_NAME_MESSAGE: &str = "last name can only be alphabetic letters and spaces";
const PHONE_MESSAGE: &str = "phone must be only numbers, at most 20";
const EMAIL_MESSAGE: &str =
    "email must be a sequence of characters separated by an '@' character.";
const AMT_DAYS_MESSAGE: &str = "amtDays cannot be lower than 0";

/// Accumulates complaints and turns them into a single error.
#[derive(Debug, Default)]
struct Complaints(Vec<&'static str>);

impl Complaints {
    fn check(&mut self, ok: bool, message: &'static str) {
        if !ok {
            self.0.push(message);
        }
    }

    fn into_result(self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::InvalidFields(self.0.join(". ")))
        }
    }
}

/// Whether every character of `value` satisfies `allowed`, with the length
/// in `[min_len, max_len]`.
fn chars_within(value: &str, min_len: usize, max_len: usize, allowed: fn(char) -> bool) -> bool {
    let len: usize = value.chars().count();
    (min_len..=max_len).contains(&len) && value.chars().all(allowed)
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ' '
}

const fn is_make_model_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '-'
}

/// Any value containing `@`.
fn is_email(value: &str) -> bool {
    value.contains('@')
}

/// Checks the `^[A-Z]\d{7}$` resident ID shape.
#[must_use]
pub fn is_resident_id(id: &str) -> bool {
    let mut chars = id.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && id.len() == 8
        && chars.all(|c| c.is_ascii_digit())
}

/// Checks whether `id` may appear as the requestor of a permit.
///
/// Any resident ID qualifies except the reserved `P` prefix.
#[must_use]
pub fn is_permit_requestor_id(id: &str) -> bool {
    is_resident_id(id) && !id.starts_with('P')
}

/// Checks that `id` is a hyphenated version 4 UUID.
#[must_use]
pub fn is_uuid_v4(id: &str) -> bool {
    id.len() == 36
        && Uuid::parse_str(id).is_ok_and(|uuid| {
            uuid.get_version() == Some(Version::Random) && uuid.get_variant() == Variant::RFC4122
        })
}

fn check_car_fields(complaints: &mut Complaints, fields: &CarFields, min_len: usize) {
    complaints.check(
        fields.license_plate.chars().all(|c| c.is_ascii_alphanumeric())
            && fields.license_plate.chars().count() >= min_len,
        LICENSE_PLATE_CHARS_MESSAGE,
    );
    complaints.check(
        fields.license_plate.chars().count() <= MAX_LICENSE_PLATE_LEN,
        LICENSE_PLATE_LEN_MESSAGE,
    );
    complaints.check(
        chars_within(&fields.color, min_len, usize::MAX, |c| c.is_ascii_alphabetic()),
        COLOR_MESSAGE,
    );
    complaints.check(
        chars_within(&fields.make, min_len, usize::MAX, is_make_model_char),
        MAKE_MESSAGE,
    );
    complaints.check(
        chars_within(&fields.model, min_len, usize::MAX, is_make_model_char),
        MODEL_MESSAGE,
    );
}

/// Validates the fields of a car about to be created.
///
/// # Errors
///
/// Returns `DomainError::EmptyFields` naming any missing field, otherwise
/// `DomainError::InvalidFields` for malformed ones.
pub fn validate_new_car(fields: &CarFields) -> Result<(), DomainError> {
    let missing: Vec<&str> = [
        ("licensePlate", &fields.license_plate),
        ("color", &fields.color),
        ("make", &fields.make),
        ("model", &fields.model),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect();
    if !missing.is_empty() {
        return Err(DomainError::EmptyFields(missing.join(", ")));
    }

    let mut complaints = Complaints::default();
    check_car_fields(&mut complaints, fields, 1);
    complaints.into_result()
}

/// Validates a partial car update. Absent fields are not checked.
///
/// # Errors
///
/// Returns `DomainError::InvalidFields` for malformed values, including a
/// negative used-days counter.
pub fn validate_car_edit(patch: &CarPatch) -> Result<(), DomainError> {
    let merged: CarFields = CarFields {
        license_plate: patch.license_plate.clone().unwrap_or_default(),
        color: patch.color.clone().unwrap_or_default(),
        make: patch.make.clone().unwrap_or_default(),
        model: patch.model.clone().unwrap_or_default(),
    };
    let mut complaints = Complaints::default();
    check_car_fields(&mut complaints, &merged, 0);
    complaints.check(
        patch.amt_parking_days_used.is_none_or(|days| days >= 0),
        AMT_DAYS_MESSAGE,
    );
    complaints.into_result()
}

/// Validates a resident about to be created. `resident.password` is still
/// the plain text here.
///
/// # Errors
///
/// Returns `DomainError::InvalidFields` listing every problem found.
pub fn validate_new_resident(resident: &Resident) -> Result<(), DomainError> {
    let mut complaints = Complaints::default();
    complaints.check(is_resident_id(&resident.id), RESIDENT_ID_MESSAGE);
    complaints.check(
        chars_within(&resident.first_name, 1, usize::MAX, is_name_char),
        FIRST_NAME_MESSAGE,
    );
    complaints.check(
        chars_within(&resident.last_name, 1, usize::MAX, is_name_char),
        LAST_NAME_MESSAGE,
    );
    complaints.check(
        chars_within(&resident.phone, 1, MAX_PHONE_LEN, |c| c.is_ascii_digit()),
        PHONE_MESSAGE,
    );
    complaints.check(is_email(&resident.email), EMAIL_MESSAGE);
    complaints.check(!resident.password.is_empty(), "password must not be empty");
    complaints.into_result()
}

/// Validates a partial resident update.
///
/// # Errors
///
/// Returns `DomainError::AllEditFieldsEmpty` when nothing would change,
/// otherwise `DomainError::InvalidFields` for malformed values.
pub fn validate_resident_edit(patch: &ResidentPatch) -> Result<(), DomainError> {
    if patch.is_empty() {
        return Err(DomainError::AllEditFieldsEmpty(String::from(
            "firstName, lastName, phone, email, password, unlimDays, amtParkingDaysUsed",
        )));
    }

    let mut complaints = Complaints::default();
    complaints.check(
        patch
            .first_name
            .as_deref()
            .is_none_or(|name| chars_within(name, 0, usize::MAX, is_name_char)),
        FIRST_NAME_MESSAGE,
    );
    complaints.check(
        patch
            .last_name
            .as_deref()
            .is_none_or(|name| chars_within(name, 0, usize::MAX, is_name_char)),
        LAST_NAME_MESSAGE,
    );
    complaints.check(
        patch
            .phone
            .as_deref()
            .is_none_or(|phone| chars_within(phone, 0, MAX_PHONE_LEN, |c| c.is_ascii_digit())),
        PHONE_MESSAGE,
    );
    complaints.check(
        patch
            .email
            .as_deref()
            .is_none_or(|email| email.is_empty() || is_email(email)),
        EMAIL_MESSAGE,
    );
    complaints.check(
        patch.amt_parking_days_used.is_none_or(|days| days >= 0),
        AMT_DAYS_MESSAGE,
    );
    complaints.into_result()
}

/// Validates a requested permit window.
///
/// # Errors
///
/// Returns `DomainError::InvalidFields` when either end is missing or the
/// window is empty or inverted.
pub fn validate_permit_dates(
    start: Option<OffsetDateTime>,
    end: Option<OffsetDateTime>,
) -> Result<(), DomainError> {
    let mut complaints = Complaints::default();
    complaints.check(start.is_some(), "startDate cannot be empty");
    complaints.check(end.is_some(), "endDate cannot be empty");
    if let (Some(start), Some(end)) = (start, end) {
        complaints.check(start <= end, "startDate cannot be after endDate");
        complaints.check(start != end, "startDate cannot be equal to endDate");
    }
    complaints.into_result()
}

/// Validates a visitor registration and resolves its relationship.
///
/// When `is_forever` is set the access dates are ignored.
///
/// # Arguments
///
/// * `first_name` / `last_name` - Visitor names
/// * `relationship` - Wire form of the relationship
/// * `access` - Requested `(start, end)` access window
/// * `is_forever` - Whether access never ends
///
/// # Errors
///
/// Returns `DomainError::EmptyFields` for missing fields, otherwise
/// `DomainError::InvalidFields`.
pub fn validate_new_visitor(
    first_name: &str,
    last_name: &str,
    relationship: &str,
    access: (Option<OffsetDateTime>, Option<OffsetDateTime>),
    is_forever: bool,
) -> Result<Relationship, DomainError> {
    let (access_start, access_end) = access;
    let mut missing: Vec<&str> = Vec::new();
    if first_name.is_empty() {
        missing.push("firstName");
    }
    if last_name.is_empty() {
        missing.push("lastName");
    }
    if relationship.is_empty() {
        missing.push("relationship");
    }
    if !is_forever {
        if access_start.is_none() {
            missing.push("accessStart");
        }
        if access_end.is_none() {
            missing.push("accessEnd");
        }
    }
    if !missing.is_empty() {
        return Err(DomainError::EmptyFields(missing.join(", ")));
    }

    let parsed: Option<Relationship> = Relationship::parse(relationship);
    let mut complaints = Complaints::default();
    complaints.check(
        chars_within(first_name, 1, usize::MAX, is_name_char),
        FIRST_NAME_MESSAGE,
    );
    complaints.check(
        chars_within(last_name, 1, usize::MAX, is_name_char),
        LAST_NAME_MESSAGE,
    );
    complaints.check(
        parsed.is_some(),
        "relationship must be either \"fam/fri\" or \"contractor\"",
    );
    complaints.check(
        !(is_forever && parsed == Some(Relationship::Contractor)),
        "contractors cannot have an access date of `forever`",
    );
    if let (false, Some(start), Some(end)) = (is_forever, access_start, access_end) {
        complaints.check(start <= end, "accessStart cannot be after accessEnd");
        complaints.check(start != end, "accessStart cannot be equal to accessEnd");
        complaints.check(end <= end_of_time(), "accessEnd cannot be after 9999/12/31");
    }
    complaints.into_result()?;

    parsed.ok_or_else(|| DomainError::InvalidFields(String::from("relationship")))
}

/// Validates an administrator about to be created.
///
/// # Errors
///
/// Returns `DomainError::InvalidFields` listing every problem found.
pub fn validate_admin(admin: &Admin) -> Result<(), DomainError> {
    let mut complaints = Complaints::default();
    complaints.check(!admin.id.is_empty(), "id cannot be empty");
    complaints.check(
        chars_within(&admin.first_name, 1, usize::MAX, is_name_char),
        FIRST_NAME_MESSAGE,
    );
    complaints.check(
        chars_within(&admin.last_name, 1, usize::MAX, is_name_char),
        LAST_NAME_MESSAGE,
    );
    complaints.check(is_email(&admin.email), EMAIL_MESSAGE);
    complaints.into_result()
}
