use std::sync::OnceLock;

use regex::Regex;

pub const COURSE_ID_MAX_LENGTH: usize = 40;
pub const FEEDBACK_SESSION_NAME_MAX_LENGTH: usize = 38;
pub const EMAIL_MAX_LENGTH: usize = 254;

pub const GIVER_EMAIL_FIELD: &str = "answerer's email";
pub const RECIPIENT_EMAIL_FIELD: &str = "recipient's email";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[\w+'.\-]+@([A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

fn course_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.$\-]+$").expect("course id pattern is valid"))
}

pub fn is_valid_email(value: &str) -> bool {
    value.len() <= EMAIL_MAX_LENGTH && email_pattern().is_match(value)
}

/// Returns a message naming `field` when `value` is not an email address.
pub fn email_invalidity(field: &str, value: &str) -> Option<String> {
    if is_valid_email(value) {
        return None;
    }
    Some(format!(
        "Invalid {field}: \"{value}\" is not in the correct format. An email address contains \
         some text followed by one '@' sign followed by some more text, and cannot be longer \
         than {EMAIL_MAX_LENGTH} characters."
    ))
}

pub fn course_id_invalidity(value: &str) -> Option<String> {
    if value.chars().count() > COURSE_ID_MAX_LENGTH {
        return Some(format!(
            "Invalid course ID: \"{value}\" is too long. A course ID cannot be longer than \
             {COURSE_ID_MAX_LENGTH} characters."
        ));
    }
    if !course_id_pattern().is_match(value) {
        return Some(format!(
            "Invalid course ID: \"{value}\" can only contain letters, digits, \
             underscores, dots, dollar signs and hyphens."
        ));
    }
    None
}

pub fn session_name_invalidity(value: &str) -> Option<String> {
    if value.chars().count() > FEEDBACK_SESSION_NAME_MAX_LENGTH {
        return Some(format!(
            "Invalid feedback session name: \"{value}\" is too long. A feedback session name \
             cannot be longer than {FEEDBACK_SESSION_NAME_MAX_LENGTH} characters."
        ));
    }
    None
}
