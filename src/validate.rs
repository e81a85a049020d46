use serde::Deserialize;
use serde_json::Value;

use crate::error::{FeedbackError, Result};
use crate::model::NewFeedback;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// How strictly submissions are checked before they are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// Every field required, rating within 1..=5.
    #[default]
    Strict,
    /// Accept anything; missing text becomes empty, bad ratings become 0.
    None,
}

impl std::str::FromStr for Validation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Validation::Strict),
            "none" => Ok(Validation::None),
            other => Err(format!("unknown validation mode: {}", other)),
        }
    }
}

/// A submission after trimming and normalisation, ready to be stamped with
/// an id and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidFeedback {
    pub student_name: String,
    pub course_code: String,
    pub comments: String,
    pub rating: i64,
}

/// Check and normalise a submission.
///
/// Fields are checked in a fixed order (name, course, comments, rating) and
/// the first failure is reported.
pub fn validate(input: &NewFeedback, mode: Validation) -> Result<ValidFeedback> {
    let student_name = trimmed(input.student_name.as_deref());
    let course_code = trimmed(input.course_code.as_deref()).to_uppercase();
    let comments = trimmed(input.comments.as_deref());
    let rating = input.rating.as_ref().and_then(parse_rating);

    if mode == Validation::None {
        return Ok(ValidFeedback {
            student_name,
            course_code,
            comments,
            rating: rating.unwrap_or(0),
        });
    }

    if student_name.is_empty() {
        return Err(invalid("studentName", "Student name is required"));
    }
    if course_code.is_empty() {
        return Err(invalid("courseCode", "Course code is required"));
    }
    if comments.is_empty() {
        return Err(invalid("comments", "Comments are required"));
    }
    let rating = match rating {
        Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => r,
        _ => return Err(invalid("rating", "Rating must be between 1 and 5")),
    };

    Ok(ValidFeedback {
        student_name,
        course_code,
        comments,
        rating,
    })
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

fn invalid(field: &'static str, message: &'static str) -> FeedbackError {
    FeedbackError::Validation { field, message }
}

/// Integers, whole floats, and numeric strings are accepted; anything else
/// is not a rating.
fn parse_rating(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
