use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// A single stored piece of course feedback.
///
/// Records are immutable once written: they are created by
/// [`FeedbackRepository::create`](crate::FeedbackRepository::create) and only
/// ever removed, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: i64,
    pub student_name: String,
    pub course_code: String,
    pub comments: String,
    pub rating: i64,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
}

/// Raw submission body as posted by the client.
///
/// Every field is optional so that missing fields surface as validation
/// errors rather than body rejections. `rating` stays an untyped JSON value
/// because form selects post it as a string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub rating: Option<serde_json::Value>,
}

impl NewFeedback {
    pub fn new(
        student_name: impl Into<String>,
        course_code: impl Into<String>,
        comments: impl Into<String>,
        rating: i64,
    ) -> Self {
        Self {
            student_name: Some(student_name.into()),
            course_code: Some(course_code.into()),
            comments: Some(comments.into()),
            rating: Some(serde_json::Value::from(rating)),
        }
    }
}

/// Format a timestamp the way browsers print `Date.toISOString()`.
pub fn iso_millis(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&iso_millis(ts))
}
