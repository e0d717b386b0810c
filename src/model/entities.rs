//! Content and submission records.

use super::{DefaultValue, Entity, EntitySchema, FieldSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FieldKind::{Boolean, Email, Text, Timestamp};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sermon {
    pub title: String,
    pub speaker: Option<String>,
    pub series: Option<String>,
    pub date: DateTime<Utc>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub notes_url: Option<String>,
    pub scripture: Option<String>,
    pub description: Option<String>,
}

impl Entity for Sermon {
    const NAME: &'static str = "Sermon";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("title", Text),
        FieldSpec::optional("speaker", Text),
        FieldSpec::optional("series", Text),
        FieldSpec::with_default("date", Timestamp, DefaultValue::Now),
        FieldSpec::optional("video_url", Text),
        FieldSpec::optional("audio_url", Text),
        FieldSpec::optional("notes_url", Text),
        FieldSpec::optional("scripture", Text),
        FieldSpec::optional("description", Text),
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub registration_url: Option<String>,
}

impl Entity for Event {
    const NAME: &'static str = "Event";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("title", Text),
        FieldSpec::optional("description", Text),
        FieldSpec::required("start_date", Timestamp),
        FieldSpec::optional("end_date", Timestamp),
        FieldSpec::optional("location", Text),
        FieldSpec::optional("image_url", Text),
        FieldSpec::optional("category", Text),
        FieldSpec::optional("registration_url", Text),
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ministry {
    pub name: String,
    pub summary: Option<String>,
    pub meeting_times: Option<String>,
    pub contact_email: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl Entity for Ministry {
    const NAME: &'static str = "Ministry";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", Text),
        FieldSpec::optional("summary", Text),
        FieldSpec::optional("meeting_times", Text),
        FieldSpec::optional("contact_email", Email),
        FieldSpec::optional("category", Text),
        FieldSpec::optional("image_url", Text),
    ];
}

/// Testimony shown on the home page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub body: String,
    pub author: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub date: DateTime<Utc>,
}

impl Entity for Story {
    const NAME: &'static str = "Story";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("title", Text),
        FieldSpec::required("body", Text),
        FieldSpec::optional("author", Text),
        FieldSpec::optional("video_url", Text),
        FieldSpec::optional("image_url", Text),
        FieldSpec::with_default("date", Timestamp, DefaultValue::Now),
    ];
}

/// Leadership bio. Managed only through the document editor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl Entity for Leader {
    const NAME: &'static str = "Leader";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", Text),
        FieldSpec::required("role", Text),
        FieldSpec::optional("bio", Text),
        FieldSpec::optional("email", Email),
        FieldSpec::optional("photo_url", Text),
    ];
}

/// Connect/contact form submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub newsletter_opt_in: bool,
}

impl Entity for ContactMessage {
    const NAME: &'static str = "ContactMessage";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", Text),
        FieldSpec::required("email", Email),
        FieldSpec::optional("phone", Text),
        FieldSpec::optional("subject", Text),
        FieldSpec::required("message", Text),
        FieldSpec::with_default("newsletter_opt_in", Boolean, DefaultValue::Bool(false)),
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrayerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub request: String,
    pub allow_followup: bool,
}

impl Entity for PrayerRequest {
    const NAME: &'static str = "PrayerRequest";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("name", Text),
        FieldSpec::optional("email", Email),
        FieldSpec::required("request", Text),
        FieldSpec::with_default("allow_followup", Boolean, DefaultValue::Bool(false)),
    ];
}

/// Shapes of every entity, in declaration order.
pub fn all_schemas() -> Vec<EntitySchema> {
    vec![
        Sermon::schema(),
        Event::schema(),
        Ministry::schema(),
        Story::schema(),
        Leader::schema(),
        ContactMessage::schema(),
        PrayerRequest::schema(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collections_are_lowercased_type_names() {
        assert_eq!(Sermon::collection(), "sermon");
        assert_eq!(Event::collection(), "event");
        assert_eq!(Ministry::collection(), "ministry");
        assert_eq!(Story::collection(), "story");
        assert_eq!(Leader::collection(), "leader");
        assert_eq!(ContactMessage::collection(), "contactmessage");
        assert_eq!(PrayerRequest::collection(), "prayerrequest");
    }

    #[test]
    fn contact_message_defaults_newsletter_opt_in() {
        let msg = ContactMessage::validate(&json!({
            "name": "Ruth",
            "email": "ruth@example.com",
            "message": "Hello"
        }))
        .unwrap();
        assert!(!msg.newsletter_opt_in);
        assert_eq!(msg.phone, None);
    }

    #[test]
    fn contact_message_rejects_bad_email() {
        let err = ContactMessage::validate(&json!({
            "name": "Ruth",
            "email": "ruth-at-example",
            "message": "Hello"
        }))
        .unwrap_err();
        assert!(err.has_field("email"));
    }

    #[test]
    fn prayer_request_requires_request() {
        let err = PrayerRequest::validate(&json!({ "name": "Anon" })).unwrap_err();
        assert!(err.has_field("request"));
        let ok = PrayerRequest::validate(&json!({ "request": "Healing for my father" })).unwrap();
        assert!(!ok.allow_followup);
        assert_eq!(ok.email, None);
    }

    #[test]
    fn event_requires_start_date() {
        let err = Event::validate(&json!({ "title": "Picnic" })).unwrap_err();
        assert!(err.has_field("start_date"));
    }

    #[test]
    fn stored_document_with_id_decodes() {
        let story = Story::validate(&json!({
            "_id": "6650c0ffee",
            "title": "Found hope",
            "body": "...",
            "date": "2024-03-10T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(story.date.to_rfc3339(), "2024-03-10T09:30:00+00:00");
    }

    #[test]
    fn sermon_date_defaults_to_now() {
        let before = Utc::now();
        let sermon = Sermon::validate(&json!({ "title": "The Good Shepherd" })).unwrap();
        assert!(sermon.date >= before - chrono::Duration::seconds(1));
    }

    #[test]
    fn leader_schema_is_published() {
        let names: Vec<&str> = all_schemas().iter().map(|s| s.name).collect();
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"Leader"));
        assert!(Leader::validate(&json!({ "name": "Dan", "role": "Pastor", "email": "bad" })).is_err());
    }
}
