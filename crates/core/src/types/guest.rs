//! Guest-facing records: testimonials, gallery photos, newsletter
//! subscribers and contact-form submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, GalleryImageId, SubmissionId, SubscriberId, TestimonialId};

/// A quote from a happy guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: TestimonialId,
    pub author: String,
    pub quote: String,
}

/// A photo shown in the gallery section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: GalleryImageId,
    pub image: String,
    #[serde(default)]
    pub alt: String,
}

/// Someone who signed up for the newsletter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: SubscriberId,
    pub name: String,
    pub phone: String,
    pub joined_at: DateTime<Utc>,
}

/// A message left through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: SubmissionId,
    pub name: String,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}
