//! Newsletter subscribers and the contact-form inbox.
//!
//! Both are stored locally as persisted lists. Nothing is sent anywhere:
//! subscribers are collected for the restaurant to contact by hand, and
//! contact messages are read in the admin panel.

use std::sync::Arc;

use chrono::Utc;

use bistro_core::{ContactSubmission, Email, SubmissionId, Subscriber, SubscriberId};

use crate::collection::PersistedList;
use crate::storage::{KeyValueStorage, Persistence, keys};
use crate::validation::{MIN_PHONE_DIGITS, ValidationErrors, phone_digits};

const MAX_MESSAGE_LEN: usize = 2000;

/// Result of a subscribe request.
#[derive(Debug)]
pub enum Subscription {
    /// A new subscriber was added.
    Added(Subscriber, Persistence),
    /// The phone number was already subscribed.
    Existing(Subscriber),
}

impl Subscription {
    #[must_use]
    pub const fn subscriber(&self) -> &Subscriber {
        match self {
            Self::Added(subscriber, _) | Self::Existing(subscriber) => subscriber,
        }
    }
}

/// Newsletter sign-ups.
pub struct Subscribers {
    list: PersistedList<Subscriber>,
}

impl Subscribers {
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            list: PersistedList::load(storage, keys::SUBSCRIBERS),
        }
    }

    #[must_use]
    pub fn all(&self) -> &[Subscriber] {
        self.list.items()
    }

    /// Sign up `name` with `phone`.
    ///
    /// Phones are compared by their digits only, so re-subscribing with
    /// different formatting returns the existing entry.
    ///
    /// # Errors
    ///
    /// Returns validation errors for a missing name or an unusable phone.
    pub fn subscribe(&mut self, name: &str, phone: &str) -> Result<Subscription, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", name, "Name");
        errors.max_len("name", name, 100);
        let digits = phone_digits(phone);
        if digits.len() < MIN_PHONE_DIGITS {
            errors.add("phone", "Enter a valid phone number");
        }
        errors.into_result()?;

        if let Some(existing) = self
            .list
            .items()
            .iter()
            .find(|s| phone_digits(&s.phone) == digits)
        {
            return Ok(Subscription::Existing(existing.clone()));
        }

        let subscriber = Subscriber {
            id: SubscriberId::generate(),
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            joined_at: Utc::now(),
        };
        let persistence = self.list.push(subscriber.clone());
        tracing::info!(subscriber_id = %subscriber.id, "New newsletter subscriber");
        Ok(Subscription::Added(subscriber, persistence))
    }

    /// Remove a subscriber. `None` if the ID is unknown.
    pub fn remove(&mut self, id: &SubscriberId) -> Option<Persistence> {
        self.list.remove(id).map(|(_, persistence)| persistence)
    }
}

/// A contact form submission before it is stored.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

/// Stored contact form submissions.
pub struct ContactInbox {
    list: PersistedList<ContactSubmission>,
}

impl ContactInbox {
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            list: PersistedList::load(storage, keys::CONTACT_SUBMISSIONS),
        }
    }

    /// Validate and store a submission as unread.
    ///
    /// # Errors
    ///
    /// Returns validation errors for a missing name or message, or a
    /// malformed email.
    pub fn submit(
        &mut self,
        form: ContactForm,
    ) -> Result<(ContactSubmission, Persistence), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &form.name, "Name");
        errors.require("message", &form.message, "Message");
        errors.max_len("message", &form.message, MAX_MESSAGE_LEN);

        let email = match form.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Email::parse(raw) {
                Ok(email) => Some(email),
                Err(e) => {
                    errors.add("email", e.to_string());
                    None
                }
            },
        };
        errors.into_result()?;

        let submission = ContactSubmission {
            id: SubmissionId::generate(),
            name: form.name.trim().to_string(),
            email,
            phone: form
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            message: form.message.trim().to_string(),
            submitted_at: Utc::now(),
            read: false,
        };
        let persistence = self.list.push(submission.clone());
        tracing::info!(submission_id = %submission.id, "Contact form submitted");
        Ok((submission, persistence))
    }

    /// Submissions, newest first.
    #[must_use]
    pub fn newest_first(&self) -> Vec<&ContactSubmission> {
        let mut items: Vec<_> = self.list.items().iter().collect();
        items.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        items
    }

    #[must_use]
    pub fn get(&self, id: &SubmissionId) -> Option<&ContactSubmission> {
        self.list.get(id)
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.list.items().iter().filter(|s| !s.read).count()
    }

    /// Set the read flag. `None` if the ID is unknown.
    pub fn mark_read(&mut self, id: &SubmissionId, read: bool) -> Option<Persistence> {
        self.list.update(id, |submission| submission.read = read)
    }

    /// Delete a submission. `None` if the ID is unknown.
    pub fn remove(&mut self, id: &SubmissionId) -> Option<Persistence> {
        self.list.remove(id).map(|(_, persistence)| persistence)
    }
}
