//! State shared by every catalog entity: enabled/disabled status, publication and
//! bookkeeping timestamps. Entities embed these as plain fields.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Disableable {
    pub disabled: bool,
    pub disabled_date: Option<DateTime<Utc>>,
    pub disabled_reason: String,
}

impl Disableable {
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn disable(&mut self, reason: &str, at: DateTime<Utc>) {
        self.disabled = true;
        self.disabled_date = Some(at);
        self.disabled_reason = reason.to_string();
    }

    pub fn enable(&mut self) {
        self.disabled = false;
        self.disabled_date = None;
        self.disabled_reason.clear();
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Publishable {
    pub published_date: Option<DateTime<Utc>>,
}

impl Publishable {
    /// Published means a publication date strictly in the past.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        matches!(self.published_date, Some(date) if date < now)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Timestamps {
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

/// Enabled and published.
pub fn is_available(status: &Disableable, publishing: &Publishable, now: DateTime<Utc>) -> bool {
    status.is_enabled() && publishing.is_published(now)
}

/// Reason stored on songs disabled because a linked entity was.
pub fn cascade_disable_reason(model: &str, title: &str) -> String {
    format!("{} \"{}\" was disabled.", model, title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn disable_then_enable_clears_metadata() {
        let now = Utc::now();
        let mut status = Disableable::default();
        assert!(status.is_enabled());

        status.disable("broken file", now);
        assert!(!status.is_enabled());
        assert_eq!(status.disabled_date, Some(now));
        assert_eq!(status.disabled_reason, "broken file");

        status.enable();
        assert_eq!(status, Disableable::default());
    }

    #[test]
    fn publication_requires_past_date() {
        let now = Utc::now();
        assert!(!Publishable::default().is_published(now));
        assert!(!Publishable {
            published_date: Some(now + Duration::hours(1))
        }
        .is_published(now));
        assert!(!Publishable {
            published_date: Some(now)
        }
        .is_published(now));
        assert!(Publishable {
            published_date: Some(now - Duration::seconds(1))
        }
        .is_published(now));
    }

    #[test]
    fn availability_needs_both() {
        let now = Utc::now();
        let published = Publishable {
            published_date: Some(now - Duration::days(1)),
        };
        let mut status = Disableable::default();
        assert!(is_available(&status, &published, now));
        status.disable("", now);
        assert!(!is_available(&status, &published, now));
        assert!(!is_available(&Disableable::default(), &Publishable::default(), now));
    }

    #[test]
    fn cascade_reason_format() {
        assert_eq!(
            cascade_disable_reason("Album", "Chrono Trigger OST"),
            "Album \"Chrono Trigger OST\" was disabled."
        );
    }
}
