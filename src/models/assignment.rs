use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// A single deadline pulled from the calendar feed.
///
/// Everything but `course` is fixed at ingestion; the course is filled in
/// once it has been inferred or chosen by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub title: String,
    pub course: Option<String>,
    pub due: DateTime<FixedOffset>,
}

impl Assignment {
    pub fn new(title: impl Into<String>, due: DateTime<FixedOffset>) -> Self {
        Self {
            title: title.into(),
            course: None,
            due,
        }
    }

    /// Due date in the shape the board stores it (`2024-01-01T00:00:00.000Z`).
    ///
    /// Used as the comparison key against a card's stored `due`.
    pub fn due_date_string(&self) -> String {
        self.due
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Due date sent when creating a card (`2024-01-01T00:00:00Z`).
    pub fn due_param(&self) -> String {
        self.due
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
