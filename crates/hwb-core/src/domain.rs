use std::{fmt, str::FromStr};

use serde_json::Value;

use crate::errors::RecordError;

/// Where notifications go: a numeric Telegram chat id or a public `@channel`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    Chat(i64),
    Channel(String),
}

impl Destination {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(id) = raw.parse::<i64>() {
            return Some(Self::Chat(id));
        }
        let name = raw.strip_prefix('@')?;
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        Some(Self::Channel(raw.to_string()))
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat(id) => write!(f, "{id}"),
            Self::Channel(name) => f.write_str(name),
        }
    }
}

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// Delivery receipt: where a message landed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub destination: Destination,
    pub message_id: MessageId,
}

/// Start of the next query window (unix seconds).
///
/// Only moves forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor(i64);

impl Cursor {
    pub fn new(ts: i64) -> Self {
        Self(ts)
    }

    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp())
    }

    pub fn timestamp(self) -> i64 {
        self.0
    }

    /// Move the cursor to `ts`. Returns false (and stays put) when `ts` is in the past.
    pub fn advance_to(&mut self, ts: i64) -> bool {
        if ts > self.0 {
            self.0 = ts;
            true
        } else {
            false
        }
    }
}

/// Review status of a homework. The closed set the API is known to return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [Self; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| RecordError::UnknownStatus {
                status: s.to_string(),
            })
    }
}

/// One homework entry as returned by the API. Contents are checked lazily.
#[derive(Clone, Debug, PartialEq)]
pub struct HomeworkRecord(pub Value);

impl HomeworkRecord {
    pub fn name(&self) -> Result<&str, RecordError> {
        self.str_field("homework_name")
    }

    pub fn status(&self) -> Result<HomeworkStatus, RecordError> {
        self.str_field("status")?.parse()
    }

    fn str_field(&self, field: &'static str) -> Result<&str, RecordError> {
        match self.0.get(field) {
            None | Some(Value::Null) => Err(RecordError::MissingField { field }),
            Some(v) => v.as_str().ok_or(RecordError::MalformedField { field }),
        }
    }
}

/// Text ready to be handed to the notifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationMessage(pub String);

impl NotificationMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn destination_accepts_ids_and_channels() {
        assert_eq!(Destination::parse("12345"), Some(Destination::Chat(12345)));
        assert_eq!(
            Destination::parse(" -1001234 "),
            Some(Destination::Chat(-1001234))
        );
        assert_eq!(
            Destination::parse("@review_feed"),
            Some(Destination::Channel("@review_feed".to_string()))
        );
        assert_eq!(Destination::parse("@"), None);
        assert_eq!(Destination::parse("review feed"), None);
        assert_eq!(Destination::parse(""), None);
    }

    #[test]
    fn cursor_never_moves_backwards() {
        let mut c = Cursor::new(100);
        assert!(!c.advance_to(50));
        assert_eq!(c.timestamp(), 100);
        assert!(!c.advance_to(100));
        assert!(c.advance_to(1000));
        assert_eq!(c.timestamp(), 1000);
    }

    #[test]
    fn status_parse_is_closed() {
        for st in HomeworkStatus::ALL {
            assert_eq!(st.as_str().parse::<HomeworkStatus>().unwrap(), st);
        }
        assert_eq!(
            "Approved".parse::<HomeworkStatus>(),
            Err(RecordError::UnknownStatus {
                status: "Approved".to_string()
            })
        );
    }

    #[test]
    fn record_reports_missing_fields() {
        let rec = HomeworkRecord(json!({ "status": "approved" }));
        assert_eq!(
            rec.name(),
            Err(RecordError::MissingField {
                field: "homework_name"
            })
        );
        assert_eq!(rec.status(), Ok(HomeworkStatus::Approved));

        let rec = HomeworkRecord(json!({ "homework_name": "hw", "status": 3 }));
        assert_eq!(
            rec.status(),
            Err(RecordError::MalformedField { field: "status" })
        );

        let rec = HomeworkRecord(json!({ "homework_name": ["hw"], "status": null }));
        assert_eq!(
            rec.name(),
            Err(RecordError::MalformedField {
                field: "homework_name"
            })
        );
        assert_eq!(rec.status(), Err(RecordError::MissingField { field: "status" }));

        let rec = HomeworkRecord(json!("not an object"));
        assert!(rec.name().is_err());
    }
}
