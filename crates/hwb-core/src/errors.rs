/// Startup / infrastructure error.
///
/// Everything that can go wrong inside a poll cycle has its own closed error
/// type below; this one covers what happens before the loop starts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure while fetching statuses from the review API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("review API is unreachable: {0}")]
    Network(String),

    #[error("review API answered with HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("review API returned a malformed body: {0}")]
    Decode(String),
}

/// The API payload does not match the expected schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("API response is not a JSON object")]
    NotAnObject,

    #[error("API response has no `homeworks` key")]
    MissingHomeworks,

    #[error("`homeworks` in API response is not a list")]
    HomeworksNotArray,

    #[error("API response has no integer `current_date`")]
    MissingCurrentDate,
}

/// A single homework record cannot be turned into a notification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("homework record has no `{field}` field")]
    MissingField { field: &'static str },

    #[error("homework record field `{field}` is not a string")]
    MalformedField { field: &'static str },

    #[error("unexpected homework status: {status:?}")]
    UnknownStatus { status: String },
}

/// The messaging backend did not accept a message.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("message rejected by messenger: {0}")]
    Rejected(String),

    #[error("messenger transport error: {0}")]
    Transport(String),
}
