//! Turning homework records into notification text.

use crate::{
    domain::{HomeworkRecord, HomeworkStatus, NotificationMessage},
    errors::RecordError,
};

/// Build the status-change notification for one record.
///
/// The status is checked before the name so an unexpected status is always
/// reported as such, even on a record that is otherwise incomplete.
pub fn format_status(record: &HomeworkRecord) -> Result<NotificationMessage, RecordError> {
    let status = record.status()?;
    let name = record.name()?;
    Ok(status_message(name, status))
}

pub fn status_message(name: &str, status: HomeworkStatus) -> NotificationMessage {
    NotificationMessage(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    ))
}

/// Diagnostic text sent to the chat when a cycle fails.
pub fn failure_message(error: &impl std::fmt::Display) -> NotificationMessage {
    NotificationMessage(format!("Сбой в работе программы: {error}"))
}
