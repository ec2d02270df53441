//! Shape checks for the review API payload.
//!
//! Only the envelope is validated here; individual records are checked when
//! they are formatted.

use serde_json::Value;

use crate::{domain::HomeworkRecord, errors::ShapeError};

/// Pull the `homeworks` list out of an API response.
///
/// An empty list is a normal outcome: nothing changed since the cursor.
pub fn extract(response: &Value) -> Result<Vec<HomeworkRecord>, ShapeError> {
    let obj = response.as_object().ok_or(ShapeError::NotAnObject)?;
    let homeworks = obj.get("homeworks").ok_or(ShapeError::MissingHomeworks)?;
    let list = homeworks.as_array().ok_or(ShapeError::HomeworksNotArray)?;
    Ok(list.iter().cloned().map(HomeworkRecord).collect())
}

/// Server-reported timestamp that becomes the next cursor.
pub fn current_date(response: &Value) -> Result<i64, ShapeError> {
    response
        .get("current_date")
        .and_then(Value::as_i64)
        .ok_or(ShapeError::MissingCurrentDate)
}
