use crate::model::{CleanseError, Identifier, INCOMPLETE_MARKER};

pub fn validate(raw: &str) -> Result<Identifier, CleanseError> {
    let digits = raw.strip_prefix(INCOMPLETE_MARKER).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CleanseError::IdentifierFormat(raw.to_string()));
    }
    Ok(Identifier::new(raw.to_string()))
}
