use validator::ValidationError;

/// Header values may only hold visible ASCII, spaces and tabs
pub fn header_value(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .bytes()
        .all(|b| b == b'\t' || (b' '..=b'~').contains(&b));

    if !valid {
        return Err(ValidationError::new("Not a valid header value"));
    }

    Ok(())
}
