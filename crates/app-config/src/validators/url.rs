use url::Url;
use validator::ValidationError;

pub fn validate_is_absolute_url<T>(url: T) -> Result<(), ValidationError>
where
    T: AsRef<str>,
{
    let parsed =
        Url::parse(url.as_ref()).map_err(|_| ValidationError::new("Invalid URL"))?;

    if parsed.cannot_be_a_base() {
        return Err(ValidationError::new("URL must be absolute"));
    }

    Ok(())
}

/// Parses an absolute URL and strips any trailing slashes
#[must_use]
pub fn value_parser_parse_absolute_url() -> impl clap::builder::TypedValueParser {
    move |s: &str| {
        let parsed = match Url::parse(s) {
            Ok(parsed) => parsed,
            Err(e) => return Err(format!("URL must be absolute: {e}")),
        };

        if parsed.cannot_be_a_base() {
            return Err("URL must be absolute".to_string());
        }

        Ok(parsed.as_str().trim_end_matches('/').to_string())
    }
}
