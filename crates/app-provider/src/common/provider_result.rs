use serde::{
    de::Error as _, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

use super::provider_error::ProviderError;

/// Arbitrary diagnostic payload forwarded to clients as-is
pub type ErrorDetails = serde_json::Map<String, Value>;

/// What a provider returned, kept verbatim.
///
/// The untyped form is what gets forwarded when the provider reports a
/// failure. [`ProviderResult::classify`] turns it into typed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderResult(ErrorDetails);

impl ProviderResult {
    pub fn from_value(value: Value) -> Result<Self, ProviderError> {
        match value {
            Value::Object(raw) => Ok(Self(raw)),
            _ => Err(ProviderError::NotAnObject),
        }
    }

    pub fn from_content(creator: &str, post: &ProviderPost) -> Result<Self, ProviderError> {
        let mut raw = ErrorDetails::new();
        raw.insert("status".into(), true.into());
        raw.insert("creator".into(), creator.into());
        raw.insert("result".into(), serde_json::to_value(post)?);

        Ok(Self(raw))
    }

    #[must_use]
    pub fn failure<T: Into<String>>(message: T) -> Self {
        let mut raw = ErrorDetails::new();
        raw.insert("status".into(), false.into());
        raw.insert("message".into(), Value::String(message.into()));

        Self(raw)
    }

    #[must_use]
    pub fn status(&self) -> bool {
        self.0.get("status").is_some_and(is_truthy)
    }

    #[must_use]
    pub const fn raw(&self) -> &ErrorDetails {
        &self.0
    }

    /// Decide between reported failure and usable content.
    ///
    /// A truthy status with a missing or mistyped `result` is an error.
    pub fn classify(self) -> Result<ProviderOutcome, ProviderError> {
        if !self.status() {
            return Ok(ProviderOutcome::Failure(self.0));
        }

        let content = serde_json::from_value(Value::Object(self.0))?;

        Ok(ProviderOutcome::Success(content))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    Success(ProviderContent),
    Failure(ErrorDetails),
}

/// Fields are kept as raw JSON and reach the client unchanged. An absent
/// field stays `None`; an explicit `null` is kept as [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderContent {
    #[serde(default, deserialize_with = "present")]
    pub creator: Option<Value>,
    pub result: ProviderPost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPost {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Value>,
    pub dl_link: DownloadLinks,
}

/// Downloadable media of a post.
///
/// Upstream marks carousel posts only by a truthy `images` field inside
/// `dl_link`. That check happens here and nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadLinks {
    /// Whatever truthy value upstream put in `images`
    Images(Value),
    Video(VideoLinks),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoLinks {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub download_mp4_1: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub download_mp4_2: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub download_mp4_hd: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub download_mp3: Option<Value>,
}

/// Only called for keys that exist, so `null` maps to `Some(Value::Null)`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl<'de> Deserialize<'de> for DownloadLinks {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut links = ErrorDetails::deserialize(deserializer)?;

        match links.remove("images") {
            Some(images) if is_truthy(&images) => Ok(Self::Images(images)),
            _ => serde_json::from_value(Value::Object(links))
                .map(Self::Video)
                .map_err(D::Error::custom),
        }
    }
}

impl Serialize for DownloadLinks {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Images(images) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("images", images)?;
                map.end()
            }
            Self::Video(links) => links.serialize(serializer),
        }
    }
}

/// Loose truthiness of a JSON value.
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy. Arrays and objects are
/// truthy even when empty.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n
            .as_f64()
            .is_some_and(|n| n.is_normal() || n.is_subnormal() || n.is_infinite()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
