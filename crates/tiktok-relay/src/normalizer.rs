//! Maps whatever the extraction provider returned onto the public response shape.

use app_provider::{
    DownloadLinks, ErrorDetails, ProviderContent, ProviderError, ProviderOutcome, ProviderResult,
    VideoLinks,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResponse {
    Success(NormalizedPost),
    /// The provider reported a failure; its raw result is kept for the client
    Failure(ErrorDetails),
}

/// Provider values are copied as-is. Fields the provider left out are
/// omitted, while an explicit `null` is sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(flatten)]
    pub media: MediaDownloads,
}

/// Serialized as the `type` and `downloads` fields of [`NormalizedPost`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "downloads", rename_all = "lowercase")]
pub enum MediaDownloads {
    Images(Value),
    Video(VideoDownloads),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoDownloads {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mp4: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mp4_hd: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mp3: Option<Value>,
}

impl From<VideoLinks> for VideoDownloads {
    fn from(links: VideoLinks) -> Self {
        Self {
            mp4: links.download_mp4_1,
            mp4_hd: links.download_mp4_hd,
            mp3: links.download_mp3,
        }
    }
}

impl From<DownloadLinks> for MediaDownloads {
    fn from(links: DownloadLinks) -> Self {
        match links {
            DownloadLinks::Images(images) => Self::Images(images),
            DownloadLinks::Video(links) => Self::Video(links.into()),
        }
    }
}

impl From<ProviderContent> for NormalizedPost {
    fn from(content: ProviderContent) -> Self {
        let post = content.result;

        Self {
            creator: content.creator,
            title: post.title,
            image: post.image,
            media: post.dl_link.into(),
        }
    }
}

/// Errors only when the provider claimed success but the payload does not
/// have the expected shape.
pub fn normalize(result: ProviderResult) -> Result<NormalizedResponse, ProviderError> {
    let normalized = match result.classify()? {
        ProviderOutcome::Success(content) => NormalizedResponse::Success(content.into()),
        ProviderOutcome::Failure(details) => NormalizedResponse::Failure(details),
    };

    Ok(normalized)
}
