use std::time::Duration;

use app_config::provider::ProviderConfig;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::{
    common::request::{Client, RequestClient},
    DownloadLinks, ExtractionProvider, ProviderError, ProviderPost, ProviderResult, VideoLinks,
};

/// Reported as the `creator` of every result this provider builds
pub const CREATOR: &str = "tiktok-relay";

/// Scrapes the HTML fragment tiktokio.com renders for a submitted post
#[derive(Debug, Clone)]
pub struct Tiktokio {
    client: RequestClient,
    endpoint: Url,
    prefix: String,
}

#[async_trait::async_trait]
impl ExtractionProvider for Tiktokio {
    fn name(&self) -> &'static str {
        "tiktokio"
    }

    fn description(&self) -> &'static str {
        "Get video and image links for TikTok posts through tiktokio.com"
    }

    async fn download(&self, url: &str) -> Result<ProviderResult, ProviderError> {
        debug!(url, endpoint = %self.endpoint, "Submitting post to tiktokio");

        let resp = self
            .client
            .post(self.endpoint.clone())
            .header("HX-Request", "true")
            .form(&[("prefix", self.prefix.as_str()), ("vid", url)])
            .send()
            .await?
            .error_for_status()?;
        trace!(?resp, "Got response from tiktokio");

        let body = resp.text().await?;

        let post = tokio::task::spawn_blocking(move || scrape_post(&body)).await??;

        match post {
            Some(post) => {
                trace!(?post, "Scraped post from tiktokio response");
                ProviderResult::from_content(CREATOR, &post)
            }
            None => {
                debug!("No download links in tiktokio response");
                Ok(ProviderResult::failure(
                    "No download links found for the given URL",
                ))
            }
        }
    }
}

impl Tiktokio {
    pub fn new<T>(endpoint: Url, prefix: T, timeout: Duration) -> Result<Self, ProviderError>
    where
        T: Into<String>,
    {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::Client)?;

        Ok(Self {
            client,
            endpoint,
            prefix: prefix.into(),
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| ProviderError::Parse(format!("Invalid provider endpoint: {e}")))?;

        Self::new(endpoint, config.prefix.as_str(), config.timeout())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Video,
    VideoHd,
    Audio,
    Image,
}

impl LinkKind {
    fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        let words = label
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>();

        if words.contains(&"mp3") {
            Some(Self::Audio)
        } else if words.contains(&"hd") {
            Some(Self::VideoHd)
        } else if words
            .iter()
            .any(|w| w.starts_with("image") || w.starts_with("photo"))
        {
            Some(Self::Image)
        } else if words.contains(&"download") {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// Returns `None` when the page carries no download anchors at all
fn scrape_post(html: &str) -> Result<Option<ProviderPost>, ProviderError> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| ProviderError::Parse(format!("{e:?}")))?;
    let parser = dom.parser();

    let title = dom
        .query_selector("h2")
        .into_iter()
        .flatten()
        .filter_map(|x| x.get(parser))
        .map(|x| x.inner_text(parser).trim().to_string())
        .find(|x| !x.is_empty());

    let image = dom
        .query_selector("img")
        .into_iter()
        .flatten()
        .filter_map(|x| x.get(parser))
        .filter_map(|x| x.as_tag())
        .find_map(|x| attribute(x, "src"));

    let mut images = vec![];
    let mut video = VideoLinks::default();
    let mut found_any = false;

    let anchors = dom
        .query_selector("a")
        .into_iter()
        .flatten()
        .filter_map(|x| x.get(parser))
        .filter_map(|x| x.as_tag())
        .filter_map(|x| {
            let href = attribute(x, "href")?;
            let kind = LinkKind::from_label(&x.inner_text(parser))?;

            Some((kind, href))
        });

    for (kind, href) in anchors {
        found_any = true;

        match kind {
            LinkKind::Image => images.push(Value::String(href)),
            LinkKind::Audio => {
                video.download_mp3.get_or_insert(Value::String(href));
            }
            LinkKind::VideoHd => {
                video.download_mp4_hd.get_or_insert(Value::String(href));
            }
            LinkKind::Video => {
                if video.download_mp4_1.is_none() {
                    video.download_mp4_1 = Some(Value::String(href));
                } else {
                    video.download_mp4_2.get_or_insert(Value::String(href));
                }
            }
        }
    }

    if !found_any {
        return Ok(None);
    }

    let dl_link = if images.is_empty() {
        DownloadLinks::Video(video)
    } else {
        DownloadLinks::Images(Value::Array(images))
    };

    Ok(Some(ProviderPost {
        title: title.map(Value::String),
        image: image.map(Value::String),
        dl_link,
    }))
}

fn attribute<'a>(tag: &tl::HTMLTag<'a>, name: &'a str) -> Option<String> {
    tag.attributes()
        .get(name)
        .flatten()
        .map(|x| x.as_utf8_str().trim().replace("&amp;", "&"))
        .filter(|x| !x.is_empty())
}
