use ordermap::OrderMap;
use serde::Deserialize;

use super::{
    artwork::fetch_metadata,
    de::deserialize_number_unconditionally,
    error::ApiError,
    fetch::{check_head, fetch_bytes},
    Client,
};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UgoiraMeta {
    /* 600x600 archive */
    #[serde(default)]
    pub src: Option<String>,
    /* Full resolution archive */
    #[serde(default)]
    pub original_src: Option<String>,
    pub frames: Vec<UgoiraFrame>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UgoiraFrame {
    pub file: String,
    #[serde(deserialize_with = "deserialize_number_unconditionally")]
    pub delay: u32,
}

/// Archive variants pixiv offers for a single ugoira.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quality {
    Original,
    Standard,
}

impl Quality {
    /// Best first.
    pub const PRIORITY: [Quality; 2] = [Quality::Original, Quality::Standard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "originalSrc",
            Self::Standard => "src",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl UgoiraMeta {
    pub fn url(&self, quality: Quality) -> Option<&str> {
        let url = match quality {
            Quality::Original => self.original_src.as_deref(),
            Quality::Standard => self.src.as_deref(),
        };
        url.filter(|url| !url.is_empty())
    }

    /// The best archive on offer.
    pub fn archive_url(&self) -> Option<(Quality, &str)> {
        Quality::PRIORITY
            .into_iter()
            .find_map(|quality| self.url(quality).map(|url| (quality, url)))
    }

    pub fn frame_map(&self) -> FrameMap {
        self.frames
            .iter()
            .map(|frame| (frame.file.clone(), frame.delay))
            .collect()
    }
}

/// Archive member name to display duration in milliseconds.
///
/// Iterates in playback order; equality is order sensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameMap(OrderMap<String, u32>);

impl FrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(&self, file: &str) -> Option<u32> {
        self.0.get(file).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(file, delay)| (file.as_str(), *delay))
    }

    /// Sum of all frame delays in milliseconds.
    pub fn duration(&self) -> u64 {
        self.0.values().map(|&delay| u64::from(delay)).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for FrameMap {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(file, delay)| (file.into(), delay))
                .collect(),
        )
    }
}

/// Downloads the frame archive of ugoira `id`.
///
/// The archive is checked with a HEAD request first; a failed check aborts
/// before the download is attempted.
pub fn download_ugoira_zip(client: &Client, id: u64) -> Result<(Vec<u8>, FrameMap), ApiError> {
    let meta = fetch_metadata(client, id)?;
    if !meta.is_ugoira() {
        return Err(ApiError::NotUgoira {
            id,
            illust_type: meta.illust_type,
        });
    }
    let Some(ugoira) = meta.ugoira_meta else {
        return Err(ApiError::NotUgoira {
            id,
            illust_type: meta.illust_type,
        });
    };

    let (quality, url) = ugoira.archive_url().ok_or(ApiError::NoArchive(id))?;

    log::info!(
        target: "pixiv_ugoira::api",
        "[Pixiv: {id}] Checking {quality} archive {url}"
    );
    check_head(client, url)?;

    log::info!(
        target: "pixiv_ugoira::api",
        "[Pixiv: {id}] Downloading archive {url}"
    );
    let data = fetch_bytes(client, url)?;

    let frames = ugoira.frame_map();
    log::debug!(
        target: "pixiv_ugoira::api",
        "[Pixiv: {id}] Archive is {} bytes, {} frames, {} ms",
        data.len(),
        frames.len(),
        frames.duration()
    );

    Ok((data, frames))
}
