use std::{collections::HashMap, sync::LazyLock};

use scraper::{Html, Selector};
use serde::Deserialize;

use super::{
    de::deserialize_number_unconditionally, error::ApiError, fetch::fetch_text,
    ugoira::UgoiraMeta, Client,
};

pub const ILLUST_TYPE_ILLUST: u8 = 0;
pub const ILLUST_TYPE_MANGA: u8 = 1;
pub const ILLUST_TYPE_UGOIRA: u8 = 2;

/// The illust entry of a page's preload data. Only the fields needed to find
/// and time a ugoira are validated; the rest of the document is ignored.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    #[serde(deserialize_with = "deserialize_number_unconditionally")]
    pub illust_type: u8,
    #[serde(default)]
    pub illust_title: Option<String>,
    #[serde(default)]
    pub ugoira_meta: Option<UgoiraMeta>,
}

impl ResourceMetadata {
    pub fn is_ugoira(&self) -> bool {
        self.illust_type == ILLUST_TYPE_UGOIRA
    }
}

#[derive(Deserialize)]
struct PreloadData {
    #[serde(default)]
    illust: HashMap<String, ResourceMetadata>,
}

/* <meta name="preload-data" id="meta-preload-data" content='{...}'> */
static PRELOAD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta#meta-preload-data").expect("Preload data selector construct failed.")
});

/// Pulls the illust entry for `id` out of an artwork page.
///
/// `Ok(None)` when the page carries no preload data or none for `id`; an
/// error when the data is there but does not have the expected shape.
pub fn extract_preload_data(
    page: &str,
    id: u64,
) -> Result<Option<ResourceMetadata>, serde_json::Error> {
    let document = Html::parse_document(page);
    let Some(content) = document
        .select(&PRELOAD_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("content"))
    else {
        return Ok(None);
    };

    let mut data: PreloadData = serde_json::from_str(content)?;
    Ok(data.illust.remove(&id.to_string()))
}

pub fn fetch_metadata(client: &Client, id: u64) -> Result<ResourceMetadata, ApiError> {
    let url = client.config().illust_url(id);
    log::info!(target: "pixiv_ugoira::api", "[Pixiv: {id}] Requesting page {url}");

    let (status, page) = fetch_text(client, &url)?;

    match extract_preload_data(&page, id) {
        Ok(Some(meta)) => Ok(meta),
        Ok(None) => {
            log::warn!(
                target: "pixiv_ugoira::api",
                "[Pixiv: {id}] Page carries no preload data for this illust"
            );
            Err(ApiError::remote(status, page))
        }
        Err(source) => {
            log::warn!(
                target: "pixiv_ugoira::api",
                "[Pixiv: {id}] Preload data does not parse: {source}"
            );
            Err(ApiError::Malformed { status, source })
        }
    }
}

pub fn is_ugoira(client: &Client, id: u64) -> Result<bool, ApiError> {
    Ok(fetch_metadata(client, id)?.is_ugoira())
}
