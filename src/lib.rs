pub mod api;
pub mod config;
pub mod ugoira;
pub mod util;

#[cfg(test)]
mod testing;

pub use api::{
    artwork::{fetch_metadata, is_ugoira, ResourceMetadata, ILLUST_TYPE_UGOIRA},
    error::ApiError,
    ugoira::{download_ugoira_zip, FrameMap, UgoiraFrame},
    Client,
};
pub use config::Config;
pub use ugoira::{make_apng, make_gif, make_zip, ConvertError, Format};
