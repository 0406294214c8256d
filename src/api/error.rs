use std::borrow::Cow;

use crate::util::truncate;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /* Non-success status, or a page that does not carry the expected data */
    #[error("pixiv returned {status}: {}", truncate(.body, 200))]
    Remote { status: u16, body: Cow<'static, str> },
    /* The page carries preload data, but not in the expected shape */
    #[error("pixiv returned malformed preload data ({status}): {source}")]
    Malformed {
        status: u16,
        source: serde_json::Error,
    },
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),
    #[error("illust {id} is not a ugoira (illustType {illust_type})")]
    NotUgoira { id: u64, illust_type: u8 },
    #[error("illust {0} does not list a ugoira archive")]
    NoArchive(u64),
}

impl ApiError {
    pub fn remote(status: u16, body: impl Into<Cow<'static, str>>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// The HTTP status of the response the error was raised for.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } | Self::Malformed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
