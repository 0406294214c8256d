use std::borrow::Cow;

use ureq::{http::Response, Body};

use super::{error::ApiError, Client};

fn check_status(response: &mut Response<Body>) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response
        .body_mut()
        .read_to_string()
        .map(Cow::from)
        .unwrap_or_else(|_| Cow::from(""));
    Err(ApiError::remote(status.as_u16(), body))
}

/* Fetch an html page, returning its status alongside the text */
pub(crate) fn fetch_text(client: &Client, url: &str) -> Result<(u16, String), ApiError> {
    let mut response = client
        .agent
        .get(url)
        .header("User-Agent", &client.config.user_agent)
        .header("Referer", &client.config.referer)
        .call()?;

    check_status(&mut response)?;

    let status = response.status().as_u16();
    let text = response.body_mut().read_to_string()?;
    Ok((status, text))
}

/* Cheap reachability check; HEAD responses carry no body */
pub(crate) fn check_head(client: &Client, url: &str) -> Result<(), ApiError> {
    let response = client
        .agent
        .head(url)
        .header("User-Agent", &client.config.user_agent)
        .header("Referer", &client.config.referer)
        .call()?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::remote(status.as_u16(), ""))
    }
}

pub(crate) fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, ApiError> {
    let mut response = client
        .agent
        .get(url)
        .header("User-Agent", &client.config.user_agent)
        .header("Referer", &client.config.referer)
        .call()?;

    check_status(&mut response)?;

    let bytes = response
        .body_mut()
        .with_config()
        .limit(client.config.max_archive_size)
        .read_to_vec()?;
    Ok(bytes)
}
