//! Fixtures shared by the unit tests: a local pixiv stand-in and a small
//! three frame ugoira.

use std::{
    io::{Cursor, Write},
    sync::{mpsc::Sender, Arc, Mutex, OnceLock},
    thread::JoinHandle,
};

use crate::api::ugoira::FrameMap;

pub const UGOIRA_ID: u64 = 74442143;
pub const STILL_ID: u64 = 74073488;

pub const FRAME_COLORS: [[u8; 4]; 3] = [
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 0],
];

struct Recorded {
    method: String,
    url: String,
    user_agent: Option<String>,
    referer: Option<String>,
}

/// A rouille server on an ephemeral port that records every request it sees.
pub struct MockServer {
    base: String,
    log: Arc<Mutex<Vec<Recorded>>>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MockServer {
    /// `handler` receives the request and the server's own base url, so pages
    /// can link back to archives hosted on the same server.
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&rouille::Request, &str) -> rouille::Response + Send + Sync + 'static,
    {
        let log = Arc::new(Mutex::new(Vec::new()));
        let base_cell = Arc::new(OnceLock::<String>::new());

        let recorded = Arc::clone(&log);
        let own_base = Arc::clone(&base_cell);
        let server = rouille::Server::new("127.0.0.1:0", move |request| {
            recorded.lock().unwrap().push(Recorded {
                method: request.method().to_owned(),
                url: request.url(),
                user_agent: request.header("User-Agent").map(str::to_owned),
                referer: request.header("Referer").map(str::to_owned),
            });
            handler(request, own_base.get().map(String::as_str).unwrap_or_default())
        })
        .expect("mock server should bind");

        let base = format!("http://{}", server.server_addr());
        base_cell.set(base.clone()).unwrap();
        let (handle, stop) = server.stoppable();

        Self {
            base,
            log,
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.method.clone(), r.url.clone()))
            .collect()
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.user_agent.clone().unwrap_or_default())
            .collect()
    }

    pub fn referers(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.referer.clone().unwrap_or_default())
            .collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// An artwork page embedding `illust` the way pixiv's preload data does.
pub fn illust_page(id: u64, illust: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><title>pixiv</title>\
         <meta name=\"global-data\" id=\"meta-global-data\" content='{{\"token\":\"\"}}'>\
         <meta name=\"preload-data\" id=\"meta-preload-data\" content='{{\"timestamp\":\"2019-04-29T16:09:38+09:00\",\"illust\":{{\"{id}\":{illust}}},\"user\":{{}}}}'>\
         </head><body><div id=\"root\"></div></body></html>"
    )
}

pub fn png_frame(color: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(4, 4, image::Rgba(color));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

pub fn zip_of(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn ugoira_frames() -> Vec<(&'static str, Vec<u8>)> {
    ["000000.png", "000001.png", "000002.png"]
        .into_iter()
        .zip(FRAME_COLORS)
        .map(|(name, color)| (name, png_frame(color)))
        .collect()
}

pub fn ugoira_zip() -> Vec<u8> {
    zip_of(&ugoira_frames())
}

pub fn ugoira_frame_map() -> FrameMap {
    [("000000.png", 1000), ("000001.png", 2000), ("000002.png", 3000)]
        .into_iter()
        .collect()
}
