//! Re-encoding of downloaded ugoira archives.
//!
//! Frames are emitted in archive order. Each frame's delay is looked up by
//! its member name in the [`FrameMap`], never by position.

use std::{
    io::{Cursor, Read, Write},
    path::Path,
};

use image::RgbaImage;
use zip::ZipArchive;

use crate::api::ugoira::FrameMap;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid ugoira archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("failed to decode frame {name}: {source}")]
    Decode {
        name: String,
        source: image::ImageError,
    },
    #[error("archive holds {archive} frames but {described} are described")]
    FrameCountMismatch { archive: usize, described: usize },
    #[error("no delay is known for frame {0}")]
    UnknownFrame(String),
    #[error("frame {name} is {width}x{height}, expected {expected:?}")]
    FrameSize {
        name: String,
        width: u32,
        height: u32,
        expected: (u32, u32),
    },
    #[error("{0}x{1} is too large for a gif")]
    Dimensions(u32, u32),
    #[error("archive holds no frames")]
    Empty,
    #[error(transparent)]
    Png(#[from] png::EncodingError),
    #[error(transparent)]
    Gif(#[from] gif::EncodingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Deliverable formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Apng,
    Gif,
    Zip,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apng => "apng",
            Self::Gif => "gif",
            Self::Zip => "zip",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Apng => "png",
            Self::Gif => "gif",
            Self::Zip => "zip",
        }
    }

    pub fn write(
        &self,
        destination: impl AsRef<Path>,
        data: &[u8],
        frames: &FrameMap,
    ) -> Result<(), ConvertError> {
        match self {
            Self::Apng => make_apng(destination, data, frames),
            Self::Gif => make_gif(destination, data, frames),
            Self::Zip => make_zip(destination, data),
        }
    }
}

impl std::str::FromStr for Format {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "apng" | "png" => Ok(Self::Apng),
            "gif" => Ok(Self::Gif),
            "zip" => Ok(Self::Zip),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Frame {
    image: RgbaImage,
    delay: u32,
}

fn open_archive(data: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>, ConvertError> {
    Ok(ZipArchive::new(Cursor::new(data))?)
}

fn decode_frames(data: &[u8], frames: &FrameMap) -> Result<Vec<Frame>, ConvertError> {
    let mut archive = open_archive(data)?;
    if archive.len() == 0 {
        return Err(ConvertError::Empty);
    }
    if archive.len() != frames.len() {
        return Err(ConvertError::FrameCountMismatch {
            archive: archive.len(),
            described: frames.len(),
        });
    }

    let mut decoded: Vec<Frame> = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_owned();
        let delay = frames
            .delay(&name)
            .ok_or_else(|| ConvertError::UnknownFrame(name.clone()))?;

        /* The declared size comes from the archive; never reserve past the input */
        let mut buffer = Vec::with_capacity(entry.size().min(data.len() as u64) as usize);
        entry.read_to_end(&mut buffer)?;
        let image = match image::load_from_memory(&buffer) {
            Ok(image) => image.to_rgba8(),
            Err(source) => return Err(ConvertError::Decode { name, source }),
        };

        if let Some(first) = decoded.first() {
            let expected = first.image.dimensions();
            if image.dimensions() != expected {
                return Err(ConvertError::FrameSize {
                    name,
                    width: image.width(),
                    height: image.height(),
                    expected,
                });
            }
        }

        log::trace!(target: "pixiv_ugoira::convert", "Decoded {name} ({delay} ms)");
        decoded.push(Frame { image, delay });
    }

    Ok(decoded)
}

/// Delay as an APNG `(numerator, denominator)` fraction of a second.
///
/// Milliseconds are kept exactly while they fit the 16 bit numerator; longer
/// delays fall back to centiseconds, then whole seconds.
fn apng_delay(ms: u32) -> (u16, u16) {
    if let Ok(num) = u16::try_from(ms) {
        (num, 1000)
    } else if let Ok(num) = u16::try_from(ms / 10) {
        (num, 100)
    } else {
        (u16::try_from(ms / 1000).unwrap_or(u16::MAX), 1)
    }
}

fn encode_apng(frames: &[Frame]) -> Result<Vec<u8>, ConvertError> {
    let (width, height) = frames.first().ok_or(ConvertError::Empty)?.image.dimensions();
    let mut out = Vec::new();

    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    /* 0 plays loops forever */
    encoder.set_animated(frames.len() as u32, 0)?;

    let mut writer = encoder.write_header()?;
    for frame in frames {
        let (num, den) = apng_delay(frame.delay);
        writer.set_frame_delay(num, den)?;
        writer.write_image_data(frame.image.as_raw())?;
    }
    writer.finish()?;

    Ok(out)
}

fn encode_gif(frames: &[Frame]) -> Result<Vec<u8>, ConvertError> {
    let (width, height) = frames.first().ok_or(ConvertError::Empty)?.image.dimensions();
    let (Ok(gif_width), Ok(gif_height)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(ConvertError::Dimensions(width, height));
    };
    let mut out = Vec::new();

    let mut encoder = gif::Encoder::new(&mut out, gif_width, gif_height, &[])?;
    encoder.set_repeat(gif::Repeat::Infinite)?;
    for frame in frames {
        let mut pixels = frame.image.as_raw().clone();
        /* Every frame gets its own local palette */
        let mut gif_frame = gif::Frame::from_rgba_speed(gif_width, gif_height, &mut pixels, 10);
        gif_frame.delay = u16::try_from(frame.delay / 10).unwrap_or(u16::MAX);
        gif_frame.dispose = gif::DisposalMethod::Background;
        encoder.write_frame(&gif_frame)?;
    }
    encoder.into_inner()?;

    Ok(out)
}

/* Nothing shows up under `destination` unless the whole file was written */
fn persist(destination: &Path, data: &[u8]) -> Result<(), ConvertError> {
    let directory = destination
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = tempfile::NamedTempFile::new_in(directory)?;
    file.write_all(data)?;
    file.as_file().sync_all()?;
    file.persist(destination).map_err(|err| err.error)?;
    Ok(())
}

pub fn make_apng(
    destination: impl AsRef<Path>,
    data: &[u8],
    frames: &FrameMap,
) -> Result<(), ConvertError> {
    let destination = destination.as_ref();
    let decoded = decode_frames(data, frames)?;
    log::info!(
        target: "pixiv_ugoira::convert",
        "Encoding {} frames to APNG {}",
        decoded.len(),
        destination.display()
    );
    persist(destination, &encode_apng(&decoded)?)
}

pub fn make_gif(
    destination: impl AsRef<Path>,
    data: &[u8],
    frames: &FrameMap,
) -> Result<(), ConvertError> {
    let destination = destination.as_ref();
    let decoded = decode_frames(data, frames)?;
    log::info!(
        target: "pixiv_ugoira::convert",
        "Encoding {} frames to GIF {}",
        decoded.len(),
        destination.display()
    );
    persist(destination, &encode_gif(&decoded)?)
}

/// Writes the archive as downloaded. It is only checked to be a readable zip.
pub fn make_zip(destination: impl AsRef<Path>, data: &[u8]) -> Result<(), ConvertError> {
    let destination = destination.as_ref();
    let archive = open_archive(data)?;
    log::info!(
        target: "pixiv_ugoira::convert",
        "Writing {} member archive to {}",
        archive.len(),
        destination.display()
    );
    persist(destination, data)
}
