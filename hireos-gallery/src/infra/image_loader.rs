//! Card image loading
//!
//! Fetches an image over HTTP (or from disk), decodes it off the UI thread
//! and prepares a CPU-side mip chain ready for texture upload. There is no
//! retry: a failed card simply stays blank.

use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use image::RgbaImage;
use image::imageops::FilterType;
use reqwest::Client;

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageLoadError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server answered HTTP {0}")]
    Status(u16),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("read failed: {0}")]
    Io(String),
}

/// One level of the mip chain, tightly packed RGBA8.
#[derive(Debug, Clone)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decoded card image.
#[derive(Debug, Clone)]
pub struct CardImage {
    /// Unique per decode; the renderer keys its texture cache on it.
    pub id: u64,
    pub width: u32,
    pub height: u32,
    /// Level 0 is full resolution.
    pub levels: Vec<MipLevel>,
}

impl CardImage {
    /// Build from an already decoded RGBA image, generating mips down to 1x1.
    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut levels = Vec::new();
        let mut current = image;
        loop {
            let (w, h) = current.dimensions();
            let next = (w > 1 || h > 1).then(|| {
                image::imageops::resize(
                    &current,
                    (w / 2).max(1),
                    (h / 2).max(1),
                    FilterType::Triangle,
                )
            });
            levels.push(MipLevel {
                width: w,
                height: h,
                pixels: current.into_raw(),
            });
            match next {
                Some(smaller) => current = smaller,
                None => break,
            }
        }

        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            levels,
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ImageLoadError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| ImageLoadError::Decode(e.to_string()))?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

fn client() -> Result<&'static Client, ImageLoadError> {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    if let Some(client) = CLIENT.get() {
        return Ok(client);
    }
    let built = Client::builder()
        .pool_max_idle_per_host(4)
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| ImageLoadError::Request(e.to_string()))?;
    Ok(CLIENT.get_or_init(|| built))
}

enum Source {
    Remote(url::Url),
    Local(PathBuf),
}

fn classify(source: &str) -> Source {
    match url::Url::parse(source) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Source::Remote(url)
        }
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            Ok(path) => Source::Local(path),
            Err(()) => Source::Local(PathBuf::from(source)),
        },
        _ => Source::Local(PathBuf::from(source)),
    }
}

async fn fetch(source: &str) -> Result<Vec<u8>, ImageLoadError> {
    match classify(source) {
        Source::Remote(url) => {
            let response = client()?
                .get(url)
                .send()
                .await
                .map_err(|e| ImageLoadError::Request(e.to_string()))?;
            if !response.status().is_success() {
                return Err(ImageLoadError::Status(response.status().as_u16()));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ImageLoadError::Request(e.to_string()))?;
            Ok(bytes.to_vec())
        }
        Source::Local(path) => tokio::fs::read(&path).await.map_err(|e| {
            ImageLoadError::Io(format!("{}: {e}", path.display()))
        }),
    }
}

/// Fetch and decode `source` (an http(s) URL, `file://` URL or plain path).
pub async fn load(source: String) -> Result<CardImage, ImageLoadError> {
    let bytes = fetch(&source).await?;
    let image = tokio::task::spawn_blocking(move || CardImage::decode(&bytes))
        .await
        .map_err(|e| ImageLoadError::Decode(e.to_string()))??;
    log::debug!(
        "Loaded card image {source} ({}x{}, {} mips)",
        image.width,
        image.height,
        image.levels.len()
    );
    Ok(image)
}
