use crate::client::Client;
use crate::error::{DownloadError, Result};
pub use crate::{log_debug, log_error, log_info};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::PathBuf;

/// Fetches candidate image URLs one at a time, normalizes each to JPEG,
/// and writes `<prefix>_<N>.jpg` into the destination folder.
pub struct Downloader {
    client: Client,
    folder: PathBuf,
    prefix: String,
    saved: usize,
}

impl Downloader {
    pub fn new(client: Client, folder: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            folder: folder.into(),
            prefix: prefix.into(),
            saved: 0,
        }
    }

    /// Process every candidate sequentially. Per-item failures are logged
    /// and skipped; the loop never aborts. Returns the number of images
    /// saved.
    pub async fn run(&mut self, candidates: &[String]) -> usize {
        for url in candidates {
            match self.download_one(url).await {
                Ok(path) => log_info!("[download] Downloaded and saved: {:?}", path),
                Err(e) => log_error!(e => "[download] Skipping image"),
            }
        }
        self.saved
    }

    async fn download_one(&mut self, url: &str) -> Result<PathBuf> {
        log_debug!("[download] Fetching {}", url);

        let response = self
            .client
            .get_bytes(url)
            .await
            .map_err(|e| DownloadError::Fetch(format!("{}: {}", url, e)))?;

        log_debug!(
            "[download] {} returned {} ({} bytes)",
            url,
            response.status,
            response.bytes.len()
        );

        self.save_candidate(&response.bytes)
    }

    /// Decode, re-encode as JPEG, and write to disk. The file is written
    /// only after a successful decode and encode, so a failed candidate
    /// never leaves a partial file. The running counter advances only on a
    /// successful write, keeping filenames contiguous.
    fn save_candidate(&mut self, bytes: &[u8]) -> Result<PathBuf> {
        let img = image::load_from_memory(bytes).map_err(DownloadError::Decode)?;

        // JPEG has no alpha channel; flatten to RGB before encoding.
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

        let mut buf = Cursor::new(Vec::new());
        rgb.write_to(&mut buf, ImageFormat::Jpeg)
            .map_err(DownloadError::Decode)?;

        let path = self
            .folder
            .join(format!("{}_{}.jpg", self.prefix, self.saved + 1));
        std::fs::write(&path, buf.get_ref()).map_err(DownloadError::Write)?;

        self.saved += 1;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn downloader(folder: &std::path::Path) -> Downloader {
        let client = Client::builder().build().unwrap();
        Downloader::new(client, folder, "pin")
    }

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            2,
            2,
            image::Rgba([200, 10, 10, 255]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn failed_decode_does_not_consume_a_number() {
        let dir = tempfile::tempdir().unwrap();
        let mut downloader = downloader(dir.path());

        assert!(downloader.save_candidate(&png_bytes()).is_ok());
        assert!(downloader.save_candidate(b"definitely not an image").is_err());
        assert!(downloader.save_candidate(&png_bytes()).is_ok());

        assert_eq!(downloader.saved, 2);
        assert!(dir.path().join("pin_1.jpg").is_file());
        assert!(dir.path().join("pin_2.jpg").is_file());
        assert!(!dir.path().join("pin_3.jpg").exists());
    }

    #[test]
    fn png_source_is_reencoded_as_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let mut downloader = downloader(dir.path());

        let path = downloader.save_candidate(&png_bytes()).unwrap();
        let written = std::fs::read(&path).unwrap();
        assert_eq!(
            image::guess_format(&written).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn failed_decode_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut downloader = downloader(dir.path());

        assert!(downloader.save_candidate(b"garbage").is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn custom_prefix_is_used_in_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let client = Client::builder().build().unwrap();
        let mut downloader = Downloader::new(client, dir.path(), "img");

        downloader.save_candidate(&png_bytes()).unwrap();
        assert!(dir.path().join("img_1.jpg").is_file());
    }
}
