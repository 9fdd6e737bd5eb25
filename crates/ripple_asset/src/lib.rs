//! Ripple Asset Loading
//!
//! Boundary-condition masks: decoded from an image on a loader thread, or
//! generated when no image is shipped.

use ripple_core::MaskImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to decode mask image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("mask image {path} decoded to {len} texels, expected {resolution}x{resolution}")]
    Size {
        path: PathBuf,
        len: usize,
        resolution: u32,
    },

    #[error("mask loader thread exited without a result")]
    LoaderGone,

    #[error("failed to spawn mask loader: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Where a mask came from, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskSource {
    File(PathBuf),
    Procedural,
}

/// Decode `path` into a `resolution`-sized mask, or build the procedural mask
/// if the file does not exist.
pub fn load_mask(path: &Path, resolution: u32) -> Result<(MaskImage, MaskSource), AssetError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "mask image not found, using procedural mask");
        return Ok((procedural_mask(resolution), MaskSource::Procedural));
    }

    let decoded = image::open(path).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let luma = if decoded.width() == resolution && decoded.height() == resolution {
        decoded.to_luma8()
    } else {
        tracing::debug!(
            width = decoded.width(),
            height = decoded.height(),
            resolution,
            "resizing mask image to grid"
        );
        decoded
            .resize_exact(resolution, resolution, image::imageops::FilterType::Triangle)
            .to_luma8()
    };

    let texels = luma.into_raw();
    let len = texels.len();
    let mask = MaskImage::new(resolution, texels).ok_or_else(|| AssetError::Size {
        path: path.to_path_buf(),
        len,
        resolution,
    })?;
    Ok((mask, MaskSource::File(path.to_path_buf())))
}

/// Rigid walls on the grid border plus a breakwater with two openings.
pub fn procedural_mask(resolution: u32) -> MaskImage {
    let res = resolution as f32;
    let border = (resolution / 128).max(2);
    let wall_top = (res * 0.35) as u32;
    let wall_bottom = wall_top + (resolution / 128).max(2) * 2;
    let gap = (res * 0.025).max(2.0);
    let gaps = [res * 0.42, res * 0.58];

    MaskImage::from_fn(resolution, |col, row| {
        let on_border = col < border || row < border || col >= resolution - border;
        let in_breakwater = (wall_top..wall_bottom).contains(&row)
            && gaps.iter().all(|&g| (col as f32 + 0.5 - g).abs() > gap);
        on_border || in_breakwater
    })
}

/// Mask decode running off the event-loop thread.
pub struct MaskLoader {
    receiver: Receiver<Result<(MaskImage, MaskSource), AssetError>>,
}

impl MaskLoader {
    pub fn spawn(path: PathBuf, resolution: u32) -> Result<Self, AssetError> {
        let (sender, receiver) = mpsc::channel();
        thread::Builder::new()
            .name("mask-loader".to_string())
            .spawn(move || {
                // receiver gone means the app quit while loading
                let _ = sender.send(load_mask(&path, resolution));
            })?;
        Ok(Self { receiver })
    }

    /// `None` while the load is still running.
    pub fn poll(&self) -> Option<Result<(MaskImage, MaskSource), AssetError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(AssetError::LoaderGone)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back() {
        let (mask, source) = load_mask(Path::new("/no/such/mask.png"), 64).unwrap();
        assert_eq!(source, MaskSource::Procedural);
        assert_eq!(mask.resolution(), 64);
    }

    #[test]
    fn procedural_has_border_and_openings() {
        let mask = procedural_mask(128);
        assert!(mask.is_wall(0, 64));
        assert!(mask.is_wall(127, 64));
        assert!(mask.is_wall(64, 0));
        assert!(!mask.is_wall(64, 100));

        let row = (128.0 * 0.35) as u32 + 1;
        assert!(mask.is_wall(20, row));
        // center of each opening
        assert!(!mask.is_wall((128.0 * 0.42) as u32, row));
        assert!(!mask.is_wall((128.0 * 0.58) as u32, row));
    }

    #[test]
    fn decodes_and_resizes_png() {
        let dir = std::env::temp_dir().join(format!("ripple-mask-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("mask.png");

        let mut img = image::GrayImage::new(32, 32);
        for y in 0..4 {
            for x in 0..32 {
                img.put_pixel(x, y, image::Luma([255]));
            }
        }
        img.save(&path).unwrap();

        let (mask, source) = load_mask(&path, 16).unwrap();
        assert_eq!(source, MaskSource::File(path.clone()));
        assert_eq!(mask.resolution(), 16);
        assert!(mask.wall_count() > 0);
        assert!(!mask.is_wall(8, 15));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn loader_thread_delivers() {
        let loader = MaskLoader::spawn(PathBuf::from("/no/such/mask.png"), 32).unwrap();
        let loaded = loop {
            if let Some(result) = loader.poll() {
                break result;
            }
            thread::sleep(std::time::Duration::from_millis(1));
        };
        let (mask, _) = loaded.unwrap();
        assert_eq!(mask.resolution(), 32);
    }
}
