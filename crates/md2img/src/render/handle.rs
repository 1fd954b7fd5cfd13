//! Render results and how they are saved

use std::fmt;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{Md2ImgError, Result};

/// Something that can be written to disk as a PNG
pub trait SavableImage: Send {
    fn save_png(&self, path: &Path) -> anyhow::Result<()>;
}

impl SavableImage for DynamicImage {
    fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        self.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

impl SavableImage for RgbaImage {
    fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        self.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// Raw value returned by a renderer
///
/// Renderers either return an image directly or a result object that carries
/// one. Implement whichever probe applies; both default to `None`.
pub trait RenderedImage: Send {
    /// The result itself can be saved
    fn as_savable(&self) -> Option<&dyn SavableImage> {
        None
    }

    /// The result wraps a savable image
    fn embedded_image(&self) -> Option<&dyn SavableImage> {
        None
    }
}

impl RenderedImage for DynamicImage {
    fn as_savable(&self) -> Option<&dyn SavableImage> {
        Some(self)
    }
}

impl RenderedImage for RgbaImage {
    fn as_savable(&self) -> Option<&dyn SavableImage> {
        Some(self)
    }
}

/// A render result whose save path has been resolved
pub enum ImageHandle {
    /// Saved through the result itself
    Direct(Box<dyn RenderedImage>),
    /// Saved through the image the result wraps
    Wrapped(Box<dyn RenderedImage>),
}

impl ImageHandle {
    /// Probe a render result once, preferring the direct interface
    pub fn resolve(output: Box<dyn RenderedImage>) -> Result<Self> {
        if output.as_savable().is_some() {
            Ok(Self::Direct(output))
        } else if output.embedded_image().is_some() {
            Ok(Self::Wrapped(output))
        } else {
            Err(Md2ImgError::SaveFailed(
                "render result exposes no savable image".to_string(),
            ))
        }
    }

    /// Write the image to `path` as PNG
    pub fn save(&self, path: &Path) -> Result<()> {
        let target = match self {
            Self::Direct(output) => output.as_savable(),
            Self::Wrapped(output) => output.embedded_image(),
        }
        .ok_or_else(|| Md2ImgError::SaveFailed("savable image disappeared".to_string()))?;

        target
            .save_png(path)
            .map_err(|e| Md2ImgError::SaveFailed(format!("{:#}", e)))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::Wrapped(_) => "wrapped",
        }
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ImageHandle").field(&self.kind()).finish()
    }
}
