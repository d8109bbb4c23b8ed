//! Texture loading and GPU upload
//!
//! Atlases are decoded with `image` and flipped vertically at load so that
//! v = 0 addresses the bottom row of an atlas everywhere in the pipeline.
//! Sampling is nearest-neighbor; these are pixel-art sheets.

use image::GenericImageView;
use std::path::Path;

/// A GPU texture with its view and sampler
#[derive(Debug)]
pub struct Texture {
    /// The GPU texture
    pub texture: wgpu::Texture,
    /// Texture view for binding into the slot array
    pub view: wgpu::TextureView,
    /// Texture dimensions
    pub size: wgpu::Extent3d,
}

impl Texture {
    /// Load a texture from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| TextureError::IoError(e.to_string()))?;
        Self::from_bytes(device, queue, &bytes, label)
    }

    /// Load a texture from raw bytes (PNG, JPEG)
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be decoded as an image
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        let img =
            image::load_from_memory(bytes).map_err(|e| TextureError::DecodeError(e.to_string()))?;
        let dimensions = img.dimensions();
        // v = 0 is the bottom row; image files store the top row first
        let rgba = img.flipv().to_rgba8();
        Ok(Self::from_rgba(device, queue, &rgba, dimensions, label))
    }

    /// Create a texture from raw RGBA data, already bottom-up
    #[must_use]
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        dimensions: (u32, u32),
        label: Option<&str>,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let size = wgpu::Extent3d {
            width: dimensions.0.max(1),
            height: dimensions.1.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label,
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            size,
        }
    }

    /// Upload a single-channel coverage bitmap as a white texture with the
    /// coverage in the alpha channel (glyph rasterization output)
    #[must_use]
    pub fn from_coverage(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        coverage: &[u8],
        dimensions: (u32, u32),
        label: Option<&str>,
    ) -> Self {
        let mut rgba = Vec::with_capacity(coverage.len() * 4);
        // Glyph bitmaps arrive top-down; flip rows to match the atlas
        // orientation
        let (width, height) = (dimensions.0 as usize, dimensions.1.max(1) as usize);
        for row in (0..height).rev() {
            for col in 0..width {
                let alpha = coverage[row * width + col];
                rgba.extend_from_slice(&[255, 255, 255, alpha]);
            }
        }
        Self::from_rgba(device, queue, &rgba, dimensions, label)
    }

    /// Create a 1x1 white texture, bound to slot zero as the untextured
    /// fallback
    #[must_use]
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::from_rgba(
            device,
            queue,
            &[255, 255, 255, 255],
            (1, 1),
            Some("white_texture"),
        )
    }

    /// Get texture width
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width
    }

    /// Get texture height
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height
    }

    /// The nearest-neighbor sampler shared by every atlas
    pub fn atlas_sampler(device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("atlas_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        })
    }
}

/// Errors that can occur during texture loading
#[derive(Debug, Clone)]
pub enum TextureError {
    /// IO error reading file
    IoError(String),
    /// Error decoding image data
    DecodeError(String),
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
        }
    }
}

impl std::error::Error for TextureError {}
