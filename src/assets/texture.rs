use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use image::RgbaImage;
use tracing::{debug, error};
use wgpu::{Device, Queue, TextureFormat};

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("Failed to load image: {0}")]
    LoadFailed(#[from] image::ImageError),
    #[error("Cubemap face {face} is {found_width}x{found_height}, expected {expected}x{expected}")]
    FaceSize {
        face: usize,
        expected: u32,
        found_width: u32,
        found_height: u32,
    },
    #[error("Cubemap needs 6 faces, got {0}")]
    FaceCount(usize),
}

/// Six square RGBA faces in +x, -x, +y, -y, +z, -z order.
#[derive(Debug, Clone)]
pub struct CubeMapImages {
    size: u32,
    faces: Vec<RgbaImage>,
}

impl CubeMapImages {
    /// All faces must be square and share one size.
    pub fn from_faces(faces: Vec<RgbaImage>) -> Result<Self, TextureError> {
        if faces.len() != 6 {
            return Err(TextureError::FaceCount(faces.len()));
        }
        let size = faces[0].width();
        for (face, image) in faces.iter().enumerate() {
            if image.width() != size || image.height() != size {
                return Err(TextureError::FaceSize {
                    face,
                    expected: size,
                    found_width: image.width(),
                    found_height: image.height(),
                });
            }
        }
        Ok(Self { size, faces })
    }

    /// 1×1 faces of one colour.
    pub fn solid(rgba: [u8; 4]) -> Self {
        let faces = (0..6).map(|_| RgbaImage::from_pixel(1, 1, image::Rgba(rgba))).collect();
        Self { size: 1, faces }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn faces(&self) -> &[RgbaImage] {
        &self.faces
    }
}

pub struct CubeTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl CubeTexture {
    pub fn upload(device: &Device, queue: &Queue, images: &CubeMapImages, label: Option<&str>) -> Self {
        let size = wgpu::Extent3d {
            width: images.size(),
            height: images.size(),
            depth_or_array_layers: 6,
        };
        let texture = device.create_texture(
            &wgpu::TextureDescriptor {
                label,
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            }
        );

        for (layer, face) in images.faces().iter().enumerate() {
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d { x: 0, y: 0, z: layer as u32 },
                    aspect: wgpu::TextureAspect::All,
                },
                face.as_raw(),
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * images.size()),
                    rows_per_image: Some(images.size()),
                },
                wgpu::Extent3d { depth_or_array_layers: 1, ..size },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label,
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(
            &wgpu::SamplerDescriptor {
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::FilterMode::Nearest,
                ..Default::default()
            }
        );

        debug!("Uploaded {}x{} cubemap", images.size(), images.size());
        Self { texture, view, sampler }
    }
}

/// Shadow map target, sampled with a comparison sampler.
pub struct DepthTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl DepthTexture {
    pub const FORMAT: TextureFormat = TextureFormat::Depth32Float;

    pub fn new(device: &Device, size: u32, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width: size, height: size, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        Self { texture, view, sampler }
    }
}

/// Decodes one image file to RGBA.
pub struct ImageLoader;

#[async_trait]
impl super::manager::AssetLoader<RgbaImage> for ImageLoader {
    async fn load(&self, path: &Path) -> Result<RgbaImage> {
        match image::open(path) {
            Ok(img) => {
                debug!("Loaded image: {:?}", path);
                Ok(img.to_rgba8())
            },
            Err(e) => {
                error!("Failed to load image: {:?}, error: {}", path, e);
                Err(anyhow::anyhow!(TextureError::LoadFailed(e)))
            }
        }
    }
}

/// Loads six face images into a [`CubeMapImages`].
pub struct CubeMapLoader {
    images: ImageLoader,
}

impl CubeMapLoader {
    pub fn new() -> Self {
        Self { images: ImageLoader }
    }

    pub async fn load_faces<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Result<CubeMapImages> {
        use super::manager::AssetLoader;

        let mut faces = Vec::with_capacity(paths.len());
        for path in paths {
            faces.push(self.images.load(path.as_ref()).await?);
        }
        Ok(CubeMapImages::from_faces(faces)?)
    }
}

impl Default for CubeMapLoader {
    fn default() -> Self {
        Self::new()
    }
}
