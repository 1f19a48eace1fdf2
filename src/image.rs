use crate::error::Result;
use crate::refs::{ObjectReferences, RefType};
use image::{ColorType, DynamicImage};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::path::{Path, PathBuf};

pub enum RasterImageType {
    DirectlyEmbeddableJpeg(PathBuf),
    Image(DynamicImage),
}

/// A signature image loaded from disk, with its size in pixels
pub struct Image {
    pub image: RasterImageType,
    pub width: u32,
    pub height: u32,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Load a raster image. RGB JPEGs are kept as-is and embedded directly;
    /// anything else is decoded and re-encoded when the PDF is written.
    pub fn new_from_disk<P: AsRef<Path>>(path: P) -> Result<Image> {
        let path = path.as_ref();
        let is_tga = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("tga"))
            .unwrap_or(false);

        let data = std::fs::read(path)?;

        let format = if is_tga {
            image::ImageFormat::Tga
        } else {
            image::guess_format(&data)?
        };
        let image = image::load_from_memory_with_format(&data, format)?;

        match (format, image.color()) {
            (image::ImageFormat::Jpeg, ColorType::Rgb8) => Ok(Image {
                width: image.width(),
                height: image.height(),
                image: RasterImageType::DirectlyEmbeddableJpeg(path.to_owned()),
            }),
            _ => Ok(Image::new_raster(image)),
        }
    }

    pub fn new_raster(image: DynamicImage) -> Image {
        Image {
            width: image.width(),
            height: image.height(),
            image: RasterImageType::Image(image),
        }
    }

    fn encode(&self) -> Result<EncodeOutput> {
        match &self.image {
            RasterImageType::DirectlyEmbeddableJpeg(path) => {
                let bytes = std::fs::read(path)?;
                Ok(EncodeOutput {
                    filter: Filter::DctDecode,
                    bytes,
                    mask: None,
                })
            }
            RasterImageType::Image(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                // signatures are usually scanned ink on a transparent background
                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.to_rgba8().pixels().map(|p| p.0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

                Ok(EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes,
                    mask,
                })
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) -> Result<()> {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode()?;

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        // add a transparency mask if we have one
        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask.as_ref()) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }

        Ok(())
    }
}
