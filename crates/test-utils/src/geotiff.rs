//! In-memory GeoTIFF encoding for loader tests.

use std::io::Cursor;

use tiff::encoder::colortype::{Gray32Float, GrayI16};
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

/// North-up placement of a raster: upper-left corner and square pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelGrid {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_size: f64,
}

impl PixelGrid {
    pub fn new(origin_x: f64, origin_y: f64, pixel_size: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_size,
        }
    }

    /// STAC `proj:transform` for this placement.
    pub fn proj_transform(&self) -> [f64; 6] {
        [
            self.pixel_size,
            0.0,
            self.origin_x,
            0.0,
            -self.pixel_size,
            self.origin_y,
        ]
    }

    fn scale_tag(&self) -> [f64; 3] {
        [self.pixel_size, self.pixel_size, 0.0]
    }

    fn tiepoint_tag(&self) -> [f64; 6] {
        [0.0, 0.0, 0.0, self.origin_x, self.origin_y, 0.0]
    }
}

/// Encode signed 16-bit samples as a single-band GeoTIFF.
///
/// Panics on encoder failure; test use only.
pub fn encode_geotiff_i16(width: u32, height: u32, data: &[i16], grid: PixelGrid) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buf)).expect("tiff encoder");
        let mut image = encoder
            .new_image::<GrayI16>(width, height)
            .expect("tiff image");
        image
            .encoder()
            .write_tag(Tag::ModelPixelScaleTag, &grid.scale_tag()[..])
            .expect("pixel scale tag");
        image
            .encoder()
            .write_tag(Tag::ModelTiepointTag, &grid.tiepoint_tag()[..])
            .expect("tiepoint tag");
        image.write_data(data).expect("image data");
    }
    buf
}

/// Encode 32-bit float samples as a single-band GeoTIFF.
pub fn encode_geotiff_f32(width: u32, height: u32, data: &[f32], grid: PixelGrid) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buf)).expect("tiff encoder");
        let mut image = encoder
            .new_image::<Gray32Float>(width, height)
            .expect("tiff image");
        image
            .encoder()
            .write_tag(Tag::ModelPixelScaleTag, &grid.scale_tag()[..])
            .expect("pixel scale tag");
        image
            .encoder()
            .write_tag(Tag::ModelTiepointTag, &grid.tiepoint_tag()[..])
            .expect("tiepoint tag");
        image.write_data(data).expect("image data");
    }
    buf
}
