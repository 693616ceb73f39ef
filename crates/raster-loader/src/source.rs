//! GeoTIFF decoding.

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use crate::error::{RasterLoadError, Result};
use crate::geotransform::GeoTransform;

/// A decoded single-band raster in its native grid.
#[derive(Debug, Clone)]
pub struct SourceRaster {
    pub width: usize,
    pub height: usize,
    /// Row-major samples of the first band.
    pub data: Vec<f32>,
    /// Georeferencing from the GeoTIFF tags, when present.
    pub tag_transform: Option<GeoTransform>,
}

impl SourceRaster {
    /// Sample at `(col, row)`, or `None` outside the raster.
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }
}

/// Decode the full-resolution image of a (Cloud Optimized) GeoTIFF.
///
/// Overviews stored as later IFDs are ignored. Multi-sample images keep only
/// the first sample of each pixel.
pub fn decode_geotiff(bytes: &[u8]) -> Result<SourceRaster> {
    let mut decoder = Decoder::new(Cursor::new(bytes))?;
    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let data = match decoder.read_image()? {
        DecodingResult::U8(buf) => to_f32(buf),
        DecodingResult::U16(buf) => to_f32(buf),
        DecodingResult::U32(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(buf) => to_f32(buf),
        DecodingResult::I16(buf) => to_f32(buf),
        DecodingResult::I32(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F32(buf) => buf,
        DecodingResult::F64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(RasterLoadError::UnsupportedDataType(
                "unrecognised TIFF sample format".to_string(),
            ))
        }
    };

    let pixels = width * height;
    let data = if data.len() == pixels {
        data
    } else if pixels > 0 && data.len() % pixels == 0 {
        let samples = data.len() / pixels;
        data.into_iter().step_by(samples).collect()
    } else {
        return Err(RasterLoadError::decode(format!(
            "expected {} samples for {}x{} image, got {}",
            pixels,
            width,
            height,
            data.len()
        )));
    };

    let tag_transform = read_tag_transform(&mut decoder);

    Ok(SourceRaster {
        width,
        height,
        data,
        tag_transform,
    })
}

fn to_f32<T: Into<f32>>(buf: Vec<T>) -> Vec<f32> {
    buf.into_iter().map(Into::into).collect()
}

fn read_tag_transform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag).ok()?;
    GeoTransform::from_tiepoint_and_scale(&tiepoint, &scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{create_test_grid, encode_geotiff_f32, encode_geotiff_i16, PixelGrid};

    #[test]
    fn test_decode_i16_with_tags() {
        let data: Vec<i16> = vec![5000, -3000, 1200, 7000, 0, 10000];
        let bytes = encode_geotiff_i16(3, 2, &data, PixelGrid::new(-1000.0, 500.0, 250.0));

        let raster = decode_geotiff(&bytes).unwrap();
        assert_eq!((raster.width, raster.height), (3, 2));
        assert_eq!(raster.get(1, 0), Some(-3000.0));
        assert_eq!(raster.get(2, 1), Some(10000.0));
        assert_eq!(raster.get(3, 0), None);
        assert_eq!(
            raster.tag_transform,
            Some(GeoTransform::north_up(-1000.0, 500.0, 250.0, 250.0))
        );
    }

    #[test]
    fn test_decode_f32() {
        let data = create_test_grid(4, 3);
        let bytes = encode_geotiff_f32(4, 3, &data, PixelGrid::new(0.0, 0.0, 1.0));
        let raster = decode_geotiff(&bytes).unwrap();
        assert_eq!(raster.data, data);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            decode_geotiff(b"definitely not a tiff"),
            Err(RasterLoadError::Decode(_))
        ));
    }
}
