use std::path::Path;

use anyhow::Context as _;
use image::{ImageBuffer, Luma};

use crate::{error::OrogenResult, map::HeightMap, math};

pub type Gray16Image = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Render the map as 16-bit grayscale; `[0, 1]` (clamped) maps onto the full
/// luminance range.
pub fn to_gray16(map: &HeightMap) -> Gray16Image {
    ImageBuffer::from_fn(map.width() as u32, map.height() as u32, |x, y| {
        let v = math::clamp01(map.value_or(y as usize, x as usize, 0.0));
        Luma([math::normalize_to(v, 0.0, 1.0, 0.0, f64::from(u16::MAX)).round() as u16])
    })
}

#[tracing::instrument(skip(map), fields(height = map.height(), width = map.width()))]
pub fn save_png(map: &HeightMap, path: &Path) -> OrogenResult<()> {
    let image = to_gray16(map);
    image
        .save(path)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
