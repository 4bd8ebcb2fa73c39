//! Screen-space edge detection on rasters handed back by the renderer
//! (depth, luminance or n·v buffers)

use ndarray::{Array2, ArrayView2};

#[inline]
fn clamped(image: &ArrayView2<f32>, r: isize, c: isize) -> f32 {
    let (rows, cols) = image.dim();
    let r = r.clamp(0, rows as isize - 1) as usize;
    let c = c.clamp(0, cols as isize - 1) as usize;
    image[[r, c]]
}

/// Gradient magnitude under the 3×3 Sobel operator, borders clamped
pub fn sobel_magnitude(image: ArrayView2<f32>) -> Array2<f32> {
    const GX: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
    const GY: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

    if image.is_empty() {
        return Array2::zeros(image.dim());
    }
    Array2::from_shape_fn(image.dim(), |(r, c)| {
        let (mut gx, mut gy) = (0.0f32, 0.0f32);
        for (i, dr) in (-1isize..=1).enumerate() {
            for (j, dc) in (-1isize..=1).enumerate() {
                let v = clamped(&image, r as isize + dr, c as isize + dc);
                gx += GX[i][j] * v;
                gy += GY[i][j] * v;
            }
        }
        (gx * gx + gy * gy).sqrt()
    })
}

/// Largest absolute difference between each pixel and any sample within
/// `radius` pixels of it, borders clamped
pub fn radial_filter(image: ArrayView2<f32>, radius: usize) -> Array2<f32> {
    if image.is_empty() || radius == 0 {
        return Array2::zeros(image.dim());
    }
    let r = radius as isize;
    let offsets: Vec<(isize, isize)> = (-r..=r)
        .flat_map(|dr| (-r..=r).map(move |dc| (dr, dc)))
        .filter(|(dr, dc)| dr * dr + dc * dc <= r * r && (*dr, *dc) != (0, 0))
        .collect();

    Array2::from_shape_fn(image.dim(), |(row, col)| {
        let center = image[[row, col]];
        offsets
            .iter()
            .map(|(dr, dc)| (clamped(&image, row as isize + dr, col as isize + dc) - center).abs())
            .fold(0.0f32, f32::max)
    })
}

/// Mask of pixels whose response exceeds `threshold`
pub fn threshold_edges(image: ArrayView2<f32>, threshold: f32) -> Array2<bool> {
    image.mapv(|v| v > threshold)
}
