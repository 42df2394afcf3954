use image::{
    imageops::{self, FilterType},
    GrayImage,
};
use imageproc::{contrast, distance_transform::Norm, filter, morphology};

// Scan profile
//------------------------------------------------------------------------------

/// Preprocessing variant selected once per scanner.
///
/// Baseline hands the grayscale frame to the decoders unmodified; Enhanced
/// runs the low-resolution recovery stages and sweeps the general decoder
/// across a scale ladder. Clean input should use Baseline so the recovery
/// stages cannot distort it.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ScanProfile {
    Baseline,
    Enhanced,
}

impl ScanProfile {
    pub(crate) fn descriptor(self) -> &'static ProfileDescriptor {
        match self {
            Self::Baseline => &BASELINE,
            Self::Enhanced => &ENHANCED,
        }
    }

    /// Scale factors the general decoder sweeps on the working image.
    pub fn scale_ladder(self) -> &'static [f64] {
        self.descriptor().scale_ladder
    }
}

/// Ordered transform stages plus the scale ladder; both profiles run through
/// the same pipeline, only the descriptor differs.
pub(crate) struct ProfileDescriptor {
    pub stages: &'static [Stage],
    pub scale_ladder: &'static [f64],
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Stage {
    /// Smooth-interpolated upscale; contributes to the effective scale.
    Upscale { factor: f32 },
    /// Tiled, clip-limited local-contrast equalization.
    LocalContrast { tiles: u32, clip_limit: f32 },
    /// Edge-preserving median denoise.
    Denoise { radius: u32 },
    /// Unsharp mask: `out = in + amount * (in - blur(in, sigma))`.
    Unsharp { amount: f32, sigma: f32 },
    /// Adaptive local-mean threshold to binary.
    Threshold { block_radius: u32 },
    /// Morphological closing to remove speckle.
    Close { k: u8 },
}

static BASELINE: ProfileDescriptor = ProfileDescriptor { stages: &[], scale_ladder: &[1.0] };

static ENHANCED: ProfileDescriptor = ProfileDescriptor {
    stages: &[
        Stage::Upscale { factor: 2.0 },
        Stage::LocalContrast { tiles: 8, clip_limit: 3.0 },
        Stage::Denoise { radius: 1 },
        Stage::Unsharp { amount: 0.7, sigma: 3.0 },
        Stage::Threshold { block_radius: 10 },
        Stage::Close { k: 1 },
    ],
    scale_ladder: &[1.0, 1.5, 2.0],
};

// Pipeline
//------------------------------------------------------------------------------

/// Runs the profile's stages over a copy of the frame. Returns the working
/// image and the cumulative scale it applied relative to the input, so hits
/// can be mapped back into original-image coordinates.
pub(crate) fn run(profile: ScanProfile, gray: &GrayImage) -> (GrayImage, f64) {
    let mut working = gray.clone();
    let mut applied = 1.0f64;

    for stage in profile.descriptor().stages {
        working = match *stage {
            Stage::Upscale { factor } => {
                applied *= f64::from(factor);
                let w = ((working.width() as f32) * factor).round().max(1.0) as u32;
                let h = ((working.height() as f32) * factor).round().max(1.0) as u32;
                imageops::resize(&working, w, h, FilterType::CatmullRom)
            }
            Stage::LocalContrast { tiles, clip_limit } => {
                equalize_local_contrast(&working, tiles, clip_limit)
            }
            Stage::Denoise { radius } => filter::median_filter(&working, radius, radius),
            Stage::Unsharp { amount, sigma } => unsharp_mask(&working, amount, sigma),
            Stage::Threshold { block_radius } => contrast::adaptive_threshold(&working, block_radius),
            Stage::Close { k } => morphology::close(&working, Norm::LInf, k),
        };
    }

    (working, applied)
}

/// Rescales a working image by a ladder factor (linear interpolation).
pub(crate) fn rescale(img: &GrayImage, factor: f64) -> GrayImage {
    if (factor - 1.0).abs() < f64::EPSILON {
        return img.clone();
    }
    let w = ((img.width() as f64) * factor).round().max(1.0) as u32;
    let h = ((img.height() as f64) * factor).round().max(1.0) as u32;
    imageops::resize(img, w, h, FilterType::Triangle)
}

/// Bit-inverted copy for the color-inversion pass.
pub(crate) fn invert(img: &GrayImage) -> GrayImage {
    let mut out = img.clone();
    imageops::invert(&mut out);
    out
}

// Local contrast equalization
//------------------------------------------------------------------------------
// Tile grid over the image, one clipped-histogram LUT per tile, bilinear
// blending between the four surrounding tile mappings per pixel. The clip
// limit is relative to a flat histogram, OpenCV-style.

fn equalize_local_contrast(img: &GrayImage, tiles: u32, clip_limit: f32) -> GrayImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }

    let tiles = tiles.clamp(1, w.min(h).max(1));
    let tile_w = w.div_ceil(tiles).max(1);
    let tile_h = h.div_ceil(tiles).max(1);
    let cols = w.div_ceil(tile_w);
    let rows = h.div_ceil(tile_h);

    let mut luts = vec![[0u8; 256]; (cols * rows) as usize];
    for row in 0..rows {
        for col in 0..cols {
            let x0 = col * tile_w;
            let y0 = row * tile_h;
            let x1 = (x0 + tile_w).min(w);
            let y1 = (y0 + tile_h).min(h);

            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[img.get_pixel(x, y)[0] as usize] += 1;
                }
            }
            let count = (x1 - x0) * (y1 - y0);

            let limit = ((clip_limit * count as f32 / 256.0).max(1.0)) as u32;
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > limit {
                    excess += *bin - limit;
                    *bin = limit;
                }
            }
            let bonus = excess / 256;

            let lut = &mut luts[(row * cols + col) as usize];
            let mut cdf = 0u32;
            for (value, bin) in hist.iter().enumerate() {
                cdf += bin + bonus;
                lut[value] = ((cdf as f32 * 255.0 / count as f32).round()).min(255.0) as u8;
            }
        }
    }

    let mut out = GrayImage::new(w, h);
    let max_col = (cols - 1) as f32;
    let max_row = (rows - 1) as f32;
    for y in 0..h {
        let fy = (((y as f32 + 0.5) / tile_h as f32) - 0.5).clamp(0.0, max_row);
        let row0 = fy.floor() as u32;
        let row1 = (row0 + 1).min(rows - 1);
        let wy = fy - fy.floor();

        for x in 0..w {
            let fx = (((x as f32 + 0.5) / tile_w as f32) - 0.5).clamp(0.0, max_col);
            let col0 = fx.floor() as u32;
            let col1 = (col0 + 1).min(cols - 1);
            let wx = fx - fx.floor();

            let v = img.get_pixel(x, y)[0] as usize;
            let tl = luts[(row0 * cols + col0) as usize][v] as f32;
            let tr = luts[(row0 * cols + col1) as usize][v] as f32;
            let bl = luts[(row1 * cols + col0) as usize][v] as f32;
            let br = luts[(row1 * cols + col1) as usize][v] as f32;

            let top = tl + (tr - tl) * wx;
            let bottom = bl + (br - bl) * wx;
            let blended = top + (bottom - top) * wy;
            out.put_pixel(x, y, image::Luma([blended.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}

// Unsharp mask
//------------------------------------------------------------------------------

fn unsharp_mask(img: &GrayImage, amount: f32, sigma: f32) -> GrayImage {
    let blurred = filter::gaussian_blur_f32(img, sigma);
    let mut out = GrayImage::new(img.width(), img.height());
    for (dst, (src, blur)) in out.pixels_mut().zip(img.pixels().zip(blurred.pixels())) {
        let sharpened = src[0] as f32 + amount * (src[0] as f32 - blur[0] as f32);
        dst[0] = sharpened.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
mod preprocess_tests {
    use image::{GrayImage, Luma};

    use super::*;

    fn gradient(w: u32, h: u32, lo: u8, hi: u8) -> GrayImage {
        GrayImage::from_fn(w, h, |x, _| {
            let t = x as f32 / (w - 1).max(1) as f32;
            Luma([(lo as f32 + t * (hi - lo) as f32) as u8])
        })
    }

    #[test]
    fn test_baseline_is_identity() {
        let img = gradient(64, 48, 90, 170);
        let (working, applied) = run(ScanProfile::Baseline, &img);
        assert_eq!(applied, 1.0);
        assert_eq!(working, img);
    }

    #[test]
    fn test_enhanced_doubles_dimensions_and_reports_scale() {
        let img = gradient(64, 48, 90, 170);
        let (working, applied) = run(ScanProfile::Enhanced, &img);
        assert_eq!(applied, 2.0);
        assert_eq!(working.dimensions(), (128, 96));
    }

    #[test]
    fn test_enhanced_output_is_binary() {
        let img = gradient(64, 64, 80, 180);
        let (working, _) = run(ScanProfile::Enhanced, &img);
        assert!(working.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_local_contrast_widens_dynamic_range() {
        let img = gradient(64, 64, 110, 140);
        let out = equalize_local_contrast(&img, 8, 3.0);
        assert_eq!(out.dimensions(), img.dimensions());

        let range = |i: &GrayImage| {
            let (mut lo, mut hi) = (255u8, 0u8);
            for p in i.pixels() {
                lo = lo.min(p[0]);
                hi = hi.max(p[0]);
            }
            hi - lo
        };
        assert!(range(&out) > range(&img));
    }

    #[test]
    fn test_unsharp_overshoots_at_step_edge() {
        let img = GrayImage::from_fn(32, 8, |x, _| Luma([if x < 16 { 60 } else { 190 }]));
        let out = unsharp_mask(&img, 0.7, 3.0);
        // Sharpening pushes the dark side darker and the bright side brighter
        // right at the edge.
        assert!(out.get_pixel(15, 4)[0] < 60);
        assert!(out.get_pixel(16, 4)[0] > 190);
    }

    #[test]
    fn test_rescale_factors() {
        let img = gradient(40, 20, 0, 255);
        assert_eq!(rescale(&img, 1.0).dimensions(), (40, 20));
        assert_eq!(rescale(&img, 1.5).dimensions(), (60, 30));
        assert_eq!(rescale(&img, 2.0).dimensions(), (80, 40));
    }

    #[test]
    fn test_invert_is_involution() {
        let img = gradient(16, 16, 10, 245);
        assert_eq!(invert(&invert(&img)), img);
        assert_eq!(invert(&img).get_pixel(0, 0)[0], 255 - img.get_pixel(0, 0)[0]);
    }
}
