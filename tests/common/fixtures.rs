//! Synthetic images, masks, and option sets for the integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sicle::{Domain, MultibandImage, SicleOptions};

/// Flat grayscale image of one value.
pub fn constant_image(width: usize, height: usize, value: f32) -> MultibandImage {
    let domain = Domain::new(width, height, 1);
    MultibandImage::grayscale(domain, vec![value; domain.len()]).unwrap()
}

/// Grayscale noise drawn from a seeded stream; values are continuous, so
/// cost ties are essentially impossible.
pub fn noise_image(width: usize, height: usize, stream_seed: u64) -> MultibandImage {
    let domain = Domain::new(width, height, 1);
    let mut rng = StdRng::seed_from_u64(stream_seed);
    let values = (0..domain.len()).map(|_| rng.gen_range(0.0..255.0)).collect();
    MultibandImage::grayscale(domain, values).unwrap()
}

/// Three-band noise, standing in for a colour image in L*a*b*.
pub fn colour_noise_image(width: usize, height: usize, stream_seed: u64) -> MultibandImage {
    let domain = Domain::new(width, height, 1);
    let mut rng = StdRng::seed_from_u64(stream_seed);
    let values = (0..domain.len() * 3)
        .map(|_| rng.gen_range(0.0..100.0))
        .collect();
    MultibandImage::new(domain, 3, values).unwrap()
}

/// Cubic grayscale noise volume.
pub fn noise_volume(side: usize, stream_seed: u64) -> MultibandImage {
    let domain = Domain::new(side, side, side);
    let mut rng = StdRng::seed_from_u64(stream_seed);
    let values = (0..domain.len()).map(|_| rng.gen_range(0.0..255.0)).collect();
    MultibandImage::grayscale(domain, values).unwrap()
}

/// Sharp vertical step: left half 0, right half 255.
pub fn vertical_edge_image(width: usize, height: usize) -> MultibandImage {
    let domain = Domain::new(width, height, 1);
    let values = (0..domain.len())
        .map(|v| if v % width < width / 2 { 0.0 } else { 255.0 })
        .collect();
    MultibandImage::grayscale(domain, values).unwrap()
}

/// Boolean mask selecting a centred `side` x `side` square.
pub fn centred_square_mask(width: usize, height: usize, side: usize) -> Vec<bool> {
    let (x0, y0) = ((width - side) / 2, (height - side) / 2);
    (0..width * height)
        .map(|v| {
            let (x, y) = (v % width, v / width);
            x >= x0 && x < x0 + side && y >= y0 && y < y0 + side
        })
        .collect()
}

/// Integer saliency map: 1 inside a centred `side` x `side` square, else 0.
pub fn centred_square_saliency(width: usize, height: usize, side: usize) -> Vec<u32> {
    centred_square_mask(width, height, side)
        .into_iter()
        .map(u32::from)
        .collect()
}

/// Options shrunk to test scale; everything else stays at the defaults.
pub fn small_options(n0: usize, nf: usize) -> SicleOptions {
    SicleOptions {
        n0,
        nf,
        ..SicleOptions::default()
    }
}
