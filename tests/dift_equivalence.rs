//! Differential recomputation must be observationally equivalent to running
//! a fresh sequential IFT over the same surviving seed sets.
//!
//! Both runs share the sampler stream, so the seed evolution matches as long
//! as each pass settles on the same forest; noise inputs keep path costs
//! distinct, which pins the optimum uniquely.

use sicle::{Connectivity, Sicle, SicleOptions};

mod common;
use common::fixtures::{
    centred_square_mask, colour_noise_image, noise_image, noise_volume, small_options,
};

fn assert_dift_equals_sequential(engine: &Sicle, base: &SicleOptions) {
    let dift = SicleOptions {
        use_dift: true,
        ..base.clone()
    };
    let sequential = SicleOptions {
        use_dift: false,
        ..base.clone()
    };
    let with = engine.run(&dift).unwrap();
    let without = engine.run(&sequential).unwrap();
    assert_eq!(
        with, without,
        "differential and sequential runs settled on different labelings"
    );
}

#[test]
fn equivalence_on_grayscale_noise() {
    let engine = Sicle::new(noise_image(24, 24, 31), None, None).unwrap();
    assert_dift_equals_sequential(&engine, &small_options(30, 5));
}

#[test]
fn equivalence_on_colour_noise() {
    let engine = Sicle::new(colour_noise_image(20, 20, 37), None, None).unwrap();
    assert_dift_equals_sequential(&engine, &small_options(25, 4));
}

#[test]
fn equivalence_under_fsum() {
    let engine = Sicle::new(noise_image(24, 24, 41), None, None).unwrap();
    let base = SicleOptions {
        connectivity: Connectivity::Fsum,
        ..small_options(30, 5)
    };
    assert_dift_equals_sequential(&engine, &base);
}

#[test]
fn equivalence_on_a_volume() {
    let engine = Sicle::new(noise_volume(8, 43), None, None).unwrap();
    assert_dift_equals_sequential(&engine, &small_options(40, 8));
}

#[test]
fn equivalence_with_a_region_of_interest() {
    let mask = centred_square_mask(20, 20, 12);
    let engine = Sicle::new(noise_image(20, 20, 47), None, Some(&mask)).unwrap();
    assert_dift_equals_sequential(&engine, &small_options(20, 4));
}

#[test]
fn equivalence_across_a_longer_schedule() {
    let engine = Sicle::new(noise_image(24, 24, 53), None, None).unwrap();
    let base = SicleOptions {
        max_iters: 7,
        ..small_options(60, 4)
    };
    assert_dift_equals_sequential(&engine, &base);
}
