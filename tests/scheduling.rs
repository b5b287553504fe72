//! Schedule behavior observed through multiscale outputs.
//!
//! Every seed keeps at least its own spel, so the region count of each scale
//! equals that iteration's seed count exactly; multiscale outputs therefore
//! pin the realised Ni sequence.

use sicle::{Sicle, SicleOptions};

mod common;
use common::assertions::{assert_connected, assert_valid_partition};
use common::fixtures::{noise_image, small_options};

fn region_counts(scales: &[sicle::LabelImage]) -> Vec<usize> {
    scales.iter().map(|s| s.num_regions()).collect()
}

#[test]
fn geometric_schedule_shows_up_in_the_scales() {
    let engine = Sicle::new(noise_image(24, 24, 83), None, None).unwrap();
    let opts = SicleOptions {
        max_iters: 3,
        ..small_options(32, 4)
    };
    let scales = engine.run_multiscale(&opts).unwrap();

    // omega = 1/2: 32 -> round(32^(1/2)) = 6 -> 4
    assert_eq!(region_counts(&scales), vec![32, 6, 4]);
}

#[test]
fn schedules_decrease_strictly_and_end_at_nf() {
    let engine = Sicle::new(noise_image(24, 24, 89), None, None).unwrap();
    for (n0, nf, max_iters) in [(32, 4, 4), (50, 2, 5), (40, 39, 5)] {
        let opts = SicleOptions {
            max_iters,
            ..small_options(n0, nf)
        };
        let scales = engine.run_multiscale(&opts).unwrap();
        let counts = region_counts(&scales);

        assert_eq!(counts[0], n0, "first scale carries the oversampled count");
        assert_eq!(*counts.last().unwrap(), nf, "last scale carries nf");
        assert!(
            counts.windows(2).all(|w| w[0] > w[1]),
            "counts must decrease strictly: {counts:?}"
        );
    }
}

#[test]
fn user_schedules_appear_verbatim() {
    let engine = Sicle::new(noise_image(24, 24, 97), None, None).unwrap();
    let opts = SicleOptions {
        user_ni: Some(vec![20, 9]),
        ..small_options(32, 4)
    };
    let scales = engine.run_multiscale(&opts).unwrap();
    assert_eq!(region_counts(&scales), vec![32, 20, 9, 4]);
}

#[test]
fn every_scale_is_a_valid_partition() {
    let engine = Sicle::new(noise_image(24, 24, 101), None, None).unwrap();
    let opts = small_options(32, 4);
    let scales = engine.run_multiscale(&opts).unwrap();

    for (scale, labels) in scales.iter().enumerate() {
        assert_valid_partition(labels, None, 32);
        assert_connected(labels, true);
        assert!(
            labels.num_regions() >= 4,
            "scale {scale} dropped below nf regions"
        );
    }
}

#[test]
fn single_scale_run_matches_the_last_multiscale_entry() {
    let engine = Sicle::new(noise_image(24, 24, 103), None, None).unwrap();
    let opts = small_options(32, 4);

    let single = engine.run(&opts).unwrap();
    let scales = engine.run_multiscale(&opts).unwrap();
    assert_eq!(&single, scales.last().unwrap());
}
