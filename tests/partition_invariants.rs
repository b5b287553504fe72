//! Partition invariants over representative input families.
//!
//! For every successful run: eligible spels carry dense labels in [1, K]
//! with K bounded by the final seed count, excluded spels carry 0, and each
//! region is connected under the adjacency the run used.

use sicle::{Connectivity, Sampling, Sicle, SicleOptions};

mod common;
use common::assertions::{assert_connected, assert_valid_partition, region_sizes};
use common::fixtures::{
    centred_square_mask, colour_noise_image, constant_image, noise_image, noise_volume,
    small_options,
};

#[test]
fn grayscale_noise_partitions_cleanly() {
    let engine = Sicle::new(noise_image(24, 24, 3), None, None).unwrap();
    let labels = engine.run(&small_options(40, 6)).unwrap();

    assert_eq!(labels.num_regions(), 6, "every surviving seed keeps a region");
    assert_valid_partition(&labels, None, 6);
    assert_connected(&labels, true);
    assert_eq!(region_sizes(&labels).iter().sum::<usize>(), 24 * 24);
}

#[test]
fn colour_noise_partitions_cleanly() {
    let engine = Sicle::new(colour_noise_image(20, 20, 5), None, None).unwrap();
    let labels = engine.run(&small_options(30, 5)).unwrap();

    assert_valid_partition(&labels, None, 5);
    assert_connected(&labels, true);
}

#[test]
fn four_adjacency_partitions_stay_connected() {
    let engine = Sicle::new(noise_image(24, 24, 7), None, None).unwrap();
    let opts = SicleOptions {
        use_diag: false,
        ..small_options(40, 6)
    };
    let labels = engine.run(&opts).unwrap();

    assert_valid_partition(&labels, None, 6);
    assert_connected(&labels, false);
}

#[test]
fn fsum_partitions_cleanly() {
    let engine = Sicle::new(noise_image(24, 24, 11), None, None).unwrap();
    let opts = SicleOptions {
        connectivity: Connectivity::Fsum,
        ..small_options(40, 6)
    };
    let labels = engine.run(&opts).unwrap();

    assert_valid_partition(&labels, None, 6);
    assert_connected(&labels, true);
}

#[test]
fn volumes_partition_under_both_adjacencies() {
    for use_diag in [true, false] {
        let engine = Sicle::new(noise_volume(8, 13), None, None).unwrap();
        let opts = SicleOptions {
            use_diag,
            ..small_options(40, 8)
        };
        let labels = engine.run(&opts).unwrap();

        assert_eq!(labels.num_regions(), 8);
        assert_valid_partition(&labels, None, 8);
        assert_connected(&labels, use_diag);
    }
}

#[test]
fn roi_spels_get_labels_and_the_rest_stay_zero() {
    let mask = centred_square_mask(16, 16, 8);
    let engine = Sicle::new(noise_image(16, 16, 17), None, Some(&mask)).unwrap();
    let labels = engine.run(&small_options(12, 3)).unwrap();

    assert_eq!(labels.num_regions(), 3);
    assert_valid_partition(&labels, Some(&mask), 3);
    assert_connected(&labels, true);
}

#[test]
fn grid_sampling_partitions_a_constant_image() {
    let engine = Sicle::new(constant_image(16, 16, 128.0), None, None).unwrap();
    let opts = SicleOptions {
        sampling: Sampling::Grid,
        ..small_options(9, 4)
    };
    let labels = engine.run(&opts).unwrap();

    assert_eq!(labels.num_regions(), 4);
    assert_valid_partition(&labels, None, 4);
    assert_connected(&labels, true);
}

#[test]
fn sequential_only_runs_satisfy_the_same_invariants() {
    let engine = Sicle::new(noise_image(24, 24, 19), None, None).unwrap();
    let opts = SicleOptions {
        use_dift: false,
        ..small_options(40, 6)
    };
    let labels = engine.run(&opts).unwrap();

    assert_valid_partition(&labels, None, 6);
    assert_connected(&labels, true);
}

#[test]
fn seed_image_marks_exactly_the_survivors() {
    let engine = Sicle::new(noise_image(24, 24, 23), None, None).unwrap();
    let (labels, seed_image) = engine.run_with_seed_image(&small_options(40, 6)).unwrap();

    let marked: Vec<usize> = seed_image
        .labels()
        .iter()
        .enumerate()
        .filter(|(_, &l)| l > 0)
        .map(|(v, _)| v)
        .collect();
    assert_eq!(marked.len(), 6, "one marker per surviving seed");
    for v in marked {
        // a seed carries its own region's label
        assert_eq!(seed_image.label(v), labels.label(v));
    }
}
