//! The iteration driver: schedule construction, the oversample → IFT →
//! rank → remove loop, and label materialisation.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, debug_span};

use super::{LabelImage, Sicle, SicleOptions};
use crate::conn::CostParams;
use crate::error::{Result, SicleError};
use crate::forest::Forest;
use crate::graph::Adjacency;
use crate::ift::{run_differential, run_sequential, IftContext};
use crate::image::in_roi;
use crate::relevance::{seed_relevance, select_survivors};
use crate::sampling::oversample;
use crate::stats::TreeStats;

/// Everything a run materialises: one label image per schedule entry (or
/// only the final one) and the sparse image of the surviving seeds.
pub(crate) struct RunOutput {
    pub scales: Vec<LabelImage>,
    pub seed_image: LabelImage,
}

/// Build the strictly decreasing Ni sequence, from the *realised* seed count
/// down to nf.
///
/// Without a user schedule the interior counts follow the geometric law
/// `N0^(1 - omega * i)` (rounded) with `omega = 1/(max_iters - 1)`; the
/// iteration count is the smallest one that reaches nf. Interior values are
/// clamped to nf and plateaus collapsed, so the result is strictly
/// decreasing whatever rounding produced.
pub(crate) fn build_schedule(
    real_n0: usize,
    nf: usize,
    max_iters: usize,
    user_ni: Option<&[usize]>,
) -> Result<Vec<usize>> {
    if real_n0 <= nf {
        return Err(SicleError::DegenerateSampling {
            sampled: real_n0,
            nf,
        });
    }

    let raw: Vec<usize> = match user_ni {
        Some(user) => std::iter::once(real_n0)
            .chain(user.iter().copied())
            .chain(std::iter::once(nf))
            .collect(),
        None => {
            let omega = 1.0 / (max_iters as f64 - 1.0);
            let n0 = real_n0 as f64;
            let approx = (n0 / nf as f64).ln() / n0.powf(omega).ln();
            let num_iters = approx.ceil() as usize + 1;

            let mut ni = Vec::with_capacity(num_iters);
            ni.push(real_n0);
            for i in 1..num_iters.saturating_sub(1) {
                ni.push(n0.powf(1.0 - omega * i as f64).round() as usize);
            }
            ni.push(nf);
            ni
        }
    };

    let mut schedule = vec![raw[0]];
    for &v in &raw[1..] {
        let v = v.max(nf);
        if v < *schedule.last().unwrap() {
            schedule.push(v);
        }
    }
    if *schedule.last().unwrap() != nf {
        schedule.push(nf);
    }
    Ok(schedule)
}

#[inline]
fn check_cancelled(cancel: Option<&AtomicBool>) -> Result<()> {
    match cancel {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(SicleError::Cancelled),
        _ => Ok(()),
    }
}

/// Run the full iterative segmentation.
pub(crate) fn segment(
    engine: &Sicle,
    opts: &SicleOptions,
    keep_scales: bool,
    cancel: Option<&AtomicBool>,
) -> Result<RunOutput> {
    opts.validate(
        engine.num_vertices(),
        engine.roi().is_some(),
        engine.has_saliency(),
    )?;

    let _span = debug_span!("segment", n0 = opts.n0, nf = opts.nf).entered();

    let image = engine.image();
    let adjacency = Adjacency::for_domain(image.domain(), opts.use_diag);
    let seeds = oversample(&opts.sampling, image, engine.roi(), opts.n0, opts.rng_seed)?;
    let schedule = build_schedule(seeds.len(), opts.nf, opts.max_iters, opts.user_ni.as_deref())?;
    debug!(?schedule, "iteration schedule");

    let ctx = IftContext {
        image,
        roi: engine.roi(),
        saliency: engine.saliency_values(),
        adjacency: &adjacency,
        connectivity: &opts.connectivity,
        params: CostParams {
            alpha: f64::from(opts.alpha),
            irreg: f64::from(opts.irreg),
            adherence: opts.adherence as i32,
        },
    };

    let mut forest = Forest::new(image.domain().len(), seeds);
    let mut scales = Vec::new();
    let mut removed: Vec<u32> = Vec::new();

    for (iteration, &target) in schedule.iter().enumerate().skip(1) {
        check_cancelled(cancel)?;
        let _iter_span =
            debug_span!("iteration", iteration, seeds = forest.seeds.len(), next = target).entered();

        if iteration == 1 || !opts.use_dift {
            run_sequential(&ctx, &mut forest);
        } else {
            run_differential(&ctx, &mut forest, &removed);
        }
        if keep_scales {
            scales.push(materialize_labels(engine, &forest));
        }

        let stats = TreeStats::measure(image, ctx.saliency, &forest, &adjacency);
        let relevance = seed_relevance(&stats, image.domain(), &opts.criterion, &opts.penalty);
        let (survivors, dropped) = select_survivors(&forest.seeds, &relevance, target);
        forest.seeds = survivors;
        removed = dropped;
    }

    // the pass over the nf survivors
    check_cancelled(cancel)?;
    if opts.use_dift {
        run_differential(&ctx, &mut forest, &removed);
    } else {
        run_sequential(&ctx, &mut forest);
    }
    scales.push(materialize_labels(engine, &forest));

    let seed_image = materialize_seed_image(engine, &forest);
    Ok(RunOutput { scales, seed_image })
}

/// Turn the forest into a compact label image: `label + 1` inside the region
/// of interest, 0 elsewhere.
fn materialize_labels(engine: &Sicle, forest: &Forest) -> LabelImage {
    let domain = *engine.image().domain();
    let roi = engine.roi();
    let labels = (0..domain.len())
        .into_par_iter()
        .map(|v| {
            if in_roi(roi, v) {
                forest.label_of(v) as u32 + 1
            } else {
                0
            }
        })
        .collect();
    LabelImage { domain, labels }
}

/// Sparse companion image carrying `label + 1` at the seed spels only.
fn materialize_seed_image(engine: &Sicle, forest: &Forest) -> LabelImage {
    let domain = *engine.image().domain();
    let mut labels = vec![0u32; domain.len()];
    for &s in &forest.seeds {
        let s = s as usize;
        labels[s] = forest.label_of(s) as u32 + 1;
    }
    LabelImage { domain, labels }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometric_schedule_follows_the_decay_law() {
        // omega = 1/4: 3000^0.75 = 405.4...
        assert_eq!(build_schedule(3000, 200, 5, None).unwrap(), vec![3000, 405, 200]);
        assert_eq!(build_schedule(20, 2, 5, None).unwrap(), vec![20, 9, 4, 2]);
    }

    #[test]
    fn two_iterations_jump_straight_to_nf() {
        assert_eq!(build_schedule(100, 10, 2, None).unwrap(), vec![100, 10]);
    }

    #[test]
    fn schedules_are_strictly_decreasing_and_end_at_nf() {
        for (n0, nf, iters) in [(3000, 200, 5), (50, 2, 8), (500, 499, 5), (10, 3, 2)] {
            let schedule = build_schedule(n0, nf, iters, None).unwrap();
            assert_eq!(schedule[0], n0);
            assert_eq!(*schedule.last().unwrap(), nf);
            assert!(schedule.windows(2).all(|w| w[0] > w[1]), "{schedule:?}");
        }
    }

    #[test]
    fn user_schedules_are_bracketed_verbatim() {
        assert_eq!(
            build_schedule(100, 10, 5, Some(&[50, 20])).unwrap(),
            vec![100, 50, 20, 10]
        );
    }

    #[test]
    fn user_entries_above_the_realised_n0_are_dropped() {
        // grid sampling realised only 40 seeds; the 50 entry is unreachable
        assert_eq!(
            build_schedule(40, 10, 5, Some(&[50, 20])).unwrap(),
            vec![40, 20, 10]
        );
    }

    #[test]
    fn sampling_below_nf_is_degenerate() {
        assert!(matches!(
            build_schedule(5, 5, 5, None),
            Err(SicleError::DegenerateSampling { sampled: 5, nf: 5 })
        ));
    }
}
