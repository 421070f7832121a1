/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2026" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Cross-stage scenarios from spec.md §8, run through the public
//! `Pipeline` facade (and, where a scenario needs labels the facade
//! doesn't expose, through the lower-level `Extractor`/`KMeansAssigner`/
//! `JointCounter` building blocks directly). Per-module `#[cfg(test)]`
//! units already cover each stage in isolation; these exercise the
//! stages wired together the way a real caller would.

use local_causal_states::prelude::*;

fn zeros_field(t: usize, y: usize, x: usize) -> Field {
    Field::new(vec![0.0; t * y * x], t, y, x).unwrap()
}

fn gradient_field(t: usize, y: usize, x: usize) -> Field {
    let mut data = Vec::with_capacity(t * y * x);
    for ti in 0..t {
        for yi in 0..y {
            for xi in 0..x {
                data.push((ti + 2 * yi + 3 * xi) as f64);
            }
        }
    }
    Field::new(data, t, y, x).unwrap()
}

fn varied_field(t: usize, y: usize, x: usize) -> Field {
    let mut data = Vec::with_capacity(t * y * x);
    for ti in 0..t {
        for yi in 0..y {
            for xi in 0..x {
                data.push(((ti * 31 + yi * 17 + xi * 7) % 7) as f64);
            }
        }
    }
    Field::new(data, t, y, x).unwrap()
}

/// Rolls a field's spatial axes by `(dy, dx)`: `rolled(t, y, x) ==
/// field(t, y - dy mod Y, x - dx mod X)`. The temporal axis is never
/// rolled, matching the crate's treatment of time as a distinguished
/// axis everywhere else.
fn roll_field(field: &Field, dy: isize, dx: isize) -> Field {
    let (t, y, x) = field.dims();
    let (yi, xi) = (y as isize, x as isize);
    let mut data = vec![0.0; t * y * x];
    for ti in 0..t {
        for oy in 0..y {
            for ox in 0..x {
                let src_y = (((oy as isize - dy) % yi + yi) % yi) as usize;
                let src_x = (((ox as isize - dx) % xi + xi) % xi) as usize;
                data[(ti * y + oy) * x + ox] = field.get(ti, src_y, src_x);
            }
        }
    }
    Field::new(data, t, y, x).unwrap()
}

fn run_pipeline(field: &Field, config: PipelineConfig) -> Pipeline {
    let collective = SingleNodeCollective;
    let mut pipeline = Pipeline::new();
    pipeline.extract(field, config).unwrap();
    pipeline.kmeans_lightcones(&collective).unwrap();
    pipeline.joint_count().unwrap();
    pipeline.allreduce(&collective).unwrap();
    pipeline
        .reconstruct_states(&ChiSquareComparator::default())
        .unwrap();
    pipeline
}

/// Scenario 1: a spatiotemporally constant field. Every lightcone row is
/// bit-identical to every other, so k-means assignment (a pure function
/// of a row against a fixed centroid set, ties breaking to the lowest
/// index) places every point in the same past cluster and the same
/// future cluster regardless of `K_P`/`K_F` -- the output must collapse
/// to a single state everywhere.
///
/// This only asserts output homogeneity, not `states().len() == 1`: with
/// `K_P`/`K_F` > 1 on a perfectly constant field, the unused/empty
/// clusters k-means leaves behind still get agglomerated into *some*
/// state per §3's "every past cluster appears in exactly one
/// CausalState" invariant, and whether that lands on the same state as
/// the real cluster depends on the comparator's offset/threshold -- a
/// detail this test doesn't pin down. The `K_P = K_F = 1` test below
/// covers the stronger "exactly one state total" invariant directly.
#[test]
fn scenario_1_constant_field_yields_homogeneous_output() {
    let field = zeros_field(8, 8, 8);
    let config = PipelineConfig::new(
        LightconeParams::new(2, 1, 1),
        Boundary::Periodic,
        DecayMode::None,
        0.0,
        0.0,
        KMeansParams::new(2, 10, InitMethod::Default, 1),
        KMeansParams::new(3, 10, InitMethod::Default, 1),
        MorphParams::default(),
        false,
    );

    let mut pipeline = run_pipeline(&field, config);
    let result = pipeline.causal_filter().unwrap();

    let (t, y, x) = result.dims();
    let first = result.get(0, 0, 0);
    assert!(first >= 1.0);
    for ti in 0..t {
        for yi in 0..y {
            for xi in 0..x {
                assert_eq!(result.get(ti, yi, xi), first);
            }
        }
    }
}

/// The stronger form: with `K_P = K_F = 1` there is exactly one past and
/// one future cluster, so agglomeration produces exactly one
/// `CausalState`, matching spec.md §8 scenario 1's "`|states| == 1`"
/// literally.
#[test]
fn scenario_1_constant_field_with_trivial_k_yields_exactly_one_state() {
    let field = zeros_field(8, 8, 8);
    let config = PipelineConfig::new(
        LightconeParams::new(2, 1, 1),
        Boundary::Periodic,
        DecayMode::None,
        0.0,
        0.0,
        KMeansParams::new(1, 10, InitMethod::Default, 1),
        KMeansParams::new(1, 10, InitMethod::Default, 1),
        MorphParams::default(),
        false,
    );

    let mut pipeline = run_pipeline(&field, config);
    assert_eq!(pipeline.states().unwrap().len(), 1);
    assert_eq!(pipeline.state_map().unwrap(), &[1]);

    let result = pipeline.causal_filter().unwrap();
    let (t, y, x) = result.dims();
    assert_eq!((t, y, x), (5, 8, 8));
    for ti in 0..t {
        for yi in 0..y {
            for xi in 0..x {
                assert_eq!(result.get(ti, yi, xi), 1.0);
            }
        }
    }
}

/// Scenario 4a: periodic extraction is roll-equivariant at the stencil
/// level -- the exact identity spec.md §8's "boundary reversibility"
/// property rests on. A rolled field's lightcone row at `(t, y, x)` is
/// bit-for-bit the original field's row at `(t, y - dy mod Y, x - dx mod
/// X)`, since periodic padding wraps the same way under either framing.
#[test]
fn scenario_4_periodic_extraction_is_roll_equivariant() {
    let field = gradient_field(6, 7, 7);
    let (dy, dx): (isize, isize) = (2, 3);
    let rolled = roll_field(&field, dy, dx);

    let params = LightconeParams::new(1, 1, 1);
    let (plcs, flcs, shape) = Extractor::extract(&field, params, Boundary::Periodic).unwrap();
    let (plcs_r, flcs_r, shape_r) =
        Extractor::extract(&rolled, params, Boundary::Periodic).unwrap();
    assert_eq!(shape, shape_r);

    let (yi, xi) = (shape.y as isize, shape.x as isize);
    for t in 0..shape.t {
        for y in 0..shape.y {
            for x in 0..shape.x {
                let src_y = (((y as isize - dy) % yi + yi) % yi) as usize;
                let src_x = (((x as isize - dx) % xi + xi) % xi) as usize;
                let rolled_idx = (t * shape.y + y) * shape.x + x;
                let src_idx = (t * shape.y + src_y) * shape.x + src_x;
                assert_eq!(plcs_r.row(rolled_idx), plcs.row(src_idx));
                assert_eq!(flcs_r.row(rolled_idx), flcs.row(src_idx));
            }
        }
    }
}

/// Scenario 4b: the roll-equivariance from 4a threaded through the full
/// pipeline. `K_P = K_F = 1` keeps cluster assignment independent of row
/// order (every row lands in the lone cluster), so the rolled field's
/// `state_field` must equal the roll of the original's `state_field`
/// exactly -- here, since both collapse to the same constant state, that
/// reduces to both outputs being identical constant fields of the same
/// shape.
#[test]
fn scenario_4_full_pipeline_roll_invariance_at_trivial_k() {
    let field = gradient_field(6, 7, 7);
    let rolled = roll_field(&field, 2, 3);

    let config = PipelineConfig::new(
        LightconeParams::new(1, 1, 1),
        Boundary::Periodic,
        DecayMode::None,
        0.0,
        0.0,
        KMeansParams::new(1, 5, InitMethod::Default, 1),
        KMeansParams::new(1, 5, InitMethod::Default, 1),
        MorphParams::default(),
        false,
    );

    let mut original = run_pipeline(&field, config);
    let mut shifted = run_pipeline(&rolled, config);
    let result = original.causal_filter().unwrap();
    let result_rolled = shifted.causal_filter().unwrap();

    assert_eq!(result.dims(), result_rolled.dims());
    let (t, y, x) = result.dims();
    for ti in 0..t {
        for yi in 0..y {
            for xi in 0..x {
                assert_eq!(result.get(ti, yi, xi), result_rolled.get(ti, yi, xi));
            }
        }
    }
}

/// Scenario 5: open-vs-periodic consistency, up to label renaming.
///
/// A 6x6 all-zero window is embedded at offset `(2, 2)` inside a larger
/// noisy field. With `margin = max(P, F) * c = 1`, every point in the
/// window's inner 4x4 "core" has a lightcone that never reaches outside
/// the zero window, in either framing:
///
/// - open mode, run directly on the 6x6 window as a standalone field,
///   trims exactly that 1-cell margin off each spatial edge, leaving the
///   same 4x4 core as its entire (necessarily homogeneous) output;
/// - periodic mode, run on the full noisy field, never shrinks the
///   spatial extent, so the same 4x4 core survives at its original
///   offset inside a much larger output.
///
/// K-means assignment is a pure function of a row against the fixed
/// centroid set, so identical input rows always land in the same
/// cluster. Since every core row is bit-identical (all zero) within a
/// given run, the whole core collapses to one state in that run --
/// independently in each of the two runs, though not necessarily to the
/// *same* state index. Two single-valued regions are trivially equal up
/// to a label renaming, so checking homogeneity on each side is enough.
#[test]
fn scenario_5_open_and_periodic_agree_on_inner_window_up_to_renaming() {
    let window = 6usize;
    let margin = 1usize;
    let lightcone = LightconeParams::new(1, 1, 1);
    assert_eq!(lightcone.margin(), margin);

    let open_field = zeros_field(6, window, window);
    let open_config = PipelineConfig::new(
        lightcone,
        Boundary::Open,
        DecayMode::None,
        0.0,
        0.0,
        KMeansParams::new(2, 10, InitMethod::Default, 1),
        KMeansParams::new(2, 10, InitMethod::Default, 1),
        MorphParams::default(),
        false,
    );
    let mut open_pipeline = run_pipeline(&open_field, open_config);
    let open_result = open_pipeline.causal_filter().unwrap();
    let (ot, oy, ox) = open_result.dims();
    assert_eq!((oy, ox), (window - 2 * margin, window - 2 * margin));

    let open_value = open_result.get(0, 0, 0);
    for ti in 0..ot {
        for yi in 0..oy {
            for xi in 0..ox {
                assert_eq!(open_result.get(ti, yi, xi), open_value);
            }
        }
    }

    let (big_y, big_x, offset) = (10usize, 10usize, 2usize);
    let big_field = {
        let mut data = Vec::with_capacity(6 * big_y * big_x);
        for ti in 0..6 {
            for yi in 0..big_y {
                for xi in 0..big_x {
                    let in_window =
                        yi >= offset && yi < offset + window && xi >= offset && xi < offset + window;
                    let v = if in_window {
                        0.0
                    } else {
                        1.0 + ((ti * 7 + yi * 13 + xi * 19) % 5) as f64
                    };
                    data.push(v);
                }
            }
        }
        Field::new(data, 6, big_y, big_x).unwrap()
    };
    let periodic_config = PipelineConfig::new(
        lightcone,
        Boundary::Periodic,
        DecayMode::None,
        0.0,
        0.0,
        KMeansParams::new(2, 10, InitMethod::Default, 1),
        KMeansParams::new(2, 10, InitMethod::Default, 1),
        MorphParams::default(),
        false,
    );
    let mut periodic_pipeline = run_pipeline(&big_field, periodic_config);
    let periodic_result = periodic_pipeline.causal_filter().unwrap();
    assert_eq!(periodic_result.dims(), (ot, big_y, big_x));

    let core_y0 = offset + margin;
    let core_x0 = offset + margin;
    let periodic_value = periodic_result.get(0, core_y0, core_x0);
    for ti in 0..ot {
        for dy in 0..oy {
            for dx in 0..ox {
                assert_eq!(
                    periodic_result.get(ti, core_y0 + dy, core_x0 + dx),
                    periodic_value
                );
            }
        }
    }
}

/// Scenario 6a: the allreduce primitive itself. Splitting a run's past
/// and future labels into two shards, counting each shard's local
/// contingency table, and merging them must reproduce the single global
/// table byte-for-byte -- the property [`Collective::allreduce_sum_u64`]
/// relies on, tested here without a real multi-rank backend (none ships
/// in this crate; [`SingleNodeCollective`] is the only one).
#[test]
fn scenario_6_sharded_contingency_tables_merge_to_the_global_table() {
    let field = varied_field(10, 6, 6);
    let params = LightconeParams::new(1, 1, 1);
    let (plcs, flcs, _shape) = Extractor::extract(&field, params, Boundary::Periodic).unwrap();

    let k_p = 3;
    let k_f = 3;
    let kmeans_params = KMeansParams::new(k_p, 15, InitMethod::Default, 1);
    let (_, past_labels) = KMeansAssigner::fit(&plcs, kmeans_params).unwrap();
    let kmeans_params_f = KMeansParams::new(k_f, 15, InitMethod::Default, 1);
    let (_, future_labels) = KMeansAssigner::fit(&flcs, kmeans_params_f).unwrap();

    let global_table = JointCounter::count(&past_labels, &future_labels, k_p, k_f).unwrap();

    let mid = past_labels.len() / 2;
    let (past_a, past_b) = past_labels.split_at(mid);
    let (future_a, future_b) = future_labels.split_at(mid);
    let mut table_a = JointCounter::count(past_a, future_a, k_p, k_f).unwrap();
    let table_b = JointCounter::count(past_b, future_b, k_p, k_f).unwrap();
    table_a.merge(&table_b).unwrap();

    assert_eq!(table_a, global_table);

    let comparator = ChiSquareComparator::default();
    let (states_global, map_global) =
        MorphAgglomerator::agglomerate(&global_table, &comparator, MorphParams::default()).unwrap();
    let (states_merged, map_merged) =
        MorphAgglomerator::agglomerate(&table_a, &comparator, MorphParams::default()).unwrap();
    assert_eq!(map_global, map_merged);
    assert_eq!(states_global.len(), states_merged.len());
}

/// Scenario 6b: `SingleNodeCollective`'s `allreduce_sum_u64` is a no-op,
/// so calling it (the "distributed, one rank" path) must leave the
/// pipeline's output identical to never calling it at all (the
/// "single-node" path).
#[test]
fn scenario_6_single_node_collective_allreduce_is_idempotent() {
    let field = varied_field(10, 6, 6);
    let config = PipelineConfig::new(
        LightconeParams::new(1, 1, 1),
        Boundary::Periodic,
        DecayMode::None,
        0.0,
        0.0,
        KMeansParams::new(3, 15, InitMethod::Default, 1),
        KMeansParams::new(3, 15, InitMethod::Default, 1),
        MorphParams::default(),
        false,
    );
    let collective = SingleNodeCollective;

    let mut distributed = Pipeline::new();
    distributed.extract(&field, config).unwrap();
    distributed.kmeans_lightcones(&collective).unwrap();
    distributed.joint_count().unwrap();
    distributed.allreduce(&collective).unwrap();
    distributed
        .reconstruct_states(&ChiSquareComparator::default())
        .unwrap();
    let distributed_result = distributed.causal_filter().unwrap();

    let mut single_node = Pipeline::new();
    single_node.extract(&field, config).unwrap();
    single_node.kmeans_lightcones(&collective).unwrap();
    single_node.joint_count().unwrap();
    single_node
        .reconstruct_states(&ChiSquareComparator::default())
        .unwrap();
    let single_node_result = single_node.causal_filter().unwrap();

    assert_eq!(distributed_result, single_node_result);
}
