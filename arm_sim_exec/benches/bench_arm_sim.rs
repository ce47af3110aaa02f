//! # Arm Simulation Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arm_sim_lib::{
    arm_sim::{self, ArmSim},
    encoder_sim::AbsEncoderSim,
    winch_sim::{self, WinchSim},
};
use util::module::State;

fn arm_sim_benchmark(c: &mut Criterion) {
    // ---- Build the simulation ----

    let arm_params = arm_sim::Params {
        top_rotations_limit: 0.2,
        bottom_rotations_limit: -0.2,
        delta_rotations_before_broken: 0.02,
        grabber_breaks_if_open_below_rotations: -0.1,
        height_from_winch_to_pivot_m: 1.0,
        arm_length_from_edge_to_pivot_m: 0.5,
        arm_length_from_edge_to_pivot_min_m: 0.1,
        encoder_rotations_offset: 0.1,
    };

    let winch_params = winch_sim::Params {
        spool_diameter_m: 0.03,
        initial_string_len_m: 1.118,
        min_string_len_m: 0.6,
        max_string_len_m: 1.4,
        max_spool_speed_rps: 2.0,
    };

    let winch = WinchSim::new(winch_params).unwrap();
    let mut arm = ArmSim::new(&arm_params, winch, AbsEncoderSim::new()).unwrap();

    // ---- Benchmark a cycle, sweeping the winch back and forth ----

    let mut speed_rps = 1.0;

    c.bench_function("arm_sim_cycle", |b| {
        b.iter(|| {
            let (len_m, report) = arm
                .winch_mut()
                .proc(&winch_sim::InputData {
                    speed_dem_rps: Some(speed_rps),
                    dt_s: 0.02,
                })
                .unwrap();

            if report.fully_spooled || report.fully_unspooled {
                speed_rps = -speed_rps;
            }

            black_box(len_m);
            black_box(arm.simulation_periodic())
        })
    });

    c.bench_function("geometry_solve", |b| {
        let geometry = arm_sim::ArmGeometry::new(1.0, 0.5).unwrap();
        b.iter(|| geometry.calc_signed_degrees_for_string_len(black_box(1.118)))
    });
}

criterion_group!(benches, arm_sim_benchmark);
criterion_main!(benches);
