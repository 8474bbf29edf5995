use std::hint::black_box;
use std::time::Instant;

use framecore_common::{Bounds, EntityId, EntityKind, Transform, VelocityParams};
use framecore_kernel::{EntityRegistry, EntitySpec};
use framecore_physics::{TriggerDetector, TriggerTracker};
use glam::DVec3;

fn make_registry(trigger_count: usize, spacing: f64) -> (EntityRegistry, EntityId, Vec<EntityId>) {
    let mut registry = EntityRegistry::new();
    let player = registry
        .spawn(
            EntitySpec::new(EntityKind::Player, Transform::default())
                .with_velocity(VelocityParams::default()),
        )
        .expect("player spawns");
    let side = (trigger_count as f64).sqrt().ceil() as usize;
    let triggers = (0..trigger_count)
        .map(|i| {
            let x = (i % side) as f64 * spacing;
            let z = (i / side) as f64 * spacing;
            registry
                .spawn(
                    EntitySpec::new(
                        EntityKind::TriggerVolume,
                        Transform::from_position(DVec3::new(x, 0.0, z)),
                    )
                    .with_bounds(Bounds::new(DVec3::new(1.5, 0.05, 1.5))),
                )
                .expect("trigger spawns")
        })
        .collect();
    (registry, player, triggers)
}

fn bench_evaluate(trigger_count: usize, iterations: usize) {
    let (registry, player, triggers) = make_registry(trigger_count, 4.0);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(TriggerDetector::evaluate(
            black_box(&registry),
            player,
            black_box(&triggers),
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  evaluate ({trigger_count} triggers, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_tracked_drive(trigger_count: usize, iterations: usize) {
    let (mut registry, player, triggers) = make_registry(trigger_count, 4.0);
    let mut tracker = TriggerTracker::new();

    let start = Instant::now();
    for i in 0..iterations {
        // Sweep the player across the pad grid
        let z = (i % 100) as f64 * 0.5;
        registry
            .set_transform(player, Transform::from_position(DVec3::new(0.0, 0.0, z)))
            .expect("player is dynamic");
        let active = TriggerDetector::evaluate(&registry, player, &triggers);
        let _ = black_box(tracker.update(&active));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  evaluate + edges ({trigger_count} triggers, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Trigger Evaluation Benchmarks ===\n");

    println!("Evaluate:");
    bench_evaluate(4, 100_000);
    bench_evaluate(100, 10_000);
    bench_evaluate(1000, 1000);

    println!("\nEvaluate with edge tracking:");
    bench_tracked_drive(4, 100_000);
    bench_tracked_drive(100, 10_000);

    println!("\n=== Done ===");
}
