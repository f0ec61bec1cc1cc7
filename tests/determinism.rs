use clunk::vec::Vec;
use clunk::{ConstraintBuilder, Engine, EngineConfig, NoOpStepObserver, RigidBody, Vec2, BASE_DELTA};

fn pyramid(engine: &mut Engine<f64>, rows: usize) {
    engine
        .world_mut()
        .add_body(RigidBody::rectangle(400.0, 600.0, 800.0, 50.0).with_static(true));
    for row in 0..rows {
        for col in 0..rows - row {
            let x = 400.0 - (rows - row) as f64 * 20.0 + col as f64 * 40.0;
            let y = 555.0 - row as f64 * 40.0;
            engine.world_mut().add_body(RigidBody::rectangle(x, y, 38.0, 38.0));
        }
    }
}

fn snapshot(engine: &Engine<f64>) -> std::vec::Vec<(f64, f64, f64)> {
    engine
        .world()
        .bodies()
        .iter()
        .map(|b| (b.position.x, b.position.y, b.angle))
        .collect()
}

#[test]
fn pyramid_deterministic() {
    let results: std::vec::Vec<_> = (0..5)
        .map(|_| {
            let mut engine: Engine<f64> = Engine::default();
            pyramid(&mut engine, 5);
            for _ in 0..240 {
                engine.update(BASE_DELTA, &mut NoOpStepObserver);
            }
            snapshot(&engine)
        })
        .collect();

    for r in &results[1..] {
        assert_eq!(&results[0], r);
    }
}

#[test]
fn sleeping_pendulum_deterministic() {
    let results: std::vec::Vec<_> = (0..5)
        .map(|_| {
            let mut engine: Engine<f64> = Engine::new(EngineConfig::new().with_sleeping(true));
            pyramid(&mut engine, 3);
            let bob = engine.world_mut().add_body(RigidBody::rectangle(250.0, 300.0, 30.0, 30.0));
            let rope = ConstraintBuilder::new()
                .world_a(Vec2::new(400.0, 300.0))
                .body_b(engine.world().body(bob).unwrap(), Vec2::zero())
                .stiffness(0.9)
                .build()
                .unwrap();
            engine.world_mut().add_constraint(rope).unwrap();
            for _ in 0..300 {
                engine.update(BASE_DELTA, &mut NoOpStepObserver);
            }
            snapshot(&engine)
        })
        .collect();

    for r in &results[1..] {
        assert_eq!(&results[0], r);
    }
}
