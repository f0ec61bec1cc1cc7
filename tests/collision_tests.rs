use clunk::vec::Vec;
use clunk::{collides, CollisionFilter, Detector, PairId, PartRef, RigidBody, Vec2, World};

/// Small deterministic generator so scenes are reproducible without extra deps.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 11) as f64) / ((1u64 << 53) as f64)
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next()
    }
}

fn random_body(rng: &mut Lcg) -> RigidBody<f64> {
    let x = rng.range(0.0, 200.0);
    let y = rng.range(0.0, 200.0);
    let angle = rng.range(0.0, std::f64::consts::TAU);
    if rng.next() < 0.5 {
        RigidBody::rectangle(x, y, rng.range(10.0, 60.0), rng.range(10.0, 60.0)).with_angle(angle)
    } else {
        let sides = 3 + (rng.next() * 5.0) as usize;
        let radius = rng.range(8.0, 35.0);
        let points: std::vec::Vec<_> = (0..sides)
            .map(|i| {
                let t = i as f64 / sides as f64 * std::f64::consts::TAU;
                Vec2::new(radius * t.cos(), radius * t.sin())
            })
            .collect();
        RigidBody::polygon(Vec2::new(x, y), &points).unwrap().with_angle(angle)
    }
}

fn random_world(seed: u64, count: usize) -> World<f64> {
    let mut rng = Lcg(seed);
    let mut world = World::new();
    for _ in 0..count {
        world.add_body(random_body(&mut rng));
    }
    world
}

#[test]
fn disjoint_bounds_never_collide() {
    for seed in 0..8 {
        let world = random_world(seed, 24);
        let bodies = world.bodies();
        for i in 0..bodies.len() {
            for j in i + 1..bodies.len() {
                if bodies[i].bounds().overlaps(bodies[j].bounds()) {
                    continue;
                }
                let c = collides(bodies, PartRef::new(bodies, i, 0), PartRef::new(bodies, j, 0), None);
                assert!(c.is_none(), "seed {} bodies {} and {}", seed, i, j);
            }
        }
    }
}

#[test]
fn manifolds_have_one_or_two_supports_and_point_a_to_b() {
    let mut found = 0;
    for seed in 0..8 {
        let world = random_world(seed, 24);
        let bodies = world.bodies();
        for i in 0..bodies.len() {
            for j in i + 1..bodies.len() {
                let Some(c) = collides(bodies, PartRef::new(bodies, i, 0), PartRef::new(bodies, j, 0), None) else {
                    continue;
                };
                found += 1;
                assert!((1..=2).contains(&c.supports.len()));
                let a = &bodies[c.part_a.body];
                let b = &bodies[c.part_b.body];
                assert!(a.id < b.id);
                assert!(c.normal.dot(b.position - a.position) >= 0.0);
                assert!((c.normal.length() - 1.0).abs() < 1e-9);
                assert!(c.depth > 0.0);
                assert_eq!(c.tangent, c.normal.perp());
            }
        }
    }
    assert!(found > 0, "scenes produced no overlaps");
}

#[test]
fn pair_id_is_symmetric() {
    let world = random_world(42, 10);
    for a in world.bodies() {
        for b in world.bodies() {
            assert_eq!(PairId::new(a.id, b.id), PairId::new(b.id, a.id));
        }
    }
}

fn overlapping(filter_a: CollisionFilter, filter_b: CollisionFilter) -> usize {
    let mut world: World<f64> = World::new();
    world.add_body(RigidBody::rectangle(0.0, 0.0, 20.0, 20.0).with_filter(filter_a));
    world.add_body(RigidBody::rectangle(10.0, 0.0, 20.0, 20.0).with_filter(filter_b));
    let mut detector = Detector::new();
    detector.set_bodies(world.bodies());
    detector.collisions(world.bodies(), None).len()
}

#[test]
fn positive_group_collides_despite_masks() {
    let a = CollisionFilter::new(0b0001, 0b0010).with_group(7);
    let b = CollisionFilter::new(0b0100, 0b1000).with_group(7);
    assert_eq!(overlapping(a, b), 1);
}

#[test]
fn negative_group_never_collides() {
    let a = CollisionFilter::DEFAULT.with_group(-7);
    let b = CollisionFilter::DEFAULT.with_group(-7);
    assert_eq!(overlapping(a, b), 0);
}

#[test]
fn mismatched_masks_without_group_do_not_collide() {
    let a = CollisionFilter::new(0b0001, 0b0010);
    let b = CollisionFilter::new(0b0100, 0b1000);
    assert_eq!(overlapping(a, b), 0);
}

#[test]
fn detector_matches_brute_force() {
    let world = random_world(7, 40);
    let bodies = world.bodies();
    let mut detector = Detector::new();
    detector.set_bodies(bodies);
    let mut swept: std::vec::Vec<PairId> = detector.collisions(bodies, None).iter().map(|c| c.id()).collect();
    swept.sort();

    let mut brute = std::vec::Vec::new();
    for i in 0..bodies.len() {
        for j in i + 1..bodies.len() {
            if let Some(c) = collides(bodies, PartRef::new(bodies, i, 0), PartRef::new(bodies, j, 0), None) {
                brute.push(c.id());
            }
        }
    }
    brute.sort();
    assert_eq!(swept, brute);
}
