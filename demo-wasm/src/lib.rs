use clunk::vec::Vec as _;
use clunk::{
    BodyId, BodyObserver, CollisionObserver, ConstraintBuilder, Engine, EngineConfig,
    NoOpStepObserver, Pair, RigidBody, StepObserver, Vec2,
};
use wasm_bindgen::prelude::*;

fn flatten(points: &[Vec2<f32>], out: &mut Vec<f32>) {
    for p in points {
        out.push(p.x);
        out.push(p.y);
    }
}

/// Counts collision starts so the page can flash on impact.
#[derive(Default)]
struct ImpactCounter {
    impacts: usize,
}

impl BodyObserver<f32> for ImpactCounter {}
impl CollisionObserver<f32> for ImpactCounter {
    fn on_collision_start(&mut self, pairs: &[&Pair<f32>]) {
        self.impacts += pairs.iter().filter(|p| !p.is_sensor).count();
    }
}
impl StepObserver<f32> for ImpactCounter {}

// ---- Boxes Demo ----

#[wasm_bindgen]
pub struct BoxesDemo {
    engine: Engine<f32>,
    impacts: ImpactCounter,
}

#[wasm_bindgen]
impl BoxesDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(columns: usize, rows: usize) -> Self {
        let mut engine = Engine::new(EngineConfig::new().with_sleeping(true));
        let world = engine.world_mut();
        world.add_body(RigidBody::rectangle(400.0, 610.0, 810.0, 60.0).with_static(true));
        world.add_body(RigidBody::rectangle(-10.0, 300.0, 60.0, 600.0).with_static(true));
        world.add_body(RigidBody::rectangle(810.0, 300.0, 60.0, 600.0).with_static(true));
        for col in 0..columns {
            for row in 0..rows {
                let x = 200.0 + col as f32 * 42.0;
                let y = 560.0 - row as f32 * 42.0;
                world.add_body(RigidBody::rectangle(x, y, 40.0, 40.0));
            }
        }
        BoxesDemo { engine, impacts: ImpactCounter::default() }
    }

    pub fn update(&mut self, dt: f32) {
        self.engine.update(dt, &mut self.impacts);
    }

    pub fn add_box(&mut self, x: f32, y: f32, size: f32) {
        let body = RigidBody::rectangle(x, y, size, size).with_angle(0.3);
        self.engine.world_mut().add_body(body);
    }

    /// Push every dynamic body under the point away from it.
    pub fn poke(&mut self, x: f32, y: f32, strength: f32) {
        let point = Vec2::new(x, y);
        for body in self.engine.world_mut().bodies_mut() {
            if body.is_static || !body.bounds().contains(point) {
                continue;
            }
            let away = body.position - point;
            let push = if away.is_zero() { Vec2::new(0.0, -1.0) } else { away.normalize() };
            let force = push.scale(strength * body.mass);
            body.apply_force(point, force);
        }
    }

    pub fn body_count(&self) -> usize {
        self.engine.world().bodies().len()
    }

    /// Returns vertices of body at index as flat [x0, y0, x1, y1, ...]
    pub fn body_vertices(&self, index: usize) -> Vec<f32> {
        let mut out = Vec::new();
        if let Some(body) = self.engine.world().bodies().get(index) {
            flatten(body.vertices(), &mut out);
        }
        out
    }

    pub fn is_sleeping(&self, index: usize) -> bool {
        self.engine.world().bodies().get(index).is_some_and(|b| b.is_sleeping)
    }

    pub fn is_static(&self, index: usize) -> bool {
        self.engine.world().bodies().get(index).is_some_and(|b| b.is_static)
    }

    /// Returns flat [x0, y0, x1, y1, ...] of every active contact point
    pub fn contacts(&self) -> Vec<f32> {
        let bodies = self.engine.world().bodies();
        let mut out = Vec::new();
        for pair in self.engine.pairs().iter().filter(|p| p.is_active) {
            for contact in pair.active() {
                let p = contact.vertex.point(bodies);
                out.push(p.x);
                out.push(p.y);
            }
        }
        out
    }

    /// Collision starts since the last call.
    pub fn take_impacts(&mut self) -> usize {
        core::mem::take(&mut self.impacts.impacts)
    }
}

// ---- Pendulum Demo ----

#[wasm_bindgen]
pub struct PendulumDemo {
    engine: Engine<f32>,
    links: Vec<BodyId>,
}

#[wasm_bindgen]
impl PendulumDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(links: usize, stiffness: f32) -> Self {
        let mut engine: Engine<f32> = Engine::default();
        let mut ids = Vec::with_capacity(links);
        let mut previous: Option<BodyId> = None;
        for i in 0..links {
            let id = engine
                .world_mut()
                .add_body(RigidBody::rectangle(420.0 + i as f32 * 30.0, 80.0, 24.0, 10.0));
            let world = engine.world();
            let (Ok(link), anchor) = (world.body(id), previous.map(|p| world.body(p))) else {
                continue;
            };
            let builder = match anchor {
                Some(Ok(prev)) => ConstraintBuilder::new().body_a(prev, Vec2::new(12.0, 0.0)),
                _ => ConstraintBuilder::new().world_a(Vec2::new(400.0, 80.0)),
            };
            let joint = builder
                .body_b(link, Vec2::new(-12.0, 0.0))
                .stiffness(stiffness)
                .length(6.0);
            if let Ok(joint) = joint.build() {
                let _ = engine.world_mut().add_constraint(joint);
            }
            ids.push(id);
            previous = Some(id);
        }
        PendulumDemo { engine, links: ids }
    }

    pub fn update(&mut self, dt: f32) {
        self.engine.update(dt, &mut NoOpStepObserver);
    }

    /// Kick the last link sideways.
    pub fn swing(&mut self, speed: f32) {
        if let Some(&tail) = self.links.last() {
            if let Ok(body) = self.engine.world_mut().body_mut(tail) {
                body.set_velocity(Vec2::new(speed, 0.0));
            }
        }
    }

    /// Returns flat [ax, ay, bx, by, ...] endpoints of every joint
    pub fn joints(&self) -> Vec<f32> {
        let world = self.engine.world();
        let mut out = Vec::new();
        for c in world.constraints() {
            flatten(&[c.point_a_world(world.bodies()), c.point_b_world(world.bodies())], &mut out);
        }
        out
    }

    /// Returns flat [x0, y0, x1, y1, ...] link centres
    pub fn positions(&self) -> Vec<f32> {
        let world = self.engine.world();
        let centres: Vec<Vec2<f32>> = self
            .links
            .iter()
            .filter_map(|id| world.body(*id).ok())
            .map(|b| b.position)
            .collect();
        let mut out = Vec::with_capacity(centres.len() * 2);
        flatten(&centres, &mut out);
        out
    }
}
