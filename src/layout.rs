//! Force-directed (Fruchterman-Reingold) node placement.
//!
//! Nodes start at seeded random positions in the unit square. Every
//! iteration pushes all pairs apart with `k²/d`, pulls edge endpoints
//! together with `d²/k`, and moves each node along its net force by at most
//! the current temperature, which cools linearly to zero. The result is
//! centred on the origin and scaled into `[-1, 1]`.

use crate::graph::Graph;
use crate::models::{Layout, Position};
use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MIN_DISTANCE: f64 = 0.01;
const INITIAL_TEMPERATURE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub seed: u64,
    pub iterations: usize,
    /// Optimal edge length. `None`, or any value that is not a finite
    /// positive number, uses `1/sqrt(N)`.
    pub k: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 50,
            k: None,
        }
    }
}

pub fn spring_layout(graph: &Graph, config: &LayoutConfig) -> Layout {
    let ids: Vec<&str> = graph.node_ids().collect();
    let n = ids.len();

    match n {
        0 => return Layout::default(),
        1 => {
            let mut positions = IndexMap::new();
            positions.insert(ids[0].to_string(), Position::default());
            return Layout { positions };
        }
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<(f64, f64)> = (0..n).map(|_| (rng.gen::<f64>(), rng.gen::<f64>())).collect();

    // Edge endpoints as indices; self-loops exert no force.
    let links: Vec<(usize, usize)> = graph
        .edges()
        .filter(|e| !e.is_self_loop())
        .filter_map(|e| Some((graph.node_index(&e.source)?, graph.node_index(&e.target)?)))
        .collect();

    let k = config
        .k
        .filter(|k| k.is_finite() && *k > 0.0)
        .unwrap_or_else(|| (1.0 / n as f64).sqrt());
    let k_squared = k * k;
    let mut temperature = INITIAL_TEMPERATURE;
    let cooling = INITIAL_TEMPERATURE / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut disp = vec![(0.0_f64, 0.0_f64); n];

        // Repulsion between every pair
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k_squared / dist;
                let fx = dx / dist * force;
                let fy = dy / dist * force;
                disp[i].0 += fx;
                disp[i].1 += fy;
                disp[j].0 -= fx;
                disp[j].1 -= fy;
            }
        }

        // Attraction along edges
        for &(a, b) in &links {
            let dx = pos[b].0 - pos[a].0;
            let dy = pos[b].1 - pos[a].1;
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let force = dist * dist / k;
            let fx = dx / dist * force;
            let fy = dy / dist * force;
            disp[a].0 += fx;
            disp[a].1 += fy;
            disp[b].0 -= fx;
            disp[b].1 -= fy;
        }

        for (p, (fx, fy)) in pos.iter_mut().zip(disp) {
            let mag = (fx * fx + fy * fy).sqrt().max(MIN_DISTANCE);
            let step = mag.min(temperature);
            p.0 += fx / mag * step;
            p.1 += fy / mag * step;
        }

        temperature -= cooling;
    }

    rescale(&mut pos);

    let positions = ids
        .into_iter()
        .zip(pos)
        .map(|(id, (x, y))| (id.to_string(), Position { x, y }))
        .collect();
    Layout { positions }
}

/// Centre on the mean and scale so the largest coordinate magnitude is 1.
fn rescale(pos: &mut [(f64, f64)]) {
    let n = pos.len() as f64;
    let (sx, sy) = pos.iter().fold((0.0, 0.0), |acc, p| (acc.0 + p.0, acc.1 + p.1));
    let (cx, cy) = (sx / n, sy / n);

    let mut lim = 0.0_f64;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        lim = lim.max(p.0.abs()).max(p.1.abs());
    }

    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= lim;
            p.1 /= lim;
        }
    }
}
