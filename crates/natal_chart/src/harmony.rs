//! Element harmony between the BaZi chart and the planetary placements.
//!
//! Both traditions are projected onto the five phases: the pillars by
//! weighted stem and branch elements, the planets by a fixed Wu Xing
//! affinity table. The harmony index is the cosine similarity of the two
//! vectors rescaled to [0, 1].

use natal_core::{Body, CelestialPosition};
use serde::Serialize;

use crate::bazi::FourPillars;
use crate::element::{ALL_WU_XING, WuXing};

/// (stem, branch) weights per pillar: year, month, day, hour.
const PILLAR_WEIGHTS: [(f64, f64); 4] = [(1.0, 1.0), (1.5, 1.5), (2.0, 1.0), (0.8, 0.8)];

/// Wu Xing affinity of each body, in Wood, Fire, Earth, Metal, Water order.
const fn planet_weights(body: Body) -> [f64; 5] {
    match body {
        Body::Sun => [0.2, 1.0, 0.0, 0.0, 0.0],
        Body::Moon => [0.0, 0.0, 0.3, 0.0, 1.0],
        Body::Mercury => [0.0, 0.0, 0.0, 0.4, 0.6],
        Body::Venus => [0.0, 0.0, 0.2, 0.8, 0.0],
        Body::Mars => [0.0, 1.0, 0.0, 0.0, 0.0],
        Body::Jupiter => [1.0, 0.2, 0.0, 0.0, 0.0],
        Body::Saturn => [0.0, 0.0, 0.7, 0.3, 0.0],
        Body::Uranus => [0.0, 0.5, 0.0, 0.5, 0.0],
        Body::Neptune => [0.2, 0.0, 0.0, 0.0, 0.8],
        Body::Pluto => [0.0, 0.5, 0.5, 0.0, 0.0],
    }
}

/// Normalized share of each phase; components sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementVector {
    pub wood: f64,
    pub fire: f64,
    pub earth: f64,
    pub metal: f64,
    pub water: f64,
}

impl ElementVector {
    /// Normalize raw weights. An all-zero input becomes uniform.
    fn normalized(raw: [f64; 5]) -> Self {
        let sum: f64 = raw.iter().sum();
        let v = if sum > 0.0 {
            raw.map(|x| x / sum)
        } else {
            [0.2; 5]
        };
        Self::from_array(v)
    }

    fn from_array(v: [f64; 5]) -> Self {
        Self {
            wood: v[0],
            fire: v[1],
            earth: v[2],
            metal: v[3],
            water: v[4],
        }
    }

    pub fn to_array(&self) -> [f64; 5] {
        [self.wood, self.fire, self.earth, self.metal, self.water]
    }

    pub fn get(&self, element: WuXing) -> f64 {
        self.to_array()[element.index()]
    }

    /// First element with the largest share.
    pub fn dominant(&self) -> WuXing {
        let v = self.to_array();
        let mut best = 0;
        for i in 1..5 {
            if v[i] > v[best] {
                best = i;
            }
        }
        ALL_WU_XING[best]
    }

    /// First element with the smallest share.
    pub fn deficient(&self) -> WuXing {
        let v = self.to_array();
        let mut worst = 0;
        for i in 1..5 {
            if v[i] < v[worst] {
                worst = i;
            }
        }
        ALL_WU_XING[worst]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementHarmony {
    pub eastern: ElementVector,
    pub western: ElementVector,
    pub combined: ElementVector,
    pub dominant: WuXing,
    pub deficient: WuXing,
    /// (cos θ + 1) / 2 of the eastern and western vectors.
    pub harmony_index: f64,
    pub interpretation: &'static str,
}

fn cosine_similarity(a: &[f64; 5], b: &[f64; 5]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}

fn interpretation(index: f64) -> &'static str {
    if index > 0.8 {
        "very high coherence"
    } else if index > 0.6 {
        "good coherence"
    } else if index > 0.4 {
        "moderate coherence"
    } else {
        "dynamic tension"
    }
}

/// Weighted element vector of the pillars present.
pub fn eastern_vector(pillars: &FourPillars) -> ElementVector {
    let slots = [
        Some(&pillars.year),
        Some(&pillars.month),
        Some(&pillars.day),
        pillars.hour.as_ref(),
    ];
    let mut raw = [0.0; 5];
    for (pillar, (ws, wb)) in slots.iter().zip(PILLAR_WEIGHTS) {
        if let Some(p) = pillar {
            raw[p.stem_element.index()] += ws;
            raw[p.branch_element.index()] += wb;
        }
    }
    ElementVector::normalized(raw)
}

/// Planetary element vector of the bodies present in `positions`.
pub fn western_vector(positions: &[CelestialPosition]) -> ElementVector {
    let mut raw = [0.0; 5];
    for pos in positions {
        for (acc, w) in raw.iter_mut().zip(planet_weights(pos.body)) {
            *acc += w;
        }
    }
    ElementVector::normalized(raw)
}

pub fn element_harmony(pillars: &FourPillars, positions: &[CelestialPosition]) -> ElementHarmony {
    let eastern = eastern_vector(pillars);
    let western = western_vector(positions);
    let (e, w) = (eastern.to_array(), western.to_array());

    let mut sum = [0.0; 5];
    for i in 0..5 {
        sum[i] = e[i] + w[i];
    }
    let combined = ElementVector::normalized(sum);
    let harmony_index = ((cosine_similarity(&e, &w) + 1.0) / 2.0).clamp(0.0, 1.0);

    ElementHarmony {
        eastern,
        western,
        combined,
        dominant: combined.dominant(),
        deficient: combined.deficient(),
        harmony_index,
        interpretation: interpretation(harmony_index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_positions_are_uniform() {
        let v = western_vector(&[]);
        for e in ALL_WU_XING {
            assert!((v.get(e) - 0.2).abs() < 1e-12);
        }
    }

    #[test]
    fn bands() {
        assert_eq!(interpretation(0.81), "very high coherence");
        assert_eq!(interpretation(0.8), "good coherence");
        assert_eq!(interpretation(0.5), "moderate coherence");
        assert_eq!(interpretation(0.4), "dynamic tension");
    }

    #[test]
    fn identical_vectors_are_fully_coherent() {
        let a = [0.1, 0.2, 0.3, 0.2, 0.2];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ties_pick_first() {
        let v = ElementVector::from_array([0.2; 5]);
        assert_eq!(v.dominant(), WuXing::Wood);
        assert_eq!(v.deficient(), WuXing::Wood);
    }
}
