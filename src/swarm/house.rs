//! Mock property targets.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const YIELD_FLOOR: f32 = 2.0;
pub const YIELD_SPAN: f32 = 10.0;
pub const RISK_SPAN: f32 = 50.0;

/// A static target: position, rental yield (%) and Composite Risk Index.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "yield")]
    pub yield_pct: f32,
    pub risk: f32,
}

impl House {
    pub fn new(x: f32, y: f32, yield_pct: f32, risk: f32) -> Self {
        House {
            x,
            y,
            yield_pct,
            risk,
        }
    }
}

/// Immutable house table owned by a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HouseTable {
    houses: Vec<House>,
}

impl HouseTable {
    pub fn from_houses(houses: Vec<House>) -> Self {
        HouseTable { houses }
    }

    /// Draw `count` houses: 4 independent uniform fields per record, scaled to
    /// the world bounds, a 2-12% yield and a 0-50 risk index.
    pub fn generate<R: Rng + ?Sized>(count: usize, width: f32, height: f32, rng: &mut R) -> Self {
        let houses = (0..count)
            .map(|_| {
                let x = rng.gen::<f32>() * width;
                let y = rng.gen::<f32>() * height;
                let yield_pct = rng.gen::<f32>() * YIELD_SPAN + YIELD_FLOOR;
                let risk = rng.gen::<f32>() * RISK_SPAN;
                House::new(x, y, yield_pct, risk)
            })
            .collect();

        info!("🏠 [Swarm] Generated {} mock property targets", count);
        HouseTable { houses }
    }

    pub fn get(&self, index: usize) -> Option<&House> {
        self.houses.get(index)
    }

    pub fn as_slice(&self) -> &[House] {
        &self.houses
    }

    pub fn len(&self) -> usize {
        self.houses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.houses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &House> {
        self.houses.iter()
    }
}
