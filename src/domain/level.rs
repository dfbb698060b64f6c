use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    Support,
    Resistance,
}

impl LevelKind {
    /// Short tag used in chart annotations ("R1", "S3").
    pub fn tag(&self) -> &'static str {
        match self {
            LevelKind::Support => "S",
            LevelKind::Resistance => "R",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub kind: LevelKind,
    /// 1 = most significant.
    pub rank: usize,
}

impl PriceLevel {
    pub fn label(&self) -> String {
        format!("{}{}", self.kind.tag(), self.rank)
    }
}

/// Ranked levels for one render. Resistances run high to low, supports low to high.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub resistances: Vec<PriceLevel>,
    pub supports: Vec<PriceLevel>,
}

impl LevelSet {
    /// Orders each side, truncates to `max_levels` and assigns ranks.
    pub fn from_clusters(
        mut resistances: Vec<f64>,
        mut supports: Vec<f64>,
        max_levels: usize,
    ) -> Self {
        resistances.sort_by(|a, b| b.total_cmp(a));
        supports.sort_by(|a, b| a.total_cmp(b));

        Self {
            resistances: rank(resistances, LevelKind::Resistance, max_levels),
            supports: rank(supports, LevelKind::Support, max_levels),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resistances.is_empty() && self.supports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceLevel> {
        self.resistances.iter().chain(self.supports.iter())
    }
}

fn rank(prices: Vec<f64>, kind: LevelKind, max_levels: usize) -> Vec<PriceLevel> {
    prices
        .into_iter()
        .take(max_levels)
        .enumerate()
        .map(|(i, price)| PriceLevel {
            price,
            kind,
            rank: i + 1,
        })
        .collect()
}
