//! Gold balance and threshold-gated tool unlocks.

use serde::{Deserialize, Serialize};

use crate::materials::GoldParticle;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolUnlock {
    pub id: String,
    pub cost: f32,
    #[serde(default)]
    pub unlocked: bool,
}

impl ToolUnlock {
    pub fn new(id: &str, cost: f32) -> Self {
        Self {
            id: id.to_string(),
            cost,
            unlocked: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Fallback price for gold with no intrinsic value.
    #[serde(default = "default_sell_price_per_gram")]
    pub default_sell_price_per_gram: f32,
    #[serde(default = "default_sell_bonus_multiplier")]
    pub sell_bonus_multiplier: f32,
    #[serde(default)]
    pub tool_unlocks: Vec<ToolUnlock>,
}

fn default_sell_price_per_gram() -> f32 {
    60.0
}
fn default_sell_bonus_multiplier() -> f32 {
    1.0
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            default_sell_price_per_gram: default_sell_price_per_gram(),
            sell_bonus_multiplier: default_sell_bonus_multiplier(),
            tool_unlocks: Vec::new(),
        }
    }
}

/// Result of depositing one gold particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Deposit {
    pub payout: f32,
    pub balance: f32,
    /// Tools unlocked by this deposit, in configured order.
    pub unlocked: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct GoldEconomy {
    config: EconomyConfig,
    balance: f32,
}

impl GoldEconomy {
    pub fn new(config: EconomyConfig) -> Self {
        Self {
            config,
            balance: 0.0,
        }
    }

    pub fn balance(&self) -> f32 {
        self.balance
    }

    pub fn tool_unlocks(&self) -> &[ToolUnlock] {
        &self.config.tool_unlocks
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.config
            .tool_unlocks
            .iter()
            .any(|unlock| unlock.id == id && unlock.unlocked)
    }

    /// Convert a collected particle into currency.
    pub fn deposit_gold(&mut self, particle: &GoldParticle) -> Deposit {
        let mut base_value = particle.estimated_value();
        if base_value <= 0.0 {
            base_value = particle.mass() * self.config.default_sell_price_per_gram;
        }

        let payout = base_value * self.config.sell_bonus_multiplier;
        self.balance += payout;
        let unlocked = self.evaluate_unlocks();

        Deposit {
            payout,
            balance: self.balance,
            unlocked,
        }
    }

    /// Spend from the balance. Free purchases always succeed.
    pub fn try_spend(&mut self, cost: f32) -> bool {
        if cost <= 0.0 {
            return true;
        }
        if self.balance < cost {
            return false;
        }
        self.balance -= cost;
        true
    }

    fn evaluate_unlocks(&mut self) -> Vec<String> {
        let mut unlocked = Vec::new();
        for unlock in self.config.tool_unlocks.iter_mut() {
            if unlock.unlocked || self.balance < unlock.cost {
                continue;
            }
            unlock.unlocked = true;
            log::info!("unlocked tool '{}' at balance {:.2}", unlock.id, self.balance);
            unlocked.push(unlock.id.clone());
        }
        unlocked
    }
}

impl Default for GoldEconomy {
    fn default() -> Self {
        Self::new(EconomyConfig::default())
    }
}
