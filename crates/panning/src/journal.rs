use std::time::SystemTime;

use glam::Vec3;

use crate::economy::GoldEconomy;
use crate::materials::GoldParticle;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProspectingEntry {
    pub mass: f32,
    pub value: f32,
    pub timestamp: SystemTime,
    pub world_position: Vec3,
}

impl ProspectingEntry {
    /// One-line summary for a toast or log.
    pub fn notification(&self) -> String {
        format!(
            "+{} credits \u{2022} {}g nugget",
            format_amount(self.value),
            format_amount(self.mass)
        )
    }
}

/// Up to two decimals, trailing zeros dropped.
fn format_amount(value: f32) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Log of every nugget the player has picked out of the pan.
#[derive(Clone, Debug, Default)]
pub struct ProspectingJournal {
    entries: Vec<ProspectingEntry>,
}

impl ProspectingJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ProspectingEntry] {
        &self.entries
    }

    pub fn total_value(&self) -> f32 {
        self.entries.iter().map(|e| e.value).sum()
    }

    pub fn total_mass(&self) -> f32 {
        self.entries.iter().map(|e| e.mass).sum()
    }

    /// Record a find. With an economy the entry carries the actual payout,
    /// otherwise the particle's estimated value.
    pub fn record_find(
        &mut self,
        particle: &GoldParticle,
        world_position: Vec3,
        economy: Option<&mut GoldEconomy>,
    ) -> ProspectingEntry {
        let value = match economy {
            Some(economy) => economy.deposit_gold(particle).payout,
            None => particle.estimated_value(),
        };

        let entry = ProspectingEntry {
            mass: particle.mass(),
            value,
            timestamp: SystemTime::now(),
            world_position,
        };
        log::info!("{}", entry.notification());
        self.entries.push(entry);
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::EconomyConfig;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(110.0), "110");
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(0.126), "0.13");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn test_record_without_economy_uses_estimate() {
        let mut journal = ProspectingJournal::new();
        let nugget = GoldParticle::with_reveal(2.0, 19.3, 0.5, Vec3::ZERO, 55.0);
        let entry = journal.record_find(&nugget, Vec3::Y, None);
        assert_eq!(journal.entries(), &[entry]);
        assert!((entry.value - 110.0).abs() < 1e-4);
        assert_eq!(entry.world_position, Vec3::Y);
        assert_eq!(entry.notification(), "+110 credits \u{2022} 2g nugget");
    }

    #[test]
    fn test_record_with_economy_uses_payout() {
        let mut journal = ProspectingJournal::new();
        let mut economy = GoldEconomy::new(EconomyConfig {
            sell_bonus_multiplier: 1.5,
            ..Default::default()
        });
        let nugget = GoldParticle::with_reveal(2.0, 19.3, 0.5, Vec3::ZERO, 55.0);

        journal.record_find(&nugget, Vec3::ZERO, Some(&mut economy));
        assert_eq!(journal.entries().len(), 1);
        assert!((journal.total_value() - 165.0).abs() < 1e-3);
        assert!((economy.balance() - 165.0).abs() < 1e-3);
    }
}
