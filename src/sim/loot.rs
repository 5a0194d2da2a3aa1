//! What comes out of a freshly dug hole
//!
//! A uniform roll in `1..=100` is matched against disjoint bands. The bands
//! must not overlap and must stay within the roll range; anything above the
//! last band yields nothing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;

/// Upper bound of the loot roll (inclusive)
pub const ROLL_MAX: u32 = 100;

/// Outcome of digging a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Loot {
    /// An angry mole pops out
    Mole,
    /// A collectible of the given kind flies out of the hole
    Item(PowerUpKind),
    /// Just dirt
    Nothing,
}

/// Percent chances for each outcome, consumed in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootTable {
    pub mole: u32,
    pub powerup: u32,
    pub bone: u32,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            mole: 15,
            powerup: 10,
            bone: 20,
        }
    }
}

impl LootTable {
    /// Chance (percent) that a dig yields nothing
    pub fn nothing_chance(&self) -> u32 {
        ROLL_MAX.saturating_sub(self.mole + self.powerup + self.bone)
    }

    /// Map a roll in `1..=100` to an outcome
    pub fn outcome(&self, roll: u32) -> Loot {
        let mole_end = self.mole;
        let powerup_end = mole_end + self.powerup;
        let bone_end = powerup_end + self.bone;

        if roll == 0 {
            Loot::Nothing
        } else if roll <= mole_end {
            Loot::Mole
        } else if roll <= powerup_end {
            Loot::Item(PowerUpKind::Standard)
        } else if roll <= bone_end {
            Loot::Item(PowerUpKind::Bone)
        } else {
            Loot::Nothing
        }
    }

    /// Roll the table
    pub fn roll<R: Rng>(&self, rng: &mut R) -> Loot {
        self.outcome(rng.random_range(1..=ROLL_MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_default_bands() {
        let table = LootTable::default();
        assert_eq!(table.outcome(1), Loot::Mole);
        assert_eq!(table.outcome(15), Loot::Mole);
        assert_eq!(table.outcome(16), Loot::Item(PowerUpKind::Standard));
        assert_eq!(table.outcome(25), Loot::Item(PowerUpKind::Standard));
        assert_eq!(table.outcome(26), Loot::Item(PowerUpKind::Bone));
        assert_eq!(table.outcome(45), Loot::Item(PowerUpKind::Bone));
        assert_eq!(table.outcome(46), Loot::Nothing);
        assert_eq!(table.outcome(100), Loot::Nothing);
        assert_eq!(table.nothing_chance(), 55);
    }

    #[test]
    fn test_bands_cover_roll_range_once() {
        let table = LootTable::default();
        let mut counts = [0u32; 4];
        for roll in 1..=ROLL_MAX {
            let slot = match table.outcome(roll) {
                Loot::Mole => 0,
                Loot::Item(PowerUpKind::Standard) => 1,
                Loot::Item(PowerUpKind::Bone) => 2,
                Loot::Item(PowerUpKind::Wild) => unreachable!(),
                Loot::Nothing => 3,
            };
            counts[slot] += 1;
        }
        assert_eq!(counts, [15, 10, 20, 55]);
    }

    #[test]
    fn test_roll_distribution_is_plausible() {
        let table = LootTable::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let moles = (0..10_000)
            .filter(|_| table.roll(&mut rng) == Loot::Mole)
            .count();
        assert!((1200..1800).contains(&moles), "moles = {moles}");
    }
}
