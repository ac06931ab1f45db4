//! Biome identifiers.
//!
//! Each block carries a one-byte biome id. Ids are fixed and must never be
//! renumbered, since exported files store them directly.

use crate::error::DanError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! biomes {
    ($($variant:ident = $id:literal => $key:literal,)+) => {
        /// Biome of a single block
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Biome {
            $($variant,)+
        }

        impl Biome {
            /// Every biome in id order
            pub const ALL: &'static [Biome] = &[$(Biome::$variant,)+];

            /// Wire id of this biome
            pub fn id(self) -> u8 {
                match self {
                    $(Biome::$variant => $id,)+
                }
            }

            /// Look up a biome by wire id
            pub fn from_id(id: u8) -> Option<Self> {
                match id {
                    $($id => Some(Biome::$variant),)+
                    _ => None,
                }
            }

            /// Key without namespace, e.g. `plains`
            pub fn key(self) -> &'static str {
                match self {
                    $(Biome::$variant => $key,)+
                }
            }

            fn from_key(key: &str) -> Option<Self> {
                match key {
                    $($key => Some(Biome::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

biomes! {
    Badlands = 0 => "badlands",
    BambooJungle = 1 => "bamboo_jungle",
    BasaltDeltas = 2 => "basalt_deltas",
    Beach = 3 => "beach",
    BirchForest = 4 => "birch_forest",
    CherryGrove = 5 => "cherry_grove",
    ColdOcean = 6 => "cold_ocean",
    CrimsonForest = 7 => "crimson_forest",
    DarkForest = 8 => "dark_forest",
    DeepColdOcean = 9 => "deep_cold_ocean",
    DeepDark = 10 => "deep_dark",
    DeepFrozenOcean = 11 => "deep_frozen_ocean",
    DeepLukewarmOcean = 12 => "deep_lukewarm_ocean",
    DeepOcean = 13 => "deep_ocean",
    Desert = 14 => "desert",
    DripstoneCaves = 15 => "dripstone_caves",
    EndBarrens = 16 => "end_barrens",
    EndHighlands = 17 => "end_highlands",
    EndMidlands = 18 => "end_midlands",
    ErodedBadlands = 19 => "eroded_badlands",
    FlowerForest = 20 => "flower_forest",
    Forest = 21 => "forest",
    FrozenOcean = 22 => "frozen_ocean",
    FrozenPeaks = 23 => "frozen_peaks",
    FrozenRiver = 24 => "frozen_river",
    Grove = 25 => "grove",
    IceSpikes = 26 => "ice_spikes",
    JaggedPeaks = 27 => "jagged_peaks",
    Jungle = 28 => "jungle",
    LukewarmOcean = 29 => "lukewarm_ocean",
    LushCaves = 30 => "lush_caves",
    MangroveSwamp = 31 => "mangrove_swamp",
    Meadow = 32 => "meadow",
    MushroomFields = 33 => "mushroom_fields",
    NetherWastes = 34 => "nether_wastes",
    Ocean = 35 => "ocean",
    OldGrowthBirchForest = 36 => "old_growth_birch_forest",
    OldGrowthPineTaiga = 37 => "old_growth_pine_taiga",
    OldGrowthSpruceTaiga = 38 => "old_growth_spruce_taiga",
    Plains = 39 => "plains",
    River = 40 => "river",
    Savanna = 41 => "savanna",
    SavannaPlateau = 42 => "savanna_plateau",
    SmallEndIslands = 43 => "small_end_islands",
    SnowyBeach = 44 => "snowy_beach",
    SnowyPlains = 45 => "snowy_plains",
    SnowySlopes = 46 => "snowy_slopes",
    SnowyTaiga = 47 => "snowy_taiga",
    SoulSandValley = 48 => "soul_sand_valley",
    SparseJungle = 49 => "sparse_jungle",
    StonyPeaks = 50 => "stony_peaks",
    StonyShore = 51 => "stony_shore",
    SunflowerPlains = 52 => "sunflower_plains",
    Swamp = 53 => "swamp",
    Taiga = 54 => "taiga",
    TheEnd = 55 => "the_end",
    TheVoid = 56 => "the_void",
    WarmOcean = 57 => "warm_ocean",
    WarpedForest = 58 => "warped_forest",
    WindsweptForest = 59 => "windswept_forest",
    WindsweptGravellyHills = 60 => "windswept_gravelly_hills",
    WindsweptHills = 61 => "windswept_hills",
    WindsweptSavanna = 62 => "windswept_savanna",
    WoodedBadlands = 63 => "wooded_badlands",
}

impl Biome {
    /// Decode a wire id, treating unknown ids as plains
    pub fn from_id_lossy(id: u8) -> Self {
        Self::from_id(id).unwrap_or_default()
    }
}

impl Default for Biome {
    fn default() -> Self {
        Biome::Plains
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Biome {
    type Err = DanError;

    /// Parse a biome key, with or without the `minecraft:` namespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let key = lower.strip_prefix("minecraft:").unwrap_or(&lower);
        Self::from_key(key).ok_or_else(|| DanError::invalid("biome", s))
    }
}

impl Serialize for Biome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Biome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense() {
        assert_eq!(Biome::ALL.len(), 64);
        for (i, biome) in Biome::ALL.iter().enumerate() {
            assert_eq!(biome.id() as usize, i);
            assert_eq!(Biome::from_id(i as u8), Some(*biome));
        }
        assert_eq!(Biome::from_id(64), None);
    }

    #[test]
    fn test_known_ids() {
        assert_eq!(Biome::Badlands.id(), 0);
        assert_eq!(Biome::Plains.id(), 39);
        assert_eq!(Biome::WoodedBadlands.id(), 63);
    }

    #[test]
    fn test_lossy_decode_falls_back_to_plains() {
        assert_eq!(Biome::from_id_lossy(200), Biome::Plains);
        assert_eq!(Biome::from_id_lossy(14), Biome::Desert);
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("desert".parse::<Biome>().unwrap(), Biome::Desert);
        assert_eq!(
            "minecraft:cherry_grove".parse::<Biome>().unwrap(),
            Biome::CherryGrove
        );
        assert_eq!("PLAINS".parse::<Biome>().unwrap(), Biome::Plains);
        assert!("custom".parse::<Biome>().is_err());
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&Biome::SoulSandValley).unwrap();
        assert_eq!(json, "\"soul_sand_valley\"");
        let back: Biome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Biome::SoulSandValley);
    }
}
