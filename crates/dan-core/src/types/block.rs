//! Block property words.
//!
//! A block can carry up to fifteen properties. Each property is packed into a
//! 16-bit word: the high nibble selects the property type and the low twelve
//! bits hold its value.

use serde::{Deserialize, Serialize};

const TYPE_SHIFT: u16 = 12;
const DATA_MASK: u16 = 0x0FFF;

/// A single block state property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BlockProperty {
    Orientation(Axis),
    Age(u8),
    SnowLayers(u8),
    LiquidLevel(u8),
    Half(Half),
    Facing(Direction),
    Waterlogged(bool),
    Rotation(Direction),
    MultipleFacing(FaceSet),
    Open(bool),
    RailShape(RailShape),
    StairShape(StairShape),
    Attached(bool),
    Hinge(Side),
    Farmland(u8),
}

impl BlockProperty {
    /// Property type stored in the high nibble
    pub fn type_id(&self) -> u8 {
        match self {
            BlockProperty::Orientation(_) => 0,
            BlockProperty::Age(_) => 1,
            BlockProperty::SnowLayers(_) => 2,
            BlockProperty::LiquidLevel(_) => 3,
            BlockProperty::Half(_) => 4,
            BlockProperty::Facing(_) => 5,
            BlockProperty::Waterlogged(_) => 6,
            BlockProperty::Rotation(_) => 7,
            BlockProperty::MultipleFacing(_) => 8,
            BlockProperty::Open(_) => 9,
            BlockProperty::RailShape(_) => 10,
            BlockProperty::StairShape(_) => 11,
            BlockProperty::Attached(_) => 12,
            BlockProperty::Hinge(_) => 13,
            BlockProperty::Farmland(_) => 14,
        }
    }

    /// Pack into a property word
    pub fn encode(&self) -> u16 {
        let data: u16 = match self {
            BlockProperty::Orientation(axis) => axis.id() as u16,
            BlockProperty::Age(v)
            | BlockProperty::SnowLayers(v)
            | BlockProperty::LiquidLevel(v)
            | BlockProperty::Farmland(v) => *v as u16,
            BlockProperty::Half(half) => half.id() as u16,
            BlockProperty::Facing(dir) | BlockProperty::Rotation(dir) => dir.id() as u16,
            BlockProperty::Waterlogged(b) | BlockProperty::Open(b) | BlockProperty::Attached(b) => {
                *b as u16
            },
            BlockProperty::MultipleFacing(faces) => faces.bits() as u16,
            BlockProperty::RailShape(shape) => shape.id() as u16,
            BlockProperty::StairShape(shape) => shape.id() as u16,
            BlockProperty::Hinge(side) => side.id() as u16,
        };

        ((self.type_id() as u16) << TYPE_SHIFT) | (data & DATA_MASK)
    }

    /// Unpack a property word, `None` for unassigned property types
    pub fn decode(word: u16) -> Option<Self> {
        let data = word & DATA_MASK;
        let byte = (data & 0xFF) as u8;
        let flag = data & 1 == 1;

        Some(match word >> TYPE_SHIFT {
            0 => BlockProperty::Orientation(Axis::from_id(data)),
            1 => BlockProperty::Age(byte),
            2 => BlockProperty::SnowLayers(byte),
            3 => BlockProperty::LiquidLevel(byte),
            4 => BlockProperty::Half(if flag { Half::Bottom } else { Half::Top }),
            5 => BlockProperty::Facing(Direction::from_id(data)),
            6 => BlockProperty::Waterlogged(flag),
            7 => BlockProperty::Rotation(Direction::from_id(data)),
            8 => BlockProperty::MultipleFacing(FaceSet::from_bits(byte)),
            9 => BlockProperty::Open(flag),
            10 => BlockProperty::RailShape(RailShape::from_id(data)),
            11 => BlockProperty::StairShape(StairShape::from_id(data)),
            12 => BlockProperty::Attached(flag),
            13 => BlockProperty::Hinge(if flag { Side::Right } else { Side::Left }),
            14 => BlockProperty::Farmland(byte),
            _ => return None,
        })
    }
}

/// Axis of an orientable block (logs, pillars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn id(self) -> u8 {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    fn from_id(bits: u16) -> Self {
        match bits & 0b11 {
            0 => Axis::X,
            2 => Axis::Z,
            _ => Axis::Y,
        }
    }
}

/// Upper or lower half of a two-block structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub fn id(self) -> u8 {
        match self {
            Half::Top => 0,
            Half::Bottom => 1,
        }
    }
}

/// Door hinge side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn id(self) -> u8 {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Facing or rotation, including the sixteen-point compass directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    East,
    EastNorthEast,
    EastSouthEast,
    North,
    NorthEast,
    NorthNorthEast,
    NorthNorthWest,
    NorthWest,
    South,
    SouthEast,
    SouthSouthEast,
    SouthSouthWest,
    SouthWest,
    Up,
    West,
    WestNorthWest,
    WestSouthWest,
}

impl Direction {
    const ALL: [Direction; 18] = [
        Direction::Down,
        Direction::East,
        Direction::EastNorthEast,
        Direction::EastSouthEast,
        Direction::North,
        Direction::NorthEast,
        Direction::NorthNorthEast,
        Direction::NorthNorthWest,
        Direction::NorthWest,
        Direction::South,
        Direction::SouthEast,
        Direction::SouthSouthEast,
        Direction::SouthSouthWest,
        Direction::SouthWest,
        Direction::Up,
        Direction::West,
        Direction::WestNorthWest,
        Direction::WestSouthWest,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Unknown ids fall back to north
    fn from_id(bits: u16) -> Self {
        Self::ALL
            .get((bits & 0b1_1111) as usize)
            .copied()
            .unwrap_or(Direction::North)
    }
}

/// One of the six faces a connecting block can attach to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Face {
    const ALL: [Face; 6] = [
        Face::North,
        Face::South,
        Face::East,
        Face::West,
        Face::Up,
        Face::Down,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of faces for fences, vines, glass panes and similar blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Face>", into = "Vec<Face>")]
pub struct FaceSet(u8);

impl FaceSet {
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b11_1111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn insert(&mut self, face: Face) {
        self.0 |= face.bit();
    }

    pub fn contains(self, face: Face) -> bool {
        self.0 & face.bit() != 0
    }

    /// Faces in wire bit order
    pub fn iter(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<Vec<Face>> for FaceSet {
    fn from(faces: Vec<Face>) -> Self {
        faces.into_iter().fold(FaceSet::default(), |mut set, face| {
            set.insert(face);
            set
        })
    }
}

impl From<FaceSet> for Vec<Face> {
    fn from(set: FaceSet) -> Self {
        set.iter().collect()
    }
}

/// Rail track shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RailShape {
    AscendingEast,
    AscendingNorth,
    AscendingSouth,
    AscendingWest,
    EastWest,
    NorthEast,
    NorthSouth,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl RailShape {
    const ALL: [RailShape; 10] = [
        RailShape::AscendingEast,
        RailShape::AscendingNorth,
        RailShape::AscendingSouth,
        RailShape::AscendingWest,
        RailShape::EastWest,
        RailShape::NorthEast,
        RailShape::NorthSouth,
        RailShape::NorthWest,
        RailShape::SouthEast,
        RailShape::SouthWest,
    ];

    /// Ids start at 1; 0 is never written
    pub fn id(self) -> u8 {
        self as u8 + 1
    }

    fn from_id(bits: u16) -> Self {
        match (bits & 0b1111) as usize {
            id @ 1..=10 => Self::ALL[id - 1],
            _ => RailShape::EastWest,
        }
    }
}

/// Stair corner shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StairShape {
    InnerLeft,
    InnerRight,
    OuterLeft,
    OuterRight,
    Straight,
}

impl StairShape {
    pub fn id(self) -> u8 {
        self as u8
    }

    fn from_id(bits: u16) -> Self {
        match bits & 0b111 {
            0 => StairShape::InnerLeft,
            1 => StairShape::InnerRight,
            2 => StairShape::OuterLeft,
            3 => StairShape::OuterRight,
            _ => StairShape::Straight,
        }
    }
}
