use std::fmt;

/// Edge colour of a piece
pub type Color = u32;

/// Side of a square piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Border {
    North,
    East,
    South,
    West,
}

/// Clockwise quarter turns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rotation {
    Plus0,
    Plus90,
    Plus180,
    Plus270,
}

impl Border {
    pub const ALL: [Border; 4] = [Border::North, Border::East, Border::South, Border::West];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::Plus0, Rotation::Plus90, Rotation::Plus180, Rotation::Plus270];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Rotation> {
        Rotation::ALL.get(index).copied()
    }
}

/// A square tile with a colour on each side.
///
/// `id` is the position of the piece in the set it belongs to; rotated
/// copies keep the id of the original.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: usize,
    pub north: Color,
    pub east: Color,
    pub south: Color,
    pub west: Color,
}

impl Piece {
    pub fn new(id: usize, north: Color, east: Color, south: Color, west: Color) -> Piece {
        Piece{id, north, east, south, west}
    }

    pub fn color_to(&self, border: Border) -> Color {
        match border {
            Border::North => self.north,
            Border::East => self.east,
            Border::South => self.south,
            Border::West => self.west,
        }
    }

    /// The piece turned clockwise: after a quarter turn the former west side
    /// faces north
    pub fn rotate(&self, rotation: Rotation) -> Piece {
        let Piece{id, north, east, south, west} = *self;
        match rotation {
            Rotation::Plus0 => *self,
            Rotation::Plus90 => Piece::new(id, west, north, east, south),
            Rotation::Plus180 => Piece::new(id, south, west, north, east),
            Rotation::Plus270 => Piece::new(id, east, south, west, north),
        }
    }

    /// The smallest rotation turning this piece into `other`, `None` if
    /// `other` is a different piece
    pub fn rotation_to(&self, other: &Piece) -> Option<Rotation> {
        if other.id != self.id {
            return None;
        }
        Rotation::ALL.iter()
            .copied()
            .find(|&rotation| self.rotate(rotation) == *other)
    }

    pub fn colors(&self) -> [Color; 4] {
        [self.north, self.east, self.south, self.west]
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}({} {} {} {})", self.id, self.north, self.east, self.south, self.west)
    }
}
