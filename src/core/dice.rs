//! Dice profiles: the five supported dice combinations and their bias tables.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::schema::hex::Edge;

/// A single polyhedral die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Die {
    D4,
    D6,
    D8,
}

impl Die {
    pub fn sides(&self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
        }
    }

    /// Parse `"d4"`, `"d6"` or `"d8"` (case-insensitive).
    pub fn parse(input: &str) -> Option<Die> {
        match input.trim().to_ascii_lowercase().as_str() {
            "d4" => Some(Self::D4),
            "d6" => Some(Self::D6),
            "d8" => Some(Self::D8),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::D4 => "d4",
            Self::D6 => "d6",
            Self::D8 => "d8",
        }
    }
}

/// Where a roll sends the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    /// Try to cross this side of the current hex.
    Edge(Edge),
    /// The roll itself forbids moving this turn.
    NoMovement,
}

use self::Bias::{Edge as E, NoMovement};

const UNIFORM: &[(u32, Bias)] = &[
    (1, E(Edge::A)),
    (2, E(Edge::B)),
    (3, E(Edge::C)),
    (4, E(Edge::D)),
    (5, E(Edge::E)),
    (6, E(Edge::F)),
];

const NON_UNIFORM: &[(u32, Bias)] = &[
    (1, E(Edge::A)),
    (2, E(Edge::B)),
    (3, E(Edge::C)),
    (4, E(Edge::D)),
    (5, E(Edge::E)),
    (6, E(Edge::F)),
    (7, NoMovement),
    (8, NoMovement),
];

const STANDARD: &[(u32, Bias)] = &[
    (2, E(Edge::B)),
    (3, E(Edge::B)),
    (4, E(Edge::C)),
    (5, E(Edge::C)),
    (6, E(Edge::D)),
    (7, E(Edge::D)),
    (8, E(Edge::E)),
    (9, E(Edge::E)),
    (10, E(Edge::F)),
    (11, E(Edge::F)),
    (12, E(Edge::A)),
];

const SOUTH: &[(u32, Bias)] = &[
    (3, E(Edge::B)),
    (4, E(Edge::B)),
    (5, E(Edge::C)),
    (6, E(Edge::C)),
    (7, E(Edge::D)),
    (8, E(Edge::E)),
    (9, E(Edge::E)),
    (10, E(Edge::F)),
    (11, E(Edge::F)),
    (12, E(Edge::A)),
];

const SPECIAL: &[(u32, Bias)] = &[
    (2, E(Edge::A)),
    (3, E(Edge::B)),
    (4, E(Edge::B)),
    (5, E(Edge::C)),
    (6, E(Edge::C)),
    (7, E(Edge::D)),
    (8, E(Edge::D)),
    (9, NoMovement),
    (10, E(Edge::E)),
    (11, E(Edge::E)),
    (12, E(Edge::F)),
    (13, E(Edge::F)),
    (14, E(Edge::A)),
];

/// One of the five fixed dice configurations, each with its bias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiceProfile {
    /// 1d6, every side equally likely.
    Uniform,
    /// 1d8, 7 and 8 hold the walker in place.
    NonUniform,
    /// 2d6, drifts toward the lower sides.
    Standard,
    /// 3d4, a bell curve focused on the bottom side.
    South,
    /// d6+d8, wider spread with a single hold result.
    Special,
}

impl DiceProfile {
    pub const ALL: [DiceProfile; 5] = [
        Self::Uniform,
        Self::NonUniform,
        Self::Standard,
        Self::South,
        Self::Special,
    ];

    /// Match a declared set of dice, in any order, to its profile.
    pub fn from_dice(dice: &[Die]) -> Option<DiceProfile> {
        let mut sorted = dice.to_vec();
        sorted.sort();
        match sorted.as_slice() {
            [Die::D6] => Some(Self::Uniform),
            [Die::D8] => Some(Self::NonUniform),
            [Die::D6, Die::D6] => Some(Self::Standard),
            [Die::D4, Die::D4, Die::D4] => Some(Self::South),
            [Die::D6, Die::D8] => Some(Self::Special),
            _ => None,
        }
    }

    pub fn dice(&self) -> &'static [Die] {
        match self {
            Self::Uniform => &[Die::D6],
            Self::NonUniform => &[Die::D8],
            Self::Standard => &[Die::D6, Die::D6],
            Self::South => &[Die::D4, Die::D4, Die::D4],
            Self::Special => &[Die::D6, Die::D8],
        }
    }

    /// The roll-sum to bias mapping, ascending by sum.
    pub fn table(&self) -> &'static [(u32, Bias)] {
        match self {
            Self::Uniform => UNIFORM,
            Self::NonUniform => NON_UNIFORM,
            Self::Standard => STANDARD,
            Self::South => SOUTH,
            Self::Special => SPECIAL,
        }
    }

    pub fn bias(&self, roll: u32) -> Option<Bias> {
        self.table()
            .iter()
            .find(|(sum, _)| *sum == roll)
            .map(|(_, bias)| *bias)
    }

    /// Every sum the declared dice can produce.
    pub fn attainable_sums(&self) -> BTreeSet<u32> {
        let mut sums = BTreeSet::from([0u32]);
        for die in self.dice() {
            sums = sums
                .iter()
                .flat_map(|sum| (1..=die.sides()).map(move |face| sum + face))
                .collect();
        }
        sums
    }

    /// True when the bias table covers exactly the attainable sums.
    pub fn table_matches_dice(&self) -> bool {
        let keys: BTreeSet<u32> = self.table().iter().map(|(sum, _)| *sum).collect();
        keys.len() == self.table().len() && keys == self.attainable_sums()
    }

    /// Roll every declared die and return the sum.
    pub fn roll<S: RollSource + ?Sized>(&self, source: &mut S) -> u32 {
        self.dice().iter().map(|die| source.roll(*die)).sum()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::NonUniform => "non-uniform",
            Self::Standard => "standard",
            Self::South => "south",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for DiceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dice: Vec<&str> = self.dice().iter().map(Die::name).collect();
        write!(f, "{} ({})", self.name(), dice.join("+"))
    }
}

/// Source of randomness for walks: dice faces and uniform picks.
///
/// Every `rand::Rng` is a `RollSource`; `ScriptedRolls` replays fixed faces.
pub trait RollSource {
    /// A face of `die`, in `1..=die.sides()`.
    fn roll(&mut self, die: Die) -> u32;
    /// An index in `0..len`. `len` is never zero.
    fn choose(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> RollSource for R {
    fn roll(&mut self, die: Die) -> u32 {
        self.gen_range(1..=die.sides())
    }

    fn choose(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Replays a fixed cycle of die faces, e.g. dice rolled at the table.
///
/// Faces larger than the die wrap around, so a 7 on a d6 reads as a 1.
/// `choose` consumes a face too and maps it onto `0..len` the same way.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    faces: Vec<u32>,
    position: usize,
}

impl ScriptedRolls {
    pub fn new(faces: Vec<u32>) -> Self {
        Self { faces, position: 0 }
    }

    /// Every die always shows `face`.
    pub fn always(face: u32) -> Self {
        Self::new(vec![face])
    }

    fn next_face(&mut self) -> u32 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.position % self.faces.len()];
        self.position += 1;
        face.max(1)
    }
}

impl RollSource for ScriptedRolls {
    fn roll(&mut self, die: Die) -> u32 {
        (self.next_face() - 1) % die.sides() + 1
    }

    fn choose(&mut self, len: usize) -> usize {
        (self.next_face() as usize - 1) % len.max(1)
    }
}
