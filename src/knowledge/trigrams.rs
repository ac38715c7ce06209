//! The eight trigrams and the attribute vocabularies keyed by them.

use serde::Serialize;

pub type TrigramId = u32;

/// Five phases. Ordered along the generating cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

/// How `self` stands toward another element on the fixed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementRelation {
    Kindred,
    Generates,
    GeneratedBy,
    Controls,
    ControlledBy,
}

impl ElementRelation {
    pub fn is_generative(self) -> bool {
        matches!(self, ElementRelation::Generates | ElementRelation::GeneratedBy)
    }

    pub fn is_destructive(self) -> bool {
        matches!(self, ElementRelation::Controls | ElementRelation::ControlledBy)
    }
}

impl Element {
    const CYCLE: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Wood→fire→earth→metal→water→wood.
    pub fn generates(self) -> Element {
        Self::CYCLE[(self.index() + 1) % 5]
    }

    /// Wood→earth→water→fire→metal→wood.
    pub fn controls(self) -> Element {
        Self::CYCLE[(self.index() + 2) % 5]
    }

    /// Total over all pairs: two distinct phases on a five-cycle are always
    /// one or two steps apart in one direction.
    pub fn relation_to(self, other: Element) -> ElementRelation {
        if self == other {
            ElementRelation::Kindred
        } else if self.generates() == other {
            ElementRelation::Generates
        } else if other.generates() == self {
            ElementRelation::GeneratedBy
        } else if self.controls() == other {
            ElementRelation::Controls
        } else {
            ElementRelation::ControlledBy
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FamilyRole {
    Father,
    Mother,
    EldestSon,
    MiddleSon,
    YoungestSon,
    EldestDaughter,
    MiddleDaughter,
    YoungestDaughter,
}

impl FamilyRole {
    /// Seniority within the household; parents rank highest.
    pub fn rank(self) -> u8 {
        match self {
            FamilyRole::Father | FamilyRole::Mother => 4,
            FamilyRole::EldestSon | FamilyRole::EldestDaughter => 3,
            FamilyRole::MiddleSon | FamilyRole::MiddleDaughter => 2,
            FamilyRole::YoungestSon | FamilyRole::YoungestDaughter => 1,
        }
    }

    pub fn is_eldest(self) -> bool {
        matches!(self, FamilyRole::EldestSon | FamilyRole::EldestDaughter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn opposite(self) -> Season {
        match self {
            Season::Spring => Season::Autumn,
            Season::Summer => Season::Winter,
            Season::Autumn => Season::Spring,
            Season::Winter => Season::Summer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

/// Movement of energy a trigram expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Rising,
    Expressing,
    Radiating,
    Vibrating,
    Penetrating,
    Descending,
    Resting,
    Receiving,
}

/// Outward trigrams are ids 1..=4, inward ones 5..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Outward,
    Inward,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigram {
    pub id: TrigramId,
    pub name: &'static str,
    pub symbol: &'static str,
    pub nature: &'static str,
    pub attribute: &'static str,
    /// Bottom-up.
    pub lines: [u8; 3],
    pub element: Element,
    pub family: FamilyRole,
    pub season: Season,
    pub flow: Flow,
    pub direction: &'static str,
    pub animal: &'static str,
    pub virtue: &'static str,
    pub virtue_weight: f64,
    pub outwardness: f64,
    pub mobility: f64,
    pub speed: f64,
    pub capacity: f64,
    pub stability: f64,
    pub sacred: bool,
    pub intuitive: bool,
}

impl Trigram {
    pub fn orientation(&self) -> Orientation {
        if self.id <= 4 {
            Orientation::Outward
        } else {
            Orientation::Inward
        }
    }
}

pub(crate) fn canonical_trigrams() -> [Trigram; 8] {
    [
        Trigram {
            id: 1,
            name: "Qian",
            symbol: "乾",
            nature: "heaven",
            attribute: "creative",
            lines: [1, 1, 1],
            element: Element::Metal,
            family: FamilyRole::Father,
            season: Season::Autumn,
            flow: Flow::Rising,
            direction: "northwest",
            animal: "horse",
            virtue: "strength",
            virtue_weight: 0.9,
            outwardness: 0.9,
            mobility: 0.9,
            speed: 0.9,
            capacity: 0.3,
            stability: 0.9,
            sacred: true,
            intuitive: false,
        },
        Trigram {
            id: 2,
            name: "Dui",
            symbol: "兌",
            nature: "lake",
            attribute: "joyous",
            lines: [1, 1, 0],
            element: Element::Metal,
            family: FamilyRole::YoungestDaughter,
            season: Season::Summer,
            flow: Flow::Expressing,
            direction: "west",
            animal: "sheep",
            virtue: "joy",
            virtue_weight: 0.6,
            outwardness: 0.7,
            mobility: 0.7,
            speed: 0.7,
            capacity: 0.7,
            stability: 0.6,
            sacred: false,
            intuitive: false,
        },
        Trigram {
            id: 3,
            name: "Li",
            symbol: "離",
            nature: "fire",
            attribute: "clinging",
            lines: [1, 0, 1],
            element: Element::Fire,
            family: FamilyRole::MiddleDaughter,
            season: Season::Summer,
            flow: Flow::Radiating,
            direction: "south",
            animal: "pheasant",
            virtue: "clarity",
            virtue_weight: 0.8,
            outwardness: 0.8,
            mobility: 0.8,
            speed: 0.8,
            capacity: 0.5,
            stability: 0.5,
            sacred: false,
            intuitive: true,
        },
        Trigram {
            id: 4,
            name: "Zhen",
            symbol: "震",
            nature: "thunder",
            attribute: "arousing",
            lines: [1, 0, 0],
            element: Element::Wood,
            family: FamilyRole::EldestSon,
            season: Season::Spring,
            flow: Flow::Vibrating,
            direction: "east",
            animal: "dragon",
            virtue: "initiative",
            virtue_weight: 0.6,
            outwardness: 0.6,
            mobility: 0.9,
            speed: 0.9,
            capacity: 0.4,
            stability: 0.4,
            sacred: false,
            intuitive: false,
        },
        Trigram {
            id: 5,
            name: "Xun",
            symbol: "巽",
            nature: "wind",
            attribute: "gentle",
            lines: [0, 1, 1],
            element: Element::Wood,
            family: FamilyRole::EldestDaughter,
            season: Season::Spring,
            flow: Flow::Penetrating,
            direction: "southeast",
            animal: "rooster",
            virtue: "gentleness",
            virtue_weight: 0.7,
            outwardness: 0.4,
            mobility: 0.6,
            speed: 0.6,
            capacity: 0.6,
            stability: 0.5,
            sacred: false,
            intuitive: false,
        },
        Trigram {
            id: 6,
            name: "Kan",
            symbol: "坎",
            nature: "water",
            attribute: "abysmal",
            lines: [0, 1, 0],
            element: Element::Water,
            family: FamilyRole::MiddleSon,
            season: Season::Winter,
            flow: Flow::Descending,
            direction: "north",
            animal: "pig",
            virtue: "sincerity",
            virtue_weight: 0.65,
            outwardness: 0.3,
            mobility: 0.4,
            speed: 0.5,
            capacity: 0.8,
            stability: 0.7,
            sacred: true,
            intuitive: true,
        },
        Trigram {
            id: 7,
            name: "Gen",
            symbol: "艮",
            nature: "mountain",
            attribute: "keeping still",
            lines: [0, 0, 1],
            element: Element::Earth,
            family: FamilyRole::YoungestSon,
            season: Season::Autumn,
            flow: Flow::Resting,
            direction: "northeast",
            animal: "dog",
            virtue: "restraint",
            virtue_weight: 0.75,
            outwardness: 0.2,
            mobility: 0.2,
            speed: 0.2,
            capacity: 0.7,
            stability: 0.9,
            sacred: false,
            intuitive: false,
        },
        Trigram {
            id: 8,
            name: "Kun",
            symbol: "坤",
            nature: "earth",
            attribute: "receptive",
            lines: [0, 0, 0],
            element: Element::Earth,
            family: FamilyRole::Mother,
            season: Season::Winter,
            flow: Flow::Receiving,
            direction: "southwest",
            animal: "ox",
            virtue: "devotion",
            virtue_weight: 0.85,
            outwardness: 0.1,
            mobility: 0.3,
            speed: 0.3,
            capacity: 0.9,
            stability: 0.9,
            sacred: true,
            intuitive: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_relations_cover_every_pair() {
        for a in Element::CYCLE {
            for b in Element::CYCLE {
                let rel = a.relation_to(b);
                if a == b {
                    assert_eq!(rel, ElementRelation::Kindred);
                } else {
                    assert!(rel.is_generative() ^ rel.is_destructive());
                }
            }
        }
    }

    #[test]
    fn earth_nourishes_metal() {
        assert_eq!(Element::Earth.generates(), Element::Metal);
        assert_eq!(
            Element::Metal.relation_to(Element::Earth),
            ElementRelation::GeneratedBy
        );
        assert_eq!(Element::Metal.controls(), Element::Wood);
        assert_eq!(
            Element::Wood.relation_to(Element::Metal),
            ElementRelation::ControlledBy
        );
    }

    #[test]
    fn trigram_lines_are_distinct() {
        let trigrams = canonical_trigrams();
        let mut seen = std::collections::HashSet::new();
        for t in &trigrams {
            assert!(seen.insert(t.lines), "duplicate lines for {}", t.name);
        }
        assert_eq!(trigrams[0].orientation(), Orientation::Outward);
        assert_eq!(trigrams[7].orientation(), Orientation::Inward);
    }
}
