//! Six-line structures and the pure transforms over them.
//!
//! Positions are 1-based when exposed (1 = bottom line, 6 = top line) and
//! 0-based internally. Every transform is deterministic and allocation-free
//! apart from `line_diff`.

use crate::error::{DiagnosticsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const LINE_COUNT: usize = 6;

/// Six binary lines, index 0 = bottom. 0 = yielding (yin), 1 = firm (yang).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct HexagramLines([u8; LINE_COUNT]);

impl HexagramLines {
    pub fn new(lines: [u8; LINE_COUNT]) -> Result<Self> {
        if let Some(bad) = lines.iter().find(|l| **l > 1) {
            return Err(DiagnosticsError::Internal {
                message: format!("line value {bad} is not binary"),
            });
        }
        Ok(Self(lines))
    }

    /// Compose from two 3-line trigrams, each given bottom-up.
    pub fn from_trigrams(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self([
            lower[0] & 1,
            lower[1] & 1,
            lower[2] & 1,
            upper[0] & 1,
            upper[1] & 1,
            upper[2] & 1,
        ])
    }

    /// Bit i of `bits` is line i (bottom = bit 0). Bits above 5 are ignored.
    pub fn from_bits(bits: u8) -> Self {
        let mut lines = [0u8; LINE_COUNT];
        for (i, line) in lines.iter_mut().enumerate() {
            *line = (bits >> i) & 1;
        }
        Self(lines)
    }

    pub fn bits(&self) -> u8 {
        self.0
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, l)| acc | (l << i))
    }

    pub fn as_array(&self) -> [u8; LINE_COUNT] {
        self.0
    }

    /// Line at a 1-based position.
    pub fn at(&self, position: usize) -> Option<u8> {
        if (1..=LINE_COUNT).contains(&position) {
            Some(self.0[position - 1])
        } else {
            None
        }
    }

    pub fn lower(&self) -> [u8; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub fn upper(&self) -> [u8; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }

    pub fn yang_count(&self) -> usize {
        self.0.iter().filter(|l| **l == 1).count()
    }
}

impl TryFrom<Vec<u8>> for HexagramLines {
    type Error = DiagnosticsError;

    fn try_from(value: Vec<u8>) -> Result<Self> {
        let arr: [u8; LINE_COUNT] =
            value
                .try_into()
                .map_err(|v: Vec<u8>| DiagnosticsError::Internal {
                    message: format!("expected {LINE_COUNT} lines, got {}", v.len()),
                })?;
        Self::new(arr)
    }
}

impl From<HexagramLines> for Vec<u8> {
    fn from(lines: HexagramLines) -> Self {
        lines.0.to_vec()
    }
}

impl fmt::Display for HexagramLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for l in self.0 {
            write!(f, "{l}")?;
        }
        Ok(())
    }
}

/// Hidden hexagram: positions 2-3-4 form the new lower trigram, 3-4-5 the new
/// upper one. Applying it repeatedly is not idempotent (63 and 64 map onto
/// each other), so callers must not assume a fixed point.
pub fn nuclear(lines: &HexagramLines) -> HexagramLines {
    let l = lines.0;
    HexagramLines([l[1], l[2], l[3], l[2], l[3], l[4]])
}

/// Every line flipped. Involution.
pub fn inverted(lines: &HexagramLines) -> HexagramLines {
    let mut out = lines.0;
    for l in out.iter_mut() {
        *l ^= 1;
    }
    HexagramLines(out)
}

/// Line order reversed (the figure seen from the other side). Involution.
pub fn flipped(lines: &HexagramLines) -> HexagramLines {
    let mut out = lines.0;
    out.reverse();
    HexagramLines(out)
}

/// 1-based positions where `a` and `b` differ, ascending.
pub fn line_diff(a: &HexagramLines, b: &HexagramLines) -> Vec<usize> {
    a.0.iter()
        .zip(b.0.iter())
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(i, _)| i + 1)
        .collect()
}

/// Toggle the given 1-based positions. Out-of-range positions are ignored.
pub fn changing(lines: &HexagramLines, positions: &[usize]) -> HexagramLines {
    let mut out = lines.0;
    for &p in positions {
        if (1..=LINE_COUNT).contains(&p) {
            out[p - 1] ^= 1;
        }
    }
    HexagramLines(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_lines() -> impl Iterator<Item = HexagramLines> {
        (0u8..64).map(HexagramLines::from_bits)
    }

    #[test]
    fn inverted_and_flipped_are_involutions() {
        for x in all_lines() {
            assert_eq!(inverted(&inverted(&x)), x);
            assert_eq!(flipped(&flipped(&x)), x);
        }
    }

    #[test]
    fn bits_round_trip_over_full_space() {
        for bits in 0u8..64 {
            assert_eq!(HexagramLines::from_bits(bits).bits(), bits);
        }
    }

    #[test]
    fn nuclear_uses_inner_positions() {
        let x = HexagramLines::new([1, 0, 1, 0, 1, 0]).unwrap();
        assert_eq!(nuclear(&x).as_array(), [0, 1, 0, 1, 0, 1]);
        // applying twice swings back instead of settling
        assert_eq!(nuclear(&nuclear(&x)), x);
        assert_ne!(nuclear(&nuclear(&x)), nuclear(&x));
    }

    #[test]
    fn line_diff_reports_one_based_positions() {
        let a = HexagramLines::new([1, 1, 1, 1, 1, 1]).unwrap();
        let b = HexagramLines::new([1, 1, 1, 0, 0, 0]).unwrap();
        assert_eq!(line_diff(&a, &b), vec![4, 5, 6]);
        assert!(line_diff(&a, &a).is_empty());
        assert_eq!(changing(&a, &[4, 5, 6]), b);
    }

    #[test]
    fn rejects_non_binary_and_wrong_length() {
        assert!(HexagramLines::new([0, 1, 2, 0, 0, 0]).is_err());
        assert!(HexagramLines::try_from(vec![1, 0, 1]).is_err());
        let parsed: std::result::Result<HexagramLines, _> = serde_json::from_str("[1,0,1,0,1,0]");
        assert_eq!(parsed.unwrap().to_string(), "101010");
        assert!(serde_json::from_str::<HexagramLines>("[1,0,1,0,1,3]").is_err());
    }

    #[test]
    fn trigram_halves() {
        let x = HexagramLines::from_trigrams([1, 0, 0], [0, 1, 0]);
        assert_eq!(x.as_array(), [1, 0, 0, 0, 1, 0]);
        assert_eq!(x.lower(), [1, 0, 0]);
        assert_eq!(x.upper(), [0, 1, 0]);
        assert_eq!(x.at(5), Some(1));
        assert_eq!(x.at(0), None);
        assert_eq!(x.yang_count(), 2);
    }
}
