//! Immutable hexagram and trigram repository.
//!
//! Built once from static tables and shared by `Arc`. Lookups outside the
//! valid id ranges fail with `LookupMiss`; callers that must keep going use
//! the `*_or_default` variants, which fall back to id 1.

pub mod hexagrams;
pub mod trigrams;

pub use hexagrams::{FortuneClass, Hexagram, HexagramId, SeasonConfidence, SeasonInfo};
pub use trigrams::{
    Element, ElementRelation, FamilyRole, Flow, Orientation, Season, Trigram, TrigramId,
};

use crate::error::{DiagnosticsError, Result};
use crate::transform::HexagramLines;
use once_cell::sync::Lazy;
use std::sync::Arc;

pub const HEXAGRAM_COUNT: usize = 64;
pub const TRIGRAM_COUNT: usize = 8;
pub const DEFAULT_HEXAGRAM: HexagramId = 1;
pub const DEFAULT_TRIGRAM: TrigramId = 1;

static SHARED: Lazy<Arc<KnowledgeBase>> = Lazy::new(|| Arc::new(KnowledgeBase::canonical()));

#[derive(Debug)]
pub struct KnowledgeBase {
    trigrams: [Trigram; TRIGRAM_COUNT],
    hexagrams: Vec<Hexagram>,
    /// Line bits → hexagram id.
    by_bits: [HexagramId; HEXAGRAM_COUNT],
}

impl KnowledgeBase {
    /// Build from the static tables, verifying that trigram pairs are valid
    /// and that the 64 line patterns are pairwise distinct.
    pub fn try_build() -> Result<Self> {
        let trigrams = trigrams::canonical_trigrams();
        let mut by_bits = [0 as HexagramId; HEXAGRAM_COUNT];
        let mut list = Vec::with_capacity(HEXAGRAM_COUNT);

        for (idx, entry) in hexagrams::ENTRIES.iter().enumerate() {
            if entry.id as usize != idx + 1 {
                return Err(DiagnosticsError::Internal {
                    message: format!("hexagram table out of order at {}", entry.id),
                });
            }
            let upper = trigram_in(&trigrams, entry.upper)?;
            let lower = trigram_in(&trigrams, entry.lower)?;
            let lines = HexagramLines::from_trigrams(lower.lines, upper.lines);
            let slot = &mut by_bits[lines.bits() as usize];
            if *slot != 0 {
                return Err(DiagnosticsError::Internal {
                    message: format!("hexagrams {} and {} share lines {}", slot, entry.id, lines),
                });
            }
            *slot = entry.id;

            list.push(Hexagram {
                id: entry.id,
                name: entry.name,
                symbol: entry.symbol,
                upper_trigram: entry.upper,
                lower_trigram: entry.lower,
                lines,
                theme: entry.theme,
                keywords: entry.keywords,
                fortune: entry.fortune,
                season: season_for(entry.id, upper, lower),
            });
        }

        Ok(Self {
            trigrams,
            hexagrams: list,
            by_bits,
        })
    }

    /// The canonical tables. They are verified by `try_build` in tests, so a
    /// failure here is a defect in the static data.
    pub fn canonical() -> Self {
        match Self::try_build() {
            Ok(kb) => kb,
            Err(e) => panic!("static hexagram tables are inconsistent: {e}"),
        }
    }

    /// Process-wide instance, built on first use.
    pub fn shared() -> Arc<KnowledgeBase> {
        Arc::clone(&SHARED)
    }

    pub fn hexagram(&self, id: HexagramId) -> Result<&Hexagram> {
        id.checked_sub(1)
            .and_then(|i| self.hexagrams.get(i as usize))
            .ok_or(DiagnosticsError::LookupMiss {
                kind: "hexagram",
                id,
            })
    }

    pub fn trigram(&self, id: TrigramId) -> Result<&Trigram> {
        trigram_in(&self.trigrams, id)
    }

    pub fn hexagram_lines(&self, id: HexagramId) -> Result<HexagramLines> {
        self.hexagram(id).map(|h| h.lines)
    }

    /// Hexagram 1 when `id` is out of range.
    pub fn hexagram_or_default(&self, id: HexagramId) -> &Hexagram {
        match self.hexagram(id) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!("{}; substituting hexagram {}", e, DEFAULT_HEXAGRAM);
                &self.hexagrams[0]
            }
        }
    }

    /// Trigram 1 when `id` is out of range.
    pub fn trigram_or_default(&self, id: TrigramId) -> &Trigram {
        match self.trigram(id) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("{}; substituting trigram {}", e, DEFAULT_TRIGRAM);
                &self.trigrams[0]
            }
        }
    }

    /// Reverse lookup. Total: every 6-bit pattern is one of the 64 hexagrams.
    pub fn resolve(&self, lines: &HexagramLines) -> HexagramId {
        self.by_bits[lines.bits() as usize]
    }

    pub fn resolve_hexagram(&self, lines: &HexagramLines) -> &Hexagram {
        self.hexagram_or_default(self.resolve(lines))
    }

    pub fn hexagrams(&self) -> impl Iterator<Item = &Hexagram> {
        self.hexagrams.iter()
    }

    pub fn trigrams(&self) -> impl Iterator<Item = &Trigram> {
        self.trigrams.iter()
    }

    pub fn upper_of(&self, hexagram: &Hexagram) -> &Trigram {
        self.trigram_or_default(hexagram.upper_trigram)
    }

    pub fn lower_of(&self, hexagram: &Hexagram) -> &Trigram {
        self.trigram_or_default(hexagram.lower_trigram)
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::canonical()
    }
}

fn trigram_in(trigrams: &[Trigram; TRIGRAM_COUNT], id: TrigramId) -> Result<&Trigram> {
    id.checked_sub(1)
        .and_then(|i| trigrams.get(i as usize))
        .ok_or(DiagnosticsError::LookupMiss {
            kind: "trigram",
            id,
        })
}

/// Sovereign hexagrams carry their own season; the rest take the upper
/// trigram's, with high confidence only when both trigrams agree.
fn season_for(id: HexagramId, upper: &Trigram, lower: &Trigram) -> SeasonInfo {
    if let Some((_, month, season)) = hexagrams::SOVEREIGN.iter().find(|(h, _, _)| *h == id) {
        return SeasonInfo {
            season: *season,
            confidence: SeasonConfidence::High,
            sovereign_month: Some(*month),
        };
    }
    let confidence = if upper.season == lower.season {
        SeasonConfidence::High
    } else {
        SeasonConfidence::Medium
    };
    SeasonInfo {
        season: upper.season,
        confidence,
        sovereign_month: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_tables_are_consistent() {
        let kb = KnowledgeBase::try_build().unwrap();
        assert_eq!(kb.hexagrams().count(), HEXAGRAM_COUNT);
        assert_eq!(kb.trigrams().count(), TRIGRAM_COUNT);
    }

    #[test]
    fn resolve_inverts_lines_for_every_id() {
        let kb = KnowledgeBase::canonical();
        for id in 1..=64 {
            let lines = kb.hexagram_lines(id).unwrap();
            assert_eq!(kb.resolve(&lines), id);
        }
        for bits in 0u8..64 {
            let id = kb.resolve(&HexagramLines::from_bits(bits));
            assert!((1..=64).contains(&id));
        }
    }

    #[test]
    fn lines_encode_trigram_pair() {
        let kb = KnowledgeBase::canonical();
        for h in kb.hexagrams() {
            assert_eq!(h.lines.upper(), kb.trigram(h.upper_trigram).unwrap().lines);
            assert_eq!(h.lines.lower(), kb.trigram(h.lower_trigram).unwrap().lines);
        }
        // Peace: earth above heaven
        assert_eq!(kb.hexagram_lines(11).unwrap().as_array(), [1, 1, 1, 0, 0, 0]);
        assert_eq!(kb.hexagram_lines(63).unwrap().as_array(), [1, 0, 1, 0, 1, 0]);
    }

    #[test]
    fn lookup_misses_and_defaults() {
        let kb = KnowledgeBase::canonical();
        assert!(matches!(
            kb.hexagram(0),
            Err(DiagnosticsError::LookupMiss { kind: "hexagram", id: 0 })
        ));
        assert!(kb.hexagram(65).is_err());
        assert!(kb.trigram(9).is_err());
        assert_eq!(kb.hexagram_or_default(300).id, 1);
        assert_eq!(kb.trigram_or_default(0).id, 1);
    }

    #[test]
    fn seasons_follow_sovereign_table_then_upper_trigram() {
        let kb = KnowledgeBase::canonical();
        let peace = kb.hexagram(11).unwrap();
        assert_eq!(peace.season.season, Season::Spring);
        assert_eq!(peace.season.sovereign_month, Some(2));

        // Difficulty at the Beginning: water over thunder
        let zhun = kb.hexagram(3).unwrap();
        assert_eq!(zhun.season.season, Season::Winter);
        assert_eq!(zhun.season.confidence, SeasonConfidence::Medium);

        let kan = kb.hexagram(29).unwrap();
        assert_eq!(kan.season.confidence, SeasonConfidence::High);
    }

    #[test]
    fn shared_instance_is_reused() {
        let a = KnowledgeBase::shared();
        let b = KnowledgeBase::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
