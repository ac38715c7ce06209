//! The 64 hexagrams in received order, stored as trigram pairs.

use super::trigrams::{Season, TrigramId};
use crate::transform::HexagramLines;
use serde::Serialize;

pub type HexagramId = u32;

/// Fortune classification of a hexagram's judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FortuneClass {
    Auspicious,
    Prosperous,
    Favorable,
    Steadfast,
    Neutral,
    Regret,
    Ominous,
}

impl FortuneClass {
    /// Numeric weight used by the theme analyzer.
    pub fn value(self) -> f64 {
        match self {
            FortuneClass::Auspicious => 0.8,
            FortuneClass::Prosperous => 0.7,
            FortuneClass::Favorable => 0.6,
            FortuneClass::Steadfast | FortuneClass::Neutral => 0.5,
            FortuneClass::Regret => 0.3,
            FortuneClass::Ominous => 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonConfidence {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonInfo {
    pub season: Season,
    pub confidence: SeasonConfidence,
    /// Calendar month for the twelve sovereign hexagrams.
    pub sovereign_month: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hexagram {
    pub id: HexagramId,
    pub name: &'static str,
    pub symbol: &'static str,
    pub upper_trigram: TrigramId,
    pub lower_trigram: TrigramId,
    pub lines: HexagramLines,
    pub theme: &'static str,
    pub keywords: [&'static str; 3],
    pub fortune: FortuneClass,
    pub season: SeasonInfo,
}

impl Hexagram {
    /// First half of the received sequence, ids 1..=32.
    pub fn upper_canon(&self) -> bool {
        self.id <= 32
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.contains(&keyword)
    }
}

/// (id, month, season) for the twelve sovereign hexagrams.
pub(crate) const SOVEREIGN: [(HexagramId, u8, Season); 12] = [
    (11, 2, Season::Spring),
    (34, 3, Season::Spring),
    (43, 4, Season::Spring),
    (1, 5, Season::Summer),
    (44, 6, Season::Summer),
    (33, 7, Season::Summer),
    (12, 8, Season::Autumn),
    (20, 9, Season::Autumn),
    (23, 10, Season::Autumn),
    (2, 11, Season::Winter),
    (24, 12, Season::Winter),
    (19, 1, Season::Winter),
];

pub(crate) struct Entry {
    pub id: HexagramId,
    pub name: &'static str,
    pub symbol: &'static str,
    pub upper: TrigramId,
    pub lower: TrigramId,
    pub theme: &'static str,
    pub keywords: [&'static str; 3],
    pub fortune: FortuneClass,
}

const fn e(
    id: HexagramId,
    name: &'static str,
    symbol: &'static str,
    upper: TrigramId,
    lower: TrigramId,
    theme: &'static str,
    keywords: [&'static str; 3],
    fortune: FortuneClass,
) -> Entry {
    Entry {
        id,
        name,
        symbol,
        upper,
        lower,
        theme,
        keywords,
        fortune,
    }
}

use FortuneClass::{Auspicious, Favorable, Neutral, Ominous, Prosperous, Regret, Steadfast};

#[rustfmt::skip]
pub(crate) const ENTRIES: [Entry; 64] = [
    e(1, "Qian", "乾為天", 1, 1, "Unceasing creative force", ["creation", "leadership", "perseverance"], Prosperous),
    e(2, "Kun", "坤為地", 8, 8, "Yielding devotion that completes", ["receptivity", "support", "perseverance"], Auspicious),
    e(3, "Zhun", "水雷屯", 6, 4, "Order emerging from chaos", ["beginnings", "patience", "growth"], Prosperous),
    e(4, "Meng", "山水蒙", 7, 6, "Learning through guidance", ["learning", "guidance", "patience"], Prosperous),
    e(5, "Xu", "水天需", 6, 1, "Confident waiting for the right time", ["patience", "timing", "sincerity"], Auspicious),
    e(6, "Song", "天水訟", 1, 6, "Disputes best settled early", ["conflict", "caution", "justice"], Ominous),
    e(7, "Shi", "地水師", 8, 6, "Discipline under wise command", ["discipline", "leadership", "organization"], Auspicious),
    e(8, "Bi", "水地比", 6, 8, "Union around a center", ["union", "loyalty", "support"], Auspicious),
    e(9, "Xiao Xu", "風天小畜", 5, 1, "Gentle restraint gathers strength", ["restraint", "patience", "gentleness"], Prosperous),
    e(10, "Lu", "天沢履", 1, 2, "Careful conduct among dangers", ["conduct", "caution", "courtesy"], Prosperous),
    e(11, "Tai", "地天泰", 8, 1, "Heaven and earth in communion", ["harmony", "prosperity", "union"], Auspicious),
    e(12, "Pi", "天地否", 1, 8, "Stagnation when above and below part", ["stagnation", "withdrawal", "perseverance"], Regret),
    e(13, "Tong Ren", "天火同人", 1, 3, "Fellowship in the open", ["fellowship", "union", "openness"], Prosperous),
    e(14, "Da You", "火天大有", 3, 1, "Abundance held with modesty", ["abundance", "clarity", "modesty"], Prosperous),
    e(15, "Qian", "地山謙", 8, 7, "Modesty that carries things through", ["modesty", "balance", "perseverance"], Prosperous),
    e(16, "Yu", "雷地豫", 4, 8, "Enthusiasm that moves others", ["enthusiasm", "timing", "leadership"], Favorable),
    e(17, "Sui", "沢雷随", 2, 4, "Adapting to follow the time", ["adaptability", "timing", "joy"], Prosperous),
    e(18, "Gu", "山風蠱", 7, 5, "Repairing what was spoiled", ["renewal", "responsibility", "perseverance"], Prosperous),
    e(19, "Lin", "地沢臨", 8, 2, "Benevolent approach of the great", ["growth", "guidance", "timing"], Prosperous),
    e(20, "Guan", "風地観", 5, 8, "Viewing and being viewed", ["contemplation", "sincerity", "guidance"], Neutral),
    e(21, "Shi He", "火雷噬嗑", 3, 4, "Removing obstacles with resolve", ["justice", "resolve", "clarity"], Prosperous),
    e(22, "Bi", "山火賁", 7, 3, "Form that adorns substance", ["beauty", "clarity", "restraint"], Prosperous),
    e(23, "Bo", "山地剥", 7, 8, "Erosion from below", ["decline", "patience", "withdrawal"], Ominous),
    e(24, "Fu", "地雷復", 8, 4, "The turning point of renewal", ["renewal", "timing", "growth"], Prosperous),
    e(25, "Wu Wang", "天雷无妄", 1, 4, "Acting without hidden motive", ["sincerity", "spontaneity", "perseverance"], Prosperous),
    e(26, "Da Xu", "山天大畜", 7, 1, "Great power held in reserve", ["restraint", "learning", "strength"], Auspicious),
    e(27, "Yi", "山雷頤", 7, 4, "Care for what nourishes", ["nourishment", "restraint", "support"], Auspicious),
    e(28, "Da Guo", "沢風大過", 2, 5, "A ridgepole under strain", ["pressure", "courage", "transition"], Favorable),
    e(29, "Kan", "坎為水", 6, 6, "Sincerity through repeated danger", ["danger", "sincerity", "perseverance"], Regret),
    e(30, "Li", "離為火", 3, 3, "Clarity that depends on its source", ["clarity", "devotion", "perseverance"], Auspicious),
    e(31, "Xian", "沢山咸", 2, 7, "Mutual attraction", ["attraction", "receptivity", "union"], Auspicious),
    e(32, "Heng", "雷風恒", 4, 5, "Constancy through change", ["endurance", "perseverance", "union"], Prosperous),
    e(33, "Dun", "天山遯", 1, 7, "Timely withdrawal", ["withdrawal", "timing", "restraint"], Steadfast),
    e(34, "Da Zhuang", "雷天大壮", 4, 1, "Power governed by what is right", ["strength", "justice", "restraint"], Steadfast),
    e(35, "Jin", "火地晋", 3, 8, "Rising like the sun", ["progress", "clarity", "recognition"], Favorable),
    e(36, "Ming Yi", "地火明夷", 8, 3, "Hiding one's light in adversity", ["adversity", "restraint", "perseverance"], Regret),
    e(37, "Jia Ren", "風火家人", 5, 3, "Order within the household", ["family", "loyalty", "responsibility"], Steadfast),
    e(38, "Kui", "火沢睽", 3, 2, "Small matters amid estrangement", ["opposition", "adaptability", "caution"], Regret),
    e(39, "Jian", "水山蹇", 6, 7, "Turning back to cultivate oneself", ["obstruction", "patience", "guidance"], Regret),
    e(40, "Xie", "雷水解", 4, 6, "Release after tension", ["release", "forgiveness", "timing"], Favorable),
    e(41, "Sun", "山沢損", 7, 2, "Simplifying to what matters", ["restraint", "sincerity", "balance"], Auspicious),
    e(42, "Yi", "風雷益", 5, 4, "Gain that flows downward", ["growth", "support", "generosity"], Favorable),
    e(43, "Guai", "沢天夬", 2, 1, "Resolute declaration", ["resolve", "justice", "courage"], Favorable),
    e(44, "Gou", "天風姤", 1, 5, "An unexpected encounter", ["encounter", "caution", "attraction"], Regret),
    e(45, "Cui", "沢地萃", 2, 8, "Gathering around shared purpose", ["union", "devotion", "organization"], Auspicious),
    e(46, "Sheng", "地風升", 8, 5, "Steady ascent through effort", ["growth", "progress", "perseverance"], Auspicious),
    e(47, "Kun", "沢水困", 2, 6, "Exhaustion that tests resolve", ["adversity", "endurance", "sincerity"], Ominous),
    e(48, "Jing", "水風井", 6, 5, "The unchanging source that nourishes", ["nourishment", "constancy", "support"], Neutral),
    e(49, "Ge", "沢火革", 2, 3, "Change at the right time", ["transformation", "timing", "resolve"], Prosperous),
    e(50, "Ding", "火風鼎", 3, 5, "Transformation into culture", ["transformation", "nourishment", "refinement"], Auspicious),
    e(51, "Zhen", "震為雷", 4, 4, "Shock that awakens", ["shock", "initiative", "courage"], Prosperous),
    e(52, "Gen", "艮為山", 7, 7, "Stillness at the right time", ["stillness", "restraint", "timing"], Steadfast),
    e(53, "Jian", "風山漸", 5, 7, "Gradual progress", ["progress", "patience", "growth"], Auspicious),
    e(54, "Gui Mei", "雷沢帰妹", 4, 2, "Acting from a subordinate place", ["subordination", "caution", "attraction"], Ominous),
    e(55, "Feng", "雷火豊", 4, 3, "The fullness of noon", ["abundance", "clarity", "timing"], Prosperous),
    e(56, "Lu", "火山旅", 3, 7, "The stranger's caution", ["travel", "caution", "adaptability"], Steadfast),
    e(57, "Xun", "巽為風", 5, 5, "Penetrating influence", ["gentleness", "adaptability", "guidance"], Favorable),
    e(58, "Dui", "兌為沢", 2, 2, "Shared joy", ["joy", "communication", "sincerity"], Prosperous),
    e(59, "Huan", "風水渙", 5, 6, "Dissolving rigidity", ["dissolution", "union", "devotion"], Prosperous),
    e(60, "Jie", "水沢節", 6, 2, "Measured limits", ["restraint", "balance", "organization"], Steadfast),
    e(61, "Zhong Fu", "風沢中孚", 5, 2, "Sincerity that moves even the dull", ["sincerity", "trust", "communication"], Auspicious),
    e(62, "Xiao Guo", "雷山小過", 4, 7, "Attention to small things", ["caution", "modesty", "timing"], Steadfast),
    e(63, "Ji Ji", "水火既済", 6, 3, "Order that must be guarded", ["completion", "caution", "balance"], Steadfast),
    e(64, "Wei Ji", "火水未済", 3, 6, "The transition not yet made", ["transition", "caution", "potential"], Regret),
];
