//! Static layout presets, one per output format.
//!
//! The single source of truth for where each field sits and at what base
//! size. Rendering code is parameterized by the preset and carries no
//! per-format branches.

use super::CardError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatId {
    Feed,
    Square,
    Wide,
    Story,
}

impl FormatId {
    pub fn parse(s: &str) -> Result<Self, CardError> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "feed" => FormatId::Feed,
            "square" => FormatId::Square,
            "wide" => FormatId::Wide,
            "story" => FormatId::Story,
            _ => return Err(CardError::UnknownFormat(s.to_string())),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormatId::Feed => "feed",
            FormatId::Square => "square",
            FormatId::Wide => "wide",
            FormatId::Story => "story",
        }
    }

    pub fn all() -> [FormatId; 4] {
        [FormatId::Feed, FormatId::Square, FormatId::Wide, FormatId::Story]
    }
}

impl std::fmt::Display for FormatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A centered single-field anchor: top edge + font size.
#[derive(Clone, Copy, Debug)]
pub struct TextSlot {
    pub y: u32,
    pub size: u32,
}

/// The headline block: the auto-fit search space.
#[derive(Clone, Copy, Debug)]
pub struct HeadlineSlot {
    pub y: u32,
    pub max_width: u32,
    pub max_height: u32,
    pub min_size: u32,
    pub max_size: u32,
}

/// Price column: label over value over suffix, stacked by measured height.
#[derive(Clone, Copy, Debug)]
pub struct PriceSlot {
    pub x_center: u32,
    pub y: u32,
    pub label_size: u32,
    pub value_size: u32,
    pub suffix_size: u32,
    pub gap: u32,
}

/// The five-icon strip: glyph row above caption row, evenly spaced.
#[derive(Clone, Copy, Debug)]
pub struct IconRow {
    pub glyph_y: u32,
    pub label_y: u32,
    pub glyph_size: u32,
    pub label_size: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct FormatPreset {
    pub id: FormatId,
    pub width: u32,
    pub height: u32,
    pub scrim_alpha: u8,
    pub credential1: TextSlot,
    pub credential2: TextSlot,
    pub subtitle: TextSlot,
    pub headline: HeadlineSlot,
    pub price: PriceSlot,
    pub icons: IconRow,
    pub footer: TextSlot,
}

static FEED: FormatPreset = FormatPreset {
    id: FormatId::Feed,
    width: 1080,
    height: 1350,
    scrim_alpha: 90,
    credential1: TextSlot { y: 50, size: 30 },
    credential2: TextSlot { y: 90, size: 30 },
    subtitle: TextSlot { y: 200, size: 40 },
    headline: HeadlineSlot { y: 360, max_width: 972, max_height: 330, min_size: 40, max_size: 300 },
    price: PriceSlot { x_center: 810, y: 800, label_size: 50, value_size: 200, suffix_size: 45, gap: 10 },
    icons: IconRow { glyph_y: 1050, label_y: 1110, glyph_size: 60, label_size: 35 },
    footer: TextSlot { y: 1300, size: 25 },
};

static SQUARE: FormatPreset = FormatPreset {
    id: FormatId::Square,
    width: 1080,
    height: 1080,
    scrim_alpha: 90,
    credential1: TextSlot { y: 40, size: 28 },
    credential2: TextSlot { y: 76, size: 28 },
    subtitle: TextSlot { y: 150, size: 36 },
    headline: HeadlineSlot { y: 290, max_width: 972, max_height: 270, min_size: 36, max_size: 260 },
    price: PriceSlot { x_center: 810, y: 620, label_size: 44, value_size: 150, suffix_size: 40, gap: 8 },
    icons: IconRow { glyph_y: 830, label_y: 884, glyph_size: 54, label_size: 30 },
    footer: TextSlot { y: 1036, size: 22 },
};

static WIDE: FormatPreset = FormatPreset {
    id: FormatId::Wide,
    width: 1920,
    height: 1080,
    scrim_alpha: 90,
    credential1: TextSlot { y: 40, size: 30 },
    credential2: TextSlot { y: 78, size: 30 },
    subtitle: TextSlot { y: 150, size: 42 },
    headline: HeadlineSlot { y: 280, max_width: 1728, max_height: 300, min_size: 40, max_size: 280 },
    price: PriceSlot { x_center: 1440, y: 620, label_size: 48, value_size: 170, suffix_size: 42, gap: 8 },
    icons: IconRow { glyph_y: 850, label_y: 906, glyph_size: 56, label_size: 32 },
    footer: TextSlot { y: 1034, size: 24 },
};

static STORY: FormatPreset = FormatPreset {
    id: FormatId::Story,
    width: 1080,
    height: 1920,
    scrim_alpha: 90,
    credential1: TextSlot { y: 80, size: 32 },
    credential2: TextSlot { y: 124, size: 32 },
    subtitle: TextSlot { y: 300, size: 44 },
    headline: HeadlineSlot { y: 520, max_width: 972, max_height: 420, min_size: 44, max_size: 320 },
    price: PriceSlot { x_center: 810, y: 1150, label_size: 52, value_size: 210, suffix_size: 46, gap: 10 },
    icons: IconRow { glyph_y: 1560, label_y: 1622, glyph_size: 62, label_size: 36 },
    footer: TextSlot { y: 1858, size: 26 },
};

pub fn preset_for(id: FormatId) -> &'static FormatPreset {
    match id {
        FormatId::Feed => &FEED,
        FormatId::Square => &SQUARE,
        FormatId::Wide => &WIDE,
        FormatId::Story => &STORY,
    }
}
