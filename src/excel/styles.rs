//! Style catalog for Excel export
//!
//! Defines the two visual languages used by the exporters: the striped
//! "table" look (header band plus alternating row fills) and the
//! "informational" look (label/value pairs with section banners). Styles are
//! plain data records; cells always receive a clone, and conditional accents
//! are layered on with [`Style::merge`] so the base look survives underneath.

use once_cell::sync::Lazy;

/// Color palette, RGB. Based on the Excel "Table Style Medium 2" blues plus
/// the status and accent colors used by the informational sheets.
pub mod colors {
    pub const MEDIUM_BLUE: u32 = 0x4472C4;
    pub const LIGHT_BLUE: u32 = 0xD9E2F3;
    pub const WHITE: u32 = 0xFFFFFF;

    pub const SUCCESS_GREEN: u32 = 0x006100;
    pub const SUCCESS_GREEN_FILL: u32 = 0xC6EFCE;
    pub const ERROR_RED: u32 = 0x9C0006;
    pub const ERROR_RED_FILL: u32 = 0xFFC7CE;

    pub const DARK_TEXT: u32 = 0x333333;
    pub const SLATE_TEXT: u32 = 0x2F4F4F;

    pub const LIGHT_GRAY: u32 = 0xF2F2F2;
    pub const MEDIUM_GRAY: u32 = 0xE7E6E6;
    pub const SEPARATOR_GRAY: u32 = 0xF0F0F0;
    pub const PALE_BACKGROUND: u32 = 0xF8F9FA;

    pub const ACCENT_GREEN: u32 = 0x2E8B57;
    pub const ACCENT_GREEN_FILL: u32 = 0xF1F8E9;
    pub const ACCENT_BLUE: u32 = 0x4169E1;
    pub const ACCENT_BLUE_FILL: u32 = 0xE3F2FD;
    pub const ACCENT_PURPLE: u32 = 0x7B1FA2;
    pub const ACCENT_PURPLE_FILL: u32 = 0xF3E5F5;
    pub const ALERT_RED: u32 = 0xB85450;
    pub const ALERT_RED_FILL: u32 = 0xFFF2F2;

    pub const BORDER_LIGHT: u32 = 0xD1D1D1;
    pub const BORDER_MEDIUM: u32 = 0xE1E5E9;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderLine {
    Thin,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Font {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub size: Option<f64>,
    pub color: Option<u32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderSide {
    pub line: BorderLine,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Border {
    pub top: Option<BorderSide>,
    pub bottom: Option<BorderSide>,
    pub left: Option<BorderSide>,
    pub right: Option<BorderSide>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alignment {
    pub horizontal: Option<Horizontal>,
    pub vertical: Option<Vertical>,
    pub wrap: Option<bool>,
}

/// A reusable cell style template. The catalog below holds the canonical
/// instances; cells must never share a template reference, so every
/// application site clones before assigning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub font: Option<Font>,
    pub fill: Option<Fill>,
    pub border: Option<Border>,
    pub alignment: Option<Alignment>,
}

impl Style {
    /// Overlay `accent` on top of `self`, returning a new style.
    ///
    /// Top-level components present in `accent` replace the corresponding
    /// component, except that structured components (font, border,
    /// alignment) merge one level deep: accent sub-fields win, base
    /// sub-fields absent from the accent survive.
    pub fn merge(&self, accent: &Style) -> Style {
        let mut result = self.clone();

        if let Some(af) = &accent.font {
            result.font = Some(match &result.font {
                Some(bf) => Font {
                    bold: af.bold.or(bf.bold),
                    italic: af.italic.or(bf.italic),
                    size: af.size.or(bf.size),
                    color: af.color.or(bf.color),
                    name: af.name.clone().or_else(|| bf.name.clone()),
                },
                None => af.clone(),
            });
        }
        if let Some(fill) = accent.fill {
            result.fill = Some(fill);
        }
        if let Some(ab) = &accent.border {
            result.border = Some(match result.border {
                Some(bb) => Border {
                    top: ab.top.or(bb.top),
                    bottom: ab.bottom.or(bb.bottom),
                    left: ab.left.or(bb.left),
                    right: ab.right.or(bb.right),
                },
                None => *ab,
            });
        }
        if let Some(aa) = &accent.alignment {
            result.alignment = Some(match result.alignment {
                Some(ba) => Alignment {
                    horizontal: aa.horizontal.or(ba.horizontal),
                    vertical: aa.vertical.or(ba.vertical),
                    wrap: aa.wrap.or(ba.wrap),
                },
                None => *aa,
            });
        }

        result
    }
}

fn thin_border(color: u32) -> Border {
    let side = BorderSide { line: BorderLine::Thin, color };
    Border {
        top: Some(side),
        bottom: Some(side),
        left: Some(side),
        right: Some(side),
    }
}

fn centered_wrapped() -> Alignment {
    Alignment {
        horizontal: Some(Horizontal::Center),
        vertical: Some(Vertical::Center),
        wrap: Some(true),
    }
}

/// Table header row: bold white on medium blue, centered, white hairlines.
pub static TABLE_HEADER: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        bold: Some(true),
        size: Some(11.0),
        color: Some(colors::WHITE),
        name: Some("Calibri".into()),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::MEDIUM_BLUE }),
    border: Some(thin_border(colors::WHITE)),
    alignment: Some(centered_wrapped()),
});

/// Light (white) body stripe.
pub static TABLE_ROW_LIGHT: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        size: Some(11.0),
        name: Some("Calibri".into()),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::WHITE }),
    border: Some(thin_border(colors::BORDER_LIGHT)),
    alignment: Some(centered_wrapped()),
});

/// Dark (light blue) body stripe.
pub static TABLE_ROW_DARK: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        size: Some(11.0),
        name: Some("Calibri".into()),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::LIGHT_BLUE }),
    border: Some(thin_border(colors::BORDER_LIGHT)),
    alignment: Some(centered_wrapped()),
});

/// Section banner for advanced informational sheets, merged across both
/// columns.
pub static MAIN_TITLE: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        bold: Some(true),
        size: Some(16.0),
        color: Some(colors::WHITE),
        name: Some("Calibri".into()),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::MEDIUM_BLUE }),
    border: Some(thin_border(colors::MEDIUM_BLUE)),
    alignment: Some(Alignment {
        horizontal: Some(Horizontal::Center),
        vertical: Some(Vertical::Center),
        wrap: None,
    }),
});

/// Section title for simple informational sheets.
pub static SECTION_TITLE: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        bold: Some(true),
        size: Some(14.0),
        color: Some(colors::MEDIUM_BLUE),
        name: Some("Calibri".into()),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::LIGHT_GRAY }),
    border: None,
    alignment: Some(Alignment {
        horizontal: Some(Horizontal::Left),
        vertical: Some(Vertical::Center),
        wrap: None,
    }),
});

/// Label column of advanced informational sheets.
pub static LABEL: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        bold: Some(true),
        size: Some(12.0),
        color: Some(colors::SLATE_TEXT),
        name: Some("Calibri".into()),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::PALE_BACKGROUND }),
    border: Some(thin_border(colors::BORDER_MEDIUM)),
    alignment: Some(Alignment {
        horizontal: Some(Horizontal::Right),
        vertical: Some(Vertical::Center),
        wrap: None,
    }),
});

/// Label column of simple informational sheets.
pub static SIMPLE_LABEL: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        bold: Some(true),
        size: Some(11.0),
        name: Some("Calibri".into()),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::MEDIUM_GRAY }),
    border: None,
    alignment: Some(Alignment {
        horizontal: Some(Horizontal::Left),
        vertical: Some(Vertical::Center),
        wrap: None,
    }),
});

/// Value column of advanced informational sheets.
pub static VALUE: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        size: Some(12.0),
        color: Some(colors::DARK_TEXT),
        name: Some("Calibri".into()),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::WHITE }),
    border: Some(thin_border(colors::BORDER_MEDIUM)),
    alignment: Some(Alignment {
        horizontal: Some(Horizontal::Left),
        vertical: Some(Vertical::Center),
        wrap: None,
    }),
});

/// Value column of simple informational sheets.
pub static SIMPLE_VALUE: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        size: Some(11.0),
        name: Some("Calibri".into()),
        ..Font::default()
    }),
    fill: None,
    border: None,
    alignment: Some(Alignment {
        horizontal: Some(Horizontal::Left),
        vertical: Some(Vertical::Center),
        wrap: None,
    }),
});

/// Blank separator rows between informational sections.
pub static SEPARATOR: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        size: Some(8.0),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::SEPARATOR_GRAY }),
    border: None,
    alignment: None,
});

/// Accent for affirmative status cells (`OK`, `Sim`).
pub static STATUS_POSITIVE: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        bold: Some(true),
        color: Some(colors::SUCCESS_GREEN),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::SUCCESS_GREEN_FILL }),
    border: None,
    alignment: None,
});

/// Accent for negative status cells (`NC`, `Não`).
pub static STATUS_NEGATIVE: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        bold: Some(true),
        color: Some(colors::ERROR_RED),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::ERROR_RED_FILL }),
    border: None,
    alignment: None,
});

/// Accent for positive integer values on informational sheets.
pub static ACCENT_POSITIVE_NUMBER: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        bold: Some(true),
        color: Some(colors::ACCENT_GREEN),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::ACCENT_GREEN_FILL }),
    border: None,
    alignment: None,
});

/// Accent for decimal averages on informational sheets.
pub static ACCENT_AVERAGE: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        bold: Some(true),
        color: Some(colors::ACCENT_BLUE),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::ACCENT_BLUE_FILL }),
    border: None,
    alignment: None,
});

/// Accent for date and time values on informational sheets.
pub static ACCENT_DATE_TIME: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        color: Some(colors::ACCENT_PURPLE),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::ACCENT_PURPLE_FILL }),
    border: None,
    alignment: None,
});

/// Accent for missing-value tokens (`Nunca`, `Não informado`, zeros).
pub static ACCENT_MISSING: Lazy<Style> = Lazy::new(|| Style {
    font: Some(Font {
        italic: Some(true),
        color: Some(colors::ALERT_RED),
        ..Font::default()
    }),
    fill: Some(Fill { color: colors::ALERT_RED_FILL }),
    border: None,
    alignment: None,
});
