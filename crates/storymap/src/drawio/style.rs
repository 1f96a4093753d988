//! DrawIO style strings and the per-kind style table.
//!
//! A DrawIO style is a `key=value;` list. Only a small vocabulary is kept
//! (see [`Style`]); anything else is dropped when a style string is parsed,
//! so manual edits outside that vocabulary do not survive a rewrite.
//!
//! The fill colour doubles as the node type on reload. [`StyleTable`]
//! therefore refuses configurations where two kinds share a fill colour.

use std::fmt::Write as _;

use log::trace;

use storymap_core::color::Color;

use crate::{config::StyleConfig, diagram::StyleKey};

/// The subset of DrawIO style keys this crate reads and writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    rounded: Option<bool>,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    font_color: Option<Color>,
    font_size: Option<f32>,
    align: Option<String>,
    font_style: Option<u8>,
    aspect: Option<String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rounded(mut self, rounded: bool) -> Self {
        self.rounded = Some(rounded);
        self
    }

    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = Some(color);
        self
    }

    pub fn with_font_color(mut self, color: Color) -> Self {
        self.font_color = Some(color);
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_align(mut self, align: impl Into<String>) -> Self {
        self.align = Some(align.into());
        self
    }

    pub fn with_font_style(mut self, font_style: u8) -> Self {
        self.font_style = Some(font_style);
        self
    }

    pub fn with_aspect(mut self, aspect: impl Into<String>) -> Self {
        self.aspect = Some(aspect.into());
        self
    }

    pub fn rounded(&self) -> Option<bool> {
        self.rounded
    }

    pub fn fill_color(&self) -> Option<Color> {
        self.fill_color
    }

    pub fn stroke_color(&self) -> Option<Color> {
        self.stroke_color
    }

    pub fn font_color(&self) -> Option<Color> {
        self.font_color
    }

    pub fn font_size(&self) -> Option<f32> {
        self.font_size
    }

    pub fn align(&self) -> Option<&str> {
        self.align.as_deref()
    }

    pub fn font_style(&self) -> Option<u8> {
        self.font_style
    }

    pub fn aspect(&self) -> Option<&str> {
        self.aspect.as_deref()
    }

    /// Renders the style as a DrawIO style string.
    ///
    /// Keys are written in a fixed order so output is stable.
    ///
    /// # Examples
    ///
    /// ```
    /// # use storymap::drawio::Style;
    /// # use storymap_core::color::Color;
    /// let style = Style::new()
    ///     .with_rounded(true)
    ///     .with_fill_color(Color::new("#FFF2CC").unwrap())
    ///     .with_font_size(10.0);
    /// assert_eq!(style.to_style_string(), "rounded=1;fillColor=#fff2cc;fontSize=10;");
    /// ```
    pub fn to_style_string(&self) -> String {
        let mut out = String::new();
        if let Some(rounded) = self.rounded {
            push_entry(&mut out, "rounded", if rounded { "1" } else { "0" });
        }
        if let Some(color) = self.fill_color {
            push_entry(&mut out, "fillColor", &color.to_hex());
        }
        if let Some(color) = self.stroke_color {
            push_entry(&mut out, "strokeColor", &color.to_hex());
        }
        if let Some(color) = self.font_color {
            push_entry(&mut out, "fontColor", &color.to_hex());
        }
        if let Some(size) = self.font_size {
            push_entry(&mut out, "fontSize", &super::format_number(size));
        }
        if let Some(align) = &self.align {
            push_entry(&mut out, "align", align);
        }
        if let Some(font_style) = self.font_style {
            push_entry(&mut out, "fontStyle", &font_style.to_string());
        }
        if let Some(aspect) = &self.aspect {
            push_entry(&mut out, "aspect", aspect);
        }
        out
    }

    /// Parses a DrawIO style string.
    ///
    /// Unknown keys, bare shape names and unparsable values are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use storymap::drawio::Style;
    /// let style = Style::from_style_string("whiteSpace=wrap;html=1;fillColor=#dae8fc;rounded=0");
    /// assert_eq!(style.fill_color().map(|c| c.to_hex()), Some("#dae8fc".to_string()));
    /// assert_eq!(style.rounded(), Some(false));
    /// assert_eq!(style.to_style_string(), "rounded=0;fillColor=#dae8fc;");
    /// ```
    pub fn from_style_string(style: &str) -> Self {
        let mut parsed = Self::default();
        for entry in style.split(';') {
            let Some((key, value)) = entry.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "rounded" => parsed.rounded = Some(value == "1" || value == "true"),
                "fillColor" => parsed.fill_color = parse_color(key, value),
                "strokeColor" => parsed.stroke_color = parse_color(key, value),
                "fontColor" => parsed.font_color = parse_color(key, value),
                "fontSize" => parsed.font_size = value.parse().ok(),
                "align" => parsed.align = Some(value.to_string()),
                "fontStyle" => parsed.font_style = value.parse().ok(),
                "aspect" => parsed.aspect = Some(value.to_string()),
                _ => {}
            }
        }
        parsed
    }
}

fn push_entry(out: &mut String, key: &str, value: &str) {
    let _ = write!(out, "{key}={value};");
}

fn parse_color(key: &str, value: &str) -> Option<Color> {
    match Color::new(value) {
        Ok(color) => Some(color),
        Err(err) => {
            trace!(key, err:%; "Dropping unparsable style colour");
            None
        }
    }
}

/// Built-in appearance of one style key.
#[derive(Debug, Clone, Copy)]
pub struct StyleDefaults {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub font: &'static str,
    pub rounded: bool,
    pub font_size: f32,
    pub align: &'static str,
    pub font_style: u8,
    pub fixed_aspect: bool,
}

/// Default appearance for every [`StyleKey`], in [`StyleKey::ALL`] order.
pub const STYLE_DEFAULTS: [(StyleKey, StyleDefaults); 8] = [
    (
        StyleKey::Epic,
        StyleDefaults {
            fill: "#e1d5e7",
            stroke: "#9673a6",
            font: "#000000",
            rounded: false,
            font_size: 14.0,
            align: "left",
            font_style: 1,
            fixed_aspect: false,
        },
    ),
    (
        StyleKey::SubEpic,
        StyleDefaults {
            fill: "#dae8fc",
            stroke: "#6c8ebf",
            font: "#000000",
            rounded: false,
            font_size: 12.0,
            align: "left",
            font_style: 1,
            fixed_aspect: false,
        },
    ),
    (
        StyleKey::StoryUser,
        StyleDefaults {
            fill: "#fff2cc",
            stroke: "#d6b656",
            font: "#000000",
            rounded: true,
            font_size: 10.0,
            align: "center",
            font_style: 0,
            fixed_aspect: true,
        },
    ),
    (
        StyleKey::StorySystem,
        StyleDefaults {
            fill: "#f8cecc",
            stroke: "#b85450",
            font: "#000000",
            rounded: true,
            font_size: 10.0,
            align: "center",
            font_style: 0,
            fixed_aspect: true,
        },
    ),
    (
        StyleKey::StoryTechnical,
        StyleDefaults {
            fill: "#d5e8d4",
            stroke: "#82b366",
            font: "#000000",
            rounded: true,
            font_size: 10.0,
            align: "center",
            font_style: 0,
            fixed_aspect: true,
        },
    ),
    (
        StyleKey::Actor,
        StyleDefaults {
            fill: "#ffe6cc",
            stroke: "#d79b00",
            font: "#000000",
            rounded: true,
            font_size: 10.0,
            align: "center",
            font_style: 2,
            fixed_aspect: false,
        },
    ),
    (
        StyleKey::AcceptanceCriteria,
        StyleDefaults {
            fill: "#f5f5f5",
            stroke: "#666666",
            font: "#333333",
            rounded: false,
            font_size: 9.0,
            align: "left",
            font_style: 0,
            fixed_aspect: false,
        },
    ),
    (
        StyleKey::IncrementLane,
        StyleDefaults {
            fill: "#eeeeee",
            stroke: "#999999",
            font: "#000000",
            rounded: false,
            font_size: 12.0,
            align: "left",
            font_style: 1,
            fixed_aspect: false,
        },
    ),
];

impl StyleDefaults {
    fn to_style(self) -> Result<Style, String> {
        let mut style = Style::new()
            .with_rounded(self.rounded)
            .with_fill_color(Color::new(self.fill)?)
            .with_stroke_color(Color::new(self.stroke)?)
            .with_font_color(Color::new(self.font)?)
            .with_font_size(self.font_size)
            .with_align(self.align)
            .with_font_style(self.font_style);
        if self.fixed_aspect {
            style = style.with_aspect("fixed");
        }
        Ok(style)
    }
}

/// Resolved styles for every [`StyleKey`].
#[derive(Debug, Clone)]
pub struct StyleTable {
    styles: Vec<(StyleKey, Style)>,
}

impl StyleTable {
    /// Builds the table from [`STYLE_DEFAULTS`] and applies `config` on top.
    ///
    /// # Errors
    ///
    /// Returns a message if an override names an unknown style key, holds
    /// an unparsable colour, or gives two keys the same fill colour.
    pub fn from_config(config: &StyleConfig) -> Result<Self, String> {
        let mut styles = STYLE_DEFAULTS
            .iter()
            .map(|(key, defaults)| defaults.to_style().map(|style| (*key, style)))
            .collect::<Result<Vec<_>, _>>()?;

        for (name, color_override) in config.overrides() {
            let key = StyleKey::from_name(name)
                .ok_or_else(|| format!("unknown style key `{name}` in [style.overrides]"))?;
            let Some((_, style)) = styles.iter_mut().find(|(k, _)| *k == key) else {
                continue;
            };
            if let Some(fill) = color_override.fill_color() {
                style.fill_color = Some(Color::new(fill)?);
            }
            if let Some(stroke) = color_override.stroke_color() {
                style.stroke_color = Some(Color::new(stroke)?);
            }
            if let Some(font) = color_override.font_color() {
                style.font_color = Some(Color::new(font)?);
            }
        }

        let table = Self { styles };
        table.validate()?;
        Ok(table)
    }

    /// Returns the style stamped on nodes of `key`.
    pub fn style_for(&self, key: StyleKey) -> Style {
        self.styles
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, style)| style.clone())
            .unwrap_or_default()
    }

    /// Maps an element style back to the key whose fill colour it carries.
    pub fn classify(&self, style: &Style) -> Option<StyleKey> {
        let fill = style.fill_color()?;
        self.styles
            .iter()
            .find(|(_, candidate)| candidate.fill_color().is_some_and(|c| c.same_as(fill)))
            .map(|(key, _)| *key)
    }

    fn validate(&self) -> Result<(), String> {
        for (index, (key, style)) in self.styles.iter().enumerate() {
            let Some(fill) = style.fill_color() else {
                continue;
            };
            let collision = self.styles[index + 1..]
                .iter()
                .find(|(_, other)| other.fill_color().is_some_and(|c| c.same_as(fill)));
            if let Some((other_key, _)) = collision {
                return Err(format!(
                    "styles `{key}` and `{other_key}` share fill colour {fill}; \
                     fill colours must be unique to classify nodes on reload"
                ));
            }
        }
        Ok(())
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        let styles = STYLE_DEFAULTS
            .iter()
            .filter_map(|(key, defaults)| defaults.to_style().ok().map(|style| (*key, style)))
            .collect();
        Self { styles }
    }
}
