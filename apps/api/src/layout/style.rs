//! Line style classification.
//!
//! Every handout line is classified by content into one of four style classes.
//! Rules are an ordered list of predicates; the first match wins and anything
//! unmatched is body text. Blank lines are not classified at all: they consume
//! the sheet's spacer.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Style records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleClass {
    /// `一，` … `五，` section openers.
    Heading,
    /// Prayer-item and opening-remarks titles.
    SubHeading,
    /// `1,为…` style numbered items.
    NumberedItem,
    Body,
}

/// Immutable style record. `extra_indent` is measured from the left margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub weight: FontWeight,
    pub size: f32,
    pub line_height: f32,
    pub extra_indent: f32,
}

/// The result of classifying one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    Blank,
    Styled(StyleClass),
}

/// Style records and the marker strings the classifier matches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    pub heading: LineStyle,
    pub sub_heading: LineStyle,
    pub numbered_item: LineStyle,
    pub body: LineStyle,
    /// Vertical space consumed by a blank line.
    pub blank_spacer: f32,
    pub heading_prefixes: Vec<String>,
    pub sub_heading_markers: Vec<String>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            heading: LineStyle {
                weight: FontWeight::Bold,
                size: 32.0,
                line_height: 46.0,
                extra_indent: 0.0,
            },
            sub_heading: LineStyle {
                weight: FontWeight::Bold,
                size: 30.0,
                line_height: 44.0,
                extra_indent: 0.0,
            },
            numbered_item: LineStyle {
                weight: FontWeight::Bold,
                size: 26.0,
                line_height: 38.0,
                extra_indent: 20.0,
            },
            // Body text is bold too, for projector legibility.
            body: LineStyle {
                weight: FontWeight::Bold,
                size: 24.0,
                line_height: 36.0,
                extra_indent: 30.0,
            },
            blank_spacer: 25.0,
            heading_prefixes: ["一，", "二，", "三，", "四，", "五，"]
                .into_iter()
                .map(String::from)
                .collect(),
            sub_heading_markers: ["祷告事项", "开场白"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl StyleSheet {
    pub fn style(&self, class: StyleClass) -> &LineStyle {
        match class {
            StyleClass::Heading => &self.heading,
            StyleClass::SubHeading => &self.sub_heading,
            StyleClass::NumberedItem => &self.numbered_item,
            StyleClass::Body => &self.body,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classification rules
// ────────────────────────────────────────────────────────────────────────────

type Predicate = fn(&str, &StyleSheet) -> bool;

/// Evaluated top to bottom; `Body` is the fallthrough.
const RULES: [(Predicate, StyleClass); 3] = [
    (is_heading, StyleClass::Heading),
    (is_sub_heading, StyleClass::SubHeading),
    (is_numbered_item, StyleClass::NumberedItem),
];

/// Number of leading characters searched for the item separator.
const NUMBERED_ITEM_WINDOW: usize = 5;

fn is_heading(line: &str, sheet: &StyleSheet) -> bool {
    let trimmed = line.trim();
    sheet
        .heading_prefixes
        .iter()
        .any(|prefix| trimmed.starts_with(prefix.as_str()))
}

fn is_sub_heading(line: &str, sheet: &StyleSheet) -> bool {
    sheet
        .sub_heading_markers
        .iter()
        .any(|marker| line.contains(marker.as_str()))
}

fn is_numbered_item(line: &str, _sheet: &StyleSheet) -> bool {
    let starts_with_digit = line
        .trim()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit());
    starts_with_digit && line.chars().take(NUMBERED_ITEM_WINDOW).any(|c| c == ',')
}

/// Classifies a single line. Pure: depends only on `line` and the sheet.
pub fn classify(line: &str, sheet: &StyleSheet) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    let class = RULES
        .iter()
        .find(|(predicate, _)| predicate(line, sheet))
        .map(|(_, class)| *class)
        .unwrap_or(StyleClass::Body);
    LineKind::Styled(class)
}
