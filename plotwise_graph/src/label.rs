// Copyright 2025 the Plotwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurable text blocks.

extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use peniko::Brush;
use peniko::color::palette::css;
use plotwise_text::{TextMeasurer, TextStyle};

/// Text orientation on the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Left-to-right text.
    #[default]
    Horizontal,
    /// Text rotated 90° counter-clockwise (reads bottom-to-top).
    Vertical,
}

/// A block of (possibly multi-line) text with its own font scale and padding.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// The text; `\n` separates lines.
    pub text: String,
    /// Base font, before `scaling` is applied.
    pub style: TextStyle,
    /// Multiplier applied to `style.font_size` when measuring and drawing.
    pub scaling: f64,
    /// Text fill paint.
    pub fill: Brush,
    /// Gap between consecutive lines, before scaling.
    pub line_spacing: f64,
    /// Uniform padding around the text block, before scaling.
    pub padding: f64,
    /// Orientation of the text.
    pub orientation: Orientation,
    /// Whether the label is drawn.
    pub shown: bool,
}

impl Label {
    /// Creates a shown, horizontal label with a 12px sans-serif font.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
            scaling: 1.0,
            fill: Brush::Solid(css::BLACK),
            line_spacing: 1.0,
            padding: 0.0,
            orientation: Orientation::Horizontal,
            shown: true,
        }
    }

    /// Sets the base font.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the base font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.style.font_size = font_size;
        self
    }

    /// Sets the font scaling.
    pub fn with_scaling(mut self, scaling: f64) -> Self {
        self.scaling = scaling;
        self
    }

    /// Sets the text fill.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the padding around the text.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Returns `true` if the label is shown and has text.
    pub fn is_visible(&self) -> bool {
        self.shown && !self.text.is_empty()
    }

    /// The font actually used for drawing: the base style with `scaling` applied.
    pub fn effective_style(&self) -> TextStyle {
        self.style.scaled(self.scaling)
    }

    /// Returns the `(width, height)` of the label as drawn, padding and orientation included.
    ///
    /// Invisible labels measure as `(0, 0)`.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> (f64, f64) {
        self.measure_at(measurer, self.scaling)
    }

    /// Like [`Label::measure`], but at an explicit `scaling` instead of the label's own.
    pub fn measure_at(&self, measurer: &dyn TextMeasurer, scaling: f64) -> (f64, f64) {
        if !self.is_visible() {
            return (0.0, 0.0);
        }
        let (w, h) = measurer.measure_block(
            &self.text,
            &self.style.scaled(scaling),
            self.line_spacing * scaling,
        );
        let pad = 2.0 * self.padding.max(0.0) * scaling;
        match self.orientation {
            Orientation::Horizontal => (w + pad, h + pad),
            Orientation::Vertical => (h + pad, w + pad),
        }
    }

    /// Re-breaks the text so lines run about `line_length` characters.
    ///
    /// See [`fit_to_line_length`] for the rules.
    pub fn split_text_to_fit_length(&mut self, line_length: usize) {
        self.text = fit_to_line_length(&self.text, line_length);
    }
}

impl Default for Label {
    fn default() -> Self {
        Self::new("")
    }
}

/// Words that may end a line when a label is broken at a conjunction.
const CONJUNCTIONS: [&str; 9] = ["&", "and", "or", "y", "o", "et", "ou", "und", "oder"];

/// Re-breaks `text` at the first space or hyphen on or after each `line_length`-th character.
///
/// Text whose lines all fit is returned unchanged; otherwise existing line breaks are
/// discarded first. A run without a later break stays on one line.
pub(crate) fn fit_to_line_length(text: &str, line_length: usize) -> String {
    if text.chars().count() < line_length
        || text.lines().all(|line| line.chars().count() <= line_length)
    {
        return text.into();
    }
    let mut rest = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
    let mut fitted = String::new();
    while rest.chars().count() > line_length {
        let Some(at) = rest
            .char_indices()
            .skip(line_length)
            .find(|&(_, c)| c == ' ' || c == '-')
            .map(|(i, _)| i)
        else {
            break;
        };
        fitted.push_str(rest[..=at].trim_end());
        fitted.push('\n');
        rest = rest[at + 1..].trim_start().into();
    }
    fitted.push_str(&rest);
    fitted.trim().into()
}

/// Breaks `text` into two or more lines when it is longer than `max_length` characters.
///
/// Tries, in order: before an opening bracket or after `/`, `&` or `:`; between two words;
/// after each item of a comma-separated list; after a conjunction.
pub(crate) fn split_long_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.into();
    }
    split_at_break(text)
        .or_else(|| split_list_items(text))
        .or_else(|| split_at_conjunction(text))
        .unwrap_or_else(|| text.into())
}

fn split_at_break(text: &str) -> Option<String> {
    let text = text.trim();
    let bracket = text
        .char_indices()
        .skip(1)
        .find(|&(_, c)| matches!(c, '(' | '[' | '{'))
        .map(|(i, _)| i);
    if let Some(at) = bracket {
        return Some(format!("{}\n{}", text[..at].trim_end(), &text[at..]));
    }
    if let Some(at) = text.find(['/', '&', ':']) {
        let (head, tail) = text.split_at(at + 1);
        if !tail.trim().is_empty() {
            return Some(format!("{}\n{}", head.trim_end(), tail.trim_start()));
        }
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    match words.as_slice() {
        [first, second] => Some(format!("{first}\n{second}")),
        _ => None,
    }
}

fn split_list_items(text: &str) -> Option<String> {
    let items: Vec<&str> = text.trim().split(", ").map(str::trim).collect();
    let (last, init) = items.split_last()?;
    if init.is_empty() {
        return None;
    }
    let mut lines: Vec<String> = init.iter().map(|item| format!("{item},")).collect();
    let mut last = *last;
    // A trailing "and"/"or" stays with the item before it.
    let conjunction = last
        .split_once(' ')
        .filter(|(word, _)| CONJUNCTIONS.contains(word));
    if let Some((word, tail)) = conjunction {
        if let Some(previous) = lines.last_mut() {
            previous.push(' ');
            previous.push_str(word);
        }
        last = tail.trim_start();
    }
    lines.push(last.into());
    Some(lines.join("\n"))
}

fn split_at_conjunction(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 3 {
        return None;
    }
    let at = 1 + words[1..words.len() - 1]
        .iter()
        .position(|w| CONJUNCTIONS.contains(w))?;
    Some(format!("{}\n{}", words[..=at].join(" "), words[at + 1..].join(" ")))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use plotwise_text::HeuristicTextMeasurer;

    #[test]
    fn vertical_labels_swap_extents() {
        let m = HeuristicTextMeasurer;
        let label = Label::new("abcde").with_font_size(10.0);
        let (w, h) = label.measure(&m);
        let (vw, vh) = label
            .clone()
            .with_orientation(Orientation::Vertical)
            .measure(&m);
        assert_eq!((w, h), (vh, vw));
    }

    #[test]
    fn hidden_or_empty_labels_take_no_space() {
        let m = HeuristicTextMeasurer;
        assert_eq!(Label::new("").measure(&m), (0.0, 0.0));
        let mut hidden = Label::new("text");
        hidden.shown = false;
        assert_eq!(hidden.measure(&m), (0.0, 0.0));
    }

    #[test]
    fn padding_scales_with_label() {
        let m = HeuristicTextMeasurer;
        let label = Label::new("ab")
            .with_font_size(10.0)
            .with_padding(2.0)
            .with_scaling(2.0);
        let (w, h) = label.measure(&m);
        assert!((w - (24.0 + 8.0)).abs() < 1e-9, "{w}");
        assert!((h - (20.0 + 8.0)).abs() < 1e-9, "{h}");
    }

    #[test]
    fn long_lines_break_after_suggested_length() {
        let mut label = Label::new("High School Sophomore");
        label.split_text_to_fit_length(10);
        assert_eq!(label.text, "High School\nSophomore");

        for (text, length, fitted) in [
            ("High School: Sophomore", 10, "High School:\nSophomore"),
            ("High School Sophomore ", 10, "High School\nSophomore"),
            ("HighSchoolSophomore", 10, "HighSchoolSophomore"),
            ("HighSchoolSophomore ", 10, "HighSchoolSophomore"),
            ("High School Sophomore", 30, "High School Sophomore"),
            ("High School Sophomore", 0, "High\nSchool\nSophomore"),
            ("High School Sophomore", 4, "High\nSchool\nSophomore"),
        ] {
            assert_eq!(fit_to_line_length(text, length), fitted, "{text:?}");
        }
    }

    #[test]
    fn existing_line_breaks_are_rejoined_before_fitting() {
        assert_eq!(
            fit_to_line_length("High School-Junior\nhigh", 10),
            "High School-\nJunior high"
        );
        assert_eq!(fit_to_line_length("short\nlines", 10), "short\nlines");
    }

    #[test]
    fn long_text_splits_at_natural_breaks() {
        assert_eq!(
            split_long_text("Revenue (millions)", 10),
            "Revenue\n(millions)"
        );
        assert_eq!(split_long_text("Reading/Writing", 10), "Reading/\nWriting");
        assert_eq!(split_long_text("Graduate School", 10), "Graduate\nSchool");
        assert_eq!(
            split_long_text("Arts, Humanities, and Communications", 10),
            "Arts,\nHumanities, and\nCommunications"
        );
        assert_eq!(
            split_long_text("Research and Development Costs", 10),
            "Research and\nDevelopment Costs"
        );
        assert_eq!(split_long_text("Graduate School", 20), "Graduate School");
        assert_eq!(
            split_long_text("Supercalifragilistic", 10),
            "Supercalifragilistic"
        );
    }
}
