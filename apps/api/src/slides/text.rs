//! Run-level text edits over a deck's text outline.
//!
//! A run is the smallest span of text sharing one set of character
//! attributes. Editing inside runs (rather than whole paragraphs) keeps
//! every run's formatting intact.
//!
//! Three edit forms are supported:
//! - `replace_in_deck`: one replacement list over the whole deck or one slide.
//! - `replace_per_slide`: a replacement list per page; invalid pages are skipped.
//! - `set_runs`: overwrite runs addressed by (shape, paragraph, run) index on
//!   one slide, appending a run when the index is past the paragraph's end.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlideTextError {
    #[error("page {page} is out of range (deck has {len} slides)")]
    PageOutOfRange { page: usize, len: usize },

    #[error("page {page} has no shape {shape} ({len} shapes)")]
    ShapeOutOfRange { page: usize, shape: usize, len: usize },

    #[error("shape {shape} has no paragraph {paragraph} ({len} paragraphs)")]
    ParagraphOutOfRange {
        shape: usize,
        paragraph: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

#[cfg(test)]
impl Replacement {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Replacements for one page (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReplacements {
    pub page: usize,
    pub replacements: Vec<Replacement>,
}

/// New text for the run at `shape`/`paragraph`/`run` (0-based indices).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunEdit {
    pub shape: usize,
    pub paragraph: usize,
    pub run: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideText {
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl SlideText {
    fn runs_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.shapes
            .iter_mut()
            .flat_map(|s| s.paragraphs.iter_mut())
            .flat_map(|p| p.runs.iter_mut())
    }
}

/// Result of a per-page replacement pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReplaceReport {
    pub runs_changed: usize,
    pub skipped: Vec<usize>,
}

/// Result of a run edit pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunEditReport {
    pub replaced: usize,
    pub appended: usize,
}

fn slide_mut(slides: &mut [SlideText], page: usize) -> Result<&mut SlideText, SlideTextError> {
    let len = slides.len();
    page.checked_sub(1)
        .and_then(|idx| slides.get_mut(idx))
        .ok_or(SlideTextError::PageOutOfRange { page, len })
}

fn warn_on_empty_patterns(replacements: &[Replacement]) {
    if replacements.iter().any(|r| r.from.is_empty()) {
        warn!("Ignoring replacement with an empty pattern");
    }
}

/// Applies each replacement in order to every run. Returns how many runs
/// changed. Empty `from` patterns are ignored.
pub fn replace_in_runs<'a, I>(runs: I, replacements: &[Replacement]) -> usize
where
    I: IntoIterator<Item = &'a mut String>,
{
    let mut changed = 0;
    for run in runs {
        let mut touched = false;
        for r in replacements.iter().filter(|r| !r.from.is_empty()) {
            if run.contains(r.from.as_str()) {
                *run = run.replace(r.from.as_str(), &r.to);
                touched = true;
            }
        }
        if touched {
            changed += 1;
        }
    }
    changed
}

/// Replaces across the whole deck, or only on `slide_number` (1-based).
pub fn replace_in_deck(
    slides: &mut [SlideText],
    replacements: &[Replacement],
    slide_number: Option<usize>,
) -> Result<usize, SlideTextError> {
    warn_on_empty_patterns(replacements);

    let changed = match slide_number {
        Some(page) => replace_in_runs(slide_mut(slides, page)?.runs_mut(), replacements),
        None => slides
            .iter_mut()
            .map(|s| replace_in_runs(s.runs_mut(), replacements))
            .sum(),
    };

    debug!(runs_changed = changed, slide = ?slide_number, "Replaced slide text");
    Ok(changed)
}

/// Applies each page's replacements to that page only. Pages outside the deck
/// are skipped with a warning.
pub fn replace_per_slide(slides: &mut [SlideText], pages: &[PageReplacements]) -> PageReplaceReport {
    let mut report = PageReplaceReport::default();
    for entry in pages {
        warn_on_empty_patterns(&entry.replacements);
        match slide_mut(slides, entry.page) {
            Ok(slide) => {
                report.runs_changed += replace_in_runs(slide.runs_mut(), &entry.replacements);
            }
            Err(e) => {
                warn!(page = entry.page, error = %e, "Skipping slide page");
                report.skipped.push(entry.page);
            }
        }
    }
    report
}

/// Overwrites runs on slide `page` by index. An edit whose run index is past
/// the end of its paragraph appends a new run holding `" " + text`. Every
/// shape and paragraph index is checked first, so a failed call leaves the
/// deck unchanged.
pub fn set_runs(
    slides: &mut [SlideText],
    page: usize,
    edits: &[RunEdit],
) -> Result<RunEditReport, SlideTextError> {
    let slide = slide_mut(slides, page)?;

    for edit in edits {
        let shape = slide
            .shapes
            .get(edit.shape)
            .ok_or(SlideTextError::ShapeOutOfRange {
                page,
                shape: edit.shape,
                len: slide.shapes.len(),
            })?;
        if edit.paragraph >= shape.paragraphs.len() {
            return Err(SlideTextError::ParagraphOutOfRange {
                shape: edit.shape,
                paragraph: edit.paragraph,
                len: shape.paragraphs.len(),
            });
        }
    }

    let mut report = RunEditReport::default();
    for edit in edits {
        let runs = &mut slide.shapes[edit.shape].paragraphs[edit.paragraph].runs;
        match runs.get_mut(edit.run) {
            Some(run) => {
                *run = edit.text.clone();
                report.replaced += 1;
            }
            None => {
                runs.push(format!(" {}", edit.text));
                report.appended += 1;
            }
        }
    }

    debug!(
        page,
        replaced = report.replaced,
        appended = report.appended,
        "Set slide runs"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(runs: &[&str]) -> SlideText {
        SlideText {
            shapes: vec![Shape {
                paragraphs: vec![Paragraph {
                    runs: runs.iter().map(|r| r.to_string()).collect(),
                }],
            }],
        }
    }

    fn first_runs(slide: &SlideText) -> &[String] {
        &slide.shapes[0].paragraphs[0].runs
    }

    fn edit(shape: usize, paragraph: usize, run: usize, text: &str) -> RunEdit {
        RunEdit {
            shape,
            paragraph,
            run,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_replace_counts_changed_runs() {
        let mut runs = vec![
            "第十一课".to_string(),
            "2025年12月14日".to_string(),
            "无关".to_string(),
        ];
        let replacements = vec![
            Replacement::new("第十一课", "第十二课"),
            Replacement::new("12月14日", "12月21日"),
        ];
        let changed = replace_in_runs(runs.iter_mut(), &replacements);
        assert_eq!(changed, 2);
        assert_eq!(runs[0], "第十二课");
        assert_eq!(runs[1], "2025年12月21日");
        assert_eq!(runs[2], "无关");
    }

    #[test]
    fn test_replacements_apply_in_order() {
        let mut runs = vec!["a".to_string()];
        let replacements = vec![Replacement::new("a", "b"), Replacement::new("b", "c")];
        let changed = replace_in_runs(runs.iter_mut(), &replacements);
        assert_eq!(changed, 1);
        assert_eq!(runs[0], "c");
    }

    #[test]
    fn test_replace_all_occurrences_in_run() {
        let mut runs = vec!["主 主 主".to_string()];
        replace_in_runs(runs.iter_mut(), &[Replacement::new("主", "神")]);
        assert_eq!(runs[0], "神 神 神");
    }

    #[test]
    fn test_empty_pattern_is_ignored() {
        let mut runs = vec!["abc".to_string()];
        let changed = replace_in_runs(runs.iter_mut(), &[Replacement::new("", "x")]);
        assert_eq!(changed, 0);
        assert_eq!(runs[0], "abc");
    }

    #[test]
    fn test_replace_in_deck_single_slide() {
        let mut deck = vec![slide(&["诗歌"]), slide(&["诗歌"])];
        let changed =
            replace_in_deck(&mut deck, &[Replacement::new("诗歌", "敬拜")], Some(2)).unwrap();
        assert_eq!(changed, 1);
        assert_eq!(first_runs(&deck[0])[0], "诗歌");
        assert_eq!(first_runs(&deck[1])[0], "敬拜");
    }

    #[test]
    fn test_replace_in_deck_whole_deck() {
        let mut deck = vec![slide(&["x", "xy"]), slide(&["y"])];
        let changed = replace_in_deck(&mut deck, &[Replacement::new("x", "z")], None).unwrap();
        assert_eq!(changed, 2);
    }

    #[test]
    fn test_replace_in_deck_rejects_bad_slide_number() {
        let mut deck = vec![slide(&["x"])];
        let replacements = [Replacement::new("x", "y")];
        assert_eq!(
            replace_in_deck(&mut deck, &replacements, Some(0)),
            Err(SlideTextError::PageOutOfRange { page: 0, len: 1 })
        );
        assert!(replace_in_deck(&mut deck, &replacements, Some(2)).is_err());
        assert_eq!(first_runs(&deck[0])[0], "x");
    }

    #[test]
    fn test_replace_per_slide_uses_each_pages_list() {
        let mut deck = vec![slide(&["标题"]), slide(&["内容"]), slide(&["2025"])];
        let pages = vec![
            PageReplacements {
                page: 1,
                replacements: vec![Replacement::new("标题", "新标题")],
            },
            PageReplacements {
                page: 3,
                replacements: vec![Replacement::new("2025", "2026")],
            },
        ];
        let report = replace_per_slide(&mut deck, &pages);
        assert_eq!(report.runs_changed, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(first_runs(&deck[0])[0], "新标题");
        assert_eq!(first_runs(&deck[1])[0], "内容");
        assert_eq!(first_runs(&deck[2])[0], "2026");
    }

    #[test]
    fn test_replace_per_slide_skips_invalid_pages() {
        let mut deck = vec![slide(&["a"]), slide(&["a"])];
        let pages = vec![
            PageReplacements {
                page: 0,
                replacements: vec![Replacement::new("a", "b")],
            },
            PageReplacements {
                page: 2,
                replacements: vec![Replacement::new("a", "b")],
            },
            PageReplacements {
                page: 7,
                replacements: vec![Replacement::new("a", "b")],
            },
        ];
        let report = replace_per_slide(&mut deck, &pages);
        assert_eq!(report.skipped, vec![0, 7]);
        assert_eq!(report.runs_changed, 1);
        assert_eq!(first_runs(&deck[0])[0], "a");
        assert_eq!(first_runs(&deck[1])[0], "b");
    }

    #[test]
    fn test_set_runs_overwrites_existing_run() {
        let mut deck = vec![slide(&["路加福音 9:1", "旧"])];
        let report = set_runs(&mut deck, 1, &[edit(0, 0, 1, "新")]).unwrap();
        assert_eq!(report, RunEditReport { replaced: 1, appended: 0 });
        assert_eq!(first_runs(&deck[0]), &["路加福音 9:1".to_string(), "新".to_string()]);
    }

    #[test]
    fn test_set_runs_appends_past_the_end() {
        let mut deck = vec![slide(&["1"])];
        let report =
            set_runs(&mut deck, 1, &[edit(0, 0, 5, "耶稣差遣十二门徒"), edit(0, 0, 9, "阿们")])
                .unwrap();
        assert_eq!(report, RunEditReport { replaced: 0, appended: 2 });
        assert_eq!(
            first_runs(&deck[0]),
            &["1".to_string(), " 耶稣差遣十二门徒".to_string(), " 阿们".to_string()]
        );
    }

    #[test]
    fn test_set_runs_rejects_bad_indices_without_changes() {
        let mut deck = vec![slide(&["x"])];
        assert_eq!(
            set_runs(&mut deck, 1, &[edit(0, 0, 0, "y"), edit(3, 0, 0, "z")]),
            Err(SlideTextError::ShapeOutOfRange { page: 1, shape: 3, len: 1 })
        );
        assert_eq!(
            set_runs(&mut deck, 1, &[edit(0, 2, 0, "y")]),
            Err(SlideTextError::ParagraphOutOfRange { shape: 0, paragraph: 2, len: 1 })
        );
        assert!(matches!(
            set_runs(&mut deck, 2, &[edit(0, 0, 0, "y")]),
            Err(SlideTextError::PageOutOfRange { .. })
        ));
        assert_eq!(first_runs(&deck[0])[0], "x");
    }
}
