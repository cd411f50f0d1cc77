//! Slide order planning.
//!
//! A deck's order is an explicit array of slide entries. Page numbers in the
//! public API are 1-based, as they appear in the presentation editor. Every
//! operation checks its page numbers before touching the array, so a failed
//! operation leaves the order unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(pub u32);

/// Where a slide in the plan comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum SlideOrigin {
    /// A slide of the source deck; its id is its original page number.
    Original,
    /// A deep copy of another slide in the plan.
    CopyOf(SlideId),
    /// A new blank slide (e.g. a full-screen video slide).
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub origin: SlideOrigin,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlideOrderError {
    #[error("page {page} is out of range (deck has {len} slides)")]
    OutOfRange { page: usize, len: usize },

    #[error("cannot swap page {0} with itself")]
    SameSlide(usize),

    #[error("a deck of {count} slides exceeds the {max} slide limit")]
    TooManySlides { count: usize, max: usize },
}

/// Largest deck a plan may start from.
pub const MAX_SLIDES: usize = 2000;

/// Outcome of a batch operation: pages acted on and pages skipped as invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub applied: Vec<usize>,
    pub skipped: Vec<usize>,
}

/// One step of a slide plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SlideOp {
    Delete { page: usize },
    DeleteMany { pages: Vec<usize> },
    Duplicate { page: usize },
    DuplicateMany { pages: Vec<usize> },
    Swap { a: usize, b: usize },
    Move { from: usize, to: usize },
    InsertNew { position: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideOrder {
    slides: Vec<Slide>,
    next_id: u32,
}

impl SlideOrder {
    /// A deck of `count` original slides, ids `1..=count`.
    pub fn new(count: usize) -> Result<Self, SlideOrderError> {
        let last = u32::try_from(count)
            .ok()
            .filter(|_| count <= MAX_SLIDES)
            .ok_or(SlideOrderError::TooManySlides {
                count,
                max: MAX_SLIDES,
            })?;
        let slides = (1..=last)
            .map(|n| Slide {
                id: SlideId(n),
                origin: SlideOrigin::Original,
            })
            .collect();
        Ok(Self {
            slides,
            next_id: last + 1,
        })
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<SlideId> {
        self.slides.iter().map(|s| s.id).collect()
    }

    fn index_of(&self, page: usize) -> Result<usize, SlideOrderError> {
        if page == 0 || page > self.slides.len() {
            return Err(SlideOrderError::OutOfRange {
                page,
                len: self.slides.len(),
            });
        }
        Ok(page - 1)
    }

    fn fresh_id(&mut self) -> SlideId {
        let id = SlideId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn delete(&mut self, page: usize) -> Result<Slide, SlideOrderError> {
        let idx = self.index_of(page)?;
        Ok(self.slides.remove(idx))
    }

    /// Deletes from the highest page down so earlier numbers stay valid.
    /// Invalid pages are skipped; a repeated page deletes whatever slide has
    /// moved into that position.
    pub fn delete_many(&mut self, pages: &[usize]) -> BatchReport {
        self.for_each_descending(pages, |order, page| order.delete(page).map(|_| ()))
    }

    /// Inserts a copy of `page` right after it.
    pub fn duplicate(&mut self, page: usize) -> Result<Slide, SlideOrderError> {
        let idx = self.index_of(page)?;
        let copy = Slide {
            id: self.fresh_id(),
            origin: SlideOrigin::CopyOf(self.slides[idx].id),
        };
        self.slides.insert(idx + 1, copy);
        Ok(copy)
    }

    pub fn duplicate_many(&mut self, pages: &[usize]) -> BatchReport {
        self.for_each_descending(pages, |order, page| order.duplicate(page).map(|_| ()))
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), SlideOrderError> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return Err(SlideOrderError::SameSlide(a));
        }
        self.slides.swap(ia, ib);
        Ok(())
    }

    /// Moves the slide at `from` so that it ends up at page `to`.
    pub fn move_slide(&mut self, from: usize, to: usize) -> Result<(), SlideOrderError> {
        let src = self.index_of(from)?;
        let dst = self.index_of(to)?;
        let slide = self.slides.remove(src);
        self.slides.insert(dst, slide);
        Ok(())
    }

    /// Adds a blank slide at page `position`, or at the end when `None`.
    /// `position` may be one past the current last page.
    pub fn insert_new(&mut self, position: Option<usize>) -> Result<Slide, SlideOrderError> {
        let idx = match position {
            None => self.slides.len(),
            Some(page) if page >= 1 && page <= self.slides.len() + 1 => page - 1,
            Some(page) => {
                return Err(SlideOrderError::OutOfRange {
                    page,
                    len: self.slides.len() + 1,
                })
            }
        };
        let slide = Slide {
            id: self.fresh_id(),
            origin: SlideOrigin::Blank,
        };
        self.slides.insert(idx, slide);
        Ok(slide)
    }

    /// Applies one plan step. Batch steps never fail; they report skips instead.
    pub fn apply(&mut self, op: &SlideOp) -> Result<BatchReport, SlideOrderError> {
        let single = |page: usize| BatchReport {
            applied: vec![page],
            skipped: vec![],
        };
        match op {
            SlideOp::Delete { page } => self.delete(*page).map(|_| single(*page)),
            SlideOp::DeleteMany { pages } => Ok(self.delete_many(pages)),
            SlideOp::Duplicate { page } => self.duplicate(*page).map(|_| single(*page)),
            SlideOp::DuplicateMany { pages } => Ok(self.duplicate_many(pages)),
            SlideOp::Swap { a, b } => self.swap(*a, *b).map(|_| BatchReport {
                applied: vec![*a, *b],
                skipped: vec![],
            }),
            SlideOp::Move { from, to } => self.move_slide(*from, *to).map(|_| single(*to)),
            SlideOp::InsertNew { position } => self.insert_new(*position).map(|_| {
                single(position.unwrap_or(self.slides.len()))
            }),
        }
    }

    fn for_each_descending<F>(&mut self, pages: &[usize], mut step: F) -> BatchReport
    where
        F: FnMut(&mut Self, usize) -> Result<(), SlideOrderError>,
    {
        let mut sorted = pages.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));

        let mut report = BatchReport::default();
        for page in sorted {
            match step(self, page) {
                Ok(()) => report.applied.push(page),
                Err(e) => {
                    warn!(page, error = %e, "Skipping slide page");
                    report.skipped.push(page);
                }
            }
        }
        report
    }
}
