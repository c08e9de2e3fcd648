use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use vaulta_protocol::{ScrollExtent, SectionExtent};

use crate::snap::PinnedSectionRegistry;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid layout json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("viewport height must be positive and finite, got {0}")]
    InvalidViewport(f64),
    #[error("section `{id}`: {reason}")]
    InvalidSection { id: String, reason: &'static str },
    #[error("duplicate section id `{0}`")]
    DuplicateSection(String),
}

/// How a section occupies the page. Lengths are multiples of the
/// viewport height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionKind {
    /// One viewport tall, held in place for `pin_length` viewports of
    /// scrolling once its top reaches the top of the viewport.
    Pinned { pin_length: f64 },
    /// Scrolls normally.
    Flowing { height: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: String,
    #[serde(flatten)]
    pub kind: SectionKind,
}

impl SectionSpec {
    pub fn pinned(id: &str, pin_length: f64) -> Self {
        Self {
            id: id.to_owned(),
            kind: SectionKind::Pinned { pin_length },
        }
    }

    pub fn flowing(id: &str, height: f64) -> Self {
        Self {
            id: id.to_owned(),
            kind: SectionKind::Flowing { height },
        }
    }
}

/// Ordered page sections, independent of any viewport size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub sections: Vec<SectionSpec>,
}

impl PageLayout {
    /// The Vaulta product page.
    pub fn vaulta() -> Self {
        Self {
            sections: vec![
                SectionSpec::pinned("hero", 1.3),
                SectionSpec::pinned("problem", 1.3),
                SectionSpec::pinned("solution", 1.3),
                SectionSpec::pinned("share", 1.3),
                SectionSpec::pinned("security", 1.3),
                SectionSpec::pinned("emergency", 1.3),
                SectionSpec::flowing("usecases", 2.0),
                SectionSpec::pinned("vision", 1.3),
                SectionSpec::flowing("cta", 1.0),
            ],
        }
    }

    pub fn from_json(data: &[u8]) -> Result<Self, LayoutError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Lay the sections out for a viewport `viewport_height` pixels tall.
    pub fn measure(&self, viewport_height: f64) -> Result<MeasuredPage, LayoutError> {
        if !viewport_height.is_finite() || viewport_height <= 0.0 {
            return Err(LayoutError::InvalidViewport(viewport_height));
        }

        let mut seen = HashSet::new();
        let mut sections = Vec::with_capacity(self.sections.len());
        let mut top = 0.0;
        for spec in &self.sections {
            if !seen.insert(spec.id.as_str()) {
                return Err(LayoutError::DuplicateSection(spec.id.clone()));
            }
            let (height, pin) = match spec.kind {
                SectionKind::Pinned { pin_length } => {
                    check_length(&spec.id, pin_length, "pin length must be finite and >= 0")?;
                    let pin_px = pin_length * viewport_height;
                    (
                        viewport_height + pin_px,
                        Some(ScrollExtent::new(top, top + pin_px)),
                    )
                }
                SectionKind::Flowing { height } => {
                    check_length(&spec.id, height, "height must be finite and >= 0")?;
                    (height * viewport_height, None)
                }
            };
            sections.push(MeasuredSection {
                id: spec.id.clone(),
                kind: spec.kind,
                top,
                height,
                pin,
            });
            top += height;
        }

        let page = MeasuredPage {
            sections,
            document_height: top,
            viewport_height,
        };
        info!(
            sections = page.sections.len(),
            document_height = page.document_height,
            viewport_height,
            "page measured"
        );
        Ok(page)
    }
}

fn check_length(id: &str, value: f64, reason: &'static str) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidSection {
            id: id.to_owned(),
            reason,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredSection {
    pub id: String,
    pub kind: SectionKind,
    /// Document offset of the section's top, in pixels.
    pub top: f64,
    /// Document height including pin spacing, in pixels.
    pub height: f64,
    /// Scroll offsets over which the section is pinned.
    pub pin: Option<ScrollExtent>,
}

impl MeasuredSection {
    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

/// A page layout resolved against one viewport height.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredPage {
    sections: Vec<MeasuredSection>,
    document_height: f64,
    viewport_height: f64,
}

impl MeasuredPage {
    pub fn sections(&self) -> &[MeasuredSection] {
        &self.sections
    }

    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    /// Section at the top edge of the viewport when scrolled to `offset`.
    pub fn section_at(&self, offset: f64) -> Option<&MeasuredSection> {
        self.sections
            .iter()
            .rev()
            .find(|s| offset >= s.top)
            .or_else(|| self.sections.first())
    }
}

impl PinnedSectionRegistry for MeasuredPage {
    fn pinned_extents(&self) -> Vec<SectionExtent> {
        self.sections
            .iter()
            .filter_map(|s| {
                s.pin.map(|extent| SectionExtent {
                    id: s.id.clone(),
                    extent,
                })
            })
            .collect()
    }
}
