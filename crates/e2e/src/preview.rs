//! Preview assertions per file type
//!
//! Visibility of the renderer's container is the whole oracle: no pixel,
//! text or page-count checks.

use docpreview_cmis::samples::{PDF_SAMPLE, PNG_SAMPLE, TEXT_SAMPLE};
use docpreview_cmis::SampleFile;
use serde::{Deserialize, Serialize};

use crate::playwright::{Locator, PageStep};

const ACTIVE_PANE: &str = ".ant-tabs-tabpane-active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Pdf,
    Image,
    Text,
}

impl PreviewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewKind::Pdf => "pdf",
            PreviewKind::Image => "image",
            PreviewKind::Text => "text",
        }
    }
}

impl std::str::FromStr for PreviewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(PreviewKind::Pdf),
            "image" | "png" => Ok(PreviewKind::Image),
            "text" | "txt" => Ok(PreviewKind::Text),
            other => Err(format!("unknown preview case: {other}")),
        }
    }
}

/// One preview test: a sample file and the marker its renderer mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewCase {
    pub kind: PreviewKind,
    pub file: SampleFile,
}

impl PreviewCase {
    pub fn new(kind: PreviewKind) -> Self {
        let file = match kind {
            PreviewKind::Pdf => PDF_SAMPLE,
            PreviewKind::Image => PNG_SAMPLE,
            PreviewKind::Text => TEXT_SAMPLE,
        };
        Self { kind, file }
    }

    pub fn all() -> Vec<Self> {
        [PreviewKind::Pdf, PreviewKind::Image, PreviewKind::Text]
            .into_iter()
            .map(Self::new)
            .collect()
    }

    pub fn name(&self) -> String {
        format!("{}-preview", self.kind.as_str())
    }

    /// Element whose visibility proves the right renderer mounted
    pub fn marker(&self) -> Locator {
        match self.kind {
            PreviewKind::Pdf => Locator::css(".react-pdf__Document, [data-testid=\"pdf-preview\"]").first(),
            PreviewKind::Image => Locator::css(ACTIVE_PANE).child("img").first(),
            // The text editor renders the file name as its header
            PreviewKind::Text => Locator::css(ACTIVE_PANE)
                .child("h4")
                .has_text(self.file.file_name)
                .first(),
        }
    }

    pub fn assertion(&self, timeout_ms: u64) -> PageStep {
        PageStep::ExpectVisible {
            target: self.marker(),
            timeout_ms,
        }
    }
}
