//! Paginated PDF export of a report.
//!
//! Layout is a single column on US-Letter: a bold title line on the first
//! page, then every report line word-wrapped and placed top to bottom,
//! breaking to a new page when the cursor reaches the bottom margin.

use std::path::{Path, PathBuf};

use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

use crate::{
    error::{Result, VidnotesError},
    wrap::wrap_breaking,
};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 50.0;
const BODY_TOP: f32 = PAGE_HEIGHT - 70.0;
const LINE_HEIGHT: f32 = 15.0;
const WRAP_WIDTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Bold,
    Regular,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Bold => "F2",
            Font::Regular => "F1",
        }
    }

    fn size(self) -> i64 {
        match self {
            Font::Bold => 14,
            Font::Regular => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub y: f32,
    pub font: Font,
}

#[derive(Debug, Default)]
pub struct PageLayout {
    pub lines: Vec<PlacedLine>,
}

/// Place the title and the wrapped report lines on pages.
pub fn layout(title: &str, report: &str) -> Vec<PageLayout> {
    let mut pages = vec![PageLayout::default()];
    pages[0].lines.push(PlacedLine {
        text: title.to_string(),
        y: PAGE_HEIGHT - MARGIN,
        font: Font::Bold,
    });

    let mut y = BODY_TOP;
    for line in report.lines() {
        for wrapped in wrap_breaking(line, WRAP_WIDTH) {
            if y < MARGIN {
                pages.push(PageLayout::default());
                y = PAGE_HEIGHT - MARGIN;
            }
            if let Some(page) = pages.last_mut() {
                page.lines.push(PlacedLine {
                    text: wrapped,
                    y,
                    font: Font::Regular,
                });
            }
            y -= LINE_HEIGHT;
        }
    }

    pages
}

/// Render the report to `path` and return the written path.
pub fn export_pdf(title: &str, report: &str, path: &Path) -> Result<PathBuf> {
    let render_err = |reason: String| VidnotesError::RenderFailed {
        path: path.to_path_buf(),
        reason,
    };

    let pages = layout(title, report);
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in &pages {
        let mut operations = Vec::with_capacity(page.lines.len() * 5);
        for line in &page.lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![line.font.resource_name().into(), line.font.size().into()],
            ));
            operations.push(Operation::new("Td", vec![MARGIN.into(), line.y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_win_ansi(&line.text))],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations }
            .encode()
            .map_err(|e| render_err(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    doc.save(path).map_err(|e| render_err(e.to_string()))?;

    tracing::info!(path = %path.display(), pages = pages.len(), "pdf written");
    Ok(path.to_path_buf())
}

/// Map text onto the WinAnsi code page of the standard fonts. Characters
/// outside it become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}
