use std::path::Path;
use std::sync::{Arc, Mutex};

use unicode_width::UnicodeWidthChar;

use super::{DocumentInfo, Rasterizer, RenderedPage, ServiceError};
use crate::document::DocumentHandle;

/// Render width used when the container width is not yet known.
pub const DEFAULT_RENDER_WIDTH: u16 = 80;

const FORM_FEED: char = '\x0c';
const TAB_WIDTH: usize = 4;

/// Rasterizer for UTF-8 text documents (e.g. `pdftotext` output).
///
/// Pages are separated by form feeds. Text without any form feed is split
/// every `lines_per_page` source lines. The most recently opened document is
/// cached so rendering a page does not re-read the file.
#[derive(Debug)]
pub struct TextRasterizer {
    lines_per_page: usize,
    cache: Mutex<Option<(String, Arc<Vec<String>>)>>,
}

impl TextRasterizer {
    pub fn new(lines_per_page: usize) -> Self {
        Self {
            lines_per_page: lines_per_page.max(1),
            cache: Mutex::new(None),
        }
    }

    fn pages(&self, handle: &DocumentHandle) -> Result<Arc<Vec<String>>, ServiceError> {
        let key = handle.to_string();
        if let Ok(cache) = self.cache.lock()
            && let Some((cached_key, pages)) = cache.as_ref()
            && *cached_key == key
        {
            return Ok(Arc::clone(pages));
        }

        let path = handle
            .local_path()
            .ok_or_else(|| ServiceError::UnsupportedLocation(key.clone()))?;
        let pages = Arc::new(self.read_pages(&path)?);
        if let Ok(mut cache) = self.cache.lock() {
            *cache = Some((key, Arc::clone(&pages)));
        }
        Ok(pages)
    }

    fn read_pages(&self, path: &Path) -> Result<Vec<String>, ServiceError> {
        let bytes = std::fs::read(path).map_err(|source| ServiceError::Io {
            location: path.display().to_string(),
            source,
        })?;
        let text = String::from_utf8(bytes)
            .ok()
            .filter(|text| !text.chars().any(is_binary_control))
            .ok_or_else(|| ServiceError::NotText(path.display().to_string()))?;
        let pages = paginate(&text, self.lines_per_page);
        if pages.is_empty() {
            return Err(ServiceError::EmptyDocument);
        }
        Ok(pages)
    }
}

impl Rasterizer for TextRasterizer {
    fn open_document(&self, handle: &DocumentHandle) -> Result<DocumentInfo, ServiceError> {
        let pages = self.pages(handle)?;
        tracing::debug!(document = %handle, pages = pages.len(), "opened text document");
        Ok(DocumentInfo {
            page_count: pages.len(),
        })
    }

    fn page_text(&self, handle: &DocumentHandle) -> Result<Vec<String>, ServiceError> {
        Ok(self.pages(handle)?.as_ref().clone())
    }

    fn render_page(
        &self,
        handle: &DocumentHandle,
        index: usize,
        width: Option<u16>,
    ) -> Result<RenderedPage, ServiceError> {
        let pages = self.pages(handle)?;
        let text = index
            .checked_sub(1)
            .and_then(|i| pages.get(i))
            .ok_or(ServiceError::PageOutOfRange {
                index,
                total: pages.len(),
            })?;
        let columns = usize::from(width.unwrap_or(DEFAULT_RENDER_WIDTH).max(1));
        let rows = text
            .lines()
            .flat_map(|line| wrap_line(line, columns))
            .collect();
        Ok(RenderedPage {
            index,
            requested_width: width,
            rows,
        })
    }
}

/// Control characters that never appear in extracted text.
fn is_binary_control(c: char) -> bool {
    c.is_control() && !matches!(c, '\t' | '\n' | '\r' | FORM_FEED)
}

fn paginate(text: &str, lines_per_page: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if text.contains(FORM_FEED) {
        let mut pages: Vec<String> = text
            .split(FORM_FEED)
            .map(|page| page.trim_end_matches(['\r', '\n']).to_string())
            .collect();
        // pdftotext ends the last page with a form feed
        if pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        return pages;
    }
    let lines: Vec<&str> = text.lines().collect();
    lines
        .chunks(lines_per_page)
        .map(|chunk| chunk.join("\n"))
        .collect()
}

/// Wrap one source line into rows of at most `columns` display columns.
///
/// Breaks at spaces where possible and hard-breaks words longer than a row.
/// An empty line yields one empty row.
pub fn wrap_line(line: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let expanded = line.replace('\t', &" ".repeat(TAB_WIDTH));
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_width = 0usize;

    for word in expanded.split_inclusive(' ') {
        let word_width: usize = word.chars().map(|c| c.width().unwrap_or(0)).sum();
        let trimmed_width = word_width - usize::from(word.ends_with(' '));
        if row_width + trimmed_width > columns && row_width > 0 {
            rows.push(row.trim_end().to_string());
            row.clear();
            row_width = 0;
        }
        if trimmed_width > columns {
            for ch in word.chars() {
                let w = ch.width().unwrap_or(0);
                if row_width + w > columns && row_width > 0 {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                row.push(ch);
                row_width += w;
            }
            continue;
        }
        row.push_str(word);
        row_width += word_width;
    }
    if !row.is_empty() || rows.is_empty() {
        rows.push(row.trim_end().to_string());
    }
    rows
}
