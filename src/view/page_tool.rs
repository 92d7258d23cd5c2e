use super::style::{bold, fit, paint};
use crate::document_model::{MarkableDocument, PageObserver, registry};
use crossterm::style::Color;

/// Toolbox listing the pages of the document, current page first-marked.
pub struct PageTool {
    frame: Vec<String>,
    color: bool,
    name_width: usize,
    redraw_count: usize,
}

impl PageTool {
    pub fn new() -> Self {
        Self {
            frame: Vec::new(),
            color: true,
            name_width: 24,
            redraw_count: 0,
        }
    }

    pub fn set_color(&mut self, enabled: bool) {
        self.color = enabled;
    }

    pub fn set_name_width(&mut self, width: usize) {
        self.name_width = width;
    }

    /// Lines produced by the last redraw
    pub fn frame(&self) -> &[String] {
        &self.frame
    }

    pub fn redraw_count(&self) -> usize {
        self.redraw_count
    }
}

impl Default for PageTool {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: MarkableDocument> PageObserver<D> for PageTool {
    fn redraw(
        &mut self,
        _selection: &[D::Element],
        document: &D,
        pages: &[String],
        current_page: Option<&str>,
    ) {
        self.redraw_count += 1;
        self.frame.clear();
        self.frame
            .push(bold(&format!("Pages ({})", pages.len()), self.color));

        if pages.is_empty() {
            self.frame.push("   (no pages)".to_string());
            return;
        }

        let entries = registry(document);
        for page_id in pages {
            let display_name = entries
                .iter()
                .find(|entry| &entry.id == page_id)
                .map(|entry| entry.display_name.as_str())
                .unwrap_or("");
            let is_current = current_page == Some(page_id.as_str());
            let line = format!(
                " {} {} {}",
                if is_current { "*" } else { " " },
                fit(display_name, self.name_width),
                page_id
            );
            if is_current {
                self.frame.push(paint(&line, Color::Green, self.color));
            } else {
                self.frame.push(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::{ElementTree, PageManager};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_redraw_lists_pages_and_flags_current() {
        let mut doc = ElementTree::new();
        let mut manager = PageManager::new();
        let tool = Rc::new(RefCell::new(PageTool::new()));
        tool.borrow_mut().set_color(false);
        tool.borrow_mut().set_name_width(8);
        manager.subscribe(tool.clone());

        manager.create_page(&mut doc, "home", "Home").unwrap();
        manager.create_page(&mut doc, "about", "About us").unwrap();
        manager.set_current_page(&mut doc, "home").unwrap();

        let tool = tool.borrow();
        assert_eq!(tool.redraw_count(), 3);
        assert_eq!(
            tool.frame(),
            &[
                "Pages (2)".to_string(),
                " * Home     home".to_string(),
                "   About us about".to_string(),
            ]
        );
    }

    #[test]
    fn test_redraw_without_pages() {
        let mut doc = ElementTree::new();
        let mut manager = PageManager::new();
        let tool = Rc::new(RefCell::new(PageTool::new()));
        tool.borrow_mut().set_color(false);
        manager.subscribe(tool.clone());

        manager.create_page(&mut doc, "home", "Home").unwrap();
        manager.remove_page(&mut doc, "home").unwrap();

        assert_eq!(
            tool.borrow().frame(),
            &["Pages (0)".to_string(), "   (no pages)".to_string()]
        );
    }
}
