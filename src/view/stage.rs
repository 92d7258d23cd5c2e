use super::style::{fit, paint};
use super::view_model::StageViewModel;
use crate::document_model::markers::PAGED_CLASS_NAME;
use crate::document_model::visibility::is_shown;
use crate::document_model::{PageObserver, is_page_entry, link_page, parent_page};
use crossterm::style::Color;

const CONTENT_WIDTH: usize = 20;

/// Outline of the edited content as seen on the current page.
pub struct Stage {
    frame: Vec<String>,
    color: bool,
    show_hidden: bool,
    redraw_count: usize,
}

impl Stage {
    pub fn new() -> Self {
        Self {
            frame: Vec::new(),
            color: true,
            show_hidden: true,
            redraw_count: 0,
        }
    }

    pub fn set_color(&mut self, enabled: bool) {
        self.color = enabled;
    }

    /// List elements hidden on the current page, greyed out
    pub fn set_show_hidden(&mut self, show: bool) {
        self.show_hidden = show;
    }

    pub fn frame(&self) -> &[String] {
        &self.frame
    }

    pub fn redraw_count(&self) -> usize {
        self.redraw_count
    }

    fn describe<D: StageViewModel>(
        &self,
        document: &D,
        element: D::Element,
        pages: &[String],
    ) -> String {
        let mut line = format!(
            "{}{} <{}>",
            "  ".repeat(document.depth(element)),
            document.handle(element),
            document.tag(element)
        );

        let content = document.content(element);
        if !content.is_empty() {
            line.push_str(&format!(" \"{}\"", fit(&content, CONTENT_WIDTH).trim_end()));
        }

        if document.has_marker(element, PAGED_CLASS_NAME) {
            let member_of: Vec<&str> = pages
                .iter()
                .filter(|page| document.has_marker(element, page))
                .map(String::as_str)
                .collect();
            line.push(' ');
            line.push_str(&paint(
                &format!("[{}]", member_of.join(", ")),
                Color::Cyan,
                self.color,
            ));
        } else if let Some(ancestor) = parent_page(document, element) {
            line.push_str(&format!(" (in {})", document.handle(ancestor)));
        }

        if let Some(target) = link_page(document, element) {
            line.push(' ');
            line.push_str(&paint(&format!("-> {target}"), Color::Magenta, self.color));
        }

        line
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: StageViewModel> PageObserver<D> for Stage {
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
            .push(format!("Stage [{}]", current_page.unwrap_or("-")));

        let mut skipped = 0;
        for element in document.elements() {
            if is_page_entry(document, element) {
                continue;
            }
            let shown = is_shown(document, element, current_page);
            if !shown && !self.show_hidden {
                skipped += 1;
                continue;
            }
            let description = self.describe(document, element, pages);
            if shown {
                self.frame.push(format!("  {description}"));
            } else {
                self.frame
                    .push(paint(&format!("- {description}"), Color::DarkGrey, self.color));
            }
        }

        if skipped > 0 {
            self.frame.push(format!("  ({skipped} hidden)"));
        }
    }
}
