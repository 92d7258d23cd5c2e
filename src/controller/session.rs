use super::command::{CommandError, PageCommand};
use crate::config::RcConfig;
use crate::document_model::visibility;
use crate::document_model::{
    ElementId, ElementTree, MarkableDocument, PageError, PageManager,
};
use crate::view::{PageTool, Stage};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("no element {0} in the document")]
    UnknownElement(ElementId),
}

/// Editing session over one document: the page manager, its two views and the
/// settings loaded from the rc file.
pub struct EditorSession {
    document: ElementTree,
    manager: PageManager<ElementTree>,
    page_tool: Rc<RefCell<PageTool>>,
    stage: Rc<RefCell<Stage>>,
    config: RcConfig,
    pub status_message: String,
    drawn: usize,
}

impl EditorSession {
    pub fn new(config: RcConfig) -> Self {
        Self::with_document(ElementTree::new(), config)
    }

    pub fn with_document(document: ElementTree, config: RcConfig) -> Self {
        let page_tool = Rc::new(RefCell::new(PageTool::new()));
        page_tool.borrow_mut().set_color(config.color);
        page_tool.borrow_mut().set_name_width(config.name_width);

        let stage = Rc::new(RefCell::new(Stage::new()));
        stage.borrow_mut().set_color(config.color);
        stage.borrow_mut().set_show_hidden(config.show_hidden);

        let mut manager = PageManager::new();
        manager.subscribe(page_tool.clone());
        manager.subscribe(stage.clone());

        Self {
            document,
            manager,
            page_tool,
            stage,
            config,
            status_message: String::new(),
            drawn: 0,
        }
    }

    pub fn document(&self) -> &ElementTree {
        &self.document
    }

    pub fn manager(&self) -> &PageManager<ElementTree> {
        &self.manager
    }

    /// Parse and run one line. Returns true when the session should end.
    pub fn execute_line(&mut self, line: &str) -> Result<bool, SessionError> {
        match PageCommand::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(false),
        }
    }

    /// Run `command`, leaving its outcome in `status_message`. Returns true
    /// when the session should end.
    pub fn execute(&mut self, command: PageCommand) -> Result<bool, SessionError> {
        self.status_message.clear();
        debug!("executing {command:?}");
        let result = self.dispatch(command);
        if let Err(e) = &result {
            warn!("command rejected: {e}");
        }
        result
    }

    fn dispatch(&mut self, command: PageCommand) -> Result<bool, SessionError> {
        match command {
            PageCommand::Pages => {
                let current = self.manager.current_page(&self.document);
                let listed: Vec<String> = self
                    .manager
                    .pages(&self.document)
                    .into_iter()
                    .map(|page| {
                        if current.as_deref() == Some(page.as_str()) {
                            format!("*{page}")
                        } else {
                            page
                        }
                    })
                    .collect();
                self.status_message = if listed.is_empty() {
                    "no pages".to_string()
                } else {
                    listed.join(" ")
                };
            }
            PageCommand::Open(id) => {
                self.manager.set_current_page(&mut self.document, &id)?;
                self.apply_visibility();
                self.status_message = format!("page {id}");
            }
            PageCommand::New { id, name } => {
                self.manager.create_page(&mut self.document, &id, &name)?;
                self.apply_visibility();
                self.status_message = format!("created page {id}");
            }
            PageCommand::Rename {
                old_id,
                new_id,
                name,
            } => {
                self.manager
                    .rename_page(&mut self.document, &old_id, &new_id, &name)?;
                self.apply_visibility();
                self.status_message = format!("renamed page {old_id} to {new_id}");
            }
            PageCommand::Remove(id) => self.remove_page(&id)?,
            PageCommand::Name(id) => {
                if !self.manager.pages(&self.document).contains(&id) {
                    return Err(PageError::NotFound(id).into());
                }
                self.status_message = self.manager.display_name(&self.document, &id);
            }
            PageCommand::Add { tag, parent, text } => {
                let parent = match parent {
                    Some(index) => self.element(index)?,
                    None => self
                        .document
                        .root()
                        .ok_or_else(|| PageError::NotFound("document root".to_string()))?,
                };
                let element = self.document.append_with_text(parent, &tag, &text);
                self.refresh();
                self.status_message = format!("added {element} <{tag}>");
            }
            PageCommand::Show { element, page } => {
                let element = self.element(element)?;
                self.manager.add_to_page(&mut self.document, element, &page)?;
                self.membership_changed(element);
            }
            PageCommand::Hide { element, page } => {
                let element = self.element(element)?;
                self.manager
                    .remove_from_page(&mut self.document, element, &page);
                self.membership_changed(element);
            }
            PageCommand::HideAll(element) => {
                let element = self.element(element)?;
                self.manager
                    .remove_from_all_pages(&mut self.document, element);
                self.membership_changed(element);
            }
            PageCommand::Link { element, page } => {
                let element = self.element(element)?;
                self.manager
                    .link_to_page(&mut self.document, element, &page)?;
                self.apply_visibility();
                self.refresh();
                self.status_message = format!("{element} links to {page}");
            }
            PageCommand::Unlink(element) => {
                let element = self.element(element)?;
                self.manager.clear_link(&mut self.document, element);
                self.apply_visibility();
                self.refresh();
                self.status_message = format!("{element} link cleared");
            }
            PageCommand::Which(element) => {
                let element = self.element(element)?;
                self.status_message = self.describe_membership(element);
            }
            PageCommand::In { element, page } => {
                let element = self.element(element)?;
                let page = page.or_else(|| self.manager.current_page(&self.document));
                let inside = self
                    .manager
                    .is_in_page(&self.document, element, page.as_deref());
                self.status_message = format!(
                    "{element} is {}in {}",
                    if inside { "" } else { "not " },
                    page.as_deref().unwrap_or("-")
                );
            }
            PageCommand::Parent(element) => {
                let element = self.element(element)?;
                self.status_message = match self.manager.parent_page(&self.document, element) {
                    Some(parent) => format!("{element} follows the pages of {parent}"),
                    None => format!("{element} has no paged parent"),
                };
            }
            PageCommand::Draw => self.refresh(),
            PageCommand::Quit => return Ok(true),
        }
        Ok(false)
    }

    fn remove_page(&mut self, id: &str) -> Result<(), SessionError> {
        let orphans = self.manager.remove_page(&mut self.document, id)?;
        self.status_message = format!("removed page {id}");

        if !orphans.is_empty() {
            let handles: Vec<String> = orphans.iter().map(ToString::to_string).collect();
            if self.config.delete_orphans {
                for &orphan in &orphans {
                    self.document.remove_element(orphan);
                }
                info!("deleted {} element(s) only shown on {id}", orphans.len());
                self.status_message
                    .push_str(&format!(", deleted {}", handles.join(" ")));
                self.refresh();
            } else {
                self.status_message
                    .push_str(&format!(", now on every page: {}", handles.join(" ")));
            }
        }
        self.apply_visibility();
        Ok(())
    }

    fn membership_changed(&mut self, element: ElementId) {
        self.apply_visibility();
        self.refresh();
        self.status_message = self.describe_membership(element);
    }

    fn describe_membership(&self, element: ElementId) -> String {
        let pages = self.manager.pages_for_element(&self.document, element);
        if pages.is_empty() {
            format!("{element} is on every page")
        } else {
            format!("{element} is on {}", pages.join(", "))
        }
    }

    fn element(&self, index: usize) -> Result<ElementId, SessionError> {
        let element = ElementId::from_index(index);
        if Some(element) == self.document.root() || !self.document.contains(element) {
            return Err(SessionError::UnknownElement(element));
        }
        Ok(element)
    }

    fn apply_visibility(&mut self) {
        let current = self.document.current_page();
        visibility::apply(&mut self.document, current.as_deref());
    }

    fn refresh(&self) {
        self.manager.refresh(&self.document);
    }

    /// Lines of both views if they were redrawn since the last call.
    pub fn take_frames(&mut self) -> Option<Vec<String>> {
        let page_tool = self.page_tool.borrow();
        let stage = self.stage.borrow();
        let drawn = page_tool.redraw_count() + stage.redraw_count();
        if drawn == self.drawn {
            return None;
        }
        self.drawn = drawn;

        let mut lines = page_tool.frame().to_vec();
        lines.extend_from_slice(stage.frame());
        Some(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::markers::{PAGE_LINK_ACTIVE_CLASS_NAME, PAGED_VISIBLE_CLASS_NAME};

    fn plain_config() -> RcConfig {
        RcConfig {
            color: false,
            ..RcConfig::default()
        }
    }

    fn run(session: &mut EditorSession, lines: &[&str]) {
        for line in lines {
            session.execute_line(line).unwrap();
        }
    }

    #[test]
    fn test_script_builds_pages_and_membership() {
        let mut session = EditorSession::new(plain_config());
        run(
            &mut session,
            &["new home Home", "new about About us", "add p Welcome"],
        );
        assert_eq!(session.status_message, "added #3 <p>");

        run(&mut session, &["show #3 home", "show #3 about", "hide #3 about"]);
        assert_eq!(session.status_message, "#3 is on home");

        run(&mut session, &["pages"]);
        assert_eq!(session.status_message, "home *about");

        run(&mut session, &["page home"]);
        let welcome = ElementId::from_index(3);
        assert!(session.document().has_marker(welcome, PAGED_VISIBLE_CLASS_NAME));

        run(&mut session, &["page about"]);
        assert!(!session.document().has_marker(welcome, PAGED_VISIBLE_CLASS_NAME));

        run(&mut session, &["in #3 home"]);
        assert_eq!(session.status_message, "#3 is in home");
        run(&mut session, &["in #3"]);
        assert_eq!(session.status_message, "#3 is not in about");
    }

    #[test]
    fn test_links_follow_renames_and_get_active_marker() {
        let mut session = EditorSession::new(plain_config());
        run(
            &mut session,
            &["new home Home", "new about About", "add a Read more", "link #3 about"],
        );
        let link = ElementId::from_index(3);
        assert!(session.document().has_marker(link, PAGE_LINK_ACTIVE_CLASS_NAME));

        run(&mut session, &["rename about team Our team", "page home"]);
        assert_eq!(
            session.manager().link_target(session.document(), link).as_deref(),
            Some("team")
        );
        assert!(!session.document().has_marker(link, PAGE_LINK_ACTIVE_CLASS_NAME));

        run(&mut session, &["name team"]);
        assert_eq!(session.status_message, "Our team");
    }

    #[test]
    fn test_remove_page_reports_orphans() {
        let mut session = EditorSession::new(plain_config());
        run(
            &mut session,
            &["new home Home", "new about About", "add div", "show #3 about", "rm about"],
        );
        assert_eq!(session.status_message, "removed page about, now on every page: #3");
        assert!(session.document().contains(ElementId::from_index(3)));

        run(&mut session, &["which #3"]);
        assert_eq!(session.status_message, "#3 is on every page");
    }

    #[test]
    fn test_remove_page_deletes_orphans_when_configured() {
        let mut session = EditorSession::new(RcConfig {
            delete_orphans: true,
            ..plain_config()
        });
        run(
            &mut session,
            &["new home Home", "new about About", "add div", "show #3 about", "rm about"],
        );
        assert_eq!(session.status_message, "removed page about, deleted #3");
        assert!(!session.document().contains(ElementId::from_index(3)));
        assert_eq!(session.manager().current_page(session.document()).as_deref(), Some("home"));
    }

    #[test]
    fn test_errors_are_typed() {
        let mut session = EditorSession::new(plain_config());
        run(&mut session, &["new home Home"]);

        assert!(matches!(
            session.execute_line("jump"),
            Err(SessionError::Command(CommandError::Unknown(_)))
        ));
        assert!(matches!(
            session.execute_line("new home Again"),
            Err(SessionError::Page(PageError::DuplicateId(_)))
        ));
        assert!(matches!(
            session.execute_line("show #42 home"),
            Err(SessionError::UnknownElement(_))
        ));
        assert!(matches!(
            session.execute_line("name ghost"),
            Err(SessionError::Page(PageError::NotFound(_)))
        ));
        // The root is not addressable.
        assert!(matches!(
            session.execute_line("which #0"),
            Err(SessionError::UnknownElement(_))
        ));
    }

    #[test]
    fn test_parent_page_query() {
        let mut session = EditorSession::new(plain_config());
        run(
            &mut session,
            &["new home Home", "add section", "add p #2 Hi", "show #2 home"],
        );
        run(&mut session, &["parent #3"]);
        assert_eq!(session.status_message, "#3 follows the pages of #2");
        run(&mut session, &["parent #2"]);
        assert_eq!(session.status_message, "#2 has no paged parent");
    }

    #[test]
    fn test_frames_only_after_redraw() {
        let mut session = EditorSession::new(plain_config());
        assert_eq!(session.take_frames(), None);

        run(&mut session, &["new home Home"]);
        let frames = session.take_frames().unwrap();
        assert_eq!(frames[0], "Pages (1)");
        assert!(frames.contains(&"Stage [home]".to_string()));
        assert_eq!(session.take_frames(), None);

        run(&mut session, &["pages"]);
        assert_eq!(session.take_frames(), None);
        run(&mut session, &["draw"]);
        assert!(session.take_frames().is_some());
    }

    #[test]
    fn test_quit() {
        let mut session = EditorSession::new(plain_config());
        assert!(!session.execute_line("# nothing").unwrap());
        assert!(session.execute_line("quit").unwrap());
    }
}
