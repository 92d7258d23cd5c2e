use super::markable::MarkableDocument;
use log::warn;
use std::cell::RefCell;
use std::rc::Rc;

/// A page-aware collaborator redrawn every time the current page changes.
pub trait PageObserver<D: MarkableDocument> {
    fn redraw(
        &mut self,
        selection: &[D::Element],
        document: &D,
        pages: &[String],
        current_page: Option<&str>,
    );
}

pub type SharedObserver<D> = Rc<RefCell<dyn PageObserver<D>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Subscriber list the page manager fans redraws out to.
pub struct ObserverList<D: MarkableDocument> {
    observers: Vec<(ObserverId, SharedObserver<D>)>,
    next_id: u64,
}

impl<D: MarkableDocument> ObserverList<D> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, observer: SharedObserver<D>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Redraw every observer with an empty selection.
    pub fn notify(&self, document: &D, pages: &[String], current_page: Option<&str>) {
        for (id, observer) in &self.observers {
            // An observer already borrowed is the one currently redrawing.
            match observer.try_borrow_mut() {
                Ok(mut observer) => observer.redraw(&[], document, pages, current_page),
                Err(_) => warn!("skipping re-entrant redraw of observer {id:?}"),
            }
        }
    }
}

impl<D: MarkableDocument> Default for ObserverList<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::tree::{ElementId, ElementTree};

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Option<String>>,
    }

    impl PageObserver<ElementTree> for Recorder {
        fn redraw(
            &mut self,
            _selection: &[ElementId],
            _document: &ElementTree,
            _pages: &[String],
            current_page: Option<&str>,
        ) {
            self.seen.push(current_page.map(str::to_string));
        }
    }

    /// Redraws the whole list again from inside its own redraw.
    #[derive(Default)]
    struct Relay {
        list: Option<Rc<ObserverList<ElementTree>>>,
        redraws: usize,
    }

    impl PageObserver<ElementTree> for Relay {
        fn redraw(
            &mut self,
            _selection: &[ElementId],
            document: &ElementTree,
            pages: &[String],
            current_page: Option<&str>,
        ) {
            self.redraws += 1;
            if let Some(list) = &self.list {
                list.notify(document, pages, current_page);
            }
        }
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let doc = ElementTree::new();
        let mut list: ObserverList<ElementTree> = ObserverList::new();
        let first = Rc::new(RefCell::new(Recorder::default()));
        let second = Rc::new(RefCell::new(Recorder::default()));
        let first_id = list.subscribe(first.clone());
        let second_id = list.subscribe(second.clone());
        assert_ne!(first_id, second_id);
        assert_eq!(list.len(), 2);

        list.notify(&doc, &["home".to_string()], Some("home"));
        assert!(list.unsubscribe(first_id));
        assert!(!list.unsubscribe(first_id));
        list.notify(&doc, &["home".to_string()], None);

        assert_eq!(first.borrow().seen, vec![Some("home".to_string())]);
        assert_eq!(second.borrow().seen, vec![Some("home".to_string()), None]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_reentrant_redraw_skips_busy_observer() {
        let doc = ElementTree::new();
        let mut list: ObserverList<ElementTree> = ObserverList::new();
        let relay = Rc::new(RefCell::new(Relay::default()));
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        list.subscribe(relay.clone());
        list.subscribe(recorder.clone());

        let list = Rc::new(list);
        relay.borrow_mut().list = Some(list.clone());
        list.notify(&doc, &["home".to_string()], Some("home"));

        // The nested pass skips the relay and reaches the recorder, then the
        // outer pass reaches the recorder again.
        assert_eq!(relay.borrow().redraws, 1);
        assert_eq!(recorder.borrow().seen.len(), 2);

        relay.borrow_mut().list = None;
    }

    #[test]
    fn test_empty_list() {
        let list: ObserverList<ElementTree> = ObserverList::default();
        assert!(list.is_empty());
        list.notify(&ElementTree::new(), &[], None);
    }
}
