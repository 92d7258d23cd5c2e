//! View Model - What the stage needs to know about elements beyond markers
//! This keeps the views independent of the concrete document engine

use crate::document_model::{ElementId, ElementTree, MarkableDocument};

pub trait StageViewModel: MarkableDocument {
    /// Element tag name, e.g. `div`
    fn tag(&self, element: Self::Element) -> String;

    /// Short handle the user can type back to address the element
    fn handle(&self, element: Self::Element) -> String;

    /// Depth below the root, direct children of the root being at depth 0
    fn depth(&self, element: Self::Element) -> usize {
        let mut depth = 0;
        let mut current = self.parent(element);
        while let Some(parent) = current {
            current = self.parent(parent);
            if current.is_some() {
                depth += 1;
            }
        }
        depth
    }
}

impl StageViewModel for ElementTree {
    fn tag(&self, element: ElementId) -> String {
        self.get(element)
            .map(|e| e.tag.clone())
            .unwrap_or_default()
    }

    fn handle(&self, element: ElementId) -> String {
        element.to_string()
    }
}
