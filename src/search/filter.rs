//! The retrieval filter: the last gate before an element is handed to a
//! caller. Grounded on `Element::is_retrievable` (retrievable kind,
//! non-Overview, non-empty content) — this module just applies it across a
//! collection and attaches nothing more than what's already on the element,
//! since `ElementMetadata` is carried on every `Element` already.

use crate::graph::Element;

/// Keeps only elements that pass `Element::is_retrievable`, preserving order.
pub fn filter_retrievable(elements: Vec<Element>) -> Vec<Element> {
    elements.into_iter().filter(|e| e.is_retrievable()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ElementId, ElementKind, PropertyValue};

    #[test]
    fn drops_non_retrievable_kinds_and_overview_attributes() {
        let corpus = ElementId::from("c1");
        let entity = crate::graph::Element::new(ElementKind::Entity, "e", corpus.clone()).with_content("x");
        let unit = crate::graph::Element::new(ElementKind::Unit, "u", corpus.clone()).with_content("x");
        let overview = crate::graph::Element::new(ElementKind::Attribute, "o", corpus.clone())
            .with_content("x")
            .with_property("sub_type", PropertyValue::String("overview".to_string()));
        let empty_unit = crate::graph::Element::new(ElementKind::Unit, "empty", corpus.clone());

        let filtered = filter_retrievable(vec![entity, unit.clone(), overview, empty_unit]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, unit.id);
    }
}
