use super::types::{Facet, FilterCriteria};

/// Whether `current` narrows the listing compared to `defaults`.
///
/// Search text, any selected facet value, or a changed page size counts.
/// The page index does not: paging alone is not a content filter.
pub fn is_filtered(current: &FilterCriteria, defaults: &FilterCriteria) -> bool {
    !current.search_text().is_empty()
        || Facet::ALL
            .iter()
            .any(|facet| !current.facet(*facet).is_empty())
        || current.page_size() != defaults.page_size()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    #[test]
    fn test_defaults_are_not_filtered() {
        let defaults = FilterCriteria::default();
        assert!(!is_filtered(&defaults, &defaults));
    }

    #[test]
    fn test_search_text_is_filtered() {
        let defaults = FilterCriteria::default();
        assert!(is_filtered(&defaults.with_search_text("abc"), &defaults));
    }

    #[test]
    fn test_each_facet_is_filtered() {
        let defaults = FilterCriteria::default();
        for facet in Facet::ALL {
            let current = defaults.with_toggled(facet, "x");
            assert!(is_filtered(&current, &defaults), "{facet} should filter");
        }
    }

    #[test]
    fn test_offset_alone_is_not_filtered() {
        let defaults = FilterCriteria::default();
        assert!(!is_filtered(&defaults.with_offset(5), &defaults));
    }

    #[test]
    fn test_page_size_change_is_filtered() {
        let defaults = FilterCriteria::default();
        let current = FilterCriteria::with_page_size(NonZeroU32::new(25).unwrap());
        assert!(is_filtered(&current, &defaults));
    }

    #[test]
    fn test_toggled_back_is_not_filtered() {
        let defaults = FilterCriteria::default();
        let current = defaults
            .with_toggled(Facet::Tags, "prod")
            .with_toggled(Facet::Tags, "prod");
        assert!(!is_filtered(&current, &defaults));
    }
}
