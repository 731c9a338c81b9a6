// Active-section highlighter.
// Linear scan per dispatch; pages have a handful of sections, so nothing is cached.

use web_sys::Element;

use crate::dom;
use crate::page::{as_html, Page};
use crate::scroll_dispatch::ScrollDispatcher;
use crate::types::{SectionBounds, CLASS_ACTIVE};

/// The current section for a scroll offset: the last section in document order
/// containing `scroll_y + probe_offset`.
pub fn current_section(sections: &[SectionBounds], scroll_y: f64, probe_offset: f64) -> Option<&str> {
    let probe = scroll_y + probe_offset;
    sections
        .iter()
        .filter(|section| section.contains(probe))
        .last()
        .map(|section| section.id.as_str())
}

/// A nav link is active iff its href is exactly `#` followed by the current id.
pub fn link_is_active(href: Option<&str>, current: Option<&str>) -> bool {
    match (href, current) {
        (Some(href), Some(id)) => href.strip_prefix('#') == Some(id),
        _ => false,
    }
}

fn measure(sections: &[Element]) -> Vec<SectionBounds> {
    sections
        .iter()
        .filter_map(|section| {
            let id = section.get_attribute("id")?;
            let html = as_html(section)?;
            Some(SectionBounds::new(
                id,
                f64::from(html.offset_top()),
                f64::from(html.offset_height()),
            ))
        })
        .collect()
}

/// Subscribe the highlighter to the shared scroll dispatcher.
pub fn install(page: &Page, scroll: &ScrollDispatcher) {
    let selectors = &page.config.selectors;
    let sections = page.query_all(&selectors.section);
    let links = page.query_all(&selectors.section_link);
    if links.is_empty() {
        tracing::debug!(selector = %selectors.section_link, "no section links to highlight");
        return;
    }
    let probe_offset = page.config.scrolling.section_probe_offset;

    scroll.subscribe(move |scroll_y| {
        // Layout shifts as images load, so bounds are re-read on every tick.
        let bounds = measure(&sections);
        let current = current_section(&bounds, scroll_y, probe_offset);
        for link in &links {
            let href = link.get_attribute("href");
            dom::set_class(link, CLASS_ACTIVE, link_is_active(href.as_deref(), current));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page_sections() -> Vec<SectionBounds> {
        vec![
            SectionBounds::new("s1", 0.0, 500.0),
            SectionBounds::new("s2", 500.0, 700.0),
        ]
    }

    #[test]
    fn highlights_section_under_offset_position() {
        let sections = page_sections();
        let current = current_section(&sections, 550.0, 100.0);
        assert_eq!(current, Some("s2"));

        let hrefs = ["#s1", "#s2", "#download"];
        let active: Vec<_> = hrefs
            .iter()
            .filter(|href| link_is_active(Some(**href), current))
            .collect();
        assert_eq!(active, vec![&"#s2"]);
    }

    #[test]
    fn probe_offset_shifts_boundary() {
        let sections = page_sections();
        assert_eq!(current_section(&sections, 399.0, 100.0), Some("s1"));
        assert_eq!(current_section(&sections, 400.0, 100.0), Some("s2"));
    }

    #[test]
    fn past_last_section_nothing_is_current() {
        let sections = page_sections();
        assert_eq!(current_section(&sections, 1100.0, 100.0), None);
    }

    #[test]
    fn overlapping_sections_last_wins() {
        let sections = vec![
            SectionBounds::new("outer", 0.0, 1000.0),
            SectionBounds::new("inner", 200.0, 100.0),
        ];
        assert_eq!(current_section(&sections, 150.0, 100.0), Some("inner"));
    }

    #[test]
    fn no_current_section_clears_everything() {
        assert!(!link_is_active(Some("#"), None));
        assert!(!link_is_active(None, Some("s1")));
        assert!(!link_is_active(Some("s1"), Some("s1")));
    }

    proptest! {
        /// Contiguous sections: exactly one link is active while the probe is inside the page.
        #[test]
        fn at_most_one_active_link(
            heights in prop::collection::vec(1.0f64..2000.0, 1..10),
            scroll_y in 0.0f64..20_000.0,
        ) {
            let mut top = 0.0;
            let sections: Vec<_> = heights
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let section = SectionBounds::new(format!("s{i}"), top, *h);
                    top += h;
                    section
                })
                .collect();
            let current = current_section(&sections, scroll_y, 100.0);
            let hrefs: Vec<_> = sections.iter().map(|s| format!("#{}", s.id)).collect();
            let active = hrefs
                .iter()
                .filter(|href| link_is_active(Some(href.as_str()), current))
                .count();
            let inside = scroll_y + 100.0 < top;
            prop_assert_eq!(active, usize::from(inside));
        }
    }
}
