use crate::dom::Document;
use crate::storage::Storage;

use super::{nav::LINK_CLASS, Effect, Event, Page};

pub const ACTIVE_CLASS: &str = "is-active";

/// Visibility ratios at which observed sections report.
pub const THRESHOLDS: [f64; 4] = [0.2, 0.35, 0.5, 0.65];

#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub target_id: String,
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn new(target_id: &str, is_intersecting: bool, ratio: f64) -> Self {
        IntersectionEntry {
            target_id: target_id.to_string(),
            is_intersecting,
            ratio,
        }
    }
}

/// The intersecting entry with the highest ratio. Ties go to the earlier entry.
pub fn most_visible(entries: &[IntersectionEntry]) -> Option<&IntersectionEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_intersecting)
        .fold(None, |best: Option<&IntersectionEntry>, entry| match best {
            Some(current) if current.ratio >= entry.ratio => Some(current),
            _ => Some(entry),
        })
}

/// Highlights the nav link whose `#section` is most visible.
#[derive(Debug)]
pub struct ScrollSpy {
    links: Vec<String>,
    sections: Vec<String>,
    active: Option<String>,
}

impl ScrollSpy {
    pub fn mount(doc: &Document) -> Option<Self> {
        let links = doc.ids_by_class(LINK_CLASS);
        let sections: Vec<String> = links
            .iter()
            .filter_map(|id| doc.get(id)?.attribute("href"))
            .filter_map(|href| href.strip_prefix('#'))
            .filter(|section| doc.contains(section))
            .map(String::from)
            .collect();
        if sections.is_empty() {
            return None;
        }
        Some(ScrollSpy {
            links,
            sections,
            active: None,
        })
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Returns whether the active section changed.
    pub fn observe(&mut self, entries: &[IntersectionEntry]) -> bool {
        let observed: Vec<IntersectionEntry> = entries
            .iter()
            .filter(|entry| self.sections.contains(&entry.target_id))
            .cloned()
            .collect();
        match most_visible(&observed) {
            Some(entry) => {
                self.active = Some(entry.target_id.clone());
                true
            }
            None => false,
        }
    }

    pub fn render(&self, doc: &mut Document) {
        let Some(active) = self.active.as_deref() else {
            return;
        };
        let wanted = format!("#{}", active);
        for id in &self.links {
            if let Some(link) = doc.get_mut(id) {
                let is_active = link.attribute("href").unwrap_or_default() == wanted;
                link.toggle_class(ACTIVE_CLASS, is_active);
            }
        }
    }
}

pub(super) fn on_intersection<S: Storage>(page: &mut Page<S>, event: &Event) -> Vec<Effect> {
    let (Some(spy), Event::Intersection(entries)) = (page.spy.as_mut(), event) else {
        return Vec::new();
    };
    if spy.observe(entries) {
        spy.render(&mut page.document);
    }
    Vec::new()
}
