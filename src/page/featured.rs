use serde::Serialize;
use tracing::debug;

use crate::core::data::{default_card_index, ProjectCard};
use crate::dom::{Document, Element, Target};
use crate::jobs::JobsView;
use crate::storage::Storage;

use super::{Effect, Event, Page};

pub const PANEL_ID: &str = "featured";
pub const CARD_CLASS: &str = "project";
pub const TITLE_ID: &str = "featuredTitle";
pub const DESC_ID: &str = "featuredDesc";
pub const IMAGE_ID: &str = "featuredImg";
pub const CHIPS_ID: &str = "featuredChips";
pub const BULLETS_ID: &str = "featuredBullets";
pub const REPO_ID: &str = "featuredRepo";
pub const PRIMARY_ID: &str = "featuredPrimary";
pub const LOAD_JOBS_ID: &str = "featuredLoadJobs";
pub const JOBS_PANEL_ID: &str = "jobsPanel";
pub const JOBS_STATUS_ID: &str = "jobsStatus";
pub const JOBS_LIST_ID: &str = "jobsList";

const FALLBACK_HREF: &str = "#";
const FALLBACK_LABEL: &str = "View Demo";
const FALLBACK_ALT: &str = "Featured project image";

/// The card on display and whether it switches the panel to the jobs loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeaturedSelection {
    pub card: ProjectCard,
    pub is_jobs_variant: bool,
}

impl FeaturedSelection {
    pub fn new(card: ProjectCard) -> Self {
        let is_jobs_variant = card.is_jobs_variant();
        FeaturedSelection {
            card,
            is_jobs_variant,
        }
    }

    pub fn render(&self) -> RenderedFeatured {
        let card = &self.card;
        let image = (!card.image_url.is_empty()).then(|| FeaturedImage {
            src: card.image_url.clone(),
            alt: if card.title.is_empty() {
                FALLBACK_ALT.to_string()
            } else {
                card.title.clone()
            },
        });
        let actions = if self.is_jobs_variant {
            Actions::JobsActions {}
        } else {
            Actions::StandardActions {
                repo_url: card.repo_url.clone(),
                primary_action_url: card.primary_action_url.clone(),
                primary_action_label: card.primary_action_label.clone(),
            }
        };
        RenderedFeatured {
            title: card.title.clone(),
            description: card.description.clone(),
            image,
            chips: card.chips.clone(),
            bullets: card.bullets.clone(),
            actions,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FeaturedImage {
    pub src: String,
    pub alt: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum Actions {
    StandardActions {
        repo_url: String,
        primary_action_url: String,
        primary_action_label: String,
    },
    JobsActions {},
}

/// Everything the featured panel shows for one card.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RenderedFeatured {
    pub title: String,
    pub description: String,
    /// `None` leaves whatever image the panel already shows.
    pub image: Option<FeaturedImage>,
    pub chips: Vec<String>,
    pub bullets: Vec<String>,
    pub actions: Actions,
}

pub fn select(card: &ProjectCard) -> RenderedFeatured {
    FeaturedSelection::new(card.clone()).render()
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Writes `rendered` into the panel elements, replacing text and lists
/// wholesale. Absent elements are skipped.
pub fn apply(rendered: &RenderedFeatured, doc: &mut Document) {
    if let Some(title) = doc.get_mut(TITLE_ID) {
        title.set_text(&rendered.title);
    }
    if let Some(desc) = doc.get_mut(DESC_ID) {
        desc.set_text(&rendered.description);
    }
    if let (Some(img), Some(image)) = (doc.get_mut(IMAGE_ID), rendered.image.as_ref()) {
        img.set_attribute("src", &image.src);
        img.set_attribute("alt", &image.alt);
    }
    if let Some(chips) = doc.get_mut(CHIPS_ID) {
        chips.clear_children();
        for chip in &rendered.chips {
            chips.append_child(Element::new("span").with_class("chip").with_text(chip));
        }
    }
    if let Some(bullets) = doc.get_mut(BULLETS_ID) {
        bullets.clear_children();
        for bullet in &rendered.bullets {
            bullets.append_child(Element::new("li").with_text(bullet));
        }
    }

    let jobs_variant = match &rendered.actions {
        Actions::StandardActions {
            repo_url,
            primary_action_url,
            primary_action_label,
        } => {
            if let Some(repo) = doc.get_mut(REPO_ID) {
                repo.set_attribute("href", or_fallback(repo_url, FALLBACK_HREF));
                repo.set_display("inline-flex");
            }
            if let Some(primary) = doc.get_mut(PRIMARY_ID) {
                primary.set_attribute("href", or_fallback(primary_action_url, FALLBACK_HREF));
                primary.set_text(or_fallback(primary_action_label, FALLBACK_LABEL));
                primary.set_display("inline-flex");
            }
            false
        }
        Actions::JobsActions {} => {
            for id in [REPO_ID, PRIMARY_ID] {
                if let Some(link) = doc.get_mut(id) {
                    link.set_attribute("href", FALLBACK_HREF);
                    link.set_display("none");
                }
            }
            if let Some(primary) = doc.get_mut(PRIMARY_ID) {
                primary.set_text(FALLBACK_LABEL);
            }
            true
        }
    };

    if doc.contains(LOAD_JOBS_ID) && doc.contains(JOBS_PANEL_ID) {
        let (button, panel) = if jobs_variant {
            ("inline-flex", "block")
        } else {
            ("none", "none")
        };
        if let Some(load) = doc.get_mut(LOAD_JOBS_ID) {
            load.set_display(button);
        }
        if let Some(jobs_panel) = doc.get_mut(JOBS_PANEL_ID) {
            jobs_panel.set_display(panel);
        }
    }
}

/// The project cards on the page and which one the panel shows.
#[derive(Debug)]
pub struct FeaturedView {
    cards: Vec<(String, ProjectCard)>,
    selected: usize,
}

impl FeaturedView {
    pub fn mount(doc: &Document) -> Option<Self> {
        if !doc.contains(PANEL_ID) {
            return None;
        }
        let cards: Vec<(String, ProjectCard)> = doc
            .ids_by_class(CARD_CLASS)
            .into_iter()
            .filter_map(|id| {
                let card = ProjectCard::from_element(doc.get(&id)?);
                Some((id, card))
            })
            .collect();
        let list: Vec<ProjectCard> = cards.iter().map(|(_, card)| card.clone()).collect();
        let selected = default_card_index(&list)?;
        Some(FeaturedView { cards, selected })
    }

    pub fn selection(&self) -> FeaturedSelection {
        FeaturedSelection::new(self.cards[self.selected].1.clone())
    }

    pub fn selected_id(&self) -> &str {
        &self.cards[self.selected].0
    }

    /// The card a click selects: none when it landed on a link or button.
    pub fn card_for_click(&self, target: &Target) -> Option<usize> {
        if target.closest(&["a", "button"]).is_some() {
            return None;
        }
        let node = target.find_class(CARD_CLASS)?;
        let id = node.id.as_deref()?;
        self.cards.iter().position(|(card_id, _)| card_id == id)
    }

    pub fn select_index(&mut self, index: usize) {
        if index < self.cards.len() {
            self.selected = index;
        }
    }

    pub fn render(&self, doc: &mut Document) {
        apply(&self.selection().render(), doc);
    }
}

pub(super) fn on_card_click<S: Storage>(page: &mut Page<S>, event: &Event) -> Vec<Effect> {
    let (Some(featured), Event::Click(target)) = (page.featured.as_mut(), event) else {
        return Vec::new();
    };
    let Some(index) = featured.card_for_click(target) else {
        return Vec::new();
    };
    featured.select_index(index);
    debug!(card = featured.selected_id(), "featured card selected");
    featured.render(&mut page.document);
    vec![Effect::ScrollIntoView(PANEL_ID.to_string())]
}

pub(super) fn on_load_jobs_click<S: Storage>(page: &mut Page<S>, event: &Event) -> Vec<Effect> {
    let Event::Click(target) = event else {
        return Vec::new();
    };
    if page.featured.is_none() || !target.contains_id(LOAD_JOBS_ID) {
        return Vec::new();
    }
    if !(page.document.contains(JOBS_STATUS_ID) && page.document.contains(JOBS_LIST_ID)) {
        return Vec::new();
    }
    render_jobs(&JobsView::Loading, &mut page.document);
    vec![Effect::FetchJobs]
}

pub(super) fn on_jobs_loaded<S: Storage>(page: &mut Page<S>, event: &Event) -> Vec<Effect> {
    if let Event::JobsLoaded(result) = event {
        render_jobs(&JobsView::from_result(result), &mut page.document);
    }
    Vec::new()
}

fn render_jobs(view: &JobsView, doc: &mut Document) {
    if let Some(status) = doc.get_mut(JOBS_STATUS_ID) {
        view.render_status(status);
    }
    if let Some(list) = doc.get_mut(JOBS_LIST_ID) {
        view.render_list(list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str) -> ProjectCard {
        ProjectCard {
            title: title.to_string(),
            description: format!("{} description", title),
            image_url: format!("/img/{}.png", title.to_lowercase()),
            chips: vec!["Rust".to_string(), "Actix".to_string()],
            bullets: vec!["Fast".to_string()],
            repo_url: "https://github.com/me/repo".to_string(),
            primary_action_url: "https://demo.example".to_string(),
            primary_action_label: "Live".to_string(),
            is_default: false,
        }
    }

    fn panel() -> Document {
        Document::new()
            .with(PANEL_ID, Element::new("section"))
            .with(TITLE_ID, Element::new("h2"))
            .with(DESC_ID, Element::new("p"))
            .with(IMAGE_ID, Element::new("img"))
            .with(CHIPS_ID, Element::new("div"))
            .with(BULLETS_ID, Element::new("ul"))
            .with(REPO_ID, Element::new("a"))
            .with(PRIMARY_ID, Element::new("a"))
            .with(LOAD_JOBS_ID, Element::new("button"))
            .with(JOBS_PANEL_ID, Element::new("div"))
    }

    #[test]
    fn standard_card_gets_its_links() {
        let rendered = select(&card("Gemini"));

        assert_eq!(
            rendered.actions,
            Actions::StandardActions {
                repo_url: "https://github.com/me/repo".to_string(),
                primary_action_url: "https://demo.example".to_string(),
                primary_action_label: "Live".to_string(),
            }
        );
        assert_eq!(rendered.image.unwrap().alt, "Gemini");
    }

    #[test]
    fn firebase_card_gets_jobs_actions() {
        let rendered = select(&card("Cloud Tracker FIREBASE"));
        assert_eq!(rendered.actions, Actions::JobsActions {});
    }

    #[test]
    fn image_alt_falls_back_when_untitled() {
        let rendered = select(&ProjectCard {
            image_url: "/img/x.png".to_string(),
            ..Default::default()
        });
        assert_eq!(rendered.image.unwrap().alt, "Featured project image");
        assert!(select(&ProjectCard::default()).image.is_none());
    }

    #[test]
    fn apply_replaces_lists_without_leftovers() {
        let mut doc = panel();
        apply(&select(&card("Gemini")), &mut doc);

        let mut second = card("Folio");
        second.chips = vec!["Serde".to_string()];
        second.bullets = vec![];
        apply(&select(&second), &mut doc);

        let chips = &doc.get(CHIPS_ID).unwrap().children;
        assert_eq!(chips.len(), 1);
        assert_eq!(chips[0].text, "Serde");
        assert!(chips[0].has_class("chip"));
        assert!(doc.get(BULLETS_ID).unwrap().children.is_empty());
        assert_eq!(doc.get(TITLE_ID).unwrap().text, "Folio");
    }

    #[test]
    fn missing_image_keeps_the_previous_one() {
        let mut doc = panel();
        apply(&select(&card("Gemini")), &mut doc);
        apply(&select(&ProjectCard::default()), &mut doc);

        let img = doc.get(IMAGE_ID).unwrap();
        assert_eq!(img.attribute("src"), Some("/img/gemini.png"));
        assert_eq!(doc.get(TITLE_ID).unwrap().text, "");
    }

    #[test]
    fn empty_links_render_with_fallbacks() {
        let mut doc = panel();
        apply(&select(&ProjectCard::default()), &mut doc);

        let primary = doc.get(PRIMARY_ID).unwrap();
        assert_eq!(primary.attribute("href"), Some("#"));
        assert_eq!(primary.text, "View Demo");
        assert_eq!(primary.display.as_deref(), Some("inline-flex"));
        assert_eq!(doc.get(LOAD_JOBS_ID).unwrap().display.as_deref(), Some("none"));
    }

    #[test]
    fn jobs_variant_swaps_visible_controls() {
        let mut doc = panel();
        apply(&select(&card("Firebase Jobs")), &mut doc);

        assert_eq!(doc.get(REPO_ID).unwrap().display.as_deref(), Some("none"));
        assert_eq!(doc.get(PRIMARY_ID).unwrap().display.as_deref(), Some("none"));
        assert_eq!(doc.get(LOAD_JOBS_ID).unwrap().display.as_deref(), Some("inline-flex"));
        assert_eq!(doc.get(JOBS_PANEL_ID).unwrap().display.as_deref(), Some("block"));
    }

    #[test]
    fn jobs_variant_clears_previous_links() {
        let mut doc = panel();
        apply(&select(&card("Gemini")), &mut doc);
        apply(&select(&card("Firebase Jobs")), &mut doc);

        let repo = doc.get(REPO_ID).unwrap();
        let primary = doc.get(PRIMARY_ID).unwrap();
        assert_eq!(repo.attribute("href"), Some("#"));
        assert_eq!(primary.attribute("href"), Some("#"));
        assert_eq!(primary.text, "View Demo");
    }

    #[test]
    fn jobs_controls_need_both_elements() {
        let mut doc = Document::new().with(LOAD_JOBS_ID, Element::new("button"));
        apply(&select(&card("Firebase Jobs")), &mut doc);
        assert!(doc.get(LOAD_JOBS_ID).unwrap().display.is_none());
    }

    #[test]
    fn serializes_actions_with_a_kind_tag() {
        let value = serde_json::to_value(select(&card("Gemini"))).unwrap();
        assert_eq!(value["actions"]["kind"], "StandardActions");
        assert_eq!(value["actions"]["repoUrl"], "https://github.com/me/repo");
    }
}
