use crate::dom::{Document, Target};
use crate::storage::Storage;

use super::{Effect, Event, Page};

pub const TOGGLE_CLASS: &str = "nav__toggle";
pub const MENU_ID: &str = "navList";
pub const LINK_CLASS: &str = "nav__link";
pub const OPEN_CLASS: &str = "is-open";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }

    pub fn on_click(self, target: &Target, toggle_id: &str) -> Self {
        if target.contains_id(toggle_id) {
            return match self {
                MenuState::Open => MenuState::Closed,
                MenuState::Closed => MenuState::Open,
            };
        }
        if target.contains_id(MENU_ID) {
            let on_link = target
                .innermost()
                .is_some_and(|node| node.is("a", LINK_CLASS));
            return if on_link { MenuState::Closed } else { self };
        }
        MenuState::Closed
    }

    pub fn on_key(self, key: &str) -> Self {
        if key == "Escape" {
            MenuState::Closed
        } else {
            self
        }
    }
}

/// The mobile menu: a `.nav__toggle` button driving `#navList`.
#[derive(Debug)]
pub struct NavMenu {
    toggle_id: String,
    state: MenuState,
}

impl NavMenu {
    pub fn mount(doc: &Document) -> Option<Self> {
        let toggle_id = doc.first_by_class(TOGGLE_CLASS)?;
        let menu = doc.get(MENU_ID)?;
        let state = if menu.has_class(OPEN_CLASS) {
            MenuState::Open
        } else {
            MenuState::Closed
        };
        Some(NavMenu { toggle_id, state })
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn render(&self, doc: &mut Document) {
        let open = self.state.is_open();
        if let Some(menu) = doc.get_mut(MENU_ID) {
            menu.toggle_class(OPEN_CLASS, open);
        }
        if let Some(toggle) = doc.get_mut(&self.toggle_id) {
            toggle.set_attribute("aria-expanded", if open { "true" } else { "false" });
        }
    }

    fn transition(&mut self, next: MenuState, doc: &mut Document) {
        if next != self.state {
            self.state = next;
            self.render(doc);
        }
    }
}

pub(super) fn on_click<S: Storage>(page: &mut Page<S>, event: &Event) -> Vec<Effect> {
    let (Some(menu), Event::Click(target)) = (page.menu.as_mut(), event) else {
        return Vec::new();
    };
    let next = menu.state.on_click(target, &menu.toggle_id);
    menu.transition(next, &mut page.document);
    Vec::new()
}

pub(super) fn on_key<S: Storage>(page: &mut Page<S>, event: &Event) -> Vec<Effect> {
    let (Some(menu), Event::KeyDown(key)) = (page.menu.as_mut(), event) else {
        return Vec::new();
    };
    let next = menu.state.on_key(key);
    menu.transition(next, &mut page.document);
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Node};

    fn toggle_target() -> Target {
        Target::new(vec![Node::new("button").with_id("menuToggle")])
    }

    fn link_target() -> Target {
        Target::new(vec![
            Node::new("a").with_class(LINK_CLASS),
            Node::new("li"),
            Node::new("ul").with_id(MENU_ID),
        ])
    }

    #[test]
    fn toggle_flips_state() {
        let open = MenuState::Closed.on_click(&toggle_target(), "menuToggle");
        assert_eq!(open, MenuState::Open);
        assert_eq!(open.on_click(&toggle_target(), "menuToggle"), MenuState::Closed);
    }

    #[test]
    fn clicks_inside_the_menu_only_close_on_links() {
        let inside = Target::new(vec![Node::new("li"), Node::new("ul").with_id(MENU_ID)]);

        assert_eq!(MenuState::Open.on_click(&inside, "menuToggle"), MenuState::Open);
        assert_eq!(MenuState::Open.on_click(&link_target(), "menuToggle"), MenuState::Closed);
    }

    #[test]
    fn outside_click_and_escape_close() {
        let outside = Target::new(vec![Node::new("main")]);

        assert_eq!(MenuState::Open.on_click(&outside, "menuToggle"), MenuState::Closed);
        assert_eq!(MenuState::Open.on_key("Escape"), MenuState::Closed);
        assert_eq!(MenuState::Open.on_key("Enter"), MenuState::Open);
    }

    #[test]
    fn mount_needs_toggle_and_menu() {
        let only_menu = Document::new().with(MENU_ID, Element::new("ul"));
        assert!(NavMenu::mount(&only_menu).is_none());

        let doc = only_menu.with("menuToggle", Element::new("button").with_class(TOGGLE_CLASS));
        let menu = NavMenu::mount(&doc).unwrap();
        assert_eq!(menu.state(), MenuState::Closed);
    }

    #[test]
    fn render_sets_class_and_aria() {
        let mut doc = Document::new()
            .with("menuToggle", Element::new("button").with_class(TOGGLE_CLASS))
            .with(MENU_ID, Element::new("ul"));
        let mut menu = NavMenu::mount(&doc).unwrap();

        menu.transition(MenuState::Open, &mut doc);
        assert!(doc.get(MENU_ID).unwrap().has_class(OPEN_CLASS));
        assert_eq!(
            doc.get("menuToggle").unwrap().attribute("aria-expanded"),
            Some("true")
        );
    }
}
