use tracing::{info, warn};

use crate::dom::{Document, Target};
use crate::storage::Storage;

use super::{Effect, Event, Page};

pub const CONSENT_KEY: &str = "cookie_consent";
pub const BANNER_ID: &str = "cookieBanner";
pub const ACCEPT_ID: &str = "cookieAccept";
pub const REJECT_ID: &str = "cookieReject";
pub const PREFS_ID: &str = "cookiePrefsBtn";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consent {
    Accepted,
    Rejected,
}

impl Consent {
    pub fn as_str(self) -> &'static str {
        match self {
            Consent::Accepted => "accepted",
            Consent::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "accepted" => Some(Consent::Accepted),
            "rejected" => Some(Consent::Rejected),
            _ => None,
        }
    }

    pub fn stored<S: Storage>(storage: &S) -> Option<Self> {
        Consent::parse(&storage.get_item(CONSENT_KEY)?)
    }
}

/// The banner shows until any non-empty flag is stored, even one that is not
/// a known choice.
pub fn banner_shows<S: Storage>(storage: &S) -> bool {
    storage
        .get_item(CONSENT_KEY)
        .map_or(true, |value| value.is_empty())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsentAction {
    Accept,
    Reject,
    Preferences,
}

#[derive(Debug)]
pub struct ConsentBanner {
    has_preferences: bool,
    visible: bool,
}

impl ConsentBanner {
    pub fn mount<S: Storage>(doc: &Document, storage: &S) -> Option<Self> {
        if !(doc.contains(BANNER_ID) && doc.contains(ACCEPT_ID) && doc.contains(REJECT_ID)) {
            return None;
        }
        Some(ConsentBanner {
            has_preferences: doc.contains(PREFS_ID),
            visible: banner_shows(storage),
        })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn action_for(&self, target: &Target) -> Option<ConsentAction> {
        if target.contains_id(ACCEPT_ID) {
            Some(ConsentAction::Accept)
        } else if target.contains_id(REJECT_ID) {
            Some(ConsentAction::Reject)
        } else if self.has_preferences && target.contains_id(PREFS_ID) {
            Some(ConsentAction::Preferences)
        } else {
            None
        }
    }

    /// Persists the choice. A failed write is logged; the banner still
    /// follows the action.
    pub fn apply<S: Storage>(&mut self, action: ConsentAction, storage: &mut S) {
        let written = match action {
            ConsentAction::Accept => storage.set_item(CONSENT_KEY, Consent::Accepted.as_str()),
            ConsentAction::Reject => storage.set_item(CONSENT_KEY, Consent::Rejected.as_str()),
            ConsentAction::Preferences => storage.remove_item(CONSENT_KEY),
        };
        if let Err(err) = written {
            warn!("could not persist cookie consent: {}", err);
        }
        self.visible = action == ConsentAction::Preferences;
        info!(?action, "cookie consent updated");
    }

    pub fn render(&self, doc: &mut Document) {
        if let Some(banner) = doc.get_mut(BANNER_ID) {
            if self.visible {
                banner.remove_attribute("hidden");
            } else {
                banner.set_attribute("hidden", "");
            }
        }
    }
}

pub(super) fn on_click<S: Storage>(page: &mut Page<S>, event: &Event) -> Vec<Effect> {
    let (Some(banner), Event::Click(target)) = (page.consent.as_mut(), event) else {
        return Vec::new();
    };
    if let Some(action) = banner.action_for(target) {
        banner.apply(action, &mut page.storage);
        banner.render(&mut page.document);
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::storage::{MemoryStorage, StorageError};

    struct ReadOnly;

    impl Storage for ReadOnly {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }

        fn remove_item(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(std::io::Error::other("read-only").into())
        }
    }

    fn doc() -> Document {
        Document::new()
            .with(BANNER_ID, Element::new("div").with_attribute("hidden", ""))
            .with(ACCEPT_ID, Element::new("button"))
            .with(REJECT_ID, Element::new("button"))
    }

    #[test]
    fn visible_without_a_stored_flag() {
        let mut storage = MemoryStorage::new();
        assert!(ConsentBanner::mount(&doc(), &storage).unwrap().is_visible());

        storage.set_item(CONSENT_KEY, "").unwrap();
        assert!(ConsentBanner::mount(&doc(), &storage).unwrap().is_visible());

        storage.set_item(CONSENT_KEY, "rejected").unwrap();
        assert!(!ConsentBanner::mount(&doc(), &storage).unwrap().is_visible());
    }

    #[test]
    fn needs_banner_and_both_buttons() {
        let doc = Document::new()
            .with(BANNER_ID, Element::new("div"))
            .with(ACCEPT_ID, Element::new("button"));
        assert!(ConsentBanner::mount(&doc, &MemoryStorage::new()).is_none());
    }

    #[test]
    fn preferences_button_is_optional() {
        let banner = ConsentBanner::mount(&doc(), &MemoryStorage::new()).unwrap();
        let prefs = doc().target(&[PREFS_ID]);
        assert_eq!(banner.action_for(&prefs), None);
        assert_eq!(
            banner.action_for(&doc().target(&[ACCEPT_ID])),
            Some(ConsentAction::Accept)
        );
    }

    #[test]
    fn failed_write_still_hides_the_banner() {
        let mut storage = ReadOnly;
        let mut banner = ConsentBanner::mount(&doc(), &storage).unwrap();

        banner.apply(ConsentAction::Reject, &mut storage);
        assert!(!banner.is_visible());
    }

    #[test]
    fn stored_consent_parses_known_values() {
        let mut storage = MemoryStorage::new();
        assert_eq!(Consent::stored(&storage), None);

        storage.set_item(CONSENT_KEY, "accepted").unwrap();
        assert_eq!(Consent::stored(&storage), Some(Consent::Accepted));

        storage.set_item(CONSENT_KEY, "maybe").unwrap();
        assert_eq!(Consent::stored(&storage), None);
    }
}
