//! Page behavior as explicit state. `Page::mount` wires each widget that
//! finds its elements, registers its handlers by event kind, and every
//! `dispatch` runs the matching handlers: a state transition, a render into
//! the document, and any effects for the host to perform.

use std::{collections::HashMap, time::Duration};

use tracing::{debug, info};

use crate::core::settings::Settings;
use crate::dom::{Document, Target};
use crate::jobs::{JobRecord, JobsError};
use crate::storage::Storage;

pub mod carousel;
pub mod consent;
pub mod featured;
pub mod footer;
pub mod nav;
pub mod runtime;
pub mod scroll_spy;

use carousel::Carousel;
use consent::ConsentBanner;
use featured::FeaturedView;
use nav::NavMenu;
use scroll_spy::{IntersectionEntry, ScrollSpy};

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Click(Target),
    KeyDown(String),
    Intersection(Vec<IntersectionEntry>),
    Tick,
    JobsLoaded(Result<Vec<JobRecord>, JobsError>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    Intersection,
    Tick,
    JobsLoaded,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click(_) => EventKind::Click,
            Event::KeyDown(_) => EventKind::KeyDown,
            Event::Intersection(_) => EventKind::Intersection,
            Event::Tick => EventKind::Tick,
            Event::JobsLoaded(_) => EventKind::JobsLoaded,
        }
    }
}

/// Work a handler asks the host to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    ScrollIntoView(String),
    FetchJobs,
}

pub type Handler<S> = fn(&mut Page<S>, &Event) -> Vec<Effect>;

pub struct EventRegistry<S> {
    handlers: HashMap<EventKind, Vec<Handler<S>>>,
}

impl<S> EventRegistry<S> {
    pub fn new() -> Self {
        EventRegistry {
            handlers: HashMap::new(),
        }
    }

    pub fn on(&mut self, kind: EventKind, handler: Handler<S>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    pub fn handlers(&self, kind: EventKind) -> &[Handler<S>] {
        self.handlers.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn handles(&self, kind: EventKind) -> bool {
        !self.handlers(kind).is_empty()
    }
}

impl<S> Default for EventRegistry<S> {
    fn default() -> Self {
        EventRegistry::new()
    }
}

pub struct Page<S> {
    document: Document,
    storage: S,
    menu: Option<NavMenu>,
    spy: Option<ScrollSpy>,
    featured: Option<FeaturedView>,
    consent: Option<ConsentBanner>,
    carousel: Option<Carousel>,
    registry: EventRegistry<S>,
}

impl<S: Storage> Page<S> {
    /// Runs the load-time setup. Widgets whose elements are missing are left
    /// out and their events ignored.
    pub fn mount(mut document: Document, storage: S, settings: &Settings) -> Self {
        footer::stamp_year(&mut document, footer::current_year());

        let mut registry = EventRegistry::new();

        let menu = NavMenu::mount(&document);
        if menu.is_some() {
            registry.on(EventKind::Click, nav::on_click::<S>);
            registry.on(EventKind::KeyDown, nav::on_key::<S>);
        }

        let spy = ScrollSpy::mount(&document);
        if spy.is_some() {
            registry.on(EventKind::Intersection, scroll_spy::on_intersection::<S>);
        }

        let featured = FeaturedView::mount(&document);
        if let Some(view) = &featured {
            view.render(&mut document);
            registry.on(EventKind::Click, featured::on_card_click::<S>);
            if document.contains(featured::LOAD_JOBS_ID) {
                registry.on(EventKind::Click, featured::on_load_jobs_click::<S>);
                registry.on(EventKind::JobsLoaded, featured::on_jobs_loaded::<S>);
            }
        }

        let consent = ConsentBanner::mount(&document, &storage);
        if let Some(banner) = &consent {
            banner.render(&mut document);
            registry.on(EventKind::Click, consent::on_click::<S>);
        }

        let carousel = Carousel::mount(&document, settings.carousel_interval());
        if carousel.is_some() {
            registry.on(EventKind::Tick, carousel::on_tick::<S>);
        }

        info!(
            menu = menu.is_some(),
            scroll_spy = spy.is_some(),
            featured = featured.is_some(),
            consent = consent.is_some(),
            carousel = carousel.is_some(),
            "page mounted"
        );

        Page {
            document,
            storage,
            menu,
            spy,
            featured,
            consent,
            carousel,
            registry,
        }
    }

    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        let kind = event.kind();
        let handlers = self.registry.handlers(kind).to_vec();
        debug!(?kind, handlers = handlers.len(), "dispatching event");
        let mut effects = Vec::new();
        for handler in handlers {
            effects.extend(handler(self, &event));
        }
        effects
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn registry(&self) -> &EventRegistry<S> {
        &self.registry
    }

    pub fn menu(&self) -> Option<&NavMenu> {
        self.menu.as_ref()
    }

    pub fn scroll_spy(&self) -> Option<&ScrollSpy> {
        self.spy.as_ref()
    }

    pub fn featured(&self) -> Option<&FeaturedView> {
        self.featured.as_ref()
    }

    pub fn consent(&self) -> Option<&ConsentBanner> {
        self.consent.as_ref()
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    /// How often the host should send `Event::Tick`, if at all.
    pub fn carousel_interval(&self) -> Option<Duration> {
        self.carousel.as_ref().map(Carousel::interval)
    }
}
