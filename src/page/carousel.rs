use std::time::Duration;

use crate::dom::Document;
use crate::storage::Storage;

use super::{Effect, Event, Page};

pub const IMAGE_CLASS: &str = "carousel__img";
pub const ACTIVE_CLASS: &str = "is-active";

/// Cycles `is-active` through the hero images, one step per tick.
#[derive(Debug)]
pub struct Carousel {
    images: Vec<String>,
    current: usize,
    interval: Duration,
}

impl Carousel {
    /// Only runs with two or more images. Classes are left as the markup
    /// set them until the first tick.
    pub fn mount(doc: &Document, interval: Duration) -> Option<Self> {
        let images = doc.ids_by_class(IMAGE_CLASS);
        if images.len() < 2 {
            return None;
        }
        Some(Carousel {
            images,
            current: 0,
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next_index(&self) -> usize {
        (self.current + 1) % self.images.len()
    }

    pub fn tick(&mut self, doc: &mut Document) {
        if let Some(image) = doc.get_mut(&self.images[self.current]) {
            image.remove_class(ACTIVE_CLASS);
        }
        self.current = self.next_index();
        if let Some(image) = doc.get_mut(&self.images[self.current]) {
            image.add_class(ACTIVE_CLASS);
        }
    }
}

pub(super) fn on_tick<S: Storage>(page: &mut Page<S>, event: &Event) -> Vec<Effect> {
    if let (Some(carousel), Event::Tick) = (page.carousel.as_mut(), event) {
        carousel.tick(&mut page.document);
    }
    Vec::new()
}
