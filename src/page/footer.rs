use chrono::{Datelike, Local};

use crate::dom::Document;

pub const YEAR_ID: &str = "year";

pub fn stamp_year(doc: &mut Document, year: i32) {
    if let Some(element) = doc.get_mut(YEAR_ID) {
        element.set_text(&year.to_string());
    }
}

pub fn current_year() -> i32 {
    Local::now().year()
}
