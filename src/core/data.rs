use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Result},
};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::dom::Element;

/// A portfolio entry as described by a card's `data-*` attributes or by an
/// entry of the projects catalogue file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectCard {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub chips: Vec<String>,
    pub bullets: Vec<String>,
    pub repo_url: String,
    pub primary_action_url: String,
    pub primary_action_label: String,
    pub is_default: bool,
}

impl ProjectCard {
    /// Reads a card from markup. Absent attributes become empty strings.
    pub fn from_element(element: &Element) -> Self {
        let attr = |name: &str| element.attribute(name).unwrap_or_default().to_string();
        ProjectCard {
            title: attr("data-title"),
            description: attr("data-desc"),
            image_url: attr("data-img"),
            chips: split_list(element.attribute("data-chips").unwrap_or_default()),
            bullets: split_list(element.attribute("data-bullets").unwrap_or_default()),
            repo_url: attr("data-repo"),
            primary_action_url: attr("data-primary"),
            primary_action_label: attr("data-primary-label"),
            is_default: element.attribute("data-default") == Some("true"),
        }
    }

    /// Cards mentioning Firebase swap their links for the jobs loader.
    pub fn is_jobs_variant(&self) -> bool {
        self.title.to_lowercase().contains("firebase")
    }
}

/// Splits a `|`-separated attribute, trimming entries and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// The card flagged as default, else the first one.
pub fn default_card_index(cards: &[ProjectCard]) -> Option<usize> {
    if cards.is_empty() {
        return None;
    }
    Some(cards.iter().position(|card| card.is_default).unwrap_or(0))
}

pub fn load_catalogue(path: &str) -> Result<Vec<ProjectCard>> {
    let file = File::open(path).map_err(|err| {
        error!("error opening projects catalogue {}: {}", path, err);
        err
    })?;
    let mut buffer: Vec<u8> = Vec::new();
    let size = BufReader::new(file).read_to_end(&mut buffer).map_err(|err| {
        error!("projects catalogue could not be read: {}", err);
        err
    })?;
    info!(size, "read projects catalogue");
    let cards: Vec<ProjectCard> = serde_json::from_slice(&buffer).map_err(|err| {
        error!("projects catalogue structure is incorrect: {}", err);
        err
    })?;
    info!(count = cards.len(), "loaded projects catalogue");
    Ok(cards)
}

pub fn write_catalogue(path: &str, cards: &[ProjectCard]) -> Result<()> {
    let file = File::create(path).map_err(|err| {
        error!("could not create projects catalogue {}: {}", path, err);
        err
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), cards)?;
    Ok(())
}
