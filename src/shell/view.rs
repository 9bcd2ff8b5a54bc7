use std::path::PathBuf;

use crate::catalog::{format_price, Article};
use crate::photo::resolve_display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    Photo(PathBuf),
    Placeholder,
}

/// One grid cell: thumbnail, name and price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub price_label: String,
    pub image: CardImage,
}

impl CardView {
    pub fn from_article(article: &Article, currency: &str) -> Self {
        let image = resolve_display(article.photo_path.as_deref())
            .map(CardImage::Photo)
            .unwrap_or(CardImage::Placeholder);
        Self {
            id: article.id.clone(),
            title: article.name.clone(),
            price_label: format_price(article.price, currency),
            image,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueView {
    pub query: String,
    pub cards: Vec<CardView>,
}

impl CatalogueView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn empty_message(&self) -> &'static str {
        if self.query.trim().is_empty() {
            "Aucun article. Ajoutez-en un."
        } else {
            "Aucun article ne correspond."
        }
    }
}

pub const SPLASH_TITLE: &str = "MON CATALOGUE\nTUNISIE";
pub const SPLASH_LOADING_TITLE: &str = "Chargement des\nCatalogues...";
pub const SPLASH_BUTTON_LABEL: &str = "VOIR LES OFFRES";

/// Launch screen shown before the catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplashState {
    pressed: bool,
}

impl SplashState {
    pub fn title(&self) -> &'static str {
        if self.pressed {
            SPLASH_LOADING_TITLE
        } else {
            SPLASH_TITLE
        }
    }

    pub fn button_label(&self) -> &'static str {
        SPLASH_BUTTON_LABEL
    }

    /// Returns `true` the first time only.
    pub fn press(&mut self) -> bool {
        !std::mem::replace(&mut self.pressed, true)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
