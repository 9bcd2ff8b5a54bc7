//! UI-independent catalogue logic: user intents in, view model out.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{
    parse_price, validate_name, Article, ArticleDraft, ArticleError, ArticleStore, StoreError,
};
use crate::photo::PhotoLibrary;

mod view;

pub use view::{
    CardImage, CardView, CatalogueView, SplashState, SPLASH_BUTTON_LABEL, SPLASH_LOADING_TITLE,
    SPLASH_TITLE,
};

/// Raw form input as typed by the user.
///
/// `photo` is a path already imported into the photo library. On edit,
/// `None` keeps the article's current photo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleForm {
    pub name_text: String,
    pub price_text: String,
    pub photo: Option<PathBuf>,
}

impl ArticleForm {
    pub fn new(name_text: impl Into<String>, price_text: impl Into<String>) -> Self {
        Self {
            name_text: name_text.into(),
            price_text: price_text.into(),
            photo: None,
        }
    }

    pub fn with_photo(mut self, photo: impl Into<PathBuf>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    pub fn for_article(article: &Article) -> Self {
        Self {
            name_text: article.name.clone(),
            price_text: article.price.to_string(),
            photo: None,
        }
    }

    fn into_draft(self, current_photo: Option<PathBuf>) -> Result<ArticleDraft, ArticleError> {
        let name = validate_name(&self.name_text)?;
        let price = parse_price(&self.price_text)?;
        Ok(ArticleDraft {
            name,
            price,
            photo_path: self.photo.or(current_photo),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Create(ArticleForm),
    Edit { id: String, form: ArticleForm },
    Delete { id: String },
    SearchChanged(String),
}

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("invalid form: {0}")]
    InvalidForm(#[from] ArticleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct CatalogueSession {
    store: ArticleStore,
    library: PhotoLibrary,
    query: String,
    currency: String,
}

impl CatalogueSession {
    pub fn new(store: ArticleStore, library: PhotoLibrary, currency: impl Into<String>) -> Self {
        Self {
            store,
            library,
            query: String::new(),
            currency: currency.into(),
        }
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    pub fn library(&self) -> &PhotoLibrary {
        &self.library
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn article(&self, id: &str) -> Option<&Article> {
        self.store.get(id)
    }

    pub fn view(&self) -> CatalogueView {
        let cards = self
            .store
            .filter(&self.query)
            .into_iter()
            .map(|article| CardView::from_article(article, &self.currency))
            .collect();
        CatalogueView {
            query: self.query.clone(),
            cards,
        }
    }

    pub fn handle(&mut self, intent: Intent) -> Result<CatalogueView, IntentError> {
        match intent {
            Intent::Create(form) => {
                let draft = form.into_draft(None)?;
                self.store.add(draft)?;
            }
            Intent::Edit { id, form } => {
                let current_photo = self
                    .store
                    .get(&id)
                    .ok_or_else(|| StoreError::NotFound { id: id.clone() })?
                    .photo_path
                    .clone();
                let draft = form.into_draft(current_photo)?;
                self.store.update(&id, draft)?;
            }
            Intent::Delete { id } => {
                self.store.remove(&id)?;
            }
            Intent::SearchChanged(query) => {
                tracing::debug!(query = %query, "search query changed");
                self.query = query;
            }
        }
        Ok(self.view())
    }
}
