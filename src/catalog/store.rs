use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::article::{generate_id, Article, ArticleDraft};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read article file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse article file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode articles: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write article file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("article not found: {id}")]
    NotFound { id: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Ordered article list backed by a JSON file.
///
/// Every mutation rewrites the whole file. The list is only updated after the
/// write succeeds, so it always matches the last completed write.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    path: PathBuf,
    articles: Vec<Article>,
}

impl ArticleStore {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            articles: Vec::new(),
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "article file missing; starting empty");
                return Ok(Self::empty(path));
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&contents) {
            Ok(records) => records,
            Err(source) => return Err(StoreError::Parse { path, source }),
        };

        let mut articles: Vec<Article> = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let mut article = match serde_json::from_value::<Article>(record) {
                Ok(article) => article,
                Err(err) => {
                    tracing::warn!(index, ?err, path = %path.display(), "skipping malformed article record");
                    continue;
                }
            };
            let duplicate = articles.iter().any(|existing| existing.id == article.id);
            if article.id.trim().is_empty() || duplicate {
                article.id = generate_id(articles.iter().map(|existing| existing.id.as_str()));
                tracing::debug!(index, id = %article.id, "assigned id to stored article");
            }
            articles.push(article);
        }

        tracing::info!(count = articles.len(), path = %path.display(), "loaded articles");
        Ok(Self { path, articles })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|article| article.id == id)
    }

    pub fn save(&self) -> StoreResult<()> {
        write_articles(&self.path, &self.articles)
    }

    pub fn add(&mut self, draft: ArticleDraft) -> StoreResult<Article> {
        let id = generate_id(self.articles.iter().map(|article| article.id.as_str()));
        let article = Article::new(id, draft);

        let mut staged = self.articles.clone();
        staged.push(article.clone());
        self.commit(staged)?;

        tracing::info!(id = %article.id, name = %article.name, "added article");
        Ok(article)
    }

    pub fn update(&mut self, id: &str, draft: ArticleDraft) -> StoreResult<Article> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        let mut staged = self.articles.clone();
        staged[index].apply(draft);
        let updated = staged[index].clone();
        self.commit(staged)?;

        tracing::info!(id = %updated.id, name = %updated.name, "updated article");
        Ok(updated)
    }

    /// Removes the article with `id`. Unknown ids leave the file untouched.
    pub fn remove(&mut self, id: &str) -> StoreResult<bool> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id, "remove requested for unknown article");
            return Ok(false);
        };

        let mut staged = self.articles.clone();
        let removed = staged.remove(index);
        self.commit(staged)?;

        tracing::info!(id = %removed.id, name = %removed.name, "removed article");
        Ok(true)
    }

    /// Case-insensitive substring match on the name, query taken as typed;
    /// a blank query keeps all.
    pub fn filter(&self, query: &str) -> Vec<&Article> {
        if query.trim().is_empty() {
            return self.articles.iter().collect();
        }
        let needle = query.to_lowercase();
        self.articles
            .iter()
            .filter(|article| article.matches(&needle))
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.articles.iter().position(|article| article.id == id)
    }

    fn commit(&mut self, staged: Vec<Article>) -> StoreResult<()> {
        write_articles(&self.path, &staged)?;
        self.articles = staged;
        Ok(())
    }
}

fn write_articles(path: &Path, articles: &[Article]) -> StoreResult<()> {
    let encoded = serde_json::to_string_pretty(articles).map_err(StoreError::Encode)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, encoded).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
