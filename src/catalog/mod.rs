mod article;
mod store;

pub use article::{format_price, parse_price, validate_name, Article, ArticleDraft, ArticleError};
pub use store::{ArticleStore, StoreError, StoreResult};
