//! Articles and their URL slugs.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProfileView;
use super::user::UserId;

/// Validation errors returned by [`Slug`] and article constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    EmptySlug,
    InvalidSlug,
    EmptyTitle,
}

impl fmt::Display for ArticleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySlug => write!(f, "slug must not be empty"),
            Self::InvalidSlug => write!(
                f,
                "slug may only contain lowercase letters, digits, and single hyphens",
            ),
            Self::EmptyTitle => write!(f, "title must contain at least one letter or digit"),
        }
    }
}

impl std::error::Error for ArticleValidationError {}

/// Stable article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArticleId(Uuid);

impl ArticleId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL-safe article handle derived from the title.
///
/// ## Invariants
/// - Non-empty; lowercase letters, digits, and hyphens only. Letters and
///   digits from any script are allowed.
/// - Never starts or ends with a hyphen and never contains `--`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate an existing slug, e.g. one taken from a request path.
    pub fn new(slug: impl AsRef<str>) -> Result<Self, ArticleValidationError> {
        let raw = slug.as_ref();
        if raw.is_empty() {
            return Err(ArticleValidationError::EmptySlug);
        }
        let allowed = raw.chars().all(|ch| ch == '-' || is_slug_char(ch));
        if !allowed || raw.starts_with('-') || raw.ends_with('-') || raw.contains("--") {
            return Err(ArticleValidationError::InvalidSlug);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Derive a slug from an article title.
    ///
    /// Letters and digits of any script are kept (lowercased); every run of
    /// other characters collapses into a single hyphen.
    ///
    /// # Examples
    /// ```
    /// use conduit::domain::Slug;
    ///
    /// let slug = Slug::from_title("Test Title").unwrap();
    /// assert_eq!(slug.as_ref(), "test-title");
    /// ```
    pub fn from_title(title: &str) -> Result<Self, ArticleValidationError> {
        let mut slug = String::with_capacity(title.len());
        let mut pending_hyphen = false;
        for ch in title.chars().flat_map(char::to_lowercase) {
            if is_slug_char(ch) {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(ch);
            } else {
                pending_hyphen = true;
            }
        }
        if slug.is_empty() {
            return Err(ArticleValidationError::EmptyTitle);
        }
        Ok(Self(slug))
    }
}

/// A letter or digit that lowercasing leaves unchanged.
fn is_slug_char(ch: char) -> bool {
    ch.is_alphanumeric() && ch.to_lowercase().eq(std::iter::once(ch))
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = ArticleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalise a free-form tag list: trimmed, blank entries dropped,
/// duplicates removed, sorted ascending.
pub fn normalise_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_owned())
        .filter(|tag| !tag.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Published article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub slug: Slug,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tags: Vec<String>,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Article rendered for a specific viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: ProfileView,
}

impl ArticleView {
    /// Combine an article with its already-projected author.
    pub fn new(article: &Article, author: ProfileView) -> Self {
        Self {
            slug: article.slug.to_string(),
            title: article.title.clone(),
            description: article.description.clone(),
            body: article.body.clone(),
            tag_list: article.tags.clone(),
            created_at: article.created_at,
            updated_at: article.updated_at,
            author,
        }
    }
}
