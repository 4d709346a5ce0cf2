use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFieldError {
    #[error("This field is required.")]
    Blank,
    #[error("Ensure this field has no more than {max} characters.")]
    TooLong { max: usize },
}

/// Declares a trimmed, non-empty text newtype with a maximum length in characters.
macro_rules! bounded_text {
    ($(#[$meta:meta])* $name:ident, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            pub const MAX_LENGTH: usize = $max;

            pub fn new(raw: &str) -> Result<Self, TextFieldError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Err(TextFieldError::Blank)
                } else if trimmed.chars().count() > Self::MAX_LENGTH {
                    Err(TextFieldError::TooLong {
                        max: Self::MAX_LENGTH,
                    })
                } else {
                    Ok(Self(trimmed.into()))
                }
            }

            pub fn new_unchecked(raw: String) -> Self {
                Self(raw)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

bounded_text!(FirstName, 70);
bounded_text!(LastName, 100);
bounded_text!(Title, 250);
bounded_text!(
    /// Stored exactly as supplied (after trimming); no checksum is verified.
    Isbn,
    13
);

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Date has wrong format. Use one of these formats instead: YYYY[-MM[-DD]].")]
pub struct PublishedDateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishedDate(NaiveDate);

impl PublishedDate {
    /// Accepts `YYYY`, `YYYY-MM` or `YYYY-MM-DD`. A missing month or day is the first one.
    pub fn parse(raw: &str) -> Result<Self, PublishedDateError> {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(\d{4})(?:-(\d{1,2})(?:-(\d{1,2}))?)?$").unwrap()
        });

        let caps = RE.captures(raw.trim()).ok_or(PublishedDateError)?;
        let component = |idx: usize| -> Result<u32, PublishedDateError> {
            caps.get(idx)
                .map_or(Ok(1), |m| m.as_str().parse().map_err(|_| PublishedDateError))
        };

        let year = caps[1].parse().map_err(|_| PublishedDateError)?;
        let month = component(2)?;
        let day = component(3)?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(PublishedDateError)
    }

    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub const fn date(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for PublishedDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    id: i64,
    first_name: FirstName,
    last_name: LastName,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl Author {
    pub const fn new(
        id: i64,
        first_name: FirstName,
        last_name: LastName,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            created,
            updated,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn first_name(&self) -> &FirstName {
        &self.first_name
    }

    pub const fn last_name(&self) -> &LastName {
        &self.last_name
    }

    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub const fn updated(&self) -> DateTime<Utc> {
        self.updated
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// The author side of a book. An author deleted after the book was written
/// leaves only its id behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookAuthor {
    Resolved(Author),
    Dangling(i64),
}

impl BookAuthor {
    pub const fn id(&self) -> i64 {
        match self {
            Self::Resolved(author) => author.id(),
            Self::Dangling(id) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: i64,
    title: Title,
    author: BookAuthor,
    isbn: Isbn,
    published: PublishedDate,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl Book {
    pub const fn new(
        id: i64,
        title: Title,
        author: BookAuthor,
        isbn: Isbn,
        published: PublishedDate,
        created: DateTime<Utc>,
        updated: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            author,
            isbn,
            published,
            created,
            updated,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn title(&self) -> &Title {
        &self.title
    }

    pub const fn author(&self) -> &BookAuthor {
        &self.author
    }

    pub const fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub const fn published(&self) -> PublishedDate {
        self.published
    }

    pub const fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub const fn updated(&self) -> DateTime<Utc> {
        self.updated
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title.as_str())
    }
}

/// Validated author attributes, used for both create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorFields {
    first_name: FirstName,
    last_name: LastName,
}

impl AuthorFields {
    pub const fn new(first_name: FirstName, last_name: LastName) -> Self {
        Self {
            first_name,
            last_name,
        }
    }

    pub const fn first_name(&self) -> &FirstName {
        &self.first_name
    }

    pub const fn last_name(&self) -> &LastName {
        &self.last_name
    }
}

/// Validated book attributes. The author is resolved separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    title: Title,
    isbn: Isbn,
    published: PublishedDate,
}

impl BookFields {
    pub const fn new(title: Title, isbn: Isbn, published: PublishedDate) -> Self {
        Self {
            title,
            isbn,
            published,
        }
    }

    pub const fn title(&self) -> &Title {
        &self.title
    }

    pub const fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub const fn published(&self) -> PublishedDate {
        self.published
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct StorageError(#[from] pub anyhow::Error);

#[derive(Error, Debug)]
pub enum FindAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Error, Debug)]
pub enum UpdateAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Error, Debug)]
pub enum DeleteAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum FindBookError {
    #[error("Book with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Error, Debug)]
pub enum UpdateBookError {
    #[error("Book with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Error, Debug)]
pub enum DeleteBookError {
    #[error("Book with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        let name = FirstName::new("  James ").unwrap();
        assert_eq!(name.as_str(), "James");
    }

    #[test]
    fn blank_text_is_required() {
        assert_eq!(LastName::new("   "), Err(TextFieldError::Blank));
        assert_eq!(TextFieldError::Blank.to_string(), "This field is required.");
    }

    #[test]
    fn text_longer_than_limit_is_rejected() {
        assert!(Isbn::new("1234567890123").is_ok());
        let err = Isbn::new("12345678901234").unwrap_err();
        assert_eq!(err, TextFieldError::TooLong { max: 13 });
        assert_eq!(
            err.to_string(),
            "Ensure this field has no more than 13 characters."
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let name = "é".repeat(FirstName::MAX_LENGTH);
        assert!(FirstName::new(&name).is_ok());
    }

    #[test]
    fn published_date_accepts_partial_forms() {
        let full = PublishedDate::parse("2016-11-13").unwrap();
        assert_eq!(full.to_string(), "2016-11-13");

        let month = PublishedDate::parse("2016-11").unwrap();
        assert_eq!(month.to_string(), "2016-11-01");

        let year = PublishedDate::parse("2016").unwrap();
        assert_eq!(year.to_string(), "2016-01-01");

        let short = PublishedDate::parse("2016-3-7").unwrap();
        assert_eq!(short.to_string(), "2016-03-07");
    }

    #[test]
    fn published_date_rejects_other_formats() {
        for raw in ["2013/04/16", "16-11-2016", "", "2016-13-01", "2016-02-30", "yesterday"] {
            assert_eq!(PublishedDate::parse(raw), Err(PublishedDateError), "{raw}");
        }
        assert_eq!(
            PublishedDateError.to_string(),
            "Date has wrong format. Use one of these formats instead: YYYY[-MM[-DD]]."
        );
    }

    #[test]
    fn author_displays_full_name() {
        let now = Utc::now();
        let author = Author::new(
            1,
            FirstName::new("James").unwrap(),
            LastName::new("Cook").unwrap(),
            now,
            now,
        );
        assert_eq!(author.to_string(), "James Cook");
    }

    #[test]
    fn book_displays_title_and_author_id() {
        let now = Utc::now();
        let book = Book::new(
            1,
            Title::new("Test Book").unwrap(),
            BookAuthor::Dangling(7),
            Isbn::new("1234567890123").unwrap(),
            PublishedDate::parse("2016-11-13").unwrap(),
            now,
            now,
        );
        assert_eq!(book.to_string(), "Test Book");
        assert_eq!(book.author().id(), 7);
    }
}
