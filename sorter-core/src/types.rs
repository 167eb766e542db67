use std::fmt;

/// A saved item reduced to the fields the report cares about.
///
/// `subreddit` is always lowercase; category matching relies on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRecord {
    pub permalink: String,
    pub url: String,
    pub title: String,
    pub subreddit: String,
}

impl fmt::Display for SavedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Subreddit: {}", self.subreddit)?;
        writeln!(f, "Url: {}", self.url)?;
        writeln!(f, "Link: {}", self.permalink)
    }
}
