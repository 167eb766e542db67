use serde::{Deserialize, Serialize};
use sorter_core::{CoreError, SavedRecord};
use url::Url;

const REDDIT_WEB_BASE: &str = "https://www.reddit.com/";
const REDDIT_SHORTLINK_BASE: &str = "https://redd.it";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing<T> {
    pub kind: String,
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingData<T> {
    pub children: Vec<T>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub dist: Option<u32>,
}

/// A saved listing child. The envelope's `kind` decides the payload shape:
/// `t3` is a submission, `t1` a comment on one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum RawSavedItem {
    #[serde(rename = "t3")]
    Post(SavedPostData),
    #[serde(rename = "t1")]
    Comment(SavedCommentData),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPostData {
    pub id: String,
    pub name: String,
    pub title: String,
    pub url: String,
    pub permalink: String,
    pub subreddit: String,
    pub created_utc: f64,
    pub score: i32,
}

/// Comments carry no url/title of their own; the listing inlines the parent
/// submission's as `link_url`/`link_title`. Optional because Reddit omits
/// them on some removed parents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCommentData {
    pub id: String,
    pub name: String,
    pub permalink: String,
    pub subreddit: String,
    pub link_url: Option<String>,
    pub link_title: Option<String>,
    pub created_utc: f64,
    pub score: i32,
}

impl RawSavedItem {
    /// The remote handle (`t3_…`/`t1_…`) actions like unsave are issued against.
    pub fn fullname(&self) -> &str {
        match self {
            RawSavedItem::Post(post) => &post.name,
            RawSavedItem::Comment(comment) => &comment.name,
        }
    }

    pub fn subreddit(&self) -> &str {
        match self {
            RawSavedItem::Post(post) => &post.subreddit,
            RawSavedItem::Comment(comment) => &comment.subreddit,
        }
    }

    /// Reduces either variant to the uniform report record.
    ///
    /// Posts contribute their own title/url and a short link; comments keep
    /// their own permalink but inherit url and title from the parent
    /// submission.
    pub fn normalize(&self) -> Result<SavedRecord, CoreError> {
        match self {
            RawSavedItem::Post(post) => Ok(SavedRecord {
                permalink: format!("{}/{}", REDDIT_SHORTLINK_BASE, post.id),
                url: post.url.clone(),
                title: post.title.clone(),
                subreddit: post.subreddit.to_lowercase(),
            }),
            RawSavedItem::Comment(comment) => {
                let url = comment.link_url.clone().ok_or_else(|| missing_field(&comment.name, "link_url"))?;
                let title = comment
                    .link_title
                    .clone()
                    .ok_or_else(|| missing_field(&comment.name, "link_title"))?;

                Ok(SavedRecord {
                    permalink: absolute_permalink(&comment.permalink)?,
                    url,
                    title,
                    subreddit: comment.subreddit.to_lowercase(),
                })
            }
        }
    }
}

fn missing_field(fullname: &str, field: &str) -> CoreError {
    CoreError::MalformedItem {
        details: format!("comment {fullname} is missing {field}"),
    }
}

fn absolute_permalink(path: &str) -> Result<String, CoreError> {
    let base = Url::parse(REDDIT_WEB_BASE).map_err(|err| CoreError::MalformedItem {
        details: format!("invalid permalink base: {err}"),
    })?;
    let absolute = base.join(path).map_err(|err| CoreError::MalformedItem {
        details: format!("invalid permalink '{path}': {err}"),
    })?;
    Ok(absolute.to_string())
}
