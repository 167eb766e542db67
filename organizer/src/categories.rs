use crate::report::UNCATEGORIZED_FILE;
use sorter_core::{ConfigError, CoreError, SavedRecord};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// User-defined mapping from category name to the subreddits it covers.
///
/// Loaded once per run and read-only afterwards. Subreddit names are folded
/// to lowercase at load time so membership tests are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl CategoryMap {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = fs::read_to_string(path).map_err(|err| read_error(path, err))?;
        let parsed: BTreeMap<String, Vec<String>> =
            toml::from_str(&raw).map_err(ConfigError::Parse)?;

        let mut categories = BTreeMap::new();
        for (name, subreddits) in parsed {
            validate_category_name(&name)?;
            let subreddits: BTreeSet<String> = subreddits
                .into_iter()
                .map(|subreddit| subreddit.to_lowercase())
                .collect();
            debug!("Category '{}' covers {} subreddits", name, subreddits.len());
            categories.insert(name, subreddits);
        }

        Ok(Self { categories })
    }

    /// All categories whose subreddit set contains the record's subreddit.
    ///
    /// Case-insensitive, possibly empty; an empty result means the record is
    /// uncategorized. Multiple matches are all retained.
    pub fn classify(&self, record: &SavedRecord) -> BTreeSet<&str> {
        let needle = record.subreddit.to_lowercase();
        self.categories
            .iter()
            .filter(|(_, subreddits)| subreddits.contains(needle.as_str()))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }
}

fn read_error(path: &Path, err: io::Error) -> CoreError {
    let path = path.display().to_string();
    let config_error = match err.kind() {
        io::ErrorKind::NotFound => ConfigError::FileNotFound { path },
        io::ErrorKind::PermissionDenied => ConfigError::PermissionDenied { path },
        _ => ConfigError::Unreadable {
            path,
            reason: err.to_string(),
        },
    };
    config_error.into()
}

// Category names double as report file names.
fn validate_category_name(name: &str) -> Result<(), ConfigError> {
    let reason = if name.is_empty() {
        Some("category names must not be empty")
    } else if name.contains('/') || name.contains('\\') {
        Some("category names must not contain path separators")
    } else if name == UNCATEGORIZED_FILE {
        Some("this name is reserved for uncategorized items")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidCategory {
            category: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(subreddit: &str) -> SavedRecord {
        SavedRecord {
            permalink: "https://redd.it/abc".to_string(),
            url: "https://example.com".to_string(),
            title: "title".to_string(),
            subreddit: subreddit.to_string(),
        }
    }

    fn write_categories(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_lowercases_subreddits() {
        let file = write_categories("tech = [\"Programming\", \"GoLang\"]\n");
        let map = CategoryMap::load(file.path()).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.classify(&record("programming")).len(), 1);
        assert_eq!(map.classify(&record("golang")).len(), 1);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let file = write_categories("tech = [\"programming\"]\n");
        let map = CategoryMap::load(file.path()).unwrap();

        let matches = map.classify(&record("Programming"));
        assert_eq!(matches, BTreeSet::from(["tech"]));
    }

    #[test]
    fn test_classify_returns_every_match() {
        let file = write_categories("a = [\"x\"]\nb = [\"x\"]\nc = [\"y\"]\n");
        let map = CategoryMap::load(file.path()).unwrap();

        let matches = map.classify(&record("x"));
        assert_eq!(matches, BTreeSet::from(["a", "b"]));
    }

    #[test]
    fn test_classify_no_match_is_empty() {
        let file = write_categories("tech = [\"programming\"]\n");
        let map = CategoryMap::load(file.path()).unwrap();

        assert!(map.classify(&record("cooking")).is_empty());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let error = CategoryMap::load(Path::new("/nonexistent/categories.toml")).unwrap_err();
        assert!(matches!(
            error,
            CoreError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let file = write_categories("tech = \"not a list\"\n");
        let error = CategoryMap::load(file.path()).unwrap_err();
        assert!(matches!(
            error,
            CoreError::Config(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_reserved_category_name_is_rejected() {
        let file = write_categories("uncategorized = [\"anything\"]\n");
        let error = CategoryMap::load(file.path()).unwrap_err();
        assert!(matches!(
            error,
            CoreError::Config(ConfigError::InvalidCategory { .. })
        ));
    }

    #[test]
    fn test_category_name_with_separator_is_rejected() {
        let file = write_categories("\"a/b\" = [\"x\"]\n");
        let error = CategoryMap::load(file.path()).unwrap_err();
        assert!(matches!(
            error,
            CoreError::Config(ConfigError::InvalidCategory { .. })
        ));
    }

    #[test]
    fn test_empty_map_classifies_nothing() {
        let file = write_categories("");
        let map = CategoryMap::load(file.path()).unwrap();
        assert!(map.is_empty());
        assert!(map.classify(&record("anything")).is_empty());
    }
}
