use clap::Parser;
use std::path::PathBuf;

/// Organizes your saved Reddit content into per-category report files.
#[derive(Parser, Debug)]
#[command(name = "saved-sorter", version)]
pub struct Cli {
    /// Reddit script-app client id.
    #[arg(long = "client-id", value_name = "ID")]
    pub client_id: String,

    /// Reddit script-app client secret.
    #[arg(long = "client-secret", value_name = "SECRET")]
    pub client_secret: String,

    /// Account whose saved listing is fetched.
    #[arg(long)]
    pub username: String,

    /// Account password.
    #[arg(long)]
    pub password: String,

    /// Remove each item from the saved listing once it has been reported.
    #[arg(long, default_value_t = false)]
    pub unsave: bool,

    /// Category map file: one `category = ["subreddit", ...]` entry per line.
    #[arg(long, value_name = "FILE", default_value = "categories.toml")]
    pub categories: PathBuf,

    /// Directory the per-category report files are written to.
    #[arg(long, value_name = "DIR", default_value = "output")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_args() -> Vec<&'static str> {
        vec![
            "saved-sorter",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--username",
            "someone",
            "--password",
            "hunter2",
        ]
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(required_args()).unwrap();
        assert!(!cli.unsave);
        assert_eq!(cli.categories, PathBuf::from("categories.toml"));
        assert_eq!(cli.output, PathBuf::from("output"));
    }

    #[test]
    fn test_unsave_flag() {
        let mut args = required_args();
        args.push("--unsave");
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.unsave);
    }

    #[test]
    fn test_credentials_are_required() {
        assert!(Cli::try_parse_from(["saved-sorter"]).is_err());
        assert!(Cli::try_parse_from(["saved-sorter", "--client-id", "id"]).is_err());
    }
}
