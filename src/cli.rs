use crate::config::{Config, SourceConfig};
use crate::error::Result;
use crate::loader::DEFAULT_QUERY;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cin_trends",
    version,
    about = "Clean and summarise Children in Need counts and rates per local authority, 2009-2019"
)]
pub struct Cli {
    /// TOML configuration file; flags below take precedence over it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read the source table from a CSV export
    #[arg(long, conflicts_with = "sqlite")]
    pub csv: Option<PathBuf>,

    /// Read the source table from a SQLite database
    #[arg(long)]
    pub sqlite: Option<PathBuf>,

    /// Query to run against --sqlite
    #[arg(long, requires = "sqlite")]
    pub query: Option<String>,

    /// Directory for the CSV and JSON outputs
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Size of the highest/lowest tables
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Year whose columns are ranked and averaged
    #[arg(long)]
    pub year: Option<u16>,

    /// Compute and print only; write no files
    #[arg(long)]
    pub no_write: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    pub fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(path) = self.csv {
            config.source = SourceConfig::Csv { path };
        }
        if let Some(path) = self.sqlite {
            config.source = SourceConfig::Sqlite {
                path,
                query: self.query.unwrap_or_else(|| DEFAULT_QUERY.to_string()),
            };
        }
        if let Some(dir) = self.output {
            config.output_dir = dir;
        }
        if let Some(n) = self.top_n {
            config.top_n = n;
        }
        if let Some(year) = self.year {
            config.reference_year = year;
        }
        if self.no_write {
            config.write_outputs = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cin_trends").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let c = parse(&["--sqlite", "cin.db", "--top-n", "5", "--year", "2018", "--no-write"])
            .into_config()
            .unwrap();
        assert_eq!(c.top_n, 5);
        assert_eq!(c.reference_year, 2018);
        assert!(!c.write_outputs);
        assert_eq!(
            c.source,
            SourceConfig::Sqlite {
                path: PathBuf::from("cin.db"),
                query: DEFAULT_QUERY.to_string(),
            }
        );
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cin.toml");
        std::fs::write(&path, "top_n = 7\noutput_dir = \"from_file\"\n").unwrap();
        let c = parse(&["--config", path.to_str().unwrap(), "--top-n", "3"])
            .into_config()
            .unwrap();
        assert_eq!(c.top_n, 3);
        assert_eq!(c.output_dir, PathBuf::from("from_file"));
    }

    #[test]
    fn csv_and_sqlite_are_exclusive() {
        let r = Cli::try_parse_from(["cin_trends", "--csv", "a.csv", "--sqlite", "b.db"]);
        assert!(r.is_err());
    }

    #[test]
    fn invalid_year_flag_fails_validation() {
        assert!(parse(&["--year", "2030"]).into_config().is_err());
    }
}
