mod config;
mod db;
mod error;
mod fetch;
mod parser;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use config::{ExtractConfig, FetchConfig};

#[derive(Parser)]
#[command(name = "revenue_scraper", about = "Scrape a revenue-history table into SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page, extract its revenue table and replace the stored table
    Scrape {
        url: String,
        #[command(flatten)]
        extract: ExtractArgs,
        #[command(flatten)]
        store: StoreArgs,
        /// Request timeout in seconds
        #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
        timeout: u64,
    },
    /// Same as scrape, reading the HTML from a local file
    Import {
        file: PathBuf,
        #[command(flatten)]
        extract: ExtractArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Print the stored table
    Show {
        #[command(flatten)]
        store: StoreArgs,
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Row count and year range of the stored table
    Stats {
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args)]
struct ExtractArgs {
    /// Zero-based index of the table in the page
    #[arg(short, long, default_value_t = config::DEFAULT_TABLE_INDEX)]
    index: usize,
    /// Substring to strip from every cell (repeatable)
    #[arg(long)]
    noise: Vec<String>,
}

impl ExtractArgs {
    fn config(&self) -> ExtractConfig {
        ExtractConfig {
            noise: self.noise.clone(),
            ..ExtractConfig::default()
        }
    }
}

#[derive(Args)]
struct StoreArgs {
    /// SQLite file (default: $REVENUE_DB_PATH or data/revenue.sqlite)
    #[arg(long)]
    store: Option<PathBuf>,
    /// Table name inside the store
    #[arg(short, long, default_value = config::DEFAULT_TABLE_NAME)]
    table: String,
}

impl StoreArgs {
    fn path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(config::default_store)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = run(cli.command);

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Scrape {
            url,
            extract,
            store,
            timeout,
        } => {
            let html = fetch::fetch_html(&url, &FetchConfig::with_timeout_secs(timeout))?;
            let n = extract_and_save(&html, &extract, &store)?;
            println!("Saved {} rows from {} into {}:{}", n, url, store.path().display(), store.table);
            Ok(())
        }
        Commands::Import {
            file,
            extract,
            store,
        } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let n = extract_and_save(&html, &extract, &store)?;
            println!("Saved {} rows from {} into {}:{}", n, file.display(), store.path().display(), store.table);
            Ok(())
        }
        Commands::Show { store, json } => {
            let rows = db::load(&store.path(), &store.table)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            if rows.is_empty() {
                println!("Table '{}' is empty.", store.table);
                return Ok(());
            }

            println!("{:>3} | {:>6} | {:>14} | {:>9}", "#", "Year", "Revenue", "Change");
            println!("{}", "-".repeat(42));
            for (i, r) in rows.iter().enumerate() {
                println!(
                    "{:>3} | {:>6} | {:>14} | {:>8.2}%",
                    i + 1,
                    r.year,
                    format_money(r.revenue),
                    r.change
                );
            }
            println!("\n{} rows", rows.len());
            Ok(())
        }
        Commands::Stats { store } => {
            let s = db::summarize(&store.path(), &store.table)?;
            let year = |y: Option<u32>| y.map(|y| y.to_string()).unwrap_or_else(|| "-".into());
            println!("Rows:    {}", s.rows);
            println!("First:   {}", year(s.first_year));
            println!("Last:    {}", year(s.last_year));
            println!(
                "Latest:  {}",
                s.latest_revenue.map(format_money).unwrap_or_else(|| "-".into())
            );
            Ok(())
        }
    }
}

fn extract_and_save(html: &str, extract: &ExtractArgs, store: &StoreArgs) -> anyhow::Result<usize> {
    let records = parser::extract_table(html, extract.index, &extract.config())
        .with_context(|| format!("Failed to extract table #{}", extract.index))?;
    let n = db::save(&records, &store.path(), &store.table)
        .with_context(|| format!("Failed to save table '{}'", store.table))?;
    Ok(n)
}

/// 96_773_000_000.0 → "$96.77 B"
fn format_money(v: f64) -> String {
    let (scaled, unit) = match v.abs() {
        a if a >= 1e9 => (v / 1e9, " B"),
        a if a >= 1e6 => (v / 1e6, " M"),
        a if a >= 1e3 => (v / 1e3, " K"),
        _ => (v, ""),
    };
    let sign = if scaled < 0.0 { "-" } else { "" };
    format!("{}${:.2}{}", sign, scaled.abs(), unit)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money() {
        assert_eq!(format_money(96.773e9), "$96.77 B");
        assert_eq!(format_money(5.0e8), "$500.00 M");
        assert_eq!(format_money(1.2e4), "$12.00 K");
        assert_eq!(format_money(42.0), "$42.00");
        assert_eq!(format_money(-5.0e6), "-$5.00 M");
    }

    #[test]
    fn cli_parses() {
        let cli = Cli::try_parse_from([
            "revenue_scraper",
            "scrape",
            "https://example.com/revenue",
            "--index",
            "1",
            "--noise",
            "*",
            "--table",
            "tesla",
            "--timeout",
            "10",
        ])
        .unwrap();
        match cli.command {
            Commands::Scrape {
                url,
                extract,
                store,
                timeout,
            } => {
                assert_eq!(url, "https://example.com/revenue");
                assert_eq!(extract.index, 1);
                assert_eq!(extract.config().noise, vec!["*".to_string()]);
                assert_eq!(store.table, "tesla");
                assert_eq!(timeout, 10);
            }
            _ => panic!("expected scrape"),
        }
    }

    #[test]
    fn import_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let html = std::fs::read_to_string("tests/fixtures/revenue.html").unwrap();
        let extract = ExtractArgs {
            index: 1,
            noise: Vec::new(),
        };
        let store = StoreArgs {
            store: Some(dir.path().join("r.sqlite")),
            table: "tesla".into(),
        };
        assert_eq!(extract_and_save(&html, &extract, &store).unwrap(), 5);
        let mut years: Vec<u32> = db::load(&store.path(), "tesla")
            .unwrap()
            .iter()
            .map(|r| r.year)
            .collect();
        years.sort();
        assert_eq!(years, vec![2019, 2020, 2021, 2022, 2023]);
    }

    #[test]
    fn run_reports_command_failures() {
        let dir = tempfile::tempdir().unwrap();
        let store = || StoreArgs {
            store: Some(dir.path().join("r.sqlite")),
            table: "tesla".into(),
        };

        let missing = run(Commands::Show { store: store(), json: true });
        assert!(missing.is_err());

        let bad_file = run(Commands::Import {
            file: dir.path().join("absent.html"),
            extract: ExtractArgs { index: 1, noise: Vec::new() },
            store: store(),
        });
        assert!(bad_file.unwrap_err().to_string().starts_with("Failed to read"));

        let imported = run(Commands::Import {
            file: "tests/fixtures/revenue.html".into(),
            extract: ExtractArgs { index: 1, noise: Vec::new() },
            store: store(),
        });
        assert!(imported.is_ok());
        assert!(run(Commands::Show { store: store(), json: true }).is_ok());
        assert!(run(Commands::Stats { store: store() }).is_ok());
    }
}
