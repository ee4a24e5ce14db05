use clap::{Parser, Subcommand};
use folio::config::{self, SiteConfig};
use folio::source::{DataSource, DirSource, HttpSource};
use folio::theme::{FileStore, Theme, ThemeManager};
use folio::{generate, loader, output};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Render data-driven components into a static personal site")]
#[command(long_about = "\
Render data-driven components into a static personal site

Pages are plain HTML with empty placeholder elements. Content lives in JSON
files; folio renders each placeholder from its data file at build time.

Site structure:

  site/
  ├── folio.toml                   # Site config (optional)
  ├── data/
  │   ├── navigation.json          # → nav-placeholder
  │   ├── footer.json              # → footer-placeholder
  │   ├── blog-posts.json          # → blog-posts-placeholder, all-blog-posts-placeholder
  │   ├── projects.json            # → projects-placeholder, all-projects-placeholder
  │   └── news.json                # → all-news-placeholder
  ├── index.html                   # Rendered
  ├── blog/first-post.html         # Rendered, links resolved relative to blog/
  └── assets/                      # Copied verbatim

A placeholder whose data is missing or malformed is left as it is and
reported; it never fails the build.

Run 'folio gen-config' to generate a documented folio.toml.")]
#[command(version)]
struct Cli {
    /// Site directory
    #[arg(long, default_value = "site", global = true)]
    site: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Fetch data files from this base URL instead of the site's data directory
    #[arg(long, global = true)]
    data_url: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every page of the site into the output directory
    Build,
    /// Render one page (path relative to the site) to stdout
    Render { page: PathBuf },
    /// Load every data file and report which are available
    Check,
    /// Show or change the stored theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Print a stock folio.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the stored preference
    Get,
    /// Store a preference
    Set { theme: Theme },
    /// Flip between light and dark
    Toggle,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.site)?;
            init_thread_pool(&site_config.processing);
            let source = data_source(&cli.site, &site_config, cli.data_url.as_deref())?;
            let theme = theme_manager(&cli.site, &site_config)?.preferred();

            println!("==> Building {} → {}", cli.site.display(), cli.output.display());
            let summary =
                generate::build(&cli.site, &cli.output, &site_config, source.as_ref(), theme)?;
            output::print_build_output(&summary);
        }
        Command::Render { page } => {
            let site_config = config::load_config(&cli.site)?;
            let source = data_source(&cli.site, &site_config, cli.data_url.as_deref())?;
            let theme = theme_manager(&cli.site, &site_config)?.preferred();

            let html = std::fs::read_to_string(cli.site.join(&page))?;
            let rel_path = page
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let rendered =
                generate::render_page(&html, &rel_path, &site_config, source.as_ref(), theme);
            print!("{}", rendered.html);
        }
        Command::Check => {
            let site_config = config::load_config(&cli.site)?;
            let source = data_source(&cli.site, &site_config, cli.data_url.as_deref())?;
            println!("==> Checking {}", cli.site.display());
            let statuses = loader::check_data(source.as_ref());
            output::print_check_output(&statuses);
            if statuses.iter().all(|s| s.result.is_ok()) {
                println!("==> All data files are available");
            }
        }
        Command::Theme { action } => {
            let site_config = config::load_config(&cli.site)?;
            let mut manager = theme_manager(&cli.site, &site_config)?;
            let now = Instant::now();
            let theme = match action {
                ThemeAction::Get => manager.preferred(),
                ThemeAction::Set { theme } => {
                    manager.apply(theme, false, now)?;
                    theme
                }
                ThemeAction::Toggle => {
                    manager.init(now)?;
                    manager.toggle(now)?
                }
            };
            println!("{}", theme);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// The site's data directory, or `--data-url` when given.
fn data_source(
    site: &Path,
    site_config: &SiteConfig,
    data_url: Option<&str>,
) -> Result<Box<dyn DataSource>, Box<dyn std::error::Error>> {
    Ok(match data_url {
        Some(url) => Box::new(HttpSource::new(url)?),
        None => Box::new(DirSource::new(site.join(&site_config.data_dir))),
    })
}

fn theme_manager(
    site: &Path,
    site_config: &SiteConfig,
) -> Result<ThemeManager<FileStore>, Box<dyn std::error::Error>> {
    let store = FileStore::open(site.join(&site_config.theme.store))?;
    Ok(ThemeManager::from_config(store, &site_config.theme))
}
