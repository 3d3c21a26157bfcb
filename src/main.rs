use chronicle::content::ContentSet;
use chronicle::registry::{BuildEvent, Registry};
use chronicle::{config, output};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

#[derive(Parser)]
#[command(name = "chronicle")]
#[command(about = "Taxonomy, calendar and pagination collections for static blogs")]
#[command(long_about = "\
Taxonomy, calendar and pagination collections for static blogs

Reads a JSON manifest of content items and builds the blog collections a
template layer renders: the paginated feed, one paginated collection per
taxonomy value, year and month archives, and flat flagged collections.

Manifest format:

  [
    {
      \"input_path\": \"blog/hello.md\",
      \"url\": \"/blog/hello/\",
      \"date\": \"2024-01-15\",
      \"data\": { \"title\": \"Hello\", \"tags\": [\"Rust\"], \"draft\": false }
    }
  ]

Output URLs:

  blog                 feed, page 1
  blog/page-2          feed, page 2
  blog/tag/rust        taxonomy pages
  blog/2024/01         calendar month

Run 'chronicle gen-config' to generate a documented chronicle.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing chronicle.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build every collection and write the views as JSON
    Build {
        /// Content manifest (JSON list of items)
        #[arg(long)]
        manifest: PathBuf,
        /// Where to write the views
        #[arg(long, default_value = "views.json")]
        output: PathBuf,
    },
    /// Validate config and content without writing anything
    Check {
        #[arg(long)]
        manifest: PathBuf,
    },
    /// Print the breadcrumb trail for a URL across all collections
    Breadcrumbs {
        #[arg(long)]
        manifest: PathBuf,
        url: String,
    },
    /// Print a stock chronicle.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { manifest, output: out } => {
            let config = config::load_config(&cli.config_dir)?;
            let registry = Registry::with_defaults(&config)?;
            let mut content = ContentSet::load(&manifest)?;

            println!("==> Building collections from {}", manifest.display());
            let (tx, printer) = spawn_event_printer();
            let views = registry.build(&mut content, Some(&tx));
            drop(tx);
            printer.join().ok();
            let views = views?;

            let json = serde_json::to_string_pretty(&views)?;
            write_output(&out, &json)?;
            output::print_build_output(&views);
            println!("==> Wrote {}", out.display());
        }
        Command::Check { manifest } => {
            println!("==> Checking {}", manifest.display());
            let config = config::load_config(&cli.config_dir)?;
            let registry = Registry::with_defaults(&config)?;
            let mut content = ContentSet::load(&manifest)?;
            let (tx, printer) = spawn_event_printer();
            let views = registry.build(&mut content, Some(&tx));
            drop(tx);
            printer.join().ok();
            output::print_check_output(&config, &views?);
            println!("==> Content is valid");
        }
        Command::Breadcrumbs { manifest, url } => {
            let config = config::load_config(&cli.config_dir)?;
            let registry = Registry::with_defaults(&config)?;
            let mut content = ContentSet::load(&manifest)?;
            let views = registry.build(&mut content, None)?;
            output::print_breadcrumbs(&views.breadcrumbs(&url));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Print build events on a background thread until the sender is dropped.
fn spawn_event_printer() -> (Sender<BuildEvent>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_build_event(&event) {
                println!("{}", line);
            }
        }
    });
    (tx, printer)
}

fn write_output(path: &Path, json: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
}
