use clap::{Parser, Subcommand};
use folio::{config, convert, output, publish};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for markdown sites with a blog")]
#[command(long_about = "\
Static site generator for markdown sites with a blog

Every *.md file under the content directory whose front matter says
`status: published` becomes an HTML page at the same relative path
under the output directory.

Site structure:

  config.toml                 # Paths, blog settings, site properties
  content/
  ├── index.md                # → output/index.html
  ├── about.md                # → output/about.html
  └── blog/
      ├── index.md            # Blog landing page (not listed in the feed)
      └── hello-world.md      # → output/blog/hello-world.html + feed entry
  templates/
  ├── default.html            # Fallback template
  ├── blog.html               # Used for documents in blog/
  ├── index.html              # Used for every index.md
  └── header.html             # Partial: inlined wherever $header$ appears
  static/                     # Copied to output/static

Template lookup (first existing wins):
  <template_dir>/<name>.html → <template_dir>/<dir>.html → default template

Placeholders:
  $key$        any front matter key or [properties] entry
  $body$       the converted markdown
  Lists render as `a, b, c`; unset $title$ $date$ $tags$ $status$ render empty.

Run 'folio gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults are used if it does not exist)
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render all published documents and write the blog feed
    Build,
    /// Show which template and action each document would get, without writing
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.config)?;
            let converter = convert::from_config(&site_config.convert);

            let content_root = site_config.paths.content_dir.clone();
            let output_root = site_config.paths.output_dir.clone();
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_build_event(&event, &content_root, &output_root) {
                        println!("{}", line);
                    }
                }
            });

            let result = publish::build(&site_config, converter.as_ref(), Some(tx));
            printer
                .join()
                .map_err(|_| "output printer thread panicked")?;
            let report = result?;
            output::print_report(&report);
        }
        Command::Check => {
            let site_config = config::load_config(&cli.config)?;
            println!("==> Checking {}", site_config.paths.content_dir.display());
            let plan = publish::plan(&site_config)?;
            output::print_plan(&plan, &site_config.paths.content_dir);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
