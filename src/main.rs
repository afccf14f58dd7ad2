use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use candy::{Candy, CandyConfig, GroupOptions};

#[derive(Parser)]
#[command(name = "candy")]
#[command(about = "Add groups and files to an Xcode-style project manifest")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new application project
    Init {
        /// Directory to create the project in
        dir: PathBuf,
        /// Project and target name
        name: String,
    },
    /// Print the navigator tree
    Tree {
        /// Manifest location (e.g. Demo.xcodeproj)
        project: PathBuf,
    },
    /// Print the resolved path of the primary source group
    SourcePath { project: PathBuf },
    /// Add a group chain (e.g. Features/Login) under the source group
    AddGroup {
        project: PathBuf,
        name: String,

        /// Create label-only groups that are not backed by a folder
        #[arg(long)]
        without_folder: bool,
    },
    /// Add a file to a group and to the main target's sources
    AddFile {
        project: PathBuf,
        file_name: String,

        /// Group path below the source group (defaults to the source group)
        #[arg(short, long, default_value = "")]
        group: String,

        /// Read the file's contents from this path
        #[arg(short, long)]
        contents: Option<PathBuf>,

        /// Do not add the file to the sources build phase
        #[arg(long)]
        no_build_phase: bool,
    },
}

/// Initialize tracing with output to stderr so stdout stays clean for command output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "candy=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = CandyConfig::load();

    match cli.command {
        Commands::Init { dir, name } => {
            let location = dir.join(format!("{}.xcodeproj", name));
            let candy = Candy::create(&location, &name, config)
                .with_context(|| format!("Failed to create project at {}", location.display()))?;
            println!("{}", candy.path().display());
        }
        Commands::Tree { project } => {
            let candy = Candy::open_with_config(&project, config)?;
            print!("{}", candy.render_tree()?);
        }
        Commands::SourcePath { project } => {
            let candy = Candy::open_with_config(&project, config)?;
            println!("{}", candy.source_path()?.display());
        }
        Commands::AddGroup {
            project,
            name,
            without_folder,
        } => {
            let mut candy = Candy::open_with_config(&project, config)?;
            let options = GroupOptions { without_folder };
            let groups = candy.add_group(&name, options)?;
            candy.write(true)?;
            println!("Added {} group(s)", groups.len());
        }
        Commands::AddFile {
            project,
            file_name,
            group,
            contents,
            no_build_phase,
        } => {
            let contents = contents
                .map(|path| {
                    std::fs::read(&path)
                        .with_context(|| format!("Failed to read {}", path.display()))
                })
                .transpose()?;

            let mut candy = Candy::open_with_config(&project, config)?;
            let group = candy.group_at(&group)?;
            let file = candy.add_file(group, &file_name, contents.as_deref())?;
            if !no_build_phase && candy.add_build_phase(file)?.is_none() {
                tracing::warn!("Main target has no sources build phase; {} not added", file_name);
            }
            candy.write(true)?;
            println!("{}", candy.full_path(file)?.display());
        }
    }

    Ok(())
}
