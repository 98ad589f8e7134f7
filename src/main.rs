//! DevDeck - shortcuts to your local development projects.
//!
//! Without a subcommand DevDeck opens the terminal dashboard; the
//! subcommands manage shortcuts and launcher scripts from the shell.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devdeck::core::{
    expand_path, filter_shortcuts, Category, Config, Icon, LauncherScript, Shortcut, ShortcutDraft,
    ShortcutPatch, ShortcutRepository, ShortcutStore, DEFAULT_COMMAND,
};
use devdeck::{tui, App};

/// Shortcuts to your local development projects
#[derive(Parser)]
#[command(name = "devdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run (opens the dashboard when omitted)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory where shortcuts are stored
    #[arg(long, global = true, env = "DEVDECK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file to use instead of the default lookup
    #[arg(long, global = true, env = "DEVDECK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved shortcuts
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Only show shortcuts whose name or path matches
        #[arg(long)]
        filter: Option<String>,
    },

    /// Add a shortcut
    Add {
        /// Project name
        #[arg(long)]
        name: String,

        /// Project directory
        #[arg(long)]
        path: String,

        /// Command that starts the project
        #[arg(long, conflicts_with = "suggest")]
        command: Option<String>,

        /// Local port the project serves on
        #[arg(long, conflicts_with = "auto_port")]
        port: Option<String>,

        /// Use the next free port
        #[arg(long)]
        auto_port: bool,

        /// Icon name (terminal, code, globe, coffee, zap, box, layout, server) or image URL
        #[arg(long)]
        icon: Option<String>,

        /// Image file to embed as the icon
        #[arg(long, conflicts_with = "icon")]
        icon_file: Option<PathBuf>,

        /// Short description
        #[arg(long)]
        description: Option<String>,

        /// Category (development, production, utility)
        #[arg(long)]
        category: Option<Category>,

        /// Ask the configured AI provider for the run command
        #[arg(long)]
        suggest: bool,
    },

    /// Change fields of a shortcut
    Edit {
        /// Shortcut id or name
        shortcut: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        path: Option<String>,

        #[arg(long)]
        command: Option<String>,

        #[arg(long, conflicts_with = "clear_port")]
        port: Option<String>,

        /// Remove the port
        #[arg(long)]
        clear_port: bool,

        #[arg(long)]
        icon: Option<String>,

        /// Image file to embed as the icon
        #[arg(long, conflicts_with = "icon")]
        icon_file: Option<PathBuf>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category: Option<Category>,
    },

    /// Delete a shortcut
    Remove {
        /// Shortcut id or name
        shortcut: String,

        /// Don't ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Generate the launcher script for a shortcut
    Script {
        /// Shortcut id or name
        shortcut: String,

        /// Directory to write the script to
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Print the script instead of writing it
        #[arg(long)]
        stdout: bool,
    },

    /// Print the next free port
    SuggestPort {
        /// Ignore this shortcut's port (id or name)
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Suggest a run command for a project
    Suggest {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        path: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },

    /// Show configuration
    Config {
        /// Show config directory path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(&expand_path(path))?,
        None => Config::load()?,
    };
    let data_dir = match &cli.data_dir {
        Some(dir) => expand_path(dir),
        None => config.resolved_data_dir()?,
    };

    // The dashboard owns the screen, so its logs go to a file
    let log_file = cli.command.is_none().then(|| data_dir.join("devdeck.log"));
    init_logging(cli.verbose, log_file.as_deref())?;

    match cli.command {
        None => cmd_dashboard(&config, &data_dir)?,
        Some(Commands::List { format, filter }) => {
            cmd_list(&config, &data_dir, format, filter.as_deref())?;
        }
        Some(Commands::Add {
            name,
            path,
            command,
            port,
            auto_port,
            icon,
            icon_file,
            description,
            category,
            suggest,
        }) => {
            let icon = resolve_icon(icon.as_deref(), icon_file.as_deref())?;
            let mut repo = open_repository(&config, &data_dir);
            let command = match command {
                Some(command) => command,
                None if suggest => suggest_command(&config, &name, &path)?,
                None => DEFAULT_COMMAND.to_string(),
            };
            let port = if auto_port { Some(repo.suggest_port(None)) } else { port };

            let mut draft = ShortcutDraft::new(name, path, command)
                .with_icon(icon.unwrap_or_default())
                .with_category(category.unwrap_or_default());
            draft.port = port;
            draft.description = description;

            cmd_add(&mut repo, draft)?;
        }
        Some(Commands::Edit {
            shortcut,
            name,
            path,
            command,
            port,
            clear_port,
            icon,
            icon_file,
            description,
            category,
        }) => {
            let patch = ShortcutPatch {
                name,
                path,
                command,
                port: if clear_port { Some(None) } else { port.map(Some) },
                description: description.map(Some),
                icon: resolve_icon(icon.as_deref(), icon_file.as_deref())?,
                category,
            };
            cmd_edit(&mut open_repository(&config, &data_dir), &shortcut, patch)?;
        }
        Some(Commands::Remove { shortcut, yes }) => {
            cmd_remove(&mut open_repository(&config, &data_dir), &shortcut, yes)?;
        }
        Some(Commands::Script { shortcut, output, stdout }) => {
            let repo = open_repository(&config, &data_dir);
            let output = if stdout {
                None
            } else {
                Some(
                    output
                        .or_else(|| config.script.output_dir.clone())
                        .map_or_else(|| PathBuf::from("."), |dir| expand_path(&dir)),
                )
            };
            cmd_script(&config, &repo, &shortcut, output.as_deref())?;
        }
        Some(Commands::SuggestPort { exclude }) => {
            let repo = open_repository(&config, &data_dir);
            let excluded = match exclude.as_deref() {
                Some(query) => Some(find_shortcut(&repo, query)?.id.clone()),
                None => None,
            };
            println!("{}", repo.suggest_port(excluded.as_deref()));
        }
        Some(Commands::Suggest { name, path }) => {
            if name.trim().is_empty() && path.trim().is_empty() {
                anyhow::bail!("Give a project --name or --path to base the suggestion on");
            }
            println!("{}", suggest_command(&config, &name, &path)?);
        }
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
        }
        Some(Commands::Config { path }) => {
            cmd_config(&config, path)?;
        }
    }

    Ok(())
}

/// Set up tracing. `--verbose` forces debug; otherwise `RUST_LOG` or warn.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(false).with_writer(io::stderr))
                .with(filter)
                .init();
        }
    }

    Ok(())
}

fn open_repository(config: &Config, data_dir: &Path) -> ShortcutRepository {
    ShortcutRepository::load_or_seed(ShortcutStore::open(data_dir), config.general.seed_demo)
}

fn find_shortcut<'a>(repo: &'a ShortcutRepository, query: &str) -> Result<&'a Shortcut> {
    repo.find(query).ok_or_else(|| anyhow::anyhow!("No shortcut matching '{query}' found"))
}

/// Icon from `--icon` or, embedded, from `--icon-file`.
fn resolve_icon(icon: Option<&str>, icon_file: Option<&Path>) -> Result<Option<Icon>> {
    if let Some(path) = icon_file {
        return Ok(Some(Icon::from_file(&expand_path(path))?));
    }
    Ok(icon.map(Icon::parse))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn suggest_command(config: &Config, name: &str, path: &str) -> Result<String> {
    let runtime = runtime()?;
    let command = runtime.block_on(async {
        let service = devdeck::suggestion_service(&config.ai).await;
        service.suggest_command(name, path).await
    });
    Ok(command)
}

/// Run the interactive dashboard.
fn cmd_dashboard(config: &Config, data_dir: &Path) -> Result<()> {
    let runtime = runtime()?;
    let service = runtime.block_on(devdeck::suggestion_service(&config.ai));
    tracing::info!(provider = service.active_provider(), "Starting dashboard");

    let repo = open_repository(config, data_dir);
    let app = App::new(config, repo, service, runtime.handle().clone());
    tui::run_tui(app)
}

/// List saved shortcuts.
fn cmd_list(
    config: &Config,
    data_dir: &Path,
    format: OutputFormat,
    filter: Option<&str>,
) -> Result<()> {
    let repo = open_repository(config, data_dir);
    let indices = filter_shortcuts(repo.list(), filter.unwrap_or(""), config.ui.search_mode);
    let shortcuts: Vec<&Shortcut> = indices.iter().map(|&i| &repo.list()[i]).collect();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&shortcuts)?;
            println!("{json}");
        }
        OutputFormat::Text => {
            for shortcut in &shortcuts {
                let port = shortcut.active_port().map(|p| format!(" :{p}")).unwrap_or_default();
                println!(
                    "{} {}{}  {}  $ {}",
                    shortcut.icon.glyph(),
                    shortcut.name,
                    port,
                    shortcut.path,
                    shortcut.command
                );
            }
            println!("\nTotal: {} shortcuts", shortcuts.len());
        }
    }

    Ok(())
}

fn warn_port_conflict(repo: &ShortcutRepository, shortcut: &Shortcut) {
    if let Some(port) = shortcut.active_port() {
        if repo.has_port_conflict(port, Some(shortcut.id.as_str())) {
            eprintln!("Warning: port {port} is already used by another shortcut");
        }
    }
}

fn cmd_add(repo: &mut ShortcutRepository, draft: ShortcutDraft) -> Result<()> {
    let shortcut = repo.create(draft)?;
    warn_port_conflict(repo, &shortcut);
    println!("Added {} ({})", shortcut.name, shortcut.id);
    Ok(())
}

fn cmd_edit(repo: &mut ShortcutRepository, query: &str, patch: ShortcutPatch) -> Result<()> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to change; pass at least one field flag");
    }
    let id = find_shortcut(repo, query)?.id.clone();
    let shortcut = repo.update(&id, patch)?;
    warn_port_conflict(repo, &shortcut);
    println!("Updated {}", shortcut.name);
    Ok(())
}

fn cmd_remove(repo: &mut ShortcutRepository, query: &str, skip_confirm: bool) -> Result<()> {
    let (id, name) = {
        let shortcut = find_shortcut(repo, query)?;
        (shortcut.id.clone(), shortcut.name.clone())
    };

    if !skip_confirm {
        print!("Delete '{name}'? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled");
            return Ok(());
        }
    }

    repo.delete(&id)?;
    println!("Removed {name}");
    Ok(())
}

/// Write or print a launcher script. `output` of `None` prints to stdout.
fn cmd_script(
    config: &Config,
    repo: &ShortcutRepository,
    query: &str,
    output: Option<&Path>,
) -> Result<()> {
    let shortcut = find_shortcut(repo, query)?;
    let launcher = LauncherScript::for_shortcut(shortcut, &config.script_options());

    match output {
        None => print!("{}", launcher.content),
        Some(dir) => {
            let path = launcher
                .write_to(dir)
                .with_context(|| format!("Failed to write launcher to {}", dir.display()))?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "devdeck", &mut io::stdout());
}

/// Show configuration.
fn cmd_config(config: &Config, show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::config_dir() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let toml = toml::to_string_pretty(config)?;
    println!("{toml}");

    Ok(())
}
