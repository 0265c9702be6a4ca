use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use folio::commands;
use folio::logging::{self, LogFormat};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Portfolio site server for freelance developers, backed by headless WordPress", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize a new site directory
    Init {
        /// Path to create site directory
        path: PathBuf,

        /// Site and owner name
        #[arg(long)]
        name: Option<String>,

        /// Contact email address
        #[arg(long)]
        email: Option<String>,

        /// WordPress REST root, e.g. https://cms.example.com/wp-json
        #[arg(long)]
        cms_url: Option<String>,
    },

    /// Validate site configuration
    Validate {
        /// Path to site directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Also check that the CMS answers
        #[arg(long)]
        check_cms: bool,
    },

    /// Serve the site
    Serve {
        /// Path to site directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Reload site.toml and the browser when files change
        #[arg(short, long)]
        watch: bool,

        /// Serve without a CMS: blog pages render empty
        #[arg(long)]
        offline: bool,
    },

    /// Export the site as static files
    Build {
        /// Path to site directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,

        /// Build without a CMS: blog pages render empty
        #[arg(long)]
        offline: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format);

    match cli.command {
        Command::Init {
            path,
            name,
            email,
            cms_url,
        } => commands::init::run(
            path,
            commands::init::InitOptions {
                name,
                email,
                cms_url,
            },
        ),
        Command::Validate { path, check_cms } => commands::validate::run(path, check_cms).await,
        Command::Serve {
            path,
            host,
            port,
            watch,
            offline,
        } => {
            commands::serve::run(commands::serve::ServeOptions {
                path,
                host,
                port,
                watch,
                offline,
            })
            .await
        }
        Command::Build {
            path,
            output,
            offline,
        } => commands::build::run(path, output, offline).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "folio", &mut io::stdout());
            Ok(())
        }
    }
}
