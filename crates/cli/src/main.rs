// Datashelf CLI - prepare CSV/Excel files and manage datasets in the catalog

mod commands;
mod edit_ops;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use datashelf_client::Visibility;
use edit_ops::EditOp;
use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "dshelf")]
#[command(about = "Prepare tabular files and publish them to the dataset catalog")]
#[command(version)]
struct Cli {
    /// Catalog API base URL (overrides settings and DATASHELF_API_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check credentials against the catalog and save them
    Login {
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Password (prompted for when omitted on a terminal)
        #[arg(long, env = "DATASHELF_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget saved credentials
    Logout,

    /// List datasets
    List {
        /// Only public datasets, even when signed in
        #[arg(long)]
        public: bool,

        #[arg(long)]
        json: bool,
    },

    /// Show a dataset's metadata and sample rows
    Show {
        name: String,

        #[arg(long)]
        json: bool,
    },

    /// Parse a file, apply edits and the row window, and print the result
    #[command(after_help = "\
Examples:
  dshelf preview sales.csv
  dshelf preview report.xlsx --sheet 1 --skip-rows 2 --skip-footer 1
  dshelf preview sales.csv --edit set:3:0:Jakarta --edit del-row:7 --format csv")]
    Preview {
        file: PathBuf,

        #[command(flatten)]
        prep: PrepArgs,

        #[arg(long, value_enum, default_value = "table")]
        format: PreviewFormat,
    },

    /// Prepare a file like `preview` and upload the processed rows
    #[command(after_help = "\
Examples:
  dshelf upload solar.xlsx --name 'Solar Power' --tags energy,solar \\
      --source PLN --description 'Hourly output' --skip-rows 1")]
    Upload {
        file: PathBuf,

        #[command(flatten)]
        prep: PrepArgs,

        #[arg(long)]
        name: String,

        /// Comma-separated labels
        #[arg(long, default_value = "")]
        tags: String,

        #[arg(long, default_value = "")]
        source: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Defaults to `upload.defaultLicense` from settings
        #[arg(long)]
        license: Option<String>,

        /// Defaults to `upload.defaultVisibility` from settings
        #[arg(long)]
        visibility: Option<Visibility>,
    },

    /// Change a dataset's description, tags or visibility
    EditMetadata {
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Comma-separated labels (replaces the current set)
        #[arg(long)]
        tags: Option<String>,

        #[arg(long)]
        visibility: Option<Visibility>,
    },

    /// Delete a dataset
    Delete {
        name: String,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Download a dataset's file
    Download {
        name: String,

        /// Output path ('-' for stdout). Defaults to <collection>.csv
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

/// Options shared by `preview` and `upload`.
#[derive(Args, Debug, Clone, Default)]
pub struct PrepArgs {
    /// Sheet index for spreadsheet files (0-based)
    #[arg(long)]
    pub sheet: Option<usize>,

    /// Rows to drop from the top (titles, notes above the header)
    #[arg(long, default_value_t = 0)]
    pub skip_rows: usize,

    /// Rows to drop from the bottom (totals, footnotes)
    #[arg(long, default_value_t = 0)]
    pub skip_footer: usize,

    /// Grid edit, applied in order before the window. Repeatable.
    /// set:ROW:COL:VALUE | add-row | del-row:ROW | add-col | del-col:COL
    #[arg(long = "edit", value_name = "OP")]
    pub edits: Vec<EditOp>,

    /// Honour quoted CSV fields instead of splitting on every comma
    #[arg(long)]
    pub quoted: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PreviewFormat {
    Table,
    Csv,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let api_base = cli.api_base;
    let result = match cli.command {
        Commands::Login { username, password } => commands::cmd_login(api_base, username, password),
        Commands::Logout => commands::cmd_logout(),
        Commands::List { public, json } => commands::cmd_list(api_base, public, json),
        Commands::Show { name, json } => commands::cmd_show(api_base, name, json),
        Commands::Preview { file, prep, format } => commands::cmd_preview(file, prep, format),
        Commands::Upload {
            file,
            prep,
            name,
            tags,
            source,
            description,
            license,
            visibility,
        } => commands::cmd_upload(
            api_base,
            file,
            prep,
            commands::UploadFields { name, tags, source, description, license, visibility },
        ),
        Commands::EditMetadata { name, description, tags, visibility } => {
            commands::cmd_edit_metadata(api_base, name, description, tags, visibility)
        }
        Commands::Delete { name, yes } => commands::cmd_delete(api_base, name, yes),
        Commands::Download { name, output } => commands::cmd_download(api_base, name, output),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(exit_codes::EXIT_ERROR, msg)
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(exit_codes::EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
