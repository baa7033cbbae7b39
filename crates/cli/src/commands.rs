// Subcommand implementations

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};

use datashelf_client::{
    collection_name, delete_auth, load_auth, save_auth, submit, ClientError, Credentials,
    DatasetClient, Metadata, MetadataUpdate, UploadError, Visibility,
};
use datashelf_config::Settings;
use datashelf_engine::{EditError, EditSession, PreviewRow, SourceKind};
use datashelf_io::csv::{self, CsvMode};
use datashelf_io::rows::{to_json, to_row_objects};
use datashelf_io::{load_path, ParseError, ParseOptions};

use crate::exit_codes::{
    client_exit_code, edit_exit_code, upload_exit_code, EXIT_ERROR, EXIT_PARSE, EXIT_USAGE,
};
use crate::{CliError, PrepArgs, PreviewFormat};

// ── Error mapping ───────────────────────────────────────────────────

fn client_error(e: ClientError) -> CliError {
    let code = client_exit_code(&e);
    let err = CliError::new(code, e.to_string());
    match e {
        ClientError::NotAuthenticated => err.with_hint("run `dshelf login` first"),
        ClientError::Unauthorized(_) => err.with_hint("check your username and password with `dshelf login`"),
        ClientError::Network(_) => err.with_hint("check --api-base or DATASHELF_API_BASE_URL"),
        _ => err,
    }
}

fn parse_error(e: ParseError) -> CliError {
    CliError::new(EXIT_PARSE, e.to_string())
}

fn edit_error(e: EditError, session: &EditSession) -> CliError {
    let err = CliError::new(edit_exit_code(&e), e.to_string());
    match e {
        EditError::InvalidSheetIndex { .. } => {
            let names = session.sheet_names();
            if names.is_empty() {
                err.with_hint("CSV files have a single sheet; drop --sheet")
            } else {
                let listed: Vec<String> = names
                    .iter()
                    .enumerate()
                    .map(|(i, n)| format!("{}={}", i, n))
                    .collect();
                err.with_hint(format!("available sheets: {}", listed.join(", ")))
            }
        }
        _ => err,
    }
}

fn upload_error(e: UploadError) -> CliError {
    match e {
        UploadError::Transport(inner) => client_error(inner),
        other => CliError::new(upload_exit_code(&other), other.to_string()),
    }
}

// ── Shared setup ────────────────────────────────────────────────────

fn client(api_base: Option<String>, settings: &Settings) -> Result<DatasetClient, CliError> {
    let client = match api_base {
        Some(base) => DatasetClient::new(&base, Duration::from_secs(settings.timeout_secs)),
        None => DatasetClient::from_settings(settings),
    }
    .map_err(client_error)?;
    debug!("Using catalog at {}", client.api_base());
    Ok(client)
}

fn require_auth() -> Result<Credentials, CliError> {
    load_auth().ok_or_else(|| client_error(ClientError::NotAuthenticated))
}

/// Load `file` into a fresh session, then select the sheet, apply edits in
/// order and set the window.
fn prepare_session(file: &Path, prep: &PrepArgs) -> Result<EditSession, CliError> {
    let options = ParseOptions {
        csv_mode: if prep.quoted { CsvMode::Quoted } else { CsvMode::Split },
    };

    let mut session = EditSession::new();
    let ticket = session.begin_load();
    session
        .finish_load(ticket, load_path(file, &options))
        .map_err(parse_error)?;

    if let Some(index) = prep.sheet {
        session.select_sheet(index).map_err(|e| edit_error(e, &session))?;
    }

    for op in &prep.edits {
        let applied = op.apply(&mut session).map_err(|e| {
            edit_error(e, &session).with_hint(format!("while applying --edit {}", op))
        })?;
        if !applied {
            eprintln!("note: {} skipped, the grid keeps at least one row and one column", op);
        }
    }

    session.set_skip_rows(prep.skip_rows);
    session.set_skip_footer(prep.skip_footer);
    Ok(session)
}

fn describe(session: &EditSession) {
    let Some(grid) = session.grid() else {
        return;
    };
    if session.workbook().map(|w| w.kind()) == Some(SourceKind::Spreadsheet) {
        let count = session.sheet_names().len();
        let index = session.active_sheet_index().unwrap_or(0);
        eprintln!(
            "sheet {}/{}: {}",
            index + 1,
            count,
            session.active_sheet_name().unwrap_or_default()
        );
    }
    let window = session.window();
    eprintln!(
        "{} of {} rows kept (skip {} top, {} bottom), {} columns",
        session.processed().len(),
        grid.row_count(),
        window.skip_rows,
        window.skip_footer,
        grid.width()
    );
}

/// Column names come from the first kept row; say which one that is.
fn header_note(session: &EditSession) {
    if !session.processed().is_empty() {
        let first = session.window().range(session.grid().map_or(0, |g| g.row_count())).start;
        eprintln!("note: row {} is used as the header (adjust with --skip-rows)", first);
    }
}

// ── login / logout ──────────────────────────────────────────────────

fn read_line(label: &str) -> Result<String, CliError> {
    eprint!("{}: ", label);
    io::stderr().flush().ok();
    let mut buf = String::new();
    io::stdin()
        .lock()
        .read_line(&mut buf)
        .map_err(|e| CliError::io(e.to_string()))?;
    Ok(buf.trim().to_string())
}

fn prompt(label: &str) -> Result<String, CliError> {
    if !atty::is(atty::Stream::Stdin) {
        return Err(CliError::usage(format!("No {} provided and stdin is not a TTY", label.to_lowercase()))
            .with_hint("pass --username and --password (or set DATASHELF_PASSWORD)"));
    }
    let value = read_line(label)?;
    if value.is_empty() {
        return Err(CliError::usage(format!("No {} provided", label.to_lowercase())));
    }
    Ok(value)
}

pub fn cmd_login(
    api_base: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> Result<(), CliError> {
    let settings = Settings::load();
    let username = match username {
        Some(u) => u,
        None => prompt("Username")?,
    };
    let password = match password {
        Some(p) => p,
        None => prompt("Password")?,
    };

    let creds = client(api_base, &settings)?
        .login(&username, &password)
        .map_err(client_error)?;

    save_auth(&creds).map_err(|e| CliError::new(EXIT_ERROR, e))?;

    match creds.role.as_deref() {
        Some(role) => eprintln!("Signed in as {} ({})", creds.username, role),
        None => eprintln!("Signed in as {}", creds.username),
    }
    Ok(())
}

pub fn cmd_logout() -> Result<(), CliError> {
    delete_auth().map_err(|e| CliError::new(EXIT_ERROR, e))?;
    eprintln!("Signed out");
    Ok(())
}

// ── list / show ─────────────────────────────────────────────────────

pub fn cmd_list(api_base: Option<String>, public: bool, json: bool) -> Result<(), CliError> {
    let settings = Settings::load();
    let client = client(api_base, &settings)?;
    let datasets = match (public, load_auth()) {
        (false, Some(creds)) => client.list_datasets(&creds),
        (_, creds) => {
            if creds.is_none() {
                info!("Not signed in, listing public datasets");
            }
            client.public_datasets()
        }
    }
    .map_err(client_error)?;

    if json {
        let out = serde_json::to_string_pretty(&datasets).map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = datasets
        .iter()
        .map(|d| {
            vec![
                d.name.clone(),
                d.visibility.clone().unwrap_or_default(),
                d.tags().join(", "),
            ]
        })
        .collect();
    print_table(&["name", "visibility", "tags"], &rows);
    eprintln!("{} datasets", datasets.len());
    Ok(())
}

pub fn cmd_show(api_base: Option<String>, name: String, json: bool) -> Result<(), CliError> {
    let settings = Settings::load();
    let client = client(api_base, &settings)?;
    let creds = load_auth();

    let meta = client.metadata(&name, creds.as_ref()).map_err(client_error)?;
    let sample = client.sample(&name, creds.as_ref()).map_err(client_error)?;

    if json {
        let out = serde_json::json!({ "metadata": meta, "sample": sample });
        let text = serde_json::to_string_pretty(&out).map_err(|e| CliError::io(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    let field = |label: &str, value: Option<&str>| {
        println!("{:<12} {}", label, value.unwrap_or("-"));
    };
    field("name", meta.name.as_deref().or(Some(name.as_str())));
    field("description", meta.description.as_deref());
    field("tags", Some(meta.tags().join(", ").as_str()));
    field("source", meta.source.as_deref());
    field("license", meta.license.as_deref());
    field("visibility", meta.visibility.as_deref());
    if let Some(size) = meta.size_mb {
        println!("{:<12} {:.2} MB", "size", size);
    }
    if let Some(format) = meta.format.as_deref() {
        field("format", Some(format));
    }

    println!();
    let Some(first) = sample.first() else {
        println!("(no sample rows)");
        return Ok(());
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = sample
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| match obj.get(*h) {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(serde_json::Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                })
                .collect()
        })
        .collect();
    print_table(&headers, &rows);
    Ok(())
}

// ── preview / upload ────────────────────────────────────────────────

pub fn cmd_preview(file: PathBuf, prep: PrepArgs, format: PreviewFormat) -> Result<(), CliError> {
    let settings = Settings::load();
    let session = prepare_session(&file, &prep)?;

    match format {
        PreviewFormat::Table => {
            describe(&session);
            print_preview(&session.preview(settings.preview_edge_rows));
        }
        PreviewFormat::Csv => {
            let text = csv::to_csv(session.processed()).map_err(|e| CliError::io(e.to_string()))?;
            println!("{}", text);
        }
        PreviewFormat::Json => {
            header_note(&session);
            let json = to_json(session.processed()).map_err(|e| CliError::io(e.to_string()))?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Form fields given to `upload`.
pub struct UploadFields {
    pub name: String,
    pub tags: String,
    pub source: String,
    pub description: String,
    pub license: Option<String>,
    pub visibility: Option<Visibility>,
}

pub fn cmd_upload(
    api_base: Option<String>,
    file: PathBuf,
    prep: PrepArgs,
    fields: UploadFields,
) -> Result<(), CliError> {
    if fields.name.trim().is_empty() {
        return Err(CliError::usage("--name must not be empty"));
    }

    let settings = Settings::load();
    let session = prepare_session(&file, &prep)?;
    describe(&session);
    header_note(&session);

    let visibility = match fields.visibility {
        Some(v) => v,
        None => settings.default_visibility.parse().unwrap_or_else(|e| {
            warn!("Ignoring upload.defaultVisibility: {}", e);
            Visibility::default()
        }),
    };
    let metadata = Metadata {
        name: fields.name,
        tags: fields.tags,
        source: fields.source,
        description: fields.description,
        license: fields.license.unwrap_or(settings.default_license.clone()),
        visibility,
    };

    let client = client(api_base, &settings)?;
    let creds = load_auth();
    if creds.is_none() {
        warn!("No saved credentials, uploading anonymously");
    }

    submit(&client, &session, &metadata, creds.as_ref()).map_err(upload_error)?;

    let objects = to_row_objects(session.processed()).len();
    eprintln!(
        "Uploaded '{}' as {} ({} data rows)",
        metadata.name,
        collection_name(&metadata.name),
        objects
    );
    Ok(())
}

// ── edit-metadata / delete / download ───────────────────────────────

pub fn cmd_edit_metadata(
    api_base: Option<String>,
    name: String,
    description: Option<String>,
    tags: Option<String>,
    visibility: Option<Visibility>,
) -> Result<(), CliError> {
    if description.is_none() && tags.is_none() && visibility.is_none() {
        return Err(CliError::usage("nothing to change")
            .with_hint("pass --description, --tags or --visibility"));
    }

    let settings = Settings::load();
    let creds = require_auth()?;
    let client = client(api_base, &settings)?;

    let current = client.metadata(&name, Some(&creds)).map_err(client_error)?;
    let mut update = MetadataUpdate::from_metadata(&current);
    if let Some(d) = description {
        update.description = d;
    }
    if let Some(t) = tags {
        update.tags = t;
    }
    if let Some(v) = visibility {
        update.visibility = v;
    }

    client.update_metadata(&name, &update, &creds).map_err(client_error)?;
    eprintln!("Updated {}", collection_name(&name));
    Ok(())
}

pub fn cmd_delete(api_base: Option<String>, name: String, yes: bool) -> Result<(), CliError> {
    let collection = collection_name(&name);
    if !yes {
        if !atty::is(atty::Stream::Stdin) {
            return Err(CliError::new(EXIT_USAGE, format!("refusing to delete '{}' without confirmation", collection))
                .with_hint("pass --yes"));
        }
        let answer = read_line(&format!("Delete dataset '{}'? [y/N]", collection))?;
        if !answer.eq_ignore_ascii_case("y") && !answer.eq_ignore_ascii_case("yes") {
            eprintln!("Aborted");
            return Ok(());
        }
    }

    let settings = Settings::load();
    let creds = require_auth()?;
    client(api_base, &settings)?
        .delete_dataset(&name, &creds)
        .map_err(client_error)?;
    eprintln!("Deleted {}", collection);
    Ok(())
}

pub fn cmd_download(api_base: Option<String>, name: String, output: Option<PathBuf>) -> Result<(), CliError> {
    let settings = Settings::load();
    let creds = load_auth();
    let bytes = client(api_base, &settings)?
        .download(&name, creds.as_ref())
        .map_err(client_error)?;

    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.csv", collection_name(&name))));
    if output.as_os_str() == "-" {
        io::stdout()
            .write_all(&bytes)
            .map_err(|e| CliError::io(e.to_string()))?;
        return Ok(());
    }

    std::fs::write(&output, &bytes)
        .map_err(|e| CliError::io(format!("Failed to write {}: {}", output.display(), e)))?;
    eprintln!("Saved {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

// ── Output helpers ──────────────────────────────────────────────────

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{}{}", cell, " ".repeat(width.saturating_sub(len)))
}

fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| cells.join("  ").trim_end().to_string();
    println!("{}", line(headers.iter().zip(&widths).map(|(h, w)| pad(h, *w)).collect()));
    for row in rows {
        println!("{}", line(row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect()));
    }
}

fn print_preview(rows: &[PreviewRow<'_>]) {
    let mut widths: Vec<usize> = Vec::new();
    for row in rows {
        if let PreviewRow::Data { cells, .. } = row {
            for (i, cell) in cells.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
    }

    for row in rows {
        match row {
            PreviewRow::Data { index, cells } => {
                let padded: Vec<String> = cells.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
                println!("{:>5}  {}", index, padded.join(" | ").trim_end());
            }
            PreviewRow::Ellipsis { omitted } => {
                println!("{:>5}  ({} rows not shown)", "...", omitted);
            }
        }
    }
}
