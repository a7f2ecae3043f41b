//! FunPDBe deposition client CLI
//!
//! Command-line interface for validating, depositing, retrieving and deleting
//! FunPDBe entries.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, ValueEnum};
use tracing::{error, info};

use funpdbe_client::logging::init_file_logging;
use funpdbe_client::{
    has_document_suffix, run_batch, validate_batch, ApiTarget, Client, HttpConfig,
    PreconditionError, PromptCredentials, SchemaCache, SchemaUnavailable, SubmitError,
    LOG_FILENAME, SCHEMA_URL,
};

#[derive(Parser)]
#[command(name = "funpdbe-client")]
#[command(about = "Validate, deposit, view and delete FunPDBe entries")]
#[command(version)]
struct Cli {
    /// Running mode
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// FunPDBe user name (asked for if needed and not given)
    #[arg(short, long)]
    user: Option<String>,

    /// FunPDBe password (asked for if needed and not given)
    #[arg(short, long)]
    pwd: Option<String>,

    /// PDB id of an entry
    #[arg(short = 'i', long = "pdb-id", visible_alias = "pdb_id")]
    pdb_id: Option<String>,

    /// Name of a resource
    #[arg(short, long)]
    resource: Option<String>,

    /// Path to a JSON file (.json ending), or to a directory of JSON files
    #[arg(short = 'f', long)]
    path: Option<PathBuf>,

    /// Overwrite existing entries
    #[arg(short, long)]
    overwrite: bool,

    /// API to be used
    #[arg(short, long, value_enum, default_value_t = ApiTarget::Prod)]
    api: ApiTarget,

    /// Base URL of the deposition API (overrides --api)
    #[arg(long)]
    api_url: Option<String>,

    /// Schema source: file path or URL (http:// or https://)
    #[arg(long, default_value = SCHEMA_URL)]
    schema: String,

    /// Log file, overwritten on every run
    #[arg(long, default_value = LOG_FILENAME)]
    log_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Output validation results as JSON (for automation)
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Get,
    Post,
    Delete,
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(mode) = cli.mode else {
        let _ = Cli::command().print_help();
        println!();
        return ExitCode::SUCCESS;
    };

    if let Err(e) = init_file_logging(&cli.log_file, cli.debug) {
        eprintln!(
            "Error: cannot open log file {}: {}",
            cli.log_file.display(),
            e
        );
        return ExitCode::from(3);
    }
    info!(?mode, "funpdbe-client started");

    let result = build_client(&cli).and_then(|mut client| match mode {
        Mode::Get => run_get(&mut client, &cli),
        Mode::Post => run_post(&mut client, &cli),
        Mode::Delete => run_delete(&mut client, &cli),
        Mode::Validate => run_validate(&mut client, &cli),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => {
            eprintln!("FAILED - details log saved in {}", cli.log_file.display());
            ExitCode::from(code)
        }
    }
}

fn build_client(cli: &Cli) -> Result<Client, u8> {
    let config = HttpConfig::default();

    let schema = SchemaCache::for_location(&cli.schema, &config)
        .map_err(|e| report(&SubmitError::from(SchemaUnavailable::from(e))))?;
    let credentials = PromptCredentials::stdin(cli.user.clone(), cli.pwd.clone());

    let client = Client::http(Box::new(credentials), schema, &config)
        .map_err(|e| report(&SubmitError::from(e)))?;

    Ok(match &cli.api_url {
        Some(url) => client.with_api_url(url.as_str()),
        None => client.with_api_target(cli.api),
    })
}

/// Print an error and return its exit code.
fn report(err: &SubmitError) -> u8 {
    eprintln!("Error: {}", err);
    err.exit_code() as u8
}

fn required_path(cli: &Cli) -> Result<&Path, u8> {
    cli.path.as_deref().ok_or_else(|| {
        error!("no path to JSON file(s) provided");
        report(&SubmitError::from(PreconditionError::MissingPath))
    })
}

fn run_get(client: &mut Client, cli: &Cli) -> Result<(), u8> {
    let Some(resource) = cli.resource.as_deref() else {
        error!("no PDB identifier or resource name");
        eprintln!("Please provide --resource and optionally --pdb-id");
        return Err(2);
    };

    let response = match cli.pdb_id.as_deref() {
        Some(pdb_id) => client.get_one(Some(pdb_id), Some(resource)),
        None => client.get_all(Some(resource)),
    }
    .map_err(|e| report(&e))?;

    println!("{}", response.body);
    Ok(())
}

fn run_post(client: &mut Client, cli: &Cli) -> Result<(), u8> {
    let path = required_path(cli)?;
    let resource = cli.resource.as_deref();

    if has_document_suffix(path) {
        let response = client
            .post_file(Some(path), resource, cli.overwrite)
            .map_err(|e| report(&e))?;
        println!("[{}] SUCCESS", response.status);
    } else {
        let tally = run_batch(client, path, resource, cli.overwrite);
        println!(
            "Batch POSTing: {} out of {} POSTed successfully",
            tally.succeeded, tally.attempted
        );
    }
    Ok(())
}

fn run_delete(client: &mut Client, cli: &Cli) -> Result<(), u8> {
    let pdb_id = cli.pdb_id.as_deref();
    let resource = cli.resource.as_deref();
    println!(
        "DELETE entry {} from {}",
        pdb_id.unwrap_or("<none>"),
        resource.unwrap_or("<none>")
    );

    let response = client
        .delete_one(pdb_id, resource)
        .map_err(|e| report(&e))?;
    println!("[{}] SUCCESS", response.status);
    Ok(())
}

fn run_validate(client: &mut Client, cli: &Cli) -> Result<(), u8> {
    let path = required_path(cli)?;

    if !has_document_suffix(path) {
        let tally = validate_batch(client, path);
        if cli.json {
            let output = serde_json::json!({
                "valid": tally.all_succeeded(),
                "tally": tally
            });
            println!("{}", output);
        } else {
            println!("Batch validation: {} valid", tally);
        }
        return if tally.all_succeeded() { Ok(()) } else { Err(1) };
    }

    if !cli.json {
        println!("Parsing and validating {}", path.display());
    }
    match client.validate_file(Some(path)) {
        Ok(()) => {
            if cli.json {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(SubmitError::SchemaViolation { errors }) => {
            if cli.json {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(e) => {
            report_error(cli.json, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
