//! arapm CLI - command line interface for the Aragon release tools

use std::fs;
use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use semver::Version;

use arapm_artifact::{
    app_id, generate_artifact_from_source, parse_app_name, read_app_descriptor, read_manifest,
    validate_artifacts, write_artifacts, AbiEntry,
};
use arapm_extract::{parse_contract_functions, ExtractError, ExtractOptions};
use arapm_publish::parse_bump_or_version;

#[derive(Parser)]
#[command(name = "arapm")]
#[command(about = "Aragon app release tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract auth-protected functions from a contract as JSON
    Extract {
        /// Solidity source file
        file: PathBuf,
        /// Target contract name (defaults to the file name)
        #[arg(short, long)]
        contract: Option<String>,
        /// Skip base contracts of the target
        #[arg(long)]
        only_target: bool,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Assemble artifact.json from flattened source, an ABI and arapp.json
    Artifact {
        /// Flattened Solidity source file
        file: PathBuf,
        /// Compiled interface JSON file
        #[arg(short, long)]
        abi: PathBuf,
        /// Project directory holding arapp.json and manifest.json
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// Environment to resolve the app name against
        #[arg(short, long)]
        network: Option<String>,
        /// Write the release files here instead of printing the artifact
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that a release directory holds every required file
    Validate {
        /// Release directory
        dist: PathBuf,
        /// Also require index.html
        #[arg(long)]
        has_frontend: bool,
    },
    /// Print the ENS app id of an app name
    AppId {
        /// App name, with or without registry suffix
        name: String,
    },
    /// Resolve a version bump against a previous version
    Version {
        /// major, minor, patch or an explicit semver version
        bump: String,
        /// Previously published version
        #[arg(short, long)]
        prev: Option<Version>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            file,
            contract,
            only_target,
            pretty,
        } => cmd_extract(&file, contract, only_target, pretty),
        Commands::Artifact {
            file,
            abi,
            dir,
            network,
            output,
        } => cmd_artifact(&file, &abi, &dir, network, output),
        Commands::Validate { dist, has_frontend } => cmd_validate(&dist, has_frontend),
        Commands::AppId { name } => println!("{}", app_id(&name)),
        Commands::Version { bump, prev } => cmd_version(&bump, prev),
    }
}

fn cmd_extract(file: &PathBuf, contract: Option<String>, only_target: bool, pretty: bool) {
    let source = read_source(file);
    let target = contract.unwrap_or_else(|| file.to_string_lossy().to_string());
    let options = ExtractOptions {
        only_target_contract: only_target,
    };

    match parse_contract_functions(&source, &target, options) {
        Ok(functions) => {
            let json = if pretty {
                serde_json::to_string_pretty(&functions).unwrap()
            } else {
                serde_json::to_string(&functions).unwrap()
            };
            println!("{}", json);
        }
        Err(ExtractError::Parse(e)) => {
            report_parse_error(&source, file, &e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_artifact(
    file: &PathBuf,
    abi_file: &PathBuf,
    dir: &PathBuf,
    network: Option<String>,
    output: Option<PathBuf>,
) {
    let source = read_source(file);
    let abi: Vec<AbiEntry> = match fs::read_to_string(abi_file)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(abi) => abi,
        Err(e) => {
            eprintln!("Error reading ABI {}: {}", abi_file.display(), e);
            std::process::exit(1);
        }
    };

    let result = (|| {
        let descriptor = read_app_descriptor(dir)?;
        let app_name = parse_app_name(&descriptor, network.as_deref())?;
        let contract = descriptor
            .extra
            .get("path")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| file.to_string_lossy().to_string());
        let artifact =
            generate_artifact_from_source(&app_name, &abi, &source, &contract, &descriptor)?;
        if let Some(out) = &output {
            let manifest = read_manifest(dir)?;
            write_artifacts(out, &artifact, &manifest, &source)?;
            println!("Release files written to {}", out.display());
        } else {
            println!("{}", serde_json::to_string_pretty(&artifact).unwrap());
        }
        Ok::<(), arapm_artifact::ArtifactError>(())
    })();

    if let Err(e) = result {
        if let arapm_artifact::ArtifactError::Extract(ExtractError::Parse(parse_err)) = &e {
            report_parse_error(&source, file, parse_err);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn cmd_validate(dist: &PathBuf, has_frontend: bool) {
    match validate_artifacts(dist, has_frontend) {
        Ok(()) => println!("✓ {} - complete release", dist.display()),
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_version(bump: &str, prev: Option<Version>) {
    match parse_bump_or_version(bump, prev.as_ref()) {
        Ok((version, bump)) => println!("{} ({})", version, bump),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn read_source(file: &PathBuf) -> String {
    match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    }
}

fn report_parse_error(source: &str, file: &PathBuf, error: &arapm_parser::ParseError) {
    let span = error.span();
    Report::build(ReportKind::Error, file.to_string_lossy().to_string(), span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((file.to_string_lossy().to_string(), span.start..span.end))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((file.to_string_lossy().to_string(), Source::from(source)))
        .unwrap();
}
