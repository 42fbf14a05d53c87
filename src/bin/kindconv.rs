//! kindconv - Versioned kind conversion CLI tool
//!
//! Reads kubeadm configuration documents and converts them between API
//! versions of the built-in sample registry.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use kindconv::codec::{
    join_documents, metadata_annotations, set_metadata_annotations, split_documents,
};
use kindconv::convert::{Converter, Format};
use kindconv::kind::KindSpec;
use kindconv::kubeadm;

#[derive(Debug, Parser)]
#[command(name = "kindconv", version, about = "Versioned kind conversion CLI tool")]
struct Cli {
    /// Output location. Use '-' for stdout
    #[arg(short, long, default_value = "-", global = true)]
    output: String,

    /// Wire format of the output documents. Input is always read as YAML,
    /// which also accepts JSON
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

impl From<OutputFormat> for Format {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => Format::Json,
            OutputFormat::Yaml => Format::Yaml,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the registered groups and versions
    Versions,
    /// Default and validate every document of a file
    Validate { file: PathBuf },
    /// Convert every document of a file to another version
    Convert {
        file: PathBuf,
        /// Target version; the preferred version when omitted
        #[arg(long)]
        to: Option<String>,
        /// Apply defaults and validate before converting
        #[arg(long)]
        default: bool,
        /// Load the round-trip cache from the annotations of this file first
        #[arg(long)]
        cache_in: Option<PathBuf>,
        /// Write the round-trip cache as annotations to this file
        #[arg(long)]
        cache_out: Option<PathBuf>,
    },
    /// Print the API version to use for a Kubernetes version
    ApiVersion {
        component_version: String,
        /// Only consider the preferred version
        #[arg(long)]
        preferred: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cv = converter(cli.format)?;

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    match cli.command {
        Command::Versions => versions(&cv, &mut output)?,
        Command::Validate { file } => validate(&cv, &file, &mut output)?,
        Command::Convert {
            file,
            to,
            default,
            cache_in,
            cache_out,
        } => {
            if let Some(path) = cache_in {
                load_cache(&cv, &path)?;
            }
            convert(&cv, &file, to.as_deref(), default, &mut output)?;
            if let Some(path) = cache_out {
                save_cache(&cv, &path)?;
            }
        }
        Command::ApiVersion {
            component_version,
            preferred,
        } => {
            let v = cv.registry().api_version_for_component_version(
                kubeadm::GROUP,
                &component_version,
                preferred,
            )?;
            writeln!(output, "{}/{}", kubeadm::GROUP, v.name())?;
        }
    }
    output.flush()?;
    Ok(())
}

/// Builds a converter that reads YAML or JSON and writes `format`.
fn converter(format: OutputFormat) -> Result<Converter, Box<dyn std::error::Error>> {
    let registry = Arc::new(kubeadm::registry()?);
    Ok(Converter::builder(registry)
        .marshal_fn(Format::from(format).marshal_fn())
        .build())
}

fn versions(cv: &Converter, output: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    for group in cv.registry().groups() {
        writeln!(output, "{}", group.name())?;
        for (i, v) in group.versions().iter().enumerate() {
            let mut flags = Vec::new();
            if v.is_preferred() {
                flags.push("preferred".to_string());
            }
            if v.is_deprecated() {
                flags.push("deprecated".to_string());
            }
            if group.hub() == Some(i) {
                flags.push("hub".to_string());
            }
            if let Some(tag) = v.added_in_tag() {
                flags.push(format!("added in {}", tag));
            }
            let kinds: Vec<String> = v
                .kinds()
                .iter()
                .map(|k| k.group_version_kind().kind)
                .collect();
            writeln!(output, "  {} [{}]: {}", v.name(), flags.join(", "), kinds.join(", "))?;
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    fs::read(path).map_err(|e| format!("Failed to read {:?}: {}", path, e).into())
}

fn validate(
    cv: &Converter,
    file: &Path,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = read_file(file)?;
    let mut failed = 0;
    for (i, doc) in split_documents(&data)?.iter().enumerate() {
        let result = cv
            .object_from_bytes(doc)
            .and_then(|object| cv.default_and_validate(&mut KindSpec::from(object)));
        if let Err(e) = result {
            writeln!(output, "document {}: {}", i + 1, e)?;
            failed += 1;
        }
    }
    if failed > 0 {
        return Err(format!("{} invalid document(s)", failed).into());
    }
    writeln!(output, "Validation successful")?;
    Ok(())
}

fn convert(
    cv: &Converter,
    file: &Path,
    to: Option<&str>,
    default: bool,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = read_file(file)?;
    let mut out = Vec::new();
    for doc in split_documents(&data)? {
        let mut spec = KindSpec::from(cv.object_from_bytes(&doc)?);
        if default {
            cv.default_and_validate(&mut spec)?;
        }
        let converted = match to {
            Some(version) => cv.convert_to(spec, kubeadm::GROUP, version)?,
            None => cv.convert_to_preferred(spec, kubeadm::GROUP)?,
        };
        debug!(spec = %converted, "converted document");
        out.push(cv.marshal_spec(&converted)?);
    }

    output.write_all(&join_documents(&out))?;
    Ok(())
}

fn load_cache(cv: &Converter, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let object = cv.unmarshal_value(&read_file(path)?)?;
    let annotations = metadata_annotations(&object)?;
    let dropped = cv.annotations_to_cache(&annotations).len();
    debug!(entries = cv.cache_len(), dropped, "loaded cache");
    Ok(())
}

fn save_cache(cv: &Converter, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut object = serde_json::json!({ "metadata": {} });
    set_metadata_annotations(&mut object, &cv.cache_to_annotations()?)?;
    fs::write(path, cv.marshal_value(&object)?)
        .map_err(|e| format!("Failed to write {:?}: {}", path, e))?;
    Ok(())
}
