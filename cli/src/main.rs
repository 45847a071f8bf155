//! proto2pojo - generates mapper-annotated Java POJOs from .proto schemas.
//!
//! ```bash
//! proto2pojo --package-out com.example.generated \
//!     --proto-files schemas/ extra/order.proto \
//!     --add-java-imports com.example.common.Money \
//!     --out-dir src/main/java
//! ```
//!
//! Each input file is parsed and regenerated in full; a file that fails to
//! parse is logged and skipped, and the remaining inputs are still
//! processed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info};
use walkdir::WalkDir;

use pojo_generator::{FileSink, GenerateError, SchemaGenerator};
use proto_parser::parse_proto_file;

#[derive(Parser)]
#[command(
    name = "proto2pojo",
    version,
    about = "Generate mapper-annotated Java POJOs from .proto files",
    long_about = None
)]
struct Cli {
    /// Input .proto files or directories (searched recursively)
    #[arg(long = "proto-files", required = true, num_args = 1..)]
    proto_files: Vec<PathBuf>,

    /// Java package of the generated classes; also decides the output layout
    #[arg(long = "package-out")]
    package_out: String,

    /// Extra import symbols appended to every generated class
    #[arg(long = "add-java-imports", num_args = 1..)]
    add_java_imports: Vec<String>,

    /// Directory the package tree is created under
    #[arg(long = "out-dir", default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let target_dir = package_dir(&cli.out_dir, &cli.package_out);
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("unable to create {}", target_dir.display()))?;

    let generator = SchemaGenerator::new(cli.package_out.clone());
    let mut sink = FileSink::new(&target_dir);

    let mut failures = 0usize;
    for root in &cli.proto_files {
        let proto_files = collect_proto_files(root)
            .with_context(|| format!("unable to list {}", root.display()))?;
        if proto_files.is_empty() {
            info!(path = %root.display(), "no .proto files found");
        }
        for path in proto_files {
            info!(file = %path.display(), "processing");
            let parsed = match parse_proto_file(&path) {
                Ok(file) => file,
                Err(err) => {
                    error!(file = %path.display(), %err, "skipping unparsable file");
                    failures += 1;
                    continue;
                }
            };
            match generator.generate_into(&parsed, &cli.add_java_imports, &mut sink) {
                Ok(written) => info!(file = %path.display(), written, "generated"),
                Err(GenerateError::Sink(failed)) => {
                    for failure in &failed {
                        error!(class = %failure.name, err = %failure.source, "write failed");
                    }
                    failures += failed.len();
                }
            }
        }
    }

    if failures > 0 {
        bail!("{failures} inputs or writes failed");
    }
    Ok(())
}

/// `com.example.generated` under `root` becomes `root/com/example/generated`.
fn package_dir(root: &Path, package: &str) -> PathBuf {
    package
        .split('.')
        .fold(root.to_path_buf(), |dir, part| dir.join(part))
}

/// Explicit file paths are taken as-is; directories are searched
/// recursively for `*.proto`.
fn collect_proto_files(root: &Path) -> walkdir::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "proto")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
