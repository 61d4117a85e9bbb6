use clap::{Parser, Subcommand, ValueEnum};
use filelens_forensics::analysis::input::MetadataInput;
use filelens_forensics::discovery::{BatchSummary, find_supported_files};
use filelens_forensics::report::{self, ExportFormat, Report};
use filelens_forensics::{
    ExtractError, ExtractOptions, MetadataAnalyzer, ReportError, RiskLevel, SanitizeError,
    extract_metadata, sanitize_directory, sanitize_file,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MIB: u64 = 1024 * 1024;

#[derive(Parser, Debug)]
#[command(
    name = "filelens-forensics",
    version,
    about = "Analisis forense y de privacidad de la metadata de archivos"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extrae y analiza la metadata de un archivo.
    Analyze {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long, help = "No calcular MD5 ni SHA-256")]
        no_hash: bool,
        #[arg(long, default_value_t = 32, help = "Tamano maximo en MiB para calcular hashes")]
        hash_limit_mib: u64,
    },
    /// Analiza un documento JSON con metadata ya extraida.
    AnalyzeJson {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Analiza todos los archivos soportados de un directorio.
    Scan {
        dir: PathBuf,
        #[arg(long, short)]
        recursive: bool,
        #[arg(long, short, help = "Guardar los reportes como arreglo JSON")]
        output: Option<PathBuf>,
        #[arg(long, help = "Exportar a KML las coordenadas GPS encontradas")]
        kml: Option<PathBuf>,
    },
    /// Genera copias sin metadata de un archivo o de un directorio.
    Sanitize {
        path: PathBuf,
        #[arg(
            long,
            short,
            help = "Archivo destino; si PATH es un directorio, directorio destino"
        )]
        output: Option<PathBuf>,
        #[arg(long, short)]
        recursive: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    #[arg(long, short, value_enum, default_value_t = FormatArg::Txt)]
    pub format: FormatArg,
    #[arg(long, short, help = "Ruta del reporte; sin ella se imprime en pantalla")]
    pub output: Option<PathBuf>,
    #[arg(long, help = "Exportar a KML las coordenadas GPS encontradas")]
    pub kml: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Txt,
    Json,
    Csv,
    Xlsx,
    Summary,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Txt => ExportFormat::Txt,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Summary => ExportFormat::Summary,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    #[error("no se pudo leer `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` no contiene JSON valido: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no se encontraron archivos soportados en `{}`", .0.display())]
    NothingToScan(PathBuf),
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Analyze {
            file,
            output,
            no_hash,
            hash_limit_mib,
        } => {
            let options = ExtractOptions {
                include_hash: !no_hash,
                hash_size_limit: hash_limit_mib.saturating_mul(MIB),
            };
            let metadata = extract_metadata(&file, &options)?;
            emit(analyzed_report(metadata), &output)
        }
        Commands::AnalyzeJson { file, output } => {
            let raw = fs::read_to_string(&file).map_err(|source| CliError::Read {
                path: file.clone(),
                source,
            })?;
            let metadata = MetadataInput::from_json(&raw).map_err(|source| CliError::InvalidJson {
                path: file.clone(),
                source,
            })?;
            emit(analyzed_report(metadata), &output)
        }
        Commands::Scan {
            dir,
            recursive,
            output,
            kml,
        } => scan(&dir, recursive, output.as_deref(), kml.as_deref()),
        Commands::Sanitize {
            path,
            output,
            recursive,
        } => sanitize(&path, output.as_deref(), recursive),
    }
}

fn analyzed_report(metadata: MetadataInput) -> Report {
    let analysis = MetadataAnalyzer::new(&metadata).analyze();
    Report::new(metadata, Some(analysis))
}

fn emit(report: Report, args: &OutputArgs) -> Result<(), CliError> {
    let format = ExportFormat::from(args.format);
    match &args.output {
        Some(target) => {
            let path = report.output_path(target, format);
            report::export_report(&report, format, &path)?;
            println!("Reporte {} guardado en {}", format.label(), path.display());
        }
        None => println!("{}", report::render(&report, format)?),
    }
    if let Some(path) = &args.kml {
        write_kml(std::slice::from_ref(&report), path)?;
    }
    Ok(())
}

fn write_kml(reports: &[Report], path: &Path) -> Result<(), CliError> {
    match report::export_kml(reports, path)? {
        0 => println!("Sin coordenadas GPS; no se genero {}", path.display()),
        count => println!("KML con {count} ubicaciones guardado en {}", path.display()),
    }
    Ok(())
}

fn scan(
    dir: &Path,
    recursive: bool,
    output: Option<&Path>,
    kml: Option<&Path>,
) -> Result<(), CliError> {
    let files = find_supported_files(dir, recursive)?;
    if files.is_empty() {
        return Err(CliError::NothingToScan(dir.to_path_buf()));
    }

    let options = ExtractOptions::default();
    let mut summary = BatchSummary::default();
    let mut reports = Vec::new();

    for path in &files {
        match extract_metadata(path, &options) {
            Ok(metadata) => {
                let report = analyzed_report(metadata);
                if let Some(analysis) = &report.analysis {
                    summary.record(analysis);
                    println!("{:<8} {}", analysis.risk_level.as_str(), path.display());
                }
                reports.push(report);
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "archivo omitido");
                summary.record_failure();
                println!("{:<8} {}: {error}", "ERROR", path.display());
            }
        }
    }

    let counts = RiskLevel::ALL
        .iter()
        .map(|level| format!("{level}={}", summary.count(*level)))
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "Archivos: {} analizados, {} con error ({counts})",
        summary.analyzed(),
        summary.failed
    );

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&reports).map_err(ReportError::from)?;
        fs::write(path, json).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        println!("Reporte JSON guardado en {}", path.display());
    }
    if let Some(path) = kml {
        write_kml(&reports, path)?;
    }

    Ok(())
}

fn sanitize(path: &Path, output: Option<&Path>, recursive: bool) -> Result<(), CliError> {
    if path.is_dir() {
        let summary = sanitize_directory(path, output, recursive)?;
        println!(
            "Archivos: {} encontrados, {} limpiados, {} con error, {} omitidos",
            summary.total, summary.success, summary.failed, summary.skipped
        );
        return Ok(());
    }

    let outcome = sanitize_file(path, output)?;
    if outcome.modified {
        println!("Metadata eliminada: {}", outcome.output.display());
    } else {
        println!("Sin metadata que eliminar; copia en {}", outcome.output.display());
    }
    println!("{}", outcome.report());
    Ok(())
}
