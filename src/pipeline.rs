//! File-level driver: read, parse, build, synthesize.
//!
//! Each header is processed independently. A batch fans out over a rayon
//! pool where every worker owns its own tree-sitter parser, and every file
//! gets its own result so one failure never touches its siblings.

use crate::config::Settings;
use crate::error::{HeaderError, HeaderResult};
use crate::io::read_header_source;
use crate::model::HeaderModel;
use crate::parsing::HeaderParser;
use crate::synthesis::{CodeSynthesizer, HeaderFields};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of processing one header file
#[derive(Debug)]
pub struct ProcessedHeader {
    pub path: PathBuf,
    pub result: HeaderResult<HeaderFields>,
    pub elapsed: Duration,
}

impl ProcessedHeader {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`
pub fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Name used for a file in diagnostics
pub fn display_name(path: &Path) -> String {
    path.display().to_string()
}

/// Model an in-memory header and derive its fields
pub fn process_source(
    parser: &mut HeaderParser,
    code: &str,
    file_name: &str,
) -> HeaderResult<HeaderFields> {
    let model = parser.parse(code, file_name)?;
    let fields = CodeSynthesizer::new(&model)?.fields();
    Ok(fields)
}

/// Read and model one header file
pub fn model_file(parser: &mut HeaderParser, path: &Path) -> HeaderResult<HeaderModel> {
    let code = read_header_source(path)?;
    parser.parse(&code, &display_name(path))
}

/// Read one header file and derive its fields
pub fn process_file(parser: &mut HeaderParser, path: &Path) -> HeaderResult<HeaderFields> {
    let code = read_header_source(path)?;
    process_source(parser, &code, &display_name(path))
}

fn has_header_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

/// Expand the requested paths into header files.
///
/// Files named explicitly are always kept. Directories are walked
/// recursively in file-name order and filtered by extension.
pub fn collect_header_paths(paths: &[PathBuf], extensions: &[String]) -> Vec<PathBuf> {
    let mut headers = Vec::new();

    for path in paths {
        if !path.is_dir() {
            headers.push(path.clone());
            continue;
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable entry under {}: {e}", path.display());
                    continue;
                }
            };
            if entry.file_type().is_file() && has_header_extension(entry.path(), extensions) {
                headers.push(entry.into_path());
            }
        }
    }

    debug!("collected {} header files", headers.len());
    headers
}

/// Process every header under `paths` in parallel.
///
/// Results come back in input order. The only batch-level error is failing
/// to build the thread pool.
pub fn process_paths(paths: &[PathBuf], settings: &Settings) -> HeaderResult<Vec<ProcessedHeader>> {
    let files = collect_header_paths(paths, &settings.header_extensions);
    let threads = settings.parallel_threads.max(1);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|index| format!("headergen-worker-{index}"))
        .build()
        .map_err(|e| HeaderError::General(format!("Failed to build thread pool: {e}")))?;

    info!("processing {} headers on {threads} threads", files.len());
    let started = Instant::now();

    let results: Vec<ProcessedHeader> = pool.install(|| {
        files
            .par_iter()
            .map_init(HeaderParser::new, |parser, path| {
                let file_started = Instant::now();
                let result = match parser {
                    Ok(parser) => process_file(parser, path),
                    Err(e) => Err(HeaderError::Parse(e.clone())),
                };
                if let Err(e) = &result {
                    warn!("{}: {e}", path.display());
                }
                ProcessedHeader {
                    path: path.clone(),
                    result,
                    elapsed: file_started.elapsed(),
                }
            })
            .collect()
    });

    let failed = results.iter().filter(|processed| !processed.is_ok()).count();
    info!(
        "processed {} headers in {:?}, {failed} failed",
        results.len(),
        started.elapsed()
    );
    Ok(results)
}
