//! CLI utility that submits handwriting images to the analysis service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use scry::acquisition::ImageUpload;
use scry::analysis::api::{self, ANALYZE_FAILURE_MESSAGE, OCR_FAILURE_MESSAGE, ServiceEndpoint};
use scry::canvas::CanvasRaster;
use scry::config::{self, AppSettings};
use scry::logging::{self, LogTarget};
use scry::session::{AnalysisResult, captured_now};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init(LogTarget::Cli) {
        eprintln!("Logging disabled: {err}");
    }
    let mut settings = config::load_or_default().map_err(|err| err.to_string())?;
    if let Some(url) = &options.url {
        settings.service.base_url = url.clone();
    }
    let endpoint = settings.endpoint().map_err(|err| err.to_string())?;

    let mut failures = 0usize;
    for path in &options.images {
        let outcome = if options.ocr {
            recognize(&endpoint, path)
        } else {
            analyze(&endpoint, &settings, path)
        };
        match outcome {
            Ok(report) => println!("{report}"),
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err}", path.display());
            }
        }
    }
    if failures > 0 {
        return Err(format!(
            "{failures} of {} submission(s) failed.",
            options.images.len()
        ));
    }
    Ok(())
}

fn analyze(endpoint: &ServiceEndpoint, settings: &AppSettings, path: &Path) -> Result<String, String> {
    let upload = ImageUpload::from_path(path).map_err(|err| err.to_string())?;
    let decoded = upload.decode().map_err(|err| err.to_string())?;
    let mut raster = CanvasRaster::new(settings.canvas.width, settings.canvas.height);
    raster.draw_scaled(&decoded);
    let png = raster.encode_png().map_err(|err| err.to_string())?;
    let response = api::analyze(endpoint, &png)
        .map_err(|err| err.user_message(ANALYZE_FAILURE_MESSAGE))?;
    let result = AnalysisResult::from_response(response, Arc::from(png), captured_now());
    Ok(format_analysis(path, &result))
}

fn recognize(endpoint: &ServiceEndpoint, path: &Path) -> Result<String, String> {
    let upload = ImageUpload::from_path(path).map_err(|err| err.to_string())?;
    let text = api::recognize_text(endpoint, &upload)
        .map_err(|err| err.user_message(OCR_FAILURE_MESSAGE))?;
    Ok(format!("{}:\n{text}", path.display()))
}

fn format_analysis(path: &Path, result: &AnalysisResult) -> String {
    let mut lines = vec![
        format!("{}: {}", path.display(), result.summary()),
        format!("  {}", result.description),
        format!("  Notes: {}", result.note),
    ];
    if let Some(url) = &result.image_url {
        lines.push(format!("  Image: {url}"));
    }
    lines.join("\n")
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    images: Vec<PathBuf>,
    url: Option<String>,
    ocr: bool,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--url" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--url requires a value".to_string())?;
                options.url = Some(value.to_string());
            }
            "--ocr" => {
                options.ocr = true;
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown argument: {flag}\n\n{}", help_text()));
            }
            path => options.images.push(PathBuf::from(path)),
        }
        idx += 1;
    }
    if options.images.is_empty() {
        return Err(format!("At least one image is required\n\n{}", help_text()));
    }
    Ok(Some(options))
}

fn help_text() -> String {
    [
        "scry-analyze",
        "",
        "Submits handwriting images to the analysis service and prints the result.",
        "",
        "Usage:",
        "  scry-analyze [--url <base>] <image>...",
        "  scry-analyze --ocr [--url <base>] <image>...",
        "",
        "Options:",
        "  --ocr           Recognize the written text instead of the personality.",
        "  --url <base>    Service base URL; overrides SCRY_SERVICE_URL and config.toml.",
    ]
    .join("\n")
}
