//! CLI that sends one PDF through the PDF Services Extract API and saves the
//! resulting `structuredData.json`.
//!
//! Credentials and settings come from the environment; see
//! [`ExtractorConfig::from_env`].

use extractpdfjson::{ExtractPipeline, ExtractorConfig, PdfServicesClient, Result};
use std::path::PathBuf;
use std::{env, process};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("extractpdfjson");

    if args.iter().skip(1).any(|a| a == "-h" || a == "--help") {
        print_usage(program);
        process::exit(0);
    }
    if args.len() > 2 {
        print_usage(program);
        process::exit(2);
    }

    match run(args.get(1).map(PathBuf::from)) {
        Ok(()) => {}
        Err(e) if e.is_service_error() => {
            log::error!("PDF Services error: {e}");
            process::exit(1);
        }
        Err(e) => {
            log::error!("Unexpected error: {e}");
            process::exit(1);
        }
    }
}

fn run(input: Option<PathBuf>) -> Result<()> {
    let mut config = ExtractorConfig::from_env()?;
    if input.is_some() {
        config.input_path = input;
    }

    let client = PdfServicesClient::new(&config)?;
    let outcome = ExtractPipeline::new(client, config).run()?;

    log::info!(
        "Done: {} bytes of structured data in {}",
        outcome.json_bytes,
        outcome.json_path.display()
    );
    Ok(())
}

fn print_usage(program_name: &str) {
    println!("extractpdfjson - PDF Services Extract to structuredData.json");
    println!();
    println!("USAGE:");
    println!("    {} [input_pdf]", program_name);
    println!();
    println!("ARGUMENTS:");
    println!("    [input_pdf]    PDF to extract (default: $EXTRACT_INPUT_PDF)");
    println!();
    println!("ENVIRONMENT:");
    println!("    PDF_SERVICES_CLIENT_ID       Service-principal client id (required)");
    println!("    PDF_SERVICES_CLIENT_SECRET   Service-principal client secret (required)");
    println!("    PDF_SERVICES_BASE_URL        API endpoint (default: https://pdf-services.adobe.io)");
    println!("    EXTRACT_OUTPUT_DIR           Output root (default: output/ExtractPDF)");
    println!("    EXTRACT_ELEMENTS             Comma list of text,tables (default: both)");
    println!("    EXTRACT_POLL_INTERVAL_MS     Job poll interval (default: 2000)");
    println!("    EXTRACT_POLL_TIMEOUT_SECS    Give up after this long (default: 600)");
    println!("    EXTRACT_STRICT_PDF           Fully parse the input before upload (1/true)");
    println!("    RUST_LOG                     Log filter (default: info)");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help     Show this help message");
    println!();
    println!("OUTPUT:");
    println!("    <output>/extract_<timestamp>.zip");
    println!("    <output>/json/structuredData_<timestamp>.json");
}
