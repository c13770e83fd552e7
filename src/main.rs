//! docsense: command-line front end for the document-understanding engine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use docsense::assistant::DocumentAssistant;
use docsense::config::Config;
use docsense::document::models::{
    Document, ExtractResponse, ExtractedText, SectionResponse, SurveyResponse, UploadedFile,
};
use docsense::document::{
    classify, extract_from_document, extract_section, extract_text, identify_sections,
    process_upload,
};
use docsense::store::{DocumentStore, MemoryStore};

/// Understand documents: extract text, find sections, answer questions.
#[derive(Parser)]
#[command(name = "docsense", version, about)]
struct Cli {
    /// Emit machine-readable JSON instead of prose
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract page-marked text from a document
    Extract {
        /// PDF or plain-text file
        file: PathBuf,
    },
    /// List the sections a document contains, with previews
    Sections {
        file: PathBuf,
    },
    /// Pull one named section out of a document
    Section {
        file: PathBuf,
        /// Section name, e.g. skills, experience, conclusion
        name: String,
    },
    /// Classify a document's type from its vocabulary
    Classify {
        file: PathBuf,
    },
    /// Ask a natural-language question over a document library
    Ask {
        query: String,
        /// Directory of documents to load; defaults to the configured library
        #[arg(long)]
        library: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract { file } => cmd_extract(&file, cli.json),
        Command::Sections { file } => cmd_sections(&file, cli.json),
        Command::Section { file, name } => cmd_section(&file, &name, cli.json),
        Command::Classify { file } => cmd_classify(&file, cli.json),
        Command::Ask { query, library } => cmd_ask(&query, library.as_deref(), cli.json),
    }
}

fn cmd_extract(file: &Path, json: bool) -> Result<()> {
    let extracted = extract_file(file)?;
    if json {
        let response = ExtractResponse {
            success: true,
            text: extracted.full_text(),
            page_count: extracted.page_count(),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", extracted.full_text());
    }
    Ok(())
}

fn cmd_sections(file: &Path, json: bool) -> Result<()> {
    let full_text = extract_file(file)?.full_text();
    let survey = identify_sections(&full_text);
    let classified = classify(&full_text, &survey.sections);

    if json {
        let response = SurveyResponse {
            success: true,
            sections: survey.sections,
            previews: survey.previews,
            document_type: classified.document_type,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if survey.is_empty() {
        println!("no sections detected");
        return Ok(());
    }
    println!(
        "{} sections detected (looks like a {}):",
        survey.sections.len(),
        classified.document_type
    );
    for name in &survey.sections {
        match survey.previews.get(name) {
            Some(preview) if !preview.is_empty() => println!("  {name}: {preview}"),
            _ => println!("  {name}"),
        }
    }
    Ok(())
}

fn cmd_section(file: &Path, name: &str, json: bool) -> Result<()> {
    let full_text = extract_file(file)?.full_text();
    match extract_section(&full_text, name) {
        Ok(section) => {
            if json {
                let response = SectionResponse {
                    success: true,
                    section: section.name,
                    content: Some(section.content),
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", section.content);
            }
            Ok(())
        }
        Err(err) if err.is_recoverable() => {
            if json {
                let response = SectionResponse {
                    success: false,
                    section: name.to_string(),
                    content: None,
                };
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }
            let survey = identify_sections(&full_text);
            if survey.is_empty() {
                bail!("{err}");
            }
            bail!("{err}; detected sections: {}", survey.sections.join(", "));
        }
        Err(err) => Err(err.into()),
    }
}

fn cmd_classify(file: &Path, json: bool) -> Result<()> {
    let full_text = extract_file(file)?.full_text();
    let survey = identify_sections(&full_text);
    let classified = classify(&full_text, &survey.sections);

    if json {
        println!("{}", serde_json::to_string_pretty(&classified)?);
        return Ok(());
    }
    println!("{} (score {})", classified.document_type, classified.score);
    for (name, score) in &classified.all_scores {
        if *score > 0 {
            println!("  {name}: {score}");
        }
    }
    Ok(())
}

fn cmd_ask(query: &str, library: Option<&Path>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let library = match library {
        Some(dir) => dir.to_path_buf(),
        None => config
            .library_dir
            .clone()
            .context("no library directory; pass --library or set library_dir in the config")?,
    };

    let store = MemoryStore::new();
    let loaded = load_library(&library, &store)?;
    if loaded == 0 {
        bail!("no readable documents in {}", library.display());
    }
    info!(loaded, library = %library.display(), "library loaded");

    let assistant = DocumentAssistant::with_excerpt_limit(store, config.excerpt_limit);
    let reply = assistant.respond(query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply.message);
    }
    Ok(())
}

/// Extract text from a local file: PDFs by magic number, anything UTF-8 as
/// plain text.
fn extract_file(path: &Path) -> Result<ExtractedText> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if bytes.starts_with(b"%PDF") {
        return extract_text(&bytes)
            .with_context(|| format!("failed to extract text from {}", path.display()));
    }

    let content = String::from_utf8(bytes)
        .with_context(|| format!("{} is neither a PDF nor UTF-8 text", path.display()))?;
    let document = Document::new(&display_name(path), "text/plain", &content);
    extract_from_document(&document)
        .with_context(|| format!("failed to extract text from {}", path.display()))
}

/// Load every readable file in a directory through the ingest pipeline.
fn load_library(dir: &Path, store: &MemoryStore) -> Result<usize> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read library directory {}", dir.display()))?;

    let mut loaded = 0;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file) = upload_from_path(&path)? else {
            continue;
        };
        let document = process_upload(&file);
        store.insert(document)?;
        loaded += 1;
    }
    Ok(loaded)
}

/// Turn a local file into the upload shape the ingest pipeline expects.
/// PDFs become base64 data URLs, text files stay text; other binary files
/// are skipped.
fn upload_from_path(path: &Path) -> Result<Option<UploadedFile>> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let size = bytes.len() as u64;

    if bytes.starts_with(b"%PDF") {
        let content = format!("data:application/pdf;base64,{}", STANDARD.encode(&bytes));
        return Ok(Some(UploadedFile {
            filename: display_name(path),
            mime_type: "application/pdf".to_string(),
            content,
            size,
        }));
    }

    match String::from_utf8(bytes) {
        Ok(content) => Ok(Some(UploadedFile {
            filename: display_name(path),
            mime_type: "text/plain".to_string(),
            content,
            size,
        })),
        Err(_) => {
            debug!(file = %path.display(), "skipping binary file");
            Ok(None)
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unnamed")
        .to_string()
}
