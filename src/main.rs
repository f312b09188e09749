use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use batcheck::api::{self, ApiContext};
use batcheck::catalog;
use batcheck::config;
use batcheck::db;
use batcheck::fetch;
use batcheck::ingest;
use batcheck::models::BrefScope;
use batcheck::pipeline::classify;
use batcheck::pipeline::compliance::{
    BrefInput, ComplianceEngine, LlmClient, OpenAiClient, UnconfiguredLlm,
};
use batcheck::pipeline::extraction::PdfTextExtractor;
use batcheck::report;

#[derive(Parser)]
#[command(name = "batcheck", version, about = "BAT/RIE compliance checker for Dutch environmental permits")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (POST /api/verify)
    Serve {
        #[arg(long, default_value = config::DEFAULT_BIND_ADDR)]
        addr: String,
    },
    /// Seed the knowledge base with the built-in BREF catalog and list it
    Catalog,
    /// Download BREF PDFs from EUR-Lex into the local brefs directory
    Fetch {
        /// Download a single BREF instead of the whole catalog
        #[arg(long)]
        id: Option<String>,
    },
    /// Extract BAT conclusions from a BREF PDF into the knowledge base
    Ingest {
        pdf: PathBuf,
        /// BREF id to store the conclusions under (e.g. IRPP)
        #[arg(long)]
        id: String,
    },
    /// Run a full compliance check for a permit PDF
    Check {
        permit: PathBuf,
        /// BREF PDFs to check against; without this the knowledge base is used
        #[arg(long = "bref")]
        brefs: Vec<PathBuf>,
        /// Output directory for the reports (default: ~/Batcheck/reports)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    batcheck::init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Serve { addr } => serve(addr),
        Command::Catalog => show_catalog(),
        Command::Fetch { id } => fetch_brefs(id),
        Command::Ingest { pdf, id } => ingest_bref(pdf, id),
        Command::Check { permit, brefs, out } => check_permit(permit, brefs, out),
    }
}

fn serve(addr: String) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = addr.parse()?;

    std::fs::create_dir_all(config::uploads_dir())?;
    std::fs::create_dir_all(config::reports_dir())?;

    let llm: Arc<dyn LlmClient> = match OpenAiClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!(error = %e, "LLM not configured, compliance calls will fail");
            Arc::new(UnconfiguredLlm)
        }
    };

    let ctx = ApiContext::new(
        config::knowledge_base_path(),
        config::uploads_dir(),
        config::reports_dir(),
        llm,
    );

    tokio::runtime::Runtime::new()?.block_on(api::serve(ctx, addr))?;
    Ok(())
}

fn show_catalog() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(config::app_data_dir())?;
    let conn = db::open_database(&config::knowledge_base_path())?;
    catalog::seed_catalog(&conn)?;
    catalog::seed_rie_activities(&conn)?;

    println!("{:<6} {:<46} {:<18} {}", "ID", "TITLE", "SECTOR", "CONCLUSIONS");
    for bref in db::list_brefs(&conn)? {
        let count = db::conclusions_for_bref(&conn, &bref.bref_id)?.len();
        println!(
            "{:<6} {:<46} {:<18} {}",
            bref.bref_id, bref.title, bref.sector, count
        );
    }
    Ok(())
}

fn fetch_brefs(id: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let entries: Vec<_> = match &id {
        Some(id) => {
            let entry = catalog::find_entry(id)
                .ok_or_else(|| format!("unknown BREF id: {id}"))?;
            vec![*entry]
        }
        None => catalog::CATALOG.to_vec(),
    };

    let client = fetch::download_client();
    let summary = fetch::download_all(&client, &entries, &config::brefs_dir());

    println!(
        "downloaded {}, skipped {} (already present), failed {}",
        summary.downloaded.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    for (bref_id, error) in &summary.failed {
        println!("  failed {bref_id}: {error}");
    }
    Ok(())
}

fn ingest_bref(pdf: PathBuf, id: String) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(config::app_data_dir())?;
    let bytes = std::fs::read(&pdf)?;
    let title = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.clone());

    let ingested = ingest::ingest_bref_bytes(&PdfTextExtractor, &id, &title, &bytes)?;

    let mut conn = db::open_database(&config::knowledge_base_path())?;
    catalog::seed_catalog(&conn)?;
    ingest::store_bref(&mut conn, &ingested, Some(&pdf.to_string_lossy()))?;

    println!(
        "ingested {}: {} pages, {} conclusions ({})",
        id,
        ingested.page_count,
        ingested.conclusions.len(),
        ingested.language.as_str()
    );
    for bat in ingested.conclusions.iter().take(5) {
        println!("  {} — {}", bat.bat_id, bat.title);
    }
    if ingested.conclusions.len() > 5 {
        println!("  ... and {} more", ingested.conclusions.len() - 5);
    }
    Ok(())
}

fn check_permit(
    permit_path: PathBuf,
    bref_paths: Vec<PathBuf>,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let llm = OpenAiClient::from_env()?;
    let extractor = PdfTextExtractor;

    let permit_bytes = std::fs::read(&permit_path)?;
    let stem = permit_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "permit".to_string());
    let (permit, conditions) = ingest::ingest_permit_bytes(
        &extractor,
        &format!("PERMIT_{stem}"),
        &stem,
        &permit_path.to_string_lossy(),
        &permit_bytes,
    )?;
    println!(
        "permit {}: {} pages, {} numbered conditions",
        permit.permit_id, permit.page_count, conditions.len()
    );

    let inputs = if bref_paths.is_empty() {
        knowledge_base_inputs(&permit.activity_description)?
    } else {
        let mut inputs = Vec::new();
        for path in &bref_paths {
            let bytes = std::fs::read(path)?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_uppercase())
                .unwrap_or_default();
            let bref_id = if catalog::find_entry(&stem).is_some() {
                stem
            } else {
                format!("UPLOADED_{stem}")
            };
            let ingested =
                ingest::ingest_bref_bytes(&extractor, &bref_id, &path.to_string_lossy(), &bytes)?;
            println!(
                "bref {}: {} conclusions",
                ingested.bref_id,
                ingested.conclusions.len()
            );
            inputs.push(BrefInput {
                scope: ingested.scope(),
                conclusions: ingested.conclusions,
            });
        }
        inputs
    };

    if inputs.is_empty() {
        return Err("no BREF documents to check against; pass --bref or ingest some first".into());
    }

    let engine = ComplianceEngine::new(Arc::new(llm));
    let run = engine.run(&permit, &inputs);

    let mut conn = db::open_database(&config::knowledge_base_path())?;
    db::insert_permit(&conn, &permit)?;
    db::insert_run(&mut conn, &run)?;

    let report_id = format!(
        "COMP_REPORT_{}_{}",
        &run.run_id.simple().to_string()[..8],
        run.finished_at.format("%Y%m%d%H%M%S")
    );
    let dir = out.unwrap_or_else(config::reports_dir);
    let paths = report::write_reports(&dir, &permit, &run, &report_id)?;

    let counts = run.status_counts();
    println!(
        "verified {} conclusions: {} compliant, {} partially, {} non-compliant, {} ambiguous ({} failures)",
        run.results.len(),
        counts.compliant,
        counts.partially_compliant,
        counts.non_compliant,
        counts.insufficient_information,
        run.failures.len()
    );
    println!("reports:");
    println!("  {}", paths.markdown.display());
    println!("  {}", paths.html.display());
    println!("  {}", paths.pdf.display());
    Ok(())
}

/// Build check inputs from the knowledge base: ingested BREFs with
/// conclusions, pre-screened against the permit's activity description.
fn knowledge_base_inputs(
    activity: &str,
) -> Result<Vec<BrefInput>, Box<dyn std::error::Error>> {
    let conn = db::open_database(&config::knowledge_base_path())?;
    let shortlist: Vec<&str> = classify::prescreen_brefs(activity, catalog::CATALOG)
        .into_iter()
        .map(|e| e.bref_id)
        .collect();

    let mut inputs = Vec::new();
    for bref in db::list_brefs(&conn)? {
        let in_catalog = catalog::find_entry(&bref.bref_id).is_some();
        if in_catalog && !shortlist.contains(&bref.bref_id.as_str()) {
            continue;
        }
        let conclusions = db::conclusions_for_bref(&conn, &bref.bref_id)?;
        if conclusions.is_empty() {
            continue;
        }
        let scope_description = bref
            .scope_description
            .clone()
            .unwrap_or_else(|| bref.title.clone());
        inputs.push(BrefInput {
            scope: BrefScope {
                bref_id: bref.bref_id,
                scope_description,
            },
            conclusions,
        });
    }
    Ok(inputs)
}
