mod analytics;
mod ipc;
mod model;
mod sample;
mod store;

use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "schoolcrmd")]
#[command(about = "School CRM sidecar: per-student records and performance analytics")]
struct Cli {
    /// Log filter, e.g. `info` or `schoolcrmd=debug`.
    #[arg(long, default_value = "info")]
    log: String,

    /// Seed the demo data set for this owner id before serving requests.
    #[arg(long, value_name = "OWNER_ID")]
    seed_demo: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON wire.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&cli.log))
        .with_writer(io::stderr)
        .init();

    let mut state = ipc::AppState {
        store: store::RecordStore::new(),
    };

    if let Some(owner_id) = cli.seed_demo.as_deref() {
        let counts = sample::seed_owner(&mut state.store, owner_id, chrono::Utc::now().date_naive())?;
        info!(
            owner_id,
            attendance = counts.attendance,
            exams = counts.exams,
            assignments = counts.assignments,
            "seeded demo data"
        );
    }

    info!(version = env!("CARGO_PKG_VERSION"), "schoolcrmd ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply with an id; report what we can and move on.
                warn!(error = %e, "dropping unparseable request line");
                let _ = writeln!(
                    stdout,
                    "{}",
                    serde_json::json!({
                        "ok": false,
                        "error": { "code": "bad_json", "message": e.to_string() }
                    })
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    Ok(())
}
