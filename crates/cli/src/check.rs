//! `plugtest check` -- run the conformance checks and print a report.

use plugtest_conformance::{run_conformance_suite, run_live_suite, ConformanceReport, LocalResource};

use crate::remote::HttpResource;
use crate::OutputFormat;

/// Checks that need a resource in its initial state; never run remotely.
const STARTUP_ONLY: &[&str] = &[
    "startup_scenario",
    "placeholder_never_validates",
    "first_none_match_created",
];

/// Run the suite in-process, or against `url` when given. Returns whether
/// every check passed.
pub(crate) async fn cmd_check(
    url: Option<&str>,
    seed: Option<u64>,
    output: OutputFormat,
    quiet: bool,
) -> bool {
    let (target, report) = match url {
        Some(url) => {
            let resource = HttpResource::new(url);
            tracing::info!(url = resource.url(), "checking live resource");
            let report = run_live_suite(&resource).await;
            (resource.url().to_string(), report)
        }
        None => {
            tracing::info!(?seed, "checking in-process resource");
            let report = run_conformance_suite(move || async move {
                match seed {
                    Some(seed) => LocalResource::seeded(seed),
                    None => LocalResource::new(),
                }
            })
            .await;
            ("in-process".to_string(), report)
        }
    };

    let skipped: &[&str] = if url.is_some() { STARTUP_ONLY } else { &[] };
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "target": target,
                "skipped": skipped,
                "report": report,
            });
            let pretty = serde_json::to_string_pretty(&json)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            if !quiet {
                print_text_report(&target, skipped, &report);
            } else if !report.is_success() {
                eprint!("{}", report);
            }
        }
    }

    report.is_success()
}

fn print_text_report(target: &str, skipped: &[&str], report: &ConformanceReport) {
    println!("Plugtest Conformance Report");
    println!("===========================");
    println!("  Target: {}", target);
    println!();
    for r in &report.results {
        let mark = if r.passed { "PASS" } else { "FAIL" };
        println!("  {} [{}/{}]", mark, r.category, r.name);
        if let Some(msg) = &r.message {
            println!("       {}", msg);
        }
    }
    for name in skipped {
        println!("  SKIP [startup/{}] needs a freshly started server", name);
    }
    println!();
    println!(
        "  {}/{} passed, {} failed",
        report.passed, report.total, report.failed
    );
}
