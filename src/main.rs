use clap::Parser;
use storefront_audit::{Audit, Status};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    if args.html.is_none() {
        println!("Note: live audits require a WebDriver server (e.g., ChromeDriver).");
        println!(
            "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
        );
    }

    let mut audit = Audit::new(config);
    if let Some(html) = &args.html {
        audit = audit.with_html_file(html);
    }
    if let Some(output) = &args.output {
        audit = audit.with_output(output);
    }

    let start_time = std::time::Instant::now();
    let report = match audit.run().await {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Audit failed: {}", e);
            std::process::exit(2);
        }
    };

    let overall = report.overall_status();
    ::log::info!(
        "Audit complete - {} rows, overall {} in {:.2} seconds",
        report.records.len(),
        overall,
        start_time.elapsed().as_secs_f64()
    );
    println!("Report written to {}", report.report_path.display());
    if let Some(screenshot) = &report.screenshot {
        println!("Screenshot saved to {}", screenshot.display());
    }

    if args.strict && overall != Status::Pass {
        std::process::exit(1);
    }
}
