mod bootstrap;
mod report;

use anyhow::Result;
use royalty_core::settings::Settings;
use royalty_data::pipeline::{self, TRACK_LEDGER_FILE, VALUATION_FILE};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Royalty Ledger v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Stage: {}, Window: {} months, Root: {}",
        settings.stage,
        settings.window_months,
        settings.root.display()
    );

    match settings.stage.as_str() {
        "aggregate" => {
            pipeline::run_aggregation(&settings.root, &settings.out_dir)?;
        }

        "valuate" => {
            let ledger_path = settings.out_dir.join(TRACK_LEDGER_FILE);
            let report_path = settings.out_dir.join(VALUATION_FILE);
            let valuation = pipeline::run_valuation(
                &ledger_path,
                &report_path,
                settings.window_months as usize,
            )?;
            print!("{}", report::render(&valuation));
        }

        "full" => {
            let outcome = pipeline::run_aggregation(&settings.root, &settings.out_dir)?;
            let report_path = settings.out_dir.join(VALUATION_FILE);
            let valuation = pipeline::run_valuation(
                &outcome.track_ledger,
                &report_path,
                settings.window_months as usize,
            )?;
            print!("{}", report::render(&valuation));
        }

        unknown => {
            eprintln!("Unknown stage: {}", unknown);
        }
    }

    Ok(())
}
