// Entry point and high-level CLI flow.
//
// One batch run:
// - load and clean the CIN table, printing diagnostics,
// - print the rankings, national averages and regional averages,
// - write the per-region long tables, rankings and a JSON summary.
use anyhow::{Context, Result};
use cin_trends::cli::Cli;
use cin_trends::pipeline::{self, PipelineOutput};
use cin_trends::{logging, output, reports, util};
use clap::Parser;

fn print_load_summary(out: &PipelineOutput) {
    println!(
        "Dataset loaded on {} from {}",
        out.generated_at.format("%d-%m-%Y %H:%M:%S"),
        out.source
    );
    println!(
        "Processing dataset... ({} local authorities, {} regions)",
        util::format_int(out.national.len()),
        util::format_int(out.regions.len())
    );
    println!(
        "Note: {} cells treated as missing.",
        util::format_int(out.coercion.missing_cells)
    );
    if out.duplicates_removed > 0 {
        println!(
            "Info: Dropped {} duplicate local authority rows.",
            util::format_int(out.duplicates_removed)
        );
    }
    println!();
}

fn print_reports(out: &PipelineOutput, top_n: usize) {
    for ranking in &out.rankings {
        output::preview_table(
            &format!("Local authorities with the highest {}", ranking.column),
            Some(&format!("Top {}, ascending", top_n)),
            &reports::ranking_rows(&ranking.column, &ranking.highest),
            top_n,
        );
        output::preview_table(
            &format!("Local authorities with the lowest {}", ranking.column),
            Some(&format!("Bottom {}, ascending", top_n)),
            &reports::ranking_rows(&ranking.column, &ranking.lowest),
            top_n,
        );
    }

    println!("National averages:");
    for (column, mean) in &out.national_means {
        println!(
            "  {}: {}",
            column,
            mean.map(|m| util::format_number(util::round2(m), 2))
                .unwrap_or_else(|| "n/a".to_string())
        );
    }

    let rows = reports::region_mean_rows(&out.regional_means);
    output::preview_table(
        "Regional averages",
        Some("Sorted by mean count, highest first"),
        &rows,
        rows.len(),
    );
}

fn main() -> Result<()> {
    logging::init_logging();

    let config = Cli::parse().into_config().context("invalid configuration")?;
    let out = pipeline::run(&config).context("CIN pipeline failed")?;

    print_load_summary(&out);
    print_reports(&out, config.top_n);

    if config.write_outputs {
        let written = pipeline::write_outputs(&out, &config.output_dir)
            .with_context(|| format!("writing outputs to {}", config.output_dir.display()))?;
        println!(
            "(Full tables exported to {}: {} files)",
            config.output_dir.display(),
            written.len()
        );
    }
    Ok(())
}
