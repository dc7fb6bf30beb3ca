use std::path::PathBuf;

use clap::Parser;
use mc_app::prefs::{load_editor_prefs, split_locales, EditorPrefs};
use mc_core::fill::summary_message;
use mc_core::grid::Grid;
use mc_core::session::Session;
use mc_core::translate::DeepLTranslator;
use mc_deepl::DeepLClient;

#[derive(Parser)]
#[command(name = "mc_batch")]
#[command(about = "Fill missing translations in a message catalog without the editor", long_about = None)]
struct Cli {
    /// Catalog to read
    #[arg(long)]
    load: PathBuf,

    /// Locale column to fill; omit to only normalize the catalog
    #[arg(long)]
    locale: Option<String>,

    /// DeepL key; falls back to DEEPL_API_KEY and the editor prefs
    #[arg(long)]
    credential: Option<String>,

    /// Locale columns to add when missing, comma-separated
    #[arg(long)]
    locales: Option<String>,

    /// Print the rows matching this needle after the run
    #[arg(long)]
    filter: Option<String>,

    /// Where to write the catalog
    #[arg(long)]
    out: PathBuf,
}

fn main() {
    mc_app::logging::init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let prefs = load_editor_prefs().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "editor prefs unreadable, using defaults");
        EditorPrefs::default()
    });

    let text = std::fs::read_to_string(&cli.load)
        .map_err(|err| format!("read {}: {err}", cli.load.display()))?;
    let mut grid = Grid::load(&text).map_err(|err| err.to_string())?;
    let extra = cli
        .locales
        .as_deref()
        .map(split_locales)
        .unwrap_or_else(|| prefs.supported_locales.clone());
    let added = grid.ensure_locales(&extra);

    let mut session = Session::new();
    session.install(grid);

    if let Some(locale) = cli.locale.as_deref() {
        session.select_target(locale).map_err(|err| err.to_string())?;
        let credential = cli
            .credential
            .clone()
            .unwrap_or_else(|| prefs.resolve_credential());
        let client = DeepLClient::new(prefs.deepl_config()).map_err(|err| err.to_string())?;
        let translator = DeepLTranslator::new(client);
        let report = session
            .run_fill(&credential, &translator)
            .map_err(|err| err.to_string())?;
        println!(
            "{} requested={} filled={} failed={}",
            summary_message(&report),
            report.requested,
            report.filled,
            report.failed
        );
    }

    if let Some(needle) = cli.filter.as_deref() {
        let shown = session.set_filter(needle);
        println!("{shown} rows match {needle:?}");
        for (_, row) in session.view().visible_rows() {
            let key = row.cells.first().map(|cell| cell.text.as_str()).unwrap_or("");
            println!("  {key}");
        }
    }

    let bytes = session.export().map_err(|err| err.to_string())?;
    if let Some(parent) = cli.out.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("create {}: {err}", parent.display()))?;
    }
    std::fs::write(&cli.out, &bytes)
        .map_err(|err| format!("write {}: {err}", cli.out.display()))?;
    println!(
        "wrote {} rows ({} columns added, {} rows changed) to {}",
        session.grid().map(Grid::data_row_count).unwrap_or(0),
        added,
        session.changed_rows(),
        cli.out.display()
    );
    Ok(())
}
