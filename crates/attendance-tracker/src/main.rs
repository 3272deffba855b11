mod bootstrap;

use anyhow::Result;
use tracker_core::settings::Settings;
use tracker_data::store::CsvStore;
use tracker_ui::app::{App, Screen};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Attendance Tracker v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Students: {}",
        settings.view,
        settings.theme,
        settings.students
    );

    let date = settings.session_date()?;
    let store = CsvStore::new(settings.records_path());

    match settings.view.as_str() {
        "form" | "history" => {
            let screen = if settings.view == "history" {
                Screen::History
            } else {
                Screen::Form
            };

            let app = App::new(
                &settings.theme,
                store,
                settings.resolved_export_dir(),
                date,
                usize::from(settings.students),
                screen,
            );
            app.run()?;
        }

        "search" => {
            // One-shot lookup, no TUI: print the record and exit.
            let Some(name) = settings.student.as_deref() else {
                eprintln!("--view search requires --student NAME");
                std::process::exit(2);
            };

            let ledger = store.load()?;
            match ledger.query_student(name) {
                Ok(summary) => {
                    println!("Attendance record for {}", summary.name);
                    println!("  Days tracked: {}", summary.total_days);
                    println!("  Present:      {}", summary.present_days);
                    println!("  Absent:       {}", summary.absent_days);
                    println!("  Attendance:   {}%", summary.percent);
                }
                Err(err) => {
                    println!("{err}");
                }
            }
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
