use std::path::Path;

use velen_core::game_data::spell_name;
use velen_core::{AnalysisSession, AnalyzerSettings, decode_elements};

use crate::report::{EmbeddedTotal, ReportFixture};

pub async fn analyze(path: &str, settings_path: Option<&str>) -> Result<(), String> {
    tracing::debug!(path, "loading report fixture");
    let fixture = ReportFixture::load(Path::new(path))?;
    let settings = load_settings(settings_path)?;

    let decoded = decode_elements(fixture.events);
    let mut session = AnalysisSession::new(
        fixture.fight,
        fixture.player_id,
        fixture.combatant.as_ref(),
        &settings,
    );

    // The fetch runs while the stream is processed.
    session.begin_external_fetch(EmbeddedTotal {
        total: fixture.damage_taken_during_aura,
    });
    session.process_stream(&decoded.events);
    session.finish_external_fetch().await;

    print_summary(&session, &settings, decoded.skipped);
    Ok(())
}

pub fn validate(path: &str) -> Result<(), String> {
    tracing::debug!(path, "loading report fixture");
    let fixture = ReportFixture::load(Path::new(path))?;
    let submitted = fixture.events.len();
    let decoded = decode_elements(fixture.events);

    // No combatant: modules stay inactive, hygiene counters still run.
    let mut session = AnalysisSession::new(
        fixture.fight,
        fixture.player_id,
        None,
        &AnalyzerSettings::default(),
    );
    session.process_stream(&decoded.events);
    let stats = session.stats();

    println!("{:<30} {}", "elements submitted:", submitted);
    println!("{:<30} {}", "events decoded:", decoded.events.len());
    println!("{:<30} {}", "undecodable elements:", decoded.skipped);
    println!("{:<30} {}", "malformed events:", stats.malformed_events);
    println!("{:<30} {}", "out of order timestamps:", stats.out_of_order_events);
    Ok(())
}

fn load_settings(path: Option<&str>) -> Result<AnalyzerSettings, String> {
    match path {
        Some(path) => AnalyzerSettings::load(Path::new(path)).map_err(|e| e.to_string()),
        None => Ok(AnalyzerSettings::default()),
    }
}

fn print_summary(session: &AnalysisSession, settings: &AnalyzerSettings, skipped: usize) {
    let fight = session.fight();
    let stats = session.stats();

    println!(
        "fight window: [{} ms, {} ms) spanning {:.1}s",
        fight.start,
        fight.end,
        fight.duration_secs()
    );
    println!();

    println!("{:<30} Active", "Module");
    println!("{}", "-".repeat(40));
    for (name, active) in session.roster() {
        println!("{:<30} {}", name, if active { "yes" } else { "no" });
    }
    println!();

    if let Some(totals) = session.attribution() {
        println!("{} attribution", spell_name(settings.castigation.talent));
        println!("{}", "-".repeat(40));
        println!("{:<30} {}", "bonus damage:", totals.damage);
        println!("{:<30} {}", "bonus healing:", totals.healing);
        println!();
    }

    if let Some(report) = session.mitigation() {
        println!("{} mitigation", spell_name(settings.devotion_aura.talent));
        println!("{}", "-".repeat(40));
        println!("{:<30} {}", "damage taken during:", report.damage_taken_during);
        println!("{:<30} {}", "damage taken outside:", report.damage_taken_outside);
        println!("{:<30} {:.1}", "reduced during:", report.reduced_during);
        println!("{:<30} {:.1}", "reduced outside:", report.reduced_outside);
        println!("{:<30} {:.1}", "reduced total:", report.reduced_total);
        println!("{:<30} {:.2}", "reduction per second:", report.drps);
        if !report.resolved {
            println!("(external total unresolved; during bucket reads as zero)");
        }
        println!();
    }

    println!("{:<30} {}", "events processed:", stats.events_processed);
    println!("{:<30} {}", "undecodable elements:", skipped);
    println!("{:<30} {}", "malformed events:", stats.malformed_events);
    println!("{:<30} {}", "out of order timestamps:", stats.out_of_order_events);
}
