//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the configured catalog and report per-kind record totals.
//! - Start file logging when `CINEDEX_LOG_DIR` is set.
//! - Keep output deterministic for quick local sanity checks.

use cinedex_core::repo::Record;
use cinedex_core::{
    init_logging, Filters, ListCriteria, LoggingConfig, Models, RecordRepository, RepoResult,
    SqliteRecordStore, StoreConfig, ACTOR_SORT_SAFELIST, DIRECTOR_SORT_SAFELIST,
    MOVIE_SORT_SAFELIST,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Some(logging) = LoggingConfig::from_env() {
        if let Err(err) = init_logging(&logging) {
            eprintln!("cinedex: logging disabled: {err}");
        }
    }

    let mut config = StoreConfig::from_env();
    if let Some(path) = std::env::args().nth(1) {
        config.database = path;
    }

    println!("cinedex_core ping={}", cinedex_core::ping());
    println!("cinedex_core version={}", cinedex_core::core_version());

    let models = match Models::open(&config) {
        Ok(models) => models,
        Err(err) => {
            eprintln!("cinedex: cannot open `{}`: {err}", config.database);
            return ExitCode::FAILURE;
        }
    };

    match report(&models) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cinedex: {err}");
            ExitCode::FAILURE
        }
    }
}

fn report(models: &Models) -> RepoResult<()> {
    let movies = total(&models.movies, MOVIE_SORT_SAFELIST)?;
    let actors = total(&models.actors, ACTOR_SORT_SAFELIST)?;
    let directors = total(&models.directors, DIRECTOR_SORT_SAFELIST)?;
    println!("movies={movies}");
    println!("actors={actors}");
    println!("directors={directors}");
    Ok(())
}

fn total<R: Record>(
    store: &SqliteRecordStore<R>,
    safelist: &'static [&'static str],
) -> RepoResult<i64> {
    let listing = store.get_all(&ListCriteria::all(), &Filters::first_page(safelist))?;
    Ok(listing.metadata.total_records)
}
