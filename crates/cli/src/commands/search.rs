//! City search.

use super::CliError;
use crate::render;
use crate::session::Session;

/// Print one page of restaurants delivering in `city`.
///
/// # Errors
///
/// Returns `CliError::Api` if the query is invalid or the search fails.
pub async fn run(session: &Session, city: &str, page: u32) -> Result<(), CliError> {
    let results = session.search.search_restaurants(city, page).await?;
    render::print(session.format, &results, render::search);
    Ok(())
}
