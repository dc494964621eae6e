// Diff computation between the local catalog and what the provider holds

use std::collections::HashSet;
use tracing::debug;
use watchnext_models::{Category, ChannelId, Movie, ProgramId};
use watchnext_provider::{ChannelCategoryIds, ProgramMetadata};

/// Published channels whose category is no longer in the catalog
pub fn channels_to_unpublish(channel_ids: &ChannelCategoryIds, categories: &[Category]) -> Vec<ChannelId> {
    let wanted: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    let stale: Vec<ChannelId> = channel_ids
        .iter()
        .filter(|(_, category_id)| !wanted.contains(category_id))
        .map(|(channel_id, _)| channel_id)
        .collect();

    debug!(
        "channels_to_unpublish: published={}, categories={}, stale={}",
        channel_ids.len(),
        categories.len(),
        stale.len()
    );
    stale
}

/// Programs of a channel that do not belong to a movie of its category
///
/// A program whose internal id is not a movie id cannot match anything and is
/// always removed.
pub fn programs_to_remove(programs: &[ProgramMetadata], category: &Category) -> Vec<ProgramMetadata> {
    let removed: Vec<ProgramMetadata> = programs
        .iter()
        .filter(|program| match program.movie_id() {
            Some(movie_id) => !category.contains_movie(movie_id),
            None => true,
        })
        .cloned()
        .collect();

    debug!(
        "programs_to_remove: category={}, programs={}, removed={}",
        category.id,
        programs.len(),
        removed.len()
    );
    removed
}

/// Programs whose published title no longer matches their movie
pub fn programs_to_update(programs: &[ProgramMetadata], category: &Category) -> Vec<(ProgramId, Movie)> {
    let stale: Vec<(ProgramId, Movie)> = programs
        .iter()
        .filter_map(|program| {
            let movie = category.find_movie(program.movie_id()?)?;
            (movie.title != program.title).then(|| (program.program_id, movie.clone()))
        })
        .collect();

    debug!(
        "programs_to_update: category={}, programs={}, stale={}",
        category.id,
        programs.len(),
        stale.len()
    );
    stale
}

/// Movies of a category that have no program in its channel yet
pub fn movies_to_publish(programs: &[ProgramMetadata], category: &Category) -> Vec<Movie> {
    let published: HashSet<u64> = programs.iter().filter_map(ProgramMetadata::movie_id).collect();
    let missing: Vec<Movie> = category
        .movies
        .iter()
        .filter(|movie| !published.contains(&movie.movie_id))
        .cloned()
        .collect();

    debug!(
        "movies_to_publish: category={}, movies={}, published={}, missing={}",
        category.id,
        category.movies.len(),
        published.len(),
        missing.len()
    );
    missing
}

#[cfg(test)]
mod tests;
