use super::*;

fn category(id: &str, movies: &[(u64, &str)]) -> Category {
    Category::new(id, format!("Category {}", id), "").with_movies(
        movies.iter().map(|(movie_id, title)| Movie::new(*movie_id, *title)).collect(),
    )
}

fn program(movie_id: &str, program_id: ProgramId, title: &str) -> ProgramMetadata {
    ProgramMetadata {
        id: movie_id.to_string(),
        program_id,
        title: title.to_string(),
    }
}

#[test]
fn test_channels_to_unpublish() {
    let mut channel_ids = ChannelCategoryIds::new();
    channel_ids.insert(10, "1".to_string());
    channel_ids.insert(11, "2".to_string());
    channel_ids.insert(12, "3".to_string());

    let categories = vec![category("1", &[]), category("3", &[])];

    assert_eq!(channels_to_unpublish(&channel_ids, &categories), vec![11]);
}

#[test]
fn test_channels_to_unpublish_empty_catalog() {
    let mut channel_ids = ChannelCategoryIds::new();
    channel_ids.insert(10, "1".to_string());
    channel_ids.insert(11, "2".to_string());

    assert_eq!(channels_to_unpublish(&channel_ids, &[]), vec![10, 11]);
}

#[test]
fn test_programs_to_remove() {
    let category = category("1", &[(2, "two"), (3, "three")]);
    let programs = vec![
        program("1", 100, "one"),
        program("2", 101, "two"),
        program("not-a-movie", 102, "?"),
    ];

    let removed: Vec<ProgramId> = programs_to_remove(&programs, &category)
        .into_iter()
        .map(|p| p.program_id)
        .collect();
    assert_eq!(removed, vec![100, 102]);
}

#[test]
fn test_programs_to_update_compares_titles() {
    let category = category("1", &[(1, "one"), (2, "dos")]);
    let programs = vec![program("1", 100, "one"), program("2", 101, "two"), program("5", 102, "five")];

    let updates = programs_to_update(&programs, &category);
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, 101);
    assert_eq!(updates[0].1.title, "dos");
}

#[test]
fn test_movies_to_publish_keeps_catalog_order() {
    let category = category("1", &[(3, "three"), (1, "one"), (2, "two")]);
    let programs = vec![program("1", 100, "one")];

    let missing: Vec<u64> = movies_to_publish(&programs, &category)
        .into_iter()
        .map(|m| m.movie_id)
        .collect();
    assert_eq!(missing, vec![3, 2]);
}

#[test]
fn test_in_sync_channel_has_no_work() {
    let category = category("1", &[(1, "one"), (2, "two")]);
    let programs = vec![program("1", 100, "one"), program("2", 101, "two")];

    assert!(programs_to_remove(&programs, &category).is_empty());
    assert!(programs_to_update(&programs, &category).is_empty());
    assert!(movies_to_publish(&programs, &category).is_empty());
}
