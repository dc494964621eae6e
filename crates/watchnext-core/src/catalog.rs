use watchnext_models::{AspectRatio, Category, Movie, RatingStyle};

const TV_RATING_PG: &str = "com.android.tv/US_TV/US_TV_PG/US_TV_D/US_TV_L/US_TV_S/US_TV_V";
const GENRE_DRAMA: &str = "DRAMA";
const GENRE_TECH_SCIENCE: &str = "TECH_SCIENCE";

const LOREM: &str = "Fusce id nisi turpis. Praesent viverra bibendum semper. Donec tristique, orci sed semper lacinia, quam erat rhoncus massa, non congue tellus est quis tellus. Sed mollis orci venenatis quam scelerisque accumsan. Curabitur a massa sit amet mi accumsan mollis sed et magna. Vivamus sed aliquam risus. Nulla eget dolor in elit facilisis mattis. Ut aliquet luctus lacus. Phasellus nec commodo erat. Praesent tempus id lectus ac scelerisque. Maecenas pretium cursus lectus id volutpat.";

fn minutes(minutes: u64, seconds: u64) -> u64 {
    (minutes * 60 + seconds) * 1_000
}

/// Catalog written to an empty store on first start
pub fn default_categories() -> Vec<Category> {
    let recommendations = Category::new("1", "Recommendations", "Recommended videos for you.")
        .with_movies(vec![rushmore(), treasure_mode(), elephants_dream(), big_buck_bunny()]);

    let dramas = Category::new("2", "Dramas", "Drama movies based on your watching preferences.")
        .with_movies(vec![elephants_dream(), big_buck_bunny(), treasure_mode(), rushmore()]);

    vec![recommendations, dramas]
}

fn big_buck_bunny() -> Movie {
    Movie {
        description: "Big Buck Bunny tells the story of a giant rabbit with a heart bigger than himself. When one sunny day three rodents rudely harass him, something snaps... and the rabbit ain't no bunny anymore! In the typical cartoon tradition he prepares the nasty rodents a comical revenge.".to_string(),
        duration: minutes(9, 56),
        preview_video_url: "https://archive.org/download/ElephantsDream/ed_hd_512kb.mp4".to_string(),
        video_url: "https://archive.org/download/ElephantsDream/ed_hd_512kb.mp4".to_string(),
        poster_art_aspect_ratio: AspectRatio::Ratio2x3,
        aspect_ratio: AspectRatio::Ratio16x9,
        thumbnail_url: "https://peach.blender.org/wp-content/uploads/poster_bunny_small.jpg?x11217".to_string(),
        card_image_url: "https://peach.blender.org/wp-content/uploads/title_anouncement.jpg?x11217".to_string(),
        content_rating: TV_RATING_PG.to_string(),
        genre: GENRE_DRAMA.to_string(),
        release_date: "2008".to_string(),
        rating: "4".to_string(),
        rating_style: RatingStyle::Stars,
        starting_price: "$12.99".to_string(),
        offer_price: "$9.99".to_string(),
        width: 3840,
        height: 2160,
        weight: 1,
        ..Movie::new(1, "Big Buck Bunny")
    }
}

fn elephants_dream() -> Movie {
    Movie {
        description: "The story of two strange characters exploring a capricious and seemingly infinite machine. The elder, Proog, acts as a tour-guide and protector, happily showing off the sights and dangers of the machine to his initially curious but increasingly skeptical protege Emo. As their journey unfolds we discover signs that the machine is not all Proog thinks it is, and his guiding takes on a more desperate aspect.".to_string(),
        duration: minutes(10, 53),
        preview_video_url: "https://archive.org/download/ElephantsDream/ed_hd_512kb.mp4".to_string(),
        video_url: "https://archive.org/download/ElephantsDream/ed_hd_512kb.mp4".to_string(),
        thumbnail_url: "https://orange.blender.org/wp-content/themes/orange/images/common/ed_header.jpg?x53801".to_string(),
        card_image_url: "https://orange.blender.org/wp-content/themes/orange/images/common/ed_header.jpg?x53801".to_string(),
        content_rating: TV_RATING_PG.to_string(),
        genre: GENRE_DRAMA.to_string(),
        release_date: "2006".to_string(),
        rating: "3".to_string(),
        starting_price: "$2.99".to_string(),
        offer_price: "$1.99".to_string(),
        width: 426,
        height: 240,
        weight: 2,
        ..Movie::new(2, "Elephant's Dream")
    }
}

fn rushmore() -> Movie {
    let url = "https://storage.googleapis.com/android-tv/Sample%20videos/Demo%20Slam/Google%20Demo%20Slam_%20Rushmore.mp4";
    Movie {
        description: LOREM.to_string(),
        duration: minutes(1, 8),
        preview_video_url: url.to_string(),
        video_url: url.to_string(),
        thumbnail_url: "https://storage.googleapis.com/android-tv/Sample%20videos/Demo%20Slam/Google%20Demo%20Slam_%20Rushmore/card.jpg".to_string(),
        card_image_url: "https://storage.googleapis.com/android-tv/Sample%20videos/Demo%20Slam/Google%20Demo%20Slam_%20Rushmore/card.jpg".to_string(),
        content_rating: TV_RATING_PG.to_string(),
        genre: GENRE_TECH_SCIENCE.to_string(),
        release_date: "2010".to_string(),
        rating: "4".to_string(),
        starting_price: "Free".to_string(),
        offer_price: "Free".to_string(),
        width: 426,
        height: 240,
        weight: 3,
        ..Movie::new(3, "Rushmore")
    }
    .with_next_in_series(4)
}

fn treasure_mode() -> Movie {
    let base = "https://storage.googleapis.com/android-tv/Sample%20videos/April%20Fool's%202013/Explore%20Treasure%20Mode%20with%20Google%20Maps";
    Movie {
        description: LOREM.to_string(),
        duration: minutes(2, 17),
        preview_video_url: format!("{}.mp4", base),
        video_url: format!("{}.mp4", base),
        thumbnail_url: format!("{}/bg.jpg", base),
        card_image_url: format!("{}/card.jpg", base),
        content_rating: TV_RATING_PG.to_string(),
        genre: GENRE_TECH_SCIENCE.to_string(),
        release_date: "2013".to_string(),
        rating: "2".to_string(),
        starting_price: "Free".to_string(),
        offer_price: "Free".to_string(),
        width: 426,
        height: 240,
        weight: 3,
        ..Movie::new(4, "Explore Treasure Mode with Google Maps")
    }
}
