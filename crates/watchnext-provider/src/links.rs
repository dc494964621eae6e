use url::Url;
use watchnext_models::MovieId;

const DEFAULT_SCHEME: &str = "watchnextcodelab";
const DEFAULT_HOST: &str = "com.example.android.watchnextcodelab";
pub const START_APP_ACTION_PATH: &str = "startapp";
pub const PLAY_VIDEO_ACTION_PATH: &str = "playvideo";

/// Builds and parses the deep links written on channels and programs
#[derive(Debug, Clone)]
pub struct AppLinks {
    base: Url,
}

impl AppLinks {
    pub fn new(scheme: &str, host: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(&format!("{}://{}", scheme, host))?;
        Ok(Self { base })
    }

    /// Link opening the app from a channel
    pub fn start_app_uri(&self) -> String {
        self.with_path(&[START_APP_ACTION_PATH])
    }

    /// Link playing one movie from a program
    pub fn play_video_uri(&self, movie_id: MovieId) -> String {
        self.with_path(&[PLAY_VIDEO_ACTION_PATH, &movie_id.to_string()])
    }

    /// Extract the movie id from a play-video link
    ///
    /// Returns `None` when the link belongs to another app or does not ask for
    /// a video to be played.
    pub fn parse_video_id(&self, uri: &str) -> Option<MovieId> {
        let url = Url::parse(uri).ok()?;
        if url.scheme() != self.base.scheme() || url.host_str() != self.base.host_str() {
            return None;
        }
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [action, id] if *action == PLAY_VIDEO_ACTION_PATH => id.parse().ok(),
            _ => None,
        }
    }

    fn with_path(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }
}

impl Default for AppLinks {
    fn default() -> Self {
        Self {
            base: Url::parse(&format!("{}://{}", DEFAULT_SCHEME, DEFAULT_HOST))
                .expect("default app link base is a valid url"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_video_uri_round_trips() {
        let links = AppLinks::default();
        let uri = links.play_video_uri(4);

        assert!(uri.starts_with("watchnextcodelab://"));
        assert!(uri.ends_with("/playvideo/4"));
        assert_eq!(links.parse_video_id(&uri), Some(4));
    }

    #[test]
    fn test_parse_video_id_rejects_other_links() {
        let links = AppLinks::default();

        assert_eq!(links.parse_video_id(&links.start_app_uri()), None);
        assert_eq!(links.parse_video_id("watchnextcodelab://com.example.android.watchnextcodelab/playvideo/abc"), None);
        assert_eq!(links.parse_video_id("watchnextcodelab://com.example.android.watchnextcodelab/playvideo/4/extra"), None);
        assert_eq!(links.parse_video_id("https://example.com/playvideo/4"), None);
        assert_eq!(links.parse_video_id("watchnextcodelab://other.host/playvideo/4"), None);
        assert_eq!(links.parse_video_id("watchnextcodelab:///playvideo/4"), None);
        assert_eq!(links.parse_video_id("not a uri"), None);
    }

    #[test]
    fn test_custom_scheme() {
        let links = AppLinks::new("myapp", "tv.example").unwrap();
        assert_eq!(links.parse_video_id("myapp://tv.example/playvideo/12"), Some(12));
        assert_eq!(links.parse_video_id("watchnextcodelab://tv.example/playvideo/12"), None);
        assert_eq!(links.parse_video_id("myapp://other.example/playvideo/12"), None);
    }
}
