//! Pure extraction of a usable media URL from a completed job's result

use thiserror::Error;

use crate::api::models::{JobResult, MediaItem};

#[derive(Debug, Error)]
#[error("no media url in result payload")]
pub struct NoMediaUrl;

/// Pick the media URL out of a result payload.
///
/// A list yields its first element; within the item the first present
/// field among `mediaUrl`, `video`, `image` wins, in that order.
pub fn media_url(result: &JobResult) -> Result<&str, NoMediaUrl> {
    let item = match result {
        JobResult::Many(items) => items.first().ok_or(NoMediaUrl)?,
        JobResult::One(item) => item,
    };
    first_url(item).ok_or(NoMediaUrl)
}

fn first_url(item: &MediaItem) -> Option<&str> {
    item.media_url
        .as_deref()
        .or(item.video.as_deref())
        .or(item.image.as_deref())
}

/// How the collaborator should render a result URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Video when the URL path ends in `.mp4` or `.webm`; query strings and
/// case are ignored. Everything else renders as an image.
pub fn classify(url: &str) -> MediaKind {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_ascii_lowercase(),
    };

    if path.ends_with(".mp4") || path.ends_with(".webm") {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(media_url: Option<&str>, video: Option<&str>, image: Option<&str>) -> MediaItem {
        MediaItem {
            media_url: media_url.map(String::from),
            video: video.map(String::from),
            image: image.map(String::from),
        }
    }

    #[test]
    fn test_list_uses_first_element() {
        let result = JobResult::Many(vec![
            item(None, Some("https://x/a.mp4"), None),
            item(Some("https://x/ignored.png"), None, None),
        ]);
        assert_eq!(media_url(&result).unwrap(), "https://x/a.mp4");
    }

    #[test]
    fn test_single_item_image_field() {
        let result = JobResult::One(item(None, None, Some("https://x/b.png")));
        assert_eq!(media_url(&result).unwrap(), "https://x/b.png");
    }

    #[test]
    fn test_field_priority() {
        let result = JobResult::One(item(
            Some("https://x/media.png"),
            Some("https://x/video.mp4"),
            Some("https://x/image.png"),
        ));
        assert_eq!(media_url(&result).unwrap(), "https://x/media.png");
    }

    #[test]
    fn test_empty_item_is_an_error() {
        let result = JobResult::One(MediaItem::default());
        assert!(media_url(&result).is_err());
    }

    #[test]
    fn test_empty_list_is_an_error() {
        let result = JobResult::Many(vec![]);
        assert!(media_url(&result).is_err());
    }

    #[test]
    fn test_classify_video() {
        assert_eq!(classify("https://x/a.mp4"), MediaKind::Video);
        assert_eq!(classify("https://x/A.MP4?sig=abc"), MediaKind::Video);
        assert_eq!(classify("https://x/clip.webm#t=3"), MediaKind::Video);
    }

    #[test]
    fn test_classify_image() {
        assert_eq!(classify("https://x/b.png"), MediaKind::Image);
        assert_eq!(classify("https://x/mp4-guide.html"), MediaKind::Image);
    }
}
