use rand::Rng;
use url::Url;

pub const PLACEHOLDER_THUMBNAIL: &str = "/placeholder-video-thumbnail.jpg";
pub const UNKNOWN_DURATION: &str = "--:--";

/// Where a `videoUrl` points, decided by the first parser that recognises it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YouTube { id: String },
    Streamable { id: String },
    /// Uploaded to our own API and served from a stream path.
    Internal { path: String },
    Unknown { url: String },
}

type Parser = fn(&str) -> Option<VideoSource>;

const PARSERS: &[Parser] = &[parse_youtube, parse_streamable, parse_internal];

impl VideoSource {
    pub fn parse(url: &str) -> Self {
        PARSERS
            .iter()
            .find_map(|parse| parse(url))
            .unwrap_or_else(|| VideoSource::Unknown {
                url: url.to_string(),
            })
    }

    pub fn thumbnail(&self) -> String {
        match self {
            VideoSource::YouTube { id } => {
                format!("https://img.youtube.com/vi/{id}/maxresdefault.jpg")
            }
            VideoSource::Streamable { id } => format!("https://cdn.streamable.com/image/{id}.jpg"),
            VideoSource::Internal { .. } | VideoSource::Unknown { .. } => {
                PLACEHOLDER_THUMBNAIL.to_string()
            }
        }
    }

    pub fn embed_url(&self) -> String {
        match self {
            VideoSource::YouTube { id } => format!("https://www.youtube.com/embed/{id}"),
            VideoSource::Streamable { id } => format!("https://streamable.com/e/{id}"),
            VideoSource::Internal { path } => path.clone(),
            VideoSource::Unknown { url } => url.clone(),
        }
    }

    pub fn is_recognised(&self) -> bool {
        !matches!(self, VideoSource::Unknown { .. })
    }
}

fn parse_youtube(raw: &str) -> Option<VideoSource> {
    let url = web_url(raw)?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let id = match host {
        "youtu.be" => first_segment(&url)?,
        "youtube.com" => match url.path() {
            "/watch" => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())?,
            path => path.strip_prefix("/embed/")?.split('/').next()?.to_string(),
        },
        _ => return None,
    };

    non_empty(id).map(|id| VideoSource::YouTube { id })
}

fn parse_streamable(raw: &str) -> Option<VideoSource> {
    let url = web_url(raw)?;
    if url.host_str()?.trim_start_matches("www.") != "streamable.com" {
        return None;
    }
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let id = match segments.next()? {
        "e" => segments.next()?,
        id => id,
    };
    non_empty(id.to_string()).map(|id| VideoSource::Streamable { id })
}

fn parse_internal(raw: &str) -> Option<VideoSource> {
    (raw.contains("/api/videos/stream/") || raw.contains("/testvid/")).then(|| {
        VideoSource::Internal {
            path: raw.to_string(),
        }
    })
}

/// Links pasted without a scheme (`youtube.com/watch?v=..`) are read as https.
fn web_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) if !raw.starts_with('/') => {
            Url::parse(&format!("https://{raw}")).ok()
        }
        Err(_) => None,
    }
}

fn first_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

fn non_empty(id: String) -> Option<String> {
    (!id.is_empty()).then_some(id)
}

/// Display filler shown on gallery cards. Not a real media length: minutes
/// come from the card position and seconds from `rng`.
pub fn placeholder_duration(index: usize, source: &VideoSource, rng: &mut impl Rng) -> String {
    if !source.is_recognised() {
        return UNKNOWN_DURATION.to_string();
    }
    let minutes = 3 + index % 8;
    let seconds: u32 = rng.gen_range(0..60);
    format!("{minutes}:{seconds:02}")
}
