//! file types posts can be uploaded as
use {
    crate::utils::url_extension,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// The type of a post's file, keyed by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// a jpeg image
    Jpg,
    /// a png image
    Png,
    /// a (possibly animated) gif
    Gif,
    /// a flash file
    Swf,
    /// a webm video
    Webm,
    /// an mp4 video
    Mp4,
    /// anything else
    #[serde(other)]
    Undefined,
}

impl FileType {
    /// every file type that has a real extension
    pub const KNOWN: [FileType; 6] = [
        FileType::Jpg,
        FileType::Png,
        FileType::Gif,
        FileType::Swf,
        FileType::Webm,
        FileType::Mp4,
    ];

    /// the file extension, as the api spells it
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Swf => "swf",
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
            Self::Undefined => "undefined",
        }
    }

    /// look up a file type by extension, ignoring case
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpg,
            "png" => Self::Png,
            "gif" => Self::Gif,
            "swf" => Self::Swf,
            "webm" => Self::Webm,
            "mp4" => Self::Mp4,
            _ => Self::Undefined,
        }
    }

    /// guess the file type from the extension at the end of a url
    pub fn from_url(url: &str) -> Self {
        url_extension(url).map_or(Self::Undefined, Self::from_extension)
    }

    /// whether the file can be shown at all
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Swf | Self::Undefined)
    }

    /// whether the file is a still or animated image
    pub fn is_image(self) -> bool {
        matches!(self, Self::Jpg | Self::Png | Self::Gif)
    }

    /// whether the file is a video
    pub fn is_video(self) -> bool {
        matches!(self, Self::Webm | Self::Mp4)
    }

    /// sort key used to order files by type before resolution
    pub fn weight(self) -> u8 {
        match self {
            Self::Gif => 1,
            Self::Webm | Self::Mp4 => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A coarse grouping of file types, used when searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PostType {
    /// png and jpg
    Image,
    /// gif
    Animation,
    /// webm and mp4
    Video,
}

impl PostType {
    /// the file types that fall under this post type
    pub fn file_types(self) -> Vec<FileType> {
        match self {
            Self::Image => vec![FileType::Png, FileType::Jpg],
            Self::Animation => vec![FileType::Gif],
            Self::Video => FileType::KNOWN
                .into_iter()
                .filter(|ty| ty.is_video())
                .collect(),
        }
    }
}
