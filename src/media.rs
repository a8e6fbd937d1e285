//! a flat view over the original file, the sample and the alternate encodings of a post
use {
    crate::{
        file_type::FileType,
        models::{File, Post, Quality, Sample},
    },
    tracing::warn,
};

/// name given to the original file
pub const ORIGINAL: &str = "original";

/// name given to the default sample
pub const SAMPLE: &str = "sample";

/// One downloadable rendition of a post.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFile {
    /// `original`, `sample`, or the quality name of an alternate (e.g. `720p`)
    pub name: String,
    /// width in pixels
    pub width: i64,
    /// height in pixels
    pub height: i64,
    /// the file type
    pub file_type: FileType,
    /// size in bytes, 0 when unknown
    pub size: i64,
    /// urls this rendition can be fetched from
    pub urls: Vec<String>,
}

impl NormalizedFile {
    /// width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// whether this is the originally uploaded file
    pub fn is_original(&self) -> bool {
        self.name == ORIGINAL
    }

    /// the first url, if any
    pub fn url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }

    /// build from the original file
    pub fn from_file(file: &File) -> Self {
        Self {
            name: ORIGINAL.to_string(),
            width: file.width,
            height: file.height,
            file_type: file.file_type(),
            size: file.size,
            urls: urls_of(Some(&file.url)),
        }
    }

    /// build from the sample, if the post has one
    pub fn from_sample(sample: &Sample) -> Option<Self> {
        if !sample.has {
            return None;
        }

        let url = sample.url.as_deref().unwrap_or_default();
        Some(Self {
            name: SAMPLE.to_string(),
            width: sample.width,
            height: sample.height,
            file_type: FileType::from_url(url),
            size: 0,
            urls: urls_of(Some(url)),
        })
    }

    /// build from an alternate encoding, skipping ones without a url
    pub fn from_quality(name: &str, quality: &Quality) -> Option<Self> {
        let url = quality.url.as_deref().filter(|u| !u.is_empty())?;

        Some(Self {
            name: name.to_string(),
            width: quality.width,
            height: quality.height,
            file_type: FileType::from_url(url),
            size: quality.size,
            urls: vec![url.to_string()],
        })
    }
}

/// the non-empty urls
fn urls_of(url: Option<&str>) -> Vec<String> {
    url.filter(|u| !u.is_empty())
        .map(|u| vec![u.to_string()])
        .unwrap_or_default()
}

impl Post {
    /// the original file
    pub fn normalized_file(&self) -> NormalizedFile {
        NormalizedFile::from_file(&self.file)
    }

    /// the sample, or the original file for posts without one
    pub fn normalized_sample(&self) -> NormalizedFile {
        NormalizedFile::from_sample(&self.sample).unwrap_or_else(|| {
            let original = self.normalized_file();
            if !original.file_type.is_image() {
                warn!(post = self.id, "no sample provided but file is not an image");
            }

            original
        })
    }

    /// every rendition of the post, ordered by file type weight and then by width
    pub fn files(&self) -> Vec<NormalizedFile> {
        let mut files = vec![self.normalized_file()];

        if let Some(sample) = NormalizedFile::from_sample(&self.sample) {
            files.push(sample);
        }

        let alternates = &self.sample.alternates;
        if let Some(samples) = &alternates.samples {
            let mut named: Vec<_> = samples.iter().collect();
            named.sort_by(|a, b| a.0.cmp(b.0));
            files.extend(
                named
                    .into_iter()
                    .filter_map(|(name, quality)| NormalizedFile::from_quality(name, quality)),
            );
        }

        if let Some(variants) = &alternates.variants {
            files.extend(
                [("webm", &variants.webm), ("mp4", &variants.mp4)]
                    .into_iter()
                    .filter_map(|(name, q)| {
                        q.as_ref().and_then(|q| NormalizedFile::from_quality(name, q))
                    }),
            );
        }

        files.sort_by_key(|f| (f.file_type.weight(), f.width));
        files
    }
}
