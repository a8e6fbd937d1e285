//! All data types used by e621 for deserializing/serializing API responses.
//!
//! [`Post`], [`File`], [`Score`], [`Tags`] and [`Relationships`] require the fields the api always
//! sends and fail to decode without them. Everything else on a post is optional on the wire.
//! Unknown fields are ignored everywhere, which also drops `tags.invalid` and
//! `relationships.has_active_children`.
use {
    crate::{
        bail, error::Result, file_type::FileType, rating::Rating, utils::null_as_default,
    },
    chrono::{DateTime, Utc},
    hashbrown::HashMap,
    serde::{Deserialize, Serialize, de::DeserializeOwned},
    std::fmt,
    tracing::debug,
};

/// Identifier of a post.
pub type PostId = i64;

/// Identifier of a pool.
pub type PoolId = i64;

/// decode any model from a json string, logging what was decoded
///
/// # Errors
///
/// returns an error if `json` is blank, isn't valid json or doesn't match `T`
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T> {
    if json.trim().is_empty() {
        bail!("nothing to decode, expected a post or a posts response");
    }

    let value = serde_json::from_str(json)?;
    debug!(
        bytes = json.len(),
        ty = std::any::type_name::<T>(),
        "decoded api response"
    );

    Ok(value)
}

/// Response from e621 API containing multiple posts, typically from a search or listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsResponse {
    /// List of posts returned by the API.
    pub posts: Vec<Post>,
}

/// Response from e621 API containing a single post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    /// The post object returned by the API.
    pub post: Post,
}

/// Any of the shapes posts come back in: a listing, a single post response, a bare post, or a
/// plain array of posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnyPosts {
    /// `{"posts": [...]}`
    Listing(PostsResponse),
    /// `{"post": {...}}`
    Single(PostResponse),
    /// a post object on its own
    Bare(Box<Post>),
    /// `[...]`
    Array(Vec<Post>),
}

impl AnyPosts {
    /// flatten into a list of posts
    pub fn into_posts(self) -> Vec<Post> {
        match self {
            Self::Listing(listing) => listing.posts,
            Self::Single(single) => vec![single.post],
            Self::Bare(post) => vec![*post],
            Self::Array(posts) => posts,
        }
    }
}

/// A single post and everything the api says about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier for the post.
    pub id: PostId,
    /// Information about the original uploaded file.
    pub file: File,
    /// Vote score statistics for the post.
    pub score: Score,
    /// Categorized tags associated with the post.
    pub tags: Tags,
    /// Content rating.
    pub rating: Rating,
    /// Description or commentary for the post, in DText.
    pub description: String,
    /// Parent/child relationship data for post hierarchies.
    pub relationships: Relationships,
    /// When the post was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the post was last updated, if ever.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Information about the preview/thumbnail image.
    #[serde(default)]
    pub preview: Preview,
    /// Information about the sample/resized version (if available).
    #[serde(default)]
    pub sample: Sample,
    /// Tags that are locked and cannot be removed from the post.
    #[serde(default)]
    pub locked_tags: Vec<String>,
    /// Sequence number of the post's latest revision.
    #[serde(default)]
    pub change_seq: i64,
    /// Various status flags for the post.
    #[serde(default)]
    pub flags: Flags,
    /// Number of users who have favorited this post.
    #[serde(default)]
    pub fav_count: i64,
    /// List of source URLs where the content originated from.
    #[serde(default)]
    pub sources: Vec<String>,
    /// IDs of pools that this post belongs to.
    #[serde(default)]
    pub pools: Vec<PoolId>,
    /// ID of the user who approved the post.
    #[serde(default)]
    pub approver_id: Option<i64>,
    /// ID of the user who uploaded the post.
    #[serde(default)]
    pub uploader_id: i64,
    /// Number of comments on the post.
    #[serde(default)]
    pub comment_count: i64,
    /// Whether the currently authenticated user has favorited this post.
    #[serde(default)]
    pub is_favorited: bool,
    /// Whether the post has notes.
    #[serde(default)]
    pub has_notes: bool,
    /// Duration in seconds for video posts.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Post {
    /// whether the post was deleted
    pub fn is_deleted(&self) -> bool {
        self.flags.deleted
    }

    /// the url of the page for this post on a given instance
    pub fn page_url(&self, base_url: &str) -> String {
        format!("{}/posts/{}", base_url.trim_end_matches('/'), self.id)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] {}x{} {} score:{} favs:{}",
            self.id,
            self.rating.short_name(),
            self.file.width,
            self.file.height,
            self.file.extension,
            self.score.total,
            self.fav_count,
        )?;

        let artists = self.tags.artist.join(", ");
        if !artists.is_empty() {
            write!(f, " by {}", artists)?;
        }

        Ok(())
    }
}

/// Contains metadata about the original uploaded file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct File {
    /// Width of the original file in pixels.
    pub width: i64,
    /// Height of the original file in pixels.
    pub height: i64,
    /// File extension (e.g., "jpg", "png", "webm").
    #[serde(rename = "ext")]
    pub extension: String,
    /// File size in bytes.
    pub size: i64,
    /// MD5 hash of the file, 32 hex characters.
    pub md5: String,
    /// Direct URL to the original file, empty when the api withholds it.
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

impl File {
    /// the parsed file type
    pub fn file_type(&self) -> FileType {
        FileType::from_extension(&self.extension)
    }
}

/// Contains metadata about the preview/thumbnail image.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Preview {
    /// Width of the preview image in pixels.
    #[serde(default)]
    pub width: i64,
    /// Height of the preview image in pixels.
    #[serde(default)]
    pub height: i64,
    /// Direct URL to the preview image.
    #[serde(default)]
    pub url: Option<String>,
}

/// Contains metadata about the sample/resized version of the post.
/// Samples are larger than previews but smaller than the original file.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Whether a sample version is available for this post.
    #[serde(default)]
    pub has: bool,
    /// Width of the sample image in pixels.
    #[serde(default)]
    pub width: i64,
    /// Height of the sample image in pixels.
    #[serde(default)]
    pub height: i64,
    /// Direct URL to the sample image.
    #[serde(default)]
    pub url: Option<String>,
    /// Alternate versions and qualities available (primarily for video posts).
    #[serde(default)]
    pub alternates: Alternates,
}

/// Contains alternate versions of the post, such as original video files and different quality levels.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternates {
    /// Whether alternate versions are available.
    #[serde(default)]
    pub has: bool,
    /// Original video file information (for video posts).
    #[serde(default)]
    pub original: Option<Quality>,
    /// Video variants in different formats.
    #[serde(default)]
    pub variants: Option<Variants>,
    /// Sample versions keyed by quality name (e.g., "720p", "480p").
    #[serde(default)]
    pub samples: Option<HashMap<String, Quality>>,
}

/// Contains video variants in different formats.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variants {
    /// MP4 variant of the video.
    #[serde(default)]
    pub mp4: Option<Quality>,
    /// WebM variant of the video.
    #[serde(default)]
    pub webm: Option<Quality>,
}

/// Metadata for one encoding of a post's media.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quality {
    /// Frames per second (for video samples).
    #[serde(default)]
    pub fps: f64,
    /// File size in bytes.
    #[serde(default)]
    pub size: i64,
    /// Video codec used.
    #[serde(default)]
    pub codec: Option<String>,
    /// Width in pixels.
    #[serde(default)]
    pub width: i64,
    /// Height in pixels.
    #[serde(default)]
    pub height: i64,
    /// Direct URL to this encoding.
    #[serde(default)]
    pub url: Option<String>,
}

/// Contains vote score statistics for a post.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Number of upvotes.
    pub up: i64,
    /// Number of downvotes (negative or zero).
    pub down: i64,
    /// Total score (upvotes plus downvotes).
    pub total: i64,
}

/// A tag category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    /// General descriptive tags.
    General,
    /// Species tags.
    Species,
    /// Character tags.
    Character,
    /// Copyright tags.
    Copyright,
    /// Artist tags.
    Artist,
    /// Lore tags.
    Lore,
    /// Meta tags.
    Meta,
}

impl TagCategory {
    /// every category, in the order the api lists them
    pub const ALL: [TagCategory; 7] = [
        TagCategory::General,
        TagCategory::Species,
        TagCategory::Character,
        TagCategory::Copyright,
        TagCategory::Artist,
        TagCategory::Lore,
        TagCategory::Meta,
    ];

    /// the json key of the category
    pub fn name(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Species => "species",
            Self::Character => "character",
            Self::Copyright => "copyright",
            Self::Artist => "artist",
            Self::Lore => "lore",
            Self::Meta => "meta",
        }
    }

    /// the numeric id e621 uses for the category in its tag database
    pub fn id(self) -> u8 {
        match self {
            Self::General => 0,
            Self::Artist => 1,
            Self::Copyright => 3,
            Self::Character => 4,
            Self::Species => 5,
            Self::Meta => 7,
            Self::Lore => 8,
        }
    }
}

/// Contains all tags for a post, organized by category.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    /// General descriptive tags.
    pub general: Vec<String>,
    /// Species tags.
    pub species: Vec<String>,
    /// Character tags.
    pub character: Vec<String>,
    /// Copyright tags.
    pub copyright: Vec<String>,
    /// Artist tags.
    pub artist: Vec<String>,
    /// Lore tags.
    pub lore: Vec<String>,
    /// Meta tags (e.g. "comic", "hi_res").
    pub meta: Vec<String>,
}

impl Tags {
    /// the tags of a single category
    pub fn get(&self, category: TagCategory) -> &[String] {
        match category {
            TagCategory::General => &self.general,
            TagCategory::Species => &self.species,
            TagCategory::Character => &self.character,
            TagCategory::Copyright => &self.copyright,
            TagCategory::Artist => &self.artist,
            TagCategory::Lore => &self.lore,
            TagCategory::Meta => &self.meta,
        }
    }

    /// every tag, most identifying categories first
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.artist
            .iter()
            .chain(&self.copyright)
            .chain(&self.character)
            .chain(&self.species)
            .chain(&self.general)
            .chain(&self.lore)
            .chain(&self.meta)
            .map(String::as_str)
    }

    /// the tags that identify what a post is: copyright, artist and character
    pub fn reduced(&self) -> impl Iterator<Item = &str> {
        self.copyright
            .iter()
            .chain(&self.artist)
            .chain(&self.character)
            .map(String::as_str)
    }

    /// whether any category has the tag
    pub fn contains(&self, tag: &str) -> bool {
        self.all().any(|t| t == tag)
    }

    /// total number of tags across all categories
    pub fn len(&self) -> usize {
        TagCategory::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    /// whether the post has no tags at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Contains various status flags for a post.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    /// Whether the post is pending approval.
    #[serde(default)]
    pub pending: bool,
    /// Whether the post has been flagged for review.
    #[serde(default)]
    pub flagged: bool,
    /// Whether notes are locked.
    #[serde(default)]
    pub note_locked: bool,
    /// Whether the status is locked.
    #[serde(default)]
    pub status_locked: bool,
    /// Whether the rating is locked.
    #[serde(default)]
    pub rating_locked: bool,
    /// Whether the post has been deleted.
    #[serde(default)]
    pub deleted: bool,
}

/// Contains parent/child relationship data for post hierarchies.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationships {
    /// ID of the parent post, if this is a child post.
    pub parent_id: Option<PostId>,
    /// Whether this post has any child posts.
    pub has_children: bool,
    /// IDs of child posts, in the order the api lists them.
    pub children: Vec<PostId>,
}

impl Relationships {
    /// whether the post has a parent
    pub fn is_child(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// A pool (ordered collection) of posts, such as comic pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    /// Unique identifier for the pool.
    pub id: PoolId,
    /// Name of the pool, with underscores for spaces.
    pub name: String,
    /// Description of the pool, in DText.
    #[serde(default)]
    pub description: String,
    /// When the pool was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the pool was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// ID of the user who created the pool.
    #[serde(default)]
    pub creator_id: i64,
    /// Username of the user who created the pool.
    #[serde(default)]
    pub creator_name: String,
    /// Whether the pool is active.
    #[serde(default)]
    pub is_active: bool,
    /// Category of the pool ("series" or "collection").
    #[serde(default)]
    pub category: String,
    /// IDs of posts in the pool, in order.
    #[serde(default)]
    pub post_ids: Vec<PostId>,
    /// Number of posts in the pool.
    #[serde(default)]
    pub post_count: i64,
}

impl Pool {
    /// the pool name with underscores replaced by spaces
    pub fn normalized_name(&self) -> String {
        self.name.replace('_', " ")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use {super::*, serde_json::json};

    /// a full post as the api returns it
    pub(crate) fn sample_post_json() -> serde_json::Value {
        json!({
            "id": 100,
            "created_at": "2022-08-01T12:00:00.000-04:00",
            "updated_at": null,
            "file": {
                "width": 1920,
                "height": 1080,
                "ext": "png",
                "size": 577161,
                "md5": "0123456789abcdef0123456789abcdef",
                "url": "https://static1.e621.net/data/01/23/0123456789abcdef0123456789abcdef.png"
            },
            "preview": { "width": 150, "height": 84, "url": "https://static1.e621.net/data/preview/01/23/x.jpg", "alt": null },
            "sample": {
                "has": true,
                "height": 478,
                "width": 850,
                "url": "https://static1.e621.net/data/sample/01/23/x.jpg",
                "alternates": {}
            },
            "score": { "up": 11, "down": 0, "total": 11 },
            "tags": {
                "general": ["sketch_page"],
                "species": ["canid"],
                "character": ["flora_(twokinds)"],
                "copyright": ["twokinds"],
                "artist": ["conditional_dnp", "tom_fischbach"],
                "contributor": [],
                "invalid": ["not_a_tag"],
                "lore": [],
                "meta": ["2022", "monochrome", "sketch"]
            },
            "locked_tags": ["conditional_dnp"],
            "change_seq": 37318403,
            "flags": {
                "pending": true,
                "flagged": false,
                "note_locked": false,
                "status_locked": false,
                "rating_locked": false,
                "deleted": false
            },
            "rating": "s",
            "fav_count": 3,
            "sources": [],
            "pools": [],
            "relationships": {
                "parent_id": null,
                "has_children": false,
                "has_active_children": true,
                "children": []
            },
            "approver_id": null,
            "uploader_id": 0,
            "description": "a sketch",
            "comment_count": 2,
            "is_favorited": false,
            "has_notes": false,
            "duration": null
        })
    }

    /// a decoded [`sample_post_json`]
    pub(crate) fn sample_post() -> Post {
        serde_json::from_value(sample_post_json()).unwrap()
    }

    #[test]
    fn test_file_fields_survive_decoding() {
        let file: File = serde_json::from_value(json!({
            "width": 800,
            "height": 600,
            "ext": "webm",
            "size": 1234,
            "md5": "ffffffffffffffffffffffffffffffff",
            "url": "https://x/y.webm"
        }))
        .unwrap();

        assert_eq!(file.width, 800);
        assert_eq!(file.height, 600);
        assert_eq!(file.extension, "webm");
        assert_eq!(file.size, 1234);
        assert_eq!(file.md5, "ffffffffffffffffffffffffffffffff");
        assert_eq!(file.url, "https://x/y.webm");
        assert_eq!(file.file_type(), FileType::Webm);
    }

    #[test]
    fn test_file_serializes_extension_as_ext() {
        let value = serde_json::to_value(sample_post().file).unwrap();
        assert_eq!(value["ext"], "png");
        assert!(value.get("extension").is_none());
    }

    #[test]
    fn test_file_null_url_is_empty() {
        let mut raw = sample_post_json()["file"].clone();
        raw["url"] = json!(null);
        let file: File = serde_json::from_value(raw).unwrap();
        assert_eq!(file.url, "");
    }

    #[test]
    fn test_post_fields_survive_decoding() {
        let post = sample_post();

        assert_eq!(post.id, 100);
        assert_eq!(post.rating, Rating::Safe);
        assert_eq!(post.description, "a sketch");
        assert_eq!(
            post.score,
            Score {
                up: 11,
                down: 0,
                total: 11
            }
        );
        assert_eq!(post.tags.artist, vec!["conditional_dnp", "tom_fischbach"]);
        assert_eq!(post.tags.meta, vec!["2022", "monochrome", "sketch"]);
        assert_eq!(post.file.size, 577161);
        assert!(post.flags.pending);
        assert_eq!(post.fav_count, 3);
        assert_eq!(post.updated_at, None);
        assert_eq!(
            post.created_at.unwrap().to_rfc3339(),
            "2022-08-01T16:00:00+00:00"
        );
    }

    #[test]
    fn test_post_ignores_unknown_fields() {
        let mut raw = sample_post_json();
        raw["brand_new_field"] = json!({ "nested": [1, 2, 3] });
        raw["uploader_name"] = json!("someone");

        assert!(serde_json::from_value::<Post>(raw).is_ok());
    }

    #[test]
    fn test_decode_blank_input() {
        let err = decode::<AnyPosts>("  \n").unwrap_err();
        assert!(matches!(err, crate::error::E6Error::Other(_)));

        let err = decode::<AnyPosts>("{").unwrap_err();
        assert!(matches!(err, crate::error::E6Error::Json(_)));
    }

    #[test]
    fn test_nested_types_ignore_unknown_fields() {
        let mut raw = sample_post_json();
        raw["file"]["bogus"] = json!(1);
        raw["tags"]["bogus"] = json!(["x"]);
        raw["relationships"]["bogus"] = json!(true);

        let post: Post = serde_json::from_value(raw.clone()).unwrap();
        assert!(!post.tags.contains("x"));

        assert!(serde_json::from_value::<File>(raw["file"].clone()).is_ok());
        assert!(serde_json::from_value::<Tags>(raw["tags"].clone()).is_ok());
        assert!(serde_json::from_value::<Relationships>(raw["relationships"].clone()).is_ok());
    }

    #[test]
    fn test_post_with_only_core_fields() {
        let post: Post = serde_json::from_value(json!({
            "id": 7,
            "file": sample_post_json()["file"].clone(),
            "score": { "up": 1, "down": -2, "total": -1 },
            "tags": {
                "general": [], "species": [], "character": [], "copyright": [],
                "artist": [], "lore": [], "meta": []
            },
            "rating": "q",
            "description": "",
            "relationships": { "parent_id": 123, "has_children": false, "children": [] }
        }))
        .unwrap();

        assert_eq!(post.id, 7);
        assert_eq!(post.rating, Rating::Questionable);
        assert_eq!(post.relationships.parent_id, Some(123));
        assert_eq!(post.sample, Sample::default());
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_post_missing_required_field_fails() {
        let mut raw = sample_post_json();
        raw.as_object_mut().unwrap().remove("score");
        assert!(serde_json::from_value::<Post>(raw).is_err());

        let mut raw = sample_post_json();
        raw["file"].as_object_mut().unwrap().remove("md5");
        assert!(serde_json::from_value::<Post>(raw).is_err());
    }

    #[test]
    fn test_relationships_parent_id() {
        let orphan: Relationships = serde_json::from_value(json!({
            "parent_id": null,
            "has_children": true,
            "has_active_children": false,
            "children": [5, 3, 9]
        }))
        .unwrap();

        assert_eq!(orphan.parent_id, None);
        assert!(!orphan.is_child());
        assert!(orphan.has_children);
        assert_eq!(orphan.children, vec![5, 3, 9]);

        let child: Relationships = serde_json::from_value(json!({
            "parent_id": 123,
            "has_children": false,
            "children": []
        }))
        .unwrap();

        assert_eq!(child.parent_id, Some(123));
        assert!(child.is_child());
    }

    #[test]
    fn test_discarded_fields_do_not_come_back() {
        let post = sample_post();
        let value = serde_json::to_value(&post).unwrap();

        assert!(value["tags"].get("invalid").is_none());
        assert!(value["tags"].get("contributor").is_none());
        assert!(value["relationships"].get("has_active_children").is_none());
        assert!(!post.tags.contains("not_a_tag"));
    }

    #[test]
    fn test_tags_all_and_reduced_order() {
        let tags = sample_post().tags;

        assert_eq!(
            tags.all().collect::<Vec<_>>(),
            vec![
                "conditional_dnp",
                "tom_fischbach",
                "twokinds",
                "flora_(twokinds)",
                "canid",
                "sketch_page",
                "2022",
                "monochrome",
                "sketch"
            ]
        );
        assert_eq!(
            tags.reduced().collect::<Vec<_>>(),
            vec![
                "twokinds",
                "conditional_dnp",
                "tom_fischbach",
                "flora_(twokinds)"
            ]
        );
        assert_eq!(tags.len(), 9);
        assert_eq!(tags.get(TagCategory::Species), ["canid".to_string()]);
    }

    #[test]
    fn test_posts_response() {
        let response: PostsResponse = decode(
            &json!({ "posts": [sample_post_json(), sample_post_json()] }).to_string(),
        )
        .unwrap();

        assert_eq!(response.posts.len(), 2);
    }

    #[test]
    fn test_any_posts_shapes() {
        let post = sample_post_json();
        let shapes = [
            json!({ "posts": [post.clone()] }),
            json!({ "post": post.clone() }),
            post.clone(),
            json!([post]),
        ];

        for shape in shapes {
            let posts = decode::<AnyPosts>(&shape.to_string()).unwrap().into_posts();
            assert_eq!(posts.len(), 1);
            assert_eq!(posts[0].id, 100);
        }
    }

    #[test]
    fn test_post_display() {
        assert_eq!(
            sample_post().to_string(),
            "#100 [s] 1920x1080 png score:11 favs:3 by conditional_dnp, tom_fischbach"
        );
    }

    #[test]
    fn test_pool_normalized_name() {
        let pool: Pool = serde_json::from_value(json!({
            "id": 1,
            "name": "my_cool_comic",
            "created_at": "2020-01-01T00:00:00Z",
            "post_ids": [4, 2, 8],
            "post_count": 3,
            "is_active": true,
            "category": "series"
        }))
        .unwrap();

        assert_eq!(pool.normalized_name(), "my cool comic");
        assert_eq!(pool.post_ids, vec![4, 2, 8]);
    }
}
