//! building the tag string for post searches
use {
    crate::{
        file_type::{FileType, PostType},
        models::{PoolId, PostId},
        query::{ALTERNATIVE, EXCLUDED},
        rating::Rating,
    },
    hashbrown::HashSet,
    serde::{Deserialize, Serialize},
    std::collections::BTreeSet,
    tracing::debug,
};

/// the most posts the api returns for one request
pub const MAX_POSTS_IN_QUERY: u32 = 500;

/// clamp a requested page size to what the api allows
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_POSTS_IN_QUERY)
}

/// The order search results are returned in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// newest first, the api's default
    #[default]
    NewestToOldest,
    /// by score
    Score,
    /// by favorite count
    FavoriteCount,
    /// by tag count
    TagCount,
    /// by comment count
    CommentCount,
    /// by resolution
    Resolution,
    /// by file size
    FileSize,
    /// widest aspect ratio first
    WidestFirst,
    /// by video duration
    Duration,
    /// by last change
    Change,
    /// random
    Random,
}

impl Order {
    /// the `order:` value for descending results, `None` for the default order
    pub fn api_name(self) -> Option<&'static str> {
        match self {
            Self::NewestToOldest => None,
            Self::Score => Some("score"),
            Self::FavoriteCount => Some("favcount"),
            Self::TagCount => Some("tagcount"),
            Self::CommentCount => Some("comment_count"),
            Self::Resolution => Some("mpixels"),
            Self::FileSize => Some("filesize"),
            Self::WidestFirst => Some("landscape"),
            Self::Duration => Some("duration"),
            Self::Change => Some("change"),
            Self::Random => Some("random"),
        }
    }

    /// the `order:` value for ascending results
    pub fn ascending_api_name(self) -> Option<&'static str> {
        match self {
            Self::NewestToOldest => Some("id"),
            Self::WidestFirst => Some("portrait"),
            Self::Change | Self::Random => None,
            Self::Score => Some("score_asc"),
            Self::FavoriteCount => Some("favcount_asc"),
            Self::TagCount => Some("tagcount_asc"),
            Self::CommentCount => Some("comment_count_asc"),
            Self::Resolution => Some("mpixels_asc"),
            Self::FileSize => Some("filesize_asc"),
            Self::Duration => Some("duration_asc"),
        }
    }

    /// whether the order can be reversed
    pub fn supports_ascending(self) -> bool {
        self.ascending_api_name().is_some()
    }

    /// whether results in this order can be paged through
    pub fn supports_paging(self) -> bool {
        self != Self::Random
    }
}

/// Everything a post search can be narrowed down by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostsSearchOptions {
    /// tags that must all be present
    pub all_of: BTreeSet<String>,
    /// tags that must be absent
    pub none_of: BTreeSet<String>,
    /// tags of which at least one must be present
    pub any_of: BTreeSet<String>,
    /// result order
    pub order: Order,
    /// reverse the order, if it supports that
    pub order_ascending: bool,
    /// allowed ratings, empty for all
    pub rating: Vec<Rating>,
    /// only posts favorited by this user
    pub favourites_of: Option<String>,
    /// allowed post types, empty for all
    pub types: BTreeSet<PostType>,
    /// only children of this post
    pub parent: Option<PostId>,
    /// only posts in this pool
    pub pool_id: Option<PoolId>,
}

impl PostsSearchOptions {
    /// start building options
    pub fn builder() -> PostsSearchOptionsBuilder {
        PostsSearchOptionsBuilder::default()
    }

    /// start building from existing options
    pub fn to_builder(&self) -> PostsSearchOptionsBuilder {
        PostsSearchOptionsBuilder {
            options: self.clone(),
        }
    }

    /// options listing the posts of a pool in reading order
    pub fn for_pool(pool_id: PoolId) -> Self {
        Self {
            pool_id: Some(pool_id),
            order: Order::NewestToOldest,
            order_ascending: true,
            ..Default::default()
        }
    }

    /// options listing a user's favorites
    pub fn for_favourites_of(user: impl Into<String>) -> Self {
        Self {
            favourites_of: Some(user.into()),
            ..Default::default()
        }
    }

    /// compile the options into the tag string the api expects
    pub fn compile_to_query(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        parts.extend(self.all_of.iter().cloned());
        parts.extend(self.none_of.iter().map(|t| format!("{EXCLUDED}{t}")));
        parts.extend(self.any_of.iter().map(|t| format!("{ALTERNATIVE}{t}")));
        parts.extend(optimize_rating_selection(&self.rating));
        parts.extend(self.file_type_terms());

        if let Some(user) = &self.favourites_of {
            parts.push(format!("fav:{user}"));
        }

        let order = if self.order_ascending {
            self.order.ascending_api_name()
        } else {
            self.order.api_name()
        };

        if let Some(order) = order {
            parts.push(format!("order:{order}"));
        }

        if let Some(parent) = self.parent {
            parts.push(format!("parent:{parent}"));
        }

        if let Some(pool_id) = self.pool_id.filter(|id| *id > 0) {
            parts.push(format!("pool:{pool_id}"));
        }

        let query = parts.join(" ");
        debug!(query = %query, "built search query");
        query
    }

    /// filetype terms for the selected post types
    ///
    /// the api can't OR file types together, so several types are expressed by excluding every
    /// other type instead
    fn file_type_terms(&self) -> Vec<String> {
        let selected: Vec<FileType> = self
            .types
            .iter()
            .flat_map(|ty| ty.file_types())
            .collect();

        match selected.as_slice() {
            [] => Vec::new(),
            [single] => vec![format!("filetype:{single}")],
            _ => FileType::KNOWN
                .into_iter()
                .filter(|ty| !selected.contains(ty))
                .map(|ty| format!("{EXCLUDED}filetype:{ty}"))
                .collect(),
        }
    }
}

/// turn a rating selection into as few terms as possible
///
/// selecting more than half of the ratings is written as excluding the rest
fn optimize_rating_selection(selection: &[Rating]) -> Vec<String> {
    let selected: HashSet<&Rating> = selection.iter().filter(|r| r.is_known()).collect();

    if selected.len() > Rating::KNOWN.len() / 2 {
        Rating::KNOWN
            .iter()
            .filter(|r| !selected.contains(r))
            .map(|r| format!("{EXCLUDED}rating:{}", r.api_name()))
            .collect()
    } else {
        Rating::KNOWN
            .iter()
            .filter(|r| selected.contains(r))
            .map(|r| format!("rating:{}", r.api_name()))
            .collect()
    }
}

/// Builder for [`PostsSearchOptions`].
#[derive(Debug, Clone, Default)]
pub struct PostsSearchOptionsBuilder {
    /// the options being built
    options: PostsSearchOptions,
}

impl PostsSearchOptionsBuilder {
    /// require a tag
    pub fn all_of(mut self, tag: impl Into<String>) -> Self {
        self.options.all_of.insert(tag.into());
        self
    }

    /// exclude a tag
    pub fn none_of(mut self, tag: impl Into<String>) -> Self {
        self.options.none_of.insert(tag.into());
        self
    }

    /// add an alternative tag
    pub fn any_of(mut self, tag: impl Into<String>) -> Self {
        self.options.any_of.insert(tag.into());
        self
    }

    /// set the order
    pub fn order(mut self, order: Order, ascending: bool) -> Self {
        self.options.order = order;
        self.options.order_ascending = ascending && order.supports_ascending();
        self
    }

    /// allow a rating
    pub fn rating(mut self, rating: Rating) -> Self {
        if !self.options.rating.contains(&rating) {
            self.options.rating.push(rating);
        }
        self
    }

    /// only posts favorited by a user
    pub fn favourites_of(mut self, user: impl Into<String>) -> Self {
        self.options.favourites_of = Some(user.into());
        self
    }

    /// allow a post type
    pub fn post_type(mut self, ty: PostType) -> Self {
        self.options.types.insert(ty);
        self
    }

    /// only children of a post
    pub fn parent(mut self, parent: PostId) -> Self {
        self.options.parent = Some(parent);
        self
    }

    /// only posts in a pool
    pub fn pool(mut self, pool_id: PoolId) -> Self {
        self.options.pool_id = Some(pool_id);
        self
    }

    /// finish building
    pub fn build(self) -> PostsSearchOptions {
        self.options
    }
}
