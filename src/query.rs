//! local tag queries
//!
//! evaluates e621-style search strings against posts that are already in memory. this is what
//! blacklists run on, and it understands the subset of the search syntax that can be answered
//! from a single post:
//!
//! - `tag` must be present, `-tag` must be absent, and at least one `~tag` must be present
//! - `rating:s` / `r:explicit` compare the rating
//! - `id`, `score`, `favcount` and `comment_count` take `:N`, `:>N`, `:>=N`, `:<N`, `:<=N` and
//!   `:N..M` (inclusive)
use {
    crate::{
        getopt,
        models::{Post, PostsResponse},
        rating::Rating,
    },
    std::{convert::Infallible, str::FromStr},
    tracing::debug,
};

/// prefix marking a term as one of several alternatives
pub const ALTERNATIVE: char = '~';

/// prefix marking a term as excluded
pub const EXCLUDED: char = '-';

/// A numeric post attribute usable in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    /// the post id
    Id,
    /// the total score
    Score,
    /// the favorite count
    FavCount,
    /// the comment count
    CommentCount,
}

impl MetaField {
    /// look up a field by the name used in queries
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "score" => Some(Self::Score),
            "favcount" => Some(Self::FavCount),
            "comment_count" => Some(Self::CommentCount),
            _ => None,
        }
    }

    /// read the field off a post
    pub fn value(self, post: &Post) -> i64 {
        match self {
            Self::Id => post.id,
            Self::Score => post.score.total,
            Self::FavCount => post.fav_count,
            Self::CommentCount => post.comment_count,
        }
    }
}

/// A numeric comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// equal to
    Eq(i64),
    /// greater than
    Gt(i64),
    /// greater than or equal to
    Ge(i64),
    /// less than
    Lt(i64),
    /// less than or equal to
    Le(i64),
    /// within the inclusive range
    Range(i64, i64),
}

impl Comparison {
    /// check a value against the comparison
    pub fn test(self, value: i64) -> bool {
        match self {
            Self::Eq(n) => value == n,
            Self::Gt(n) => value > n,
            Self::Ge(n) => value >= n,
            Self::Lt(n) => value < n,
            Self::Le(n) => value <= n,
            Self::Range(lo, hi) => (lo..=hi).contains(&value),
        }
    }
}

/// A single query term, without its `~`/`-` prefix.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// the post has this tag in any category
    Tag(String),
    /// the post has this rating; `None` for an unrecognized rating name
    Rating(Option<Rating>),
    /// a numeric field satisfies the comparison
    Compare(MetaField, Comparison),
    /// a numeric term on a field that can't be checked locally
    Never,
}

impl Term {
    /// parse a single term
    pub fn parse(raw: &str) -> Self {
        if let Some(term) = Self::parse_numeric(raw) {
            return term;
        }

        if let Some(name) = raw
            .strip_prefix("rating:")
            .or_else(|| raw.strip_prefix("r:"))
        {
            return Self::Rating(Rating::by_any_name(name));
        }

        Self::Tag(raw.to_string())
    }

    /// parse `name:[op]N` and `name:N..M`
    ///
    /// returns `None` when the term doesn't have that shape at all, so it can be treated as a
    /// rating or a plain tag instead
    fn parse_numeric(raw: &str) -> Option<Self> {
        let (name, rest) = raw.split_once(':')?;
        if name.is_empty() {
            return None;
        }

        let (op, rest) = [">=", "<=", ">", "<"]
            .into_iter()
            .find_map(|op| rest.strip_prefix(op).map(|r| (Some(op), r)))
            .unwrap_or((None, rest));

        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return None;
        }

        let (lo, rest) = rest.split_at(digits);
        let hi = rest.strip_prefix("..").unwrap_or(rest);
        if !hi.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let hi = (!hi.is_empty()).then_some(hi);
        if op.is_some() && hi.is_some() {
            return None;
        }

        let Some(field) = MetaField::from_name(name) else {
            return Some(Self::Never);
        };

        let (Ok(lo), hi) = (lo.parse::<i64>(), hi.map(str::parse::<i64>)) else {
            return Some(Self::Never);
        };

        let cmp = match (op, hi) {
            (_, Some(Ok(hi))) => Comparison::Range(lo, hi),
            (_, Some(Err(_))) => return Some(Self::Never),
            (Some(">="), None) => Comparison::Ge(lo),
            (Some("<="), None) => Comparison::Le(lo),
            (Some(">"), None) => Comparison::Gt(lo),
            (Some("<"), None) => Comparison::Lt(lo),
            _ => Comparison::Eq(lo),
        };

        Some(Self::Compare(field, cmp))
    }

    /// check the term against a post
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::Tag(tag) => post.tags.contains(tag),
            Self::Rating(expected) => expected.as_ref() == Some(&post.rating),
            Self::Compare(field, cmp) => cmp.test(field.value(post)),
            Self::Never => false,
        }
    }
}

/// A parsed query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagQuery {
    /// terms that must all match
    pub all_of: Vec<Term>,
    /// terms of which at least one must match, ignored when empty
    pub any_of: Vec<Term>,
    /// terms of which none may match
    pub none_of: Vec<Term>,
}

impl TagQuery {
    /// parse a whitespace separated query
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();

        for part in query.split_whitespace() {
            if let Some(term) = part.strip_prefix(ALTERNATIVE) {
                if !term.is_empty() {
                    parsed.any_of.push(Term::parse(term));
                }
            } else if let Some(term) = part.strip_prefix(EXCLUDED) {
                if !term.is_empty() {
                    parsed.none_of.push(Term::parse(term));
                }
            } else {
                parsed.all_of.push(Term::parse(part));
            }
        }

        parsed
    }

    /// whether the query has no terms (and so matches everything)
    pub fn is_empty(&self) -> bool {
        self.all_of.is_empty() && self.any_of.is_empty() && self.none_of.is_empty()
    }

    /// the tag, if the query is exactly one plain required tag
    pub fn single_tag(&self) -> Option<&str> {
        match (&self.all_of[..], self.any_of.is_empty(), self.none_of.is_empty()) {
            ([Term::Tag(tag)], true, true) => Some(tag),
            _ => None,
        }
    }

    /// check the query against a post
    pub fn matches(&self, post: &Post) -> bool {
        let any = self.any_of.is_empty() || self.any_of.iter().any(|t| t.matches(post));
        let none = !self.none_of.iter().any(|t| t.matches(post));
        let all = self.all_of.iter().all(|t| t.matches(post));

        any && none && all
    }
}

impl FromStr for TagQuery {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// A set of queries; a post matching any of them is hidden.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blacklist {
    /// the parsed rules
    rules: Vec<TagQuery>,
}

impl Blacklist {
    /// parse one rule per entry, skipping blank ones
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|r| TagQuery::parse(r.as_ref()))
                .filter(|q| !q.is_empty())
                .collect(),
        }
    }

    /// the blacklist from the loaded config
    pub fn from_config() -> Self {
        Self::new(getopt!(filter.blacklist))
    }

    /// the parsed rules
    pub fn rules(&self) -> &[TagQuery] {
        &self.rules
    }

    /// whether there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// whether any rule matches the post
    pub fn is_blacklisted(&self, post: &Post) -> bool {
        self.rules.iter().any(|rule| rule.matches(post))
    }

    /// whether the user explicitly searched for something the blacklist hides
    ///
    /// only rules that are a single plain tag count
    pub fn search_includes_blacklisted(&self, search_tags: &[String]) -> bool {
        search_tags.iter().any(|search_tag| {
            self.rules
                .iter()
                .any(|rule| rule.single_tag() == Some(search_tag.as_str()))
        })
    }

    /// drop blacklisted posts unless the search asked for a blacklisted tag
    pub fn filter(&self, posts: Vec<Post>, search_tags: &[String]) -> Vec<Post> {
        if self.search_includes_blacklisted(search_tags) {
            debug!("search includes a blacklisted tag, skipping blacklist");
            return posts;
        }

        let before = posts.len();
        let kept: Vec<Post> = posts
            .into_iter()
            .filter(|post| !self.is_blacklisted(post))
            .collect();
        debug!(removed = before - kept.len(), "applied blacklist");

        kept
    }
}

/// Keeps posts whose total score is within inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreFilter {
    /// lowest allowed score
    pub min: i64,
    /// highest allowed score
    pub max: i64,
}

impl Default for ScoreFilter {
    fn default() -> Self {
        Self {
            min: i64::MIN,
            max: i64::MAX,
        }
    }
}

impl ScoreFilter {
    /// the score window from the loaded config
    pub fn from_config() -> Self {
        Self {
            min: getopt!(filter.min_post_score),
            max: getopt!(filter.max_post_score),
        }
    }

    /// whether the post is inside the window
    pub fn accepts(&self, post: &Post) -> bool {
        (self.min..=self.max).contains(&post.score.total)
    }
}

impl PostsResponse {
    /// filter blacklisted posts from the api response unless explicitly searched for
    pub fn filter_blacklisted(mut self, blacklist: &Blacklist, search_tags: &[String]) -> Self {
        self.posts = blacklist.filter(self.posts, search_tags);
        self
    }

    /// filter out posts outside of the score window
    pub fn filter_score(mut self, filter: ScoreFilter) -> Self {
        self.posts.retain(|post| filter.accepts(post));
        self
    }

    /// keep only the posts matching a query
    pub fn filter_query(mut self, query: &TagQuery) -> Self {
        self.posts.retain(|post| query.matches(post));
        self
    }
}
