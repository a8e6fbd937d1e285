//! the core app
use {
    super::{cli::Cli, logging},
    crate::{
        config::instance::init_config,
        getopt,
        models::{AnyPosts, Post, decode},
        query::{Blacklist, ScoreFilter, TagQuery},
    },
    clap::Parser,
    color_eyre::{
        Section, SectionExt,
        eyre::{Context, Result},
    },
    std::{
        io::{self, Read},
        path::{Path, PathBuf},
    },
    tracing::{debug, info},
};

/// the e6post app
pub struct E6App {
    /// the parsed arguments
    cli: Cli,
    /// the blacklist to apply, empty when disabled
    blacklist: Blacklist,
    /// the configured score window
    score: ScoreFilter,
    /// the query posts have to match, if any
    query: Option<TagQuery>,
}

impl E6App {
    /// initialize e6post
    ///
    /// - 1. parses the cli arguments
    /// - 2. loads the config file
    /// - 3. sets up logging
    /// - 4. parses the blacklist and the query
    ///
    /// returns `None` if the cli only asked for generated files
    ///
    /// # Errors
    ///
    /// returns an error if the generators fail
    /// returns an error if it fails to load the configuration file
    /// returns an error if it fails to setup logging
    pub fn init() -> Result<Option<Self>> {
        let cli = Cli::parse();

        if cli.run_generators()? {
            return Ok(None);
        }

        init_config()?;
        logging::setup()?;

        let blacklist = if cli.no_blacklist {
            Blacklist::default()
        } else {
            Blacklist::from_config()
        };

        let query = cli.query.as_deref().map(TagQuery::parse);
        info!(
            rules = blacklist.rules().len(),
            query = cli.query.as_deref().unwrap_or_default(),
            "Starting {} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );

        Ok(Some(Self {
            cli,
            blacklist,
            score: ScoreFilter::from_config(),
            query,
        }))
    }

    /// decode every input, filter the posts and print what's left
    ///
    /// # Errors
    ///
    /// returns an error if an input can't be read or isn't a posts response
    pub fn run(&self) -> Result<()> {
        let posts = self.filter(self.load_inputs()?);

        if self.cli.json {
            println!("{}", serde_json::to_string_pretty(&posts)?);
            return Ok(());
        }

        let base_url: String = getopt!(base_url);
        for post in &posts {
            println!("{}  {}", post, post.page_url(&base_url));
        }

        Ok(())
    }

    /// read and decode all inputs, in order
    fn load_inputs(&self) -> Result<Vec<Post>> {
        let stdin = [PathBuf::from("-")];
        let inputs = if self.cli.inputs.is_empty() {
            &stdin[..]
        } else {
            &self.cli.inputs[..]
        };

        let mut posts = Vec::new();
        for input in inputs {
            let raw = Self::read_input(input)?;
            let decoded = decode::<AnyPosts>(&raw)
                .map_err(|e| color_eyre::eyre::eyre!("{}", e))
                .wrap_err("Input is not a post, a list of posts or a posts response")
                .with_section(|| input.display().to_string().header("Input:"))?
                .into_posts();

            debug!(input = %input.display(), count = decoded.len(), "decoded input");
            posts.extend(decoded);
        }

        Ok(posts)
    }

    /// read a file, or stdin for `-`
    fn read_input(input: &Path) -> Result<String> {
        if input == Path::new("-") {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .wrap_err("Failed to read stdin")?;
            return Ok(buf);
        }

        std::fs::read_to_string(input)
            .wrap_err_with(|| format!("Failed to read {}", input.display()))
            .suggestion("Check that the file exists and is readable")
    }

    /// apply the configured filters
    fn filter(&self, posts: Vec<Post>) -> Vec<Post> {
        filter_posts(
            posts,
            &self.blacklist,
            &self.cli.tags,
            self.score,
            self.query.as_ref(),
        )
    }
}

/// apply the blacklist, then the score window, then the query
///
/// `search_tags` are the tags the posts were searched with; searching for a blacklisted tag
/// turns the blacklist off
pub fn filter_posts(
    posts: Vec<Post>,
    blacklist: &Blacklist,
    search_tags: &[String],
    score: ScoreFilter,
    query: Option<&TagQuery>,
) -> Vec<Post> {
    let mut posts = blacklist.filter(posts, search_tags);
    posts.retain(|post| score.accepts(post));

    if let Some(query) = query {
        posts.retain(|post| query.matches(post));
    }

    posts
}

#[cfg(test)]
mod tests {
    use {super::*, crate::models::tests::sample_post};

    fn post(id: i64, total: i64, general: &[&str]) -> Post {
        let mut post = sample_post();
        post.id = id;
        post.score.total = total;
        post.tags.general = general.iter().map(|t| t.to_string()).collect();
        post
    }

    fn posts() -> Vec<Post> {
        vec![
            post(1, 50, &["gore"]),
            post(2, -3, &["solo"]),
            post(3, 20, &["duo"]),
            post(4, 15, &["solo"]),
        ]
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_filters_apply_in_order() {
        let blacklist = Blacklist::new(["gore"]);
        let score = ScoreFilter { min: 0, max: 100 };
        let query = TagQuery::parse("solo");

        let kept = filter_posts(posts(), &blacklist, &[], score, Some(&query));
        assert_eq!(ids(&kept), vec![4]);

        let kept = filter_posts(posts(), &blacklist, &[], score, None);
        assert_eq!(ids(&kept), vec![3, 4]);
    }

    #[test]
    fn test_searching_blacklisted_tag_keeps_it() {
        let blacklist = Blacklist::new(["gore"]);
        let query = TagQuery::parse("gore");

        let kept = filter_posts(
            posts(),
            &blacklist,
            &["gore".to_string()],
            ScoreFilter::default(),
            Some(&query),
        );
        assert_eq!(ids(&kept), vec![1]);
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let kept = filter_posts(
            posts(),
            &Blacklist::default(),
            &[],
            ScoreFilter::default(),
            None,
        );
        assert_eq!(ids(&kept), vec![1, 2, 3, 4]);
    }
}
