//! cli stuff
use {
    crate::config::options::E6PostCfg,
    clap::Parser,
    color_eyre::{Report, eyre::Result},
    schemars::generate::SchemaSettings,
    std::{
        fs::OpenOptions,
        io::{BufWriter, Write},
        path::PathBuf,
    },
};

/// where `--save` puts the generated schema
pub const SCHEMA_PATH: &str = "e6post.schema.json";

/// where `--save` puts the generated default config
pub const DEFAULT_CONFIG_PATH: &str = "e6post.default.toml";

/// Inspect saved e621/e926 api responses
///
/// Config is read from `e6post.toml` (global config dir, then the nearest one above the current
/// directory) and `E6POST__SECTION__KEY` environment variables.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// JSON files holding posts, `-` or nothing for stdin
    pub inputs: Vec<PathBuf>,

    /// Only show posts matching this tag query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Tags that were searched for; a blacklisted tag among them disables the blacklist
    #[arg(short, long, value_delimiter = ' ')]
    pub tags: Vec<String>,

    /// Don't hide posts matching the configured blacklist
    #[arg(long)]
    pub no_blacklist: bool,

    /// Print the remaining posts as JSON instead of a summary
    #[arg(short, long)]
    pub json: bool,

    /// Save instead of printing
    #[arg(long)]
    pub save: bool,

    /// Generate a JSON schemafile based on the defaults
    #[arg(short = 's', long)]
    pub gen_schema: bool,

    /// Generate the default config file
    #[arg(short = 'd', long)]
    pub gen_default: bool,
}

impl Cli {
    /// handle the generator flags
    ///
    /// returns whether anything was generated, in which case there's nothing left to do
    ///
    /// # Errors
    ///
    /// returns an error if it fails to generate and/or save the json schema
    /// returns an error if it fails to generate and/or save the default config
    pub fn run_generators(&self) -> Result<bool> {
        if self.gen_schema {
            Self::gen_schema(self.save)?;
        }

        if self.gen_default {
            Self::gen_defaults(self.save)?;
        }

        Ok(self.gen_schema || self.gen_default)
    }

    /// save a string to a file
    ///
    /// # Arguments
    ///
    /// * `path` - the path to the file being written
    /// * `contents` - the data to write to the file
    ///
    /// # Errors
    ///
    /// returns an error if it fails to open `path`
    pub fn write_to_file(path: &str, contents: &str) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)?;
        let mut w = BufWriter::new(file);
        w.write_all(contents.as_bytes()).map_err(Report::new)
    }

    /// generate/save the config schema
    ///
    /// # Errors
    ///
    /// returns an error if it fails to convert the schema to a JSON string
    /// returns an error if it fails to save the schema to [`SCHEMA_PATH`]
    pub fn gen_schema(save: bool) -> Result<()> {
        let settings = SchemaSettings::draft2020_12().for_serialize();
        let generator = settings.into_generator();
        let schema = generator.into_root_schema_for::<E6PostCfg>();
        let schema_str = serde_json::to_string_pretty(&schema)?;

        if save {
            Self::write_to_file(SCHEMA_PATH, &schema_str)?;
        } else {
            println!("{}", schema_str);
        }

        Ok(())
    }

    /// generate/save the default config file
    ///
    /// # Errors
    ///
    /// returns an error if it fails to convert the default config to TOML
    /// returns an error if it fails to save the default config to [`DEFAULT_CONFIG_PATH`]
    pub fn gen_defaults(save: bool) -> Result<()> {
        let defaults = toml::to_string_pretty(&E6PostCfg::default())?;

        if save {
            Self::write_to_file(DEFAULT_CONFIG_PATH, &defaults)?;
        } else {
            println!("{}", defaults);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::CommandFactory};

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from([
            "e6post",
            "posts.json",
            "-",
            "--query",
            "canid -gore",
            "--tags",
            "canid fox",
            "--no-blacklist",
        ]);

        assert_eq!(
            cli.inputs,
            vec![PathBuf::from("posts.json"), PathBuf::from("-")]
        );
        assert_eq!(cli.query.as_deref(), Some("canid -gore"));
        assert_eq!(cli.tags, vec!["canid", "fox"]);
        assert!(cli.no_blacklist);
        assert!(!cli.json);
    }
}
