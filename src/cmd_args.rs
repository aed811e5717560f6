use std::ffi::OsString;

pub use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Optional. Profile name to read endpoint settings from. Default is 'default'.
    /// If the profile is not configured, built-in defaults are used.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Verbose mode
    /// Optional. Print the request line and timing before each result.
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,

    #[command(subcommand)]
    command: Option<ClapCommand>,
}

#[derive(Subcommand, Debug)]
enum ClapCommand {
    /// Fetch the photo list and print thumbnail avatars
    Photos {
        #[clap(short = 'l', long, help = "number of photos to request")]
        limit: Option<u32>,
    },
    /// Look up the coordinates of a city
    Geocode {
        #[clap(required = true, num_args = 1.., help = "city name")]
        city: Vec<String>,
    },
}

/// What the user asked for on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive loop, the default
    Interactive,
    Photos { limit: Option<u32> },
    Geocode { city: String },
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    verbose: bool,
    command: Command,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from(ClapArgs::parse_from(itr))
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        let command = match args.command {
            None => Command::Interactive,
            Some(ClapCommand::Photos { limit }) => Command::Photos { limit },
            Some(ClapCommand::Geocode { city }) => Command::Geocode {
                city: city.join(" "),
            },
        };
        Self {
            profile: args.profile,
            verbose: args.verbose,
            command,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_values() {
        let args = CommandLineArgs::parse_from(["program"]);
        assert_eq!(args.profile(), "default");
        assert!(!args.verbose());
        assert_eq!(args.command(), &Command::Interactive);
    }

    #[test]
    fn test_parse_args_short_flags() {
        let args = CommandLineArgs::parse_from(["program", "-p", "dev", "-v"]);
        assert_eq!(args.profile(), "dev");
        assert!(args.verbose());
    }

    #[test]
    fn test_parse_photos_with_limit() {
        let args = CommandLineArgs::parse_from(["program", "photos", "--limit", "3"]);
        assert_eq!(args.command(), &Command::Photos { limit: Some(3) });

        let args = CommandLineArgs::parse_from(["program", "photos"]);
        assert_eq!(args.command(), &Command::Photos { limit: None });
    }

    #[test]
    fn test_parse_geocode_joins_words() {
        let args = CommandLineArgs::parse_from([
            "program", "--profile", "test", "geocode", "San", "Antonio",
        ]);
        assert_eq!(args.profile(), "test");
        assert_eq!(
            args.command(),
            &Command::Geocode {
                city: "San Antonio".to_string()
            }
        );
    }

    #[test]
    fn test_geocode_requires_city() {
        assert!(ClapArgs::try_parse_from(["program", "geocode"]).is_err());
    }
}
