use clap::Parser;
use std::path::PathBuf;

/// Detect asset URLs in web sources and repoint them at a CDN.
///
/// `cdnshift` walks a directory, opens every file with one of the scanned
/// extensions, and looks for `href`/`src`/`srcset` attributes pointing at
/// assets such as images, scripts and stylesheets. Without `--replace` it only
/// reports the files that would change.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Detect and replace asset URLs with a CDN prefix",
    long_about = "cdnshift - Detect and replace asset URLs.

If you are planning to move your assets to a CDN this tool can make all the
changes, choosing the extensions of the files to analyze and the extensions of
the URLs to detect and replace.

By default it walks the whole directory, opening php, html and js files, and
looks at href, src and srcset attributes whose URL ends in one of
jpg, jpeg, gif, png, tiff, js, css, scss, ico, svg, webm, mp4.

Every changed file is backed up next to itself with a .bak suffix.",
    after_help = "EXAMPLES:
  cdnshift /var/www/html                              # Detect changes to be made
  cdnshift -r https://CDN.com/ /var/www/html          # Point matched URLs at the CDN
  cdnshift -r https://CDN.com/ -e php,html /var/www   # Only change php and html files
  cdnshift -r https://CDN.com/ -s svg -s png /var/www # Only change svg and png URLs
  cdnshift -c cdnshift.yaml /var/www/html             # Read settings from a YAML file"
)]
pub struct Args {
    /// Replace URLs with the specified CDN prefix (e.g. `https://cdn.example.com/`).
    #[arg(short, long, value_name = "CDN_PREFIX")]
    pub replace: Option<String>,

    /// Log every detected file and matching line.
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not print the start-up banner.
    #[arg(short, long)]
    pub quiet: bool,

    /// File extensions to analyze in the directory [default: php,html,js].
    #[arg(short = 'e', value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// URL extensions to search for inside files
    /// [default: jpg,jpeg,gif,png,tiff,js,css,scss,ico,svg,webm,mp4].
    #[arg(short = 's', value_name = "EXT", value_delimiter = ',')]
    pub search: Vec<String>,

    /// Attribute names to search inside files [default: href,src,srcset].
    #[arg(short = 't', value_name = "TAG", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Path to a YAML configuration file.
    #[arg(short, long, env = "CDNSHIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// A comma-separated list of directory names to skip.
    #[arg(short = 'x', long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Skip files matched by `.gitignore`/`.ignore` rules and hidden files.
    #[arg(long)]
    pub respect_ignore: bool,

    /// The directory to process.
    pub path: PathBuf,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}

/// The start-up banner.
pub const BANNER: &str = r"
          _            _     _  __ _
   ___ __| |_ __  ___ | |__ (_)/ _| |_
  / __/ _` | '_ \/ __|| '_ \| | |_| __|
 | (_| (_| | | | \__ \| | | | |  _| |_
  \___\__,_|_| |_|___/|_| |_|_|_|  \__|
";

/// Prints the banner and version to standard output.
pub fn print_banner() {
    println!("{BANNER}");
    println!("  v{}\n", env!("CARGO_PKG_VERSION"));
}
