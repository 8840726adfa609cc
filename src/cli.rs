use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "taxalift",
    version,
    about = "Species lookup table migration with 64-bit identifier remapping",
    long_about = "Taxalift converts legacy semicolon-delimited species exports to the revised \
                  schema: every integer identifier is replaced by a random 64-bit surrogate, \
                  AUTHOR and SECUNDUM columns are dropped, empty PARENT_NR and PARENT_NAME \
                  columns are added, and German boolean tokens become English. ZIP archives \
                  are unpacked and repacked transparently."
)]
pub struct Cli {
    /// Legacy export to convert: a CSV/TXT file or a ZIP archive containing one
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination path; when omitted, plain files are overwritten in place
    /// and archives get a `_transformed` sibling
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_input_with_optional_output() {
        let cli = Cli::try_parse_from(["taxalift", "species.csv"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("species.csv"));
        assert_eq!(cli.output, None);

        let cli = Cli::try_parse_from(["taxalift", "in.zip", "out.zip"]).unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("out.zip")));
    }

    #[test]
    fn rejects_missing_input_and_extra_arguments() {
        assert!(Cli::try_parse_from(["taxalift"]).is_err());
        assert!(Cli::try_parse_from(["taxalift", "a", "b", "c"]).is_err());
    }
}
