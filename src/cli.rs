//! Command-line surface and classification into run modes

use crate::error::{Result, ViewerError};
use clap::Parser;
use std::path::PathBuf;

pub const HELP_KEYS: &str = "\
Run without arguments, or with a single directory, to browse images interactively.

Scale flags:
  -N            : Draw the images that follow at N/10 of the fitted size (N = 1..9)

Gallery keys:
  q / Ctrl-C    : Quit
  Left / Right  : Previous / next image
  Up / Down     : Scale up / down (also + and -)
  0             : Reset scale
  Space / Enter : Toggle file info
";

#[derive(Parser, Debug)]
#[command(
    name = "sketch",
    version,
    about = "Render images as colored half-block text in the terminal",
    after_help = HELP_KEYS
)]
pub struct Cli {
    /// Images to render, or one directory to browse; `-N` sets the scale for the images after it
    #[arg(value_name = "IMAGE|DIR|-N", allow_negative_numbers = true)]
    pub args: Vec<PathBuf>,
}

/// One step of a one-shot render
#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem {
    /// Scale for the images that follow
    Scale(f64),
    Image(PathBuf),
}

/// What the invocation asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Interactive gallery, optionally after changing into a directory
    Gallery { dir: Option<PathBuf> },
    /// Render each image once, in order
    Render(Vec<RenderItem>),
}

impl Cli {
    /// Decide the run mode from the positional arguments
    pub fn mode(&self) -> Result<Mode> {
        match self.args.as_slice() {
            [] => return Ok(Mode::Gallery { dir: None }),
            [only] if only.is_dir() => {
                return Ok(Mode::Gallery {
                    dir: Some(only.clone()),
                })
            }
            _ => {}
        }

        let items = self
            .args
            .iter()
            .map(|arg| match arg.to_str().and_then(parse_scale_flag) {
                Some(flag) => flag.map(RenderItem::Scale),
                None => Ok(RenderItem::Image(arg.clone())),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Mode::Render(items))
    }
}

/// `Some(Ok(scale))` for `-1`..`-9`, `Some(Err(..))` for any other dash-digits
/// argument, `None` when `arg` is not a scale flag at all
pub fn parse_scale_flag(arg: &str) -> Option<Result<f64>> {
    let digits = arg.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match digits.as_bytes() {
        [d @ b'1'..=b'9'] => Some(Ok((d - b'0') as f64 / 10.0)),
        _ => Some(Err(ViewerError::InvalidScaleFlag(arg.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sketch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_gallery() {
        assert_eq!(parse(&[]).mode().unwrap(), Mode::Gallery { dir: None });
    }

    #[test]
    fn test_single_directory_is_gallery() {
        let dir = tempfile::tempdir().unwrap();
        let arg = dir.path().to_str().unwrap();
        assert_eq!(
            parse(&[arg]).mode().unwrap(),
            Mode::Gallery {
                dir: Some(dir.path().to_path_buf())
            }
        );
    }

    #[test]
    fn test_files_and_scale_flags() {
        let mode = parse(&["a.png", "-5", "b.jpg", "c.png"]).mode().unwrap();
        assert_eq!(
            mode,
            Mode::Render(vec![
                RenderItem::Image(PathBuf::from("a.png")),
                RenderItem::Scale(0.5),
                RenderItem::Image(PathBuf::from("b.jpg")),
                RenderItem::Image(PathBuf::from("c.png")),
            ])
        );
    }

    #[test]
    fn test_single_missing_file_is_render() {
        let mode = parse(&["missing.png"]).mode().unwrap();
        assert_eq!(
            mode,
            Mode::Render(vec![RenderItem::Image(PathBuf::from("missing.png"))])
        );
    }

    #[test]
    fn test_multi_digit_flag_rejected() {
        let err = parse(&["-12", "a.png"]).mode().unwrap_err();
        assert!(matches!(err, ViewerError::InvalidScaleFlag(flag) if flag == "-12"));
    }

    #[test]
    fn test_parse_scale_flag() {
        assert_eq!(parse_scale_flag("-1").unwrap().unwrap(), 0.1);
        assert_eq!(parse_scale_flag("-9").unwrap().unwrap(), 0.9);
        assert!(parse_scale_flag("-0").unwrap().is_err());
        assert!(parse_scale_flag("-10").unwrap().is_err());
        assert!(parse_scale_flag("-").is_none());
        assert!(parse_scale_flag("-x").is_none());
        assert!(parse_scale_flag("5").is_none());
        assert!(parse_scale_flag("img-5.png").is_none());
    }

    #[test]
    fn test_help_and_version_are_not_errors() {
        let err = Cli::try_parse_from(["sketch", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        let err = Cli::try_parse_from(["sketch", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        let err = Cli::try_parse_from(["sketch", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
