//! Command line options

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const USAGE: &str = "\
Usage: fos-locmap-demo [OPTIONS]

Options:
  --config <file>     JSON tracking configuration
  --route <file>      JSON array of {\"latitude\", \"longitude\"} points
  --updates <n>       Stop after n location updates (default: route length)
  --time-scale <n>    Run platform timers n times faster (default: 1)
  --granted           Permissions are already granted at startup
  --deny              Answer the permission request with a denial
  --last-known        The location source has a cached last-known fix
  -h, --help          Print this help";

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub route: Option<PathBuf>,
    pub updates: Option<usize>,
    pub time_scale: u32,
    pub granted: bool,
    pub deny: bool,
    pub last_known: bool,
    pub help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: None,
            route: None,
            updates: None,
            time_scale: 1,
            granted: false,
            deny: false,
            last_known: false,
            help: false,
        }
    }
}

impl Options {
    /// Parse arguments, program name excluded
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => options.config = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--route" => options.route = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--updates" => {
                    let n = value(&mut args, &arg)?;
                    options.updates = Some(n.parse().with_context(|| format!("invalid --updates value '{n}'"))?);
                }
                "--time-scale" => {
                    let n = value(&mut args, &arg)?;
                    let scale: u32 = n.parse().with_context(|| format!("invalid --time-scale value '{n}'"))?;
                    if scale == 0 {
                        bail!("--time-scale must be at least 1");
                    }
                    options.time_scale = scale;
                }
                "--granted" => options.granted = true,
                "--deny" => options.deny = true,
                "--last-known" => options.last_known = true,
                "-h" | "--help" => options.help = true,
                other => bail!("unknown argument '{other}'\n\n{USAGE}"),
            }
        }

        if options.granted && options.deny {
            bail!("--granted and --deny are mutually exclusive");
        }
        Ok(options)
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().with_context(|| format!("{flag} expects a value"))
}
