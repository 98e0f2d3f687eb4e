use std::path::PathBuf;

pub const DEFAULT_MAIN_FILE: &str = "main.txt";
pub const DEFAULT_MAX_INCLUDE_PASSES: usize = 32;
pub const DEFAULT_MAX_INCLUDE_SIZE: usize = 16 * 1024 * 1024;
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Settings for one run of the toolchain.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Entry source file used when none is given on the command line.
    pub main_file: PathBuf,
    /// Directory `#insert (name.txt)` directives are resolved against.
    pub include_dir: PathBuf,
    /// Sweeps of include substitution before giving up on a cyclic include.
    pub max_include_passes: usize,
    /// Largest text, in bytes, include substitution may produce.
    pub max_include_size: usize,
    /// Nesting limit for user function calls.
    pub max_call_depth: usize,
    pub interactive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_file: PathBuf::from(DEFAULT_MAIN_FILE),
            include_dir: PathBuf::from("."),
            max_include_passes: DEFAULT_MAX_INCLUDE_PASSES,
            max_include_size: DEFAULT_MAX_INCLUDE_SIZE,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            interactive: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
pub enum Command {
    Run(Config),
    Help,
}

impl Config {
    /// Reads the arguments following the executable name.
    pub fn from_args<I>(args: I) -> Result<Command, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "-i" | "--interactive" => config.interactive = true,
                "--max-depth" => {
                    let value = args.next().ok_or("--max-depth expects a number")?;
                    config.max_call_depth = value
                        .parse()
                        .map_err(|_| format!("invalid value for --max-depth: {value}"))?;
                }
                "--include-dir" => {
                    let value = args.next().ok_or("--include-dir expects a directory")?;
                    config.include_dir = PathBuf::from(value);
                }
                flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
                file => config.main_file = PathBuf::from(file),
            }
        }
        Ok(Command::Run(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_gives_defaults() {
        assert_eq!(Config::from_args(args(&[])), Ok(Command::Run(Config::default())));
    }

    #[test]
    fn file_and_flags() {
        let Ok(Command::Run(config)) =
            Config::from_args(args(&["prog.txt", "--max-depth", "12", "--include-dir", "lib"]))
        else {
            panic!("expected a run command");
        };
        assert_eq!(config.main_file, PathBuf::from("prog.txt"));
        assert_eq!(config.max_call_depth, 12);
        assert_eq!(config.include_dir, PathBuf::from("lib"));
        assert!(!config.interactive);
    }

    #[test]
    fn help_and_bad_flags() {
        assert_eq!(Config::from_args(args(&["-i", "--help"])), Ok(Command::Help));
        assert!(Config::from_args(args(&["--max-depth", "many"])).is_err());
        assert!(Config::from_args(args(&["--max-depth"])).is_err());
        assert!(Config::from_args(args(&["--verbose"])).is_err());
    }
}
