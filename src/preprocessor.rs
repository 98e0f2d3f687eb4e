//! Text-level `#insert (name.txt)` expansion, run before tokenizing.

use std::{collections::HashMap, fs, io, ops::Range, path::Path};

use const_format::concatcp;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;

const S_INCLUDE_FILE: &str = r"\w+\.txt";
const S_INSERT: &str = concatcp!(r"#insert \((", S_INCLUDE_FILE, r")\)");

static INSERT: Lazy<Regex> = Lazy::new(|| Regex::new(S_INSERT).expect("Error compiling regex."));

#[derive(thiserror::Error, Debug)]
pub enum PreprocessError {
    #[error("'{file}' is still being inserted after {passes} passes; the includes are probably cyclic")]
    IncludeLimitExceeded { file: String, passes: usize },
    #[error("inserting '{file}' grows the source past {limit} bytes; the includes are probably cyclic")]
    IncludeTooLarge { file: String, limit: usize },
    #[error("cannot read '{file}': {source}")]
    Io {
        file: String,
        #[source]
        source: io::Error,
    },
}

/// Replaces every insert directive with the contents of the named file in
/// `config.include_dir`, or with nothing if there is no such file. Inserted
/// text is scanned again, up to `config.max_include_passes` times, and may
/// not grow beyond `config.max_include_size` bytes.
pub fn preprocess(source: &str, config: &Config) -> Result<String, PreprocessError> {
    let mut text = source.to_string();
    let mut files: HashMap<String, String> = HashMap::new();
    for pass in 0..config.max_include_passes {
        let directives: Vec<(Range<usize>, String)> = INSERT
            .captures_iter(&text)
            .filter_map(|caps| Some((caps.get(0)?.range(), caps.get(1)?.as_str().to_string())))
            .collect();
        if directives.is_empty() {
            log::debug!("preprocessing finished after {pass} passes");
            return Ok(text);
        }

        let mut expanded = String::with_capacity(text.len());
        let mut last = 0;
        for (range, file) in directives {
            expanded.push_str(&text[last..range.start]);
            if !files.contains_key(&file) {
                let contents = read_include(&config.include_dir, &file)?;
                files.insert(file.clone(), contents);
            }
            let contents = &files[&file];
            if expanded.len() + contents.len() + (text.len() - range.end) > config.max_include_size {
                return Err(PreprocessError::IncludeTooLarge {
                    file,
                    limit: config.max_include_size,
                });
            }
            expanded.push_str(contents);
            last = range.end;
        }
        expanded.push_str(&text[last..]);
        text = expanded;
    }

    match INSERT.captures(&text).and_then(|caps| caps.get(1)) {
        Some(file) => Err(PreprocessError::IncludeLimitExceeded {
            file: file.as_str().to_string(),
            passes: config.max_include_passes,
        }),
        None => Ok(text),
    }
}

fn read_include(dir: &Path, file: &str) -> Result<String, PreprocessError> {
    let path = dir.join(file);
    match fs::read_to_string(&path) {
        Ok(contents) => {
            log::debug!("inserting {} ({} bytes)", path.display(), contents.len());
            Ok(contents)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("{} not found, dropping its insert directive", path.display());
            Ok(String::new())
        }
        Err(source) => Err(PreprocessError::Io {
            file: file.to_string(),
            source,
        }),
    }
}
