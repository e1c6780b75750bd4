//! Cfg file specifications and repeat composition
//!
//! A cfg list entry reads `file[:sec...]`. Section tokens containing `+`
//! split the request for one file into several resolution passes.

use crate::config::ResolverSettings;
use crate::{Error, Result};
use cfgtree_fs::NormalizedPath;

/// One resolution pass over one cfg file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgPass {
    pub path: NormalizedPath,
    pub sections: Vec<String>,
    /// Runs against the index loaded for the previous pass.
    pub repeat: bool,
    pub exclude_common: bool,
}

/// A repeat pass before it is bound to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatRequest {
    pub sections: Vec<String>,
    pub exclude_common: bool,
}

/// Flatten a cfg list, splitting comma-separated entries.
pub fn split_cfg_list<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split section tokens into the base request and its repeat passes.
///
/// `name+e1+e2` keeps `name` in the base and adds one pass per extra,
/// each extra followed by the tokens up to the next `+` token. A token
/// starting with `++` turns all of its names into repeats and removes the
/// tokens it governs from the base; `+++` also drops common sections from
/// those repeats.
pub fn compose_repeats(mut tokens: Vec<String>) -> (Vec<String>, Vec<RepeatRequest>) {
    let repeated: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.contains('+'))
        .map(|(i, _)| i)
        .collect();

    let mut repeats = Vec::new();
    let mut excluded = vec![false; tokens.len()];

    for (k, &id) in repeated.iter().enumerate() {
        let token = std::mem::take(&mut tokens[id]);
        let (names, exclusive, exclude_common) = if token.starts_with("++") {
            let marks = if token.starts_with("+++") { 3 } else { 2 };
            let names: Vec<String> = token[marks..].split('+').map(str::to_string).collect();
            (names, true, marks == 3)
        } else {
            let mut parts = token.split('+').map(str::to_string);
            tokens[id] = parts.next().unwrap_or_default();
            (parts.collect(), false, false)
        };

        let start = id + 1;
        let end = repeated.get(k + 1).copied().unwrap_or(tokens.len());
        let governed = &tokens[start..end];

        for name in names.into_iter().filter(|n| !n.is_empty()) {
            let mut sections = vec![name];
            sections.extend(governed.iter().cloned());
            repeats.push(RepeatRequest {
                sections,
                exclude_common,
            });
        }
        if exclusive {
            excluded[start..end].iter_mut().for_each(|e| *e = true);
        }
    }

    let base = tokens
        .into_iter()
        .zip(excluded)
        .filter(|(token, excluded)| !excluded && !token.is_empty())
        .map(|(token, _)| token)
        .collect();
    (base, repeats)
}

/// Plan the passes for one `file[:sec...]` entry.
pub fn plan_entry(entry: &str, settings: &ResolverSettings) -> Result<Vec<CfgPass>> {
    let mut parts = entry.split(':');
    let file = parts.next().unwrap_or_default();
    let file = if file.len() > 2 && file.starts_with('_') && file.ends_with('_') {
        &file[1..file.len() - 1]
    } else {
        file
    };
    let tokens: Vec<String> = parts.filter(|s| !s.is_empty()).map(str::to_string).collect();

    let path = settings.cfg_path(file);
    if !path.is_file() {
        let native = path.to_native();
        return Err(Error::FileNotFound {
            path: std::path::absolute(&native).unwrap_or(native),
        });
    }

    let (base, repeats) = compose_repeats(tokens);
    let mut passes = vec![CfgPass {
        path: path.clone(),
        sections: base,
        repeat: false,
        exclude_common: false,
    }];
    passes.extend(repeats.into_iter().map(|r| CfgPass {
        path: path.clone(),
        sections: r.sections,
        repeat: true,
        exclude_common: r.exclude_common,
    }));
    Ok(passes)
}

/// Plan the passes for a whole cfg list, in list order.
pub fn plan_passes<S: AsRef<str>>(
    entries: &[S],
    settings: &ResolverSettings,
) -> Result<Vec<CfgPass>> {
    let mut passes = Vec::new();
    for entry in split_cfg_list(entries) {
        passes.extend(plan_entry(&entry, settings)?);
    }
    Ok(passes)
}
