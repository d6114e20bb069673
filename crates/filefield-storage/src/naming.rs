//! Collision handling for saved uploads

use uuid::Uuid;

/// How a store picks the final name when saving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingPolicy {
    /// Keep the requested name; on a clash append `-1`, `-2`, ... before the extension
    #[default]
    Disambiguate,
    /// Prefix every name with a fresh unique id
    UniquePrefix,
}

impl NamingPolicy {
    /// Candidate name for the given attempt, starting at 0
    pub fn candidate(&self, name: &str, attempt: u32) -> String {
        match self {
            NamingPolicy::Disambiguate => {
                if attempt == 0 {
                    name.to_string()
                } else {
                    with_suffix(name, attempt)
                }
            }
            NamingPolicy::UniquePrefix => {
                let (dir, base) = split_dir(name);
                format!("{}{}-{}", dir, Uuid::new_v4().simple(), base)
            }
        }
    }
}

/// `dir/` part (possibly empty) and basename of a relative name
fn split_dir(name: &str) -> (&str, &str) {
    match name.rfind('/') {
        Some(idx) => name.split_at(idx + 1),
        None => ("", name),
    }
}

fn with_suffix(name: &str, n: u32) -> String {
    let (dir, base) = split_dir(name);
    match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}{}-{}.{}", dir, stem, n, ext),
        _ => format!("{}{}-{}", dir, base, n),
    }
}
