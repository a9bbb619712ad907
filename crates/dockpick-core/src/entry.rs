//! Initial session state from the command-line argument

use crate::matcher::{resolve, MatchResult};
use crate::Container;

/// Where an interactive session starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// Nothing is running
    Empty,
    /// Listing over the given pool (the full snapshot or an ambiguous subset)
    Listing(Vec<Container>),
    /// Single running container and no argument: ask before opening its menu
    Confirm(Container),
    /// Argument resolved to exactly one container
    Menu(Container),
    /// Argument matched nothing
    NotFound(String),
}

/// Decide the entry point for an optional target token
pub fn resolve_entry(arg: Option<&str>, snapshot: &[Container]) -> EntryPoint {
    if snapshot.is_empty() {
        return EntryPoint::Empty;
    }

    let Some(token) = arg else {
        return match snapshot {
            [only] => EntryPoint::Confirm(only.clone()),
            _ => EntryPoint::Listing(snapshot.to_vec()),
        };
    };

    match resolve(token, snapshot) {
        MatchResult::Unique(container) => EntryPoint::Menu(container),
        MatchResult::Ambiguous(candidates) => EntryPoint::Listing(candidates),
        MatchResult::None => EntryPoint::NotFound(token.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot_from_names;

    fn snapshot(names: &[&str]) -> Vec<Container> {
        snapshot_from_names(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_empty_snapshot_short_circuits() {
        assert_eq!(resolve_entry(None, &[]), EntryPoint::Empty);
        assert_eq!(resolve_entry(Some("web"), &[]), EntryPoint::Empty);
    }

    #[test]
    fn test_no_argument() {
        assert_eq!(
            resolve_entry(None, &snapshot(&["web"])),
            EntryPoint::Confirm(Container::new("web"))
        );
        assert_eq!(
            resolve_entry(None, &snapshot(&["web", "db"])),
            EntryPoint::Listing(snapshot(&["web", "db"]))
        );
    }

    #[test]
    fn test_argument_unique_goes_to_menu() {
        assert_eq!(
            resolve_entry(Some("db"), &snapshot(&["web", "db", "db-replica"])),
            EntryPoint::Menu(Container::new("db"))
        );
    }

    #[test]
    fn test_argument_ambiguous_restricts_listing() {
        assert_eq!(
            resolve_entry(Some("web"), &snapshot(&["web-a", "db", "web-b"])),
            EntryPoint::Listing(snapshot(&["web-a", "web-b"]))
        );
    }

    #[test]
    fn test_argument_not_found() {
        assert_eq!(
            resolve_entry(Some("cache"), &snapshot(&["web"])),
            EntryPoint::NotFound("cache".to_string())
        );
    }
}
