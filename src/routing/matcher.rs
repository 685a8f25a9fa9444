//! Route matching module
//!
//! Validates wiki paths of the form `/<op>/<title>` and extracts the title.

use regex::Regex;

/// Full-path pattern: one operation segment, one alphanumeric title, nothing else
const VALID_PATH: &str = r"^/(edit|save|view)/([a-zA-Z0-9]+)$";

/// Wiki operation selected by the first path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    View,
    Edit,
    Save,
}

impl Operation {
    pub const ALL: [Self; 3] = [Self::View, Self::Edit, Self::Save];

    /// Mount prefix for this operation (e.g. `/view/`)
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::View => "/view/",
            Self::Edit => "/edit/",
            Self::Save => "/save/",
        }
    }

    /// Path of this operation for a given title
    pub fn path_for(self, title: &str) -> String {
        format!("{}{title}", self.prefix())
    }

    /// Select the operation whose prefix the path falls under
    pub fn for_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| path.starts_with(op.prefix()))
    }
}

/// Compiled path validator
///
/// Built once at startup and shared by every route.
#[derive(Debug, Clone)]
pub struct PathValidator {
    pattern: Regex,
}

impl PathValidator {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(VALID_PATH)?,
        })
    }

    /// Return the page title if `path` is a valid wiki path
    pub fn title<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(path)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PathValidator {
        PathValidator::new().unwrap()
    }

    #[test]
    fn test_valid_paths() {
        let v = validator();
        assert_eq!(v.title("/view/Alice"), Some("Alice"));
        assert_eq!(v.title("/edit/FrontPage2"), Some("FrontPage2"));
        assert_eq!(v.title("/save/x"), Some("x"));
        assert_eq!(v.title("/view/123"), Some("123"));
    }

    #[test]
    fn test_rejects_unknown_operation() {
        let v = validator();
        assert_eq!(v.title("/delete/Alice"), None);
        assert_eq!(v.title("/View/Alice"), None);
        assert_eq!(v.title("/views/Alice"), None);
        assert_eq!(v.title("view/Alice"), None);
    }

    #[test]
    fn test_rejects_bad_titles() {
        let v = validator();
        assert_eq!(v.title("/view/"), None);
        assert_eq!(v.title("/view/bad path"), None);
        assert_eq!(v.title("/view/bad_path"), None);
        assert_eq!(v.title("/view/../etc"), None);
        assert_eq!(v.title("/view/Ünicode"), None);
        assert_eq!(v.title("/view/a.txt"), None);
    }

    #[test]
    fn test_rejects_extra_segments() {
        let v = validator();
        assert_eq!(v.title("/view/Alice/"), None);
        assert_eq!(v.title("/view/Alice/more"), None);
        assert_eq!(v.title("//view/Alice"), None);
        assert_eq!(v.title("/view//Alice"), None);
        assert_eq!(v.title("/view/Alice\n"), None);
    }

    #[test]
    fn test_matches_iff_composed_from_op_and_id() {
        let v = validator();
        let ops = ["edit", "save", "view", "list", ""];
        let ids = ["A", "abc123", "", "a b", "a/b", "a-b"];
        for op in ops {
            for id in ids {
                let path = format!("/{op}/{id}");
                let expected = matches!(op, "edit" | "save" | "view")
                    && !id.is_empty()
                    && id.chars().all(|c| c.is_ascii_alphanumeric());
                assert_eq!(v.title(&path).is_some(), expected, "path {path:?}");
            }
        }
    }

    #[test]
    fn test_operation_prefixes() {
        assert_eq!(Operation::for_path("/view/A"), Some(Operation::View));
        assert_eq!(Operation::for_path("/edit/"), Some(Operation::Edit));
        assert_eq!(Operation::for_path("/save/a/b"), Some(Operation::Save));
        assert_eq!(Operation::for_path("/view"), None);
        assert_eq!(Operation::for_path("/"), None);
        assert_eq!(Operation::Edit.path_for("Alice"), "/edit/Alice");
    }
}
