use std::path::{Component, Path, PathBuf};

/// Resolves paths written in a config file relative to that file's directory.
#[derive(Clone)]
pub struct PathResolver {
    base_dir: PathBuf,
}

impl PathResolver {
    pub fn new(config_path: &Path) -> Self {
        let base_dir = config_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve_opt_str(&self, p: &mut Option<String>) {
        if let Some(s) = p.as_mut() {
            self.resolve_str(s);
        }
    }

    /// Absolute and blank paths are left alone; `:memory:` too.
    pub fn resolve_str(&self, s: &mut String) {
        if s.trim().is_empty() || s == ":memory:" {
            return;
        }
        let pb = PathBuf::from(&*s);
        if pb.is_absolute() {
            return;
        }
        *s = self.join_clean(&pb).to_string_lossy().to_string();
    }

    fn join_clean(&self, rel: &Path) -> PathBuf {
        let joined = self.base_dir.join(rel);

        let mut out = PathBuf::new();
        for c in joined.components() {
            match c {
                Component::CurDir => {}
                Component::ParentDir => {
                    out.pop();
                }
                Component::RootDir | Component::Prefix(_) | Component::Normal(_) => {
                    out.push(c.as_os_str())
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_follow_config_dir() {
        let r = PathResolver::new(Path::new("/srv/app/conf/nlsql.yaml"));
        let mut db = "../data/./students.db".to_string();
        r.resolve_str(&mut db);
        assert_eq!(PathBuf::from(db), PathBuf::from("/srv/app/data/students.db"));

        let mut abs = "/tmp/x.db".to_string();
        r.resolve_str(&mut abs);
        assert_eq!(abs, "/tmp/x.db");

        let mut none: Option<String> = None;
        r.resolve_opt_str(&mut none);
        assert!(none.is_none());
    }

    #[test]
    fn bare_config_name_resolves_against_cwd() {
        let r = PathResolver::new(Path::new("nlsql.yaml"));
        let mut db = "students.db".to_string();
        r.resolve_str(&mut db);
        assert_eq!(db, "students.db");
    }
}
