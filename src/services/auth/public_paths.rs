/// Paths that bypass authentication entirely (login, registration, ...).
///
/// A prefix matches by whole path segments: `/auth` covers `/auth` and
/// `/auth/login` but not `/authors`.
#[derive(Debug, Clone, Default)]
pub struct PublicPaths {
    prefixes: Vec<String>,
}

impl PublicPaths {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes = prefixes
            .into_iter()
            .map(Into::into)
            .map(|p: String| p.trim_end_matches('/').to_string())
            .collect();
        Self { prefixes }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            // "/" (stored as "") makes everything public.
            prefix.is_empty()
                || path
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_prefix_and_sub_paths() {
        let public = PublicPaths::new(["/auth"]);

        assert!(public.matches("/auth"));
        assert!(public.matches("/auth/"));
        assert!(public.matches("/auth/login"));
        assert!(public.matches("/auth/register/confirm"));
    }

    #[test]
    fn does_not_match_other_paths() {
        let public = PublicPaths::new(["/auth"]);

        assert!(!public.matches("/authors"));
        assert!(!public.matches("/schedule/today"));
        assert!(!public.matches("/api/v1/auth/login"));
        assert!(!public.matches("/"));
    }

    #[test]
    fn trailing_slash_in_prefix_is_ignored() {
        let public = PublicPaths::new(["/docs/"]);

        assert!(public.matches("/docs"));
        assert!(public.matches("/docs/index.html"));
    }

    #[test]
    fn several_prefixes() {
        let public = PublicPaths::new(["/auth", "/health"]);

        assert!(public.matches("/health"));
        assert!(public.matches("/auth/login"));
        assert!(!public.matches("/me"));
    }

    #[test]
    fn empty_set_matches_nothing() {
        assert!(!PublicPaths::default().matches("/auth/login"));
    }
}
