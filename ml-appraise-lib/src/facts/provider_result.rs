use std::sync::Arc;

/// Outcome of asking an external source about one artifact.
#[derive(Debug, Clone)]
pub enum ProviderResult<T> {
    /// The source answered with data.
    Found(T),

    /// The source answered, but has no such artifact.
    NotFound(Arc<str>),

    /// The source was not consulted because the artifact does not apply to it.
    Unavailable(Arc<str>),

    /// The source could not be reached or returned something unusable.
    Error(Arc<ohno::AppError>),
}

impl<T> ProviderResult<T> {
    /// Returns `true` if the result is `Found`.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns a reference to the contained data if `Found`, otherwise `None`.
    #[must_use]
    pub const fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Found(data) => Some(data),
            _ => None,
        }
    }

    /// Describes why no data is available, or `None` when data was found.
    #[must_use]
    pub fn error_marker(&self) -> Option<String> {
        match self {
            Self::Found(_) => None,
            Self::NotFound(reason) | Self::Unavailable(reason) => Some(reason.to_string()),
            Self::Error(e) => Some(format!("{e:#}")),
        }
    }

    /// Converts the found data, keeping every other variant as is.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProviderResult<U> {
        match self {
            Self::Found(data) => ProviderResult::Found(f(data)),
            Self::NotFound(reason) => ProviderResult::NotFound(reason),
            Self::Unavailable(reason) => ProviderResult::Unavailable(reason),
            Self::Error(e) => ProviderResult::Error(e),
        }
    }

    pub(crate) fn error(error: ohno::AppError) -> Self {
        Self::Error(Arc::new(error))
    }

    pub(crate) fn not_found(reason: impl AsRef<str>) -> Self {
        Self::NotFound(Arc::from(reason.as_ref()))
    }

    pub(crate) fn unavailable(reason: impl AsRef<str>) -> Self {
        Self::Unavailable(Arc::from(reason.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohno::app_err;

    #[test]
    fn test_is_found() {
        assert!(ProviderResult::Found(1).is_found());
        assert!(!ProviderResult::<u32>::not_found("HTTP 404").is_found());
        assert!(!ProviderResult::<u32>::unavailable("no repository").is_found());
        assert!(!ProviderResult::<u32>::error(app_err!("boom")).is_found());
    }

    #[test]
    fn test_as_ref() {
        assert_eq!(ProviderResult::Found(42).as_ref(), Some(&42));
        assert_eq!(ProviderResult::<u32>::not_found("gone").as_ref(), None);
    }

    #[test]
    fn test_error_marker() {
        assert_eq!(ProviderResult::Found(1).error_marker(), None);
        assert_eq!(
            ProviderResult::<u32>::not_found("HTTP 404 for owner/model").error_marker().as_deref(),
            Some("HTTP 404 for owner/model")
        );
        let marker = ProviderResult::<u32>::error(app_err!("connection refused")).error_marker().unwrap();
        assert!(marker.contains("connection refused"));
    }

    #[test]
    fn test_map() {
        let doubled = ProviderResult::Found(21).map(|v| v * 2);
        assert_eq!(doubled.as_ref(), Some(&42));

        let missing = ProviderResult::<u32>::not_found("nope").map(|v| v * 2);
        assert!(matches!(missing, ProviderResult::NotFound(_)));
    }
}
