use crate::query::Query;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrl(String);

impl AsRef<str> for ServiceUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ServiceUrl {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self(base.trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// `{base}/rest/v1/{table}`
    pub fn table(&self, table: &str) -> Self {
        self.append_path("/rest/v1").append_path(table)
    }

    /// `{base}/auth/v1/{path}`
    pub fn auth(&self, path: &str) -> Self {
        self.append_path("/auth/v1").append_path(path)
    }

    pub fn with_param(&self, key: &str, value: &str) -> Self {
        let separator = if self.0.contains('?') { '&' } else { '?' };
        Self(format!(
            "{}{}{}={}",
            self.0,
            separator,
            urlencoding::encode(key),
            urlencoding::encode(value)
        ))
    }

    pub fn with_query(&self, query: &Query) -> Self {
        if query.is_empty() {
            return self.clone();
        }
        let separator = if self.0.contains('?') { '&' } else { '?' };
        Self(format!("{}{}{}", self.0, separator, query.to_query_string()))
    }
}
