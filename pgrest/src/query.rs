use std::fmt::Display;

/// Something that renders as one `key=value` pair of a PostgREST query string.
pub trait PostgrestFilter {
    fn as_query_param(&self) -> (String, String);
}

/// `column=eq.value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqFilter {
    pub column: String,
    pub value: String,
}

impl EqFilter {
    pub fn new(column: impl Into<String>, value: impl Display) -> Self {
        Self {
            column: column.into(),
            value: value.to_string(),
        }
    }
}

impl PostgrestFilter for EqFilter {
    fn as_query_param(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// `order=column.desc`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

impl PostgrestFilter for Order {
    fn as_query_param(&self) -> (String, String) {
        let direction = match self.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        ("order".to_string(), format!("{}.{}", self.column, direction))
    }
}

/// Ordered list of query parameters. Parameters are rendered in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns)
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(&EqFilter::new(column, value))
    }

    pub fn order(self, column: &str, direction: Direction) -> Self {
        self.filter(&Order {
            column: column.to_string(),
            direction,
        })
    }

    pub fn filter(self, filter: &impl PostgrestFilter) -> Self {
        let (key, value) = filter.as_query_param();
        self.param(&key, &value)
    }

    fn param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_scoped_listing_query() {
        let query = Query::new()
            .select("*")
            .eq("user_id", "8d0c7a3e")
            .order("created_at", Direction::Descending);

        assert_eq!(
            query.to_query_string(),
            "select=%2A&user_id=eq.8d0c7a3e&order=created_at.desc"
        );
    }

    #[test]
    fn filter_values_are_url_encoded() {
        let query = Query::new().eq("title", "a&b c");
        assert_eq!(query.to_query_string(), "title=eq.a%26b%20c");
    }

    #[test]
    fn custom_filters_plug_into_the_builder() {
        struct Gte(&'static str, i32);
        impl PostgrestFilter for Gte {
            fn as_query_param(&self) -> (String, String) {
                (self.0.to_string(), format!("gte.{}", self.1))
            }
        }

        let query = Query::new().filter(&Gte("effort", 7));
        assert_eq!(query.to_query_string(), "effort=gte.7");
    }
}
