//! Filter lookups and their translation to Solr query strings.
//!
//! # Solr Syntax Generated
//!
//! ```text
//! field:value                        -- Exact match
//! field:(a OR b)                     -- Membership
//! field:[* TO *]                     -- Any value (exists)
//! -field:[* TO *]                    -- No value
//! field:[1800 TO 1900]               -- Range (either end may be open)
//! {!tag=name}field:value            -- Tagged, for facet exclusion
//! ```

/// Match-any-value constant
pub const ANY_VALUE: &str = "[* TO *]";

/// A typed filter lookup on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Exact match: `field:value`
    Eq(String),
    /// Membership: `field:(a OR b)`. An empty-string member means "no
    /// value", folding an exists check into the membership query.
    AnyOf(Vec<String>),
    /// Any value (`true`) or no value (`false`)
    Exists(bool),
    /// Range with optional open ends: `field:[start TO end]`
    Range(Option<String>, Option<String>),
}

impl Lookup {
    /// Membership lookup over the given values.
    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Exists lookup: any value when `true`, no value when `false`.
    pub fn exists(value: bool) -> Self {
        Self::Exists(value)
    }

    /// Range lookup; either end may be `None` for an open-ended range.
    pub fn range<S, E>(start: Option<S>, end: Option<E>) -> Self
    where
        S: ToString,
        E: ToString,
    {
        Self::Range(
            start.map(|value| value.to_string()),
            end.map(|value| value.to_string()),
        )
    }

    /// Translate this lookup into a Solr query string for `field`, with an
    /// optional `{!tag=...}` prefix for facet exclusion.
    pub fn to_filter(&self, field: &str, tag: Option<&str>) -> String {
        let solr_query = match self {
            Self::Eq(value) => format!("{}:{}", field, value),

            Self::AnyOf(values) => {
                // treat empty values as flagging an exists query
                let not_exists = values.iter().any(String::is_empty);
                let kept: Vec<&str> = values
                    .iter()
                    .filter(|value| !value.is_empty())
                    .map(String::as_str)
                    .collect();

                if kept.is_empty() {
                    // the list was only empty values; match on field not set
                    format!("-{}:{}", field, ANY_VALUE)
                } else {
                    let membership = format!("{}:({})", field, kept.join(" OR "));
                    if not_exists {
                        // no value OR the requested values: negate a lookup
                        // for any value combined with a double-negated
                        // membership lookup
                        format!("-({}:{} OR -{})", field, ANY_VALUE, membership)
                    } else {
                        membership
                    }
                }
            }

            Self::Exists(true) => format!("{}:{}", field, ANY_VALUE),
            Self::Exists(false) => format!("-{}:{}", field, ANY_VALUE),

            Self::Range(start, end) => format!(
                "{}:[{} TO {}]",
                field,
                start.as_deref().unwrap_or("*"),
                end.as_deref().unwrap_or("*")
            ),
        };

        match tag {
            Some(tag) if !tag.is_empty() => format!("{{!tag={}}}{}", tag, solr_query),
            _ => solr_query,
        }
    }
}

impl From<&str> for Lookup {
    fn from(value: &str) -> Self {
        Self::Eq(value.to_string())
    }
}

impl From<String> for Lookup {
    fn from(value: String) -> Self {
        Self::Eq(value)
    }
}

impl From<i64> for Lookup {
    fn from(value: i64) -> Self {
        Self::Eq(value.to_string())
    }
}

impl From<u64> for Lookup {
    fn from(value: u64) -> Self {
        Self::Eq(value.to_string())
    }
}

impl From<bool> for Lookup {
    fn from(value: bool) -> Self {
        Self::Eq(if value { "true" } else { "false" }.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_lookup() {
        let filter = Lookup::from("person").to_filter("item_type_s", None);
        assert_eq!(filter, "item_type_s:person");
    }

    #[test]
    fn numeric_eq_lookup() {
        let filter = Lookup::from(1900_i64).to_filter("birth_year", None);
        assert_eq!(filter, "birth_year:1900");
    }

    #[test]
    fn tagged_lookup() {
        let filter = Lookup::from("person").to_filter("item_type_s", Some("type"));
        assert_eq!(filter, "{!tag=type}item_type_s:person");
    }

    #[test]
    fn any_of_lookup() {
        let filter = Lookup::any_of(["person", "book"]).to_filter("item_type_s", None);
        assert_eq!(filter, "item_type_s:(person OR book)");
    }

    #[test]
    fn any_of_with_empty_value_allows_unset_field() {
        let filter = Lookup::any_of(["book", ""]).to_filter("item_type_s", None);
        assert_eq!(
            filter,
            "-(item_type_s:[* TO *] OR -item_type_s:(book))"
        );
    }

    #[test]
    fn any_of_only_empty_values_is_not_exists() {
        let filter = Lookup::any_of([""]).to_filter("item_type_s", None);
        assert_eq!(filter, "-item_type_s:[* TO *]");
    }

    #[test]
    fn exists_lookup() {
        assert_eq!(
            Lookup::exists(true).to_filter("death_year", None),
            "death_year:[* TO *]"
        );
        assert_eq!(
            Lookup::exists(false).to_filter("death_year", None),
            "-death_year:[* TO *]"
        );
    }

    #[test]
    fn range_lookup() {
        assert_eq!(
            Lookup::range(Some(1800), Some(1900)).to_filter("year", None),
            "year:[1800 TO 1900]"
        );
        assert_eq!(
            Lookup::range(Some(1800), None::<i64>).to_filter("year", None),
            "year:[1800 TO *]"
        );
        assert_eq!(
            Lookup::range(None::<i64>, Some(1900)).to_filter("year", None),
            "year:[* TO 1900]"
        );
    }
}
