//! Listing filters

use crate::CatalogError;
use std::fmt;
use std::str::FromStr;

/// Field a listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Released,
    Added,
    Created,
    Updated,
    Rating,
    Metacritic,
}

impl SortField {
    /// Get field as query parameter value
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Released => "released",
            SortField::Added => "added",
            SortField::Created => "created",
            SortField::Updated => "updated",
            SortField::Rating => "rating",
            SortField::Metacritic => "metacritic",
        }
    }
}

/// Sort order of a listing; unset means catalog relevance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl SortOrder {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            f.write_str("-")?;
        }
        f.write_str(self.field.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = CatalogError;

    /// Parse `rating` or `-rating`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let field = match name {
            "name" => SortField::Name,
            "released" => SortField::Released,
            "added" => SortField::Added,
            "created" => SortField::Created,
            "updated" => SortField::Updated,
            "rating" => SortField::Rating,
            "metacritic" => SortField::Metacritic,
            _ => return Err(CatalogError::InvalidFilter(format!("unknown ordering '{}'", s))),
        };

        Ok(Self { field, descending })
    }
}

/// Filters for a game listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameFilters {
    /// Free-text query
    pub search: Option<String>,
    /// Platform id
    pub platform: Option<u64>,
    /// Genre id
    pub genre: Option<u64>,
    pub ordering: Option<SortOrder>,
    /// 1-based page number
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl GameFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn platform(mut self, id: u64) -> Self {
        self.platform = Some(id);
        self
    }

    pub fn genre(mut self, id: u64) -> Self {
        self.genre = Some(id);
        self
    }

    pub fn ordering(mut self, ordering: SortOrder) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Query parameters for the listing endpoint
    pub fn to_query(&self, default_page_size: u32) -> Vec<(String, String)> {
        let mut query = Vec::new();

        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query.push(("search".to_string(), search.to_string()));
        }
        if let Some(platform) = self.platform {
            query.push(("platforms".to_string(), platform.to_string()));
        }
        if let Some(genre) = self.genre {
            query.push(("genres".to_string(), genre.to_string()));
        }
        if let Some(ordering) = self.ordering {
            query.push(("ordering".to_string(), ordering.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.max(1).to_string()));
        }
        let page_size = self.page_size.unwrap_or(default_page_size);
        query.push(("page_size".to_string(), page_size.to_string()));

        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parse() {
        let order: SortOrder = "-rating".parse().unwrap();
        assert_eq!(order, SortOrder::descending(SortField::Rating));
        assert_eq!(order.to_string(), "-rating");

        let order: SortOrder = "name".parse().unwrap();
        assert!(!order.descending);

        assert!("-popularity".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_default_query() {
        let query = GameFilters::new().to_query(12);
        assert_eq!(query, vec![("page_size".to_string(), "12".to_string())]);
    }

    #[test]
    fn test_full_query() {
        let filters = GameFilters::new()
            .search("  zelda ")
            .platform(7)
            .genre(4)
            .ordering(SortOrder::descending(SortField::Released))
            .page(3)
            .page_size(20);

        let query = filters.to_query(12);
        let pairs: Vec<(&str, &str)> = query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("search", "zelda"),
                ("platforms", "7"),
                ("genres", "4"),
                ("ordering", "-released"),
                ("page", "3"),
                ("page_size", "20"),
            ]
        );
    }

    #[test]
    fn test_blank_search_skipped() {
        let query = GameFilters::new().search("   ").to_query(12);
        assert!(query.iter().all(|(k, _)| k != "search"));
    }
}
