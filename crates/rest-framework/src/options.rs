//! Query-string options for collection requests (paging and sorting).

/// Options appended to a collection `GET` as query-string parameters.
///
/// `sort` entries are emitted one parameter each (`sort=name,asc&sort=id`), every
/// other option once. An empty value produces no query string at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Vec<String>,
    pub params: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Adds a sort criterion such as `"name,asc"`.
    pub fn sort(mut self, criterion: impl Into<String>) -> Self {
        self.sort.push(criterion.into());
        self
    }

    /// Adds an arbitrary query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.size.is_none() && self.sort.is_empty() && self.params.is_empty()
    }

    /// Flattens the options into ordered `(key, value)` pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        pairs.extend(self.params.iter().cloned());
        pairs.extend(self.sort.iter().map(|s| ("sort".to_string(), s.clone())));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_produce_no_pairs() {
        let options = RequestOptions::new();
        assert!(options.is_empty());
        assert!(options.to_query_pairs().is_empty());
    }

    #[test]
    fn sort_is_repeated_and_comes_last() {
        let options = RequestOptions::new()
            .sort("name,asc")
            .page(2)
            .size(20)
            .param("eagerload", true)
            .sort("id");

        let pairs = options.to_query_pairs();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["page", "size", "eagerload", "sort", "sort"]);
        assert_eq!(pairs[2].1, "true");
        assert_eq!(pairs[3].1, "name,asc");
        assert_eq!(pairs[4].1, "id");
    }
}
