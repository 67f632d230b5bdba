use std::fmt;
use std::str::FromStr;

use crate::common::PaperRef;
use crate::error::NetworkError;

/// Relation direction queried for a paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    /// Papers this paper cites
    References,
    /// Papers that cite this paper
    Citations,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::References => "references",
            RelationKind::Citations => "citations",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "references" => Ok(RelationKind::References),
            "citations" => Ok(RelationKind::Citations),
            other => Err(NetworkError::invalid(format!(
                "relation kind: expected 'citations' or 'references', found {:?}",
                other
            ))),
        }
    }
}

/// One GET against the remote service, independent of the transport that runs it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryDescriptor {
    /// Hit-count profile for a free-text query
    Profile { query: String },
    /// One page of free-text search results
    Search {
        query: String,
        page: u64,
        page_size: u32,
    },
    /// One page of a paper's references or citations
    Relations {
        paper: PaperRef,
        kind: RelationKind,
        page: u64,
        page_size: u32,
    },
    /// One page of a paper's text-mined terms
    MinedTerms {
        paper: PaperRef,
        page: u64,
        page_size: u32,
    },
}

impl QueryDescriptor {
    /// Single-result page used to read `hitCount`
    pub fn relation_count(paper: PaperRef, kind: RelationKind) -> Self {
        QueryDescriptor::Relations {
            paper,
            kind,
            page: 1,
            page_size: 1,
        }
    }

    pub fn mined_terms_count(paper: PaperRef) -> Self {
        QueryDescriptor::MinedTerms {
            paper,
            page: 1,
            page_size: 1,
        }
    }

    /// Path relative to the service endpoint
    pub fn path(&self) -> String {
        match self {
            QueryDescriptor::Profile { .. } => "profile".to_string(),
            QueryDescriptor::Search { .. } => "search".to_string(),
            QueryDescriptor::Relations {
                paper,
                kind,
                page,
                page_size,
            } => format!(
                "{}/{}/{}/{}/{}/json/",
                paper.source, paper.id, kind, page, page_size
            ),
            // empty semantic type segment selects every term group
            QueryDescriptor::MinedTerms {
                paper,
                page,
                page_size,
            } => format!(
                "{}/{}/textMinedTerms//{}/{}/json/",
                paper.source, paper.id, page, page_size
            ),
        }
    }

    /// Query-string parameters, unencoded
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            QueryDescriptor::Profile { query } => {
                vec![("format", "json".to_string()), ("query", query.clone())]
            }
            QueryDescriptor::Search {
                query,
                page,
                page_size,
            } => vec![
                ("format", "json".to_string()),
                ("pageSize", page_size.to_string()),
                ("query", query.clone()),
                ("page", page.to_string()),
            ],
            QueryDescriptor::Relations { .. } | QueryDescriptor::MinedTerms { .. } => Vec::new(),
        }
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())?;
        let params = self.query_params();
        if !params.is_empty() {
            let joined: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            write!(f, "?{}", joined.join("&"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn med(id: &str) -> PaperRef {
        PaperRef::new("MED", id).unwrap()
    }

    #[test]
    fn test_relation_path() {
        let q = QueryDescriptor::Relations {
            paper: med("10592235"),
            kind: RelationKind::Citations,
            page: 2,
            page_size: 1000,
        };
        assert_eq!(q.path(), "MED/10592235/citations/2/1000/json/");
        assert!(q.query_params().is_empty());
    }

    #[test]
    fn test_count_queries_use_single_result_page() {
        let q = QueryDescriptor::relation_count(med("1"), RelationKind::References);
        assert_eq!(q.path(), "MED/1/references/1/1/json/");

        let q = QueryDescriptor::mined_terms_count(med("1"));
        assert_eq!(q.path(), "MED/1/textMinedTerms//1/1/json/");
    }

    #[test]
    fn test_search_display() {
        let q = QueryDescriptor::Search {
            query: "10592235".to_string(),
            page: 1,
            page_size: 1000,
        };
        assert_eq!(
            q.to_string(),
            "search?format=json&pageSize=1000&query=10592235&page=1"
        );
    }

    #[test]
    fn test_relation_kind_parse() {
        assert_eq!("references".parse::<RelationKind>().unwrap(), RelationKind::References);
        assert!(matches!(
            "cited".parse::<RelationKind>(),
            Err(NetworkError::InvalidArgument(_))
        ));
    }
}
