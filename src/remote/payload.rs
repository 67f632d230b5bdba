//! Typed view over Europe PMC response envelopes.
//!
//! Envelopes are permissive: any data key may be missing, which means "no hits".
//! An `errCode` key is always fatal.

use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::common::{Paper, PaperRef};
use crate::error::{NetworkError, Result};
use crate::query::RelationKind;

/// Echo of the request a relation/terms payload answers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestEcho {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub source: Option<Value>,
}

impl RequestEcho {
    pub fn paper_id(&self) -> Option<String> {
        self.id.as_ref().and_then(scalar_to_string)
    }

    pub fn paper_ref(&self) -> Option<PaperRef> {
        let source = self.source.as_ref().and_then(scalar_to_string)?;
        PaperRef::new(source, self.paper_id()?).ok()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReferenceList {
    #[serde(default)]
    reference: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct CitationList {
    #[serde(default)]
    citation: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ResultList {
    #[serde(default)]
    result: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileList {
    #[serde(rename = "pubType", default)]
    pub_type: Vec<PubTypeCount>,
}

#[derive(Debug, Deserialize)]
struct PubTypeCount {
    name: String,
    count: u64,
}

#[derive(Debug, Default, Deserialize)]
struct SemanticTypeList {
    #[serde(rename = "semanticType", default)]
    semantic_type: Vec<SemanticType>,
}

#[derive(Debug, Deserialize)]
struct SemanticType {
    #[serde(rename = "tmSummary", default)]
    tm_summary: Vec<TermCount>,
}

#[derive(Debug, Deserialize)]
struct TermCount {
    term: String,
    count: u64,
}

/// One parsed response body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    err_code: Option<Value>,
    #[serde(default)]
    err_msg: Option<String>,
    #[serde(default)]
    hit_count: Option<u64>,
    #[serde(default)]
    request: Option<RequestEcho>,
    #[serde(default)]
    reference_list: Option<ReferenceList>,
    #[serde(default)]
    citation_list: Option<CitationList>,
    #[serde(default)]
    result_list: Option<ResultList>,
    #[serde(default)]
    profile_list: Option<ProfileList>,
    #[serde(default)]
    semantic_type_list: Option<SemanticTypeList>,
}

impl Envelope {
    /// Parse a payload, failing on an application error code
    pub fn parse(payload: Value) -> Result<Self> {
        let envelope: Envelope = serde_json::from_value(payload).map_err(|e| {
            NetworkError::IncompleteEnvelope(format!("unexpected payload shape: {}", e))
        })?;
        envelope.check()
    }

    fn check(self) -> Result<Self> {
        match self.err_code {
            Some(code) => Err(NetworkError::RemoteData {
                code: scalar_to_string(&code).unwrap_or_else(|| code.to_string()),
                message: self.err_msg.unwrap_or_default(),
            }),
            None => Ok(self),
        }
    }

    pub fn hit_count(&self) -> Option<u64> {
        self.hit_count
    }

    pub fn request(&self) -> Option<&RequestEcho> {
        self.request.as_ref()
    }

    /// Count of the `ALL` publication type in a profile payload; 0 when absent
    pub fn profile_total(&self) -> u64 {
        self.profile_list
            .as_ref()
            .and_then(|list| list.pub_type.iter().find(|t| t.name == "ALL"))
            .map(|t| t.count)
            .unwrap_or(0)
    }

    /// Papers listed by a search payload
    pub fn search_results(&self) -> Vec<Paper> {
        self.result_list
            .as_ref()
            .map(|list| extract_papers(&list.result))
            .unwrap_or_default()
    }

    /// Related papers and the direction they were listed in.
    /// A reference list wins when both are present.
    pub fn related_papers(&self) -> Option<(RelationKind, Vec<Paper>)> {
        if let Some(list) = &self.reference_list {
            return Some((RelationKind::References, extract_papers(&list.reference)));
        }
        self.citation_list
            .as_ref()
            .map(|list| (RelationKind::Citations, extract_papers(&list.citation)))
    }

    /// Mined terms with their counts, flattened over semantic types
    pub fn mined_terms(&self) -> HashMap<String, u64> {
        let mut terms = HashMap::new();
        if let Some(list) = &self.semantic_type_list {
            for semantic_type in &list.semantic_type {
                for entry in &semantic_type.tm_summary {
                    terms.insert(entry.term.clone(), entry.count);
                }
            }
        }
        terms
    }
}

/// Paper summary fields, loosely typed as the service returns them
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPaper {
    id: Option<Value>,
    source: Option<Value>,
    title: Option<Value>,
    author_string: Option<String>,
    pub_year: Option<Value>,
    cited_by_count: Option<Value>,
}

impl RawPaper {
    fn into_paper(self) -> Option<Paper> {
        let id = scalar_to_string(self.id.as_ref()?)?;
        let source = scalar_to_string(self.source.as_ref()?)?;
        let title = scalar_to_string(self.title.as_ref()?)?;
        let author_string = self.author_string?;
        let pub_year = scalar_to_i64(self.pub_year.as_ref()?)? as i32;
        let cited_count = self
            .cited_by_count
            .as_ref()
            .and_then(scalar_to_i64)
            .map(|c| c.max(0) as u64)
            .unwrap_or(0);

        Some(Paper {
            id,
            source,
            title,
            authors: author_string.split(", ").map(str::to_string).collect(),
            pub_year,
            cited_count,
        })
    }
}

/// Keep summaries carrying id, source, title, authorString and pubYear
pub fn extract_papers(items: &[Value]) -> Vec<Paper> {
    items
        .iter()
        .filter_map(|item| {
            let paper = serde_json::from_value::<RawPaper>(item.clone())
                .ok()
                .and_then(RawPaper::into_paper);
            if paper.is_none() {
                debug!("Skipping incomplete paper summary: {}", item);
            }
            paper
        })
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
