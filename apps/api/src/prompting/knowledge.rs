use async_trait::async_trait;
use tracing::{debug, warn};

use crate::prompting::templates::REFERENCE_HEADER;

/// Documents retrieved for a prompt.
pub const REFERENCE_LIMIT: usize = 3;

/// External similarity-search backend (a vector store, typically).
/// Consumed here, never implemented by this service.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<String>>;
}

/// Appends a reference-material block retrieved for `query`.
///
/// Returns the prompt unchanged when no backend is configured, when nothing
/// is found, or when the search fails. Enrichment never fails a request.
pub async fn enhance_with_context(
    prompt: String,
    query: &str,
    search: Option<&dyn SimilaritySearch>,
) -> String {
    let Some(search) = search else {
        return prompt;
    };

    match search.search(query, REFERENCE_LIMIT).await {
        Ok(docs) if docs.is_empty() => prompt,
        Ok(docs) => {
            debug!("Enriching prompt with {} reference documents", docs.len());
            let mut out = prompt;
            out.push_str(REFERENCE_HEADER);
            for doc in docs.iter().take(REFERENCE_LIMIT) {
                out.push_str("- ");
                out.push_str(doc);
                out.push('\n');
            }
            out
        }
        Err(e) => {
            warn!("Similarity search failed for '{query}', continuing without references: {e}");
            prompt
        }
    }
}

/// Fixed in-process document list, ranked by how many query words each
/// document contains. Ties keep list order. Stands in for a real vector
/// store when `ENABLE_REFERENCE_LIBRARY` is set.
pub struct ReferenceLibrary {
    documents: Vec<String>,
}

impl ReferenceLibrary {
    pub fn new(documents: Vec<String>) -> Self {
        Self { documents }
    }
}

impl Default for ReferenceLibrary {
    fn default() -> Self {
        Self::new(
            [
                "Spring Boot 최신 버전 업데이트 가이드",
                "JPA 성능 최적화 베스트 프랙티스",
                "마이크로서비스 아키텍처 설계 패턴",
                "REST API 설계 원칙과 실무 적용",
                "데이터베이스 인덱싱 전략",
            ]
            .map(str::to_string)
            .to_vec(),
        )
    }
}

#[async_trait]
impl SimilaritySearch for ReferenceLibrary {
    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<String>> {
        let words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        let mut ranked: Vec<(usize, &String)> = self
            .documents
            .iter()
            .map(|doc| {
                let lower = doc.to_lowercase();
                (words.iter().filter(|w| lower.contains(w.as_str())).count(), doc)
            })
            .collect();
        // Stable sort keeps list order among equal scores.
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(ranked.into_iter().take(limit).map(|(_, d)| d.clone()).collect())
    }
}
