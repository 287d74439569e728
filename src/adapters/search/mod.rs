//! Retrieval adapters.

mod mock_retriever;
mod weaviate;

pub use mock_retriever::{MockRetriever, MockSearchResult};
pub use weaviate::{WeaviateConfig, WeaviateRetriever};
