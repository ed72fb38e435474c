use thiserror::Error as DError;

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Similarity threshold must be between 0 and 1, got {0}")]
    InvalidSimilarityThreshold(f64),

    #[error("Maximum number of recommendations must be greater than zero")]
    EmptyRecommendationCap,
}
