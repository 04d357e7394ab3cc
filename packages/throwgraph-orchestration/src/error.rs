use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Analysis error: {0}")]
    Ir(#[from] throwgraph_ir::ThrowgraphError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extractor failure: {0}")]
    Extractor(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OrchestratorError {
    pub fn extractor(msg: impl Into<String>) -> Self {
        Self::Extractor(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
