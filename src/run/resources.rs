//! Run resources and state.

use std::sync::Arc;

use tokio::fs::File;
use tokio::io::{AsyncRead, BufReader, Lines};

use crate::agents::PipelineContext;

/// Where targets are read from.
pub enum TargetSource {
    Stdin,
    /// Opened during initialization so an unreadable file fails the run early
    File(File),
}

impl TargetSource {
    pub fn lines(self) -> Lines<BufReader<Box<dyn AsyncRead + Unpin + Send>>> {
        use tokio::io::AsyncBufReadExt;
        let reader: Box<dyn AsyncRead + Unpin + Send> = match self {
            TargetSource::Stdin => Box::new(tokio::io::stdin()),
            TargetSource::File(file) => Box::new(file),
        };
        BufReader::new(reader).lines()
    }
}

/// Everything a run needs once initialization succeeded.
pub struct PipelineResources {
    pub ctx: Arc<PipelineContext>,
    pub source: TargetSource,
}
