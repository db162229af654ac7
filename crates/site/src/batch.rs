//! Parallel rendering of many posts.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::document::{RenderedDocument, render_document};
use crate::render::RenderOptions;

/// One post to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Identifier echoed back in the result, typically the file path.
    pub id: String,
    /// Markdown source including frontmatter.
    pub source: String,
}

/// Options for [`render_batch`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchOptions {
    /// Maximum worker threads. Defaults to the global rayon pool.
    pub max_threads: Option<usize>,
    /// Options shared by every document.
    pub render: RenderOptions,
}

/// Result for a single post.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Identifier matching the input.
    pub id: String,
    /// Rendered document, present on success.
    pub document: Option<RenderedDocument>,
    /// Error message, present on failure.
    pub error: Option<String>,
}

/// Batch statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    /// Number of posts processed.
    pub total: u32,
    /// Posts rendered successfully.
    pub succeeded: u32,
    /// Posts that failed.
    pub failed: u32,
    /// Wall time in milliseconds.
    pub processing_time_ms: f64,
}

/// Every result, in input order, plus statistics.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Per-post results.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Render posts in parallel. A failing post never affects the others.
pub fn render_batch(inputs: Vec<DocumentInput>, options: &BatchOptions) -> BatchOutput {
    let start = Instant::now();

    let pool = options.max_threads.and_then(|threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| log::warn!("falling back to the global thread pool: {err}"))
            .ok()
    });

    let total = inputs.len() as u32;
    let succeeded = AtomicU32::new(0);
    let failed = AtomicU32::new(0);

    let process_input = |input: DocumentInput| -> BatchResult {
        match render_document(&input.source, &options.render) {
            Ok(document) => {
                succeeded.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    document: Some(document),
                    error: None,
                }
            }
            Err(err) => {
                log::warn!("{}: {err}", input.id);
                failed.fetch_add(1, Ordering::Relaxed);
                BatchResult {
                    id: input.id,
                    document: None,
                    error: Some(err.to_string()),
                }
            }
        }
    };

    let results: Vec<BatchResult> = match pool {
        Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
        None => inputs.into_par_iter().map(process_input).collect(),
    };

    BatchOutput {
        results,
        stats: BatchStats {
            total,
            succeeded: succeeded.load(Ordering::Relaxed),
            failed: failed.load(Ordering::Relaxed),
            processing_time_ms: start.elapsed().as_secs_f64() * 1000.0,
        },
    }
}
