use rayon::prelude::*;

use crate::foundation::error::{GifCanvasError, GifCanvasResult};

/// Worker pool configuration for per-frame work (raster edits, compositing, quantization).
///
/// Frames have no data dependency on each other, so they can be processed on a rayon pool.
/// Results are always collected back in frame order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
        }
    }
}

/// Apply `f` to every item and collect results in input order.
///
/// Fails fast: the first error aborts the whole batch and no partial output is returned.
pub(crate) fn map_ordered<T, R, F>(
    items: &mut [T],
    threading: &RenderThreading,
    f: F,
) -> GifCanvasResult<Vec<R>>
where
    T: Send,
    R: Send,
    F: Fn(&mut T) -> GifCanvasResult<R> + Sync + Send,
{
    if !threading.parallel || items.len() < 2 {
        return items.iter_mut().map(&f).collect();
    }

    let pool = build_thread_pool(threading.threads)?;
    pool.install(|| items.par_iter_mut().map(&f).collect())
}

fn build_thread_pool(threads: Option<usize>) -> GifCanvasResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(GifCanvasError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| GifCanvasError::raster(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/threading.rs"]
mod tests;
