//! Row-parallel evaluation of the weighted generator blend into a [`Field`].

use opencip_core::field::checked_area;
use opencip_core::{Field, RenderError, VisualContext};
use opencip_patterns::GeneratorSet;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Progress is reported after every this many completed rows.
pub const PROGRESS_ROW_STRIDE: usize = 20;

/// Percent-complete callback, invoked from worker threads.
pub type ProgressFn<'a> = &'a (dyn Fn(u32) + Sync);

/// Shared completed-row counter. The callback runs while the lock is held,
/// so reported percentages never decrease.
pub(crate) struct RowProgress<'a> {
    done: Mutex<usize>,
    total: usize,
    callback: Option<ProgressFn<'a>>,
}

impl<'a> RowProgress<'a> {
    pub(crate) fn new(total: usize, callback: Option<ProgressFn<'a>>) -> Self {
        Self {
            done: Mutex::new(0),
            total,
            callback,
        }
    }

    fn row_finished(&self) {
        let mut done = self.done.lock().unwrap_or_else(|e| e.into_inner());
        *done += 1;
        if *done % PROGRESS_ROW_STRIDE == 0 {
            let percent = (*done * 100 / self.total) as u32;
            log::trace!("composite progress {percent}%");
            if let Some(cb) = self.callback {
                cb(percent);
            }
        }
    }

    pub(crate) fn completed(&self) -> usize {
        *self.done.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Normalized sample coordinate for pixel index `i` along an axis of `n`
/// pixels. The symmetric fold maps `i` and `n - 1 - i` to the same value
/// and rises to just under 1 at the centre. It folds pixel indices rather
/// than the continuous `u < 0.5 ? 2u : 2(1 - u)`, so mirrored pixels read
/// identical coordinates; on the right half it sits up to `2/n` below the
/// continuous fold.
pub fn axis_coord(i: usize, n: usize, symmetric: bool) -> f64 {
    if symmetric {
        2.0 * i.min(n - 1 - i) as f64 / n as f64
    } else {
        i as f64 / n as f64
    }
}

/// Blends every generator of `ctx` over a `width × height` grid.
///
/// Rows are distributed across the rayon pool. When `cancel` becomes set,
/// rows not yet started are skipped and the call returns
/// `RenderError::Cancelled` unless every row had already finished.
pub fn scalar_field(
    width: usize,
    height: usize,
    ctx: &VisualContext,
    progress: Option<ProgressFn<'_>>,
    cancel: Option<&AtomicBool>,
) -> Result<Field, RenderError> {
    let area = checked_area(width, height)?;
    let set = GeneratorSet::prepare(ctx);
    let rows = RowProgress::new(height, progress);
    let symmetric = ctx.symmetric();

    let mut data = vec![0.0; area];
    data.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return;
        }
        let v = axis_coord(y, height, symmetric);
        for (x, out) in row.iter_mut().enumerate() {
            *out = set.blend(axis_coord(x, width, symmetric), v);
        }
        rows.row_finished();
    });

    let completed = rows.completed();
    if completed < height {
        return Err(RenderError::Cancelled {
            completed_rows: completed,
            total_rows: height,
        });
    }
    Field::from_data(width, height, data)
}
