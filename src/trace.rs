//! Logging hooks for decoding and suppression.
//!
//! The crate emits two spans, `decode_region` (fields `layer`, `side`,
//! `anchors`) around one scale and `postprocess` (field `outputs`) around a
//! whole frame. Inside them it records `region_detections { count }` after
//! each scale, `nms_survivors { before, after }` after suppression, and a
//! debug-level `region_rejected { layer }` when an output fails validation.
//!
//! Without the `tracing` feature none of this reaches a subscriber: spans
//! turn into `NoopSpan` and events only evaluate their field expressions.

/// Opens an info span. Call sites write `let _span = trace_span!(..).entered();`.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Records a named count event such as `region_detections`.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

/// Records `region_rejected` for an output that failed validation.
#[cfg(feature = "tracing")]
macro_rules! trace_reject {
    ($($key:ident = $value:expr),+ $(,)?) => {
        tracing::debug!(name: "region_rejected", $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_reject {
    ($($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use trace_event;
pub(crate) use trace_reject;
pub(crate) use trace_span;

/// Guard standing in for an entered span when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
