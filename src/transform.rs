// geocode_ingestor/src/transform.rs
// Rewrites a raw value into the query sent to the geocoder.

use clap::ValueEnum;

/// Maps a raw source value to the geocoding query.
pub type Transform = dyn Fn(&str,) -> String + Send + Sync;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum,)]
pub enum TransformStep {
    /// Strip leading and trailing whitespace
    Trim,
    /// Uppercase the value
    Upper,
    /// Lowercase the value
    Lower,
    /// Replace runs of whitespace with a single space
    CollapseWhitespace,
}

impl TransformStep {
    pub fn apply(self, value: &str,) -> String {
        match self {
            TransformStep::Trim => value.trim().to_string(),
            TransformStep::Upper => value.to_uppercase(),
            TransformStep::Lower => value.to_lowercase(),
            TransformStep::CollapseWhitespace => value.split_whitespace().collect::<Vec<_,>>().join(" ",),
        }
    }
}

/// Composes `steps` in order, then wraps the result in `prefix`/`suffix`.
/// Returns `None` when there is nothing to do, so the raw value is sent as is.
pub fn build_transform(
    steps: Vec<TransformStep,>,
    prefix: Option<String,>,
    suffix: Option<String,>,
) -> Option<Box<Transform,>,> {
    if steps.is_empty() && prefix.is_none() && suffix.is_none() {
        return None;
    }
    Some(Box::new(move |value: &str| {
        let mut out = value.to_string();
        for step in &steps {
            out = step.apply(&out,);
        }
        format!(
            "{}{}{}",
            prefix.as_deref().unwrap_or_default(),
            out,
            suffix.as_deref().unwrap_or_default()
        )
    },),)
}
