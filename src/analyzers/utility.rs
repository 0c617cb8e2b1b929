/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Reduction applied to one summary field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Mean,
    Sum,
}

impl Aggregation {
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Aggregation::Mean => mean(values),
            Aggregation::Sum => values.iter().sum(),
        }
    }
}
