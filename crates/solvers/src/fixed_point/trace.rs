/// A single fixed-point step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Iteration counter (1-based).
    pub iter: usize,
    /// The iterate before the step.
    pub x: f64,
    /// The iterate after the step, `g(x)`.
    pub gx: f64,
    /// Absolute step size `|gx - x|`.
    pub error: f64,
}

/// Append-only record of every step taken during a solve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    records: Vec<Record>,
}

/// A trace split into parallel columns, one entry per iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceColumns {
    pub iterations: Vec<usize>,
    pub x_values: Vec<f64>,
    pub g_values: Vec<f64>,
    pub errors: Vec<f64>,
}

impl Trace {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub(super) fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Returns the records in iteration order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of recorded iterations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no iteration was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Splits the trace into the iteration, x, g(x) and error series.
    #[must_use]
    pub fn columns(&self) -> TraceColumns {
        let mut columns = TraceColumns {
            iterations: Vec::with_capacity(self.len()),
            x_values: Vec::with_capacity(self.len()),
            g_values: Vec::with_capacity(self.len()),
            errors: Vec::with_capacity(self.len()),
        };
        for record in &self.records {
            columns.iterations.push(record.iter);
            columns.x_values.push(record.x);
            columns.g_values.push(record.gx);
            columns.errors.push(record.error);
        }
        columns
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_record_order() {
        let mut trace = Trace::default();
        trace.push(Record {
            iter: 1,
            x: 0.0,
            gx: 1.0,
            error: 1.0,
        });
        trace.push(Record {
            iter: 2,
            x: 1.0,
            gx: 1.5,
            error: 0.5,
        });

        let columns = trace.columns();
        assert_eq!(columns.iterations, [1, 2]);
        assert_eq!(columns.x_values, [0.0, 1.0]);
        assert_eq!(columns.g_values, [1.0, 1.5]);
        assert_eq!(columns.errors, [1.0, 0.5]);
        assert_eq!(trace.last().map(|record| record.iter), Some(2));
    }
}
