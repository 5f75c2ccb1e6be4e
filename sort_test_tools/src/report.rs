use log::error;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("sort is broken! position {index} holds {val} after {prev}")]
    NotSorted { index: usize, prev: i64, val: i64 },
    #[error("sort is broken! outputs diverge at position {index}: {a} != {b}")]
    Diverged { index: usize, a: i64, b: i64 },
    #[error("invalid context during sort, {calls} comparator call(s) got a foreign context")]
    ContextMismatch { calls: usize },
    #[error("sort lost or duplicated records, {len} records in, different set out")]
    ElementsLost { len: usize },
}

/// Outcome of one or more scenarios. Merging never clears a fault.
#[derive(Debug, Default)]
pub struct Report {
    scenarios: usize,
    faults: Vec<Fault>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scenario(&mut self) {
        self.scenarios += 1;
    }

    pub fn record(&mut self, scenario: &str, fault: Fault) {
        error!("{scenario}: {fault}");
        self.faults.push(fault);
    }

    pub fn record_if(&mut self, scenario: &str, result: Result<(), Fault>) {
        if let Err(fault) = result {
            self.record(scenario, fault);
        }
    }

    pub fn merge(&mut self, other: Report) {
        self.scenarios += other.scenarios;
        self.faults.extend(other.faults);
    }

    pub fn is_broken(&self) -> bool {
        !self.faults.is_empty()
    }

    pub fn scenarios(&self) -> usize {
        self.scenarios
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    /// One scenario may record several faults, so faults and scenarios are counted apart.
    pub fn summary(&self) -> String {
        if self.is_broken() {
            format!(
                "{} fault(s) in {} scenarios",
                self.faults.len(),
                self.scenarios
            )
        } else {
            format!("All {} scenarios passed", self.scenarios)
        }
    }
}
