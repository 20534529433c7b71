//! Record sampling.
//!
//! Both policies select candidate lines by their raw line index,
//! prior to any class filtering: lines of other classes and malformed
//! lines are counted, then discarded.
//! Stride decimation parses every line, so malformed lines are reported
//! wherever they stand. Uniform sampling only decodes its candidates.
use std::{io::BufRead, path::Path};

use log::{debug, error};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    reader::BufferedReader,
    record::{decode, parse, Message},
    Error, ParsingError,
};

/// Sampling policy
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SamplingPolicy {
    /// Stride decimation: retains line `i` when `i % every == 0`.
    Stride(usize),
    /// Uniform sampling of (at most) `n` lines spread accross
    /// the whole source. `n = 0` selects all lines.
    Uniform(usize),
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self::Stride(Self::DEFAULT_STRIDE)
    }
}

impl std::fmt::Display for SamplingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Stride(every) => write!(f, "every {} lines", every),
            Self::Uniform(0) => write!(f, "all lines"),
            Self::Uniform(n) => write!(f, "{} uniformly spread lines", n),
        }
    }
}

impl SamplingPolicy {
    /// Default stride
    pub const DEFAULT_STRIDE: usize = 10;
    /// Default uniform sample count
    pub const DEFAULT_COUNT: usize = 50;

    /// Builds a new stride decimation policy
    pub fn stride(every: usize) -> Self {
        Self::Stride(every)
    }

    /// Builds a new uniform sampling policy
    pub fn uniform(n: usize) -> Self {
        Self::Uniform(n)
    }

    /// Verifies this policy may be applied
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Self::Stride(0) => Err(Error::InvalidSampling),
            _ => Ok(()),
        }
    }

    /// Returns the sample count that was requested, if any
    pub fn requested(&self) -> Option<usize> {
        match self {
            Self::Uniform(n) if *n > 0 => Some(*n),
            _ => None,
        }
    }

    /// Returns the candidate line indices, for a source of `total` lines.
    pub fn candidates(&self, total: usize) -> Result<impl Iterator<Item = usize>, Error> {
        self.validate()?;
        let (step, count) = match self {
            Self::Stride(every) => (*every, total),
            Self::Uniform(0) => (1, total),
            Self::Uniform(n) => (std::cmp::max(total / n, 1), *n),
        };
        Ok((0..total).step_by(step).take(count))
    }
}

/// [SampleSet] is the result of the sampling process.
#[derive(Debug)]
pub struct SampleSet<M> {
    /// Retained records, in source order
    pub records: Vec<M>,
    /// Applied [SamplingPolicy]
    pub policy: SamplingPolicy,
    /// Total number of lines in the source
    pub total_lines: usize,
    /// Number of candidate lines that were visited
    pub candidates: usize,
    /// Malformed records that were encountered, and skipped
    pub diagnostics: Vec<ParsingError>,
}

impl<M> SampleSet<M> {
    fn new(policy: SamplingPolicy) -> Self {
        Self {
            policy,
            records: Vec::new(),
            total_lines: 0,
            candidates: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no record was retained
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over retained records, in source order
    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.records.iter()
    }

    /// Returns the most recent record
    pub fn last(&self) -> Option<&M> {
        self.records.last()
    }
}

impl<M: Message> SampleSet<M> {
    /// Decodes a candidate line
    fn visit(&mut self, index: usize, line: &[u8]) {
        self.candidates += 1;
        match decode::<M>(index, line) {
            Ok(Some(record)) => self.records.push(record),
            Ok(None) => {},
            Err(e) => self.report(e),
        }
    }

    /// Stride decimation: candidates are decoded,
    /// other lines are only verified.
    fn stride(&mut self, index: usize, every: usize, line: &[u8]) {
        if index % every == 0 {
            self.visit(index, line);
        } else if let Err(e) = parse(index, line) {
            self.report(e);
        }
    }

    fn report(&mut self, e: ParsingError) {
        error!("malformed record, {}", e);
        self.diagnostics.push(e);
    }

    fn summarize(self) -> Self {
        debug!(
            "{} sampling ({}): {}/{} lines visited, {} record(s) retained, {} malformed",
            M::CLASS,
            self.policy,
            self.candidates,
            self.total_lines,
            self.records.len(),
            self.diagnostics.len(),
        );
        self
    }
}

/// Samples records from lines that are already loaded.
pub fn sample_lines<M: Message, S: AsRef<[u8]>>(
    lines: &[S],
    policy: SamplingPolicy,
) -> Result<SampleSet<M>, Error> {
    policy.validate()?;
    let mut set = SampleSet::new(policy);
    set.total_lines = lines.len();
    match policy {
        SamplingPolicy::Stride(every) => {
            for (index, line) in lines.iter().enumerate() {
                set.stride(index, every, line.as_ref());
            }
        },
        SamplingPolicy::Uniform(_) => {
            for index in policy.candidates(lines.len())? {
                set.visit(index, lines[index].as_ref());
            }
        },
    }
    Ok(set.summarize())
}

/// Samples records from a readable interface.
/// Stride decimation is streamed, uniform sampling needs to
/// load the lines first, to determine the total line count.
pub fn sample<M: Message, R: BufRead>(
    reader: R,
    policy: SamplingPolicy,
) -> Result<SampleSet<M>, Error> {
    policy.validate()?;
    match policy {
        SamplingPolicy::Stride(every) => {
            let mut set = SampleSet::new(policy);
            for (index, line) in reader.split(b'\n').enumerate() {
                let line = line?;
                set.total_lines += 1;
                set.stride(index, every, &line);
            }
            Ok(set.summarize())
        },
        SamplingPolicy::Uniform(_) => {
            let lines = reader.split(b'\n').collect::<Result<Vec<_>, _>>()?;
            sample_lines(&lines, policy)
        },
    }
}

/// Samples records from a local file, plain or gzip compressed.
pub fn sample_path<M: Message, P: AsRef<Path>>(
    path: P,
    policy: SamplingPolicy,
) -> Result<SampleSet<M>, Error> {
    let reader = BufferedReader::from_path(path)?;
    sample(reader, policy)
}
