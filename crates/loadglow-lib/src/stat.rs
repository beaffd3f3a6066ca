//! CPU time counters from `/proc/stat` and the load delta between two samples.
//!
//! See `man 5 proc`: the aggregate `cpu` line holds cumulative time spent in
//! each mode since boot, in clock ticks.

use std::fmt;
use std::path::{Path, PathBuf};

/// Default counter source on Linux.
pub const PROC_STAT_PATH: &str = "/proc/stat";

/// Number of counters on the aggregate `cpu` line.
pub const FIELD_COUNT: usize = 10;

const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "user",
    "nice",
    "system",
    "idle",
    "iowait",
    "irq",
    "softirq",
    "steal",
    "guest",
    "guest_nice",
];

// ── Error type ──

#[derive(Debug)]
pub enum StatError {
    /// The counter source could not be read.
    Read(std::io::Error),
    /// The counter source did not contain a well-formed `cpu` line.
    Parse(String),
}

impl fmt::Display for StatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatError::Read(e) => write!(f, "Failed to read CPU counters: {e}"),
            StatError::Parse(e) => write!(f, "Malformed CPU counters: {e}"),
        }
    }
}

impl std::error::Error for StatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StatError::Read(e) => Some(e),
            StatError::Parse(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StatError>;

// ── Samples ──

/// Cumulative CPU time per mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuSample {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuSample {
    fn from_fields(f: [u64; FIELD_COUNT]) -> Self {
        CpuSample {
            user: f[0],
            nice: f[1],
            system: f[2],
            idle: f[3],
            iowait: f[4],
            irq: f[5],
            softirq: f[6],
            steal: f[7],
            guest: f[8],
            guest_nice: f[9],
        }
    }

    fn fields(&self) -> [u64; FIELD_COUNT] {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
            self.guest,
            self.guest_nice,
        ]
    }
}

/// Time accounted between two samples.
///
/// `busy` is user + nice + system; `total` is the sum of all ten modes, so
/// `busy <= total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadDelta {
    busy: u64,
    total: u64,
}

impl LoadDelta {
    pub fn busy(&self) -> u64 {
        self.busy
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// `busy / total`, or `None` for an empty window.
    pub fn ratio(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.busy as f64 / self.total as f64)
        }
    }
}

/// A counter went backwards between two samples (host counter reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterRegression {
    pub field: &'static str,
    pub prev: u64,
    pub curr: u64,
}

impl fmt::Display for CounterRegression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} counter went backwards ({} -> {})",
            self.field, self.prev, self.curr
        )
    }
}

/// Load between `prev` and `curr`.
///
/// Returns the first field that decreased instead of a wrapped value.
pub fn delta(
    curr: &CpuSample,
    prev: &CpuSample,
) -> std::result::Result<LoadDelta, CounterRegression> {
    let (c, p) = (curr.fields(), prev.fields());
    let mut d = [0u64; FIELD_COUNT];
    for (i, slot) in d.iter_mut().enumerate() {
        *slot = c[i].checked_sub(p[i]).ok_or(CounterRegression {
            field: FIELD_NAMES[i],
            prev: p[i],
            curr: c[i],
        })?;
    }

    let busy = d[0].saturating_add(d[1]).saturating_add(d[2]);
    let total = d[3..]
        .iter()
        .fold(busy, |acc, &x| acc.saturating_add(x));
    Ok(LoadDelta { busy, total })
}

// ── Parsing ──

/// Parse the aggregate `cpu` line out of `/proc/stat` content.
///
/// Format: `cpu  user nice system idle iowait irq softirq steal guest guest_nice`.
/// Tokens after the tenth are ignored.
pub fn parse_stat(content: &str) -> Result<CpuSample> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| StatError::Parse("no aggregate cpu line".into()))?;

    let mut fields = [0u64; FIELD_COUNT];
    let mut tokens = line.split_whitespace().skip(1);
    for (i, slot) in fields.iter_mut().enumerate() {
        let tok = tokens.next().ok_or_else(|| {
            StatError::Parse(format!(
                "expected {FIELD_COUNT} counters on cpu line, found {i}"
            ))
        })?;
        *slot = tok.parse().map_err(|e| {
            StatError::Parse(format!("{} counter {tok:?}: {e}", FIELD_NAMES[i]))
        })?;
    }
    Ok(CpuSample::from_fields(fields))
}

// ── Sources ──

/// Something that yields cumulative CPU samples.
pub trait StatSource {
    fn read_sample(&mut self) -> Result<CpuSample>;
}

/// Reads counters from a procfs-formatted file on every call.
#[derive(Debug, Clone)]
pub struct ProcStat {
    path: PathBuf,
}

impl ProcStat {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ProcStat {
    fn default() -> Self {
        Self::new(PROC_STAT_PATH)
    }
}

impl StatSource for ProcStat {
    fn read_sample(&mut self) -> Result<CpuSample> {
        let content = std::fs::read_to_string(&self.path).map_err(StatError::Read)?;
        parse_stat(&content)
    }
}

/// Scripted counter source for tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;

    /// Yields queued samples in order, then repeats the last one forever.
    #[derive(Debug, Default)]
    pub struct ScriptedStat {
        queue: VecDeque<Result<CpuSample>>,
        last: CpuSample,
        /// Number of `read_sample` calls made.
        pub reads: usize,
    }

    impl ScriptedStat {
        pub fn new(samples: impl IntoIterator<Item = CpuSample>) -> Self {
            Self {
                queue: samples.into_iter().map(Ok).collect(),
                ..Self::default()
            }
        }

        /// Queue a read failure after the already queued samples.
        pub fn then_fail(mut self, err: StatError) -> Self {
            self.queue.push_back(Err(err));
            self
        }
    }

    impl StatSource for ScriptedStat {
        fn read_sample(&mut self) -> Result<CpuSample> {
            self.reads += 1;
            match self.queue.pop_front() {
                Some(Ok(sample)) => {
                    self.last = sample;
                    Ok(sample)
                }
                Some(Err(e)) => Err(e),
                None => Ok(self.last),
            }
        }
    }

    /// Sample with the given user/system/idle counters and the rest zero.
    pub fn sample(user: u64, system: u64, idle: u64) -> CpuSample {
        CpuSample {
            user,
            system,
            idle,
            ..CpuSample::default()
        }
    }
}
