//! Single-CPU scheduling policies.
//!
//! Every policy returns one [`ProcessOutcome`] per input process, in input
//! order. When nothing is ready the clock jumps to the next arrival.
//!
//! | Policy   | Preemptive | Selects                       | Ties                |
//! |----------|------------|-------------------------------|---------------------|
//! | FCFS     | no         | earliest arrival              | input order         |
//! | SJF      | no         | shortest burst                | earliest admitted   |
//! | SRTF     | every unit | shortest remaining time       | lowest input index  |
//! | RR       | per slice  | head of FIFO ready queue      | input order         |
//! | Priority | no         | lowest priority number        | lowest input index  |

use std::collections::VecDeque;
use std::fmt;

use super::process::{validate, Process, ProcessOutcome};
use crate::error::SimError;

/// A scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Fcfs,
    Sjf,
    Srtf,
    RoundRobin { quantum: u32 },
    Priority,
}

impl Algorithm {
    pub const DEFAULT_QUANTUM: u32 = 2;

    /// All five policies in report order.
    pub fn suite(quantum: u32) -> [Algorithm; 5] {
        [
            Algorithm::Fcfs,
            Algorithm::Sjf,
            Algorithm::Srtf,
            Algorithm::RoundRobin { quantum },
            Algorithm::Priority,
        ]
    }

    /// Short name used as the `Algorithm` column value.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Fcfs => "FCFS",
            Algorithm::Sjf => "SJF",
            Algorithm::Srtf => "SRTF",
            Algorithm::RoundRobin { .. } => "RR",
            Algorithm::Priority => "Priority",
        }
    }

    /// Run the policy over `processes`.
    pub fn run(&self, processes: &[Process]) -> Result<Schedule, SimError> {
        validate(processes)?;
        let (outcomes, total_time) = match *self {
            Algorithm::Fcfs => fcfs(processes),
            Algorithm::Sjf => sjf(processes),
            Algorithm::Srtf => srtf(processes),
            Algorithm::RoundRobin { quantum: 0 } => return Err(SimError::ZeroQuantum),
            Algorithm::RoundRobin { quantum } => round_robin(processes, quantum),
            Algorithm::Priority => priority(processes),
        };
        Ok(Schedule {
            algorithm: *self,
            outcomes: outcomes.into_iter().flatten().collect(),
            total_time,
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Fcfs => write!(f, "First Come First Serve (FCFS)"),
            Algorithm::Sjf => write!(f, "Shortest Job First (SJF)"),
            Algorithm::Srtf => write!(f, "Shortest Remaining Time First (SRTF)"),
            Algorithm::RoundRobin { quantum } => {
                write!(f, "Round Robin (RR) with Time Quantum = {quantum}")
            }
            Algorithm::Priority => write!(f, "Priority Scheduling"),
        }
    }
}

/// A finished schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub algorithm: Algorithm,
    /// One entry per input process, in input order.
    pub outcomes: Vec<ProcessOutcome>,
    /// Time at which the last process completed.
    pub total_time: u32,
}

type Run = (Vec<Option<ProcessOutcome>>, u32);

/// Earliest arrival among processes that still have work, if any.
fn next_arrival(ps: &[Process], unfinished: impl Fn(usize) -> bool) -> Option<u32> {
    (0..ps.len())
        .filter(|&i| unfinished(i))
        .map(|i| ps[i].arrival)
        .min()
}

fn fcfs(ps: &[Process]) -> Run {
    let mut order: Vec<usize> = (0..ps.len()).collect();
    order.sort_by_key(|&i| ps[i].arrival);

    let mut outcomes = vec![None; ps.len()];
    let mut now: u32 = 0;
    for i in order {
        now = now.max(ps[i].arrival);
        let start = now;
        now += ps[i].burst;
        outcomes[i] = Some(ProcessOutcome::new(&ps[i], start, now));
    }
    (outcomes, now)
}

fn sjf(ps: &[Process]) -> Run {
    let mut outcomes = vec![None; ps.len()];
    let mut pending: Vec<usize> = (0..ps.len()).collect();
    let mut ready: Vec<usize> = Vec::new();
    let mut now: u32 = 0;

    while !pending.is_empty() || !ready.is_empty() {
        let mut k = 0;
        while k < pending.len() {
            if ps[pending[k]].arrival <= now {
                ready.push(pending.remove(k));
            } else {
                k += 1;
            }
        }

        let shortest = ready
            .iter()
            .enumerate()
            .min_by_key(|&(_, &i)| ps[i].burst)
            .map(|(pos, _)| pos);
        let Some(pos) = shortest else {
            now = pending.iter().map(|&i| ps[i].arrival).min().unwrap_or(now + 1);
            continue;
        };

        let i = ready.remove(pos);
        let start = now;
        now += ps[i].burst;
        outcomes[i] = Some(ProcessOutcome::new(&ps[i], start, now));
    }
    (outcomes, now)
}

fn srtf(ps: &[Process]) -> Run {
    let n = ps.len();
    let mut outcomes = vec![None; n];
    let mut remaining: Vec<u32> = ps.iter().map(|p| p.burst).collect();
    let mut first_run: Vec<Option<u32>> = vec![None; n];
    let mut done = 0;
    let mut now: u32 = 0;

    while done < n {
        let pick = (0..n)
            .filter(|&i| ps[i].arrival <= now && remaining[i] > 0)
            .min_by_key(|&i| remaining[i]);
        let Some(i) = pick else {
            now = next_arrival(ps, |i| remaining[i] > 0).unwrap_or(now + 1);
            continue;
        };

        let started = *first_run[i].get_or_insert(now);
        remaining[i] -= 1;
        now += 1;
        if remaining[i] == 0 {
            outcomes[i] = Some(ProcessOutcome::new(&ps[i], started, now));
            done += 1;
        }
    }
    (outcomes, now)
}

/// Queue every arrived, unfinished process not already queued, in input
/// order, except `running`.
fn admit(
    ps: &[Process],
    remaining: &[u32],
    queued: &mut [bool],
    queue: &mut VecDeque<usize>,
    now: u32,
    running: Option<usize>,
) {
    for i in 0..ps.len() {
        if Some(i) != running && !queued[i] && remaining[i] > 0 && ps[i].arrival <= now {
            queue.push_back(i);
            queued[i] = true;
        }
    }
}

fn round_robin(ps: &[Process], quantum: u32) -> Run {
    let n = ps.len();
    let mut outcomes = vec![None; n];
    let mut remaining: Vec<u32> = ps.iter().map(|p| p.burst).collect();
    let mut first_run: Vec<Option<u32>> = vec![None; n];
    let mut queued = vec![false; n];
    let mut queue = VecDeque::new();
    let mut done = 0;
    let mut now: u32 = 0;

    while done < n {
        admit(ps, &remaining, &mut queued, &mut queue, now, None);
        let Some(i) = queue.pop_front() else {
            now = next_arrival(ps, |i| remaining[i] > 0).unwrap_or(now + 1);
            continue;
        };
        queued[i] = false;

        let started = *first_run[i].get_or_insert(now);
        if remaining[i] <= quantum {
            now += remaining[i];
            remaining[i] = 0;
            outcomes[i] = Some(ProcessOutcome::new(&ps[i], started, now));
            done += 1;
        } else {
            now += quantum;
            remaining[i] -= quantum;
            // Arrivals during the slice go ahead of the preempted process.
            admit(ps, &remaining, &mut queued, &mut queue, now, Some(i));
            queue.push_back(i);
            queued[i] = true;
        }
    }
    (outcomes, now)
}

fn priority(ps: &[Process]) -> Run {
    let n = ps.len();
    let mut outcomes: Vec<Option<ProcessOutcome>> = vec![None; n];
    let mut done = 0;
    let mut now: u32 = 0;

    while done < n {
        let pick = (0..n)
            .filter(|&i| outcomes[i].is_none() && ps[i].arrival <= now)
            .min_by_key(|&i| ps[i].priority);
        let Some(i) = pick else {
            now = next_arrival(ps, |i| outcomes[i].is_none()).unwrap_or(now + 1);
            continue;
        };

        let start = now;
        now += ps[i].burst;
        outcomes[i] = Some(ProcessOutcome::new(&ps[i], start, now));
        done += 1;
    }
    (outcomes, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::process::default_workload;

    fn completions(schedule: &Schedule) -> Vec<u32> {
        schedule.outcomes.iter().map(|o| o.completion).collect()
    }

    fn responses(schedule: &Schedule) -> Vec<u32> {
        schedule.outcomes.iter().map(|o| o.response).collect()
    }

    fn run(algorithm: Algorithm) -> Schedule {
        algorithm.run(&default_workload()).unwrap()
    }

    #[test]
    fn fcfs_runs_in_arrival_order() {
        let s = run(Algorithm::Fcfs);
        assert_eq!(completions(&s), [6, 10, 18, 21]);
        assert_eq!(responses(&s), [0, 4, 6, 12]);
        assert_eq!(s.total_time, 21);
    }

    #[test]
    fn sjf_picks_shortest_arrived_burst() {
        let s = run(Algorithm::Sjf);
        assert_eq!(completions(&s), [6, 13, 21, 9]);
        assert_eq!(responses(&s), [0, 7, 9, 0]);
    }

    #[test]
    fn srtf_matches_sjf_when_no_preemption_pays_off() {
        let s = run(Algorithm::Srtf);
        assert_eq!(completions(&s), [6, 13, 21, 9]);
        assert_eq!(responses(&s), [0, 7, 9, 0]);
    }

    #[test]
    fn srtf_preempts_for_shorter_arrival() {
        let ps = [Process::new(1, 0, 8, 1), Process::new(2, 1, 2, 1)];
        let s = Algorithm::Srtf.run(&ps).unwrap();
        assert_eq!(completions(&s), [10, 3]);
        assert_eq!(responses(&s), [0, 0]);
    }

    #[test]
    fn round_robin_queues_arrivals_before_preempted() {
        let s = run(Algorithm::RoundRobin { quantum: 2 });
        assert_eq!(completions(&s), [14, 10, 21, 17]);
        assert_eq!(responses(&s), [0, 0, 2, 4]);
        assert_eq!(s.total_time, 21);
    }

    #[test]
    fn round_robin_rejects_zero_quantum() {
        let err = Algorithm::RoundRobin { quantum: 0 }
            .run(&default_workload())
            .unwrap_err();
        assert!(matches!(err, SimError::ZeroQuantum));
    }

    #[test]
    fn priority_picks_lowest_number_among_arrived() {
        let s = run(Algorithm::Priority);
        assert_eq!(completions(&s), [6, 10, 18, 21]);
        assert_eq!(responses(&s), [0, 4, 6, 12]);
    }

    #[test]
    fn idle_gaps_are_skipped_for_every_policy() {
        let ps = [Process::new(1, 5, 2, 1), Process::new(2, 20, 1, 1)];
        for algorithm in Algorithm::suite(2) {
            let s = algorithm.run(&ps).unwrap();
            assert_eq!(completions(&s), [7, 21], "{algorithm}");
            assert_eq!(s.total_time, 21, "{algorithm}");
        }
    }

    #[test]
    fn every_policy_finishes_every_process() {
        let ps = default_workload();
        for algorithm in Algorithm::suite(3) {
            let s = algorithm.run(&ps).unwrap();
            assert_eq!(s.outcomes.len(), ps.len());
            for (o, p) in s.outcomes.iter().zip(&ps) {
                assert_eq!(o.id, p.id);
                assert_eq!(o.turnaround, o.waiting + p.burst);
                assert!(o.response <= o.waiting);
            }
        }
    }

    #[test]
    fn oversized_workload_is_rejected_by_every_policy() {
        let ps = [
            Process::new(1, 0, 3_000_000_000, 1),
            Process::new(2, 0, 2_000_000_000, 1),
        ];
        for algorithm in Algorithm::suite(2) {
            assert!(matches!(algorithm.run(&ps), Err(SimError::TimeOverflow)));
        }
    }

    #[test]
    fn workload_ending_at_the_last_tick_completes() {
        let start = u32::MAX - 10;
        let ps = [Process::new(1, start, 4, 1), Process::new(2, start, 6, 2)];
        for algorithm in Algorithm::suite(2) {
            let s = algorithm.run(&ps).unwrap();
            assert_eq!(s.total_time, u32::MAX, "{algorithm}");
        }
    }

    #[test]
    fn names_match_table_labels() {
        let names: Vec<_> = Algorithm::suite(2).iter().map(|a| a.name()).collect();
        assert_eq!(names, ["FCFS", "SJF", "SRTF", "RR", "Priority"]);
    }
}
