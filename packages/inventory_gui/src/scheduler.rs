//! Deferring work to later host ticks.

use std::{
    collections::VecDeque,
    mem,
    sync::atomic::{
        AtomicBool,
        AtomicU64,
        Ordering,
    },
    task::{Context, Poll},
};
use crossbeam_channel::{Sender, Receiver, unbounded};
use futures::{
    executor::block_on,
    future::BoxFuture,
    task::noop_waker,
    FutureExt,
};
use parking_lot::Mutex;


/// Deferred unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run work later, on the host's logic thread.
pub trait Scheduler: Send + Sync {
    /// Run `task` after `ticks` host ticks have passed.
    fn run_later(&self, ticks: u32, task: Task);

    /// Drive `fut` to completion. It may complete over several ticks.
    fn spawn(&self, fut: BoxFuture<'static, ()>);
}


/// Scheduler that runs tasks right away, ignoring delays, and drives futures to completion
/// before returning. Futures spawned while another one is being driven are queued behind it.
#[derive(Default)]
pub struct ImmediateScheduler {
    queue: Mutex<VecDeque<BoxFuture<'static, ()>>>,
    running: AtomicBool,
}

impl ImmediateScheduler {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Scheduler for ImmediateScheduler {
    fn run_later(&self, _ticks: u32, task: Task) {
        task()
    }

    fn spawn(&self, fut: BoxFuture<'static, ()>) {
        self.queue.lock().push_back(fut);
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        loop {
            let next = self.queue.lock().pop_front();
            match next {
                Some(fut) => block_on(fut),
                None => break,
            }
        }
        self.running.store(false, Ordering::SeqCst);
    }
}


enum Queued {
    Task {
        due: u64,
        task: Task,
    },
    Future(BoxFuture<'static, ()>),
}

#[derive(Default)]
struct TickState {
    tasks: Vec<(u64, Task)>,
    futures: Vec<BoxFuture<'static, ()>>,
}

/// Scheduler driven by the host calling `tick` once per game tick.
///
/// Submissions go through a channel so they can be made from within tasks and futures that are
/// currently being run.
pub struct TickScheduler {
    tick: AtomicU64,
    send: Sender<Queued>,
    recv: Receiver<Queued>,
    state: Mutex<TickState>,
}

impl TickScheduler {
    /// Construct with defaults.
    pub fn new() -> Self {
        let (send, recv) = unbounded();
        TickScheduler {
            tick: AtomicU64::new(0),
            send,
            recv,
            state: Default::default(),
        }
    }

    /// Get the number of the current tick.
    pub fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::SeqCst)
    }

    /// Whether no tasks or futures are outstanding.
    pub fn is_idle(&self) -> bool {
        let state = self.state.lock();
        self.recv.is_empty() && state.tasks.is_empty() && state.futures.is_empty()
    }

    /// Advance one tick. Runs every task that has come due and polls every outstanding future
    /// once. Work submitted during the tick that is already due runs within the same tick.
    pub fn tick(&self) {
        let now = self.tick.fetch_add(1, Ordering::SeqCst) + 1;
        let mut batch = mem::take(&mut self.state.lock().futures);
        let mut keep = Vec::new();
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        loop {
            let due = {
                let mut state = self.state.lock();
                for queued in self.recv.try_iter() {
                    match queued {
                        Queued::Task { due, task } => state.tasks.push((due, task)),
                        Queued::Future(fut) => batch.push(fut),
                    }
                }
                let (due, later) = mem::take(&mut state.tasks)
                    .into_iter()
                    .partition::<Vec<_>, _>(|&(due, _)| due <= now);
                state.tasks = later;
                due
            };

            if due.is_empty() && batch.is_empty() {
                break;
            }

            for (_, task) in due {
                task();
            }
            for mut fut in mem::take(&mut batch) {
                if let Poll::Pending = fut.poll_unpin(&mut cx) {
                    keep.push(fut);
                }
            }
        }

        self.state.lock().futures.extend(keep);
    }

    /// Tick until idle or until `max_ticks` ticks have passed. Returns whether idle was reached.
    pub fn run_until_idle(&self, max_ticks: u32) -> bool {
        for _ in 0..max_ticks {
            if self.is_idle() {
                return true;
            }
            self.tick();
        }
        self.is_idle()
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        TickScheduler::new()
    }
}

impl Scheduler for TickScheduler {
    fn run_later(&self, ticks: u32, task: Task) {
        let due = self.current_tick() + ticks as u64;
        if self.send.send(Queued::Task { due, task }).is_err() {
            error!("tick scheduler channel disconnected");
        }
    }

    fn spawn(&self, fut: BoxFuture<'static, ()>) {
        if self.send.send(Queued::Future(fut)).is_err() {
            error!("tick scheduler channel disconnected");
        }
    }
}


#[test]
fn test_tick_scheduler_delays() {
    use std::sync::Arc;

    let sched = Arc::new(TickScheduler::new());
    let log = Arc::new(Mutex::new(Vec::new()));
    for delay in [2, 0, 1] {
        let log = Arc::clone(&log);
        sched.run_later(delay, Box::new(move || log.lock().push(delay)));
    }
    sched.tick();
    assert_eq!(*log.lock(), vec![0, 1]);
    sched.tick();
    assert_eq!(*log.lock(), vec![0, 1, 2]);
    assert!(sched.is_idle());
}

#[test]
fn test_tick_scheduler_nested_submission() {
    use std::sync::Arc;

    let sched = Arc::new(TickScheduler::new());
    let log = Arc::new(Mutex::new(Vec::new()));
    let sched2 = Arc::clone(&sched);
    let log2 = Arc::clone(&log);
    sched.spawn(async move {
        log2.lock().push("future");
        let log3 = Arc::clone(&log2);
        sched2.run_later(0, Box::new(move || log3.lock().push("task")));
    }.boxed());
    assert!(log.lock().is_empty());
    sched.tick();
    assert_eq!(*log.lock(), vec!["future", "task"]);
}

#[test]
fn test_immediate_scheduler_queues_nested_spawns() {
    use std::sync::Arc;

    let sched = Arc::new(ImmediateScheduler::new());
    let log = Arc::new(Mutex::new(Vec::new()));
    let sched2 = Arc::clone(&sched);
    let log2 = Arc::clone(&log);
    sched.spawn(async move {
        let log3 = Arc::clone(&log2);
        sched2.spawn(async move { log3.lock().push(2) }.boxed());
        log2.lock().push(1);
    }.boxed());
    assert_eq!(*log.lock(), vec![1, 2]);
}
