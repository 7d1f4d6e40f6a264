//! Deferred task queue
//!
//! Requests raised while an engine call is on the stack are posted here and
//! run by the embedding loop once that call has returned. Ordering is FIFO;
//! no timers are involved.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Single-threaded FIFO of pending tasks
pub struct DeferredQueue<T> {
    tasks: Rc<RefCell<VecDeque<T>>>,
}

/// Cloneable posting end of a `DeferredQueue`
pub struct Poster<T> {
    tasks: Rc<RefCell<VecDeque<T>>>,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// A handle that can post into this queue
    pub fn poster(&self) -> Poster<T> {
        Poster {
            tasks: Rc::clone(&self.tasks),
        }
    }

    /// Take the oldest task.
    ///
    /// The internal borrow is released before returning, so running the task
    /// may post more work.
    pub fn pop(&self) -> Option<T> {
        self.tasks.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Poster<T> {
    /// Queue a task for after the current call stack unwinds
    pub fn post(&self, task: T) {
        self.tasks.borrow_mut().push_back(task);
    }
}

impl<T> Clone for Poster<T> {
    fn clone(&self) -> Self {
        Self {
            tasks: Rc::clone(&self.tasks),
        }
    }
}

impl<T> fmt::Debug for DeferredQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue").field("pending", &self.len()).finish()
    }
}

impl<T> fmt::Debug for Poster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Poster")
            .field("pending", &self.tasks.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_fifo_order() {
        let queue = DeferredQueue::new();
        let poster = queue.poster();
        poster.post(1);
        poster.post(2);
        poster.clone().post(3);

        let mut seen = Vec::new();
        while let Some(t) = queue.pop() {
            seen.push(t);
        }
        assert_eq!(seen, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_post_during_call_runs_after_return() {
        let queue: DeferredQueue<&'static str> = DeferredQueue::new();
        let poster = queue.poster();
        let depth = Cell::new(0u32);
        let mut log = Vec::new();

        // Simulated engine call that raises a request mid-call
        let engine_call = |log: &mut Vec<String>| {
            depth.set(depth.get() + 1);
            poster.post("open inventory");
            log.push(format!("engine returns at depth {}", depth.get()));
            depth.set(depth.get() - 1);
        };

        engine_call(&mut log);
        assert_eq!(queue.len(), 1);

        while let Some(task) = queue.pop() {
            log.push(format!("{task} at depth {}", depth.get()));
        }
        assert_eq!(
            log,
            vec!["engine returns at depth 1", "open inventory at depth 0"]
        );
    }

    #[test]
    fn test_tasks_posted_while_popping_run_same_pass() {
        let queue = DeferredQueue::new();
        let poster = queue.poster();
        poster.post(1u32);

        let mut seen = Vec::new();
        while let Some(t) = queue.pop() {
            seen.push(t);
            if t < 3 {
                poster.post(t + 1);
            }
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
