//! Tác vụ trì hoãn có thể huỷ, và hàng đợi thời gian ảo để chạy chúng.
//!
//! Widget không tự đặt hẹn giờ. Trình duyệt chạy `Scheduled` bằng
//! `gloo-timers`; test và CLI chạy bằng `DelayQueue`.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::time::to_chrono;
use crate::Widget;

/// Một action cần dispatch sau `delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled<A> {
    pub delay: Duration,
    pub action: A,
}

impl<A> Scheduled<A> {
    pub fn after(delay: Duration, action: A) -> Self {
        Self { delay, action }
    }
}

pub type TaskId = u64;

#[derive(Debug)]
struct Pending<A> {
    id: TaskId,
    due: Duration,
    action: A,
}

/// Hàng đợi theo thời gian ảo. Tác vụ đến hạn chạy theo thời điểm hết hạn,
/// cùng thời điểm thì theo thứ tự đưa vào.
#[derive(Debug)]
pub struct DelayQueue<A> {
    elapsed: Duration,
    next_id: TaskId,
    pending: Vec<Pending<A>>,
}

impl<A> Default for DelayQueue<A> {
    fn default() -> Self {
        Self {
            elapsed: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<A> DelayQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thời gian ảo đã trôi qua kể từ khi tạo hàng đợi.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn push(&mut self, task: Scheduled<A>) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.elapsed.saturating_add(task.delay),
            action: task.action,
        });
        id
    }

    /// Huỷ tác vụ chưa chạy. Trả về `false` nếu tác vụ đã chạy hoặc không tồn tại.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.id != id);
        self.pending.len() != before
    }

    /// Lấy tác vụ đến hạn sớm nhất không muộn hơn `deadline`, đồng thời
    /// tiến đồng hồ ảo tới thời điểm hết hạn của nó.
    ///
    /// Tác vụ có hạn bị bão hoà ở `Duration::MAX` không bao giờ đến hạn.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<A> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= deadline && task.due < Duration::MAX)
            .min_by_key(|(_, task)| (task.due, task.id))
            .map(|(index, _)| index)?;

        let task = self.pending.remove(index);
        self.elapsed = self.elapsed.max(task.due);
        Some(task.action)
    }

    /// Tiến đồng hồ tới `deadline` mà không chạy gì.
    pub fn settle(&mut self, deadline: Duration) {
        self.elapsed = self.elapsed.max(deadline);
    }
}

/// Chạy một widget trên thời gian ảo, bắt đầu từ mốc `origin`.
pub struct Simulation<W: Widget> {
    widget: W,
    queue: DelayQueue<W::Action>,
    origin: DateTime<Utc>,
}

impl<W: Widget> Simulation<W> {
    pub fn new(widget: W, origin: DateTime<Utc>) -> Self {
        Self {
            widget,
            queue: DelayQueue::new(),
            origin,
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.origin
            .checked_add_signed(to_chrono(self.queue.elapsed()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Dispatch ngay tại thời điểm ảo hiện tại.
    pub fn dispatch(&mut self, action: W::Action) -> Vec<TaskId> {
        let now = self.now();
        self.widget
            .update(action, now)
            .into_iter()
            .map(|task| self.queue.push(task))
            .collect()
    }

    /// Tiến thời gian ảo thêm `by`, chạy mọi tác vụ đến hạn (kể cả tác vụ
    /// mới sinh ra trong lúc chạy). Trả về số tác vụ đã chạy.
    pub fn advance(&mut self, by: Duration) -> usize {
        let deadline = self.queue.elapsed().saturating_add(by);
        let mut executed = 0;
        while let Some(action) = self.queue.pop_due(deadline) {
            self.dispatch(action);
            executed += 1;
        }
        self.queue.settle(deadline);
        executed
    }
}
