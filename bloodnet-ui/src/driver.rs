#![cfg(target_arch = "wasm32")]

//! Chạy `Widget::update` trong trình duyệt: giữ trạng thái, đặt hẹn giờ cho
//! các action trì hoãn và báo component vẽ lại.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use bloodnet_core::{Scheduled, Widget};
use chrono::Utc;
use gloo_timers::callback::Timeout;

struct Inner<W: Widget> {
    widget: RefCell<W>,
    timers: RefCell<HashMap<u64, Timeout>>,
    finished: RefCell<Vec<u64>>,
    next_timer: Cell<u64>,
    redraw: RefCell<Option<Rc<dyn Fn()>>>,
}

/// Bộ điều khiển duy nhất của một widget. Clone chỉ tăng bộ đếm tham chiếu.
pub struct Driver<W: Widget> {
    inner: Rc<Inner<W>>,
}

impl<W: Widget> Clone for Driver<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<W: Widget> PartialEq for Driver<W> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<W> Driver<W>
where
    W: Widget + 'static,
    W::Action: 'static,
{
    pub fn new(widget: W) -> Self {
        Self {
            inner: Rc::new(Inner {
                widget: RefCell::new(widget),
                timers: RefCell::new(HashMap::new()),
                finished: RefCell::new(Vec::new()),
                next_timer: Cell::new(0),
                redraw: RefCell::new(None),
            }),
        }
    }

    pub fn with<R>(&self, read: impl FnOnce(&W) -> R) -> R {
        read(&self.inner.widget.borrow())
    }

    pub fn dispatch(&self, action: W::Action) {
        let follow_ups = self
            .inner
            .widget
            .borrow_mut()
            .update(action, Utc::now());
        for task in follow_ups {
            self.schedule(task);
        }
        self.notify();
    }

    /// Đăng ký hàm vẽ lại (một component cho mỗi widget).
    pub fn subscribe(&self, redraw: impl Fn() + 'static) {
        *self.inner.redraw.borrow_mut() = Some(Rc::new(redraw));
    }

    pub fn unsubscribe(&self) {
        self.inner.redraw.borrow_mut().take();
    }

    /// Huỷ mọi hẹn giờ chưa chạy.
    pub fn cancel_all(&self) {
        let pending = self.inner.timers.borrow().len();
        self.inner.timers.borrow_mut().clear();
        self.inner.finished.borrow_mut().clear();
        tracing::debug!(pending, "driver: huỷ các tác vụ trì hoãn");
    }

    fn schedule(&self, task: Scheduled<W::Action>) {
        self.prune_finished();

        let id = self.inner.next_timer.get();
        self.inner.next_timer.set(id + 1);

        let millis = u32::try_from(task.delay.as_millis()).unwrap_or(u32::MAX);
        let driver = self.clone();
        let action = task.action;
        let timeout = Timeout::new(millis, move || {
            driver.dispatch(action);
            driver.inner.finished.borrow_mut().push(id);
        });
        self.inner.timers.borrow_mut().insert(id, timeout);
    }

    // Chỉ bỏ các Timeout mà callback đã chạy xong.
    fn prune_finished(&self) {
        let finished: Vec<u64> = self.inner.finished.borrow_mut().drain(..).collect();
        let mut timers = self.inner.timers.borrow_mut();
        for id in finished {
            timers.remove(&id);
        }
    }

    fn notify(&self) {
        let redraw = self.inner.redraw.borrow().clone();
        if let Some(redraw) = redraw {
            redraw();
        }
    }
}
