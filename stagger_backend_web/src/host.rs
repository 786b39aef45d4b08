// Copyright 2026 the Stagger Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser [`Host`] implementation.
//!
//! Every registration stores its JS closure next to the browser id, keyed by
//! the typed handle handed back to core. When a registration fires, the
//! closure turns it into a [`HostEvent`] and passes it to the dispatcher set
//! with [`WebHost::set_dispatcher`], together with a `WebHost` the dispatcher
//! can hand straight to [`RevealList::dispatch`].
//!
//! A closure may not be dropped while it runs, so removed closures are parked
//! in a retired list that is emptied at the start of the next callback.
//!
//! [`RevealList::dispatch`]: stagger_core::reveal::RevealList::dispatch

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use js_sys::{Array, Reflect};
use kurbo::Point;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Element, Event, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MediaQueryList, MediaQueryListEvent, TouchEvent, TouchList,
    WheelEvent,
};

use stagger_core::device::{DeviceHints, EffectiveConnection};
use stagger_core::host::{
    ContainerRef, FrameHandle, GestureInput, Host, HostEvent, IntersectionEntry, ListenerHandle,
    MemoryInfo, ObserverHandle, ObserverOptions, TimerHandle, WatchHandle,
};
use stagger_core::time::{Duration, HostTime};

use crate::bindings;
use crate::millis_to_host_time;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
const GESTURE_EVENTS: [&str; 4] = ["touchstart", "touchmove", "touchend", "wheel"];

type Dispatcher = Box<dyn FnMut(HostEvent, &mut WebHost)>;
type FrameClosure = Closure<dyn FnMut(f64)>;
type TimerClosure = Closure<dyn FnMut()>;
type ObserverClosure = Closure<dyn FnMut(Array)>;
type WatchClosure = Closure<dyn FnMut(MediaQueryListEvent)>;
type EventClosure = Closure<dyn FnMut(Event)>;

enum Retired {
    Frame(FrameClosure),
    Timer(TimerClosure),
    Observer(ObserverClosure),
    Watch(WatchClosure),
    Listener(EventClosure),
}

struct Observation {
    observer: IntersectionObserver,
    closure: ObserverClosure,
}

struct Watch {
    query: MediaQueryList,
    closure: WatchClosure,
}

#[derive(Default)]
struct Inner {
    dispatcher: RefCell<Option<Dispatcher>>,
    next_id: Cell<u64>,
    frames: RefCell<BTreeMap<FrameHandle, (i32, FrameClosure)>>,
    timeouts: RefCell<BTreeMap<TimerHandle, (i32, TimerClosure)>>,
    intervals: RefCell<BTreeMap<TimerHandle, (i32, TimerClosure)>>,
    observers: RefCell<BTreeMap<ObserverHandle, Observation>>,
    watches: RefCell<BTreeMap<WatchHandle, Option<Watch>>>,
    listeners: RefCell<BTreeMap<ListenerHandle, EventClosure>>,
    containers: RefCell<BTreeMap<ContainerRef, Element>>,
    retired: RefCell<Vec<Retired>>,
}

impl Inner {
    fn alloc_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn retire(&self, closure: Retired) {
        self.retired.borrow_mut().push(closure);
    }

    /// Empties the retired list. Called at the start of every callback, when
    /// none of the retired closures can be running.
    fn bury(&self) {
        if let Ok(mut retired) = self.retired.try_borrow_mut() {
            retired.clear();
        }
    }
}

fn deliver(inner: &Rc<Inner>, event: HostEvent) {
    let Ok(mut slot) = inner.dispatcher.try_borrow_mut() else {
        tracing::warn!(?event, "host event arrived during dispatch; dropped");
        return;
    };
    if let Some(dispatch) = slot.as_mut() {
        let mut host = WebHost {
            inner: Rc::clone(inner),
        };
        dispatch(event, &mut host);
    }
}

/// A [`Host`] backed by browser APIs.
///
/// `WebHost` is a cheap handle: clones share the same registrations. Bind each
/// [`ContainerRef`] to its element with [`bind_container`](Self::bind_container)
/// before mounting the list that owns it.
#[derive(Clone, Default)]
pub struct WebHost {
    inner: Rc<Inner>,
}

impl core::fmt::Debug for WebHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebHost")
            .field("frames", &self.inner.frames.borrow().len())
            .field("timeouts", &self.inner.timeouts.borrow().len())
            .field("intervals", &self.inner.intervals.borrow().len())
            .field("observers", &self.inner.observers.borrow().len())
            .field("watches", &self.inner.watches.borrow().len())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

impl WebHost {
    /// Creates a host with no dispatcher and no bound containers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the function that receives every fired registration.
    ///
    /// The dispatcher gets a `WebHost` sharing this host's registrations, so
    /// it can pass it on as `&mut dyn Host`.
    pub fn set_dispatcher(&self, dispatcher: impl FnMut(HostEvent, &mut Self) + 'static) {
        *self.inner.dispatcher.borrow_mut() = Some(Box::new(dispatcher));
    }

    /// Drops the dispatcher. Registrations still fire but are discarded.
    pub fn clear_dispatcher(&self) {
        if let Ok(mut slot) = self.inner.dispatcher.try_borrow_mut() {
            slot.take();
        }
    }

    /// Maps `container` to the element whose visibility it stands for.
    pub fn bind_container(&self, container: ContainerRef, element: Element) {
        self.inner.containers.borrow_mut().insert(container, element);
    }

    /// Forgets the element bound to `container`.
    pub fn unbind_container(&self, container: ContainerRef) {
        self.inner.containers.borrow_mut().remove(&container);
    }

    /// Cancels every outstanding registration.
    pub fn shutdown(&mut self) {
        let frames: Vec<_> = self.inner.frames.borrow().keys().copied().collect();
        for frame in frames {
            self.cancel_frame(frame);
        }
        let timeouts: Vec<_> = self.inner.timeouts.borrow().keys().copied().collect();
        for timer in timeouts {
            self.clear_timeout(timer);
        }
        let intervals: Vec<_> = self.inner.intervals.borrow().keys().copied().collect();
        for timer in intervals {
            self.clear_interval(timer);
        }
        let observers: Vec<_> = self.inner.observers.borrow().keys().copied().collect();
        for observer in observers {
            self.disconnect_observer(observer);
        }
        let watches: Vec<_> = self.inner.watches.borrow().keys().copied().collect();
        for watch in watches {
            self.unwatch_reduced_motion(watch);
        }
        let listeners: Vec<_> = self.inner.listeners.borrow().keys().copied().collect();
        for listener in listeners {
            self.unlisten_gestures(listener);
        }
    }

    fn timerclosure(&self, handle: TimerHandle, one_shot: bool) -> TimerClosure {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        Closure::wrap(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.bury();
            if one_shot {
                let fired = inner.timeouts.borrow_mut().remove(&handle);
                if let Some((_, closure)) = fired {
                    inner.retire(Retired::Timer(closure));
                }
            }
            deliver(&inner, HostEvent::Timer { handle });
        }) as Box<dyn FnMut()>)
    }
}

fn delay_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

fn touch_points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|touch| Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())))
        .collect()
}

fn gesture_input(event: &Event) -> Option<GestureInput> {
    if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
        return Some(GestureInput::Wheel {
            ctrl_key: wheel.ctrl_key(),
        });
    }
    let touch = event.dyn_ref::<TouchEvent>()?;
    let points = touch_points(&touch.touches());
    match event.type_().as_str() {
        "touchstart" => Some(GestureInput::TouchStart(points)),
        "touchmove" => Some(GestureInput::TouchMove(points)),
        "touchend" => Some(GestureInput::TouchEnd(points)),
        _ => None,
    }
}

fn read_number(target: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()?
        .as_f64()
        .filter(|v| v.is_finite())
}

impl Host for WebHost {
    fn now(&self) -> HostTime {
        crate::now()
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.inner.alloc_id());
        let weak = Rc::downgrade(&self.inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.bury();
            let fired = inner.frames.borrow_mut().remove(&handle);
            if let Some((_, closure)) = fired {
                inner.retire(Retired::Frame(closure));
            }
            let now = millis_to_host_time(timestamp_ms);
            deliver(&inner, HostEvent::Frame { handle, now });
        }) as Box<dyn FnMut(f64)>);
        let id = bindings::request_animation_frame(closure.as_ref().unchecked_ref());
        self.inner.frames.borrow_mut().insert(handle, (id, closure));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let removed = self.inner.frames.borrow_mut().remove(&handle);
        if let Some((id, closure)) = removed {
            bindings::cancel_animation_frame(id);
            self.inner.retire(Retired::Frame(closure));
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.inner.alloc_id());
        let closure = self.timerclosure(handle, true);
        let id = bindings::set_timeout(closure.as_ref().unchecked_ref(), delay_millis(delay));
        self.inner.timeouts.borrow_mut().insert(handle, (id, closure));
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        let removed = self.inner.timeouts.borrow_mut().remove(&handle);
        if let Some((id, closure)) = removed {
            bindings::clear_timeout(id);
            self.inner.retire(Retired::Timer(closure));
        }
    }

    fn set_interval(&mut self, period: Duration) -> TimerHandle {
        let handle = TimerHandle(self.inner.alloc_id());
        let closure = self.timerclosure(handle, false);
        let id = bindings::set_interval(closure.as_ref().unchecked_ref(), delay_millis(period));
        self.inner.intervals.borrow_mut().insert(handle, (id, closure));
        handle
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        let removed = self.inner.intervals.borrow_mut().remove(&handle);
        if let Some((id, closure)) = removed {
            bindings::clear_interval(id);
            self.inner.retire(Retired::Timer(closure));
        }
    }

    fn observe_intersection(
        &mut self,
        container: ContainerRef,
        options: &ObserverOptions,
    ) -> Option<ObserverHandle> {
        let element = self.inner.containers.borrow().get(&container).cloned();
        let Some(element) = element else {
            tracing::debug!(?container, "container is not bound to an element");
            return None;
        };

        let handle = ObserverHandle(self.inner.alloc_id());
        let weak = Rc::downgrade(&self.inner);
        let closure = Closure::wrap(Box::new(move |entries: Array| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.bury();
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let entry = IntersectionEntry {
                    is_intersecting: entry.is_intersecting(),
                    intersection_ratio: entry.intersection_ratio(),
                    time: millis_to_host_time(entry.time()),
                };
                deliver(
                    &inner,
                    HostEvent::Intersection {
                        observer: handle,
                        entry,
                    },
                );
            }
        }) as Box<dyn FnMut(Array)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        let thresholds: Array = options
            .thresholds
            .iter()
            .map(|&t| JsValue::from_f64(t))
            .collect();
        init.set_threshold(&thresholds);

        let observer =
            match IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init) {
                Ok(observer) => observer,
                Err(error) => {
                    tracing::warn!(?error, "IntersectionObserver unavailable");
                    self.inner.retire(Retired::Observer(closure));
                    return None;
                }
            };
        observer.observe(&element);
        self.inner.observers.borrow_mut().insert(
            handle,
            Observation { observer, closure },
        );
        Some(handle)
    }

    fn disconnect_observer(&mut self, handle: ObserverHandle) {
        let removed = self.inner.observers.borrow_mut().remove(&handle);
        if let Some(observation) = removed {
            observation.observer.disconnect();
            self.inner.retire(Retired::Observer(observation.closure));
        }
    }

    fn watch_reduced_motion(&mut self) -> (WatchHandle, bool) {
        let handle = WatchHandle(self.inner.alloc_id());
        let query = web_sys::window()
            .and_then(|window| window.match_media(REDUCED_MOTION_QUERY).ok().flatten());
        let Some(query) = query else {
            self.inner.watches.borrow_mut().insert(handle, None);
            return (handle, false);
        };

        let weak = Rc::downgrade(&self.inner);
        let closure = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.bury();
            deliver(
                &inner,
                HostEvent::ReducedMotion {
                    watch: handle,
                    reduce: event.matches(),
                },
            );
        }) as Box<dyn FnMut(MediaQueryListEvent)>);
        if let Err(error) =
            query.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        {
            tracing::warn!(?error, "cannot watch the reduced-motion preference");
        }
        let reduce = query.matches();
        self.inner
            .watches
            .borrow_mut()
            .insert(handle, Some(Watch { query, closure }));
        (handle, reduce)
    }

    fn unwatch_reduced_motion(&mut self, handle: WatchHandle) {
        let removed = self.inner.watches.borrow_mut().remove(&handle).flatten();
        if let Some(watch) = removed {
            let callback = watch.closure.as_ref().unchecked_ref();
            let _ = watch
                .query
                .remove_event_listener_with_callback("change", callback);
            self.inner.retire(Retired::Watch(watch.closure));
        }
    }

    fn listen_gestures(&mut self) -> ListenerHandle {
        let handle = ListenerHandle(self.inner.alloc_id());
        let weak = Rc::downgrade(&self.inner);
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.bury();
            if let Some(input) = gesture_input(&event) {
                deliver(
                    &inner,
                    HostEvent::Gesture {
                        listener: handle,
                        input,
                    },
                );
            }
        }) as Box<dyn FnMut(Event)>);

        if let Some(window) = web_sys::window() {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            for kind in GESTURE_EVENTS {
                let added = window.add_event_listener_with_callback_and_add_event_listener_options(
                    kind,
                    closure.as_ref().unchecked_ref(),
                    &options,
                );
                if let Err(error) = added {
                    tracing::warn!(kind, ?error, "cannot listen for gestures");
                }
            }
        }
        self.inner.listeners.borrow_mut().insert(handle, closure);
        handle
    }

    fn unlisten_gestures(&mut self, handle: ListenerHandle) {
        let removed = self.inner.listeners.borrow_mut().remove(&handle);
        let Some(closure) = removed else {
            return;
        };
        if let Some(window) = web_sys::window() {
            for kind in GESTURE_EVENTS {
                let _ = window
                    .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            }
        }
        self.inner.retire(Retired::Listener(closure));
    }

    fn create_container_ref(&mut self) -> ContainerRef {
        ContainerRef(self.inner.alloc_id())
    }

    fn device_hints(&self) -> DeviceHints {
        let Some(window) = web_sys::window() else {
            return DeviceHints::default();
        };
        let navigator = window.navigator();
        let cores = navigator.hardware_concurrency();
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "hardwareConcurrency is a small positive integer"
        )]
        let logical_cores = if cores.is_finite() && cores >= 1.0 {
            cores as u32
        } else {
            DeviceHints::FALLBACK_CORES
        };
        let effective_connection = Reflect::get(&navigator, &JsValue::from_str("connection"))
            .ok()
            .filter(|connection| connection.is_object())
            .and_then(|connection| {
                Reflect::get(&connection, &JsValue::from_str("effectiveType")).ok()
            })
            .and_then(|kind| kind.as_string())
            .and_then(|kind| EffectiveConnection::parse(&kind));
        DeviceHints {
            logical_cores,
            device_memory_gb: read_number(&navigator, "deviceMemory"),
            effective_connection,
        }
    }

    fn memory_info(&self) -> Option<MemoryInfo> {
        let performance = web_sys::window()?.performance()?;
        let memory = Reflect::get(&performance, &JsValue::from_str("memory")).ok()?;
        if !memory.is_object() {
            return None;
        }
        Some(MemoryInfo {
            used_bytes: read_number(&memory, "usedJSHeapSize")?,
            limit_bytes: read_number(&memory, "jsHeapSizeLimit")?,
        })
    }
}
